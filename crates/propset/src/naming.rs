//! Bean-style name handling.
//!
//! Rust methods are registered under their camel-case bean names (`set_max_history`
//! becomes `setMaxHistory`), and property names are looked up in the decapitalized form
//! (`maxHistory`). Callers may pass either snake or camel case.

use std::borrow::Cow;

/// Prefix of single-value mutators.
pub const SETTER_PREFIX: &str = "set";
/// Prefix of collection adders.
pub const ADDER_PREFIX: &str = "add";

const READER_PREFIXES: [&str; 2] = ["get", "is"];

/// Lower-cases the first character, unless the first two characters are both upper case
/// (`URL` stays `URL`, `Name` becomes `name`).
#[must_use]
pub fn decapitalize(name: &str) -> Cow<'_, str> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Cow::Borrowed(name);
    };
    if !first.is_uppercase() || chars.next().is_some_and(char::is_uppercase) {
        return Cow::Borrowed(name);
    }
    let mut out = String::with_capacity(name.len());
    out.extend(first.to_lowercase());
    out.push_str(&name[first.len_utf8()..]);
    Cow::Owned(out)
}

/// Upper-cases the first character.
#[must_use]
pub fn capitalize_first(name: &str) -> Cow<'_, str> {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if !first.is_uppercase() => {
            let mut out = String::with_capacity(name.len());
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            Cow::Owned(out)
        },
        _ => Cow::Borrowed(name),
    }
}

/// Joins `snake_case` segments into `snakeCase`. Names without underscores are returned as is.
#[must_use]
pub fn snake_to_camel(name: &str) -> Cow<'_, str> {
    if !name.contains('_') {
        return Cow::Borrowed(name);
    }
    let mut segments = name.split('_').filter(|segment| !segment.is_empty());
    let mut out = String::with_capacity(name.len());
    if let Some(head) = segments.next() {
        out.push_str(head);
    }
    for segment in segments {
        out.push_str(&capitalize_first(segment));
    }
    Cow::Owned(out)
}

/// Key under which a property is stored: `max_history`, `MaxHistory` and `maxHistory`
/// all map to `maxHistory`.
#[must_use]
pub fn property_key(name: &str) -> String {
    decapitalize(&snake_to_camel(name)).into_owned()
}

/// Bean name of a registered method.
#[must_use]
pub fn method_name(name: &str) -> String {
    snake_to_camel(name).into_owned()
}

/// Name of the adder serving collection property `name` (`item` → `addItem`).
#[must_use]
pub fn adder_name(name: &str) -> String {
    format!("{ADDER_PREFIX}{}", capitalize_first(&snake_to_camel(name)))
}

/// Splits `setName` into the prefix and the decapitalized property (`set`, `name`).
#[must_use]
pub fn split_accessor(method: &str) -> Option<(&'static str, String)> {
    [SETTER_PREFIX, ADDER_PREFIX]
        .into_iter()
        .chain(READER_PREFIXES)
        .find_map(|prefix| {
            let rest = method.strip_prefix(prefix).filter(|rest| !rest.is_empty())?;
            Some((prefix, decapitalize(rest).into_owned()))
        })
}

/// Whether `prefix` (as returned by [`split_accessor`]) denotes a reader.
#[must_use]
pub fn is_reader_prefix(prefix: &str) -> bool {
    READER_PREFIXES.contains(&prefix)
}
