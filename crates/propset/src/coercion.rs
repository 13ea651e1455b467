//! String coercion.
//!
//! Configuration values always arrive as text. [`FromConfigStr`] is the single place that
//! turns that text into a typed value, dispatching on the [`TypeCategory`] of the target
//! type:
//!
//! * **Scalar** - numbers are parsed from the trimmed input, `bool` matches `true`/`false`
//!   case-insensitively, `String` is passed through untouched.
//! * **Enumeration** - the constant with exactly the given name (`#[derive(ConfigEnum)]`).
//! * **String factory** - any [`FromStr`](std::str::FromStr) type registered with
//!   [`string_factory!`](crate::string_factory).
//! * **Complex** - everything else; not convertible from a string.

use std::any::type_name;
use std::borrow::Cow;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

/// How a parameter type is populated from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Primitive numbers, `bool`, `char` and `String`.
    Scalar,
    /// Fieldless enums looked up by variant name.
    Enumeration,
    /// Types built by a string factory.
    StringFactory,
    /// Nested configurable objects.
    Complex,
}

impl TypeCategory {
    /// Whether values of this category can be produced from a string.
    #[must_use]
    pub const fn is_basic(self) -> bool {
        !matches!(self, Self::Complex)
    }
}

/// Failure to turn a configuration string into a typed value.
#[propset_derive::propset_error]
#[derive(Clone)]
pub enum ConversionError {
    #[error("Malformed value \"{value}\" for type [{type_name}]{}: {reason}", format_context(.context))]
    Malformed {
        type_name: &'static str,
        value: String,
        reason: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Conversion to type [{type_name}] yielded no value for \"{value}\"{}", format_context(.context))]
    NoValue { type_name: &'static str, value: String, context: Option<Cow<'static, str>> },

    #[error("No constant named \"{value}\" in enum [{type_name}]{}", format_context(.context))]
    UnknownConstant { type_name: &'static str, value: String, context: Option<Cow<'static, str>> },

    #[error("Failed to build [{type_name}] from value \"{value}\"{}: {reason}", format_context(.context))]
    Factory {
        type_name: &'static str,
        value: String,
        reason: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Type [{type_name}] cannot be built from a string{}", format_context(.context))]
    NotConvertible { type_name: &'static str, context: Option<Cow<'static, str>> },
}

impl ConversionError {
    pub fn malformed<T: ?Sized>(value: &str, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Malformed {
            type_name: type_name::<T>(),
            value: value.to_owned(),
            reason: reason.into(),
            context: None,
        }
    }

    #[must_use]
    pub fn no_value<T: ?Sized>(value: &str) -> Self {
        Self::NoValue { type_name: type_name::<T>(), value: value.to_owned(), context: None }
    }

    #[must_use]
    pub fn unknown_constant<T: ?Sized>(value: &str) -> Self {
        Self::UnknownConstant { type_name: type_name::<T>(), value: value.to_owned(), context: None }
    }

    pub fn factory<T: ?Sized>(value: &str, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Factory {
            type_name: type_name::<T>(),
            value: value.to_owned(),
            reason: reason.into(),
            context: None,
        }
    }

    #[must_use]
    pub fn not_convertible<T: ?Sized>() -> Self {
        Self::NotConvertible { type_name: type_name::<T>(), context: None }
    }

    /// Name of the type the conversion targeted.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Malformed { type_name, .. }
            | Self::NoValue { type_name, .. }
            | Self::UnknownConstant { type_name, .. }
            | Self::Factory { type_name, .. }
            | Self::NotConvertible { type_name, .. } => *type_name,
        }
    }

    /// The offending input, when there was one.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Malformed { value, .. }
            | Self::NoValue { value, .. }
            | Self::UnknownConstant { value, .. }
            | Self::Factory { value, .. } => Some(value.as_str()),
            Self::NotConvertible { .. } => None,
        }
    }
}

/// Types that can be produced from a configuration string.
///
/// `Ok(None)` means the input was well-formed text but names no value of the type
/// (e.g. `"yes"` for a `bool`); callers treat it as a failed conversion.
pub trait FromConfigStr: Sized + 'static {
    const CATEGORY: TypeCategory;

    /// # Errors
    /// Returns a [`ConversionError`] when `raw` cannot be parsed into `Self`.
    fn from_config_str(raw: &str) -> Result<Option<Self>, ConversionError>;
}

/// Converts `raw` into `T`.
///
/// # Errors
/// Propagates the [`ConversionError`] of `T`'s conversion.
///
/// # Example
/// ```rust
/// use propset::coercion::convert;
///
/// assert_eq!(convert::<i32>(" 32 ").unwrap(), Some(32));
/// assert_eq!(convert::<bool>("TRUE").unwrap(), Some(true));
/// assert_eq!(convert::<bool>("yes").unwrap(), None);
/// assert!(convert::<i32>("thirty-two").is_err());
/// ```
pub fn convert<T: FromConfigStr>(raw: &str) -> Result<Option<T>, ConversionError> {
    T::from_config_str(raw)
}

macro_rules! numeric {
    ($($ty:ty),+ $(,)?) => {$(
        impl FromConfigStr for $ty {
            const CATEGORY: TypeCategory = TypeCategory::Scalar;

            fn from_config_str(raw: &str) -> Result<Option<Self>, ConversionError> {
                raw.trim()
                    .parse::<$ty>()
                    .map(Some)
                    .map_err(|err| ConversionError::malformed::<$ty>(raw, err.to_string()))
            }
        }
    )+};
}

numeric!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl FromConfigStr for bool {
    const CATEGORY: TypeCategory = TypeCategory::Scalar;

    fn from_config_str(raw: &str) -> Result<Option<Self>, ConversionError> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Ok(Some(true))
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(Some(false))
        } else {
            Ok(None)
        }
    }
}

impl FromConfigStr for String {
    const CATEGORY: TypeCategory = TypeCategory::Scalar;

    fn from_config_str(raw: &str) -> Result<Option<Self>, ConversionError> {
        Ok(Some(raw.to_owned()))
    }
}

impl FromConfigStr for char {
    const CATEGORY: TypeCategory = TypeCategory::Scalar;

    fn from_config_str(raw: &str) -> Result<Option<Self>, ConversionError> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Some(c)),
            _ => Err(ConversionError::malformed::<Self>(raw, "expected exactly one character")),
        }
    }
}

/// Registers [`FromStr`](std::str::FromStr) types as string-factory parameters.
///
/// The raw, untrimmed value is handed to `from_str`; its error becomes a
/// [`ConversionError::Factory`].
///
/// ```rust
/// use std::str::FromStr;
///
/// #[derive(Debug, PartialEq)]
/// pub struct Port(u16);
///
/// impl FromStr for Port {
///     type Err = std::num::ParseIntError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         s.trim().parse().map(Port)
///     }
/// }
///
/// propset::string_factory!(Port);
///
/// assert_eq!(propset::coercion::convert::<Port>("8080").unwrap(), Some(Port(8080)));
/// ```
#[macro_export]
macro_rules! string_factory {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::coercion::FromConfigStr for $ty {
            const CATEGORY: $crate::coercion::TypeCategory =
                $crate::coercion::TypeCategory::StringFactory;

            fn from_config_str(
                raw: &str,
            ) -> ::std::result::Result<::std::option::Option<Self>, $crate::coercion::ConversionError> {
                <$ty as ::std::str::FromStr>::from_str(raw)
                    .map(::std::option::Option::Some)
                    .map_err(|err| $crate::coercion::ConversionError::factory::<$ty>(raw, err.to_string()))
            }
        }
    )+};
}

string_factory!(PathBuf, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed_before_parsing() {
        assert_eq!(convert::<i64>("  -12 ").unwrap(), Some(-12));
        assert_eq!(convert::<f64>("2.5\n").unwrap(), Some(2.5));
        assert_eq!(convert::<u8>("255").unwrap(), Some(255));
    }

    #[test]
    fn malformed_number_is_an_error() {
        let err = convert::<i32>("thirty-two").unwrap_err();
        assert_eq!(err.kind(), ConversionErrorKind::Malformed);
        assert_eq!(err.value(), Some("thirty-two"));
        assert_eq!(err.type_name(), "i32");

        let err = convert::<u8>("256").unwrap_err();
        assert_eq!(err.kind(), ConversionErrorKind::Malformed);
    }

    #[test]
    fn bool_is_case_insensitive_and_otherwise_empty() {
        assert_eq!(convert::<bool>(" True ").unwrap(), Some(true));
        assert_eq!(convert::<bool>("FALSE").unwrap(), Some(false));
        assert_eq!(convert::<bool>("1").unwrap(), None);
    }

    #[test]
    fn strings_keep_surrounding_whitespace() {
        assert_eq!(convert::<String>("  padded ").unwrap().as_deref(), Some("  padded "));
    }

    #[test]
    fn char_requires_a_single_character() {
        assert_eq!(convert::<char>("x").unwrap(), Some('x'));
        assert!(convert::<char>("xy").is_err());
        assert!(convert::<char>("").is_err());
    }

    #[test]
    fn std_factories_report_their_own_errors() {
        assert_eq!(
            convert::<SocketAddr>("127.0.0.1:8080").unwrap(),
            Some(SocketAddr::from(([127, 0, 0, 1], 8080)))
        );
        let err = convert::<Ipv4Addr>("localhost").unwrap_err();
        assert_eq!(err.kind(), ConversionErrorKind::Factory);
        assert_eq!(<Ipv4Addr as FromConfigStr>::CATEGORY, TypeCategory::StringFactory);
    }

    #[test]
    fn context_is_appended_to_the_message() {
        let err: Result<(), _> = Err(ConversionError::no_value::<bool>("maybe"));
        let err = err.context("enabled").unwrap_err();
        assert!(err.to_string().ends_with("\"maybe\" (enabled)"));
    }

    #[test]
    fn only_complex_is_not_basic() {
        assert!(TypeCategory::Scalar.is_basic());
        assert!(TypeCategory::Enumeration.is_basic());
        assert!(TypeCategory::StringFactory.is_basic());
        assert!(!TypeCategory::Complex.is_basic());
    }
}
