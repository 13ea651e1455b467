#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the property binder.
//! This crate removes the boilerplate of describing a configurable type to the
//! engine: capability tables, string coercion for enums and error wiring.
//!
//! ## Usage
//! The macros are re-exported by `propset`; depend on that crate instead of this one:
//! ```toml
//! [dependencies]
//! propset = { path = "../crates/propset" }
//! ```
//!
//! Generated code refers to `::propset`, so the macros only work inside crates that
//! can name it.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemImpl, parse_macro_input};

/// Attribute macro that turns an inherent `impl` block into a capability table.
///
/// Every `pub` method following the bean naming convention is registered with the
/// engine, and the type itself becomes usable as a complex parameter.
///
/// # Discovered methods
///
/// * `set_<name>(&mut self, ..)` - registered as `set<Name>`. One-argument setters are
///   write methods of property `<name>`; other arities are recorded but not writable.
/// * `add_<name>(&mut self, ..)` - registered as `add<Name>`, the collection adder.
/// * `get_<name>(&self)` / `is_<name>(&self)` - mark `<name>` as readable.
///
/// Methods with reference-typed parameters, generic parameters, or `async` are skipped.
/// Setters and adders may return `()` or any `Result<_, E>` whose error converts into
/// `Box<dyn Error + Send + Sync>`; an `Err` becomes an invocation failure.
///
/// # Arguments
///
/// * `instantiable` - the type implements `Default` and may be built by an interpreter
///   when it is the declared parameter type of another target.
///
/// # Helper attributes
///
/// * `#[default_class(Type)]` on a setter or adder attaches the default-class hint
///   used when the declared parameter type is abstract.
///
/// # Example
///
/// ```rust,ignore
/// use propset::configurable;
///
/// #[derive(Debug, Default)]
/// pub struct FileAppender {
///     file: String,
///     layout: Option<Box<dyn Layout>>,
/// }
///
/// #[configurable(instantiable)]
/// impl FileAppender {
///     pub fn set_file(&mut self, file: String) {
///         self.file = file;
///     }
///
///     #[default_class(PatternLayout)]
///     pub fn set_layout(&mut self, layout: Box<dyn Layout>) {
///         self.layout = Some(layout);
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn configurable(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemImpl);
    macros::configurable::expand_configurable(args.into(), input).into()
}

/// Derive macro implementing string coercion for fieldless enums.
///
/// A configuration value selects the variant whose identifier matches it exactly;
/// anything else is reported as an unknown constant.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, propset::ConfigEnum)]
/// pub enum Target {
///     SystemOut,
///     SystemErr,
/// }
/// ```
#[proc_macro_derive(ConfigEnum)]
pub fn config_enum(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::config_enum::expand_derive(input).into()
}

/// Attribute macro for defining the engine's error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a source field,
///   enabling the `?` operator for upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant is present.
/// * **Kind Tags**: Emits a fieldless `<ErrorName>Kind` enum plus a `kind()` accessor so
///   callers can branch on the failure without matching fields.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. Variants with a source must also carry `context: Option<Cow<'static, str>>`.
/// 3. Only one such enum per module, since the `format_context` helper is module scoped.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[propset_derive::propset_error]
/// pub enum LoadError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// assert_eq!(LoadError::from("boom").kind(), LoadErrorKind::Internal);
/// ```
#[proc_macro_attribute]
pub fn propset_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
