use config::{Config, Environment, File};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment prefix for option overrides (`PROPSET__TRIM_TEXT=true`).
pub const ENV_PREFIX: &str = "PROPSET";

/// What an adder receives from [`add_basic_property`](crate::PropertySetter::add_basic_property).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdderArgument {
    /// The value converted to the adder's parameter type.
    #[default]
    Converted,
    /// The original string, after checking that it converts. Only `String` adders accept it.
    Raw,
}

/// Behavior switches of the property binder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BinderOptions {
    pub adder_argument: AdderArgument,
    /// Trim surrounding whitespace from values bound to `String` parameters.
    pub trim_text: bool,
}

/// Errors raised while loading [`BinderOptions`].
#[propset_derive::propset_error]
pub enum OptionsError {
    #[error("Options error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads [`BinderOptions`] from a file, overlaid with `PROPSET__*` environment variables.
///
/// The format follows the file extension. Without a path, `propset` in the working directory
/// is used (any supported extension).
///
/// # Errors
/// Returns [`OptionsError::Config`] when the file is missing or malformed, or a value does
/// not match its option.
///
/// # Example
/// ```rust,no_run
/// use propset::options::load_options;
///
/// let options = load_options(Some("config/propset.toml")).unwrap_or_default();
/// assert!(!options.trim_text);
/// ```
pub fn load_options(path: Option<impl AsRef<Path>>) -> Result<BinderOptions, OptionsError> {
    let effective_path = path.map_or_else(|| PathBuf::from("propset"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!("Loading binder options from {}", effective_path.display());

    let options = builder
        .build()
        .context("Failed to build options")?
        .try_deserialize::<BinderOptions>()
        .context("Failed to deserialize options")?;

    Ok(options)
}
