//! Property binder that configures typed targets from name/value pairs.
//! A configuration interpreter walks a document, and for every element asks the binder how a
//! name relates to the current target, then hands it a string or a nested object to bind.
//!
//! ## Registering a target
//! `#[configurable]` turns an inherent `impl` block into a capability table:
//! ```rust
//! use propset::prelude::*;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, ConfigEnum)]
//! pub enum Target {
//!     SystemOut,
//!     SystemErr,
//! }
//!
//! #[derive(Debug, Default)]
//! pub struct ConsoleAppender {
//!     target: Option<Target>,
//!     patterns: Vec<String>,
//! }
//!
//! #[configurable]
//! impl ConsoleAppender {
//!     pub fn set_target(&mut self, target: Target) {
//!         self.target = Some(target);
//!     }
//!
//!     pub fn add_pattern(&mut self, pattern: String) {
//!         self.patterns.push(pattern);
//!     }
//! }
//!
//! let mut appender = ConsoleAppender::default();
//! let statuses = StatusManager::new();
//! let mut setter = PropertySetter::new(&mut appender, &statuses);
//!
//! assert_eq!(setter.compute_aggregation_type("target"), AggregationType::AsBasicProperty);
//! assert_eq!(setter.compute_aggregation_type("pattern"), AggregationType::AsBasicPropertyCollection);
//! setter.set_property("target", "SystemErr").unwrap();
//! setter.add_basic_property("pattern", "%msg%n").unwrap();
//! drop(setter);
//!
//! assert_eq!(appender.target, Some(Target::SystemErr));
//! assert!(statuses.is_empty());
//! ```
//!
//! ## Options
//! Binder switches load from a config file overlaid with `PROPSET__*` variables, see
//! [`options::load_options`].

mod aggregation;
mod capability;
pub mod coercion;
mod default_class;
mod error;
mod invocation;
pub mod naming;
pub mod options;
mod parameter;
mod setter;
pub mod status;
mod units;

pub use aggregation::{AggregationType, classify};
pub use capability::{
    Capabilities, CapabilitiesBuilder, Introspect, IntrospectionError, IntrospectionErrorExt,
    IntrospectionErrorKind, Invoker, MethodDescriptor, PropertyDescriptor,
};
pub use default_class::{DefaultClass, instantiable_type, resolve as resolve_default_class};
pub use error::{BindError, BindErrorExt, BindErrorKind};
pub use invocation::{IntoOutcome, InvocationError, InvocationErrorExt, InvocationErrorKind};
pub use parameter::{AcceptFn, AdaptFn, CoerceFn, Component, InstantiateFn, ParamType, Parameter};
pub use propset_derive::{ConfigEnum, configurable, propset_error};
pub use setter::PropertySetter;
pub use units::{ConfigDuration, FileSize, UnitError, UnitErrorKind};

/// Everything a target definition and an interpreter usually need.
pub mod prelude {
    pub use crate::coercion::{ConversionError, FromConfigStr, TypeCategory};
    pub use crate::options::{AdderArgument, BinderOptions, load_options};
    pub use crate::status::{Level, Status, StatusManager, StatusSink, TracingSink};
    pub use crate::{
        AggregationType, BindError, BindErrorKind, Component, ConfigDuration, ConfigEnum,
        DefaultClass, FileSize, Introspect, ParamType, Parameter, PropertySetter, configurable,
    };
}
