use crate::aggregation::{self, AggregationType};
use crate::capability::{Capabilities, Introspect, MethodDescriptor, PropertyDescriptor};
use crate::coercion::ConversionError;
use crate::default_class::{self, DefaultClass};
use crate::error::{BindError, BindErrorExt};
use crate::invocation::InvocationError;
use crate::naming;
use crate::options::{AdderArgument, BinderOptions};
use crate::parameter::{Component, ParamType};
use crate::status::{Level, Status, StatusSink};
use std::any::{Any, TypeId};
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Binds named configuration values to the mutators of one target.
///
/// Capabilities are introspected on first use and cached for the lifetime of the setter.
/// Every lenient entry point reports a failure to the sink exactly once and returns it, so
/// the caller decides whether to go on with the next property.
///
/// # Example
/// ```rust
/// use propset::prelude::*;
///
/// #[derive(Debug, Default)]
/// pub struct Person {
///     name: String,
///     age: i32,
/// }
///
/// #[configurable]
/// impl Person {
///     pub fn set_name(&mut self, name: String) {
///         self.name = name;
///     }
///
///     pub fn set_age(&mut self, age: i32) {
///         self.age = age;
///     }
/// }
///
/// let mut person = Person::default();
/// let statuses = StatusManager::new();
/// let mut setter = PropertySetter::new(&mut person, &statuses);
///
/// setter.set_property("name", "Joe").unwrap();
/// setter.set_property("age", "32").unwrap();
/// assert!(setter.set_property("age", "thirty-two").is_err());
/// drop(setter);
///
/// assert_eq!((person.name.as_str(), person.age), ("Joe", 32));
/// assert_eq!(statuses.count(Level::Warn), 1);
/// ```
pub struct PropertySetter<'a> {
    target: &'a mut dyn Introspect,
    sink: &'a dyn StatusSink,
    options: BinderOptions,
    capabilities: OnceCell<Capabilities>,
}

impl<'a> PropertySetter<'a> {
    pub fn new(target: &'a mut dyn Introspect, sink: &'a dyn StatusSink) -> Self {
        Self { target, sink, options: BinderOptions::default(), capabilities: OnceCell::new() }
    }

    #[must_use]
    pub fn with_options(mut self, options: BinderOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &BinderOptions {
        &self.options
    }

    #[must_use]
    pub fn target(&self) -> &dyn Introspect {
        &*self.target
    }

    pub fn target_mut(&mut self) -> &mut dyn Introspect {
        &mut *self.target
    }

    /// Runtime type name of the target.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.target.type_name()
    }

    /// The target's capabilities, introspected on first call.
    ///
    /// A failed introspection is reported once; the target then has no capabilities.
    pub fn capabilities(&self) -> &Capabilities {
        self.capabilities.get_or_init(|| self.introspect())
    }

    fn introspect(&self) -> Capabilities {
        let type_name = self.type_name();
        match self.target.introspect() {
            Ok(capabilities) => {
                debug!(target_type = type_name, "Capabilities introspected");
                capabilities
            },
            Err(err) => {
                let message = format!("Failed to introspect {type_name}: {err}");
                self.sink.add_status(Status::error(type_name, message).with_cause(err));
                Capabilities::empty()
            },
        }
    }

    /// Descriptor of property `name` (any case convention).
    pub fn property_descriptor(&self, name: &str) -> Option<PropertyDescriptor> {
        self.capabilities().find_property(name).cloned()
    }

    /// Method registered under bean or Rust name `name`.
    pub fn method(&self, name: &str) -> Option<Rc<MethodDescriptor>> {
        self.capabilities().method(&naming::method_name(name)).cloned()
    }

    /// The `add<Name>` method of collection property `name`.
    pub fn adder(&self, name: &str) -> Option<Rc<MethodDescriptor>> {
        self.capabilities().find_adder(name).cloned()
    }

    /// Sets property `name` from a string. An absent value is a no-op.
    ///
    /// A missing property and every failure of the write itself are reported as warnings.
    ///
    /// # Errors
    /// Returns the [`BindError`] that was reported.
    pub fn set_property<'v>(
        &mut self,
        name: &str,
        value: impl Into<Option<&'v str>>,
    ) -> Result<(), BindError> {
        let Some(value) = value.into() else { return Ok(()) };
        let property = naming::property_key(name);

        let Some(descriptor) = self.property_descriptor(&property) else {
            let type_name = self.type_name();
            return self.fail(
                Level::Warn,
                format!("No such property [{property}] in {type_name}."),
                BindError::NotFound { property, type_name },
            );
        };

        self.set_property_strict(&descriptor, &property, value).or_else(|err| {
            self.fail(
                Level::Warn,
                format!("Failed to set property [{property}] to value \"{value}\"."),
                err,
            )
        })
    }

    /// Sets a property through a known descriptor without reporting anything.
    ///
    /// # Errors
    /// * [`BindError::MissingWriteMethod`] - the property has no setter.
    /// * [`BindError::ArityMismatch`] - the setter does not take exactly one argument.
    /// * [`BindError::Conversion`] - `value` does not convert to the parameter type.
    /// * [`BindError::Invocation`] - the setter failed.
    pub fn set_property_strict(
        &mut self,
        descriptor: &PropertyDescriptor,
        name: &str,
        value: &str,
    ) -> Result<(), BindError> {
        let Some(setter) = descriptor.write_method() else {
            return Err(BindError::MissingWriteMethod {
                property: name.to_owned(),
                type_name: self.type_name(),
            });
        };
        let param = single_parameter(name, setter)?;
        let arg = self.coerce(&param, value).context(format!("property [{name}]"))?;
        self.invoke(setter, arg).context(setter.name().to_owned())?;

        debug!(property = name, value, target_type = self.type_name(), "Property set");
        Ok(())
    }

    /// Hands a nested object to the setter of property `name`.
    ///
    /// # Errors
    /// Returns the reported [`BindError`]: a missing property or setter (warnings), or a
    /// wrong arity, an unassignable object or a failed invocation (errors).
    pub fn set_complex_property(&mut self, name: &str, component: Component) -> Result<(), BindError> {
        let property = naming::property_key(name);
        let type_name = self.type_name();

        let Some(descriptor) = self.property_descriptor(&property) else {
            return self.fail(
                Level::Warn,
                format!("Could not find property descriptor for [{name}] in {type_name}."),
                BindError::NotFound { property, type_name },
            );
        };
        let Some(setter) = descriptor.write_method() else {
            return self.fail(
                Level::Warn,
                format!("No setter method for property [{name}] in {type_name}."),
                BindError::MissingWriteMethod { property, type_name },
            );
        };

        self.bind_component(&property, setter, component)
    }

    /// Hands a nested object to the adder of collection property `name`.
    ///
    /// # Errors
    /// Returns the reported [`BindError`]; every failure on this path is an error.
    pub fn add_complex_property(&mut self, name: &str, component: Component) -> Result<(), BindError> {
        let Some(adder) = self.adder(name) else {
            let type_name = self.type_name();
            return self.fail(
                Level::Error,
                format!("Could not find method [{}] in class [{type_name}].", naming::adder_name(name)),
                BindError::NotFound { property: naming::property_key(name), type_name },
            );
        };

        self.bind_component(name, &adder, component)
    }

    /// Appends a value built from a string to collection property `name`. An absent value
    /// is a no-op.
    ///
    /// The adder receives the converted value, or the original string when
    /// [`AdderArgument::Raw`] is configured.
    ///
    /// # Errors
    /// Returns the reported [`BindError`]; every failure on this path is an error.
    pub fn add_basic_property<'v>(
        &mut self,
        name: &str,
        value: impl Into<Option<&'v str>>,
    ) -> Result<(), BindError> {
        let Some(value) = value.into() else { return Ok(()) };
        let type_name = self.type_name();
        let property = naming::capitalize_first(&naming::snake_to_camel(name)).into_owned();

        let Some(adder) = self.adder(name) else {
            return self.fail(
                Level::Error,
                format!("No adder for property [{property}]."),
                BindError::NotFound { property, type_name },
            );
        };
        let param = match single_parameter(&property, &adder) {
            Ok(param) => param,
            Err(err) => {
                return self.fail(
                    Level::Error,
                    format!("Wrong number of parameters in adder method for property [{property}] in {type_name}."),
                    err,
                );
            },
        };
        let converted = match self.coerce(&param, value) {
            Ok(converted) => converted,
            Err(source) => {
                return self.fail(
                    Level::Error,
                    format!("Conversion to type [{}] failed.", param.name()),
                    BindError::Conversion { source, context: Some(adder.name().to_owned().into()) },
                );
            },
        };

        let arg = match self.options.adder_argument {
            AdderArgument::Converted => converted,
            AdderArgument::Raw => {
                if !param.accepts(TypeId::of::<String>()) {
                    let err = BindError::Assignability {
                        expected: param.name(),
                        expected_id: param.type_id(),
                        found: std::any::type_name::<String>().to_owned(),
                        found_id: TypeId::of::<String>(),
                    };
                    return self.fail(Level::Error, err.to_string(), err);
                }
                Box::new(value.to_owned())
            },
        };

        let result = self.invoke(&adder, arg);
        self.finish(&property, &adder, param.name(), result)
    }

    /// Classifies property `name`; see [`aggregation::classify`].
    pub fn compute_aggregation_type(&self, name: &str) -> AggregationType {
        aggregation::classify(self.capabilities(), name)
    }

    /// The default-class hint of complex property `name`.
    ///
    /// # Panics
    /// Panics when `aggregation` is not [`AggregationType::AsComplexProperty`] or
    /// [`AggregationType::AsComplexPropertyCollection`].
    pub fn default_class(&self, name: &str, aggregation: AggregationType) -> Option<DefaultClass> {
        default_class::resolve(self.capabilities(), name, aggregation)
    }

    /// Type name of the default-class hint of complex property `name`.
    ///
    /// # Panics
    /// Panics for non-complex aggregation types, like [`default_class`](Self::default_class).
    pub fn default_class_name(&self, name: &str, aggregation: AggregationType) -> Option<&'static str> {
        self.default_class(name, aggregation).map(|hint| hint.name())
    }

    /// The declared parameter type of complex property `name`, when it is instantiable.
    ///
    /// # Panics
    /// Panics for non-complex aggregation types.
    pub fn instantiable_type(&self, name: &str, aggregation: AggregationType) -> Option<ParamType> {
        default_class::instantiable_type(self.capabilities(), name, aggregation)
    }

    fn bind_component(
        &mut self,
        property: &str,
        method: &MethodDescriptor,
        component: Component,
    ) -> Result<(), BindError> {
        let type_name = self.type_name();
        let param = match single_parameter(property, method) {
            Ok(param) => param,
            Err(err) => {
                return self.fail(
                    Level::Error,
                    format!(
                        "Wrong number of parameters in method [{}] for property [{property}] in {type_name}.",
                        method.name()
                    ),
                    err,
                );
            },
        };

        if !param.accepts(component.type_id()) {
            let err = BindError::Assignability {
                expected: param.name(),
                expected_id: param.type_id(),
                found: component.name().to_owned(),
                found_id: component.type_id(),
            };
            let mut message = err.to_string();
            if err.is_identity_mismatch() {
                message.push_str(&format!(
                    " The type \"{}\" ({:?}) and the supplied object ({:?}) share a name but are distinct types.",
                    param.name(),
                    param.type_id(),
                    component.type_id(),
                ));
            }
            return self.fail(Level::Error, message, err);
        }

        let found = component.name().to_owned();
        let Ok(arg) = param.adapt(component.into_any()) else {
            return self.fail(
                Level::Error,
                format!("Could not adapt \"{found}\" to \"{}\".", param.name()),
                BindError::from(format!("accepted value of type {found} was not adapted")),
            );
        };

        let result = self.invoke(method, arg);
        self.finish(property, method, &found, result)
    }

    fn finish(
        &self,
        property: &str,
        method: &MethodDescriptor,
        found: &str,
        result: Result<(), InvocationError>,
    ) -> Result<(), BindError> {
        let type_name = self.type_name();
        match result {
            Ok(()) => {
                debug!(property, method = method.name(), target_type = type_name, "Value bound");
                Ok(())
            },
            Err(source) => self.fail(
                Level::Error,
                format!(
                    "Could not invoke method {} in class {type_name} with parameter of type {found}.",
                    method.name()
                ),
                BindError::Invocation { source, context: Some(method.name().to_owned().into()) },
            ),
        }
    }

    fn coerce(&self, param: &ParamType, raw: &str) -> Result<Box<dyn Any>, ConversionError> {
        if self.options.trim_text && param.type_id() == TypeId::of::<String>() {
            param.coerce(raw.trim())
        } else {
            param.coerce(raw)
        }
    }

    fn invoke(&mut self, method: &MethodDescriptor, arg: Box<dyn Any>) -> Result<(), InvocationError> {
        let target: &mut dyn Any = &mut *self.target;
        method.invoke(target, arg)
    }

    fn fail(&self, level: Level, message: String, err: BindError) -> Result<(), BindError> {
        let status = Status::new(level, self.type_name(), message).with_cause(err.clone());
        self.sink.add_status(status);
        Err(err)
    }
}

fn single_parameter(property: &str, method: &MethodDescriptor) -> Result<ParamType, BindError> {
    method.single_parameter().ok_or_else(|| BindError::ArityMismatch {
        property: property.to_owned(),
        method: method.name().to_owned(),
        arity: method.arity(),
    })
}

impl fmt::Debug for PropertySetter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySetter")
            .field("target", &self.type_name())
            .field("options", &self.options)
            .field("introspected", &self.capabilities.get().is_some())
            .finish_non_exhaustive()
    }
}
