use crate::aggregation::AggregationType;
use crate::capability::{Capabilities, MethodDescriptor};
use crate::parameter::{Component, ParamType, Parameter};
use std::rc::Rc;

/// Concrete fallback type attached to a setter or adder whose parameter is abstract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultClass {
    param: ParamType,
}

impl DefaultClass {
    #[must_use]
    pub fn of<T: Parameter>() -> Self {
        Self { param: T::param_type() }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.param.name()
    }

    #[must_use]
    pub const fn param_type(&self) -> ParamType {
        self.param
    }

    /// Builds an instance of the default type, when it is instantiable.
    #[must_use]
    pub fn instantiate(&self) -> Option<Component> {
        self.param.instantiate()
    }
}

/// The setter (singular) or adder (collection) behind a complex property.
///
/// # Panics
/// Panics when `aggregation` is not one of the complex kinds; asking for it is a bug in
/// the caller.
pub(crate) fn relevant_method<'c>(
    capabilities: &'c Capabilities,
    name: &str,
    aggregation: AggregationType,
) -> Option<&'c Rc<MethodDescriptor>> {
    match aggregation {
        AggregationType::AsComplexPropertyCollection => capabilities.find_adder(name),
        AggregationType::AsComplexProperty => capabilities.find_setter(name),
        other => panic!("{other} not allowed here"),
    }
}

/// The default-class hint of complex property `name`.
///
/// # Panics
/// Panics for non-complex aggregation types.
#[must_use]
pub fn resolve(
    capabilities: &Capabilities,
    name: &str,
    aggregation: AggregationType,
) -> Option<DefaultClass> {
    relevant_method(capabilities, name, aggregation)?.default_class()
}

/// The declared parameter type of complex property `name`, when it can be created directly.
///
/// # Panics
/// Panics for non-complex aggregation types.
#[must_use]
pub fn instantiable_type(
    capabilities: &Capabilities,
    name: &str,
    aggregation: AggregationType,
) -> Option<ParamType> {
    relevant_method(capabilities, name, aggregation)?
        .single_parameter()
        .filter(ParamType::is_instantiable)
}
