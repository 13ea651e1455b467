use crate::capability::{Capabilities, MethodDescriptor};
use std::fmt;

/// How a named property of a target receives its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationType {
    /// No usable setter or adder.
    NotFound,
    /// A setter taking a value built from a string.
    AsBasicProperty,
    /// An adder taking values built from strings.
    AsBasicPropertyCollection,
    /// A setter taking a nested object.
    AsComplexProperty,
    /// An adder taking nested objects.
    AsComplexPropertyCollection,
}

impl AggregationType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::AsBasicProperty => "AS_BASIC_PROPERTY",
            Self::AsBasicPropertyCollection => "AS_BASIC_PROPERTY_COLLECTION",
            Self::AsComplexProperty => "AS_COMPLEX_PROPERTY",
            Self::AsComplexPropertyCollection => "AS_COMPLEX_PROPERTY_COLLECTION",
        }
    }

    #[must_use]
    pub const fn is_complex(self) -> bool {
        matches!(self, Self::AsComplexProperty | Self::AsComplexPropertyCollection)
    }

    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::AsBasicPropertyCollection | Self::AsComplexPropertyCollection)
    }

    const fn into_collection(self) -> Self {
        match self {
            Self::AsBasicProperty => Self::AsBasicPropertyCollection,
            Self::AsComplexProperty => Self::AsComplexPropertyCollection,
            other => other,
        }
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a single-argument method by its parameter category.
fn classify_method(method: &MethodDescriptor) -> AggregationType {
    match method.single_parameter() {
        None => AggregationType::NotFound,
        Some(param) if param.category().is_basic() => AggregationType::AsBasicProperty,
        Some(_) => AggregationType::AsComplexProperty,
    }
}

/// Classifies property `name`. An adder wins over a setter of the same name; an adder of
/// the wrong arity yields [`AggregationType::NotFound`] without consulting the setter.
#[must_use]
pub fn classify(capabilities: &Capabilities, name: &str) -> AggregationType {
    if let Some(adder) = capabilities.find_adder(name) {
        return classify_method(adder).into_collection();
    }
    capabilities.find_setter(name).map_or(AggregationType::NotFound, |setter| classify_method(setter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::ParamType;

    #[derive(Debug, Default)]
    struct Sink {
        tags: Vec<String>,
    }

    fn caps() -> Capabilities {
        Capabilities::builder::<Sink>()
            .adder("add_tag", |s: &mut Sink, tag: String| s.tags.push(tag))
            .setter("set_tag", |s: &mut Sink, tag: String| s.tags = vec![tag])
            .method(MethodDescriptor::new("add_pair", vec![
                ParamType::opaque::<u8>(),
                ParamType::opaque::<u8>(),
            ]))
            .setter("set_pair", |s: &mut Sink, pair: String| s.tags.push(pair))
            .setter("set_limit", |_: &mut Sink, _: u32| {})
            .build()
            .unwrap()
    }

    #[test]
    fn adder_takes_precedence_over_setter() {
        assert_eq!(classify(&caps(), "tag"), AggregationType::AsBasicPropertyCollection);
    }

    #[test]
    fn adder_with_wrong_arity_is_not_found() {
        assert_eq!(classify(&caps(), "pair"), AggregationType::NotFound);
    }

    #[test]
    fn setter_is_used_without_adder() {
        assert_eq!(classify(&caps(), "limit"), AggregationType::AsBasicProperty);
        assert_eq!(classify(&caps(), "Limit"), AggregationType::AsBasicProperty);
        assert_eq!(classify(&caps(), "missing"), AggregationType::NotFound);
    }

    #[test]
    fn complex_adders_are_complex_collections() {
        let caps = Capabilities::builder::<Sink>()
            .method(MethodDescriptor::new("add_child", vec![ParamType::complex::<Vec<u8>>()]))
            .build()
            .unwrap();
        assert_eq!(classify(&caps, "child"), AggregationType::AsComplexPropertyCollection);
    }

    #[test]
    fn display_uses_constant_names() {
        assert_eq!(AggregationType::AsComplexProperty.to_string(), "AS_COMPLEX_PROPERTY");
        assert!(AggregationType::AsComplexPropertyCollection.is_collection());
        assert!(!AggregationType::AsBasicPropertyCollection.is_complex());
    }
}
