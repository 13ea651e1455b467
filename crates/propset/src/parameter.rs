use crate::capability::Introspect;
use crate::coercion::{ConversionError, FromConfigStr, TypeCategory};
use std::any::{Any, TypeId, type_name};
use std::borrow::Cow;
use std::fmt;

/// Builds a parameter value from a configuration string.
pub type CoerceFn = fn(&str) -> Result<Box<dyn Any>, ConversionError>;
/// Whether a value of the given type may be passed for the parameter.
pub type AcceptFn = fn(TypeId) -> bool;
/// Turns an accepted value into the parameter's own type; hands the value back otherwise.
pub type AdaptFn = fn(Box<dyn Any>) -> Result<Box<dyn Any>, Box<dyn Any>>;
/// Creates a default instance of a directly instantiable parameter type.
pub type InstantiateFn = fn() -> Component;

/// Type-erased descriptor of a mutator's declared parameter type.
#[derive(Clone, Copy)]
pub struct ParamType {
    name: &'static str,
    type_id: TypeId,
    category: TypeCategory,
    coerce: CoerceFn,
    accepts: AcceptFn,
    adapt: AdaptFn,
    instantiate: Option<InstantiateFn>,
}

impl ParamType {
    /// A type convertible from configuration strings.
    #[must_use]
    pub fn basic<T: FromConfigStr>() -> Self {
        Self::with_category::<T>(T::CATEGORY, coerce_from_str::<T>)
    }

    /// A nested object type that is assigned, never parsed.
    #[must_use]
    pub fn complex<T: Any>() -> Self {
        Self::with_category::<T>(TypeCategory::Complex, not_convertible::<T>)
    }

    /// A nested object type that can also be created through `Default`.
    #[must_use]
    pub fn instantiable<T: Introspect + Default>() -> Self {
        Self { instantiate: Some(instantiate_default::<T>), ..Self::complex::<T>() }
    }

    /// Parameter of a method that is recorded but never bound as a property.
    #[must_use]
    pub fn opaque<T: Any>() -> Self {
        Self::complex::<T>()
    }

    /// An abstract parameter type (a boxed trait object) assignable from several types.
    ///
    /// Prefer [`abstract_parameter!`](crate::abstract_parameter), which writes both functions.
    #[must_use]
    pub fn abstract_type<T: Any>(accepts: AcceptFn, adapt: AdaptFn) -> Self {
        Self { accepts, adapt, ..Self::complex::<T>() }
    }

    fn with_category<T: Any>(category: TypeCategory, coerce: CoerceFn) -> Self {
        Self {
            name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            category,
            coerce,
            accepts: same_type::<T>,
            adapt: Ok,
            instantiate: None,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub const fn category(&self) -> TypeCategory {
        self.category
    }

    #[must_use]
    pub const fn is_instantiable(&self) -> bool {
        self.instantiate.is_some()
    }

    /// Converts `raw` into a boxed value of this type.
    ///
    /// # Errors
    /// Returns a [`ConversionError`] when the input is malformed, names no value, or the
    /// type is complex.
    pub fn coerce(&self, raw: &str) -> Result<Box<dyn Any>, ConversionError> {
        (self.coerce)(raw)
    }

    /// Whether a value of type `type_id` may be passed for this parameter.
    #[must_use]
    pub fn accepts(&self, type_id: TypeId) -> bool {
        (self.accepts)(type_id)
    }

    /// Converts an accepted value into this parameter's type.
    ///
    /// # Errors
    /// Returns the value unchanged when it is not assignable.
    pub fn adapt(&self, value: Box<dyn Any>) -> Result<Box<dyn Any>, Box<dyn Any>> {
        (self.adapt)(value)
    }

    /// Creates a default instance, when the type is directly instantiable.
    #[must_use]
    pub fn instantiate(&self) -> Option<Component> {
        self.instantiate.map(|create| create())
    }
}

impl fmt::Debug for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamType")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("instantiable", &self.is_instantiable())
            .finish_non_exhaustive()
    }
}

impl PartialEq for ParamType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ParamType {}

fn coerce_from_str<T: FromConfigStr>(raw: &str) -> Result<Box<dyn Any>, ConversionError> {
    match T::from_config_str(raw)? {
        Some(value) => Ok(Box::new(value)),
        None => Err(ConversionError::no_value::<T>(raw)),
    }
}

fn not_convertible<T: Any>(_: &str) -> Result<Box<dyn Any>, ConversionError> {
    Err(ConversionError::not_convertible::<T>())
}

fn same_type<T: Any>(type_id: TypeId) -> bool {
    type_id == TypeId::of::<T>()
}

fn instantiate_default<T: Introspect + Default>() -> Component {
    Component::configurable(T::default())
}

fn as_introspect<T: Introspect>(value: &mut dyn Any) -> Option<&mut dyn Introspect> {
    value.downcast_mut::<T>().map(|target| target as &mut dyn Introspect)
}

/// A nested object handed to a complex setter or adder.
///
/// The display name defaults to the Rust type name; [`Component::named`] overrides it with
/// the name a configuration document used.
pub struct Component {
    value: Box<dyn Any>,
    type_id: TypeId,
    name: Cow<'static, str>,
    as_introspect: Option<fn(&mut dyn Any) -> Option<&mut dyn Introspect>>,
}

impl Component {
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_id: TypeId::of::<T>(),
            name: Cow::Borrowed(type_name::<T>()),
            as_introspect: None,
        }
    }

    /// Wraps a configurable value so it can be configured before it is handed over.
    pub fn configurable<T: Introspect>(value: T) -> Self {
        Self { as_introspect: Some(as_introspect::<T>), ..Self::new(value) }
    }

    /// Wraps `value` under a display name of the caller's choosing.
    pub fn named<T: Any>(value: T, name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into(), ..Self::new(value) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// The wrapped value as a configuration target, for components built with
    /// [`Component::configurable`].
    pub fn as_introspect_mut(&mut self) -> Option<&mut dyn Introspect> {
        let as_introspect = self.as_introspect?;
        as_introspect(self.value.as_mut())
    }

    /// Unwraps the value.
    ///
    /// # Errors
    /// Returns the component unchanged when it does not hold a `T`.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        if !self.is::<T>() {
            return Err(self);
        }
        let Self { value, type_id, name, as_introspect } = self;
        value.downcast::<T>().map(|value| *value).map_err(|value| Self {
            value,
            type_id,
            name,
            as_introspect,
        })
    }

    #[must_use]
    pub fn into_any(self) -> Box<dyn Any> {
        self.value
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("configurable", &self.as_introspect.is_some())
            .finish_non_exhaustive()
    }
}

/// Types that may appear as the single argument of a setter or adder.
///
/// Implemented for every [`FromConfigStr`] type, generated by `#[configurable]` for
/// configurable types, and by [`abstract_parameter!`](crate::abstract_parameter) for boxed
/// trait objects.
pub trait Parameter: 'static {
    fn param_type() -> ParamType;
}

impl<T: FromConfigStr> Parameter for T {
    fn param_type() -> ParamType {
        ParamType::basic::<T>()
    }
}

/// Declares `Box<dyn Trait>` as a complex parameter assignable from the listed types.
///
/// A component holding either a ready `Box<dyn Trait>` or one of the implementors is
/// accepted; implementors are boxed on the way in.
///
/// ```rust
/// use propset::{Component, Parameter};
///
/// pub trait Layout {
///     fn render(&self) -> String;
/// }
///
/// #[derive(Default)]
/// pub struct PatternLayout;
///
/// impl Layout for PatternLayout {
///     fn render(&self) -> String {
///         "%msg".into()
///     }
/// }
///
/// propset::abstract_parameter!(dyn Layout => [PatternLayout]);
///
/// let param = <Box<dyn Layout>>::param_type();
/// assert!(param.accepts(Component::new(PatternLayout).type_id()));
/// assert!(!param.is_instantiable());
/// ```
#[macro_export]
macro_rules! abstract_parameter {
    (dyn $tr:path => [$($imp:ty),* $(,)?]) => {
        impl $crate::Parameter for ::std::boxed::Box<dyn $tr> {
            fn param_type() -> $crate::ParamType {
                fn accepts(type_id: ::std::any::TypeId) -> bool {
                    type_id == ::std::any::TypeId::of::<::std::boxed::Box<dyn $tr>>()
                        $(|| type_id == ::std::any::TypeId::of::<$imp>())*
                }

                fn adapt(
                    value: ::std::boxed::Box<dyn ::std::any::Any>,
                ) -> ::std::result::Result<
                    ::std::boxed::Box<dyn ::std::any::Any>,
                    ::std::boxed::Box<dyn ::std::any::Any>,
                > {
                    let value = match value.downcast::<::std::boxed::Box<dyn $tr>>() {
                        ::std::result::Result::Ok(object) => {
                            return ::std::result::Result::Ok(object as ::std::boxed::Box<dyn ::std::any::Any>);
                        },
                        ::std::result::Result::Err(value) => value,
                    };
                    $(
                    let value = match value.downcast::<$imp>() {
                        ::std::result::Result::Ok(concrete) => {
                            let object: ::std::boxed::Box<dyn $tr> = concrete;
                            return ::std::result::Result::Ok(
                                ::std::boxed::Box::new(object) as ::std::boxed::Box<dyn ::std::any::Any>
                            );
                        },
                        ::std::result::Result::Err(value) => value,
                    };
                    )*
                    ::std::result::Result::Err(value)
                }

                $crate::ParamType::abstract_type::<::std::boxed::Box<dyn $tr>>(accepts, adapt)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Shape {
        fn area(&self) -> u32;
    }

    struct Square(u32);

    impl Shape for Square {
        fn area(&self) -> u32 {
            self.0 * self.0
        }
    }

    crate::abstract_parameter!(dyn Shape => [Square]);

    #[test]
    fn basic_parameters_coerce_strings() {
        let param = <u16 as Parameter>::param_type();
        assert_eq!(param.category(), TypeCategory::Scalar);
        let value = param.coerce("8080").unwrap();
        assert_eq!(value.downcast_ref::<u16>(), Some(&8080));
        assert!(param.coerce("port").is_err());
    }

    #[test]
    fn empty_conversion_becomes_no_value_error() {
        let err = <bool as Parameter>::param_type().coerce("maybe").unwrap_err();
        assert_eq!(err.kind(), crate::coercion::ConversionErrorKind::NoValue);
    }

    #[test]
    fn complex_parameters_are_not_convertible() {
        let param = ParamType::complex::<Vec<u8>>();
        assert!(!param.category().is_basic());
        let err = param.coerce("[1, 2]").unwrap_err();
        assert_eq!(err.kind(), crate::coercion::ConversionErrorKind::NotConvertible);
    }

    #[test]
    fn abstract_parameter_boxes_implementors() {
        let param = <Box<dyn Shape>>::param_type();
        assert!(param.accepts(TypeId::of::<Square>()));
        assert!(!param.accepts(TypeId::of::<u32>()));

        let adapted = param.adapt(Component::new(Square(3)).into_any()).unwrap();
        let shape = adapted.downcast::<Box<dyn Shape>>().unwrap();
        assert_eq!(shape.area(), 9);

        let rejected = param.adapt(Box::new(7_u32)).unwrap_err();
        assert_eq!(rejected.downcast_ref::<u32>(), Some(&7));
    }

    #[test]
    fn component_downcast_keeps_value_on_mismatch() {
        let component = Component::named(String::from("x"), "Text");
        assert_eq!(component.name(), "Text");
        let component = component.downcast::<u32>().unwrap_err();
        assert_eq!(component.downcast::<String>().unwrap(), "x");
    }
}
