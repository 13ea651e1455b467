use crate::default_class::DefaultClass;
use crate::invocation::{IntoOutcome, InvocationError};
use crate::naming::{self, ADDER_PREFIX, SETTER_PREFIX};
use crate::parameter::{ParamType, Parameter};
use fxhash::FxHashMap;
use std::any::{Any, type_name};
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// Erased method body: downcasts the target and the argument, then calls the mutator.
pub type Invoker = Rc<dyn Fn(&mut dyn Any, Box<dyn Any>) -> Result<(), InvocationError>>;

/// Failure to build the capability table of a type.
#[propset_derive::propset_error]
pub enum IntrospectionError {
    #[error("Duplicate method [{method}] in [{type_name}]{}", format_context(.context))]
    DuplicateMethod { method: String, type_name: &'static str, context: Option<Cow<'static, str>> },

    #[error("Unknown method [{method}] in [{type_name}]{}", format_context(.context))]
    UnknownMethod { method: String, type_name: &'static str, context: Option<Cow<'static, str>> },

    #[error("Introspection failed{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// A type whose mutators can be discovered by name.
///
/// Usually generated by `#[configurable]`; hand-written implementations build the table
/// with [`Capabilities::builder`].
pub trait Introspect: Any {
    /// Describes the methods and properties of this type.
    ///
    /// # Errors
    /// Returns an [`IntrospectionError`] when the registration is inconsistent.
    fn introspect(&self) -> Result<Capabilities, IntrospectionError>;

    /// Runtime type name used in diagnostics.
    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// A registered method: bean name, declared parameters and an optional body.
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    params: Vec<ParamType>,
    invoker: Option<Invoker>,
    default_class: Option<DefaultClass>,
}

impl MethodDescriptor {
    /// Records a method that can be classified but not invoked.
    #[must_use]
    pub fn new(name: &str, params: Vec<ParamType>) -> Self {
        Self { name: naming::method_name(name), params, invoker: None, default_class: None }
    }

    /// Records a one-argument mutator of `T`.
    pub fn mutator<T, P, R, F>(name: &str, mutator: F) -> Self
    where
        T: Any,
        P: Parameter,
        R: IntoOutcome,
        F: Fn(&mut T, P) -> R + 'static,
    {
        let invoker: Invoker = Rc::new(move |target: &mut dyn Any, arg: Box<dyn Any>| {
            let target = target.downcast_mut::<T>().ok_or(InvocationError::TargetMismatch {
                expected: type_name::<T>(),
                context: None,
            })?;
            let arg = arg.downcast::<P>().map_err(|_| InvocationError::ArgumentMismatch {
                expected: type_name::<P>(),
                context: None,
            })?;
            mutator(target, *arg).into_outcome()
        });
        Self { invoker: Some(invoker), ..Self::new(name, vec![P::param_type()]) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// The parameter type, when the method takes exactly one argument.
    #[must_use]
    pub fn single_parameter(&self) -> Option<ParamType> {
        match self.params.as_slice() {
            [param] => Some(*param),
            _ => None,
        }
    }

    #[must_use]
    pub const fn default_class(&self) -> Option<DefaultClass> {
        self.default_class
    }

    /// Calls the method on `target` with an argument of the declared parameter type.
    ///
    /// # Errors
    /// Returns an [`InvocationError`] when the method has no body, the target or argument
    /// has the wrong type, or the mutator rejects the value.
    pub fn invoke(&self, target: &mut dyn Any, arg: Box<dyn Any>) -> Result<(), InvocationError> {
        let invoker = self.invoker.as_ref().ok_or_else(|| InvocationError::NotInvocable {
            method: self.name.clone(),
            context: None,
        })?;
        invoker(target, arg)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("invocable", &self.invoker.is_some())
            .field("default_class", &self.default_class)
            .finish()
    }
}

/// A named property: readable when it has a getter, writable through its setter.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    name: String,
    readable: bool,
    write_method: Option<Rc<MethodDescriptor>>,
}

impl PropertyDescriptor {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self { name: naming::property_key(name), readable: false, write_method: None }
    }

    #[must_use]
    pub fn with_write_method(mut self, method: Rc<MethodDescriptor>) -> Self {
        self.write_method = Some(method);
        self
    }

    #[must_use]
    pub fn readable(mut self) -> Self {
        self.readable = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_readable(&self) -> bool {
        self.readable
    }

    #[must_use]
    pub const fn write_method(&self) -> Option<&Rc<MethodDescriptor>> {
        self.write_method.as_ref()
    }
}

/// Methods and properties of one type, keyed by bean name and property key.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    properties: FxHashMap<String, PropertyDescriptor>,
    methods: FxHashMap<String, Rc<MethodDescriptor>>,
}

impl Capabilities {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts a capability table for `T`.
    ///
    /// # Example
    /// ```rust
    /// use propset::Capabilities;
    ///
    /// #[derive(Default)]
    /// struct Counter { step: u32, labels: Vec<String> }
    ///
    /// let caps = Capabilities::builder::<Counter>()
    ///     .setter("set_step", |c: &mut Counter, step: u32| c.step = step)
    ///     .adder("add_label", |c: &mut Counter, label: String| c.labels.push(label))
    ///     .getter("get_step")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(caps.property("step").unwrap().write_method().is_some());
    /// assert!(caps.property("step").unwrap().is_readable());
    /// assert!(caps.method("addLabel").is_some());
    /// ```
    #[must_use]
    pub fn builder<T: Any>() -> CapabilitiesBuilder<T> {
        CapabilitiesBuilder::new()
    }

    /// Looks up a property by its normalized key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(key)
    }

    /// Looks up a method by its bean name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Rc<MethodDescriptor>> {
        self.methods.get(name)
    }

    /// Looks up property `name` given in any case convention.
    ///
    /// Keys keep their case when the first two characters are upper case (`setXAxis`
    /// registers `XAxis`), so a miss on the decapitalized key retries it capitalized.
    #[must_use]
    pub fn find_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        let key = naming::property_key(name);
        self.property(&key).or_else(|| self.property(&naming::capitalize_first(&key)))
    }

    /// The write method of property `name`, normalized.
    #[must_use]
    pub fn find_setter(&self, name: &str) -> Option<&Rc<MethodDescriptor>> {
        self.find_property(name)?.write_method()
    }

    /// The `add<Name>` method serving collection property `name`.
    #[must_use]
    pub fn find_adder(&self, name: &str) -> Option<&Rc<MethodDescriptor>> {
        self.method(&naming::adder_name(name))
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.values().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Collects the methods of `T` and derives its properties on [`build`](Self::build).
///
/// Method names may be given in Rust (`set_max_history`) or bean (`setMaxHistory`) form.
pub struct CapabilitiesBuilder<T> {
    methods: Vec<MethodDescriptor>,
    readers: Vec<String>,
    hints: Vec<(String, DefaultClass)>,
    misnamed: Vec<(String, &'static str)>,
    _target: PhantomData<fn() -> T>,
}

impl<T: Any> CapabilitiesBuilder<T> {
    fn new() -> Self {
        Self {
            methods: Vec::new(),
            readers: Vec::new(),
            hints: Vec::new(),
            misnamed: Vec::new(),
            _target: PhantomData,
        }
    }

    /// Registers `set<Name>`, the write method of property `name`.
    #[must_use]
    pub fn setter<P, R, F>(self, name: &str, setter: F) -> Self
    where
        P: Parameter,
        R: IntoOutcome,
        F: Fn(&mut T, P) -> R + 'static,
    {
        self.prefixed(SETTER_PREFIX, MethodDescriptor::mutator(name, setter))
    }

    /// Registers `add<Name>`, the adder of collection property `name`.
    #[must_use]
    pub fn adder<P, R, F>(self, name: &str, adder: F) -> Self
    where
        P: Parameter,
        R: IntoOutcome,
        F: Fn(&mut T, P) -> R + 'static,
    {
        self.prefixed(ADDER_PREFIX, MethodDescriptor::mutator(name, adder))
    }

    /// Registers a `get<Name>`/`is<Name>` reader; the property becomes readable.
    #[must_use]
    pub fn getter(mut self, name: &str) -> Self {
        let method = MethodDescriptor::new(name, Vec::new());
        self.readers.push(method.name.clone());
        self.methods.push(method);
        self
    }

    /// Registers a method described by hand, e.g. one taking several arguments.
    #[must_use]
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Attaches a default-class hint to an already registered setter or adder.
    #[must_use]
    pub fn default_class<D: Parameter>(mut self, method: &str) -> Self {
        self.hints.push((naming::method_name(method), DefaultClass::of::<D>()));
        self
    }

    fn prefixed(mut self, prefix: &'static str, method: MethodDescriptor) -> Self {
        if !method.name.starts_with(prefix) || method.name.len() == prefix.len() {
            self.misnamed.push((method.name.clone(), prefix));
        }
        self.methods.push(method);
        self
    }

    /// Indexes the methods and derives properties from one-argument setters and readers.
    ///
    /// # Errors
    /// Returns an [`IntrospectionError`] for duplicate names, hints on unknown methods, and
    /// setters or adders whose name lacks the expected prefix.
    pub fn build(self) -> Result<Capabilities, IntrospectionError> {
        let type_name = type_name::<T>();
        if let Some((method, prefix)) = self.misnamed.first() {
            return Err(IntrospectionError::Internal {
                message: format!("method [{method}] must be named {prefix}<Name>").into(),
                context: Some(type_name.into()),
            });
        }

        let mut methods: FxHashMap<String, MethodDescriptor> = FxHashMap::default();
        for method in self.methods {
            if methods.contains_key(&method.name) {
                return Err(IntrospectionError::DuplicateMethod {
                    method: method.name,
                    type_name,
                    context: None,
                });
            }
            methods.insert(method.name.clone(), method);
        }

        for (method, hint) in self.hints {
            let Some(target) = methods.get_mut(&method) else {
                return Err(IntrospectionError::UnknownMethod { method, type_name, context: None });
            };
            target.default_class = Some(hint);
        }

        let methods: FxHashMap<String, Rc<MethodDescriptor>> =
            methods.into_iter().map(|(name, method)| (name, Rc::new(method))).collect();

        let mut properties: FxHashMap<String, PropertyDescriptor> = FxHashMap::default();
        for method in methods.values().filter(|method| method.arity() == 1) {
            let Some((SETTER_PREFIX, key)) = naming::split_accessor(&method.name) else { continue };
            let property = properties.entry(key).or_insert_with_key(|key| PropertyDescriptor::new(key));
            property.write_method = Some(Rc::clone(method));
        }
        for reader in &self.readers {
            let Some((prefix, key)) = naming::split_accessor(reader) else { continue };
            if naming::is_reader_prefix(prefix) {
                properties.entry(key).or_insert_with_key(|key| PropertyDescriptor::new(key)).readable = true;
            }
        }

        Ok(Capabilities { properties, methods })
    }
}

impl<T> fmt::Debug for CapabilitiesBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilitiesBuilder")
            .field("target", &type_name::<T>())
            .field("methods", &self.methods.len())
            .finish_non_exhaustive()
    }
}
