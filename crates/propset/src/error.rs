use crate::coercion::ConversionError;
use crate::invocation::InvocationError;
use std::any::TypeId;
use std::borrow::Cow;

/// Why a property could not be bound.
///
/// The lenient [`PropertySetter`](crate::PropertySetter) entry points report the failure to
/// their sink and also return it; the strict entry point only returns it.
#[propset_derive::propset_error]
#[derive(Clone)]
pub enum BindError {
    /// The target has no setter or adder for the name.
    #[error("No such property [{property}] in {type_name}.")]
    NotFound { property: String, type_name: &'static str },

    /// The property exists but has no write method.
    #[error("No setter for property [{property}] in {type_name}.")]
    MissingWriteMethod { property: String, type_name: &'static str },

    /// The resolved method does not take exactly one parameter.
    #[error("Method [{method}] for property [{property}] takes {arity} parameters, expected 1.")]
    ArityMismatch { property: String, method: String, arity: usize },

    /// The string value could not be converted to the parameter type.
    #[error("Conversion failed{}: {source}", format_context(.context))]
    Conversion { source: ConversionError, context: Option<Cow<'static, str>> },

    /// The supplied object is not assignable to the parameter type.
    #[error("A \"{found}\" object is not assignable to a \"{expected}\" variable.")]
    Assignability {
        expected: &'static str,
        expected_id: TypeId,
        found: String,
        found_id: TypeId,
    },

    /// The mutator failed or rejected the value.
    #[error("Invocation failed{}: {source}", format_context(.context))]
    Invocation { source: InvocationError, context: Option<Cow<'static, str>> },

    #[error("Internal binder error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl BindError {
    /// Whether an assignability failure involves two distinct types that share a name.
    #[must_use]
    pub fn is_identity_mismatch(&self) -> bool {
        matches!(
            self,
            Self::Assignability { expected, expected_id, found, found_id }
                if *expected == found.as_str() && expected_id != found_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_and_invocation_errors_convert() {
        let err: BindError = ConversionError::no_value::<bool>("maybe").into();
        assert_eq!(err.kind(), BindErrorKind::Conversion);

        let failed: Result<(), InvocationError> =
            Err(InvocationError::NotInvocable { method: "setRange".into(), context: None });
        let err = failed.context("setRange").unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::Invocation);
        assert!(err.to_string().starts_with("Invocation failed (setRange)"));
    }

    #[test]
    fn same_name_with_different_identity_is_detected() {
        let err = BindError::Assignability {
            expected: "Layout",
            expected_id: TypeId::of::<u8>(),
            found: "Layout".to_owned(),
            found_id: TypeId::of::<u16>(),
        };
        assert!(err.is_identity_mismatch());
        assert_eq!(err.to_string(), "A \"Layout\" object is not assignable to a \"Layout\" variable.");
    }

    #[test]
    fn internal_errors_come_from_strings() {
        assert_eq!(BindError::from("adapter lost the value").kind(), BindErrorKind::Internal);
    }
}
