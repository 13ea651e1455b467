use std::borrow::Cow;
use std::error::Error;
use std::sync::Arc;

/// Failure raised while calling a registered mutator.
#[propset_derive::propset_error]
#[derive(Clone)]
pub enum InvocationError {
    /// The mutator itself returned an error.
    #[error("Mutator rejected the value{}: {source}", format_context(.context))]
    Rejected { source: Arc<dyn Error + Send + Sync>, context: Option<Cow<'static, str>> },

    /// The target handed to the invoker is not the type the method was registered on.
    #[error("Target is not a [{expected}]{}", format_context(.context))]
    TargetMismatch { expected: &'static str, context: Option<Cow<'static, str>> },

    /// The argument is not the method's declared parameter type.
    #[error("Argument is not a [{expected}]{}", format_context(.context))]
    ArgumentMismatch { expected: &'static str, context: Option<Cow<'static, str>> },

    /// The method was recorded without a callable body.
    #[error("Method [{method}] cannot be invoked{}", format_context(.context))]
    NotInvocable { method: String, context: Option<Cow<'static, str>> },
}

/// Return types a setter or adder may have.
///
/// `()` always succeeds; `Result<_, E>` turns `Err` into [`InvocationError::Rejected`].
pub trait IntoOutcome {
    /// # Errors
    /// Returns [`InvocationError::Rejected`] when the mutator reported a failure.
    fn into_outcome(self) -> Result<(), InvocationError>;
}

impl IntoOutcome for () {
    #[inline]
    fn into_outcome(self) -> Result<(), InvocationError> {
        Ok(())
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    E: Into<Box<dyn Error + Send + Sync>>,
{
    fn into_outcome(self) -> Result<(), InvocationError> {
        self.map(|_| ()).map_err(|err| {
            let source: Arc<dyn Error + Send + Sync> = Arc::from(err.into());
            InvocationError::from(source)
        })
    }
}
