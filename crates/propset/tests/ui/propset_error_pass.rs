use propset::propset_error;
use std::borrow::Cow;

#[propset_error]
pub enum LoadError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal fault{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<String, LoadError> {
    let raw = std::fs::read_to_string("/nonexistent/propset.toml").context("reading options")?;
    Ok(raw)
}

fn main() {
    assert_eq!(LoadError::from("boom").kind(), LoadErrorKind::Internal);
    assert_eq!(read().unwrap_err().kind(), LoadErrorKind::Io);
}
