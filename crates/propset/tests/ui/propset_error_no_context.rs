use propset::propset_error;

#[propset_error]
pub enum ReadError {
    #[error("IO error: {source}")]
    Io { source: std::io::Error },
}

fn main() {}
