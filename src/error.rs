use thiserror::Error;

/// Error type for the pipexec library.
///
/// Only misuse of the API itself surfaces as an `Error`. Runtime failures of
/// the commands being executed (missing binary, timeout, non-zero exit) are
/// folded into [`ProcessResult`](crate::ProcessResult) so that command failure
/// stays an ordinary data path rather than exceptional control flow.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Process listing error: {0}")]
    ProcessList(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a process listing error
    pub fn process_list<S: Into<String>>(msg: S) -> Self {
        Self::ProcessList(msg.into())
    }
}

/// Convenient result type for pipexec operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_display() {
        let err = Error::invalid_argument("at least one command is required");
        assert_eq!(
            err.to_string(),
            "Invalid argument: at least one command is required"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("no such file"));
    }
}
