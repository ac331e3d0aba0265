//! Errors reported to the user before exiting.

use std::error;
use std::fmt;
use std::io;

pub type Report<T> = Result<T, Error>;

/// What went wrong, in words, and the failure behind it if there was one.
#[derive(Debug)]
pub struct Error {
    err: Option<Cause>,
    message: String,
}

#[derive(Debug)]
pub enum Cause {
    /// Terminal or stdout failure
    Io(io::Error),
    /// Snapshot encoding failure
    Json(serde_json::Error),
}

impl From<io::Error> for Cause {
    fn from(err: io::Error) -> Self {
        Cause::Io(err)
    }
}

impl From<serde_json::Error> for Cause {
    fn from(err: serde_json::Error) -> Self {
        Cause::Json(err)
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Io(err) => write!(f, "{err}"),
            Cause::Json(err) => write!(f, "invalid JSON: {err}"),
        }
    }
}

impl Error {
    pub fn new<U, M>(err: U, message: M) -> Self
    where
        U: Into<Cause>,
        M: Into<String>,
    {
        Self {
            err: Some(err.into()),
            message: message.into(),
        }
    }

    pub fn message<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Self {
            err: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(err) = &self.err {
            write!(f, ": {err}")?;
        }

        Ok(())
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.err.as_ref()? {
            Cause::Io(err) => Some(err as &(dyn error::Error + 'static)),
            Cause::Json(err) => Some(err as &(dyn error::Error + 'static)),
        }
    }
}

pub trait ErrorExt<T, E> {
    fn message(self, message: &str) -> Report<T>
    where
        E: Into<Cause>;

    fn with_message<F, M>(self, f: F) -> Report<T>
    where
        E: Into<Cause>,
        F: FnOnce() -> M,
        M: Into<String>;
}

impl<T, E> ErrorExt<T, E> for Result<T, E> {
    fn message(self, message: &str) -> Report<T>
    where
        E: Into<Cause>,
    {
        self.map_err(|err| Error::new(err, message))
    }

    fn with_message<F, M>(self, f: F) -> Report<T>
    where
        E: Into<Cause>,
        F: FnOnce() -> M,
        M: Into<String>,
    {
        self.map_err(|err| Error::new(err, f()))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn display_with_cause() {
        let res: Result<(), io::Error> = Err(io::Error::other("not a tty"));
        let err = res.message("failed to enable raw mode").unwrap_err();

        assert_eq!(err.to_string(), "failed to enable raw mode: not a tty");
        assert!(err.source().is_some());
    }

    #[test]
    fn json_cause() {
        let res = serde_json::from_str::<u8>("[");
        let err = res.message("failed to encode snapshot").unwrap_err();

        assert!(matches!(err.err, Some(Cause::Json(_))));
        assert!(err
            .to_string()
            .starts_with("failed to encode snapshot: invalid JSON: "));
        assert!(err.source().is_some());
    }

    #[test]
    fn display_message_only() {
        let err = Error::message("nothing to do");

        assert_eq!(err.to_string(), "nothing to do");
        assert!(err.source().is_none());
    }

    #[test]
    fn lazy_message() {
        let res: Result<u8, io::Error> = Ok(1);
        let value = res
            .with_message(|| -> String { unreachable!("only called on error") })
            .unwrap();

        assert_eq!(value, 1);
    }
}
