use alloc::string::{String, ToString};
use core::fmt::Display;

/// Errors reported by the dynamic loader.
///
/// The message is the platform's own diagnostic text, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `dlopen` failed to load the library.
    Load { msg: String },
    /// `dlclose` failed to unload the library.
    Unload { msg: String },
    /// `dlsym` could not find the symbol.
    Symbol { msg: String },
    /// The path or symbol name is null or contains an interior NUL byte.
    InvalidName,
}

impl Error {
    /// The loader's diagnostic text, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::Load { msg } | Error::Unload { msg } | Error::Symbol { msg } => Some(msg),
            Error::InvalidName => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Load { msg } => write!(f, "{msg}"),
            Error::Unload { msg } => write!(f, "{msg}"),
            Error::Symbol { msg } => write!(f, "{msg}"),
            Error::InvalidName => write!(f, "Invalid name"),
        }
    }
}

impl core::error::Error for Error {}

#[cold]
#[inline(never)]
pub(crate) fn load_error(msg: impl ToString) -> Error {
    Error::Load {
        msg: msg.to_string(),
    }
}

#[cold]
#[inline(never)]
pub(crate) fn unload_error(msg: impl ToString) -> Error {
    Error::Unload {
        msg: msg.to_string(),
    }
}

#[cold]
#[inline(never)]
pub(crate) fn find_symbol_error(msg: impl ToString) -> Error {
    Error::Symbol {
        msg: msg.to_string(),
    }
}
