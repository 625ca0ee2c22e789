//! Error definitions.
use std::error::Error;
use std::{fmt, result};

/// A specialized Result type for this library.
pub type Result<T, E = CompassError> = result::Result<T, E>;

/// Errors in this library.
#[derive(Debug)]
pub enum CompassError {
    /// Contains [`InputError`].
    Input(InputError),
    /// Contains [`VertexNotFoundError`].
    VertexNotFound(VertexNotFoundError),
    /// Contains [`OutOfRangeError`].
    OutOfRange(OutOfRangeError),
    /// Contains [`csv::Error`] raised while reading the header or the underlying stream.
    Csv(csv::Error),
}

impl fmt::Display for CompassError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Input(e) => e.fmt(f),
            Self::VertexNotFound(e) => e.fmt(f),
            Self::OutOfRange(e) => e.fmt(f),
            Self::Csv(e) => write!(f, "CsvError: {e}"),
        }
    }
}

impl Error for CompassError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for CompassError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl CompassError {
    pub(crate) const fn input(msg: &'static str) -> Self {
        Self::Input(InputError { msg })
    }

    pub(crate) fn vertex_not_found<S>(id: S) -> Self
    where
        S: Into<String>,
    {
        Self::VertexNotFound(VertexNotFoundError { id: id.into() })
    }

    pub(crate) const fn out_of_range(requested: usize, available: usize) -> Self {
        Self::OutOfRange(OutOfRangeError {
            requested,
            available,
        })
    }
}

/// Error used when the input argument is invalid.
#[derive(Debug)]
pub struct InputError {
    msg: &'static str,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InputError: {}", self.msg)
    }
}

/// Error used when a job id was never added to a graph.
#[derive(Debug)]
pub struct VertexNotFoundError {
    id: String,
}

impl VertexNotFoundError {
    /// Gets the id that was looked up.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for VertexNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "VertexNotFoundError: <{}> is not a vertex in this graph", self.id)
    }
}

/// Error used when more neighbors are requested than a vertex has.
#[derive(Debug)]
pub struct OutOfRangeError {
    requested: usize,
    available: usize,
}

impl OutOfRangeError {
    /// Gets the requested window size, i.e., `limit + offset`.
    pub const fn requested(&self) -> usize {
        self.requested
    }

    /// Gets the number of candidates that were available.
    pub const fn available(&self) -> usize {
        self.available
    }
}

impl fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "OutOfRangeError: limit + offset = {} exceeds the {} available neighbors",
            self.requested, self.available
        )
    }
}
