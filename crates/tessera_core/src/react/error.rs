//! Reactive error types
//!
//! Listener failures are never swallowed by the reactive core. A dispatch
//! always runs every listener in its snapshot, then reports what failed:
//! a single failure comes back as-is, two or more are wrapped in a
//! [`MultiError`].

use std::fmt;

use thiserror::Error;

/// Boxed error type accepted from listener code
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result returned by every listener callback
pub type ListenResult = Result<(), ReactError>;

/// Errors produced while dispatching through the reactive graph
#[derive(Error, Debug)]
pub enum ReactError {
    /// A listener failed with an arbitrary error
    #[error("{0}")]
    Listener(BoxError),

    /// A listener failed with a plain message
    #[error("{0}")]
    Message(String),

    /// Two or more listeners failed during the same dispatch
    #[error("{0}")]
    Multi(MultiError),
}

impl ReactError {
    /// Create an error from a plain message
    pub fn msg(message: impl Into<String>) -> Self {
        ReactError::Message(message.into())
    }

    /// Wrap an arbitrary error
    pub fn other<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ReactError::Listener(Box::new(err))
    }

    /// The individual errors this error stands for, in dispatch order
    pub fn errors(&self) -> Vec<&ReactError> {
        match self {
            ReactError::Multi(multi) => multi.errors.iter().collect(),
            single => vec![single],
        }
    }
}

/// Aggregate of the errors raised by several listeners in one dispatch
#[derive(Debug)]
pub struct MultiError {
    errors: Vec<ReactError>,
}

impl MultiError {
    /// The collected errors, in the order their listeners ran
    pub fn errors(&self) -> &[ReactError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<ReactError> {
        self.errors
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} listeners failed: [", self.errors.len())?;
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        f.write_str("]")
    }
}

/// Fold the errors collected during one dispatch into a single result
pub(crate) fn aggregate(mut errors: Vec<ReactError>) -> ListenResult {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ReactError::Multi(MultiError { errors })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_empty_is_ok() {
        assert!(aggregate(Vec::new()).is_ok());
    }

    #[test]
    fn test_aggregate_single_passes_through() {
        let err = aggregate(vec![ReactError::msg("boom")]).unwrap_err();
        assert!(matches!(err, ReactError::Message(ref m) if m == "boom"));
    }

    #[test]
    fn test_aggregate_many_wraps() {
        let err = aggregate(vec![ReactError::msg("a"), ReactError::msg("b")]).unwrap_err();
        assert_eq!(err.errors().len(), 2);
        assert_eq!(err.to_string(), "2 listeners failed: [a; b]");
    }
}
