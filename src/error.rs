use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The crate's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum MlErr {
    /// An array's shape is inconsistent with the configured hidden width or with the fixed
    /// input/output width.
    InvalidDimension {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A loss or prediction contains NaN or infinity.
    NonFiniteValue { what: &'static str },
    /// A hyperparameter that can't be used as given.
    InvalidHyperparameter { name: &'static str, value: f64 },
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::InvalidDimension {
                what,
                got,
                expected,
            } => write!(
                f,
                "invalid dimension for {what}: got {got}, expected {expected}"
            ),
            MlErr::NonFiniteValue { what } => write!(f, "{what} contains a non-finite value"),
            MlErr::InvalidHyperparameter { name, value } => {
                write!(f, "invalid hyperparameter {name}: {value}")
            }
        }
    }
}

impl Error for MlErr {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_array() {
        let err = MlErr::InvalidDimension {
            what: "hidden width",
            got: 0,
            expected: 1,
        };
        assert_eq!(
            err.to_string(),
            "invalid dimension for hidden width: got 0, expected 1"
        );

        let err = MlErr::NonFiniteValue { what: "loss" };
        assert_eq!(err.to_string(), "loss contains a non-finite value");
    }
}
