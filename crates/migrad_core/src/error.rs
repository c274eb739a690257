use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    IncompatibleShape(String),
    ShapeMismatch {
        expected: usize,
        got: usize,
        msg: String,
    },
    DimensionMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    DimensionOutOfBounds {
        dim: i64,
        ndim: usize,
    },
    IndexOutOfBounds {
        index: usize,
        size: usize,
    },
    UnsupportedOperation(String),
    InvalidArgument(String),
    // serde
    #[cfg(feature = "serde")]
    Serialization(String),
    #[cfg(feature = "serde")]
    Deserialization(String),
    //
    External {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompatibleShape(msg) => write!(f, "Incompatible shape: {}", msg),
            Self::ShapeMismatch { expected, got, msg } => {
                write!(f, "Shape mismatch ({}): expected {}, got {}", msg, expected, got)
            }
            Self::DimensionMismatch { expected, got } => {
                write!(f, "Dimension mismatch: expected {:?}, got {:?}", expected, got)
            }
            Self::DimensionOutOfBounds { dim, ndim } => {
                write!(
                    f,
                    "Dimension out of bounds: dimension {} is not valid for tensor with {} dimensions",
                    dim, ndim
                )
            }
            Self::IndexOutOfBounds { index, size } => {
                write!(f, "Index out of bounds: index {} is out of bounds for dimension with size {}", index, size)
            }
            Self::UnsupportedOperation(msg) => write!(f, "Unsupported operation: {}", msg),
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            #[cfg(feature = "serde")]
            Self::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            #[cfg(feature = "serde")]
            Self::Deserialization(msg) => {
                write!(f, "Deserialization error: {}", msg)
            }
            Self::External { message } => {
                write!(f, "External error: {}", message)
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// True for every variant that reports operands whose shapes cannot be combined.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::IncompatibleShape(_) | Self::ShapeMismatch { .. } | Self::DimensionMismatch { .. }
        )
    }
}
