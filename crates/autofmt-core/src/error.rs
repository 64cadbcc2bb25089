use derive_more::From;
use orion_error::{ErrorCode, StructError, UvsReason};

#[derive(Debug, Clone, PartialEq, thiserror::Error, From)]
pub enum SynthReason {
    #[error("too many template slots")]
    TooManySlots,
    #[error("template capacity exceeded")]
    Capacity,
    #[error("malformed format fragment")]
    MalformedFragment,
    #[error("invalid template separator")]
    InvalidSeparator,
    #[error("duplicate leaf rule")]
    DuplicateRule,
    #[error("invalid slot bound")]
    InvalidBound,
    #[error("{0}")]
    Uvs(UvsReason),
}

impl ErrorCode for SynthReason {
    fn error_code(&self) -> i32 {
        match self {
            Self::TooManySlots => 3001,
            Self::Capacity => 3002,
            Self::MalformedFragment => 3003,
            Self::InvalidSeparator => 3004,
            Self::DuplicateRule => 3005,
            Self::InvalidBound => 3006,
            Self::Uvs(u) => u.error_code(),
        }
    }
}

pub type SynthError = StructError<SynthReason>;
pub type SynthResult<T> = Result<T, SynthError>;
