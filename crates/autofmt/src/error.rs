use autofmt_core::SynthReason;
use derive_more::From;
use orion_error::{ErrorCode, StructError, UvsReason};

#[derive(Debug, Clone, PartialEq, thiserror::Error, From)]
pub enum RenderReason {
    #[error("template syntax error")]
    Syntax,
    #[error("argument count mismatch")]
    ArgCount,
    #[error("slot index out of range")]
    IndexOutOfRange,
    #[error("{0}")]
    Synth(SynthReason),
    #[error("{0}")]
    Uvs(UvsReason),
}

impl ErrorCode for RenderReason {
    fn error_code(&self) -> i32 {
        match self {
            Self::Syntax => 4001,
            Self::ArgCount => 4002,
            Self::IndexOutOfRange => 4003,
            Self::Synth(s) => s.error_code(),
            Self::Uvs(u) => u.error_code(),
        }
    }
}

pub type RenderError = StructError<RenderReason>;
pub type RenderResult<T> = Result<T, RenderError>;
