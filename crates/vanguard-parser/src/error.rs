use thiserror::Error;
use vanguard_types::Stage;

/// Decode-error kinds from §4.1. All are [`Stage::Ingest`]; the orchestrator
/// maps these onto [`vanguard_types::DropReason`] at the pipeline boundary.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The input is shorter than the minimum sane frame length.
    #[error("wire frame shorter than the minimum header size ({got} < {min})")]
    MalformedWire { got: usize, min: usize },
    /// The outer frame discriminant is not one this parser understands.
    #[error("unrecognized wire frame discriminant {0}")]
    UnknownVariant(u8),
    /// A length-prefixed field declares more bytes than remain in the frame.
    #[error("field declared length {declared} exceeds remaining {remaining} bytes")]
    TruncatedField { declared: usize, remaining: usize }
}

impl ParseError {
    pub fn stage(&self) -> Stage {
        Stage::Ingest
    }
}
