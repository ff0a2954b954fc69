//! Error handling for the Judgement backend.

pub mod domain;
pub mod error_code;

pub use domain::{DomainError, ErrorCategory, FaultKind, ValidationKind};
pub use error_code::ErrorCode;
