//! Error taxonomy for CSS generation (fontcss https://github.com/fontcss/fontcss)

use std::result;

/// Everything that can stop a stylesheet from being produced.
///
/// Only `MissingFamilyParameter` and `EmptyResolution` fail a request outright.
/// `UnknownFamily` is turned into a 200 notice by the assembler, and
/// `InvalidSpecifier` only appears in strict mode.
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Wrong request")]
    MissingFamilyParameter,

    #[error("no font faces could be resolved from the request")]
    EmptyResolution,

    #[error("font family is not available: {id}")]
    UnknownFamily { id: String },

    #[error("invalid family specifier {token:?}: {reason}")]
    InvalidSpecifier { token: String, reason: String },

    #[error("failed to parse data file: {0}")]
    Json(#[from] serde_json::Error),
}

impl CssError {
    pub(crate) fn invalid(token: &str, reason: impl Into<String>) -> Self {
        CssError::InvalidSpecifier {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = result::Result<T, CssError>;
