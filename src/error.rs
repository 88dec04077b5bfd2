use thiserror::Error;

/// Errors raised while configuring filters.
///
/// All variants signal a developer mistake in panel configuration and are
/// meant to abort the request that triggered them. Plain lookup misses
/// (`get`, `first_where`, `is_active`) return absent values instead and
/// never surface here.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("all filters need names")]
    MissingName,

    #[error("duplicate filter name: {0}")]
    DuplicateName(String),

    #[error("filter not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
