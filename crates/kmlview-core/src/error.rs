use std::path::PathBuf;
use thiserror::Error;

/// Failure of one stage of the load pipeline. Carries plain messages so it
/// stays `Clone` and can cross the loader channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("could not read file {}: {message}", path.display())]
    Read { path: PathBuf, message: String },
    #[error("could not decode file as UTF-8: {message}")]
    Decode { message: String },
    #[error("could not parse KML: {message}")]
    Parse { message: String },
    #[error("could not convert KML features: {message}")]
    Convert { message: String },
}

impl LoadError {
    /// Short stage label for status lines.
    pub fn stage(&self) -> &'static str {
        match self {
            LoadError::Read { .. } => "read",
            LoadError::Decode { .. } => "decode",
            LoadError::Parse { .. } => "parse",
            LoadError::Convert { .. } => "convert",
        }
    }
}
