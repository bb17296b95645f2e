use thiserror::Error;

#[derive(Error, Debug)]
pub enum RomError {
    #[error("ROM too short to contain a header ({len} bytes)")]
    MalformedRom { len: usize },

    #[error("Unsupported extension: {0:?}")]
    UnsupportedExtension(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RomError {
    /// Short label used in reports, e.g. "malformed".
    pub fn kind(&self) -> &'static str {
        match self {
            RomError::MalformedRom { .. } => "malformed",
            RomError::UnsupportedExtension(_) => "unsupported",
            RomError::Io(_) => "io",
        }
    }
}
