use thiserror::Error;

pub type VizResult<T> = Result<T, VizError>;

#[derive(Debug, Error)]
pub enum VizError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("endpoint `{endpoint}` answered with http status {status}")]
    Http { endpoint: String, status: u16 },

    #[error("endpoint `{endpoint}` returned an unexpected shape: {reason}")]
    Shape { endpoint: String, reason: String },

    #[error("transport failure for `{endpoint}`: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("preference store error: {0}")]
    Preference(String),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl VizError {
    /// Returns `true` for failures reported by the data source rather than by
    /// local validation.
    #[must_use]
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Shape { .. } | Self::Transport { .. }
        )
    }
}
