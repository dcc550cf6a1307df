use thiserror::Error;

use crate::color::PaletteError;
use crate::config::ConfigError;
use crate::surface::{ExpressionError, RequestError, SamplingError};

/// Every way a surface generation can fail.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid request: {0}")]
    Request(#[from] RequestError),
    #[error(transparent)]
    Expression(#[from] ExpressionError),
    #[error("sampling failed: {0}")]
    Sampling(#[from] SamplingError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// True for errors the user can fix by editing their input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Request(_) | Self::Expression(_) | Self::Palette(_)
        )
    }
}
