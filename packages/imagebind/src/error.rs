use thiserror::Error;

use crate::capability::Capability;
use crate::component::Component;

/// Errors raised while resolving ImageBind components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageBindError {
    /// The component exists but its capability is not enabled.
    #[error("{component} requires the `{missing}` capability, which is not enabled")]
    Unavailable {
        component: Component,
        missing: Capability,
    },

    #[error("`{0}` is not an ImageBind component")]
    UnknownComponent(String),

    #[error("unknown capability `{0}` (expected one of tokenizers, vision, speech, torch)")]
    UnknownCapability(String),
}

pub type Result<T> = std::result::Result<T, ImageBindError>;
