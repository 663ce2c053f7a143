//! Configuration errors
//!
//! Everything here is raised while building or configuring a machine. Once a
//! machine is built, simulating and drawing it cannot fail.

use std::path::PathBuf;

use thiserror::Error;

use crate::sim::ComponentId;

/// Errors surfaced at construction, selection or configuration time
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An image could not be resolved by the asset source
    #[error("image `{0}` could not be resolved")]
    MissingImage(String),

    /// A shape has no area (zero-length geometry)
    #[error("degenerate shape: {0}")]
    DegenerateShape(String),

    /// Frame rate must be a positive, finite number
    #[error("invalid frame rate {0}")]
    InvalidFrameRate(f32),

    /// Drawing scale must be a positive, finite number
    #[error("invalid pixels-per-centimeter scale {0}")]
    InvalidScale(f32),

    /// A component id that the machine does not own
    #[error("unknown component {0}")]
    UnknownComponent(ComponentId),

    /// The driving end of a transmission link has no rotation source
    #[error("component {0} has no rotation source")]
    NoRotationSource(ComponentId),

    /// The driven end of a transmission link has no rotation sink
    #[error("component {0} has no rotation sink")]
    NoRotationSink(ComponentId),

    /// Linking `from` to `to` would let rotation flow back into `from`
    #[error("driving {to} from {from} would create a transmission cycle")]
    TransmissionCycle { from: ComponentId, to: ComponentId },

    /// Settings file could not be read or written
    #[error("settings file {}: {source}", path.display())]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid JSON for [`crate::Settings`]
    #[error("invalid settings: {0}")]
    SettingsFormat(#[from] serde_json::Error),
}
