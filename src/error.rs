/// Error types for the simulation core.
///
/// `ContractError` covers malformed construction arguments: a collaborator
/// handed the core a value it promised never to send.  Gameplay outcomes
/// (life lost, wave won or lost) are never errors; they surface through the
/// wave's status queries instead.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractError {
    #[error("{entity}: coordinate is not finite (x={x}, y={y})")]
    NonFinite { entity: &'static str, x: f32, y: f32 },

    #[error("{entity}: x={x} outside [{min}, {max}]")]
    XOutOfRange {
        entity: &'static str,
        x: f32,
        min: f32,
        max: f32,
    },

    #[error("{entity}: y={y} outside [{min}, {max}]")]
    YOutOfRange {
        entity: &'static str,
        y: f32,
        min: f32,
        max: f32,
    },

    #[error("bolt velocity must be non-zero and finite, got {0}")]
    InvalidVelocity(f32),

    #[error("wave built from an invalid config: {0}")]
    InvalidConfig(String),

    #[error("formation must be {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    GridDimensions {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
}

/// Reasons a configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
