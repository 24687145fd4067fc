use thiserror::Error;

/// Contains Config properties which govern how a single object's transform
/// is replicated
#[derive(Clone, Debug, PartialEq)]
pub struct TransformConfig {
    /// When true the object's owner drives its pose; otherwise the server does.
    /// This is only the spawn-time value, the server may override it later.
    pub owner_authority: bool,
    /// When false, receivers snap to every snapshot instead of smoothing
    pub interpolate: bool,
    /// Distance the pose must move before a snapshot is sent ahead of the
    /// once-per-tick schedule
    pub position_threshold: f32,
    /// Rotation, in degrees, the pose must turn before a snapshot is sent
    /// ahead of the once-per-tick schedule
    pub rotation_threshold: f32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            owner_authority: false,
            interpolate: true,
            position_threshold: 0.01,
            rotation_threshold: 0.01,
        }
    }
}

impl TransformConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("position_threshold", self.position_threshold)?;
        check_threshold("rotation_threshold", self.rotation_threshold)?;
        Ok(())
    }
}

fn check_threshold(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidThreshold { field, value });
    }
    Ok(())
}

/// Errors found while validating a `TransformConfig`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidThreshold { field: &'static str, value: f32 },
}
