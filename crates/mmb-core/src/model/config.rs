use serde::{Deserialize, Serialize};

/// Engine-wide physics knobs shared by every job shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    pub base_interaction_scale_factor: f64,
    pub temperature: f64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            base_interaction_scale_factor: 200.0,
            temperature: 10.0,
        }
    }
}

/// Trajectory reporting cadence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reporting {
    pub interval: f64,
    pub count: u32,
}

impl Default for Reporting {
    fn default() -> Self {
        Self {
            interval: 3.0,
            count: 5,
        }
    }
}

/// Whether the engine applies its default molecular-dynamics parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MdParameters {
    pub use_defaults: bool,
}

impl Default for MdParameters {
    fn default() -> Self {
        Self { use_defaults: true }
    }
}

/// Integer bounds of the engine's staged execution plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpan {
    pub first: u32,
    pub last: u32,
}

impl Default for StageSpan {
    fn default() -> Self {
        Self { first: 1, last: 1 }
    }
}

/// The stage a job starts from; must lie within `[first, last + 1]` of the
/// current [`StageSpan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage(pub u32);

impl Default for Stage {
    fn default() -> Self {
        Self(1)
    }
}

/// Discriminator selecting which of the two JSON job shapes applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    Standard,
    DensityFit,
}
