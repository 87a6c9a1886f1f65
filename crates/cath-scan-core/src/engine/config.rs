use crate::core::utils::angle::Angle;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid cell width {width} for keyer part '{part}': must be finite and strictly positive")]
    InvalidCellWidth { part: &'static str, width: f32 },

    #[error("Invalid cell width {width} rad for angle keyer part '{part}': must lie in (0, 2π]")]
    InvalidAngleCellWidth { part: &'static str, width: f32 },

    #[error("A keyer needs between 1 and {max} parts, got {found}")]
    InvalidKeyerArity { found: usize, max: usize },

    #[error("Keyer part '{part}' only supports exact lookups but was given search radius {radius}")]
    NonZeroSearchRadius { part: &'static str, radius: u32 },

    #[error("Invalid value for criterion '{name}': {value}")]
    InvalidCriterion { name: String, value: String },

    #[error("Malformed criteria part '{0}': expected NAME=VALUE")]
    MalformedCriteriaPart(String),

    #[error("Unknown criterion '{0}'")]
    UnknownCriterion(String),

    #[error("Criterion '{0}' is specified more than once")]
    DuplicateCriterion(String),
}

/// Cell widths of the lattice dimensions used by residue-pair keyers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellWidths {
    pub view: f32,
    pub angle: Angle,
}

impl CellWidths {
    pub const DEFAULT_VIEW: f32 = 10.0;
    pub const DEFAULT_ANGLE_DEGREES: f32 = 120.0;
}

impl Default for CellWidths {
    fn default() -> Self {
        Self {
            view: Self::DEFAULT_VIEW,
            angle: Angle::from_degrees(Self::DEFAULT_ANGLE_DEGREES),
        }
    }
}

#[derive(Default)]
pub struct CellWidthsBuilder {
    view: Option<f32>,
    angle: Option<Angle>,
}

impl CellWidthsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(mut self, width: f32) -> Self {
        self.view = Some(width);
        self
    }
    pub fn angle(mut self, width: Angle) -> Self {
        self.angle = Some(width);
        self
    }

    pub fn build(self) -> Result<CellWidths, ConfigError> {
        Ok(CellWidths {
            view: self.view.ok_or(ConfigError::MissingParameter("view"))?,
            angle: self.angle.ok_or(ConfigError::MissingParameter("angle"))?,
        })
    }
}
