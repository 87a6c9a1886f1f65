use super::config::ConfigError;
use super::res_pair::{
    CriteriaSubject, ResPairCore, frame_distance_1, max_phi_angle_difference,
    max_psi_angle_difference, same_direction, squared_distance,
};
use crate::core::utils::angle::Angle;
use crate::core::utils::geometry::distance_1_of_angle;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexDirectionCriterion {
    MustMatch,
    NeedNotMatch,
}

/// Criteria that bound the squared distance between two views.
pub trait ViewCriteria {
    fn maximum_squared_distance(&self) -> f32;

    fn maximum_distance(&self) -> f32 {
        self.maximum_squared_distance().sqrt()
    }
}

pub trait TorsionCriteria {
    fn maximum_phi_angle_difference(&self) -> Angle;
    fn maximum_psi_angle_difference(&self) -> Angle;
}

pub trait DirectionCriteria {
    fn index_direction_criterion(&self) -> IndexDirectionCriterion;
}

/// Thresholds deciding whether two residue pairs match.
///
/// Matching is a two-phase protocol. [`are_not_violated_by`](Self::are_not_violated_by)
/// is a cheap per-pair pre-filter that must pass for both pairs; only then is the
/// pairwise [`are_met_by`](Self::are_met_by) meaningful. The latter does not re-check the
/// pre-filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadCriteria {
    index_direction_criterion: IndexDirectionCriterion,
    minimum_index_distance: u32,
    maximum_squared_distance: f32,
    maximum_frame_angle_distance_1: f32,
    maximum_frame_angle_difference: Angle,
    maximum_phi_angle_difference: Angle,
    maximum_psi_angle_difference: Angle,
}

impl QuadCriteria {
    pub const DEFAULT_MINIMUM_INDEX_DISTANCE: u32 = 11;
    pub const DEFAULT_MAXIMUM_SQUARED_DISTANCE: f32 = 40.0;
    pub const DEFAULT_MAXIMUM_FRAME_ANGLE_DEGREES: f32 = 22.5;
    pub const DEFAULT_MAXIMUM_PHI_ANGLE_DEGREES: f32 = 67.5;
    pub const DEFAULT_MAXIMUM_PSI_ANGLE_DEGREES: f32 = 67.5;

    pub fn new(
        index_direction_criterion: IndexDirectionCriterion,
        minimum_index_distance: u32,
        maximum_squared_distance: f32,
        maximum_frame_angle_difference: Angle,
        maximum_phi_angle_difference: Angle,
        maximum_psi_angle_difference: Angle,
    ) -> Result<Self, ConfigError> {
        if !maximum_squared_distance.is_finite() || maximum_squared_distance < 0.0 {
            return Err(ConfigError::InvalidCriterion {
                name: "maximum_squared_distance".to_string(),
                value: maximum_squared_distance.to_string(),
            });
        }
        for (name, angle) in [
            ("maximum_frame_angle_difference", maximum_frame_angle_difference),
            ("maximum_phi_angle_difference", maximum_phi_angle_difference),
            ("maximum_psi_angle_difference", maximum_psi_angle_difference),
        ] {
            if !angle.is_finite() || angle.radians() < 0.0 || angle > Angle::one_revolution() {
                return Err(ConfigError::InvalidCriterion {
                    name: name.to_string(),
                    value: angle.to_string(),
                });
            }
        }

        Ok(Self {
            index_direction_criterion,
            minimum_index_distance,
            maximum_squared_distance,
            maximum_frame_angle_distance_1: distance_1_of_angle(maximum_frame_angle_difference),
            maximum_frame_angle_difference,
            maximum_phi_angle_difference,
            maximum_psi_angle_difference,
        })
    }

    pub fn requires_matching_directions(&self) -> bool {
        self.index_direction_criterion == IndexDirectionCriterion::MustMatch
    }

    pub fn minimum_index_distance(&self) -> u32 {
        self.minimum_index_distance
    }

    pub fn maximum_frame_angle_distance_1(&self) -> f32 {
        self.maximum_frame_angle_distance_1
    }

    pub fn maximum_frame_angle_difference(&self) -> Angle {
        self.maximum_frame_angle_difference
    }

    /// Pre-filter for a single pair: its indices must differ by at least the minimum index distance.
    #[inline]
    pub fn are_not_violated_by<P: CriteriaSubject>(&self, pair: &P) -> bool {
        pair.has_index_separation(self.minimum_index_distance)
    }

    /// Checks the geometric thresholds between two cores, cheapest test first.
    #[inline]
    pub fn are_met_by_cores(&self, a: &ResPairCore, b: &ResPairCore) -> bool {
        if squared_distance(a, b) > self.maximum_squared_distance {
            return false;
        }
        if frame_distance_1(a, b) > self.maximum_frame_angle_distance_1 {
            return false;
        }
        if max_phi_angle_difference(a, b) > self.maximum_phi_angle_difference {
            return false;
        }
        if max_psi_angle_difference(a, b) > self.maximum_psi_angle_difference {
            return false;
        }
        true
    }

    /// Full pairwise match test. Both pairs must already pass [`Self::are_not_violated_by`].
    #[inline]
    pub fn are_met_by<A: CriteriaSubject, B: CriteriaSubject>(&self, a: &A, b: &B) -> bool {
        if !self.are_met_by_cores(a.core(), b.core()) {
            return false;
        }
        !self.requires_matching_directions() || same_direction(a, b)
    }
}

pub fn make_default_quad_criteria() -> QuadCriteria {
    let maximum_frame_angle_difference =
        Angle::from_degrees(QuadCriteria::DEFAULT_MAXIMUM_FRAME_ANGLE_DEGREES);
    QuadCriteria {
        index_direction_criterion: IndexDirectionCriterion::MustMatch,
        minimum_index_distance: QuadCriteria::DEFAULT_MINIMUM_INDEX_DISTANCE,
        maximum_squared_distance: QuadCriteria::DEFAULT_MAXIMUM_SQUARED_DISTANCE,
        maximum_frame_angle_distance_1: distance_1_of_angle(maximum_frame_angle_difference),
        maximum_frame_angle_difference,
        maximum_phi_angle_difference: Angle::from_degrees(
            QuadCriteria::DEFAULT_MAXIMUM_PHI_ANGLE_DEGREES,
        ),
        maximum_psi_angle_difference: Angle::from_degrees(
            QuadCriteria::DEFAULT_MAXIMUM_PSI_ANGLE_DEGREES,
        ),
    }
}

impl Default for QuadCriteria {
    fn default() -> Self {
        make_default_quad_criteria()
    }
}

impl ViewCriteria for QuadCriteria {
    #[inline]
    fn maximum_squared_distance(&self) -> f32 {
        self.maximum_squared_distance
    }
}

impl TorsionCriteria for QuadCriteria {
    #[inline]
    fn maximum_phi_angle_difference(&self) -> Angle {
        self.maximum_phi_angle_difference
    }
    #[inline]
    fn maximum_psi_angle_difference(&self) -> Angle {
        self.maximum_psi_angle_difference
    }
}

impl DirectionCriteria for QuadCriteria {
    #[inline]
    fn index_direction_criterion(&self) -> IndexDirectionCriterion {
        self.index_direction_criterion
    }
}

impl fmt::Display for QuadCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "quad_criteria[require_matching_directions:{},minimum_index_distance:{},maximum_squared_distance:{},maximum_frame_angle_difference:{},maximum_phi_angle_difference:{},maximum_psi_angle_difference:{}]",
            self.requires_matching_directions(),
            self.minimum_index_distance,
            self.maximum_squared_distance,
            self.maximum_frame_angle_difference,
            self.maximum_phi_angle_difference,
            self.maximum_psi_angle_difference,
        )
    }
}

/// Parses a compact criteria description such as
/// `dist_co=40,dirn_co=1,index_dist_co=-11,frame_ang_co=22.5,phi_ang_co=67.5,psi_ang_co=67.5`.
///
/// Whitespace is ignored and the `_co` suffix is optional. `dist` is the maximum squared
/// distance, a non-zero `dirn` requires matching directions, `index_dist` is the negated
/// minimum index distance and the angles are in degrees. All six entries are required.
pub fn parse_quad_criteria(text: &str) -> Result<QuadCriteria, ConfigError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    let mut dist: Option<f32> = None;
    let mut dirn: Option<f32> = None;
    let mut index_dist: Option<i64> = None;
    let mut frame_ang: Option<f32> = None;
    let mut phi_ang: Option<f32> = None;
    let mut psi_ang: Option<f32> = None;

    for part in compact.split(',') {
        let (raw_name, raw_value) = part
            .split_once('=')
            .filter(|(name, value)| !name.is_empty() && !value.is_empty())
            .ok_or_else(|| ConfigError::MalformedCriteriaPart(part.to_string()))?;
        let name = raw_name.strip_suffix("_co").unwrap_or(raw_name);

        match name {
            "dist" => set_once(&mut dist, name, parse_number(name, raw_value)?)?,
            "dirn" => set_once(&mut dirn, name, parse_number(name, raw_value)?)?,
            "index_dist" => {
                let value = raw_value
                    .parse::<i64>()
                    .map_err(|_| invalid(name, raw_value))?;
                set_once(&mut index_dist, name, value)?
            }
            "frame_ang" => set_once(&mut frame_ang, name, parse_number(name, raw_value)?)?,
            "phi_ang" => set_once(&mut phi_ang, name, parse_number(name, raw_value)?)?,
            "psi_ang" => set_once(&mut psi_ang, name, parse_number(name, raw_value)?)?,
            _ => return Err(ConfigError::UnknownCriterion(raw_name.to_string())),
        }
    }

    let index_dist = index_dist.ok_or(ConfigError::MissingParameter("index_dist"))?;
    let minimum_index_distance = u32::try_from(-index_dist)
        .map_err(|_| invalid("index_dist", &index_dist.to_string()))?;
    let direction = if dirn.ok_or(ConfigError::MissingParameter("dirn"))? != 0.0 {
        IndexDirectionCriterion::MustMatch
    } else {
        IndexDirectionCriterion::NeedNotMatch
    };

    QuadCriteria::new(
        direction,
        minimum_index_distance,
        dist.ok_or(ConfigError::MissingParameter("dist"))?,
        Angle::from_degrees(frame_ang.ok_or(ConfigError::MissingParameter("frame_ang"))?),
        Angle::from_degrees(phi_ang.ok_or(ConfigError::MissingParameter("phi_ang"))?),
        Angle::from_degrees(psi_ang.ok_or(ConfigError::MissingParameter("psi_ang"))?),
    )
}

impl FromStr for QuadCriteria {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_quad_criteria(s)
    }
}

fn invalid(name: &str, value: &str) -> ConfigError {
    ConfigError::InvalidCriterion {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn parse_number(name: &str, value: &str) -> Result<f32, ConfigError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(name, value))
}

fn set_once<T>(slot: &mut Option<T>, name: &str, value: T) -> Result<(), ConfigError> {
    if slot.replace(value).is_some() {
        return Err(ConfigError::DuplicateCriterion(name.to_string()));
    }
    Ok(())
}
