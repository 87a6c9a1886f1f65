use super::{CellIndex, CloseKeyParts, KeyerPart};
use crate::core::utils::angle::Angle;
use crate::engine::config::ConfigError;
use crate::engine::criteria::{
    DirectionCriteria, IndexDirectionCriterion, TorsionCriteria, ViewCriteria,
};
use crate::engine::res_pair::{
    HasDirection, HasIndex, HasTorsions, HasView, ResIndex, ResPairDirection,
};
use std::f32::consts::TAU;

// Absorbs rounding in 2π / width so that exact divisors of a revolution do not gain a
// sliver cell.
const CELL_COUNT_SLACK: f32 = 1e-4;

#[inline]
fn floor_to_cell(value: f32, cell_width: f32) -> CellIndex {
    (value / cell_width).floor() as CellIndex
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn position(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Axis::X => "view_x",
            Axis::Y => "view_y",
            Axis::Z => "view_z",
        }
    }
}

/// Buckets entries by one coordinate of their view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisKeyerPart {
    axis: Axis,
    cell_width: f32,
}

impl AxisKeyerPart {
    pub fn new(axis: Axis, cell_width: f32) -> Result<Self, ConfigError> {
        if !cell_width.is_finite() || cell_width <= 0.0 {
            return Err(ConfigError::InvalidCellWidth {
                part: axis.name(),
                width: cell_width,
            });
        }
        Ok(Self { axis, cell_width })
    }

    pub fn x(cell_width: f32) -> Result<Self, ConfigError> {
        Self::new(Axis::X, cell_width)
    }

    pub fn y(cell_width: f32) -> Result<Self, ConfigError> {
        Self::new(Axis::Y, cell_width)
    }

    pub fn z(cell_width: f32) -> Result<Self, ConfigError> {
        Self::new(Axis::Z, cell_width)
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }
}

impl<E: HasView, C: ViewCriteria> KeyerPart<E, C> for AxisKeyerPart {
    type Value = f32;
    type SearchRadius = f32;

    fn get_name(&self) -> &'static str {
        self.axis.name()
    }

    #[inline]
    fn get_value(&self, entry: &E) -> f32 {
        entry.view()[self.axis.position()]
    }

    #[inline]
    fn key_part(&self, value: f32) -> CellIndex {
        floor_to_cell(value, self.cell_width)
    }

    fn close_key_parts(&self, value: f32, radius: f32) -> Result<CloseKeyParts, ConfigError> {
        let radius = radius.max(0.0);
        let low = floor_to_cell(value - radius, self.cell_width);
        let high = floor_to_cell(value + radius, self.cell_width);
        Ok((low..=high).collect())
    }

    #[inline]
    fn get_search_radius(&self, criteria: &C) -> f32 {
        criteria.maximum_distance()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Torsion {
    FromPhi,
    FromPsi,
    ToPhi,
    ToPsi,
}

impl Torsion {
    fn name(self) -> &'static str {
        match self {
            Torsion::FromPhi => "from_phi",
            Torsion::FromPsi => "from_psi",
            Torsion::ToPhi => "to_phi",
            Torsion::ToPsi => "to_psi",
        }
    }
}

/// Buckets entries by one backbone torsion, wrapping around the revolution.
///
/// There are `ceil(2π / width)` cells; when the width does not divide a revolution the last
/// cell is narrower than the rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleKeyerPart {
    torsion: Torsion,
    cell_width: Angle,
    num_cells: CellIndex,
}

impl AngleKeyerPart {
    pub fn new(torsion: Torsion, cell_width: Angle) -> Result<Self, ConfigError> {
        let width = cell_width.radians();
        if !width.is_finite() || width <= 0.0 || width > TAU {
            return Err(ConfigError::InvalidAngleCellWidth {
                part: torsion.name(),
                width,
            });
        }
        let num_cells = ((TAU / width) - CELL_COUNT_SLACK).ceil().max(1.0) as CellIndex;
        Ok(Self {
            torsion,
            cell_width,
            num_cells,
        })
    }

    pub fn from_phi(cell_width: Angle) -> Result<Self, ConfigError> {
        Self::new(Torsion::FromPhi, cell_width)
    }

    pub fn from_psi(cell_width: Angle) -> Result<Self, ConfigError> {
        Self::new(Torsion::FromPsi, cell_width)
    }

    pub fn to_phi(cell_width: Angle) -> Result<Self, ConfigError> {
        Self::new(Torsion::ToPhi, cell_width)
    }

    pub fn to_psi(cell_width: Angle) -> Result<Self, ConfigError> {
        Self::new(Torsion::ToPsi, cell_width)
    }

    pub fn num_cells(&self) -> CellIndex {
        self.num_cells
    }

    #[inline]
    fn cell_of_radians(&self, radians: f32) -> CellIndex {
        floor_to_cell(radians, self.cell_width.radians()).clamp(0, self.num_cells - 1)
    }

    fn cells_between(&self, low: CellIndex, high: CellIndex) -> CloseKeyParts {
        (low..=high).collect()
    }

    // Cells from `low` to the end of the revolution, then from zero to `high`.
    fn wrapping_cells(&self, low: CellIndex, high: CellIndex) -> CloseKeyParts {
        if low <= high {
            return self.cells_between(0, self.num_cells - 1);
        }
        let mut cells = self.cells_between(low, self.num_cells - 1);
        cells.extend(0..=high);
        cells
    }
}

impl<E: HasTorsions, C: TorsionCriteria> KeyerPart<E, C> for AngleKeyerPart {
    type Value = Angle;
    type SearchRadius = Angle;

    fn get_name(&self) -> &'static str {
        self.torsion.name()
    }

    #[inline]
    fn get_value(&self, entry: &E) -> Angle {
        match self.torsion {
            Torsion::FromPhi => entry.from_phi(),
            Torsion::FromPsi => entry.from_psi(),
            Torsion::ToPhi => entry.to_phi(),
            Torsion::ToPsi => entry.to_psi(),
        }
    }

    #[inline]
    fn key_part(&self, value: Angle) -> CellIndex {
        self.cell_of_radians(value.shifted().radians())
    }

    fn close_key_parts(&self, value: Angle, radius: Angle) -> Result<CloseKeyParts, ConfigError> {
        let radius = radius.radians().max(0.0);
        if 2.0 * radius >= TAU {
            return Ok(self.cells_between(0, self.num_cells - 1));
        }

        let centre = value.shifted().radians();
        let low = centre - radius;
        let high = centre + radius;

        let cells = if low < 0.0 {
            self.wrapping_cells(self.cell_of_radians(low + TAU), self.cell_of_radians(high))
        } else if high >= TAU {
            self.wrapping_cells(self.cell_of_radians(low), self.cell_of_radians(high - TAU))
        } else {
            self.cells_between(self.cell_of_radians(low), self.cell_of_radians(high))
        };
        Ok(cells)
    }

    #[inline]
    fn get_search_radius(&self, criteria: &C) -> Angle {
        match self.torsion {
            Torsion::FromPhi | Torsion::ToPhi => criteria.maximum_phi_angle_difference(),
            Torsion::FromPsi | Torsion::ToPsi => criteria.maximum_psi_angle_difference(),
        }
    }
}

/// Separates pairs running up the chain from pairs running down it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexDirectionKeyerPart;

impl<E: HasDirection, C: DirectionCriteria> KeyerPart<E, C> for IndexDirectionKeyerPart {
    type Value = ResPairDirection;
    type SearchRadius = IndexDirectionCriterion;

    fn get_name(&self) -> &'static str {
        "index_direction"
    }

    #[inline]
    fn get_value(&self, entry: &E) -> ResPairDirection {
        entry.direction()
    }

    #[inline]
    fn key_part(&self, value: ResPairDirection) -> CellIndex {
        match value {
            ResPairDirection::Decrease => 0,
            ResPairDirection::Increase => 1,
        }
    }

    fn close_key_parts(
        &self,
        value: ResPairDirection,
        radius: IndexDirectionCriterion,
    ) -> Result<CloseKeyParts, ConfigError> {
        Ok(match radius {
            IndexDirectionCriterion::MustMatch => vec![KeyerPart::<E, C>::key_part(self, value)],
            IndexDirectionCriterion::NeedNotMatch => vec![0, 1],
        })
    }

    #[inline]
    fn get_search_radius(&self, criteria: &C) -> IndexDirectionCriterion {
        criteria.index_direction_criterion()
    }
}

/// Keys entries by their raw index. Only exact lookups are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexKeyerPart;

impl IndexKeyerPart {
    const NAME: &'static str = "index";
}

impl<E: HasIndex, C> KeyerPart<E, C> for IndexKeyerPart {
    type Value = ResIndex;
    type SearchRadius = u32;

    fn get_name(&self) -> &'static str {
        Self::NAME
    }

    #[inline]
    fn get_value(&self, entry: &E) -> ResIndex {
        entry.index()
    }

    #[inline]
    fn key_part(&self, value: ResIndex) -> CellIndex {
        CellIndex::try_from(value).unwrap_or(CellIndex::MAX)
    }

    fn close_key_parts(&self, value: ResIndex, radius: u32) -> Result<CloseKeyParts, ConfigError> {
        if radius != 0 {
            return Err(ConfigError::NonZeroSearchRadius {
                part: Self::NAME,
                radius,
            });
        }
        Ok(vec![KeyerPart::<E, C>::key_part(self, value)])
    }

    #[inline]
    fn get_search_radius(&self, _criteria: &C) -> u32 {
        0
    }
}
