use super::config::{CellWidths, ConfigError};
use super::criteria::{QuadCriteria, make_default_quad_criteria};
use super::keyer::parts::{AngleKeyerPart, AxisKeyerPart, IndexDirectionKeyerPart};
use super::keyer::res_pair_keyer::ResPairKeyer;
use super::res_pair::MultiStrucResRepPair;
use super::store::StoreKind;
use super::stride::ScanStride;

pub type ScanKeyer = ResPairKeyer<MultiStrucResRepPair, QuadCriteria>;

/// The immutable configuration shared by an index and the query sets scanned against it.
///
/// Query sets and indices remember the policy they were built from, and a scan refuses to
/// combine structures built from different policy objects.
#[derive(Debug)]
pub struct ScanPolicy {
    keyer: ScanKeyer,
    criteria: QuadCriteria,
    stride: ScanStride,
    store_kind: StoreKind,
}

impl ScanPolicy {
    pub fn new(
        keyer: ScanKeyer,
        criteria: QuadCriteria,
        stride: ScanStride,
        store_kind: StoreKind,
    ) -> Self {
        Self {
            keyer,
            criteria,
            stride,
            store_kind,
        }
    }

    pub fn builder() -> ScanPolicyBuilder {
        ScanPolicyBuilder::new()
    }

    pub fn keyer(&self) -> &ScanKeyer {
        &self.keyer
    }

    pub fn criteria(&self) -> &QuadCriteria {
        &self.criteria
    }

    pub fn stride(&self) -> &ScanStride {
        &self.stride
    }

    pub fn store_kind(&self) -> StoreKind {
        self.store_kind
    }
}

/// The standard eight-part keyer: the four torsions, the index direction and the three
/// view axes.
pub fn make_default_keyer(widths: &CellWidths) -> Result<ScanKeyer, ConfigError> {
    ResPairKeyer::builder()
        .part(AngleKeyerPart::from_phi(widths.angle)?)
        .part(AngleKeyerPart::from_psi(widths.angle)?)
        .part(AngleKeyerPart::to_phi(widths.angle)?)
        .part(AngleKeyerPart::to_psi(widths.angle)?)
        .part(IndexDirectionKeyerPart)
        .part(AxisKeyerPart::x(widths.view)?)
        .part(AxisKeyerPart::y(widths.view)?)
        .part(AxisKeyerPart::z(widths.view)?)
        .build()
}

pub fn make_default_scan_policy() -> Result<ScanPolicy, ConfigError> {
    ScanPolicy::builder()
        .criteria(make_default_quad_criteria())
        .stride(ScanStride::default())
        .build()
}

#[derive(Default)]
pub struct ScanPolicyBuilder {
    keyer: Option<ScanKeyer>,
    cell_widths: Option<CellWidths>,
    criteria: Option<QuadCriteria>,
    stride: Option<ScanStride>,
    store_kind: Option<StoreKind>,
}

impl ScanPolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom keyer instead of the default one built from the cell widths.
    pub fn keyer(mut self, keyer: ScanKeyer) -> Self {
        self.keyer = Some(keyer);
        self
    }
    pub fn cell_widths(mut self, widths: CellWidths) -> Self {
        self.cell_widths = Some(widths);
        self
    }
    pub fn criteria(mut self, criteria: QuadCriteria) -> Self {
        self.criteria = Some(criteria);
        self
    }
    pub fn stride(mut self, stride: ScanStride) -> Self {
        self.stride = Some(stride);
        self
    }
    pub fn store_kind(mut self, kind: StoreKind) -> Self {
        self.store_kind = Some(kind);
        self
    }

    pub fn build(self) -> Result<ScanPolicy, ConfigError> {
        let keyer = match self.keyer {
            Some(keyer) => keyer,
            None => make_default_keyer(&self.cell_widths.unwrap_or_default())?,
        };
        Ok(ScanPolicy {
            keyer,
            criteria: self
                .criteria
                .ok_or(ConfigError::MissingParameter("criteria"))?,
            stride: self.stride.ok_or(ConfigError::MissingParameter("stride"))?,
            store_kind: self.store_kind.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::angle::Angle;

    #[test]
    fn default_policy_uses_default_criteria_stride_and_keyer() {
        let policy = make_default_scan_policy().unwrap();
        assert_eq!(*policy.criteria(), make_default_quad_criteria());
        assert_eq!(*policy.stride(), ScanStride::new(4, 4, 2, 2));
        assert_eq!(policy.store_kind(), StoreKind::Sparse);
        assert_eq!(
            policy.keyer().part_names(),
            vec![
                "from_phi",
                "from_psi",
                "to_phi",
                "to_psi",
                "index_direction",
                "view_x",
                "view_y",
                "view_z"
            ]
        );
    }

    #[test]
    fn builder_requires_criteria_and_stride() {
        let missing_criteria = ScanPolicy::builder().stride(ScanStride::default()).build();
        assert_eq!(
            missing_criteria.unwrap_err(),
            ConfigError::MissingParameter("criteria")
        );

        let missing_stride = ScanPolicy::builder()
            .criteria(QuadCriteria::default())
            .build();
        assert_eq!(
            missing_stride.unwrap_err(),
            ConfigError::MissingParameter("stride")
        );
    }

    #[test]
    fn builder_rejects_invalid_cell_widths_before_building_anything() {
        let widths = CellWidths {
            view: 10.0,
            angle: Angle::from_degrees(0.0),
        };
        let result = ScanPolicy::builder()
            .cell_widths(widths)
            .criteria(QuadCriteria::default())
            .stride(ScanStride::default())
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidAngleCellWidth { part: "from_phi", .. })
        ));
    }

    #[test]
    fn builder_accepts_a_custom_keyer_and_store_kind() {
        let keyer = ResPairKeyer::builder()
            .part(AxisKeyerPart::x(5.0).unwrap())
            .build()
            .unwrap();
        let policy = ScanPolicy::builder()
            .keyer(keyer)
            .criteria(QuadCriteria::default())
            .stride(ScanStride::new(0, 0, 0, 0))
            .store_kind(StoreKind::Dense)
            .build()
            .unwrap();
        assert_eq!(policy.keyer().part_names(), vec!["view_x"]);
        assert_eq!(policy.store_kind(), StoreKind::Dense);
    }
}
