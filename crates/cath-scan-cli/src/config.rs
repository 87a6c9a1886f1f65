use crate::cli::{ScanArgs, StoreArg};
use crate::error::{CliError, Result};
use cathscan::core::utils::angle::Angle;
use cathscan::engine::config::{CellWidths, CellWidthsBuilder};
use cathscan::engine::criteria::{
    IndexDirectionCriterion, QuadCriteria, TorsionCriteria, ViewCriteria,
    make_default_quad_criteria, parse_quad_criteria,
};
use cathscan::engine::policy::ScanPolicy;
use cathscan::engine::store::StoreKind;
use cathscan::engine::stride::ScanStride;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialCriteriaConfig {
    require_matching_directions: Option<bool>,
    minimum_index_distance: Option<u32>,
    maximum_squared_distance: Option<f32>,
    maximum_frame_angle_degrees: Option<f32>,
    maximum_phi_angle_degrees: Option<f32>,
    maximum_psi_angle_degrees: Option<f32>,
}

impl PartialCriteriaConfig {
    fn over(self, base: &QuadCriteria) -> Result<QuadCriteria> {
        let must_match = self
            .require_matching_directions
            .unwrap_or(base.requires_matching_directions());
        let direction = if must_match {
            IndexDirectionCriterion::MustMatch
        } else {
            IndexDirectionCriterion::NeedNotMatch
        };
        let degrees_or = |value: Option<f32>, fallback: Angle| {
            value.map(Angle::from_degrees).unwrap_or(fallback)
        };
        QuadCriteria::new(
            direction,
            self.minimum_index_distance
                .unwrap_or(base.minimum_index_distance()),
            self.maximum_squared_distance
                .unwrap_or(base.maximum_squared_distance()),
            degrees_or(
                self.maximum_frame_angle_degrees,
                base.maximum_frame_angle_difference(),
            ),
            degrees_or(
                self.maximum_phi_angle_degrees,
                base.maximum_phi_angle_difference(),
            ),
            degrees_or(
                self.maximum_psi_angle_degrees,
                base.maximum_psi_angle_difference(),
            ),
        )
        .map_err(CliError::from)
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialStrideConfig {
    query_from: Option<u32>,
    query_to: Option<u32>,
    index_from: Option<u32>,
    index_to: Option<u32>,
}

impl PartialStrideConfig {
    fn over(self, base: ScanStride) -> ScanStride {
        ScanStride::new(
            self.query_from.unwrap_or(base.query_from),
            self.query_to.unwrap_or(base.query_to),
            self.index_from.unwrap_or(base.index_from),
            self.index_to.unwrap_or(base.index_to),
        )
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialCellWidthsConfig {
    view: Option<f32>,
    angle_degrees: Option<f32>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum StoreSetting {
    Sparse,
    Dense,
}

impl From<StoreSetting> for StoreKind {
    fn from(s: StoreSetting) -> Self {
        match s {
            StoreSetting::Sparse => StoreKind::Sparse,
            StoreSetting::Dense => StoreKind::Dense,
        }
    }
}

impl From<StoreArg> for StoreKind {
    fn from(s: StoreArg) -> Self {
        match s {
            StoreArg::Sparse => StoreKind::Sparse,
            StoreArg::Dense => StoreKind::Dense,
        }
    }
}

/// Scan settings as read from a TOML file; anything left out falls back to the defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialScanConfig {
    criteria: Option<PartialCriteriaConfig>,
    stride: Option<PartialStrideConfig>,
    cell_widths: Option<PartialCellWidthsConfig>,
    store: Option<StoreSetting>,
}

impl PartialScanConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading scan configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads the file named by `--config`, if any.
    pub fn load(args: &ScanArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Builds the scan policy; command-line flags win over the file, which wins over the
    /// defaults.
    pub fn merge_with_cli(self, args: &ScanArgs) -> Result<ScanPolicy> {
        let criteria = match &args.criteria {
            Some(text) => {
                parse_quad_criteria(text).map_err(|source| CliError::Criteria {
                    text: text.clone(),
                    source,
                })?
            }
            None => self
                .criteria
                .unwrap_or_default()
                .over(&make_default_quad_criteria())?,
        };

        let stride = match args.stride.as_deref() {
            Some(&[query_from, query_to, index_from, index_to]) => {
                ScanStride::new(query_from, query_to, index_from, index_to)
            }
            Some(other) => {
                return Err(CliError::Argument(format!(
                    "--stride takes exactly four values, got {}",
                    other.len()
                )));
            }
            None => self
                .stride
                .unwrap_or_default()
                .over(ScanStride::default()),
        };

        let cell_widths = Self::merge_cell_widths(self.cell_widths.unwrap_or_default())?;

        let store_kind = args
            .store
            .map(StoreKind::from)
            .or(self.store.map(StoreKind::from))
            .unwrap_or_default();

        debug!(
            %criteria,
            ?stride,
            ?cell_widths,
            %store_kind,
            "Resolved scan policy settings."
        );

        ScanPolicy::builder()
            .criteria(criteria)
            .stride(stride)
            .cell_widths(cell_widths)
            .store_kind(store_kind)
            .build()
            .map_err(CliError::from)
    }

    fn merge_cell_widths(partial: PartialCellWidthsConfig) -> Result<CellWidths> {
        let defaults = CellWidths::default();
        CellWidthsBuilder::new()
            .view(partial.view.unwrap_or(defaults.view))
            .angle(
                partial
                    .angle_degrees
                    .map(Angle::from_degrees)
                    .unwrap_or(defaults.angle),
            )
            .build()
            .map_err(CliError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use cathscan::engine::config::ConfigError;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn scan_args(extra: &[&str]) -> ScanArgs {
        let mut argv = vec!["cath-scan", "scan", "--query", "a.csv"];
        argv.extend_from_slice(extra);
        let Commands::Scan(args) = Cli::try_parse_from(argv).unwrap().command;
        args
    }

    #[test]
    fn empty_configuration_gives_the_default_policy() {
        let policy = PartialScanConfig::default()
            .merge_with_cli(&scan_args(&[]))
            .unwrap();
        assert_eq!(*policy.criteria(), make_default_quad_criteria());
        assert_eq!(*policy.stride(), ScanStride::default());
        assert_eq!(policy.store_kind(), StoreKind::Sparse);
        assert_eq!(policy.keyer().arity(), 8);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.toml");
        fs::write(
            &path,
            r#"
store = "dense"

[criteria]
minimum-index-distance = 5
maximum-squared-distance = 12.5
require-matching-directions = false

[stride]
query-from = 1
index-to = 0

[cell-widths]
view = 6.0
angle-degrees = 90.0
"#,
        )
        .unwrap();

        let args = scan_args(&["--config", path.to_str().unwrap()]);
        let policy = PartialScanConfig::load(&args)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        let criteria = policy.criteria();
        assert_eq!(criteria.minimum_index_distance(), 5);
        assert_eq!(criteria.maximum_squared_distance(), 12.5);
        assert!(!criteria.requires_matching_directions());
        assert_eq!(
            criteria.maximum_phi_angle_difference(),
            make_default_quad_criteria().maximum_phi_angle_difference()
        );
        assert_eq!(*policy.stride(), ScanStride::new(1, 4, 2, 0));
        assert_eq!(policy.store_kind(), StoreKind::Dense);
    }

    #[test]
    fn cli_flags_override_file_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.toml");
        fs::write(&path, "store = \"dense\"\n[stride]\nquery-from = 9\n").unwrap();

        let args = scan_args(&[
            "--config",
            path.to_str().unwrap(),
            "--store",
            "sparse",
            "--stride",
            "0,0,0,0",
            "--criteria",
            "dist_co=12,dirn_co=0,index_dist_co=-7,frame_ang_co=30,phi_ang_co=45,psi_ang_co=45",
        ]);
        let policy = PartialScanConfig::load(&args)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(policy.store_kind(), StoreKind::Sparse);
        assert_eq!(*policy.stride(), ScanStride::new(0, 0, 0, 0));
        assert_eq!(policy.criteria().minimum_index_distance(), 7);
        assert_eq!(policy.criteria().maximum_squared_distance(), 12.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = PartialScanConfig::from_toml("[stride]\nquery-step = 3\n");
        assert!(result.is_err());
        let result = PartialScanConfig::from_toml("colour = \"blue\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_values_surface_as_configuration_errors() {
        let config = PartialScanConfig::from_toml("[cell-widths]\nview = -1.0\n").unwrap();
        let result = config.merge_with_cli(&scan_args(&[]));
        assert!(matches!(
            result,
            Err(CliError::Config(ConfigError::InvalidCellWidth { .. }))
        ));

        let config = PartialScanConfig::from_toml("[criteria]\nmaximum-squared-distance = -4.0\n")
            .unwrap();
        let result = config.merge_with_cli(&scan_args(&[]));
        assert!(matches!(
            result,
            Err(CliError::Config(ConfigError::InvalidCriterion { .. }))
        ));
    }

    #[test]
    fn malformed_criteria_flag_keeps_the_parse_error() {
        let result =
            PartialScanConfig::default().merge_with_cli(&scan_args(&["--criteria", "dist=1"]));
        match result {
            Err(CliError::Criteria { text, source }) => {
                assert_eq!(text, "dist=1");
                assert_eq!(source, ConfigError::MissingParameter("index_dist"));
            }
            other => panic!("expected a criteria error, got {other:?}"),
        }
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let args = scan_args(&["--config", "/nonexistent/scan.toml"]);
        assert!(matches!(PartialScanConfig::load(&args), Err(CliError::Io(_))));
    }
}
