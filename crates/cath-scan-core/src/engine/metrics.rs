use std::fmt;
use std::time::Duration;

/// Cost of building one side of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BuildMetrics {
    pub duration: Duration,
    pub num_structures: usize,
    pub num_entries: usize,
    pub approx_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScanMetrics {
    pub query_build: BuildMetrics,
    pub index_build: BuildMetrics,
    pub scan_duration: Duration,
    pub num_matches: u64,
}

impl ScanMetrics {
    pub fn total_duration(&self) -> Duration {
        self.query_build.duration + self.index_build.duration + self.scan_duration
    }
}

impl fmt::Display for ScanMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "query set: {:.3}s ({} entries, ~{} bytes); index: {:.3}s ({} entries, ~{} bytes); scan: {:.3}s ({} matches)",
            self.query_build.duration.as_secs_f64(),
            self.query_build.num_entries,
            self.query_build.approx_bytes,
            self.index_build.duration.as_secs_f64(),
            self.index_build.num_entries,
            self.index_build.approx_bytes,
            self.scan_duration.as_secs_f64(),
            self.num_matches,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_duration_sums_all_phases() {
        let metrics = ScanMetrics {
            query_build: BuildMetrics {
                duration: Duration::from_millis(5),
                ..Default::default()
            },
            index_build: BuildMetrics {
                duration: Duration::from_millis(7),
                ..Default::default()
            },
            scan_duration: Duration::from_millis(11),
            num_matches: 3,
        };
        assert_eq!(metrics.total_duration(), Duration::from_millis(23));
        assert!(metrics.to_string().contains("3 matches"));
    }
}
