//! # Workflows Module
//!
//! Top-level entry points that take loaded proteins, build both sides of a scan with a
//! [`ScanPolicy`](crate::engine::policy::ScanPolicy), run it and hand back the recorded
//! scores together with timing metrics.
//!
//! - **Single pair** ([`single_pair`]) - Exactly one query against exactly one match
//!   structure; anything else is rejected before any work starts.
//! - **All versus all** ([`all_vs_all`]) - Every query structure against every match
//!   structure, including a list against itself.

pub mod all_vs_all;
pub mod single_pair;

use crate::engine::action::RecordScoresScanAction;
use crate::engine::metrics::ScanMetrics;

/// Recorded scores and the timings of the run that produced them.
pub type ScanOutcome = (RecordScoresScanAction, ScanMetrics);
