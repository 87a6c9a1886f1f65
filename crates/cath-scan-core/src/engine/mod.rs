//! # Engine Module
//!
//! The residue-pair scan: turning proteins into keyed residue-pair descriptors, filing them
//! in lattice stores and matching query pairs against them under geometric criteria.
//!
//! ## Architecture
//!
//! - **Pairs** ([`res_pair`]) - Residue-pair geometry and the capabilities keys are read from
//! - **Keys** ([`keyer`]) - Per-dimension keyer parts combined into composite lattice keys
//! - **Matching** ([`criteria`]) - Thresholds deciding whether two pairs match
//! - **Storage** ([`store`]) - Sparse and dense lattice stores
//! - **Striding** ([`stride`]) - Representative residues standing in for their neighbours
//! - **Orchestration** ([`policy`], [`index`], [`query_set`], [`action`]) - Building both
//!   sides of a scan, running it and recording the matches
//! - **Spatial lattice** ([`spatial`]) - The same machinery applied to plain Cα positions
//! - **Support** ([`config`], [`error`], [`progress`], [`cancel`], [`metrics`])
//!
//! ## Key Capabilities
//!
//! - **Lazy close-key enumeration** so wide search windows cost nothing until used
//! - **Parallel scanning** over query rep pairs with the `parallel` feature
//! - **Cooperative cancellation** between query rep pairs

pub mod action;
pub mod cancel;
pub mod config;
pub mod criteria;
pub mod error;
pub mod index;
pub mod keyer;
pub mod metrics;
pub mod policy;
pub mod progress;
pub mod query_set;
pub mod res_pair;
pub mod spatial;
pub mod store;
pub mod stride;
pub mod structure_data;
