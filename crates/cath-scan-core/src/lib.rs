//! # CATH Scan Core Library
//!
//! Fast structural comparison of protein backbones by matching residue-pair geometry
//! through a bucketed multi-dimensional lattice index.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout.
//!
//! - **[`core`]: The Foundation.** Stateless angle and frame maths, residue and protein
//!   models, and backbone CSV loading.
//!
//! - **[`engine`]: The Logic Core.** Keyers, criteria, lattice stores, strides and the scan
//!   loop itself. An index is built once per [`engine::policy::ScanPolicy`] and is
//!   read-only afterwards, so query rep pairs can be scanned in parallel.
//!
//! - **[`workflows`]: The Public API.** `single_pair` and `all_vs_all` build both sides of a
//!   scan with the standard policy, run it and return the recorded scores with timings.

pub mod core;
pub mod engine;
pub mod workflows;
