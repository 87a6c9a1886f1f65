//! # Core Module
//!
//! Stateless building blocks shared by the scan engine: angle arithmetic, backbone
//! geometry, residue and protein models, and structure loading.
//!
//! ## Architecture
//!
//! - **Geometry** ([`utils`]) - Wrapped angles, dihedrals, local backbone frames and
//!   quaternion frame distances
//! - **Molecular Representation** ([`models`]) - Residues (Cα, frame, φ, ψ) and proteins
//! - **File I/O** ([`io`]) - Reading backbone coordinates from CSV files

pub mod io;
pub mod models;
pub mod utils;
