pub mod protein;
pub mod residue;
