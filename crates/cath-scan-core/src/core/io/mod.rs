//! Loading of protein backbones from tabular coordinate files.

pub mod backbone_csv;
