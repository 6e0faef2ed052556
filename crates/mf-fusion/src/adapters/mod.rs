//! Adapters module for instruction fusion
//!
//! Concrete collaborators: a table-backed decoder and file-sourced
//! configuration readers.

pub mod file_source;
pub mod table_decoder;

pub use file_source::{load_group_specs, parse_group_specs, read_variant_file, VariantToken};
pub use table_decoder::{DecodeEntry, TableDecoder};
