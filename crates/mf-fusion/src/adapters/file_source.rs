//! File-sourced configuration
//!
//! Two formats:
//!
//! - Variant files: one instruction per line. The first word of a line is
//!   either a hex encoding (`0x0002b537`) or a mnemonic; anything after it
//!   (operands, assembler text) is ignored. `#` starts a comment.
//!
//!   ```text
//!   # lui/addi constant materialization
//!   0x000102b7   lui   t0, 0x10
//!   addi t0, t0, 4
//!   ```
//!
//! - Group-spec files: JSON, either an array of `GroupSpec` or an object
//!   with a `groups` array. Relative variant-file paths are resolved
//!   against the group-spec file's directory.

use crate::domain::errors::ConfigError;
use crate::domain::value_objects::{GroupSpec, Opcode, VariantSource};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One entry of a variant file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VariantToken {
    Opcode(Opcode),
    Mnemonic(String),
}

/// Parse the text of a variant file. Errors carry the 1-based line number.
pub fn parse_variant_text(text: &str) -> Result<Vec<VariantToken>, String> {
    let mut tokens = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default();
        let Some(word) = content.split_whitespace().next() else {
            continue;
        };

        let token = match word
            .strip_prefix("0x")
            .or_else(|| word.strip_prefix("0X"))
        {
            Some(hex) => {
                let raw = u32::from_str_radix(&hex.replace('_', ""), 16)
                    .map_err(|e| format!("line {}: bad opcode '{}': {}", lineno + 1, word, e))?;
                VariantToken::Opcode(Opcode(raw))
            }
            None => VariantToken::Mnemonic(word.trim_end_matches(',').to_ascii_lowercase()),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// Read and parse a variant file.
pub fn read_variant_file(path: &Path) -> Result<Vec<VariantToken>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| source_error(path, e.to_string()))?;
    let tokens = parse_variant_text(&text).map_err(|reason| source_error(path, reason))?;
    debug!(path = %path.display(), entries = tokens.len(), "read variant file");
    Ok(tokens)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GroupSpecFile {
    List(Vec<GroupSpec>),
    Wrapped { groups: Vec<GroupSpec> },
}

/// Parse group specs from JSON text.
pub fn parse_group_specs(json: &str) -> Result<Vec<GroupSpec>, serde_json::Error> {
    Ok(match serde_json::from_str(json)? {
        GroupSpecFile::List(groups) | GroupSpecFile::Wrapped { groups } => groups,
    })
}

/// Load group specs from a JSON file.
pub fn load_group_specs(path: &Path) -> Result<Vec<GroupSpec>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| source_error(path, e.to_string()))?;
    let mut specs = parse_group_specs(&text).map_err(|e| source_error(path, e.to_string()))?;

    if let Some(base) = path.parent() {
        for source in specs.iter_mut().flat_map(|s| s.variants.iter_mut()) {
            if let VariantSource::File(file) = source {
                if file.is_relative() {
                    *file = base.join(&*file);
                }
            }
        }
    }

    debug!(path = %path.display(), groups = specs.len(), "loaded group specs");
    Ok(specs)
}

fn source_error(path: &Path, reason: String) -> ConfigError {
    ConfigError::Source {
        path: path.display().to_string(),
        reason,
    }
}
