use crate::config::cell_count;
use crate::error::{CrosswordError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Symmetry token carried in URLs and saved puzzles.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SymmetryMode {
    #[default]
    #[serde(rename = "r")]
    Rotational,
    #[serde(rename = "h")]
    Horizontal,
    #[serde(rename = "v")]
    Vertical,
    All,
    None,
}

impl SymmetryMode {
    pub fn token(&self) -> &'static str {
        match self {
            SymmetryMode::Rotational => "r",
            SymmetryMode::Horizontal => "h",
            SymmetryMode::Vertical => "v",
            SymmetryMode::All => "all",
            SymmetryMode::None => "none",
        }
    }

    pub fn flags(&self) -> SymmetryFlags {
        match self {
            SymmetryMode::None => SymmetryFlags::default(),
            SymmetryMode::All => SymmetryFlags {
                rotational: true,
                horizontal: true,
                vertical: true,
            },
            mode => SymmetryFlags {
                rotational: *mode == SymmetryMode::Rotational,
                horizontal: *mode == SymmetryMode::Horizontal,
                vertical: *mode == SymmetryMode::Vertical,
            },
        }
    }

    /// Parse a token, falling back to `fallback` for anything unrecognised.
    pub fn from_param_lenient(raw: Option<&str>, fallback: SymmetryMode) -> SymmetryMode {
        match raw {
            Some(token) => token.parse().unwrap_or_else(|e| {
                warn!("{}; using '{}'", e, fallback.token());
                fallback
            }),
            None => fallback,
        }
    }
}

impl FromStr for SymmetryMode {
    type Err = CrosswordError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "r" => Ok(SymmetryMode::Rotational),
            "h" => Ok(SymmetryMode::Horizontal),
            "v" => Ok(SymmetryMode::Vertical),
            "all" => Ok(SymmetryMode::All),
            "none" => Ok(SymmetryMode::None),
            _ => Err(CrosswordError::InvalidSymmetryMode(s.to_string())),
        }
    }
}

impl fmt::Display for SymmetryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct SymmetryFlags {
    pub rotational: bool,
    pub horizontal: bool,
    pub vertical: bool,
}

impl SymmetryFlags {
    pub fn label(&self) -> String {
        let mut parts = Vec::new();
        if self.rotational {
            parts.push("Rotational(180°)");
        }
        if self.horizontal {
            parts.push("Horizontal");
        }
        if self.vertical {
            parts.push("Vertical");
        }
        if parts.is_empty() {
            "None".to_string()
        } else {
            parts.join(" + ")
        }
    }
}

pub fn index_to_rc(index: usize, size: usize) -> (usize, usize) {
    (index / size, index % size)
}

pub fn rc_to_index(row: usize, col: usize, size: usize) -> usize {
    row * size + col
}

/// Cells a structural edit at `index` has to touch so the grid keeps its
/// symmetry: the clicked cell plus each enabled counterpart.
pub fn affected_cells(index: usize, size: usize, flags: SymmetryFlags) -> Result<BTreeSet<usize>> {
    let cells = cell_count(size)?;
    if index >= cells {
        return Err(CrosswordError::InvalidCellIndex { index, cells });
    }

    let (row, col) = index_to_rc(index, size);
    let mirrored_row = size - 1 - row;
    let mirrored_col = size - 1 - col;

    let mut set = BTreeSet::new();
    set.insert(index);
    if flags.horizontal {
        set.insert(rc_to_index(mirrored_row, col, size));
    }
    if flags.vertical {
        set.insert(rc_to_index(row, mirrored_col, size));
    }
    if flags.rotational {
        set.insert(rc_to_index(mirrored_row, mirrored_col, size));
    }
    Ok(set)
}
