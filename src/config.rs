use crate::error::{CrosswordError, Result};
use crate::symmetry::SymmetryMode;
use serde::{Deserialize, Serialize};
use std::env;

pub const MIN_SIZE: usize = 3;
pub const MAX_SIZE: usize = 21;
pub const DEFAULT_SIZE: usize = 15;
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Grid size and symmetry picked on the create form.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct EditorConfig {
    pub size: usize,
    pub sym: SymmetryMode,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            size: DEFAULT_SIZE,
            sym: SymmetryMode::default(),
        }
    }
}

impl EditorConfig {
    /// Build from raw query parameters. Never fails: bad sizes fall back to
    /// the default and are clamped, unknown symmetry tokens become `r`.
    pub fn from_params(size: Option<&str>, sym: Option<&str>) -> Self {
        EditorConfig {
            size: clamp_size(parse_int(size, DEFAULT_SIZE as i64)),
            sym: SymmetryMode::from_param_lenient(sym, SymmetryMode::default()),
        }
    }
}

/// Lenient integer parse: decimals truncate, garbage yields `default`.
pub fn parse_int(raw: Option<&str>, default: i64) -> i64 {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default;
    };
    match s.parse::<f64>() {
        Ok(n) if n.is_finite() => n.trunc() as i64,
        _ => default,
    }
}

/// Number of cells in a `size` x `size` grid, refusing sizes whose square
/// overflows.
pub fn cell_count(size: usize) -> Result<usize> {
    size.checked_mul(size).ok_or(CrosswordError::GridTooLarge { size })
}

pub fn clamp_size(n: i64) -> usize {
    n.clamp(MIN_SIZE as i64, MAX_SIZE as i64) as usize
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl ServerConfig {
    /// Reads `CROSSWORD_ADDR`, defaulting to the local port 3000.
    pub fn from_env() -> Self {
        ServerConfig {
            bind_addr: env::var("CROSSWORD_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string()),
        }
    }
}
