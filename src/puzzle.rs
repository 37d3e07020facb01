use crate::codec::{decode_grid, encode_grid};
use crate::compiler::{CompiledGrid, compile};
use crate::config::cell_count;
use crate::editor::GridEditor;
use crate::error::{CrosswordError, Result};
use crate::symmetry::SymmetryMode;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

lazy_static! {
    static ref LETTER_REGEX: Regex = Regex::new(r"[A-Za-z]").unwrap();
    static ref FILLED_REGEX: Regex = Regex::new(r"^[A-Z]$").unwrap();
    static ref ENTRY_ID_REGEX: Regex = Regex::new(r"^[AD]\d+$").unwrap();
    static ref REL_SPLIT_REGEX: Regex = Regex::new(r"[,\s]+").unwrap();
}

/// Clue text keyed by entry id (`A1`, `D12`, ...).
pub type ClueMap = BTreeMap<String, String>;
/// One-way relations: entry id to the ids it points at.
pub type RelMap = BTreeMap<String, Vec<String>>;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Puzzle {
    pub id: String,
    pub title: String,
    pub size: usize,
    pub sym: SymmetryMode,
    pub grid_b64: String,
    pub blocks: Vec<bool>,
    pub fills: Vec<String>,
    pub clues: ClueMap,
    pub rel: RelMap,
    #[serde(default)]
    pub grey: Vec<bool>,
    #[serde(default)]
    pub bubble: Vec<bool>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub first_solve_ms: Option<u64>,
}

impl Puzzle {
    pub fn new(title: &str, size: usize, sym: SymmetryMode, blocks: Vec<bool>) -> Result<Self> {
        let cells = cell_count(size)?;
        if size == 0 || blocks.len() != cells {
            return Err(CrosswordError::InvalidGridDimensions {
                expected: cells,
                actual: blocks.len(),
            });
        }
        Ok(Puzzle {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            size,
            sym,
            grid_b64: encode_grid(&blocks),
            blocks,
            fills: vec![String::new(); cells],
            clues: ClueMap::new(),
            rel: RelMap::new(),
            grey: vec![false; cells],
            bubble: vec![false; cells],
            updated_at: Utc::now(),
            code: None,
            first_solve_ms: None,
        })
    }

    pub fn from_grid(size: usize, sym: SymmetryMode, grid_b64: &str) -> Result<Self> {
        let blocks = decode_grid(grid_b64, size)?;
        Self::new("", size, sym, blocks)
    }

    /// Start authoring from a designed grid, keeping its cosmetic layers.
    pub fn from_editor(editor: &GridEditor, title: &str) -> Result<Self> {
        let mut puzzle = Self::new(title, editor.size, editor.sym, editor.blocks.clone())?;
        puzzle.grey = editor.grey.clone();
        puzzle.bubble = editor.bubble.clone();
        Ok(puzzle)
    }

    pub fn compile(&self) -> Result<CompiledGrid> {
        compile(&self.blocks, self.size)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Store the first letter of `text` (uppercased) at `index`, or clear the
    /// cell when `text` holds no letter. Blocks are left alone.
    pub fn set_letter(&mut self, index: usize, text: &str) -> Result<bool> {
        if index >= self.blocks.len() {
            return Err(CrosswordError::InvalidCellIndex {
                index,
                cells: self.blocks.len(),
            });
        }
        if self.blocks[index] {
            return Ok(false);
        }
        let letter = canonical_letter(text);
        if self.fills[index] == letter {
            return Ok(false);
        }
        self.fills[index] = letter;
        self.touch();
        Ok(true)
    }

    pub fn set_clue(&mut self, id: &str, text: &str) {
        self.clues.insert(id.trim().to_uppercase(), text.to_string());
        self.touch();
    }

    pub fn clue(&self, id: &str) -> Option<&str> {
        self.clues.get(&id.trim().to_uppercase()).map(String::as_str)
    }

    /// Replace the relations of `id` with the ids parsed from `text`.
    pub fn set_relations(&mut self, id: &str, text: &str) {
        let key = id.trim().to_uppercase();
        let list = parse_rel_list(text);
        if list.is_empty() {
            self.rel.remove(&key);
        } else {
            self.rel.insert(key, list);
        }
        self.touch();
    }

    pub fn related_entries(&self, id: &str) -> Vec<String> {
        self.rel
            .get(&id.trim().to_uppercase())
            .cloned()
            .unwrap_or_default()
    }

    /// Cells of every entry `id` points at. Relations are not reciprocal.
    pub fn related_cells(&self, id: &str, grid: &CompiledGrid) -> BTreeSet<usize> {
        self.related_entries(id)
            .iter()
            .filter_map(|to| grid.entry_by_id(to))
            .flat_map(|e| e.cells.iter().copied())
            .collect()
    }

    pub fn all_cells_filled(&self) -> bool {
        cells_filled(&self.blocks, &self.fills)
    }

    pub fn all_clues_filled(&self, grid: &CompiledGrid) -> bool {
        clues_filled(grid, &self.clues)
    }

    pub fn is_complete(&self) -> Result<bool> {
        let grid = self.compile()?;
        Ok(is_complete(&self.blocks, &self.fills, &self.clues, &grid))
    }

    /// Complete and titled, the bar for opening the demo view.
    pub fn is_ready_to_review(&self) -> Result<bool> {
        Ok(!self.title.trim().is_empty() && self.is_complete()?)
    }
}

pub fn canonical_letter(text: &str) -> String {
    LETTER_REGEX
        .find(text)
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_default()
}

pub fn is_filled_letter(fill: &str) -> bool {
    FILLED_REGEX.is_match(fill)
}

pub fn cells_filled(blocks: &[bool], fills: &[String]) -> bool {
    blocks.len() == fills.len()
        && blocks
            .iter()
            .zip(fills)
            .all(|(&block, fill)| block || is_filled_letter(fill))
}

pub fn clues_filled(grid: &CompiledGrid, clues: &ClueMap) -> bool {
    grid.entry_ids().iter().all(|id| {
        clues
            .get(id)
            .map(|text| !text.trim().is_empty())
            .unwrap_or(false)
    })
}

/// Every white cell holds one uppercase letter and every entry has a clue.
pub fn is_complete(blocks: &[bool], fills: &[String], clues: &ClueMap, grid: &CompiledGrid) -> bool {
    cells_filled(blocks, fills) && clues_filled(grid, clues)
}

/// Split on commas/whitespace, uppercase, and keep well-formed entry ids.
pub fn parse_rel_list(text: &str) -> Vec<String> {
    REL_SPLIT_REGEX
        .split(text)
        .map(|s| s.trim().to_uppercase())
        .filter(|s| ENTRY_ID_REGEX.is_match(s))
        .collect()
}

/// Next free `"Title (k)"` given the titles already in use.
pub fn next_numbered_title<'a>(existing: impl IntoIterator<Item = &'a str>, base: &str) -> String {
    let trimmed = base.trim();
    let title = if trimmed.is_empty() { "Untitled" } else { trimmed };
    let pattern = format!(r"(?i)^{}(?: \((\d+)\))?$", regex::escape(title));
    let Ok(rx) = Regex::new(&pattern) else {
        return format!("{} (1)", title);
    };

    let mut max = 0u32;
    for existing_title in existing {
        if let Some(caps) = rx.captures(existing_title) {
            let n = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0);
            max = max.max(n);
        }
    }
    format!("{} ({})", title, max + 1)
}
