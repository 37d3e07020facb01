use crate::config::cell_count;
use crate::error::{CrosswordError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    pub fn prefix(&self) -> char {
        match self {
            Direction::Across => 'A',
            Direction::Down => 'D',
        }
    }

    pub fn from_prefix(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Direction::Across),
            'D' => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }
}

/// A maximal run of white cells in one direction.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Entry {
    pub num: u32,
    pub direction: Direction,
    pub start: usize,
    pub row: usize,
    pub col: usize,
    pub len: usize,
    pub cells: Vec<usize>,
}

impl Entry {
    /// Clue-map key, e.g. `A7` or `D12`.
    pub fn id(&self) -> String {
        format!("{}{}", self.direction.prefix(), self.num)
    }

    pub fn contains(&self, cell: usize) -> bool {
        self.cells.contains(&cell)
    }

    pub fn position_of(&self, cell: usize) -> Option<usize> {
        self.cells.iter().position(|&c| c == cell)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CompiledGrid {
    pub size: usize,
    pub numbers: Vec<u32>,
    pub across: Vec<Entry>,
    pub down: Vec<Entry>,
}

impl CompiledGrid {
    pub fn entries(&self, direction: Direction) -> &[Entry] {
        match direction {
            Direction::Across => &self.across,
            Direction::Down => &self.down,
        }
    }

    pub fn cell_to_across(&self) -> HashMap<usize, &Entry> {
        invert(&self.across)
    }

    pub fn cell_to_down(&self) -> HashMap<usize, &Entry> {
        invert(&self.down)
    }

    /// The entry in `direction` that `cell` belongs to, if any.
    pub fn entry_at(&self, cell: usize, direction: Direction) -> Option<&Entry> {
        self.entries(direction).iter().find(|e| e.contains(cell))
    }

    pub fn entry_by_id(&self, id: &str) -> Option<&Entry> {
        let mut chars = id.trim().chars();
        let direction = Direction::from_prefix(chars.next()?)?;
        let num: u32 = chars.as_str().parse().ok()?;
        self.entries(direction).iter().find(|e| e.num == num)
    }

    /// Entry ids across first, then down, each in numbering order.
    pub fn entry_ids(&self) -> Vec<String> {
        self.across.iter().chain(self.down.iter()).map(Entry::id).collect()
    }

    pub fn entry_count(&self) -> usize {
        self.across.len() + self.down.len()
    }
}

fn invert(entries: &[Entry]) -> HashMap<usize, &Entry> {
    let mut map = HashMap::new();
    for entry in entries {
        for &cell in &entry.cells {
            map.insert(cell, entry);
        }
    }
    map
}

fn collect_right(blocks: &[bool], start: usize, size: usize) -> Vec<usize> {
    let mut cells = vec![start];
    let mut j = start + 1;
    while j % size != 0 && !blocks[j] {
        cells.push(j);
        j += 1;
    }
    cells
}

fn collect_down(blocks: &[bool], start: usize, size: usize) -> Vec<usize> {
    let total = blocks.len();
    let mut cells = vec![start];
    let mut j = start + size;
    while j < total && !blocks[j] {
        cells.push(j);
        j += size;
    }
    cells
}

/// Derive the numbering and the across/down entries of a square grid.
///
/// `blocks` is row-major with `true` marking a block. Cells are numbered in
/// scan order of the cells that start an entry; a cell starting both an
/// across and a down entry gets a single shared number. Single-letter
/// entries are kept.
pub fn compile(blocks: &[bool], size: usize) -> Result<CompiledGrid> {
    let total = cell_count(size)?;
    if size == 0 || blocks.len() != total {
        return Err(CrosswordError::InvalidGridDimensions {
            expected: total,
            actual: blocks.len(),
        });
    }

    let mut numbers = vec![0u32; total];
    let mut across = Vec::new();
    let mut down = Vec::new();
    let mut num = 1u32;

    for i in 0..total {
        if blocks[i] {
            continue;
        }
        let row = i / size;
        let col = i % size;
        let starts_across = col == 0 || blocks[i - 1];
        let starts_down = row == 0 || blocks[i - size];

        if starts_across {
            let cells = collect_right(blocks, i, size);
            if numbers[i] == 0 {
                numbers[i] = num;
            }
            across.push(Entry {
                num: numbers[i],
                direction: Direction::Across,
                start: i,
                row,
                col,
                len: cells.len(),
                cells,
            });
        }
        if starts_down {
            let cells = collect_down(blocks, i, size);
            if numbers[i] == 0 {
                numbers[i] = num;
            }
            down.push(Entry {
                num: numbers[i],
                direction: Direction::Down,
                start: i,
                row,
                col,
                len: cells.len(),
                cells,
            });
        }
        if numbers[i] != 0 {
            num += 1;
        }
    }

    debug!(
        "compiled {}x{} grid: {} across, {} down",
        size,
        size,
        across.len(),
        down.len()
    );

    Ok(CompiledGrid {
        size,
        numbers,
        across,
        down,
    })
}
