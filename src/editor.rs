use crate::codec::{decode_grid_param, encode_grid};
use crate::compiler::{CompiledGrid, compile};
use crate::config::{EditorConfig, cell_count};
use crate::error::{CrosswordError, Result};
use crate::puzzle::Puzzle;
use crate::symmetry::{SymmetryFlags, SymmetryMode, affected_cells};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Tool {
    Black,
    White,
    Grey,
    Bubble,
}

impl Tool {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "b" | "black" => Some(Tool::Black),
            "w" | "white" => Some(Tool::White),
            "g" | "grey" => Some(Tool::Grey),
            "o" | "bubble" => Some(Tool::Bubble),
            _ => None,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, Tool::Black | Tool::White)
    }
}

/// Cosmetic layers handed from the grid designer to the clue editor.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct AestheticHandoff {
    pub size: usize,
    pub sym: SymmetryMode,
    pub grey: Vec<bool>,
    pub bubble: Vec<bool>,
    #[serde(default)]
    pub reset: bool,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct GridEditor {
    pub size: usize,
    pub sym: SymmetryMode,
    pub flags: SymmetryFlags,
    pub blocks: Vec<bool>,
    pub grey: Vec<bool>,
    pub bubble: Vec<bool>,
    pub dirty: bool,
}

impl GridEditor {
    pub fn new(config: EditorConfig) -> Self {
        let cells = config.size * config.size;
        GridEditor {
            size: config.size,
            sym: config.sym,
            flags: config.sym.flags(),
            blocks: vec![false; cells],
            grey: vec![false; cells],
            bubble: vec![false; cells],
            dirty: false,
        }
    }

    /// Restore blocks from an encoded grid, or start blank when the payload
    /// is missing or does not fit the configured size.
    pub fn from_encoded(config: EditorConfig, grid: Option<&str>) -> Self {
        let mut editor = Self::new(config);
        if let Some(raw) = grid {
            match decode_grid_param(raw, config.size) {
                Ok(blocks) => editor.blocks = blocks,
                Err(e) => warn!("ignoring grid payload: {}", e),
            }
        }
        editor
    }

    /// Reopen a saved puzzle for design. The block layer must hold exactly
    /// `size * size` cells; grey/bubble layers of the wrong length are dropped.
    pub fn from_puzzle(puzzle: &Puzzle) -> Result<Self> {
        let cells = cell_count(puzzle.size)?;
        if puzzle.size == 0 || puzzle.blocks.len() != cells {
            return Err(CrosswordError::InvalidGridDimensions {
                expected: cells,
                actual: puzzle.blocks.len(),
            });
        }
        let mut editor = Self::new(EditorConfig {
            size: puzzle.size,
            sym: puzzle.sym,
        });
        editor.blocks = puzzle.blocks.clone();
        if puzzle.grey.len() == cells && puzzle.bubble.len() == cells {
            editor.grey = puzzle.grey.clone();
            editor.bubble = puzzle.bubble.clone();
        }
        Ok(editor)
    }

    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Apply a tool at `index` and return the cells it changed.
    ///
    /// Black and White paint the whole symmetric set. Black also strips grey
    /// and bubble from those cells. Grey and Bubble toggle the clicked cell
    /// alone and do nothing on a block.
    pub fn apply(&mut self, tool: Tool, index: usize) -> Result<Vec<usize>> {
        let touched: Vec<usize> = match tool {
            Tool::Black => {
                let set = affected_cells(index, self.size, self.flags)?;
                for &i in &set {
                    self.blocks[i] = true;
                }
                self.clear_cosmetics(&set);
                set.into_iter().collect()
            }
            Tool::White => {
                let set = affected_cells(index, self.size, self.flags)?;
                for &i in &set {
                    self.blocks[i] = false;
                }
                set.into_iter().collect()
            }
            Tool::Grey | Tool::Bubble => {
                self.check_index(index)?;
                if self.blocks[index] {
                    return Ok(Vec::new());
                }
                let layer = if tool == Tool::Grey {
                    &mut self.grey
                } else {
                    &mut self.bubble
                };
                layer[index] = !layer[index];
                vec![index]
            }
        };

        debug!("{:?} at {} touched {:?}", tool, index, touched);
        self.dirty = true;
        Ok(touched)
    }

    fn clear_cosmetics<'a>(&mut self, cells: impl IntoIterator<Item = &'a usize>) {
        for &i in cells {
            self.grey[i] = false;
            self.bubble[i] = false;
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.cell_count() {
            return Err(CrosswordError::InvalidCellIndex {
                index,
                cells: self.cell_count(),
            });
        }
        Ok(())
    }

    pub fn clear_blocks(&mut self) {
        self.blocks = vec![false; self.cell_count()];
        self.dirty = true;
    }

    pub fn clear_styles(&mut self) {
        self.grey = vec![false; self.cell_count()];
        self.bubble = vec![false; self.cell_count()];
        self.dirty = true;
    }

    pub fn handoff(&self) -> AestheticHandoff {
        AestheticHandoff {
            size: self.size,
            sym: self.sym,
            grey: self.grey.clone(),
            bubble: self.bubble.clone(),
            reset: true,
        }
    }

    /// Take grey/bubble layers from a pending handoff. Applies once: only a
    /// handoff with `reset` set and matching size, symmetry and lengths is
    /// used, and its `reset` flag is cleared afterwards.
    pub fn restore_aesthetics(&mut self, handoff: &mut AestheticHandoff) -> bool {
        let cells = self.cell_count();
        if !handoff.reset
            || handoff.size != self.size
            || handoff.sym != self.sym
            || handoff.grey.len() != cells
            || handoff.bubble.len() != cells
        {
            return false;
        }
        self.grey = handoff.grey.clone();
        self.bubble = handoff.bubble.clone();
        handoff.reset = false;
        true
    }

    pub fn encoded(&self) -> String {
        encode_grid(&self.blocks)
    }

    pub fn compile(&self) -> Result<CompiledGrid> {
        compile(&self.blocks, self.size)
    }

    pub fn label(&self) -> String {
        self.flags.label()
    }

    /// Whether every block's symmetric counterparts are blocks too.
    pub fn is_symmetric(&self) -> bool {
        (0..self.cell_count()).filter(|&i| self.blocks[i]).all(|i| {
            affected_cells(i, self.size, self.flags)
                .map(|set| set.iter().all(|&j| self.blocks[j]))
                .unwrap_or(false)
        })
    }

    /// Plain-text view: `#` block, entry number, or `.` for other white cells.
    pub fn render(&self) -> String {
        let numbers = match self.compile() {
            Ok(grid) => grid.numbers,
            Err(_) => vec![0; self.cell_count()],
        };
        let mut out = String::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let i = row * self.size + col;
                let cell = if self.blocks[i] {
                    "#".to_string()
                } else if numbers[i] > 0 {
                    numbers[i].to_string()
                } else if self.bubble[i] {
                    "o".to_string()
                } else if self.grey[i] {
                    ":".to_string()
                } else {
                    ".".to_string()
                };
                out.push_str(&format!("{:<4}", cell));
            }
            out.push('\n');
        }
        out
    }

    pub fn display(&self) {
        print!("{}", self.render());
    }
}
