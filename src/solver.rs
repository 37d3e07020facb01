use crate::compiler::{CompiledGrid, Direction, Entry, compile};
use crate::error::{CrosswordError, Result};
use crate::puzzle::{Puzzle, canonical_letter, cells_filled, is_filled_letter};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Elapsed-time bookkeeping driven by caller-supplied clock readings (ms).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct SolveTimer {
    pub elapsed_base_ms: u64,
    pub started_at_ms: Option<u64>,
}

impl SolveTimer {
    pub fn is_running(&self) -> bool {
        self.started_at_ms.is_some()
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.started_at_ms.is_none() {
            self.started_at_ms = Some(now_ms);
        }
    }

    pub fn pause(&mut self, now_ms: u64) {
        if let Some(start) = self.started_at_ms.take() {
            self.elapsed_base_ms += now_ms.saturating_sub(start);
        }
    }

    pub fn elapsed(&self, now_ms: u64) -> u64 {
        match self.started_at_ms {
            Some(start) => self.elapsed_base_ms + now_ms.saturating_sub(start),
            None => self.elapsed_base_ms,
        }
    }

    pub fn reset(&mut self) {
        *self = SolveTimer::default();
    }
}

/// `h:mm:ss`
pub fn format_elapsed(ms: u64) -> String {
    let total = ms / 1000;
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

#[derive(Clone, Debug)]
pub struct SolveSession {
    pub size: usize,
    pub blocks: Vec<bool>,
    pub grid: CompiledGrid,
    pub fills: Vec<String>,
    pub active_cell: usize,
    pub direction: Direction,
    pub timer: SolveTimer,
    answers: Option<Vec<String>>,
}

impl SolveSession {
    pub fn new(blocks: Vec<bool>, size: usize) -> Result<Self> {
        let grid = compile(&blocks, size)?;
        let active_cell = blocks.iter().position(|&b| !b).unwrap_or(0);
        Ok(SolveSession {
            size,
            fills: vec![String::new(); blocks.len()],
            blocks,
            grid,
            active_cell,
            direction: Direction::Across,
            timer: SolveTimer::default(),
            answers: None,
        })
    }

    /// Blank session whose answer key is the puzzle's authored fills.
    pub fn from_puzzle(puzzle: &Puzzle) -> Result<Self> {
        let mut session = Self::new(puzzle.blocks.clone(), puzzle.size)?;
        session.answers = Some(puzzle.fills.clone());
        Ok(session)
    }

    pub fn active_entry(&self) -> Option<&Entry> {
        if self.blocks.get(self.active_cell).copied().unwrap_or(true) {
            return None;
        }
        self.grid.entry_at(self.active_cell, self.direction)
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggle();
    }

    /// Select a cell. Clicking the active cell again flips direction when it
    /// sits in both an across and a down entry.
    pub fn click(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if self.blocks[index] {
            return Ok(());
        }
        let has_across = self.grid.entry_at(index, Direction::Across).is_some();
        let has_down = self.grid.entry_at(index, Direction::Down).is_some();

        if index == self.active_cell && has_across && has_down {
            self.toggle_direction();
            return Ok(());
        }
        if self.direction == Direction::Across && !has_across && has_down {
            self.direction = Direction::Down;
        } else if self.direction == Direction::Down && !has_down && has_across {
            self.direction = Direction::Across;
        }
        self.active_cell = index;
        Ok(())
    }

    /// Step `delta` cells along the entry in `direction`; false at its ends.
    pub fn move_within_entry(&mut self, direction: Direction, delta: isize) -> bool {
        let Some(entry) = self.grid.entry_at(self.active_cell, direction) else {
            return false;
        };
        let Some(pos) = entry.position_of(self.active_cell) else {
            return false;
        };
        let next = pos as isize + delta;
        if next < 0 || next as usize >= entry.cells.len() {
            return false;
        }
        self.active_cell = entry.cells[next as usize];
        self.direction = direction;
        true
    }

    /// Jump to the start of the entry after the active one, wrapping around.
    pub fn move_to_next_entry(&mut self, direction: Direction) {
        let list = self.grid.entries(direction);
        if list.is_empty() {
            return;
        }
        let current = self
            .active_entry()
            .map(|e| e.num)
            .unwrap_or(list[0].num);
        let idx = list.iter().position(|e| e.num == current).unwrap_or(0);
        let next = list[(idx + 1) % list.len()].start;
        self.direction = direction;
        self.active_cell = next;
    }

    pub fn type_letter(&mut self, text: &str) {
        if self.blocks[self.active_cell] {
            return;
        }
        let letter = canonical_letter(text);
        let advance = !letter.is_empty();
        self.fills[self.active_cell] = letter;
        if advance {
            self.move_within_entry(self.direction, 1);
        }
    }

    pub fn backspace(&mut self) {
        if self.blocks[self.active_cell] {
            return;
        }
        self.fills[self.active_cell].clear();
        self.move_within_entry(self.direction, -1);
    }

    pub fn has_any_input(&self) -> bool {
        self.blocks
            .iter()
            .zip(&self.fills)
            .any(|(&block, fill)| !block && is_filled_letter(fill))
    }

    pub fn is_solved(&self) -> bool {
        cells_filled(&self.blocks, &self.fills)
    }

    /// White cells whose fill disagrees with the answer key. Empty cells are
    /// not reported. Without a key nothing is wrong.
    pub fn check(&self) -> Vec<usize> {
        let Some(answers) = &self.answers else {
            return Vec::new();
        };
        (0..self.fills.len())
            .filter(|&i| {
                !self.blocks[i]
                    && !self.fills[i].is_empty()
                    && answers.get(i).is_none_or(|answer| *answer != self.fills[i])
            })
            .collect()
    }

    /// Start the clock on first input and stop it once the grid is full.
    pub fn sync_timer(&mut self, now_ms: u64) {
        if self.is_solved() {
            if self.timer.is_running() {
                self.timer.pause(now_ms);
                info!("solved in {}", format_elapsed(self.timer.elapsed_base_ms));
            }
        } else if self.has_any_input() {
            self.timer.start(now_ms);
        }
    }

    pub fn reset(&mut self) {
        self.fills = vec![String::new(); self.blocks.len()];
        self.active_cell = self.blocks.iter().position(|&b| !b).unwrap_or(0);
        self.direction = Direction::Across;
        self.timer.reset();
        debug!("solve session reset");
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.blocks.len() {
            return Err(CrosswordError::InvalidCellIndex {
                index,
                cells: self.blocks.len(),
            });
        }
        Ok(())
    }
}
