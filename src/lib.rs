/*!
# Crossword

Design a crossword grid, write its clues, then solve or publish it.

## Overview

The heart of the crate is the grid compiler: given a square block/white
layout it derives the standard crossword numbering and the ordered across
and down entries with their member cells. Every other part (the grid
designer, the clue editor, the solver and the web service) asks the same
compiler for numbering and entries instead of re-deriving them.

## Architecture

### Core
- **Grid Compiler** - Numbering plus across/down entries from a block layout
- **Symmetry Engine** - Cells a block/white edit must touch to keep the grid
  rotationally or mirror symmetric

### Authoring Layer
- **Grid Editor** - Block/white painting under symmetry, grey and bubble
  cosmetic layers that never affect numbering
- **Puzzle** - Fills, clues keyed by entry id (`A1`, `D12`), one-way
  relations between entries, completeness checks
- **Solve Session** - Cursor movement within and between entries, letter
  entry, solve detection and timing

### Persistence Layer
- Key-value store capability (in memory or a JSON file) for drafts,
  saved works and published codes
- Gzip-compressed bincode puzzle snapshots
- Base64 grid transport encoding (`'0'`/`'1'` per cell, row-major)

### Web Layer (feature `web`)
- axum routes for the puzzle registry, compile and symmetry

## Modules

- **compiler**: numbering and entries
- **symmetry**: symmetry modes, flags and affected cells
- **editor**: grid design surface
- **puzzle**: authoring model and completeness
- **solver**: solve session and timer
- **codec**: grid encoding, hashes and share codes
- **config**: size/symmetry parameters and server settings
- **store**: key-value stores and the work library
- **saving**: puzzle snapshot files
- **registry**: server-side puzzle registry
- **app**: HTTP routes
*/

pub mod codec;
pub mod compiler;
pub mod config;
pub mod editor;
pub mod error;
pub mod puzzle;
pub mod registry;
pub mod saving;
pub mod solver;
pub mod store;
pub mod symmetry;

#[cfg(feature = "web")]
pub mod app;

/// Re-export the everyday types so callers can `use crossword::*`
pub use codec::*;
pub use compiler::*;
pub use editor::*;
pub use error::CrosswordError;
pub use puzzle::*;
pub use saving::*;
pub use solver::*;
pub use store::*;
pub use symmetry::*;
