use crate::codec::{decode_grid, generate_code};
use crate::config::cell_count;
use crate::error::{CrosswordError, Result};
use crate::puzzle::{ClueMap, RelMap};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleStatus {
    #[default]
    Draft,
    Published,
}

/// A shared puzzle as held by the server, addressed by its short code.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct PuzzleRecord {
    pub code: String,
    pub title: String,
    pub status: PuzzleStatus,
    pub rows: usize,
    pub cols: usize,
    pub grid_b64: Option<String>,
    pub clues: ClueMap,
    pub rel: RelMap,
    pub sym: String,
    pub grey: Option<Vec<bool>>,
    pub bubble: Option<Vec<bool>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    seq: u64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct PuzzleSummary {
    pub code: String,
    pub title: String,
    pub status: PuzzleStatus,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct NewPuzzle {
    pub code: Option<String>,
    pub title: Option<String>,
    pub status: Option<PuzzleStatus>,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub grid_b64: Option<String>,
    pub clues: Option<ClueMap>,
    pub sym: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct PuzzleUpdate {
    pub title: Option<String>,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub grid_b64: Option<String>,
    pub clues: Option<ClueMap>,
    pub rel: Option<RelMap>,
    pub sym: Option<String>,
    pub grey: Option<Vec<bool>>,
    pub bubble: Option<Vec<bool>>,
    pub status: Option<PuzzleStatus>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PublishRequest {
    pub title: String,
    pub rows: usize,
    pub cols: usize,
    pub grid_b64: String,
    #[serde(default)]
    pub clues: ClueMap,
    pub rel: Option<RelMap>,
    pub sym: Option<String>,
    pub grey: Option<Vec<bool>>,
    pub bubble: Option<Vec<bool>>,
}

/// Codes are case-insensitive and stored uppercase.
pub fn normalize_code(raw: &str) -> Result<String> {
    let code = raw.trim().to_uppercase();
    if code.is_empty() {
        return Err(CrosswordError::InvalidPayload("missing_code".to_string()));
    }
    Ok(code)
}

fn check_grid(grid_b64: &str, rows: usize, cols: usize) -> Result<()> {
    if rows != cols {
        return Err(CrosswordError::InvalidGridDimensions {
            expected: cell_count(rows)?,
            actual: rows.saturating_mul(cols),
        });
    }
    decode_grid(grid_b64, rows).map(|_| ())
}

#[derive(Debug, Default)]
pub struct PuzzleRegistry {
    records: BTreeMap<String, PuzzleRecord>,
    next_seq: u64,
}

impl PuzzleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn bump(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Newest first.
    pub fn list_recent(&self, limit: usize) -> Vec<PuzzleSummary> {
        let mut records: Vec<&PuzzleRecord> = self.records.values().collect();
        records.sort_by(|a, b| b.seq.cmp(&a.seq));
        records
            .into_iter()
            .take(limit)
            .map(|r| PuzzleSummary {
                code: r.code.clone(),
                title: r.title.clone(),
                status: r.status,
            })
            .collect()
    }

    pub fn create(&mut self, body: NewPuzzle) -> Result<String> {
        let code = match body.code.as_deref() {
            Some(raw) if !raw.trim().is_empty() => normalize_code(raw)?,
            _ => self.fresh_code(),
        };
        if self.records.contains_key(&code) {
            return Err(CrosswordError::InvalidPayload(format!("code {} already exists", code)));
        }
        let rows = body.rows.unwrap_or(15);
        let cols = body.cols.unwrap_or(15);
        if let Some(grid) = &body.grid_b64 {
            check_grid(grid, rows, cols)?;
        }

        let now = Utc::now();
        let seq = self.bump();
        self.records.insert(
            code.clone(),
            PuzzleRecord {
                code: code.clone(),
                title: body.title.unwrap_or_else(|| "Untitled".to_string()),
                status: body.status.unwrap_or_default(),
                rows,
                cols,
                grid_b64: body.grid_b64,
                clues: body.clues.unwrap_or_default(),
                rel: RelMap::new(),
                sym: body.sym.unwrap_or_else(|| "r".to_string()),
                grey: None,
                bubble: None,
                created_at: now,
                updated_at: now,
                seq,
            },
        );
        info!("created puzzle {}", code);
        Ok(code)
    }

    fn fresh_code(&self) -> String {
        loop {
            let code = generate_code();
            if !self.records.contains_key(&code) {
                return code;
            }
        }
    }

    pub fn get(&self, code: &str) -> Result<&PuzzleRecord> {
        let code = normalize_code(code)?;
        self.records
            .get(&code)
            .ok_or(CrosswordError::NotFound(code))
    }

    pub fn update(&mut self, code: &str, update: PuzzleUpdate) -> Result<&PuzzleRecord> {
        let code = normalize_code(code)?;
        let record = self
            .records
            .get_mut(&code)
            .ok_or_else(|| CrosswordError::NotFound(code.clone()))?;

        let rows = update.rows.unwrap_or(record.rows);
        let cols = update.cols.unwrap_or(record.cols);
        if let Some(grid) = update.grid_b64.as_ref().or(record.grid_b64.as_ref()) {
            if update.grid_b64.is_some() || rows != record.rows || cols != record.cols {
                check_grid(grid, rows, cols)?;
            }
        }

        if let Some(title) = update.title {
            record.title = title;
        }
        record.rows = rows;
        record.cols = cols;
        if update.grid_b64.is_some() {
            record.grid_b64 = update.grid_b64;
        }
        if let Some(clues) = update.clues {
            record.clues = clues;
        }
        if let Some(rel) = update.rel {
            record.rel = rel;
        }
        if let Some(sym) = update.sym {
            record.sym = sym;
        }
        if update.grey.is_some() {
            record.grey = update.grey;
        }
        if update.bubble.is_some() {
            record.bubble = update.bubble;
        }
        if let Some(status) = update.status {
            record.status = status;
        }
        record.updated_at = Utc::now();
        Ok(record)
    }

    /// Insert or replace the puzzle under `code` as published.
    pub fn publish(&mut self, code: &str, body: PublishRequest) -> Result<String> {
        let code = normalize_code(code)?;
        if body.title.trim().is_empty() {
            return Err(CrosswordError::InvalidPayload("missing title".to_string()));
        }
        check_grid(&body.grid_b64, body.rows, body.cols)?;

        let now = Utc::now();
        let created_at = self.records.get(&code).map(|r| r.created_at).unwrap_or(now);
        let seq = self.bump();
        self.records.insert(
            code.clone(),
            PuzzleRecord {
                code: code.clone(),
                title: body.title,
                status: PuzzleStatus::Published,
                rows: body.rows,
                cols: body.cols,
                grid_b64: Some(body.grid_b64),
                clues: body.clues,
                rel: body.rel.unwrap_or_default(),
                sym: body.sym.unwrap_or_else(|| "r".to_string()),
                grey: body.grey,
                bubble: body.bubble,
                created_at,
                updated_at: now,
                seq,
            },
        );
        info!("published puzzle {}", code);
        Ok(code)
    }
}
