use crate::error::Result;
use crate::puzzle::{Puzzle, next_numbered_title};
use chrono::Utc;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

pub const DRAFTS_KEY: &str = "works-drafts";
pub const SAVED_KEY: &str = "works-completed";
pub const PUBLISHED_KEY: &str = "works-published";

/// String key-value capability standing in for browser storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// All keys kept in one JSON object on disk, rewritten on every change.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            BTreeMap::new()
        };
        Ok(FileStore { path, entries })
    }

    fn flush(&self) -> Result<()> {
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct PublishedMeta {
    pub code: String,
    pub title: String,
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// What to do when a saved work already uses the title being saved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuplicateAction {
    Overwrite,
    Duplicate,
    Cancel,
}

/// Drafts, saved works and published codes kept as JSON lists in a store.
pub struct WorkLibrary<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> WorkLibrary<S> {
    pub fn new(store: S) -> Self {
        WorkLibrary { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(raw) = self.store.get(key) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("discarding unreadable '{}': {}", key, e);
            Vec::new()
        })
    }

    fn write_list<T: Serialize>(&mut self, key: &str, list: &[T]) -> Result<()> {
        let json = serde_json::to_string(list)?;
        self.store.set(key, &json)
    }

    pub fn drafts(&self) -> Vec<Puzzle> {
        self.read_list(DRAFTS_KEY)
    }

    pub fn saved(&self) -> Vec<Puzzle> {
        self.read_list(SAVED_KEY)
    }

    pub fn published(&self) -> Vec<PublishedMeta> {
        self.read_list(PUBLISHED_KEY)
    }

    /// Insert or replace (by id) a draft, newest first. Used for autosave,
    /// so titles are not checked.
    pub fn upsert_draft(&mut self, puzzle: &Puzzle) -> Result<()> {
        let mut drafts = self.drafts();
        drafts.retain(|w| w.id != puzzle.id);
        drafts.insert(0, puzzle.clone());
        self.write_list(DRAFTS_KEY, &drafts)
    }

    /// Explicit draft save. A title already used by another draft is
    /// resolved with `on_duplicate`. Returns the stored draft, or `None` on
    /// cancel.
    pub fn save_draft(&mut self, puzzle: &Puzzle, on_duplicate: DuplicateAction) -> Result<Option<Puzzle>> {
        let mut drafts = self.drafts();
        let Some(stored) = place_by_title(&mut drafts, puzzle, on_duplicate) else {
            return Ok(None);
        };
        self.write_list(DRAFTS_KEY, &drafts)?;
        info!("saved draft '{}'", stored.title);
        Ok(Some(stored))
    }

    /// Save a finished work. Returns the stored work, or `None` when the
    /// caller chose to cancel on a title clash. Kept under its own title, it
    /// also leaves the drafts list.
    pub fn save_work(&mut self, puzzle: &Puzzle, on_duplicate: DuplicateAction) -> Result<Option<Puzzle>> {
        let title = display_title(&puzzle.title);
        let mut saved = self.saved();
        let Some(stored) = place_by_title(&mut saved, puzzle, on_duplicate) else {
            return Ok(None);
        };

        let mut drafts = self.drafts();
        if stored.title == title {
            if let Some(idx) = drafts.iter().position(|w| w.title.trim() == title) {
                drafts.remove(idx);
            }
        }

        self.write_list(SAVED_KEY, &saved)?;
        self.write_list(DRAFTS_KEY, &drafts)?;
        info!("saved work '{}'", stored.title);
        Ok(Some(stored))
    }

    pub fn record_published(&mut self, meta: PublishedMeta) -> Result<()> {
        let mut list = self.published();
        list.retain(|p| p.code != meta.code);
        list.insert(0, meta);
        self.write_list(PUBLISHED_KEY, &list)
    }

    /// Pick the title a puzzle is published under. A free title is kept.
    /// On a clash anywhere in the library, `Overwrite` removes the old
    /// title from every list and `Duplicate` takes the first free
    /// `"Title (n)"`.
    pub fn resolve_publish_title(&mut self, title: &str, on_duplicate: DuplicateAction) -> Result<Option<String>> {
        let title = display_title(title);
        if !self.all_titles().contains(&title) {
            return Ok(Some(title));
        }
        match on_duplicate {
            DuplicateAction::Cancel => Ok(None),
            DuplicateAction::Overwrite => {
                self.remove_title_everywhere(&title)?;
                Ok(Some(title))
            }
            DuplicateAction::Duplicate => Ok(Some(self.next_title_across(&title))),
        }
    }

    /// Record `puzzle` as published under `code`, settling its title first.
    pub fn publish_work(
        &mut self,
        puzzle: &Puzzle,
        code: &str,
        on_duplicate: DuplicateAction,
    ) -> Result<Option<PublishedMeta>> {
        let Some(title) = self.resolve_publish_title(&puzzle.title, on_duplicate)? else {
            return Ok(None);
        };
        let meta = PublishedMeta {
            code: code.to_string(),
            title,
            rows: puzzle.size,
            cols: puzzle.size,
            created_at: Some(Utc::now().timestamp_millis()),
        };
        self.record_published(meta.clone())?;
        info!("published '{}' as {}", meta.title, meta.code);
        Ok(Some(meta))
    }

    /// `base` if no list uses it yet, otherwise the lowest free `"base (n)"`.
    pub fn next_title_across(&self, base: &str) -> String {
        let title = display_title(base);
        let titles = self.all_titles();
        if !titles.contains(&title) {
            return title;
        }
        let mut n = 1;
        while titles.contains(&format!("{} ({})", title, n)) {
            n += 1;
        }
        format!("{} ({})", title, n)
    }

    /// Every non-blank title across drafts, saved and published.
    pub fn all_titles(&self) -> BTreeSet<String> {
        let mut titles = BTreeSet::new();
        titles.extend(self.drafts().into_iter().map(|w| w.title.trim().to_string()));
        titles.extend(self.saved().into_iter().map(|w| w.title.trim().to_string()));
        titles.extend(self.published().into_iter().map(|p| p.title.trim().to_string()));
        titles.remove("");
        titles
    }

    /// Drop every draft, saved work and published entry titled `title`.
    /// A blank title removes nothing.
    pub fn remove_title_everywhere(&mut self, title: &str) -> Result<()> {
        let t = title.trim();
        if t.is_empty() {
            return Ok(());
        }
        let drafts: Vec<Puzzle> = self.drafts().into_iter().filter(|w| w.title.trim() != t).collect();
        let saved: Vec<Puzzle> = self.saved().into_iter().filter(|w| w.title.trim() != t).collect();
        let published: Vec<PublishedMeta> = self
            .published()
            .into_iter()
            .filter(|p| p.title.trim() != t)
            .collect();
        self.write_list(DRAFTS_KEY, &drafts)?;
        self.write_list(SAVED_KEY, &saved)?;
        self.write_list(PUBLISHED_KEY, &published)
    }
}

fn display_title(title: &str) -> String {
    let t = title.trim();
    if t.is_empty() { "Untitled".to_string() } else { t.to_string() }
}

/// Insert `puzzle` into `list` (newest first) under its display title,
/// resolving a clash with an existing title. Overwrite keeps the old id.
fn place_by_title(list: &mut Vec<Puzzle>, puzzle: &Puzzle, on_duplicate: DuplicateAction) -> Option<Puzzle> {
    let mut work = puzzle.clone();
    work.title = display_title(&puzzle.title);
    work.touch();
    let clash = list.iter().position(|w| w.title.trim() == work.title);

    match (clash, on_duplicate) {
        (None, _) => list.insert(0, work.clone()),
        (Some(_), DuplicateAction::Cancel) => return None,
        (Some(idx), DuplicateAction::Overwrite) => {
            work.id = list[idx].id.clone();
            list[idx] = work.clone();
        }
        (Some(_), DuplicateAction::Duplicate) => {
            work.title = next_numbered_title(list.iter().map(|w| w.title.as_str()), &work.title);
            list.insert(0, work.clone());
        }
    }
    Some(work)
}
