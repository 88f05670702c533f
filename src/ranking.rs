//! Score ranking
//!
//! The ranking is kept sorted by score, descending. Persistence goes through
//! [`RankingStore`], a whole-collection load/save seam; the shipped store is a
//! flat text file with one `name score` record per line.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_PLAYER_NAME;
use crate::error::{RankingError, RankingResult};

/// A single ranking entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub score: u32,
}

impl RankingEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Score-sorted leaderboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    entries: Vec<RankingEntry>,
}

impl Ranking {
    /// Create empty ranking
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from unsorted records
    pub fn from_entries(mut entries: Vec<RankingEntry>) -> Self {
        sort_descending(&mut entries);
        Self { entries }
    }

    /// All entries, best first
    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    /// The slice shown on screen
    pub fn top(&self, display_cap: usize) -> &[RankingEntry] {
        &self.entries[..self.entries.len().min(display_cap)]
    }

    /// Insert a result, keeping sort order. Equal scores keep arrival order.
    /// Returns the 1-indexed rank achieved.
    pub fn insert(&mut self, name: impl Into<String>, score: u32) -> usize {
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, RankingEntry::new(name, score));
        pos + 1
    }

    /// Drop everything past `cap`
    pub fn truncate(&mut self, cap: usize) {
        self.entries.truncate(cap);
    }

    /// Position of the first entry matching this exact result (for highlighting)
    pub fn position_of(&self, name: &str, score: u32) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.name == name && e.score == score)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn sort_descending(entries: &mut [RankingEntry]) {
    // Stable sort keeps file order for ties
    entries.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Whole-collection persistence for the ranking
pub trait RankingStore {
    fn load(&self) -> RankingResult<Vec<RankingEntry>>;
    fn save(&mut self, entries: &[RankingEntry]) -> RankingResult<()>;
}

/// In-memory store (tests, or hosts without a filesystem)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<RankingEntry>,
    /// Number of completed saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<RankingEntry>) -> Self {
        Self { entries, saves: 0 }
    }
}

impl RankingStore for MemoryStore {
    fn load(&self) -> RankingResult<Vec<RankingEntry>> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[RankingEntry]) -> RankingResult<()> {
        self.entries = entries.to_vec();
        self.saves += 1;
        Ok(())
    }
}

/// Flat text file: one `name score` record per line
///
/// The score is the last whitespace-separated token, so names may contain
/// spaces. A missing file loads as an empty ranking.
#[derive(Debug, Clone)]
pub struct TextFileStore {
    path: PathBuf,
}

impl TextFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RankingStore for TextFileStore {
    fn load(&self) -> RankingResult<Vec<RankingEntry>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("No ranking file at {}, starting fresh", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(RankingError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut entries = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_record(idx + 1, line) {
                Ok(entry) => entries.push(entry),
                Err(err) => log::warn!("Skipping {err}"),
            }
        }
        log::info!("Loaded {} ranking entries", entries.len());
        Ok(entries)
    }

    fn save(&mut self, entries: &[RankingEntry]) -> RankingResult<()> {
        let mut out = String::new();
        for entry in entries {
            out.push_str(&format_record(entry));
            out.push('\n');
        }
        fs::write(&self.path, out).map_err(|source| RankingError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Ranking saved ({} entries)", entries.len());
        Ok(())
    }
}

fn parse_record(line_no: usize, line: &str) -> RankingResult<RankingEntry> {
    let malformed = || RankingError::Malformed {
        line: line_no,
        content: line.to_string(),
    };
    let (name, score) = line.trim().rsplit_once(char::is_whitespace).ok_or_else(malformed)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed());
    }
    let score = score.parse::<u32>().map_err(|_| malformed())?;
    Ok(RankingEntry::new(name, score))
}

fn format_record(entry: &RankingEntry) -> String {
    // Line breaks would split the record
    let name: String = entry
        .name
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let name = match name.trim() {
        "" => DEFAULT_PLAYER_NAME,
        name => name,
    };
    format!("{} {}", name, entry.score)
}
