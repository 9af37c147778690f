use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::types::lesson::WordId;

/// Learner-assigned proficiency for a word, 1 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WordLevel {
    #[default]
    New = 1,
    Recognized = 2,
    Familiar = 3,
    Learned = 4,
}

impl WordLevel {
    pub const ALL: [WordLevel; 4] = [WordLevel::New, WordLevel::Recognized, WordLevel::Familiar, WordLevel::Learned];

    /// Out-of-range input is clamped, never rejected.
    pub fn from_clamped(level: i64) -> Self {
        match level {
            i64::MIN..=1 => WordLevel::New,
            2 => WordLevel::Recognized,
            3 => WordLevel::Familiar,
            _ => WordLevel::Learned,
        }
    }

    pub fn as_number(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            WordLevel::New => "New",
            WordLevel::Recognized => "Recognized",
            WordLevel::Familiar => "Familiar",
            WordLevel::Learned => "Learned",
        }
    }
}

/// Copy-on-write set of word ids.
///
/// Every mutation that changes the contents swaps in a freshly allocated set,
/// so a snapshot taken with `clone()` never changes and [`WordSet::ptr_eq`]
/// tells whether anything happened since.
#[derive(Debug, Clone, Default)]
pub struct WordSet(Arc<HashSet<WordId>>);

impl WordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordId> {
        self.0.iter()
    }

    pub fn ptr_eq(&self, other: &WordSet) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn insert(&mut self, id: WordId) -> bool {
        if self.0.contains(&id) {
            return false;
        }
        let mut next = (*self.0).clone();
        next.insert(id);
        self.0 = Arc::new(next);
        true
    }

    /// Adds every id in one step.
    pub fn extend<'a>(&mut self, ids: impl IntoIterator<Item = &'a WordId>) -> bool {
        let missing: Vec<&WordId> = ids.into_iter().filter(|id| !self.0.contains(*id)).collect();
        if missing.is_empty() {
            return false;
        }
        let mut next = (*self.0).clone();
        next.extend(missing.into_iter().cloned());
        self.0 = Arc::new(next);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        if !self.0.contains(id) {
            return false;
        }
        let mut next = (*self.0).clone();
        next.remove(id);
        self.0 = Arc::new(next);
        true
    }

    /// Replaces the contents with exactly `ids`.
    pub fn replace<'a>(&mut self, ids: impl IntoIterator<Item = &'a WordId>) {
        let next: HashSet<WordId> = ids.into_iter().cloned().collect();
        if next != *self.0 {
            self.0 = Arc::new(next);
        }
    }

    pub fn clear(&mut self) {
        if !self.0.is_empty() {
            self.0 = Arc::new(HashSet::new());
        }
    }
}

/// Per-word classification kept for the reading session.
#[derive(Debug, Clone, Default)]
pub struct LearnerStore {
    known: WordSet,
    ignored: WordSet,
    lingq: WordSet,
    levels: Arc<HashMap<WordId, WordLevel>>,
}

impl LearnerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn known(&self) -> &WordSet {
        &self.known
    }

    pub fn ignored(&self) -> &WordSet {
        &self.ignored
    }

    pub fn lingqs(&self) -> &WordSet {
        &self.lingq
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.known.contains(id)
    }

    pub fn is_ignored(&self, id: &str) -> bool {
        self.ignored.contains(id)
    }

    pub fn is_lingq(&self, id: &str) -> bool {
        self.lingq.contains(id)
    }

    /// Known and ignored words take no part in selection or highlighting.
    pub fn is_suppressed(&self, id: &str) -> bool {
        self.is_known(id) || self.is_ignored(id)
    }

    /// Marks a word known. It leaves the ignored and LingQ sets.
    pub fn mark_known(&mut self, id: &WordId) {
        self.known.insert(id.clone());
        self.ignored.remove(id.as_str());
        self.lingq.remove(id.as_str());
        debug!(word = %id, "marked known");
    }

    /// Marks a word ignored. It leaves the known and LingQ sets.
    pub fn mark_ignored(&mut self, id: &WordId) {
        self.ignored.insert(id.clone());
        self.known.remove(id.as_str());
        self.lingq.remove(id.as_str());
        debug!(word = %id, "marked ignored");
    }

    pub fn add_lingq(&mut self, id: &WordId) -> bool {
        self.lingq.insert(id.clone())
    }

    pub fn add_lingqs<'a>(&mut self, ids: impl IntoIterator<Item = &'a WordId>) -> bool {
        self.lingq.extend(ids)
    }

    pub fn level(&self, id: &str) -> WordLevel {
        self.levels.get(id).copied().unwrap_or_default()
    }

    /// Stores the level clamped to [1, 4] and returns what was stored.
    pub fn set_level(&mut self, id: &WordId, level: i64) -> WordLevel {
        let level = WordLevel::from_clamped(level);
        if self.levels.get(id.as_str()) != Some(&level) {
            let mut next = (*self.levels).clone();
            next.insert(id.clone(), level);
            self.levels = Arc::new(next);
        }
        level
    }
}
