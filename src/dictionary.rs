//*** START FILE: src/dictionary.rs ***//
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::LessonError;

/// Glosses for the bundled lesson.
pub const BUNDLED_TRANSLATIONS: &str = include_str!("../assets/translations.toml");

const STRIPPED_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '«', '»', '"', '\'', '(', ')'];

#[derive(Deserialize)]
struct TranslationFile {
    #[serde(default)]
    translations: HashMap<String, String>,
}

/// Static token → gloss table.
#[derive(Debug, Default, Clone)]
pub struct TranslationTable {
    entries: HashMap<String, String>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document with a `[translations]` table.
    pub fn from_toml_str(contents: &str) -> Result<Self, LessonError> {
        let file: TranslationFile = toml::from_str(contents)?;
        Ok(TranslationTable { entries: file.translations })
    }

    pub fn bundled() -> Result<Self, LessonError> {
        Self::from_toml_str(BUNDLED_TRANSLATIONS)
    }

    pub fn load_file(path: &Path) -> Result<Self, LessonError> {
        let contents = fs::read_to_string(path).map_err(|source| LessonError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), entries = table.size(), "loaded translations");
        Ok(table)
    }

    pub fn insert(&mut self, token: impl Into<String>, gloss: impl Into<String>) {
        self.entries.insert(token.into(), gloss.into());
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Looks a token up: exact match first, then the token without punctuation
    /// in lowercase, then that form capitalized.
    pub fn lookup(&self, token: &str) -> Option<&str> {
        if let Some(gloss) = self.entries.get(token) {
            return Some(gloss);
        }

        let cleaned: String = token.chars().filter(|c| !STRIPPED_PUNCTUATION.contains(c)).collect();
        let lower = cleaned.to_lowercase();
        if let Some(gloss) = self.entries.get(&lower) {
            return Some(gloss);
        }

        let mut chars = lower.chars();
        let capitalized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => return None,
        };
        self.entries.get(&capitalized).map(String::as_str)
    }

    /// Same as [`lookup`](Self::lookup) but falls back to the token itself.
    pub fn translate(&self, token: &str) -> String {
        self.lookup(token).unwrap_or(token).to_string()
    }
}

//*** END FILE: src/dictionary.rs ***//
