//*** START FILE: src/types/lesson.rs ***//
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

/// Stable identifier of a word inside a lesson (`w0`, `w1`, ...).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    pub fn new(id: impl Into<String>) -> Self {
        WordId(id.into())
    }

    /// Id assigned to the word at `order` in document order.
    pub fn from_order(order: usize) -> Self {
        WordId(format!("w{}", order))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for WordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WordId {
    fn from(value: &str) -> Self {
        WordId(value.to_string())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Word {
    pub id: WordId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl Word {
    /// Gloss shown to the learner; the token itself when no translation is known.
    pub fn gloss(&self) -> &str {
        self.translation.as_deref().unwrap_or(&self.text)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Sentence {
    pub words: Vec<Word>,
}

impl Sentence {
    pub fn text(&self) -> String {
        join_texts(&self.words)
    }
}

/// Where a word sits in the lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordMeta {
    pub sentence_index: usize,
    pub word_index: usize,
    /// Position in the flattened document order.
    pub order: usize,
}

/// The document being read. Built once, never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Lesson {
    title: String,
    sentences: Vec<Sentence>,
    #[serde(skip)]
    words: Vec<Word>,
    #[serde(skip)]
    meta: HashMap<WordId, WordMeta>,
}

impl Lesson {
    pub fn new(title: impl Into<String>, sentences: Vec<Sentence>) -> Self {
        // Empty sentences would break the "every word belongs to exactly one sentence" lookups.
        let sentences: Vec<Sentence> = sentences.into_iter().filter(|s| !s.words.is_empty()).collect();

        let mut words = Vec::new();
        let mut meta = HashMap::new();
        for (sentence_index, sentence) in sentences.iter().enumerate() {
            for (word_index, word) in sentence.words.iter().enumerate() {
                meta.insert(
                    word.id.clone(),
                    WordMeta { sentence_index, word_index, order: words.len() },
                );
                words.push(word.clone());
            }
        }

        Lesson { title: title.into(), sentences, words, meta }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn sentence(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    /// All words, flattened in document order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn locate(&self, id: &str) -> Option<WordMeta> {
        self.meta.get(id).copied()
    }

    pub fn word(&self, id: &str) -> Option<&Word> {
        self.locate(id).and_then(|m| self.words.get(m.order))
    }

    /// Words of one sentence between two word indices, both inclusive.
    pub fn sentence_span(&self, sentence_index: usize, start: usize, end: usize) -> &[Word] {
        match self.sentences.get(sentence_index) {
            Some(sentence) if start <= end && end < sentence.words.len() => &sentence.words[start..=end],
            _ => &[],
        }
    }

    /// Words between two document-order positions, both inclusive.
    pub fn order_span(&self, start: usize, end: usize) -> &[Word] {
        if start <= end && end < self.words.len() {
            &self.words[start..=end]
        } else {
            &[]
        }
    }

    /// The sentence containing `id`, if the id belongs to this lesson.
    pub fn sentence_of(&self, id: &str) -> Option<&Sentence> {
        self.locate(id).and_then(|m| self.sentences.get(m.sentence_index))
    }
}

pub fn join_texts(words: &[Word]) -> String {
    words.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(order: usize, text: &str) -> Word {
        Word { id: WordId::from_order(order), text: text.to_string(), translation: None }
    }

    fn two_sentences() -> Lesson {
        Lesson::new(
            "t",
            vec![
                Sentence { words: vec![word(0, "Des"), word(1, "chats"), word(2, "meurent")] },
                Sentence { words: vec![word(3, "La"), word(4, "vidéo")] },
            ],
        )
    }

    #[test]
    fn locate_reports_sentence_and_document_positions() {
        let lesson = two_sentences();
        let meta = lesson.locate("w4").unwrap();
        assert_eq!(meta, WordMeta { sentence_index: 1, word_index: 1, order: 4 });
        assert!(lesson.locate("w99").is_none());
    }

    #[test]
    fn spans_are_inclusive_and_empty_when_out_of_range() {
        let lesson = two_sentences();
        assert_eq!(join_texts(lesson.sentence_span(0, 1, 2)), "chats meurent");
        assert_eq!(join_texts(lesson.order_span(2, 3)), "meurent La");
        assert!(lesson.sentence_span(0, 1, 3).is_empty());
        assert!(lesson.order_span(3, 2).is_empty());
    }

    #[test]
    fn empty_sentences_are_dropped() {
        let lesson = Lesson::new("t", vec![Sentence::default(), Sentence { words: vec![word(0, "a")] }]);
        assert_eq!(lesson.sentences().len(), 1);
        assert_eq!(lesson.locate("w0").unwrap().sentence_index, 0);
    }

    #[test]
    fn gloss_falls_back_to_text() {
        let mut w = word(0, "chats");
        assert_eq!(w.gloss(), "chats");
        w.translation = Some("cats".into());
        assert_eq!(w.gloss(), "cats");
    }
}
//*** END FILE: src/types/lesson.rs ***//
