//! Word and phrase selection driven by pointer events.
//!
//! A press on a word anchors a drag. While the button is held, entering other
//! words grows a phrase inside the anchor's sentence. Phrases are capped at
//! `max_span` words; going past the cap, or leaving the sentence, turns the
//! selection [`Selection::Invalid`], which can only be dismissed. Leaving the
//! sentence is sticky until release.
//!
//! Plain clicks toggle a single-word selection. The click the platform fires
//! right after a multi-word drag is swallowed once.

use tracing::debug;

use crate::profile::{LearnerStore, WordSet};
use crate::types::lesson::{join_texts, Lesson, Word, WordId, WordMeta};

pub const DEFAULT_MAX_PHRASE_SPAN: usize = 9;

/// Inclusive word-index range inside one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseSpan {
    pub sentence_index: usize,
    pub start: usize,
    pub end: usize,
}

impl PhraseSpan {
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, meta: WordMeta) -> bool {
        meta.sentence_index == self.sentence_index && meta.word_index >= self.start && meta.word_index <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    CrossesSentence,
    TooLong,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSelection {
    pub reason: InvalidReason,
    /// Every word covered, in document order.
    pub word_ids: Vec<WordId>,
    pub text: String,
}

impl InvalidSelection {
    fn covering(reason: InvalidReason, words: &[Word]) -> Self {
        InvalidSelection { reason, word_ids: words.iter().map(|w| w.id.clone()).collect(), text: join_texts(words) }
    }

    /// The covered text cut to `max_words`, with an ellipsis when cut.
    pub fn preview(&self, max_words: usize) -> String {
        preview_text(&self.text, max_words)
    }
}

pub fn preview_text(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.to_string();
    }
    format!("{}…", words[..max_words].join(" "))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Single(WordId),
    Phrase(PhraseSpan),
    Invalid(InvalidSelection),
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    /// Whether the word with this id and position is part of the selection.
    pub fn covers(&self, id: &str, meta: WordMeta) -> bool {
        match self {
            Selection::None => false,
            Selection::Single(w) => w.as_str() == id,
            Selection::Phrase(span) => span.contains(meta),
            Selection::Invalid(invalid) => invalid.word_ids.iter().any(|w| w.as_str() == id),
        }
    }
}

#[derive(Debug, Clone)]
struct DragAnchor {
    id: WordId,
    meta: WordMeta,
    left_sentence: bool,
}

/// What the floating toolbar is about.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarTarget<'a> {
    /// Word the toolbar is attached to: the first word of a phrase.
    pub anchor: &'a Word,
    pub words: &'a [Word],
    /// Set when the selection is invalid; only dismissal is offered then.
    pub invalid: Option<&'a InvalidSelection>,
}

impl ToolbarTarget<'_> {
    pub fn text(&self) -> String {
        join_texts(self.words)
    }

    pub fn translation(&self) -> String {
        self.words.iter().map(Word::gloss).collect::<Vec<_>>().join(" ")
    }

    pub fn last(&self) -> &Word {
        self.words.last().unwrap_or(self.anchor)
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct SelectionEngine {
    selection: Selection,
    drag: Option<DragAnchor>,
    toolbar_word: Option<WordId>,
    expanded: bool,
    swallow_next_click: bool,
    // The last press landed on the word that was already selected alone.
    pressed_selected_word: bool,
    clicked: WordSet,
    max_span: usize,
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PHRASE_SPAN)
    }
}

impl SelectionEngine {
    pub fn new(max_span: usize) -> Self {
        SelectionEngine {
            selection: Selection::None,
            drag: None,
            toolbar_word: None,
            expanded: false,
            swallow_next_click: false,
            pressed_selected_word: false,
            clicked: WordSet::new(),
            max_span: max_span.max(1),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Words highlighted by direct interaction.
    pub fn clicked(&self) -> &WordSet {
        &self.clicked
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn max_span(&self) -> usize {
        self.max_span
    }

    pub fn toolbar_word(&self) -> Option<&WordId> {
        self.toolbar_word.as_ref()
    }

    pub fn toolbar_open(&self) -> bool {
        self.toolbar_word.is_some()
    }

    /// Whether the toolbar shows its detail panel. Always false when closed.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded && self.toolbar_open();
    }

    pub fn pointer_down(&mut self, lesson: &Lesson, learner: &LearnerStore, id: &str) {
        if learner.is_suppressed(id) {
            return;
        }
        let Some(meta) = lesson.locate(id) else {
            return;
        };
        let anchor = DragAnchor { id: WordId::new(id), meta, left_sentence: false };
        self.swallow_next_click = false;
        self.pressed_selected_word = self.is_single(id);
        self.update_in_sentence(lesson, &anchor, meta.word_index);
        self.drag = Some(anchor);
    }

    pub fn pointer_enter(&mut self, lesson: &Lesson, learner: &LearnerStore, id: &str) {
        if learner.is_suppressed(id) {
            return;
        }
        let Some(mut anchor) = self.drag.take() else {
            return;
        };
        if let Some(meta) = lesson.locate(id) {
            if anchor.left_sentence || meta.sentence_index != anchor.meta.sentence_index {
                anchor.left_sentence = true;
                let start = anchor.meta.order.min(meta.order);
                let end = anchor.meta.order.max(meta.order);
                self.set_invalid(InvalidSelection::covering(InvalidReason::CrossesSentence, lesson.order_span(start, end)));
            } else {
                self.update_in_sentence(lesson, &anchor, meta.word_index);
            }
        }
        self.drag = Some(anchor);
    }

    /// Ends a drag. Multi-word phrases become LingQs and open the toolbar on
    /// their first word; an invalid selection opens it on the anchor.
    pub fn pointer_up(&mut self, lesson: &Lesson, learner: &mut LearnerStore) {
        let Some(anchor) = self.drag.take() else {
            return;
        };
        let selection = self.selection.clone();
        match &selection {
            Selection::Phrase(span) if span.len() > 1 => {
                let words = lesson.sentence_span(span.sentence_index, span.start, span.end);
                learner.add_lingqs(words.iter().map(|w| &w.id));
                if let Some(first) = words.first() {
                    self.open_toolbar(first.id.clone());
                }
                debug!(start = span.start, end = span.end, sentence = span.sentence_index, "phrase selected");
            }
            Selection::Invalid(invalid) => {
                debug!(words = invalid.word_ids.len(), reason = ?invalid.reason, "invalid selection");
                self.open_toolbar(anchor.id);
            }
            _ => {}
        }
    }

    pub fn click(&mut self, lesson: &Lesson, learner: &mut LearnerStore, id: &str) {
        let pressed_selected_word = std::mem::take(&mut self.pressed_selected_word);
        if std::mem::take(&mut self.swallow_next_click) {
            return;
        }
        if learner.is_suppressed(id) {
            return;
        }
        let Some(word) = lesson.word(id) else {
            return;
        };
        if pressed_selected_word || self.is_single(id) {
            self.close();
            debug!(word = id, "deselected");
            return;
        }
        self.selection = Selection::Single(word.id.clone());
        self.open_toolbar(word.id.clone());
        learner.add_lingq(&word.id);
        self.clicked.insert(word.id.clone());
        debug!(word = id, "selected");
    }

    /// Toolbar close button or a press outside toolbar and anchor.
    pub fn close(&mut self) {
        self.selection = Selection::None;
        self.toolbar_word = None;
        self.expanded = false;
        self.drag = None;
        self.pressed_selected_word = false;
        self.clicked.clear();
    }

    /// Drops every reference to a word that stopped being interactive.
    pub fn release_word(&mut self, lesson: &Lesson, id: &str) {
        self.clicked.remove(id);
        let referenced = match lesson.locate(id) {
            Some(meta) => self.selection.covers(id, meta),
            None => false,
        };
        let anchors = self.toolbar_word.as_ref().is_some_and(|w| w.as_str() == id)
            || self.drag.as_ref().is_some_and(|d| d.id.as_str() == id);
        if referenced || anchors {
            self.close();
        }
    }

    pub fn toolbar_target<'a>(&'a self, lesson: &'a Lesson) -> Option<ToolbarTarget<'a>> {
        let toolbar_word = self.toolbar_word.as_ref()?;
        match &self.selection {
            Selection::Phrase(span) => {
                let words = lesson.sentence_span(span.sentence_index, span.start, span.end);
                let anchor = words.first()?;
                Some(ToolbarTarget { anchor, words, invalid: None })
            }
            Selection::Invalid(invalid) => {
                let anchor = lesson.word(toolbar_word.as_str())?;
                Some(ToolbarTarget { anchor, words: std::slice::from_ref(anchor), invalid: Some(invalid) })
            }
            Selection::Single(id) => {
                let anchor = lesson.word(id.as_str())?;
                Some(ToolbarTarget { anchor, words: std::slice::from_ref(anchor), invalid: None })
            }
            Selection::None => {
                let anchor = lesson.word(toolbar_word.as_str())?;
                Some(ToolbarTarget { anchor, words: std::slice::from_ref(anchor), invalid: None })
            }
        }
    }

    fn is_single(&self, id: &str) -> bool {
        matches!(&self.selection, Selection::Single(w) if w.as_str() == id)
    }

    // A toolbar opening on a different word starts collapsed.
    fn open_toolbar(&mut self, id: WordId) {
        if self.toolbar_word.as_ref() != Some(&id) {
            self.expanded = false;
        }
        self.toolbar_word = Some(id);
    }

    fn update_in_sentence(&mut self, lesson: &Lesson, anchor: &DragAnchor, word_index: usize) {
        let sentence_index = anchor.meta.sentence_index;
        let start = anchor.meta.word_index.min(word_index);
        let end = anchor.meta.word_index.max(word_index);
        let words = lesson.sentence_span(sentence_index, start, end);

        if end - start + 1 > self.max_span {
            self.set_invalid(InvalidSelection::covering(InvalidReason::TooLong, words));
            return;
        }

        self.selection = Selection::Phrase(PhraseSpan { sentence_index, start, end });
        self.clicked.replace(words.iter().map(|w| &w.id));
        if words.len() > 1 {
            self.swallow_next_click = true;
        }
    }

    fn set_invalid(&mut self, invalid: InvalidSelection) {
        self.clicked.replace(&invalid.word_ids);
        self.selection = Selection::Invalid(invalid);
        self.swallow_next_click = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::lesson::Sentence;

    // Sentence 0 has 12 words (w0..w11), sentence 1 has 3 (w12..w14).
    fn lesson() -> Lesson {
        let mut order = 0;
        let mut sentence = |n: usize| {
            let words = (0..n)
                .map(|_| {
                    let w = Word { id: WordId::from_order(order), text: format!("m{}", order), translation: None };
                    order += 1;
                    w
                })
                .collect();
            Sentence { words }
        };
        let first = sentence(12);
        let second = sentence(3);
        Lesson::new("t", vec![first, second])
    }

    fn drag(engine: &mut SelectionEngine, lesson: &Lesson, learner: &mut LearnerStore, from: &str, to: &[&str]) {
        engine.pointer_down(lesson, learner, from);
        for id in to {
            engine.pointer_enter(lesson, learner, id);
        }
    }

    #[test]
    fn press_selects_single_word_phrase() {
        let lesson = lesson();
        let learner = LearnerStore::new();
        let mut engine = SelectionEngine::default();
        engine.pointer_down(&lesson, &learner, "w3");
        assert_eq!(engine.selection(), &Selection::Phrase(PhraseSpan { sentence_index: 0, start: 3, end: 3 }));
        assert!(engine.is_dragging());
        assert!(engine.clicked().contains("w3"));
    }

    #[test]
    fn span_cap_is_inclusive() {
        let lesson = lesson();
        let mut learner = LearnerStore::new();
        let mut engine = SelectionEngine::default();
        drag(&mut engine, &lesson, &mut learner, "w2", &["w9"]);
        assert_eq!(engine.selection(), &Selection::Phrase(PhraseSpan { sentence_index: 0, start: 2, end: 9 }));
        engine.pointer_enter(&lesson, &learner, "w10");
        assert_eq!(engine.selection(), &Selection::Phrase(PhraseSpan { sentence_index: 0, start: 2, end: 10 }));
        engine.pointer_enter(&lesson, &learner, "w11");
        match engine.selection() {
            Selection::Invalid(invalid) => {
                assert_eq!(invalid.reason, InvalidReason::TooLong);
                assert_eq!(invalid.word_ids.len(), 10);
            }
            other => panic!("expected invalid, got {:?}", other),
        }
        // Shrinking back under the cap recovers the phrase.
        engine.pointer_enter(&lesson, &learner, "w5");
        assert_eq!(engine.selection(), &Selection::Phrase(PhraseSpan { sentence_index: 0, start: 2, end: 5 }));
    }

    #[test]
    fn backwards_drag_orders_bounds() {
        let lesson = lesson();
        let mut learner = LearnerStore::new();
        let mut engine = SelectionEngine::default();
        drag(&mut engine, &lesson, &mut learner, "w6", &["w4"]);
        assert_eq!(engine.selection(), &Selection::Phrase(PhraseSpan { sentence_index: 0, start: 4, end: 6 }));
    }

    #[test]
    fn leaving_the_sentence_is_sticky_until_release() {
        let lesson = lesson();
        let mut learner = LearnerStore::new();
        let mut engine = SelectionEngine::default();
        drag(&mut engine, &lesson, &mut learner, "w11", &["w12"]);
        let Selection::Invalid(invalid) = engine.selection().clone() else {
            panic!("expected invalid");
        };
        assert_eq!(invalid.reason, InvalidReason::CrossesSentence);
        assert_eq!(invalid.word_ids, vec![WordId::new("w11"), WordId::new("w12")]);

        engine.pointer_enter(&lesson, &learner, "w10");
        let Selection::Invalid(invalid) = engine.selection() else {
            panic!("expected invalid after re-entering the anchor sentence");
        };
        assert_eq!(invalid.word_ids, vec![WordId::new("w10"), WordId::new("w11")]);

        engine.pointer_up(&lesson, &mut learner);
        assert_eq!(engine.toolbar_word(), Some(&WordId::new("w11")));
        assert!(learner.lingqs().is_empty());
        let target = engine.toolbar_target(&lesson).unwrap();
        assert!(target.is_invalid());
        assert_eq!(target.anchor.id.as_str(), "w11");
    }

    #[test]
    fn release_of_phrase_adds_lingqs_and_anchors_first_word() {
        let lesson = lesson();
        let mut learner = LearnerStore::new();
        let mut engine = SelectionEngine::default();
        drag(&mut engine, &lesson, &mut learner, "w5", &["w3"]);
        engine.pointer_up(&lesson, &mut learner);
        assert!(!engine.is_dragging());
        for id in ["w3", "w4", "w5"] {
            assert!(learner.is_lingq(id));
        }
        let target = engine.toolbar_target(&lesson).unwrap();
        assert_eq!(target.anchor.id.as_str(), "w3");
        assert_eq!(target.text(), "m3 m4 m5");
        assert_eq!(target.last().id.as_str(), "w5");

        // The click fired by the platform after the drag is swallowed once.
        engine.click(&lesson, &mut learner, "w3");
        assert!(matches!(engine.selection(), Selection::Phrase(_)));
    }

    #[test]
    fn swallowed_click_is_consumed_once() {
        let lesson = lesson();
        let mut learner = LearnerStore::new();
        let mut engine = SelectionEngine::default();
        drag(&mut engine, &lesson, &mut learner, "w5", &["w3"]);
        engine.pointer_up(&lesson, &mut learner);
        engine.click(&lesson, &mut learner, "w3");
        assert_eq!(engine.selection(), &Selection::Phrase(PhraseSpan { sentence_index: 0, start: 3, end: 5 }));

        engine.click(&lesson, &mut learner, "w7");
        assert_eq!(engine.selection(), &Selection::Single(WordId::new("w7")));
        assert_eq!(engine.toolbar_word(), Some(&WordId::new("w7")));
    }

    #[test]
    fn invalid_drag_swallows_the_release_click() {
        let lesson = lesson();
        let mut learner = LearnerStore::new();
        let mut engine = SelectionEngine::default();
        drag(&mut engine, &lesson, &mut learner, "w11", &["w12", "w11"]);
        engine.pointer_up(&lesson, &mut learner);
        engine.click(&lesson, &mut learner, "w11");
        assert!(matches!(engine.selection(), Selection::Invalid(_)));
        assert!(learner.lingqs().is_empty());

        engine.click(&lesson, &mut learner, "w11");
        assert_eq!(engine.selection(), &Selection::Single(WordId::new("w11")));
        assert!(learner.is_lingq("w11"));
    }

    #[test]
    fn too_long_drag_shrunk_back_still_swallows_one_click() {
        let lesson = lesson();
        let mut learner = LearnerStore::new();
        let mut engine = SelectionEngine::default();
        drag(&mut engine, &lesson, &mut learner, "w0", &["w10", "w0"]);
        assert_eq!(engine.selection(), &Selection::Phrase(PhraseSpan { sentence_index: 0, start: 0, end: 0 }));
        engine.pointer_up(&lesson, &mut learner);
        engine.click(&lesson, &mut learner, "w0");
        assert!(!engine.toolbar_open());
        assert!(learner.lingqs().is_empty());

        engine.click(&lesson, &mut learner, "w0");
        assert_eq!(engine.selection(), &Selection::Single(WordId::new("w0")));
    }

    #[test]
    fn expanded_panel_resets_when_the_toolbar_moves_or_closes() {
        let lesson = lesson();
        let mut learner = LearnerStore::new();
        let mut engine = SelectionEngine::default();
        engine.set_expanded(true);
        assert!(!engine.is_expanded());

        engine.click(&lesson, &mut learner, "w1");
        engine.set_expanded(true);
        assert!(engine.is_expanded());
        engine.click(&lesson, &mut learner, "w4");
        assert!(!engine.is_expanded());

        engine.set_expanded(true);
        engine.release_word(&lesson, "w4");
        assert!(!engine.is_expanded());
    }

    #[test]
    fn single_word_release_waits_for_click() {
        let lesson = lesson();
        let mut learner = LearnerStore::new();
        let mut engine = SelectionEngine::default();
        engine.pointer_down(&lesson, &learner, "w1");
        engine.pointer_up(&lesson, &mut learner);
        assert!(!engine.toolbar_open());
        assert!(learner.lingqs().is_empty());

        engine.click(&lesson, &mut learner, "w1");
        assert_eq!(engine.selection(), &Selection::Single(WordId::new("w1")));
        assert!(learner.is_lingq("w1"));
        assert!(engine.clicked().contains("w1"));
    }

    #[test]
    fn second_click_deselects() {
        let lesson = lesson();
        let mut learner = LearnerStore::new();
        let mut engine = SelectionEngine::default();
        engine.click(&lesson, &mut learner, "w1");
        engine.click(&lesson, &mut learner, "w1");
        assert!(engine.selection().is_none());
        assert!(!engine.toolbar_open());
        assert!(!engine.clicked().contains("w1"));
        assert!(learner.is_lingq("w1"), "LingQ status survives deselection");
    }

    #[test]
    fn suppressed_and_unknown_words_are_ignored() {
        let lesson = lesson();
        let mut learner = LearnerStore::new();
        learner.mark_known(&WordId::new("w2"));
        let mut engine = SelectionEngine::default();

        engine.pointer_down(&lesson, &learner, "w2");
        engine.click(&lesson, &mut learner, "w2");
        engine.pointer_down(&lesson, &learner, "nope");
        engine.click(&lesson, &mut learner, "nope");
        assert!(engine.selection().is_none());
        assert!(!engine.is_dragging());
        assert!(engine.clicked().is_empty());

        engine.pointer_down(&lesson, &learner, "w1");
        engine.pointer_enter(&lesson, &learner, "w2");
        assert_eq!(engine.selection(), &Selection::Phrase(PhraseSpan { sentence_index: 0, start: 1, end: 1 }));
    }

    #[test]
    fn release_word_closes_referencing_selection() {
        let lesson = lesson();
        let mut learner = LearnerStore::new();
        let mut engine = SelectionEngine::default();
        drag(&mut engine, &lesson, &mut learner, "w1", &["w3"]);
        engine.pointer_up(&lesson, &mut learner);
        engine.release_word(&lesson, "w2");
        assert!(engine.selection().is_none());
        assert!(!engine.toolbar_open());

        engine.pointer_down(&lesson, &learner, "w7");
        engine.pointer_up(&lesson, &mut learner);
        engine.click(&lesson, &mut learner, "w7");
        engine.release_word(&lesson, "w9");
        assert_eq!(engine.selection(), &Selection::Single(WordId::new("w7")));
    }

    #[test]
    fn preview_truncates_with_ellipsis() {
        assert_eq!(preview_text("a b c", 9), "a b c");
        assert_eq!(preview_text("a b c d", 2), "a b…");
    }
}
