//! The reading session: one lesson, its pages, and everything the learner
//! does to it.
//!
//! [`ReadingSession`] is the only writer of selection and learner state. The
//! front end forwards pointer and keyboard events here and reads back pages,
//! highlight tiers and the toolbar target when painting.

use egui::{Rect, Vec2};
use tracing::{debug, info};

use crate::config::{Config, PlacementParams, StyleMetrics};
use crate::profile::{LearnerStore, WordLevel};
use crate::reader::measure::TextMeasurer;
use crate::reader::navigation::PageCursor;
use crate::reader::paginator::{paginate, Page};
use crate::reader::placement::{layout_toolbar, ToolbarLayout};
use crate::reader::reflow::ReflowQueue;
use crate::reader::selection::{Selection, SelectionEngine, ToolbarTarget};
use crate::types::lesson::{Lesson, Sentence, WordId};

/// What a pointer press landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    Word(WordId),
    /// The toolbar or its expanded panel.
    Toolbar,
    Elsewhere,
}

/// Visual tier of a word. The tiers never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Known or ignored: drawn plain and not interactive.
    Suppressed,
    /// Clicked, saved as a LingQ, or inside the current selection.
    Interacted,
    Untouched,
}

pub struct ReadingSession {
    lesson: Lesson,
    learner: LearnerStore,
    engine: SelectionEngine,
    pages: Vec<Page>,
    cursor: PageCursor,
    reflow: ReflowQueue,
    metrics: StyleMetrics,
    toolbar_params: PlacementParams,
    preview_words: usize,
}

impl ReadingSession {
    pub fn new(lesson: Lesson, config: &Config) -> Self {
        info!(title = lesson.title(), words = lesson.word_count(), "reading session started");
        ReadingSession {
            lesson,
            learner: LearnerStore::new(),
            engine: SelectionEngine::new(config.selection.max_phrase_span),
            pages: Vec::new(),
            cursor: PageCursor::default(),
            reflow: ReflowQueue::new(),
            metrics: config.layout,
            toolbar_params: config.toolbar,
            preview_words: config.selection.preview_words,
        }
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn learner(&self) -> &LearnerStore {
        &self.learner
    }

    pub fn selection(&self) -> &Selection {
        self.engine.selection()
    }

    pub fn engine(&self) -> &SelectionEngine {
        &self.engine
    }

    pub fn metrics(&self) -> &StyleMetrics {
        &self.metrics
    }

    // --- Pages ---

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.cursor.current())
    }

    pub fn next_page(&mut self) -> bool {
        self.cursor.next()
    }

    pub fn previous_page(&mut self) -> bool {
        self.cursor.previous()
    }

    pub fn go_to_page(&mut self, index: usize) {
        self.cursor.go_to(index);
    }

    pub fn jump_to_fraction(&mut self, fraction: f32) {
        let page = self.cursor.page_for_fraction(fraction);
        self.cursor.go_to(page);
    }

    /// Queues a repagination for `viewport`. Only the newest request counts.
    pub fn request_reflow(&mut self, viewport: Vec2) {
        self.reflow.request(viewport);
    }

    /// Runs the pending repagination, if any. Returns whether pages changed.
    pub fn apply_pending_reflow<M: TextMeasurer + ?Sized>(&mut self, measurer: &M) -> bool {
        match self.reflow.take() {
            Some(viewport) => {
                self.repaginate(viewport, measurer);
                true
            }
            None => false,
        }
    }

    /// Replaces all pages, keeping the reader on the page holding the word
    /// that was first on screen.
    pub fn repaginate<M: TextMeasurer + ?Sized>(&mut self, viewport: Vec2, measurer: &M) {
        let first_visible = self.current_page().map(|p| p.first_order);
        self.pages = paginate(self.lesson.words(), viewport, &self.metrics, measurer);
        self.cursor.clamp_to(self.pages.len());
        if let Some(order) = first_visible {
            if let Some(index) = self.pages.iter().position(|p| p.contains_order(order)) {
                self.cursor.go_to(index);
            }
        }
        debug!(pages = self.pages.len(), current = self.cursor.current(), "repaginated");
    }

    /// Forgets the last applied viewport so the next request repaginates.
    pub fn invalidate_layout(&mut self) {
        self.reflow.invalidate();
    }

    // --- Pointer events ---

    pub fn pointer_down(&mut self, target: PointerTarget) {
        if self.engine.toolbar_open() {
            let keeps_toolbar = match &target {
                PointerTarget::Toolbar => true,
                PointerTarget::Word(id) => self.engine.toolbar_word() == Some(id),
                PointerTarget::Elsewhere => false,
            };
            if !keeps_toolbar {
                self.close_toolbar();
            }
        }
        if let PointerTarget::Word(id) = target {
            self.engine.pointer_down(&self.lesson, &self.learner, id.as_str());
        }
    }

    pub fn pointer_enter(&mut self, id: &str) {
        self.engine.pointer_enter(&self.lesson, &self.learner, id);
    }

    pub fn pointer_up(&mut self) {
        self.engine.pointer_up(&self.lesson, &mut self.learner);
    }

    pub fn click(&mut self, id: &str) {
        self.engine.click(&self.lesson, &mut self.learner, id);
    }

    pub fn close_toolbar(&mut self) {
        self.engine.close();
    }

    // --- Learner actions ---

    pub fn mark_known(&mut self, id: &str) {
        let id = WordId::new(id);
        self.learner.mark_known(&id);
        self.engine.release_word(&self.lesson, id.as_str());
    }

    pub fn mark_ignored(&mut self, id: &str) {
        let id = WordId::new(id);
        self.learner.mark_ignored(&id);
        self.engine.release_word(&self.lesson, id.as_str());
    }

    /// Marks every word the toolbar is about as known.
    pub fn mark_target_known(&mut self) {
        for id in self.target_ids() {
            self.mark_known(id.as_str());
        }
    }

    pub fn mark_target_ignored(&mut self) {
        for id in self.target_ids() {
            self.mark_ignored(id.as_str());
        }
    }

    pub fn set_level(&mut self, id: &str, level: i64) -> WordLevel {
        self.learner.set_level(&WordId::new(id), level)
    }

    fn target_ids(&self) -> Vec<WordId> {
        match self.toolbar_target() {
            Some(target) if !target.is_invalid() => target.words.iter().map(|w| w.id.clone()).collect(),
            _ => Vec::new(),
        }
    }

    // --- Rendering queries ---

    pub fn highlight(&self, id: &str) -> Highlight {
        if self.learner.is_suppressed(id) {
            return Highlight::Suppressed;
        }
        let selected = self.lesson.locate(id).is_some_and(|meta| self.engine.selection().covers(id, meta));
        if selected || self.engine.clicked().contains(id) || self.learner.is_lingq(id) {
            Highlight::Interacted
        } else {
            Highlight::Untouched
        }
    }

    pub fn toolbar_target(&self) -> Option<ToolbarTarget<'_>> {
        self.engine.toolbar_target(&self.lesson)
    }

    /// Preview text for an invalid selection, cut to the configured length.
    pub fn invalid_preview(&self) -> Option<String> {
        self.toolbar_target()?.invalid.map(|invalid| invalid.preview(self.preview_words))
    }

    /// The sentence holding the toolbar's anchor word.
    pub fn target_sentence(&self) -> Option<&Sentence> {
        let target = self.toolbar_target()?;
        self.lesson.sentence_of(target.anchor.id.as_str())
    }

    pub fn is_expanded(&self) -> bool {
        self.engine.is_expanded()
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.engine.set_expanded(expanded);
    }

    /// Positions the toolbar against the on-screen rectangles of its words.
    ///
    /// `rect_of` returns `None` for words that are not currently rendered, in
    /// which case there is nothing to anchor to.
    pub fn toolbar_layout(
        &self,
        rect_of: impl Fn(&str) -> Option<Rect>,
        toolbar_size: Vec2,
        panel_size: Option<Vec2>,
        viewport: Vec2,
    ) -> Option<ToolbarLayout> {
        let target = self.toolbar_target()?;
        let first = rect_of(target.anchor.id.as_str())?;
        let anchor = match rect_of(target.last().id.as_str()) {
            Some(last) => first.union(last),
            None => first,
        };
        let panel = if self.engine.is_expanded() { panel_size } else { None };
        Some(layout_toolbar(anchor, toolbar_size, panel, viewport, &self.toolbar_params))
    }
}
