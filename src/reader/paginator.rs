//*** START FILE: src/reader/paginator.rs ***//
use egui::Vec2;
use serde::Serialize;
use tracing::{debug, warn};

use super::measure::{MeasureSurface, TextMeasurer};
use crate::config::StyleMetrics;
use crate::types::lesson::Word;

/// A contiguous run of words shown together.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Page {
    /// Document-order position of the first word.
    pub first_order: usize,
    pub words: Vec<Word>,
}

impl Page {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Document-order position one past the last word.
    pub fn end_order(&self) -> usize {
        self.first_order + self.words.len()
    }

    pub fn contains_order(&self, order: usize) -> bool {
        order >= self.first_order && order < self.end_order()
    }
}

/// Splits `words` into pages that fit `viewport` when rendered with `metrics`.
///
/// Words are appended one at a time to a measurement surface; when the
/// surface outgrows the available height the last word starts a new page.
/// A page always keeps its first word even if that word alone overflows.
/// A zero-sized viewport yields a single page with everything.
pub fn paginate<M: TextMeasurer + ?Sized>(
    words: &[Word],
    viewport: Vec2,
    metrics: &StyleMetrics,
    measurer: &M,
) -> Vec<Page> {
    if words.is_empty() {
        return Vec::new();
    }
    if !(viewport.x > 0.0 && viewport.y > 0.0) {
        warn!(width = viewport.x, height = viewport.y, "viewport not measurable, using a single page");
        return vec![Page { first_order: 0, words: words.to_vec() }];
    }

    let content_width = viewport.x.min(metrics.content_max_width);
    let available_height = viewport.y - metrics.vertical_padding() - metrics.title_allowance;
    let mut surface = MeasureSurface::new(measurer, *metrics, content_width);

    let mut pages = Vec::new();
    let mut current: Vec<Word> = Vec::new();
    let mut first_order = 0;

    for (order, word) in words.iter().enumerate() {
        surface.push(&word.text);
        if surface.height() > available_height && !current.is_empty() {
            surface.pop();
            pages.push(Page { first_order, words: std::mem::take(&mut current) });
            surface.clear();
            surface.push(&word.text);
            first_order = order;
        }
        current.push(word.clone());
    }

    if !current.is_empty() {
        pages.push(Page { first_order, words: current });
    }
    if pages.is_empty() {
        pages.push(Page { first_order: 0, words: words.to_vec() });
    }

    debug!(pages = pages.len(), width = viewport.x, height = viewport.y, "paginated");
    pages
}

//*** END FILE: src/reader/paginator.rs ***//
