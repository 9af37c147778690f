//! Text measurement for pagination.
//!
//! [`TextMeasurer`] supplies glyph advances; [`MeasureSurface`] is the
//! offscreen buffer the paginator grows word by word. Words are laid out as
//! padded boxes separated by single spaces and wrapped greedily; a box wider
//! than the line still gets a line of its own.

use crate::config::StyleMetrics;

/// Glyph-accurate width source.
pub trait TextMeasurer {
    /// Rendered width of `text` in points for the given style.
    fn text_width(&self, text: &str, metrics: &StyleMetrics) -> f32;

    fn space_width(&self, metrics: &StyleMetrics) -> f32 {
        self.text_width(" ", metrics)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn text_width(&self, text: &str, metrics: &StyleMetrics) -> f32 {
        (**self).text_width(text, metrics)
    }

    fn space_width(&self, metrics: &StyleMetrics) -> f32 {
        (**self).space_width(metrics)
    }
}

/// Every character advances by `advance_em * font_size`.
///
/// Deterministic, so headless runs and tests get stable page breaks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMeasurer {
    pub advance_em: f32,
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self { advance_em: 0.55 }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn text_width(&self, text: &str, metrics: &StyleMetrics) -> f32 {
        text.chars().count() as f32 * self.advance_em * metrics.font_size
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LineState {
    lines: usize,
    line_width: f32,
}

const EMPTY: LineState = LineState { lines: 0, line_width: 0.0 };

/// Growing sequence of word boxes with rollback.
pub struct MeasureSurface<'a, M: TextMeasurer + ?Sized> {
    measurer: &'a M,
    metrics: StyleMetrics,
    inner_width: f32,
    space: f32,
    // One entry per pushed word: the line state after that word.
    states: Vec<LineState>,
}

impl<'a, M: TextMeasurer + ?Sized> MeasureSurface<'a, M> {
    /// `content_width` is the outer width of the surface, padding included.
    pub fn new(measurer: &'a M, metrics: StyleMetrics, content_width: f32) -> Self {
        let inner_width = (content_width - metrics.horizontal_padding()).max(0.0);
        let space = measurer.space_width(&metrics);
        MeasureSurface { measurer, metrics, inner_width, space, states: Vec::new() }
    }

    fn current(&self) -> LineState {
        self.states.last().copied().unwrap_or(EMPTY)
    }

    pub fn push(&mut self, text: &str) {
        let box_width = self.measurer.text_width(text, &self.metrics) + 2.0 * self.metrics.word_padding_x;
        let state = self.current();
        let next = if state.lines == 0 {
            LineState { lines: 1, line_width: box_width }
        } else if state.line_width + self.space + box_width <= self.inner_width {
            LineState { lines: state.lines, line_width: state.line_width + self.space + box_width }
        } else {
            LineState { lines: state.lines + 1, line_width: box_width }
        };
        self.states.push(next);
    }

    /// Removes the most recently pushed word.
    pub fn pop(&mut self) {
        self.states.pop();
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.current().lines
    }

    /// Height of one line: padded word boxes are taller than the bare line height.
    pub fn row_height(&self) -> f32 {
        self.metrics.line_height + 2.0 * self.metrics.word_padding_y
    }

    /// Outer height of the surface, vertical padding included.
    pub fn height(&self) -> f32 {
        self.metrics.vertical_padding() + self.current().lines as f32 * self.row_height()
    }
}
