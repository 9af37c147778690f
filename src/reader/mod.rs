//*** START FILE: src/reader/mod.rs ***//
pub mod measure;
pub mod navigation;
pub mod paginator;
pub mod placement;
pub mod reflow;
pub mod selection;

pub use measure::{FixedAdvanceMeasurer, MeasureSurface, TextMeasurer};
pub use navigation::{page_for_fraction, InactivityTimer, PageCursor};
pub use paginator::{paginate, Page};
pub use placement::{layout_toolbar, place, Placement, Side, ToolbarLayout};
pub use reflow::ReflowQueue;
pub use selection::{InvalidReason, InvalidSelection, PhraseSpan, Selection, SelectionEngine, ToolbarTarget};
//*** END FILE: src/reader/mod.rs ***//
