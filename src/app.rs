//*** START FILE: src/app.rs ***//
use eframe::{egui, App};
use egui::{pos2, vec2, Color32, FontId, Key, Rect, RichText, Sense, Stroke, Vec2};
use std::time::Instant;
use tracing::debug;

use lingo_reader::config::{Config, StyleMetrics};
use lingo_reader::profile::WordLevel;
use lingo_reader::reader::{InactivityTimer, Selection, TextMeasurer};
use lingo_reader::{Highlight, Lesson, PointerTarget, ReadingSession, WordId};

const UNTOUCHED_FILL: Color32 = Color32::from_rgb(205, 225, 250);
const INTERACTED_FILL: Color32 = Color32::from_rgb(252, 236, 160);
const SELECTED_STROKE: Color32 = Color32::from_rgb(214, 160, 30);
const INVALID_STROKE: Color32 = Color32::from_rgb(200, 60, 60);
const TEXT_COLOR: Color32 = Color32::from_rgb(30, 30, 30);

/// Measures text with the same fonts egui paints with.
pub struct EguiMeasurer {
    ctx: egui::Context,
}

impl EguiMeasurer {
    pub fn new(ctx: &egui::Context) -> Self {
        EguiMeasurer { ctx: ctx.clone() }
    }
}

impl TextMeasurer for EguiMeasurer {
    fn text_width(&self, text: &str, metrics: &StyleMetrics) -> f32 {
        let font = FontId::proportional(metrics.font_size);
        self.ctx
            .fonts(|f| f.layout_no_wrap(text.to_owned(), font, TEXT_COLOR).size().x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelTab {
    Meaning,
    Sentence,
    Status,
}

enum ToolbarAction {
    Close,
    Known,
    Ignored,
    Level(i64),
    Expand(PanelTab),
    Collapse,
}

// Owned copy of what the toolbar shows, so the session can be mutated after drawing.
struct ToolbarView {
    anchor: WordId,
    text: String,
    translation: String,
    single: bool,
    level: WordLevel,
    invalid_preview: Option<String>,
    sentence_text: String,
    sentence_translation: String,
}

pub struct ReaderApp {
    session: ReadingSession,
    controls: InactivityTimer,
    word_rects: Vec<(WordId, Rect)>,
    toolbar_rects: Vec<Rect>,
    toolbar_size: Vec2,
    panel_size: Vec2,
    tab: PanelTab,
    pressed: Option<WordId>,
    hovered: Option<WordId>,
    last_viewport: Option<Vec2>,
}

impl ReaderApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, lesson: Lesson, config: &Config) -> Self {
        Self {
            session: ReadingSession::new(lesson, config),
            controls: InactivityTimer::from_millis(config.navigation.controls_hide_after_ms),
            word_rects: Vec::new(),
            toolbar_rects: Vec::new(),
            toolbar_size: vec2(300.0, 44.0),
            panel_size: vec2(300.0, 160.0),
            tab: PanelTab::Meaning,
            pressed: None,
            hovered: None,
            last_viewport: None,
        }
    }

    fn word_at(&self, pos: egui::Pos2) -> Option<&WordId> {
        self.word_rects.iter().find(|(_, r)| r.contains(pos)).map(|(id, _)| id)
    }

    fn rect_of(&self, id: &str) -> Option<Rect> {
        self.word_rects.iter().find(|(w, _)| w.as_str() == id).map(|(_, r)| *r)
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (next, previous, escape) = ctx.input(|i| {
            (i.key_pressed(Key::ArrowRight), i.key_pressed(Key::ArrowLeft), i.key_pressed(Key::Escape))
        });
        if next {
            self.session.next_page();
        }
        if previous {
            self.session.previous_page();
        }
        if escape {
            self.session.close_toolbar();
        }
    }

    // Word hit-testing uses the rectangles painted in the previous frame.
    fn handle_pointer(&mut self, ctx: &egui::Context, now: Instant) {
        let (pressed, released, down, moving, pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.pointer.is_moving(),
                i.pointer.interact_pos(),
            )
        });
        if moving || pressed {
            self.controls.activity(now);
        }
        let Some(pos) = pos else {
            return;
        };
        let under = self.word_at(pos).cloned();

        if pressed {
            let target = if self.toolbar_rects.iter().any(|r| r.contains(pos)) {
                PointerTarget::Toolbar
            } else if let Some(id) = &under {
                PointerTarget::Word(id.clone())
            } else {
                PointerTarget::Elsewhere
            };
            if let PointerTarget::Word(id) = &target {
                self.pressed = Some(id.clone());
                self.hovered = Some(id.clone());
            }
            self.session.pointer_down(target);
        } else if down && self.pressed.is_some() && under.is_some() && under != self.hovered {
            if let Some(id) = &under {
                self.session.pointer_enter(id.as_str());
            }
            self.hovered = under.clone();
        }

        if released {
            self.session.pointer_up();
            if let (Some(pressed), Some(id)) = (self.pressed.take(), &under) {
                if &pressed == id {
                    self.session.click(id.as_str());
                }
            }
            self.hovered = None;
        }
    }

    fn draw_page(&mut self, ui: &mut egui::Ui) {
        let metrics = *self.session.metrics();
        let area = ui.max_rect();
        let content_width = area.width().min(metrics.content_max_width);
        let left = area.left() + (area.width() - content_width) / 2.0;

        let title_rect = Rect::from_min_size(pos2(left, area.top()), vec2(content_width, metrics.title_allowance));
        ui.painter().text(
            title_rect.left_center(),
            egui::Align2::LEFT_CENTER,
            self.session.lesson().title(),
            FontId::proportional(metrics.font_size * 1.3),
            ui.visuals().strong_text_color(),
        );

        self.word_rects.clear();
        let Some(page) = self.session.current_page() else {
            return;
        };

        let font = FontId::proportional(metrics.font_size);
        let row_height = metrics.line_height + 2.0 * metrics.word_padding_y;
        let inner_left = left + metrics.padding_left;
        let inner_right = left + content_width - metrics.padding_right;
        let space = ui.fonts(|f| f.layout_no_wrap(" ".to_owned(), font.clone(), TEXT_COLOR).size().x);
        let mut x = inner_left;
        let mut y = area.top() + metrics.title_allowance + metrics.padding_top;
        let mut line_empty = true;

        let painter = ui.painter().clone();
        let mut placed = Vec::with_capacity(page.len());
        for word in &page.words {
            let galley = ui.fonts(|f| f.layout_no_wrap(word.text.clone(), font.clone(), TEXT_COLOR));
            let box_width = galley.size().x + 2.0 * metrics.word_padding_x;
            if !line_empty && x + space + box_width > inner_right {
                x = inner_left;
                y += row_height;
                line_empty = true;
            }
            if !line_empty {
                x += space;
            }
            let rect = Rect::from_min_size(pos2(x, y), vec2(box_width, row_height));
            x += box_width;
            line_empty = false;

            let highlight = self.session.highlight(word.id.as_str());
            let fill = match highlight {
                Highlight::Suppressed => Color32::TRANSPARENT,
                Highlight::Interacted => INTERACTED_FILL,
                Highlight::Untouched => UNTOUCHED_FILL,
            };
            let text_rect = rect.shrink2(vec2(metrics.word_padding_x, metrics.word_padding_y));
            painter.rect_filled(text_rect, 3.0, fill);
            let in_selection = self
                .session
                .lesson()
                .locate(word.id.as_str())
                .is_some_and(|meta| self.session.selection().covers(word.id.as_str(), meta));
            if in_selection {
                let color = match self.session.selection() {
                    Selection::Invalid(_) => INVALID_STROKE,
                    _ => SELECTED_STROKE,
                };
                painter.rect_stroke(text_rect, 3.0, Stroke::new(1.5, color));
            }
            let text_pos = pos2(text_rect.left(), text_rect.center().y - galley.size().y / 2.0);
            painter.galley(text_pos, galley, TEXT_COLOR);
            placed.push((word.id.clone(), rect));
        }
        self.word_rects = placed;
    }

    fn draw_chevrons(&mut self, ui: &mut egui::Ui) {
        let area = ui.max_rect();
        let size = vec2(36.0, 56.0);
        let left = Rect::from_center_size(pos2(area.left() + size.x, area.center().y), size);
        let right = Rect::from_center_size(pos2(area.right() - size.x, area.center().y), size);
        if self.session.cursor().can_go_previous()
            && ui.put(left, egui::Button::new(RichText::new("‹").size(28.0))).clicked()
        {
            self.session.previous_page();
        }
        if self.session.cursor().can_go_next() && ui.put(right, egui::Button::new(RichText::new("›").size(28.0))).clicked()
        {
            self.session.next_page();
        }
    }

    fn draw_progress(&mut self, ui: &mut egui::Ui) {
        let cursor = *self.session.cursor();
        let (rect, response) = ui.allocate_exact_size(vec2(ui.available_width(), 8.0), Sense::click());
        let painter = ui.painter();
        painter.rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);
        let filled = Rect::from_min_size(rect.min, vec2(rect.width() * cursor.progress_fraction(), rect.height()));
        painter.rect_filled(filled, 4.0, ui.visuals().selection.bg_fill);

        let fraction_at = |x: f32| if rect.width() > 0.0 { (x - rect.left()) / rect.width() } else { 0.0 };
        if let Some(pos) = response.hover_pos() {
            let page = cursor.page_for_fraction(fraction_at(pos.x));
            response.clone().on_hover_text_at_pointer(format!("Page {}", page + 1));
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.session.jump_to_fraction(fraction_at(pos.x));
            }
        }
        ui.label(format!("{} / {}", cursor.current() + 1, cursor.count().max(1)));
    }

    fn toolbar_view(&self) -> Option<ToolbarView> {
        let target = self.session.toolbar_target()?;
        let sentence = self.session.target_sentence();
        Some(ToolbarView {
            anchor: target.anchor.id.clone(),
            text: target.text(),
            translation: target.translation(),
            single: target.words.len() == 1,
            level: self.session.learner().level(target.anchor.id.as_str()),
            invalid_preview: self.session.invalid_preview(),
            sentence_text: sentence.map(|s| s.text()).unwrap_or_default(),
            sentence_translation: sentence
                .map(|s| s.words.iter().map(|w| w.gloss()).collect::<Vec<_>>().join(" "))
                .unwrap_or_default(),
        })
    }

    fn draw_toolbar(&mut self, ctx: &egui::Context, viewport: Vec2) {
        self.toolbar_rects.clear();
        let Some(view) = self.toolbar_view() else {
            return;
        };
        let Some(layout) =
            self.session
                .toolbar_layout(|id| self.rect_of(id), self.toolbar_size, Some(self.panel_size), viewport)
        else {
            return;
        };

        let expanded = self.session.is_expanded();
        let mut action = None;
        let toolbar = egui::Area::new(egui::Id::new("word_toolbar"))
            .order(egui::Order::Foreground)
            .fixed_pos(pos2(layout.toolbar.x, layout.toolbar.y))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(layout.toolbar.width);
                    egui::ScrollArea::vertical()
                        .id_source("toolbar_scroll")
                        .max_height(layout.toolbar.max_height)
                        .show(ui, |ui| action = toolbar_contents(ui, &view, expanded));
                });
            });
        self.toolbar_size = toolbar.response.rect.size();
        self.toolbar_rects.push(toolbar.response.rect);

        if let Some(panel) = layout.panel {
            let tab = &mut self.tab;
            let shown = egui::Area::new(egui::Id::new("word_panel"))
                .order(egui::Order::Foreground)
                .fixed_pos(pos2(panel.x, panel.y))
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_max_width(panel.width);
                        egui::ScrollArea::vertical()
                            .id_source("panel_scroll")
                            .max_height(panel.max_height)
                            .show(ui, |ui| {
                                if let Some(a) = panel_contents(ui, tab, &view) {
                                    action = Some(a);
                                }
                            });
                    });
                });
            self.panel_size = shown.response.rect.size();
            self.toolbar_rects.push(shown.response.rect);
        }

        if let Some(action) = action {
            self.apply(action, &view.anchor);
        }
    }

    fn apply(&mut self, action: ToolbarAction, anchor: &WordId) {
        match action {
            ToolbarAction::Close => self.session.close_toolbar(),
            ToolbarAction::Known => self.session.mark_target_known(),
            ToolbarAction::Ignored => self.session.mark_target_ignored(),
            ToolbarAction::Level(level) => {
                let stored = self.session.set_level(anchor.as_str(), level);
                debug!(word = %anchor, level = stored.as_number(), "level set");
            }
            ToolbarAction::Expand(tab) => {
                self.tab = tab;
                self.session.set_expanded(true);
            }
            ToolbarAction::Collapse => self.session.set_expanded(false),
        }
    }
}

fn toolbar_contents(ui: &mut egui::Ui, view: &ToolbarView, expanded: bool) -> Option<ToolbarAction> {
    let mut action = None;
    if let Some(preview) = &view.invalid_preview {
        ui.label(RichText::new(format!("“{}”", preview)).italics());
        ui.colored_label(INVALID_STROKE, "Phrases must stay inside one sentence and stay short.");
        if ui.button("Dismiss").clicked() {
            action = Some(ToolbarAction::Close);
        }
        return action;
    }

    ui.horizontal(|ui| {
        ui.label(RichText::new(&view.text).strong());
        ui.label(RichText::new(&view.translation).weak());
        if ui.small_button("✕").clicked() {
            action = Some(ToolbarAction::Close);
        }
    });
    ui.horizontal_wrapped(|ui| {
        if view.single {
            for level in WordLevel::ALL {
                let selected = view.level == level;
                if ui.selectable_label(selected, level.as_number().to_string()).on_hover_text(level.label()).clicked() {
                    action = Some(ToolbarAction::Level(i64::from(level.as_number())));
                }
            }
        }
        if ui.button("✓ Known").clicked() {
            action = Some(ToolbarAction::Known);
        }
        if ui.button("Ignore").clicked() {
            action = Some(ToolbarAction::Ignored);
        }
        if expanded {
            if ui.button("▴").clicked() {
                action = Some(ToolbarAction::Collapse);
            }
        } else if ui.button("More ▾").clicked() {
            action = Some(ToolbarAction::Expand(PanelTab::Meaning));
        }
    });
    action
}

fn panel_contents(ui: &mut egui::Ui, tab: &mut PanelTab, view: &ToolbarView) -> Option<ToolbarAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        ui.selectable_value(tab, PanelTab::Meaning, "Meaning");
        ui.selectable_value(tab, PanelTab::Sentence, "Sentence");
        if view.single {
            ui.selectable_value(tab, PanelTab::Status, "Status");
        }
    });
    ui.separator();
    match tab {
        PanelTab::Meaning => {
            ui.label(RichText::new(&view.text).strong());
            ui.label(&view.translation);
        }
        PanelTab::Sentence => {
            ui.label(&view.sentence_text);
            ui.label(RichText::new(&view.sentence_translation).weak());
        }
        PanelTab::Status => {
            for level in WordLevel::ALL {
                let text = format!("{} {}", level.as_number(), level.label());
                if ui.radio(view.level == level, text).clicked() {
                    action = Some(ToolbarAction::Level(i64::from(level.as_number())));
                }
            }
        }
    }
    action
}

impl App for ReaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let measurer = EguiMeasurer::new(ctx);
        if self.session.apply_pending_reflow(&measurer) {
            ctx.request_repaint();
        }

        self.handle_keys(ctx);
        self.handle_pointer(ctx, now);

        egui::TopBottomPanel::bottom("progress_panel").show(ctx, |ui| {
            self.draw_progress(ui);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::from_rgb(250, 248, 242)))
            .show(ctx, |ui| {
                let size = ui.available_size();
                if self.last_viewport != Some(size) {
                    self.last_viewport = Some(size);
                    self.session.request_reflow(size);
                    ctx.request_repaint();
                }
                self.draw_page(ui);
                if self.controls.poll(now) {
                    self.draw_chevrons(ui);
                }
            });
        self.draw_toolbar(ctx, ctx.screen_rect().size());

        if let Some(remaining) = self.controls.remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controls.cancel();
    }
}

//*** END FILE: src/app.rs ***//
