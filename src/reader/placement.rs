//*** START FILE: src/reader/placement.rs ***//
use egui::{pos2, vec2, Rect, Vec2};

use crate::config::PlacementParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Above,
    Below,
}

/// Where a floating panel goes. `height` is already clamped to `max_height`;
/// content taller than that scrolls inside the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub side: Side,
    pub max_height: f32,
}

impl Placement {
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(pos2(self.x, self.y), vec2(self.width, self.height))
    }
}

/// The toolbar and, when expanded, the detail panel stacked after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolbarLayout {
    pub toolbar: Placement,
    pub panel: Option<Placement>,
}

struct VerticalSpace {
    above: f32,
    below: f32,
}

impl VerticalSpace {
    fn around(anchor: Rect, viewport: Vec2, params: &PlacementParams) -> Self {
        VerticalSpace {
            above: anchor.top() - params.gap - params.edge_margin,
            below: viewport.y - anchor.bottom() - params.gap - params.edge_margin,
        }
    }

    fn choose(&self, content_height: f32) -> Side {
        let larger = if self.above >= self.below { Side::Above } else { Side::Below };
        match (self.above >= content_height, self.below >= content_height) {
            (true, true) | (false, false) => larger,
            (true, false) => Side::Above,
            (false, true) => Side::Below,
        }
    }

    fn on(&self, side: Side) -> f32 {
        match side {
            Side::Above => self.above,
            Side::Below => self.below,
        }
        .max(0.0)
    }
}

fn panel_width(content_width: f32, viewport: Vec2, params: &PlacementParams) -> f32 {
    content_width
        .min(params.max_width)
        .min(viewport.x - 2.0 * params.edge_margin)
        .max(0.0)
}

fn clamp_left(left: f32, width: f32, viewport: Vec2, params: &PlacementParams) -> f32 {
    let max_left = params.edge_margin.max(viewport.x - width - params.edge_margin);
    left.max(params.edge_margin).min(max_left).min((viewport.x - width).max(0.0))
}

/// Positions a panel of `content` size next to `anchor` inside `viewport`.
///
/// The side with more room wins when both fit; otherwise the side that fits;
/// when neither fits, the larger side with the height clamped to it.
pub fn place(anchor: Rect, content: Vec2, viewport: Vec2, params: &PlacementParams) -> Placement {
    let space = VerticalSpace::around(anchor, viewport, params);
    let side = space.choose(content.y);
    place_on(anchor, content, viewport, params, &space, side)
}

fn place_on(
    anchor: Rect,
    content: Vec2,
    viewport: Vec2,
    params: &PlacementParams,
    space: &VerticalSpace,
    side: Side,
) -> Placement {
    let width = panel_width(content.x, viewport, params);
    let x = clamp_left(anchor.left(), width, viewport, params);
    let max_height = space.on(side);
    let height = content.y.min(max_height);
    let y = match side {
        Side::Below => anchor.bottom() + params.gap,
        Side::Above => anchor.top() - params.gap - height,
    };
    Placement { x, y, width, height, side, max_height }
}

/// Lays out the toolbar and the optional expanded panel.
///
/// With a panel the side is decided by the panel height, and the panel sits
/// beyond the toolbar on that side, never wider than the toolbar.
pub fn layout_toolbar(
    anchor: Rect,
    toolbar: Vec2,
    panel: Option<Vec2>,
    viewport: Vec2,
    params: &PlacementParams,
) -> ToolbarLayout {
    let space = VerticalSpace::around(anchor, viewport, params);
    let deciding_height = panel.map_or(toolbar.y, |p| p.y);
    let side = space.choose(deciding_height);
    let toolbar_placement = place_on(anchor, toolbar, viewport, params, &space, side);

    let panel = panel.map(|panel| {
        let width = panel.x.min(toolbar_placement.width).max(0.0);
        let x = clamp_left(toolbar_placement.x, width, viewport, params);
        match side {
            Side::Below => {
                let top = anchor.bottom() + params.gap + toolbar.y + params.gap;
                let max_height = (viewport.y - top - params.edge_margin).max(0.0);
                Placement { x, y: top, width, height: panel.y.min(max_height), side, max_height }
            }
            Side::Above => {
                let toolbar_top = anchor.top() - params.gap - toolbar.y;
                let bottom = toolbar_top - params.gap;
                let max_height = (bottom - params.edge_margin).max(0.0);
                let height = panel.y.min(max_height);
                Placement { x, y: bottom - height, width, height, side, max_height }
            }
        }
    });

    ToolbarLayout { toolbar: toolbar_placement, panel }
}

//*** END FILE: src/reader/placement.rs ***//
