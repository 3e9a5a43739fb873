use crate::Squircles;
use crate::constants::{CORNER_HIT_RADIUS, MERGE_CENTER_THRESHOLD};
use crate::grid::CellHit;
use eframe::egui::{Color32, Context, Event, Key, Painter, Response, Stroke};

/// what the pointer is currently doing to the grid. grabbing the ball is
/// tracked on the ball itself, since a grab survives until the next release
/// no matter where the pointer wanders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    CornerDrag { cell: usize, corner: usize },
    MergeDrag { source: usize },
}

pub struct Interaction {
    pub mode: InteractionMode,
}

impl Interaction {
    pub fn new() -> Self {
        Interaction {
            mode: InteractionMode::Idle,
        }
    }

    /// called once per frame; routes presses to the fixed balls, the active
    /// ball, a cell corner, or a merge start, in that order.
    pub fn handle_pointer(&mut self, response: &Response, app: &mut Squircles) {
        if response.drag_started() {
            if let Some(screen_pos) = response.interact_pointer_pos() {
                let p = app.screen_to_canvas(screen_pos);
                app.pointer = p;

                // 1) a press on a fixed ball promotes it back to the active
                //    ball, pre-grabbed
                if app.reactivate_fixed_at(p) {
                    self.mode = InteractionMode::Idle;
                    return;
                }

                // 2) a press near the active ball grabs it and suppresses
                //    all grid interaction
                if app.ball.visible
                    && !app.ball.fixed
                    && p.distance(app.ball.pos) < app.ball.r * 1.5
                {
                    app.ball.grabbed = true;
                    self.mode = InteractionMode::Idle;
                    return;
                }

                // 3) otherwise the grid decides: corner drag or merge start
                self.mode = match app.grid.hit_test(p) {
                    CellHit::Corner { cell, corner } => InteractionMode::CornerDrag { cell, corner },
                    CellHit::Body { cell } => InteractionMode::MergeDrag { source: cell },
                    CellHit::None => InteractionMode::Idle,
                };
            }
        }

        if response.dragged() {
            if let Some(screen_pos) = response.interact_pointer_pos() {
                let p = app.screen_to_canvas(screen_pos);
                app.pointer = p;
                if let InteractionMode::CornerDrag { cell, corner } = self.mode {
                    app.grid.drag_corner(cell, corner, p);
                }
            }
        }

        if response.drag_stopped() {
            app.ball.grabbed = false;
            if let InteractionMode::MergeDrag { source } = self.mode {
                app.resolve_merge(source);
            }
            self.mode = InteractionMode::Idle;
        }
    }

    /// keyboard: reset, spawn, pin, arrow moves, and color typing.
    pub fn handle_keys(&mut self, ctx: &Context, app: &mut Squircles) {
        // a spawning `B` also arrives as a text event in the same frame;
        // it must not leak into the fresh ball's color buffer
        let mut swallow_spawn_text = false;

        for event in &ctx.input(|i| i.events.clone()) {
            match event {
                Event::Key {
                    key: Key::Escape,
                    pressed: true,
                    ..
                } => {
                    app.reset();
                    self.mode = InteractionMode::Idle;
                }

                Event::Key {
                    key: Key::B,
                    pressed: true,
                    ..
                } => {
                    // only a spawn key while there is no free ball; a free
                    // ball keeps `b` for color typing (blue, #abc123, ...)
                    if !app.ball.visible || app.ball.fixed {
                        app.spawn_ball();
                        swallow_spawn_text = true;
                    }
                }

                Event::Key {
                    key: Key::Enter,
                    pressed: true,
                    ..
                } => {
                    if app.ball.visible && !app.ball.fixed {
                        app.pin_ball();
                    }
                }

                Event::Key {
                    key,
                    pressed: true,
                    ..
                } if app.ball.accepts_keys() => match key {
                    Key::ArrowUp => app.ball.nudge(0.0, -1.0),
                    Key::ArrowDown => app.ball.nudge(0.0, 1.0),
                    Key::ArrowLeft => app.ball.nudge(-1.0, 0.0),
                    Key::ArrowRight => app.ball.nudge(1.0, 0.0),
                    Key::Backspace => app.pop_typed_char(),
                    _ => {}
                },

                Event::Text(text) if app.ball.accepts_keys() => {
                    if swallow_spawn_text && text.eq_ignore_ascii_case("b") {
                        swallow_spawn_text = false;
                        continue;
                    }
                    for ch in text.chars() {
                        if ch.is_ascii_alphanumeric() || ch == '#' {
                            app.push_typed_char(ch);
                        }
                    }
                }

                _ => {}
            }
        }
    }

    /// visual guides on top of everything: the corner ring while adjusting
    /// curvature, the proximity ring while merge-dragging, and the cursor
    /// overlay that always follows the pointer.
    pub fn paint(&self, ctx: &Context, painter: &Painter, app: &Squircles) {
        let guide_stroke = Stroke::new(4.0, Color32::WHITE);

        match self.mode {
            InteractionMode::CornerDrag { cell, corner } => {
                let pos = app.canvas_to_screen(app.grid.cell(cell).corner_pos(corner));
                painter.circle_stroke(pos, (CORNER_HIT_RADIUS + 5.0) as f32, guide_stroke);
            }
            InteractionMode::MergeDrag { source } => {
                // the ring grows when hovering a cell the merge could land on
                let mut guide_r = 15.0;
                if let Some(target) = app.grid.cell_at(app.pointer) {
                    if target != source && !app.grid.cell(target).is_merged {
                        guide_r = MERGE_CENTER_THRESHOLD;
                    }
                }
                let pos = app.canvas_to_screen(app.pointer);
                painter.circle_stroke(pos, guide_r as f32, guide_stroke);
            }
            InteractionMode::Idle => {}
        }

        // cursor overlay, enlarged while the ball is grabbed
        if let Some(hover) = ctx.input(|i| i.pointer.hover_pos()) {
            let radius = if app.ball.grabbed { 40.0 } else { 30.0 };
            painter.circle_stroke(
                hover,
                radius,
                Stroke::new(1.5, Color32::from_gray(160)),
            );
        }
    }
}
