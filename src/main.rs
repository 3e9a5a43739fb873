mod ball;
mod color;
mod constants;
mod grid;
mod interaction;

use crate::ball::{Ball, FixedBall};
use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH, MERGE_CENTER_THRESHOLD};
use crate::grid::Grid;
use crate::interaction::Interaction;
use eframe::egui::{self, Color32, Pos2, Rect, Sense, Vec2};
use kurbo::Point;
use log::info;
use rand::seq::SliceRandom;

/// main application state
pub struct Squircles {
    pub grid: Grid,
    pub ball: Ball,
    pub fixed_balls: Vec<FixedBall>,
    next_fixed_id: u64,

    /// accumulating color-typing buffer; cleared whenever it matches
    pub typed_color: String,

    /// last known pointer position, in canvas coordinates. the grab-follow
    /// step and the merge guides keep using it even between pointer events.
    pub pointer: Point,

    /// top-left of the canvas in screen space, refreshed every frame
    canvas_origin: Vec2,

    // kept in an Option so it can be taken out while it mutates the app
    interaction: Option<Interaction>,
}

impl Default for Squircles {
    fn default() -> Self {
        Squircles {
            grid: Grid::new(),
            ball: Ball::default(),
            fixed_balls: Vec::new(),
            next_fixed_id: 0,
            typed_color: String::new(),
            pointer: Point::ZERO,
            canvas_origin: Vec2::ZERO,
            interaction: Some(Interaction::new()),
        }
    }
}

fn main() -> eframe::Result {
    env_logger::init();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32])
            .with_resizable(false),
        ..Default::default()
    };
    eframe::run_native(
        "Squircles",
        native_options,
        Box::new(|cc| Ok(Box::new(Squircles::new(cc)))),
    )
}

impl Squircles {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    /// given a point in canvas coordinates, return the screen-space point
    pub fn canvas_to_screen(&self, p: Point) -> Pos2 {
        Pos2::new(p.x as f32, p.y as f32) + self.canvas_origin
    }

    pub fn screen_to_canvas(&self, p: Pos2) -> Point {
        let p = p - self.canvas_origin;
        Point::new(p.x as f64, p.y as f64)
    }

    pub fn canvas_to_screen_rect(&self, r: kurbo::Rect) -> Rect {
        Rect::from_min_max(
            self.canvas_to_screen(r.origin()),
            self.canvas_to_screen(Point::new(r.x1, r.y1)),
        )
    }

    /// drop the ball onto the center of a random free cell with a random
    /// color. with every cell merged away there is nowhere to drop it.
    pub fn spawn_ball(&mut self) {
        self.ball.fixed = false;
        self.ball.fixed_ref = None;
        self.ball.grabbed = false;
        self.typed_color.clear();

        let free = self.grid.free_cells();
        let mut rng = rand::thread_rng();
        match free.choose(&mut rng) {
            Some(&idx) => {
                self.ball.pos = self.grid.cell(idx).rect.center();
                self.ball.color = color::random_color(&mut rng);
                self.ball.visible = true;
            }
            None => {
                self.ball.visible = false;
                info!("every cell is merged; nowhere to drop the ball");
            }
        }
    }

    /// pin the active ball: snapshot it into the fixed collection and hide it
    pub fn pin_ball(&mut self) {
        let snapshot = FixedBall {
            x: self.ball.pos.x,
            y: self.ball.pos.y,
            r: self.ball.r,
            color: self.ball.color,
            id: self.next_fixed_id,
        };
        self.next_fixed_id += 1;
        self.ball.fixed_ref = Some(snapshot.id);
        self.fixed_balls.push(snapshot);

        self.ball.fixed = true;
        self.ball.grabbed = false;
        self.ball.visible = false;
        self.typed_color.clear();
    }

    /// a press inside a fixed ball promotes it back to the active ball,
    /// already grabbed. returns whether one was hit.
    pub fn reactivate_fixed_at(&mut self, p: Point) -> bool {
        let Some(i) = self
            .fixed_balls
            .iter()
            .position(|fb| p.distance(fb.center()) < fb.r)
        else {
            return false;
        };
        let fb = self.fixed_balls.remove(i);
        self.ball.pos = fb.center();
        self.ball.r = fb.r;
        self.ball.color = fb.color;
        self.ball.visible = true;
        self.ball.fixed = false;
        self.ball.fixed_ref = None;
        self.ball.grabbed = true;
        self.typed_color.clear();
        true
    }

    /// finish a merge drag: the release point must land within the center
    /// threshold of a different, unabsorbed cell. the grid enforces the rest.
    pub fn resolve_merge(&mut self, source: usize) {
        if let Some(target) = self.grid.cell_at(self.pointer) {
            if target != source && !self.grid.cell(target).is_merged {
                let center = self.grid.cell(target).rect.center();
                if self.pointer.distance(center) < MERGE_CENTER_THRESHOLD {
                    self.grid.merge(source, target);
                }
            }
        }
    }

    pub fn push_typed_char(&mut self, ch: char) {
        self.typed_color.push(ch);
        self.apply_typed_color();
    }

    pub fn pop_typed_char(&mut self) {
        if self.typed_color.pop().is_some() {
            self.apply_typed_color();
        }
    }

    /// recolor the ball when the buffer matches a name or hex code; a miss
    /// leaves both the color and the buffer alone
    fn apply_typed_color(&mut self) {
        if let Some(color) = color::parse_color(&self.typed_color) {
            self.ball.color = color;
            self.typed_color.clear();
        }
    }

    /// `Escape`: back to the initial state, fixed balls included
    pub fn reset(&mut self) {
        self.grid.reset();
        self.ball = Ball::default();
        self.fixed_balls.clear();
        self.typed_color.clear();
    }
}

impl eframe::App for Squircles {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(Color32::WHITE))
            .show(ctx, |ui| {
                let (response, painter) = ui.allocate_painter(
                    egui::Vec2::new(CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32),
                    Sense::drag(),
                );
                self.canvas_origin = response.rect.min.to_vec2();
                if let Some(pos) = ctx.input(|i| i.pointer.hover_pos()) {
                    self.pointer = self.screen_to_canvas(pos);
                }

                // 1) take() the Interaction out of the Option
                let mut interaction = self
                    .interaction
                    .take()
                    .expect("interaction was None when it shouldn't be");

                // 2) run the handlers, giving them mutable access to the app
                interaction.handle_keys(ctx, self);
                interaction.handle_pointer(&response, self);

                // grab-follow: ease the ball toward the pointer each frame
                if self.ball.visible && self.ball.grabbed && !self.ball.fixed {
                    self.ball.follow(self.pointer);
                }

                // cells that are neither absorbed nor masters draw standalone
                for (idx, cell) in self.grid.cells().iter().enumerate() {
                    if !cell.is_merged && !self.grid.is_master(idx) {
                        cell.draw(&painter, self);
                    }
                }
                // masters draw once, enlarged
                for &idx in self.grid.masters() {
                    self.grid.cell(idx).draw(&painter, self);
                }

                // fixed balls, skipping one a visible active ball points at
                for fb in &self.fixed_balls {
                    if self.ball.visible && self.ball.fixed_ref == Some(fb.id) {
                        continue;
                    }
                    fb.draw(&painter, self);
                }

                if self.ball.visible && !self.ball.fixed {
                    self.ball.draw(&painter, self);
                }

                // guides and the cursor overlay go on top
                interaction.paint(ctx, &painter, self);

                // 3) put the Interaction back
                self.interaction = Some(interaction);
            });

        // keep animating (grab-follow) even without input events
        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{COLS, ROWS};
    use crate::grid::unit_rect;

    fn idx(row: usize, col: usize) -> usize {
        row * COLS + col
    }

    #[test]
    fn spawn_lands_on_a_free_cell_center() {
        let mut app = Squircles::default();
        app.grid.merge(idx(0, 0), idx(0, 1));
        app.spawn_ball();
        assert!(app.ball.visible);
        assert!(!app.ball.fixed);
        assert!(!app.ball.grabbed);

        let landed = app
            .grid
            .free_cells()
            .iter()
            .any(|&i| app.grid.cell(i).rect.center() == app.ball.pos);
        assert!(landed, "ball must sit on a free cell's center");
        // neither the master nor the absorbed cell qualifies
        assert_ne!(app.ball.pos, app.grid.cell(idx(0, 0)).rect.center());
        assert_ne!(app.ball.pos, unit_rect(0, 1).center());
    }

    #[test]
    fn spawn_stays_hidden_when_no_cell_is_free() {
        let mut app = Squircles::default();
        // merge each column top to bottom: every cell ends up master or absorbed
        for col in 0..COLS {
            for row in 1..ROWS {
                assert!(app.grid.merge(idx(0, col), idx(row, col)));
            }
        }
        assert!(app.grid.free_cells().is_empty());
        app.spawn_ball();
        assert!(!app.ball.visible);
    }

    #[test]
    fn pin_and_reactivate_round_trip() {
        let mut app = Squircles::default();
        app.spawn_ball();
        app.ball.pos = Point::new(123.0, 456.0);
        app.ball.color = Color32::from_rgb(0x12, 0x34, 0x56);
        let (pos, r, color) = (app.ball.pos, app.ball.r, app.ball.color);

        app.pin_ball();
        assert!(!app.ball.visible);
        assert!(app.ball.fixed);
        assert_eq!(app.fixed_balls.len(), 1);
        let fb = app.fixed_balls[0].clone();
        assert_eq!((fb.x, fb.y, fb.r, fb.color), (pos.x, pos.y, r, color));
        assert_eq!(app.ball.fixed_ref, Some(fb.id));

        // press inside the fixed ball: promoted back, pre-grabbed
        assert!(app.reactivate_fixed_at(pos));
        assert!(app.fixed_balls.is_empty());
        assert!(app.ball.visible && app.ball.grabbed && !app.ball.fixed);
        assert_eq!(app.ball.fixed_ref, None);
        assert_eq!((app.ball.pos, app.ball.r, app.ball.color), (pos, r, color));
    }

    #[test]
    fn reactivation_misses_outside_the_radius() {
        let mut app = Squircles::default();
        app.spawn_ball();
        app.ball.pos = Point::new(200.0, 300.0);
        app.pin_ball();
        let r = app.fixed_balls[0].r;
        assert!(!app.reactivate_fixed_at(Point::new(200.0 + r + 1.0, 300.0)));
        assert_eq!(app.fixed_balls.len(), 1);
        assert!(!app.ball.visible);
    }

    #[test]
    fn fixed_ball_ids_are_sequential_and_keep_counting_after_reset() {
        let mut app = Squircles::default();
        app.spawn_ball();
        app.pin_ball();
        app.spawn_ball();
        app.pin_ball();
        assert_eq!(app.fixed_balls[0].id, 0);
        assert_eq!(app.fixed_balls[1].id, 1);
        app.reset();
        app.spawn_ball();
        app.pin_ball();
        // ids never collide with stale references from before the reset
        assert_eq!(app.fixed_balls[0].id, 2);
    }

    #[test]
    fn resolve_merge_respects_the_center_threshold() {
        let mut app = Squircles::default();
        let source = idx(0, 0);
        let target = idx(0, 1);
        let center = app.grid.cell(target).rect.center();

        // release just outside the threshold: nothing happens
        app.pointer = Point::new(center.x + MERGE_CENTER_THRESHOLD + 1.0, center.y);
        app.resolve_merge(source);
        assert!(app.grid.masters().is_empty());

        // release near the center: the merge lands
        app.pointer = Point::new(center.x + 5.0, center.y);
        app.resolve_merge(source);
        assert_eq!(app.grid.masters(), &[source]);
        assert!(app.grid.cell(target).is_merged);
    }

    #[test]
    fn resolve_merge_ignores_release_over_the_source_or_gaps() {
        let mut app = Squircles::default();
        let source = idx(0, 0);
        app.pointer = app.grid.cell(source).rect.center();
        app.resolve_merge(source);
        app.pointer = Point::new(1.0, 1.0); // in the outer gap
        app.resolve_merge(source);
        assert!(app.grid.masters().is_empty());
    }

    #[test]
    fn typing_a_color_recolors_and_clears_the_buffer() {
        let mut app = Squircles::default();
        app.spawn_ball();
        for ch in "red".chars() {
            app.push_typed_char(ch);
        }
        assert_eq!(app.ball.color, Color32::from_rgb(0xFF, 0, 0));
        assert!(app.typed_color.is_empty());

        for ch in "abc123".chars() {
            app.push_typed_char(ch);
        }
        assert_eq!(app.ball.color, Color32::from_rgb(0xAB, 0xC1, 0x23));
        assert!(app.typed_color.is_empty());
    }

    #[test]
    fn typing_a_hashed_short_hex_recolors() {
        let mut app = Squircles::default();
        app.spawn_ball();
        for ch in "#f0c".chars() {
            app.push_typed_char(ch);
        }
        assert_eq!(app.ball.color, Color32::from_rgb(0xFF, 0x00, 0xCC));
        assert!(app.typed_color.is_empty());
    }

    #[test]
    fn a_miss_keeps_the_buffer_for_further_editing() {
        let mut app = Squircles::default();
        app.spawn_ball();
        let before = app.ball.color;
        app.push_typed_char('z');
        app.push_typed_char('z');
        assert_eq!(app.ball.color, before);
        assert_eq!(app.typed_color, "zz");

        // backspace down to nothing, then type something that matches
        app.pop_typed_char();
        app.pop_typed_char();
        assert!(app.typed_color.is_empty());
        for ch in "blue".chars() {
            app.push_typed_char(ch);
        }
        assert_eq!(app.ball.color, Color32::from_rgb(0, 0, 0xFF));
    }

    #[test]
    fn matching_clears_eagerly_and_leftovers_stay() {
        let mut app = Squircles::default();
        app.spawn_ball();
        for ch in "redd".chars() {
            app.push_typed_char(ch);
        }
        // "r", "re", "red" -> matched and cleared at "red"; the extra "d" stays
        assert_eq!(app.ball.color, Color32::from_rgb(0xFF, 0, 0));
        assert_eq!(app.typed_color, "d");
    }

    #[test]
    fn reset_restores_everything() {
        let mut app = Squircles::default();
        app.grid.merge(idx(2, 0), idx(2, 1));
        app.spawn_ball();
        app.pin_ball();
        app.spawn_ball();
        app.push_typed_char('z');

        app.reset();
        assert_eq!(app.grid.cells().len(), ROWS * COLS);
        assert!(app.grid.masters().is_empty());
        assert!(
            app.grid
                .cells()
                .iter()
                .all(|c| !c.is_merged && c.radius_factors == [0.0; 4])
        );
        assert!(app.fixed_balls.is_empty());
        assert!(!app.ball.visible && !app.ball.fixed && !app.ball.grabbed);
        assert!(app.typed_color.is_empty());
    }
}
