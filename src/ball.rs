use crate::constants::{BALL_RADIUS, BALL_STEP, CANVAS_HEIGHT, CANVAS_WIDTH, GRAB_FOLLOW};
use eframe::egui::{Color32, Painter, Stroke};
use kurbo::Point;

/// the single active ball. hidden until spawned, then free, grabbed by the
/// pointer, or pinned away into the fixed collection.
#[derive(Clone, Debug)]
pub struct Ball {
    pub pos: Point,
    pub r: f64,
    pub color: Color32,
    pub visible: bool,
    pub fixed: bool,
    pub grabbed: bool,
    /// id of the fixed entry this ball was pinned into, if any
    pub fixed_ref: Option<u64>,
}

impl Default for Ball {
    fn default() -> Self {
        Ball {
            pos: Point::ZERO,
            r: BALL_RADIUS,
            color: Color32::from_rgb(0xFF, 0xCC, 0x00),
            visible: false,
            fixed: false,
            grabbed: false,
            fixed_ref: None,
        }
    }
}

impl Ball {
    /// free to take arrow keys and color typing?
    pub fn accepts_keys(&self) -> bool {
        self.visible && !self.grabbed && !self.fixed
    }

    /// arrow-key step, clamped to the canvas
    pub fn nudge(&mut self, dx: f64, dy: f64) {
        self.pos.x += dx * BALL_STEP;
        self.pos.y += dy * BALL_STEP;
        self.clamp_to_canvas();
    }

    /// one animation-frame step toward the pointer while grabbed
    pub fn follow(&mut self, target: Point) {
        self.pos += (target - self.pos) * GRAB_FOLLOW;
        self.clamp_to_canvas();
    }

    fn clamp_to_canvas(&mut self) {
        self.pos.x = self.pos.x.clamp(self.r, CANVAS_WIDTH - self.r);
        self.pos.y = self.pos.y.clamp(self.r, CANVAS_HEIGHT - self.r);
    }

    /// a ring in the ball's color (thicker while grabbed) around a filled
    /// inner disc
    pub fn draw(&self, painter: &Painter, app: &crate::Squircles) {
        let center = app.canvas_to_screen(self.pos);
        let ring = if self.grabbed { 5.0 } else { 3.0 };
        painter.circle_stroke(center, self.r as f32, Stroke::new(ring, self.color));
        let inner = self.r - ring as f64;
        if inner > 0.0 {
            painter.circle_filled(center, inner as f32, self.color);
        }
    }
}

/// a pinned snapshot of the active ball
#[derive(Clone, Debug, PartialEq)]
pub struct FixedBall {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub color: Color32,
    pub id: u64,
}

impl FixedBall {
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn draw(&self, painter: &Painter, app: &crate::Squircles) {
        let center = app.canvas_to_screen(self.center());
        painter.circle_filled(center, self.r as f32, self.color);
        // thin gray outline marks the ball as pinned
        let outline = Color32::from_rgb(0x80, 0x80, 0x80);
        painter.circle_stroke(center, self.r as f32, Stroke::new(1.0, outline));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn free_ball() -> Ball {
        Ball {
            pos: Point::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0),
            visible: true,
            ..Ball::default()
        }
    }

    #[test]
    fn nudge_moves_by_one_step() {
        let mut ball = free_ball();
        let before = ball.pos;
        ball.nudge(1.0, 0.0);
        assert_eq!(ball.pos, Point::new(before.x + BALL_STEP, before.y));
        ball.nudge(0.0, -1.0);
        assert_eq!(ball.pos.y, before.y - BALL_STEP);
    }

    #[test]
    fn nudge_clamps_at_the_walls() {
        let mut ball = free_ball();
        for _ in 0..1_000 {
            ball.nudge(-1.0, 0.0);
        }
        assert_eq!(ball.pos.x, ball.r);
        for _ in 0..1_000 {
            ball.nudge(1.0, 1.0);
        }
        assert_eq!(ball.pos.x, CANVAS_WIDTH - ball.r);
        assert_eq!(ball.pos.y, CANVAS_HEIGHT - ball.r);
    }

    #[test]
    fn follow_converges_toward_the_target() {
        let mut ball = free_ball();
        let target = Point::new(100.0, 400.0);
        let start_dist = ball.pos.distance(target);
        ball.follow(target);
        assert!(ball.pos.distance(target) < start_dist);
        for _ in 0..200 {
            ball.follow(target);
        }
        assert!(ball.pos.distance(target) < 1e-6);
    }

    #[test]
    fn follow_never_escapes_the_canvas() {
        let mut ball = free_ball();
        // pointer parked far outside the canvas
        let target = Point::new(-500.0, CANVAS_HEIGHT + 500.0);
        for _ in 0..200 {
            ball.follow(target);
        }
        assert_eq!(ball.pos, Point::new(ball.r, CANVAS_HEIGHT - ball.r));
    }

    #[test]
    fn key_acceptance_follows_the_state_machine() {
        let mut ball = Ball::default();
        assert!(!ball.accepts_keys()); // hidden
        ball.visible = true;
        assert!(ball.accepts_keys()); // free
        ball.grabbed = true;
        assert!(!ball.accepts_keys());
        ball.grabbed = false;
        ball.fixed = true;
        assert!(!ball.accepts_keys());
    }

    proptest! {
        #[test]
        fn any_nudge_sequence_stays_in_bounds(steps in proptest::collection::vec((-1i8..=1, -1i8..=1), 0..200)) {
            let mut ball = free_ball();
            for (dx, dy) in steps {
                ball.nudge(dx as f64, dy as f64);
                prop_assert!(ball.pos.x >= ball.r && ball.pos.x <= CANVAS_WIDTH - ball.r);
                prop_assert!(ball.pos.y >= ball.r && ball.pos.y <= CANVAS_HEIGHT - ball.r);
            }
        }
    }
}
