//! Ball physics: wall bounces, paddle reflection, speed ramp and prediction

use glam::Vec2;

use crate::consts::{MAX_BOUNCE_ANGLE, SERVE_ANGLE_SPREAD};
use crate::mirror_into_range;
use crate::settings::PongSettings;
use crate::sim::rng::GameRng;

/// Below this horizontal speed the ball is treated as stationary for prediction
const MIN_PREDICT_VX: f32 = 0.001;

/// Outcome of the goal check after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalResult {
    NoGoal,
    /// Ball left through the right edge; the left (human) side scores
    PlayerGoal,
    /// Ball left through the left edge; the right (AI) side scores
    AiGoal,
}

#[derive(Debug, Clone)]
pub struct Ball {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    /// Target velocity magnitude
    speed: f32,
    initial_speed: f32,
    max_speed: f32,
    speed_increase: f32,
    min_velocity_y: f32,
    size: f32,
    canvas: Vec2,
    /// Bounces in the current rally
    bounce_count: u32,
    wall_bounces: u32,
    paddle_bounces: u32,
}

impl Ball {
    /// Ball at the center of the court, already served
    pub fn new(settings: &PongSettings, rng: &mut GameRng) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            speed: settings.initial_ball_speed,
            initial_speed: settings.initial_ball_speed,
            max_speed: settings.initial_ball_speed * settings.max_speed_multiplier,
            speed_increase: settings.speed_increase,
            min_velocity_y: settings.min_velocity_y,
            size: settings.ball_size,
            canvas: Vec2::new(settings.canvas_width, settings.canvas_height),
            bounce_count: 0,
            wall_bounces: 0,
            paddle_bounces: 0,
        };
        ball.reset(rng);
        ball
    }

    /// Move by one tick of velocity and bounce off the top/bottom walls.
    /// Returns the number of wall contacts.
    pub fn advance(&mut self) -> u32 {
        self.pos += self.vel;
        let mut hits = 0;
        if self.pos.y <= 0.0 {
            self.pos.y = 0.0;
            self.vel.y = self.vel.y.abs();
            hits += 1;
        }
        let floor = self.canvas.y - self.size;
        if self.pos.y >= floor {
            self.pos.y = floor;
            self.vel.y = -self.vel.y.abs();
            hits += 1;
        }
        self.wall_bounces += hits;
        self.bounce_count += hits;
        hits
    }

    /// AABB overlap with a paddle rectangle, edges inclusive
    pub fn collides(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        self.pos.x + self.size >= x
            && self.pos.x <= x + width
            && self.pos.y + self.size >= y
            && self.pos.y <= y + height
    }

    /// Reflect off a paddle face.
    ///
    /// The angle depends on where the ball meets the paddle (up to 45° at the
    /// tips). The ball is snapped outside the face and sped up; |vy| is floored
    /// by steepening the angle so the magnitude stays exactly `speed`.
    pub fn handle_paddle_collision(&mut self, x: f32, y: f32, width: f32, height: f32, left: bool) {
        let ball_center_y = self.pos.y + self.size / 2.0;
        let paddle_center_y = y + height / 2.0;
        let relative = ((ball_center_y - paddle_center_y) / (height / 2.0)).clamp(-1.0, 1.0);
        let angle = relative * MAX_BOUNCE_ANGLE;

        self.increase_speed();

        let mut vy = self.speed * angle.sin();
        if vy.abs() < self.min_velocity_y {
            vy = if vy >= 0.0 {
                self.min_velocity_y
            } else {
                -self.min_velocity_y
            };
        }
        let vx = (self.speed * self.speed - vy * vy).max(0.0).sqrt();

        if left {
            self.pos.x = x + width;
            self.vel = Vec2::new(vx, vy);
        } else {
            self.pos.x = x - self.size;
            self.vel = Vec2::new(-vx, vy);
        }

        self.paddle_bounces += 1;
        self.bounce_count += 1;
    }

    /// Multiply speed by the increase factor up to the cap and rescale velocity
    pub fn increase_speed(&mut self) {
        self.speed = (self.speed * self.speed_increase).min(self.max_speed);
        let magnitude = self.vel.length();
        if magnitude > 0.0 {
            self.vel *= self.speed / magnitude;
        }
    }

    pub fn check_goal(&self) -> GoalResult {
        if self.pos.x < 0.0 {
            GoalResult::AiGoal
        } else if self.pos.x > self.canvas.x {
            GoalResult::PlayerGoal
        } else {
            GoalResult::NoGoal
        }
    }

    /// New rally: recenter and serve at the current speed
    pub fn reset(&mut self, rng: &mut GameRng) {
        self.pos = (self.canvas - Vec2::splat(self.size)) / 2.0;
        let angle = (rng.unit() * 2.0 - 1.0) * SERVE_ANGLE_SPREAD;
        let go_left = rng.coin();
        let vx = self.speed * angle.cos();
        self.vel = Vec2::new(if go_left { -vx } else { vx }, self.speed * angle.sin());
        self.bounce_count = 0;
    }

    /// New match: initial speed and cleared counters
    pub fn full_reset(&mut self, rng: &mut GameRng) {
        self.speed = self.initial_speed;
        self.wall_bounces = 0;
        self.paddle_bounces = 0;
        self.reset(rng);
    }

    /// Y (top edge) the ball will have when it reaches `target_x`, folding
    /// wall reflections back into the court.
    ///
    /// Returns the current y when the ball is not moving horizontally or is
    /// moving away from `target_x`.
    pub fn predict_y_at_x(&self, target_x: f32) -> f32 {
        if self.vel.x.abs() < MIN_PREDICT_VX {
            return self.pos.y;
        }
        let time = (target_x - self.pos.x) / self.vel.x;
        if time < 0.0 {
            return self.pos.y;
        }
        let predicted = self.pos.y + self.vel.y * time;
        mirror_into_range(predicted, self.canvas.y - self.size)
    }

    pub fn total_velocity(&self) -> f32 {
        self.vel.length()
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn bounce_count(&self) -> u32 {
        self.bounce_count
    }

    pub fn wall_bounces(&self) -> u32 {
        self.wall_bounces
    }

    pub fn paddle_bounces(&self) -> u32 {
        self.paddle_bounces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ball() -> Ball {
        Ball::new(&PongSettings::default(), &mut GameRng::new(42))
    }

    #[test]
    fn test_serve_from_center() {
        let b = ball();
        assert_eq!(b.pos, Vec2::new(392.5, 292.5));
        assert!((b.total_velocity() - 3.0).abs() < 1e-4);
        assert_eq!(b.bounce_count(), 0);
    }

    #[test]
    fn test_serve_angle_and_side_distribution() {
        let mut rng = GameRng::new(99);
        let mut b = ball();
        let mut left = 0;
        let runs = 2000;
        for _ in 0..runs {
            b.reset(&mut rng);
            let angle = (b.vel.y / b.vel.x.abs()).atan();
            assert!(angle.abs() <= SERVE_ANGLE_SPREAD + 1e-4);
            if b.vel.x < 0.0 {
                left += 1;
            }
        }
        let ratio = left as f32 / runs as f32;
        assert!((ratio - 0.5).abs() < 0.05, "left ratio {}", ratio);
    }

    #[test]
    fn test_top_wall_bounce() {
        let mut b = ball();
        b.pos = Vec2::new(100.0, 1.0);
        b.vel = Vec2::new(2.0, -3.0);
        assert_eq!(b.advance(), 1);
        assert_eq!(b.pos.y, 0.0);
        assert_eq!(b.vel.y, 3.0);
        assert_eq!(b.wall_bounces(), 1);
        assert_eq!(b.bounce_count(), 1);
    }

    #[test]
    fn test_bottom_wall_bounce() {
        let mut b = ball();
        b.pos = Vec2::new(100.0, 584.0);
        b.vel = Vec2::new(2.0, 3.0);
        assert_eq!(b.advance(), 1);
        assert_eq!(b.pos.y, 585.0);
        assert_eq!(b.vel.y, -3.0);
    }

    #[test]
    fn test_center_hit_is_floored() {
        let mut b = ball();
        // Paddle at y=260..340, ball centered on it
        b.pos = Vec2::new(40.0, 292.5);
        b.vel = Vec2::new(-3.0, 0.0);
        b.handle_paddle_collision(30.0, 260.0, 15.0, 80.0, true);
        assert_eq!(b.pos.x, 45.0);
        assert!(b.vel.x > 0.0);
        assert!((b.vel.y - 0.5).abs() < 1e-5);
        assert!((b.total_velocity() - 3.15).abs() < 1e-4);
        assert_eq!(b.paddle_bounces(), 1);
    }

    #[test]
    fn test_edge_hit_reflects_at_45_degrees() {
        let mut b = ball();
        // Ball center well below the paddle bottom -> relative clamps to 1
        b.pos = Vec2::new(750.0, 400.0);
        b.vel = Vec2::new(3.0, 0.0);
        b.handle_paddle_collision(755.0, 260.0, 15.0, 80.0, false);
        assert_eq!(b.pos.x, 740.0);
        assert!(b.vel.x < 0.0);
        assert!((b.vel.x.abs() - b.vel.y).abs() < 1e-4);
    }

    #[test]
    fn test_speed_caps_after_many_hits() {
        let mut b = ball();
        for _ in 0..50 {
            b.pos = Vec2::new(40.0, 270.0);
            b.handle_paddle_collision(30.0, 260.0, 15.0, 80.0, true);
        }
        assert_eq!(b.speed(), b.max_speed());
        assert!((b.total_velocity() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_rally_reset_keeps_speed_full_reset_restores() {
        let mut rng = GameRng::new(1);
        let mut b = ball();
        b.increase_speed();
        b.increase_speed();
        let ramped = b.speed();
        b.reset(&mut rng);
        assert_eq!(b.speed(), ramped);
        assert!((b.total_velocity() - ramped).abs() < 1e-4);
        b.full_reset(&mut rng);
        assert_eq!(b.speed(), 3.0);
        assert_eq!(b.paddle_bounces(), 0);
    }

    #[test]
    fn test_goal_sides() {
        let mut b = ball();
        b.pos.x = -0.5;
        assert_eq!(b.check_goal(), GoalResult::AiGoal);
        b.pos.x = 800.5;
        assert_eq!(b.check_goal(), GoalResult::PlayerGoal);
        b.pos.x = 800.0;
        assert_eq!(b.check_goal(), GoalResult::NoGoal);
    }

    #[test]
    fn test_predict_straight_line() {
        let mut b = ball();
        b.pos = Vec2::new(100.0, 200.0);
        b.vel = Vec2::new(4.0, 1.0);
        // 100 ticks to x=500 -> y=300
        assert!((b.predict_y_at_x(500.0) - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_predict_one_reflection() {
        let mut b = ball();
        b.pos = Vec2::new(100.0, 50.0);
        b.vel = Vec2::new(4.0, -1.0);
        // Unfolded y = 50 - 100 = -50 -> mirrored to 50
        assert!((b.predict_y_at_x(500.0) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_predict_guards() {
        let mut b = ball();
        b.pos = Vec2::new(100.0, 123.0);
        b.vel = Vec2::new(0.0, 5.0);
        assert_eq!(b.predict_y_at_x(700.0), 123.0);
        b.vel = Vec2::new(-3.0, 5.0);
        assert_eq!(b.predict_y_at_x(700.0), 123.0);
    }

    proptest! {
        #[test]
        fn prop_reflection_bounds(
            offset in -120.0f32..120.0,
            hits in 1usize..60,
            left in any::<bool>()
        ) {
            let mut b = ball();
            for _ in 0..hits {
                let before = b.speed();
                b.pos = Vec2::new(400.0, 292.5 + offset);
                let paddle_x = if left { 30.0 } else { 755.0 };
                b.handle_paddle_collision(paddle_x, 260.0, 15.0, 80.0, left);
                let expected = (before * 1.05).min(b.max_speed());
                prop_assert!(b.vel.y.abs() >= 0.5 - 1e-5);
                prop_assert!((b.total_velocity() - expected).abs() < 1e-3);
                prop_assert_eq!(b.vel.x > 0.0, left);
            }
        }

        #[test]
        fn prop_prediction_stays_on_court(
            x in 0.0f32..400.0,
            y in 0.0f32..585.0,
            vx in 0.5f32..12.0,
            vy in -12.0f32..12.0
        ) {
            let mut b = ball();
            b.pos = Vec2::new(x, y);
            b.vel = Vec2::new(vx, vy);
            let predicted = b.predict_y_at_x(762.5);
            prop_assert!((0.0..=585.0).contains(&predicted));
        }
    }
}
