//! Paddles: human movement, AI tracking and ball contact

use glam::Vec2;

use crate::consts::{
    AI_DEFAULT_DIFFICULTY, AI_ERROR_FACTOR, AI_MAX_DIFFICULTY, AI_MAX_REACTION_DELAY,
    AI_MIN_DIFFICULTY,
};
use crate::settings::PongSettings;
use crate::sim::rng::GameRng;

use super::ball::Ball;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleType {
    PlayerLeft,
    PlayerRight,
    AiLeft,
    AiRight,
}

impl PaddleType {
    pub fn is_ai(&self) -> bool {
        matches!(self, PaddleType::AiLeft | PaddleType::AiRight)
    }

    pub fn is_left(&self) -> bool {
        matches!(self, PaddleType::PlayerLeft | PaddleType::AiLeft)
    }
}

/// Held-key direction for a human paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleMove {
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct Paddle {
    x: f32,
    /// Top edge, always within `[0, canvas_height - height]`
    y: f32,
    width: f32,
    height: f32,
    /// Pixels per tick
    speed: f32,
    canvas_height: f32,
    kind: PaddleType,
    ai_difficulty: f32,
    /// Ticks left before the AI reacts again
    reaction_delay: u32,
    ai_target_y: f32,
    hits: u32,
    total_movement: f32,
}

impl Paddle {
    /// Paddle at `x`, vertically centered
    pub fn new(x: f32, settings: &PongSettings, kind: PaddleType) -> Self {
        let mut paddle = Self {
            x,
            y: 0.0,
            width: settings.paddle_width,
            height: settings.paddle_height,
            speed: settings.paddle_speed,
            canvas_height: settings.canvas_height,
            kind,
            ai_difficulty: AI_DEFAULT_DIFFICULTY,
            reaction_delay: 0,
            ai_target_y: 0.0,
            hits: 0,
            total_movement: 0.0,
        };
        paddle.center_vertically();
        paddle.ai_target_y = paddle.y;
        paddle
    }

    fn max_y(&self) -> f32 {
        self.canvas_height - self.height
    }

    pub fn move_up(&mut self) -> bool {
        let old = self.y;
        self.y = (self.y - self.speed).max(0.0);
        self.total_movement += old - self.y;
        self.y != old
    }

    pub fn move_down(&mut self) -> bool {
        let old = self.y;
        self.y = (self.y + self.speed).min(self.max_y());
        self.total_movement += self.y - old;
        self.y != old
    }

    pub fn move_in(&mut self, direction: PaddleMove) -> bool {
        match direction {
            PaddleMove::Up => self.move_up(),
            PaddleMove::Down => self.move_down(),
        }
    }

    /// Step toward a target center y, with half a step of dead zone
    pub fn move_towards(&mut self, target_center_y: f32) {
        let difference = target_center_y - self.center_y();
        if difference.abs() > self.speed / 2.0 {
            if difference > 0.0 {
                self.move_down();
            } else {
                self.move_up();
            }
        }
    }

    /// One AI tick: aim at the predicted intercept when the ball approaches,
    /// drift back to center otherwise. No-op for human paddles.
    pub fn update_ai(&mut self, ball: &Ball, rng: &mut GameRng) {
        if !self.kind.is_ai() {
            return;
        }
        if self.reaction_delay > 0 {
            self.reaction_delay -= 1;
            return;
        }

        let approaching = match self.kind {
            PaddleType::AiLeft => ball.vel.x < 0.0,
            PaddleType::AiRight => ball.vel.x > 0.0,
            _ => false,
        };
        self.ai_target_y = if approaching {
            let predicted = ball.predict_y_at_x(self.x + self.width / 2.0);
            let error = (1.0 - self.ai_difficulty) * self.height * AI_ERROR_FACTOR;
            predicted + ball.size() / 2.0 - self.height / 2.0 + (rng.unit() - 0.5) * error
        } else {
            self.max_y() / 2.0
        };

        let ai_speed = self.speed * self.ai_difficulty;
        let target_center = self.ai_target_y + self.height / 2.0;
        let difference = target_center - self.center_y();
        if difference.abs() > ai_speed {
            let old = self.y;
            self.y = if difference > 0.0 {
                (self.y + ai_speed).min(self.max_y())
            } else {
                (self.y - ai_speed).max(0.0)
            };
            self.total_movement += (self.y - old).abs();
        }
    }

    pub fn collides_with(&self, ball: &Ball) -> bool {
        ball.collides(self.x, self.y, self.width, self.height)
    }

    /// Reflect the ball if it overlaps this paddle; returns whether it did
    pub fn handle_ball_collision(&mut self, ball: &mut Ball) -> bool {
        if !self.collides_with(ball) {
            return false;
        }
        ball.handle_paddle_collision(self.x, self.y, self.width, self.height, self.kind.is_left());
        self.hits += 1;
        if self.kind.is_ai() {
            self.reaction_delay = (AI_MAX_REACTION_DELAY * (1.0 - self.ai_difficulty)) as u32;
        }
        true
    }

    /// Where the ball sits relative to the paddle center, in [-1, 1]
    pub fn hit_effect(&self, ball: &Ball) -> f32 {
        ((ball.center().y - self.center_y()) / (self.height / 2.0)).clamp(-1.0, 1.0)
    }

    /// 1.0 when the ball is level with the paddle center, 0.0 when it is
    /// outside the paddle's vertical span
    pub fn ball_coverage(&self, ball: &Ball) -> f32 {
        let ball_y = ball.center().y;
        if ball_y < self.y || ball_y > self.y + self.height {
            return 0.0;
        }
        1.0 - ((ball_y - self.center_y()) / (self.height / 2.0)).abs()
    }

    pub fn distance_to_ball(&self, ball: &Ball) -> f32 {
        self.center().distance(ball.center())
    }

    /// Clamped to `[AI_MIN_DIFFICULTY, AI_MAX_DIFFICULTY]`
    pub fn set_ai_difficulty(&mut self, difficulty: f32) {
        self.ai_difficulty = difficulty.clamp(AI_MIN_DIFFICULTY, AI_MAX_DIFFICULTY);
    }

    pub fn reset(&mut self) {
        self.center_vertically();
        self.hits = 0;
        self.total_movement = 0.0;
        self.reaction_delay = 0;
        self.ai_target_y = self.y;
    }

    pub fn center_vertically(&mut self) {
        self.y = self.max_y() / 2.0;
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y.clamp(0.0, self.max_y());
    }

    pub fn can_move_up(&self) -> bool {
        self.y > 0.0
    }

    pub fn can_move_down(&self) -> bool {
        self.y < self.max_y()
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.center_y())
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn kind(&self) -> PaddleType {
        self.kind
    }

    pub fn is_ai(&self) -> bool {
        self.kind.is_ai()
    }

    pub fn ai_difficulty(&self) -> f32 {
        self.ai_difficulty
    }

    pub fn ai_target_y(&self) -> f32 {
        self.ai_target_y
    }

    pub fn reaction_delay(&self) -> u32 {
        self.reaction_delay
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn total_movement(&self) -> f32 {
        self.total_movement
    }
}
