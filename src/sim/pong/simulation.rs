//! Pong match controller
//!
//! Human paddle on the left, AI paddle on the right. First side to the
//! winning score takes the match.

use crate::audio::SoundEffect;
use crate::error::ConfigError;
use crate::settings::{DifficultyLevel, PongSettings};
use crate::sim::collaborators::Collaborators;
use crate::sim::events::{EventQueue, GameEvent, GameKind, GameResult, GameStatistics, SpecialKind};
use crate::sim::lifecycle::GameState;
use crate::sim::rng::GameRng;
use crate::sim::scheduler::{Ticker, TimerHandle};

use super::ball::{Ball, GoalResult};
use super::paddle::{Paddle, PaddleMove, PaddleType};

/// Discrete input for the pong game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PongCommand {
    /// Key held or released for the human paddle
    Paddle { direction: PaddleMove, pressed: bool },
    Start,
    TogglePause,
    Restart,
    Difficulty(DifficultyLevel),
}

pub struct PongSimulation {
    settings: PongSettings,
    collaborators: Collaborators,
    rng: GameRng,
    state: GameState,
    ball: Ball,
    left: Paddle,
    right: Paddle,
    player_score: u32,
    ai_score: u32,
    held_up: bool,
    held_down: bool,
    /// Longest rally of the match, in bounces
    max_bounce_count: u32,
    total_bounces: u32,
    /// Survives restarts
    ai_difficulty: f32,
    ticker: Ticker,
    events: EventQueue,
}

impl PongSimulation {
    pub fn new(
        settings: PongSettings,
        collaborators: Collaborators,
        mut rng: GameRng,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let ball = Ball::new(&settings, &mut rng);
        let left = Paddle::new(settings.left_paddle_x(), &settings, PaddleType::PlayerLeft);
        let mut right = Paddle::new(settings.right_paddle_x(), &settings, PaddleType::AiRight);
        right.set_ai_difficulty(settings.ai_difficulty);
        let ticker = Ticker::new(settings.tick_interval());
        let mut sim = Self {
            ai_difficulty: right.ai_difficulty(),
            settings,
            collaborators,
            rng,
            state: GameState::Starting,
            ball,
            left,
            right,
            player_score: 0,
            ai_score: 0,
            held_up: false,
            held_down: false,
            max_bounce_count: 0,
            total_bounces: 0,
            ticker,
            events: EventQueue::new(),
        };
        sim.set_state(GameState::WaitingRestart);
        Ok(sim)
    }

    fn set_state(&mut self, new: GameState) {
        if self.state == new {
            return;
        }
        let old = self.state;
        self.state = new;
        log::debug!("Pong state {:?} -> {:?}", old, new);
        self.events.push(GameEvent::StateChanged { old, new });
    }

    /// New match: full ball reset, centered paddles, zeroed scores
    pub fn restart(&mut self) {
        self.ticker.stop(self.collaborators.scheduler.as_mut());
        self.ball.full_reset(&mut self.rng);
        self.left.reset();
        self.right.reset();
        self.right.set_ai_difficulty(self.ai_difficulty);
        self.player_score = 0;
        self.ai_score = 0;
        self.max_bounce_count = 0;
        self.total_bounces = 0;
        self.held_up = false;
        self.held_down = false;
        self.set_state(GameState::WaitingRestart);
        log::info!("Pong match reset");
    }

    pub fn start_game(&mut self) -> bool {
        if self.state != GameState::WaitingRestart {
            return false;
        }
        self.set_state(GameState::Playing);
        self.ticker.start(self.collaborators.scheduler.as_mut());
        log::info!("Pong match started");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        let next = self.state.toggle_play_pause();
        if next == self.state {
            return false;
        }
        let scheduler = self.collaborators.scheduler.as_mut();
        if next.is_paused() {
            self.ticker.stop(scheduler);
        } else {
            self.ticker.start(scheduler);
        }
        self.set_state(next);
        true
    }

    /// Stop ticking and return to WAITING_RESTART; a decided match is rebuilt
    pub fn stop_game(&mut self) {
        self.ticker.stop(self.collaborators.scheduler.as_mut());
        self.held_up = false;
        self.held_down = false;
        if self.state.is_game_over() {
            self.restart();
        } else {
            self.set_state(GameState::WaitingRestart);
        }
    }

    /// Record a key press or release for the human paddle
    pub fn set_paddle_input(&mut self, direction: PaddleMove, pressed: bool) {
        match direction {
            PaddleMove::Up => self.held_up = pressed,
            PaddleMove::Down => self.held_down = pressed,
        }
    }

    pub fn set_difficulty(&mut self, level: DifficultyLevel) {
        self.set_ai_difficulty(level.difficulty());
        log::info!("AI difficulty: {}", level.as_str());
    }

    /// Out-of-range values are clamped
    pub fn set_ai_difficulty(&mut self, difficulty: f32) {
        self.right.set_ai_difficulty(difficulty);
        self.ai_difficulty = self.right.ai_difficulty();
        self.events.special(
            SpecialKind::DifficultyChanged,
            format!("{:.0}%", self.ai_difficulty * 100.0),
        );
    }

    pub fn handle_command(&mut self, command: PongCommand) -> bool {
        match command {
            PongCommand::Paddle { direction, pressed } => {
                self.set_paddle_input(direction, pressed);
                true
            }
            PongCommand::Start => self.start_game(),
            PongCommand::TogglePause => self.toggle_pause(),
            PongCommand::Restart => {
                if self.state.can_be_restarted() {
                    self.restart();
                    true
                } else {
                    false
                }
            }
            PongCommand::Difficulty(level) => {
                self.set_difficulty(level);
                true
            }
        }
    }

    /// One physics tick. No-op unless PLAYING.
    pub fn step(&mut self) {
        if self.state != GameState::Playing {
            return;
        }

        if self.held_up && self.left.can_move_up() {
            self.left.move_up();
        }
        if self.held_down && self.left.can_move_down() {
            self.left.move_down();
        }
        self.right.update_ai(&self.ball, &mut self.rng);

        if self.ball.advance() > 0 {
            self.collaborators.audio.play(SoundEffect::WallBounce);
        }

        if self.left.handle_ball_collision(&mut self.ball) {
            log::debug!("Left paddle hit ({} hits)", self.left.hits());
            self.collaborators.audio.play(SoundEffect::PaddleHit);
        }
        if self.right.handle_ball_collision(&mut self.ball) {
            log::debug!("Right paddle hit ({} hits)", self.right.hits());
            self.collaborators.audio.play(SoundEffect::PaddleHit);
        }

        let goal = self.ball.check_goal();
        if goal != GoalResult::NoGoal {
            self.score_goal(goal);
            self.check_win();
        }
    }

    fn score_goal(&mut self, goal: GoalResult) {
        let rally = self.ball.bounce_count();
        self.max_bounce_count = self.max_bounce_count.max(rally);
        self.total_bounces += rally;

        let delta = match goal {
            GoalResult::PlayerGoal => {
                self.player_score += 1;
                log::info!("Player goal! {}-{}", self.player_score, self.ai_score);
                1
            }
            GoalResult::AiGoal => {
                self.ai_score += 1;
                log::info!("AI goal! {}-{}", self.player_score, self.ai_score);
                0
            }
            GoalResult::NoGoal => return,
        };

        self.collaborators.audio.play(SoundEffect::Goal);
        self.ball.reset(&mut self.rng);
        self.events.push(GameEvent::ScoreChanged {
            score: self.player_score,
            delta,
        });
        self.events.special(
            SpecialKind::GoalScored,
            format!("{}-{}", self.player_score, self.ai_score),
        );
    }

    fn check_win(&mut self) {
        let target = self.settings.winning_score;
        if self.player_score < target && self.ai_score < target {
            return;
        }
        self.set_state(GameState::Victory);
        self.ticker.stop(self.collaborators.scheduler.as_mut());

        let player_won = self.player_score >= target;
        if player_won {
            self.collaborators.audio.play(SoundEffect::Victory);
            self.collaborators.scores.record_pong_player_win();
            log::info!("Player wins the match!");
        } else {
            self.collaborators.audio.play(SoundEffect::GameOver);
            self.collaborators.scores.record_pong_ai_win();
            log::info!("AI wins the match");
        }
        let (wins, losses) = self.collaborators.scores.pong_record();
        log::info!(
            "Final score {}-{} | record {}W / {}L",
            self.player_score,
            self.ai_score,
            wins,
            losses
        );

        let result = GameResult::new(GameKind::Pong, self.player_score, player_won).with_statistics(
            GameStatistics::Pong {
                max_rally_bounces: self.max_bounce_count,
                total_bounces: self.total_bounces,
                summary: format!("player {} | AI {}", self.player_score, self.ai_score),
            },
        );
        self.events.push(GameEvent::GameOver(result));
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// Direct ball access for scripted play
    pub fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    pub fn left_paddle(&self) -> &Paddle {
        &self.left
    }

    pub fn right_paddle(&self) -> &Paddle {
        &self.right
    }

    /// (player, AI)
    pub fn scores(&self) -> (u32, u32) {
        (self.player_score, self.ai_score)
    }

    pub fn max_bounce_count(&self) -> u32 {
        self.max_bounce_count
    }

    pub fn total_bounces(&self) -> u32 {
        self.total_bounces
    }

    pub fn canvas_size(&self) -> (f32, f32) {
        (self.settings.canvas_width, self.settings.canvas_height)
    }

    pub fn ai_difficulty(&self) -> f32 {
        self.ai_difficulty
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn timer(&self) -> Option<TimerHandle> {
        self.ticker.handle()
    }

    /// (player wins, AI wins) across matches
    pub fn pong_record(&self) -> (u32, u32) {
        self.collaborators.scores.pong_record()
    }

    pub fn settings(&self) -> &PongSettings {
        &self.settings
    }
}
