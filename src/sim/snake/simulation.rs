//! Snake game controller
//!
//! Owns the snake, the active food and the lifecycle. The host drives it by
//! calling [`SnakeSimulation::step`] whenever the timer in
//! [`SnakeSimulation::timer`] fires.

use std::time::Duration;

use crate::audio::SoundEffect;
use crate::error::ConfigError;
use crate::settings::SnakeSettings;
use crate::sim::collaborators::Collaborators;
use crate::sim::events::{EventQueue, GameEvent, GameKind, GameResult, GameStatistics, SpecialKind};
use crate::sim::grid::{Direction, Point};
use crate::sim::lifecycle::GameState;
use crate::sim::rng::GameRng;
use crate::sim::scheduler::{Ticker, TimerHandle};

use super::body::Snake;
use super::food::{Food, FoodKind};

/// Discrete input for the snake game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeCommand {
    Turn(Direction),
    Start,
    TogglePause,
    Restart,
}

pub struct SnakeSimulation {
    settings: SnakeSettings,
    collaborators: Collaborators,
    rng: GameRng,
    state: GameState,
    snake: Snake,
    food: Food,
    score: u32,
    food_eaten: u32,
    /// Drives the difficulty ramp
    normal_eaten: u32,
    ticker: Ticker,
    /// Simulation time, advanced by one interval per PLAYING tick
    clock: Duration,
    events: EventQueue,
}

impl SnakeSimulation {
    pub fn new(
        settings: SnakeSettings,
        collaborators: Collaborators,
        mut rng: GameRng,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let snake = Self::initial_snake(&settings);
        let food = Food::spawn(
            settings.board_width,
            settings.board_height,
            &snake,
            &mut rng,
            Duration::ZERO,
        );
        let ticker = Ticker::new(settings.initial_tick());
        let mut sim = Self {
            settings,
            collaborators,
            rng,
            state: GameState::Starting,
            snake,
            food,
            score: 0,
            food_eaten: 0,
            normal_eaten: 0,
            ticker,
            clock: Duration::ZERO,
            events: EventQueue::new(),
        };
        sim.set_state(GameState::WaitingRestart);
        Ok(sim)
    }

    fn initial_snake(settings: &SnakeSettings) -> Snake {
        let start = Point::new(settings.board_width / 2, settings.board_height / 2);
        Snake::new(start, Direction::Right)
    }

    fn set_state(&mut self, new: GameState) {
        if self.state == new {
            return;
        }
        let old = self.state;
        self.state = new;
        log::debug!("Snake state {:?} -> {:?}", old, new);
        self.events.push(GameEvent::StateChanged { old, new });
    }

    /// Rebuild every entity and wait for the start command
    pub fn restart(&mut self) {
        self.ticker.stop(self.collaborators.scheduler.as_mut());
        self.ticker = Ticker::new(self.settings.initial_tick());
        self.clock = Duration::ZERO;
        self.snake = Self::initial_snake(&self.settings);
        self.food = Food::spawn(
            self.settings.board_width,
            self.settings.board_height,
            &self.snake,
            &mut self.rng,
            self.clock,
        );
        self.score = 0;
        self.food_eaten = 0;
        self.normal_eaten = 0;
        self.set_state(GameState::WaitingRestart);
        log::info!("Snake game reset");
    }

    /// WAITING_RESTART -> PLAYING
    pub fn start_game(&mut self) -> bool {
        if self.state != GameState::WaitingRestart {
            return false;
        }
        self.set_state(GameState::Playing);
        self.ticker.start(self.collaborators.scheduler.as_mut());
        log::info!("Snake game started");
        true
    }

    /// PLAYING <-> PAUSED; ticking stops while paused
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

    /// Stop ticking and return to WAITING_RESTART. A live run is kept so it
    /// can be resumed with `start_game`; a finished one is rebuilt.
    pub fn stop_game(&mut self) {
        self.ticker.stop(self.collaborators.scheduler.as_mut());
        if self.state.is_game_over() {
            self.restart();
        } else {
            self.set_state(GameState::WaitingRestart);
        }
    }

    /// Queue a turn for the next tick; reversals are rejected
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        let changed = self.snake.set_direction(direction);
        if changed {
            log::debug!("Direction changed to {:?}", direction);
        }
        changed
    }

    /// Apply one input; returns whether it had any effect
    pub fn handle_command(&mut self, command: SnakeCommand) -> bool {
        match command {
            SnakeCommand::Turn(direction) => self.set_direction(direction),
            SnakeCommand::Start => self.start_game(),
            SnakeCommand::TogglePause => self.toggle_pause(),
            SnakeCommand::Restart => {
                if self.state.can_be_restarted() {
                    self.restart();
                    true
                } else {
                    false
                }
            }
        }
    }

    /// One simulation tick. No-op unless PLAYING.
    pub fn step(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        self.clock += self.ticker.interval();

        self.snake.advance();

        if self
            .snake
            .hits_wall(self.settings.board_width, self.settings.board_height)
            || self.snake.hits_self()
        {
            self.game_over();
            return;
        }

        if self.snake.is_eating(self.food.position) {
            self.eat_food();
        }

        if self.food.has_expired(self.clock) {
            let kind = self.food.kind;
            log::warn!("{:?} food expired, regenerating", kind);
            self.respawn_food();
            self.events.special(SpecialKind::FoodExpired(kind), kind.effect_text());
        }
    }

    fn respawn_food(&mut self) {
        self.food = Food::spawn(
            self.settings.board_width,
            self.settings.board_height,
            &self.snake,
            &mut self.rng,
            self.clock,
        );
    }

    fn eat_food(&mut self) {
        let kind = self.food.kind;
        let points = kind.points();
        self.score += points;
        self.food_eaten += 1;
        self.snake.grow(kind.growth());

        match kind {
            FoodKind::SpeedUp => {
                let faster = self
                    .ticker
                    .interval()
                    .saturating_sub(Duration::from_millis(self.settings.speed_up_step_ms));
                self.change_tick_interval(faster);
            }
            FoodKind::SlowDown => {
                let slower =
                    self.ticker.interval() + Duration::from_millis(self.settings.slow_down_step_ms);
                self.change_tick_interval(slower);
            }
            FoodKind::MultiGrow => log::info!("Snake grows by {} segments", kind.growth()),
            FoodKind::SuperBonus => log::info!("Super bonus: +{} points", points),
            FoodKind::Normal | FoodKind::Bonus => {}
        }

        if kind.is_special() {
            self.collaborators.audio.play(SoundEffect::SnakeSpecialFood);
            log::info!("Special effect: {}", kind.effect_text());
            self.events
                .special(SpecialKind::SpecialFoodEaten(kind), kind.effect_text());
        } else {
            self.collaborators.audio.play(SoundEffect::SnakeEat);
            self.normal_eaten += 1;
            if self.normal_eaten % self.settings.ramp_every == 0 {
                let ramped = self
                    .ticker
                    .interval()
                    .saturating_sub(Duration::from_millis(self.settings.ramp_step_ms));
                self.change_tick_interval(ramped);
            }
        }

        self.respawn_food();
        self.events.push(GameEvent::ScoreChanged {
            score: self.score,
            delta: points as i32,
        });
        log::info!(
            "Score: {} | Length: {} | Next food: {:?}",
            self.score,
            self.snake.len(),
            self.food.kind
        );
    }

    /// Clamp to the configured bounds and swap the running timer if needed
    fn change_tick_interval(&mut self, requested: Duration) {
        let min = Duration::from_millis(self.settings.min_tick_ms);
        let max = Duration::from_millis(self.settings.max_tick_ms);
        let interval = requested.clamp(min, max);
        if interval == self.ticker.interval() {
            return;
        }
        self.ticker
            .set_interval(interval, self.collaborators.scheduler.as_mut());
        log::debug!("Tick interval now {} ms", interval.as_millis());
        self.events.special(
            SpecialKind::TickIntervalChanged,
            format!("{} ms", interval.as_millis()),
        );
    }

    fn game_over(&mut self) {
        self.collaborators.audio.play(SoundEffect::GameOver);
        self.set_state(GameState::GameOver);
        self.ticker.stop(self.collaborators.scheduler.as_mut());

        let previous_high = self.collaborators.scores.snake_high_score();
        self.collaborators.scores.record_snake_score(self.score);
        if self.score > previous_high {
            self.events
                .special(SpecialKind::NewHighScore, self.score.to_string());
        }

        log::info!("=== GAME OVER ===");
        log::info!("Score: {} | Final length: {}", self.score, self.snake.len());
        log::info!(
            "High score: {}",
            self.collaborators.scores.snake_high_score()
        );

        let result = GameResult::new(GameKind::Snake, self.score, false).with_statistics(
            GameStatistics::Snake {
                final_length: self.snake.len(),
                food_eaten: self.food_eaten,
                final_tick_interval: self.ticker.interval(),
            },
        );
        self.events.push(GameEvent::GameOver(result));
    }

    /// Replace the active food (scripted play, tutorials)
    pub fn place_food(&mut self, position: Point, kind: FoodKind) {
        self.food = Food::place(position, kind, self.clock);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn food_should_blink(&self) -> bool {
        self.food.should_blink(self.clock)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.collaborators.scores.snake_high_score()
    }

    pub fn board_size(&self) -> (i32, i32) {
        (self.settings.board_width, self.settings.board_height)
    }

    pub fn tick_interval(&self) -> Duration {
        self.ticker.interval()
    }

    pub fn food_eaten(&self) -> u32 {
        self.food_eaten
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// The live tick timer, if the game is running
    pub fn timer(&self) -> Option<TimerHandle> {
        self.ticker.handle()
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn settings(&self) -> &SnakeSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::ScoreRecorder;
    use crate::sim::testing::Harness;

    fn setup() -> (Harness, SnakeSimulation) {
        let harness = Harness::new();
        let sim = SnakeSimulation::new(
            SnakeSettings::default(),
            harness.collaborators(),
            GameRng::new(1),
        )
        .expect("default settings are valid");
        (harness, sim)
    }

    /// Put food directly ahead of the head
    fn feed(sim: &mut SnakeSimulation, kind: FoodKind) {
        let snake = sim.snake();
        let ahead = snake.head().moved(snake.next_direction());
        sim.place_food(ahead, kind);
        sim.step();
    }

    #[test]
    fn test_new_waits_for_start() {
        let (_h, mut sim) = setup();
        assert_eq!(sim.state(), GameState::WaitingRestart);
        assert_eq!(sim.snake().head(), Point::new(20, 15));
        assert_eq!(sim.snake().len(), 1);
        assert!(sim.timer().is_none());
        assert_eq!(
            sim.drain_events(),
            vec![GameEvent::StateChanged {
                old: GameState::Starting,
                new: GameState::WaitingRestart
            }]
        );
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let harness = Harness::new();
        let settings = SnakeSettings {
            board_width: 1,
            ..Default::default()
        };
        assert!(SnakeSimulation::new(settings, harness.collaborators(), GameRng::new(1)).is_err());
    }

    #[test]
    fn test_step_is_noop_unless_playing() {
        let (_h, mut sim) = setup();
        let head = sim.snake().head();
        sim.step();
        assert_eq!(sim.snake().head(), head);
        assert_eq!(sim.clock(), Duration::ZERO);
    }

    #[test]
    fn test_start_schedules_ticker() {
        let (h, mut sim) = setup();
        assert!(sim.start_game());
        assert!(!sim.start_game());
        let handle = sim.timer().expect("running");
        assert_eq!(
            h.scheduler.borrow().interval(handle),
            Some(Duration::from_millis(120))
        );
    }

    #[test]
    fn test_pause_stops_and_resumes_ticker() {
        let (h, mut sim) = setup();
        sim.start_game();
        assert!(sim.toggle_pause());
        assert_eq!(sim.state(), GameState::Paused);
        assert!(sim.timer().is_none());
        assert_eq!(h.scheduler.borrow().live_count(), 0);

        let head = sim.snake().head();
        sim.step();
        assert_eq!(sim.snake().head(), head);

        assert!(sim.toggle_pause());
        assert_eq!(sim.state(), GameState::Playing);
        assert_eq!(h.scheduler.borrow().live_count(), 1);
    }

    #[test]
    fn test_eating_normal_food() {
        let (h, mut sim) = setup();
        sim.start_game();
        sim.drain_events();
        feed(&mut sim, FoodKind::Normal);
        assert_eq!(sim.score(), 10);
        assert_eq!(sim.food_eaten(), 1);
        assert_eq!(sim.snake().growth_pending(), 1);
        assert_eq!(h.audio.borrow().count(SoundEffect::SnakeEat), 1);
        assert!(sim.drain_events().contains(&GameEvent::ScoreChanged { score: 10, delta: 10 }));
        assert!(!sim.snake().contains(sim.food().position));
    }

    #[test]
    fn test_speed_up_and_slow_down_bounds() {
        let (_h, mut sim) = setup();
        sim.start_game();
        feed(&mut sim, FoodKind::SpeedUp);
        assert_eq!(sim.tick_interval(), Duration::from_millis(105));
        for _ in 0..6 {
            feed(&mut sim, FoodKind::SpeedUp);
        }
        assert_eq!(sim.tick_interval(), Duration::from_millis(60));

        for _ in 0..6 {
            feed(&mut sim, FoodKind::SlowDown);
        }
        assert_eq!(sim.tick_interval(), Duration::from_millis(180));
    }

    #[test]
    fn test_interval_change_reschedules_running_timer() {
        let (h, mut sim) = setup();
        sim.start_game();
        let before = sim.timer().unwrap();
        feed(&mut sim, FoodKind::SlowDown);
        let after = sim.timer().unwrap();
        assert_ne!(before, after);
        let scheduler = h.scheduler.borrow();
        assert!(!scheduler.is_live(before));
        assert_eq!(scheduler.interval(after), Some(Duration::from_millis(145)));
        assert_eq!(scheduler.live_count(), 1);
    }

    #[test]
    fn test_ramp_counts_only_normal_food() {
        let (_h, mut sim) = setup();
        sim.start_game();
        for _ in 0..4 {
            feed(&mut sim, FoodKind::Normal);
        }
        feed(&mut sim, FoodKind::Bonus);
        assert_eq!(sim.tick_interval(), Duration::from_millis(120));
        feed(&mut sim, FoodKind::Normal);
        assert_eq!(sim.tick_interval(), Duration::from_millis(112));
    }

    #[test]
    fn test_special_food_events() {
        let (h, mut sim) = setup();
        sim.start_game();
        sim.drain_events();
        feed(&mut sim, FoodKind::MultiGrow);
        assert_eq!(sim.snake().growth_pending(), 3);
        assert_eq!(h.audio.borrow().count(SoundEffect::SnakeSpecialFood), 1);
        let events = sim.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Special { kind: SpecialKind::SpecialFoodEaten(FoodKind::MultiGrow), .. }
        )));
    }

    #[test]
    fn test_expiry_regenerates_food() {
        let harness = Harness::new();
        let settings = SnakeSettings {
            board_width: 200,
            board_height: 200,
            ..Default::default()
        };
        let mut sim =
            SnakeSimulation::new(settings, harness.collaborators(), GameRng::new(9)).unwrap();
        sim.start_game();
        sim.place_food(Point::new(0, 0), FoodKind::SuperBonus);
        sim.drain_events();
        // 84 ticks * 120 ms = 10.08 s
        for _ in 0..83 {
            sim.step();
            assert_eq!(sim.food().kind, FoodKind::SuperBonus);
        }
        assert!(sim.food_should_blink());
        sim.step();
        assert_eq!(sim.state(), GameState::Playing);
        assert_eq!(sim.score(), 0);
        let events = sim.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Special { kind: SpecialKind::FoodExpired(FoodKind::SuperBonus), .. }
        )));
    }

    #[test]
    fn test_wall_collision_ends_game() {
        let (h, mut sim) = setup();
        sim.start_game();
        // Head at x=20 on a 40-wide board: x=39 after 19 ticks, x=40 on the 20th
        for _ in 0..19 {
            sim.place_food(Point::new(0, 0), FoodKind::Normal);
            sim.step();
        }
        assert_eq!(sim.state(), GameState::Playing);
        sim.step();
        assert_eq!(sim.state(), GameState::GameOver);
        assert!(sim.timer().is_none());
        assert_eq!(h.audio.borrow().count(SoundEffect::GameOver), 1);
        assert_eq!(h.scores.borrow().snake.games_played, 1);
    }

    #[test]
    fn test_game_over_result() {
        let (h, mut sim) = setup();
        sim.start_game();
        feed(&mut sim, FoodKind::Bonus);
        sim.drain_events();
        sim.place_food(Point::new(0, 0), FoodKind::Normal);
        sim.set_direction(Direction::Up);
        for _ in 0..20 {
            sim.step();
        }
        assert_eq!(sim.state(), GameState::GameOver);
        let events = sim.drain_events();
        let result = events
            .iter()
            .find_map(|e| match e {
                GameEvent::GameOver(result) => Some(result.clone()),
                _ => None,
            })
            .expect("game over emitted");
        assert_eq!(result.game, GameKind::Snake);
        assert_eq!(result.score, 25);
        assert!(!result.victory);
        assert_eq!(
            result.statistics,
            Some(GameStatistics::Snake {
                final_length: 2,
                food_eaten: 1,
                final_tick_interval: Duration::from_millis(120),
            })
        );
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Special { kind: SpecialKind::NewHighScore, .. }
        )));
        assert_eq!(h.scores.borrow().snake_high_score(), 25);

        // A result is emitted once; further steps do nothing
        sim.step();
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_restart_commands() {
        let (_h, mut sim) = setup();
        sim.start_game();
        assert!(!sim.handle_command(SnakeCommand::Restart));
        sim.place_food(Point::new(0, 0), FoodKind::Normal);
        sim.set_direction(Direction::Up);
        for _ in 0..20 {
            sim.step();
        }
        assert_eq!(sim.state(), GameState::GameOver);
        assert!(sim.handle_command(SnakeCommand::Restart));
        assert_eq!(sim.state(), GameState::WaitingRestart);
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.snake().head(), Point::new(20, 15));
        assert_eq!(sim.tick_interval(), Duration::from_millis(120));
        assert!(sim.handle_command(SnakeCommand::Start));
        assert_eq!(sim.state(), GameState::Playing);
    }

    #[test]
    fn test_stop_game_keeps_live_run() {
        let (h, mut sim) = setup();
        sim.start_game();
        sim.place_food(Point::new(0, 0), FoodKind::Normal);
        sim.step();
        let head = sim.snake().head();
        sim.stop_game();
        assert_eq!(sim.state(), GameState::WaitingRestart);
        assert_eq!(h.scheduler.borrow().live_count(), 0);
        assert_eq!(sim.snake().head(), head);
        assert!(sim.start_game());
    }

    #[test]
    fn test_driven_by_scheduler() {
        let (h, mut sim) = setup();
        sim.start_game();
        sim.place_food(Point::new(0, 0), FoodKind::Normal);
        let head = sim.snake().head();
        let fired = h.scheduler.borrow_mut().advance(Duration::from_millis(360));
        for handle in fired {
            if sim.timer() == Some(handle) {
                sim.step();
            }
        }
        assert_eq!(sim.snake().head(), Point::new(head.x + 3, head.y));
    }
}
