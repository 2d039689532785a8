//! Retro Arcade entry point
//!
//! Headless attract mode: plays one game of Snake and one Pong match with the
//! autopilots, driving both simulations from a fixed-frame host loop, then
//! records the results in the score file.
//!
//! Environment:
//! - `RETRO_ARCADE_SETTINGS`: optional JSON settings file
//! - `RETRO_ARCADE_SCORES`: score file (default `retro_arcade_scores.json`)
//! - `RUST_LOG`: log filter

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

use retro_arcade::attract::{pong_autopilot, snake_autopilot};
use retro_arcade::audio::{AudioManager, LogBackend};
use retro_arcade::persistence::{JsonFileStore, PersistentScores};
use retro_arcade::sim::{
    Collaborators, GameEvent, GameResult, GameRng, ManualScheduler, PaddleMove, PongSimulation,
    SnakeSimulation,
};
use retro_arcade::{ConfigError, Settings};

/// Host frame length (~60 FPS)
const FRAME: Duration = Duration::from_micros(16_667);
/// A demo game is abandoned after this much simulated time
const DEMO_LIMIT: Duration = Duration::from_secs(600);
const DEFAULT_SCORES_PATH: &str = "retro_arcade_scores.json";

type SharedScores = Rc<RefCell<PersistentScores<JsonFileStore>>>;
type SharedAudio = Rc<RefCell<AudioManager<LogBackend>>>;
type SharedScheduler = Rc<RefCell<ManualScheduler>>;

fn load_settings() -> Result<Settings, ConfigError> {
    match std::env::var_os("RETRO_ARCADE_SETTINGS") {
        Some(path) => Settings::load(&PathBuf::from(path)),
        None => Ok(Settings::default()),
    }
}

fn collaborators(
    scores: &SharedScores,
    audio: &SharedAudio,
    scheduler: &SharedScheduler,
) -> Collaborators {
    Collaborators::new(Rc::clone(scores), Rc::clone(audio), Rc::clone(scheduler))
}

/// Log everything but the final result, which is returned
fn drain(events: Vec<GameEvent>) -> Option<GameResult> {
    let mut result = None;
    for event in events {
        match event {
            GameEvent::GameOver(r) => result = Some(r),
            GameEvent::ScoreChanged { score, delta } => log::debug!("score {} ({:+})", score, delta),
            GameEvent::StateChanged { old, new } => log::debug!("{:?} -> {:?}", old, new),
            GameEvent::Special { kind, detail } => log::info!("{:?}: {}", kind, detail),
        }
    }
    result
}

fn run_snake(sim: &mut SnakeSimulation, scheduler: &SharedScheduler) -> Option<GameResult> {
    sim.start_game();
    let mut elapsed = Duration::ZERO;
    while elapsed < DEMO_LIMIT {
        let fired = scheduler.borrow_mut().advance(FRAME);
        for handle in fired {
            if sim.timer() != Some(handle) {
                continue;
            }
            if let Some(direction) = snake_autopilot(sim) {
                sim.set_direction(direction);
            }
            sim.step();
        }
        if let Some(result) = drain(sim.drain_events()) {
            return Some(result);
        }
        elapsed += FRAME;
    }
    log::warn!("Snake demo hit the time limit");
    sim.stop_game();
    None
}

fn run_pong(sim: &mut PongSimulation, scheduler: &SharedScheduler) -> Option<GameResult> {
    sim.start_game();
    let mut elapsed = Duration::ZERO;
    while elapsed < DEMO_LIMIT {
        let fired = scheduler.borrow_mut().advance(FRAME);
        for handle in fired {
            if sim.timer() != Some(handle) {
                continue;
            }
            let held = pong_autopilot(sim);
            sim.set_paddle_input(PaddleMove::Up, held == Some(PaddleMove::Up));
            sim.set_paddle_input(PaddleMove::Down, held == Some(PaddleMove::Down));
            sim.step();
        }
        if let Some(result) = drain(sim.drain_events()) {
            return Some(result);
        }
        elapsed += FRAME;
    }
    log::warn!("Pong demo hit the time limit");
    sim.stop_game();
    None
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Retro Arcade (headless attract mode) starting...");

    let settings = load_settings().unwrap_or_else(|err| {
        log::warn!("Ignoring settings file: {}", err);
        Settings::default()
    });

    let scores_path = std::env::var_os("RETRO_ARCADE_SCORES")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORES_PATH));
    let scores: SharedScores = Rc::new(RefCell::new(PersistentScores::new(JsonFileStore::new(
        scores_path,
    ))));
    let audio: SharedAudio = Rc::new(RefCell::new(AudioManager::from_settings(
        &settings.audio,
        LogBackend,
    )));
    let scheduler: SharedScheduler = Rc::new(RefCell::new(ManualScheduler::new()));

    let rng = settings.seed.map(GameRng::new).unwrap_or_else(GameRng::from_entropy);
    log::info!("Seed: {}", rng.seed());

    let mut snake = match SnakeSimulation::new(
        settings.snake.clone(),
        collaborators(&scores, &audio, &scheduler),
        GameRng::new(rng.seed()),
    ) {
        Ok(sim) => sim,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    let mut pong = match PongSimulation::new(
        settings.pong.clone(),
        collaborators(&scores, &audio, &scheduler),
        GameRng::new(rng.seed().wrapping_add(1)),
    ) {
        Ok(sim) => sim,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Some(result) = run_snake(&mut snake, &scheduler) {
        println!("{}", result);
    }
    if let Some(result) = run_pong(&mut pong, &scheduler) {
        println!("{}", result);
    }

    println!("{}", scores.borrow().scores().summary());
    ExitCode::SUCCESS
}
