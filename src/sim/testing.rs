//! Shared fakes for simulation unit tests

use std::cell::RefCell;
use std::rc::Rc;

use crate::audio::{AudioCues, SoundEffect};
use crate::highscores::ScoreBoard;

use super::collaborators::Collaborators;
use super::scheduler::ManualScheduler;

#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<SoundEffect>,
}

impl RecordingAudio {
    pub fn count(&self, effect: SoundEffect) -> usize {
        self.played.iter().filter(|e| **e == effect).count()
    }
}

impl AudioCues for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }
}

pub struct Harness {
    pub scores: Rc<RefCell<ScoreBoard>>,
    pub audio: Rc<RefCell<RecordingAudio>>,
    pub scheduler: Rc<RefCell<ManualScheduler>>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            scores: Rc::new(RefCell::new(ScoreBoard::new())),
            audio: Rc::new(RefCell::new(RecordingAudio::default())),
            scheduler: Rc::new(RefCell::new(ManualScheduler::new())),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(
            Rc::clone(&self.scores),
            Rc::clone(&self.audio),
            Rc::clone(&self.scheduler),
        )
    }
}
