//! Injected collaborators for a simulation instance

use crate::audio::AudioCues;
use crate::highscores::ScoreRecorder;

use super::scheduler::Scheduler;

/// Everything a simulation calls out to
pub struct Collaborators {
    pub scores: Box<dyn ScoreRecorder>,
    pub audio: Box<dyn AudioCues>,
    pub scheduler: Box<dyn Scheduler>,
}

impl Collaborators {
    pub fn new(
        scores: impl ScoreRecorder + 'static,
        audio: impl AudioCues + 'static,
        scheduler: impl Scheduler + 'static,
    ) -> Self {
        Self {
            scores: Box::new(scores),
            audio: Box::new(audio),
            scheduler: Box::new(scheduler),
        }
    }
}
