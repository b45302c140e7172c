//! Sound cue hooks. Playback itself belongs to the host.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Cues a session asks its audio sink to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// A click was accepted and a card turns over.
    Flip,
    Match,
    Mismatch,
    /// The last pair was cleared.
    Victory,
}

impl fmt::Display for AudioCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AudioCue::Flip => "flip",
            AudioCue::Match => "match",
            AudioCue::Mismatch => "mismatch",
            AudioCue::Victory => "victory",
        };
        f.write_str(name)
    }
}

/// Receives cues from a session.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Lets the host keep a handle on a sink it hands to a session.
impl<S: AudioSink> AudioSink for Rc<RefCell<S>> {
    fn play(&mut self, cue: AudioCue) {
        self.borrow_mut().play(cue);
    }
}

/// Sink that remembers every cue, in order.
#[derive(Clone, Debug, Default)]
pub struct CueLog {
    cues: Vec<AudioCue>,
}

impl CueLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues received so far.
    #[must_use]
    pub fn cues(&self) -> &[AudioCue] {
        &self.cues
    }

    /// Number of times `cue` was played.
    #[must_use]
    pub fn count(&self, cue: AudioCue) -> usize {
        self.cues.iter().filter(|&&c| c == cue).count()
    }
}

impl AudioSink for CueLog {
    fn play(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_log() {
        let mut log = CueLog::new();
        log.play(AudioCue::Flip);
        log.play(AudioCue::Flip);
        log.play(AudioCue::Match);

        assert_eq!(log.count(AudioCue::Flip), 2);
        assert_eq!(log.cues().last(), Some(&AudioCue::Match));
    }

    #[test]
    fn test_shared_sink() {
        let shared = Rc::new(RefCell::new(CueLog::new()));
        let mut handle = Rc::clone(&shared);
        handle.play(AudioCue::Victory);

        assert_eq!(shared.borrow().cues(), &[AudioCue::Victory]);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", AudioCue::Mismatch), "mismatch");
    }
}
