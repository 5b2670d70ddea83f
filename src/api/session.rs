//! The editing session owned by the WASM module
//!
//! A session is the configuration, the performance history and the time
//! signature changes the user made on individual bars. Bars are never stored:
//! they are re-assembled from the history whenever they are needed, and the
//! signature changes are replayed on top in the order they were made.

use crate::config::EngineConfig;
use crate::errors::NotationError;
use crate::ir::{create_bars, set_time_signature, Bar};
use crate::keyboard::{duration_for_key, event_from_keys};
use crate::models::{MusicalEvent, TimeSignature};
use crate::renderers::{staves, StaveSpec};
use crate::undo::PerformanceHistory;

#[derive(Debug, Clone)]
pub struct Session {
    config: EngineConfig,
    history: PerformanceHistory,
    /// (bar index, signature) in the order they were applied
    signature_changes: Vec<(usize, TimeSignature)>,
}

impl Session {
    pub fn new(config: EngineConfig) -> Result<Self, NotationError> {
        config.validate()?;
        Ok(Self {
            history: PerformanceHistory::new(config.history_limit),
            config,
            signature_changes: Vec::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn history(&self) -> &PerformanceHistory {
        &self.history
    }

    pub fn signature_changes(&self) -> &[(usize, TimeSignature)] {
        &self.signature_changes
    }

    /// Resolve held keys plus a duration key into an event and commit it
    pub fn press_keys<S: AsRef<str>>(
        &mut self,
        keys: &[S],
        duration_key: &str,
    ) -> Result<MusicalEvent, NotationError> {
        let duration = duration_for_key(duration_key)
            .ok_or_else(|| NotationError::UnknownKey(duration_key.to_string()))?;
        let event = event_from_keys(keys, duration)?;
        self.commit(event.clone())?;
        Ok(event)
    }

    pub fn commit(&mut self, event: MusicalEvent) -> Result<(), NotationError> {
        let event = event.normalized()?;
        log::debug!("commit {:?} {:?}", event.notes, event.duration);
        self.history.commit(event)
    }

    pub fn undo(&mut self) -> Result<bool, NotationError> {
        self.history.undo()
    }

    pub fn redo(&mut self) -> Result<bool, NotationError> {
        self.history.redo()
    }

    pub fn toggle_tie(&mut self) -> Result<(), NotationError> {
        self.history.toggle_tie_on_last()
    }

    pub fn clear(&mut self) -> Result<(), NotationError> {
        self.history.clear()
    }

    /// Re-sign bar `index` and everything after it
    ///
    /// The new change re-bars everything from `index` on, so earlier changes
    /// at or after `index` are dropped.
    pub fn set_time_signature(
        &mut self,
        index: usize,
        time_signature: TimeSignature,
    ) -> Result<Vec<Bar>, NotationError> {
        let bars = set_time_signature(&self.bars()?, index, time_signature)?;
        self.signature_changes.retain(|&(i, _)| i < index);
        self.signature_changes.push((index, time_signature));
        Ok(bars)
    }

    /// Bars for the current history
    ///
    /// A signature change whose bar no longer exists (the history got shorter
    /// through undo or clear) is skipped, and applies again once the bar is
    /// back.
    pub fn bars(&self) -> Result<Vec<Bar>, NotationError> {
        let mut bars = create_bars(
            self.history.events(),
            self.config.time_signature,
            self.config.clef,
            self.config.key_signature,
        )?;
        for &(index, time_signature) in &self.signature_changes {
            if index < bars.len() {
                bars = set_time_signature(&bars, index, time_signature)?;
            } else {
                log::trace!("skipping {} at bar {}: only {} bars", time_signature, index, bars.len());
            }
        }
        Ok(bars)
    }

    pub fn staves(&self) -> Result<Vec<StaveSpec>, NotationError> {
        Ok(staves(&self.bars()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Duration, NoteName};

    fn session() -> Session {
        Session::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_press_keys_commits() {
        let mut session = session();
        let event = session.press_keys(&["a", "d"], "3").unwrap();
        assert_eq!(event.notes, vec![NoteName::C, NoteName::E]);
        assert_eq!(session.history().len(), 1);

        assert_eq!(
            session.press_keys(&["a"], "9"),
            Err(NotationError::UnknownKey("9".to_string()))
        );
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_bars_follow_history() {
        let mut session = session();
        assert!(session.bars().unwrap().is_empty());

        for _ in 0..5 {
            session.press_keys(&["g"], "3").unwrap();
        }
        let bars = session.bars().unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].padding_units, 24);

        session.undo().unwrap();
        assert_eq!(session.bars().unwrap().len(), 1);
    }

    #[test]
    fn test_signature_change_is_replayed() {
        let mut session = session();
        for _ in 0..8 {
            session.commit(MusicalEvent::note(NoteName::C, Duration::Quarter)).unwrap();
        }
        let three_four = TimeSignature::new(3, Duration::Quarter).unwrap();
        let bars = session.set_time_signature(1, three_four).unwrap();
        assert_eq!(bars.len(), 3);

        session.commit(MusicalEvent::note(NoteName::D, Duration::Quarter)).unwrap();
        let bars = session.bars().unwrap();
        assert_eq!(bars.len(), 3);
        assert!(bars[1..].iter().all(|b| b.time_signature == three_four));
        assert!(bars.iter().all(|b| b.is_full()));
    }

    #[test]
    fn test_repeated_signature_changes_do_not_accumulate() {
        let mut session = session();
        for _ in 0..12 {
            session.commit(MusicalEvent::note(NoteName::E, Duration::Quarter)).unwrap();
        }
        let two_four = TimeSignature::new(2, Duration::Quarter).unwrap();
        let three_four = TimeSignature::new(3, Duration::Quarter).unwrap();

        for i in 0..500 {
            let ts = if i % 2 == 0 { two_four } else { three_four };
            session.set_time_signature(0, ts).unwrap();
        }
        assert_eq!(session.signature_changes(), &[(0, three_four)]);
        assert_eq!(session.bars().unwrap().len(), 4);

        session.set_time_signature(2, two_four).unwrap();
        session.set_time_signature(3, three_four).unwrap();
        session.set_time_signature(1, two_four).unwrap();
        assert_eq!(session.signature_changes(), &[(0, three_four), (1, two_four)]);

        let bars = session.bars().unwrap();
        assert_eq!(bars[0].time_signature, three_four);
        assert!(bars[1..].iter().all(|b| b.time_signature == two_four));
        assert_eq!(bars.len(), 6);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig { history_limit: 0, ..EngineConfig::default() };
        assert!(Session::new(config).is_err());
    }
}
