use crate::errors::NotationError;
use crate::models::MusicalEvent;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Represents a reversible edit of the performance history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Append one event at the end of the history
    Commit {
        event: MusicalEvent,
    },
    /// Remove every event
    Clear {
        /// The events that were removed (for restoration)
        removed: Vec<MusicalEvent>,
    },
    /// Flip the tie flag of the event at `index`
    ToggleTie {
        index: usize,
    },
    /// A batch of commands grouped together (e.g., a pasted phrase)
    Batch {
        commands: Vec<Command>,
    },
}

impl Command {
    /// Execute this command on the history
    pub fn execute(&self, events: &mut Vec<MusicalEvent>) -> Result<(), NotationError> {
        match self {
            Command::Commit { event } => {
                events.push(event.clone());
                Ok(())
            }
            Command::Clear { .. } => {
                events.clear();
                Ok(())
            }
            Command::ToggleTie { index } => flip_tie(events, *index),
            Command::Batch { commands } => {
                for cmd in commands {
                    cmd.execute(events)?;
                }
                Ok(())
            }
        }
    }

    /// Undo this command (reverse the operation)
    pub fn undo(&self, events: &mut Vec<MusicalEvent>) -> Result<(), NotationError> {
        match self {
            Command::Commit { event } => match events.last() {
                Some(last) if last == event => {
                    events.pop();
                    Ok(())
                }
                _ => Err(NotationError::InvalidEvent(
                    "history does not end with the committed event".to_string(),
                )),
            },
            Command::Clear { removed } => {
                events.extend(removed.iter().cloned());
                Ok(())
            }
            Command::ToggleTie { index } => flip_tie(events, *index),
            Command::Batch { commands } => {
                // Undo batch in reverse order
                for cmd in commands.iter().rev() {
                    cmd.undo(events)?;
                }
                Ok(())
            }
        }
    }
}

fn flip_tie(events: &mut [MusicalEvent], index: usize) -> Result<(), NotationError> {
    let event = events
        .get_mut(index)
        .ok_or_else(|| NotationError::InvalidEvent(format!("no event at position {}", index)))?;
    event.tied_to_next = !event.tied_to_next;
    Ok(())
}

/// Bounded undo/redo command history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UndoStack {
    /// Stack of commands that can be undone
    pub commands: VecDeque<Command>,
    /// Current position in the stack (for redo support)
    pub current_index: usize,
    /// Maximum number of commands to keep in history
    max_size: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}

impl UndoStack {
    /// Create a new undo stack with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            commands: VecDeque::new(),
            current_index: 0,
            max_size,
        }
    }

    /// Record an already executed command
    pub fn push(&mut self, command: Command) {
        // Truncate any redo history when new command is added
        self.commands.truncate(self.current_index);
        self.commands.push_back(command);
        self.current_index = self.commands.len();

        // Enforce max size
        if self.commands.len() > self.max_size {
            self.commands.pop_front();
            self.current_index = self.current_index.saturating_sub(1);
        }
    }

    /// Undo the last command. Returns false when there was nothing to undo.
    pub fn undo(&mut self, events: &mut Vec<MusicalEvent>) -> Result<bool, NotationError> {
        if !self.can_undo() {
            return Ok(false);
        }

        let command = &self.commands[self.current_index - 1];
        command.undo(events)?;
        self.current_index -= 1;
        Ok(true)
    }

    /// Redo the last undone command. Returns false when there was nothing to redo.
    pub fn redo(&mut self, events: &mut Vec<MusicalEvent>) -> Result<bool, NotationError> {
        if !self.can_redo() {
            return Ok(false);
        }

        let command = &self.commands[self.current_index];
        command.execute(events)?;
        self.current_index += 1;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index < self.commands.len()
    }

    /// Forget all undo history
    pub fn reset(&mut self) {
        self.commands.clear();
        self.current_index = 0;
    }

    pub fn undo_count(&self) -> usize {
        self.current_index
    }

    pub fn redo_count(&self) -> usize {
        self.commands.len() - self.current_index
    }
}

/// The committed events of a session together with their undo history
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceHistory {
    events: Vec<MusicalEvent>,
    stack: UndoStack,
}

impl PerformanceHistory {
    pub fn new(history_limit: usize) -> Self {
        Self {
            events: Vec::new(),
            stack: UndoStack::new(history_limit),
        }
    }

    /// Snapshot of the committed events
    pub fn events(&self) -> &[MusicalEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn stack(&self) -> &UndoStack {
        &self.stack
    }

    fn apply(&mut self, command: Command) -> Result<(), NotationError> {
        command.execute(&mut self.events)?;
        self.stack.push(command);
        Ok(())
    }

    pub fn commit(&mut self, event: MusicalEvent) -> Result<(), NotationError> {
        self.apply(Command::Commit { event })
    }

    /// Commit several events as a single undo step
    pub fn commit_many(&mut self, events: Vec<MusicalEvent>) -> Result<(), NotationError> {
        let mut commands: Vec<Command> =
            events.into_iter().map(|event| Command::Commit { event }).collect();
        if commands.len() > 1 {
            return self.apply(Command::Batch { commands });
        }
        match commands.pop() {
            Some(command) => self.apply(command),
            None => Ok(()),
        }
    }

    /// Remove every event (undoable). Clearing an empty history is a no-op.
    pub fn clear(&mut self) -> Result<(), NotationError> {
        if self.events.is_empty() {
            return Ok(());
        }
        let removed = self.events.clone();
        self.apply(Command::Clear { removed })
    }

    /// Flip the tie flag of the most recent event
    pub fn toggle_tie_on_last(&mut self) -> Result<(), NotationError> {
        let index = self
            .events
            .len()
            .checked_sub(1)
            .ok_or_else(|| NotationError::InvalidEvent("no event to tie".to_string()))?;
        self.apply(Command::ToggleTie { index })
    }

    pub fn undo(&mut self) -> Result<bool, NotationError> {
        self.stack.undo(&mut self.events)
    }

    pub fn redo(&mut self) -> Result<bool, NotationError> {
        self.stack.redo(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Duration, NoteName};

    fn quarter(name: NoteName) -> MusicalEvent {
        MusicalEvent::note(name, Duration::Quarter)
    }

    #[test]
    fn test_commit_execute_and_undo() {
        let mut events = vec![];
        let cmd = Command::Commit { event: quarter(NoteName::C) };

        cmd.execute(&mut events).unwrap();
        assert_eq!(events, vec![quarter(NoteName::C)]);

        cmd.undo(&mut events).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_commit_undo_checks_tail() {
        let mut events = vec![quarter(NoteName::D)];
        let cmd = Command::Commit { event: quarter(NoteName::C) };
        assert!(cmd.undo(&mut events).is_err());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_clear_undo_restores() {
        let mut events = vec![quarter(NoteName::C), quarter(NoteName::E)];
        let cmd = Command::Clear { removed: events.clone() };

        cmd.execute(&mut events).unwrap();
        assert!(events.is_empty());

        cmd.undo(&mut events).unwrap();
        assert_eq!(events, vec![quarter(NoteName::C), quarter(NoteName::E)]);
    }

    #[test]
    fn test_batch_command() {
        let mut events = vec![];
        let cmd = Command::Batch {
            commands: vec![
                Command::Commit { event: quarter(NoteName::C) },
                Command::Commit { event: quarter(NoteName::D) },
            ],
        };

        cmd.execute(&mut events).unwrap();
        assert_eq!(events.len(), 2);

        cmd.undo(&mut events).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_undo_stack_basic() {
        let mut history = PerformanceHistory::new(10);
        history.commit(quarter(NoteName::C)).unwrap();

        assert!(history.stack().can_undo());
        assert!(!history.stack().can_redo());

        assert!(history.undo().unwrap());
        assert!(history.is_empty());
        assert!(history.stack().can_redo());

        assert!(history.redo().unwrap());
        assert_eq!(history.events(), &[quarter(NoteName::C)]);
        assert!(!history.redo().unwrap());
    }

    #[test]
    fn test_new_commit_truncates_redo() {
        let mut history = PerformanceHistory::new(10);
        history.commit(quarter(NoteName::C)).unwrap();
        history.commit(quarter(NoteName::D)).unwrap();
        history.undo().unwrap();

        history.commit(quarter(NoteName::E)).unwrap();

        assert_eq!(history.stack().redo_count(), 0);
        assert_eq!(history.events(), &[quarter(NoteName::C), quarter(NoteName::E)]);
    }

    #[test]
    fn test_max_size_enforcement() {
        let mut history = PerformanceHistory::new(3);
        for _ in 0..5 {
            history.commit(quarter(NoteName::G)).unwrap();
        }

        assert_eq!(history.stack().commands.len(), 3);
        assert_eq!(history.len(), 5);

        for _ in 0..3 {
            assert!(history.undo().unwrap());
        }
        assert!(!history.undo().unwrap());
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_toggle_tie_is_reversible() {
        let mut history = PerformanceHistory::new(10);
        assert!(history.toggle_tie_on_last().is_err());

        history.commit(quarter(NoteName::A)).unwrap();
        history.toggle_tie_on_last().unwrap();
        assert!(history.events()[0].tied_to_next);

        history.undo().unwrap();
        assert!(!history.events()[0].tied_to_next);
    }

    #[test]
    fn test_commit_many_is_one_step() {
        let mut history = PerformanceHistory::new(10);
        history
            .commit_many(vec![quarter(NoteName::C), quarter(NoteName::D), quarter(NoteName::E)])
            .unwrap();
        assert_eq!(history.stack().undo_count(), 1);

        history.undo().unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear_empty_is_noop() {
        let mut history = PerformanceHistory::new(10);
        history.clear().unwrap();
        assert!(!history.stack().can_undo());
    }
}
