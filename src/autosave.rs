//! Debounced journal autosave. Editors feed every keystroke-level edit in;
//! the coalesced payload is released only after a quiescence delay, so rapid
//! successive edits become a single upsert. The component never touches
//! storage itself and never reads the clock — callers pass `Instant`s in and
//! perform the actual `upsert_by_date` with whatever `take_due`/`flush`
//! hand back. A payload taken for writing does not block new edits from
//! queueing for the next cycle.

use std::time::{Duration, Instant};

use crate::models::Mood;

/// Quiescence delay before a queued edit is released for persisting
pub const AUTOSAVE_DELAY: Duration = Duration::from_secs(1);

/// The coalesced edit waiting to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub content: String,
    pub mood: Option<Mood>,
}

pub struct JournalAutosave {
    delay: Duration,
    pending: Option<(PendingSave, Instant)>,
}

impl JournalAutosave {
    pub fn new() -> Self {
        Self::with_delay(AUTOSAVE_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Queue an edit, replacing any not-yet-released payload and restarting
    /// the quiescence clock
    pub fn record_edit(&mut self, content: String, mood: Option<Mood>, now: Instant) {
        self.pending = Some((PendingSave { content, mood }, now));
    }

    /// Release the queued payload once the quiescence delay has elapsed
    /// since the last edit. Returns None while still settling (or idle).
    pub fn take_due(&mut self, now: Instant) -> Option<PendingSave> {
        match &self.pending {
            Some((_, queued_at)) if now.duration_since(*queued_at) >= self.delay => {
                self.pending.take().map(|(save, _)| save)
            }
            _ => None,
        }
    }

    /// Release any queued payload immediately, delay or not — the
    /// navigate-away path
    pub fn flush(&mut self) -> Option<PendingSave> {
        self.pending.take().map(|(save, _)| save)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for JournalAutosave {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rapid_edits_coalesce_into_the_last_payload() {
        let mut autosave = JournalAutosave::new();
        let t0 = Instant::now();

        autosave.record_edit("G".to_string(), None, t0);
        autosave.record_edit("Gr".to_string(), None, t0 + Duration::from_millis(200));
        autosave.record_edit(
            "Great day".to_string(),
            Some(Mood::Great),
            t0 + Duration::from_millis(400),
        );

        // Still settling relative to the last edit
        assert_eq!(autosave.take_due(t0 + Duration::from_millis(900)), None);
        assert!(autosave.has_pending());

        let released = autosave.take_due(t0 + Duration::from_millis(1500)).unwrap();
        assert_eq!(released.content, "Great day");
        assert_eq!(released.mood, Some(Mood::Great));
        assert!(!autosave.has_pending());
    }

    #[test]
    fn new_edits_queue_while_a_taken_payload_is_in_flight() {
        let mut autosave = JournalAutosave::new();
        let t0 = Instant::now();

        autosave.record_edit("first".to_string(), None, t0);
        let first = autosave.take_due(t0 + Duration::from_secs(2)).unwrap();
        assert_eq!(first.content, "first");

        // The caller is "writing" first; a fresh edit starts the next cycle
        autosave.record_edit("second".to_string(), None, t0 + Duration::from_secs(2));
        assert_eq!(autosave.take_due(t0 + Duration::from_secs(2)), None);
        let second = autosave.take_due(t0 + Duration::from_secs(4)).unwrap();
        assert_eq!(second.content, "second");
    }

    #[test]
    fn flush_releases_immediately() {
        let mut autosave = JournalAutosave::new();
        let t0 = Instant::now();

        assert_eq!(autosave.flush(), None);
        autosave.record_edit("bye".to_string(), None, t0);
        assert_eq!(autosave.flush().unwrap().content, "bye");
        assert_eq!(autosave.flush(), None);
    }
}
