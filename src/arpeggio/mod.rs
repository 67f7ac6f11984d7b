//! # Arpeggio Aggregator
//! Collects pitch classes of notes played one at a time and recognizes the
//! chord they outline once enough distinct classes fall inside a sliding
//! time window.
//!
//! The aggregator is single-writer state: feed it notes in arrival order
//! from one thread. Give every stream its own instance.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::chord::{match_pitch_classes, ChordResult, Detection};
use crate::note::PitchClass;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArpeggioConfig {
    /// Length of the sliding window in milliseconds.
    pub window_ms: u64,
    /// Distinct pitch classes needed before matching is attempted.
    pub min_distinct: usize,
}

impl Default for ArpeggioConfig {
    fn default() -> Self {
        ArpeggioConfig {
            window_ms: 3000,
            min_distinct: 3,
        }
    }
}

/// One observed note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    timestamp_ms: u64,
    pitch_class: PitchClass,
}

#[derive(Debug, Clone, Default)]
pub struct ArpeggioAggregator {
    config: ArpeggioConfig,
    entries: VecDeque<Entry>,
}

impl ArpeggioAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ArpeggioConfig) -> Self {
        ArpeggioAggregator {
            config,
            entries: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &ArpeggioConfig {
        &self.config
    }

    /// Record a note. A note repeating the previous entry still inside the
    /// window is dropped, so a sustained tone reported frame after frame
    /// counts once.
    pub fn add_note(&mut self, timestamp_ms: u64, pitch_class: PitchClass) {
        self.prune(timestamp_ms);
        if self.entries.back().map(|e| e.pitch_class) == Some(pitch_class) {
            return;
        }
        self.entries.push_back(Entry {
            timestamp_ms,
            pitch_class,
        });
    }

    /// The chord outlined by the notes still inside the window at `now_ms`.
    ///
    /// Returns `None` with too few distinct pitch classes, and also when the
    /// classes spell no known chord: arpeggiated input is noisier than a
    /// strum, so only confirmed matches are reported.
    pub fn detect(&mut self, now_ms: u64) -> Option<ChordResult> {
        self.prune(now_ms);
        let distinct = self.distinct_pitch_classes();
        if distinct.len() < self.config.min_distinct {
            return None;
        }
        match match_pitch_classes(&distinct) {
            Detection::Chord(chord) => Some(chord),
            _ => None,
        }
    }

    /// Distinct pitch classes in the buffer, in order of first appearance.
    pub fn distinct_pitch_classes(&self) -> Vec<PitchClass> {
        let mut distinct = Vec::new();
        for entry in &self.entries {
            if !distinct.contains(&entry.pitch_class) {
                distinct.push(entry.pitch_class);
            }
        }
        distinct
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop entries older than `now_ms - window_ms`.
    fn prune(&mut self, now_ms: u64) {
        let horizon = now_ms.saturating_sub(self.config.window_ms);
        while self
            .entries
            .front()
            .map_or(false, |e| e.timestamp_ms < horizon)
        {
            self.entries.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pc(value: i32) -> PitchClass {
        PitchClass::new(value)
    }

    #[test]
    fn triad_inside_window_is_detected() {
        let mut arpeggio = ArpeggioAggregator::new();
        arpeggio.add_note(0, pc(0));
        arpeggio.add_note(500, pc(4));
        arpeggio.add_note(900, pc(7));

        let chord = arpeggio.detect(1000).unwrap();
        assert_eq!(chord.name, "C");
    }

    #[test]
    fn first_note_expires() {
        let mut arpeggio = ArpeggioAggregator::new();
        arpeggio.add_note(0, pc(0));
        arpeggio.add_note(500, pc(4));
        arpeggio.add_note(3500, pc(7));

        assert_eq!(arpeggio.len(), 2);
        assert_eq!(arpeggio.detect(3500), None);

        // A third class arriving while E is still held restores the chord.
        arpeggio.add_note(3500, pc(0));
        assert_eq!(arpeggio.detect(3500).unwrap().name, "C");
    }

    #[test]
    fn repeated_class_is_ignored() {
        let mut arpeggio = ArpeggioAggregator::new();
        for t in 0..10 {
            arpeggio.add_note(t * 20, pc(9));
        }
        assert_eq!(arpeggio.len(), 1);

        arpeggio.add_note(300, pc(4));
        arpeggio.add_note(400, pc(9));
        assert_eq!(arpeggio.len(), 3);
        assert_eq!(arpeggio.distinct_pitch_classes(), vec![pc(9), pc(4)]);
        assert_eq!(arpeggio.detect(500), None);
    }

    #[test]
    fn expired_note_does_not_mask_a_repeat() {
        let mut arpeggio = ArpeggioAggregator::new();
        arpeggio.add_note(0, pc(0));
        arpeggio.add_note(5000, pc(0));
        arpeggio.add_note(5500, pc(4));
        arpeggio.add_note(6000, pc(7));

        assert_eq!(arpeggio.distinct_pitch_classes(), vec![pc(0), pc(4), pc(7)]);
        assert_eq!(arpeggio.detect(6000).unwrap().name, "C");
    }

    #[test]
    fn unmatched_notes_are_suppressed() {
        let mut arpeggio = ArpeggioAggregator::new();
        arpeggio.add_note(0, pc(0));
        arpeggio.add_note(100, pc(1));
        arpeggio.add_note(200, pc(2));
        assert_eq!(arpeggio.detect(300), None);
    }

    #[test]
    fn clear_empties_buffer() {
        let mut arpeggio = ArpeggioAggregator::with_config(ArpeggioConfig {
            window_ms: 1000,
            ..ArpeggioConfig::default()
        });
        arpeggio.add_note(0, pc(2));
        arpeggio.add_note(10, pc(6));
        arpeggio.clear();
        assert!(arpeggio.is_empty());
        assert_eq!(arpeggio.detect(20), None);
    }

    #[test]
    fn shorter_window_prunes_sooner() {
        let mut arpeggio = ArpeggioAggregator::with_config(ArpeggioConfig {
            window_ms: 1000,
            ..ArpeggioConfig::default()
        });
        arpeggio.add_note(0, pc(9));
        arpeggio.add_note(400, pc(0));
        arpeggio.add_note(800, pc(4));
        assert_eq!(arpeggio.detect(1000).unwrap().name, "Am");
        assert_eq!(arpeggio.detect(1001), None);
    }
}
