//! Debouncer - turns per-frame note readings into note events
//!
//! Every frame pushes `(note, time)` into a small window. A transition is
//! only considered while the gate is open, and only fires when the incoming
//! note differs from the one currently sounding. Each transition closes the
//! previous note and hands it out as a [`NoteEvent`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray};

use super::window::DebounceWindow;
use crate::{io::midi::NoteEvent, sequencing::Tempo, Error, Result};

/// Default debounce window length in frames
pub const DEFAULT_WINDOW: usize = 5;

/// Stability test deciding when the window may trigger a transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, VariantArray)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Gate {
    /// Open whenever the window disagrees with itself. Fires on the leading
    /// edge of a change, including single-frame outliers.
    #[default]
    Unsettled,
    /// Open only when the incoming note holds a strict majority of the window.
    /// Outliers shorter than half the window never fire.
    Majority,
}

impl Gate {
    fn is_open(self, window: &DebounceWindow, note: Option<u8>) -> bool {
        match self {
            Gate::Unsettled => !window.is_unanimous(),
            Gate::Majority => window.count(note) * 2 > window.len(),
        }
    }
}

/// Which timestamp marks the start (and end) of a note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, VariantArray)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum OnsetAnchor {
    /// Oldest frame in the window; the last note ends at the final window head
    #[default]
    WindowHead,
    /// First frame of the new note's run; the last note ends at end of stream
    LeadingEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DebounceConfig {
    /// Window length in frames
    pub window: usize,
    pub gate: Gate,
    pub anchor: OnsetAnchor,
}

impl DebounceConfig {
    /// Windows shorter than two frames are rejected
    pub fn validate(&self) -> Result<()> {
        if self.window < 2 {
            return Err(Error::InvalidWindow(self.window));
        }
        Ok(())
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            gate: Gate::default(),
            anchor: OnsetAnchor::default(),
        }
    }
}

/// Lowest velocity that still sounds; 0 would read as a note-off
const MIN_VELOCITY: u8 = 1;
const MAX_VELOCITY: u8 = 127;

/// A quantized reading for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteSample {
    /// Seconds since the first frame
    pub timestamp: f64,
    pub note: u8,
    pub velocity: u8,
}

/// The note currently sounding, `None` before the first transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingNote {
    pub note: Option<u8>,
    pub velocity: u8,
    pub start_tick: u64,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    config: DebounceConfig,
    tempo: Tempo,
    window: DebounceWindow,
    pending: PendingNote,
    samples: usize,
}

impl Debouncer {
    /// Window and tempo are checked here, before any sample arrives
    pub fn new(config: DebounceConfig, tempo: Tempo) -> Result<Self> {
        config.validate()?;
        tempo.validate()?;

        let mut window = DebounceWindow::new(config.window);
        // silence at t=0 so the very first reading opens the gate
        window.push(None, 0.0);

        Ok(Self {
            config,
            tempo,
            window,
            pending: PendingNote::default(),
            samples: 0,
        })
    }

    /// Feed one frame. Returns the previous note if this frame ended it.
    pub fn process(&mut self, sample: NoteSample) -> Option<NoteEvent> {
        let incoming = Some(sample.note);
        self.window.push(incoming, sample.timestamp);
        self.samples += 1;

        if !self.config.gate.is_open(&self.window, incoming) || self.pending.note == incoming {
            return None;
        }

        let onset = match self.config.anchor {
            OnsetAnchor::LeadingEdge => self.window.run_start(incoming),
            OnsetAnchor::WindowHead => self.window.head().map(|entry| entry.timestamp),
        }
        .unwrap_or(sample.timestamp);
        let onset_tick = self.tempo.ticks(onset);

        let closed = self.close_pending(onset_tick);
        self.pending = PendingNote {
            note: incoming,
            velocity: sample.velocity.clamp(MIN_VELOCITY, MAX_VELOCITY),
            start_tick: onset_tick,
        };

        if let Some(event) = &closed {
            log::debug!(
                "note {} -> {} at tick {} ({} ticks)",
                event.note,
                sample.note,
                onset_tick,
                event.duration_ticks
            );
        }
        closed
    }

    /// Close whatever note is still sounding.
    ///
    /// `end_time` is the end of the stream in seconds; it is used with the
    /// leading-edge anchor, while the window-head anchor closes at the final
    /// window head. Silence and empty runs produce nothing, and a second call
    /// returns `None`.
    pub fn finish(&mut self, end_time: f64) -> Option<NoteEvent> {
        if self.samples == 0 {
            return None;
        }

        let end = match self.config.anchor {
            OnsetAnchor::LeadingEdge => end_time,
            OnsetAnchor::WindowHead => self
                .window
                .head()
                .map(|entry| entry.timestamp)
                .unwrap_or(end_time),
        };
        let end_tick = self.tempo.ticks(end);

        let closed = self.close_pending(end_tick);
        self.pending = PendingNote {
            start_tick: end_tick,
            ..PendingNote::default()
        };
        closed
    }

    fn close_pending(&self, end_tick: u64) -> Option<NoteEvent> {
        // silence is never written out
        let note = self.pending.note?;
        Some(NoteEvent {
            note,
            velocity: self.pending.velocity,
            on_tick: self.pending.start_tick,
            duration_ticks: end_tick.saturating_sub(self.pending.start_tick),
        })
    }

    /// The note sounding right now
    pub fn pending(&self) -> &PendingNote {
        &self.pending
    }

    /// Recent `(note, time)` entries, oldest first
    pub fn window(&self) -> &DebounceWindow {
        &self.window
    }

    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// Frames processed so far
    pub fn samples(&self) -> usize {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: u8 = 60;
    const B: u8 = 67;

    fn debouncer(gate: Gate, anchor: OnsetAnchor) -> Debouncer {
        let config = DebounceConfig {
            gate,
            anchor,
            ..DebounceConfig::default()
        };
        Debouncer::new(config, Tempo::default()).unwrap()
    }

    /// Run a note per frame through the debouncer and flush at end of stream
    fn run(debouncer: &mut Debouncer, notes: &[u8], fps: f64, velocity: u8) -> Vec<NoteEvent> {
        let mut events: Vec<NoteEvent> = notes
            .iter()
            .enumerate()
            .filter_map(|(i, &note)| {
                debouncer.process(NoteSample {
                    timestamp: i as f64 / fps,
                    note,
                    velocity,
                })
            })
            .collect();
        events.extend(debouncer.finish(notes.len() as f64 / fps));
        events
    }

    fn repeat(pattern: &[(u8, usize)]) -> Vec<u8> {
        pattern
            .iter()
            .flat_map(|&(note, count)| std::iter::repeat(note).take(count))
            .collect()
    }

    #[test]
    fn rejects_tiny_windows() {
        for window in [0, 1] {
            let config = DebounceConfig {
                window,
                ..DebounceConfig::default()
            };
            assert!(matches!(
                Debouncer::new(config, Tempo::default()),
                Err(Error::InvalidWindow(w)) if w == window
            ));
        }
    }

    #[test]
    fn empty_stream_emits_nothing() {
        for &gate in Gate::VARIANTS {
            for &anchor in OnsetAnchor::VARIANTS {
                let mut d = debouncer(gate, anchor);
                assert_eq!(d.finish(0.0), None);
                assert_eq!(d.finish(1.0), None);
            }
        }
    }

    #[test]
    fn steady_note_spans_the_whole_stream() {
        let mut d = debouncer(Gate::Unsettled, OnsetAnchor::LeadingEdge);
        let events = run(&mut d, &[65; 10], 10.0, 110);
        assert_eq!(
            events,
            vec![NoteEvent {
                note: 65,
                velocity: 110,
                on_tick: 0,
                duration_ticks: 960,
            }]
        );
    }

    #[test]
    fn window_head_anchor_closes_at_the_last_head() {
        // 10 frames at 10fps: the final window holds t=0.5..0.9
        let mut d = debouncer(Gate::Unsettled, OnsetAnchor::WindowHead);
        let events = run(&mut d, &[65; 10], 10.0, 110);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].on_tick, 0);
        assert_eq!(events[0].duration_ticks, 480);
    }

    #[test]
    fn durations_match_elapsed_time() {
        let notes = repeat(&[(A, 60), (B, 90)]);
        let tempo = Tempo::default();

        for &gate in Gate::VARIANTS {
            let mut d = debouncer(gate, OnsetAnchor::LeadingEdge);
            let events = run(&mut d, &notes, 30.0, 100);
            assert_eq!(events.len(), 2, "{gate}");

            let a = events[0];
            assert_eq!(a.note, A);
            assert!(a.duration_ticks.abs_diff(tempo.ticks(2.0)) <= 1, "{gate}");

            let b = events[1];
            assert_eq!(b.note, B);
            assert_eq!(b.on_tick, a.on_tick + a.duration_ticks);
            assert!(b.duration_ticks.abs_diff(tempo.ticks(3.0)) <= 1, "{gate}");
        }
    }

    #[test]
    fn window_head_anchor_lags_by_the_window() {
        // A starts at the seed head (t=0) but ends at the head when B arrives,
        // four frames before B's first frame
        let notes = repeat(&[(A, 60), (B, 90)]);
        let mut d = debouncer(Gate::Unsettled, OnsetAnchor::WindowHead);
        let events = run(&mut d, &notes, 30.0, 100);

        let tempo = Tempo::default();
        assert_eq!(events[0].duration_ticks, tempo.ticks(56.0 / 30.0));
        assert_eq!(events[1].on_tick, tempo.ticks(56.0 / 30.0));
    }

    #[test]
    fn majority_gate_ignores_single_frame_outliers() {
        let notes = repeat(&[(A, 8), (B, 1), (A, 8)]);
        let mut d = debouncer(Gate::Majority, OnsetAnchor::LeadingEdge);
        let events = run(&mut d, &notes, 30.0, 100);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].note, A);
        assert_eq!(events[0].duration_ticks, Tempo::default().ticks(17.0 / 30.0));
    }

    #[test]
    fn majority_gate_ignores_two_frame_outliers() {
        let notes = repeat(&[(A, 6), (B, 2), (A, 6)]);
        let mut d = debouncer(Gate::Majority, OnsetAnchor::LeadingEdge);
        let events = run(&mut d, &notes, 30.0, 100);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn unsettled_gate_reacts_on_the_leading_edge() {
        // the first disagreeing frame already fires, so a one-frame flicker
        // becomes a one-frame note
        let notes = repeat(&[(A, 8), (B, 1), (A, 8)]);
        let mut d = debouncer(Gate::Unsettled, OnsetAnchor::LeadingEdge);
        let events = run(&mut d, &notes, 30.0, 100);

        let played: Vec<u8> = events.iter().map(|e| e.note).collect();
        assert_eq!(played, vec![A, B, A]);
        assert_eq!(events[1].duration_ticks, Tempo::default().ticks(1.0 / 30.0));
    }

    #[test]
    fn velocity_is_taken_when_the_note_starts() {
        let mut d = debouncer(Gate::Unsettled, OnsetAnchor::LeadingEdge);
        let mut events = Vec::new();
        for i in 0..20 {
            let (note, velocity) = if i < 10 { (A, 90) } else { (B, 120) };
            events.extend(d.process(NoteSample {
                timestamp: i as f64 / 10.0,
                note,
                // later frames of a note report other velocities
                velocity: if i % 10 == 0 { velocity } else { 1 },
            }));
        }
        events.extend(d.finish(2.0));

        assert_eq!(events[0].velocity, 90);
        assert_eq!(events[1].velocity, 120);
    }

    #[test]
    fn onset_ticks_never_decrease() {
        // deterministic noisy pattern with runs of varying length
        let mut notes = Vec::new();
        let mut state = 7u32;
        for _ in 0..400 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let note = 59 + ((state >> 16) % 4) as u8;
            let run = 1 + ((state >> 8) % 6) as usize;
            notes.extend(std::iter::repeat(note).take(run));
        }

        for &gate in Gate::VARIANTS {
            for &anchor in OnsetAnchor::VARIANTS {
                let mut d = debouncer(gate, anchor);
                let events = run(&mut d, &notes, 25.0, 100);
                assert!(!events.is_empty());
                for pair in events.windows(2) {
                    assert!(pair[0].on_tick <= pair[1].on_tick);
                    assert!(pair[0].on_tick + pair[0].duration_ticks <= pair[1].on_tick);
                }
            }
        }
    }

    #[test]
    fn pending_note_tracks_the_current_note() {
        let mut d = debouncer(Gate::Unsettled, OnsetAnchor::LeadingEdge);
        assert_eq!(d.pending().note, None);

        d.process(NoteSample {
            timestamp: 0.0,
            note: A,
            velocity: 100,
        });
        assert_eq!(d.pending().note, Some(A));
        assert_eq!(d.pending().velocity, 100);
        assert_eq!(d.samples(), 1);

        d.finish(0.5);
        assert_eq!(d.pending().note, None);
    }

    #[test]
    fn defaults_follow_the_window_head() {
        let config = DebounceConfig::default();
        assert_eq!(config.anchor, OnsetAnchor::WindowHead);
        assert_eq!(config.gate, Gate::Unsettled);

        // 10 frames at 10fps with everything left at its default
        let mut d = Debouncer::new(config, Tempo::default()).unwrap();
        let events = run(&mut d, &[65; 10], 10.0, 110);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].duration_ticks, 480);
    }

    #[test]
    fn rejects_unusable_tempos() {
        for tempo in [Tempo::new(0, 500_000), Tempo::new(480, 0)] {
            assert!(matches!(
                Debouncer::new(DebounceConfig::default(), tempo),
                Err(Error::InvalidTempo { .. })
            ));
        }
    }

    #[test]
    fn velocities_are_kept_in_midi_range() {
        let mut d = debouncer(Gate::Unsettled, OnsetAnchor::LeadingEdge);
        let mut events = Vec::new();
        for (i, (note, velocity)) in [(A, 0), (B, 200), (A, 127)].into_iter().enumerate() {
            events.extend(d.process(NoteSample {
                timestamp: i as f64,
                note,
                velocity,
            }));
        }
        events.extend(d.finish(3.0));

        let velocities: Vec<u8> = events.iter().map(|e| e.velocity).collect();
        assert_eq!(velocities, vec![1, 127, 127]);
    }

    #[test]
    fn parses_option_names() {
        assert_eq!("majority".parse::<Gate>().unwrap(), Gate::Majority);
        assert_eq!("unsettled".parse::<Gate>().unwrap(), Gate::Unsettled);
        assert_eq!(
            "window-head".parse::<OnsetAnchor>().unwrap(),
            OnsetAnchor::WindowHead
        );
        assert_eq!(OnsetAnchor::LeadingEdge.to_string(), "leading-edge");
        assert!("sometimes".parse::<Gate>().is_err());
    }
}
