use std::{fs::File, io::BufWriter, io::Write, path::Path};

use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
};

use crate::{sequencing::Tempo, Result};

/// Channel voice messages the writer emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
}

impl MidiEvent {
    /// Keys and velocities outside the 7-bit range are clamped, never wrapped.
    /// Note-on velocities start at 1 since 0 would be read as a note-off.
    fn to_message(self) -> TrackEventKind<'static> {
        match self {
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            } => TrackEventKind::Midi {
                channel: u4::new(channel & 0x0f),
                message: MidiMessage::NoteOn {
                    key: u7::new(key.min(0x7f)),
                    vel: u7::new(velocity.clamp(1, 0x7f)),
                },
            },
            MidiEvent::NoteOff {
                channel,
                key,
                velocity,
            } => TrackEventKind::Midi {
                channel: u4::new(channel & 0x0f),
                message: MidiMessage::NoteOff {
                    key: u7::new(key.min(0x7f)),
                    vel: u7::new(velocity.min(0x7f)),
                },
            },
        }
    }

    fn is_note_off(&self) -> bool {
        matches!(self, MidiEvent::NoteOff { .. })
    }
}

/// A finished note: sounded at `on_tick` for `duration_ticks`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub note: u8,
    pub velocity: u8,
    pub on_tick: u64,
    pub duration_ticks: u64,
}

impl NoteEvent {
    /// Tick at which the note is released
    pub fn off_tick(&self) -> u64 {
        self.on_tick + self.duration_ticks
    }

    /// The note-on/note-off pair at absolute ticks.
    /// The note-off repeats the note-on velocity.
    pub fn midi_events(&self, channel: u8) -> [(u64, MidiEvent); 2] {
        [
            (
                self.on_tick,
                MidiEvent::NoteOn {
                    channel,
                    key: self.note,
                    velocity: self.velocity,
                },
            ),
            (
                self.off_tick(),
                MidiEvent::NoteOff {
                    channel,
                    key: self.note,
                    velocity: self.velocity,
                },
            ),
        ]
    }
}

/// Serialises note events as a single-track Standard MIDI File
#[derive(Debug, Clone)]
pub struct SmfWriter {
    tempo: Tempo,
    channel: u8,
    track_name: Option<String>,
}

impl SmfWriter {
    /// Writer on channel 0 with no track name
    pub fn new(tempo: Tempo) -> Self {
        Self {
            tempo,
            channel: 0,
            track_name: None,
        }
    }

    /// MIDI channel for every note (0-15)
    pub fn channel(mut self, channel: u8) -> Self {
        self.channel = channel & 0x0f;
        self
    }

    /// Name written as the track's first meta event
    pub fn track_name(mut self, name: impl Into<String>) -> Self {
        self.track_name = Some(name.into());
        self
    }

    /// Build the in-memory file.
    ///
    /// Events are laid out on absolute ticks and delta-encoded. At equal ticks
    /// note-offs go first so back-to-back notes never overlap.
    pub fn to_smf(&self, events: &[NoteEvent]) -> Smf<'_> {
        let mut timed: Vec<(u64, MidiEvent)> = events
            .iter()
            .flat_map(|event| event.midi_events(self.channel))
            .collect();
        timed.sort_by_key(|(tick, event)| (*tick, !event.is_note_off()));

        let mut track = Vec::with_capacity(timed.len() + 3);
        if let Some(name) = &self.track_name {
            track.push(TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
            });
        }
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(
                self.tempo.micros_per_beat.min(0x00ff_ffff),
            ))),
        });

        let mut cursor = 0u64;
        for (tick, event) in timed {
            track.push(TrackEvent {
                delta: delta_ticks(tick - cursor),
                kind: event.to_message(),
            });
            cursor = tick;
        }
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });

        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(self.tempo.ticks_per_beat.min(0x7fff))),
        ));
        smf.tracks.push(track);
        smf
    }

    /// Serialise to any writer
    pub fn write<W: Write>(&self, events: &[NoteEvent], out: W) -> Result<()> {
        self.to_smf(events).write_std(out)?;
        Ok(())
    }

    /// Serialise into memory
    pub fn to_bytes(&self, events: &[NoteEvent]) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write(events, &mut bytes)?;
        Ok(bytes)
    }

    /// Create (or overwrite) a `.mid` file at `path`
    pub fn save(&self, events: &[NoteEvent], path: impl AsRef<Path>) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write(events, &mut out)?;
        out.flush()?;
        Ok(())
    }
}

/// Largest delta a variable-length quantity can hold
const MAX_DELTA: u64 = 0x0fff_ffff;

/// Deltas wider than 28 bits saturate, shifting every later event
fn delta_ticks(ticks: u64) -> u28 {
    if ticks > MAX_DELTA {
        log::warn!("delta of {ticks} ticks exceeds the MIDI limit, clamped to {MAX_DELTA}");
    }
    u28::new(ticks.min(MAX_DELTA) as u32)
}
