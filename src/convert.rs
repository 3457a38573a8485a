//! Frame-by-frame conversion loop
//!
//! One frame is sampled, quantized and debounced before the next is
//! requested. The loop checks a [`StopSignal`] once per frame; stopping and
//! reaching the end of the stream both flush the note still sounding.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use image::RgbImage;

use crate::{
    config::ConvertConfig,
    detect::{Debouncer, NoteSample},
    io::{frames::FrameSource, midi::NoteEvent},
    quantize::QuantizationTable,
    sample::{FrameSampler, Reading, SampleExtractor},
    sequencing::{FrameClock, Tempo},
    Result,
};

/// Cooperative cancellation flag shared between the loop and its caller
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to flush and return after the current frame
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Snapshot reported after every frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Frames processed so far
    pub frame: usize,
    /// Total frames, if the source knows
    pub total: Option<usize>,
    /// Note currently sounding
    pub note: Option<u8>,
    /// Events emitted so far
    pub events: usize,
    /// Set on the final report
    pub finished: bool,
}

/// Receives progress snapshots from the conversion loop
pub trait ProgressSink {
    fn report(&mut self, progress: Progress);
}

impl ProgressSink for () {
    fn report(&mut self, _progress: Progress) {}
}

impl<F: FnMut(Progress)> ProgressSink for F {
    fn report(&mut self, progress: Progress) {
        self(progress)
    }
}

#[cfg(feature = "rtrb")]
impl ProgressSink for rtrb::Producer<Progress> {
    fn report(&mut self, progress: Progress) {
        // a full queue only means the reader is behind; the final snapshot
        // must still get through unless nobody is reading anymore
        if progress.finished {
            while self.push(progress).is_err() && !self.is_abandoned() {
                std::thread::yield_now();
            }
        } else {
            let _ = self.push(progress);
        }
    }
}

/// Result of one run
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub events: Vec<NoteEvent>,
    /// Frames processed
    pub frames: usize,
    /// True if the stop signal ended the run early
    pub stopped: bool,
    pub tempo: Tempo,
}

impl Conversion {
    /// Length of the processed footage in ticks
    pub fn total_ticks(&self) -> u64 {
        self.events.last().map_or(0, NoteEvent::off_tick)
    }
}

/// Turns a stream of frames into note events
pub struct Converter {
    config: ConvertConfig,
    quantizer: QuantizationTable,
    sampler: FrameSampler,
    extractor: Box<dyn SampleExtractor>,
}

impl Converter {
    /// Configuration errors surface here, before any frame is read
    pub fn new(config: ConvertConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            quantizer: QuantizationTable::new(config.octaves),
            sampler: config.sampler(),
            extractor: config.mode.extractor(),
            config,
        })
    }

    /// Swap the sampling strategy picked by the configured mode
    pub fn with_extractor(mut self, extractor: Box<dyn SampleExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Table built from the configured octave range
    pub fn quantizer(&self) -> &QuantizationTable {
        &self.quantizer
    }

    /// Reduce one frame to a reading
    pub fn read_frame(&self, frame: &RgbImage) -> Result<Reading> {
        Ok(self.extractor.extract(&self.sampler.measure(frame)?))
    }

    /// Pull frames from `source` until it runs dry or `stop` is set, then
    /// flush the last note. Source and sampling errors abort the run.
    pub fn run<S, P>(&self, source: &mut S, stop: &StopSignal, progress: &mut P) -> Result<Conversion>
    where
        S: FrameSource + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let clock = FrameClock::new(source.frame_rate())?;
        let total = source.frame_count();
        let mut debouncer = Debouncer::new(self.config.debounce, self.config.tempo)?;
        let mut events = Vec::new();
        let mut frames = 0;
        let mut stopped = false;

        log::info!(
            "converting at {:.3} fps, {} octave(s), {} mode",
            clock.fps(),
            self.config.octaves,
            self.config.mode
        );

        loop {
            if stop.is_stopped() {
                stopped = true;
                break;
            }
            let Some(frame) = source.next_frame()? else {
                break;
            };

            let reading = self.read_frame(&frame)?;
            let sample = NoteSample {
                timestamp: clock.timestamp(frames),
                note: self.quantizer.note_for(reading.value),
                velocity: reading.velocity,
            };
            events.extend(debouncer.process(sample));
            frames += 1;

            progress.report(Progress {
                frame: frames,
                total,
                note: debouncer.pending().note,
                events: events.len(),
                finished: false,
            });
        }

        events.extend(debouncer.finish(clock.timestamp(frames)));

        if stopped {
            log::warn!("stopped after {frames} frames");
        }
        log::info!("{} note events from {frames} frames", events.len());

        progress.report(Progress {
            frame: frames,
            total,
            note: None,
            events: events.len(),
            finished: true,
        });

        Ok(Conversion {
            events,
            frames,
            stopped,
            tempo: self.config.tempo,
        })
    }
}
