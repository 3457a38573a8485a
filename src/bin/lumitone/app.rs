//! Opens the input, runs the conversion and writes the MIDI file

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use std::{
    fs::File,
    io::{self, BufReader, IsTerminal},
    thread,
};

use lumitone::{
    io::{AnimationSource, FrameSource, RawVideoSource, SmfWriter},
    Conversion, Converter, Progress, StopSignal,
};

use super::{
    args::Args,
    ui::{RunInfo, UiApp},
};

/// Progress snapshots buffered between the worker and the screen
const PROGRESS_QUEUE: usize = 256;

type BoxedSource = Box<dyn FrameSource + Send>;

pub struct App {
    args: Args,
}

impl App {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    /// Whether to draw the progress screen
    pub fn wants_ui(&self) -> bool {
        !self.args.no_ui && io::stdout().is_terminal()
    }

    pub fn run(self) -> EyreResult<()> {
        let config = self.args.config()?;
        let converter = Converter::new(config).wrap_err("invalid configuration")?;
        let source = self.open_source()?;
        let output = self.args.output_path();

        let conversion = if self.wants_ui() {
            self.convert_with_ui(converter, source)?
        } else {
            self.convert_headless(&converter, source)?
        };

        let writer = SmfWriter::new(conversion.tempo).track_name(self.track_name());
        writer
            .save(&conversion.events, &output)
            .wrap_err_with(|| format!("failed to write {}", output.display()))?;

        log::info!(
            "wrote {} notes ({} ticks) to {}",
            conversion.events.len(),
            conversion.total_ticks(),
            output.display()
        );
        println!(
            "{} notes from {} frames -> {}{}",
            conversion.events.len(),
            conversion.frames,
            output.display(),
            if conversion.stopped { " (stopped early)" } else { "" }
        );
        Ok(())
    }

    fn open_source(&self) -> EyreResult<BoxedSource> {
        let input = &self.args.input;

        if let Some((width, height)) = self.args.raw {
            let fps = self
                .args
                .fps
                .ok_or_else(|| eyre!("--raw needs --fps"))?;

            if self.args.is_stdin() {
                let source = RawVideoSource::new(BufReader::new(io::stdin()), width, height, fps)?;
                return Ok(Box::new(source));
            }

            let file = File::open(input)
                .wrap_err_with(|| format!("failed to open {}", input.display()))?;
            let len = file
                .metadata()
                .wrap_err_with(|| format!("failed to stat {}", input.display()))?
                .len();
            let source = RawVideoSource::new(BufReader::new(file), width, height, fps)?
                .with_byte_len(len);
            return Ok(Box::new(source));
        }

        let source = AnimationSource::open(input)
            .wrap_err_with(|| format!("failed to decode {}", input.display()))?;
        Ok(Box::new(source))
    }

    fn track_name(&self) -> String {
        self.args
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "lumitone".to_string())
    }

    fn convert_headless(&self, converter: &Converter, mut source: BoxedSource) -> EyreResult<Conversion> {
        let total = source.frame_count();
        // one line per ~5% when the length is known, else every 500 frames
        let every = total.map_or(500, |total| (total / 20).max(1));
        let mut report = |progress: Progress| {
            if !progress.finished && progress.frame % every == 0 {
                match total {
                    Some(total) => log::info!("frame {}/{total}", progress.frame),
                    None => log::info!("frame {}", progress.frame),
                }
            }
        };

        converter
            .run(&mut source, &StopSignal::new(), &mut report)
            .wrap_err("conversion failed")
    }

    fn convert_with_ui(&self, converter: Converter, mut source: BoxedSource) -> EyreResult<Conversion> {
        let (mut progress_tx, progress_rx) = rtrb::RingBuffer::<Progress>::new(PROGRESS_QUEUE);
        let stop = StopSignal::new();

        let info = RunInfo {
            input: self.args.input.display().to_string(),
            fps: source.frame_rate(),
            lowest_note: converter.quantizer().lowest_note(),
            highest_note: converter.quantizer().highest_note(),
        };

        let worker_stop = stop.clone();
        let worker = thread::Builder::new()
            .name("lumitone-convert".into())
            .spawn(move || converter.run(&mut source, &worker_stop, &mut progress_tx))
            .wrap_err("failed to spawn the conversion thread")?;

        let mut terminal = ratatui::init();
        let ui_result =
            UiApp::new(progress_rx, stop.clone(), info).run(&mut terminal, || worker.is_finished());
        ratatui::restore();

        if ui_result.is_err() {
            stop.stop();
        }
        let conversion = worker
            .join()
            .map_err(|_| eyre!("conversion thread panicked"))?
            .wrap_err("conversion failed")?;
        ui_result?;
        Ok(conversion)
    }
}
