//! Command-line parsing

use std::{path::PathBuf, str::FromStr};

use color_eyre::eyre::{bail, eyre, Result as EyreResult, WrapErr};

use lumitone::{
    detect::{Gate, OnsetAnchor},
    quantize::Octaves,
    sample::{RegionPosition, RegionSize, SampleMode},
    ConvertConfig,
};

pub const USAGE: &str = "\
Usage: lumitone [OPTIONS] <INPUT> [OUTPUT]

Turns the brightness or colour of a video region into a MIDI file.
OUTPUT defaults to INPUT with a .mid extension.

Options:
  -s, --size <SIZE>          region size: small, medium, large
  -p, --position <POS>       region position: top-left, center, bottom-right
  -o, --octaves <N>          octave range: 1, 3, 7
  -c, --colors <MODE>        mono (brightness) or all (hue)
  -g, --gate <GATE>          unsettled or majority
  -a, --anchor <ANCHOR>      window-head or leading-edge
      --raw <WxH>            INPUT is a raw rgb24 stream, '-' reads stdin
      --fps <N>              frame rate of a raw stream
      --config <FILE>        JSON configuration, flags override it
      --no-ui                log progress instead of drawing it
  -h, --help                 print this help
";

/// Parsed command line
#[derive(Debug, Default)]
pub struct Args {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub size: Option<RegionSize>,
    pub position: Option<RegionPosition>,
    pub octaves: Option<Octaves>,
    pub colors: Option<SampleMode>,
    pub gate: Option<Gate>,
    pub anchor: Option<OnsetAnchor>,
    pub raw: Option<(u32, u32)>,
    pub fps: Option<f64>,
    pub config: Option<PathBuf>,
    pub no_ui: bool,
}

pub enum Command {
    Convert(Args),
    Help,
}

impl Args {
    /// Parse everything after the program name
    pub fn parse(args: impl IntoIterator<Item = String>) -> EyreResult<Command> {
        let mut parsed = Args::default();
        let mut positional = Vec::new();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            // `--flag=value` is accepted as well as `--flag value`
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
                _ => (arg.clone(), None),
            };
            let mut value = || {
                inline
                    .clone()
                    .or_else(|| args.next())
                    .ok_or_else(|| eyre!("{flag} needs a value"))
            };

            match flag.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "-s" | "--size" => parsed.size = Some(parse_value(&flag, &value()?)?),
                "-p" | "--position" => parsed.position = Some(parse_value(&flag, &value()?)?),
                "-o" | "--octaves" => parsed.octaves = Some(parse_value(&flag, &value()?)?),
                "-c" | "--colors" => parsed.colors = Some(parse_value(&flag, &value()?)?),
                "-g" | "--gate" => parsed.gate = Some(parse_value(&flag, &value()?)?),
                "-a" | "--anchor" => parsed.anchor = Some(parse_value(&flag, &value()?)?),
                "--raw" => parsed.raw = Some(parse_dimensions(&value()?)?),
                "--fps" => parsed.fps = Some(parse_value(&flag, &value()?)?),
                "--config" => parsed.config = Some(PathBuf::from(value()?)),
                "--no-ui" => parsed.no_ui = true,
                "-" => positional.push(arg),
                other if other.starts_with('-') => bail!("unknown option {other}\n\n{USAGE}"),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        parsed.input = positional
            .next()
            .map(PathBuf::from)
            .ok_or_else(|| eyre!("missing INPUT\n\n{USAGE}"))?;
        parsed.output = positional.next().map(PathBuf::from);
        if let Some(extra) = positional.next() {
            bail!("unexpected argument {extra}");
        }

        if parsed.raw.is_some() && parsed.fps.is_none() {
            bail!("--raw needs --fps");
        }
        if parsed.is_stdin() && parsed.raw.is_none() {
            bail!("reading stdin needs --raw WxH");
        }
        if parsed.is_stdin() && parsed.output.is_none() {
            bail!("reading stdin needs an OUTPUT path");
        }

        Ok(Command::Convert(parsed))
    }

    pub fn is_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("mid"))
    }

    /// Load the config file, if any, and lay the flags over it
    pub fn config(&self) -> EyreResult<ConvertConfig> {
        let mut config = match &self.config {
            Some(path) => ConvertConfig::from_json_file(path)
                .wrap_err_with(|| format!("failed to load config {}", path.display()))?,
            None => ConvertConfig::default(),
        };

        if let Some(size) = self.size {
            config.region_size = size;
        }
        if let Some(position) = self.position {
            config.region_position = position;
        }
        if let Some(octaves) = self.octaves {
            config.octaves = octaves;
        }
        if let Some(mode) = self.colors {
            config.mode = mode;
        }
        if let Some(gate) = self.gate {
            config.debounce.gate = gate;
        }
        if let Some(anchor) = self.anchor {
            config.debounce.anchor = anchor;
        }
        Ok(config)
    }
}

fn parse_value<T>(flag: &str, value: &str) -> EyreResult<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .wrap_err_with(|| format!("invalid value {value:?} for {flag}"))
}

/// `640x480`
fn parse_dimensions(value: &str) -> EyreResult<(u32, u32)> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| eyre!("--raw expects WIDTHxHEIGHT, got {value:?}"))?;
    let width = parse_value("--raw", w)?;
    let height = parse_value("--raw", h)?;
    Ok((width, height))
}
