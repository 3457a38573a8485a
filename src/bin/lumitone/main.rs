//! lumitone - turn a video region into a MIDI melody
//!
//! Run with: cargo run -- clip.gif
//! or pipe frames in: ffmpeg -i clip.mp4 -f rawvideo -pix_fmt rgb24 - | lumitone --raw 640x480 --fps 30 - clip.mid

mod app;
mod args;
mod ui;

use app::App;
use args::{Args, Command, USAGE};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = match Args::parse(std::env::args().skip(1))? {
        Command::Convert(args) => args,
        Command::Help => {
            print!("{USAGE}");
            return Ok(());
        }
    };

    let app = App::new(args);

    // stderr shares the terminal with the progress screen, keep it quiet there
    let level = if app.wants_ui() { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    app.run()
}
