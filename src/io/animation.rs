use std::{
    collections::VecDeque,
    fs::File,
    io::{BufRead, BufReader, Seek},
    path::Path,
};

use image::{AnimationDecoder, ImageFormat, RgbImage};

use super::frames::FrameSource;
use crate::{Error, Result};

/// Frames of an animated GIF, APNG or WebP, decoded up front
#[derive(Debug, Clone)]
pub struct AnimationSource {
    frames: VecDeque<RgbImage>,
    total: usize,
    fps: f64,
}

impl AnimationSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = image::ImageReader::open(path)?
            .with_guessed_format()?
            .format()
            .ok_or_else(|| {
                Error::UnsupportedInput(format!("cannot tell the format of {}", path.display()))
            })?;
        Self::from_reader(BufReader::new(File::open(path)?), format)
    }

    pub fn from_reader<R: BufRead + Seek>(reader: R, format: ImageFormat) -> Result<Self> {
        let frames = match format {
            ImageFormat::Gif => image::codecs::gif::GifDecoder::new(reader)?
                .into_frames()
                .collect_frames()?,
            ImageFormat::Png => {
                let decoder = image::codecs::png::PngDecoder::new(reader)?;
                if !decoder.is_apng()? {
                    return Err(Error::UnsupportedInput("PNG is not animated".into()));
                }
                decoder.apng()?.into_frames().collect_frames()?
            }
            ImageFormat::WebP => {
                let decoder = image::codecs::webp::WebPDecoder::new(reader)?;
                if !decoder.has_animation() {
                    return Err(Error::UnsupportedInput("WebP is not animated".into()));
                }
                decoder.into_frames().collect_frames()?
            }
            other => {
                return Err(Error::UnsupportedInput(format!(
                    "{other:?} has no animation frames"
                )))
            }
        };
        Self::from_frames(frames)
    }

    /// Frame rate is the frame count over the summed frame delays
    pub fn from_frames(frames: Vec<image::Frame>) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::UnsupportedInput("animation has no frames".into()));
        }

        let total_ms: f64 = frames
            .iter()
            .map(|frame| {
                let (numer, denom) = frame.delay().numer_denom_ms();
                numer as f64 / denom.max(1) as f64
            })
            .sum();
        let fps = frames.len() as f64 * 1000.0 / total_ms;
        if !fps.is_finite() || fps <= 0.0 {
            return Err(Error::InvalidFrameRate(fps));
        }

        let frames: VecDeque<RgbImage> = frames
            .into_iter()
            .map(|frame| image::DynamicImage::ImageRgba8(frame.into_buffer()).into_rgb8())
            .collect();
        log::debug!("decoded {} animation frames at {fps:.2} fps", frames.len());

        Ok(Self {
            total: frames.len(),
            frames,
            fps,
        })
    }
}

impl FrameSource for AnimationSource {
    fn frame_rate(&self) -> f64 {
        self.fps
    }

    fn frame_count(&self) -> Option<usize> {
        Some(self.total)
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        Ok(self.frames.pop_front())
    }
}
