use std::{collections::VecDeque, io::Read};

use image::RgbImage;

use crate::{Error, Result};

/// Supplies decoded video frames in presentation order
pub trait FrameSource {
    /// Frames per second
    fn frame_rate(&self) -> f64;

    /// Total frames, when the source knows it up front
    fn frame_count(&self) -> Option<usize>;

    /// Next frame, or `None` at end of stream
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn frame_rate(&self) -> f64 {
        (**self).frame_rate()
    }

    fn frame_count(&self) -> Option<usize> {
        (**self).frame_count()
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        (**self).next_frame()
    }
}

/// Packed rgb24 frames back to back, as produced by
/// `ffmpeg -i clip.mp4 -f rawvideo -pix_fmt rgb24 -`
#[derive(Debug)]
pub struct RawVideoSource<R> {
    reader: R,
    width: u32,
    height: u32,
    fps: f64,
    frame_count: Option<usize>,
}

impl<R: Read> RawVideoSource<R> {
    /// Read `width` x `height` rgb24 frames from `reader`
    pub fn new(reader: R, width: u32, height: u32, fps: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyFrame { width, height });
        }
        Ok(Self {
            reader,
            width,
            height,
            fps,
            frame_count: None,
        })
    }

    /// Frame count derived from the stream length in bytes
    pub fn with_byte_len(mut self, len: u64) -> Self {
        self.frame_count = Some((len / self.frame_bytes() as u64) as usize);
        self
    }

    /// Size of one packed frame
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    /// Fill `buf`, returning how many bytes arrived before end of stream
    fn read_frame(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> FrameSource for RawVideoSource<R> {
    fn frame_rate(&self) -> f64 {
        self.fps
    }

    fn frame_count(&self) -> Option<usize> {
        self.frame_count
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let expected = self.frame_bytes();
        let mut buf = vec![0u8; expected];
        match self.read_frame(&mut buf)? {
            0 => Ok(None),
            actual if actual < expected => Err(Error::TruncatedFrame { expected, actual }),
            _ => Ok(RgbImage::from_raw(self.width, self.height, buf)),
        }
    }
}

/// Frames already in memory
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    frames: VecDeque<RgbImage>,
    fps: f64,
    total: usize,
}

impl VecSource {
    /// Serve `frames` in order at `fps`
    pub fn new(frames: Vec<RgbImage>, fps: f64) -> Self {
        let total = frames.len();
        Self {
            frames: frames.into(),
            fps,
            total,
        }
    }

    /// `count` identical frames of one colour
    pub fn solid(width: u32, height: u32, rgb: [u8; 3], count: usize, fps: f64) -> Self {
        let frame = RgbImage::from_pixel(width, height, image::Rgb(rgb));
        Self::new(vec![frame; count], fps)
    }
}

impl FrameSource for VecSource {
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
