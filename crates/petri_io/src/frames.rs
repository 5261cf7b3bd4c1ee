//! Frame output.
//!
//! The run driver hands every rendered RGBA frame to a [`FrameSink`].
//! [`FrameArchive`] stores them in a gzip stream that can be read back or
//! converted by an external encoder; [`NullSink`] discards them.
//!
//! Archive layout (all integers little-endian, inside gzip):
//! `b"PTRI"`, width `u32`, height `u32`, then per frame a delay `u16` in
//! hundredths of a second followed by `width * height * 4` bytes.

use crate::error::{IoError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

const MAGIC: &[u8; 4] = b"PTRI";
const BYTES_PER_PIXEL: usize = 4;

/// Destination for rendered frames.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &[u8], delay: u16) -> Result<()>;

    /// Flushes and closes the sink. Further frames are rejected.
    fn finish(&mut self) -> Result<()>;

    /// Number of frames accepted so far.
    fn frame_count(&self) -> usize;
}

/// Accepts and drops every frame.
#[derive(Debug, Default)]
pub struct NullSink {
    frames: usize,
}

impl FrameSink for NullSink {
    fn write_frame(&mut self, _frame: &[u8], _delay: u16) -> Result<()> {
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    fn frame_count(&self) -> usize {
        self.frames
    }
}

pub struct FrameArchive {
    encoder: Option<GzEncoder<BufWriter<File>>>,
    path: PathBuf,
    frame_len: usize,
    frames: usize,
}

/// Frames restored from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFrames {
    pub width: u32,
    pub height: u32,
    /// `(delay, rgba)` pairs in write order.
    pub frames: Vec<(u16, Vec<u8>)>,
}

impl FrameArchive {
    /// Creates the archive file and writes its header.
    pub fn create(path: impl AsRef<Path>, width: u32, height: u32) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)
            .map_err(|e| IoError::from(e).with_context(format!("creating {}", path.display())))?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        encoder.write_all(MAGIC)?;
        encoder.write_all(&width.to_le_bytes())?;
        encoder.write_all(&height.to_le_bytes())?;
        Ok(Self {
            encoder: Some(encoder),
            path: path.to_path_buf(),
            frame_len: width as usize * height as usize * BYTES_PER_PIXEL,
            frames: 0,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every frame back from an archive file.
    pub fn read(path: impl AsRef<Path>) -> Result<RecordedFrames> {
        let file = File::open(path.as_ref())?;
        let mut decoder = GzDecoder::new(BufReader::new(file));

        let mut magic = [0u8; 4];
        decoder.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(IoError::validation("not a frame archive"));
        }
        let mut word = [0u8; 4];
        decoder.read_exact(&mut word)?;
        let width = u32::from_le_bytes(word);
        decoder.read_exact(&mut word)?;
        let height = u32::from_le_bytes(word);
        let frame_len = width as usize * height as usize * BYTES_PER_PIXEL;

        let mut frames = Vec::new();
        loop {
            let mut delay = [0u8; 2];
            match decoder.read_exact(&mut delay) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }
            let mut pixels = vec![0u8; frame_len];
            decoder
                .read_exact(&mut pixels)
                .map_err(|e| IoError::from(e).with_context("truncated frame"))?;
            frames.push((u16::from_le_bytes(delay), pixels));
        }

        Ok(RecordedFrames {
            width,
            height,
            frames,
        })
    }
}

impl FrameSink for FrameArchive {
    fn write_frame(&mut self, frame: &[u8], delay: u16) -> Result<()> {
        if frame.len() != self.frame_len {
            return Err(IoError::validation(format!(
                "frame holds {} bytes, archive expects {}",
                frame.len(),
                self.frame_len
            )));
        }
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| IoError::validation("frame archive already finished"))?;
        encoder.write_all(&delay.to_le_bytes())?;
        encoder.write_all(frame)?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(encoder) = self.encoder.take() {
            encoder.finish()?.flush()?;
            tracing::debug!(path = %self.path.display(), frames = self.frames, "Frame archive closed");
        }
        Ok(())
    }

    fn frame_count(&self) -> usize {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("petri_frames_{}", std::process::id()))
            .join("run.frames.gz");
        let mut archive = FrameArchive::create(&path, 2, 1).unwrap();
        archive.write_frame(&[1, 2, 3, 255, 4, 5, 6, 255], 40).unwrap();
        archive.write_frame(&[0; 8], 10).unwrap();
        archive.finish().unwrap();
        assert_eq!(archive.frame_count(), 2);
        assert!(archive.write_frame(&[0; 8], 10).is_err());

        let recorded = FrameArchive::read(&path).unwrap();
        assert_eq!(recorded.width, 2);
        assert_eq!(recorded.height, 1);
        assert_eq!(
            recorded.frames,
            vec![(40, vec![1, 2, 3, 255, 4, 5, 6, 255]), (10, vec![0; 8])]
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_archive_rejects_wrong_frame_size() {
        let path = std::env::temp_dir()
            .join(format!("petri_frames_size_{}", std::process::id()))
            .join("bad.frames.gz");
        let mut archive = FrameArchive::create(&path, 3, 3).unwrap();
        assert!(matches!(
            archive.write_frame(&[0; 4], 1),
            Err(IoError::Validation(_))
        ));
        archive.finish().unwrap();
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_null_sink_counts() {
        let mut sink = NullSink::default();
        sink.write_frame(&[], 0).unwrap();
        sink.write_frame(&[], 0).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.frame_count(), 2);
    }
}
