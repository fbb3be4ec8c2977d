//! WAV serialization for raw PCM audio.
//!
//! Speech synthesis returns headerless little-endian PCM. This module wraps
//! it in a canonical 44-byte RIFF/WAVE header so ordinary players can open
//! the result.
//!
//! # Example
//!
//! ```rust,ignore
//! use koe::audio::{write_wav, WavSpec, OUTPUT_FILE};
//!
//! write_wav(OUTPUT_FILE, WavSpec::GEMINI_TTS, &pcm)?;
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bytes::{BufMut, BytesMut};
use tracing::{debug, warn};

use crate::error::{AudioError, Result};

/// File name the `speak` flow writes to.
pub const OUTPUT_FILE: &str = "out.wav";

/// Size of the canonical PCM WAV header.
pub const WAV_HEADER_LEN: usize = 44;

/// Bytes of header counted by the RIFF chunk size (everything after `RIFF` + size).
const RIFF_OVERHEAD: u32 = 36;

/// PCM format code in the `fmt ` chunk.
const FORMAT_PCM: u16 = 1;

/// Layout of the PCM samples being wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of interleaved channels.
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
    /// Bits per sample (per channel).
    pub bits_per_sample: u16,
}

impl WavSpec {
    /// Gemini speech output: mono, 16-bit, 24 kHz.
    pub const GEMINI_TTS: Self = Self {
        channels: 1,
        sample_rate: 24_000,
        bits_per_sample: 16,
    };

    /// Bytes per sample.
    #[must_use]
    pub const fn sample_width(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Bytes per frame across all channels.
    #[must_use]
    pub const fn block_align(&self) -> u16 {
        self.channels * self.sample_width()
    }

    /// Bytes per second.
    #[must_use]
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }

    /// Build the 44-byte header for `data_len` bytes of PCM.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::TooLarge`] if the RIFF chunk size would overflow.
    pub fn header(&self, data_len: usize) -> Result<BytesMut> {
        let data_size = u32::try_from(data_len)
            .ok()
            .filter(|len| *len <= u32::MAX - RIFF_OVERHEAD)
            .ok_or(AudioError::TooLarge { len: data_len })?;

        let mut buf = BytesMut::with_capacity(WAV_HEADER_LEN);
        buf.put_slice(b"RIFF");
        buf.put_u32_le(RIFF_OVERHEAD + data_size);
        buf.put_slice(b"WAVE");

        buf.put_slice(b"fmt ");
        buf.put_u32_le(16);
        buf.put_u16_le(FORMAT_PCM);
        buf.put_u16_le(self.channels);
        buf.put_u32_le(self.sample_rate);
        buf.put_u32_le(self.byte_rate());
        buf.put_u16_le(self.block_align());
        buf.put_u16_le(self.bits_per_sample);

        buf.put_slice(b"data");
        buf.put_u32_le(data_size);

        Ok(buf)
    }
}

impl Default for WavSpec {
    fn default() -> Self {
        Self::GEMINI_TTS
    }
}

/// Encode PCM into an in-memory WAV file.
///
/// # Errors
///
/// Returns [`AudioError::TooLarge`] if `pcm` does not fit in a WAV file.
pub fn encode_wav(spec: WavSpec, pcm: &[u8]) -> Result<Vec<u8>> {
    let mut buf = spec.header(pcm.len())?;
    buf.put_slice(pcm);
    Ok(buf.to_vec())
}

/// Write PCM to `path` as a WAV file, replacing any existing file.
///
/// The PCM bytes are copied verbatim after the header. The file handle is
/// closed when this function returns, whether or not the write succeeded.
///
/// # Errors
///
/// Returns [`AudioError::TooLarge`] for oversized payloads (the destination
/// is left untouched), or an I/O error if the file cannot be written.
pub fn write_wav(path: impl AsRef<Path>, spec: WavSpec, pcm: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let header = spec.header(pcm.len())?;

    if pcm.len() % usize::from(spec.block_align().max(1)) != 0 {
        warn!(
            len = pcm.len(),
            block_align = spec.block_align(),
            "PCM payload is not a whole number of frames"
        );
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&header)?;
    writer.write_all(pcm)?;
    writer.flush()?;

    debug!(
        path = %path.display(),
        bytes = WAV_HEADER_LEN + pcm.len(),
        "wrote WAV file"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::Error;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    fn u16_at(buf: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([buf[at], buf[at + 1]])
    }

    fn u32_at(buf: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
    }

    mod wav_spec {
        use super::*;

        #[test]
        fn gemini_tts_layout() {
            let spec = WavSpec::GEMINI_TTS;
            assert_eq!(spec.channels, 1);
            assert_eq!(spec.sample_width(), 2);
            assert_eq!(spec.sample_rate, 24_000);
            assert_eq!(spec.block_align(), 2);
            assert_eq!(spec.byte_rate(), 48_000);
            assert_eq!(WavSpec::default(), spec);
        }

        #[test]
        fn header_fields() {
            let header = WavSpec::GEMINI_TTS.header(1000).unwrap();
            assert_eq!(header.len(), WAV_HEADER_LEN);
            assert_eq!(&header[0..4], b"RIFF");
            assert_eq!(u32_at(&header, 4), 1036);
            assert_eq!(&header[8..12], b"WAVE");
            assert_eq!(&header[12..16], b"fmt ");
            assert_eq!(u32_at(&header, 16), 16);
            assert_eq!(u16_at(&header, 20), 1);
            assert_eq!(u16_at(&header, 22), 1);
            assert_eq!(u32_at(&header, 24), 24_000);
            assert_eq!(u32_at(&header, 28), 48_000);
            assert_eq!(u16_at(&header, 32), 2);
            assert_eq!(u16_at(&header, 34), 16);
            assert_eq!(&header[36..40], b"data");
            assert_eq!(u32_at(&header, 40), 1000);
        }

        #[test]
        fn stereo_block_align() {
            let spec = WavSpec {
                channels: 2,
                sample_rate: 48_000,
                bits_per_sample: 16,
            };
            assert_eq!(spec.block_align(), 4);
            assert_eq!(spec.byte_rate(), 192_000);
        }

        #[cfg(target_pointer_width = "64")]
        #[test]
        fn rejects_oversized_payload() {
            let len = u32::MAX as usize;
            let err = WavSpec::GEMINI_TTS.header(len).unwrap_err();
            assert!(matches!(err, Error::Audio(AudioError::TooLarge { .. })));
        }
    }

    mod encode {
        use super::*;

        #[test]
        fn size_is_header_plus_payload() {
            for len in [0_usize, 2, 4800, 48_001] {
                let pcm = vec![0x7f_u8; len];
                let wav = encode_wav(WavSpec::GEMINI_TTS, &pcm).unwrap();
                assert_eq!(wav.len(), WAV_HEADER_LEN + len);
                assert_eq!(&wav[WAV_HEADER_LEN..], pcm.as_slice());
            }
        }
    }

    mod write {
        use super::*;

        #[test]
        fn writes_header_and_pcm() {
            let temp = TempDir::new().unwrap();
            let out = temp.child(OUTPUT_FILE);
            let pcm: Vec<u8> = (0..=255).collect();

            write_wav(out.path(), WavSpec::GEMINI_TTS, &pcm).unwrap();

            let written = std::fs::read(out.path()).unwrap();
            assert_eq!(written.len(), WAV_HEADER_LEN + pcm.len());
            assert_eq!(u16_at(&written, 22), 1);
            assert_eq!(u16_at(&written, 34) / 8, 2);
            assert_eq!(u32_at(&written, 24), 24_000);
            assert_eq!(&written[WAV_HEADER_LEN..], pcm.as_slice());
        }

        #[test]
        fn rewrite_replaces_previous_file() {
            let temp = TempDir::new().unwrap();
            let out = temp.child(OUTPUT_FILE);

            write_wav(out.path(), WavSpec::GEMINI_TTS, &[1; 4000]).unwrap();
            write_wav(out.path(), WavSpec::GEMINI_TTS, &[2; 10]).unwrap();

            let written = std::fs::read(out.path()).unwrap();
            assert_eq!(written.len(), WAV_HEADER_LEN + 10);
            assert_eq!(u32_at(&written, 40), 10);
            assert!(written[WAV_HEADER_LEN..].iter().all(|b| *b == 2));
        }

        #[test]
        fn missing_directory_is_io_error() {
            let temp = TempDir::new().unwrap();
            let out = temp.child("missing").child(OUTPUT_FILE);

            let err = write_wav(out.path(), WavSpec::GEMINI_TTS, &[0; 2]).unwrap_err();
            assert!(matches!(err, Error::Io(_)));
            assert!(!out.path().exists());
        }
    }
}
