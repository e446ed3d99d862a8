// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! WAV container introspection.
//!
//! The segmenter needs the channel count, sample width and sample rate to
//! derive the per-segment byte count, and those live in the container's
//! `fmt ` chunk. Only canonical PCM RIFF/WAVE layouts are handled; the
//! whole buffer (header included) is what gets segmented and sent, so no
//! sample data is decoded here.

use crate::error::AsrError;

/// Format parameters read from a WAV container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavInfo {
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_rate: u32,
    /// Length of the `data` chunk in bytes.
    pub data_len: u32,
}

impl WavInfo {
    /// Sample width in whole bytes.
    pub fn sample_width_bytes(&self) -> u32 {
        u32::from(self.bits_per_sample) / 8
    }

    /// Parse the `fmt ` and `data` chunks out of a RIFF/WAVE buffer.
    ///
    /// Fails with [`AsrError::Validation`] on anything that is not a
    /// well-formed WAV container.
    pub fn parse(data: &[u8]) -> Result<WavInfo, AsrError> {
        if data.len() < 12 || &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
            return Err(AsrError::Validation(
                "not a RIFF/WAVE container".to_string(),
            ));
        }

        let mut fmt: Option<(u16, u16, u32)> = None;
        let mut data_len: Option<u32> = None;

        let mut offset = 12;
        while offset + 8 <= data.len() {
            let chunk_id = &data[offset..offset + 4];
            let chunk_size = u32::from_le_bytes([
                data[offset + 4],
                data[offset + 5],
                data[offset + 6],
                data[offset + 7],
            ]) as usize;
            let body_start = offset + 8;

            match chunk_id {
                b"fmt " => {
                    if chunk_size < 16 || body_start + 16 > data.len() {
                        return Err(AsrError::Validation(
                            "truncated fmt chunk".to_string(),
                        ));
                    }
                    let body = &data[body_start..];
                    let channels = u16::from_le_bytes([body[2], body[3]]);
                    let sample_rate =
                        u32::from_le_bytes([body[4], body[5], body[6], body[7]]);
                    let bits_per_sample = u16::from_le_bytes([body[14], body[15]]);
                    fmt = Some((channels, bits_per_sample, sample_rate));
                }
                b"data" => {
                    data_len = Some(chunk_size as u32);
                }
                _ => {}
            }

            // Chunks are word-aligned: odd sizes carry one pad byte.
            offset = body_start + chunk_size + (chunk_size & 1);
        }

        let (channels, bits_per_sample, sample_rate) = fmt.ok_or_else(|| {
            AsrError::Validation("WAV container has no fmt chunk".to_string())
        })?;
        let data_len = data_len.ok_or_else(|| {
            AsrError::Validation("WAV container has no data chunk".to_string())
        })?;

        if channels == 0 || sample_rate == 0 || bits_per_sample < 8 {
            return Err(AsrError::Validation(format!(
                "implausible WAV format: {} channels, {} Hz, {} bits",
                channels, sample_rate, bits_per_sample
            )));
        }

        Ok(WavInfo {
            channels,
            bits_per_sample,
            sample_rate,
            data_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a canonical 44-byte-header PCM WAV container.
    fn make_wav(pcm: &[u8], sample_rate: u32, channels: u16, bits: u16) -> Vec<u8> {
        let byte_rate = sample_rate * u32::from(channels) * u32::from(bits) / 8;
        let block_align = channels * bits / 8;
        let data_size = pcm.len() as u32;

        let mut wav = Vec::with_capacity(44 + pcm.len());
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_size).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&channels.to_le_bytes());
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&byte_rate.to_le_bytes());
        wav.extend_from_slice(&block_align.to_le_bytes());
        wav.extend_from_slice(&bits.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_size.to_le_bytes());
        wav.extend_from_slice(pcm);
        wav
    }

    #[test]
    fn test_parse_mono_16khz() {
        let wav = make_wav(&vec![0u8; 32000], 16000, 1, 16);
        let info = WavInfo::parse(&wav).expect("parse should succeed");
        assert_eq!(info.channels, 1);
        assert_eq!(info.sample_rate, 16000);
        assert_eq!(info.bits_per_sample, 16);
        assert_eq!(info.sample_width_bytes(), 2);
        assert_eq!(info.data_len, 32000);
    }

    #[test]
    fn test_parse_stereo_44k() {
        let wav = make_wav(&[0u8; 1024], 44100, 2, 16);
        let info = WavInfo::parse(&wav).expect("parse should succeed");
        assert_eq!(info.channels, 2);
        assert_eq!(info.sample_rate, 44100);
    }

    #[test]
    fn test_parse_skips_extra_chunks() {
        // LIST chunk between fmt and data, as many encoders emit.
        let mut wav = make_wav(&[0u8; 8], 8000, 1, 16);
        let data_chunk = wav.split_off(36);
        wav.extend_from_slice(b"LIST");
        wav.extend_from_slice(&4u32.to_le_bytes());
        wav.extend_from_slice(b"INFO");
        wav.extend_from_slice(&data_chunk);

        let info = WavInfo::parse(&wav).expect("parse should succeed");
        assert_eq!(info.sample_rate, 8000);
        assert_eq!(info.data_len, 8);
    }

    #[test]
    fn test_not_riff() {
        let err = WavInfo::parse(b"ID3\x03...not a wav").unwrap_err();
        assert!(matches!(err, AsrError::Validation(_)));
    }

    #[test]
    fn test_missing_data_chunk() {
        let wav = make_wav(&[], 16000, 1, 16);
        let err = WavInfo::parse(&wav[..36]).unwrap_err();
        assert!(matches!(err, AsrError::Validation(_)));
    }

    #[test]
    fn test_zero_channels_rejected() {
        let wav = make_wav(&[0u8; 4], 16000, 0, 16);
        let err = WavInfo::parse(&wav).unwrap_err();
        assert!(matches!(err, AsrError::Validation(_)));
    }
}
