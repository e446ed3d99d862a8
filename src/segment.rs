// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Audio buffer segmentation.
//!
//! Splits a complete audio byte buffer into the ordered chunks sent as
//! audio-only requests, the last of which carries the last-segment flag.
//!
//! Boundary behavior: when the buffer length is an exact multiple of the
//! chunk size, the final full chunk is the one marked last (the strict `<`
//! loop condition sends the boundary chunk down the tail branch whole). A
//! zero-length last chunk only ever occurs for an empty input buffer.

use crate::audio::WavInfo;

/// Lazy iterator over `(chunk, is_last)` slices of an audio buffer.
///
/// Exactly one yielded chunk has `is_last == true`, and it is the final
/// one; the concatenation of all chunks equals the input byte-for-byte.
pub struct Segmenter<'a> {
    data: &'a [u8],
    chunk_size: usize,
    offset: usize,
    finished: bool,
}

/// Segment `data` into chunks of at most `chunk_size` bytes.
pub fn segment(data: &[u8], chunk_size: usize) -> Segmenter<'_> {
    Segmenter {
        data,
        // A zero chunk size would never advance; the tail branch still
        // terminates with one whole-buffer chunk.
        chunk_size: chunk_size.max(1),
        offset: 0,
        finished: false,
    }
}

impl<'a> Iterator for Segmenter<'a> {
    type Item = (&'a [u8], bool);

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.offset + self.chunk_size < self.data.len() {
            let chunk = &self.data[self.offset..self.offset + self.chunk_size];
            self.offset += self.chunk_size;
            Some((chunk, false))
        } else {
            self.finished = true;
            Some((&self.data[self.offset..], true))
        }
    }
}

/// Bytes per segment for WAV input: the byte rate of the stream times the
/// configured segment duration.
pub fn wav_chunk_size(info: &WavInfo, segment_duration_ms: u32) -> usize {
    let bytes_per_sec =
        u64::from(info.channels) * u64::from(info.sample_width_bytes()) * u64::from(info.sample_rate);
    (bytes_per_sec * u64::from(segment_duration_ms) / 1000) as usize
}
