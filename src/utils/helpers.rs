// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Shared encoding helpers for the recognition client.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

/// Encode bytes to base64 using the URL-safe alphabet (with padding).
///
/// The signature auth scheme transmits its HMAC digest in this form.
pub fn encode_base64_urlsafe(data: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE.encode(data)
}

/// Decode a base64 string to bytes using the URL-safe alphabet.
///
/// Returns `None` if the input is not valid base64.
pub fn decode_base64_urlsafe(data: &str) -> Option<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE.decode(data).ok()
}

/// Gzip-compress a byte buffer.
///
/// Writing into an in-memory `Vec` cannot fail, so this is infallible.
pub fn gzip_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    if encoder.write_all(data).is_err() {
        return Vec::new();
    }
    encoder.finish().unwrap_or_default()
}

/// Gzip-decompress a byte buffer.
///
/// Returns the inflate error message when the input is not a valid gzip
/// stream.
pub fn gzip_decompress(data: &[u8]) -> Result<Vec<u8>, String> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(|e| e.to_string())?;
    Ok(out)
}
