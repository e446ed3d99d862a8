// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Error taxonomy for the recognition client.
//!
//! Every error aborts the current session outright; nothing is retried.
//! The service layer surfaces exactly one of these to the caller.

/// Errors produced by the recognition protocol client.
#[derive(Debug, thiserror::Error)]
pub enum AsrError {
    /// Input rejected before any network access (missing file, unsupported
    /// extension, unparseable audio container).
    #[error("validation error: {0}")]
    Validation(String),

    /// A received frame's header or payload is shorter than it declares.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// Connect, send or receive failure at the socket layer, including
    /// receive timeouts. Aborts the session immediately, no retry.
    #[error("transport error: {0}")]
    Transport(String),

    /// Decompression or deserialization failure on an otherwise
    /// well-formed frame.
    #[error("decode error: {0}")]
    Decode(String),

    /// The backend returned an error code, or returned success without a
    /// usable result payload.
    #[error("recognition failed{}: {message}", fmt_code(.code))]
    Service {
        /// Backend status code, when one was reported.
        code: Option<u32>,
        /// Backend-provided message, or a generic description.
        message: String,
    },
}

fn fmt_code(code: &Option<u32>) -> String {
    match code {
        Some(c) => format!(" (code {})", c),
        None => String::new(),
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for AsrError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        AsrError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for AsrError {
    fn from(err: serde_json::Error) -> Self {
        AsrError::Decode(format!("JSON parsing error: {}", err))
    }
}
