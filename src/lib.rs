// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Volcasr - streaming speech recognition client for the Volcengine
//! openspeech service.
//!
//! The crate speaks the binary framing protocol layered over a persistent
//! WebSocket: a full client request describing the session, segmented
//! audio-only requests, and typed server responses, with gzip payload
//! compression and token or HMAC-SHA256 signature authentication.
//!
//! [`service::RecognitionService`] is the high-level entry point; the
//! lower layers (framing, request/response codecs, auth, segmentation,
//! the session state machine) are public for callers that need finer
//! control. [`capture`] and [`feedback`] hold the collaborator contracts
//! around the recognition core.

pub mod audio;
pub mod auth;
pub mod capture;
pub mod config;
pub mod error;
pub mod feedback;
pub mod prelude;
pub mod protocol;
pub mod segment;
pub mod service;
pub mod session;
pub mod utils;
