// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Common re-exports for convenient use of the recognition client.
//!
//! ```
//! use volcasr::prelude::*;
//! ```

pub use crate::audio::WavInfo;
pub use crate::auth::auth_headers;
pub use crate::capture::{
    AudioCaptureProvider, CaptureController, CaptureError, CaptureSource, CaptureState,
    CaptureTrigger, CapturedAudio,
};
pub use crate::config::{AudioFormat, AuthMethod, SessionConfig};
pub use crate::error::AsrError;
pub use crate::feedback::{FeedbackError, FeedbackService, OpenAiFeedbackService};
pub use crate::protocol::frame::{Compression, FrameHeader, MessageType, Serialization};
pub use crate::protocol::request::ControlRequest;
pub use crate::protocol::response::{ParsedResponse, Payload, RecognitionBody};
pub use crate::segment::{segment, wav_chunk_size, Segmenter};
pub use crate::service::RecognitionService;
pub use crate::session::{ProtocolSession, SessionState};
