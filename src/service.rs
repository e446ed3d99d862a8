// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Recognition service facade.
//!
//! Validates the input, derives the segment size from the audio format,
//! runs one [`ProtocolSession`](crate::session::ProtocolSession) to
//! completion and extracts the final transcript (the top candidate's
//! text) or a typed failure.

use std::path::Path;

use tracing::{debug, info};

use crate::audio::WavInfo;
use crate::config::{AudioFormat, SessionConfig};
use crate::error::AsrError;
use crate::protocol::response::ParsedResponse;
use crate::segment::wav_chunk_size;
use crate::session::ProtocolSession;

/// High-level speech recognition client.
///
/// # Example
///
/// ```rust,no_run
/// use volcasr::config::SessionConfig;
/// use volcasr::service::RecognitionService;
///
/// # async fn run() -> Result<(), volcasr::error::AsrError> {
/// let service = RecognitionService::new(SessionConfig::new("appid", "token"));
/// let text = service.recognize_file("command.wav").await?;
/// println!("recognized: {}", text);
/// # Ok(())
/// # }
/// ```
pub struct RecognitionService {
    config: SessionConfig,
}

impl RecognitionService {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Recognize the content of a `.wav` or `.mp3` file.
    ///
    /// Fails with [`AsrError::Validation`] before any network access when
    /// the file is missing or the extension is unsupported.
    pub async fn recognize_file(&self, path: impl AsRef<Path>) -> Result<String, AsrError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AsrError::Validation(format!(
                "audio file not found: {}",
                path.display()
            )));
        }

        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(AudioFormat::from_extension)
            .ok_or_else(|| {
                AsrError::Validation("only .wav and .mp3 formats are supported".to_string())
            })?;

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| AsrError::Validation(format!("failed to read {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), bytes = data.len(), ?format, "read audio file");

        self.recognize_buffer(&data, format).await
    }

    /// Recognize a complete in-memory audio buffer, as handed over by a
    /// capture provider.
    pub async fn recognize_buffer(
        &self,
        data: &[u8],
        format: AudioFormat,
    ) -> Result<String, AsrError> {
        let chunk_size = match format {
            AudioFormat::Wav => {
                let info = WavInfo::parse(data)?;
                wav_chunk_size(&info, self.config.segment_duration_ms)
            }
            // Compressed frame sizes are not deducible from header fields,
            // so MP3 uses a fixed configured size.
            AudioFormat::Mp3 => self.config.mp3_segment_size,
        };
        debug!(chunk_size, "derived segment size");

        let mut session = ProtocolSession::new(&self.config);
        let response = session.run(data, format, chunk_size).await?;
        let text = extract_text(&response)?;
        info!(chars = text.chars().count(), "recognition complete");
        Ok(text)
    }
}

/// Pull the final transcript out of the terminal response, or convert it
/// into the service error it describes.
fn extract_text(response: &ParsedResponse) -> Result<String, AsrError> {
    if let Some(body) = response.recognition_body() {
        if let Some(text) = body.result.first().and_then(|c| c.text.clone()) {
            return Ok(text);
        }
        if let Some(message) = body.message {
            return Err(AsrError::Service {
                code: response.status_code(),
                message,
            });
        }
    }
    Err(AsrError::Service {
        code: response.status_code(),
        message: "recognition failed for unknown reason".to_string(),
    })
}
