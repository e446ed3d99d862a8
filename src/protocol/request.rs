// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Control request sent once at the start of every recognition session.
//!
//! The payload is a nested JSON object (`app` / `user` / `request` /
//! `audio`) describing the recognition job. It is serialized, gzip
//! compressed and framed as a full client request before any audio is
//! sent.

use serde::Serialize;
use uuid::Uuid;

use crate::config::{AudioFormat, SessionConfig};

/// Project identity block.
#[derive(Debug, Serialize)]
pub struct AppSection {
    pub appid: String,
    pub cluster: String,
    pub token: String,
}

/// Requesting-user block.
#[derive(Debug, Serialize)]
pub struct UserSection {
    pub uid: String,
}

/// Recognition job parameters.
#[derive(Debug, Serialize)]
pub struct RequestSection {
    /// Fresh random identifier; the backend does not support reuse across
    /// sessions.
    pub reqid: String,
    pub nbest: u32,
    pub workflow: String,
    pub show_language: bool,
    pub show_utterances: bool,
    pub result_type: String,
    /// Always 1: the control request is the first message of the session.
    pub sequence: u32,
}

/// Audio parameters block.
#[derive(Debug, Serialize)]
pub struct AudioSection {
    pub format: String,
    pub rate: u32,
    pub language: String,
    pub bits: u32,
    pub channel: u32,
    pub codec: String,
}

/// The complete control payload.
#[derive(Debug, Serialize)]
pub struct ControlRequest {
    pub app: AppSection,
    pub user: UserSection,
    pub request: RequestSection,
    pub audio: AudioSection,
}

impl ControlRequest {
    /// Build a control request from the session configuration with a
    /// freshly generated request identifier.
    pub fn build(config: &SessionConfig, format: AudioFormat) -> Self {
        Self {
            app: AppSection {
                appid: config.appid.clone(),
                cluster: config.cluster.clone(),
                token: config.token.clone(),
            },
            user: UserSection {
                uid: config.uid.clone(),
            },
            request: RequestSection {
                reqid: Uuid::new_v4().to_string(),
                nbest: config.nbest,
                workflow: config.workflow.clone(),
                show_language: config.show_language,
                show_utterances: config.show_utterances,
                result_type: config.result_type.clone(),
                sequence: 1,
            },
            audio: AudioSection {
                format: format.as_str().to_string(),
                rate: config.sample_rate,
                language: config.language.clone(),
                bits: config.bits,
                channel: config.channels,
                codec: config.codec.clone(),
            },
        }
    }

    /// Serialize to the JSON bytes that get gzip-compressed and framed.
    pub fn to_json_bytes(&self) -> Vec<u8> {
        // Serialize of a plain struct tree cannot fail.
        serde_json::to_vec(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SessionConfig {
        SessionConfig::new("test-appid", "test-token")
    }

    #[test]
    fn test_payload_shape() {
        let request = ControlRequest::build(&test_config(), AudioFormat::Wav);
        let value: serde_json::Value =
            serde_json::from_slice(&request.to_json_bytes()).expect("valid JSON");

        assert_eq!(value["app"]["appid"], "test-appid");
        assert_eq!(value["app"]["cluster"], "volcengine_input_common");
        assert_eq!(value["app"]["token"], "test-token");
        assert_eq!(value["user"]["uid"], "streaming_asr_demo");
        assert_eq!(value["request"]["nbest"], 1);
        assert_eq!(value["request"]["result_type"], "full");
        assert_eq!(value["request"]["sequence"], 1);
        assert_eq!(value["request"]["show_language"], false);
        assert_eq!(value["request"]["show_utterances"], false);
        assert_eq!(
            value["request"]["workflow"],
            "audio_in,resample,partition,vad,fe,decode,itn,nlu_punctuate"
        );
        assert_eq!(value["audio"]["format"], "wav");
        assert_eq!(value["audio"]["rate"], 16000);
        assert_eq!(value["audio"]["language"], "zh-CN");
        assert_eq!(value["audio"]["bits"], 16);
        assert_eq!(value["audio"]["channel"], 1);
        assert_eq!(value["audio"]["codec"], "raw");
    }

    #[test]
    fn test_mp3_format_field() {
        let request = ControlRequest::build(&test_config(), AudioFormat::Mp3);
        assert_eq!(request.audio.format, "mp3");
    }

    #[test]
    fn test_reqid_fresh_per_build() {
        let config = test_config();
        let a = ControlRequest::build(&config, AudioFormat::Wav);
        let b = ControlRequest::build(&config, AudioFormat::Wav);
        assert_ne!(a.request.reqid, b.request.reqid);
        // UUIDv4 text form.
        assert_eq!(a.request.reqid.len(), 36);
    }
}
