// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Session configuration for the recognition protocol client.
//!
//! [`SessionConfig`] is an immutable value combining endpoint, identity,
//! auth method and audio parameters. It is built once, validated at
//! construction, and shared read-only across sessions; concurrent
//! recognitions each own their socket and per-session state.

use std::time::Duration;

/// Default WebSocket endpoint of the recognition backend.
pub const DEFAULT_WS_URL: &str = "wss://openspeech.bytedance.com/api/v2/asr";

/// Default cluster the control request is routed to.
pub const DEFAULT_CLUSTER: &str = "volcengine_input_common";

/// Default recognition pipeline-stage list.
pub const DEFAULT_WORKFLOW: &str =
    "audio_in,resample,partition,vad,fe,decode,itn,nlu_punctuate";

/// How connection establishment is authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// A single bearer-style authorization header carrying the token.
    Token,
    /// HMAC-SHA256 signature headers computed over the framed control
    /// request; `secret` is the shared signing key.
    Signature { secret: String },
}

/// Audio container formats accepted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    /// Derive the format from a file extension (case-insensitive).
    ///
    /// Returns `None` for anything other than `wav` and `mp3`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Some(AudioFormat::Wav),
            "mp3" => Some(AudioFormat::Mp3),
            _ => None,
        }
    }

    /// The format name used in the control request's `audio.format` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
        }
    }
}

/// Immutable configuration for recognition sessions.
///
/// Construct with [`SessionConfig::new`] and adjust defaults through the
/// `with_*` builder methods.
///
/// # Example
///
/// ```rust,no_run
/// use volcasr::config::SessionConfig;
///
/// let config = SessionConfig::new("my-appid", "my-token")
///     .with_language("en-US")
///     .with_sample_rate(8000);
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket endpoint URL.
    pub ws_url: String,
    /// Project application id.
    pub appid: String,
    /// Project access token.
    pub token: String,
    /// Backend cluster to request.
    pub cluster: String,
    /// Connection-establishment auth scheme.
    pub auth: AuthMethod,
    /// Status code the backend reports on success.
    pub success_code: u32,
    /// Duration of one audio segment in milliseconds (WAV input).
    pub segment_duration_ms: u32,
    /// Fixed segment size in bytes for MP3 input, where the byte rate is
    /// not deducible from header fields.
    pub mp3_segment_size: usize,
    /// Number of recognition candidates requested.
    pub nbest: u32,
    /// User identifier reported in the control request.
    pub uid: String,
    /// Recognition pipeline-stage list.
    pub workflow: String,
    /// Whether the backend should report the detected language.
    pub show_language: bool,
    /// Whether the backend should report per-utterance details.
    pub show_utterances: bool,
    /// Result granularity (`"full"` or `"single"`).
    pub result_type: String,
    /// Audio sample rate in Hz.
    pub sample_rate: u32,
    /// Audio language tag.
    pub language: String,
    /// Audio bit depth.
    pub bits: u32,
    /// Audio channel count.
    pub channels: u32,
    /// Audio codec (`"raw"` for PCM).
    pub codec: String,
    /// Time allowed for the WebSocket handshake.
    pub connect_timeout: Duration,
    /// Time allowed for each receive; expiry is a transport error.
    pub receive_timeout: Duration,
}

impl SessionConfig {
    /// Create a configuration with the given identity and documented
    /// defaults for everything else.
    pub fn new(appid: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            ws_url: DEFAULT_WS_URL.to_string(),
            appid: appid.into(),
            token: token.into(),
            cluster: DEFAULT_CLUSTER.to_string(),
            auth: AuthMethod::Token,
            success_code: 1000,
            segment_duration_ms: 15000,
            mp3_segment_size: 10000,
            nbest: 1,
            uid: "streaming_asr_demo".to_string(),
            workflow: DEFAULT_WORKFLOW.to_string(),
            show_language: false,
            show_utterances: false,
            result_type: "full".to_string(),
            sample_rate: 16000,
            language: "zh-CN".to_string(),
            bits: 16,
            channels: 1,
            codec: "raw".to_string(),
            connect_timeout: Duration::from_secs(10),
            receive_timeout: Duration::from_secs(30),
        }
    }

    /// Builder method: set the WebSocket endpoint URL.
    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = url.into();
        self
    }

    /// Builder method: set the backend cluster.
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self
    }

    /// Builder method: set the auth scheme.
    pub fn with_auth(mut self, auth: AuthMethod) -> Self {
        self.auth = auth;
        self
    }

    /// Builder method: set the backend success code.
    pub fn with_success_code(mut self, code: u32) -> Self {
        self.success_code = code;
        self
    }

    /// Builder method: set the segment duration for WAV input.
    pub fn with_segment_duration_ms(mut self, ms: u32) -> Self {
        self.segment_duration_ms = ms;
        self
    }

    /// Builder method: set the fixed MP3 segment size in bytes.
    pub fn with_mp3_segment_size(mut self, bytes: usize) -> Self {
        self.mp3_segment_size = bytes;
        self
    }

    /// Builder method: set the number of recognition candidates.
    pub fn with_nbest(mut self, nbest: u32) -> Self {
        self.nbest = nbest;
        self
    }

    /// Builder method: set the reported user identifier.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    /// Builder method: set the recognition workflow string.
    pub fn with_workflow(mut self, workflow: impl Into<String>) -> Self {
        self.workflow = workflow.into();
        self
    }

    /// Builder method: request detected-language reporting.
    pub fn with_show_language(mut self, enabled: bool) -> Self {
        self.show_language = enabled;
        self
    }

    /// Builder method: request per-utterance reporting.
    pub fn with_show_utterances(mut self, enabled: bool) -> Self {
        self.show_utterances = enabled;
        self
    }

    /// Builder method: set the result granularity.
    pub fn with_result_type(mut self, result_type: impl Into<String>) -> Self {
        self.result_type = result_type.into();
        self
    }

    /// Builder method: set the audio sample rate.
    pub fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Builder method: set the audio language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Builder method: set the audio bit depth.
    pub fn with_bits(mut self, bits: u32) -> Self {
        self.bits = bits;
        self
    }

    /// Builder method: set the audio channel count.
    pub fn with_channels(mut self, channels: u32) -> Self {
        self.channels = channels;
        self
    }

    /// Builder method: set the audio codec.
    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = codec.into();
        self
    }

    /// Builder method: set the WebSocket handshake timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder method: set the per-receive timeout.
    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::new("appid", "token");
        assert_eq!(config.ws_url, DEFAULT_WS_URL);
        assert_eq!(config.cluster, DEFAULT_CLUSTER);
        assert_eq!(config.auth, AuthMethod::Token);
        assert_eq!(config.success_code, 1000);
        assert_eq!(config.segment_duration_ms, 15000);
        assert_eq!(config.mp3_segment_size, 10000);
        assert_eq!(config.nbest, 1);
        assert_eq!(config.uid, "streaming_asr_demo");
        assert_eq!(config.result_type, "full");
        assert_eq!(config.sample_rate, 16000);
        assert_eq!(config.language, "zh-CN");
        assert_eq!(config.bits, 16);
        assert_eq!(config.channels, 1);
        assert_eq!(config.codec, "raw");
    }

    #[test]
    fn test_builder_chain() {
        let config = SessionConfig::new("a", "t")
            .with_ws_url("ws://127.0.0.1:9000/asr")
            .with_cluster("custom_cluster")
            .with_auth(AuthMethod::Signature {
                secret: "s3cret".to_string(),
            })
            .with_success_code(0)
            .with_nbest(3)
            .with_language("en-US")
            .with_sample_rate(8000)
            .with_channels(2);

        assert_eq!(config.ws_url, "ws://127.0.0.1:9000/asr");
        assert_eq!(config.cluster, "custom_cluster");
        assert!(matches!(config.auth, AuthMethod::Signature { .. }));
        assert_eq!(config.success_code, 0);
        assert_eq!(config.nbest, 3);
        assert_eq!(config.language, "en-US");
        assert_eq!(config.sample_rate, 8000);
        assert_eq!(config.channels, 2);
    }

    #[test]
    fn test_audio_format_from_extension() {
        assert_eq!(AudioFormat::from_extension("wav"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_extension("WAV"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_extension("mp3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_extension("flac"), None);
        assert_eq!(AudioFormat::from_extension(""), None);
    }
}
