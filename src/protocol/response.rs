// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Typed decoding of server frames.
//!
//! A received frame is decoded into a [`ParsedResponse`]: the message
//! type, an optional acknowledged sequence number, an optional error code
//! and the decompressed, deserialized payload. Message types this client
//! does not know are tolerated and decode to an empty result — callers
//! treat that as "no usable payload", not as an error.

use serde::Deserialize;

use crate::error::AsrError;
use crate::protocol::frame::{Compression, FrameHeader, MessageType, Serialization};
use crate::utils::helpers::gzip_decompress;

/// Decoded payload body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON-serialized body.
    Json(serde_json::Value),
    /// A non-empty, non-JSON serialization method; treated as UTF-8 text.
    Text(String),
    /// No serialization method; raw bytes.
    Raw(Vec<u8>),
}

/// One decoded server frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub message_type: MessageType,
    /// Acknowledged sequence number (acks only).
    pub sequence: Option<i32>,
    /// Error code from the frame's binary prefix (error responses only).
    pub error_code: Option<u32>,
    /// Decoded message body, when the frame carries one.
    pub payload: Option<Payload>,
    /// Declared body length. Signed for full responses, unsigned for acks
    /// and errors; wide enough to hold both encodings.
    pub payload_size: i64,
}

/// The recognition body carried by full server responses.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionBody {
    #[serde(default)]
    pub code: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reqid: Option<String>,
    #[serde(default)]
    pub sequence: Option<i64>,
    /// Recognition candidates, best first.
    #[serde(default)]
    pub result: Vec<RecognitionCandidate>,
}

/// One recognition candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionCandidate {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub language: Option<String>,
    /// Per-utterance details when `show_utterances` was requested.
    #[serde(default)]
    pub utterances: Option<serde_json::Value>,
}

impl ParsedResponse {
    /// Decode one raw wire frame.
    pub fn parse(raw: &[u8]) -> Result<Self, AsrError> {
        let (header, payload) = FrameHeader::decode(raw)?;

        let mut response = ParsedResponse {
            message_type: header.message_type,
            sequence: None,
            error_code: None,
            payload: None,
            payload_size: 0,
        };

        let body: Option<&[u8]> = match header.message_type {
            MessageType::FullServerResponse => {
                let size = read_i32(payload, "full response size")?;
                response.payload_size = size as i64;
                Some(&payload[4..])
            }
            MessageType::ServerAck => {
                let seq = read_i32(payload, "ack sequence")?;
                response.sequence = Some(seq);
                if payload.len() >= 8 {
                    response.payload_size = read_u32(&payload[4..], "ack size")? as i64;
                    Some(&payload[8..])
                } else {
                    None
                }
            }
            MessageType::ServerErrorResponse => {
                let code = read_u32(payload, "error code")?;
                response.error_code = Some(code);
                response.payload_size = read_u32(&payload[4..], "error size")? as i64;
                Some(&payload[8..])
            }
            // Client-side and unknown types carry no decodable payload.
            _ => None,
        };

        if let Some(body) = body {
            response.payload = Some(decode_body(
                body,
                header.compression,
                header.serialization,
            )?);
        }

        Ok(response)
    }

    /// The status code the session compares against the configured
    /// success code: the JSON payload's `code` field when present, else
    /// the binary error-response code.
    pub fn status_code(&self) -> Option<u32> {
        if let Some(Payload::Json(value)) = &self.payload {
            if let Some(code) = value.get("code").and_then(|c| c.as_u64()) {
                return Some(code as u32);
            }
        }
        self.error_code
    }

    /// Backend-provided message text, when the payload carries one.
    pub fn message(&self) -> Option<String> {
        match &self.payload {
            Some(Payload::Json(value)) => value
                .get("message")
                .and_then(|m| m.as_str())
                .map(|m| m.to_string()),
            Some(Payload::Text(text)) => Some(text.clone()),
            _ => None,
        }
    }

    /// Deserialize the JSON payload into the typed recognition body.
    pub fn recognition_body(&self) -> Option<RecognitionBody> {
        match &self.payload {
            Some(Payload::Json(value)) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }
}

fn read_i32(buf: &[u8], what: &str) -> Result<i32, AsrError> {
    if buf.len() < 4 {
        return Err(AsrError::MalformedFrame(format!(
            "payload too short for {}: {} bytes",
            what,
            buf.len()
        )));
    }
    Ok(i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]))
}

fn read_u32(buf: &[u8], what: &str) -> Result<u32, AsrError> {
    if buf.len() < 4 {
        return Err(AsrError::MalformedFrame(format!(
            "payload too short for {}: {} bytes",
            what,
            buf.len()
        )));
    }
    Ok(u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]))
}

/// Decompress and deserialize a message body per the header nibbles.
fn decode_body(
    body: &[u8],
    compression: Compression,
    serialization: Serialization,
) -> Result<Payload, AsrError> {
    let bytes = match compression {
        Compression::Gzip => gzip_decompress(body)
            .map_err(|e| AsrError::Decode(format!("gzip decompression failed: {}", e)))?,
        _ => body.to_vec(),
    };

    match serialization {
        Serialization::Json => {
            let value: serde_json::Value = serde_json::from_slice(&bytes)?;
            Ok(Payload::Json(value))
        }
        Serialization::None => Ok(Payload::Raw(bytes)),
        Serialization::Other(_) => {
            let text = String::from_utf8(bytes)
                .map_err(|e| AsrError::Decode(format!("payload is not UTF-8: {}", e)))?;
            Ok(Payload::Text(text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::frame::FLAG_NONE;
    use crate::utils::helpers::gzip_compress;

    fn full_response_frame(json: &str) -> Vec<u8> {
        let body = gzip_compress(json.as_bytes());
        let mut frame = FrameHeader::new(
            MessageType::FullServerResponse,
            FLAG_NONE,
            Serialization::Json,
            Compression::Gzip,
        )
        .encode();
        frame.extend_from_slice(&(body.len() as i32).to_be_bytes());
        frame.extend_from_slice(&body);
        frame
    }

    #[test]
    fn test_parse_full_response_gzip_json() {
        let frame = full_response_frame(r#"{"result":[{"text":"hello"}]}"#);
        let response = ParsedResponse::parse(&frame).expect("parse should succeed");

        assert_eq!(response.message_type, MessageType::FullServerResponse);
        assert_eq!(response.error_code, None);
        assert_eq!(response.sequence, None);
        match &response.payload {
            Some(Payload::Json(value)) => {
                assert_eq!(value["result"][0]["text"], "hello");
            }
            other => panic!("expected JSON payload, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_full_response_typed_body() {
        let frame =
            full_response_frame(r#"{"code":1000,"message":"Success","result":[{"text":"hi"}]}"#);
        let response = ParsedResponse::parse(&frame).expect("parse should succeed");
        let body = response.recognition_body().expect("typed body");
        assert_eq!(body.code, Some(1000));
        assert_eq!(body.message.as_deref(), Some("Success"));
        assert_eq!(body.result.len(), 1);
        assert_eq!(body.result[0].text.as_deref(), Some("hi"));
        assert_eq!(response.status_code(), Some(1000));
    }

    #[test]
    fn test_parse_error_response() {
        let message = gzip_compress(br#"{"error":"invalid audio"}"#);
        let mut payload = Vec::new();
        payload.extend_from_slice(&45000000u32.to_be_bytes());
        payload.extend_from_slice(&(message.len() as u32).to_be_bytes());
        payload.extend_from_slice(&message);

        let header = FrameHeader::new(
            MessageType::ServerErrorResponse,
            FLAG_NONE,
            Serialization::Json,
            Compression::Gzip,
        );
        let mut frame = header.encode();
        frame.extend_from_slice(&payload);

        let response = ParsedResponse::parse(&frame).expect("parse should succeed");
        assert_eq!(response.error_code, Some(45000000));
        assert_eq!(response.status_code(), Some(45000000));
        assert_eq!(response.payload_size, message.len() as i64);
    }

    #[test]
    fn test_error_code_prefers_json_code_field() {
        let message = gzip_compress(br#"{"code":45000001,"message":"boom"}"#);
        let mut frame = FrameHeader::new(
            MessageType::ServerErrorResponse,
            FLAG_NONE,
            Serialization::Json,
            Compression::Gzip,
        )
        .encode();
        frame.extend_from_slice(&45000000u32.to_be_bytes());
        frame.extend_from_slice(&(message.len() as u32).to_be_bytes());
        frame.extend_from_slice(&message);

        let response = ParsedResponse::parse(&frame).expect("parse should succeed");
        assert_eq!(response.error_code, Some(45000000));
        assert_eq!(response.status_code(), Some(45000001));
        assert_eq!(response.message().as_deref(), Some("boom"));
    }

    #[test]
    fn test_parse_ack_with_sequence_only() {
        let mut frame = FrameHeader::new(
            MessageType::ServerAck,
            FLAG_NONE,
            Serialization::Json,
            Compression::Gzip,
        )
        .encode();
        frame.extend_from_slice(&2i32.to_be_bytes());

        let response = ParsedResponse::parse(&frame).expect("parse should succeed");
        assert_eq!(response.message_type, MessageType::ServerAck);
        assert_eq!(response.sequence, Some(2));
        assert!(response.payload.is_none());
        assert_eq!(response.status_code(), None);
    }

    #[test]
    fn test_parse_ack_with_message() {
        let message = gzip_compress(br#"{"code":1000}"#);
        let mut frame = FrameHeader::new(
            MessageType::ServerAck,
            FLAG_NONE,
            Serialization::Json,
            Compression::Gzip,
        )
        .encode();
        frame.extend_from_slice(&(-1i32).to_be_bytes());
        frame.extend_from_slice(&(message.len() as u32).to_be_bytes());
        frame.extend_from_slice(&message);

        let response = ParsedResponse::parse(&frame).expect("parse should succeed");
        assert_eq!(response.sequence, Some(-1));
        assert_eq!(response.status_code(), Some(1000));
    }

    #[test]
    fn test_parse_unknown_type_empty_result() {
        // Message type 0b0101 is not part of the protocol.
        let frame = [0x11, 0x50, 0x11, 0x00, 0x00, 0x00, 0x00, 0x07];
        let response = ParsedResponse::parse(&frame).expect("parse should succeed");
        assert_eq!(response.message_type, MessageType::Unknown(0b0101));
        assert!(response.payload.is_none());
        assert_eq!(response.sequence, None);
        assert_eq!(response.error_code, None);
        assert_eq!(response.payload_size, 0);
    }

    #[test]
    fn test_parse_uncompressed_text_payload() {
        // Serialization method 0b0010 (non-JSON, non-empty) decodes as text.
        let mut frame = FrameHeader::new(
            MessageType::FullServerResponse,
            FLAG_NONE,
            Serialization::Other(0b0010),
            Compression::None,
        )
        .encode();
        frame.extend_from_slice(&5i32.to_be_bytes());
        frame.extend_from_slice(b"plain");

        let response = ParsedResponse::parse(&frame).expect("parse should succeed");
        assert_eq!(
            response.payload,
            Some(Payload::Text("plain".to_string()))
        );
    }

    #[test]
    fn test_parse_raw_payload() {
        let mut frame = FrameHeader::new(
            MessageType::FullServerResponse,
            FLAG_NONE,
            Serialization::None,
            Compression::None,
        )
        .encode();
        frame.extend_from_slice(&3i32.to_be_bytes());
        frame.extend_from_slice(&[1, 2, 3]);

        let response = ParsedResponse::parse(&frame).expect("parse should succeed");
        assert_eq!(response.payload, Some(Payload::Raw(vec![1, 2, 3])));
    }

    #[test]
    fn test_truncated_full_response_is_malformed() {
        let mut frame = FrameHeader::new(
            MessageType::FullServerResponse,
            FLAG_NONE,
            Serialization::Json,
            Compression::None,
        )
        .encode();
        frame.extend_from_slice(&[0x00, 0x01]); // only 2 of the 4 size bytes

        let err = ParsedResponse::parse(&frame).unwrap_err();
        assert!(matches!(err, AsrError::MalformedFrame(_)));
    }

    #[test]
    fn test_corrupt_gzip_is_decode_error() {
        let mut frame = FrameHeader::new(
            MessageType::FullServerResponse,
            FLAG_NONE,
            Serialization::Json,
            Compression::Gzip,
        )
        .encode();
        frame.extend_from_slice(&4i32.to_be_bytes());
        frame.extend_from_slice(b"junk");

        let err = ParsedResponse::parse(&frame).unwrap_err();
        assert!(matches!(err, AsrError::Decode(_)));
    }
}
