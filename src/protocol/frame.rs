// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Fixed binary frame header used by every protocol message.
//!
//! Layout (bit widths in parentheses):
//!
//! ```text
//! byte 0: protocol_version (4) | header_size (4, in 4-byte words)
//! byte 1: message_type (4)     | message_type_specific_flags (4)
//! byte 2: serialization (4)    | compression (4)
//! byte 3: reserved (8)
//! bytes 4..header_size*4: extension (always empty in this protocol)
//! ```
//!
//! The header is followed by a 4-byte big-endian payload length and the
//! payload itself; [`frame_message`] assembles the complete message.

use crate::error::AsrError;

/// Fixed protocol version emitted in every frame.
pub const PROTOCOL_VERSION: u8 = 0b0001;

/// No message-type-specific flags.
pub const FLAG_NONE: u8 = 0b0000;

/// Marks the final audio segment of a session (audio-only requests).
pub const FLAG_LAST_AUDIO: u8 = 0b0010;

/// Message type nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// Client control request opening a session.
    FullClientRequest,
    /// One audio segment.
    AudioOnlyRequest,
    /// Server response carrying a (possibly final) recognition payload.
    FullServerResponse,
    /// Server acknowledgement of an audio segment.
    ServerAck,
    /// Server error with a status code.
    ServerErrorResponse,
    /// Anything else; tolerated on decode, never emitted.
    Unknown(u8),
}

impl MessageType {
    /// The 4-bit wire value.
    pub fn bits(self) -> u8 {
        match self {
            MessageType::FullClientRequest => 0b0001,
            MessageType::AudioOnlyRequest => 0b0010,
            MessageType::FullServerResponse => 0b1001,
            MessageType::ServerAck => 0b1011,
            MessageType::ServerErrorResponse => 0b1111,
            MessageType::Unknown(bits) => bits & 0x0f,
        }
    }

    /// Decode a 4-bit wire value.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x0f {
            0b0001 => MessageType::FullClientRequest,
            0b0010 => MessageType::AudioOnlyRequest,
            0b1001 => MessageType::FullServerResponse,
            0b1011 => MessageType::ServerAck,
            0b1111 => MessageType::ServerErrorResponse,
            other => MessageType::Unknown(other),
        }
    }
}

/// Payload serialization method nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Serialization {
    /// Raw bytes.
    None,
    /// JSON text.
    Json,
    /// Any other method; its payload is treated as UTF-8 text on decode.
    Other(u8),
}

impl Serialization {
    pub fn bits(self) -> u8 {
        match self {
            Serialization::None => 0b0000,
            Serialization::Json => 0b0001,
            Serialization::Other(bits) => bits & 0x0f,
        }
    }

    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x0f {
            0b0000 => Serialization::None,
            0b0001 => Serialization::Json,
            other => Serialization::Other(other),
        }
    }
}

/// Payload compression nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    /// Any other scheme; decode leaves such payloads untouched.
    Other(u8),
}

impl Compression {
    pub fn bits(self) -> u8 {
        match self {
            Compression::None => 0b0000,
            Compression::Gzip => 0b0001,
            Compression::Other(bits) => bits & 0x0f,
        }
    }

    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x0f {
            0b0000 => Compression::None,
            0b0001 => Compression::Gzip,
            other => Compression::Other(other),
        }
    }
}

/// Decoded frame header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub protocol_version: u8,
    /// Number of 4-byte header words including the base word; always 1 on
    /// the encode path (no extensions are emitted).
    pub header_size: u8,
    pub message_type: MessageType,
    pub flags: u8,
    pub serialization: Serialization,
    pub compression: Compression,
    pub reserved: u8,
    /// `(header_size - 1) * 4` bytes; empty in this protocol.
    pub extension: Vec<u8>,
}

impl FrameHeader {
    /// A header with the fixed protocol version, no extension, and
    /// reserved byte zero.
    pub fn new(
        message_type: MessageType,
        flags: u8,
        serialization: Serialization,
        compression: Compression,
    ) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            header_size: 1,
            message_type,
            flags,
            serialization,
            compression,
            reserved: 0x00,
            extension: Vec::new(),
        }
    }

    /// Pack the header into bytes. The header size is derived from the
    /// extension length; the caller appends the 4-byte big-endian payload
    /// length and the payload.
    pub fn encode(&self) -> Vec<u8> {
        let header_size = (self.extension.len() / 4) as u8 + 1;
        let mut out = Vec::with_capacity(4 + self.extension.len());
        out.push((self.protocol_version << 4) | (header_size & 0x0f));
        out.push((self.message_type.bits() << 4) | (self.flags & 0x0f));
        out.push((self.serialization.bits() << 4) | self.compression.bits());
        out.push(self.reserved);
        out.extend_from_slice(&self.extension);
        out
    }

    /// Unpack a header from the start of `buf`, returning it together
    /// with the remaining bytes (the length-prefixed payload).
    ///
    /// Fails with [`AsrError::MalformedFrame`] when `buf` is shorter than
    /// the base header or than the size the header declares.
    pub fn decode(buf: &[u8]) -> Result<(FrameHeader, &[u8]), AsrError> {
        if buf.len() < 4 {
            return Err(AsrError::MalformedFrame(format!(
                "frame of {} bytes is shorter than the 4-byte base header",
                buf.len()
            )));
        }
        let header_size = buf[0] & 0x0f;
        // A declared size of 0 words cannot be smaller than the base word
        // already read; tolerate it as size 1 rather than rejecting.
        let total = (header_size as usize).max(1) * 4;
        if buf.len() < total {
            return Err(AsrError::MalformedFrame(format!(
                "header declares {} bytes but frame holds {}",
                total,
                buf.len()
            )));
        }
        let header = FrameHeader {
            protocol_version: buf[0] >> 4,
            header_size,
            message_type: MessageType::from_bits(buf[1] >> 4),
            flags: buf[1] & 0x0f,
            serialization: Serialization::from_bits(buf[2] >> 4),
            compression: Compression::from_bits(buf[2] & 0x0f),
            reserved: buf[3],
            extension: buf[4..total].to_vec(),
        };
        Ok((header, &buf[total..]))
    }
}

/// Assemble one complete wire message: header, 4-byte big-endian payload
/// length, payload.
pub fn frame_message(
    message_type: MessageType,
    flags: u8,
    serialization: Serialization,
    compression: Compression,
    payload: &[u8],
) -> Vec<u8> {
    let header = FrameHeader::new(message_type, flags, serialization, compression);
    let mut out = Vec::with_capacity(4 + 4 + payload.len());
    out.extend_from_slice(&header.encode());
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}
