// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! One protocol session: connect, send the control request, stream the
//! audio segments, interpret the responses.
//!
//! The exchange is strictly alternating — one receive is awaited to
//! completion after every send — because the backend requires the
//! request/response rhythm; no reads or writes ever overlap on a
//! connection. Concurrent recognitions each run their own session on
//! their own socket. There is no retry or reconnect: any transport
//! failure terminates the session, and dropping the session future
//! closes the socket, which unblocks a pending receive.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::auth::auth_headers;
use crate::config::{AudioFormat, SessionConfig};
use crate::error::AsrError;
use crate::protocol::frame::{
    frame_message, Compression, MessageType, Serialization, FLAG_LAST_AUDIO, FLAG_NONE,
};
use crate::protocol::request::ControlRequest;
use crate::protocol::response::ParsedResponse;
use crate::segment::segment;
use crate::utils::helpers::gzip_compress;

type WsConn = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Protocol session states. `Done` and `Failed` are terminal; the socket
/// is closed on every path into either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    AwaitingFullResponse,
    Streaming,
    Done,
    Failed,
}

/// Drives one complete recognition exchange over one dedicated socket.
pub struct ProtocolSession<'a> {
    config: &'a SessionConfig,
    state: SessionState,
}

impl<'a> ProtocolSession<'a> {
    pub fn new(config: &'a SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Connecting,
        }
    }

    /// Current state; terminal once `run` has returned.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the session to a terminal state.
    ///
    /// Returns the terminal response: the final segment's response on
    /// success, or the first response carrying a non-success status code
    /// (in which case the remaining segments are abandoned and the
    /// session is `Failed`). Transport, frame and decode failures are
    /// returned as errors.
    pub async fn run(
        &mut self,
        audio: &[u8],
        format: AudioFormat,
        chunk_size: usize,
    ) -> Result<ParsedResponse, AsrError> {
        // The control frame is built before connecting: signature auth
        // signs the exact frame bytes that go on the wire.
        let control_frame = control_frame(self.config, format);
        let headers = auth_headers(self.config, &control_frame)?;

        let mut ws = match self.connect(headers).await {
            Ok(ws) => ws,
            Err(e) => {
                self.transition(SessionState::Failed);
                return Err(e);
            }
        };

        let result = self.exchange(&mut ws, control_frame, audio, chunk_size).await;

        // Terminal either way; the socket does not outlive the session.
        if ws.close(None).await.is_err() {
            debug!("socket already closed");
        }

        match &result {
            Ok(response) if !self.is_failure(response) => self.transition(SessionState::Done),
            _ => self.transition(SessionState::Failed),
        }
        result
    }

    async fn connect(&mut self, headers: Vec<(String, String)>) -> Result<WsConn, AsrError> {
        debug!(url = %self.config.ws_url, "connecting");

        let mut request = self
            .config
            .ws_url
            .as_str()
            .into_client_request()
            .map_err(|e| AsrError::Validation(format!("invalid ws_url: {}", e)))?;
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AsrError::Validation(format!("invalid auth header name: {}", e)))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| AsrError::Validation(format!("invalid auth header value: {}", e)))?;
            request.headers_mut().insert(name, value);
        }

        let connected = tokio::time::timeout(self.config.connect_timeout, connect_async(request))
            .await
            .map_err(|_| {
                AsrError::Transport(format!(
                    "connect timed out after {:?}",
                    self.config.connect_timeout
                ))
            })?;
        let (ws, _response) = connected?;
        debug!("connection established");
        Ok(ws)
    }

    /// The send/receive body of the session, separated out so `run` can
    /// close the socket on every exit path.
    async fn exchange(
        &mut self,
        ws: &mut WsConn,
        control_frame: Vec<u8>,
        audio: &[u8],
        chunk_size: usize,
    ) -> Result<ParsedResponse, AsrError> {
        self.transition(SessionState::AwaitingFullResponse);
        ws.send(Message::Binary(control_frame)).await?;
        let response = self.receive_response(ws).await?;
        if self.is_failure(&response) {
            warn!(code = ?response.status_code(), "backend rejected control request");
            return Ok(response);
        }

        self.transition(SessionState::Streaming);
        let mut terminal = response;
        for (seq, (chunk, is_last)) in segment(audio, chunk_size).enumerate() {
            let flags = if is_last { FLAG_LAST_AUDIO } else { FLAG_NONE };
            let payload = gzip_compress(chunk);
            let frame = frame_message(
                MessageType::AudioOnlyRequest,
                flags,
                Serialization::Json,
                Compression::Gzip,
                &payload,
            );
            debug!(seq = seq + 1, bytes = chunk.len(), is_last, "sending segment");
            ws.send(Message::Binary(frame)).await?;

            terminal = self.receive_response(ws).await?;
            if self.is_failure(&terminal) {
                warn!(
                    seq = seq + 1,
                    code = ?terminal.status_code(),
                    "backend reported an error; abandoning remaining segments"
                );
                return Ok(terminal);
            }
        }
        Ok(terminal)
    }

    /// Receive the next binary frame and decode it, skipping keepalives.
    async fn receive_response(&self, ws: &mut WsConn) -> Result<ParsedResponse, AsrError> {
        loop {
            let msg = tokio::time::timeout(self.config.receive_timeout, ws.next())
                .await
                .map_err(|_| {
                    AsrError::Transport(format!(
                        "receive timed out after {:?}",
                        self.config.receive_timeout
                    ))
                })?
                .ok_or_else(|| {
                    AsrError::Transport("connection closed before a response arrived".to_string())
                })??;

            match msg {
                Message::Binary(data) => return ParsedResponse::parse(&data),
                Message::Ping(_) | Message::Pong(_) => continue,
                Message::Close(frame) => {
                    return Err(AsrError::Transport(format!(
                        "closed by server: {:?}",
                        frame
                    )));
                }
                other => {
                    return Err(AsrError::Transport(format!(
                        "unexpected non-binary message: {:?}",
                        other
                    )));
                }
            }
        }
    }

    fn is_failure(&self, response: &ParsedResponse) -> bool {
        matches!(response.status_code(), Some(code) if code != self.config.success_code)
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "session state");
        self.state = next;
    }
}

/// Build the framed full client request: JSON control payload, gzip
/// compressed, with the full-client-request header and length prefix.
pub(crate) fn control_frame(config: &SessionConfig, format: AudioFormat) -> Vec<u8> {
    let payload = gzip_compress(&ControlRequest::build(config, format).to_json_bytes());
    frame_message(
        MessageType::FullClientRequest,
        FLAG_NONE,
        Serialization::Json,
        Compression::Gzip,
        &payload,
    )
}
