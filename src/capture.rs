// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Audio capture hand-off.
//!
//! The recognition core consumes finished audio buffers; where they come
//! from is a collaborator concern behind [`AudioCaptureProvider`]. For
//! trigger-driven capture (push-to-talk and the like),
//! [`CaptureController`] provides an explicit `Idle ↔ Recording` state
//! machine fed by an event channel — triggers in the wrong state are
//! ignored rather than guarded by shared mutable flags.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::AudioFormat;

/// Errors from the capture side.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The underlying audio device or backend failed.
    #[error("capture device error: {0}")]
    Device(String),
    /// The consumer of finished buffers went away.
    #[error("capture channel closed")]
    ChannelClosed,
}

/// A complete captured audio buffer plus its format metadata.
#[derive(Debug, Clone)]
pub struct CapturedAudio {
    pub data: Vec<u8>,
    pub format: AudioFormat,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

/// Collaborator contract: something that produces one finished audio
/// buffer per capture, e.g. a microphone recorder flushed on a stop
/// trigger.
#[async_trait]
pub trait AudioCaptureProvider: Send + Sync {
    /// Wait for the next finished buffer.
    async fn finished_buffer(&mut self) -> Result<CapturedAudio, CaptureError>;
}

/// A start/stop-driven capture backend controlled by
/// [`CaptureController`].
#[async_trait]
pub trait CaptureSource: Send {
    /// Begin recording.
    async fn start(&mut self) -> Result<(), CaptureError>;

    /// Stop recording and hand over everything captured since `start`.
    async fn stop(&mut self) -> Result<CapturedAudio, CaptureError>;
}

/// Capture trigger events, typically produced by some input frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTrigger {
    Start,
    Stop,
    Shutdown,
}

/// Controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Recording,
}

/// Explicit state machine between a trigger source and a capture
/// backend: `Start` moves `Idle → Recording`, `Stop` moves `Recording →
/// Idle` and emits the finished buffer, `Shutdown` ends the loop
/// (stopping an in-flight recording first, discarding its buffer).
pub struct CaptureController<S: CaptureSource> {
    source: S,
    state: CaptureState,
}

impl<S: CaptureSource> CaptureController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: CaptureState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Drive the state machine until the trigger channel closes or a
    /// `Shutdown` trigger arrives. Finished buffers are emitted on
    /// `buffers`.
    pub async fn run(
        mut self,
        mut triggers: mpsc::Receiver<CaptureTrigger>,
        buffers: mpsc::Sender<CapturedAudio>,
    ) -> Result<(), CaptureError> {
        while let Some(trigger) = triggers.recv().await {
            match (trigger, self.state) {
                (CaptureTrigger::Start, CaptureState::Idle) => {
                    self.source.start().await?;
                    self.transition(CaptureState::Recording);
                }
                (CaptureTrigger::Start, CaptureState::Recording) => {
                    warn!("start trigger while already recording; ignored");
                }
                (CaptureTrigger::Stop, CaptureState::Recording) => {
                    let captured = self.source.stop().await?;
                    self.transition(CaptureState::Idle);
                    if buffers.send(captured).await.is_err() {
                        return Err(CaptureError::ChannelClosed);
                    }
                }
                (CaptureTrigger::Stop, CaptureState::Idle) => {
                    warn!("stop trigger while idle; ignored");
                }
                (CaptureTrigger::Shutdown, state) => {
                    if state == CaptureState::Recording {
                        // Unfinished recordings are discarded on shutdown.
                        let _ = self.source.stop().await;
                        self.transition(CaptureState::Idle);
                    }
                    debug!("capture controller shut down");
                    return Ok(());
                }
            }
        }
        debug!("trigger channel closed; capture controller stopping");
        Ok(())
    }

    fn transition(&mut self, next: CaptureState) {
        debug!(from = ?self.state, to = ?next, "capture state");
        self.state = next;
    }
}
