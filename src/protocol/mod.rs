// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Binary recognition protocol: frame codec, control request, response
//! parsing.
//!
//! Every message exchanged with the backend is one binary WebSocket
//! message of the form `header (4 bytes + extension) + payload length
//! (4 bytes, big-endian) + payload`. The frame codec lives in [`frame`],
//! the JSON control payload in [`request`], and the typed response
//! decoder in [`response`].

pub mod frame;
pub mod request;
pub mod response;
