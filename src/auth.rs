// Copyright (c) 2024-2026, Daily
// SPDX-License-Identifier: BSD-2-Clause

//! Connection-establishment authentication headers.
//!
//! Two schemes, selected by [`AuthMethod`]: a bearer-style token header,
//! or HMAC-SHA256 signature headers. The signature is computed over a
//! synthetic request line, a fixed custom-header line and the
//! *already-framed* full client request bytes — the digest input must
//! match byte-for-byte what goes on the wire, so it can only be computed
//! after the control frame is fully built.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

use crate::config::{AuthMethod, SessionConfig};
use crate::error::AsrError;
use crate::utils::helpers::encode_base64_urlsafe;

type HmacSha256 = Hmac<Sha256>;

/// Name list of the custom headers included in the signature input.
const SIGNED_HEADER_NAMES: &str = "Custom";

/// Fixed value of the `Custom` header.
const CUSTOM_HEADER_VALUE: &str = "auth_custom";

/// Produce the handshake headers for the configured auth scheme.
///
/// `full_client_request` is the complete framed control request
/// (header + length + gzip payload); it participates in the signature
/// input for [`AuthMethod::Signature`] and is ignored for token auth.
pub fn auth_headers(
    config: &SessionConfig,
    full_client_request: &[u8],
) -> Result<Vec<(String, String)>, AsrError> {
    match &config.auth {
        AuthMethod::Token => Ok(vec![(
            "Authorization".to_string(),
            format!("Bearer; {}", config.token),
        )]),
        AuthMethod::Signature { secret } => {
            signature_headers(config, secret, full_client_request)
        }
    }
}

fn signature_headers(
    config: &SessionConfig,
    secret: &str,
    full_client_request: &[u8],
) -> Result<Vec<(String, String)>, AsrError> {
    let url = Url::parse(&config.ws_url)
        .map_err(|e| AsrError::Validation(format!("invalid ws_url: {}", e)))?;

    // Order-sensitive digest input: request line, one line per signed
    // header value, then the raw frame bytes.
    let mut input = format!("GET {} HTTP/1.1\n", url.path()).into_bytes();
    input.extend_from_slice(CUSTOM_HEADER_VALUE.as_bytes());
    input.push(b'\n');
    input.extend_from_slice(full_client_request);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AsrError::Validation(format!("invalid signing secret: {}", e)))?;
    mac.update(&input);
    let digest = encode_base64_urlsafe(&mac.finalize().into_bytes());

    Ok(vec![
        ("Custom".to_string(), CUSTOM_HEADER_VALUE.to_string()),
        (
            "Authorization".to_string(),
            format!(
                "HMAC256; access_token=\"{}\"; mac=\"{}\"; h=\"{}\"",
                config.token, digest, SIGNED_HEADER_NAMES
            ),
        ),
    ])
}
