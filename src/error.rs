// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `abode_lib` library.
//!
//! Subscription validation failures are surfaced directly to the caller,
//! while routing anomalies on the push path are logged and absorbed by the
//! event controller. Transport and parsing failures from the REST side are
//! wrapped in [`ProtocolError`] and [`ParseError`].

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A subscription referenced a device that is not in the registry.
    #[error("invalid device: {0}")]
    InvalidDevice(String),

    /// A timeline subscription referenced an unknown event code or group.
    #[error("invalid timeline event: {0}")]
    InvalidTimelineEvent(String),

    /// An event-group subscription referenced an unknown group.
    #[error("invalid event group: {0}")]
    InvalidEvent(String),

    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the remote service.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a remote payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors raised when a string does not name a member of a closed set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Not one of `standby`, `home` or `away`.
    #[error("invalid alarm mode: {0}")]
    InvalidMode(String),

    /// Not a known push event channel.
    #[error("invalid event kind: {0}")]
    InvalidEventKind(String),

    /// Not a known timeline group name.
    #[error("invalid timeline group: {0}")]
    InvalidGroup(String),
}

/// Raised when a device type tag matches none of the known device kinds.
///
/// This is a soft error: the device is still constructed with the generic
/// kind, and the error is only logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized device type tag: {0}")]
pub struct UnrecognizedKindError(pub String);

/// Errors related to the REST collaborator.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The session was rejected by the server.
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// Errors related to parsing remote payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),

    /// Unexpected payload shape.
    #[error("unexpected payload format: {0}")]
    UnexpectedFormat(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_device_display() {
        let err = Error::InvalidDevice("ZW:0000000a".to_string());
        assert_eq!(err.to_string(), "invalid device: ZW:0000000a");
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::InvalidMode("lol".to_string()).into();
        assert!(matches!(err, Error::Value(ValueError::InvalidMode(ref m)) if m == "lol"));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("id".to_string());
        assert_eq!(err.to_string(), "missing field in payload: id");
    }

    #[test]
    fn unrecognized_kind_display() {
        let err = UnrecognizedKindError("device_type.toaster".to_string());
        assert_eq!(
            err.to_string(),
            "unrecognized device type tag: device_type.toaster"
        );
    }
}
