//! Centralized process exit-code definitions.
//!
//! All error types across the workspace map onto these codes so the embedding
//! process reports a consistent, distinguishable status for each failure
//! class. Protocol negotiation failures in particular always surface as
//! [`ExitCode::Protocol`].

use std::fmt;
use std::process::ExitCode as ProcessExitCode;

/// Exit codes returned by session operations.
///
/// Each variant documents when it is used. The numeric values are part of the
/// tool's external contract and must remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful completion.
    Ok = 0,

    /// Syntax or usage error.
    ///
    /// Returned when configuration values are invalid or a feature is
    /// unavailable on this build.
    Syntax = 1,

    /// Protocol incompatibility.
    ///
    /// Returned when the two peers cannot agree on a protocol version, when a
    /// requested feature is unsupported at the negotiated version, or when
    /// the protocol is otherwise violated.
    Protocol = 2,

    /// Requested action not supported by the remote peer.
    Unsupported = 4,

    /// Error in socket I/O.
    ///
    /// Returned for network-level failures, including channel errors during
    /// negotiation.
    SocketIo = 10,

    /// Error in the protocol data stream after negotiation.
    StreamIo = 12,
}

impl ExitCode {
    /// Returns the numeric value of the exit code.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns a short human-readable description of the exit code.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::Syntax => "syntax or usage error",
            Self::Protocol => "protocol incompatibility",
            Self::Unsupported => "requested action not supported",
            Self::SocketIo => "error in socket I/O",
            Self::StreamIo => "error in protocol data stream",
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_i32(), self.description())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl From<ExitCode> for ProcessExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code.as_i32() as u8)
    }
}
