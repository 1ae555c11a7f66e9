//! Negotiation error taxonomy.
//!
//! Note: this module uses manual `Error` and `Display` implementations rather
//! than thiserror because the workspace's `core` crate shadows Rust's
//! primitive `core`, which conflicts with thiserror's macro expansion.

use std::error::Error;
use std::fmt;
use std::io;

use sync_core::exit_code::ExitCode;

use crate::version::ProtocolVersion;

/// Errors that can occur while negotiating a session.
///
/// Every variant is fatal at this layer: negotiation runs exactly once per
/// session and a failure aborts the session rather than renegotiating. The
/// embedding process maps the error onto a process status through
/// [`HandshakeError::exit_code`].
#[derive(Debug)]
pub enum HandshakeError {
    /// I/O failure on the version channel.
    Channel(io::Error),

    /// The peer advertised a version outside the supported wire range.
    ///
    /// Raised before the clamped working version is trusted for any feature
    /// decision. The classic cause is a remote shell polluting the stream.
    VersionOutOfRange {
        /// Version read from the wire.
        version: i32,
        /// Lowest version this implementation accepts.
        min: i32,
        /// Highest advertisement tolerated before suspecting line noise.
        max: i32,
    },

    /// The negotiated version fell below the supported floor.
    VersionFloor {
        /// Lowest version this implementation accepts.
        min: i32,
        /// Which side's requested floor was violated.
        role: &'static str,
    },

    /// The negotiated version ended up above our own maximum.
    VersionCeiling {
        /// Newest version this implementation speaks.
        max: i32,
        /// Which side's ceiling was violated.
        role: &'static str,
    },

    /// A replayed session recorded a version newer than we support.
    RecordedVersionTooNew {
        /// Version stored in the recorded session.
        recorded: i32,
        /// Newest version the live side supports.
        supported: i32,
    },

    /// A requested feature is incompatible with the negotiated version.
    FeatureVersion {
        /// Name of the offending feature request.
        feature: &'static str,
        /// Minimum protocol version the feature needs.
        required: i32,
        /// Version the session actually negotiated.
        negotiated: i32,
    },

    /// The partial-directory path could not be compiled into a rule.
    PartialDirRule(filters::FilterError),
}

impl HandshakeError {
    /// Returns the process exit code this failure maps onto.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Channel(_) => ExitCode::SocketIo,
            Self::PartialDirRule(_) => ExitCode::Syntax,
            _ => ExitCode::Protocol,
        }
    }

    /// Returns the offending feature name for feature-gate failures.
    #[must_use]
    pub const fn feature(&self) -> Option<&'static str> {
        match self {
            Self::FeatureVersion { feature, .. } => Some(feature),
            _ => None,
        }
    }

    pub(crate) fn version_out_of_range(version: ProtocolVersion) -> Self {
        Self::VersionOutOfRange {
            version: version.as_i32(),
            min: ProtocolVersion::MIN_SUPPORTED.as_i32(),
            max: ProtocolVersion::MAX_ACCEPTED.as_i32(),
        }
    }
}

impl fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(source) => {
                write!(f, "channel I/O failed during negotiation: {source}")
            }
            Self::VersionOutOfRange { version, min, max } => write!(
                f,
                "protocol version mismatch: peer sent version {version}, \
                 supported range is {min}-{max} (is the remote shell clean?)"
            ),
            Self::VersionFloor { min, role } => {
                write!(f, "the protocol version must be at least {min} on the {role}")
            }
            Self::VersionCeiling { max, role } => {
                write!(f, "the protocol version must be no more than {max} on the {role}")
            }
            Self::RecordedVersionTooNew {
                recorded,
                supported,
            } => write!(
                f,
                "the recorded session uses protocol version {recorded}, \
                 newer than supported {supported}"
            ),
            Self::FeatureVersion {
                feature,
                required,
                negotiated,
            } => write!(
                f,
                "{feature} requires protocol {required} or higher (negotiated {negotiated})"
            ),
            Self::PartialDirRule(source) => source.fmt(f),
        }
    }
}

impl Error for HandshakeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Channel(source) => Some(source),
            Self::PartialDirRule(source) => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for HandshakeError {
    fn from(source: io::Error) -> Self {
        Self::Channel(source)
    }
}

impl From<filters::FilterError> for HandshakeError {
    fn from(source: filters::FilterError) -> Self {
        Self::PartialDirRule(source)
    }
}
