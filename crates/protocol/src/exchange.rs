//! # Overview
//!
//! The version exchange is the first wire traffic of a session: each side
//! announces the newest protocol it speaks, and both clamp to the lower of
//! the two announcements. The server first runs sub-protocol reconciliation
//! so a pre-release build never advertises a version it cannot honour, and
//! every result is bounds-checked before any feature decision trusts it.
//!
//! [`setup_session`] strings the whole negotiation together: reconciliation
//! and version exchange, feature gating, slot allocation, partial-directory
//! registration, and finally the seed exchange. Negotiation is strictly
//! sequential; the only suspension points are the two blocking round-trips.

use filters::FilterList;

use crate::channel::VersionChannel;
use crate::context::NegotiationContext;
use crate::error::HandshakeError;
use crate::gates::validate_features;
use crate::partial::register_partial_dir;
use crate::seed::exchange_seed;
use crate::slots::SlotTable;
use crate::subprotocol;
use crate::version::ProtocolVersion;

/// Performs the version round-trip and clamps the working version.
///
/// The round-trip is skipped entirely when the remote version is already
/// known from a recorded session header; a replayed session also suppresses
/// the outbound write, since the recorded value is authoritative. The bounds
/// checks below run in every mode.
///
/// # Errors
///
/// - [`HandshakeError::Channel`] for I/O failures on the channel.
/// - [`HandshakeError::RecordedVersionTooNew`] when a replayed session
///   recorded a version newer than this side supports.
/// - [`HandshakeError::VersionOutOfRange`] when the peer's advertisement
///   falls outside the supported wire range.
/// - [`HandshakeError::VersionFloor`] / [`HandshakeError::VersionCeiling`]
///   when the clamped working version violates our own bounds.
pub fn exchange_versions<C: VersionChannel>(
    ctx: &mut NegotiationContext,
    channel: &mut C,
) -> Result<(), HandshakeError> {
    let remote = if let Some(remote) = ctx.remote_version() {
        remote
    } else {
        if ctx.role().is_server() && !ctx.local_session {
            subprotocol::reconcile(ctx);
        }
        if !ctx.replay {
            channel.write_int(ctx.working_version().as_i32())?;
        }
        let remote = ProtocolVersion::new(channel.read_int()?);
        ctx.set_remote_version(remote);
        if remote < ctx.working_version() {
            ctx.lower_working_version(remote);
        }
        remote
    };

    if ctx.replay && remote > ctx.working_version() {
        return Err(HandshakeError::RecordedVersionTooNew {
            recorded: remote.as_i32(),
            supported: ctx.working_version().as_i32(),
        });
    }

    tracing::debug!(
        role = ctx.role().label(),
        %remote,
        negotiated = %ctx.working_version(),
        "protocol versions resolved"
    );

    if !remote.is_in_supported_range() {
        return Err(HandshakeError::version_out_of_range(remote));
    }
    if remote < ProtocolVersion::OLD_ADVISORY {
        tracing::warn!(
            "the {} is a very old version, upgrade recommended",
            ctx.role().peer_label()
        );
    }

    if ctx.working_version() < ProtocolVersion::MIN_SUPPORTED {
        return Err(HandshakeError::VersionFloor {
            min: ProtocolVersion::MIN_SUPPORTED.as_i32(),
            role: ctx.role().label(),
        });
    }
    if ctx.working_version() > ProtocolVersion::CURRENT {
        return Err(HandshakeError::VersionCeiling {
            max: ProtocolVersion::CURRENT.as_i32(),
            role: ctx.role().label(),
        });
    }

    Ok(())
}

/// Runs the complete session negotiation over `channel`.
///
/// On success the context holds the final working version, the resolved
/// policies, the slot layout, and the shared session seed; `rules` has
/// gained the partial-directory rule when one applies. On failure the
/// session must be abandoned; no partial negotiated state is meaningful.
pub fn setup_session<C: VersionChannel>(
    ctx: &mut NegotiationContext,
    channel: &mut C,
    rules: &mut FilterList,
) -> Result<(), HandshakeError> {
    exchange_versions(ctx, channel)?;
    validate_features(ctx)?;

    ctx.install_slots(SlotTable::allocate(ctx.am_sender(), ctx.requests()));
    register_partial_dir(ctx, rules)?;

    exchange_seed(ctx, channel)
}
