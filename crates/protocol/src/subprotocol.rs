//! Pre-release sub-protocol reconciliation.
//!
//! A pre-release build advertises the major version it targets together with
//! a sub-protocol revision distinguishing snapshots of that target. The
//! server runs this step before the version exchange so that two different
//! pre-release snapshots of the same major version never interoperate as if
//! they spoke the finished protocol. A local loopback peer skips the step
//! entirely.

use crate::context::NegotiationContext;
use crate::version::ProtocolVersion;

/// Parses a "MAJOR.SUB" hint into its two components.
///
/// Each side is read as a leading run of ASCII digits, mirroring the lenient
/// numeric parsing the hint historically received. A missing dot, an empty or
/// non-numeric leading run, or a zero-valued component all mean "no hint":
/// zero is the marker for a final release, which needs no reconciliation.
pub(crate) fn parse_hint(hint: &str) -> Option<(i32, i32)> {
    let (major, sub) = hint.split_once('.')?;
    let major = leading_int(major)?;
    let sub = leading_int(sub)?;
    Some((major, sub))
}

/// Parses the leading digit run of `text`, rejecting zero and empty runs.
fn leading_int(text: &str) -> Option<i32> {
    let digits: &str = {
        let end = text
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(text.len(), |(index, _)| index);
        &text[..end]
    };
    match digits.parse::<i32>() {
        Ok(value) if value > 0 => Some(value),
        _ => None,
    }
}

/// Reconciles pre-release revisions and demotes the working version when the
/// two builds cannot be trusted to speak the same wire dialect.
///
/// `ctx.sub_protocol` is our own revision constant; it only applies while the
/// working version still sits at the implementation maximum. Demotion by one
/// drops the session to the last finalized protocol.
pub(crate) fn reconcile(ctx: &mut NegotiationContext) {
    let our_sub = if ctx.working_version() < ProtocolVersion::CURRENT {
        0
    } else {
        ctx.sub_protocol
    };

    let Some((peer_major, mut peer_sub)) = ctx.peer_hint.as_deref().and_then(parse_hint) else {
        if our_sub != 0 {
            let demoted = ctx.working_version().demoted();
            ctx.lower_working_version(demoted);
        }
        return;
    };

    let peer_major = ProtocolVersion::new(peer_major);
    if peer_major < ctx.working_version() {
        // A finalized older release is accepted as-is; the exchange step
        // clamps to it. A pre-release of an older major is not trusted.
        if peer_sub != 0 {
            ctx.lower_working_version(peer_major.demoted());
        }
        return;
    }

    if peer_major > ctx.working_version() {
        peer_sub = 0;
    }
    if peer_sub != our_sub {
        let demoted = ctx.working_version().demoted();
        ctx.lower_working_version(demoted);
    }
}
