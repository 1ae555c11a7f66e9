//! Partial-directory rule registration.
//!
//! When a relative partial-file staging directory is configured, the side
//! that evaluates filter rules locally registers an exclusion for it so the
//! staging area is never swept up by the transfer. An absolute staging path
//! lives outside the transfer tree and needs no rule; a server talking to a
//! genuinely remote peer receives the rule from the client instead. Neither
//! case is an error.

use filters::{FilterList, FilterRule};

use crate::context::NegotiationContext;
use crate::error::HandshakeError;

/// Registers the partial-directory rule into `rules` when the session
/// qualifies; silently does nothing otherwise.
///
/// The rule is directory-scoped and taken literally (no pattern-prefix
/// expansion). It is marked perishable when this side is not the sender, or
/// when the negotiated version is at least 30.
pub fn register_partial_dir(
    ctx: &NegotiationContext,
    rules: &mut FilterList,
) -> Result<(), HandshakeError> {
    let Some(dir) = ctx.requests().partial_dir.as_deref() else {
        return Ok(());
    };
    if dir.is_empty() || dir.starts_with('/') {
        return Ok(());
    }
    if ctx.role().is_server() && !ctx.local_session {
        return Ok(());
    }

    let perishable = !ctx.am_sender() || ctx.working_version() >= 30;
    let rule = FilterRule::exclude(dir)
        .with_directory_only(true)
        .with_no_prefix_expansion(true)
        .with_perishable(perishable);
    rules.register(rule, 0)?;
    Ok(())
}
