#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! Session protocol negotiation for the sync workspace.
//!
//! Before any file data moves, the two peers of a session must agree on one
//! mutually-supported protocol version and gate every optional feature
//! against it. This crate owns that negotiation: sub-protocol reconciliation
//! for pre-release builds, the wire version exchange, uniform feature
//! gating, metadata slot layout, partial-directory rule registration, and
//! the shared integrity seed. Everything runs once per session over an
//! abstract [`VersionChannel`]; a failure aborts the session.
//!
//! # Examples
//!
//! Negotiate a client session against a recorded peer announcement:
//!
//! ```
//! use protocol::{
//!     FeatureRequests, HandshakeConfig, IntChannel, NegotiationContext, setup_session,
//! };
//! use filters::FilterList;
//! use std::io::Cursor;
//!
//! // The peer announced protocol 30 and then sent the session seed.
//! let mut peer_bytes = Vec::new();
//! peer_bytes.extend_from_slice(&30i32.to_le_bytes());
//! peer_bytes.extend_from_slice(&0x1234i32.to_le_bytes());
//!
//! let mut ctx = NegotiationContext::new(
//!     HandshakeConfig::client(),
//!     FeatureRequests { recurse: true, ..FeatureRequests::default() },
//! );
//! let mut channel = IntChannel::new(Cursor::new(peer_bytes), Vec::new());
//! let mut rules = FilterList::new();
//!
//! setup_session(&mut ctx, &mut channel, &mut rules).expect("negotiation succeeds");
//! assert_eq!(ctx.working_version(), 30);
//! assert_eq!(ctx.session_seed(), Some(0x1234));
//! ```

mod channel;
mod context;
mod error;
mod exchange;
mod gates;
mod partial;
mod seed;
mod slots;
mod subprotocol;
mod version;

pub use channel::{IntChannel, VersionChannel};
pub use context::{
    DeleteTiming, FeatureRequests, HandshakeConfig, NegotiationContext, ResolvedPolicy,
    SessionRole,
};
pub use error::HandshakeError;
pub use exchange::{exchange_versions, setup_session};
pub use gates::validate_features;
pub use partial::register_partial_dir;
pub use seed::exchange_seed;
pub use slots::SlotTable;
pub use version::ProtocolVersion;
