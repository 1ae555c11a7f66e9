//! Mutable state threaded through the negotiation steps.
//!
//! Everything the negotiation steps read or write lives in one
//! exclusively-owned [`NegotiationContext`] value that each step mutates in
//! turn, which keeps the single-session, single-thread discipline visible in
//! the types rather than in process-wide globals.

use crate::slots::SlotTable;
use crate::version::ProtocolVersion;

/// Which end of the session this process plays.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionRole {
    /// The invoking side of the connection.
    Client,
    /// The side launched to serve the other end.
    Server,
}

impl SessionRole {
    /// Reports whether this side acts as the server.
    #[must_use]
    pub const fn is_server(self) -> bool {
        matches!(self, Self::Server)
    }

    /// Lowercase label used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }

    /// Label of the opposite side, used when reporting on the peer.
    #[must_use]
    pub const fn peer_label(self) -> &'static str {
        match self {
            Self::Client => "server",
            Self::Server => "client",
        }
    }
}

/// When deletions run relative to the transfer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeleteTiming {
    /// Delete extraneous destination files before the transfer.
    Before,
    /// Delete incrementally while the transfer runs.
    During,
    /// Delete after the transfer completes.
    After,
}

/// Optional features requested by configuration.
///
/// These are opaque flags as far as negotiation is concerned: each one is
/// either gated against the negotiated version, consulted when resolving
/// default policies, or granted a metadata slot. The feature implementations
/// themselves live elsewhere.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FeatureRequests {
    /// Recursive traversal of the source tree.
    pub recurse: bool,
    /// Configuration permits the incremental-traversal optimization.
    pub allow_incremental: bool,
    /// Preserve owner ids.
    pub preserve_uid: bool,
    /// Preserve group ids.
    pub preserve_gid: bool,
    /// Preserve POSIX ACLs.
    pub preserve_acls: bool,
    /// Preserve extended attributes.
    pub preserve_xattrs: bool,
    /// Preserve hard links.
    pub preserve_hard_links: bool,
    /// Fuzzy basis-file matching.
    pub fuzzy_basis: bool,
    /// Number of basis-comparison directories configured.
    pub basis_dir_count: usize,
    /// Update destination files in place.
    pub inplace: bool,
    /// Prune empty directories from the transfer.
    pub prune_empty_dirs: bool,
    /// Delay updates until the end of the transfer.
    pub delay_updates: bool,
    /// Use relative path names.
    pub relative_paths: bool,
    /// Send implied directories along with relative paths.
    pub implied_dirs: bool,
    /// A custom traversal ordering override is in effect.
    pub custom_sort_order: bool,
    /// Deletion of extraneous destination files was requested.
    pub delete: bool,
    /// Explicitly chosen deletion timing, if any.
    pub delete_timing: Option<DeleteTiming>,
    /// `--max-delete`-style threshold; `Some(0)` means "delete nothing".
    pub max_delete: Option<u64>,
    /// Staging directory for partially transferred files.
    pub partial_dir: Option<String>,
}

/// Policies resolved from the negotiated version and the feature requests.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ResolvedPolicy {
    /// Final deletion timing, defaulted when deletion was requested without
    /// an explicit phase.
    pub delete_timing: Option<DeleteTiming>,
    /// The session may traverse the source incrementally.
    pub incremental_recursion: bool,
    /// The generator must be able to send messages to the sender.
    pub need_messages_from_generator: bool,
}

/// Static inputs to the handshake, fixed before negotiation starts.
#[derive(Clone, Debug)]
pub struct HandshakeConfig {
    /// Which end of the session this process plays.
    pub role: SessionRole,
    /// Both endpoints live in the same local process pair.
    pub local_session: bool,
    /// This side sends file data.
    pub am_sender: bool,
    /// The session replays a recorded exchange; nothing is written.
    pub replay: bool,
    /// Peer-supplied "MAJOR.SUB" pre-release hint, if any.
    pub peer_hint: Option<String>,
    /// Our own sub-protocol revision (nonzero only for pre-release builds).
    pub sub_protocol: i32,
    /// Pre-configured integrity seed; `None` generates one on the server.
    pub preset_seed: Option<i32>,
    /// Remote version already known from a recorded session header.
    pub recorded_remote_version: Option<i32>,
}

impl HandshakeConfig {
    /// Returns a config for a live client session with release defaults.
    #[must_use]
    pub fn client() -> Self {
        Self::for_role(SessionRole::Client)
    }

    /// Returns a config for a live server session with release defaults.
    #[must_use]
    pub fn server() -> Self {
        Self::for_role(SessionRole::Server)
    }

    fn for_role(role: SessionRole) -> Self {
        Self {
            role,
            local_session: false,
            am_sender: false,
            replay: false,
            peer_hint: None,
            sub_protocol: ProtocolVersion::SUB_PROTOCOL,
            preset_seed: None,
            recorded_remote_version: None,
        }
    }
}

/// Mutable negotiation state owned by one session's control flow.
///
/// `working_version` starts at [`ProtocolVersion::CURRENT`] and only ever
/// decreases; `remote_version` and `session_seed` are each set exactly once.
#[derive(Debug)]
pub struct NegotiationContext {
    pub(crate) role: SessionRole,
    pub(crate) local_session: bool,
    pub(crate) am_sender: bool,
    pub(crate) replay: bool,
    pub(crate) peer_hint: Option<String>,
    pub(crate) sub_protocol: i32,
    pub(crate) preset_seed: Option<i32>,
    pub(crate) requests: FeatureRequests,
    working_version: ProtocolVersion,
    remote_version: Option<ProtocolVersion>,
    policy: ResolvedPolicy,
    slots: Option<SlotTable>,
    session_seed: Option<i32>,
}

impl NegotiationContext {
    /// Creates the context for one session from its fixed inputs.
    #[must_use]
    pub fn new(config: HandshakeConfig, requests: FeatureRequests) -> Self {
        Self {
            role: config.role,
            local_session: config.local_session,
            am_sender: config.am_sender,
            replay: config.replay,
            peer_hint: config.peer_hint,
            sub_protocol: config.sub_protocol,
            preset_seed: config.preset_seed,
            requests,
            working_version: ProtocolVersion::CURRENT,
            remote_version: config.recorded_remote_version.map(ProtocolVersion::new),
            policy: ResolvedPolicy::default(),
            slots: None,
            session_seed: None,
        }
    }

    /// Which end of the session this process plays.
    #[must_use]
    pub const fn role(&self) -> SessionRole {
        self.role
    }

    /// Reports whether this side sends file data.
    #[must_use]
    pub const fn am_sender(&self) -> bool {
        self.am_sender
    }

    /// The feature requests this session was configured with.
    #[must_use]
    pub const fn requests(&self) -> &FeatureRequests {
        &self.requests
    }

    /// The current working protocol version.
    #[must_use]
    pub const fn working_version(&self) -> ProtocolVersion {
        self.working_version
    }

    /// The peer's advertised version, once known.
    #[must_use]
    pub const fn remote_version(&self) -> Option<ProtocolVersion> {
        self.remote_version
    }

    /// The policies resolved by feature validation.
    #[must_use]
    pub const fn policy(&self) -> &ResolvedPolicy {
        &self.policy
    }

    /// The allocated metadata slot layout, once assigned.
    #[must_use]
    pub const fn slots(&self) -> Option<&SlotTable> {
        self.slots.as_ref()
    }

    /// The shared integrity seed, once established.
    #[must_use]
    pub const fn session_seed(&self) -> Option<i32> {
        self.session_seed
    }

    /// Lowers the working version to `version`.
    ///
    /// The working version is monotonically non-increasing; raising it is a
    /// programming error.
    pub(crate) fn lower_working_version(&mut self, version: ProtocolVersion) {
        debug_assert!(
            version <= self.working_version,
            "working version may only decrease"
        );
        self.working_version = version;
    }

    /// Records the remote version read from the wire. Single assignment.
    pub(crate) fn set_remote_version(&mut self, version: ProtocolVersion) {
        debug_assert!(self.remote_version.is_none(), "remote version already set");
        self.remote_version = Some(version);
    }

    pub(crate) fn set_policy(&mut self, policy: ResolvedPolicy) {
        self.policy = policy;
    }

    /// Installs the allocated slot table. Re-invocation is a programming
    /// error, not a recoverable condition.
    pub(crate) fn install_slots(&mut self, slots: SlotTable) {
        debug_assert!(self.slots.is_none(), "slot table already allocated");
        self.slots = Some(slots);
    }

    /// Records the session seed. Single assignment.
    pub(crate) fn set_session_seed(&mut self, seed: i32) {
        debug_assert!(self.session_seed.is_none(), "session seed already set");
        self.session_seed = Some(seed);
    }
}
