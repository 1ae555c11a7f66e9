//! Per-entry metadata slot layout.
//!
//! Every file-list entry carries an extensible array of extra attributes.
//! The slot indices into that array are allocated once per session in a
//! fixed order so the layout stays stable between readers: owner id, group
//! id, ACLs, extended attributes. A feature that was not requested takes no
//! slot and does not shift the indices of the features that were. The order
//! is a hard compatibility invariant and is written out explicitly rather
//! than derived from any set iteration.

use crate::context::FeatureRequests;

/// Slots reserved for the sending role ahead of any feature slot: room for a
/// wide back-reference into the file list.
const SENDER_BASELINE: u32 = 2;

/// Slots reserved for the receiving role: a single counter.
const RECEIVER_BASELINE: u32 = 1;

/// Read-only mapping from enabled feature to metadata slot index.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SlotTable {
    uid: Option<u32>,
    gid: Option<u32>,
    acls: Option<u32>,
    xattrs: Option<u32>,
    total: u32,
}

impl SlotTable {
    /// Allocates the slot layout for one session.
    ///
    /// Indices start above a role-dependent baseline and are assigned in the
    /// fixed feature order. ACL preservation earns a slot on the receiving
    /// side only; the sender carries ACLs out of band.
    #[must_use]
    pub fn allocate(am_sender: bool, requests: &FeatureRequests) -> Self {
        let mut next = if am_sender {
            SENDER_BASELINE
        } else {
            RECEIVER_BASELINE
        };
        let mut claim = |wanted: bool| {
            if wanted {
                next += 1;
                Some(next)
            } else {
                None
            }
        };

        let uid = claim(requests.preserve_uid);
        let gid = claim(requests.preserve_gid);
        let acls = claim(requests.preserve_acls && !am_sender);
        let xattrs = claim(requests.preserve_xattrs);

        Self {
            uid,
            gid,
            acls,
            xattrs,
            total: next,
        }
    }

    /// Slot index for owner ids, when requested.
    #[must_use]
    pub const fn uid(&self) -> Option<u32> {
        self.uid
    }

    /// Slot index for group ids, when requested.
    #[must_use]
    pub const fn gid(&self) -> Option<u32> {
        self.gid
    }

    /// Slot index for ACLs, when requested on the receiving side.
    #[must_use]
    pub const fn acls(&self) -> Option<u32> {
        self.acls
    }

    /// Slot index for extended attributes, when requested.
    #[must_use]
    pub const fn xattrs(&self) -> Option<u32> {
        self.xattrs
    }

    /// Total number of slots each file-list entry must reserve.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Returns the allocated `(feature, index)` pairs in layout order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, u32)> {
        [
            ("uid", self.uid),
            ("gid", self.gid),
            ("acls", self.acls),
            ("xattrs", self.xattrs),
        ]
        .into_iter()
        .filter_map(|(name, slot)| slot.map(|index| (name, index)))
    }
}
