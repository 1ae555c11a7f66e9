//! Version gating of optional features and policy resolution.
//!
//! # Design
//!
//! Every "feature X needs protocol N" rule lives in one static table of
//! [`FeatureGate`] entries evaluated uniformly against the final negotiated
//! version. Each entry names the feature for its diagnostic, carries its
//! minimum version, and records whether a local loopback session is exempt
//! (the loopback exemption is deliberately narrow: same-process sessions
//! only, not merely "same version on both sides").
//!
//! After gating, the version-dependent default policies are resolved:
//! deletion timing, incremental-traversal eligibility, and whether the
//! generator needs a message path back to the sender.

use crate::context::{DeleteTiming, NegotiationContext, ResolvedPolicy};
use crate::error::HandshakeError;
use crate::version::ProtocolVersion;

/// One version requirement for an optional feature.
struct FeatureGate {
    /// Feature name as reported in diagnostics.
    name: &'static str,
    /// Minimum protocol version the feature needs.
    required: i32,
    /// A local loopback session bypasses this gate.
    loopback_exempt: bool,
    /// Whether the session requested the feature.
    requested: fn(&NegotiationContext) -> bool,
}

/// Version floors for every gated feature, in diagnostic order.
static FEATURE_GATES: &[FeatureGate] = &[
    FeatureGate {
        name: "a max-delete limit of zero",
        required: 30,
        loopback_exempt: false,
        requested: |ctx| ctx.am_sender && ctx.requests.max_delete == Some(0),
    },
    FeatureGate {
        name: "ACL preservation",
        required: 30,
        loopback_exempt: true,
        requested: |ctx| ctx.requests.preserve_acls,
    },
    FeatureGate {
        name: "extended-attribute preservation",
        required: 30,
        loopback_exempt: true,
        requested: |ctx| ctx.requests.preserve_xattrs,
    },
    FeatureGate {
        name: "fuzzy basis matching",
        required: 29,
        loopback_exempt: false,
        requested: |ctx| ctx.requests.fuzzy_basis,
    },
    FeatureGate {
        name: "basis directories with in-place updates",
        required: 29,
        loopback_exempt: false,
        requested: |ctx| ctx.requests.basis_dir_count > 0 && ctx.requests.inplace,
    },
    FeatureGate {
        name: "more than one basis directory",
        required: 29,
        loopback_exempt: false,
        requested: |ctx| ctx.requests.basis_dir_count > 1,
    },
    FeatureGate {
        name: "empty-directory pruning",
        required: 29,
        loopback_exempt: false,
        requested: |ctx| ctx.requests.prune_empty_dirs,
    },
];

/// Validates the feature requests against the negotiated version and
/// resolves the version-dependent policies.
///
/// Must run after the version exchange: the working version has to be final.
///
/// # Errors
///
/// Returns [`HandshakeError::FeatureVersion`] naming the first requested
/// feature whose version floor the session does not meet.
pub fn validate_features(ctx: &mut NegotiationContext) -> Result<(), HandshakeError> {
    let version = ctx.working_version();

    for gate in FEATURE_GATES {
        if version >= gate.required {
            continue;
        }
        if gate.loopback_exempt && ctx.local_session {
            continue;
        }
        if (gate.requested)(ctx) {
            return Err(HandshakeError::FeatureVersion {
                feature: gate.name,
                required: gate.required,
                negotiated: version.as_i32(),
            });
        }
    }

    ctx.set_policy(resolve_policy(ctx, version));
    Ok(())
}

fn resolve_policy(ctx: &NegotiationContext, version: ProtocolVersion) -> ResolvedPolicy {
    let requests = &ctx.requests;
    let mut policy = ResolvedPolicy {
        delete_timing: requests.delete_timing,
        ..ResolvedPolicy::default()
    };

    if requests.delete && requests.delete_timing.is_none() {
        policy.delete_timing = Some(if version < 30 {
            DeleteTiming::Before
        } else {
            DeleteTiming::During
        });
    }

    if version >= 30 {
        policy.need_messages_from_generator = true;
        policy.incremental_recursion = incremental_eligible(ctx, policy.delete_timing);
    }

    policy
}

/// The incremental-traversal conjunction: every listed condition must hold.
fn incremental_eligible(ctx: &NegotiationContext, timing: Option<DeleteTiming>) -> bool {
    let requests = &ctx.requests;
    requests.recurse
        && requests.allow_incremental
        && !requests.preserve_hard_links
        && timing != Some(DeleteTiming::Before)
        && timing != Some(DeleteTiming::After)
        && !requests.delay_updates
        && (!requests.relative_paths || requests.implied_dirs)
        && !requests.custom_sort_order
        && !requests.prune_empty_dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{FeatureRequests, HandshakeConfig, SessionRole};

    fn ctx_at(
        version: i32,
        requests: FeatureRequests,
        mutate: impl FnOnce(&mut HandshakeConfig),
    ) -> NegotiationContext {
        let mut config = HandshakeConfig::client();
        mutate(&mut config);
        let mut ctx = NegotiationContext::new(config, requests);
        ctx.lower_working_version(ProtocolVersion::new(version));
        ctx
    }

    fn validate_at(version: i32, requests: FeatureRequests) -> Result<ResolvedPolicy, HandshakeError> {
        let mut ctx = ctx_at(version, requests, |_| {});
        validate_features(&mut ctx)?;
        Ok(*ctx.policy())
    }

    #[test]
    fn pruning_needs_protocol_29() {
        let requests = FeatureRequests {
            prune_empty_dirs: true,
            ..FeatureRequests::default()
        };

        let err = validate_at(28, requests.clone()).expect_err("28 is too old");
        match err {
            HandshakeError::FeatureVersion {
                feature,
                required,
                negotiated,
            } => {
                assert_eq!(feature, "empty-directory pruning");
                assert_eq!(required, 29);
                assert_eq!(negotiated, 28);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(validate_at(29, requests).is_ok());
    }

    #[test]
    fn max_delete_zero_gate_applies_to_the_sender_only() {
        let requests = FeatureRequests {
            max_delete: Some(0),
            ..FeatureRequests::default()
        };

        let mut sender = ctx_at(29, requests.clone(), |config| config.am_sender = true);
        let err = validate_features(&mut sender).expect_err("sender needs protocol 30");
        assert_eq!(err.feature(), Some("a max-delete limit of zero"));

        let mut receiver = ctx_at(29, requests, |_| {});
        assert!(validate_features(&mut receiver).is_ok());
    }

    #[test]
    fn loopback_sessions_bypass_acl_and_xattr_floors() {
        let requests = FeatureRequests {
            preserve_acls: true,
            preserve_xattrs: true,
            ..FeatureRequests::default()
        };

        let mut remote = ctx_at(29, requests.clone(), |_| {});
        let err = validate_features(&mut remote).expect_err("remote session fails");
        assert_eq!(err.feature(), Some("ACL preservation"));

        let mut loopback = ctx_at(29, requests, |config| config.local_session = true);
        assert!(validate_features(&mut loopback).is_ok());
    }

    #[test]
    fn fuzzy_and_basis_dir_gates_need_protocol_29() {
        let fuzzy = FeatureRequests {
            fuzzy_basis: true,
            ..FeatureRequests::default()
        };
        assert_eq!(
            validate_at(28, fuzzy).expect_err("fuzzy too old").feature(),
            Some("fuzzy basis matching")
        );

        let inplace = FeatureRequests {
            basis_dir_count: 1,
            inplace: true,
            ..FeatureRequests::default()
        };
        assert_eq!(
            validate_at(28, inplace).expect_err("in-place too old").feature(),
            Some("basis directories with in-place updates")
        );

        let multi = FeatureRequests {
            basis_dir_count: 2,
            ..FeatureRequests::default()
        };
        assert_eq!(
            validate_at(28, multi).expect_err("multi too old").feature(),
            Some("more than one basis directory")
        );
    }

    #[test]
    fn delete_timing_defaults_by_version() {
        let requests = FeatureRequests {
            delete: true,
            ..FeatureRequests::default()
        };

        let old = validate_at(28, requests.clone()).expect("valid at 28");
        assert_eq!(old.delete_timing, Some(DeleteTiming::Before));

        let new = validate_at(30, requests).expect("valid at 30");
        assert_eq!(new.delete_timing, Some(DeleteTiming::During));
    }

    #[test]
    fn explicit_delete_timing_is_kept() {
        let requests = FeatureRequests {
            delete: true,
            delete_timing: Some(DeleteTiming::After),
            ..FeatureRequests::default()
        };
        let policy = validate_at(30, requests).expect("valid");
        assert_eq!(policy.delete_timing, Some(DeleteTiming::After));
    }

    fn incremental_requests() -> FeatureRequests {
        FeatureRequests {
            recurse: true,
            allow_incremental: true,
            ..FeatureRequests::default()
        }
    }

    #[test]
    fn incremental_traversal_is_eligible_at_30() {
        let policy = validate_at(30, incremental_requests()).expect("valid");
        assert!(policy.incremental_recursion);
        assert!(policy.need_messages_from_generator);
    }

    #[test]
    fn hard_links_always_disable_incremental_traversal() {
        for version in [30, 31] {
            let requests = FeatureRequests {
                preserve_hard_links: true,
                ..incremental_requests()
            };
            let policy = validate_at(version, requests).expect("valid");
            assert!(!policy.incremental_recursion);
            // The generator message path stays required regardless.
            assert!(policy.need_messages_from_generator);
        }
    }

    #[test]
    fn defaulted_during_deletion_keeps_incremental_traversal() {
        let requests = FeatureRequests {
            delete: true,
            ..incremental_requests()
        };
        let policy = validate_at(30, requests).expect("valid");
        assert_eq!(policy.delete_timing, Some(DeleteTiming::During));
        assert!(policy.incremental_recursion);
    }

    #[test]
    fn phase_deletions_disable_incremental_traversal() {
        for timing in [DeleteTiming::Before, DeleteTiming::After] {
            let requests = FeatureRequests {
                delete: true,
                delete_timing: Some(timing),
                ..incremental_requests()
            };
            let policy = validate_at(30, requests).expect("valid");
            assert!(!policy.incremental_recursion);
        }
    }

    #[test]
    fn relative_paths_need_implied_dirs_for_incremental_traversal() {
        let relative = FeatureRequests {
            relative_paths: true,
            ..incremental_requests()
        };
        let policy = validate_at(30, relative).expect("valid");
        assert!(!policy.incremental_recursion);

        let with_implied = FeatureRequests {
            relative_paths: true,
            implied_dirs: true,
            ..incremental_requests()
        };
        let policy = validate_at(30, with_implied).expect("valid");
        assert!(policy.incremental_recursion);
    }

    #[test]
    fn old_versions_resolve_no_generator_messages() {
        let policy = validate_at(29, incremental_requests()).expect("valid");
        assert!(!policy.incremental_recursion);
        assert!(!policy.need_messages_from_generator);
    }
}
