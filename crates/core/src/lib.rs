#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! Shared utilities for the sync workspace.
//!
//! The crate currently hosts the process exit-code taxonomy used by every
//! fatal error surfaced during a session. Higher layers convert their error
//! types into an [`ExitCode`] and terminate with it; the library crates never
//! exit the process themselves.

pub mod exit_code;

pub use exit_code::ExitCode;
