#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` provides the ordered path-rule list that session setup feeds and
//! the transfer engine later consults. Rules are exclusions: a matching path
//! is withheld from the transfer (and, for perishable rules, may additionally
//! be forgotten when a directory is being removed). Patterns honour anchored
//! matches (leading `/`), directory-only rules, and recursive wildcards using
//! glob semantics.
//!
//! # Design
//!
//! - [`FilterRule`] captures the user-supplied pattern together with the
//!   matching flags (directory-only, no-prefix-expansion, perishable). The
//!   rule itself is lightweight; compilation happens on registration.
//! - [`FilterList`] owns the compiled representation of each rule in priority
//!   order. Registration is an insertion sort keyed on priority; rules sharing
//!   a priority keep their registration order.
//! - Matching operates on relative [`std::path::Path`] values using
//!   first-match-wins evaluation.
//!
//! # Errors
//!
//! [`FilterList::register`] reports [`FilterError`] when a pattern expands to
//! an invalid glob expression. The error includes the offending pattern and
//! the underlying [`globset::Error`].
//!
//! # Examples
//!
//! Register a perishable directory rule and match against it:
//!
//! ```
//! use filters::{FilterList, FilterRule};
//! use std::path::Path;
//!
//! let mut list = FilterList::default();
//! let rule = FilterRule::exclude(".partial")
//!     .with_directory_only(true)
//!     .with_perishable(true);
//! list.register(rule, 0).unwrap();
//!
//! assert!(list.matches(Path::new("work/.partial"), true));
//! assert!(!list.matches(Path::new("work/.partial"), false));
//! ```

mod error;
mod list;
mod rule;

pub use error::FilterError;
pub use list::FilterList;
pub use rule::FilterRule;
