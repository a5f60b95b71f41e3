//! Staleness scanners: annotations, future tags and branches.
//!
//! Every scan receives the current instant explicitly and queries the
//! working copy live; nothing is kept between runs.

pub mod annotations;
pub mod branches;
pub mod future_tags;

pub use annotations::{get_annotations, sort_annotations};
pub use branches::{get_branches, sort_branches};
pub use future_tags::{get_known_future_tags, get_orphan_future_tags};
