//! check-oldies: report stale annotations, orphan FUTURE tags and
//! unattended Git branches.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod githost;
pub mod notify;
pub mod render;
pub mod scan;
pub mod vcs;
