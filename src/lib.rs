//! Organisation hierarchy analytics.
//!
//! Builds a reporting tree from flat employee records and checks it for
//! salary policy violations and excessive reporting lines.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
