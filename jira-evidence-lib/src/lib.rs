#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for jira-evidence
//!
//! This library consolidates all functionality for the jira-evidence tool, which collects
//! Jira issue keys from git commit messages, looks the issues up in Jira, and writes a JSON
//! evidence file describing their status and status transitions.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`keys`]: Issue key extraction from free text
//! - [`git`]: Reading branch and commit information from a git repository
//! - [`jira`]: Jira REST client and the shapes of its responses
//! - [`evidence`]: Normalized issue records and the evidence file

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub mod evidence;
pub mod git;
pub mod jira;
pub mod keys;

pub use crate::commands::{Host, run};
