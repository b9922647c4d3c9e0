//! Reading commit information from a local git repository

mod repository;

pub use repository::{BranchInfo, CommitScope, Repository, validate_commit_hash};
