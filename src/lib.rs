//! Per-repository switching between multiple Git identities.
//!
//! Profiles (name, email, SSH key, GPG key) live in a JSON file in the home
//! directory. Switching writes a profile into the repository's local git
//! config; the active identity is always read back from the merged
//! global/local config on disk.

pub mod error;
pub mod git;
pub mod gitconfig;
pub mod logger;
pub mod profile;
pub mod storage;
pub mod validation;
