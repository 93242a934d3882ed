//! Parsed view of a single git config file.
//!
//! Files are read through `git2::Config` and flattened into a tree keyed by
//! section header (`user`, `remote "origin"`, ...). Section and key names are
//! stored lowercased, as git treats them case-insensitively; subsection names
//! keep their case.

use std::{collections::BTreeMap, path::Path};

use log::debug;

use crate::error::AppError;

/// Remote whose key path is trusted when building the identity environment
pub const ORIGIN: &str = "origin";

/// Extension key holding the SSH key path for a remote
pub const PRIVATE_KEY_PATH_KEY: &str = "gtPrivateKeyPath";

/// Keys of a single section
pub type Section = BTreeMap<String, String>;

/// Key-value tree of a git config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitConfig {
    sections: BTreeMap<String, Section>,
}

impl GitConfig {
    /// Parses the config file at `path`
    ///
    /// Fails with [`AppError::ConfigRead`] if the file does not exist, and
    /// [`AppError::ConfigParse`] if git cannot parse it.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        if !path.is_file() {
            return Err(AppError::ConfigRead(path.to_path_buf()));
        }

        let parse_err = |source: git2::Error| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        };
        let config = git2::Config::open(path).map_err(parse_err)?;
        let entries = config.entries(None).map_err(parse_err)?;

        let mut flat: Vec<(String, String)> = Vec::new();
        entries
            .for_each(|entry| {
                if let Some(name) = entry.name() {
                    // A bare `key` line with no `=` is boolean true.
                    let value = entry.value().unwrap_or("true");
                    flat.push((name.to_string(), value.to_string()));
                }
            })
            .map_err(parse_err)?;

        debug!("read {} entries from {}", flat.len(), path.display());
        Ok(Self::from_entries(flat))
    }

    /// Builds a tree from flat dotted names such as `remote.origin.url`
    ///
    /// Later entries win over earlier ones with the same name.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (name, value) in entries {
            if let Some((header, key)) = split_name(name.as_ref()) {
                config.sections.entry(header).or_default().insert(key, value.into());
            }
        }
        config
    }

    /// Section by header, e.g. `user` or `remote "origin"`
    pub fn section(&self, header: &str) -> Option<&Section> {
        self.sections.get(header)
    }

    /// Value of `key` in the section `header`
    pub fn get(&self, header: &str, key: &str) -> Option<&str> {
        self.section(header)
            .and_then(|section| section.get(&key.to_lowercase()))
            .map(String::as_str)
    }

    /// Names of every `remote "<name>"` section, in sorted order
    pub fn remote_names(&self) -> Vec<String> {
        self.sections
            .keys()
            .filter_map(|header| {
                header
                    .strip_prefix("remote \"")
                    .and_then(|rest| rest.strip_suffix('"'))
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            })
            .collect()
    }

    /// Private key path recorded for every remote that has one
    pub fn remote_key_paths(&self) -> BTreeMap<String, String> {
        self.remote_names()
            .into_iter()
            .filter_map(|name| {
                let path = self.get(&remote_header(&name), PRIVATE_KEY_PATH_KEY)?.to_string();
                Some((name, path))
            })
            .collect()
    }

    /// Private key path of a single remote
    ///
    /// Fails with [`AppError::MissingRemote`] if the remote section is absent
    /// or carries no key path; no default is substituted.
    pub fn remote_key_path(&self, remote: &str) -> Result<&str, AppError> {
        self.get(&remote_header(remote), PRIVATE_KEY_PATH_KEY)
            .ok_or_else(|| AppError::MissingRemote(remote.to_string()))
    }

    /// Overlays `local` onto `self`
    ///
    /// Top-level sections from `local` replace same-named sections wholesale;
    /// sections only present on one side are kept.
    pub fn overlay(mut self, local: GitConfig) -> GitConfig {
        self.sections.extend(local.sections);
        self
    }
}

/// Section header for a remote, e.g. `remote "origin"`
pub fn remote_header(name: &str) -> String {
    format!("remote \"{name}\"")
}

/// Splits `section.sub.section.key` into (`section "sub.section"`, `key`)
fn split_name(name: &str) -> Option<(String, String)> {
    let (section, rest) = name.split_once('.')?;
    let (subsection, key) = match rest.rsplit_once('.') {
        Some((subsection, key)) => (Some(subsection), key),
        None => (None, rest),
    };
    if section.is_empty() || key.is_empty() {
        return None;
    }

    let section = section.to_lowercase();
    let header = match subsection {
        Some(subsection) => format!("{section} \"{subsection}\""),
        None => section,
    };
    Some((header, key.to_lowercase()))
}
