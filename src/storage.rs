use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::{error::AppError, profile::User};

/// Profiles file in user's home directory
const PROFILES_FILE: &str = ".git-account";

/// Gets the default path to the profiles file
pub fn default_profiles_path() -> Result<PathBuf, AppError> {
    let home_dir: PathBuf = dirs::home_dir().ok_or(AppError::HomeDirNotFound)?;
    Ok(home_dir.join(PROFILES_FILE))
}

/// Ordered list of stored identities, persisted as a JSON array
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `~/.git-account`
    pub fn at_home() -> Result<Self, AppError> {
        Ok(Self::new(default_profiles_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads profiles from the JSON file, creating it as `[]` if absent
    pub fn load(&self) -> Result<Vec<User>, AppError> {
        if !self.path.exists() {
            debug!("creating empty profiles file at {}", self.path.display());
            self.write(&[])?;
        }

        let file_contents = fs::read_to_string(&self.path).map_err(|source| AppError::FileRead {
            path: self.path.clone(),
            source,
        })?;

        if file_contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&file_contents)?)
    }

    /// Appends a profile and persists the list
    ///
    /// Ids must be unique; adding an id that is already stored fails.
    pub fn add(&self, user: User) -> Result<User, AppError> {
        let mut users = self.load()?;
        if users.iter().any(|existing| existing.id == user.id) {
            return Err(AppError::DuplicateProfile(user.id));
        }

        users.push(user.clone());
        self.write(&users)?;
        info!("added profile '{}'", user.id);
        Ok(user)
    }

    /// Removes every profile with the given id
    ///
    /// Removing an unknown id is not an error.
    pub fn remove(&self, id: &str) -> Result<String, AppError> {
        let mut users = self.load()?;
        let initial_len = users.len();
        users.retain(|user| user.id != id);

        if users.len() == initial_len {
            debug!("no profile with id '{id}', nothing removed");
        } else {
            info!("removed {} profile(s) with id '{id}'", initial_len - users.len());
        }

        self.write(&users)?;
        Ok(id.to_string())
    }

    /// Finds the first profile with the given id
    pub fn find(&self, id: &str) -> Result<User, AppError> {
        self.load()?
            .into_iter()
            .find(|user| user.id == id)
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Saves profiles to the JSON file
    ///
    /// The list is written to a sibling temp file which then replaces the target.
    ///
    /// # Arguments
    /// * `users` - Profiles to save, in order
    pub fn write(&self, users: &[User]) -> Result<(), AppError> {
        let json: String = serde_json::to_string_pretty(users)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

/// Checks if any profiles exist
///
/// # Arguments
/// * `users` - Profiles to check
pub fn check_if_users_exist(users: &[User]) -> Result<(), AppError> {
    if users.is_empty() {
        return Err(AppError::Validation("no profiles found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            private_key: format!("/k/{id}"),
            gpg_key: format!("GPG{}", id.to_uppercase()),
        }
    }

    fn store(dir: &TempDir) -> ProfileStore {
        ProfileStore::new(dir.path().join(".git-account"))
    }

    #[test]
    fn test_load_creates_empty_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(store.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap().trim(), "[]");
    }

    #[test]
    fn test_load_whitespace_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.path(), "  \n").unwrap();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_malformed_json_fails() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.path(), "[{\"id\": ").unwrap();

        assert!(matches!(store.load(), Err(AppError::SerdeJson(_))));
    }

    #[test]
    fn test_add_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let alice = user("a", "Alice");

        let stored = store.add(alice.clone()).unwrap();
        assert_eq!(stored, alice);
        assert_eq!(store.load().unwrap(), vec![alice]);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.add(user("b", "Bob")).unwrap();
        store.add(user("a", "Alice")).unwrap();

        let ids: Vec<String> = store.load().unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_add_duplicate_id_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.add(user("a", "Alice")).unwrap();

        let err = store.add(user("a", "Another")).unwrap_err();
        assert!(matches!(err, AppError::DuplicateProfile(id) if id == "a"));
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_drops_all_matches() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store
            .write(&[user("a", "Alice"), user("b", "Bob"), user("a", "Alias")])
            .unwrap();

        assert_eq!(store.remove("a").unwrap(), "a");
        let remaining = store.load().unwrap();
        assert_eq!(remaining, vec![user("b", "Bob")]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.add(user("a", "Alice")).unwrap();
        let before = store.load().unwrap();

        store.remove("zzz").unwrap();
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn test_find() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.add(user("a", "Alice")).unwrap();

        assert_eq!(store.find("a").unwrap().name, "Alice");
        assert!(matches!(store.find("x"), Err(AppError::UserNotFound(_))));
    }

    #[test]
    fn test_write_uses_camel_case_schema() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.add(user("a", "Alice")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"privateKey\": \"/k/a\""));
        assert!(raw.contains("\"gpgKey\": \"GPGA\""));
    }

    #[test]
    fn test_write_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path().join("nested").join("profiles.json"));

        store.write(&[user("a", "Alice")]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_check_if_users_exist() {
        assert!(check_if_users_exist(&[]).is_err());
        assert!(check_if_users_exist(&[user("a", "Alice")]).is_ok());
    }
}
