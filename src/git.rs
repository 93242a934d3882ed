use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
    process::{Command, Output},
    thread,
};

use log::{debug, info};

use crate::{
    error::AppError,
    gitconfig::{GitConfig, ORIGIN, PRIVATE_KEY_PATH_KEY},
    profile::{Identity, User},
};

/// Global git config file in user's home directory
const GLOBAL_CONFIG_FILE: &str = ".gitconfig";

/// Builds the ssh invocation pinned to a single private key
pub fn ssh_command(private_key: &str) -> String {
    format!("ssh -i {private_key} -oIdentitiesOnly=yes")
}

/// Which config file a read or write targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Global,
    Local,
}

impl ConfigScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigScope::Global => "global",
            ConfigScope::Local => "local",
        }
    }
}

/// Ordered flat `section.key = value` pairs to write to git config
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigEntries(Vec<(String, String)>);

impl ConfigEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing the value in place if it is already present
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Options for [`GitConfigBridge::run_command`]
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Working directory, defaults to the repository directory
    pub current_dir: Option<PathBuf>,
    /// Extra environment; identity variables take precedence over these
    pub env: HashMap<String, String>,
}

/// Reads, merges and writes the global and repository git config
#[derive(Debug, Clone)]
pub struct GitConfigBridge {
    global_path: PathBuf,
    repo_dir: PathBuf,
}

impl GitConfigBridge {
    pub fn new(global_path: impl Into<PathBuf>, repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_path: global_path.into(),
            repo_dir: repo_dir.into(),
        }
    }

    /// Bridge over `~/.gitconfig` and the repository at `repo_dir`, or the
    /// current directory when none is given
    pub fn discover(repo_dir: Option<PathBuf>) -> Result<Self, AppError> {
        let home_dir = dirs::home_dir().ok_or(AppError::HomeDirNotFound)?;
        let repo_dir = match repo_dir {
            Some(dir) => dir,
            None => env::current_dir()?,
        };
        Ok(Self::new(home_dir.join(GLOBAL_CONFIG_FILE), repo_dir))
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Path of the config file backing `scope`
    pub fn config_path(&self, scope: ConfigScope) -> PathBuf {
        match scope {
            ConfigScope::Global => self.global_path.clone(),
            ConfigScope::Local => self.repo_dir.join(".git").join("config"),
        }
    }

    pub fn global_config(&self) -> Result<GitConfig, AppError> {
        GitConfig::from_file(&self.config_path(ConfigScope::Global))
    }

    pub fn local_config(&self) -> Result<GitConfig, AppError> {
        GitConfig::from_file(&self.config_path(ConfigScope::Local))
    }

    /// Global config overlaid by local config
    ///
    /// Both files are read concurrently; either failing fails the whole read.
    pub fn combined_config(&self) -> Result<GitConfig, AppError> {
        let (global, local) = thread::scope(|scope| {
            let global = scope.spawn(|| self.global_config());
            let local = self.local_config();
            let global = global
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (global, local)
        });
        Ok(global?.overlay(local?))
    }

    /// Writes each entry with `git config`, one subprocess per key
    ///
    /// Keys are applied in order. A failure stops the sequence and leaves the
    /// keys written before it in place.
    ///
    /// # Arguments
    /// * `entries` - Flat keys (e.g. `user.name`) and their values
    /// * `scope` - Config file to write to
    pub fn set_config(&self, entries: &ConfigEntries, scope: ConfigScope) -> Result<(), AppError> {
        let config_path = self.config_path(scope);
        for (key, value) in entries.iter() {
            debug!("git config --{} {key} {value}", scope.as_str());
            let git_command_output: Output = Command::new("git")
                .arg("config")
                .arg("--file")
                .arg(&config_path)
                .args([key, value])
                .output()
                .map_err(|err| AppError::ConfigWrite {
                    key: key.to_string(),
                    message: err.to_string(),
                })?;

            if !git_command_output.status.success() {
                return Err(AppError::ConfigWrite {
                    key: key.to_string(),
                    message: String::from_utf8(git_command_output.stderr)?.trim().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Points the repository at `user`
    ///
    /// Writes name, email, signing key and an ssh command pinned to the
    /// user's key into local config, and records the key path on every
    /// configured remote. Returns the entries written.
    pub fn switch_account(&self, user: &User) -> Result<ConfigEntries, AppError> {
        let local_config = self.local_config()?;

        let mut entries = ConfigEntries::new();
        entries.insert("user.name", &user.name);
        entries.insert("user.email", &user.email);
        entries.insert("core.sshCommand", ssh_command(&user.private_key));
        // Every remote gets the key, but only origin's is read back.
        for remote in local_config.remote_names() {
            entries.insert(
                format!("remote.{remote}.{PRIVATE_KEY_PATH_KEY}"),
                &user.private_key,
            );
        }
        entries.insert("user.signingKey", &user.gpg_key);

        self.set_config(&entries, ConfigScope::Local)?;
        info!(
            "switched {} to profile '{}' ({} keys written)",
            self.repo_dir.display(),
            user.id,
            entries.len()
        );
        Ok(entries)
    }

    /// Identity currently in effect, read fresh from the combined config
    pub fn current_user(&self) -> Result<Identity, AppError> {
        identity_from_config(&self.combined_config()?)
    }

    /// Runs `command` with the current identity's ssh and author environment
    ///
    /// Returns captured stdout with the trailing newline removed.
    ///
    /// # Arguments
    /// * `command` - Program followed by its arguments
    /// * `options` - Working directory and extra environment
    pub fn run_command(&self, command: &[String], options: RunOptions) -> Result<String, AppError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| AppError::Subprocess("empty command".to_string()))?;

        let identity_env = identity_env(&self.combined_config()?)?;
        let current_dir = options.current_dir.unwrap_or_else(|| self.repo_dir.clone());

        debug!("running {} in {}", command.join(" "), current_dir.display());
        let output: Output = Command::new(program)
            .args(args)
            .current_dir(&current_dir)
            .envs(&options.env)
            .envs(&identity_env)
            .output()
            .map_err(|err| AppError::Subprocess(format!("failed to run '{program}': {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("'{}' exited with {}", command.join(" "), output.status)
            } else {
                stderr
            };
            return Err(AppError::Subprocess(message));
        }

        let stdout = String::from_utf8(output.stdout)?;
        Ok(strip_final_newline(&stdout).to_string())
    }
}

/// Reconstructs the identity from a merged config
///
/// The key path comes from `origin` only; other remotes are not consulted.
pub fn identity_from_config(config: &GitConfig) -> Result<Identity, AppError> {
    let private_key = config.remote_key_path(ORIGIN)?.to_string();
    let name = required(config, "user", "name")?;
    let email = required(config, "user", "email")?;
    let gpg_key = config.get("user", "signingKey").unwrap_or_default().to_string();

    Ok(Identity {
        name,
        email,
        private_key,
        gpg_key,
    })
}

/// Environment injected into every wrapped command
pub fn identity_env(config: &GitConfig) -> Result<HashMap<String, String>, AppError> {
    let identity = identity_from_config(config)?;
    Ok(HashMap::from([
        ("GIT_SSH_COMMAND".to_string(), ssh_command(&identity.private_key)),
        ("GIT_COMMITTER_NAME".to_string(), identity.name.clone()),
        ("GIT_COMMITTER_EMAIL".to_string(), identity.email.clone()),
        ("GIT_AUTHOR_NAME".to_string(), identity.name),
        ("GIT_AUTHOR_EMAIL".to_string(), identity.email),
    ]))
}

fn required(config: &GitConfig, section: &str, key: &str) -> Result<String, AppError> {
    config
        .get(section, key)
        .map(str::to_string)
        .ok_or_else(|| AppError::MissingKey(format!("{section}.{key}")))
}

fn strip_final_newline(text: &str) -> &str {
    match text.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => text,
    }
}

/// Checks if `dir` is inside a Git repository
pub fn is_inside_git_repo(dir: &Path) -> Result<bool, AppError> {
    let git_command_output: Output = Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .output()?;

    if !git_command_output.status.success() {
        return Ok(false);
    }

    let value = String::from_utf8_lossy(&git_command_output.stdout).to_string();
    Ok(value.trim() == "true")
}
