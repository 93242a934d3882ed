use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// CLI arguments parser using `clap`
#[derive(Parser, Debug)]
#[command(name = "git-account", version, about = "Switch between Git identities per repository")]
pub struct Cli {
    /// Profiles file (defaults to ~/.git-account)
    #[arg(long, global = true, env = "GIT_ACCOUNT_PROFILES")]
    pub profiles: Option<PathBuf>,

    /// Repository to operate on (defaults to the current directory)
    #[arg(long, global = true)]
    pub repo: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand chosen to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lists all stored profiles
    List,
    /// Adds a new profile; missing fields are prompted for
    Add {
        /// Unique profile id
        #[arg(long)]
        id: Option<String>,
        /// Git username
        #[arg(long)]
        name: Option<String>,
        /// Git email
        #[arg(long)]
        email: Option<String>,
        /// Path to the SSH private key
        #[arg(long)]
        private_key: Option<String>,
        /// GPG signing key id
        #[arg(long)]
        gpg_key: Option<String>,
    },
    /// Removes a profile
    Remove {
        /// Id of profile to remove (interactive if not provided)
        id: Option<String>,
    },
    /// Switches the repository to a profile
    Use {
        /// Id of profile to switch to (interactive if not provided)
        id: Option<String>,
    },
    /// Displays the identity in effect for the repository
    Current,
    /// Runs a command with the current identity's ssh and author environment
    #[command(trailing_var_arg = true)]
    Exec {
        /// Program and its arguments (e.g. git push origin main)
        #[arg(required = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exec_keeps_trailing_args() {
        let cli = Cli::parse_from(["git-account", "exec", "git", "push", "--force", "origin"]);
        match cli.command {
            Some(Commands::Exec { command }) => {
                assert_eq!(command, vec!["git", "push", "--force", "origin"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_options() {
        let cli = Cli::parse_from(["git-account", "-vv", "use", "work", "--repo", "/tmp/r"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.repo, Some(PathBuf::from("/tmp/r")));
        assert!(matches!(cli.command, Some(Commands::Use { id: Some(ref id) }) if id == "work"));
    }

    #[test]
    fn test_parse_add_flags() {
        let cli = Cli::parse_from([
            "git-account",
            "add",
            "--id",
            "a",
            "--private-key",
            "/k/a",
        ]);
        match cli.command {
            Some(Commands::Add { id, private_key, name, .. }) => {
                assert_eq!(id.as_deref(), Some("a"));
                assert_eq!(private_key.as_deref(), Some("/k/a"));
                assert_eq!(name, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_no_subcommand_is_menu() {
        let cli = Cli::parse_from(["git-account"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
