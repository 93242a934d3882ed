use colored::Colorize;
use inquire::Select;
use log::debug;

use git_account::{
    error::AppError,
    git::{GitConfigBridge, RunOptions, is_inside_git_repo},
    profile::{Identity, User},
    storage::{ProfileStore, check_if_users_exist},
    validation::{
        BACK_OPTION, prompt_until_valid, validate_input_email, validate_input_gpg_key,
        validate_input_id, validate_input_name, validate_input_private_key,
    },
};

/// Profile store and config bridge shared by every command
pub struct AppContext {
    pub store: ProfileStore,
    pub bridge: GitConfigBridge,
}

/// Field values given on the command line for `add`
#[derive(Debug, Default)]
pub struct AddArgs {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub private_key: Option<String>,
    pub gpg_key: Option<String>,
}

/// Lists all profiles, marking the one in effect
pub fn list_all_users(ctx: &AppContext) -> Result<(), AppError> {
    let users: Vec<User> = ctx.store.load()?;
    check_if_users_exist(&users)?;

    let current = current_identity(ctx);
    for user in &users {
        let marker = match &current {
            Some(identity) if user.matches(identity) => "*".green(),
            _ => " ".normal(),
        };
        println!(
            "{} {} {} <{}> {}",
            marker,
            user.id.bold(),
            user.name,
            user.email,
            user.private_key.dimmed()
        );
    }
    Ok(())
}

/// Adds a profile, prompting for any field not given
pub fn add_user(ctx: &AppContext, args: AddArgs) -> Result<(), AppError> {
    let users: Vec<User> = ctx.store.load()?;

    let id = field_or_prompt(args.id, "enter profile id:", |input| {
        validate_input_id(input, &users)
    })?;
    let name = field_or_prompt(args.name, "enter git username:", validate_input_name)?;
    let email = field_or_prompt(args.email, "enter git email:", |input| {
        validate_input_email(input, &users)
    })?;
    let private_key = field_or_prompt(
        args.private_key,
        "enter ssh private key path:",
        validate_input_private_key,
    )?;
    let gpg_key = field_or_prompt(
        args.gpg_key,
        "enter gpg signing key (optional):",
        validate_input_gpg_key,
    )?;

    let user = ctx.store.add(User {
        id,
        name,
        email,
        private_key,
        gpg_key,
    })?;
    println!("{} {}", "added profile:".green(), user.id);
    Ok(())
}

/// Removes a profile by id, or by selection when no id is given
pub fn delete_user(ctx: &AppContext, id: Option<String>) -> Result<(), AppError> {
    let id = match id {
        Some(id) => id,
        None => match select_profile(ctx, "select profile to remove:")? {
            Some(id) => id,
            None => return Ok(()),
        },
    };

    ctx.store.remove(&id)?;
    println!("{} {}", "removed profile:".green(), id);
    Ok(())
}

/// Switches the repository to a profile by id, or by selection when no id is given
pub fn switch_user(ctx: &AppContext, id: Option<String>) -> Result<(), AppError> {
    let id = match id {
        Some(id) => id,
        None => match select_profile(ctx, "select profile to use:")? {
            Some(id) => id,
            None => return Ok(()),
        },
    };

    let repo_dir = ctx.bridge.repo_dir();
    if !is_inside_git_repo(repo_dir)? {
        return Err(AppError::NotInGitRepository(repo_dir.to_path_buf()));
    }

    let user = ctx.store.find(&id)?;
    let entries = ctx.bridge.switch_account(&user)?;

    println!("{} {}", "switched to profile:".green(), user.id);
    for (key, value) in entries.iter() {
        println!("  {} = {}", key.blue(), value);
    }
    Ok(())
}

/// Shows the identity in effect for the repository
pub fn show_current_user(ctx: &AppContext) -> Result<(), AppError> {
    let identity = ctx.bridge.current_user()?;
    println!(
        "{} {} <{}>",
        "current user:".blue(),
        identity.name,
        identity.email
    );
    println!("  {} {}", "ssh key:".blue(), identity.private_key);
    if !identity.gpg_key.is_empty() {
        println!("  {} {}", "gpg key:".blue(), identity.gpg_key);
    }

    let users = ctx.store.load()?;
    match users.iter().find(|user| user.matches(&identity)) {
        Some(user) => println!("  {} {}", "profile:".blue(), user.id),
        None => println!("  {}", "no matching profile".yellow()),
    }

    // Keys recorded on remotes other than origin are informational only.
    let local = ctx.bridge.local_config()?;
    for (remote, path) in local.remote_key_paths() {
        if path != identity.private_key {
            println!(
                "  {} remote '{}' uses key {}",
                "note:".yellow(),
                remote,
                path
            );
        }
    }
    Ok(())
}

/// Runs a command under the current identity and prints its output
pub fn exec_command(ctx: &AppContext, command: Vec<String>) -> Result<(), AppError> {
    let stdout = ctx.bridge.run_command(&command, RunOptions::default())?;
    if !stdout.is_empty() {
        println!("{stdout}");
    }
    Ok(())
}

/// Prompts for a profile id; `None` when the user picks `back`
pub fn select_profile(ctx: &AppContext, message: &str) -> Result<Option<String>, AppError> {
    let users: Vec<User> = ctx.store.load()?;
    check_if_users_exist(&users)?;

    let ids: Vec<String> = build_id_list(&users);
    let selected: String = Select::new(&format!("{}", message.blue()), ids).prompt()?;

    if selected == BACK_OPTION {
        Ok(None)
    } else {
        Ok(Some(selected))
    }
}

/// Builds list of profile ids for menus to display
pub fn build_id_list(users: &[User]) -> Vec<String> {
    let mut ids: Vec<String> = users.iter().map(|user| user.id.clone()).collect();
    ids.push(BACK_OPTION.to_string());
    ids
}

/// Identity in effect, or `None` when the repository has none configured
fn current_identity(ctx: &AppContext) -> Option<Identity> {
    match ctx.bridge.current_user() {
        Ok(identity) => Some(identity),
        Err(err) => {
            debug!("no current identity: {err}");
            None
        }
    }
}

/// Uses the given value after validating it, or prompts until valid
fn field_or_prompt<F>(value: Option<String>, prompt: &str, validate: F) -> Result<String, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    match value {
        Some(value) => {
            validate(&value)?;
            Ok(value)
        }
        None => prompt_until_valid(&format!("{}", prompt.blue()), validate),
    }
}
