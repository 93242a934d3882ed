use colored::Colorize;
use inquire::Select;

use git_account::error::AppError;

use crate::commands::{
    AddArgs, AppContext, add_user, delete_user, exec_command, list_all_users, show_current_user,
    switch_user,
};

/// Runs interactive menu interface
pub fn run_menu(ctx: &AppContext) -> Result<(), AppError> {
    loop {
        let actions: Vec<&'static str> = vec![
            "use profile",
            "add profile",
            "remove profile",
            "show current user",
            "show all profiles",
            "run git command",
            "quit",
        ];

        let action_selected: &'static str =
            Select::new(&format!("{}", "select action".blue()), actions).prompt()?;

        let result = match action_selected {
            "use profile" => switch_user(ctx, None),
            "add profile" => add_user(ctx, AddArgs::default()),
            "remove profile" => delete_user(ctx, None),
            "show current user" => show_current_user(ctx),
            "show all profiles" => list_all_users(ctx),
            "run git command" => menu_exec(ctx),
            "quit" => {
                println!("{}", "quitting".yellow());
                break Ok(());
            }
            _ => unreachable!("unexpected input"),
        };

        // Prompt cancellation ends the menu; anything else is shown and the loop continues.
        match result {
            Err(AppError::Inquire(err)) => return Err(AppError::Inquire(err)),
            Err(err) => println!("{}", err.to_string().red()),
            Ok(()) => {}
        }
    }
}

/// Menu for running a git command under the current identity
fn menu_exec(ctx: &AppContext) -> Result<(), AppError> {
    let line: String = inquire::Text::new(&format!("{}", "git".blue()))
        .with_help_message("arguments, e.g. `pull --rebase`")
        .prompt()?;

    let mut command = vec!["git".to_string()];
    command.extend(line.split_whitespace().map(str::to_string));
    exec_command(ctx, command)
}
