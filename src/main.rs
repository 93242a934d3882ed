mod cli;
mod commands;
mod menu;

use std::process;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::{AddArgs, AppContext};
use git_account::{error::AppError, git::GitConfigBridge, logger, storage::ProfileStore};

fn main() {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), err.to_string().red());
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let store = match cli.profiles {
        Some(path) => ProfileStore::new(path),
        None => ProfileStore::at_home()?,
    };
    let ctx = AppContext {
        store,
        bridge: GitConfigBridge::discover(cli.repo)?,
    };

    match cli.command {
        Some(Commands::List) => commands::list_all_users(&ctx),
        Some(Commands::Add {
            id,
            name,
            email,
            private_key,
            gpg_key,
        }) => commands::add_user(
            &ctx,
            AddArgs {
                id,
                name,
                email,
                private_key,
                gpg_key,
            },
        ),
        Some(Commands::Remove { id }) => commands::delete_user(&ctx, id),
        Some(Commands::Use { id }) => commands::switch_user(&ctx, id),
        Some(Commands::Current) => commands::show_current_user(&ctx),
        Some(Commands::Exec { command }) => commands::exec_command(&ctx, command),
        None => menu::run_menu(&ctx),
    }
}
