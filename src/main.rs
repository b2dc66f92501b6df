use clap::{Parser, Subcommand};
use fueltrack::config::Config;
use fueltrack_core::{MealStore, UserStore};
use std::path::PathBuf;

mod commands;

use commands::meal::MealStores;
use commands::{ConfigCommand, MealCommand, UserCommand};

#[derive(Parser)]
#[command(name = "fueltrack")]
#[command(version)]
#[command(about = "Administration tool for FuelTrack data", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User(UserCommand),

    /// Log, list and summarise meals
    Meal(MealCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::User(cmd)) => {
            let users = UserStore::in_dir(&config.data_dir);
            cmd.run(&users)?;
        }
        Some(Commands::Meal(cmd)) => {
            let meals = MealStore::in_dir(&config.data_dir);
            let users = UserStore::in_dir(&config.data_dir);
            cmd.run(MealStores {
                meals: &meals,
                users: &users,
            })?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
