mod config_cmd;
pub mod meal;
mod user;

pub use config_cmd::ConfigCommand;
pub use meal::MealCommand;
pub use user::UserCommand;

use clap::ValueEnum;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
