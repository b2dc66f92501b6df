use clap::{Args, Subcommand};
use fueltrack_core::UserStore;

#[derive(Args)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Register a new user
    Add {
        /// Username to register
        username: String,
        /// Password (stored as given)
        #[arg(long, short)]
        password: String,
    },
    /// List registered users
    List,
}

impl UserCommand {
    pub fn run(&self, users: &UserStore) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            UserSubcommand::Add { username, password } => {
                users.register(username, password)?;
                println!("Added user: {}", username);
            }
            UserSubcommand::List => {
                let names = users.usernames();
                if names.is_empty() {
                    println!("No users found in {}", users.path().display());
                    return Ok(());
                }

                for name in &names {
                    println!("{}", name);
                }
                println!("\nTotal: {} user(s)", names.len());
            }
        }
        Ok(())
    }
}
