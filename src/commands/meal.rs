use chrono::Local;
use clap::{Args, Subcommand};
use fueltrack_core::{Dashboard, Identity, Journal, MealEntry, MealStore, UserStore};

use super::OutputFormat;

/// Stores needed for meal commands
pub struct MealStores<'a> {
    pub meals: &'a MealStore,
    pub users: &'a UserStore,
}

#[derive(Args)]
pub struct MealCommand {
    #[command(subcommand)]
    pub command: MealSubcommand,
}

#[derive(Subcommand)]
pub enum MealSubcommand {
    /// Log a meal for a user, stamped with the current date and time
    Add {
        /// Meal name
        name: String,
        /// User the meal belongs to
        #[arg(long, short)]
        user: String,
        /// Calories (kcal)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        calories: i64,
        /// Protein in grams
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        protein: i64,
    },

    /// List every meal a user has logged
    List {
        #[arg(long, short)]
        user: String,
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show today's totals, lifetime totals and daily averages
    Stats {
        #[arg(long, short)]
        user: String,
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete all of a user's meals
    Reset {
        #[arg(long, short)]
        user: String,
    },
}

impl MealCommand {
    pub fn run(&self, stores: MealStores<'_>) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            MealSubcommand::Add {
                name,
                user,
                calories,
                protein,
            } => {
                if !stores.users.contains(user) {
                    return Err(format!("Unknown user: {}", user).into());
                }

                let identity = Identity::new(user.as_str());
                let record = Journal::new(stores.meals, &identity).log_meal(
                    MealEntry::new(name.as_str(), *calories, *protein),
                    Local::now().naive_local(),
                )?;

                println!("Logged meal for {}:", user);
                println!("  {}", record);
            }
            MealSubcommand::List { user, format } => {
                let identity = Identity::new(user.as_str());
                let meals = Journal::new(stores.meals, &identity).meals();

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&meals)?),
                    OutputFormat::Text => {
                        if meals.is_empty() {
                            println!("No meals logged for {}", user);
                            return Ok(());
                        }

                        for meal in &meals {
                            println!("{:10} {}", meal.date.as_deref().unwrap_or("-"), meal);
                        }
                        println!("\nTotal: {} meal(s)", meals.len());
                    }
                }
            }
            MealSubcommand::Stats { user, format } => {
                let identity = Identity::new(user.as_str());
                let dashboard =
                    Journal::new(stores.meals, &identity).dashboard(Local::now().naive_local());

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&dashboard)?)
                    }
                    OutputFormat::Text => print_dashboard(&dashboard),
                }
            }
            MealSubcommand::Reset { user } => {
                let identity = Identity::new(user.as_str());
                let removed = Journal::new(stores.meals, &identity).reset()?;
                println!("Removed {} meal(s) for {}", removed, user);
            }
        }
        Ok(())
    }
}

fn print_dashboard(dashboard: &Dashboard) {
    let stats = &dashboard.stats;

    println!("{} - {}", dashboard.username, dashboard.date);
    println!("{}", "=".repeat(30));

    if stats.today_meals.is_empty() {
        println!("No meals logged today");
    } else {
        for meal in &stats.today_meals {
            println!("  {}", meal);
        }
    }
    println!();

    println!(
        "Today:    {} kcal, {} g protein",
        stats.today_calories, stats.today_protein
    );
    println!(
        "Average:  {} kcal, {} g protein over {} day(s)",
        stats.avg_calories, stats.avg_protein, stats.days_logged
    );
    println!(
        "Lifetime: {} kcal, {} g protein",
        stats.lifetime_calories, stats.lifetime_protein
    );
}
