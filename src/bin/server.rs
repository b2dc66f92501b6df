//! FuelTrack Server
//!
//! Web app for logging meals and tracking daily calories and protein.
//!
//! # Configuration
//!
//! Environment variables:
//! - `FUELTRACK_CONFIG`: Path to config file (default: ~/.config/fueltrack/config.yaml)
//! - `FUELTRACK_DATA_DIR`: Directory holding meals.json and users.json
//! - `FUELTRACK_HOST`: Address to bind (default: 0.0.0.0)
//! - `FUELTRACK_PORT`: Port to listen on (default: 5002)
//! - `FUELTRACK_SESSION_TTL_MINUTES`: Login session lifetime (default: 10080)
//!
//! # Config File Format
//!
//! ```yaml
//! data_dir: /var/lib/fueltrack
//! host: 0.0.0.0
//! port: 5002
//! session_ttl_minutes: 10080
//! ```

use fueltrack::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fueltrack=info,fueltrack_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::load(None) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = fueltrack::server::serve(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
