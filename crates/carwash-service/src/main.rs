//! Main entry point for the car-wash order service.
//!
//! Loads configuration, builds the order store on the configured storage
//! backend and serves the HTTP API until interrupted.

use carwash_config::Config;
use carwash_core::{OrderStore, OrderStoreBuilder};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

use carwash_storage::implementations::memory::create_storage as create_memory_storage;

/// Command-line arguments for the car-wash service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config/carwash.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the car-wash service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the order store
/// 5. Serves the API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	use tracing_subscriber::{fmt, EnvFilter};

	let args = Args::parse();

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or_else(|| format!("Config path is not valid UTF-8: {}", args.config.display()))?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let store = Arc::new(build_store(config.clone())?);

	server::start_server(config.api, store).await?;

	tracing::info!("Stopped car-wash service");
	Ok(())
}

/// Macro to create a factory HashMap with the appropriate type aliases
macro_rules! create_factory_map {
    ($interface:path, $error:path, $( $name:literal => $factory:expr ),* $(,)?) => {{
        let mut factories = std::collections::HashMap::new();
        $(
            factories.insert(
                $name.to_string(),
                $factory as fn(&toml::Value) -> Result<Box<dyn $interface>, $error>
            );
        )*
        factories
    }};
}

/// Builds the order store on the storage backend named in configuration.
fn build_store(config: Config) -> Result<OrderStore, Box<dyn std::error::Error>> {
	let storage_factories = create_factory_map!(
		carwash_storage::StorageInterface,
		carwash_storage::StorageError,
		"memory" => create_memory_storage,
	);

	Ok(OrderStoreBuilder::new(config).build(&storage_factories)?)
}
