mod cli;

use picvault::{config, server, store::RecordStore};
use picvault_common::hash_owner_id;
use picvault_db::pool::init_pool;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    // Resolve the file actually loaded so relative database paths anchor to it
    let config_path = config_path
        .map(Path::to_path_buf)
        .or_else(config::find_default_config);
    let mut config = match config_path.as_deref() {
        Some(path) => config::parse_config(path)?,
        None => config::Config::default(),
    };

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    config::validate_config(&config)?;

    tracing::info!("Starting Picvault server");

    let db_path = config::resolve_database_path(&config, config_path.as_deref());
    let db_path_str = db_path.to_string_lossy();
    tracing::info!("Initializing database at {}", db_path_str);
    let db_pool = init_pool(&db_path_str, config.database.pool_size)?;

    let store = RecordStore::new(db_pool, config.admin.init_password.clone());

    server::start_server(&config, store).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "picvault=debug,picvault_db=debug,picvault_common=debug,tower_http=debug".to_string()
        } else {
            "picvault=info,picvault_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::HashOwner { uid } => {
            println!("{}", hash_owner_id(&uid));
            Ok(())
        }
        Commands::Version => {
            println!("picvault {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!(
                "  Database: {}",
                config::resolve_database_path(&config, Some(p)).display()
            );
            println!("  Pool size: {}", config.database.pool_size);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            config::validate_config(&config)?;
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Database: {}", config.database.path.display());
        }
    }

    Ok(())
}
