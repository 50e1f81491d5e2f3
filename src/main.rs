use anyhow::Result;
use clap::Parser;
use log::info;
use resale_client::api::ResaleClient;
use resale_client::cli::commands::{account, address, catalog, config as config_cmd, orders, sell};
use resale_client::cli::{AppContext, Cli, Commands};
use resale_client::config::Config;
use resale_client::session::SessionManager;
use resale_client::store::LocalStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Log to a file so prompts stay clean (truncated on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("resale-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    info!("Starting resale-cli against {}", config.api.base_url);

    // Config commands never touch the store or the network
    let command = match cli.command {
        Commands::Config(args) => return config_cmd::config_command(args, &config),
        command => command,
    };

    let store = LocalStore::open(&config.store_path()?).await?;
    let session = SessionManager::restore(store.clone()).await?;
    let client = ResaleClient::new(&config.api, config.monitoring.clone())?;
    let mut ctx = AppContext { config, client, session };

    let result = match command {
        Commands::Catalog(args) => catalog::catalog_command(args, &ctx).await,
        Commands::Sell(args) => sell::sell_command(args, &ctx).await,
        Commands::Account(args) => account::account_command(args, &mut ctx).await,
        Commands::Address(args) => address::address_command(args, &ctx).await,
        Commands::Orders(args) => orders::orders_command(args, &ctx).await,
        Commands::Config(args) => config_cmd::config_command(args, &ctx.config),
    };

    store.close().await;
    result
}
