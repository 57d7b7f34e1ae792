//! TILLER — Multi-wallet DeFi task runner
//!
//! Entry point. Loads configuration, initialises structured logging,
//! reads the wallet and proxy lists, and walks every account through the
//! portal preamble and the on-chain step pipeline with graceful shutdown.

use anyhow::Result;
use tracing::{info, warn};

use tiller::accounts;
use tiller::chain::EvmClient;
use tiller::config::AppConfig;
use tiller::engine::RunDriver;
use tiller::portal::{PortalApi, PortalClient};

const BANNER: &str = r#"
 _____ ___ _     _     _____ ____
|_   _|_ _| |   | |   | ____|  _ \
  | |  | || |   | |   |  _| | |_) |
  | |  | || |___| |___| |___|  _ <
  |_| |___|_____|_____|_____|_| \_\

  Multi-wallet Testnet Campaign Runner
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        network = %cfg.network.name,
        chain_id = cfg.network.chain_id,
        portal = %cfg.portal.base_url,
        "TILLER starting up"
    );

    // -- Load the account list (the only fatal input) ---------------------

    let entries = accounts::load_accounts(&cfg.run.wallet_file, &cfg.run.proxy_file)?;
    info!(accounts = entries.len(), "Wallet and proxy lists loaded");

    // -- Initialise components --------------------------------------------

    let campaign = cfg.campaign()?;
    let chain = EvmClient::new(
        &cfg.network.rpc_url,
        cfg.network.chain_id,
        cfg.network.tx_timeout_secs,
    )?;

    let portal_cfg = cfg.portal.clone();
    let driver = RunDriver::new(&chain, &campaign, &cfg.run, move |proxy_url| {
        PortalClient::for_proxy(&portal_cfg, proxy_url)
            .map(|client| Box::new(client) as Box<dyn PortalApi>)
    });

    // -- Run --------------------------------------------------------------

    info!("Processing accounts sequentially. Press Ctrl+C to stop.");

    tokio::select! {
        summary = driver.run(&entries) => {
            info!(summary = %summary, "Run complete");
            for report in &summary.reports {
                info!(report = %report, "Account result");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Ctrl+C received, stopping before the remaining accounts");
        }
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tiller=info"));

    let json_logging = std::env::var("TILLER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
