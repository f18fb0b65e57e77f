use alloy::primitives::Address;
use color_eyre::eyre::{Result, eyre};
use std::str::FromStr;
use std::sync::OnceLock;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt};
use vending_machine::{VENDING_MACHINE_ADDRESS, network, wallets};

mod client;
mod ui;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Diagnostics go to a rolling file; the terminal belongs to the TUI.
fn init_logging() {
    let _ = std::fs::create_dir_all("logs");
    let appender = rolling::daily("logs", "vending-machine.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    let _ = LOG_GUARD.set(guard);
}

fn print_usage_and_exit() -> ! {
    println!(
        "Usage: vending-machine --wallet <name> [--wallet-dir <path>]\n\
         [--rpc-url <url>] [--contract <address>] [--network-file <path>]\n\
         \n\
         Flags:\n\
           --wallet <name>        Wallet profile to attach (<name>.json keystore\n\
                                  or <name>.key raw key in the wallet directory)\n\
           --wallet-dir <path>    Override the wallet directory (defaults to\n\
                                  ~/.monad/wallets)\n\
           --rpc-url <url>        Override the RPC endpoint for the session\n\
           --contract <address>   Override the VendingMachine address\n\
                                  (defaults to {})\n\
           --network-file <path>  Load a network profile JSON instead of the\n\
                                  built-in Monad testnet profile",
        VENDING_MACHINE_ADDRESS,
    );
    std::process::exit(0);
}

fn parse_cli_args() -> Result<client::AppConfig> {
    let mut args = std::env::args().skip(1);
    let mut wallet_name: Option<String> = None;
    let mut wallet_dir: Option<String> = None;
    let mut rpc_url: Option<String> = None;
    let mut contract: Option<String> = None;
    let mut network_file: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--wallet" => {
                let name = args
                    .next()
                    .ok_or_else(|| eyre!("--wallet requires a wallet name"))?;
                if wallet_name.is_some() {
                    return Err(eyre!("--wallet may only be specified once"));
                }
                wallet_name = Some(name);
            }
            "--wallet-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| eyre!("--wallet-dir requires a path argument"))?;
                if wallet_dir.is_some() {
                    return Err(eyre!("--wallet-dir may only be specified once"));
                }
                wallet_dir = Some(dir);
            }
            "--rpc-url" => {
                let url = args
                    .next()
                    .ok_or_else(|| eyre!("--rpc-url requires a URL argument"))?;
                if rpc_url.is_some() {
                    return Err(eyre!("--rpc-url may only be specified once"));
                }
                rpc_url = Some(url);
            }
            "--contract" => {
                let address = args
                    .next()
                    .ok_or_else(|| eyre!("--contract requires an address argument"))?;
                if contract.is_some() {
                    return Err(eyre!("--contract may only be specified once"));
                }
                contract = Some(address);
            }
            "--network-file" => {
                let path = args
                    .next()
                    .ok_or_else(|| eyre!("--network-file requires a path argument"))?;
                if network_file.is_some() {
                    return Err(eyre!("--network-file may only be specified once"));
                }
                network_file = Some(path);
            }
            "--help" | "-h" => print_usage_and_exit(),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    let profile = match network_file {
        Some(path) => network::load_profile(path)?,
        None => network::NetworkProfile::monad_testnet(),
    };
    let rpc_url = rpc_url.unwrap_or_else(|| profile.rpc_url.clone());
    let contract = Address::from_str(contract.as_deref().unwrap_or(VENDING_MACHINE_ADDRESS))
        .map_err(|e| eyre!("Invalid contract address: {e}"))?;

    let wallet_name =
        wallet_name.ok_or_else(|| eyre!("Specify --wallet <name> to select a wallet"))?;
    let dir = wallets::resolve_wallet_dir(wallet_dir.as_deref())?;
    let wallet = wallets::find_wallet(&dir, &wallet_name)?;

    Ok(client::AppConfig {
        profile,
        rpc_url,
        contract,
        wallet,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging();
    let config = parse_cli_args()?;
    tracing::info!("starting vending-machine client");
    client::run_app(config).await
}
