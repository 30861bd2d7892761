mod cli;

use anyhow::{Context, Result};
use cli::{Commands, parse_args};
use serde_json::Value;
use solana_operations::{
    ChainClient, Credentials, Dispatcher, Operation, RpcChainClient, RunContext,
    config::SAMPLE_CONFIG,
};
use solana_sdk::signer::Signer;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = parse_args();

    match cli.command {
        Commands::Run {
            config,
            operation,
            items,
            continue_on_fail,
        } => {
            let credentials = Credentials::resolve(config.as_deref())?;
            let items = match items {
                Some(path) => load_items(&path)?,
                None => vec![Value::Object(Default::default())],
            };

            let client = RpcChainClient::new(&credentials.rpc_url);
            info!("Connected to {}", client.url());
            let context = RunContext::new(client, &credentials)?;
            let dispatcher = Dispatcher::new(context, continue_on_fail);

            let records = dispatcher.execute(&operation, &items).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }

        Commands::Operations => {
            println!("{:<26} {:<28} {}", "Value", "Name", "Description");
            println!("{}", "-".repeat(100));
            for op in Operation::ALL {
                println!(
                    "{:<26} {:<28} {}",
                    op.as_str(),
                    op.display_name(),
                    op.description()
                );
            }
        }

        Commands::TestCredentials { config } => {
            let credentials = Credentials::resolve(config.as_deref())?;
            let client = RpcChainClient::new(&credentials.rpc_url);
            let context = RunContext::new(client, &credentials)?;

            let blockhash = context
                .client
                .get_latest_blockhash()
                .await
                .with_context(|| format!("RPC endpoint {} did not answer", credentials.rpc_url))?;

            info!("Latest blockhash: {}", blockhash);
            println!("Wallet: {}", context.sender.pubkey());
            println!("RPC endpoint {} is reachable", credentials.rpc_url);
        }

        Commands::GenerateConfig { output } => {
            let mut file = File::create(&output)
                .context(format!("Failed to create config file at {:?}", output))?;
            file.write_all(SAMPLE_CONFIG.as_bytes())?;

            info!("Sample configuration file generated at {:?}", output);
            info!("Please edit the file with your wallet key before running operations.");
        }
    }

    Ok(())
}

/// Read the input items; a single mapping is treated as one item.
fn load_items(path: &Path) -> Result<Vec<Value>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open items file: {:?}", path))?;
    let items: Value = serde_yaml::from_reader(file).context("Failed to parse items file")?;

    Ok(match items {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        item => vec![item],
    })
}
