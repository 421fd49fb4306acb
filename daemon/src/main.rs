//! utxo-splitter: splits one account's large UTXOs on the child chain.

mod cli;
mod config;

use anyhow::Context;
use clap::Parser;
use std::time::Instant;

use splitter_crypto::{account_from_private_key, TypedDataSigner};
use splitter_engine::{FeeOracle, SplitOrchestrator, UtxoSource};
use splitter_types::SplitPlan;
use splitter_watcher::WatcherClient;

use crate::cli::{Cli, Command};
use crate::config::SplitterConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => SplitterConfig::from_toml_file(path)?,
        None => SplitterConfig::default(),
    };
    let config = cli.apply(file_config);
    if cli.command == Command::Config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }
    let settings = config.resolve()?;

    splitter_utils::init_logging(settings.log_format, &settings.log_level);
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config");
    }

    let key = cli
        .account_pk
        .as_deref()
        .context("missing setting account_pk (ACCOUNT_PK)")?;
    let account = account_from_private_key(key)?;
    let address = account.address;
    tracing::info!(%address, token = %settings.split_token, "splitting utxos of account");

    let watcher = WatcherClient::with_timeout(&settings.watcher_url, settings.request_timeout)?
        .with_page_limit(settings.page_limit);

    let fee = FeeOracle::new(&watcher)
        .resolve(&settings.fee_token)
        .await
        .with_context(|| format!("resolving fee for {}", settings.fee_token))?;
    let utxos = watcher
        .fetch_utxos(&address)
        .await
        .context("fetching utxos")?;
    tracing::info!(count = utxos.len(), "fetched utxos");

    let signer = TypedDataSigner::new(account, settings.plasma_framework);
    let orchestrator = SplitOrchestrator::new(signer, &watcher, settings.split_config());

    match cli.command {
        Command::Split => {
            let started = Instant::now();
            let report = orchestrator.run(utxos, &fee).await?;
            tracing::info!(
                rounds = report.rounds,
                transactions = report.transactions,
                outputs = report.outputs_created,
                remaining = report.final_utxos.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "done"
            );
        }
        Command::Plan => {
            let plans = orchestrator.plan_round(&utxos, &fee)?;
            if plans.is_empty() {
                println!("nothing to split");
            }
            for (i, plan) in plans.iter().enumerate() {
                print_plan(i, plan);
            }
        }
        Command::Config => {}
    }

    Ok(())
}

fn print_plan(index: usize, plan: &SplitPlan) {
    println!("transaction {index}:");
    for input in &plan.inputs {
        println!(
            "  in  {} {} {}",
            input.position(),
            input.currency,
            input.amount
        );
    }
    for output in &plan.outputs {
        println!(
            "  out {} {} -> {}",
            output.currency, output.amount, output.output_guard
        );
    }
}
