// src/main.rs
use clap::{Parser, Subcommand};
use log::{error, info};
use news_cache::{
    cache::{get_cached_detail, get_cached_list, invalidate_all},
    config::load_config,
    store::connect_store,
    utils::setup_logging,
};
use serde_json::Value;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "news-cache", version, about = "Inspect and invalidate the news cache")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the cached news list
    List,
    /// Print the cached detail entry for one item
    Detail { id: String },
    /// Delete the list entry and every detail entry
    Invalidate,
    /// Check that the configured store answers
    Ping,
}

fn print_entry(entry: Option<Value>) -> anyhow::Result<()> {
    match entry {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => println!("(miss)"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config()?;
    setup_logging(config.log_level)?;
    config.validate_and_log()?;

    let store = connect_store(&config).await;
    let store = store.as_deref();

    match cli.cmd {
        Command::List => print_entry(get_cached_list(store).await)?,
        Command::Detail { id } => print_entry(get_cached_detail(store, &id).await)?,
        Command::Invalidate => {
            let outcome = invalidate_all(store).await;
            println!("{}", serde_json::to_string(&outcome)?);
            if !outcome.success {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Ping => match store {
            None => println!("no store configured"),
            Some(store) => match store.ping().await {
                Ok(()) => {
                    info!("Store reachable ({})", config.backend);
                    println!("ok");
                }
                Err(e) => {
                    error!("Store ping failed: {}", e);
                    println!("unreachable: {}", e);
                    return Ok(ExitCode::FAILURE);
                }
            },
        },
    }

    Ok(ExitCode::SUCCESS)
}
