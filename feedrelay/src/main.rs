use batch_relay::protocol::BatchInvocation;
use batch_relay::publisher::HttpTopicPublisher;
use batch_relay::relay::BatchRelay;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;
use tailer::api::FeedApi;
use tailer::appender::{HttpRecordLog, LogAppender};
use tailer::tailer::FeedTailer;

mod config;
mod telemetry;

#[derive(Parser)]
#[command(name = "feedrelay")]
#[command(about = "Relays a live event feed into a partitioned log and on to pub/sub")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tail the upstream stream into the log; runs until the connection ends
    Tailer,
    /// Handle one batch invocation, read as JSON from stdin
    Relay,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _telemetry = telemetry::init();

    let result = match cli.command {
        Command::Tailer => run_tailer().await,
        Command::Relay => run_relay().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Fatal by classification: the tailer has no in-process restart
            // and the relay's caller owns redelivery.
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run_tailer() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::TailerConfig::from_env()?;

    let api = Arc::new(FeedApi::new(&config.feed_api_url, &config.feed_api_token)?);
    let log = Arc::new(HttpRecordLog::new(&config.log_api_url));
    let appender = Arc::new(LogAppender::new(log, config.log_stream_name));

    FeedTailer::new(api, appender).run(&config.search_term).await?;

    // A clean upstream EOF still ends the run; reconnecting is an operator
    // action, not ours.
    tracing::warn!("upstream stream ended, exiting");
    Ok(())
}

async fn run_relay() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::RelayConfig::from_env()?;

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let batch: BatchInvocation = serde_json::from_str(&input)?;

    let publisher = Arc::new(HttpTopicPublisher::new(&config.broker_url));
    BatchRelay::new(publisher, config.topic_name)
        .handle(batch)
        .await?;

    Ok(())
}
