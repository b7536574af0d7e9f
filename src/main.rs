// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

use clap::Parser;
use rabbitmq_cli_consumer::{
    channel::new_amqp_channel,
    command::CommandFactory,
    config::{override_from_env, utf8_vars, Config},
    consumer::Consumer,
    dispatcher::RabbitMQDispatcher,
    executer::ProcessExecuter,
    initializer::initialize,
    logs::{self, LogOptions},
};
use std::{error::Error, path::PathBuf, process::ExitCode, sync::Arc};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "rabbitmq-cli-consumer",
    about = "Consume RabbitMQ messages into a cli program"
)]
struct Cli {
    /// Command to run for every message; the payload is appended as last argument.
    #[arg(short = 'e', long)]
    executable: String,

    /// Location of the INI configuration file.
    #[arg(short = 'c', long)]
    configuration: PathBuf,

    /// Mirror logs to stdout and log the output of successful commands.
    #[arg(short = 'V', long, default_value_t = false)]
    verbose: bool,

    /// Zlib-decompress message bodies before handing them over.
    #[arg(long, default_value_t = false)]
    compression: bool,

    /// Omit timestamps from log lines.
    #[arg(long, default_value_t = false)]
    no_datetime: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match Config::load(&cli.configuration)
        .and_then(|cfg| override_from_env(cfg, utf8_vars(std::env::vars_os())))
    {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let opts = LogOptions {
        verbose: cli.verbose,
        no_datetime: cli.no_datetime,
    };
    if let Err(err) = logs::init(&cfg.logs, &opts) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match run(cli, cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = err.to_string(), "consumer stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, cfg: Config) -> Result<(), Box<dyn Error>> {
    let factory = CommandFactory::from_command_line(&cli.executable)?;

    info!(
        host = %cfg.rabbitmq.host,
        port = cfg.rabbitmq.port,
        vhost = %cfg.rabbitmq.vhost,
        "connecting to rabbitmq..."
    );
    let (_conn, channel) = new_amqp_channel(&cfg).await?;
    info!("connected");

    initialize(&cfg, channel.as_ref()).await?;

    let consumer = Consumer::new(
        Arc::new(ProcessExecuter::new(cli.verbose)),
        factory,
        cli.compression || cfg.rabbitmq.compression,
    );
    let dispatcher = RabbitMQDispatcher::new(channel, &cfg.rabbitmq.queue, consumer);

    tokio::select! {
        result = dispatcher.consume_blocking() => result?,
        _ = tokio::signal::ctrl_c() => info!("interrupted, shutting down"),
    }

    Ok(())
}
