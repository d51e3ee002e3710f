use std::{error::Error, path::PathBuf};

use bytes::Bytes;
use clap::Parser;
use http_body_util::Full;
use log::{error, info};
use torii::{
    config::file::{FileConfig, CONFIG},
    handler_fn, Response,
};

#[derive(Parser, Debug)]
#[command(name = "torii", about = "Boot an HTTP server from a Torii configuration file")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = CONFIG)]
    config: PathBuf,

    /// Overrides the configured port
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve HTTP/1.1 only
    #[arg(long)]
    http1: bool,

    /// Expose handler errors in responses
    #[arg(long)]
    development: bool,
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let file_config = if args
        .config
        .exists()
    {
        FileConfig::load(&args.config).await?
    } else {
        info!("{} not found, using defaults", args.config.display());
        FileConfig::default()
    };

    let mut configurator = file_config
        .into_configurator()
        .await?;
    if let Some(port) = args.port {
        configurator = configurator.set_port(port);
    }
    if args.http1 {
        configurator = configurator.use_http1();
    }
    if args.development {
        configurator = configurator.enable_development_messages();
    }

    let mut server = configurator
        .resolve()
        .await?;

    server.on_request(handler_fn(|_request| async move {
        Ok(Response::new(Full::new(Bytes::from_static(b"Hello from Torii"))))
    }));

    server.start().await?;

    tokio::signal::ctrl_c().await?;
    server.stop().await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    if let Err(e) = run(Args::parse()).await {
        error!("Failed to start server: {}", e);
        std::process::exit(1);
    }
}
