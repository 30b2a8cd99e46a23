// ABOUTME: Server binary for the GOYA mentorship platform API
// ABOUTME: Loads environment configuration, applies CLI overrides, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GOYA Mentorship Platform

//! # GOYA Server
//!
//! ```bash
//! goya-server
//! goya-server --http-port 9000 --database-url sqlite::memory:
//! GOYA_LOG_FORMAT=json goya-server
//! ```

use std::net::IpAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use goya_server::config::{LogFormat, ServerConfig};
use goya_server::{logging, server};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "goya-server",
    about = "GOYA mentorship platform API server",
    long_about = "Cohort enrollment, cohort lifecycle sweeps, and mentor matching over HTTP"
)]
struct Args {
    /// Interface to bind (overrides `GOYA_HOST`)
    #[arg(long)]
    host: Option<IpAddr>,

    /// HTTP port (overrides `GOYA_HTTP_PORT`)
    #[arg(long)]
    http_port: Option<u16>,

    /// Database URL (overrides `DATABASE_URL`)
    #[arg(long)]
    database_url: Option<String>,

    /// Seconds between cohort status sweeps (overrides `GOYA_SWEEP_INTERVAL_SECS`)
    #[arg(long)]
    sweep_interval_secs: Option<u64>,

    /// Maximum students per mentor (overrides `GOYA_MENTOR_CAPACITY`)
    #[arg(long)]
    mentor_capacity: Option<u32>,

    /// Log level directive (overrides `GOYA_LOG_LEVEL`)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format: compact or json (overrides `GOYA_LOG_FORMAT`)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

impl Args {
    fn apply(self, config: &mut ServerConfig) -> Result<()> {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.http_port {
            config.http_port = port;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }
        if let Some(secs) = self.sweep_interval_secs {
            anyhow::ensure!(secs > 0, "--sweep-interval-secs must be greater than 0");
            config.sweeper.interval = Duration::from_secs(secs);
        }
        if let Some(capacity) = self.mentor_capacity {
            anyhow::ensure!(capacity > 0, "--mentor-capacity must be greater than 0");
            config.mentor_capacity = capacity;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env().context("failed to load configuration")?;
    args.apply(&mut config)?;

    logging::init_logging(&config.logging).context("failed to initialize logging")?;
    info!(config = %config.summary(), "starting GOYA server");

    let resources = server::bootstrap(config)
        .await
        .context("failed to initialize server resources")?;
    server::run(resources).await.context("server terminated with an error")?;
    Ok(())
}
