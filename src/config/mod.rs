use crate::config::cli::Args;
use crate::error::Result;
use clap::Parser;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

pub mod cli;

pub struct Config {
    pub args: Args,
    pub http_client: Client,
}

impl Config {
    pub fn new() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("contributor-wall/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { args, http_client })
    }

    pub fn ensure_directories(&self) -> Result<()> {
        if self.args.ephemeral {
            return Ok(());
        }
        if !self.args.state_dir.exists() {
            std::fs::create_dir_all(&self.args.state_dir)?;
        }

        info!("State dir {:?} exists", self.args.state_dir);
        Ok(())
    }
}
