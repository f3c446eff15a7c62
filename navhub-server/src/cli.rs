use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use navhub_weather::{ClientAddress, Config, WeatherLookup};
use std::path::PathBuf;

use crate::{logging, server};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "navhub", version, about = "Link page backend with a weather endpoint")]
pub struct Cli {
    /// Config file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. "debug" or "navhub_weather=trace,info".
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one weather lookup and print the JSON response.
    Lookup {
        /// Client address to locate; omit to locate this machine.
        address: Option<String>,
    },

    /// Print the default config file path.
    ConfigPath,

    /// Write a config file populated with the defaults.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_file_path(),
        }
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        let path = self.config_path()?;
        let mut config = Config::load_from(&path)?;
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        Ok(config)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        match &self.command {
            None => {
                let config = self.load_config()?;
                logging::init_logging(&config.logging)?;
                server::serve(config).await
            }
            Some(Command::Serve { host, port }) => {
                let mut config = self.load_config()?;
                if let Some(host) = host {
                    config.server.host = host.clone();
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
                logging::init_logging(&config.logging)?;
                server::serve(config).await
            }
            Some(Command::Lookup { address }) => {
                let config = self.load_config()?;
                logging::init_logging(&config.logging)?;

                let lookup = WeatherLookup::from_config(&config.providers)?;
                let address = ClientAddress::from_headers(address.as_deref(), None);
                let envelope = lookup.lookup(&address).await;

                let json = serde_json::to_string_pretty(&envelope)
                    .context("Failed to serialize weather response")?;
                println!("{json}");
                Ok(())
            }
            Some(Command::ConfigPath) => {
                println!("{}", self.config_path()?.display());
                Ok(())
            }
            Some(Command::InitConfig { force }) => {
                let path = self.config_path()?;
                if path.exists() && !force {
                    bail!(
                        "Config file already exists: {}\n\
                         Hint: pass --force to overwrite it.",
                        path.display()
                    );
                }
                Config::default().save_to(&path)?;
                println!("Wrote default config to {}", path.display());
                Ok(())
            }
        }
    }
}
