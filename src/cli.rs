//! Command line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ScopeConfig;
use crate::data::line::ValueFormat;
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(name = "netscope")]
#[command(about = "Realtime oscilloscope for `label: value` lines streamed over TCP")]
#[command(version)]
pub struct Cli {
    /// Endpoint address (default 192.168.1.66)
    pub host: Option<String>,

    /// Endpoint port (default 3333)
    pub port: Option<u16>,

    /// Number of samples kept on screen
    #[arg(long, short = 'n')]
    pub samples: Option<usize>,

    /// Parse the value field as hexadecimal instead of decimal
    #[arg(long)]
    pub hex: bool,

    /// With --hex, treat values as 24-bit two's complement
    #[arg(long, requires = "hex")]
    pub sign_extend_24: bool,

    /// JSON file with configuration overrides
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Defaults, then the config file, then flags; validated.
    pub fn resolve_config(&self) -> Result<ScopeConfig> {
        let mut cfg = match &self.config {
            Some(path) => ScopeConfig::from_json_file(path)?,
            None => ScopeConfig::default(),
        };
        if let Some(host) = &self.host {
            cfg.host = host.clone();
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(n) = self.samples {
            cfg.max_samples = n;
        }
        if self.hex {
            cfg.value_format = ValueFormat::Hex;
        }
        if self.sign_extend_24 {
            cfg.sign_extend_24 = true;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
