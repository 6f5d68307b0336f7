// src/cli.rs

use clap::Parser;
use log::LevelFilter;

/// Sortable, filterable table viewer that folds into cards on narrow terminals.
#[derive(Parser, Debug)]
#[command(name = "datatable", version, about, long_about = None)]
pub struct Cli {
    /// Data file to show. Without one, the people demo is shown.
    pub file: Option<String>,

    /// Data format, overriding the file extension.
    #[arg(short = 'b', long = "backend")]
    pub backend: Option<String>,

    /// TOML file with columns, hidden columns, card and styling.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Write logs to this file.
    #[arg(long)]
    pub log: Option<String>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Format named with `-b`, else the file extension.
    pub fn extension(&self) -> Option<String> {
        if let Some(ext) = &self.backend {
            return Some(ext.clone());
        }
        self.file.as_ref().map(|path| {
            std::path::Path::new(path)
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("")
                .to_string()
        })
    }
}
