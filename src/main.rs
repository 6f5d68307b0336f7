// src/main.rs

mod card;
mod cli;
mod column;
mod data_loader;
mod error;
mod options;
mod responsive;
mod tui_app;
mod view_state;
mod virtual_table;

use clap::Parser;
use cli::Cli;
use data_loader::get_loader;
use options::{DataTableOptions, FileConfig};
use tui_app::TuiApp;

use std::error::Error;
use std::fs::File;
use std::io::{self};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use simplelog::{Config, WriteLogger};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log {
        WriteLogger::init(cli.log_level(), Config::default(), File::create(path)?)?;
    }

    let mut options = match (&cli.file, cli.extension()) {
        (Some(file_path), Some(extension)) => {
            let loader = get_loader(&extension)?;
            DataTableOptions::new(Vec::new(), loader.load(file_path)?)
        }
        _ => DataTableOptions::demo(),
    };

    if let Some(path) = &cli.config {
        options = FileConfig::load(path)?.apply(options)?;
    }

    let mut app = TuiApp::new(options);


    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;


    terminal.hide_cursor()?;


    let result = app.main_loop(&mut terminal);


    terminal.show_cursor()?;


    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
    )?;
    result
}
