use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "frostforecast")]
#[command(about = "Warehouse credit consumption dashboard and cost projections")]
#[command(version)]
pub struct Cli {
    /// Override the configured port for this run only
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// SQLite warehouse file holding the usage views
    #[arg(long, global = true)]
    pub warehouse: Option<PathBuf>,

    /// Directory for the app database (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the dashboard API on localhost (default)
    Serve,

    /// List known warehouse tag names
    Tags,

    /// List saved filter presets
    Presets,

    /// Print consumption tiles and the cost projection receipt
    Report {
        /// Saved preset to filter by (all data when omitted)
        #[arg(long)]
        preset: Option<String>,

        /// Named range: today, last7days, last14days, last30days, thismonth
        #[arg(long)]
        range: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        end: Option<String>,

        /// Price per credit in dollars
        #[arg(long)]
        price: Option<f64>,

        /// Monthly growth percentage applied to every kind
        #[arg(long)]
        growth_rate: Option<f64>,
    },
}
