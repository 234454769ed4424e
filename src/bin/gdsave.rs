//! gdsave CLI
//!
//! Inspect a save directory from the command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gdsave::codec::crypt::open_save;
use gdsave::{Config, SaveStore};
use tracing_subscriber::{fmt, EnvFilter};

/// gdsave CLI
#[derive(Parser, Debug)]
#[command(name = "gdsave")]
#[command(about = "Inspect Geometry Dash save files")]
#[command(version)]
struct Args {
    /// Save directory (defaults to the platform location)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show profile information
    Info,

    /// List levels
    Levels {
        /// List saved (downloaded) levels instead of created ones
        #[arg(long)]
        saved: bool,
    },

    /// Print both sections as JSON
    Export,

    /// Print the decoded document of a single save file (plain XML passes through)
    Decrypt {
        /// The file to decode
        file: PathBuf,
    },
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,gdsave=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> gdsave::Result<()> {
    let save_dir = args.dir.unwrap_or_else(Config::default_save_dir);
    let config = Config::builder().save_dir(&save_dir).build();

    match args.command {
        Commands::Info => {
            let database = SaveStore::new(config)?.load()?;
            println!("Username:    {}", database.username());
            println!("Player name: {}", database.player_name());
            println!("Account ID:  {}", database.account_id());
            println!("Player ID:   {}", database.player_id());
            println!("UDID:        {}", database.udid());
            println!("Bootups:     {}", database.bootup_count());
        }
        Commands::Levels { saved } => {
            let database = SaveStore::new(config)?.load()?;
            let levels = if saved {
                database.load_saved_levels()
            } else {
                database.load_my_levels()
            };
            for level in &levels {
                println!("{}", level);
            }
            tracing::info!(count = levels.len(), "levels listed");
        }
        Commands::Export => {
            let database = SaveStore::new(config)?.load()?;
            let text = serde_json::to_string_pretty(&database.to_json())?;
            println!("{}", text);
        }
        Commands::Decrypt { file } => {
            let raw = std::fs::read(&file)?;
            let document = open_save(&raw, config.xor_key)?;
            println!("{}", String::from_utf8_lossy(&document));
        }
    }

    Ok(())
}
