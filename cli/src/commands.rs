pub mod clashes;
pub mod edit;
pub mod import;
pub mod ingest;
pub mod list;
pub mod listen;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use hostdb_common::config::{Config, DEFAULT_DB_PATH};

#[derive(Parser)]
#[command(name = "hostdb")]
#[command(about = "Keeps track of the devices seen on a network.")]
pub struct CommandLine {
    /// Path to the JSON database
    #[arg(long, global = true, env = "HOSTDB_DATABASE", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Write every set sorted so that saved databases diff cleanly
    #[arg(long, global = true)]
    pub sort: bool,

    /// Less output; repeat to hide record details
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every record
    #[command(alias = "ls")]
    List,
    /// Show records matching a hostname, MAC or IP
    #[command(alias = "f")]
    Find { key: String },
    /// Record a single (ip, hostname, mac) observation
    #[command(alias = "a")]
    Add {
        ip: String,
        hostname: String,
        mac: String,
        /// Attach a comment to the record
        #[arg(short, long)]
        comment: Vec<String>,
    },
    /// Import a tab-separated hosts file in the old format
    Import { file: PathBuf },
    /// Merge records into one
    #[command(alias = "m")]
    Merge {
        #[arg(required = true, num_args = 1..)]
        indices: Vec<usize>,
    },
    /// Delete records
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        indices: Vec<usize>,
    },
    /// Add a comment to a record
    Comment { index: usize, text: String },
    /// Report records that share a MAC or a hostname
    #[command(alias = "c")]
    Clashes {
        /// Show the manufacturer of every MAC
        #[arg(long)]
        vendors: bool,
    },
    /// Merge MAC clashes between records with generated hostnames
    Automerge {
        /// Merge every MAC clash, not only the generated ones
        #[arg(long)]
        force: bool,
    },
    /// Add sightings read as JSON lines from a file or stdin
    #[command(alias = "i")]
    Ingest {
        #[arg(default_value = "-")]
        source: String,
    },
    /// Print DHCP and mDNS sightings seen on an interface as JSON lines
    #[command(alias = "l")]
    Listen {
        interface: String,
        /// Stop after this many sightings
        #[arg(long)]
        count: Option<usize>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            db_path: self.db.clone(),
            sort_on_save: self.sort,
            quiet: self.quiet,
        }
    }
}
