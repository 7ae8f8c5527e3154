mod commands;
mod session;
mod terminal;

use commands::{CommandLine, Commands, clashes, edit, import, ingest, list, listen};
use hostdb_common::config::Config;
use terminal::logging;

fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg: Config = commands.config();

    logging::init_logging(cfg.quiet);

    match commands.command {
        Commands::List => list::list(&cfg),
        Commands::Find { key } => list::find(&key, &cfg),
        Commands::Add { ip, hostname, mac, comment } => edit::add(&ip, &hostname, &mac, &comment, &cfg),
        Commands::Import { file } => import::import(&file, &cfg),
        Commands::Merge { indices } => edit::merge(&indices, &cfg),
        Commands::Delete { indices } => edit::delete(&indices, &cfg),
        Commands::Comment { index, text } => edit::comment(index, &text, &cfg),
        Commands::Clashes { vendors } => clashes::clashes(vendors, &cfg),
        Commands::Automerge { force } => clashes::automerge(force, &cfg),
        Commands::Ingest { source } => ingest::ingest(&source, &cfg),
        Commands::Listen { interface, count } => listen::listen(&interface, count),
    }
}
