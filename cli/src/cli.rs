use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "abiml", version, about = "Read abixml documents into memory and summarize them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a single translation-unit document
    Unit { file: PathBuf },
    /// Read a corpus document containing several units
    Corpus { file: PathBuf },
    /// Read every entry of a directory archive
    Archive {
        dir: PathBuf,
        /// configuration file (TOML)
        #[arg(long)]
        conf: Option<PathBuf>,
        /// abort on the first unreadable entry
        #[arg(long)]
        strict: bool,
    },
}
