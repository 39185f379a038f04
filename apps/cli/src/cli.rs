use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "exam-maker",
    version,
    about = "Turn exam question documents into question banks and practice with them"
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Root directory for exams, banks and results
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse every .txt document in a directory into question banks
    Import {
        /// Directory of exam documents (defaults to the configured exams directory)
        dir: Option<PathBuf>,

        /// Re-import documents whose content has not changed
        #[arg(long)]
        force: bool,
    },

    /// Parse one document and report what was found
    Parse {
        file: PathBuf,

        /// Store the result as a bank
        #[arg(long)]
        save: bool,
    },

    /// List stored question banks
    List,

    /// Delete a stored question bank
    Remove { bank: String },

    /// Take an exam from a stored bank
    Exam {
        /// Bank name (prompted for when omitted)
        bank: Option<String>,

        /// Number of questions (prompted for when omitted)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}
