use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "paillier-tally",
    about = "Count binary votes per candidate under Paillier encryption",
    version
)]
pub struct TallyCli {
    /// Bit length of the Paillier modulus N
    #[arg(long, value_name = "BITS")]
    pub bits: Option<usize>,

    /// Number of valid rounds to collect
    #[arg(long, value_name = "N")]
    pub rounds: Option<usize>,

    /// Number of candidates per round
    #[arg(long, value_name = "N")]
    pub candidates: Option<usize>,

    /// Path to a TOML file providing any of bits, rounds and candidates
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also print the public key and final counts as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Encrypt two messages, add them homomorphically and decrypt all three
    Demo {
        /// First plaintext, asked for when missing
        #[arg(long, value_name = "M")]
        message1: Option<u64>,

        /// Second plaintext, asked for when missing
        #[arg(long, value_name = "M")]
        message2: Option<u64>,
    },
}
