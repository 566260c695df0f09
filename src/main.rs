mod cli;
mod config;
mod demo;
mod prompt;

use anyhow::{Context, Result};
use clap::Parser;
use paillier_tally::{unknown_order::BigNumber, KeyGenerator, PublicKey, Tally, TallyConfig};
use serde::Serialize;
use std::io;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, TallyCli};
use crate::config::{FileConfig, Settings};
use crate::prompt::Prompter;

#[derive(Serialize)]
struct Summary<'a> {
    public_key: &'a PublicKey,
    counts: &'a [BigNumber],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = TallyCli::parse();
    let file = match &args.config {
        Some(path) => config::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::merge(&args, file);

    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());

    let bits = prompter.resolve(
        settings.bits,
        "bits",
        "please enter the length of the number used in algorithm:",
    )?;
    let keys = KeyGenerator::new(bits)
        .generate()
        .context("Key generation failed")?;
    prompter.print_public_key(keys.public_key())?;

    if let Some(Command::Demo { message1, message2 }) = args.command {
        prompter.print_private_key(keys.private_key())?;
        let message1 = match message1 {
            Some(m) => m,
            None => prompter.non_negative("please enter message1:")?,
        };
        let message2 = match message2 {
            Some(m) => m,
            None => prompter.non_negative("please enter message2:")?,
        };
        let report = demo::run(&keys, message1, message2).context("Demo failed")?;
        prompter.print_demo(&report)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        return Ok(());
    }

    let rounds = prompter.resolve(settings.rounds, "rounds", "please set the number of votes:")?;
    let candidates = prompter.resolve(
        settings.candidates,
        "candidates",
        "please set the number of candidates:",
    )?;
    let config = TallyConfig::new(rounds, candidates)?;

    let result = Tally::new(&keys, config)?.run(&mut prompter)?;
    prompter.print_final(&result)?;

    if args.json {
        let summary = Summary {
            public_key: keys.public_key(),
            counts: result.counts(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
