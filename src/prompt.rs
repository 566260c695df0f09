use anyhow::{bail, Context, Result};
use crate::demo::DemoReport;
use paillier_tally::{
    BallotSource, CastOutcome, Ciphertext, PrivateKey, PublicKey, TallyResult, Vote,
};
use std::io::{BufRead, Write};

/// Reads answers from `input` and writes prompts and results to `output`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("Read input")?;
        if read == 0 {
            bail!("input closed before the tally finished");
        }
        Ok(line.trim().to_string())
    }

    /// Ask until the answer is an integer greater than 0
    pub fn positive(&mut self, prompt: &str) -> Result<usize> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;
            match self.read_line()?.parse::<usize>() {
                Ok(value) if value > 0 => return Ok(value),
                Ok(_) => writeln!(self.output, "please enter an integer greater than 0")?,
                Err(_) => writeln!(self.output, "invalid input, please enter an integer")?,
            }
        }
    }

    /// Use `value` when it is given and positive, otherwise ask
    pub fn resolve(&mut self, value: Option<usize>, name: &str, prompt: &str) -> Result<usize> {
        match value {
            Some(v) if v > 0 => Ok(v),
            Some(_) => {
                tracing::warn!(name, "configured value must be positive, asking instead");
                self.positive(prompt)
            }
            None => self.positive(prompt),
        }
    }

    /// Ask until the answer is an integer, 0 included
    pub fn non_negative(&mut self, prompt: &str) -> Result<u64> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;
            match self.read_line()?.parse::<u64>() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "please enter an integer of at least 0")?,
            }
        }
    }

    /// Ask until the answer is 0 or 1
    pub fn ask_vote(&mut self, candidate: usize) -> Result<Vote> {
        loop {
            writeln!(self.output, "please vote for candidate {} (0 or 1):", candidate + 1)?;
            self.output.flush()?;
            match self.read_line()?.parse::<Vote>() {
                Ok(vote) => return Ok(vote),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    pub fn print_public_key(&mut self, pk: &PublicKey) -> Result<()> {
        writeln!(self.output, "public key: (N, g) = ({}, {})", pk.n(), pk.g())?;
        Ok(())
    }

    pub fn print_private_key(&mut self, sk: &PrivateKey) -> Result<()> {
        writeln!(self.output, "private key: (λ, μ) = ({}, {})", sk.lambda(), sk.mu())?;
        Ok(())
    }

    pub fn print_demo(&mut self, report: &DemoReport) -> Result<()> {
        writeln!(self.output, "------------Encrypting messages------------")?;
        writeln!(self.output, "ciphertext1: {}", report.ciphertext1)?;
        writeln!(self.output, "Decrypted message1: {}", report.message1)?;
        writeln!(self.output, "ciphertext2: {}", report.ciphertext2)?;
        writeln!(self.output, "Decrypted message2: {}", report.message2)?;
        writeln!(self.output, "ciphertext_multi: {}", report.combined)?;
        writeln!(self.output, "Decrypted combined message: {}", report.sum)?;
        Ok(())
    }

    fn print_round(&mut self, outcome: &CastOutcome, totals: &[Ciphertext]) -> Result<()> {
        match outcome {
            CastOutcome::RoundClosed { round, .. } => {
                writeln!(self.output, "---------------this round is over---------------\n")?;
                writeln!(
                    self.output,
                    "-------------------result of {} round -------------------",
                    round + 1
                )?;
                for (idx, total) in totals.iter().enumerate() {
                    writeln!(self.output, "the vote of candidate {} is: {}\n", idx + 1, total)?;
                }
            }
            CastOutcome::RoundRejected { .. } => writeln!(
                self.output,
                "at least one candidate must receive a vote, please recast this round"
            )?,
            CastOutcome::Next { .. } => {}
        }
        Ok(())
    }

    pub fn print_final(&mut self, result: &TallyResult) -> Result<()> {
        writeln!(self.output, "---------------Final Results---------------")?;
        for (idx, count) in result.counts().iter().enumerate() {
            writeln!(self.output, "the final vote of candidate {} is: {}", idx + 1, count)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> BallotSource for Prompter<R, W> {
    type Error = anyhow::Error;

    fn vote(&mut self, _round: usize, candidate: usize) -> Result<Vote> {
        self.ask_vote(candidate)
    }

    fn round_started(&mut self, round: usize) {
        if let Err(e) = writeln!(
            self.output,
            "-------------------the {} round vote-------------------",
            round + 1
        ) {
            tracing::warn!(error = %e, "unable to write round header");
        }
    }

    fn round_finished(&mut self, outcome: &CastOutcome, totals: &[Ciphertext]) {
        if let Err(e) = self.print_round(outcome, totals) {
            tracing::warn!(error = %e, "unable to write round result");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paillier_tally::{KeyPair, Tally, TallyConfig};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn positive_retries_until_valid() {
        let mut p = prompter("abc\n0\n-3\n5\n");
        assert_eq!(p.positive("count: ").unwrap(), 5);
        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out.matches("invalid input").count(), 2);
        assert_eq!(out.matches("greater than 0").count(), 1);
    }

    #[test]
    fn vote_retries_until_binary() {
        let mut p = prompter("2\nyes\n 1 \n");
        assert_eq!(p.ask_vote(0).unwrap(), Vote::Yes);
        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out.matches("expected 0 or 1").count(), 2);
    }

    #[test]
    fn non_negative_accepts_zero() {
        let mut p = prompter("-1\nx\n0\n");
        assert_eq!(p.non_negative("message: ").unwrap(), 0);
        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out.matches("at least 0").count(), 2);
    }

    #[test]
    fn demo_output() {
        let mut rng = ChaCha20Rng::from_seed([12u8; 32]);
        let keys = KeyPair::generate_with_rng(32, &mut rng).unwrap();
        let report = crate::demo::run(&keys, 20, 22).unwrap();
        let mut p = prompter("");
        p.print_demo(&report).unwrap();
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("Decrypted message1: 20"));
        assert!(out.contains("Decrypted message2: 22"));
        assert!(out.contains("Decrypted combined message: 42"));
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut p = prompter("7\n");
        assert!(p.ask_vote(0).is_err());
    }

    #[test]
    fn resolve_prefers_configured_value() {
        let mut p = prompter("9\n");
        assert_eq!(p.resolve(Some(4), "rounds", "rounds: ").unwrap(), 4);
        assert_eq!(p.resolve(Some(0), "rounds", "rounds: ").unwrap(), 9);
    }

    #[test]
    fn interactive_tally() {
        let mut rng = ChaCha20Rng::from_seed([11u8; 32]);
        let keys = KeyPair::generate_with_rng(32, &mut rng).unwrap();
        let config = TallyConfig::new(2, 2).unwrap();
        let tally = Tally::with_rng(&keys, config, rng).unwrap();
        // round 1: candidate 1 gets the vote, round 2: rejected once, then candidate 2
        let mut p = prompter("1\n0\n0\n0\n1\n");
        let result = tally.run(&mut p).unwrap();
        p.print_final(&result).unwrap();
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("the final vote of candidate 1 is: 1"));
        assert!(out.contains("the final vote of candidate 2 is: 1"));
        assert!(out.contains("please recast this round"));
        assert_eq!(out.matches("the 2 round vote").count(), 2);
    }
}
