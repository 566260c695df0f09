//! A round based tally over Paillier ciphertexts.
//!
//! Each candidate keeps an encrypted running total. In every round the
//! candidates are asked for a binary vote in order, and the round ends
//! as soon as one of them receives a 1. The running totals are only
//! decrypted once every round has completed.
//!
//! Deciding when a round ends requires decrypting the round local
//! ciphertexts, so whoever drives the tally learns which candidate
//! received each round's vote. Only the running totals stay opaque
//! until the end.

use crate::{Ciphertext, InvalidVote, KeyPair, PaillierError, PaillierResult, Plaintext};
use rand::{rngs::OsRng, CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};
use unknown_order::BigNumber;

/// A single binary ballot entry
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Vote {
    /// 0
    No,
    /// 1
    Yes,
}

impl Vote {
    /// The plaintext this vote encrypts to
    pub fn value(self) -> u8 {
        match self {
            Vote::No => 0,
            Vote::Yes => 1,
        }
    }
}

impl From<bool> for Vote {
    fn from(yes: bool) -> Self {
        if yes {
            Vote::Yes
        } else {
            Vote::No
        }
    }
}

impl TryFrom<i64> for Vote {
    type Error = InvalidVote;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Vote::No),
            1 => Ok(Vote::Yes),
            other => Err(InvalidVote(other.to_string())),
        }
    }
}

impl FromStr for Vote {
    type Err = InvalidVote;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        s.parse::<i64>()
            .map_err(|_| InvalidVote(s.to_string()))
            .and_then(Vote::try_from)
    }
}

/// The shape of a tally
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TallyConfig {
    /// Number of valid rounds to collect
    pub rounds: usize,
    /// Number of candidates voted on in each round
    pub candidates: usize,
}

impl TallyConfig {
    /// Both counts must be positive
    pub fn new(rounds: usize, candidates: usize) -> PaillierResult<Self> {
        let config = Self { rounds, candidates };
        config.validate()?;
        Ok(config)
    }

    /// Check both counts are positive
    pub fn validate(&self) -> PaillierResult<()> {
        if self.rounds == 0 {
            return Err(PaillierError::InvalidParameter("rounds must be positive"));
        }
        if self.candidates == 0 {
            return Err(PaillierError::InvalidParameter("candidates must be positive"));
        }
        Ok(())
    }
}

/// Where the tally is in its round cycle.
///
/// Rounds and candidates are zero based.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TallyState {
    /// Waiting for [`Tally::begin_round`]
    RoundStart {
        /// Round about to start
        round: usize,
    },
    /// Waiting for `candidate`'s vote
    Voting {
        /// Current round
        round: usize,
        /// Candidate whose vote is next
        candidate: usize,
    },
    /// `winner` received the round's vote, the others are being folded in
    RoundClosing {
        /// Current round
        round: usize,
        /// Candidate that received the vote
        winner: usize,
    },
    /// A valid round ended and more rounds remain
    RoundComplete {
        /// Round that ended
        round: usize,
        /// Candidate that received the vote
        winner: usize,
    },
    /// All rounds are complete, the totals can be decrypted
    Finalized,
}

/// What happened after a vote was cast
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CastOutcome {
    /// The round continues with `candidate`
    Next {
        /// Candidate whose vote is next
        candidate: usize,
    },
    /// `winner` received a vote and the round is valid
    RoundClosed {
        /// Round that ended
        round: usize,
        /// Candidate that received the vote
        winner: usize,
    },
    /// Nobody received a vote, the round has to be voted again
    RoundRejected {
        /// Round that will be repeated
        round: usize,
    },
}

/// Decrypted running totals, one per candidate
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TallyResult {
    counts: Vec<Plaintext>,
}

impl TallyResult {
    /// Vote count per candidate, in candidate order
    pub fn counts(&self) -> &[Plaintext] {
        &self.counts
    }

    /// Sum of all counts
    pub fn total(&self) -> BigNumber {
        self.counts
            .iter()
            .fold(BigNumber::zero(), |acc, c| &acc + c)
    }
}

/// Supplies votes to [`Tally::run`].
///
/// Implementations are responsible for asking again when the input is
/// not a valid [`Vote`].
pub trait BallotSource {
    /// Error raised by the source, it must be able to carry tally errors
    type Error: From<PaillierError>;

    /// The vote of `candidate` in `round`
    fn vote(&mut self, round: usize, candidate: usize) -> Result<Vote, Self::Error>;

    /// Called once a round has started, also when it is repeated
    fn round_started(&mut self, _round: usize) {}

    /// Called when a round was closed or rejected, with the running totals
    fn round_finished(&mut self, _outcome: &CastOutcome, _totals: &[Ciphertext]) {}
}

/// An encrypted tally borrowing a key pair for one session
#[derive(Debug)]
pub struct Tally<'a, R = OsRng> {
    keys: &'a KeyPair,
    config: TallyConfig,
    totals: Vec<Ciphertext>,
    round_ciphertexts: Vec<Ciphertext>,
    state: TallyState,
    rng: R,
}

impl<'a> Tally<'a, OsRng> {
    /// Start a tally using randomness from the operating system
    pub fn new(keys: &'a KeyPair, config: TallyConfig) -> PaillierResult<Self> {
        Self::with_rng(keys, config, OsRng)
    }
}

impl<'a, R: RngCore + CryptoRng> Tally<'a, R> {
    /// Start a tally using randomness from `rng`.
    ///
    /// Every running total starts as a fresh encryption of 0.
    pub fn with_rng(keys: &'a KeyPair, config: TallyConfig, rng: R) -> PaillierResult<Self> {
        config.validate()?;
        let mut tally = Self {
            keys,
            config,
            totals: Vec::with_capacity(config.candidates),
            round_ciphertexts: Vec::new(),
            state: TallyState::RoundStart { round: 0 },
            rng,
        };
        tally.totals = tally.encrypted_zeros()?;
        Ok(tally)
    }

    /// The current state
    pub fn state(&self) -> TallyState {
        self.state
    }

    /// The tally's shape
    pub fn config(&self) -> TallyConfig {
        self.config
    }

    /// The encrypted running totals
    pub fn totals(&self) -> &[Ciphertext] {
        &self.totals
    }

    /// The ciphertexts of the round in progress
    pub fn round_ciphertexts(&self) -> &[Ciphertext] {
        &self.round_ciphertexts
    }

    /// Reset every round ciphertext to an encryption of 0 and move to
    /// voting on the first candidate.
    ///
    /// Allowed at the start of a round, including a rejected one, and
    /// after a completed round.
    pub fn begin_round(&mut self) -> PaillierResult<()> {
        let round = match self.state {
            TallyState::RoundStart { round } => round,
            TallyState::RoundComplete { round, .. } => round + 1,
            _ => return Err(PaillierError::ProtocolViolation("a round is already in progress")),
        };
        self.round_ciphertexts = self.encrypted_zeros()?;
        self.state = TallyState::Voting {
            round,
            candidate: 0,
        };
        debug!(round, "round started");
        Ok(())
    }

    /// Cast the current candidate's vote
    pub fn cast(&mut self, vote: Vote) -> PaillierResult<CastOutcome> {
        let (round, candidate) = match self.state {
            TallyState::Voting { round, candidate } => (round, candidate),
            _ => return Err(PaillierError::ProtocolViolation("no vote is expected")),
        };

        let ballot = self.encrypt(&BigNumber::from(vote.value()))?;
        self.totals[candidate] = self.keys.combine(&ballot, &self.totals[candidate])?;
        self.round_ciphertexts[candidate] = ballot;

        if !self.keys.decrypt(&self.round_ciphertexts[candidate])?.is_zero() {
            self.state = TallyState::RoundClosing {
                round,
                winner: candidate,
            };
            self.close_round(candidate)?;
            return self.complete_round(round);
        }

        if candidate + 1 < self.config.candidates {
            self.state = TallyState::Voting {
                round,
                candidate: candidate + 1,
            };
            return Ok(CastOutcome::Next {
                candidate: candidate + 1,
            });
        }
        self.complete_round(round)
    }

    /// Decrypt the running totals once every round is complete
    pub fn finalize(self) -> PaillierResult<TallyResult> {
        if self.state != TallyState::Finalized {
            return Err(PaillierError::ProtocolViolation("rounds are still outstanding"));
        }
        let counts = self
            .totals
            .iter()
            .map(|c| self.keys.decrypt(c))
            .collect::<PaillierResult<Vec<_>>>()?;
        debug!(candidates = counts.len(), "tally finalized");
        Ok(TallyResult { counts })
    }

    /// Drive every remaining round with votes from `source` and
    /// decrypt the result
    pub fn run<S: BallotSource>(mut self, source: &mut S) -> Result<TallyResult, S::Error> {
        loop {
            match self.state() {
                TallyState::Finalized => return Ok(self.finalize()?),
                TallyState::RoundStart { .. } | TallyState::RoundComplete { .. } => {
                    self.begin_round()?;
                    if let TallyState::Voting { round, .. } = self.state() {
                        source.round_started(round);
                    }
                }
                TallyState::Voting { round, candidate } => {
                    let vote = source.vote(round, candidate)?;
                    let outcome = self.cast(vote)?;
                    if !matches!(outcome, CastOutcome::Next { .. }) {
                        source.round_finished(&outcome, &self.totals);
                    }
                }
                TallyState::RoundClosing { .. } => {
                    return Err(PaillierError::ProtocolViolation("round left half closed").into())
                }
            }
        }
    }

    /// Fold every round ciphertext that decrypts to 0 into its
    /// candidate's running total
    fn close_round(&mut self, winner: usize) -> PaillierResult<()> {
        for candidate in 0..self.config.candidates {
            if candidate == winner {
                continue;
            }
            if self.keys.decrypt(&self.round_ciphertexts[candidate])?.is_zero() {
                self.totals[candidate] = self
                    .keys
                    .combine(&self.round_ciphertexts[candidate], &self.totals[candidate])?;
            }
        }
        Ok(())
    }

    /// A round is valid when some round ciphertext decrypts to a
    /// positive value, otherwise it starts over
    fn complete_round(&mut self, round: usize) -> PaillierResult<CastOutcome> {
        let zero = BigNumber::zero();
        let mut winner = None;
        for (candidate, c) in self.round_ciphertexts.iter().enumerate() {
            if self.keys.decrypt(c)? > zero {
                winner = Some(candidate);
                break;
            }
        }

        match winner {
            Some(winner) => {
                self.state = if round + 1 == self.config.rounds {
                    TallyState::Finalized
                } else {
                    TallyState::RoundComplete { round, winner }
                };
                debug!(round, "round closed");
                Ok(CastOutcome::RoundClosed { round, winner })
            }
            None => {
                self.state = TallyState::RoundStart { round };
                warn!(round, "no candidate received a vote, repeating round");
                Ok(CastOutcome::RoundRejected { round })
            }
        }
    }

    fn encrypted_zeros(&mut self) -> PaillierResult<Vec<Ciphertext>> {
        let zero = BigNumber::zero();
        (0..self.config.candidates)
            .map(|_| self.encrypt(&zero))
            .collect()
    }

    fn encrypt(&mut self, m: &BigNumber) -> PaillierResult<Ciphertext> {
        self.keys.encrypt_with_rng(m, &mut self.rng)
    }
}
