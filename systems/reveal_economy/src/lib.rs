#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reveal currency bookkeeping.
//!
//! The economy owns the long-lived reveal balance together with the per-round
//! flags that gate spending and bonus grants. The balance survives round
//! changes; the flags are cleared whenever a new round starts.

use color_match_core::{BonusGate, RevealError, INITIAL_REVEALS};

/// Reveal balance plus the per-round state that gates grants and spends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealEconomy {
    reveal_count: u32,
    revealed_this_round: bool,
    submitted_this_round: bool,
    gate: BonusGate,
}

impl RevealEconomy {
    /// Creates an economy holding `reveal_count` reveals at the start of a round.
    #[must_use]
    pub const fn new(reveal_count: u32, gate: BonusGate) -> Self {
        Self {
            reveal_count,
            revealed_this_round: false,
            submitted_this_round: false,
            gate,
        }
    }

    /// Current reveal balance.
    #[must_use]
    pub const fn reveal_count(&self) -> u32 {
        self.reveal_count
    }

    /// Indicates whether the active round's target has been revealed.
    #[must_use]
    pub const fn revealed_this_round(&self) -> bool {
        self.revealed_this_round
    }

    /// Bonus gate the economy enforces.
    #[must_use]
    pub const fn gate(&self) -> BonusGate {
        self.gate
    }

    /// Reports whether [`RevealEconomy::spend`] would succeed.
    #[must_use]
    pub const fn can_reveal(&self) -> bool {
        self.reveal_count > 0 && !self.revealed_this_round
    }

    /// Records a submission and grants one reveal when `bonus_earned` holds.
    ///
    /// Nothing is granted once the target has been revealed this round. Under
    /// [`BonusGate::FirstSubmission`] only the first submission of the round is
    /// eligible, so repeated submits cannot farm reveals. Returns whether a
    /// reveal was granted.
    pub fn grant_on_bonus(&mut self, bonus_earned: bool) -> bool {
        let first_submission = !self.submitted_this_round;
        self.submitted_this_round = true;

        if !bonus_earned || self.revealed_this_round {
            return false;
        }

        if self.gate == BonusGate::FirstSubmission && !first_submission {
            return false;
        }

        self.reveal_count = self.reveal_count.saturating_add(1);
        true
    }

    /// Spends one reveal for the active round.
    ///
    /// A refused spend leaves the economy untouched.
    pub fn spend(&mut self) -> Result<(), RevealError> {
        if self.reveal_count == 0 {
            return Err(RevealError::NoRevealsLeft);
        }

        if self.revealed_this_round {
            return Err(RevealError::AlreadyRevealed);
        }

        self.reveal_count -= 1;
        self.revealed_this_round = true;
        Ok(())
    }

    /// Clears the per-round flags when a new round begins.
    pub fn start_round(&mut self) {
        self.revealed_this_round = false;
        self.submitted_this_round = false;
    }

    /// Restores the balance granted to a fresh session.
    pub fn reset_balance(&mut self) {
        self.reveal_count = INITIAL_REVEALS;
    }
}

impl Default for RevealEconomy {
    fn default() -> Self {
        Self::new(INITIAL_REVEALS, BonusGate::default())
    }
}
