//! Bets, balance and win amounts

use serde::{Deserialize, Serialize};

/// Allowed bet amounts, ascending
pub const STANDARD_BET_AMOUNTS: [u64; 7] = [10, 20, 50, 100, 200, 500, 1000];

/// Authoritative player balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    current: u64,
    starting: u64,
}

impl Wallet {
    pub fn new(starting: u64) -> Self {
        Self {
            current: starting,
            starting,
        }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn starting(&self) -> u64 {
        self.starting
    }

    pub fn has_enough(&self, amount: u64) -> bool {
        self.current >= amount
    }

    /// Debit `amount`. Returns false and leaves the balance untouched if short.
    pub fn spend(&mut self, amount: u64) -> bool {
        if !self.has_enough(amount) {
            return false;
        }
        self.current -= amount;
        true
    }

    pub fn add(&mut self, amount: u64) {
        self.current = self.current.saturating_add(amount);
    }

    pub fn reset(&mut self, amount: u64) {
        self.current = amount;
    }

    /// Back to the starting balance
    pub fn reset_to_start(&mut self) {
        self.current = self.starting;
    }
}

/// Bet selection and the cumulative total feeding the jackpot meter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetLedger {
    amounts: Vec<u64>,
    index: usize,
    cumulative: u64,
}

impl BetLedger {
    /// `amounts` must be non-empty and ascending; the index is clamped
    pub fn new(amounts: Vec<u64>, starting_index: usize) -> Self {
        let index = starting_index.min(amounts.len().saturating_sub(1));
        Self {
            amounts,
            index,
            cumulative: 0,
        }
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_BET_AMOUNTS.to_vec(), 0)
    }

    pub fn amounts(&self) -> &[u64] {
        &self.amounts
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Currently selected bet
    pub fn bet_amount(&self) -> u64 {
        self.amounts.get(self.index).copied().unwrap_or(0)
    }

    /// Smallest bet; the unit payouts are expressed in
    pub fn base_bet(&self) -> u64 {
        self.amounts.first().copied().unwrap_or(0)
    }

    /// Current bet as a multiple of the base bet
    pub fn bet_multiplier(&self) -> f64 {
        match self.base_bet() {
            0 => 0.0,
            base => self.bet_amount() as f64 / base as f64,
        }
    }

    pub fn can_increase(&self) -> bool {
        self.index + 1 < self.amounts.len()
    }

    pub fn can_decrease(&self) -> bool {
        self.index > 0
    }

    /// Step up one bet level. Returns false at the top.
    pub fn increase_bet(&mut self) -> bool {
        if !self.can_increase() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Step down one bet level. Returns false at the bottom.
    pub fn decrease_bet(&mut self) -> bool {
        if !self.can_decrease() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Select a bet level directly (clamped)
    pub fn set_index(&mut self, index: usize) {
        self.index = index.min(self.amounts.len().saturating_sub(1));
    }

    /// Debit the current bet and add it to the cumulative total. On
    /// insufficient balance nothing changes and false is returned.
    pub fn place_bet(&mut self, wallet: &mut Wallet) -> bool {
        let bet = self.bet_amount();
        if !wallet.spend(bet) {
            return false;
        }
        self.cumulative += bet;
        true
    }

    /// Total bet since the last jackpot or reset
    pub fn cumulative(&self) -> u64 {
        self.cumulative
    }

    pub fn reset_cumulative(&mut self) {
        self.cumulative = 0;
    }

    /// Bet still needed before the jackpot arms
    pub fn remaining_to_jackpot(&self, threshold: u64) -> u64 {
        threshold.saturating_sub(self.cumulative)
    }

    /// `base_bet × final_multiplier × bet_multiplier`, rounded half to even
    pub fn calculate_win_amount(&self, final_multiplier: f64) -> u64 {
        let raw = self.base_bet() as f64 * final_multiplier * self.bet_multiplier();
        raw.max(0.0).round_ties_even() as u64
    }
}

impl Default for BetLedger {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_spend_and_add() {
        let mut wallet = Wallet::new(1000);
        assert!(wallet.spend(10));
        assert_eq!(wallet.current(), 990);

        assert!(!wallet.spend(5000));
        assert_eq!(wallet.current(), 990);

        wallet.add(60);
        assert_eq!(wallet.current(), 1050);

        wallet.reset_to_start();
        assert_eq!(wallet.current(), 1000);
    }

    #[test]
    fn test_place_bet_insufficient_funds() {
        let mut ledger = BetLedger::standard();
        let mut wallet = Wallet::new(5);

        assert!(!ledger.place_bet(&mut wallet));
        assert_eq!(wallet.current(), 5);
        assert_eq!(ledger.cumulative(), 0);
    }

    #[test]
    fn test_place_bet_accumulates() {
        let mut ledger = BetLedger::standard();
        let mut wallet = Wallet::new(1000);

        assert!(ledger.place_bet(&mut wallet));
        ledger.increase_bet();
        assert!(ledger.place_bet(&mut wallet));

        assert_eq!(wallet.current(), 970);
        assert_eq!(ledger.cumulative(), 30);
        assert_eq!(ledger.remaining_to_jackpot(3000), 2970);

        ledger.reset_cumulative();
        assert_eq!(ledger.cumulative(), 0);
    }

    #[test]
    fn test_bet_stepping_clamps() {
        let mut ledger = BetLedger::standard();
        assert!(!ledger.can_decrease());
        assert!(!ledger.decrease_bet());
        assert_eq!(ledger.bet_amount(), 10);

        for _ in 0..10 {
            ledger.increase_bet();
        }
        assert_eq!(ledger.bet_amount(), 1000);
        assert!(!ledger.can_increase());
        assert!(!ledger.increase_bet());

        assert!(ledger.decrease_bet());
        assert_eq!(ledger.bet_amount(), 500);
    }

    #[test]
    fn test_bet_multiplier() {
        let mut ledger = BetLedger::standard();
        assert_eq!(ledger.bet_multiplier(), 1.0);
        ledger.set_index(3);
        assert_eq!(ledger.bet_multiplier(), 10.0);
        ledger.set_index(99);
        assert_eq!(ledger.bet_amount(), 1000);
    }

    #[test]
    fn test_calculate_win_amount() {
        let mut ledger = BetLedger::standard();

        // XL (3.0) on a 2.0 symbol at base bet
        assert_eq!(ledger.calculate_win_amount(3.0 * 2.0), 60);
        // 1.0 pattern on a 1.0 symbol
        assert_eq!(ledger.calculate_win_amount(1.0), 10);

        ledger.set_index(2);
        // bet 50: 10 × 2.0 × 5
        assert_eq!(ledger.calculate_win_amount(2.0), 100);

        ledger.set_index(1);
        // 10 × 0.5 × 2 = 10
        assert_eq!(ledger.calculate_win_amount(0.5), 10);
        ledger.set_index(4);
        // 잭팟 (10.0) on a 5.0 symbol at bet 200: 10 × 50 × 20
        assert_eq!(ledger.calculate_win_amount(50.0), 10_000);
    }

    #[test]
    fn test_win_amount_rounds_half_to_even() {
        let ledger = BetLedger::new(vec![1, 2], 0);
        assert_eq!(ledger.calculate_win_amount(2.5), 2);
        assert_eq!(ledger.calculate_win_amount(3.5), 4);
    }
}
