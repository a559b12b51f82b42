//! Coin ledger with earned/spent running totals.
//!
//! The ledger is value-semantic: `credit`/`debit` return the updated copy and
//! the session service decides when an update becomes the authoritative
//! state. This keeps compound transactions (history append + credit) able to
//! discard a computed ledger when a later step fails.

use serde::{Deserialize, Serialize};

/// Errors raised by ledger mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A debit exceeded the available balance.
    #[error("insufficient funds: requested {requested}, balance {balance}")]
    InsufficientFunds { requested: u64, balance: u64 },
}

/// Coin balance with lifetime earned/spent totals.
///
/// ## Invariants
/// - `balance == total_earned - total_spent` after every mutation, including
///   deserialisation from a persisted snapshot.
///
/// # Examples
/// ```
/// use fitcoin_app::domain::CoinLedger;
///
/// let ledger = CoinLedger::default().credit(500);
/// let ledger = ledger.debit(500)?;
/// assert_eq!(ledger.balance(), 0);
/// assert_eq!(ledger.total_earned(), 500);
/// assert_eq!(ledger.total_spent(), 500);
/// # Ok::<(), fitcoin_app::domain::LedgerError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "LedgerDto", into = "LedgerDto")]
pub struct CoinLedger {
    balance: u64,
    total_earned: u64,
    total_spent: u64,
}

impl CoinLedger {
    /// Coins currently available to spend.
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Lifetime coins earned.
    pub fn total_earned(&self) -> u64 {
        self.total_earned
    }

    /// Lifetime coins spent.
    pub fn total_spent(&self) -> u64 {
        self.total_spent
    }

    /// Returns the ledger with `amount` added to balance and earned total.
    #[must_use]
    pub fn credit(self, amount: u64) -> Self {
        Self {
            balance: self.balance.saturating_add(amount),
            total_earned: self.total_earned.saturating_add(amount),
            total_spent: self.total_spent,
        }
    }

    /// Returns the ledger with `amount` moved from balance to spent total.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InsufficientFunds`] when `amount` exceeds the balance;
    /// the ledger is untouched.
    pub fn debit(self, amount: u64) -> Result<Self, LedgerError> {
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                balance: self.balance,
            });
        }
        Ok(Self {
            balance: self.balance - amount,
            total_earned: self.total_earned,
            total_spent: self.total_spent.saturating_add(amount),
        })
    }
}

/// Error raised when a persisted ledger violates the balance invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("ledger invariant violated: balance {balance} != earned {total_earned} - spent {total_spent}")]
pub struct LedgerInvariantError {
    balance: u64,
    total_earned: u64,
    total_spent: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerDto {
    balance: u64,
    total_earned: u64,
    total_spent: u64,
}

impl From<CoinLedger> for LedgerDto {
    fn from(value: CoinLedger) -> Self {
        Self {
            balance: value.balance,
            total_earned: value.total_earned,
            total_spent: value.total_spent,
        }
    }
}

impl TryFrom<LedgerDto> for CoinLedger {
    type Error = LedgerInvariantError;

    fn try_from(value: LedgerDto) -> Result<Self, Self::Error> {
        let expected = value.total_earned.checked_sub(value.total_spent);
        if expected != Some(value.balance) {
            return Err(LedgerInvariantError {
                balance: value.balance,
                total_earned: value.total_earned,
                total_spent: value.total_spent,
            });
        }
        Ok(Self {
            balance: value.balance,
            total_earned: value.total_earned,
            total_spent: value.total_spent,
        })
    }
}
