use crate::ports::{StakeToken, TokenError};
use parking_lot::RwLock;
use shared_types::{Pubkey, TokenAmount};
use std::collections::HashMap;
use tracing::trace;

/// In-memory token ledger for a single mint.
pub struct InMemoryStakeToken {
    mint: Pubkey,
    balances: RwLock<HashMap<Pubkey, TokenAmount>>,
}

impl InMemoryStakeToken {
    pub fn new(mint: Pubkey) -> Self {
        Self {
            mint,
            balances: RwLock::new(HashMap::new()),
        }
    }

    /// Credit `amount` out of thin air (genesis funding, tests).
    pub fn mint_to(&self, account: &Pubkey, amount: TokenAmount) -> Result<(), TokenError> {
        let mut balances = self.balances.write();
        let balance = balances.entry(*account).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(TokenError::Overflow { account: *account })?;
        Ok(())
    }

    /// Sum of all balances, saturating at `TokenAmount::MAX`.
    pub fn total_supply(&self) -> TokenAmount {
        self.balances
            .read()
            .values()
            .fold(0, |total: TokenAmount, b| total.saturating_add(*b))
    }
}

impl StakeToken for InMemoryStakeToken {
    fn mint(&self) -> Pubkey {
        self.mint
    }

    fn balance(&self, account: &Pubkey) -> TokenAmount {
        self.balances.read().get(account).copied().unwrap_or(0)
    }

    fn transfer(&self, from: &Pubkey, to: &Pubkey, amount: TokenAmount) -> Result<(), TokenError> {
        let mut balances = self.balances.write();
        let available = balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(TokenError::InsufficientFunds {
                account: *from,
                required: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = balances
            .get(to)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(TokenError::Overflow { account: *to })?;
        balances.insert(*from, available - amount);
        balances.insert(*to, credited);
        trace!(from = %from.short(), to = %to.short(), amount, "token transfer");
        Ok(())
    }
}
