//! Mock implementations for testing

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use splitcord_domain::{GuildId, MemberId, Silver};

use crate::{
    error::StorageError,
    model::{DebitOutcome, TransferOutcome},
    ports::LedgerStore,
};

/// In-memory `LedgerStore` with the same outcome semantics as the real
/// one, plus a switch to make every operation fail like a dead pool.
#[derive(Clone, Default)]
pub struct MockLedger {
    balances: Arc<Mutex<HashMap<(GuildId, MemberId), i64>>>,
    outage: Arc<Mutex<Option<String>>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(self, guild: GuildId, member: MemberId, amount: i64) -> Self {
        self.balances
            .lock()
            .unwrap()
            .insert((guild, member), amount);
        self
    }

    pub fn balance_of(&self, guild: GuildId, member: MemberId) -> i64 {
        *self
            .balances
            .lock()
            .unwrap()
            .get(&(guild, member))
            .unwrap_or(&0)
    }

    pub fn fail_storage(&self, cause: &str) {
        *self.outage.lock().unwrap() = Some(cause.to_owned());
    }

    pub fn heal_storage(&self) {
        *self.outage.lock().unwrap() = None;
    }

    fn check_outage(&self) -> Result<(), StorageError> {
        match self.outage.lock().unwrap().as_deref() {
            Some(cause) => Err(StorageError::new(cause)),
            None => Ok(()),
        }
    }
}

impl LedgerStore for MockLedger {
    async fn balance(&self, guild: GuildId, member: MemberId) -> Result<Silver, StorageError> {
        self.check_outage()?;
        Ok(Silver::from_i64(self.balance_of(guild, member)))
    }

    async fn credit(
        &self,
        guild: GuildId,
        member: MemberId,
        amount: Silver,
    ) -> Result<Silver, StorageError> {
        self.check_outage()?;
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry((guild, member)).or_insert(0);
        *balance += amount.amount();
        Ok(Silver::from_i64(*balance))
    }

    async fn debit(
        &self,
        guild: GuildId,
        member: MemberId,
        amount: Silver,
    ) -> Result<DebitOutcome, StorageError> {
        self.check_outage()?;
        let mut balances = self.balances.lock().unwrap();
        let balance = balances.entry((guild, member)).or_insert(0);
        if *balance < amount.amount() {
            return Ok(DebitOutcome::InsufficientFunds {
                balance: Silver::from_i64(*balance),
            });
        }
        *balance -= amount.amount();
        Ok(DebitOutcome::Applied {
            balance: Silver::from_i64(*balance),
        })
    }

    async fn set_balance(
        &self,
        guild: GuildId,
        member: MemberId,
        value: Silver,
    ) -> Result<(), StorageError> {
        self.check_outage()?;
        self.balances
            .lock()
            .unwrap()
            .insert((guild, member), value.amount());
        Ok(())
    }

    async fn transfer(
        &self,
        guild: GuildId,
        source: MemberId,
        destination: MemberId,
        amount: Silver,
    ) -> Result<TransferOutcome, StorageError> {
        self.check_outage()?;
        let mut balances = self.balances.lock().unwrap();
        let source_balance = *balances.get(&(guild, source)).unwrap_or(&0);
        if source_balance < amount.amount() {
            return Ok(TransferOutcome::InsufficientFunds {
                balance: Silver::from_i64(source_balance),
            });
        }
        balances.insert((guild, source), source_balance - amount.amount());
        let destination_balance = balances.entry((guild, destination)).or_insert(0);
        *destination_balance += amount.amount();
        Ok(TransferOutcome::Applied {
            source_balance: Silver::from_i64(source_balance - amount.amount()),
            destination_balance: Silver::from_i64(*destination_balance),
        })
    }

    async fn credit_each(
        &self,
        guild: GuildId,
        members: Vec<MemberId>,
        amount: Silver,
    ) -> Result<(), StorageError> {
        self.check_outage()?;
        let mut balances = self.balances.lock().unwrap();
        for member in members {
            *balances.entry((guild, member)).or_insert(0) += amount.amount();
        }
        Ok(())
    }
}
