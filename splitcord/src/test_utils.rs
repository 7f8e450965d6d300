//! Mock implementations for testing

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use splitcord_application::{
    DebitOutcome, InputField, LedgerStore, PanelRejection, PanelRetire, PanelSurface, PanelView,
    StorageError, SurfaceError, TransferOutcome,
};
use splitcord_domain::{GuildId, MemberId, Silver};

/// In-memory `LedgerStore` for wiring tests that only need the trait
/// bounds satisfied.
#[derive(Clone, Default)]
pub struct MockLedger {
    balances: Arc<Mutex<HashMap<(GuildId, MemberId), i64>>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MockLedger {
    async fn balance(&self, guild: GuildId, member: MemberId) -> Result<Silver, StorageError> {
        let balances = self.balances.lock().unwrap();
        Ok(Silver::from_i64(
            *balances.get(&(guild, member)).unwrap_or(&0),
        ))
    }

    async fn credit(
        &self,
        guild: GuildId,
        member: MemberId,
        amount: Silver,
    ) -> Result<Silver, StorageError> {
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
        let mut balances = self.balances.lock().unwrap();
        for member in members {
            *balances.entry((guild, member)).or_insert(0) += amount.amount();
        }
        Ok(())
    }
}

/// `PanelSurface` that renders nowhere; the `()` cue keeps registry tests
/// free of Discord values.
pub struct NullSurface;

impl PanelSurface for NullSurface {
    type Cue = ();

    async fn refresh(&self, _view: &PanelView, _cue: &mut ()) -> Result<(), SurfaceError> {
        Ok(())
    }

    async fn reject(&self, _rejection: &PanelRejection, _cue: &mut ()) -> Result<(), SurfaceError> {
        Ok(())
    }

    async fn collect_value(
        &self,
        _field: InputField,
        _cue: &mut (),
    ) -> Result<Option<String>, SurfaceError> {
        Ok(None)
    }

    async fn retire(
        &self,
        _view: &PanelView,
        _reason: PanelRetire,
        _cue: Option<&mut ()>,
    ) -> Result<(), SurfaceError> {
        Ok(())
    }
}
