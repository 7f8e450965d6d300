use splitcord_application::{DebitOutcome, LedgerStore, StorageError, TransferOutcome};
use splitcord_domain::{GuildId, MemberId, Silver};
use sqlx::{PgPool, Postgres, Transaction};

use crate::db::Database;

/// `LedgerStore` over the `guild_balances` table. Every mutation is a
/// single statement or a single transaction, so partial states never
/// become durable; the CHECK constraint backs up the no-negative rule
/// even against bugs here.
#[derive(Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(database: &Database) -> Self {
        Self {
            pool: database.pool().clone(),
        }
    }
}

// Snowflakes are stored bit-for-bit as BIGINT.
fn guild_key(guild: GuildId) -> i64 {
    guild.0 as i64
}

fn member_key(member: MemberId) -> i64 {
    member.0 as i64
}

/// Locks one row and reads its balance; an absent row reads as zero and
/// stays absent.
async fn lock_row(
    tx: &mut Transaction<'_, Postgres>,
    guild: GuildId,
    member: MemberId,
) -> Result<i64, StorageError> {
    let balance: Option<i64> = sqlx::query_scalar(
        "SELECT balance FROM guild_balances
         WHERE guild_id = $1 AND member_id = $2
         FOR UPDATE",
    )
    .bind(guild_key(guild))
    .bind(member_key(member))
    .fetch_optional(&mut **tx)
    .await
    .map_err(StorageError::new)?;
    Ok(balance.unwrap_or(0))
}

/// Locks one row, creating it at zero when absent. The conflict arm is a
/// self-assignment rather than `DO NOTHING`, which takes no row lock; a
/// fresh row is locked by its own insert.
async fn lock_or_create_row(
    tx: &mut Transaction<'_, Postgres>,
    guild: GuildId,
    member: MemberId,
) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO guild_balances (guild_id, member_id, balance)
         VALUES ($1, $2, 0)
         ON CONFLICT (guild_id, member_id)
         DO UPDATE SET balance = guild_balances.balance",
    )
    .bind(guild_key(guild))
    .bind(member_key(member))
    .execute(&mut **tx)
    .await
    .map_err(StorageError::new)?;
    Ok(())
}

impl LedgerStore for PgLedgerStore {
    async fn balance(&self, guild: GuildId, member: MemberId) -> Result<Silver, StorageError> {
        let balance: Option<i64> = sqlx::query_scalar(
            "SELECT balance FROM guild_balances WHERE guild_id = $1 AND member_id = $2",
        )
        .bind(guild_key(guild))
        .bind(member_key(member))
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::new)?;
        Ok(Silver::from_i64(balance.unwrap_or(0)))
    }

    async fn credit(
        &self,
        guild: GuildId,
        member: MemberId,
        amount: Silver,
    ) -> Result<Silver, StorageError> {
        debug_assert!(amount.is_positive());

        let balance: i64 = sqlx::query_scalar(
            "INSERT INTO guild_balances (guild_id, member_id, balance)
             VALUES ($1, $2, $3)
             ON CONFLICT (guild_id, member_id)
             DO UPDATE SET balance = guild_balances.balance + EXCLUDED.balance
             RETURNING balance",
        )
        .bind(guild_key(guild))
        .bind(member_key(member))
        .bind(amount.amount())
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::new)?;
        Ok(Silver::from_i64(balance))
    }

    async fn debit(
        &self,
        guild: GuildId,
        member: MemberId,
        amount: Silver,
    ) -> Result<DebitOutcome, StorageError> {
        debug_assert!(amount.is_positive());

        let mut tx = self.pool.begin().await.map_err(StorageError::new)?;

        let balance = lock_row(&mut tx, guild, member).await?;
        if balance < amount.amount() {
            tx.rollback().await.map_err(StorageError::new)?;
            return Ok(DebitOutcome::InsufficientFunds {
                balance: Silver::from_i64(balance),
            });
        }

        let remaining: i64 = sqlx::query_scalar(
            "UPDATE guild_balances SET balance = balance - $3
             WHERE guild_id = $1 AND member_id = $2
             RETURNING balance",
        )
        .bind(guild_key(guild))
        .bind(member_key(member))
        .bind(amount.amount())
        .fetch_one(&mut *tx)
        .await
        .map_err(StorageError::new)?;

        tx.commit().await.map_err(StorageError::new)?;
        Ok(DebitOutcome::Applied {
            balance: Silver::from_i64(remaining),
        })
    }

    async fn set_balance(
        &self,
        guild: GuildId,
        member: MemberId,
        value: Silver,
    ) -> Result<(), StorageError> {
        debug_assert!(!value.is_negative());

        sqlx::query(
            "INSERT INTO guild_balances (guild_id, member_id, balance)
             VALUES ($1, $2, $3)
             ON CONFLICT (guild_id, member_id)
             DO UPDATE SET balance = EXCLUDED.balance",
        )
        .bind(guild_key(guild))
        .bind(member_key(member))
        .bind(value.amount())
        .execute(&self.pool)
        .await
        .map_err(StorageError::new)?;
        Ok(())
    }

    async fn transfer(
        &self,
        guild: GuildId,
        source: MemberId,
        destination: MemberId,
        amount: Silver,
    ) -> Result<TransferOutcome, StorageError> {
        debug_assert!(amount.is_positive());
        debug_assert_ne!(source, destination);

        let mut tx = self.pool.begin().await.map_err(StorageError::new)?;

        // Lock in ascending member-id order whichever way the silver
        // flows; opposing transfers then queue instead of deadlocking.
        // A missing destination row is created by its own lock statement,
        // at its slot in that order, and a rollback takes the creation
        // with it.
        let source_balance = if source.0 < destination.0 {
            let balance = lock_row(&mut tx, guild, source).await?;
            lock_or_create_row(&mut tx, guild, destination).await?;
            balance
        } else {
            lock_or_create_row(&mut tx, guild, destination).await?;
            lock_row(&mut tx, guild, source).await?
        };

        if source_balance < amount.amount() {
            tx.rollback().await.map_err(StorageError::new)?;
            return Ok(TransferOutcome::InsufficientFunds {
                balance: Silver::from_i64(source_balance),
            });
        }

        let source_after: i64 = sqlx::query_scalar(
            "UPDATE guild_balances SET balance = balance - $3
             WHERE guild_id = $1 AND member_id = $2
             RETURNING balance",
        )
        .bind(guild_key(guild))
        .bind(member_key(source))
        .bind(amount.amount())
        .fetch_one(&mut *tx)
        .await
        .map_err(StorageError::new)?;

        let destination_after: i64 = sqlx::query_scalar(
            "UPDATE guild_balances SET balance = balance + $3
             WHERE guild_id = $1 AND member_id = $2
             RETURNING balance",
        )
        .bind(guild_key(guild))
        .bind(member_key(destination))
        .bind(amount.amount())
        .fetch_one(&mut *tx)
        .await
        .map_err(StorageError::new)?;

        tx.commit().await.map_err(StorageError::new)?;
        Ok(TransferOutcome::Applied {
            source_balance: Silver::from_i64(source_after),
            destination_balance: Silver::from_i64(destination_after),
        })
    }

    async fn credit_each(
        &self,
        guild: GuildId,
        mut members: Vec<MemberId>,
        amount: Silver,
    ) -> Result<(), StorageError> {
        debug_assert!(amount.is_positive());

        // Ascending id order is the lock canon shared with `transfer`;
        // it is established here, not trusted from the caller. Dedup
        // keeps a member from being credited twice in one call.
        members.sort_unstable();
        members.dedup();

        let mut tx = self.pool.begin().await.map_err(StorageError::new)?;
        for member in members {
            sqlx::query(
                "INSERT INTO guild_balances (guild_id, member_id, balance)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (guild_id, member_id)
                 DO UPDATE SET balance = guild_balances.balance + EXCLUDED.balance",
            )
            .bind(guild_key(guild))
            .bind(member_key(member))
            .bind(amount.amount())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::new)?;
        }
        tx.commit().await.map_err(StorageError::new)?;
        Ok(())
    }
}
