use splitcord_domain::{GuildId, MemberId, Silver};

use crate::{
    error::TransferError,
    model::{
        DebitOutcome, PayoutReceipt, PayoutRequest, SetBalanceRequest, TransferOutcome,
        TransferReceipt, TransferRequest,
    },
    ports::LedgerStore,
};

/// Ledger use cases. All precondition checks happen here, before any row
/// lock is taken; the store only ever sees requests that are well-formed.
pub struct TransferCoordinator<L: LedgerStore> {
    ledger: L,
}

impl<L: LedgerStore> TransferCoordinator<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub async fn transfer(
        &self,
        request: TransferRequest,
    ) -> Result<TransferReceipt, TransferError> {
        request.validate()?;

        let outcome = self
            .ledger
            .transfer(
                request.guild,
                request.source,
                request.destination,
                request.amount,
            )
            .await?;

        match outcome {
            TransferOutcome::Applied {
                source_balance,
                destination_balance,
            } => {
                tracing::info!(
                    guild = %request.guild,
                    source = %request.source,
                    destination = %request.destination,
                    amount = %request.amount,
                    correlation = %request.correlation,
                    "transfer applied"
                );
                Ok(TransferReceipt {
                    source: request.source,
                    destination: request.destination,
                    amount: request.amount,
                    source_balance,
                    destination_balance,
                })
            }
            TransferOutcome::InsufficientFunds { balance } => {
                Err(TransferError::InsufficientFunds { balance })
            }
        }
    }

    /// Records that the guild handed a member their silver in game; the
    /// ledger balance drops accordingly.
    pub async fn payout(&self, request: PayoutRequest) -> Result<PayoutReceipt, TransferError> {
        request.validate()?;

        match self
            .ledger
            .debit(request.guild, request.member, request.amount)
            .await?
        {
            DebitOutcome::Applied { balance } => {
                tracing::info!(
                    guild = %request.guild,
                    member = %request.member,
                    amount = %request.amount,
                    correlation = %request.correlation,
                    "payout recorded"
                );
                Ok(PayoutReceipt {
                    member: request.member,
                    amount: request.amount,
                    balance,
                })
            }
            DebitOutcome::InsufficientFunds { balance } => {
                Err(TransferError::InsufficientFunds { balance })
            }
        }
    }

    pub async fn set_balance(&self, request: SetBalanceRequest) -> Result<Silver, TransferError> {
        request.validate()?;

        self.ledger
            .set_balance(request.guild, request.member, request.value)
            .await?;
        tracing::info!(
            guild = %request.guild,
            member = %request.member,
            value = %request.value,
            correlation = %request.correlation,
            "balance overwritten"
        );
        Ok(request.value)
    }

    pub async fn balance(
        &self,
        guild: GuildId,
        member: MemberId,
    ) -> Result<Silver, TransferError> {
        Ok(self.ledger.balance(guild, member).await?)
    }
}
