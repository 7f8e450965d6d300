use std::{fmt, time::Duration};

use splitcord_domain::{GuildId, MemberId, Silver};
use uuid::Uuid;

use crate::error::TransferError;

/// Opaque name of a live split session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minted once per command dispatch; ties a user-visible failure notice
/// to the matching log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Human,
    Bot,
}

/// What the user clicked on a confirmation prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Confirmed,
    Cancelled,
}

/// How a confirmation prompt ended; drives the terminal rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmationVerdict {
    Confirmed,
    Cancelled,
    TimedOut,
}

pub struct ConfirmationRequest {
    pub initiator: MemberId,
    pub text: String,
    pub timeout: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferOutcome {
    Applied {
        source_balance: Silver,
        destination_balance: Silver,
    },
    InsufficientFunds {
        balance: Silver,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebitOutcome {
    Applied { balance: Silver },
    InsufficientFunds { balance: Silver },
}

#[derive(Clone, Copy, Debug)]
pub struct TransferRequest {
    pub guild: GuildId,
    pub source: MemberId,
    pub destination: MemberId,
    pub destination_kind: MemberKind,
    pub amount: Silver,
    pub correlation: CorrelationId,
}

impl TransferRequest {
    /// The checks that need no ledger access. The coordinator runs them
    /// before any row lock; the command layer runs them again before
    /// even prompting, so obvious mistakes never see a Confirm button.
    pub fn validate(&self) -> Result<(), TransferError> {
        if !self.amount.is_positive() {
            return Err(TransferError::NonPositiveAmount);
        }
        if self.source == self.destination {
            return Err(TransferError::SelfTransfer);
        }
        if self.destination_kind == MemberKind::Bot {
            return Err(TransferError::BotRecipient);
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PayoutRequest {
    pub guild: GuildId,
    pub member: MemberId,
    pub amount: Silver,
    pub correlation: CorrelationId,
}

impl PayoutRequest {
    pub fn validate(&self) -> Result<(), TransferError> {
        if !self.amount.is_positive() {
            return Err(TransferError::NonPositiveAmount);
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SetBalanceRequest {
    pub guild: GuildId,
    pub member: MemberId,
    pub value: Silver,
    pub correlation: CorrelationId,
}

impl SetBalanceRequest {
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.value.is_negative() {
            return Err(TransferError::NegativeBalance);
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferReceipt {
    pub source: MemberId,
    pub destination: MemberId,
    pub amount: Silver,
    pub source_balance: Silver,
    pub destination_balance: Silver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayoutReceipt {
    pub member: MemberId,
    pub amount: Silver,
    pub balance: Silver,
}
