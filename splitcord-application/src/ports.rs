use std::future::Future;

use splitcord_domain::{GuildId, MemberId, Silver};

use crate::{
    error::{StorageError, SurfaceError},
    model::{ConfirmationRequest, ConfirmationVerdict, DebitOutcome, Decision, TransferOutcome},
    panel::{InputField, PanelRejection, PanelRetire, PanelView},
};

/// Durable balance store. A `(guild, member)` pair with no row reads as
/// zero; rows come into being on first credit. Implementations must keep
/// every operation atomic under concurrent use and must never let a
/// balance go negative.
pub trait LedgerStore: Clone + Send + Sync + 'static {
    fn balance(
        &self,
        guild: GuildId,
        member: MemberId,
    ) -> impl Future<Output = Result<Silver, StorageError>> + Send;

    /// `amount` must be positive (caller-checked). Returns the new balance.
    fn credit(
        &self,
        guild: GuildId,
        member: MemberId,
        amount: Silver,
    ) -> impl Future<Output = Result<Silver, StorageError>> + Send;

    /// `amount` must be positive (caller-checked). Insufficient funds is a
    /// normal outcome and leaves the row untouched.
    fn debit(
        &self,
        guild: GuildId,
        member: MemberId,
        amount: Silver,
    ) -> impl Future<Output = Result<DebitOutcome, StorageError>> + Send;

    /// `value` must be non-negative (caller-checked). Overwrites.
    fn set_balance(
        &self,
        guild: GuildId,
        member: MemberId,
        value: Silver,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Atomic debit-plus-credit. Rows are locked in ascending member-id
    /// order whichever way the silver flows, so opposing transfers cannot
    /// deadlock. On insufficient funds nothing is mutated, not even
    /// implicit row creation.
    fn transfer(
        &self,
        guild: GuildId,
        source: MemberId,
        destination: MemberId,
        amount: Silver,
    ) -> impl Future<Output = Result<TransferOutcome, StorageError>> + Send;

    /// Credits the same positive amount to every listed member, all or
    /// nothing. Input order and duplicates do not matter: row locks
    /// follow the same ascending member-id order as `transfer`, and a
    /// member listed twice is credited once.
    fn credit_each(
        &self,
        guild: GuildId,
        members: Vec<MemberId>,
        amount: Silver,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Where confirmation prompts live. `decision` resolves at most once, only
/// for the given initiator; input from anyone else is ignored without
/// consuming the wait.
pub trait ConfirmationSurface: Send + Sync {
    type Prompt: Send;

    fn present(
        &self,
        request: &ConfirmationRequest,
    ) -> impl Future<Output = Result<Self::Prompt, SurfaceError>> + Send;

    fn decision(
        &self,
        prompt: &Self::Prompt,
        initiator: MemberId,
    ) -> impl Future<Output = Result<Decision, SurfaceError>> + Send;

    /// Strips the actionable controls and renders the verdict. Runs on
    /// every exit path of the workflow.
    fn clear(
        &self,
        prompt: Self::Prompt,
        verdict: ConfirmationVerdict,
    ) -> impl Future<Output = Result<(), SurfaceError>> + Send;
}

/// Rendering and input side of one split panel. `Cue` is whatever
/// surface-specific context a single action arrives with (for Discord,
/// the component interaction that must be answered).
pub trait PanelSurface: Send + Sync + 'static {
    type Cue: Send + 'static;

    fn refresh(
        &self,
        view: &PanelView,
        cue: &mut Self::Cue,
    ) -> impl Future<Output = Result<(), SurfaceError>> + Send;

    fn reject(
        &self,
        rejection: &PanelRejection,
        cue: &mut Self::Cue,
    ) -> impl Future<Output = Result<(), SurfaceError>> + Send;

    /// One-field input sub-workflow with a bounded wait; `None` means the
    /// wait elapsed or the user dismissed it.
    fn collect_value(
        &self,
        field: InputField,
        cue: &mut Self::Cue,
    ) -> impl Future<Output = Result<Option<String>, SurfaceError>> + Send;

    /// Terminal render. `cue` is absent when the panel retires without a
    /// triggering action (idle expiry).
    fn retire(
        &self,
        view: &PanelView,
        reason: PanelRetire,
        cue: Option<&mut Self::Cue>,
    ) -> impl Future<Output = Result<(), SurfaceError>> + Send;
}
