use std::{collections::BTreeSet, time::Duration};

use splitcord_domain::{GuildId, MemberId, Silver, SplitDetails, SplitSession, SplitValidationError};
use tokio::sync::mpsc;

use crate::{
    error::PanelActionError,
    model::SessionId,
    ports::{LedgerStore, PanelSurface},
};

/// A panel nobody touches for this long retires itself.
pub const PANEL_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Bounded wait for one modal input.
pub const INPUT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputField {
    TotalAmount,
    RepairCost,
    TaxRate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelAction {
    EditTotalAmount,
    EditRepairCost,
    EditTaxRate,
    SetMembers(Vec<MemberId>),
    PayOut,
    Close,
}

pub struct PanelCommand<C> {
    pub actor: MemberId,
    pub action: PanelAction,
    pub cue: C,
}

/// Why an action bounced. The surface turns these into inline notices;
/// none of them is a fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelRejection {
    NotInitiator,
    InvalidNumber(String),
    Rule(SplitValidationError),
    ActionFailed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelRetire {
    Closed,
    PaidOut,
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PanelPhase {
    Active,
    AwaitingInput,
}

/// Everything a surface needs to draw the panel.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelView {
    pub session: SplitSession,
    pub details: SplitDetails,
}

#[derive(Debug, thiserror::Error)]
#[error("split session is no longer active")]
pub struct PanelClosed;

/// The process-wide face of one live panel: an id and a way to send
/// typed actions to the owning task. Sends fail once the task retires.
pub struct SplitPanelHandle<C> {
    session_id: SessionId,
    commands: mpsc::Sender<PanelCommand<C>>,
}

impl<C> Clone for SplitPanelHandle<C> {
    fn clone(&self) -> Self {
        Self {
            session_id: self.session_id,
            commands: self.commands.clone(),
        }
    }
}

impl<C> SplitPanelHandle<C> {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn is_retired(&self) -> bool {
        self.commands.is_closed()
    }

    pub async fn dispatch(&self, command: PanelCommand<C>) -> Result<(), PanelClosed> {
        self.commands.send(command).await.map_err(|_| PanelClosed)
    }
}

enum Flow {
    Continue,
    Ended(PanelRetire),
}

/// One spawned task per split session. The task is the sole owner of the
/// `SplitSession` value; everything else talks to it through the handle.
pub struct SplitPanelController<S: PanelSurface, L: LedgerStore> {
    surface: S,
    ledger: L,
    guild: GuildId,
    session: SplitSession,
    session_id: SessionId,
    phase: PanelPhase,
}

impl<S: PanelSurface, L: LedgerStore> SplitPanelController<S, L> {
    pub fn spawn(
        surface: S,
        ledger: L,
        guild: GuildId,
        session: SplitSession,
    ) -> SplitPanelHandle<S::Cue> {
        let (commands, inbox) = mpsc::channel(8);
        let session_id = SessionId::generate();
        let controller = Self {
            surface,
            ledger,
            guild,
            session,
            session_id,
            phase: PanelPhase::Active,
        };

        tracing::info!(session = %session_id, guild = %guild, "split session opened");
        tokio::spawn(controller.serve(inbox));

        SplitPanelHandle {
            session_id,
            commands,
        }
    }

    async fn serve(mut self, mut inbox: mpsc::Receiver<PanelCommand<S::Cue>>) {
        loop {
            match tokio::time::timeout(PANEL_IDLE_TIMEOUT, inbox.recv()).await {
                Err(_elapsed) => {
                    let view = self.view();
                    if let Err(err) = self
                        .surface
                        .retire(&view, PanelRetire::Expired, None)
                        .await
                    {
                        tracing::warn!(
                            session = %self.session_id,
                            error = %err,
                            "failed to render expired split panel"
                        );
                    }
                    tracing::info!(session = %self.session_id, "split session expired");
                    return;
                }
                Ok(None) => {
                    tracing::debug!(
                        session = %self.session_id,
                        "all split panel handles dropped"
                    );
                    return;
                }
                Ok(Some(command)) => {
                    if let Flow::Ended(reason) = self.handle(command).await {
                        tracing::info!(
                            session = %self.session_id,
                            reason = ?reason,
                            "split session ended"
                        );
                        return;
                    }
                }
            }
        }
    }

    /// One action, fully fenced: a failure inside is logged and answered
    /// with a generic notice, and the task keeps serving.
    async fn handle(&mut self, command: PanelCommand<S::Cue>) -> Flow {
        let PanelCommand {
            actor,
            action,
            mut cue,
        } = command;

        if actor != self.session.created_by() {
            if let Err(err) = self
                .surface
                .reject(&PanelRejection::NotInitiator, &mut cue)
                .await
            {
                tracing::warn!(
                    session = %self.session_id,
                    error = %err,
                    "failed to deliver rejection notice"
                );
            }
            return Flow::Continue;
        }

        match self.act(action, &mut cue).await {
            Ok(flow) => flow,
            Err(err) => {
                tracing::error!(
                    session = %self.session_id,
                    error = %err,
                    "split panel action failed"
                );
                let _ = self
                    .surface
                    .reject(&PanelRejection::ActionFailed, &mut cue)
                    .await;
                Flow::Continue
            }
        }
    }

    async fn act(
        &mut self,
        action: PanelAction,
        cue: &mut S::Cue,
    ) -> Result<Flow, PanelActionError> {
        match action {
            PanelAction::EditTotalAmount => {
                self.edit_field(InputField::TotalAmount, cue).await?;
            }
            PanelAction::EditRepairCost => {
                self.edit_field(InputField::RepairCost, cue).await?;
            }
            PanelAction::EditTaxRate => {
                self.edit_field(InputField::TaxRate, cue).await?;
            }
            PanelAction::SetMembers(members) => {
                self.set_members(members, cue).await?;
            }
            PanelAction::PayOut => return self.pay_out(cue).await,
            PanelAction::Close => {
                let view = self.view();
                if let Err(err) = self
                    .surface
                    .retire(&view, PanelRetire::Closed, Some(cue))
                    .await
                {
                    tracing::warn!(
                        session = %self.session_id,
                        error = %err,
                        "failed to render closed split panel"
                    );
                }
                return Ok(Flow::Ended(PanelRetire::Closed));
            }
        }
        Ok(Flow::Continue)
    }

    async fn edit_field(
        &mut self,
        field: InputField,
        cue: &mut S::Cue,
    ) -> Result<(), PanelActionError> {
        self.enter_phase(PanelPhase::AwaitingInput);
        let collected = self.surface.collect_value(field, cue).await;
        self.enter_phase(PanelPhase::Active);

        let Some(raw) = collected? else {
            // Wait elapsed or the user dismissed the input: nothing changes.
            return Ok(());
        };

        let Ok(value) = raw.trim().replace(',', "").parse::<i64>() else {
            self.surface
                .reject(&PanelRejection::InvalidNumber(raw), cue)
                .await?;
            return Ok(());
        };

        let outcome = match field {
            InputField::TotalAmount => self.session.with_total_amount(Silver::from_i64(value)),
            InputField::RepairCost => self.session.with_repair_cost(Silver::from_i64(value)),
            InputField::TaxRate => self.session.with_tax_rate(value),
        };

        match outcome {
            Ok(next) => {
                self.session = next;
                let view = self.view();
                self.surface.refresh(&view, cue).await?;
            }
            Err(rule) => {
                self.surface
                    .reject(&PanelRejection::Rule(rule), cue)
                    .await?;
            }
        }
        Ok(())
    }

    /// The member widget reports the whole selected set; reconcile it into
    /// idempotent add/remove steps on the session value.
    async fn set_members(
        &mut self,
        members: Vec<MemberId>,
        cue: &mut S::Cue,
    ) -> Result<(), PanelActionError> {
        let target: BTreeSet<MemberId> = members.into_iter().collect();

        let mut next = self.session.clone();
        for departing in self.session.members().difference(&target) {
            next = next.with_member_removed(*departing);
        }
        for arriving in target.difference(self.session.members()) {
            next = next.with_member_added(*arriving);
        }
        self.session = next;

        let view = self.view();
        self.surface.refresh(&view, cue).await?;
        Ok(())
    }

    async fn pay_out(&mut self, cue: &mut S::Cue) -> Result<Flow, PanelActionError> {
        let details = self.session.details();
        if details.amount_per_person.is_positive() {
            let members: Vec<MemberId> = self.session.members().iter().copied().collect();
            self.ledger
                .credit_each(self.guild, members, details.amount_per_person)
                .await?;
            tracing::info!(
                session = %self.session_id,
                guild = %self.guild,
                members = self.session.member_count(),
                share = %details.amount_per_person,
                "split paid out"
            );
        }

        // The silver has moved; a broken terminal render must not let the
        // session keep serving and pay out again.
        let view = self.view();
        if let Err(err) = self
            .surface
            .retire(&view, PanelRetire::PaidOut, Some(cue))
            .await
        {
            tracing::warn!(
                session = %self.session_id,
                error = %err,
                "failed to render payout summary"
            );
        }
        Ok(Flow::Ended(PanelRetire::PaidOut))
    }

    fn enter_phase(&mut self, phase: PanelPhase) {
        if self.phase != phase {
            tracing::debug!(
                session = %self.session_id,
                from = ?self.phase,
                to = ?phase,
                "split panel phase change"
            );
            self.phase = phase;
        }
    }

    fn view(&self) -> PanelView {
        PanelView {
            details: self.session.details(),
            session: self.session.clone(),
        }
    }
}
