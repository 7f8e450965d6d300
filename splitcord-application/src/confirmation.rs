use std::{future::Future, time::Duration};

use crate::{
    error::SurfaceError,
    model::{ConfirmationRequest, ConfirmationVerdict, Decision},
    ports::ConfirmationSurface,
};

pub const TRANSFER_CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);
pub const ADMIN_CONFIRM_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, PartialEq, Eq)]
pub enum ConfirmationOutcome<T> {
    Confirmed(T),
    Cancelled,
    TimedOut,
}

/// Two-phase gate in front of destructive actions: present a prompt, wait
/// for the initiator's decision within the request's window, and only then
/// run the protected action. The action is an `FnOnce`, so a second
/// execution cannot be expressed; the prompt is cleared on every path out.
pub struct ConfirmationWorkflow<S: ConfirmationSurface> {
    surface: S,
}

impl<S: ConfirmationSurface> ConfirmationWorkflow<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub async fn run<A, F, T>(
        &self,
        request: ConfirmationRequest,
        action: A,
    ) -> Result<ConfirmationOutcome<T>, SurfaceError>
    where
        A: FnOnce() -> F,
        F: Future<Output = T>,
    {
        let prompt = self.surface.present(&request).await?;

        let decision = tokio::time::timeout(
            request.timeout,
            self.surface.decision(&prompt, request.initiator),
        )
        .await;

        match decision {
            Ok(Ok(Decision::Confirmed)) => {
                self.clear_quietly(prompt, ConfirmationVerdict::Confirmed)
                    .await;
                Ok(ConfirmationOutcome::Confirmed(action().await))
            }
            Ok(Ok(Decision::Cancelled)) => {
                self.clear_quietly(prompt, ConfirmationVerdict::Cancelled)
                    .await;
                Ok(ConfirmationOutcome::Cancelled)
            }
            Ok(Err(err)) => {
                self.clear_quietly(prompt, ConfirmationVerdict::Cancelled)
                    .await;
                Err(err)
            }
            Err(_elapsed) => {
                self.clear_quietly(prompt, ConfirmationVerdict::TimedOut)
                    .await;
                Ok(ConfirmationOutcome::TimedOut)
            }
        }
    }

    /// Cleanup must not mask the outcome of the workflow itself, so a
    /// failed clear is only logged.
    async fn clear_quietly(&self, prompt: S::Prompt, verdict: ConfirmationVerdict) {
        if let Err(err) = self.surface.clear(prompt, verdict).await {
            tracing::warn!(error = %err, "failed to clear confirmation prompt");
        }
    }
}
