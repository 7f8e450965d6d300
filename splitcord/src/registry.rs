use dashmap::DashMap;
use serenity::all::MessageId;
use splitcord_application::SplitPanelHandle;
use std::sync::Arc;

/// What a component click on some message maps to.
pub enum PanelLookup<C> {
    /// A live panel; dispatch to its task.
    Live(SplitPanelHandle<C>),
    /// There was a panel here, but its task is gone; the entry has been
    /// pruned.
    Retired,
    /// Never was a panel. Confirmation buttons land here too; their own
    /// collector answers them.
    Unknown,
}

/// Live split panels keyed by the message that hosts them.
///
/// # Invariant
/// Pure storage; the handler decides what to do with a lookup result.
/// Entries are pruned lazily: the first touch after a task retires
/// removes them.
pub struct PanelRegistry<C> {
    inner: Arc<DashMap<MessageId, SplitPanelHandle<C>>>,
}

impl<C> Clone for PanelRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> PanelRegistry<C> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    pub fn insert(&self, message: MessageId, handle: SplitPanelHandle<C>) {
        self.inner.insert(message, handle);
    }

    pub fn lookup(&self, message: MessageId) -> PanelLookup<C> {
        let Some(handle) = self.inner.get(&message).map(|entry| entry.clone()) else {
            return PanelLookup::Unknown;
        };
        if handle.is_retired() {
            self.inner.remove(&message);
            return PanelLookup::Retired;
        }
        PanelLookup::Live(handle)
    }

    /// Drops an entry whose handle just refused a dispatch.
    pub fn evict(&self, message: MessageId) {
        self.inner.remove(&message);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockLedger, NullSurface};
    use splitcord_application::{PanelAction, PanelCommand, SplitPanelController};
    use splitcord_domain::{GuildId, MemberId, SplitSession};

    fn spawn_panel() -> SplitPanelHandle<()> {
        let session = SplitSession::new(MemberId(1), chrono::Utc::now());
        SplitPanelController::spawn(NullSurface, MockLedger::new(), GuildId(9), session)
    }

    async fn wait_retired(handle: &SplitPanelHandle<()>) {
        for _ in 0..256 {
            if handle.is_retired() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("panel never retired");
    }

    #[tokio::test]
    async fn lookup_finds_live_panels_and_ignores_strangers() {
        let registry = PanelRegistry::new();
        registry.insert(MessageId::new(5), spawn_panel());

        assert!(matches!(
            registry.lookup(MessageId::new(5)),
            PanelLookup::Live(_)
        ));
        assert!(matches!(
            registry.lookup(MessageId::new(6)),
            PanelLookup::Unknown
        ));
    }

    #[tokio::test]
    async fn retired_panels_are_pruned_on_next_touch() {
        let registry = PanelRegistry::new();
        let handle = spawn_panel();
        registry.insert(MessageId::new(5), handle.clone());

        handle
            .dispatch(PanelCommand {
                actor: MemberId(1),
                action: PanelAction::Close,
                cue: (),
            })
            .await
            .expect("panel task gone");
        wait_retired(&handle).await;

        assert!(matches!(
            registry.lookup(MessageId::new(5)),
            PanelLookup::Retired
        ));
        assert_eq!(registry.len(), 0);
        // Pruned means pruned: the second touch no longer knows it.
        assert!(matches!(
            registry.lookup(MessageId::new(5)),
            PanelLookup::Unknown
        ));
    }

    #[tokio::test]
    async fn evict_forgets_an_entry() {
        let registry = PanelRegistry::new();
        registry.insert(MessageId::new(5), spawn_panel());

        registry.evict(MessageId::new(5));
        assert!(matches!(
            registry.lookup(MessageId::new(5)),
            PanelLookup::Unknown
        ));
    }
}
