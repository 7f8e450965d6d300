use crate::{
    commands,
    discord::panel_surface::{self, PanelCue},
    registry::{PanelLookup, PanelRegistry},
};
use serenity::{
    all::{
        Command, CommandInteraction, ComponentInteraction, CreateInteractionResponse,
        CreateInteractionResponseMessage, GuildId, Interaction,
    },
    async_trait,
    model::gateway::Ready,
    prelude::*,
};
use splitcord_application::{LedgerStore, PanelCommand, TransferCoordinator};
use splitcord_domain::MemberId;
use splitcord_i18n as i18n;

/// Discord bot event handler with a generic ledger dependency
pub struct BotHandler<L: LedgerStore> {
    coordinator: TransferCoordinator<L>,
    ledger: L,
    registry: PanelRegistry<PanelCue>,
    command_guild: Option<GuildId>,
}

impl<L: LedgerStore> BotHandler<L> {
    pub fn new(
        ledger: L,
        registry: PanelRegistry<PanelCue>,
        command_guild: Option<GuildId>,
    ) -> Self {
        Self {
            coordinator: TransferCoordinator::new(ledger.clone()),
            ledger,
            registry,
            command_guild,
        }
    }

    /// Guild-scoped registration when `COMMAND_GUILD_ID` is set (instant,
    /// good for development), global registration otherwise.
    async fn register_commands(&self, ctx: &Context) {
        let registered = match self.command_guild {
            Some(guild) => guild.set_commands(&ctx.http, commands::definitions()).await,
            None => Command::set_global_commands(&ctx.http, commands::definitions()).await,
        };
        match registered {
            Ok(registered) => {
                tracing::info!("Registered {} slash commands", registered.len());
            }
            Err(e) => tracing::error!("Failed to register slash commands: {:?}", e),
        }
    }

    async fn dispatch_command(&self, ctx: &Context, command: &CommandInteraction) {
        tracing::debug!(
            command = %command.data.name,
            user = %command.user.id,
            "slash command received"
        );
        match command.data.name.as_str() {
            commands::BALANCE => commands::balance(ctx, command, &self.coordinator).await,
            commands::PAY => commands::pay(ctx, command, &self.coordinator).await,
            commands::PAYOUT => commands::payout(ctx, command, &self.coordinator).await,
            commands::SET_BALANCE => commands::set_balance(ctx, command, &self.coordinator).await,
            commands::SPLIT => commands::split(ctx, command, &self.ledger, &self.registry).await,
            other => tracing::warn!("Ignoring unknown command {}", other),
        }
    }

    async fn dispatch_component(&self, ctx: &Context, component: ComponentInteraction) {
        match self.registry.lookup(component.message.id) {
            PanelLookup::Live(handle) => {
                let Some(action) = panel_surface::panel_action(&component.data) else {
                    return;
                };
                let message = component.message.id;
                let command = PanelCommand {
                    actor: MemberId(component.user.id.get()),
                    action,
                    cue: PanelCue::Component(component),
                };
                if handle.dispatch(command).await.is_err() {
                    // Retired between lookup and send; the click goes
                    // unanswered, the next one gets the notice.
                    self.registry.evict(message);
                    tracing::debug!("Dropped an action for a retired split panel");
                }
            }
            PanelLookup::Retired => respond_session_gone(ctx, &component).await,
            PanelLookup::Unknown => {
                // Confirmation buttons land here; their collector answers
                // them, so there is nothing to do.
            }
        }
    }
}

async fn respond_session_gone(ctx: &Context, component: &ComponentInteraction) {
    let notice = CreateInteractionResponseMessage::new()
        .content(i18n::SESSION_GONE)
        .ephemeral(true);
    if let Err(e) = component
        .create_response(&ctx.http, CreateInteractionResponse::Message(notice))
        .await
    {
        tracing::warn!("Failed to answer a click on a dead split panel: {:?}", e);
    }
}

#[async_trait]
impl<L: LedgerStore> EventHandler for BotHandler<L> {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!("Connected as {}", ready.user.name);
        self.register_commands(&ctx).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => self.dispatch_command(&ctx, &command).await,
            Interaction::Component(component) => self.dispatch_component(&ctx, component).await,
            _ => {}
        }
    }
}
