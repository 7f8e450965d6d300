use serenity::all::{
    ButtonStyle, CommandInteraction, Context, CreateActionRow, CreateButton,
    CreateInteractionResponse, CreateInteractionResponseMessage, EditMessage, Message, UserId,
};
use splitcord_application::{
    ConfirmationRequest, ConfirmationSurface, ConfirmationVerdict, Decision, SurfaceError,
};
use splitcord_domain::MemberId;
use splitcord_i18n as i18n;

const CONFIRM_ID: &str = "confirm";
const CANCEL_ID: &str = "cancel";

/// Confirmation prompts rendered as the slash command's own response, with
/// a Confirm and a Cancel button underneath. The component collector is
/// filtered to the initiator and to these two custom ids, so clicks from
/// bystanders never resolve the wait.
pub struct DiscordConfirmationSurface<'a> {
    ctx: &'a Context,
    command: &'a CommandInteraction,
}

impl<'a> DiscordConfirmationSurface<'a> {
    pub fn new(ctx: &'a Context, command: &'a CommandInteraction) -> Self {
        Self { ctx, command }
    }
}

impl ConfirmationSurface for DiscordConfirmationSurface<'_> {
    type Prompt = Message;

    async fn present(&self, request: &ConfirmationRequest) -> Result<Message, SurfaceError> {
        let buttons = CreateActionRow::Buttons(vec![
            CreateButton::new(CONFIRM_ID)
                .label(i18n::CONFIRM)
                .style(ButtonStyle::Success),
            CreateButton::new(CANCEL_ID)
                .label(i18n::CANCEL)
                .style(ButtonStyle::Danger),
        ]);
        let message = CreateInteractionResponseMessage::new()
            .content(request.text.clone())
            .components(vec![buttons]);

        self.command
            .create_response(&self.ctx.http, CreateInteractionResponse::Message(message))
            .await
            .map_err(SurfaceError::present)?;
        self.command
            .get_response(&self.ctx.http)
            .await
            .map_err(SurfaceError::present)
    }

    async fn decision(
        &self,
        prompt: &Message,
        initiator: MemberId,
    ) -> Result<Decision, SurfaceError> {
        let click = prompt
            .await_component_interaction(&self.ctx.shard)
            .author_id(UserId::new(initiator.0))
            .custom_ids(vec![CONFIRM_ID.to_owned(), CANCEL_ID.to_owned()])
            .await;
        let Some(click) = click else {
            return Err(SurfaceError::update("component stream closed"));
        };

        // The click itself needs an answer; the verdict text lands later
        // through `clear`, so a bare acknowledgement is enough here.
        click
            .create_response(&self.ctx.http, CreateInteractionResponse::Acknowledge)
            .await
            .map_err(SurfaceError::update)?;

        if click.data.custom_id == CONFIRM_ID {
            Ok(Decision::Confirmed)
        } else {
            Ok(Decision::Cancelled)
        }
    }

    async fn clear(
        &self,
        prompt: Message,
        verdict: ConfirmationVerdict,
    ) -> Result<(), SurfaceError> {
        let text = match verdict {
            ConfirmationVerdict::Confirmed => i18n::CONFIRMATION_CONFIRMED,
            ConfirmationVerdict::Cancelled => i18n::CONFIRMATION_CANCELLED,
            ConfirmationVerdict::TimedOut => i18n::CONFIRMATION_TIMED_OUT,
        };

        let mut prompt = prompt;
        prompt
            .edit(
                self.ctx,
                EditMessage::new().content(text).components(Vec::new()),
            )
            .await
            .map_err(SurfaceError::update)
    }
}
