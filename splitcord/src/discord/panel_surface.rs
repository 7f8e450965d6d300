use std::collections::BTreeSet;

use serenity::all::{
    ButtonStyle, ChannelId, ComponentInteraction, ComponentInteractionData,
    ComponentInteractionDataKind, Context, CreateActionRow, CreateButton,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateQuickModal,
    CreateSelectMenu, CreateSelectMenuKind, EditMessage, MessageId, ModalInteraction, UserId,
};
use splitcord_application::{
    InputField, PanelAction, PanelRejection, PanelRetire, PanelSurface, PanelView, SurfaceError,
    INPUT_TIMEOUT,
};
use splitcord_domain::MemberId;
use splitcord_i18n as i18n;
use splitcord_presentation::{split_rejection, SplitPanelPresenter};

const EDIT_TOTAL_ID: &str = "split_edit_total";
const EDIT_REPAIR_ID: &str = "split_edit_repair";
const EDIT_TAX_ID: &str = "split_edit_tax";
const MEMBERS_ID: &str = "split_members";
const PAY_OUT_ID: &str = "split_pay_out";
const CLOSE_ID: &str = "split_close";

/// The interaction a panel action must answer. An action arrives as a
/// component click; once a modal collects input, the modal submit becomes
/// the interaction that is still owed a response, so the cue moves along.
pub enum PanelCue {
    Component(ComponentInteraction),
    Modal(ModalInteraction),
}

/// Maps a component interaction on the panel message to a panel action.
/// Components that are not ours return `None`.
pub fn panel_action(data: &ComponentInteractionData) -> Option<PanelAction> {
    match &data.kind {
        ComponentInteractionDataKind::Button => button_action(&data.custom_id),
        ComponentInteractionDataKind::UserSelect { values } => {
            select_action(&data.custom_id, values)
        }
        _ => None,
    }
}

fn button_action(custom_id: &str) -> Option<PanelAction> {
    match custom_id {
        EDIT_TOTAL_ID => Some(PanelAction::EditTotalAmount),
        EDIT_REPAIR_ID => Some(PanelAction::EditRepairCost),
        EDIT_TAX_ID => Some(PanelAction::EditTaxRate),
        PAY_OUT_ID => Some(PanelAction::PayOut),
        CLOSE_ID => Some(PanelAction::Close),
        _ => None,
    }
}

fn select_action(custom_id: &str, values: &[UserId]) -> Option<PanelAction> {
    if custom_id != MEMBERS_ID {
        return None;
    }
    let members = values.iter().map(|user| MemberId(user.get())).collect();
    Some(PanelAction::SetMembers(members))
}

/// Component rows under the panel text: one row of buttons, one member
/// select seeded with the current split members.
pub fn panel_components(members: &BTreeSet<MemberId>) -> Vec<CreateActionRow> {
    let buttons = CreateActionRow::Buttons(vec![
        CreateButton::new(EDIT_TOTAL_ID)
            .label(i18n::BUTTON_EDIT_TOTAL)
            .style(ButtonStyle::Primary),
        CreateButton::new(EDIT_REPAIR_ID)
            .label(i18n::BUTTON_EDIT_REPAIR)
            .style(ButtonStyle::Primary),
        CreateButton::new(EDIT_TAX_ID)
            .label(i18n::BUTTON_EDIT_TAX)
            .style(ButtonStyle::Primary),
        CreateButton::new(PAY_OUT_ID)
            .label(i18n::BUTTON_PAY_OUT)
            .style(ButtonStyle::Success),
        CreateButton::new(CLOSE_ID)
            .label(i18n::BUTTON_CLOSE)
            .style(ButtonStyle::Danger),
    ]);

    let current = members.iter().map(|member| UserId::new(member.0)).collect();
    let select = CreateSelectMenu::new(
        MEMBERS_ID,
        CreateSelectMenuKind::User {
            default_users: Some(current),
        },
    )
    .placeholder(i18n::SELECT_MEMBERS_PLACEHOLDER)
    .min_values(0)
    .max_values(25);

    vec![buttons, CreateActionRow::SelectMenu(select)]
}

fn input_modal(field: InputField) -> CreateQuickModal {
    let (title, label) = match field {
        InputField::TotalAmount => (i18n::MODAL_TOTAL_TITLE, i18n::MODAL_AMOUNT_LABEL),
        InputField::RepairCost => (i18n::MODAL_REPAIR_TITLE, i18n::MODAL_AMOUNT_LABEL),
        InputField::TaxRate => (i18n::MODAL_TAX_TITLE, i18n::MODAL_TAX_LABEL),
    };
    CreateQuickModal::new(title)
        .timeout(INPUT_TIMEOUT)
        .short_field(label)
}

/// Panel rendering bound to one Discord message. Refreshes ride on the
/// triggering interaction's response; only idle expiry falls back to a
/// plain message edit.
pub struct DiscordPanelSurface {
    ctx: Context,
    channel: ChannelId,
    message: MessageId,
}

impl DiscordPanelSurface {
    pub fn new(ctx: Context, channel: ChannelId, message: MessageId) -> Self {
        Self {
            ctx,
            channel,
            message,
        }
    }

    async fn answer(
        &self,
        cue: &mut PanelCue,
        response: CreateInteractionResponse,
    ) -> Result<(), SurfaceError> {
        match cue {
            PanelCue::Component(component) => component
                .create_response(&self.ctx.http, response)
                .await
                .map_err(SurfaceError::update),
            PanelCue::Modal(modal) => modal
                .create_response(&self.ctx.http, response)
                .await
                .map_err(SurfaceError::update),
        }
    }
}

impl PanelSurface for DiscordPanelSurface {
    type Cue = PanelCue;

    async fn refresh(&self, view: &PanelView, cue: &mut PanelCue) -> Result<(), SurfaceError> {
        let update = CreateInteractionResponseMessage::new()
            .content(SplitPanelPresenter::render(view))
            .components(panel_components(view.session.members()));
        self.answer(cue, CreateInteractionResponse::UpdateMessage(update))
            .await
    }

    async fn reject(
        &self,
        rejection: &PanelRejection,
        cue: &mut PanelCue,
    ) -> Result<(), SurfaceError> {
        let notice = CreateInteractionResponseMessage::new()
            .content(split_rejection(rejection))
            .ephemeral(true);
        self.answer(cue, CreateInteractionResponse::Message(notice))
            .await
    }

    async fn collect_value(
        &self,
        field: InputField,
        cue: &mut PanelCue,
    ) -> Result<Option<String>, SurfaceError> {
        let PanelCue::Component(component) = cue else {
            return Err(SurfaceError::present("input prompt needs a component click"));
        };

        let submitted = component
            .quick_modal(&self.ctx, input_modal(field))
            .await
            .map_err(SurfaceError::present)?;
        let Some(submitted) = submitted else {
            // Dismissed or timed out. Opening the modal already answered
            // the component, so there is nothing left to respond to.
            return Ok(None);
        };

        let value = submitted.inputs.into_iter().next().unwrap_or_default();
        *cue = PanelCue::Modal(submitted.interaction);
        Ok(Some(value))
    }

    async fn retire(
        &self,
        view: &PanelView,
        reason: PanelRetire,
        cue: Option<&mut PanelCue>,
    ) -> Result<(), SurfaceError> {
        let content = SplitPanelPresenter::render_retired(view, reason);
        match cue {
            Some(cue) => {
                let update = CreateInteractionResponseMessage::new()
                    .content(content)
                    .components(Vec::new());
                self.answer(cue, CreateInteractionResponse::UpdateMessage(update))
                    .await
            }
            None => self
                .channel
                .edit_message(
                    &self.ctx.http,
                    self.message,
                    EditMessage::new().content(content).components(Vec::new()),
                )
                .await
                .map(|_| ())
                .map_err(SurfaceError::update),
        }
    }
}
