use chrono::Utc;
use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    CreateInteractionResponse, CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
    EditInteractionResponse, Permissions, ResolvedOption, ResolvedValue, User,
};
use splitcord_application::{
    ConfirmationOutcome, ConfirmationRequest, ConfirmationWorkflow, CorrelationId, FailureKind,
    LedgerStore, MemberKind, PanelView, PayoutRequest, SetBalanceRequest, SplitPanelController,
    SurfaceError, TransferCoordinator, TransferError, TransferRequest, ADMIN_CONFIRM_TIMEOUT,
    TRANSFER_CONFIRM_TIMEOUT,
};
use splitcord_domain::{GuildId, MemberId, Silver, SplitSession};
use splitcord_i18n as i18n;
use splitcord_presentation::{
    balance_line, payout_receipt, set_balance_receipt, transfer_notice, transfer_receipt,
    SplitPanelPresenter,
};

use crate::{
    discord::{
        confirm::DiscordConfirmationSurface,
        panel_surface::{panel_components, DiscordPanelSurface, PanelCue},
    },
    registry::PanelRegistry,
};

pub const BALANCE: &str = "balance";
pub const PAY: &str = "pay";
pub const PAYOUT: &str = "payout";
pub const SET_BALANCE: &str = "setbalance";
pub const SPLIT: &str = "split";

const MEMBER_OPTION: &str = "member";
const AMOUNT_OPTION: &str = "amount";

/// The slash commands the bot registers. The officer commands carry
/// `MANAGE_GUILD` as their default member permission so most members
/// never see them; the gate in the handler still re-checks.
pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(BALANCE)
            .description("Show a ledger balance")
            .add_option(CreateCommandOption::new(
                CommandOptionType::User,
                MEMBER_OPTION,
                "Whose balance to show; yours when omitted",
            )),
        CreateCommand::new(PAY)
            .description("Pay silver from your balance to another member")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::User,
                    MEMBER_OPTION,
                    "Who receives the silver",
                )
                .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Integer,
                    AMOUNT_OPTION,
                    "How much silver to pay",
                )
                .required(true),
            ),
        CreateCommand::new(PAYOUT)
            .description("Record silver handed over in game; lowers the ledger balance")
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::User,
                    MEMBER_OPTION,
                    "Who received their silver",
                )
                .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Integer,
                    AMOUNT_OPTION,
                    "How much silver was handed over",
                )
                .required(true),
            ),
        CreateCommand::new(SET_BALANCE)
            .description("Overwrite a member's ledger balance")
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::User,
                    MEMBER_OPTION,
                    "Whose balance to overwrite",
                )
                .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Integer,
                    AMOUNT_OPTION,
                    "The new balance",
                )
                .required(true),
            ),
        CreateCommand::new(SPLIT).description("Open a loot split panel"),
    ]
}

pub async fn balance<L: LedgerStore>(
    ctx: &Context,
    command: &CommandInteraction,
    coordinator: &TransferCoordinator<L>,
) {
    let Some(guild) = command.guild_id else {
        respond_text(ctx, command, i18n::GUILD_ONLY, true).await;
        return;
    };

    let options = command.data.options();
    let subject = user_option(&options, MEMBER_OPTION).unwrap_or(&command.user);
    let member = MemberId(subject.id.get());
    let correlation = CorrelationId::generate();

    match coordinator.balance(GuildId(guild.get()), member).await {
        Ok(balance) => {
            respond_text(ctx, command, balance_line(member, balance), false).await;
        }
        Err(error) => {
            log_failure(command, &error, correlation);
            respond_text(ctx, command, transfer_notice(&error, correlation), true).await;
        }
    }
}

pub async fn pay<L: LedgerStore>(
    ctx: &Context,
    command: &CommandInteraction,
    coordinator: &TransferCoordinator<L>,
) {
    let Some(guild) = command.guild_id else {
        respond_text(ctx, command, i18n::GUILD_ONLY, true).await;
        return;
    };

    let options = command.data.options();
    let (Some(destination), Some(amount)) = (
        user_option(&options, MEMBER_OPTION),
        integer_option(&options, AMOUNT_OPTION),
    ) else {
        respond_text(ctx, command, i18n::MALFORMED_COMMAND, true).await;
        return;
    };

    let request = TransferRequest {
        guild: GuildId(guild.get()),
        source: MemberId(command.user.id.get()),
        destination: MemberId(destination.id.get()),
        destination_kind: if destination.bot {
            MemberKind::Bot
        } else {
            MemberKind::Human
        },
        amount: Silver::from_i64(amount),
        correlation: CorrelationId::generate(),
    };
    // Obvious mistakes are bounced before anyone sees a Confirm button.
    if let Err(error) = request.validate() {
        log_failure(command, &error, request.correlation);
        respond_text(ctx, command, transfer_notice(&error, request.correlation), true).await;
        return;
    }

    let workflow = ConfirmationWorkflow::new(DiscordConfirmationSurface::new(ctx, command));
    let outcome = workflow
        .run(
            ConfirmationRequest {
                initiator: request.source,
                text: i18n::transfer_prompt(request.source.0, request.destination.0, amount),
                timeout: TRANSFER_CONFIRM_TIMEOUT,
            },
            || coordinator.transfer(request),
        )
        .await;

    conclude(ctx, command, request.correlation, outcome, transfer_receipt).await;
}

pub async fn payout<L: LedgerStore>(
    ctx: &Context,
    command: &CommandInteraction,
    coordinator: &TransferCoordinator<L>,
) {
    let Some(guild) = command.guild_id else {
        respond_text(ctx, command, i18n::GUILD_ONLY, true).await;
        return;
    };
    if !is_officer(command) {
        reject_non_officer(ctx, command).await;
        return;
    }

    let options = command.data.options();
    let (Some(member), Some(amount)) = (
        user_option(&options, MEMBER_OPTION),
        integer_option(&options, AMOUNT_OPTION),
    ) else {
        respond_text(ctx, command, i18n::MALFORMED_COMMAND, true).await;
        return;
    };

    let request = PayoutRequest {
        guild: GuildId(guild.get()),
        member: MemberId(member.id.get()),
        amount: Silver::from_i64(amount),
        correlation: CorrelationId::generate(),
    };
    if let Err(error) = request.validate() {
        log_failure(command, &error, request.correlation);
        respond_text(ctx, command, transfer_notice(&error, request.correlation), true).await;
        return;
    }

    let workflow = ConfirmationWorkflow::new(DiscordConfirmationSurface::new(ctx, command));
    let outcome = workflow
        .run(
            ConfirmationRequest {
                initiator: MemberId(command.user.id.get()),
                text: i18n::payout_prompt(request.member.0, amount),
                timeout: ADMIN_CONFIRM_TIMEOUT,
            },
            || coordinator.payout(request),
        )
        .await;

    conclude(ctx, command, request.correlation, outcome, payout_receipt).await;
}

pub async fn set_balance<L: LedgerStore>(
    ctx: &Context,
    command: &CommandInteraction,
    coordinator: &TransferCoordinator<L>,
) {
    let Some(guild) = command.guild_id else {
        respond_text(ctx, command, i18n::GUILD_ONLY, true).await;
        return;
    };
    if !is_officer(command) {
        reject_non_officer(ctx, command).await;
        return;
    }

    let options = command.data.options();
    let (Some(member), Some(amount)) = (
        user_option(&options, MEMBER_OPTION),
        integer_option(&options, AMOUNT_OPTION),
    ) else {
        respond_text(ctx, command, i18n::MALFORMED_COMMAND, true).await;
        return;
    };

    let request = SetBalanceRequest {
        guild: GuildId(guild.get()),
        member: MemberId(member.id.get()),
        value: Silver::from_i64(amount),
        correlation: CorrelationId::generate(),
    };
    if let Err(error) = request.validate() {
        log_failure(command, &error, request.correlation);
        respond_text(ctx, command, transfer_notice(&error, request.correlation), true).await;
        return;
    }

    let workflow = ConfirmationWorkflow::new(DiscordConfirmationSurface::new(ctx, command));
    let outcome = workflow
        .run(
            ConfirmationRequest {
                initiator: MemberId(command.user.id.get()),
                text: i18n::set_balance_prompt(request.member.0, amount),
                timeout: ADMIN_CONFIRM_TIMEOUT,
            },
            || coordinator.set_balance(request),
        )
        .await;

    conclude(ctx, command, request.correlation, outcome, |value| {
        set_balance_receipt(request.member, *value)
    })
    .await;
}

/// Opens a split panel: the command response is the panel message, and a
/// controller task takes over from there.
pub async fn split<L: LedgerStore>(
    ctx: &Context,
    command: &CommandInteraction,
    ledger: &L,
    registry: &PanelRegistry<PanelCue>,
) {
    let Some(guild) = command.guild_id else {
        respond_text(ctx, command, i18n::GUILD_ONLY, true).await;
        return;
    };

    let session = SplitSession::new(MemberId(command.user.id.get()), Utc::now());
    let view = PanelView {
        details: session.details(),
        session: session.clone(),
    };

    let message = CreateInteractionResponseMessage::new()
        .content(SplitPanelPresenter::render(&view))
        .components(panel_components(view.session.members()));
    if let Err(e) = command
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await
    {
        tracing::error!("Failed to open a split panel: {:?}", e);
        return;
    }
    let panel = match command.get_response(&ctx.http).await {
        Ok(panel) => panel,
        Err(e) => {
            tracing::error!("Failed to fetch the split panel message: {:?}", e);
            return;
        }
    };

    let surface = DiscordPanelSurface::new(ctx.clone(), panel.channel_id, panel.id);
    let handle =
        SplitPanelController::spawn(surface, ledger.clone(), GuildId(guild.get()), session);
    registry.insert(panel.id, handle);
}

/// Wraps up a confirmed ledger command: the prompt message becomes the
/// public receipt, while failures stay between the bot and the initiator.
async fn conclude<T>(
    ctx: &Context,
    command: &CommandInteraction,
    correlation: CorrelationId,
    outcome: Result<ConfirmationOutcome<Result<T, TransferError>>, SurfaceError>,
    render: impl FnOnce(&T) -> String,
) {
    match outcome {
        Ok(ConfirmationOutcome::Confirmed(Ok(receipt))) => {
            edit_prompt(ctx, command, render(&receipt)).await;
        }
        Ok(ConfirmationOutcome::Confirmed(Err(error))) => {
            log_failure(command, &error, correlation);
            followup_ephemeral(ctx, command, transfer_notice(&error, correlation)).await;
        }
        // The cleared prompt already says so; nothing else to deliver.
        Ok(ConfirmationOutcome::Cancelled | ConfirmationOutcome::TimedOut) => {}
        Err(error) => {
            tracing::error!(
                command = %command.data.name,
                correlation = %correlation,
                error = %error,
                "confirmation surface failed"
            );
            respond_text(ctx, command, i18n::storage_failure(correlation), true).await;
        }
    }
}

fn user_option<'a>(options: &[ResolvedOption<'a>], name: &str) -> Option<&'a User> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match &option.value {
            ResolvedValue::User(user, _) => Some(*user),
            _ => None,
        })
}

fn integer_option(options: &[ResolvedOption<'_>], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match &option.value {
            ResolvedValue::Integer(value) => Some(*value),
            _ => None,
        })
}

fn is_officer(command: &CommandInteraction) -> bool {
    has_officer_bit(
        command
            .member
            .as_deref()
            .and_then(|member| member.permissions),
    )
}

/// Officer means Manage Server. Admins qualify through the permission
/// superset Discord computes into the interaction payload.
fn has_officer_bit(permissions: Option<Permissions>) -> bool {
    permissions.is_some_and(|permissions| permissions.contains(Permissions::MANAGE_GUILD))
}

async fn reject_non_officer(ctx: &Context, command: &CommandInteraction) {
    tracing::info!(
        command = %command.data.name,
        user = %command.user.id,
        "command rejected, not an officer"
    );
    respond_text(ctx, command, i18n::UNAUTHORIZED, true).await;
}

fn log_failure(command: &CommandInteraction, error: &TransferError, correlation: CorrelationId) {
    match error.kind() {
        FailureKind::UserInput => {
            tracing::info!(command = %command.data.name, error = %error, "command rejected");
        }
        FailureKind::Storage | FailureKind::InternalBug => {
            tracing::error!(
                command = %command.data.name,
                correlation = %correlation,
                error = %error,
                "command failed"
            );
        }
    }
}

async fn respond_text(
    ctx: &Context,
    command: &CommandInteraction,
    text: impl Into<String>,
    ephemeral: bool,
) {
    let message = CreateInteractionResponseMessage::new()
        .content(text)
        .ephemeral(ephemeral);
    if let Err(e) = command
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await
    {
        tracing::error!("Failed to respond to {}: {:?}", command.data.name, e);
    }
}

async fn edit_prompt(ctx: &Context, command: &CommandInteraction, text: String) {
    let edit = EditInteractionResponse::new()
        .content(text)
        .components(Vec::new());
    if let Err(e) = command.edit_response(&ctx.http, edit).await {
        tracing::error!("Failed to edit the response of {}: {:?}", command.data.name, e);
    }
}

async fn followup_ephemeral(ctx: &Context, command: &CommandInteraction, text: String) {
    let followup = CreateInteractionResponseFollowup::new()
        .content(text)
        .ephemeral(true);
    if let Err(e) = command.create_followup(&ctx.http, followup).await {
        tracing::error!("Failed to follow up on {}: {:?}", command.data.name, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::no_member_payload(None, false)]
    #[case::no_permissions(Some(Permissions::empty()), false)]
    #[case::unrelated_permissions(
        Some(Permissions::SEND_MESSAGES | Permissions::KICK_MEMBERS),
        false
    )]
    #[case::manage_guild(Some(Permissions::MANAGE_GUILD), true)]
    #[case::manage_guild_and_more(
        Some(Permissions::MANAGE_GUILD | Permissions::ADMINISTRATOR),
        true
    )]
    fn officer_gate_needs_manage_guild(
        #[case] permissions: Option<Permissions>,
        #[case] expected: bool,
    ) {
        assert_eq!(has_officer_bit(permissions), expected);
    }

    #[test]
    fn every_ledger_verb_is_registered() {
        assert_eq!(definitions().len(), 5);
    }
}
