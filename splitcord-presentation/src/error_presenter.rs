use splitcord_application::{CorrelationId, PanelRejection, TransferError};
use splitcord_domain::SplitValidationError;
use splitcord_i18n as i18n;

/// Inline notice for a failed ledger command. Business-rule violations
/// name their reason; storage trouble stays generic and carries only the
/// correlation id that pairs it with the log line.
pub fn transfer_notice(error: &TransferError, correlation: CorrelationId) -> String {
    match error {
        TransferError::NonPositiveAmount => i18n::NON_POSITIVE_AMOUNT.to_owned(),
        TransferError::NegativeBalance => i18n::NEGATIVE_BALANCE.to_owned(),
        TransferError::SelfTransfer => i18n::SELF_TRANSFER.to_owned(),
        TransferError::BotRecipient => i18n::BOT_RECIPIENT.to_owned(),
        TransferError::InsufficientFunds { balance } => {
            i18n::insufficient_funds(balance.amount())
        }
        TransferError::Storage(_) => i18n::storage_failure(correlation),
    }
}

pub fn split_rejection(rejection: &PanelRejection) -> String {
    match rejection {
        PanelRejection::NotInitiator => i18n::INITIATOR_ONLY.to_owned(),
        PanelRejection::InvalidNumber(raw) => i18n::invalid_number(raw),
        PanelRejection::Rule(rule) => rule_notice(rule),
        PanelRejection::ActionFailed => i18n::ACTION_FAILED.to_owned(),
    }
}

fn rule_notice(rule: &SplitValidationError) -> String {
    match rule {
        SplitValidationError::NegativeAmount => i18n::NEGATIVE_AMOUNT.to_owned(),
        SplitValidationError::TotalBelowRepair { total, repair } => {
            i18n::total_below_repair(total.amount(), repair.amount())
        }
        SplitValidationError::RepairAboveTotal { total, repair } => {
            i18n::repair_above_total(total.amount(), repair.amount())
        }
        SplitValidationError::TaxRateOutOfRange { rate } => i18n::tax_out_of_range(*rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use splitcord_domain::Silver;

    #[rstest]
    #[case::self_transfer(TransferError::SelfTransfer, i18n::SELF_TRANSFER)]
    #[case::bot_recipient(TransferError::BotRecipient, i18n::BOT_RECIPIENT)]
    #[case::non_positive(TransferError::NonPositiveAmount, i18n::NON_POSITIVE_AMOUNT)]
    #[case::negative_balance(TransferError::NegativeBalance, i18n::NEGATIVE_BALANCE)]
    fn rule_violations_render_their_reason(#[case] error: TransferError, #[case] expected: &str) {
        let correlation = CorrelationId::generate();
        assert_eq!(transfer_notice(&error, correlation), expected);
    }

    #[test]
    fn insufficient_funds_names_the_available_balance() {
        let text = transfer_notice(
            &TransferError::InsufficientFunds {
                balance: Silver::from_i64(12_345),
            },
            CorrelationId::generate(),
        );
        assert!(text.contains("12,345"), "{text}");
    }

    #[test]
    fn storage_failures_stay_generic_but_carry_the_reference() {
        let correlation = CorrelationId::generate();
        let text = transfer_notice(
            &TransferError::Storage(splitcord_application::StorageError::new(
                "connection reset by peer",
            )),
            correlation,
        );
        assert!(!text.contains("connection reset"), "{text}");
        assert!(text.contains(&correlation.to_string()), "{text}");
    }

    #[rstest]
    #[case::not_initiator(PanelRejection::NotInitiator, i18n::INITIATOR_ONLY)]
    #[case::action_failed(PanelRejection::ActionFailed, i18n::ACTION_FAILED)]
    fn panel_rejections_map_to_their_notice(
        #[case] rejection: PanelRejection,
        #[case] expected: &str,
    ) {
        assert_eq!(split_rejection(&rejection), expected);
    }

    #[test]
    fn garbage_input_echoes_what_was_typed() {
        let text = split_rejection(&PanelRejection::InvalidNumber("loot".to_owned()));
        assert!(text.contains("loot"), "{text}");
    }

    #[test]
    fn rule_rejections_name_the_offending_figures() {
        let text = split_rejection(&PanelRejection::Rule(
            SplitValidationError::RepairAboveTotal {
                total: Silver::from_i64(100),
                repair: Silver::from_i64(150),
            },
        ));
        assert!(text.contains("150"), "{text}");
        assert!(text.contains("100"), "{text}");
    }
}
