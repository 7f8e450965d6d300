use splitcord_application::{PayoutReceipt, TransferReceipt};
use splitcord_domain::{MemberId, Silver};
use splitcord_i18n as i18n;

pub fn transfer_receipt(receipt: &TransferReceipt) -> String {
    i18n::transfer_receipt(
        receipt.source.0,
        receipt.destination.0,
        receipt.amount.amount(),
    )
}

pub fn payout_receipt(receipt: &PayoutReceipt) -> String {
    i18n::payout_receipt(
        receipt.member.0,
        receipt.amount.amount(),
        receipt.balance.amount(),
    )
}

pub fn set_balance_receipt(member: MemberId, value: Silver) -> String {
    i18n::set_balance_receipt(member.0, value.amount())
}

pub fn balance_line(member: MemberId, balance: Silver) -> String {
    i18n::balance_line(member.0, balance.amount())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_receipt_mentions_both_parties_and_the_amount() {
        let text = transfer_receipt(&TransferReceipt {
            source: MemberId(1),
            destination: MemberId(2),
            amount: Silver::from_i64(1_234_567),
            source_balance: Silver::from_i64(10),
            destination_balance: Silver::from_i64(20),
        });
        assert!(text.contains("<@1>"), "{text}");
        assert!(text.contains("<@2>"), "{text}");
        assert!(text.contains("1,234,567"), "{text}");
    }

    #[test]
    fn payout_receipt_reports_the_remaining_balance() {
        let text = payout_receipt(&PayoutReceipt {
            member: MemberId(5),
            amount: Silver::from_i64(500),
            balance: Silver::from_i64(300),
        });
        assert!(text.contains("<@5>"), "{text}");
        assert!(text.contains("500"), "{text}");
        assert!(text.contains("300"), "{text}");
    }

    #[test]
    fn balance_line_formats_with_digit_grouping() {
        let text = balance_line(MemberId(9), Silver::from_i64(1_000_000));
        assert!(text.contains("1,000,000"), "{text}");
    }
}
