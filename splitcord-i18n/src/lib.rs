#![warn(clippy::uninlined_format_args)]

pub mod strings {
    pub const CONFIRM: &str = "Confirm";
    pub const CANCEL: &str = "Cancel";
    pub const CONFIRMATION_CONFIRMED: &str = "Confirmed.";
    pub const CONFIRMATION_CANCELLED: &str = "Cancelled.";
    pub const CONFIRMATION_TIMED_OUT: &str = "No response in time, nothing was changed.";

    pub const SPLIT_PANEL_TITLE: &str = "Loot Split";
    pub const LOOT_TOTAL: &str = "Loot total";
    pub const REPAIR_COST: &str = "Repair cost";
    pub const TAX_RATE: &str = "Market tax";
    pub const AFTER_REPAIRS: &str = "After repairs";
    pub const BUYER_PAYMENT: &str = "Buyer payment";
    pub const PER_MEMBER: &str = "Per member";
    pub const MEMBERS: &str = "Members";
    pub const OPENED_BY: &str = "Opened by";

    pub const BUTTON_EDIT_TOTAL: &str = "Edit total";
    pub const BUTTON_EDIT_REPAIR: &str = "Edit repairs";
    pub const BUTTON_EDIT_TAX: &str = "Edit tax";
    pub const BUTTON_PAY_OUT: &str = "Pay out";
    pub const BUTTON_CLOSE: &str = "Close";
    pub const SELECT_MEMBERS_PLACEHOLDER: &str = "Pick the members splitting this loot";

    pub const MODAL_TOTAL_TITLE: &str = "Set loot total";
    pub const MODAL_REPAIR_TITLE: &str = "Set repair cost";
    pub const MODAL_TAX_TITLE: &str = "Set market tax";
    pub const MODAL_AMOUNT_LABEL: &str = "Amount in silver";
    pub const MODAL_TAX_LABEL: &str = "Percent (0-100)";

    pub const PANEL_CLOSED: &str = "Split closed.";
    pub const PANEL_EXPIRED: &str = "Split expired after an hour without activity.";
    pub const PAID_OUT_NOTHING: &str = "There was nothing to pay out.";
    pub const INITIATOR_ONLY: &str = "Only the member who opened this split can use it.";
    pub const SESSION_GONE: &str = "This split is no longer active.";
    pub const ACTION_FAILED: &str = "Something went wrong handling that. The split is still usable.";

    pub const SELF_TRANSFER: &str = "You cannot pay yourself.";
    pub const BOT_RECIPIENT: &str = "Bots cannot hold silver.";
    pub const NON_POSITIVE_AMOUNT: &str = "The amount must be greater than zero.";
    pub const NEGATIVE_AMOUNT: &str = "Amounts cannot be negative.";
    pub const MALFORMED_COMMAND: &str = "That command arrived without its required options.";
    pub const NEGATIVE_BALANCE: &str = "A balance cannot be negative.";
    pub const UNAUTHORIZED: &str = "You need the Manage Server permission to do that.";
    pub const GUILD_ONLY: &str = "This command only works inside a guild.";
}

pub use strings::*;

/// Whole silver amounts with digit grouping, e.g. `1,234,567`.
pub fn format_silver(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        grouped.push('-');
    }
    let lead = digits.len() % 3;
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && idx % 3 == lead % 3 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn member_mention(id: u64) -> String {
    format!("<@{id}>")
}

pub fn balance_line(member: u64, balance: i64) -> String {
    format!("<@{member}> holds {} silver.", format_silver(balance))
}

pub fn insufficient_funds(balance: i64) -> String {
    format!("Not enough silver: only {} available.", format_silver(balance))
}

pub fn invalid_number(raw: &str) -> String {
    format!("`{raw}` is not a whole number.")
}

pub fn total_below_repair(total: i64, repair: i64) -> String {
    format!(
        "A loot total of {} would not cover the {} repair cost.",
        format_silver(total),
        format_silver(repair)
    )
}

pub fn repair_above_total(total: i64, repair: i64) -> String {
    format!(
        "A repair cost of {} exceeds the {} loot total.",
        format_silver(repair),
        format_silver(total)
    )
}

pub fn tax_out_of_range(rate: i64) -> String {
    format!("A tax rate of {rate}% is outside 0-100.")
}

pub fn transfer_prompt(source: u64, destination: u64, amount: i64) -> String {
    format!(
        "<@{source}>, pay {} silver to <@{destination}>?",
        format_silver(amount)
    )
}

pub fn payout_prompt(member: u64, amount: i64) -> String {
    format!(
        "Record a payout of {} silver to <@{member}>?",
        format_silver(amount)
    )
}

pub fn set_balance_prompt(member: u64, value: i64) -> String {
    format!(
        "Overwrite the balance of <@{member}> with {} silver?",
        format_silver(value)
    )
}

pub fn transfer_receipt(source: u64, destination: u64, amount: i64) -> String {
    format!(
        "<@{source}> paid {} silver to <@{destination}>.",
        format_silver(amount)
    )
}

pub fn payout_receipt(member: u64, amount: i64, balance: i64) -> String {
    format!(
        "Paid out {} silver to <@{member}>; {} left on their balance.",
        format_silver(amount),
        format_silver(balance)
    )
}

pub fn set_balance_receipt(member: u64, value: i64) -> String {
    format!(
        "The balance of <@{member}> is now {} silver.",
        format_silver(value)
    )
}

pub fn paid_out_summary(amount: i64, count: usize) -> String {
    format!(
        "Paid out {} silver to each of {count} members.",
        format_silver(amount)
    )
}

pub fn storage_failure(reference: impl std::fmt::Display) -> String {
    format!("Something went wrong on our side. Reference: `{reference}`.")
}

#[cfg(test)]
mod tests {
    use super::format_silver;

    #[test]
    fn groups_digits() {
        assert_eq!(format_silver(0), "0");
        assert_eq!(format_silver(999), "999");
        assert_eq!(format_silver(1_000), "1,000");
        assert_eq!(format_silver(2_025), "2,025");
        assert_eq!(format_silver(1_234_567), "1,234,567");
        assert_eq!(format_silver(-8_100), "-8,100");
    }
}
