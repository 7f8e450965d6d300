use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::model::{MemberId, Silver};

/// A loot split being edited. Updates go through the `with_*` methods,
/// which hand back a fresh value or a validation failure and never touch
/// the original; whoever drives the session owns the current value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitSession {
    total_amount: Silver,
    repair_cost: Silver,
    tax_rate: u8,
    members: BTreeSet<MemberId>,
    created_by: MemberId,
    created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SplitValidationError {
    #[error("amounts cannot be negative")]
    NegativeAmount,
    #[error("loot total {total} is below the repair cost {repair}")]
    TotalBelowRepair { total: Silver, repair: Silver },
    #[error("repair cost {repair} exceeds the loot total {total}")]
    RepairAboveTotal { total: Silver, repair: Silver },
    #[error("tax rate {rate}% is outside 0..=100")]
    TaxRateOutOfRange { rate: i64 },
}

/// Figures derived from a session. Never stored, always recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitDetails {
    pub after_repairs: Silver,
    pub buyer_payment: Silver,
    pub amount_per_person: Silver,
}

impl SplitSession {
    /// Fresh session: everything zero, the opener is the first member.
    pub fn new(created_by: MemberId, created_at: DateTime<Utc>) -> Self {
        Self {
            total_amount: Silver::ZERO,
            repair_cost: Silver::ZERO,
            tax_rate: 0,
            members: BTreeSet::from([created_by]),
            created_by,
            created_at,
        }
    }

    pub fn total_amount(&self) -> Silver {
        self.total_amount
    }

    pub fn repair_cost(&self) -> Silver {
        self.repair_cost
    }

    pub fn tax_rate(&self) -> u8 {
        self.tax_rate
    }

    pub fn members(&self) -> &BTreeSet<MemberId> {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn created_by(&self) -> MemberId {
        self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn with_total_amount(&self, total: Silver) -> Result<Self, SplitValidationError> {
        if total.is_negative() {
            return Err(SplitValidationError::NegativeAmount);
        }
        if total < self.repair_cost {
            return Err(SplitValidationError::TotalBelowRepair {
                total,
                repair: self.repair_cost,
            });
        }

        let mut next = self.clone();
        next.total_amount = total;
        Ok(next)
    }

    pub fn with_repair_cost(&self, repair: Silver) -> Result<Self, SplitValidationError> {
        if repair.is_negative() {
            return Err(SplitValidationError::NegativeAmount);
        }
        if repair > self.total_amount {
            return Err(SplitValidationError::RepairAboveTotal {
                total: self.total_amount,
                repair,
            });
        }

        let mut next = self.clone();
        next.repair_cost = repair;
        Ok(next)
    }

    /// Accepts the raw integer from user input; only 0..=100 passes.
    pub fn with_tax_rate(&self, rate: i64) -> Result<Self, SplitValidationError> {
        if !(0..=100).contains(&rate) {
            return Err(SplitValidationError::TaxRateOutOfRange { rate });
        }

        let mut next = self.clone();
        next.tax_rate = rate as u8;
        Ok(next)
    }

    /// Idempotent; adding a present member changes nothing.
    pub fn with_member_added(&self, member: MemberId) -> Self {
        let mut next = self.clone();
        next.members.insert(member);
        next
    }

    /// Idempotent; removing an absent member changes nothing.
    pub fn with_member_removed(&self, member: MemberId) -> Self {
        let mut next = self.clone();
        next.members.remove(&member);
        next
    }

    /// The derivation chain. `total >= repair >= 0` holds by construction,
    /// so `after_repairs` cannot go negative; the tax step widens to i128
    /// before multiplying so no intermediate overflows. Both divisions
    /// floor, which is where the silver dust goes.
    pub fn details(&self) -> SplitDetails {
        let after_repairs = self.total_amount.amount() - self.repair_cost.amount();
        debug_assert!(after_repairs >= 0);

        let retained = 100 - i128::from(self.tax_rate);
        let buyer_payment = (i128::from(after_repairs) * retained / 100) as i64;

        let count = self.members.len() as i64;
        let amount_per_person = if count > 0 { buyer_payment / count } else { 0 };

        SplitDetails {
            after_repairs: Silver::from_i64(after_repairs),
            buyer_payment: Silver::from_i64(buyer_payment),
            amount_per_person: Silver::from_i64(amount_per_person),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn at_epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    #[fixture]
    fn session() -> SplitSession {
        SplitSession::new(MemberId(1), at_epoch())
    }

    fn populated(total: i64, repair: i64, tax: i64, members: &[u64]) -> SplitSession {
        let mut session = SplitSession::new(MemberId(members[0]), at_epoch());
        for &member in &members[1..] {
            session = session.with_member_added(MemberId(member));
        }
        session = session
            .with_total_amount(Silver::from_i64(total))
            .expect("total rejected");
        session = session
            .with_repair_cost(Silver::from_i64(repair))
            .expect("repair rejected");
        session.with_tax_rate(tax).expect("tax rejected")
    }

    #[rstest]
    #[case::typical_four_way(10_000, 1_000, 10, &[1, 2, 3, 4], 9_000, 8_100, 2_025)]
    #[case::repairs_eat_everything(100, 100, 50, &[1, 2], 0, 0, 0)]
    #[case::no_tax_single_member(500, 0, 0, &[1], 500, 500, 500)]
    #[case::full_tax(2_000, 500, 100, &[1, 2, 3], 1_500, 0, 0)]
    #[case::flooring_tax_then_heads(1_001, 0, 3, &[1, 2], 1_001, 970, 485)]
    fn derivation_cases(
        #[case] total: i64,
        #[case] repair: i64,
        #[case] tax: i64,
        #[case] members: &[u64],
        #[case] after_repairs: i64,
        #[case] buyer_payment: i64,
        #[case] amount_per_person: i64,
    ) {
        let details = populated(total, repair, tax, members).details();

        assert_eq!(details.after_repairs, Silver::from_i64(after_repairs));
        assert_eq!(details.buyer_payment, Silver::from_i64(buyer_payment));
        assert_eq!(details.amount_per_person, Silver::from_i64(amount_per_person));
    }

    #[rstest]
    fn empty_member_set_pays_nobody(session: SplitSession) {
        let emptied = session
            .with_total_amount(Silver::from_i64(900))
            .expect("total rejected")
            .with_member_removed(MemberId(1));

        assert_eq!(emptied.member_count(), 0);
        assert_eq!(emptied.details().amount_per_person, Silver::ZERO);
        assert_eq!(emptied.details().buyer_payment, Silver::from_i64(900));
    }

    #[rstest]
    fn rejected_total_leaves_session_unchanged(session: SplitSession) {
        let session = session
            .with_total_amount(Silver::from_i64(10))
            .expect("total rejected")
            .with_repair_cost(Silver::from_i64(10))
            .expect("repair rejected");

        let err = session.with_total_amount(Silver::from_i64(5)).unwrap_err();

        assert_eq!(
            err,
            SplitValidationError::TotalBelowRepair {
                total: Silver::from_i64(5),
                repair: Silver::from_i64(10),
            }
        );
        assert_eq!(session.total_amount(), Silver::from_i64(10));
        assert_eq!(session.repair_cost(), Silver::from_i64(10));
    }

    #[rstest]
    #[case::negative_total(-1)]
    fn negative_total_rejected(session: SplitSession, #[case] total: i64) {
        assert_eq!(
            session.with_total_amount(Silver::from_i64(total)),
            Err(SplitValidationError::NegativeAmount)
        );
    }

    #[rstest]
    fn repair_cannot_exceed_total(session: SplitSession) {
        let session = session
            .with_total_amount(Silver::from_i64(100))
            .expect("total rejected");

        let err = session
            .with_repair_cost(Silver::from_i64(101))
            .unwrap_err();

        assert_eq!(
            err,
            SplitValidationError::RepairAboveTotal {
                total: Silver::from_i64(100),
                repair: Silver::from_i64(101),
            }
        );
        assert_eq!(session.repair_cost(), Silver::ZERO);
    }

    #[rstest]
    #[case::just_above(101)]
    #[case::negative(-1)]
    fn out_of_range_tax_rejected(session: SplitSession, #[case] rate: i64) {
        assert_eq!(
            session.with_tax_rate(rate),
            Err(SplitValidationError::TaxRateOutOfRange { rate })
        );
    }

    #[rstest]
    fn member_updates_are_idempotent(session: SplitSession) {
        let once = session.with_member_added(MemberId(7));
        let twice = once.with_member_added(MemberId(7));
        assert_eq!(once, twice);

        let removed = twice.with_member_removed(MemberId(7));
        let removed_again = removed.with_member_removed(MemberId(7));
        assert_eq!(removed, removed_again);
        assert_eq!(removed.member_count(), 1);
    }

    #[rstest]
    fn opener_is_the_first_member(session: SplitSession) {
        assert_eq!(session.created_by(), MemberId(1));
        assert!(session.members().contains(&MemberId(1)));
        assert_eq!(session.member_count(), 1);
    }
}
