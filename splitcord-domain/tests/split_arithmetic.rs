use proptest::prelude::*;
use splitcord_domain::{MemberId, Silver, SplitSession};

fn session_from(
    total: i64,
    repair: i64,
    tax: i64,
    member_count: usize,
) -> SplitSession {
    let mut session = SplitSession::new(MemberId(1), chrono::DateTime::UNIX_EPOCH);
    for idx in 1..member_count {
        session = session.with_member_added(MemberId(idx as u64 + 1));
    }
    let session = session
        .with_total_amount(Silver::from_i64(total))
        .expect("total rejected");
    let session = session
        .with_repair_cost(Silver::from_i64(repair))
        .expect("repair rejected");
    session.with_tax_rate(tax).expect("tax rejected")
}

proptest! {
    #[test]
    fn derivation_chain_never_grows(
        total in 0i64..=1_000_000_000_000,
        repair_fraction in 0u32..=1_000,
        tax in 0i64..=100,
        member_count in 1usize..=25,
    ) {
        let repair = (i128::from(total) * i128::from(repair_fraction) / 1_000) as i64;
        let session = session_from(total, repair, tax, member_count);
        let details = session.details();

        let after = details.after_repairs.amount();
        let buyer = details.buyer_payment.amount();
        let per_person = details.amount_per_person.amount();

        prop_assert!(after >= 0);
        prop_assert!(after <= total);
        prop_assert!(buyer >= 0);
        prop_assert!(buyer <= after);
        prop_assert!(per_person >= 0);
        prop_assert!(per_person * member_count as i64 <= buyer);
        // The dust lost to flooring stays under one unit per step.
        prop_assert!(buyer - per_person * (member_count as i64) < member_count as i64);
    }

    #[test]
    fn rejected_mutations_change_nothing(
        total in 0i64..=1_000_000,
        tax in 0i64..=100,
        bad_total_gap in 1i64..=1_000,
        bad_tax in 101i64..=10_000,
    ) {
        let session = session_from(total, total, tax, 3);

        if total > 0 {
            prop_assert!(session.with_total_amount(Silver::from_i64(total - bad_total_gap.min(total))).is_err());
        }
        prop_assert!(session.with_repair_cost(Silver::from_i64(total + bad_total_gap)).is_err());
        prop_assert!(session.with_tax_rate(bad_tax).is_err());
        prop_assert!(session.with_tax_rate(-bad_tax).is_err());

        prop_assert_eq!(session.total_amount(), Silver::from_i64(total));
        prop_assert_eq!(session.repair_cost(), Silver::from_i64(total));
        prop_assert_eq!(session.tax_rate() as i64, tax);
    }
}
