use splitcord_application::{PanelRetire, PanelView};
use splitcord_i18n as i18n;

/// Renders one split panel into the message body shown above the
/// controls. Pure text; the component rows are the caller's business.
pub struct SplitPanelPresenter;

impl SplitPanelPresenter {
    pub fn render(view: &PanelView) -> String {
        Self::summary(view)
    }

    /// Terminal form: the last summary plus one line saying how the
    /// session ended.
    pub fn render_retired(view: &PanelView, reason: PanelRetire) -> String {
        let ending = match reason {
            PanelRetire::Closed => i18n::PANEL_CLOSED.to_owned(),
            PanelRetire::Expired => i18n::PANEL_EXPIRED.to_owned(),
            PanelRetire::PaidOut => {
                if view.details.amount_per_person.is_positive() {
                    i18n::paid_out_summary(
                        view.details.amount_per_person.amount(),
                        view.session.member_count(),
                    )
                } else {
                    i18n::PAID_OUT_NOTHING.to_owned()
                }
            }
        };
        format!("{}\n\n{ending}", Self::summary(view))
    }

    fn summary(view: &PanelView) -> String {
        let session = &view.session;
        let details = &view.details;

        let opener = i18n::member_mention(session.created_by().0);
        let members = session
            .members()
            .iter()
            .map(|member| i18n::member_mention(member.0))
            .collect::<Vec<_>>()
            .join(" ");
        let count = session.member_count();
        let total = i18n::format_silver(session.total_amount().amount());
        let repair = i18n::format_silver(session.repair_cost().amount());
        let rate = session.tax_rate();
        let after_repairs = i18n::format_silver(details.after_repairs.amount());
        let buyer_payment = i18n::format_silver(details.buyer_payment.amount());
        let share = i18n::format_silver(details.amount_per_person.amount());

        format!(
            "**{}**\n{} {opener}\n\n{}: {total}\n{}: {repair}\n{}: {rate}%\n{}: {after_repairs}\n{}: {buyer_payment}\n\n{} ({count}): {members}\n{}: **{share}**",
            i18n::SPLIT_PANEL_TITLE,
            i18n::OPENED_BY,
            i18n::LOOT_TOTAL,
            i18n::REPAIR_COST,
            i18n::TAX_RATE,
            i18n::AFTER_REPAIRS,
            i18n::BUYER_PAYMENT,
            i18n::MEMBERS,
            i18n::PER_MEMBER,
        )
    }
}
