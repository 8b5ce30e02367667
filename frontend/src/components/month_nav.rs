use crate::hooks::use_month::use_month;
use crate::services::date_utils;
use shared::MonthKey;
use yew::prelude::*;

/// Previous/next month arrows around the month label. The next arrow is
/// disabled at the current calendar month; the ledger has no future.
#[function_component(MonthNav)]
pub fn month_nav() -> Html {
    let month = use_month();
    let at_current = month.month == MonthKey::current();

    let on_prev = {
        let month = month.clone();
        Callback::from(move |_: MouseEvent| month.go_prev())
    };

    let on_next = {
        let month = month.clone();
        Callback::from(move |_: MouseEvent| {
            if month.month != MonthKey::current() {
                month.go_next();
            }
        })
    };

    html! {
        <nav class="month-nav" aria-label="month navigation">
            <button aria-label="previous month" onclick={on_prev}>{"‹"}</button>
            <span class="month-label">{date_utils::month_label(&month.month)}</span>
            <button aria-label="next month" onclick={on_next} disabled={at_current}>
                {"›"}
            </button>
        </nav>
    }
}
