use crate::services::date_utils;
use shared::Expense;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ExpenseListProps {
    pub expenses: Vec<Expense>,
    pub loading: bool,
    pub load_failed: bool,
    pub on_retry: Callback<()>,
}

/// Newest-first list of the month's expenses. Entries awaiting server
/// confirmation render dimmed via the `pending` class.
#[function_component(ExpenseList)]
pub fn expense_list(props: &ExpenseListProps) -> Html {
    if props.load_failed {
        let on_retry = props.on_retry.clone();
        let onclick = Callback::from(move |_: MouseEvent| on_retry.emit(()));
        return html! {
            <div class="expense-list error" role="alert">
                <p>{"couldn't load this month"}</p>
                <button onclick={onclick}>{"retry"}</button>
            </div>
        };
    }

    if props.loading && props.expenses.is_empty() {
        return html! {
            <div class="expense-list loading">
                <p>{"loading..."}</p>
            </div>
        };
    }

    if props.expenses.is_empty() {
        return html! {
            <div class="expense-list empty">
                <p>{"nothing spent this month"}</p>
            </div>
        };
    }

    html! {
        <ul class="expense-list">
            {for props.expenses.iter().map(|expense| {
                let class = if expense.id.is_pending() {
                    "expense-row pending"
                } else {
                    "expense-row"
                };
                html! {
                    <li key={expense.id.to_string()} class={class}>
                        <span class="date">
                            {date_utils::format_expense_date(&expense.expense_date)}
                        </span>
                        <span class="label">
                            {expense.label.clone().unwrap_or_default()}
                        </span>
                        <span class="amount">
                            {format!("₹{}", expense.amount)}
                        </span>
                    </li>
                }
            })}
        </ul>
    }
}
