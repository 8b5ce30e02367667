use shared::{Expense, UserConfig};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct BudgetSummaryProps {
    pub config: UserConfig,
    pub expenses: Vec<Expense>,
}

/// Month header line: amount spent against the spend budget, with an
/// over-budget class once spending crosses the line.
#[function_component(BudgetSummary)]
pub fn budget_summary(props: &BudgetSummaryProps) -> Html {
    let spent = total_spent(&props.expenses);
    let budget = spend_budget(&props.config);

    let class = if spent > budget {
        "budget-summary over"
    } else {
        "budget-summary"
    };

    html! {
        <div class={class} aria-label="budget summary">
            <span class="spent">{format!("₹{:.0}", spent)}</span>
            <span class="separator">{" of "}</span>
            <span class="budget">{format!("₹{:.0}", budget)}</span>
        </div>
    }
}

/// Sum of the month's amounts, optimistic entries included.
pub fn total_spent(expenses: &[Expense]) -> f64 {
    expenses
        .iter()
        .filter_map(|e| e.amount.parse::<f64>().ok())
        .sum()
}

/// Income minus the configured savings cut.
pub fn spend_budget(config: &UserConfig) -> f64 {
    let income: f64 = config.monthly_income.parse().unwrap_or(0.0);
    let savings: f64 = config.savings_percentage.parse().unwrap_or(0.0);
    income - income * savings / 100.0
}
