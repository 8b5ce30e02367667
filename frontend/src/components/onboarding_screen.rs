use shared::ConfigUpdateBody;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct OnboardingScreenProps {
    pub updating: bool,
    pub update_error: Option<String>,
    pub on_update: Callback<ConfigUpdateBody>,
}

/// First-time budget setup: monthly income and savings percentage, with a
/// live preview of the resulting spend budget.
#[function_component(OnboardingScreen)]
pub fn onboarding_screen(props: &OnboardingScreenProps) -> Html {
    let income = use_state(String::new);
    let savings = use_state(String::new);

    let parsed = parse_budget_form(&income, &savings);

    let on_income_change = {
        let income = income.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            income.set(input.value());
        })
    };

    let on_savings_change = {
        let savings = savings.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            savings.set(input.value());
        })
    };

    let on_confirm = {
        let on_update = props.on_update.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            // Silent prevention: an incomplete or out-of-range form does
            // nothing.
            if let Some((income_value, savings_value)) = parsed {
                on_update.emit(ConfigUpdateBody {
                    monthly_income: format!("{:.2}", income_value),
                    savings_percentage: format!("{:.2}", savings_value),
                });
            }
        })
    };

    html! {
        <main class="onboarding-screen">
            <h1>{"money"}</h1>
            <form aria-label="budget setup" onsubmit={on_confirm}>
                <label for="income">{"monthly income"}</label>
                <input
                    id="income"
                    type="number"
                    inputmode="decimal"
                    value={(*income).clone()}
                    onchange={on_income_change}
                    disabled={props.updating}
                />

                <label for="savings">{"save"}</label>
                <input
                    id="savings"
                    type="number"
                    inputmode="decimal"
                    value={(*savings).clone()}
                    onchange={on_savings_change}
                    disabled={props.updating}
                />

                {if let Some((income_value, savings_value)) = parsed {
                    let saving = income_value * savings_value / 100.0;
                    let spend_budget = income_value - saving;
                    html! {
                        <p class="preview">
                            {format!("spend budget: ₹{:.0}/month · saving ₹{:.0}/month", spend_budget, saving)}
                        </p>
                    }
                } else {
                    html! {}
                }}

                <button type="submit" aria-label="confirm budget setup" disabled={props.updating}>
                    {if props.updating { "saving..." } else { "confirm" }}
                </button>

                {if let Some(error) = props.update_error.as_ref() {
                    html! { <p role="alert" class="error">{error}</p> }
                } else {
                    html! {}
                }}
            </form>
        </main>
    }
}

/// Both fields parsed and in range, or `None` while the form is incomplete.
fn parse_budget_form(income: &str, savings: &str) -> Option<(f64, f64)> {
    let income_value: f64 = income.trim().parse().ok()?;
    let savings_value: f64 = savings.trim().parse().ok()?;
    if income_value > 0.0 && (0.0..=100.0).contains(&savings_value) {
        Some((income_value, savings_value))
    } else {
        None
    }
}
