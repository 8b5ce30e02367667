use shared::{ConfigUpdateBody, UserConfig};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SettingsScreenProps {
    pub config: UserConfig,
    pub updating: bool,
    pub on_update: Callback<ConfigUpdateBody>,
    pub on_back: Callback<()>,
    pub on_sign_out: Callback<()>,
}

/// Budget settings: edit income and savings percentage. Leaving the
/// screen saves dirty changes; sign-out ends the session.
#[function_component(SettingsScreen)]
pub fn settings_screen(props: &SettingsScreenProps) -> Html {
    let initial_income = display_number(&props.config.monthly_income);
    let initial_savings = display_number(&props.config.savings_percentage);

    let income = use_state(|| initial_income.clone());
    let savings = use_state(|| initial_savings.clone());

    let parsed = parse_budget_form(&income, &savings);
    let dirty = *income != initial_income || *savings != initial_savings;

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

    let on_back = {
        let on_update = props.on_update.clone();
        let on_back = props.on_back.clone();
        Callback::from(move |_: MouseEvent| {
            // Dirty and valid changes are saved on the way out; invalid
            // edits are dropped.
            if dirty {
                if let Some((income_value, savings_value)) = parsed {
                    on_update.emit(ConfigUpdateBody {
                        monthly_income: format!("{:.2}", income_value),
                        savings_percentage: format!("{:.2}", savings_value),
                    });
                }
            }
            on_back.emit(());
        })
    };

    let on_sign_out = {
        let on_sign_out = props.on_sign_out.clone();
        Callback::from(move |_: MouseEvent| on_sign_out.emit(()))
    };

    html! {
        <main class="settings-screen">
            <button aria-label="back to money" onclick={on_back} disabled={props.updating}>
                {"← back to money"}
            </button>

            <section aria-label="budget">
                <h2>{"budget"}</h2>

                <label for="income">{"monthly income"}</label>
                <input
                    id="income"
                    type="number"
                    inputmode="decimal"
                    value={(*income).clone()}
                    onchange={on_income_change}
                />

                <label for="savings">{"savings"}</label>
                <input
                    id="savings"
                    type="number"
                    inputmode="decimal"
                    value={(*savings).clone()}
                    onchange={on_savings_change}
                />

                {if let Some((income_value, savings_value)) = parsed {
                    let spend_budget = income_value - income_value * savings_value / 100.0;
                    html! {
                        <p class="preview">
                            {format!("spend budget: ₹{:.0}/month", spend_budget)}
                        </p>
                    }
                } else {
                    html! {}
                }}
            </section>

            <section aria-label="account">
                <h2>{"account"}</h2>
                <button onclick={on_sign_out}>{"sign out"}</button>
            </section>
        </main>
    }
}

/// Render a stored two-decimal string the way a number input shows it
/// ("50000.00" → "50000").
fn display_number(stored: &str) -> String {
    match stored.parse::<f64>() {
        Ok(value) => format!("{}", value),
        Err(_) => stored.to_string(),
    }
}

fn parse_budget_form(income: &str, savings: &str) -> Option<(f64, f64)> {
    let income_value: f64 = income.trim().parse().ok()?;
    let savings_value: f64 = savings.trim().parse().ok()?;
    if income_value > 0.0 && (0.0..=100.0).contains(&savings_value) {
        Some((income_value, savings_value))
    } else {
        None
    }
}
