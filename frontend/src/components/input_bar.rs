use crate::services::date_utils;
use shared::ExpenseCreateBody;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct InputBarProps {
    pub creating: bool,
    pub create_error: Option<String>,
    pub create_success: bool,
    pub on_create: Callback<ExpenseCreateBody>,
}

/// Fixed entry bar at the bottom of the tracker: amount, optional label,
/// and an add button. Submitting with an invalid amount does nothing.
#[function_component(InputBar)]
pub fn input_bar(props: &InputBarProps) -> Html {
    let amount = use_state(String::new);
    let label = use_state(String::new);
    let amount_ref = use_node_ref();

    // Keyboard-first: the amount field takes focus as soon as the bar mounts.
    use_effect_with((), {
        let amount_ref = amount_ref.clone();
        move |_| {
            if let Some(input) = amount_ref.cast::<HtmlInputElement>() {
                let _ = input.focus();
            }
            || ()
        }
    });

    // After a successful save, clear the fields and put the cursor back in
    // amount for the next entry.
    use_effect_with(props.create_success, {
        let amount = amount.clone();
        let label = label.clone();
        let amount_ref = amount_ref.clone();
        move |success| {
            if *success {
                amount.set(String::new());
                label.set(String::new());
                if let Some(input) = amount_ref.cast::<HtmlInputElement>() {
                    let _ = input.focus();
                }
            }
            || ()
        }
    });

    let on_amount_change = {
        let amount = amount.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            amount.set(input.value());
        })
    };

    let on_label_change = {
        let label = label.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            label.set(input.value());
        })
    };

    let on_submit = {
        let amount = amount.clone();
        let label = label.clone();
        let on_create = props.on_create.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let parsed: Option<f64> = amount.trim().parse().ok();
            let value = match parsed {
                Some(v) if v > 0.0 => v,
                // Silent prevention: a zero, negative, or unparseable
                // amount does nothing.
                _ => return,
            };

            let trimmed = label.trim();
            let body = ExpenseCreateBody {
                amount: format!("{:.2}", value),
                label: (!trimmed.is_empty()).then(|| trimmed.to_string()),
                expense_date: date_utils::current_date(),
            };
            if body.validate().is_err() {
                return;
            }
            on_create.emit(body);
        })
    };

    html! {
        <form class="input-bar" aria-label="add expense" onsubmit={on_submit}>
            <input
                ref={amount_ref}
                type="number"
                inputmode="decimal"
                aria-label="amount"
                placeholder="amount"
                value={(*amount).clone()}
                onchange={on_amount_change}
                disabled={props.creating}
            />
            <input
                type="text"
                aria-label="label"
                placeholder="what for? (optional)"
                maxlength="200"
                value={(*label).clone()}
                onchange={on_label_change}
                disabled={props.creating}
            />
            <button type="submit" aria-label="add expense" disabled={props.creating}>
                {"add"}
            </button>
            {if let Some(error) = props.create_error.as_ref() {
                html! { <p role="alert" class="error">{error}</p> }
            } else {
                html! {}
            }}
        </form>
    }
}
