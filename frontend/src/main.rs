mod components;
mod hooks;
mod services;

use components::{
    BudgetSummary, ExpenseList, InputBar, LoginScreen, MonthNav, OnboardingScreen, SettingsScreen,
};
use hooks::{use_auth, use_config, use_expenses, use_month, AuthProvider, MonthProvider};
use yew::prelude::*;

#[function_component(App)]
fn app() -> Html {
    html! {
        <AuthProvider>
            <MonthProvider>
                <Shell />
            </MonthProvider>
        </AuthProvider>
    }
}

/// Top-level gate: wait for session restore, then show the login screen or
/// the signed-in app.
#[function_component(Shell)]
fn shell() -> Html {
    let auth = use_auth();

    if auth.loading {
        return html! { <div class="app-loading">{"loading..."}</div> };
    }

    if auth.session.is_none() {
        return html! { <LoginScreen /> };
    }

    html! { <ConfigGate /> }
}

/// Signed-in gate: no stored budget yet means onboarding, otherwise the
/// tracker. Owns the config hook so onboarding and settings share one store.
#[function_component(ConfigGate)]
fn config_gate() -> Html {
    let auth = use_auth();
    let config = use_config(&auth.api_client);

    if config.state.loading && config.state.config.is_none() {
        return html! { <div class="app-loading">{"loading..."}</div> };
    }

    if config.state.load_failed {
        let refresh = config.actions.refresh.clone();
        let onclick = Callback::from(move |_: MouseEvent| refresh.emit(()));
        return html! {
            <div class="app-error" role="alert">
                <p>{"couldn't load your budget"}</p>
                <button onclick={onclick}>{"retry"}</button>
            </div>
        };
    }

    match config.state.config.clone() {
        None => html! {
            <OnboardingScreen
                updating={config.state.updating}
                update_error={config.state.update_error.clone()}
                on_update={config.actions.update_config.clone()}
            />
        },
        Some(user_config) => html! {
            <TrackerShell
                config={user_config}
                updating={config.state.updating}
                on_update={config.actions.update_config.clone()}
            />
        },
    }
}

#[derive(Properties, PartialEq)]
struct TrackerShellProps {
    config: shared::UserConfig,
    updating: bool,
    on_update: Callback<shared::ConfigUpdateBody>,
}

/// The tracker proper, with a settings overlay toggled in local state.
#[function_component(TrackerShell)]
fn tracker_shell(props: &TrackerShellProps) -> Html {
    let auth = use_auth();
    let month = use_month();
    let expenses = use_expenses(&auth.api_client, month.month);
    let show_settings = use_state(|| false);

    if *show_settings {
        let on_back = {
            let show_settings = show_settings.clone();
            Callback::from(move |_| show_settings.set(false))
        };
        return html! {
            <SettingsScreen
                config={props.config.clone()}
                updating={props.updating}
                on_update={props.on_update.clone()}
                on_back={on_back}
                on_sign_out={auth.sign_out.clone()}
            />
        };
    }

    let open_settings = {
        let show_settings = show_settings.clone();
        Callback::from(move |_: MouseEvent| show_settings.set(true))
    };

    html! {
        <main class="tracker-screen">
            <header class="tracker-header">
                <MonthNav />
                <button aria-label="settings" onclick={open_settings}>{"⚙"}</button>
            </header>

            <BudgetSummary
                config={props.config.clone()}
                expenses={expenses.state.expenses.clone()}
            />

            <ExpenseList
                expenses={expenses.state.expenses.clone()}
                loading={expenses.state.loading}
                load_failed={expenses.state.load_failed}
                on_retry={expenses.actions.refresh.clone()}
            />

            <InputBar
                creating={expenses.state.creating}
                create_error={expenses.state.create_error.clone()}
                create_success={expenses.state.create_success}
                on_create={expenses.actions.create_expense.clone()}
            />
        </main>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
