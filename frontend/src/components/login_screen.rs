use crate::hooks::use_auth;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[function_component(LoginScreen)]
pub fn login_screen() -> Html {
    let auth = use_auth();
    let email = use_state(String::new);
    let password = use_state(String::new);

    let on_email_change = {
        let email = email.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_password_change = {
        let password = password.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_submit = {
        let auth = auth.clone();
        let email = email.clone();
        let password = password.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            auth.sign_in
                .emit(((*email).clone(), (*password).clone()));
        })
    };

    html! {
        <main class="login-screen">
            <h1>{"money"}</h1>
            <form aria-label="sign in" onsubmit={on_submit}>
                <input
                    type="email"
                    aria-label="email"
                    placeholder="email"
                    value={(*email).clone()}
                    onchange={on_email_change}
                    disabled={auth.signing_in}
                />
                <input
                    type="password"
                    aria-label="password"
                    placeholder="password"
                    value={(*password).clone()}
                    onchange={on_password_change}
                    disabled={auth.signing_in}
                />
                <button type="submit" disabled={auth.signing_in}>
                    {if auth.signing_in { "signing in..." } else { "sign in" }}
                </button>
                {if let Some(error) = auth.sign_in_error.as_ref() {
                    html! { <p role="alert" class="error">{error}</p> }
                } else {
                    html! {}
                }}
            </form>
        </main>
    }
}
