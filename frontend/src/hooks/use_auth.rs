use crate::services::api::ApiClient;
use crate::services::auth::{self, AuthSession, SessionStore};
use crate::services::logging::Logger;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Auth session state plus the API client bound to it.
#[derive(Clone, PartialEq)]
pub struct AuthHandle {
    pub session: Option<AuthSession>,
    /// True until the persisted session (if any) has been restored.
    pub loading: bool,
    pub signing_in: bool,
    pub sign_in_error: Option<String>,
    pub api_client: ApiClient,
    pub sign_in: Callback<(String, String)>,
    pub sign_out: Callback<()>,
}

#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    #[prop_or_default]
    pub children: Html,
}

#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    let session = use_state(|| Option::<AuthSession>::None);
    let loading = use_state(|| true);
    let signing_in = use_state(|| false);
    let sign_in_error = use_state(|| Option::<String>::None);

    let session_store = (*use_memo((), |_| SessionStore::default())).clone();
    let api_client = (*use_memo(session_store.clone(), |store| ApiClient::new(store.clone())))
        .clone();

    // Restore the persisted session once at startup.
    use_effect_with((), {
        let session = session.clone();
        let loading = loading.clone();
        let session_store = session_store.clone();
        move |_| {
            if let Some(restored) = auth::load_persisted_session() {
                Logger::info("auth", &format!("restored session for {}", restored.email));
                session_store.set(Some(restored.clone()));
                session.set(Some(restored));
            }
            loading.set(false);
            || ()
        }
    });

    let sign_in = {
        let api_client = api_client.clone();
        let session = session.clone();
        let session_store = session_store.clone();
        let signing_in = signing_in.clone();
        let sign_in_error = sign_in_error.clone();

        use_callback((), move |(email, password): (String, String), _| {
            let api_client = api_client.clone();
            let session = session.clone();
            let session_store = session_store.clone();
            let signing_in = signing_in.clone();
            let sign_in_error = sign_in_error.clone();

            spawn_local(async move {
                signing_in.set(true);
                sign_in_error.set(None);

                match api_client.login(&email, &password).await {
                    Ok(new_session) => {
                        auth::persist_session(&new_session);
                        session_store.set(Some(new_session.clone()));
                        session.set(Some(new_session));
                    }
                    Err(e) => {
                        Logger::warn("auth", &format!("sign-in failed: {}", e));
                        sign_in_error.set(Some("incorrect email or password".to_string()));
                    }
                }

                signing_in.set(false);
            });
        })
    };

    let sign_out = {
        let api_client = api_client.clone();
        let session = session.clone();
        let session_store = session_store.clone();

        use_callback((), move |_, _| {
            let api_client = api_client.clone();
            let session = session.clone();
            let session_store = session_store.clone();

            spawn_local(async move {
                // Best effort; the local session is cleared regardless.
                if let Err(e) = api_client.logout().await {
                    Logger::warn("auth", &format!("sign-out request failed: {}", e));
                }
                auth::clear_persisted_session();
                session_store.set(None);
                session.set(None);
            });
        })
    };

    let handle = AuthHandle {
        session: (*session).clone(),
        loading: *loading,
        signing_in: *signing_in,
        sign_in_error: (*sign_in_error).clone(),
        api_client,
        sign_in,
        sign_out,
    };

    html! {
        <ContextProvider<AuthHandle> context={handle}>
            {props.children.clone()}
        </ContextProvider<AuthHandle>>
    }
}

#[hook]
pub fn use_auth() -> AuthHandle {
    use_context::<AuthHandle>().expect("use_auth must be called inside AuthProvider")
}
