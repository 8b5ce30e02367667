use crate::services::api::ApiClient;
use crate::services::logging::Logger;
use query::ConfigStore;
use shared::{ConfigUpdateBody, UserConfig};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
pub struct ConfigState {
    /// `None` after load means no config exists yet (first-time setup).
    pub config: Option<UserConfig>,
    pub loading: bool,
    pub load_failed: bool,
    pub updating: bool,
    pub update_error: Option<String>,
}

pub struct UseConfigResult {
    pub state: ConfigState,
    pub actions: UseConfigActions,
}

#[derive(Clone)]
pub struct UseConfigActions {
    pub refresh: Callback<()>,
    pub update_config: Callback<ConfigUpdateBody>,
}

#[hook]
pub fn use_config(api_client: &ApiClient) -> UseConfigResult {
    let store = use_memo(api_client.clone(), |client| ConfigStore::new(client.clone()));
    let config = use_state(|| Option::<UserConfig>::None);
    let loading = use_state(|| true);
    let load_failed = use_state(|| false);
    let updating = use_state(|| false);
    let update_error = use_state(|| Option::<String>::None);

    let refresh = {
        let store = store.clone();
        let config = config.clone();
        let loading = loading.clone();
        let load_failed = load_failed.clone();

        use_callback((), move |_, _| {
            let store = store.clone();
            let config = config.clone();
            let loading = loading.clone();
            let load_failed = load_failed.clone();

            spawn_local(async move {
                loading.set(true);
                match store.fetch().await {
                    Ok(fetched) => {
                        load_failed.set(false);
                        config.set(fetched);
                    }
                    Err(e) => {
                        Logger::error("config", &format!("failed to fetch config: {}", e));
                        load_failed.set(true);
                    }
                }
                loading.set(false);
            });
        })
    };

    let update_config = {
        let store = store.clone();
        let updating = updating.clone();
        let update_error = update_error.clone();
        let refresh = refresh.clone();

        use_callback((), move |body: ConfigUpdateBody, _| {
            let store = store.clone();
            let updating = updating.clone();
            let update_error = update_error.clone();
            let refresh = refresh.clone();

            spawn_local(async move {
                updating.set(true);
                update_error.set(None);

                match store.update(&body).await {
                    Ok(_) => {
                        // The store invalidated its entry; re-read server state.
                        refresh.emit(());
                    }
                    Err(e) => {
                        Logger::error("config", &format!("failed to update config: {}", e));
                        update_error.set(Some("couldn't save, try again".to_string()));
                    }
                }

                updating.set(false);
            });
        })
    };

    // Load once on mount.
    use_effect_with((), {
        let refresh = refresh.clone();
        move |_| {
            refresh.emit(());
            || ()
        }
    });

    let state = ConfigState {
        config: (*config).clone(),
        loading: *loading,
        load_failed: *load_failed,
        updating: *updating,
        update_error: (*update_error).clone(),
    };

    let actions = UseConfigActions {
        refresh,
        update_config,
    };

    UseConfigResult { state, actions }
}
