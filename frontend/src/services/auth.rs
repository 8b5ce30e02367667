use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

const SESSION_STORAGE_KEY: &str = "money-shell-session";

/// An authenticated session issued by the auth endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub email: String,
}

/// Shared slot the API client reads the bearer token from, so a sign-in
/// or sign-out is picked up by every request that follows it.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Rc<RefCell<Option<AuthSession>>>,
}

impl PartialEq for SessionStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl SessionStore {
    pub fn set(&self, session: Option<AuthSession>) {
        *self.inner.borrow_mut() = session;
    }

    pub fn session(&self) -> Option<AuthSession> {
        self.inner.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .borrow()
            .as_ref()
            .map(|session| session.access_token.clone())
    }
}

/// Session persisted across reloads, if any.
pub fn load_persisted_session() -> Option<AuthSession> {
    let storage = web_sys::window()?.local_storage().ok()??;
    let raw = storage.get_item(SESSION_STORAGE_KEY).ok()??;
    serde_json::from_str(&raw).ok()
}

pub fn persist_session(session: &AuthSession) {
    if let Some(storage) = local_storage() {
        if let Ok(raw) = serde_json::to_string(session) {
            let _ = storage.set_item(SESSION_STORAGE_KEY, &raw);
        }
    }
}

pub fn clear_persisted_session() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(SESSION_STORAGE_KEY);
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}
