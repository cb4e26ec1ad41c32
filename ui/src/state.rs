use payloads::responses::UserProfile;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use yewdux::prelude::*;

/// localStorage key holding the last known signed-in profile.
pub const SESSION_KEY: &str = "retail_session";

#[derive(Clone, PartialEq, Default)]
pub enum AuthState {
    #[default]
    Unknown,
    LoggedOut,
    LoggedIn(UserProfile),
}

/// What gets written to localStorage. Tokens live in HTTP-only cookies, so
/// this is only the profile used to render the shell before the session
/// check answers.
#[derive(Serialize, Deserialize)]
struct PersistedSession {
    profile: UserProfile,
}

/// The only state shared across pages.
#[derive(Clone, PartialEq, Store)]
#[store(listener(SessionPersister))]
pub struct State {
    pub auth_state: AuthState,
    /// True once the startup session check has answered.
    pub session_checked: bool,
}

impl Default for State {
    fn default() -> Self {
        let auth_state = match load_session() {
            Some(profile) => AuthState::LoggedIn(profile),
            None => AuthState::Unknown,
        };
        Self {
            auth_state,
            session_checked: false,
        }
    }
}

impl State {
    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth_state, AuthState::LoggedIn(_))
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match &self.auth_state {
            AuthState::LoggedIn(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn login(&mut self, profile: UserProfile) {
        self.auth_state = AuthState::LoggedIn(profile);
        self.session_checked = true;
    }

    /// Forget the session locally. The persisted copy goes with it.
    pub fn clear(&mut self) {
        self.auth_state = AuthState::LoggedOut;
        self.session_checked = true;
    }
}

/// Mirrors the auth state into localStorage on every change.
struct SessionPersister;

impl yewdux::listener::Listener for SessionPersister {
    type Store = State;

    fn on_change(&self, _cx: &yewdux::Context, state: Rc<Self::Store>) {
        match &state.auth_state {
            AuthState::LoggedIn(profile) => save_session(profile),
            AuthState::LoggedOut => remove_session(),
            AuthState::Unknown => {}
        }
    }
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn load_session() -> Option<UserProfile> {
    let raw = storage()?.get_item(SESSION_KEY).ok()??;
    match serde_json::from_str::<PersistedSession>(&raw) {
        Ok(session) => Some(session.profile),
        Err(e) => {
            tracing::warn!("discarding unreadable stored session: {e}");
            remove_session();
            None
        }
    }
}

fn save_session(profile: &UserProfile) {
    let session = PersistedSession {
        profile: profile.clone(),
    };
    let Some(storage) = storage() else { return };
    match serde_json::to_string(&session) {
        Ok(raw) => {
            if storage.set_item(SESSION_KEY, &raw).is_err() {
                tracing::warn!("could not persist session");
            }
        }
        Err(e) => tracing::warn!("could not serialize session: {e}"),
    }
}

pub fn remove_session() {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(SESSION_KEY);
    }
}
