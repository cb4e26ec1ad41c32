use yew::prelude::*;
use yewdux::prelude::*;

use crate::{State, get_api_client};

/// Hook to check the session with the backend once on startup.
///
/// A profile restored from localStorage is shown until the check answers.
#[hook]
pub fn use_authentication() {
    let (_state, dispatch) = use_store::<State>();

    use_effect_with((), move |_| {
        yew::platform::spawn_local(async move {
            match get_api_client().session_check().await {
                Ok(Some(profile)) => {
                    tracing::debug!("session valid for {}", profile.username);
                    dispatch.reduce_mut(|state| state.login(profile));
                }
                Ok(None) => {
                    dispatch.reduce_mut(|state| state.clear());
                }
                Err(e) => {
                    // Unreachable backend: keep whatever was restored. The
                    // next request will sort out an expired session.
                    tracing::warn!("session check failed: {e}");
                    dispatch.reduce_mut(|state| {
                        state.session_checked = true;
                        if !state.is_authenticated() {
                            state.clear();
                        }
                    });
                }
            }
        });
    });
}
