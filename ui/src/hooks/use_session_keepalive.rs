use futures::StreamExt;
use gloo_timers::future::IntervalStream;
use std::cell::Cell;
use std::rc::Rc;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::config::config;
use crate::{State, get_api_client};

/// While signed in, refresh the access token on a fixed interval so an idle
/// tab does not come back to a burst of 401s.
///
/// The refresh goes through the client's single-flight gate, so it never
/// races a refresh triggered by a failing request.
#[hook]
pub fn use_session_keepalive() {
    let (state, _) = use_store::<State>();
    let signed_in = state.is_authenticated();

    use_effect_with(signed_in, move |signed_in| {
        let active = Rc::new(Cell::new(*signed_in));
        if *signed_in {
            let active = active.clone();
            let millis = config().refresh_interval.as_millis();
            let period = u32::try_from(millis).unwrap_or(u32::MAX);
            yew::platform::spawn_local(async move {
                let mut ticks = IntervalStream::new(period);
                while ticks.next().await.is_some() && active.get() {
                    tracing::debug!("keepalive token refresh");
                    if let Err(e) = get_api_client().refresh_session().await {
                        tracing::warn!("keepalive refresh failed: {e}");
                    }
                }
            });
        }
        move || active.set(false)
    });
}
