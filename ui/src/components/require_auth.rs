use payloads::responses::UserProfile;
use yew::prelude::*;

use crate::hooks::{login_redirect, use_require_auth};

/// Renders its children only for a signed-in user.
///
/// Anyone else is sent to the login page. Keeping the check in a wrapper
/// means child hooks never run (and never fetch) without a session.
#[derive(Properties, PartialEq)]
pub struct RequireAuthProps {
    #[prop_or_default]
    pub children: Children,
    /// Alternative to `children` for content that needs the profile.
    #[prop_or_default]
    pub render: Option<Callback<UserProfile, Html>>,
}

#[function_component]
pub fn RequireAuth(props: &RequireAuthProps) -> Html {
    let Some(profile) = use_require_auth() else {
        return login_redirect();
    };

    if let Some(render) = &props.render {
        return render.emit(profile);
    }

    html! {
        <>
            {for props.children.iter()}
        </>
    }
}
