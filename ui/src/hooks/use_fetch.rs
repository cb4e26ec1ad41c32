use payloads::ClientError;
use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use yew::prelude::*;

/// Distinguishes "never fetched" from "fetched and empty".
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    NotFetched,
    Fetched(T),
}

impl<T> FetchState<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Self::NotFetched => None,
            Self::Fetched(data) => Some(data),
        }
    }
}

/// Generic fetch hook return type
pub struct FetchHookReturn<T> {
    pub data: FetchState<T>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub refetch: Callback<()>,
}

impl<T: Clone> FetchHookReturn<T> {
    /// Render based on fetch state with contextual loading/error messages.
    ///
    /// Before the first successful fetch this shows a loading line or the
    /// error. Afterwards `render_fn` gets the data along with whether a
    /// refetch is running and the error of a failed refetch (the previous
    /// data stays on screen).
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: Fn(&T, bool, Option<&String>) -> Html,
    {
        match self.data.as_ref() {
            Some(data) => render_fn(data, self.is_loading, self.error.as_ref()),
            None => match &self.error {
                Some(error) if !self.is_loading => html! {
                    <div class="p-4 rounded-md bg-red-50 \
                               dark:bg-red-900/20 border \
                               border-red-200 dark:border-red-800">
                        <p class="text-sm text-red-700 dark:text-red-400">
                            {format!("Error loading {context}: {error}")}
                        </p>
                    </div>
                },
                _ => html! {
                    <div class="text-center py-12">
                        <p class="text-neutral-600 dark:text-neutral-400">
                            {format!("Loading {context}...")}
                        </p>
                    </div>
                },
            },
        }
    }
}

/// Generic fetch hook composer.
///
/// Fetches on mount and whenever `deps` change. Only the most recent fetch
/// may store its result; an answer to an older request is dropped, as is
/// anything arriving after unmount.
///
/// # Example
///
/// ```rust,ignore
/// let report = use_fetch(query.clone(), move || {
///     let query = query.clone();
///     async move { get_api_client().fetch_report(&query).await }
/// });
/// ```
#[hook]
pub fn use_fetch<T, D, F, Fut>(deps: D, fetch_fn: F) -> FetchHookReturn<T>
where
    T: Clone + 'static,
    D: PartialEq + Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, ClientError>> + 'static,
{
    let data = use_state(|| FetchState::NotFetched);
    let error = use_state(|| None::<String>);
    let is_loading = use_state(|| false);
    let generation = use_memo((), |_| Cell::new(0u64));

    let refetch = {
        let data = data.clone();
        let error = error.clone();
        let is_loading = is_loading.clone();
        let generation = generation.clone();
        let fetch_fn = Rc::new(fetch_fn);

        use_callback(deps.clone(), move |_, _| {
            let data = data.clone();
            let error = error.clone();
            let is_loading = is_loading.clone();
            let generation = generation.clone();
            let fetch_fn = fetch_fn.clone();

            let ticket = generation.get() + 1;
            generation.set(ticket);

            yew::platform::spawn_local(async move {
                is_loading.set(true);
                error.set(None);

                let result = fetch_fn().await;
                if generation.get() != ticket {
                    tracing::debug!("dropping superseded fetch result");
                    return;
                }
                match result {
                    Ok(result) => data.set(FetchState::Fetched(result)),
                    Err(e) => error.set(Some(e.user_message())),
                }
                is_loading.set(false);
            });
        })
    };

    // Auto-fetch on mount and when deps change
    {
        let refetch = refetch.clone();
        let generation = generation.clone();

        use_effect_with(deps, move |_| {
            refetch.emit(());
            move || generation.set(generation.get() + 1)
        });
    }

    FetchHookReturn {
        data: (*data).clone(),
        is_loading: *is_loading,
        error: (*error).clone(),
        refetch: Callback::from(move |_| refetch.emit(())),
    }
}
