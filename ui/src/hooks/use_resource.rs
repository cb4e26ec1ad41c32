use payloads::{APIClient, ClientError, Resource, ResourceController, ResourceList};
use std::cell::Ref;
use std::future::Future;
use yew::prelude::*;

use crate::contexts::toast::ToastHandle;
use crate::get_api_client;

/// Handle returned by [`use_resource`].
///
/// The list state lives in the component; the controller mutates it and
/// forces a re-render on every change.
pub struct UseResourceHandle<R: Resource> {
    controller: ResourceController<R>,
}

impl<R: Resource> Clone for UseResourceHandle<R> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
        }
    }
}

impl<R: Resource> UseResourceHandle<R> {
    /// Borrow the current list state for rendering.
    pub fn list(&self) -> Ref<'_, ResourceList<R>> {
        self.controller.state()
    }

    pub fn reload(&self) {
        let controller = self.controller.clone();
        yew::platform::spawn_local(async move { controller.load().await });
    }

    pub fn set_filters(&self, filters: R::Filters) {
        let controller = self.controller.clone();
        yew::platform::spawn_local(async move {
            controller.set_filters(filters).await
        });
    }

    pub fn set_page(&self, page: u32) {
        let controller = self.controller.clone();
        yew::platform::spawn_local(async move { controller.set_page(page).await });
    }

    /// Run a write through the controller and report the outcome as a toast.
    /// `on_success` runs after the list has been reloaded.
    pub fn write<F, Fut>(
        &self,
        toast: &ToastHandle,
        success: impl Into<String>,
        on_success: Callback<()>,
        op: F,
    ) where
        F: FnOnce(ResourceController<R>) -> Fut + 'static,
        Fut: Future<Output = bool> + 'static,
    {
        let controller = self.controller.clone();
        let toast = toast.clone();
        let success = success.into();
        yew::platform::spawn_local(async move {
            if op(controller.clone()).await {
                toast.success(success);
                on_success.emit(());
            } else if let Some(error) = controller.state().error.clone() {
                toast.error(error);
            }
        });
    }

    pub fn create(
        &self,
        toast: &ToastHandle,
        details: R::Create,
        on_success: Callback<()>,
    ) {
        let message = format!("{} created", capitalize(R::NAME));
        self.write(toast, message, on_success, move |c| async move {
            c.create(details).await
        });
    }

    pub fn update(
        &self,
        toast: &ToastHandle,
        id: R::Id,
        details: R::Update,
        on_success: Callback<()>,
    ) {
        let message = format!("{} updated", capitalize(R::NAME));
        self.write(toast, message, on_success, move |c| async move {
            c.update(id, details).await
        });
    }

    pub fn remove(&self, toast: &ToastHandle, id: R::Id, on_success: Callback<()>) {
        let message = format!("{} deleted", capitalize(R::NAME));
        self.write(toast, message, on_success, move |c| async move {
            c.remove(id).await
        });
    }

    /// Run a record action (activate, approve, ...) that reloads on success.
    pub fn action<F, Fut>(
        &self,
        toast: &ToastHandle,
        success: impl Into<String>,
        on_success: Callback<()>,
        op: F,
    ) where
        F: FnOnce(APIClient) -> Fut + 'static,
        Fut: Future<Output = Result<(), ClientError>> + 'static,
    {
        self.write(toast, success, on_success, move |c| async move {
            c.perform(op).await
        });
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Hook owning the list state for one resource collection.
///
/// Loads the first page on mount. On unmount the list is invalidated so a
/// response still in flight is discarded.
#[hook]
pub fn use_resource<R: Resource>(page_size: u32) -> UseResourceHandle<R> {
    let state =
        use_mut_ref(|| ResourceList::<R>::new(R::Filters::default(), page_size));
    let force_update = use_force_update();

    let controller = use_memo((), move |_| {
        ResourceController::new(state, get_api_client(), move || {
            force_update.force_update()
        })
    });

    {
        let controller = (*controller).clone();
        use_effect_with((), move |_| {
            let loader = controller.clone();
            yew::platform::spawn_local(async move { loader.load().await });
            move || controller.invalidate()
        });
    }

    UseResourceHandle {
        controller: (*controller).clone(),
    }
}
