use std::rc::Rc;
use uuid::Uuid;
use yew::prelude::*;

const DEFAULT_DURATION_MS: u32 = 5000;
/// Errors stay up a little longer than confirmations.
const ERROR_DURATION_MS: u32 = 8000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastKind {
    Error,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub kind: ToastKind,
    /// Milliseconds before auto-dismiss.
    pub duration: u32,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        let duration = match kind {
            ToastKind::Error => ERROR_DURATION_MS,
            _ => DEFAULT_DURATION_MS,
        };
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            duration,
        }
    }
}

/// Toasts in the order they were raised.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToastState {
    pub toasts: Vec<Toast>,
}

pub enum ToastAction {
    Add(Toast),
    Remove(Uuid),
}

impl Reducible for ToastState {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut toasts = self.toasts.clone();
        match action {
            ToastAction::Add(toast) => toasts.push(toast),
            ToastAction::Remove(id) => toasts.retain(|t| t.id != id),
        }
        Rc::new(ToastState { toasts })
    }
}

pub type ToastContext = UseReducerHandle<ToastState>;

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    pub children: Children,
}

#[function_component]
pub fn ToastProvider(props: &ToastProviderProps) -> Html {
    let toast_state = use_reducer(ToastState::default);

    html! {
        <ContextProvider<ToastContext> context={toast_state}>
            {props.children.clone()}
        </ContextProvider<ToastContext>>
    }
}

#[derive(Clone)]
pub struct ToastHandle {
    context: ToastContext,
}

impl ToastHandle {
    pub fn add(&self, toast: Toast) {
        let id = toast.id;
        let duration = toast.duration;
        self.context.dispatch(ToastAction::Add(toast));

        let context = self.context.clone();
        yew::platform::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(duration).await;
            context.dispatch(ToastAction::Remove(id));
        });
    }

    pub fn error(&self, message: impl Into<String>) {
        self.add(Toast::new(message, ToastKind::Error));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.add(Toast::new(message, ToastKind::Success));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.add(Toast::new(message, ToastKind::Info));
    }

    pub fn remove(&self, id: Uuid) {
        self.context.dispatch(ToastAction::Remove(id));
    }
}

#[hook]
pub fn use_toast() -> ToastHandle {
    let context = use_context::<ToastContext>()
        .expect("use_toast must be used within a ToastProvider");
    ToastHandle { context }
}
