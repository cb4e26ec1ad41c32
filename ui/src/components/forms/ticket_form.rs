use payloads::requests::{
    TicketDetails, TicketUpdate, Validate, ValidationErrors,
};
use payloads::{
    FieldErrors, SupportTicket, TicketPriority, TicketStatus, User, UserId,
};
use yew::prelude::*;

use super::{FormActions, bind};
use crate::components::form_field::{
    SelectField, TextAreaField, TextField, field_error,
};

#[derive(Debug, Clone, PartialEq)]
struct TicketDraft {
    subject: String,
    description: String,
    customer: String,
    priority: TicketPriority,
    status: TicketStatus,
}

impl TicketDraft {
    fn to_details(&self) -> TicketDetails {
        TicketDetails {
            subject: self.subject.trim().to_string(),
            description: self.description.trim().to_string(),
            customer: self.customer.trim().to_string(),
            priority: self.priority,
        }
    }

    fn to_update(&self) -> TicketUpdate {
        TicketUpdate {
            subject: self.subject.trim().to_string(),
            description: self.description.trim().to_string(),
            priority: self.priority,
            status: self.status,
        }
    }
}

fn options<T: Copy>(
    all: &[T],
    value: fn(&T) -> &'static str,
    label: fn(&T) -> &'static str,
) -> Vec<(String, String)> {
    all.iter()
        .map(|item| (value(item).to_string(), label(item).to_string()))
        .collect()
}

#[derive(Properties, PartialEq)]
pub struct TicketFormProps {
    /// The ticket being edited; `None` opens a new ticket.
    #[prop_or_default]
    pub ticket: Option<SupportTicket>,
    pub server_errors: FieldErrors,
    pub busy: bool,
    pub on_create: Callback<TicketDetails>,
    pub on_update: Callback<TicketUpdate>,
    pub on_cancel: Callback<()>,
}

/// New tickets name a customer; existing ones can change status instead.
#[function_component]
pub fn TicketForm(props: &TicketFormProps) -> Html {
    let draft = use_state(|| match &props.ticket {
        Some(ticket) => TicketDraft {
            subject: ticket.subject.clone(),
            description: ticket.description.clone(),
            customer: ticket.customer.clone(),
            priority: ticket.priority,
            status: ticket.status,
        },
        None => TicketDraft {
            subject: String::new(),
            description: String::new(),
            customer: String::new(),
            priority: TicketPriority::Medium,
            status: TicketStatus::Open,
        },
    });
    let errors = use_state(ValidationErrors::new);
    let is_new = props.ticket.is_none();

    let onsubmit = {
        let draft = draft.clone();
        let errors = errors.clone();
        let on_create = props.on_create.clone();
        let on_update = props.on_update.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let result = if is_new {
                let payload = draft.to_details();
                payload.validate().map(|()| on_create.emit(payload))
            } else {
                let payload = draft.to_update();
                payload.validate().map(|()| on_update.emit(payload))
            };
            errors.set(result.err().unwrap_or_default());
        })
    };

    let error = |field: &str| field_error(&errors, &props.server_errors, field);

    html! {
        <form {onsubmit} class="space-y-4">
            <TextField
                label="Subject"
                value={draft.subject.clone()}
                on_change={bind(&draft, |d, v: String| d.subject = v)}
                error={error("subject")}
                disabled={props.busy}
            />
            if is_new {
                <TextField
                    label="Customer"
                    value={draft.customer.clone()}
                    on_change={bind(&draft, |d, v: String| d.customer = v)}
                    error={error("customer")}
                    placeholder="Name or email"
                    disabled={props.busy}
                />
            }
            <TextAreaField
                label="Description"
                value={draft.description.clone()}
                on_change={bind(&draft, |d, v: String| d.description = v)}
                error={error("description")}
                rows={5}
                disabled={props.busy}
            />
            <div class="grid grid-cols-2 gap-4">
                <SelectField
                    label="Priority"
                    options={options(&TicketPriority::ALL, TicketPriority::as_str, TicketPriority::label)}
                    value={draft.priority.as_str().to_string()}
                    on_change={bind(&draft, |d, v: String| {
                        if let Some(priority) = TicketPriority::parse(&v) {
                            d.priority = priority;
                        }
                    })}
                    error={error("priority")}
                    disabled={props.busy}
                />
                if !is_new {
                    <SelectField
                        label="Status"
                        options={options(&TicketStatus::ALL, TicketStatus::as_str, TicketStatus::label)}
                        value={draft.status.as_str().to_string()}
                        on_change={bind(&draft, |d, v: String| {
                            if let Some(status) = TicketStatus::parse(&v) {
                                d.status = status;
                            }
                        })}
                        error={error("status")}
                        disabled={props.busy}
                    />
                }
            </div>
            <FormActions
                busy={props.busy}
                submit_text={if is_new { "Open ticket" } else { "Save changes" }}
                on_cancel={props.on_cancel.clone()}
            />
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct AssignTicketFormProps {
    pub ticket: SupportTicket,
    /// Staff members the ticket can be assigned to.
    pub staff: Vec<User>,
    pub busy: bool,
    pub on_submit: Callback<UserId>,
    pub on_cancel: Callback<()>,
}

#[function_component]
pub fn AssignTicketForm(props: &AssignTicketFormProps) -> Html {
    let selected = use_state(|| {
        props
            .ticket
            .assignee
            .map(|id| id.to_string())
            .unwrap_or_default()
    });
    let error = use_state(|| None::<String>);

    let onsubmit = {
        let selected = selected.clone();
        let error = error.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match selected.parse::<i64>() {
                Ok(id) => {
                    error.set(None);
                    on_submit.emit(UserId(id));
                }
                Err(_) => error.set(Some("Choose a staff member".into())),
            }
        })
    };

    let set_selected = {
        let selected = selected.clone();
        Callback::from(move |value: String| selected.set(value))
    };
    let staff = props
        .staff
        .iter()
        .map(|user| (user.id.to_string(), user.full_name()))
        .collect::<Vec<_>>();

    html! {
        <form {onsubmit} class="space-y-4">
            <p class="text-sm text-neutral-600 dark:text-neutral-400">
                {&props.ticket.subject}
            </p>
            <SelectField
                label="Assignee"
                options={staff}
                value={(*selected).clone()}
                on_change={set_selected}
                error={(*error).clone()}
                empty_label="Unassigned"
                disabled={props.busy}
            />
            <FormActions
                busy={props.busy}
                submit_text="Assign"
                on_cancel={props.on_cancel.clone()}
            />
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ticket_requires_a_customer() {
        let draft = TicketDraft {
            subject: "Broken zipper".into(),
            description: String::new(),
            customer: "  ".into(),
            priority: TicketPriority::High,
            status: TicketStatus::Open,
        };
        let errors = draft.to_details().validate().unwrap_err();
        assert!(errors.contains_key("customer"));
        // Updates don't carry the customer at all.
        assert!(draft.to_update().validate().is_ok());
    }

    #[test]
    fn status_options_use_wire_values() {
        let opts = options(&TicketStatus::ALL, TicketStatus::as_str, TicketStatus::label);
        assert_eq!(opts[1], ("in_progress".to_string(), "In progress".to_string()));
    }
}
