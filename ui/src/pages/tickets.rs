use payloads::listing::DEFAULT_PAGE_SIZE;
use payloads::requests::{TicketFilters, UserFilters};
use payloads::{SupportTicket, TicketId, TicketPriority, TicketStatus, User, UserId};
use yew::prelude::*;

use crate::components::forms::{AssignTicketForm, TicketForm};
use crate::components::{
    ConfirmationModal, FilterBar, ListStatus, Modal, PageHeader,
    PaginationControls, RowButton, SelectField, StatusBadge, Table, Tone,
};
use crate::contexts::toast::use_toast;
use crate::get_api_client;
use crate::hooks::{use_fetch, use_resource, use_title};
use crate::utils::format_timestamp;

const STAFF_PICKER_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dialog {
    Closed,
    Create,
    Edit(TicketId),
    Assign(TicketId),
    Close(TicketId),
    Delete(TicketId),
}

fn status_tone(status: TicketStatus) -> Tone {
    match status {
        TicketStatus::Open => Tone::Warning,
        TicketStatus::InProgress => Tone::Neutral,
        TicketStatus::Resolved => Tone::Positive,
        TicketStatus::Closed => Tone::Neutral,
    }
}

fn priority_tone(priority: TicketPriority) -> Tone {
    match priority {
        TicketPriority::Low => Tone::Neutral,
        TicketPriority::Medium => Tone::Neutral,
        TicketPriority::High => Tone::Warning,
        TicketPriority::Urgent => Tone::Negative,
    }
}

fn assignee_name(staff: &[User], assignee: Option<UserId>) -> String {
    match assignee {
        None => "Unassigned".to_string(),
        Some(id) => staff
            .iter()
            .find(|user| user.id == id)
            .map(User::full_name)
            .unwrap_or_else(|| format!("User #{id}")),
    }
}

#[function_component]
pub fn TicketsPage() -> Html {
    use_title("Support tickets");
    let tickets = use_resource::<SupportTicket>(DEFAULT_PAGE_SIZE);
    let toast = use_toast();
    let dialog = use_state(|| Dialog::Closed);
    let staff = use_fetch((), || async {
        let active = UserFilters {
            is_active: Some(true),
            ..Default::default()
        };
        get_api_client()
            .list::<User>(&active, 1, STAFF_PICKER_SIZE)
            .await
    });
    let staff: Vec<User> = staff
        .data
        .as_ref()
        .map(|page| page.items.clone())
        .unwrap_or_default();

    let list = tickets.list();
    let filters = list.filters.clone();
    let busy = list.loading();

    let open = |next: Dialog| {
        let dialog = dialog.clone();
        Callback::from(move |_: ()| dialog.set(next))
    };
    let close = open(Dialog::Closed);

    let on_search = {
        let tickets = tickets.clone();
        let filters = filters.clone();
        Callback::from(move |search| {
            tickets.set_filters(TicketFilters {
                search,
                ..filters.clone()
            })
        })
    };
    let on_status = {
        let tickets = tickets.clone();
        let filters = filters.clone();
        Callback::from(move |raw: String| {
            tickets.set_filters(TicketFilters {
                status: TicketStatus::parse(&raw),
                ..filters.clone()
            })
        })
    };
    let on_priority = {
        let tickets = tickets.clone();
        let filters = filters.clone();
        Callback::from(move |raw: String| {
            tickets.set_filters(TicketFilters {
                priority: TicketPriority::parse(&raw),
                ..filters.clone()
            })
        })
    };
    let on_reset = {
        let tickets = tickets.clone();
        Callback::from(move |_: ()| tickets.set_filters(TicketFilters::default()))
    };
    let on_page_change = {
        let tickets = tickets.clone();
        Callback::from(move |page| tickets.set_page(page))
    };
    let on_retry = {
        let tickets = tickets.clone();
        Callback::from(move |_: ()| tickets.reload())
    };

    let rows = list.items.iter().map(|ticket| {
        let id = ticket.id;
        let closed = ticket.status == TicketStatus::Closed;

        html! {
            <tr key={id.0}>
                <td class="px-4 py-3 text-neutral-500 tabular-nums">{format!("#{id}")}</td>
                <td class="px-4 py-3">
                    <div class="font-medium text-neutral-900 dark:text-neutral-100">{&ticket.subject}</div>
                    <div class="text-xs text-neutral-500">{&ticket.customer}</div>
                </td>
                <td class="px-4 py-3">
                    <StatusBadge label={ticket.priority.label()} tone={priority_tone(ticket.priority)} />
                </td>
                <td class="px-4 py-3">
                    <StatusBadge label={ticket.status.label()} tone={status_tone(ticket.status)} />
                </td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400">
                    {assignee_name(&staff, ticket.assignee)}
                </td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400 whitespace-nowrap">
                    {format_timestamp(ticket.created_at)}
                </td>
                <td class="px-4 py-3 space-x-3 whitespace-nowrap">
                    <RowButton label="Edit" on_click={open(Dialog::Edit(id))} disabled={busy} />
                    if !closed {
                        <RowButton label="Assign" on_click={open(Dialog::Assign(id))} disabled={busy} />
                        <RowButton label="Close" on_click={open(Dialog::Close(id))} disabled={busy} />
                    }
                    <RowButton label="Delete" danger={true} on_click={open(Dialog::Delete(id))} disabled={busy} />
                </td>
            </tr>
        }
    });

    let dialog_view = match *dialog {
        Dialog::Closed => html! {},
        Dialog::Create => {
            let on_create = {
                let tickets = tickets.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |details| {
                    tickets.create(&toast, details, close.clone())
                })
            };
            html! {
                <Modal title="New ticket" on_close={close.clone()} {busy}>
                    <TicketForm
                        server_errors={list.field_errors.clone()}
                        {busy}
                        {on_create}
                        on_update={Callback::noop()}
                        on_cancel={close.clone()}
                    />
                </Modal>
            }
        }
        Dialog::Edit(id) => match list.find(id) {
            Some(ticket) => {
                let on_update = {
                    let tickets = tickets.clone();
                    let toast = toast.clone();
                    let close = close.clone();
                    Callback::from(move |details| {
                        tickets.update(&toast, id, details, close.clone())
                    })
                };
                html! {
                    <Modal title={format!("Ticket #{id}")} on_close={close.clone()} {busy}>
                        <TicketForm
                            ticket={ticket.clone()}
                            server_errors={list.field_errors.clone()}
                            {busy}
                            on_create={Callback::noop()}
                            {on_update}
                            on_cancel={close.clone()}
                        />
                    </Modal>
                }
            }
            None => html! {},
        },
        Dialog::Assign(id) => match list.find(id) {
            Some(ticket) => {
                let on_submit = {
                    let tickets = tickets.clone();
                    let toast = toast.clone();
                    let close = close.clone();
                    Callback::from(move |assignee: UserId| {
                        tickets.action(&toast, "Ticket assigned", close.clone(), move |client| async move {
                            client.assign_ticket(id, assignee).await
                        })
                    })
                };
                html! {
                    <Modal title={format!("Assign ticket #{id}")} on_close={close.clone()} {busy}>
                        <AssignTicketForm
                            ticket={ticket.clone()}
                            staff={staff.clone()}
                            {busy}
                            {on_submit}
                            on_cancel={close.clone()}
                        />
                    </Modal>
                }
            }
            None => html! {},
        },
        Dialog::Close(id) => {
            let on_confirm = {
                let tickets = tickets.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |_: ()| {
                    tickets.action(&toast, "Ticket closed", close.clone(), move |client| async move {
                        client.close_ticket(id).await
                    })
                })
            };
            html! {
                <ConfirmationModal
                    title="Close ticket"
                    message={format!("Close ticket #{id}? The customer will be notified.")}
                    confirm_text="Close ticket"
                    {on_confirm}
                    on_close={close.clone()}
                    is_loading={busy}
                />
            }
        }
        Dialog::Delete(id) => {
            let on_confirm = {
                let tickets = tickets.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |_: ()| tickets.remove(&toast, id, close.clone()))
            };
            html! {
                <ConfirmationModal
                    title="Delete ticket"
                    message={format!("Delete ticket #{id}? This cannot be undone.")}
                    confirm_text="Delete"
                    {on_confirm}
                    on_close={close.clone()}
                    is_loading={busy}
                />
            }
        }
    };

    let statuses = TicketStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), s.label().to_string()))
        .collect::<Vec<_>>();
    let priorities = TicketPriority::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), p.label().to_string()))
        .collect::<Vec<_>>();

    html! {
        <div>
            <PageHeader
                title="Support tickets"
                subtitle="Customer requests and their handling"
                action="New ticket"
                on_action={open(Dialog::Create)}
            />
            <FilterBar
                search={filters.search.clone()}
                placeholder="Search by subject or customer"
                {on_search}
                {on_reset}
            >
                <div class="w-40">
                    <SelectField
                        label="Status"
                        options={statuses}
                        value={filters.status.map(|s| s.as_str().to_string()).unwrap_or_default()}
                        on_change={on_status}
                        empty_label="All"
                    />
                </div>
                <div class="w-40">
                    <SelectField
                        label="Priority"
                        options={priorities}
                        value={filters.priority.map(|p| p.as_str().to_string()).unwrap_or_default()}
                        on_change={on_priority}
                        empty_label="All"
                    />
                </div>
            </FilterBar>
            <ListStatus
                loading={list.fetching()}
                error={list.load_error().map(str::to_string)}
                is_empty={list.items.is_empty()}
                noun="tickets"
                {on_retry}
            />
            if !list.items.is_empty() {
                <Table headers={vec!["#", "Subject", "Priority", "Status", "Assignee", "Opened", ""]}>
                    {for rows}
                </Table>
            }
            <PaginationControls
                pagination={list.pagination}
                {on_page_change}
                is_loading={busy}
            />
            {dialog_view}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;

    fn staff_member(id: i64, first: &str) -> User {
        User {
            id: UserId(id),
            username: first.to_lowercase(),
            email: format!("{}@example.com", first.to_lowercase()),
            first_name: first.into(),
            last_name: String::new(),
            phone: None,
            is_active: true,
            roles: vec![],
            date_joined: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn assignee_names() {
        let staff = vec![staff_member(1, "Ana"), staff_member(2, "Ben")];
        assert_eq!(assignee_name(&staff, None), "Unassigned");
        assert_eq!(assignee_name(&staff, Some(UserId(2))), "Ben");
        assert_eq!(assignee_name(&staff, Some(UserId(9))), "User #9");
    }
}
