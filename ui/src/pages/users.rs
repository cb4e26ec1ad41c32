use payloads::listing::DEFAULT_PAGE_SIZE;
use payloads::requests::{RoleFilters, UserFilters};
use payloads::{Role, RoleId, RoleSummary, User, UserId};
use yew::prelude::*;

use crate::components::forms::{ChangePasswordForm, UserForm};
use crate::components::{
    ActiveBadge, ActiveFilter, ConfirmationModal, FilterBar, ListStatus, Modal,
    PageHeader, PaginationControls, RowButton, SelectField, Table,
};
use crate::contexts::toast::use_toast;
use crate::get_api_client;
use crate::hooks::{use_fetch, use_resource, use_title};
use crate::utils::format_timestamp;

/// Enough to list every role in the role pickers.
const ROLE_PICKER_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dialog {
    Closed,
    Create,
    Edit(UserId),
    Password(UserId),
    Delete(UserId),
}

#[function_component]
pub fn UsersPage() -> Html {
    use_title("Users");
    let users = use_resource::<User>(DEFAULT_PAGE_SIZE);
    let toast = use_toast();
    let dialog = use_state(|| Dialog::Closed);
    let roles = use_fetch((), || async {
        get_api_client()
            .list::<Role>(&RoleFilters::default(), 1, ROLE_PICKER_SIZE)
            .await
    });

    let role_options: Vec<RoleSummary> = roles
        .data
        .as_ref()
        .map(|page| {
            page.items
                .iter()
                .map(|role| RoleSummary {
                    id: role.id,
                    name: role.name.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    let list = users.list();
    let filters = list.filters.clone();
    let busy = list.loading();

    let open = |next: Dialog| {
        let dialog = dialog.clone();
        Callback::from(move |_: ()| dialog.set(next))
    };
    let close = open(Dialog::Closed);

    let on_search = {
        let users = users.clone();
        let filters = filters.clone();
        Callback::from(move |search| {
            users.set_filters(UserFilters {
                search,
                ..filters.clone()
            })
        })
    };
    let on_active = {
        let users = users.clone();
        let filters = filters.clone();
        Callback::from(move |is_active| {
            users.set_filters(UserFilters {
                is_active,
                ..filters.clone()
            })
        })
    };
    let on_role = {
        let users = users.clone();
        let filters = filters.clone();
        Callback::from(move |raw: String| {
            users.set_filters(UserFilters {
                role: raw.parse().ok().map(RoleId),
                ..filters.clone()
            })
        })
    };
    let on_reset = {
        let users = users.clone();
        Callback::from(move |_: ()| users.set_filters(UserFilters::default()))
    };
    let on_page_change = {
        let users = users.clone();
        Callback::from(move |page| users.set_page(page))
    };
    let on_retry = {
        let users = users.clone();
        Callback::from(move |_: ()| users.reload())
    };

    let rows = list.items.iter().map(|user| {
        let id = user.id;
        let toggle_active = {
            let users = users.clone();
            let toast = toast.clone();
            let active = user.is_active;
            Callback::from(move |_: ()| {
                if active {
                    users.action(&toast, "User deactivated", Callback::noop(), move |client| async move {
                        client.deactivate_user(id).await
                    });
                } else {
                    users.action(&toast, "User activated", Callback::noop(), move |client| async move {
                        client.activate_user(id).await
                    });
                }
            })
        };
        let roles = user
            .roles
            .iter()
            .map(|role| role.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        html! {
            <tr key={id.0}>
                <td class="px-4 py-3">
                    <div class="font-medium text-neutral-900 dark:text-neutral-100">{user.full_name()}</div>
                    <div class="text-xs text-neutral-500">{&user.username}</div>
                </td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400">{&user.email}</td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400">{roles}</td>
                <td class="px-4 py-3"><ActiveBadge active={user.is_active} /></td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400">{format_timestamp(user.date_joined)}</td>
                <td class="px-4 py-3 space-x-3 whitespace-nowrap">
                    <RowButton label="Edit" on_click={open(Dialog::Edit(id))} disabled={busy} />
                    <RowButton label="Password" on_click={open(Dialog::Password(id))} disabled={busy} />
                    <RowButton
                        label={if user.is_active { "Deactivate" } else { "Activate" }}
                        on_click={toggle_active}
                        disabled={busy}
                    />
                    <RowButton label="Delete" danger={true} on_click={open(Dialog::Delete(id))} disabled={busy} />
                </td>
            </tr>
        }
    });

    let dialog_view = match *dialog {
        Dialog::Closed => html! {},
        Dialog::Create => {
            let on_create = {
                let users = users.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |details| users.create(&toast, details, close.clone()))
            };
            html! {
                <Modal title="New user" on_close={close.clone()} {busy}>
                    <UserForm
                        roles={role_options.clone()}
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
            Some(user) => {
                let on_update = {
                    let users = users.clone();
                    let toast = toast.clone();
                    let close = close.clone();
                    Callback::from(move |details| users.update(&toast, id, details, close.clone()))
                };
                html! {
                    <Modal title={format!("Edit {}", user.username)} on_close={close.clone()} {busy}>
                        <UserForm
                            user={user.clone()}
                            roles={role_options.clone()}
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
        Dialog::Password(id) => {
            let on_submit = {
                let users = users.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |details| {
                    users.action(&toast, "Password changed", close.clone(), move |client| async move {
                        client.change_password(id, &details).await
                    })
                })
            };
            html! {
                <Modal title="Change password" on_close={close.clone()} {busy}>
                    <ChangePasswordForm
                        server_errors={list.field_errors.clone()}
                        {busy}
                        {on_submit}
                        on_cancel={close.clone()}
                    />
                </Modal>
            }
        }
        Dialog::Delete(id) => {
            let name = list
                .find(id)
                .map(|user| user.username.clone())
                .unwrap_or_default();
            let on_confirm = {
                let users = users.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |_: ()| users.remove(&toast, id, close.clone()))
            };
            html! {
                <ConfirmationModal
                    title="Delete user"
                    message={format!("Delete the account {name}? This cannot be undone.")}
                    confirm_text="Delete"
                    {on_confirm}
                    on_close={close.clone()}
                    is_loading={busy}
                />
            }
        }
    };

    let role_filter = filters
        .role
        .map(|role| role.to_string())
        .unwrap_or_default();
    let role_choices = role_options
        .iter()
        .map(|role| (role.id.to_string(), role.name.clone()))
        .collect::<Vec<_>>();

    html! {
        <div>
            <PageHeader
                title="Users"
                subtitle="Staff accounts and their roles"
                action="New user"
                on_action={open(Dialog::Create)}
            />
            <FilterBar
                search={filters.search.clone()}
                placeholder="Search by name, username or email"
                {on_search}
                {on_reset}
            >
                <div class="w-48">
                    <SelectField
                        label="Role"
                        options={role_choices}
                        value={role_filter}
                        on_change={on_role}
                        empty_label="All roles"
                    />
                </div>
                <ActiveFilter value={filters.is_active} on_change={on_active} />
            </FilterBar>
            <ListStatus
                loading={list.fetching()}
                error={list.load_error().map(str::to_string)}
                is_empty={list.items.is_empty()}
                noun="users"
                on_retry={on_retry}
            />
            if !list.items.is_empty() {
                <Table headers={vec!["Name", "Email", "Roles", "Status", "Joined", ""]}>
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
