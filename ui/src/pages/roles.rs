use payloads::listing::DEFAULT_PAGE_SIZE;
use payloads::requests::{PermissionFilters, RoleFilters, SetPermissions};
use payloads::{Permission, PermissionId, Role, RoleId};
use yew::prelude::*;

use crate::components::forms::{FormActions, PermissionPicker, RoleForm};
use crate::components::{
    ActiveBadge, ActiveFilter, ConfirmationModal, FilterBar, ListStatus, Modal,
    PageHeader, PaginationControls, RowButton, Table,
};
use crate::contexts::toast::use_toast;
use crate::get_api_client;
use crate::hooks::{use_fetch, use_resource, use_title};

/// Enough to show every permission in the picker.
const PERMISSION_PICKER_SIZE: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dialog {
    Closed,
    Create,
    Edit(RoleId),
    Permissions(RoleId),
    Delete(RoleId),
}

#[derive(Properties, PartialEq)]
struct RolePermissionsProps {
    role: Role,
    permissions: Vec<Permission>,
    busy: bool,
    on_submit: Callback<Vec<PermissionId>>,
    on_cancel: Callback<()>,
}

/// Replaces a role's whole permission set in one call.
#[function_component]
fn RolePermissions(props: &RolePermissionsProps) -> Html {
    let selected = use_state(|| props.role.permission_ids());

    let onsubmit = {
        let selected = selected.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit((*selected).clone());
        })
    };
    let on_change = {
        let selected = selected.clone();
        Callback::from(move |ids: Vec<PermissionId>| selected.set(ids))
    };

    html! {
        <form {onsubmit} class="space-y-4">
            <PermissionPicker
                permissions={props.permissions.clone()}
                selected={(*selected).clone()}
                {on_change}
                disabled={props.busy}
            />
            <FormActions
                busy={props.busy}
                submit_text="Save permissions"
                on_cancel={props.on_cancel.clone()}
            />
        </form>
    }
}

#[function_component]
pub fn RolesPage() -> Html {
    use_title("Roles");
    let roles = use_resource::<Role>(DEFAULT_PAGE_SIZE);
    let toast = use_toast();
    let dialog = use_state(|| Dialog::Closed);
    let permissions = use_fetch((), || async {
        get_api_client()
            .list::<Permission>(
                &PermissionFilters::default(),
                1,
                PERMISSION_PICKER_SIZE,
            )
            .await
    });
    let all_permissions: Vec<Permission> = permissions
        .data
        .as_ref()
        .map(|page| page.items.clone())
        .unwrap_or_default();

    let list = roles.list();
    let filters = list.filters.clone();
    let busy = list.loading();

    let open = |next: Dialog| {
        let dialog = dialog.clone();
        Callback::from(move |_: ()| dialog.set(next))
    };
    let close = open(Dialog::Closed);

    let on_search = {
        let roles = roles.clone();
        let filters = filters.clone();
        Callback::from(move |search| {
            roles.set_filters(RoleFilters {
                search,
                ..filters.clone()
            })
        })
    };
    let on_active = {
        let roles = roles.clone();
        let filters = filters.clone();
        Callback::from(move |is_active| {
            roles.set_filters(RoleFilters {
                is_active,
                ..filters.clone()
            })
        })
    };
    let on_reset = {
        let roles = roles.clone();
        Callback::from(move |_: ()| roles.set_filters(RoleFilters::default()))
    };
    let on_page_change = {
        let roles = roles.clone();
        Callback::from(move |page| roles.set_page(page))
    };
    let on_retry = {
        let roles = roles.clone();
        Callback::from(move |_: ()| roles.reload())
    };

    let rows = list.items.iter().map(|role| {
        let id = role.id;
        let toggle_active = {
            let roles = roles.clone();
            let toast = toast.clone();
            let active = role.is_active;
            Callback::from(move |_: ()| {
                if active {
                    roles.action(&toast, "Role deactivated", Callback::noop(), move |client| async move {
                        client.deactivate_role(id).await
                    });
                } else {
                    roles.action(&toast, "Role activated", Callback::noop(), move |client| async move {
                        client.activate_role(id).await
                    });
                }
            })
        };

        html! {
            <tr key={id.0}>
                <td class="px-4 py-3 font-medium text-neutral-900 dark:text-neutral-100">{&role.name}</td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400">{&role.description}</td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400">{role.permissions.len().to_string()}</td>
                <td class="px-4 py-3"><ActiveBadge active={role.is_active} /></td>
                <td class="px-4 py-3 space-x-3 whitespace-nowrap">
                    <RowButton label="Edit" on_click={open(Dialog::Edit(id))} disabled={busy} />
                    <RowButton label="Permissions" on_click={open(Dialog::Permissions(id))} disabled={busy} />
                    <RowButton
                        label={if role.is_active { "Deactivate" } else { "Activate" }}
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
            let on_submit = {
                let roles = roles.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |details| roles.create(&toast, details, close.clone()))
            };
            html! {
                <Modal title="New role" on_close={close.clone()} {busy} max_width="max-w-2xl">
                    <RoleForm
                        permissions={all_permissions.clone()}
                        server_errors={list.field_errors.clone()}
                        {busy}
                        {on_submit}
                        on_cancel={close.clone()}
                    />
                </Modal>
            }
        }
        Dialog::Edit(id) => match list.find(id) {
            Some(role) => {
                let on_submit = {
                    let roles = roles.clone();
                    let toast = toast.clone();
                    let close = close.clone();
                    Callback::from(move |details| roles.update(&toast, id, details, close.clone()))
                };
                html! {
                    <Modal title={format!("Edit {}", role.name)} on_close={close.clone()} {busy} max_width="max-w-2xl">
                        <RoleForm
                            role={role.clone()}
                            permissions={all_permissions.clone()}
                            server_errors={list.field_errors.clone()}
                            {busy}
                            {on_submit}
                            on_cancel={close.clone()}
                        />
                    </Modal>
                }
            }
            None => html! {},
        },
        Dialog::Permissions(id) => match list.find(id) {
            Some(role) => {
                let on_submit = {
                    let roles = roles.clone();
                    let toast = toast.clone();
                    let close = close.clone();
                    Callback::from(move |permissions: Vec<PermissionId>| {
                        let details = SetPermissions { permissions };
                        roles.action(&toast, "Permissions updated", close.clone(), move |client| async move {
                            client.set_role_permissions(id, &details).await
                        })
                    })
                };
                html! {
                    <Modal title={format!("Permissions of {}", role.name)} on_close={close.clone()} {busy} max_width="max-w-2xl">
                        <RolePermissions
                            role={role.clone()}
                            permissions={all_permissions.clone()}
                            {busy}
                            {on_submit}
                            on_cancel={close.clone()}
                        />
                    </Modal>
                }
            }
            None => html! {},
        },
        Dialog::Delete(id) => {
            let name = list.find(id).map(|role| role.name.clone()).unwrap_or_default();
            let on_confirm = {
                let roles = roles.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |_: ()| roles.remove(&toast, id, close.clone()))
            };
            html! {
                <ConfirmationModal
                    title="Delete role"
                    message={format!("Delete the role {name}? Users keep their other roles.")}
                    confirm_text="Delete"
                    {on_confirm}
                    on_close={close.clone()}
                    is_loading={busy}
                />
            }
        }
    };

    html! {
        <div>
            <PageHeader
                title="Roles"
                subtitle="Groups of permissions granted to staff"
                action="New role"
                on_action={open(Dialog::Create)}
            />
            <FilterBar
                search={filters.search.clone()}
                placeholder="Search roles"
                {on_search}
                {on_reset}
            >
                <ActiveFilter value={filters.is_active} on_change={on_active} />
            </FilterBar>
            <ListStatus
                loading={list.fetching()}
                error={list.load_error().map(str::to_string)}
                is_empty={list.items.is_empty()}
                noun="roles"
                {on_retry}
            />
            if !list.items.is_empty() {
                <Table headers={vec!["Name", "Description", "Permissions", "Status", ""]}>
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
