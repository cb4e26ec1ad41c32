use payloads::listing::DEFAULT_PAGE_SIZE;
use payloads::requests::PermissionFilters;
use payloads::{Permission, PermissionId};
use yew::prelude::*;

use crate::components::forms::{PermissionForm, optional};
use crate::components::{
    ConfirmationModal, FilterBar, ListStatus, Modal, PageHeader,
    PaginationControls, RowButton, Table, TextField,
};
use crate::contexts::toast::use_toast;
use crate::hooks::{use_resource, use_title};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dialog {
    Closed,
    Create,
    Edit(PermissionId),
    Delete(PermissionId),
}

#[function_component]
pub fn PermissionsPage() -> Html {
    use_title("Permissions");
    let permissions = use_resource::<Permission>(DEFAULT_PAGE_SIZE);
    let toast = use_toast();
    let dialog = use_state(|| Dialog::Closed);

    let list = permissions.list();
    let filters = list.filters.clone();
    let busy = list.loading();

    let open = |next: Dialog| {
        let dialog = dialog.clone();
        Callback::from(move |_: ()| dialog.set(next))
    };
    let close = open(Dialog::Closed);

    let on_search = {
        let permissions = permissions.clone();
        let filters = filters.clone();
        Callback::from(move |search| {
            permissions.set_filters(PermissionFilters {
                search,
                ..filters.clone()
            })
        })
    };
    let on_module = {
        let permissions = permissions.clone();
        let filters = filters.clone();
        Callback::from(move |module: String| {
            permissions.set_filters(PermissionFilters {
                module: optional(&module),
                ..filters.clone()
            })
        })
    };
    let on_reset = {
        let permissions = permissions.clone();
        Callback::from(move |_: ()| {
            permissions.set_filters(PermissionFilters::default())
        })
    };
    let on_page_change = {
        let permissions = permissions.clone();
        Callback::from(move |page| permissions.set_page(page))
    };
    let on_retry = {
        let permissions = permissions.clone();
        Callback::from(move |_: ()| permissions.reload())
    };

    let rows = list.items.iter().map(|permission| {
        let id = permission.id;
        html! {
            <tr key={id.0}>
                <td class="px-4 py-3 font-mono text-xs text-neutral-900 dark:text-neutral-100">{&permission.code}</td>
                <td class="px-4 py-3 font-medium text-neutral-900 dark:text-neutral-100">{&permission.name}</td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400">{&permission.module}</td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400">{&permission.description}</td>
                <td class="px-4 py-3 space-x-3 whitespace-nowrap">
                    <RowButton label="Edit" on_click={open(Dialog::Edit(id))} disabled={busy} />
                    <RowButton label="Delete" danger={true} on_click={open(Dialog::Delete(id))} disabled={busy} />
                </td>
            </tr>
        }
    });

    let dialog_view = match *dialog {
        Dialog::Closed => html! {},
        Dialog::Create => {
            let on_submit = {
                let permissions = permissions.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |details| {
                    permissions.create(&toast, details, close.clone())
                })
            };
            html! {
                <Modal title="New permission" on_close={close.clone()} {busy}>
                    <PermissionForm
                        server_errors={list.field_errors.clone()}
                        {busy}
                        {on_submit}
                        on_cancel={close.clone()}
                    />
                </Modal>
            }
        }
        Dialog::Edit(id) => match list.find(id) {
            Some(permission) => {
                let on_submit = {
                    let permissions = permissions.clone();
                    let toast = toast.clone();
                    let close = close.clone();
                    Callback::from(move |details| {
                        permissions.update(&toast, id, details, close.clone())
                    })
                };
                html! {
                    <Modal title={format!("Edit {}", permission.code)} on_close={close.clone()} {busy}>
                        <PermissionForm
                            permission={permission.clone()}
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
        Dialog::Delete(id) => {
            let code = list
                .find(id)
                .map(|permission| permission.code.clone())
                .unwrap_or_default();
            let on_confirm = {
                let permissions = permissions.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |_: ()| {
                    permissions.remove(&toast, id, close.clone())
                })
            };
            html! {
                <ConfirmationModal
                    title="Delete permission"
                    message={format!("Delete {code}? Roles that grant it will lose it.")}
                    confirm_text="Delete"
                    {on_confirm}
                    on_close={close.clone()}
                    confirmation_value={code.clone()}
                    is_loading={busy}
                />
            }
        }
    };

    html! {
        <div>
            <PageHeader
                title="Permissions"
                subtitle="Individual access rights, grouped by module"
                action="New permission"
                on_action={open(Dialog::Create)}
            />
            <FilterBar
                search={filters.search.clone()}
                placeholder="Search by code or name"
                {on_search}
                {on_reset}
            >
                <div class="w-48">
                    <TextField
                        label="Module"
                        value={filters.module.clone().unwrap_or_default()}
                        on_change={on_module}
                        placeholder="Any"
                    />
                </div>
            </FilterBar>
            <ListStatus
                loading={list.fetching()}
                error={list.load_error().map(str::to_string)}
                is_empty={list.items.is_empty()}
                noun="permissions"
                {on_retry}
            />
            if !list.items.is_empty() {
                <Table headers={vec!["Code", "Name", "Module", "Description", ""]}>
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
