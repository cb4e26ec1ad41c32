use payloads::listing::DEFAULT_PAGE_SIZE;
use payloads::requests::PaymentMethodFilters;
use payloads::{PaymentMethod, PaymentMethodId};
use yew::prelude::*;

use crate::components::forms::PaymentMethodForm;
use crate::components::{
    ActiveBadge, ActiveFilter, ConfirmationModal, FilterBar, ListStatus, Modal,
    PageHeader, PaginationControls, RowButton, StatusBadge, Table, Tone,
};
use crate::contexts::toast::use_toast;
use crate::hooks::{use_resource, use_title};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dialog {
    Closed,
    Create,
    Edit(PaymentMethodId),
    Delete(PaymentMethodId),
}

#[function_component]
pub fn PaymentMethodsPage() -> Html {
    use_title("Payment methods");
    let methods = use_resource::<PaymentMethod>(DEFAULT_PAGE_SIZE);
    let toast = use_toast();
    let dialog = use_state(|| Dialog::Closed);

    let list = methods.list();
    let filters = list.filters.clone();
    let busy = list.loading();

    let open = |next: Dialog| {
        let dialog = dialog.clone();
        Callback::from(move |_: ()| dialog.set(next))
    };
    let close = open(Dialog::Closed);

    let on_search = {
        let methods = methods.clone();
        let filters = filters.clone();
        Callback::from(move |search| {
            methods.set_filters(PaymentMethodFilters {
                search,
                ..filters.clone()
            })
        })
    };
    let on_active = {
        let methods = methods.clone();
        let filters = filters.clone();
        Callback::from(move |is_active| {
            methods.set_filters(PaymentMethodFilters {
                is_active,
                ..filters.clone()
            })
        })
    };
    let on_reset = {
        let methods = methods.clone();
        Callback::from(move |_: ()| {
            methods.set_filters(PaymentMethodFilters::default())
        })
    };
    let on_page_change = {
        let methods = methods.clone();
        Callback::from(move |page| methods.set_page(page))
    };
    let on_retry = {
        let methods = methods.clone();
        Callback::from(move |_: ()| methods.reload())
    };

    let rows = list.items.iter().map(|method| {
        let id = method.id;
        let toggle_active = {
            let methods = methods.clone();
            let toast = toast.clone();
            let active = method.is_active;
            Callback::from(move |_: ()| {
                if active {
                    methods.action(&toast, "Payment method deactivated", Callback::noop(), move |client| async move {
                        client.deactivate_payment_method(id).await
                    });
                } else {
                    methods.action(&toast, "Payment method activated", Callback::noop(), move |client| async move {
                        client.activate_payment_method(id).await
                    });
                }
            })
        };
        let make_principal = {
            let methods = methods.clone();
            let toast = toast.clone();
            Callback::from(move |_: ()| {
                methods.action(&toast, "Principal payment method changed", Callback::noop(), move |client| async move {
                    client.mark_principal_payment_method(id).await
                });
            })
        };

        html! {
            <tr key={id.0}>
                <td class="px-4 py-3">
                    <span class="font-medium text-neutral-900 dark:text-neutral-100">{&method.name}</span>
                    if method.is_principal {
                        <span class="ml-2"><StatusBadge label="Principal" tone={Tone::Warning} /></span>
                    }
                </td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400">{method.kind.label()}</td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400">
                    {method.details.clone().unwrap_or_default()}
                </td>
                <td class="px-4 py-3"><ActiveBadge active={method.is_active} /></td>
                <td class="px-4 py-3 space-x-3 whitespace-nowrap">
                    <RowButton label="Edit" on_click={open(Dialog::Edit(id))} disabled={busy} />
                    <RowButton
                        label={if method.is_active { "Deactivate" } else { "Activate" }}
                        on_click={toggle_active}
                        disabled={busy}
                    />
                    if !method.is_principal {
                        <RowButton
                            label="Make principal"
                            on_click={make_principal}
                            disabled={busy || !method.is_active}
                        />
                    }
                    <RowButton label="Delete" danger={true} on_click={open(Dialog::Delete(id))} disabled={busy} />
                </td>
            </tr>
        }
    });

    let dialog_view = match *dialog {
        Dialog::Closed => html! {},
        Dialog::Create => {
            let on_submit = {
                let methods = methods.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |details| {
                    methods.create(&toast, details, close.clone())
                })
            };
            html! {
                <Modal title="New payment method" on_close={close.clone()} {busy}>
                    <PaymentMethodForm
                        server_errors={list.field_errors.clone()}
                        {busy}
                        {on_submit}
                        on_cancel={close.clone()}
                    />
                </Modal>
            }
        }
        Dialog::Edit(id) => match list.find(id) {
            Some(method) => {
                let on_submit = {
                    let methods = methods.clone();
                    let toast = toast.clone();
                    let close = close.clone();
                    Callback::from(move |details| {
                        methods.update(&toast, id, details, close.clone())
                    })
                };
                html! {
                    <Modal title={format!("Edit {}", method.name)} on_close={close.clone()} {busy}>
                        <PaymentMethodForm
                            method={method.clone()}
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
            let name = list
                .find(id)
                .map(|method| method.name.clone())
                .unwrap_or_default();
            let on_confirm = {
                let methods = methods.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |_: ()| {
                    methods.remove(&toast, id, close.clone())
                })
            };
            html! {
                <ConfirmationModal
                    title="Delete payment method"
                    message={format!("Delete {name}? It will no longer be offered at checkout.")}
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
                title="Payment methods"
                subtitle="Methods offered at checkout"
                action="New payment method"
                on_action={open(Dialog::Create)}
            />
            <FilterBar
                search={filters.search.clone()}
                placeholder="Search payment methods"
                {on_search}
                {on_reset}
            >
                <ActiveFilter value={filters.is_active} on_change={on_active} />
            </FilterBar>
            <ListStatus
                loading={list.fetching()}
                error={list.load_error().map(str::to_string)}
                is_empty={list.items.is_empty()}
                noun="payment methods"
                {on_retry}
            />
            if !list.items.is_empty() {
                <Table headers={vec!["Name", "Type", "Details", "Status", ""]}>
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
