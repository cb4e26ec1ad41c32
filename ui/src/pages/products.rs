use payloads::listing::DEFAULT_PAGE_SIZE;
use payloads::requests::ProductFilters;
use payloads::{Product, ProductId, ProductImageId};
use yew::prelude::*;

use crate::components::forms::{ProductForm, ProductImages, optional};
use crate::components::{
    ActiveBadge, ActiveFilter, ConfirmationModal, FilterBar, ListStatus, Modal,
    PageHeader, PaginationControls, RowButton, Table, TextField,
};
use crate::contexts::toast::use_toast;
use crate::hooks::{use_resource, use_title};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dialog {
    Closed,
    Create,
    Edit(ProductId),
    Delete(ProductId),
}

#[function_component]
pub fn ProductsPage() -> Html {
    use_title("Products");
    let products = use_resource::<Product>(DEFAULT_PAGE_SIZE);
    let toast = use_toast();
    let dialog = use_state(|| Dialog::Closed);

    let list = products.list();
    let filters = list.filters.clone();
    let busy = list.loading();

    let open = |next: Dialog| {
        let dialog = dialog.clone();
        Callback::from(move |_: ()| dialog.set(next))
    };
    let close = open(Dialog::Closed);

    let on_search = {
        let products = products.clone();
        let filters = filters.clone();
        Callback::from(move |search| {
            products.set_filters(ProductFilters {
                search,
                ..filters.clone()
            })
        })
    };
    let on_category = {
        let products = products.clone();
        let filters = filters.clone();
        Callback::from(move |category: String| {
            products.set_filters(ProductFilters {
                category: optional(&category),
                ..filters.clone()
            })
        })
    };
    let on_active = {
        let products = products.clone();
        let filters = filters.clone();
        Callback::from(move |is_active| {
            products.set_filters(ProductFilters {
                is_active,
                ..filters.clone()
            })
        })
    };
    let on_reset = {
        let products = products.clone();
        Callback::from(move |_: ()| products.set_filters(ProductFilters::default()))
    };
    let on_page_change = {
        let products = products.clone();
        Callback::from(move |page| products.set_page(page))
    };
    let on_retry = {
        let products = products.clone();
        Callback::from(move |_: ()| products.reload())
    };

    let rows = list.items.iter().map(|product| {
        let id = product.id;
        let toggle_active = {
            let products = products.clone();
            let toast = toast.clone();
            let active = !product.is_active;
            let message = if active { "Product published" } else { "Product hidden" };
            Callback::from(move |_: ()| {
                products.action(&toast, message, Callback::noop(), move |client| async move {
                    client.set_product_active(id, active).await
                });
            })
        };
        let low_stock = product.stock <= 0;

        html! {
            <tr key={id.0}>
                <td class="px-4 py-3">
                    <div class="flex items-center gap-3">
                        if let Some(image) = product.images.iter().min_by_key(|image| image.position) {
                            <img src={image.url.clone()} alt="" class="h-10 w-10 object-cover rounded" />
                        }
                        <div>
                            <div class="font-medium text-neutral-900 dark:text-neutral-100">{&product.name}</div>
                            <div class="text-xs text-neutral-500 font-mono">{&product.sku}</div>
                        </div>
                    </div>
                </td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400">{&product.category}</td>
                <td class="px-4 py-3 text-right tabular-nums">{format!("{:.2}", product.price)}</td>
                <td class={classes!("px-4", "py-3", "text-right", "tabular-nums", low_stock.then_some("text-red-600"))}>
                    {product.stock.to_string()}
                </td>
                <td class="px-4 py-3"><ActiveBadge active={product.is_active} /></td>
                <td class="px-4 py-3 space-x-3 whitespace-nowrap">
                    <RowButton label="Edit" on_click={open(Dialog::Edit(id))} disabled={busy} />
                    <RowButton
                        label={if product.is_active { "Hide" } else { "Publish" }}
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
                let products = products.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |details| {
                    products.create(&toast, details, close.clone())
                })
            };
            html! {
                <Modal title="New product" on_close={close.clone()} {busy} max_width="max-w-2xl">
                    <ProductForm
                        server_errors={list.field_errors.clone()}
                        {busy}
                        {on_submit}
                        on_cancel={close.clone()}
                    />
                </Modal>
            }
        }
        Dialog::Edit(id) => match list.find(id) {
            Some(product) => {
                let on_submit = {
                    let products = products.clone();
                    let toast = toast.clone();
                    let close = close.clone();
                    Callback::from(move |details| {
                        products.update(&toast, id, details, close.clone())
                    })
                };
                // Reordering stays in the dialog; the reloaded list brings
                // the new positions back in.
                let on_reorder = {
                    let products = products.clone();
                    let toast = toast.clone();
                    Callback::from(move |order: Vec<ProductImageId>| {
                        products.action(&toast, "Image order saved", Callback::noop(), move |client| async move {
                            client.reorder_product_images(id, order).await
                        })
                    })
                };
                html! {
                    <Modal title={format!("Edit {}", product.name)} on_close={close.clone()} {busy} max_width="max-w-2xl">
                        <div class="space-y-6">
                            <ProductForm
                                product={product.clone()}
                                server_errors={list.field_errors.clone()}
                                {busy}
                                {on_submit}
                                on_cancel={close.clone()}
                            />
                            <div>
                                <h3 class="text-sm font-medium text-neutral-700 dark:text-neutral-300 mb-2">
                                    {"Images"}
                                </h3>
                                <ProductImages
                                    images={product.images.clone()}
                                    {on_reorder}
                                    disabled={busy}
                                />
                            </div>
                        </div>
                    </Modal>
                }
            }
            None => html! {},
        },
        Dialog::Delete(id) => {
            let sku = list
                .find(id)
                .map(|product| product.sku.clone())
                .unwrap_or_default();
            let on_confirm = {
                let products = products.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |_: ()| {
                    products.remove(&toast, id, close.clone())
                })
            };
            html! {
                <ConfirmationModal
                    title="Delete product"
                    message={format!("Delete product {sku}? Type the SKU to confirm.")}
                    confirm_text="Delete"
                    {on_confirm}
                    on_close={close.clone()}
                    confirmation_value={sku.clone()}
                    is_loading={busy}
                />
            }
        }
    };

    html! {
        <div>
            <PageHeader
                title="Products"
                subtitle="Catalogue, prices and stock"
                action="New product"
                on_action={open(Dialog::Create)}
            />
            <FilterBar
                search={filters.search.clone()}
                placeholder="Search by name or SKU"
                {on_search}
                {on_reset}
            >
                <div class="w-48">
                    <TextField
                        label="Category"
                        value={filters.category.clone().unwrap_or_default()}
                        on_change={on_category}
                        placeholder="Any"
                    />
                </div>
                <ActiveFilter value={filters.is_active} on_change={on_active} />
            </FilterBar>
            <ListStatus
                loading={list.fetching()}
                error={list.load_error().map(str::to_string)}
                is_empty={list.items.is_empty()}
                noun="products"
                {on_retry}
            />
            if !list.items.is_empty() {
                <Table headers={vec!["Product", "Category", "Price", "Stock", "Status", ""]}>
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
