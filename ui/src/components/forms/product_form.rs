use payloads::requests::{ProductDetails, Validate, ValidationErrors};
use payloads::{FieldErrors, Product, ProductImage, ProductImageId};
use rust_decimal::Decimal;
use std::str::FromStr;
use yew::prelude::*;

use super::{FormActions, bind};
use crate::components::form_field::{TextAreaField, TextField, field_error};

#[derive(Debug, Clone, Default, PartialEq)]
struct ProductDraft {
    sku: String,
    name: String,
    description: String,
    category: String,
    price: String,
    stock: String,
}

impl ProductDraft {
    fn from_product(product: &Product) -> Self {
        Self {
            sku: product.sku.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
        }
    }

    /// Parse and validate the draft. Number fields that don't parse are
    /// reported alongside the regular validation errors.
    fn parse(&self) -> Result<ProductDetails, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let price = Decimal::from_str(self.price.trim()).unwrap_or_else(|_| {
            errors.insert("price", "Price must be a number".into());
            Decimal::ZERO
        });
        let stock = self.stock.trim().parse::<i64>().unwrap_or_else(|_| {
            errors.insert("stock", "Stock must be a whole number".into());
            0
        });

        let details = ProductDetails {
            sku: self.sku.trim().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            price,
            stock,
        };
        if let Err(found) = details.validate() {
            for (field, message) in found {
                errors.entry(field).or_insert(message);
            }
        }
        if errors.is_empty() { Ok(details) } else { Err(errors) }
    }
}

#[derive(Properties, PartialEq)]
pub struct ProductFormProps {
    #[prop_or_default]
    pub product: Option<Product>,
    pub server_errors: FieldErrors,
    pub busy: bool,
    pub on_submit: Callback<ProductDetails>,
    pub on_cancel: Callback<()>,
}

#[function_component]
pub fn ProductForm(props: &ProductFormProps) -> Html {
    let draft = use_state(|| {
        props
            .product
            .as_ref()
            .map(ProductDraft::from_product)
            .unwrap_or_else(|| ProductDraft {
                price: "0".into(),
                stock: "0".into(),
                ..Default::default()
            })
    });
    let errors = use_state(ValidationErrors::new);

    let onsubmit = {
        let draft = draft.clone();
        let errors = errors.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match draft.parse() {
                Ok(details) => {
                    errors.set(ValidationErrors::new());
                    on_submit.emit(details);
                }
                Err(found) => errors.set(found),
            }
        })
    };

    let error = |field: &str| field_error(&errors, &props.server_errors, field);

    html! {
        <form {onsubmit} class="space-y-4">
            <div class="grid grid-cols-2 gap-4">
                <TextField
                    label="SKU"
                    value={draft.sku.clone()}
                    on_change={bind(&draft, |d, v: String| d.sku = v)}
                    error={error("sku")}
                    disabled={props.busy}
                />
                <TextField
                    label="Category"
                    value={draft.category.clone()}
                    on_change={bind(&draft, |d, v: String| d.category = v)}
                    error={error("category")}
                    disabled={props.busy}
                />
            </div>
            <TextField
                label="Name"
                value={draft.name.clone()}
                on_change={bind(&draft, |d, v: String| d.name = v)}
                error={error("name")}
                disabled={props.busy}
            />
            <TextAreaField
                label="Description"
                value={draft.description.clone()}
                on_change={bind(&draft, |d, v: String| d.description = v)}
                error={error("description")}
                disabled={props.busy}
            />
            <div class="grid grid-cols-2 gap-4">
                <TextField
                    label="Price"
                    input_type="number"
                    value={draft.price.clone()}
                    on_change={bind(&draft, |d, v: String| d.price = v)}
                    error={error("price")}
                    disabled={props.busy}
                />
                <TextField
                    label="Stock"
                    input_type="number"
                    value={draft.stock.clone()}
                    on_change={bind(&draft, |d, v: String| d.stock = v)}
                    error={error("stock")}
                    disabled={props.busy}
                />
            </div>
            <FormActions
                busy={props.busy}
                submit_text={if props.product.is_some() { "Save changes" } else { "Create product" }}
                on_cancel={props.on_cancel.clone()}
            />
        </form>
    }
}

/// The image order after moving the image at `index` by `offset` places.
/// Returns `None` when the move would leave the list.
pub fn moved_order(
    images: &[ProductImage],
    index: usize,
    offset: isize,
) -> Option<Vec<ProductImageId>> {
    let target = index.checked_add_signed(offset)?;
    if index >= images.len() || target >= images.len() {
        return None;
    }
    let mut order: Vec<ProductImageId> =
        images.iter().map(|image| image.id).collect();
    order.swap(index, target);
    Some(order)
}

#[derive(Properties, PartialEq)]
pub struct ProductImagesProps {
    pub images: Vec<ProductImage>,
    /// Receives the complete new order.
    pub on_reorder: Callback<Vec<ProductImageId>>,
    #[prop_or_default]
    pub disabled: bool,
}

/// Product gallery with move up/down controls.
#[function_component]
pub fn ProductImages(props: &ProductImagesProps) -> Html {
    if props.images.is_empty() {
        return html! {
            <p class="text-sm text-neutral-500">{"This product has no images."}</p>
        };
    }

    let mut images = props.images.clone();
    images.sort_by_key(|image| image.position);

    let button = |label: &'static str, order: Option<Vec<ProductImageId>>| {
        let disabled = props.disabled || order.is_none();
        let onclick = {
            let on_reorder = props.on_reorder.clone();
            Callback::from(move |_: MouseEvent| {
                if let Some(order) = order.clone() {
                    on_reorder.emit(order);
                }
            })
        };
        html! {
            <button
                type="button"
                {onclick}
                {disabled}
                class="px-2 py-1 text-xs rounded border border-neutral-300 dark:border-neutral-600 disabled:opacity-30"
            >
                {label}
            </button>
        }
    };

    html! {
        <ol class="space-y-2">
            {for images.iter().enumerate().map(|(index, image)| html! {
                <li key={image.id.0} class="flex items-center gap-3">
                    <img src={image.url.clone()} alt="" class="h-12 w-12 object-cover rounded" />
                    <span class="flex-1 text-sm text-neutral-600 dark:text-neutral-400 truncate">
                        {format!("#{}", index + 1)}
                    </span>
                    {button("Up", moved_order(&images, index, -1))}
                    {button("Down", moved_order(&images, index, 1))}
                </li>
            })}
        </ol>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images() -> Vec<ProductImage> {
        (1..=3)
            .map(|n| ProductImage {
                id: ProductImageId(n),
                url: format!("https://cdn.example.com/{n}.jpg"),
                position: n as u32,
            })
            .collect()
    }

    #[test]
    fn moving_swaps_neighbours() {
        let ids = |raw: [i64; 3]| raw.map(ProductImageId).to_vec();
        assert_eq!(moved_order(&images(), 0, 1), Some(ids([2, 1, 3])));
        assert_eq!(moved_order(&images(), 2, -1), Some(ids([1, 3, 2])));
    }

    #[test]
    fn moves_past_the_ends_are_rejected() {
        assert_eq!(moved_order(&images(), 0, -1), None);
        assert_eq!(moved_order(&images(), 2, 1), None);
        assert_eq!(moved_order(&[], 0, 1), None);
    }

    #[test]
    fn unparsable_numbers_are_field_errors() {
        let draft = ProductDraft {
            sku: "MUG-1".into(),
            name: "Mug".into(),
            price: "12,5".into(),
            stock: "-2".into(),
            ..Default::default()
        };
        let errors = draft.parse().unwrap_err();
        assert_eq!(errors["price"], "Price must be a number");
        assert_eq!(errors["stock"], "Stock cannot be negative");
    }

    #[test]
    fn valid_draft_parses() {
        let draft = ProductDraft {
            sku: " MUG-1 ".into(),
            name: "Mug".into(),
            price: "12.50".into(),
            stock: "8".into(),
            ..Default::default()
        };
        let details = draft.parse().unwrap();
        assert_eq!(details.sku, "MUG-1");
        assert_eq!(details.price, Decimal::new(1250, 2));
        assert_eq!(details.stock, 8);
    }
}
