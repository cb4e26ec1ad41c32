use payloads::requests::{ReviewEdit, Validate, ValidationErrors};
use payloads::{FieldErrors, Review};
use yew::prelude::*;

use super::{FormActions, bind};
use crate::components::form_field::{SelectField, TextAreaField, field_error};

#[derive(Properties, PartialEq)]
pub struct ReviewFormProps {
    pub review: Review,
    pub server_errors: FieldErrors,
    pub busy: bool,
    pub on_submit: Callback<ReviewEdit>,
    pub on_cancel: Callback<()>,
}

/// Moderator edit of a review's rating and text.
#[function_component]
pub fn ReviewForm(props: &ReviewFormProps) -> Html {
    let draft = use_state(|| ReviewEdit {
        rating: props.review.rating,
        comment: props.review.comment.clone(),
    });
    let errors = use_state(ValidationErrors::new);

    let onsubmit = {
        let draft = draft.clone();
        let errors = errors.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let payload = ReviewEdit {
                rating: draft.rating,
                comment: draft.comment.trim().to_string(),
            };
            match payload.validate() {
                Ok(()) => {
                    errors.set(ValidationErrors::new());
                    on_submit.emit(payload);
                }
                Err(found) => errors.set(found),
            }
        })
    };

    let error = |field: &str| field_error(&errors, &props.server_errors, field);
    let ratings = (1..=5u8)
        .map(|stars| (stars.to_string(), "★".repeat(stars.into())))
        .collect::<Vec<_>>();

    html! {
        <form {onsubmit} class="space-y-4">
            <p class="text-sm text-neutral-600 dark:text-neutral-400">
                {format!("{} on {}", props.review.author, props.review.product_name)}
            </p>
            <SelectField
                label="Rating"
                options={ratings}
                value={draft.rating.to_string()}
                on_change={bind(&draft, |d, v: String| {
                    if let Ok(rating) = v.parse() {
                        d.rating = rating;
                    }
                })}
                error={error("rating")}
                disabled={props.busy}
            />
            <TextAreaField
                label="Comment"
                value={draft.comment.clone()}
                on_change={bind(&draft, |d, v: String| d.comment = v)}
                error={error("comment")}
                rows={5}
                disabled={props.busy}
            />
            <FormActions
                busy={props.busy}
                submit_text="Save review"
                on_cancel={props.on_cancel.clone()}
            />
        </form>
    }
}
