use payloads::listing::DEFAULT_PAGE_SIZE;
use payloads::requests::ReviewFilters;
use payloads::{Review, ReviewId, ReviewStatus};
use yew::prelude::*;

use crate::components::forms::ReviewForm;
use crate::components::{
    ConfirmationModal, FilterBar, ListStatus, Modal, PageHeader,
    PaginationControls, RowButton, SelectField, StatusBadge, Table, Tone,
};
use crate::contexts::toast::use_toast;
use crate::hooks::{use_resource, use_title};
use crate::utils::format_timestamp;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dialog {
    Closed,
    Edit(ReviewId),
    Delete(ReviewId),
}

fn status_tone(status: ReviewStatus) -> Tone {
    match status {
        ReviewStatus::Pending => Tone::Warning,
        ReviewStatus::Approved => Tone::Positive,
        ReviewStatus::Rejected => Tone::Negative,
    }
}

fn stars(rating: u8) -> String {
    let rating = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(rating), "☆".repeat(5 - rating))
}

#[function_component]
pub fn ReviewsPage() -> Html {
    use_title("Reviews");
    let reviews = use_resource::<Review>(DEFAULT_PAGE_SIZE);
    let toast = use_toast();
    let dialog = use_state(|| Dialog::Closed);

    let list = reviews.list();
    let filters = list.filters.clone();
    let busy = list.loading();

    let open = |next: Dialog| {
        let dialog = dialog.clone();
        Callback::from(move |_: ()| dialog.set(next))
    };
    let close = open(Dialog::Closed);

    let on_search = {
        let reviews = reviews.clone();
        let filters = filters.clone();
        Callback::from(move |search| {
            reviews.set_filters(ReviewFilters {
                search,
                ..filters.clone()
            })
        })
    };
    let on_status = {
        let reviews = reviews.clone();
        let filters = filters.clone();
        Callback::from(move |raw: String| {
            reviews.set_filters(ReviewFilters {
                status: ReviewStatus::parse(&raw),
                ..filters.clone()
            })
        })
    };
    let on_rating = {
        let reviews = reviews.clone();
        let filters = filters.clone();
        Callback::from(move |raw: String| {
            reviews.set_filters(ReviewFilters {
                rating: raw.parse().ok(),
                ..filters.clone()
            })
        })
    };
    let on_reset = {
        let reviews = reviews.clone();
        Callback::from(move |_: ()| reviews.set_filters(ReviewFilters::default()))
    };
    let on_page_change = {
        let reviews = reviews.clone();
        Callback::from(move |page| reviews.set_page(page))
    };
    let on_retry = {
        let reviews = reviews.clone();
        Callback::from(move |_: ()| reviews.reload())
    };

    let rows = list.items.iter().map(|review| {
        let id = review.id;
        let approve = {
            let reviews = reviews.clone();
            let toast = toast.clone();
            Callback::from(move |_: ()| {
                reviews.action(&toast, "Review approved", Callback::noop(), move |client| async move {
                    client.approve_review(id).await
                });
            })
        };
        let reject = {
            let reviews = reviews.clone();
            let toast = toast.clone();
            Callback::from(move |_: ()| {
                reviews.action(&toast, "Review rejected", Callback::noop(), move |client| async move {
                    client.reject_review(id).await
                });
            })
        };

        html! {
            <tr key={id.0}>
                <td class="px-4 py-3 font-medium text-neutral-900 dark:text-neutral-100">{&review.product_name}</td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400">{&review.author}</td>
                <td class="px-4 py-3 text-amber-500 whitespace-nowrap">{stars(review.rating)}</td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400 max-w-md truncate">{&review.comment}</td>
                <td class="px-4 py-3">
                    <StatusBadge label={review.status.label()} tone={status_tone(review.status)} />
                </td>
                <td class="px-4 py-3 text-neutral-600 dark:text-neutral-400 whitespace-nowrap">
                    {format_timestamp(review.created_at)}
                </td>
                <td class="px-4 py-3 space-x-3 whitespace-nowrap">
                    if review.status != ReviewStatus::Approved {
                        <RowButton label="Approve" on_click={approve} disabled={busy} />
                    }
                    if review.status != ReviewStatus::Rejected {
                        <RowButton label="Reject" on_click={reject} disabled={busy} />
                    }
                    <RowButton label="Edit" on_click={open(Dialog::Edit(id))} disabled={busy} />
                    <RowButton label="Delete" danger={true} on_click={open(Dialog::Delete(id))} disabled={busy} />
                </td>
            </tr>
        }
    });

    let dialog_view = match *dialog {
        Dialog::Closed => html! {},
        Dialog::Edit(id) => match list.find(id) {
            Some(review) => {
                let on_submit = {
                    let reviews = reviews.clone();
                    let toast = toast.clone();
                    let close = close.clone();
                    Callback::from(move |details| {
                        reviews.update(&toast, id, details, close.clone())
                    })
                };
                html! {
                    <Modal title="Edit review" on_close={close.clone()} {busy}>
                        <ReviewForm
                            review={review.clone()}
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
            let on_confirm = {
                let reviews = reviews.clone();
                let toast = toast.clone();
                let close = close.clone();
                Callback::from(move |_: ()| reviews.remove(&toast, id, close.clone()))
            };
            html! {
                <ConfirmationModal
                    title="Delete review"
                    message="Delete this review? It will disappear from the store."
                    confirm_text="Delete"
                    {on_confirm}
                    on_close={close.clone()}
                    is_loading={busy}
                />
            }
        }
    };

    let statuses = ReviewStatus::ALL
        .iter()
        .map(|status| (status.as_str().to_string(), status.label().to_string()))
        .collect::<Vec<_>>();
    let ratings = (1..=5u8)
        .rev()
        .map(|rating| (rating.to_string(), stars(rating)))
        .collect::<Vec<_>>();

    html! {
        <div>
            <PageHeader title="Reviews" subtitle="Moderate what customers say about products" />
            <FilterBar
                search={filters.search.clone()}
                placeholder="Search by product, author or text"
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
                        label="Rating"
                        options={ratings}
                        value={filters.rating.map(|r| r.to_string()).unwrap_or_default()}
                        on_change={on_rating}
                        empty_label="Any"
                    />
                </div>
            </FilterBar>
            <ListStatus
                loading={list.fetching()}
                error={list.load_error().map(str::to_string)}
                is_empty={list.items.is_empty()}
                noun="reviews"
                {on_retry}
            />
            if !list.items.is_empty() {
                <Table headers={vec!["Product", "Author", "Rating", "Comment", "Status", "Date", ""]}>
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

    #[test]
    fn star_strings() {
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(0), "☆☆☆☆☆");
        assert_eq!(stars(9), "★★★★★");
    }
}
