//! Paginated, filterable list state for one [`Resource`], and the controller
//! that drives it against the backend.
//!
//! [`ResourceList`] is plain data with synchronous transitions, so the rules
//! for stale responses, pagination and error handling are testable without a
//! browser. [`ResourceController`] pairs it with an [`APIClient`]; the UI hook
//! keeps one per mounted page.

use crate::api_client::{APIClient, ClientError};
use crate::envelope::{FieldErrors, ListPage};
use crate::Resource;
use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::future::Future;
use std::rc::Rc;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    /// Always at least 1.
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
            total_pages: 1,
        }
    }

    fn apply_counts(&mut self, total: u64, total_pages: Option<u32>) {
        self.total = total;
        let derived = total.div_ceil(u64::from(self.page_size));
        self.total_pages = total_pages
            .unwrap_or_else(|| u32::try_from(derived).unwrap_or(u32::MAX))
            .max(1);
    }

    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Identifies one load; only the most recent ticket may write results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceList<R: Resource> {
    pub items: Vec<R>,
    pub filters: R::Filters,
    pub pagination: Pagination,
    /// Message for the most recent failed operation.
    pub error: Option<String>,
    /// Server-side field errors from the most recent failed write.
    pub field_errors: FieldErrors,
    /// Whether `error` came from a load rather than a write.
    load_failed: bool,
    generation: u64,
    load_pending: bool,
    writes_pending: u32,
    removed: HashSet<R::Id>,
}

impl<R: Resource> Default for ResourceList<R> {
    fn default() -> Self {
        Self::new(R::Filters::default(), DEFAULT_PAGE_SIZE)
    }
}

impl<R: Resource> ResourceList<R> {
    pub fn new(filters: R::Filters, page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            filters,
            pagination: Pagination::new(page_size),
            error: None,
            field_errors: FieldErrors::new(),
            load_failed: false,
            generation: 0,
            load_pending: false,
            writes_pending: 0,
            removed: HashSet::new(),
        }
    }

    pub fn loading(&self) -> bool {
        self.load_pending || self.writes_pending > 0
    }

    /// True while a list request is outstanding.
    pub fn fetching(&self) -> bool {
        self.load_pending
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.load_pending = true;
        self.error = None;
        self.load_failed = false;
        LoadTicket(self.generation)
    }

    /// Apply the outcome of a load. Returns `false` if the ticket was
    /// superseded and the outcome discarded.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<ListPage<R>, ClientError>,
    ) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        self.load_pending = false;
        match result {
            Ok(page) => {
                let items = dedup_by_id(page.items);
                let total = page.total.unwrap_or(items.len() as u64);
                self.pagination.apply_counts(total, page.total_pages);
                // A record the backend lists again is no longer deleted.
                for item in &items {
                    self.removed.remove(&item.id());
                }
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                self.error = Some(e.user_message());
                self.load_failed = true;
            }
        }
        true
    }

    /// After a successful load that left the current page past the end
    /// (e.g. the last row of the last page was deleted), move to the last
    /// page. Returns whether the page changed and needs loading.
    pub fn clamp_to_last_page(&mut self) -> bool {
        if self.load_failed || self.pagination.page <= self.pagination.total_pages
        {
            return false;
        }
        self.pagination.page = self.pagination.total_pages;
        true
    }

    /// Drop any outstanding load so its response is ignored.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.load_pending = false;
    }

    /// Replace the filters wholesale and return to the first page.
    pub fn set_filters(&mut self, filters: R::Filters) {
        self.filters = filters;
        self.pagination.page = 1;
    }

    /// Move to `page`, clamped to the known range. Returns whether the page
    /// changed.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = self.pagination.clamp(page);
        let changed = page != self.pagination.page;
        self.pagination.page = page;
        changed
    }

    pub fn begin_write(&mut self) {
        self.writes_pending += 1;
        self.error = None;
        self.load_failed = false;
        self.field_errors.clear();
    }

    pub fn finish_write(&mut self, result: Result<(), ClientError>) {
        self.writes_pending = self.writes_pending.saturating_sub(1);
        if let Err(e) = result {
            self.error = Some(e.user_message());
            if let Some(errors) = e.field_errors() {
                self.field_errors = errors.clone();
            }
        }
    }

    /// Drop a deleted record from the current page.
    pub fn remove_local(&mut self, id: R::Id) {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() < before {
            self.pagination.total = self.pagination.total.saturating_sub(1);
        }
        self.removed.insert(id);
    }

    /// The error of the last load, if it failed. Write failures are
    /// reported separately through the write's return value.
    pub fn load_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|_| self.load_failed)
    }

    pub fn contains(&self, id: R::Id) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    pub fn was_removed(&self, id: R::Id) -> bool {
        self.removed.contains(&id)
    }

    pub fn find(&self, id: R::Id) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }
}

/// First occurrence wins.
fn dedup_by_id<R: Resource>(items: Vec<R>) -> Vec<R> {
    let mut seen = HashSet::with_capacity(items.len());
    let before = items.len();
    let items: Vec<R> =
        items.into_iter().filter(|item| seen.insert(item.id())).collect();
    if items.len() < before {
        tracing::warn!(
            "dropped {} duplicate {} record(s) from list response",
            before - items.len(),
            R::NAME
        );
    }
    items
}

/// Drives a shared [`ResourceList`] against the backend.
///
/// Operations never panic or return errors; failures end up in
/// [`ResourceList::error`] and writes report success as a `bool`. `notify`
/// is called after every state change.
pub struct ResourceController<R: Resource> {
    state: Rc<RefCell<ResourceList<R>>>,
    client: APIClient,
    notify: Rc<dyn Fn()>,
}

impl<R: Resource> Clone for ResourceController<R> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            client: self.client.clone(),
            notify: self.notify.clone(),
        }
    }
}

impl<R: Resource> ResourceController<R> {
    pub fn new(
        state: Rc<RefCell<ResourceList<R>>>,
        client: APIClient,
        notify: impl Fn() + 'static,
    ) -> Self {
        Self {
            state,
            client,
            notify: Rc::new(notify),
        }
    }

    pub fn state(&self) -> Ref<'_, ResourceList<R>> {
        self.state.borrow()
    }

    pub fn snapshot(&self) -> ResourceList<R> {
        self.state.borrow().clone()
    }

    pub fn client(&self) -> &APIClient {
        &self.client
    }

    /// Fetch the current page. If the list shrank below the current page,
    /// the last page is fetched instead.
    pub async fn load(&self) {
        loop {
            let (ticket, filters, page, page_size) = {
                let mut state = self.state.borrow_mut();
                let ticket = state.begin_load();
                (
                    ticket,
                    state.filters.clone(),
                    state.pagination.page,
                    state.pagination.page_size,
                )
            };
            (self.notify)();

            let result = self.client.list::<R>(&filters, page, page_size).await;
            if let Err(e) = &result {
                tracing::warn!("failed to load {} list: {e}", R::NAME);
            }
            let reload = {
                let mut state = self.state.borrow_mut();
                if !state.finish_load(ticket, result) {
                    return;
                }
                state.clamp_to_last_page()
            };
            (self.notify)();
            // Each retry moves to a strictly lower page, so this ends.
            if !reload {
                return;
            }
            let page = self.state.borrow().pagination.page;
            tracing::debug!("{} list shrank, moving to page {page}", R::NAME);
        }
    }

    /// Run a write against the backend, reloading the list on success.
    pub async fn perform<F, Fut, T>(&self, op: F) -> bool
    where
        F: FnOnce(APIClient) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        self.state.borrow_mut().begin_write();
        (self.notify)();

        let result = op(self.client.clone()).await.map(|_| ());
        let ok = result.is_ok();
        if let Err(e) = &result {
            tracing::warn!("{} operation failed: {e}", R::NAME);
        }
        self.state.borrow_mut().finish_write(result);
        (self.notify)();

        if ok {
            self.load().await;
        }
        ok
    }

    pub async fn create(&self, details: R::Create) -> bool {
        self.perform(|client| async move { client.create::<R>(&details).await })
            .await
    }

    pub async fn update(&self, id: R::Id, details: R::Update) -> bool {
        self.perform(
            |client| async move { client.update::<R>(id, &details).await },
        )
        .await
    }

    /// Delete a record. Deleting one that is already gone succeeds.
    pub async fn remove(&self, id: R::Id) -> bool {
        if self.state.borrow().was_removed(id) {
            return true;
        }
        let state = self.state.clone();
        self.perform(|client| async move {
            match client.delete::<R>(id).await {
                Err(e) if e.is_not_found() => {
                    tracing::debug!("{} {id} was already deleted", R::NAME);
                }
                other => other?,
            }
            state.borrow_mut().remove_local(id);
            Ok(())
        })
        .await
    }

    pub async fn set_filters(&self, filters: R::Filters) {
        self.state.borrow_mut().set_filters(filters);
        self.load().await;
    }

    pub async fn set_page(&self, page: u32) {
        let changed = self.state.borrow_mut().set_page(page);
        if changed {
            self.load().await;
        }
    }

    pub async fn next_page(&self) {
        let page = self.state.borrow().pagination.page.saturating_add(1);
        self.set_page(page).await;
    }

    pub async fn previous_page(&self) {
        let page = self.state.borrow().pagination.page.saturating_sub(1);
        self.set_page(page).await;
    }

    pub fn invalidate(&self) {
        self.state.borrow_mut().invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::PermissionFilters;
    use crate::{Permission, PermissionId};
    use reqwest::StatusCode;

    fn permission(id: i64, code: &str) -> Permission {
        Permission {
            id: PermissionId(id),
            code: code.into(),
            name: code.into(),
            module: "sales".into(),
            description: String::new(),
        }
    }

    fn page(items: Vec<Permission>, total: Option<u64>) -> ListPage<Permission> {
        ListPage {
            items,
            total,
            total_pages: None,
        }
    }

    fn server_error() -> ClientError {
        ClientError::APIError(StatusCode::INTERNAL_SERVER_ERROR, "boom".into())
    }

    #[test]
    fn success_replaces_items_and_counts() {
        let mut list = ResourceList::<Permission>::new(Default::default(), 2);
        let ticket = list.begin_load();
        assert!(list.loading());
        assert!(list.finish_load(
            ticket,
            Ok(page(vec![permission(1, "a"), permission(2, "b")], Some(5)))
        ));
        assert!(!list.loading());
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.pagination.total, 5);
        assert_eq!(list.pagination.total_pages, 3);
    }

    #[test]
    fn failed_load_keeps_items_and_next_success_clears_error() {
        let mut list = ResourceList::<Permission>::default();
        let ticket = list.begin_load();
        list.finish_load(ticket, Ok(page(vec![permission(1, "a")], None)));

        let ticket = list.begin_load();
        list.finish_load(ticket, Err(server_error()));
        assert_eq!(list.error.as_deref(), Some("boom"));
        assert_eq!(list.load_error(), Some("boom"));
        assert_eq!(list.items, vec![permission(1, "a")]);

        let ticket = list.begin_load();
        assert_eq!(list.error, None);
        list.finish_load(ticket, Ok(page(vec![permission(2, "b")], None)));
        assert_eq!(list.error, None);
        assert_eq!(list.items, vec![permission(2, "b")]);
    }

    #[test]
    fn superseded_load_is_discarded() {
        let mut list = ResourceList::<Permission>::default();
        let first = list.begin_load();
        let second = list.begin_load();
        assert!(list.finish_load(second, Ok(page(vec![permission(2, "b")], None))));
        assert!(!list.finish_load(first, Ok(page(vec![permission(1, "a")], None))));
        assert_eq!(list.items, vec![permission(2, "b")]);
    }

    #[test]
    fn invalidated_load_is_discarded() {
        let mut list = ResourceList::<Permission>::default();
        let ticket = list.begin_load();
        list.invalidate();
        assert!(!list.loading());
        assert!(!list.finish_load(ticket, Err(server_error())));
        assert_eq!(list.error, None);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let mut list = ResourceList::<Permission>::default();
        let ticket = list.begin_load();
        list.finish_load(
            ticket,
            Ok(page(
                vec![permission(1, "a"), permission(2, "b"), permission(1, "c")],
                None,
            )),
        );
        assert_eq!(list.items, vec![permission(1, "a"), permission(2, "b")]);
        assert_eq!(list.pagination.total, 2);
    }

    #[test]
    fn set_filters_returns_to_first_page() {
        let mut list = ResourceList::<Permission>::new(Default::default(), 10);
        let ticket = list.begin_load();
        list.finish_load(ticket, Ok(page(vec![permission(1, "a")], Some(45))));
        assert!(list.set_page(4));
        assert_eq!(list.pagination.page, 4);

        list.set_filters(PermissionFilters {
            search: Some("refund".into()),
            module: None,
        });
        assert_eq!(list.pagination.page, 1);
        assert_eq!(list.filters.search.as_deref(), Some("refund"));
    }

    #[test]
    fn pages_are_clamped() {
        let mut list = ResourceList::<Permission>::new(Default::default(), 10);
        assert!(!list.set_page(0));
        assert!(!list.set_page(9));
        assert_eq!(list.pagination.page, 1);

        let ticket = list.begin_load();
        list.finish_load(ticket, Ok(page(vec![permission(1, "a")], Some(25))));
        assert!(list.set_page(9));
        assert_eq!(list.pagination.page, 3);
        assert!(!list.pagination.has_next());
        assert!(list.pagination.has_previous());
    }

    #[test]
    fn removing_twice_is_harmless() {
        let mut list = ResourceList::<Permission>::default();
        let ticket = list.begin_load();
        list.finish_load(
            ticket,
            Ok(page(vec![permission(1, "a"), permission(2, "b")], None)),
        );
        list.remove_local(PermissionId(1));
        list.remove_local(PermissionId(1));
        assert!(!list.contains(PermissionId(1)));
        assert!(list.was_removed(PermissionId(1)));
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.pagination.total, 1);
    }

    #[test]
    fn listed_again_after_removal_can_be_removed_again() {
        let mut list = ResourceList::<Permission>::default();
        let ticket = list.begin_load();
        list.finish_load(ticket, Ok(page(vec![permission(1, "a")], None)));
        list.remove_local(PermissionId(1));
        assert!(list.was_removed(PermissionId(1)));

        let ticket = list.begin_load();
        list.finish_load(ticket, Ok(page(vec![permission(1, "a")], None)));
        assert!(!list.was_removed(PermissionId(1)));
        assert!(list.contains(PermissionId(1)));
    }

    #[test]
    fn shrunken_list_moves_to_last_page() {
        let mut list = ResourceList::<Permission>::new(Default::default(), 10);
        let ticket = list.begin_load();
        list.finish_load(ticket, Ok(page(vec![permission(1, "a")], Some(11))));
        assert!(list.set_page(2));
        assert!(!list.clamp_to_last_page());

        let ticket = list.begin_load();
        list.finish_load(ticket, Ok(page(Vec::new(), Some(10))));
        assert_eq!(list.pagination.total_pages, 1);
        assert!(list.clamp_to_last_page());
        assert_eq!(list.pagination.page, 1);
        assert!(!list.clamp_to_last_page());
    }

    #[test]
    fn failed_load_does_not_move_page() {
        let mut list = ResourceList::<Permission>::new(Default::default(), 10);
        let ticket = list.begin_load();
        list.finish_load(ticket, Ok(page(vec![permission(1, "a")], Some(30))));
        assert!(list.set_page(3));
        list.pagination.total_pages = 1;
        let ticket = list.begin_load();
        list.finish_load(ticket, Err(server_error()));
        assert!(!list.clamp_to_last_page());
        assert_eq!(list.pagination.page, 3);
    }

    #[test]
    fn failed_write_records_field_errors() {
        let mut list = ResourceList::<Permission>::default();
        list.begin_write();
        assert!(list.loading());
        list.finish_write(Err(ClientError::Validation {
            message: "Invalid".into(),
            errors: FieldErrors::from([(
                "code".to_string(),
                vec!["Already exists".to_string()],
            )]),
        }));
        assert!(!list.loading());
        assert_eq!(list.error.as_deref(), Some("Invalid"));
        assert_eq!(list.load_error(), None);
        assert_eq!(list.field_errors["code"], vec!["Already exists"]);

        list.begin_write();
        assert!(list.field_errors.is_empty());
        assert_eq!(list.error, None);
    }
}
