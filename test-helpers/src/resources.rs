//! Generic REST handlers for every mocked collection.

use actix_web::{HttpRequest, HttpResponse, web};
use jiff::Timestamp;
use payloads::requests::{
    AssignTicket, ChangePassword, CreateUser, NewReview, PaymentMethodDetails,
    PermissionDetails, ProductDetails, ReorderImages, ReviewEdit, RoleDetails,
    SetPermissions, TicketDetails, TicketUpdate, UpdateUser, Validate,
};
use payloads::{
    PaymentMethod, PaymentMethodId, Permission, PermissionId, Product,
    ProductId, Resource, Review, ReviewId, ReviewStatus, Role, RoleId,
    RoleSummary, SupportTicket, TicketId, TicketStatus, User, UserId,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};

use crate::server::{
    ListShape, MockBackend, MockError, authorize, envelope,
};
use crate::store::{Store, Table};

pub type Query = HashMap<String, String>;

const MAX_PAGE_SIZE: usize = 100;

/// A collection the mock serves under its [`Resource::PATH`].
pub trait MockResource:
    Resource<
        Create: DeserializeOwned + Validate,
        Update: DeserializeOwned + Validate,
    > + Serialize
{
    fn table(store: &Store) -> &Table<Self>;
    fn table_mut(store: &mut Store) -> &mut Table<Self>;
    fn id_from(raw: i64) -> Self::Id;

    /// Whether the record passes the list filters in `query`.
    fn matches(&self, query: &Query) -> bool;

    fn build(
        store: &mut Store,
        id: Self::Id,
        details: Self::Create,
    ) -> Result<Self, MockError>;

    fn apply(
        &mut self,
        store: &Store,
        update: Self::Update,
    ) -> Result<(), MockError>;

    /// Apply a PATCH body. Most collections expect a full update payload.
    fn patch(&mut self, store: &Store, body: Value) -> Result<(), MockError> {
        apply_update(self, store, body)
    }

    /// Handle `POST {PATH}{id}/{name}/`, returning the success message.
    fn action(
        store: &mut Store,
        id: Self::Id,
        name: &str,
        body: Value,
    ) -> Result<&'static str, MockError> {
        let _ = (store, id, body);
        tracing::debug!("unknown {} action {name}", Self::NAME);
        Err(MockError::NotFound("Action"))
    }

    fn check_delete(&self, store: &Store) -> Result<(), MockError> {
        let _ = store;
        Ok(())
    }

    fn on_delete(&self, store: &mut Store) {
        let _ = store;
    }
}

fn apply_update<R: MockResource>(
    record: &mut R,
    store: &Store,
    body: Value,
) -> Result<(), MockError> {
    let update: R::Update = serde_json::from_value(body)?;
    update.validate()?;
    record.apply(store, update)
}

fn find<R: MockResource>(store: &Store, id: R::Id) -> Result<&R, MockError> {
    R::table(store)
        .rows
        .iter()
        .find(|r| r.id() == id)
        .ok_or(MockError::NotFound(capitalized(R::NAME)))
}

fn find_mut<R: MockResource>(
    store: &mut Store,
    id: R::Id,
) -> Result<&mut R, MockError> {
    R::table_mut(store)
        .rows
        .iter_mut()
        .find(|r| r.id() == id)
        .ok_or(MockError::NotFound(capitalized(R::NAME)))
}

fn capitalized(name: &'static str) -> &'static str {
    match name {
        "user" => "User",
        "role" => "Role",
        "permission" => "Permission",
        "payment method" => "Payment method",
        "review" => "Review",
        "product" => "Product",
        "ticket" => "Ticket",
        _ => "Record",
    }
}

fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, MockError> {
    Ok(serde_json::from_value(body)?)
}

// Filter helpers

fn search_hit(query: &Query, fields: &[&str]) -> bool {
    match query.get("search").map(|s| s.trim().to_lowercase()) {
        Some(needle) if !needle.is_empty() => fields
            .iter()
            .any(|field| field.to_lowercase().contains(&needle)),
        _ => true,
    }
}

fn flag_hit(query: &Query, key: &str, value: bool) -> bool {
    match query.get(key).map(String::as_str) {
        Some("true") => value,
        Some("false") => !value,
        _ => true,
    }
}

fn eq_hit(query: &Query, key: &str, value: &str) -> bool {
    query
        .get(key)
        .is_none_or(|wanted| wanted.eq_ignore_ascii_case(value))
}

fn unique<'a, R: 'a>(
    mut rows: impl Iterator<Item = &'a R>,
    is_clash: impl Fn(&R) -> bool,
    field: &str,
    message: &str,
) -> Result<(), MockError> {
    if rows.any(is_clash) {
        Err(MockError::field(field, message))
    } else {
        Ok(())
    }
}

// Handlers

fn page_params(query: &Query) -> (usize, usize) {
    let page = query
        .get("page")
        .and_then(|p| p.parse().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);
    let page_size = query
        .get("page_size")
        .and_then(|p| p.parse().ok())
        .filter(|p| *p > 0)
        .unwrap_or(payloads::listing::DEFAULT_PAGE_SIZE as usize)
        .min(MAX_PAGE_SIZE);
    (page, page_size)
}

fn list_body(shape: ListShape, items: Value, count: usize, pages: usize) -> Value {
    let paged = json!({
        "count": count,
        "total_pages": pages,
        "results": items,
    });
    match shape {
        ListShape::Bare => items,
        ListShape::Results => paged,
        ListShape::NestedResults => json!({ "data": paged }),
        ListShape::Data => json!({ "data": items, "count": count }),
        ListShape::Enveloped => envelope("", paged),
    }
}

async fn list<R: MockResource>(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
    query: web::Query<Query>,
) -> Result<HttpResponse, MockError> {
    let delay = {
        let mut state = backend.lock();
        authorize(&request, &state)?;
        state.take_list_delay()
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut state = backend.lock();
    if state.take_list_failure() {
        return Err(MockError::Unavailable);
    }
    let (page, page_size) = page_params(&query);
    let matching: Vec<&R> = R::table(&state.store)
        .rows
        .iter()
        .filter(|r| r.matches(&query))
        .collect();
    let count = matching.len();
    let pages = count.div_ceil(page_size).max(1);
    let items: Vec<&R> = matching
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    let body =
        list_body(state.list_shape(), serde_json::to_value(items)?, count, pages);
    Ok(HttpResponse::Ok().json(body))
}

async fn get<R: MockResource>(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
    path: web::Path<i64>,
) -> Result<HttpResponse, MockError> {
    let state = backend.lock();
    authorize(&request, &state)?;
    let record = find::<R>(&state.store, R::id_from(path.into_inner()))?;
    Ok(HttpResponse::Ok().json(envelope("", record)))
}

async fn create<R: MockResource>(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
    details: web::Json<R::Create>,
) -> Result<HttpResponse, MockError> {
    let mut state = backend.lock();
    authorize(&request, &state)?;
    details.validate()?;

    let id = R::id_from(R::table_mut(&mut state.store).next_id());
    let record = R::build(&mut state.store, id, details.into_inner())?;
    R::table_mut(&mut state.store).rows.push(record);
    let record = find::<R>(&state.store, id)?;
    let message = format!("{} created", capitalized(R::NAME));
    Ok(HttpResponse::Created().json(envelope(&message, record)))
}

async fn update<R: MockResource>(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> Result<HttpResponse, MockError> {
    let mut state = backend.lock();
    authorize(&request, &state)?;
    let id = R::id_from(path.into_inner());

    let mut record = find::<R>(&state.store, id)?.clone();
    record.patch(&state.store, body.into_inner())?;
    *find_mut::<R>(&mut state.store, id)? = record;

    let record = find::<R>(&state.store, id)?;
    let message = format!("{} updated", capitalized(R::NAME));
    Ok(HttpResponse::Ok().json(envelope(&message, record)))
}

async fn delete<R: MockResource>(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
    path: web::Path<i64>,
) -> Result<HttpResponse, MockError> {
    let mut state = backend.lock();
    authorize(&request, &state)?;
    let id = R::id_from(path.into_inner());

    let record = find::<R>(&state.store, id)?.clone();
    record.check_delete(&state.store)?;
    R::table_mut(&mut state.store).rows.retain(|r| r.id() != id);
    record.on_delete(&mut state.store);
    Ok(HttpResponse::NoContent().finish())
}

async fn action<R: MockResource>(
    request: HttpRequest,
    backend: web::Data<MockBackend>,
    path: web::Path<(i64, String)>,
    body: web::Bytes,
) -> Result<HttpResponse, MockError> {
    let mut state = backend.lock();
    authorize(&request, &state)?;
    let (raw_id, name) = path.into_inner();
    let id = R::id_from(raw_id);
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)?
    };

    find::<R>(&state.store, id)?;
    let message = R::action(&mut state.store, id, &name, body)?;
    let record = find::<R>(&state.store, id)?;
    Ok(HttpResponse::Ok().json(envelope(message, record)))
}

pub fn routes<R: MockResource>(cfg: &mut web::ServiceConfig) {
    let collection = format!("/{}", R::PATH);
    let record = format!("{collection}{{id}}/");
    let record_action = format!("{collection}{{id}}/{{action}}/");
    cfg.route(&collection, web::get().to(list::<R>))
        .route(&collection, web::post().to(create::<R>))
        .route(&record, web::get().to(get::<R>))
        .route(&record, web::patch().to(update::<R>))
        .route(&record, web::delete().to(delete::<R>))
        .route(&record_action, web::post().to(action::<R>));
}

// Collections

fn role_summaries(
    store: &Store,
    ids: &[RoleId],
) -> Result<Vec<RoleSummary>, MockError> {
    ids.iter()
        .map(|id| {
            store
                .roles
                .rows
                .iter()
                .find(|r| r.id == *id)
                .map(|r| RoleSummary {
                    id: r.id,
                    name: r.name.clone(),
                })
                .ok_or_else(|| MockError::field("roles", "Unknown role"))
        })
        .collect()
}

fn set_active(active: bool) -> &'static str {
    if active { "Activated" } else { "Deactivated" }
}

impl MockResource for User {
    fn table(store: &Store) -> &Table<Self> {
        &store.users
    }

    fn table_mut(store: &mut Store) -> &mut Table<Self> {
        &mut store.users
    }

    fn id_from(raw: i64) -> UserId {
        UserId(raw)
    }

    fn matches(&self, query: &Query) -> bool {
        search_hit(
            query,
            &[&self.username, &self.email, &self.first_name, &self.last_name],
        ) && flag_hit(query, "is_active", self.is_active)
            && query.get("role").is_none_or(|role| {
                self.roles.iter().any(|r| r.id.to_string() == *role)
            })
    }

    fn build(
        store: &mut Store,
        id: UserId,
        details: CreateUser,
    ) -> Result<Self, MockError> {
        unique(
            store.users.rows.iter(),
            |u| u.username.eq_ignore_ascii_case(&details.username),
            "username",
            "A user with that username already exists.",
        )?;
        unique(
            store.users.rows.iter(),
            |u| u.email.eq_ignore_ascii_case(&details.email),
            "email",
            "A user with that email already exists.",
        )?;
        let roles = role_summaries(store, &details.roles)?;
        store.set_password(&details.username, &details.password, id);
        Ok(User {
            id,
            username: details.username,
            email: details.email,
            first_name: details.first_name,
            last_name: details.last_name,
            phone: details.phone,
            is_active: true,
            roles,
            date_joined: Timestamp::now(),
        })
    }

    fn apply(&mut self, store: &Store, update: UpdateUser) -> Result<(), MockError> {
        unique(
            store.users.rows.iter(),
            |u| u.id != self.id && u.email.eq_ignore_ascii_case(&update.email),
            "email",
            "A user with that email already exists.",
        )?;
        self.roles = role_summaries(store, &update.roles)?;
        self.email = update.email;
        self.first_name = update.first_name;
        self.last_name = update.last_name;
        self.phone = update.phone;
        Ok(())
    }

    fn action(
        store: &mut Store,
        id: UserId,
        name: &str,
        body: Value,
    ) -> Result<&'static str, MockError> {
        match name {
            "activate" | "deactivate" => {
                let active = name == "activate";
                find_mut::<User>(store, id)?.is_active = active;
                Ok(set_active(active))
            }
            "change-password" => {
                let details: ChangePassword = parse_body(body)?;
                details.validate()?;
                let username = find::<User>(store, id)?.username.clone();
                store.set_password(&username, &details.password, id);
                Ok("Password changed")
            }
            _ => Err(MockError::NotFound("Action")),
        }
    }

    fn on_delete(&self, store: &mut Store) {
        store.forget_credentials(self.id);
    }
}

impl MockResource for Role {
    fn table(store: &Store) -> &Table<Self> {
        &store.roles
    }

    fn table_mut(store: &mut Store) -> &mut Table<Self> {
        &mut store.roles
    }

    fn id_from(raw: i64) -> RoleId {
        RoleId(raw)
    }

    fn matches(&self, query: &Query) -> bool {
        search_hit(query, &[&self.name, &self.description])
            && flag_hit(query, "is_active", self.is_active)
    }

    fn build(
        store: &mut Store,
        id: RoleId,
        details: RoleDetails,
    ) -> Result<Self, MockError> {
        unique(
            store.roles.rows.iter(),
            |r| r.name.eq_ignore_ascii_case(&details.name),
            "name",
            "A role with that name already exists.",
        )?;
        Ok(Role {
            id,
            permissions: lookup_permissions(store, &details.permissions)?,
            name: details.name,
            description: details.description,
            is_active: true,
        })
    }

    fn apply(&mut self, store: &Store, update: RoleDetails) -> Result<(), MockError> {
        unique(
            store.roles.rows.iter(),
            |r| r.id != self.id && r.name.eq_ignore_ascii_case(&update.name),
            "name",
            "A role with that name already exists.",
        )?;
        self.permissions = lookup_permissions(store, &update.permissions)?;
        self.name = update.name;
        self.description = update.description;
        Ok(())
    }

    fn action(
        store: &mut Store,
        id: RoleId,
        name: &str,
        body: Value,
    ) -> Result<&'static str, MockError> {
        match name {
            "activate" | "deactivate" => {
                let active = name == "activate";
                find_mut::<Role>(store, id)?.is_active = active;
                Ok(set_active(active))
            }
            "permissions" => {
                let details: SetPermissions = parse_body(body)?;
                let permissions =
                    lookup_permissions(store, &details.permissions)?;
                find_mut::<Role>(store, id)?.permissions = permissions;
                Ok("Permissions updated")
            }
            _ => Err(MockError::NotFound("Action")),
        }
    }

    fn check_delete(&self, store: &Store) -> Result<(), MockError> {
        let holders = store
            .users
            .rows
            .iter()
            .filter(|u| u.roles.iter().any(|r| r.id == self.id))
            .count();
        if holders > 0 {
            Err(MockError::Conflict(format!(
                "Role is assigned to {holders} user(s)."
            )))
        } else {
            Ok(())
        }
    }
}

fn lookup_permissions(
    store: &Store,
    ids: &[PermissionId],
) -> Result<Vec<Permission>, MockError> {
    let wanted: HashSet<PermissionId> = ids.iter().copied().collect();
    let found: Vec<Permission> = store
        .permissions
        .rows
        .iter()
        .filter(|p| wanted.contains(&p.id))
        .cloned()
        .collect();
    if found.len() == wanted.len() {
        Ok(found)
    } else {
        Err(MockError::field("permissions", "Unknown permission"))
    }
}

impl MockResource for Permission {
    fn table(store: &Store) -> &Table<Self> {
        &store.permissions
    }

    fn table_mut(store: &mut Store) -> &mut Table<Self> {
        &mut store.permissions
    }

    fn id_from(raw: i64) -> PermissionId {
        PermissionId(raw)
    }

    fn matches(&self, query: &Query) -> bool {
        search_hit(query, &[&self.code, &self.name, &self.description])
            && eq_hit(query, "module", &self.module)
    }

    fn build(
        store: &mut Store,
        id: PermissionId,
        details: PermissionDetails,
    ) -> Result<Self, MockError> {
        unique(
            store.permissions.rows.iter(),
            |p| p.code == details.code,
            "code",
            "A permission with that code already exists.",
        )?;
        Ok(Permission {
            id,
            code: details.code,
            name: details.name,
            module: details.module,
            description: details.description,
        })
    }

    fn apply(
        &mut self,
        store: &Store,
        update: PermissionDetails,
    ) -> Result<(), MockError> {
        unique(
            store.permissions.rows.iter(),
            |p| p.id != self.id && p.code == update.code,
            "code",
            "A permission with that code already exists.",
        )?;
        self.code = update.code;
        self.name = update.name;
        self.module = update.module;
        self.description = update.description;
        Ok(())
    }
}

impl MockResource for PaymentMethod {
    fn table(store: &Store) -> &Table<Self> {
        &store.payment_methods
    }

    fn table_mut(store: &mut Store) -> &mut Table<Self> {
        &mut store.payment_methods
    }

    fn id_from(raw: i64) -> PaymentMethodId {
        PaymentMethodId(raw)
    }

    fn matches(&self, query: &Query) -> bool {
        search_hit(query, &[&self.name, self.kind.label()])
            && flag_hit(query, "is_active", self.is_active)
    }

    fn build(
        store: &mut Store,
        id: PaymentMethodId,
        details: PaymentMethodDetails,
    ) -> Result<Self, MockError> {
        unique(
            store.payment_methods.rows.iter(),
            |m| m.name.eq_ignore_ascii_case(&details.name),
            "name",
            "A payment method with that name already exists.",
        )?;
        Ok(PaymentMethod {
            id,
            name: details.name,
            kind: details.kind,
            details: details.details,
            is_active: true,
            is_principal: store.payment_methods.rows.is_empty(),
        })
    }

    fn apply(
        &mut self,
        _store: &Store,
        update: PaymentMethodDetails,
    ) -> Result<(), MockError> {
        self.name = update.name;
        self.kind = update.kind;
        self.details = update.details;
        Ok(())
    }

    fn action(
        store: &mut Store,
        id: PaymentMethodId,
        name: &str,
        _body: Value,
    ) -> Result<&'static str, MockError> {
        match name {
            "activate" => {
                find_mut::<PaymentMethod>(store, id)?.is_active = true;
                Ok(set_active(true))
            }
            "deactivate" => {
                let method = find_mut::<PaymentMethod>(store, id)?;
                method.is_active = false;
                method.is_principal = false;
                Ok(set_active(false))
            }
            "mark-principal" => {
                if !find::<PaymentMethod>(store, id)?.is_active {
                    return Err(MockError::BadRequest(
                        "Only active payment methods can be principal."
                            .into(),
                    ));
                }
                for method in &mut store.payment_methods.rows {
                    method.is_principal = method.id == id;
                }
                Ok("Marked as principal")
            }
            _ => Err(MockError::NotFound("Action")),
        }
    }
}

impl MockResource for Review {
    fn table(store: &Store) -> &Table<Self> {
        &store.reviews
    }

    fn table_mut(store: &mut Store) -> &mut Table<Self> {
        &mut store.reviews
    }

    fn id_from(raw: i64) -> ReviewId {
        ReviewId(raw)
    }

    fn matches(&self, query: &Query) -> bool {
        search_hit(query, &[&self.author, &self.comment, &self.product_name])
            && eq_hit(query, "status", self.status.as_str())
            && eq_hit(query, "rating", &self.rating.to_string())
    }

    fn build(
        store: &mut Store,
        id: ReviewId,
        details: NewReview,
    ) -> Result<Self, MockError> {
        let product = store
            .products
            .rows
            .iter()
            .find(|p| p.id == details.product)
            .ok_or_else(|| MockError::field("product", "Unknown product"))?;
        Ok(Review {
            id,
            product: product.id,
            product_name: product.name.clone(),
            author: "staff".into(),
            rating: details.rating,
            comment: details.comment,
            status: ReviewStatus::Pending,
            created_at: Timestamp::now(),
        })
    }

    fn apply(&mut self, _store: &Store, update: ReviewEdit) -> Result<(), MockError> {
        self.rating = update.rating;
        self.comment = update.comment;
        Ok(())
    }

    fn action(
        store: &mut Store,
        id: ReviewId,
        name: &str,
        _body: Value,
    ) -> Result<&'static str, MockError> {
        let (status, message) = match name {
            "approve" => (ReviewStatus::Approved, "Review approved"),
            "reject" => (ReviewStatus::Rejected, "Review rejected"),
            _ => return Err(MockError::NotFound("Action")),
        };
        find_mut::<Review>(store, id)?.status = status;
        Ok(message)
    }
}

impl MockResource for Product {
    fn table(store: &Store) -> &Table<Self> {
        &store.products
    }

    fn table_mut(store: &mut Store) -> &mut Table<Self> {
        &mut store.products
    }

    fn id_from(raw: i64) -> ProductId {
        ProductId(raw)
    }

    fn matches(&self, query: &Query) -> bool {
        search_hit(query, &[&self.sku, &self.name, &self.description])
            && eq_hit(query, "category", &self.category)
            && flag_hit(query, "is_active", self.is_active)
    }

    fn build(
        store: &mut Store,
        id: ProductId,
        details: ProductDetails,
    ) -> Result<Self, MockError> {
        unique(
            store.products.rows.iter(),
            |p| p.sku.eq_ignore_ascii_case(&details.sku),
            "sku",
            "This SKU is already in use.",
        )?;
        Ok(Product {
            id,
            sku: details.sku,
            name: details.name,
            description: details.description,
            category: details.category,
            price: details.price,
            stock: details.stock,
            is_active: true,
            images: Vec::new(),
        })
    }

    fn apply(
        &mut self,
        store: &Store,
        update: ProductDetails,
    ) -> Result<(), MockError> {
        unique(
            store.products.rows.iter(),
            |p| p.id != self.id && p.sku.eq_ignore_ascii_case(&update.sku),
            "sku",
            "This SKU is already in use.",
        )?;
        self.sku = update.sku;
        self.name = update.name;
        self.description = update.description;
        self.category = update.category;
        self.price = update.price;
        self.stock = update.stock;
        Ok(())
    }

    /// Accepts `{"is_active": bool}` on its own as a visibility toggle.
    fn patch(&mut self, store: &Store, body: Value) -> Result<(), MockError> {
        if let Some(fields) = body.as_object()
            && fields.len() == 1
            && let Some(active) = fields.get("is_active").and_then(Value::as_bool)
        {
            self.is_active = active;
            return Ok(());
        }
        apply_update(self, store, body)
    }

    fn action(
        store: &mut Store,
        id: ProductId,
        name: &str,
        body: Value,
    ) -> Result<&'static str, MockError> {
        if name != "reorder-images" {
            return Err(MockError::NotFound("Action"));
        }
        let details: ReorderImages = parse_body(body)?;
        let product = find_mut::<Product>(store, id)?;

        let current: HashSet<_> = product.images.iter().map(|i| i.id).collect();
        let requested: HashSet<_> = details.order.iter().copied().collect();
        if current != requested || requested.len() != details.order.len() {
            return Err(MockError::BadRequest(
                "The new order must list every image of the product once."
                    .into(),
            ));
        }
        for image in &mut product.images {
            image.position = details
                .order
                .iter()
                .position(|id| *id == image.id)
                .unwrap_or_default() as u32;
        }
        product.images.sort_by_key(|image| image.position);
        Ok("Images reordered")
    }
}

impl MockResource for SupportTicket {
    fn table(store: &Store) -> &Table<Self> {
        &store.tickets
    }

    fn table_mut(store: &mut Store) -> &mut Table<Self> {
        &mut store.tickets
    }

    fn id_from(raw: i64) -> TicketId {
        TicketId(raw)
    }

    fn matches(&self, query: &Query) -> bool {
        search_hit(query, &[&self.subject, &self.customer, &self.description])
            && eq_hit(query, "status", self.status.as_str())
            && eq_hit(query, "priority", self.priority.as_str())
    }

    fn build(
        _store: &mut Store,
        id: TicketId,
        details: TicketDetails,
    ) -> Result<Self, MockError> {
        Ok(SupportTicket {
            id,
            subject: details.subject,
            description: details.description,
            customer: details.customer,
            status: TicketStatus::Open,
            priority: details.priority,
            assignee: None,
            created_at: Timestamp::now(),
        })
    }

    fn apply(
        &mut self,
        _store: &Store,
        update: TicketUpdate,
    ) -> Result<(), MockError> {
        self.subject = update.subject;
        self.description = update.description;
        self.priority = update.priority;
        self.status = update.status;
        Ok(())
    }

    fn action(
        store: &mut Store,
        id: TicketId,
        name: &str,
        body: Value,
    ) -> Result<&'static str, MockError> {
        match name {
            "assign" => {
                let details: AssignTicket = parse_body(body)?;
                store.user(details.assignee)?;
                let ticket = find_mut::<SupportTicket>(store, id)?;
                ticket.assignee = Some(details.assignee);
                if ticket.status == TicketStatus::Open {
                    ticket.status = TicketStatus::InProgress;
                }
                Ok("Ticket assigned")
            }
            "close" => {
                find_mut::<SupportTicket>(store, id)?.status =
                    TicketStatus::Closed;
                Ok("Ticket closed")
            }
            _ => Err(MockError::NotFound("Action")),
        }
    }
}
