pub mod api_client;
pub mod config;
pub mod envelope;
pub mod listing;
pub mod requests;
pub mod responses;
mod services;
pub mod session;

pub use api_client::{APIClient, ClientError};
pub use config::ClientConfig;
pub use envelope::{Envelope, FieldErrors, ListPage};
pub use listing::{Pagination, ResourceController, ResourceList};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::{Debug, Display};
use std::hash::Hash;

macro_rules! id_type {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {$(
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize, derive_more::Display,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);
    )*};
}

id_type!(
    UserId,
    RoleId,
    PermissionId,
    PaymentMethodId,
    ReviewId,
    ProductId,
    ProductImageId,
    TicketId,
);

/// A CRUD-managed entity exposed by the backend as a REST collection.
///
/// The collection lives at `PATH` (relative to the API base, with a trailing
/// slash), single records at `{PATH}{id}/` and record actions at
/// `{PATH}{id}/{action}/`.
pub trait Resource: Clone + PartialEq + DeserializeOwned + 'static {
    type Id: Copy + Eq + Hash + Display + Debug + 'static;
    type Create: Serialize + 'static;
    type Update: Serialize + 'static;
    type Filters: Clone + PartialEq + Default + Serialize + 'static;

    const PATH: &'static str;
    /// Singular, lowercase name used in user-facing messages.
    const NAME: &'static str;

    fn id(&self) -> Self::Id;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub id: RoleId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub roles: Vec<RoleSummary>,
    pub date_joined: Timestamp,
}

impl User {
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }
}

impl Resource for User {
    type Id = UserId;
    type Create = requests::CreateUser;
    type Update = requests::UpdateUser;
    type Filters = requests::UserFilters;

    const PATH: &'static str = "users/";
    const NAME: &'static str = "user";

    fn id(&self) -> UserId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    /// Machine-readable code, e.g. `products.change`.
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub description: String,
}

impl Resource for Permission {
    type Id = PermissionId;
    type Create = requests::PermissionDetails;
    type Update = requests::PermissionDetails;
    type Filters = requests::PermissionFilters;

    const PATH: &'static str = "permissions/";
    const NAME: &'static str = "permission";

    fn id(&self) -> PermissionId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn permission_ids(&self) -> Vec<PermissionId> {
        self.permissions.iter().map(|p| p.id).collect()
    }
}

impl Resource for Role {
    type Id = RoleId;
    type Create = requests::RoleDetails;
    type Update = requests::RoleDetails;
    type Filters = requests::RoleFilters;

    const PATH: &'static str = "roles/";
    const NAME: &'static str = "role";

    fn id(&self) -> RoleId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Cash,
    Card,
    Transfer,
    Wallet,
    Other,
}

impl PaymentKind {
    pub const ALL: [PaymentKind; 5] = [
        PaymentKind::Cash,
        PaymentKind::Card,
        PaymentKind::Transfer,
        PaymentKind::Wallet,
        PaymentKind::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentKind::Cash => "Cash",
            PaymentKind::Card => "Card",
            PaymentKind::Transfer => "Bank transfer",
            PaymentKind::Wallet => "Digital wallet",
            PaymentKind::Other => "Other",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Cash => "cash",
            PaymentKind::Card => "card",
            PaymentKind::Transfer => "transfer",
            PaymentKind::Wallet => "wallet",
            PaymentKind::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub name: String,
    pub kind: PaymentKind,
    #[serde(default)]
    pub details: Option<String>,
    pub is_active: bool,
    /// The principal method is preselected at checkout. At most one method
    /// is principal at a time.
    #[serde(default)]
    pub is_principal: bool,
}

impl Resource for PaymentMethod {
    type Id = PaymentMethodId;
    type Create = requests::PaymentMethodDetails;
    type Update = requests::PaymentMethodDetails;
    type Filters = requests::PaymentMethodFilters;

    const PATH: &'static str = "payment-methods/";
    const NAME: &'static str = "payment method";

    fn id(&self) -> PaymentMethodId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub const ALL: [ReviewStatus; 3] = [
        ReviewStatus::Pending,
        ReviewStatus::Approved,
        ReviewStatus::Rejected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "Pending",
            ReviewStatus::Approved => "Approved",
            ReviewStatus::Rejected => "Rejected",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub product: ProductId,
    #[serde(default)]
    pub product_name: String,
    pub author: String,
    /// 1 to 5 stars.
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub status: ReviewStatus,
    pub created_at: Timestamp,
}

impl Resource for Review {
    type Id = ReviewId;
    type Create = requests::NewReview;
    type Update = requests::ReviewEdit;
    type Filters = requests::ReviewFilters;

    const PATH: &'static str = "reviews/";
    const NAME: &'static str = "review";

    fn id(&self) -> ReviewId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub url: String,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: Decimal,
    pub stock: i64,
    pub is_active: bool,
    /// Ordered by `position`.
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl Resource for Product {
    type Id = ProductId;
    type Create = requests::ProductDetails;
    type Update = requests::ProductDetails;
    type Filters = requests::ProductFilters;

    const PATH: &'static str = "products/";
    const NAME: &'static str = "product";

    fn id(&self) -> ProductId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Medium,
        TicketPriority::High,
        TicketPriority::Urgent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Medium => "Medium",
            TicketPriority::High => "High",
            TicketPriority::Urgent => "Urgent",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
            TicketPriority::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: TicketId,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    pub customer: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    #[serde(default)]
    pub assignee: Option<UserId>,
    pub created_at: Timestamp,
}

impl Resource for SupportTicket {
    type Id = TicketId;
    type Create = requests::TicketDetails;
    type Update = requests::TicketUpdate;
    type Filters = requests::TicketFilters;

    const PATH: &'static str = "tickets/";
    const NAME: &'static str = "ticket";

    fn id(&self) -> TicketId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Sales,
    Purchases,
    Inventory,
    Payments,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Sales,
        ReportKind::Purchases,
        ReportKind::Inventory,
        ReportKind::Payments,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Sales => "Sales",
            ReportKind::Purchases => "Purchases",
            ReportKind::Inventory => "Inventory",
            ReportKind::Payments => "Payments by method",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Sales => "sales",
            ReportKind::Purchases => "purchases",
            ReportKind::Inventory => "inventory",
            ReportKind::Payments => "payments",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}
