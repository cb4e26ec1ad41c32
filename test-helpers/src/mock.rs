//! Realistic retail data for the dev-server and integration tests.
//!
//! Only the admin account is written into the store directly; everything
//! else goes through the public API so the dataset exercises the same paths
//! the UI does.

use crate::TestApp;
use anyhow::Result;
use jiff::Timestamp;
use payloads::requests::{
    CreateUser, NewReview, PaymentMethodDetails, PermissionDetails,
    ProductDetails, RoleDetails, TicketDetails,
};
use payloads::{
    PaymentKind, PaymentMethod, Permission, Product, ProductId, ProductImage,
    ProductImageId, Review, Role, SupportTicket, TicketPriority, User, UserId,
};
use rust_decimal::Decimal;

use crate::store::Store;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "Admin-pass-2024";

/// Insert the staff account every other record is created by.
pub fn seed_admin(store: &mut Store) -> UserId {
    let admin = store.users.insert_with(|id| User {
        id: UserId(id),
        username: ADMIN_USERNAME.into(),
        email: "admin@shop.example".into(),
        first_name: "Ada".into(),
        last_name: "Admin".into(),
        phone: None,
        is_active: true,
        roles: Vec::new(),
        date_joined: Timestamp::UNIX_EPOCH,
    });
    let id = admin.id;
    store.set_password(ADMIN_USERNAME, ADMIN_PASSWORD, id);
    store.set_staff(id);
    id
}

/// Attach `count` placeholder images to a product, in position order.
pub fn seed_product_images(
    store: &mut Store,
    product: ProductId,
    count: u32,
) -> Vec<ProductImageId> {
    let first = store
        .products
        .rows
        .iter()
        .flat_map(|p| p.images.iter().map(|i| i.id.0))
        .max()
        .unwrap_or(0)
        + 1;
    let Some(product) = store.products.rows.iter_mut().find(|p| p.id == product)
    else {
        return Vec::new();
    };
    let start = product.images.len() as u32;
    for n in 0..count {
        let id = ProductImageId(first + i64::from(n));
        product.images.push(ProductImage {
            id,
            url: format!("/static/products/{}/{}.jpg", product.sku, id),
            position: start + n,
        });
    }
    product.images.iter().map(|i| i.id).collect()
}

pub fn permission_details(code: &str, name: &str) -> PermissionDetails {
    PermissionDetails {
        code: code.into(),
        name: name.into(),
        module: code.split('.').next().unwrap_or_default().into(),
        description: String::new(),
    }
}

pub fn product_details(sku: &str, name: &str, price: Decimal) -> ProductDetails {
    ProductDetails {
        sku: sku.into(),
        name: name.into(),
        description: format!("{name} from the seasonal catalogue"),
        category: "grocery".into(),
        price,
        stock: 25,
    }
}

/// Each clerk's first name is the capitalized username, so searches for one
/// clerk never match another.
pub fn clerk_details(username: &str) -> CreateUser {
    let mut chars = username.chars();
    let first_name = chars
        .next()
        .map(|c| c.to_uppercase().chain(chars).collect())
        .unwrap_or_default();
    CreateUser {
        username: username.into(),
        email: format!("{username}@shop.example"),
        first_name,
        last_name: "Clerk".into(),
        phone: Some("+34 600 123 456".into()),
        password: "Clerk-pass-2024".into(),
        roles: Vec::new(),
    }
}

/// Development dataset covering every admin page.
pub struct DevDataset {
    pub permissions: Vec<Permission>,
    pub roles: Vec<Role>,
    pub users: Vec<User>,
    pub payment_methods: Vec<PaymentMethod>,
    pub products: Vec<Product>,
    pub reviews: Vec<Review>,
    pub tickets: Vec<SupportTicket>,
}

impl DevDataset {
    pub async fn create(app: &TestApp) -> Result<Self> {
        let client = &app.client;
        app.login_admin().await?;

        tracing::info!("🔐 Creating permissions and roles");
        let mut permissions = Vec::new();
        for (code, name) in [
            ("products.view", "View products"),
            ("products.change", "Edit products"),
            ("sales.view", "View sales"),
            ("sales.refund", "Issue refunds"),
            ("users.change", "Manage users"),
            ("reports.export", "Export reports"),
        ] {
            permissions.push(
                client
                    .create::<Permission>(&permission_details(code, name))
                    .await?,
            );
        }
        let cashier = client
            .create::<Role>(&RoleDetails {
                name: "Cashier".into(),
                description: "Front counter staff".into(),
                permissions: vec![permissions[0].id, permissions[2].id],
            })
            .await?;
        let manager = client
            .create::<Role>(&RoleDetails {
                name: "Store manager".into(),
                description: "Runs a single store".into(),
                permissions: permissions.iter().map(|p| p.id).collect(),
            })
            .await?;

        tracing::info!("👤 Creating staff accounts");
        let mut users = Vec::new();
        for (username, role) in [("casey", cashier.id), ("morgan", manager.id)] {
            let mut details = clerk_details(username);
            details.roles = vec![role];
            users.push(client.create::<User>(&details).await?);
        }
        let mut inactive = clerk_details("jordan");
        inactive.roles = vec![cashier.id];
        let inactive = client.create::<User>(&inactive).await?;
        client.deactivate_user(inactive.id).await?;
        users.push(client.get::<User>(inactive.id).await?);

        tracing::info!("💳 Creating payment methods");
        let mut payment_methods = Vec::new();
        for (name, kind) in [
            ("Cash", PaymentKind::Cash),
            ("Visa / Mastercard", PaymentKind::Card),
            ("Bank transfer", PaymentKind::Transfer),
            ("Bizum", PaymentKind::Wallet),
        ] {
            payment_methods.push(
                client
                    .create::<PaymentMethod>(&PaymentMethodDetails {
                        name: name.into(),
                        kind,
                        details: None,
                    })
                    .await?,
            );
        }
        client
            .mark_principal_payment_method(payment_methods[1].id)
            .await?;

        tracing::info!("📦 Creating products");
        let mut products = Vec::new();
        for (n, (sku, name, cents)) in [
            ("OLV-500", "Olive oil 500ml", 899),
            ("HNY-250", "Wildflower honey", 650),
            ("TEA-GRN", "Green tea, 20 bags", 375),
            ("CHS-MAN", "Manchego cheese", 1420),
            ("BRD-SRD", "Sourdough loaf", 420),
        ]
        .into_iter()
        .enumerate()
        {
            let product = client
                .create::<Product>(&product_details(
                    sku,
                    name,
                    Decimal::new(cents, 2),
                ))
                .await?;
            app.backend.with_store(|store| {
                seed_product_images(store, product.id, (n % 3) as u32 + 1)
            });
            products.push(client.get::<Product>(product.id).await?);
        }
        client.set_product_active(products[4].id, false).await?;

        tracing::info!("⭐ Creating reviews");
        let mut reviews = Vec::new();
        for (product, rating, comment) in [
            (products[0].id, 5, "Fruity and fresh."),
            (products[1].id, 4, "Lovely, a bit pricey."),
            (products[3].id, 2, "Arrived cracked."),
        ] {
            reviews.push(
                client
                    .create::<Review>(&NewReview {
                        product,
                        rating,
                        comment: comment.into(),
                    })
                    .await?,
            );
        }
        client.approve_review(reviews[0].id).await?;
        client.reject_review(reviews[2].id).await?;

        tracing::info!("🎫 Creating support tickets");
        let mut tickets = Vec::new();
        for (subject, customer, priority) in [
            ("Refund for damaged cheese", "l.garcia", TicketPriority::High),
            ("Invoice copy", "pmartin", TicketPriority::Low),
            ("Card declined twice", "anna.k", TicketPriority::Urgent),
        ] {
            tickets.push(
                client
                    .create::<SupportTicket>(&TicketDetails {
                        subject: subject.into(),
                        description: String::new(),
                        customer: customer.into(),
                        priority,
                    })
                    .await?,
            );
        }
        client.assign_ticket(tickets[0].id, users[1].id).await?;
        client.close_ticket(tickets[1].id).await?;

        Ok(Self {
            permissions,
            roles: vec![cashier, manager],
            users,
            payment_methods,
            products,
            reviews,
            tickets,
        })
    }

    pub fn print_summary(&self) {
        tracing::info!("📋 Available test data:");
        tracing::info!("   🔑 Sign in as {ADMIN_USERNAME} / {ADMIN_PASSWORD}");
        tracing::info!("   👤 {} staff accounts", self.users.len());
        for user in &self.users {
            tracing::info!(
                "      ├─ {} ({}){}",
                user.username,
                user.id,
                if user.is_active { "" } else { " [inactive]" }
            );
        }
        tracing::info!(
            "   🔐 {} roles, {} permissions",
            self.roles.len(),
            self.permissions.len()
        );
        tracing::info!("   💳 {} payment methods", self.payment_methods.len());
        tracing::info!("   📦 {} products", self.products.len());
        tracing::info!("   ⭐ {} reviews", self.reviews.len());
        tracing::info!("   🎫 {} support tickets", self.tickets.len());
    }
}
