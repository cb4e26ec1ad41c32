pub mod mock;
mod reports;
mod resources;
mod server;
pub mod store;
pub mod telemetry;

pub use server::{ListShape, MockBackend, MockError, build};

use payloads::requests::LoginCredentials;
use payloads::responses::UserProfile;
use payloads::{APIClient, ClientError, Product, ProductId, ProductImageId};
use reqwest::StatusCode;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    /// API root the client talks to, e.g. `http://127.0.0.1:4312/api`.
    pub address: String,
    pub client: APIClient,
    pub backend: MockBackend,
}

impl TestApp {
    /// A client with its own cookie jar and refresh gate.
    pub fn new_client(&self) -> APIClient {
        APIClient::new(self.address.clone(), cookie_client())
    }

    pub async fn login_admin(&self) -> anyhow::Result<UserProfile> {
        Ok(self.client.login(&admin_credentials()).await?)
    }

    pub async fn create_products(
        &self,
        count: usize,
    ) -> anyhow::Result<Vec<Product>> {
        let mut products = Vec::with_capacity(count);
        for n in 0..count {
            let details = mock::product_details(
                &format!("SKU-{n:03}"),
                &format!("Product {n}"),
                rust_decimal::Decimal::new(100 + n as i64, 2),
            );
            products.push(self.client.create::<Product>(&details).await?);
        }
        Ok(products)
    }

    pub fn add_product_images(
        &self,
        product: ProductId,
        count: u32,
    ) -> Vec<ProductImageId> {
        self.backend
            .with_store(|store| mock::seed_product_images(store, product, count))
    }
}

fn cookie_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .build()
        .unwrap()
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    let backend = MockBackend::new();
    backend.with_store(mock::seed_admin);

    let (server, port) = build(backend.clone(), "127.0.0.1", port).unwrap();
    tokio::spawn(server);

    let address = format!("http://127.0.0.1:{port}/api");
    TestApp {
        port,
        client: APIClient::new(address.clone(), cookie_client()),
        address,
        backend,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(e) => assert_eq!(e.status(), Some(expected), "{e:?}"),
        Ok(_) => panic!("Expected an API error"),
    };
}

pub fn admin_credentials() -> LoginCredentials {
    LoginCredentials {
        username: mock::ADMIN_USERNAME.into(),
        password: mock::ADMIN_PASSWORD.into(),
    }
}
