use payloads::requests::ProductFilters;
use payloads::{Product, ResourceController, ResourceList};
use rust_decimal::Decimal;
use std::cell::{Cell, RefCell};
use std::pin::pin;
use std::rc::Rc;
use std::time::Duration;
use test_helpers::mock::product_details;
use test_helpers::{TestApp, spawn_app};

fn controller(app: &TestApp, page_size: u32) -> ResourceController<Product> {
    let state = Rc::new(RefCell::new(ResourceList::new(
        ProductFilters::default(),
        page_size,
    )));
    ResourceController::new(state, app.client.clone(), || {})
}

#[tokio::test]
async fn load_fills_items_and_pagination() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_products(25).await?;

    let notified = Rc::new(Cell::new(0));
    let state = Rc::new(RefCell::new(ResourceList::<Product>::new(
        ProductFilters::default(),
        10,
    )));
    let products = ResourceController::new(state, app.client.clone(), {
        let notified = notified.clone();
        move || notified.set(notified.get() + 1)
    });

    products.load().await;

    let state = products.snapshot();
    assert_eq!(state.items.len(), 10);
    assert_eq!(state.pagination.total, 25);
    assert_eq!(state.pagination.total_pages, 3);
    assert!(!state.loading());
    assert_eq!(state.error, None);
    // once when the load started, once when it finished
    assert_eq!(notified.get(), 2);

    Ok(())
}

#[tokio::test]
async fn set_filters_returns_to_first_page_before_reloading() -> anyhow::Result<()>
{
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_products(25).await?;
    let products = controller(&app, 10);
    products.load().await;

    products.set_page(3).await;
    assert_eq!(products.state().pagination.page, 3);
    assert_eq!(products.state().items.len(), 5);

    app.backend.delay_next_list(Duration::from_millis(50));
    let mut reload = pin!(products.set_filters(ProductFilters {
        search: Some("Product 1".into()),
        ..Default::default()
    }));
    assert!(futures::poll!(reload.as_mut()).is_pending());
    {
        let state = products.state();
        assert_eq!(state.pagination.page, 1);
        assert!(state.loading());
        // Still the previous page while the request is in flight.
        assert_eq!(state.items.len(), 5);
    }
    reload.await;

    let state = products.snapshot();
    assert_eq!(state.pagination.page, 1);
    // "Product 1" and "Product 10" through "Product 19"
    assert_eq!(state.pagination.total, 11);
    assert!(state.items.iter().all(|p| p.name.starts_with("Product 1")));

    Ok(())
}

#[tokio::test]
async fn page_navigation_is_clamped() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_products(15).await?;
    let products = controller(&app, 10);
    products.load().await;

    products.previous_page().await;
    assert_eq!(products.state().pagination.page, 1);
    products.next_page().await;
    assert_eq!(products.state().pagination.page, 2);
    products.next_page().await;
    assert_eq!(products.state().pagination.page, 2);
    products.set_page(40).await;
    assert_eq!(products.state().pagination.page, 2);

    // One initial load plus the single page change that moved anything.
    assert_eq!(app.backend.requests_matching("GET /api/products/"), 2);

    Ok(())
}

#[tokio::test]
async fn failed_load_keeps_previous_items() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_products(3).await?;
    let products = controller(&app, 10);
    products.load().await;
    let before = products.snapshot().items;

    app.backend.fail_next_lists(1);
    products.load().await;
    {
        let state = products.state();
        assert_eq!(state.error.as_deref(), Some("Service temporarily unavailable."));
        assert_eq!(state.items, before);
        assert!(!state.loading());
    }

    app.client
        .create::<Product>(&product_details("NEW-1", "New", Decimal::ONE))
        .await?;
    products.load().await;
    let state = products.snapshot();
    assert_eq!(state.error, None);
    assert_eq!(state.items.len(), 4);

    Ok(())
}

#[tokio::test]
async fn superseded_load_does_not_overwrite_newer_results() -> anyhow::Result<()>
{
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_products(12).await?;
    let products = controller(&app, 20);

    app.backend.delay_next_list(Duration::from_millis(200));
    let slow = products.load();
    let fast = async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        products
            .set_filters(ProductFilters {
                search: Some("Product 11".into()),
                ..Default::default()
            })
            .await;
    };
    futures::join!(slow, fast);

    let state = products.snapshot();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].name, "Product 11");
    assert!(!state.loading());

    Ok(())
}

#[tokio::test]
async fn removing_twice_is_harmless() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let created = app.create_products(3).await?;
    let products = controller(&app, 10);
    products.load().await;
    let id = created[1].id;

    assert!(products.remove(id).await);
    assert!(!products.state().contains(id));
    assert_eq!(products.state().items.len(), 2);

    // Already removed here: no request at all.
    assert!(products.remove(id).await);
    assert_eq!(app.backend.requests_matching("DELETE /api/products/"), 1);

    // A second view that never saw the removal gets a 404, which counts as
    // success.
    let other = controller(&app, 10);
    assert!(other.remove(id).await);
    assert_eq!(other.state().error, None);
    assert_eq!(app.backend.requests_matching("DELETE /api/products/"), 2);

    Ok(())
}

#[tokio::test]
async fn writes_reload_and_report_failures() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let products = controller(&app, 10);
    products.load().await;

    let details = product_details("TEA-001", "Black tea", Decimal::new(250, 2));
    assert!(products.create(details.clone()).await);
    let created = products.state().items[0].clone();
    assert_eq!(created.sku, "TEA-001");

    // Duplicate SKU is rejected with a field error and no reload.
    let lists_before = app.backend.requests_matching("GET /api/products/");
    assert!(!products.create(details.clone()).await);
    {
        let state = products.state();
        assert_eq!(state.field_errors["sku"], vec!["This SKU is already in use."]);
        assert!(state.error.is_some());
        assert_eq!(state.items.len(), 1);
    }
    assert_eq!(
        app.backend.requests_matching("GET /api/products/"),
        lists_before
    );

    let mut renamed = details;
    renamed.name = "Breakfast tea".into();
    assert!(products.update(created.id, renamed).await);
    let state = products.snapshot();
    assert_eq!(state.items[0].name, "Breakfast tea");
    assert_eq!(state.error, None);
    assert!(state.field_errors.is_empty());

    let toggled = products
        .perform(|client| async move {
            client.set_product_active(created.id, false).await
        })
        .await;
    assert!(toggled);
    assert!(!products.state().items[0].is_active);

    Ok(())
}

#[tokio::test]
async fn timed_out_load_keeps_previous_items() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_products(3).await?;
    let state = Rc::new(RefCell::new(ResourceList::new(
        ProductFilters::default(),
        10,
    )));
    let client = app.client.clone().with_timeout(Duration::from_millis(200));
    let products = ResourceController::<Product>::new(state, client, || {});
    products.load().await;
    let before = products.snapshot().items;
    assert_eq!(before.len(), 3);

    app.backend.delay_next_list(Duration::from_secs(2));
    products.load().await;

    let state = products.snapshot();
    assert_eq!(
        state.load_error(),
        Some("The server took too long to respond.")
    );
    assert!(!state.loading());
    assert_eq!(state.items, before);

    Ok(())
}

#[tokio::test]
async fn deleting_last_row_of_last_page_moves_back_a_page() -> anyhow::Result<()>
{
    let app = spawn_app().await;
    app.login_admin().await?;
    let created = app.create_products(11).await?;
    let products = controller(&app, 10);
    products.load().await;
    products.set_page(2).await;
    assert_eq!(products.state().items.len(), 1);
    let last = products.state().items[0].id;
    assert_eq!(last, created[10].id);

    assert!(products.remove(last).await);

    let state = products.snapshot();
    assert_eq!(state.pagination.page, 1);
    assert_eq!(state.pagination.total_pages, 1);
    assert_eq!(state.pagination.total, 10);
    assert_eq!(state.items.len(), 10);

    Ok(())
}
