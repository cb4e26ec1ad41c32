use jiff::civil::date;
use payloads::requests::{
    ChangePassword, LoginCredentials, PaymentMethodDetails,
    PaymentMethodFilters, ProductDetails, ProductFilters, ReportQuery,
    RoleDetails, SetPermissions, TicketDetails, UserFilters,
};
use payloads::{
    ClientError, PaymentKind, PaymentMethod, Permission, Product, ReportKind, Review, ReviewStatus, Role, SupportTicket,
    TicketPriority, TicketStatus, User,
};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use test_helpers::mock::{clerk_details, permission_details, product_details};
use test_helpers::{ListShape, assert_status_code, spawn_app};

#[tokio::test]
async fn every_list_shape_yields_the_same_items() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let created = app.create_products(4).await?;
    let filters = ProductFilters::default();

    for shape in [
        ListShape::Bare,
        ListShape::Results,
        ListShape::NestedResults,
        ListShape::Data,
        ListShape::Enveloped,
    ] {
        app.backend.set_list_shape(shape);
        let page = app.client.list::<Product>(&filters, 1, 20).await?;
        assert_eq!(page.items, created, "{shape:?}");
    }

    Ok(())
}

#[tokio::test]
async fn list_pagination_counts() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_products(5).await?;

    let page = app
        .client
        .list::<Product>(&ProductFilters::default(), 3, 2)
        .await?;
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, Some(5));
    assert_eq!(page.total_pages, Some(3));

    Ok(())
}

#[tokio::test]
async fn product_lifecycle() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let details = product_details("JAM-STR", "Strawberry jam", Decimal::new(499, 2));
    let product = app.client.create::<Product>(&details).await?;
    assert_eq!(product.sku, "JAM-STR");
    assert!(product.is_active);

    let fetched = app.client.get::<Product>(product.id).await?;
    assert_eq!(fetched, product);

    let updated = app
        .client
        .update::<Product>(
            product.id,
            &ProductDetails {
                stock: 3,
                ..details
            },
        )
        .await?;
    assert_eq!(updated.stock, 3);

    app.client.set_product_active(product.id, false).await?;
    assert!(!app.client.get::<Product>(product.id).await?.is_active);

    app.client.delete::<Product>(product.id).await?;
    assert_status_code(
        app.client.get::<Product>(product.id).await,
        StatusCode::NOT_FOUND,
    );
    assert_status_code(
        app.client.delete::<Product>(product.id).await,
        StatusCode::NOT_FOUND,
    );

    Ok(())
}

#[tokio::test]
async fn validation_errors_map_to_fields() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_products(1).await?;

    let duplicate = product_details("SKU-000", "Copy", Decimal::ONE);
    let result = app.client.create::<Product>(&duplicate).await;
    let Err(ClientError::Validation { message, errors }) = result else {
        panic!("expected a validation error, got {result:?}");
    };
    assert_eq!(message, "Validation failed.");
    assert_eq!(errors["sku"], vec!["This SKU is already in use."]);

    let mut user = clerk_details("x");
    user.email = "not-an-email".into();
    let result = app.client.create::<User>(&user).await;
    let errors = result.as_ref().err().and_then(ClientError::field_errors);
    let errors = errors.expect("field errors");
    assert!(errors.contains_key("username"));
    assert!(errors.contains_key("email"));

    Ok(())
}

#[tokio::test]
async fn filters_are_sent_as_query_parameters() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let casey = app.client.create::<User>(&clerk_details("casey")).await?;
    let morgan = app.client.create::<User>(&clerk_details("morgan")).await?;
    assert_eq!(casey.first_name, "Casey");
    assert_eq!(morgan.first_name, "Morgan");
    app.client.deactivate_user(morgan.id).await?;

    let inactive = app
        .client
        .list::<User>(
            &UserFilters {
                is_active: Some(false),
                ..Default::default()
            },
            1,
            20,
        )
        .await?;
    assert_eq!(inactive.items, vec![app.client.get::<User>(morgan.id).await?]);

    let search = app
        .client
        .list::<User>(
            &UserFilters {
                search: Some("CASEY".into()),
                ..Default::default()
            },
            1,
            20,
        )
        .await?;
    assert_eq!(search.items, vec![casey]);

    Ok(())
}

#[tokio::test]
async fn user_actions() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let user = app.client.create::<User>(&clerk_details("sam")).await?;

    app.client.deactivate_user(user.id).await?;
    assert!(!app.client.get::<User>(user.id).await?.is_active);
    app.client.activate_user(user.id).await?;
    assert!(app.client.get::<User>(user.id).await?.is_active);

    let weak = ChangePassword {
        password: "short".into(),
    };
    assert_status_code(
        app.client.change_password(user.id, &weak).await,
        StatusCode::BAD_REQUEST,
    );

    let strong = ChangePassword {
        password: "Another-pass-99".into(),
    };
    app.client.change_password(user.id, &strong).await?;
    let other = app.new_client();
    let profile = other
        .login(&LoginCredentials {
            username: "sam".into(),
            password: "Another-pass-99".into(),
        })
        .await?;
    assert_eq!(profile.id, user.id);

    Ok(())
}

#[tokio::test]
async fn role_permissions_and_deletion() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let view = app
        .client
        .create::<Permission>(&permission_details("sales.view", "View sales"))
        .await?;
    let refund = app
        .client
        .create::<Permission>(&permission_details("sales.refund", "Refund"))
        .await?;
    let role = app
        .client
        .create::<Role>(&RoleDetails {
            name: "Cashier".into(),
            description: String::new(),
            permissions: vec![view.id],
        })
        .await?;
    assert_eq!(role.permission_ids(), vec![view.id]);

    app.client
        .set_role_permissions(
            role.id,
            &SetPermissions {
                permissions: vec![view.id, refund.id],
            },
        )
        .await?;
    let role = app.client.get::<Role>(role.id).await?;
    assert_eq!(role.permission_ids(), vec![view.id, refund.id]);

    app.client.deactivate_role(role.id).await?;
    assert!(!app.client.get::<Role>(role.id).await?.is_active);
    app.client.activate_role(role.id).await?;

    let mut details = clerk_details("pat");
    details.roles = vec![role.id];
    let user = app.client.create::<User>(&details).await?;
    let pat = app.new_client();
    let profile = pat
        .login(&LoginCredentials {
            username: "pat".into(),
            password: details.password.clone(),
        })
        .await?;
    assert!(profile.has_permission("sales.refund"));

    assert_status_code(
        app.client.delete::<Role>(role.id).await,
        StatusCode::CONFLICT,
    );
    app.client.delete::<User>(user.id).await?;
    app.client.delete::<Role>(role.id).await?;

    Ok(())
}

#[tokio::test]
async fn principal_payment_method_is_unique() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let mut ids = Vec::new();
    for (name, kind) in [("Cash", PaymentKind::Cash), ("Card", PaymentKind::Card)]
    {
        let method = app
            .client
            .create::<PaymentMethod>(&PaymentMethodDetails {
                name: name.into(),
                kind,
                details: None,
            })
            .await?;
        ids.push(method.id);
    }

    app.client.mark_principal_payment_method(ids[1]).await?;
    let methods = app
        .client
        .list::<PaymentMethod>(&PaymentMethodFilters::default(), 1, 20)
        .await?
        .items;
    let principal: Vec<_> = methods
        .iter()
        .filter(|m| m.is_principal)
        .map(|m| m.id)
        .collect();
    assert_eq!(principal, vec![ids[1]]);

    app.client.deactivate_payment_method(ids[0]).await?;
    assert_status_code(
        app.client.mark_principal_payment_method(ids[0]).await,
        StatusCode::BAD_REQUEST,
    );
    app.client.activate_payment_method(ids[0]).await?;
    app.client.mark_principal_payment_method(ids[0]).await?;
    assert!(app.client.get::<PaymentMethod>(ids[0]).await?.is_principal);

    Ok(())
}

#[tokio::test]
async fn review_moderation() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let product = app.create_products(1).await?.remove(0);

    let review = app
        .client
        .create::<Review>(&payloads::requests::NewReview {
            product: product.id,
            rating: 4,
            comment: "Good".into(),
        })
        .await?;
    assert_eq!(review.status, ReviewStatus::Pending);
    assert_eq!(review.product_name, product.name);

    app.client.approve_review(review.id).await?;
    assert_eq!(
        app.client.get::<Review>(review.id).await?.status,
        ReviewStatus::Approved
    );
    app.client.reject_review(review.id).await?;
    assert_eq!(
        app.client.get::<Review>(review.id).await?.status,
        ReviewStatus::Rejected
    );

    Ok(())
}

#[tokio::test]
async fn product_images_can_be_reordered() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let product = app.create_products(1).await?.remove(0);
    let mut order = app.add_product_images(product.id, 3);

    order.reverse();
    app.client
        .reorder_product_images(product.id, order.clone())
        .await?;
    let images = app.client.get::<Product>(product.id).await?.images;
    let ids: Vec<_> = images.iter().map(|i| i.id).collect();
    assert_eq!(ids, order);

    // A partial order is refused.
    assert_status_code(
        app.client
            .reorder_product_images(product.id, order[..2].to_vec())
            .await,
        StatusCode::BAD_REQUEST,
    );

    Ok(())
}

#[tokio::test]
async fn ticket_assignment_and_closing() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let admin = app.login_admin().await?;

    let ticket = app
        .client
        .create::<SupportTicket>(&TicketDetails {
            subject: "Missing receipt".into(),
            description: String::new(),
            customer: "j.doe".into(),
            priority: TicketPriority::Medium,
        })
        .await?;
    assert_eq!(ticket.status, TicketStatus::Open);

    app.client.assign_ticket(ticket.id, admin.id).await?;
    let ticket = app.client.get::<SupportTicket>(ticket.id).await?;
    assert_eq!(ticket.assignee, Some(admin.id));
    assert_eq!(ticket.status, TicketStatus::InProgress);

    app.client.close_ticket(ticket.id).await?;
    assert_eq!(
        app.client.get::<SupportTicket>(ticket.id).await?.status,
        TicketStatus::Closed
    );

    assert_status_code(
        app.client.assign_ticket(ticket.id, payloads::UserId(999)).await,
        StatusCode::NOT_FOUND,
    );

    Ok(())
}

#[tokio::test]
async fn reports() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_products(2).await?;

    let sales = app
        .client
        .fetch_report(&ReportQuery {
            kind: ReportKind::Sales,
            from: Some(date(2025, 3, 1)),
            to: Some(date(2025, 3, 10)),
        })
        .await?;
    assert_eq!(sales.kind, ReportKind::Sales);
    assert_eq!(sales.rows.len(), 10);
    assert_eq!(sales.chart.len(), 10);
    assert_eq!(sales.rows[0]["date"], "2025-03-01");

    let inventory = app
        .client
        .fetch_report(&ReportQuery {
            kind: ReportKind::Inventory,
            from: None,
            to: None,
        })
        .await?;
    assert_eq!(inventory.rows.len(), 2);
    assert!(inventory.columns.iter().any(|c| c.key == "sku"));

    let backwards = app
        .client
        .fetch_report(&ReportQuery {
            kind: ReportKind::Sales,
            from: Some(date(2025, 3, 10)),
            to: Some(date(2025, 3, 1)),
        })
        .await;
    let errors = backwards.as_ref().err().and_then(ClientError::field_errors);
    assert!(errors.is_some_and(|e| e.contains_key("to")));

    Ok(())
}
