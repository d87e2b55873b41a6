mod common;

use kantin_foodcourt::{
    dto::{
        auth::RegisterRequest,
        cart::AddToCartRequest,
        dashboard::DashboardView,
        menus::{CreateMenuRequest, UpdateMenuRequest},
    },
    error::AppError,
    models::Role,
    services::{auth_service, cart_service, dashboard_service, menu_service, order_service},
};

use common::{database_url, menu_named, seeded_state, session_for};

// Stall owners see their own sales only; admins see everything.
#[tokio::test]
async fn dashboards_and_menu_management_flow() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let state = seeded_state(&url).await?;

    let admin = session_for(&state, "admin").await?;
    let kantin1 = session_for(&state, "kantin1").await?;
    let kantin2 = session_for(&state, "kantin2").await?;

    auth_service::register_user(
        &state,
        RegisterRequest {
            username: "sari".into(),
            email: "sari@example.com".into(),
            password: "rahasia".into(),
            role: None,
        },
    )
    .await?;
    let sari = session_for(&state, "sari").await?;

    let nasi = menu_named(&state, "Nasi Goreng Spesial").await?;
    let mie = menu_named(&state, "Mie Ayam Bakso").await?;
    let es = menu_named(&state, "Es Jeruk").await?;

    // One order spanning both stalls.
    cart_service::add_to_cart(&state, &sari, nasi.id, AddToCartRequest { quantity: 2 }).await?;
    cart_service::add_to_cart(&state, &sari, mie.id, AddToCartRequest { quantity: 1 }).await?;
    cart_service::add_to_cart(&state, &sari, es.id, AddToCartRequest { quantity: 1 }).await?;
    order_service::checkout(&state, &sari).await?;

    let enak = match dashboard_service::dashboard(&state, &kantin1).await?.data.unwrap() {
        DashboardView::Kantin(view) => view,
        DashboardView::Admin(_) => panic!("kantin1 got the admin dashboard"),
    };
    assert_eq!(enak.kantin.name, "Kantin Enak");
    assert_eq!(enak.revenue, 58_000);
    assert_eq!(enak.items_sold, 3);
    assert_eq!(enak.order_items.len(), 2);
    assert_eq!(enak.new_orders_count, 1);

    let gaul = match dashboard_service::dashboard(&state, &kantin2).await?.data.unwrap() {
        DashboardView::Kantin(view) => view,
        DashboardView::Admin(_) => panic!("kantin2 got the admin dashboard"),
    };
    assert_eq!(gaul.revenue, 8_000);
    assert_eq!(gaul.items_sold, 1);

    let overview = match dashboard_service::dashboard(&state, &admin).await?.data.unwrap() {
        DashboardView::Admin(view) => view,
        DashboardView::Kantin(_) => panic!("admin got a stall dashboard"),
    };
    assert_eq!(overview.total_revenue, 66_000);
    assert_eq!(overview.orders.len(), 1);
    assert_eq!(overview.kantins.len(), 2);

    let customer = dashboard_service::dashboard(&state, &sari).await;
    assert!(matches!(customer, Err(AppError::Forbidden(_))));

    // A kantin account without a stall is turned away.
    auth_service::register_user(
        &state,
        RegisterRequest {
            username: "kantin3".into(),
            email: "kantin3@example.com".into(),
            password: "rahasia".into(),
            role: Some(Role::Kantin),
        },
    )
    .await?;
    let kantin3 = session_for(&state, "kantin3").await?;
    let orphan = dashboard_service::dashboard(&state, &kantin3).await;
    assert!(matches!(orphan, Err(AppError::NoStall)));

    // Menu management stays inside the owner's stall.
    let foreign = menu_service::update_menu(
        &state,
        &kantin1,
        es.id,
        UpdateMenuRequest {
            name: "Es Jeruk Besar".into(),
            description: None,
            price: 10_000,
            stock: 30,
            image_url: None,
        },
    )
    .await;
    assert!(matches!(foreign, Err(AppError::Forbidden(_))));

    let created = menu_service::create_menu(
        &state,
        &kantin1,
        CreateMenuRequest {
            name: "Soto Ayam".into(),
            description: Some("Kuah bening".into()),
            price: 15_000,
            stock: 12,
            image_url: None,
            kantin_id: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(created.kantin_id, enak.kantin.id);
    assert_eq!(created.image_url, "images/placeholder.jpg");

    let managed = menu_service::list_managed_menus(&state, &kantin1).await?.data.unwrap();
    assert_eq!(managed.items.len(), 3);

    let missing_stall = menu_service::create_menu(
        &state,
        &admin,
        CreateMenuRequest {
            name: "Teh Manis".into(),
            description: None,
            price: 5_000,
            stock: 40,
            image_url: None,
            kantin_id: None,
        },
    )
    .await;
    assert!(matches!(missing_stall, Err(AppError::BadRequest(_))));

    menu_service::delete_menu(&state, &kantin1, created.id).await?;
    let managed = menu_service::list_managed_menus(&state, &kantin1).await?.data.unwrap();
    assert_eq!(managed.items.len(), 2);

    Ok(())
}
