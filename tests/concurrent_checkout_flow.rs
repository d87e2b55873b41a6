mod common;

use kantin_foodcourt::{
    dto::{auth::RegisterRequest, cart::AddToCartRequest, ratings::RateMenuRequest},
    error::AppError,
    middleware::auth::AuthUser,
    services::{auth_service, cart_service, order_service, rating_service},
    state::AppState,
};

use common::{database_url, menu_named, seeded_state, session_for};

async fn customer(state: &AppState, username: &str) -> anyhow::Result<AuthUser> {
    auth_service::register_user(
        state,
        RegisterRequest {
            username: username.into(),
            email: format!("{username}@example.com"),
            password: "rahasia".into(),
            role: None,
        },
    )
    .await?;
    session_for(state, username).await
}

async fn order_count(state: &AppState) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&state.pool)
        .await?;
    Ok(count)
}

fn is_insufficient_stock(result: &Result<impl Sized, AppError>) -> bool {
    matches!(result, Err(AppError::BadRequest(m)) if m.contains("insufficient stock"))
}

fn is_empty_cart(result: &Result<impl Sized, AppError>) -> bool {
    matches!(result, Err(AppError::BadRequest(m)) if m.contains("cart is empty"))
}

// Racing checkouts and ratings against a real database. Kept in one test so
// the shared tables are only truncated once per run.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_checkouts_and_ratings_stay_consistent() -> anyhow::Result<()> {
    let Some(url) = database_url() else {
        return Ok(());
    };
    let state = seeded_state(&url).await?;
    let nasi = menu_named(&state, "Nasi Goreng Spesial").await?;
    assert_eq!(nasi.stock, 15);

    // Two customers each want 10 of the 15 plates.
    let ani = customer(&state, "ani").await?;
    let eko = customer(&state, "eko").await?;
    for user in [&ani, &eko] {
        cart_service::add_to_cart(&state, user, nasi.id, AddToCartRequest { quantity: 10 })
            .await?;
    }

    let (first, second) = tokio::join!(
        order_service::checkout(&state, &ani),
        order_service::checkout(&state, &eko)
    );
    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(results.iter().filter(|&r| is_insufficient_stock(r)).count(), 1);
    assert_eq!(menu_named(&state, "Nasi Goreng Spesial").await?.stock, 5);
    assert_eq!(order_count(&state).await?, 1);

    // The loser keeps their cart; the winner's is empty.
    let carts = [
        state.sessions.cart(ani.session_id).await?,
        state.sessions.cart(eko.session_id).await?,
    ];
    assert_eq!(carts.iter().filter(|c| c.is_empty()).count(), 1);
    assert!(
        carts
            .iter()
            .any(|c| c.get(nasi.id).map(|line| line.quantity) == Some(10))
    );

    // The same session checking out twice at once places a single order.
    let mie = menu_named(&state, "Mie Ayam Bakso").await?;
    let sari = customer(&state, "sari").await?;
    cart_service::add_to_cart(&state, &sari, mie.id, AddToCartRequest { quantity: 2 }).await?;

    let (first, second) = tokio::join!(
        order_service::checkout(&state, &sari),
        order_service::checkout(&state, &sari)
    );
    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(results.iter().filter(|&r| is_empty_cart(r)).count(), 1);
    assert_eq!(menu_named(&state, "Mie Ayam Bakso").await?.stock, 8);
    assert_eq!(order_count(&state).await?, 2);

    // Simultaneous first ratings by one user: one creates the row, one overwrites it.
    let four = RateMenuRequest {
        score: 4,
        comment: None,
    };
    let five = RateMenuRequest {
        score: 5,
        comment: Some("mantap".into()),
    };
    let (first, second) = tokio::join!(
        rating_service::rate_menu(&state, &sari, mie.id, four),
        rating_service::rate_menu(&state, &sari, mie.id, five)
    );
    let (first, second) = (first?.data.unwrap(), second?.data.unwrap());
    assert!(first.created ^ second.created);
    assert_eq!(first.rating.id, second.rating.id);

    let (ratings,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM ratings WHERE user_id = $1 AND menu_id = $2")
            .bind(sari.user_id)
            .bind(mie.id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(ratings, 1);

    Ok(())
}
