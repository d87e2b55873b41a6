use kantin_foodcourt::routes::home::{health_check, index};

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
}

#[tokio::test]
async fn landing_links_to_the_menu() {
    let response = index().await;
    let data = response.0.data.expect("landing data");
    assert!(data.links.iter().any(|link| link.href == "/menu"));
}
