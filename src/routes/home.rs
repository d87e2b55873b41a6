use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::response::{ApiResponse, Meta};

#[derive(Serialize, ToSchema)]
pub struct Landing {
    pub name: String,
    pub links: Vec<Link>,
}

#[derive(Serialize, ToSchema)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

fn link(rel: &str, href: &str) -> Link {
    Link {
        rel: rel.to_string(),
        href: href.to_string(),
    }
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing document", body = ApiResponse<Landing>),
    ),
    tag = "Home"
)]
pub async fn index() -> Json<ApiResponse<Landing>> {
    let data = Landing {
        name: "Kantin Food Court".to_string(),
        links: vec![
            link("menu", "/menu"),
            link("cart", "/cart"),
            link("login", "/login"),
            link("register", "/register"),
            link("docs", "/docs"),
        ],
    };
    Json(ApiResponse::success(
        "Welcome to the food court",
        data,
        Some(Meta::empty()),
    ))
}

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
    tag = "Home"
)]
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    let data = HealthData {
        status: "ok".to_string(),
    };
    Json(ApiResponse::success("Health check", data, Some(Meta::empty())))
}
