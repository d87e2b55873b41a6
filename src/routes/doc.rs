use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::CartLine,
    dto::{
        auth::{FormFields, LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartLineView, CartUpdateView, CartView, UpdateCartRequest},
        dashboard::{AdminDashboard, DashboardView, KantinDashboard, SaleLine},
        menus::{
            CreateMenuRequest, ManagedMenuList, MenuFormContext, MenuList, MenuListing,
            MenuQuery, UpdateMenuRequest,
        },
        orders::OrderWithItems,
        ratings::{RateMenuRequest, RatingResult},
        stock::{StockList, UpdateStockRequest},
    },
    models::{Kantin, Menu, Order, OrderItem, Rating, Role, User},
    response::{ApiResponse, Meta},
    routes::{
        auth, cart, checkout, dashboard,
        home::{self, HealthData, Landing, Link},
        kantin_menus, menus, ratings, stock,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        home::index,
        home::health_check,
        auth::register_form,
        auth::register,
        auth::login_form,
        auth::login,
        auth::logout,
        menus::list_menus,
        cart::view_cart,
        cart::add_to_cart,
        cart::update_cart,
        checkout::checkout_summary,
        checkout::checkout,
        dashboard::dashboard,
        stock::list_stock,
        stock::update_stock,
        kantin_menus::list_menus,
        kantin_menus::new_menu_form,
        kantin_menus::create_menu,
        kantin_menus::edit_menu_form,
        kantin_menus::update_menu,
        kantin_menus::delete_menu,
        ratings::rate_menu
    ),
    components(
        schemas(
            Role,
            User,
            Kantin,
            Menu,
            Order,
            OrderItem,
            Rating,
            Landing,
            Link,
            HealthData,
            FormFields,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            MenuQuery,
            MenuListing,
            MenuList,
            ManagedMenuList,
            MenuFormContext,
            CreateMenuRequest,
            UpdateMenuRequest,
            CartLine,
            AddToCartRequest,
            UpdateCartRequest,
            CartLineView,
            CartView,
            CartUpdateView,
            OrderWithItems,
            AdminDashboard,
            KantinDashboard,
            SaleLine,
            DashboardView,
            StockList,
            UpdateStockRequest,
            RateMenuRequest,
            RatingResult,
            Meta,
            ApiResponse<User>,
            ApiResponse<Menu>,
            ApiResponse<MenuList>,
            ApiResponse<CartView>,
            ApiResponse<OrderWithItems>,
            ApiResponse<DashboardView>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Home", description = "Landing document and health check"),
        (name = "Auth", description = "Registration, login and logout"),
        (name = "Menus", description = "Public menu browsing"),
        (name = "Cart", description = "Session cart"),
        (name = "Checkout", description = "Order placement"),
        (name = "Dashboard", description = "Admin and stall dashboards"),
        (name = "Stock", description = "Stock management"),
        (name = "Kantin Menus", description = "Menu management for stalls"),
        (name = "Ratings", description = "Menu ratings"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
