pub mod auth_service;
pub mod cart_service;
pub mod dashboard_service;
pub mod kantin_scope;
pub mod menu_service;
pub mod order_service;
pub mod rating_service;
pub mod stock_service;
