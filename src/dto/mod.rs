pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod menus;
pub mod orders;
pub mod ratings;
pub mod stock;
