pub mod kantins;
pub mod menus;
pub mod order_items;
pub mod orders;
pub mod ratings;
pub mod users;

pub use kantins::Entity as Kantins;
pub use menus::Entity as Menus;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use ratings::Entity as Ratings;
pub use users::Entity as Users;
