//! Domain models and wire DTOs.

pub mod admin_user;
pub mod dto;
pub mod order;
pub mod product;

pub use admin_user::{AdminUser, CurrentAdmin};
pub use dto::{OrderDto, Pagination, ProductDto};
pub use order::{Order, OrderDraft, OrderItem, ShippingAddress};
pub use product::{CreateProduct, Product, UpdateProduct};
