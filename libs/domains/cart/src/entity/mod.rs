pub mod cart;
pub mod cart_item;
