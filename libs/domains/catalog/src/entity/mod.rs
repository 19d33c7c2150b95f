//! SeaORM entities for the catalog tables.

pub mod category;
pub mod comment;
pub mod faq;
pub mod product;
pub mod product_tag;
pub mod tag;
