//! SeaORM entities for accounts and favorites.

pub mod favorite;
pub mod user;
