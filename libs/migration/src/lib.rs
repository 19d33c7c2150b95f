pub use sea_orm_migration::prelude::*;

mod m20260101_000000_bootstrap;
mod m20260101_000001_create_users;
mod m20260101_000002_create_catalog;
mod m20260101_000003_create_banners;
mod m20260101_000004_create_carts;
mod m20260101_000005_create_orders;
mod m20260101_000006_create_chats;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000000_bootstrap::Migration),
            Box::new(m20260101_000001_create_users::Migration),
            Box::new(m20260101_000002_create_catalog::Migration),
            Box::new(m20260101_000003_create_banners::Migration),
            Box::new(m20260101_000004_create_carts::Migration),
            Box::new(m20260101_000005_create_orders::Migration),
            Box::new(m20260101_000006_create_chats::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered_and_unique() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
        assert!(names[0].ends_with("bootstrap"));
    }
}
