//! Shared test infrastructure

pub mod database_helper;
pub mod test_data;

pub use database_helper::TestDatabase;

use EventHive::config::Settings;
use EventHive::database::DatabaseService;
use EventHive::services::ServiceFactory;

/// Build the full service stack over a test database, with the stats
/// collector disabled
pub fn build_services(db: &TestDatabase) -> ServiceFactory {
    let mut settings = Settings::default();
    settings.stats.base_url = None;

    let database = DatabaseService::new(db.pool.clone());
    ServiceFactory::new(&settings, database).expect("Failed to build services")
}
