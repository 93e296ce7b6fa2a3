//! Services module
//!
//! This module contains business logic services

pub mod category;
pub mod event;
pub mod request;
pub mod stats;
pub mod user;

// Re-export commonly used services
pub use category::CategoryService;
pub use event::EventService;
pub use request::RequestService;
pub use stats::StatsService;
pub use user::UserService;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;
use crate::utils::locks::EventLocks;

/// Composition root wiring repositories, the stats client, and the
/// per-event lock registry into the registration services
#[derive(Clone)]
pub struct ServiceFactory {
    pub event_service: EventService,
    pub request_service: RequestService,
    pub user_service: UserService,
    pub category_service: CategoryService,
    pub stats_service: StatsService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, database: DatabaseService) -> Result<Self> {
        let stats_service = StatsService::new(&settings.stats)?;
        let locks = EventLocks::new();

        let event_service = EventService::new(
            database.events.clone(),
            database.users.clone(),
            database.categories.clone(),
            database.requests.clone(),
            stats_service.clone(),
        );
        let request_service = RequestService::new(
            database.requests.clone(),
            database.events.clone(),
            database.users.clone(),
            locks,
        );
        let user_service = UserService::new(database.users.clone());
        let category_service = CategoryService::new(database.categories, database.events);

        Ok(Self {
            event_service,
            request_service,
            user_service,
            category_service,
            stats_service,
        })
    }
}
