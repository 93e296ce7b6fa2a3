//! Database service layer
//!
//! This module bundles the repositories behind one handle, mirroring the
//! entity-store collaborator consumed by the services.

use crate::database::{
    CategoryRepository, DatabasePool, EventRepository, RequestRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub categories: CategoryRepository,
    pub events: EventRepository,
    pub requests: RequestRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            requests: RequestRepository::new(pool),
        }
    }
}
