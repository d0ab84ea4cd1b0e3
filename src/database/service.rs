use super::brews::{BrewOperations, BrewWriteOutcome};
use super::coffees::CoffeeOperations;
use super::connection::{DbPool, create_pool, run_migrations};
use super::introspection::IntrospectionOperations;
use crate::models::*;

/// Unified interface to all database operations.
///
/// Built once at startup from the configured URL and handed to whoever needs
/// it; the pool closes when the last handle is dropped.
#[derive(Debug)]
pub struct DatabaseService {
    pub pool: DbPool,
}

impl DatabaseService {
    /// Opens the pool and applies pending migrations
    pub fn new(database_url: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = create_pool(database_url)?;
        Ok(Self { pool })
    }

    /// Idempotent schema setup; returns the migration versions it applied
    pub fn run_setup(&self) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        run_migrations(&self.pool)
    }

    // Coffee operations
    pub fn list_coffees(&self, filter: &CoffeeFilter) -> Result<Vec<Coffee>, diesel::result::Error> {
        CoffeeOperations::new(&self.pool).list_coffees(filter)
    }

    pub fn get_coffee_by_id(&self, id: i32) -> Result<Option<Coffee>, diesel::result::Error> {
        CoffeeOperations::new(&self.pool).get_coffee_by_id(id)
    }

    pub fn insert_coffee(&self, new_coffee: &NewCoffee) -> Result<Coffee, diesel::result::Error> {
        CoffeeOperations::new(&self.pool).insert_coffee(new_coffee)
    }

    pub fn update_coffee(
        &self,
        id: i32,
        changes: &UpdateCoffee,
    ) -> Result<Option<Coffee>, diesel::result::Error> {
        CoffeeOperations::new(&self.pool).update_coffee(id, changes)
    }

    pub fn delete_coffee_cascade(&self, id: i32) -> Result<Option<usize>, diesel::result::Error> {
        CoffeeOperations::new(&self.pool).delete_coffee_cascade(id)
    }

    // Brew operations
    pub fn list_brews(&self, filter: &BrewFilter) -> Result<Vec<Brew>, diesel::result::Error> {
        BrewOperations::new(&self.pool).list_brews(filter)
    }

    pub fn get_brew_by_id(&self, id: i32) -> Result<Option<Brew>, diesel::result::Error> {
        BrewOperations::new(&self.pool).get_brew_by_id(id)
    }

    pub fn list_brews_by_coffee_id(
        &self,
        coffee_id: i32,
        limit: i64,
    ) -> Result<Vec<Brew>, diesel::result::Error> {
        BrewOperations::new(&self.pool).list_brews_by_coffee_id(coffee_id, limit)
    }

    pub fn list_recent_brew_records(
        &self,
        limit: i64,
    ) -> Result<Vec<BrewRecord>, diesel::result::Error> {
        BrewOperations::new(&self.pool).list_recent_records(limit)
    }

    pub fn insert_brew(&self, new_brew: &NewBrew) -> Result<BrewWriteOutcome, diesel::result::Error> {
        BrewOperations::new(&self.pool).insert_brew(new_brew)
    }

    pub fn update_brew(
        &self,
        id: i32,
        changes: &UpdateBrew,
    ) -> Result<BrewWriteOutcome, diesel::result::Error> {
        BrewOperations::new(&self.pool).update_brew(id, changes)
    }

    pub fn delete_brew(&self, id: i32) -> Result<Option<i32>, diesel::result::Error> {
        BrewOperations::new(&self.pool).delete_brew(id)
    }

    // Introspection
    pub fn describe_tables(&self) -> Result<Vec<TableStructure>, diesel::result::Error> {
        IntrospectionOperations::new(&self.pool).describe_known_tables()
    }
}
