use super::connection::{DbPool, checkout};
use crate::models::{Coffee, CoffeeFilter, LIKE_ESCAPE, NewCoffee, UpdateCoffee};
use crate::schema::{brews, coffees};
use diesel::prelude::*;

/// Coffee-related database operations
pub struct CoffeeOperations<'a> {
    pool: &'a DbPool,
}

impl<'a> CoffeeOperations<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Coffees matching the filter, newest first
    pub fn list_coffees(&self, filter: &CoffeeFilter) -> Result<Vec<Coffee>, diesel::result::Error> {
        let mut conn = checkout(self.pool)?;

        let mut query = coffees::table
            .order((coffees::created_at.desc(), coffees::id.desc()))
            .select(Coffee::as_select())
            .into_boxed();

        if let Some(pattern) = filter.search_pattern() {
            query = query.filter(
                coffees::name
                    .like(pattern.clone())
                    .escape(LIKE_ESCAPE)
                    .or(coffees::region.like(pattern.clone()).escape(LIKE_ESCAPE))
                    .or(coffees::producer.like(pattern.clone()).escape(LIKE_ESCAPE))
                    .or(coffees::variety.like(pattern.clone()).escape(LIKE_ESCAPE))
                    .or(coffees::process.like(pattern).escape(LIKE_ESCAPE)),
            );
        }
        if let Some(min_rating) = filter.min_rating {
            query = query.filter(coffees::rating.ge(min_rating));
        }

        query.load(&mut conn)
    }

    pub fn get_coffee_by_id(&self, id: i32) -> Result<Option<Coffee>, diesel::result::Error> {
        let mut conn = checkout(self.pool)?;

        coffees::table
            .find(id)
            .select(Coffee::as_select())
            .first(&mut conn)
            .optional()
    }

    pub fn insert_coffee(&self, new_coffee: &NewCoffee) -> Result<Coffee, diesel::result::Error> {
        let mut conn = checkout(self.pool)?;

        diesel::insert_into(coffees::table)
            .values(new_coffee)
            .returning(Coffee::as_returning())
            .get_result(&mut conn)
    }

    /// Replaces every user-editable field. `None` when the id does not exist.
    pub fn update_coffee(
        &self,
        id: i32,
        changes: &UpdateCoffee,
    ) -> Result<Option<Coffee>, diesel::result::Error> {
        let mut conn = checkout(self.pool)?;

        diesel::update(coffees::table.find(id))
            .set(changes)
            .returning(Coffee::as_returning())
            .get_result(&mut conn)
            .optional()
    }

    /// Deletes the coffee's brews and then the coffee, in one transaction.
    ///
    /// Returns the number of brews removed, or `None` if there was no such
    /// coffee (in which case nothing is deleted).
    pub fn delete_coffee_cascade(&self, id: i32) -> Result<Option<usize>, diesel::result::Error> {
        let mut conn = checkout(self.pool)?;

        conn.immediate_transaction(|conn| {
            let exists = coffees::table
                .find(id)
                .select(coffees::id)
                .first::<i32>(conn)
                .optional()?
                .is_some();

            if !exists {
                return Ok(None);
            }

            // Brews first, the foreign key forbids orphaning them
            let removed_brews =
                diesel::delete(brews::table.filter(brews::coffee_id.eq(id))).execute(conn)?;

            diesel::delete(coffees::table.find(id)).execute(conn)?;

            Ok(Some(removed_brews))
        })
    }
}
