use super::connection::{DbPool, checkout};
use crate::models::{Brew, BrewFilter, BrewRecord, Coffee, NewBrew, UpdateBrew, aggregate_rating};
use crate::schema::{brews, coffees};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

/// What happened to a brew write
#[derive(Debug)]
pub enum BrewWriteOutcome {
    /// Stored. `previous_coffee_id` differs from `brew.coffee_id` only when an
    /// update moved the brew to another coffee.
    Saved { brew: Brew, previous_coffee_id: i32 },
    BrewNotFound,
    CoffeeNotFound,
}

/// Brew-related database operations
pub struct BrewOperations<'a> {
    pool: &'a DbPool,
}

impl<'a> BrewOperations<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Brews matching the filter with their coffee, newest first
    pub fn list_brews(&self, filter: &BrewFilter) -> Result<Vec<Brew>, diesel::result::Error> {
        let mut conn = checkout(self.pool)?;

        let mut query = brews::table
            .inner_join(coffees::table)
            .order((brews::created_at.desc(), brews::id.desc()))
            .select((BrewRecord::as_select(), Coffee::as_select()))
            .into_boxed();

        if let Some(min_rating) = filter.min_rating {
            query = query.filter(brews::rating.ge(min_rating));
        }

        let rows = query.load::<(BrewRecord, Coffee)>(&mut conn)?;

        Ok(assemble(rows))
    }

    pub fn get_brew_by_id(&self, id: i32) -> Result<Option<Brew>, diesel::result::Error> {
        let mut conn = checkout(self.pool)?;

        let row = brews::table
            .inner_join(coffees::table)
            .filter(brews::id.eq(id))
            .select((BrewRecord::as_select(), Coffee::as_select()))
            .first::<(BrewRecord, Coffee)>(&mut conn)
            .optional()?;

        Ok(row.map(|(record, coffee)| Brew::from_parts(record, coffee)))
    }

    /// The latest `limit` brews of one coffee
    pub fn list_brews_by_coffee_id(
        &self,
        coffee_id: i32,
        limit: i64,
    ) -> Result<Vec<Brew>, diesel::result::Error> {
        let mut conn = checkout(self.pool)?;

        let rows = brews::table
            .inner_join(coffees::table)
            .filter(brews::coffee_id.eq(coffee_id))
            .order((brews::created_at.desc(), brews::id.desc()))
            .limit(limit)
            .select((BrewRecord::as_select(), Coffee::as_select()))
            .load::<(BrewRecord, Coffee)>(&mut conn)?;

        Ok(assemble(rows))
    }

    /// Raw rows, newest first, without the coffee join
    pub fn list_recent_records(&self, limit: i64) -> Result<Vec<BrewRecord>, diesel::result::Error> {
        let mut conn = checkout(self.pool)?;

        brews::table
            .order((brews::created_at.desc(), brews::id.desc()))
            .limit(limit)
            .select(BrewRecord::as_select())
            .load(&mut conn)
    }

    /// Inserts the brew, re-rates its coffee and reads the coffee back, all
    /// in one transaction so a concurrent coffee delete cannot slip between.
    ///
    /// Write transactions here are `BEGIN IMMEDIATE`: they read before they
    /// write, and a deferred transaction cannot upgrade its read lock while
    /// another writer holds the database, so it would fail with
    /// `SQLITE_BUSY` instead of waiting out `busy_timeout`.
    pub fn insert_brew(&self, new_brew: &NewBrew) -> Result<BrewWriteOutcome, diesel::result::Error> {
        let mut conn = checkout(self.pool)?;

        conn.immediate_transaction(|conn| {
            if !coffee_exists(conn, new_brew.coffee_id)? {
                return Ok(BrewWriteOutcome::CoffeeNotFound);
            }

            let record = diesel::insert_into(brews::table)
                .values(new_brew)
                .returning(BrewRecord::as_returning())
                .get_result(conn)?;

            let coffee = refresh_coffee_rating(conn, record.coffee_id)?;
            let previous_coffee_id = record.coffee_id;

            Ok(BrewWriteOutcome::Saved {
                brew: Brew::from_parts(record, coffee),
                previous_coffee_id,
            })
        })
    }

    pub fn update_brew(
        &self,
        id: i32,
        changes: &UpdateBrew,
    ) -> Result<BrewWriteOutcome, diesel::result::Error> {
        let mut conn = checkout(self.pool)?;

        conn.immediate_transaction(|conn| {
            let previous_coffee_id = match brews::table
                .find(id)
                .select(brews::coffee_id)
                .first::<i32>(conn)
                .optional()?
            {
                Some(coffee_id) => coffee_id,
                None => return Ok(BrewWriteOutcome::BrewNotFound),
            };

            if !coffee_exists(conn, changes.coffee_id)? {
                return Ok(BrewWriteOutcome::CoffeeNotFound);
            }

            let record = diesel::update(brews::table.find(id))
                .set(changes)
                .returning(BrewRecord::as_returning())
                .get_result(conn)?;

            if previous_coffee_id != record.coffee_id {
                refresh_coffee_rating(conn, previous_coffee_id)?;
            }
            let coffee = refresh_coffee_rating(conn, record.coffee_id)?;

            Ok(BrewWriteOutcome::Saved {
                brew: Brew::from_parts(record, coffee),
                previous_coffee_id,
            })
        })
    }

    /// Deletes the brew and re-rates its coffee. Returns the coffee id the
    /// brew belonged to, or `None` if there was no such brew.
    pub fn delete_brew(&self, id: i32) -> Result<Option<i32>, diesel::result::Error> {
        let mut conn = checkout(self.pool)?;

        conn.immediate_transaction(|conn| {
            let coffee_id = diesel::delete(brews::table.find(id))
                .returning(brews::coffee_id)
                .get_result::<i32>(conn)
                .optional()?;

            if let Some(coffee_id) = coffee_id {
                refresh_coffee_rating(conn, coffee_id)?;
            }

            Ok(coffee_id)
        })
    }
}

fn assemble(rows: Vec<(BrewRecord, Coffee)>) -> Vec<Brew> {
    rows.into_iter()
        .map(|(record, coffee)| Brew::from_parts(record, coffee))
        .collect()
}

fn coffee_exists(conn: &mut SqliteConnection, coffee_id: i32) -> Result<bool, diesel::result::Error> {
    Ok(coffees::table
        .find(coffee_id)
        .select(coffees::id)
        .first::<i32>(conn)
        .optional()?
        .is_some())
}

/// Recomputes the stored rating of a coffee from its brews and returns the
/// updated row. Must run inside the transaction that changed the brews.
fn refresh_coffee_rating(
    conn: &mut SqliteConnection,
    coffee_id: i32,
) -> Result<Coffee, diesel::result::Error> {
    let ratings: Vec<f64> = brews::table
        .filter(brews::coffee_id.eq(coffee_id))
        .select(brews::rating)
        .load(conn)?;

    diesel::update(coffees::table.find(coffee_id))
        .set(coffees::rating.eq(aggregate_rating(&ratings)))
        .returning(Coffee::as_returning())
        .get_result(conn)
}
