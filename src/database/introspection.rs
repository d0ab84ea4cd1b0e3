use super::connection::{DbPool, checkout};
use crate::models::{ColumnInfo, TableStructure};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;

/// Tables the debug endpoint is allowed to describe
pub const KNOWN_TABLES: [&str; 2] = ["coffees", "brews"];

/// Schema introspection for the debug endpoint
pub struct IntrospectionOperations<'a> {
    pool: &'a DbPool,
}

impl<'a> IntrospectionOperations<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub fn describe_table(&self, table: &str) -> Result<TableStructure, diesel::result::Error> {
        if !KNOWN_TABLES.contains(&table) {
            return Err(diesel::result::Error::NotFound);
        }

        let mut conn = checkout(self.pool)?;

        let columns = sql_query(
            "SELECT cid AS position, name, type AS data_type, \"notnull\" AS not_null, \
             dflt_value AS default_value, pk > 0 AS primary_key \
             FROM pragma_table_info(?) ORDER BY cid",
        )
        .bind::<Text, _>(table)
        .load::<ColumnInfo>(&mut conn)?;

        Ok(TableStructure {
            table: table.to_string(),
            columns,
        })
    }

    pub fn describe_known_tables(&self) -> Result<Vec<TableStructure>, diesel::result::Error> {
        KNOWN_TABLES
            .iter()
            .map(|table| self.describe_table(table))
            .collect()
    }
}
