use crate::database::{BrewWriteOutcome, DatabaseService};
use crate::error::JournalError;
use crate::models::*;
use crate::services::refresh::{
    BREWS_VIEW, COFFEES_VIEW, RefreshSink, brew_view, coffee_view,
};
use log::{debug, info};
use std::sync::Arc;

/// How many brews the coffee detail view shows by default
pub const DEFAULT_BREW_HISTORY: i64 = 5;
pub const MAX_BREW_HISTORY: i64 = 100;
/// Rows included in the debug snapshot
pub const DEBUG_RECENT_BREWS: i64 = 5;

/// Reads and validated writes over coffees and brews.
///
/// `database` is `None` when no database URL was configured; every call then
/// fails with [`JournalError::Unconfigured`] and the HTTP layer decides how
/// soft to be about it.
#[derive(Debug)]
pub struct JournalService {
    database: Option<Arc<DatabaseService>>,
    refresh: Arc<dyn RefreshSink>,
}

impl JournalService {
    pub fn new(database: Option<Arc<DatabaseService>>, refresh: Arc<dyn RefreshSink>) -> Self {
        Self { database, refresh }
    }

    pub fn is_configured(&self) -> bool {
        self.database.is_some()
    }

    fn database(&self) -> Result<&DatabaseService, JournalError> {
        self.database.as_deref().ok_or(JournalError::Unconfigured)
    }

    fn signal(&self, paths: Vec<String>) -> Vec<String> {
        for path in &paths {
            self.refresh.revalidate(path);
        }
        paths
    }

    // Queries

    pub fn list_coffees(&self, filter: &CoffeeFilter) -> Result<Vec<Coffee>, JournalError> {
        filter.validate().map_err(JournalError::Validation)?;

        let coffees = self.database()?.list_coffees(filter)?;
        debug!("Loaded {} coffees", coffees.len());
        Ok(coffees)
    }

    pub fn get_coffee_by_id(&self, id: i32) -> Result<Option<Coffee>, JournalError> {
        Ok(self.database()?.get_coffee_by_id(id)?)
    }

    pub fn list_brews(&self, filter: &BrewFilter) -> Result<Vec<Brew>, JournalError> {
        filter.validate().map_err(JournalError::Validation)?;

        let brews = self.database()?.list_brews(filter)?;
        debug!("Loaded {} brews", brews.len());
        Ok(brews)
    }

    pub fn get_brew_by_id(&self, id: i32) -> Result<Option<Brew>, JournalError> {
        Ok(self.database()?.get_brew_by_id(id)?)
    }

    pub fn list_brews_by_coffee_id(
        &self,
        coffee_id: i32,
        limit: Option<i64>,
    ) -> Result<Vec<Brew>, JournalError> {
        let limit = limit.unwrap_or(DEFAULT_BREW_HISTORY);
        if !(1..=MAX_BREW_HISTORY).contains(&limit) {
            return Err(JournalError::Validation(format!(
                "Limit must be between 1 and {MAX_BREW_HISTORY}"
            )));
        }

        Ok(self.database()?.list_brews_by_coffee_id(coffee_id, limit)?)
    }

    // Coffee mutations

    pub fn create_coffee(&self, input: CoffeeInput) -> Result<Mutation<Coffee>, JournalError> {
        input.validate().map_err(JournalError::Validation)?;

        let coffee = self.database()?.insert_coffee(&NewCoffee::new(input))?;
        info!("Created coffee {} ({})", coffee.id, coffee.name);

        Ok(Mutation {
            data: coffee,
            revalidated: self.signal(vec![COFFEES_VIEW.to_string()]),
        })
    }

    pub fn update_coffee(
        &self,
        id: i32,
        input: CoffeeInput,
    ) -> Result<Mutation<Coffee>, JournalError> {
        input.validate().map_err(JournalError::Validation)?;

        let coffee = self
            .database()?
            .update_coffee(id, &UpdateCoffee::new(input))?
            .ok_or_else(|| JournalError::NotFound(format!("Coffee {id} not found")))?;
        info!("Updated coffee {id}");

        Ok(Mutation {
            data: coffee,
            revalidated: self.signal(vec![COFFEES_VIEW.to_string(), coffee_view(id)]),
        })
    }

    /// Removes the coffee and every brew that references it
    pub fn delete_coffee(&self, id: i32) -> Result<Removal, JournalError> {
        let removed_brews = self
            .database()?
            .delete_coffee_cascade(id)?
            .ok_or_else(|| JournalError::NotFound(format!("Coffee {id} not found")))?;
        info!("Deleted coffee {id} and {removed_brews} brew(s)");

        Ok(Removal {
            success: true,
            redirect: COFFEES_VIEW.to_string(),
            revalidated: self.signal(vec![
                COFFEES_VIEW.to_string(),
                coffee_view(id),
                BREWS_VIEW.to_string(),
            ]),
        })
    }

    // Brew mutations

    pub fn create_brew(&self, input: BrewInput) -> Result<Mutation<Brew>, JournalError> {
        let fields = input.validate().map_err(JournalError::Validation)?;
        let coffee_id = fields.coffee_id;

        let brew = match self.database()?.insert_brew(&NewBrew::new(fields))? {
            BrewWriteOutcome::Saved { brew, .. } => brew,
            BrewWriteOutcome::CoffeeNotFound => {
                return Err(JournalError::NotFound(format!(
                    "Coffee {coffee_id} not found"
                )));
            }
            // Inserts never look a brew up
            BrewWriteOutcome::BrewNotFound => {
                return Err(JournalError::NotFound("Brew not found".to_string()));
            }
        };
        info!(
            "Created brew {} for coffee {} with ratio {}",
            brew.id, brew.coffee_id, brew.ratio
        );

        Ok(Mutation {
            revalidated: self.signal(vec![
                BREWS_VIEW.to_string(),
                brew_view(brew.id),
                coffee_view(brew.coffee_id),
            ]),
            data: brew,
        })
    }

    pub fn update_brew(&self, id: i32, input: BrewInput) -> Result<Mutation<Brew>, JournalError> {
        let fields = input.validate().map_err(JournalError::Validation)?;
        let coffee_id = fields.coffee_id;

        let (brew, previous_coffee_id) =
            match self.database()?.update_brew(id, &UpdateBrew::new(fields))? {
                BrewWriteOutcome::Saved {
                    brew,
                    previous_coffee_id,
                } => (brew, previous_coffee_id),
                BrewWriteOutcome::BrewNotFound => {
                    return Err(JournalError::NotFound(format!("Brew {id} not found")));
                }
                BrewWriteOutcome::CoffeeNotFound => {
                    return Err(JournalError::NotFound(format!(
                        "Coffee {coffee_id} not found"
                    )));
                }
            };
        info!("Updated brew {id}");

        let mut paths = vec![
            BREWS_VIEW.to_string(),
            brew_view(id),
            coffee_view(brew.coffee_id),
        ];
        if previous_coffee_id != brew.coffee_id {
            paths.push(coffee_view(previous_coffee_id));
        }

        Ok(Mutation {
            data: brew,
            revalidated: self.signal(paths),
        })
    }

    pub fn delete_brew(&self, id: i32) -> Result<Removal, JournalError> {
        let coffee_id = self
            .database()?
            .delete_brew(id)?
            .ok_or_else(|| JournalError::NotFound(format!("Brew {id} not found")))?;
        info!("Deleted brew {id}");

        Ok(Removal {
            success: true,
            redirect: BREWS_VIEW.to_string(),
            revalidated: self.signal(vec![
                BREWS_VIEW.to_string(),
                brew_view(id),
                coffee_view(coffee_id),
            ]),
        })
    }

    // Maintenance

    /// Table layout plus the most recent brew rows
    pub fn debug_snapshot(&self) -> Result<DebugSnapshot, JournalError> {
        let database = self.database()?;

        Ok(DebugSnapshot {
            success: true,
            table_structure: database.describe_tables()?,
            recent_brews: database.list_recent_brew_records(DEBUG_RECENT_BREWS)?,
        })
    }

    /// Brings the schema up to date. Safe to call repeatedly.
    pub fn setup(&self) -> Result<SetupReport, JournalError> {
        let applied = self
            .database()?
            .run_setup()
            .map_err(|e| JournalError::Setup(e.to_string()))?;

        let message = if applied.is_empty() {
            "Database schema already up to date".to_string()
        } else {
            format!("Applied {} migration(s)", applied.len())
        };
        info!("{message}");

        Ok(SetupReport {
            success: true,
            message,
            applied,
        })
    }
}
