use crate::schema::coffees;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use rocket::serde::{Deserialize, Serialize};

// Coffee model - one origin/lot of beans
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = coffees)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Coffee {
    pub id: i32,
    pub name: String,
    pub sensory_profile: String,
    pub region: String,
    pub producer: String,
    pub variety: String,
    pub process: String,
    pub altitude: String,
    pub rating: f64, // mean of brew ratings, maintained on brew writes
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = coffees)]
pub struct NewCoffee {
    pub name: String,
    pub sensory_profile: String,
    pub region: String,
    pub producer: String,
    pub variety: String,
    pub process: String,
    pub altitude: String,
    pub rating: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = coffees)]
pub struct UpdateCoffee {
    pub name: String,
    pub sensory_profile: String,
    pub region: String,
    pub producer: String,
    pub variety: String,
    pub process: String,
    pub altitude: String,
    pub updated_at: NaiveDateTime,
}

// Request model for create and update
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CoffeeInput {
    pub name: String,
    pub sensory_profile: String,
    pub region: String,
    pub producer: String,
    pub variety: String,
    pub process: String,
    pub altitude: String,
}

impl CoffeeInput {
    /// Rejects the input if any text field is empty or only whitespace.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("name", &self.name),
            ("sensoryProfile", &self.sensory_profile),
            ("region", &self.region),
            ("producer", &self.producer),
            ("variety", &self.variety),
            ("process", &self.process),
            ("altitude", &self.altitude),
        ];

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("Missing required fields: {}", missing.join(", ")))
        }
    }
}

impl NewCoffee {
    pub fn new(input: CoffeeInput) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            name: input.name.trim().to_string(),
            sensory_profile: input.sensory_profile.trim().to_string(),
            region: input.region.trim().to_string(),
            producer: input.producer.trim().to_string(),
            variety: input.variety.trim().to_string(),
            process: input.process.trim().to_string(),
            altitude: input.altitude.trim().to_string(),
            rating: 0.0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl UpdateCoffee {
    pub fn new(input: CoffeeInput) -> Self {
        Self {
            name: input.name.trim().to_string(),
            sensory_profile: input.sensory_profile.trim().to_string(),
            region: input.region.trim().to_string(),
            producer: input.producer.trim().to_string(),
            variety: input.variety.trim().to_string(),
            process: input.process.trim().to_string(),
            altitude: input.altitude.trim().to_string(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Mean of the given brew ratings rounded to one decimal, or 0 with no brews.
pub fn aggregate_rating(ratings: &[f64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}
