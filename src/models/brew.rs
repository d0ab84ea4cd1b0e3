use crate::models::coffee::Coffee;
use crate::schema::brews;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;
use rocket::serde::{Deserialize, Serialize};

pub const WATER_TEMPERATURE_RANGE: std::ops::RangeInclusive<i32> = 70..=100;
pub const GRINDER_SETTING_RANGE: std::ops::RangeInclusive<i32> = 1..=250;
pub const EXTRACTION_TIME_RANGE: std::ops::RangeInclusive<i32> = 10..=600;
pub const TASTE_SCALE: std::ops::RangeInclusive<i32> = 0..=10;
pub const RATING_RANGE: std::ops::RangeInclusive<f64> = 0.0..=5.0;
/// Smallest non-zero dose; two decimals, like the stored column
pub const MIN_POSITIVE_DOSE: f64 = 0.01;
/// Grams; the widest value a `numeric(5,2)` dose column holds
pub const DOSE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=999.99;

// Brew row as stored, without its coffee
#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = brews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BrewRecord {
    pub id: i32,
    pub coffee_id: i32,
    pub brewing_method: String,
    pub dose: f64,
    pub water_amount: i32,
    pub ratio: String,
    pub water_temperature: i32,
    pub grinder_setting: i32,
    pub extraction_time: i32,
    pub acidity: i32,
    pub sweetness: i32,
    pub body: i32,
    pub rating: f64,
    pub brew_date: NaiveDate,
    pub brew_time: NaiveTime,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Brew with its parent coffee embedded, as returned to callers
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Brew {
    pub id: i32,
    pub coffee_id: i32,
    pub coffee: Coffee,
    pub brewing_method: String,
    pub dose: f64,
    pub water_amount: i32,
    pub ratio: String,
    pub water_temperature: i32,
    pub grinder_setting: i32,
    pub extraction_time: i32,
    pub acidity: i32,
    pub sweetness: i32,
    pub body: i32,
    pub rating: f64,
    pub brew_date: NaiveDate,
    pub brew_time: NaiveTime,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Brew {
    pub fn from_parts(record: BrewRecord, coffee: Coffee) -> Self {
        Self {
            id: record.id,
            coffee_id: record.coffee_id,
            coffee,
            brewing_method: record.brewing_method,
            dose: record.dose,
            water_amount: record.water_amount,
            ratio: record.ratio,
            water_temperature: record.water_temperature,
            grinder_setting: record.grinder_setting,
            extraction_time: record.extraction_time,
            acidity: record.acidity,
            sweetness: record.sweetness,
            body: record.body,
            rating: record.rating,
            brew_date: record.brew_date,
            brew_time: record.brew_time,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = brews)]
pub struct NewBrew {
    pub coffee_id: i32,
    pub brewing_method: String,
    pub dose: f64,
    pub water_amount: i32,
    pub ratio: String,
    pub water_temperature: i32,
    pub grinder_setting: i32,
    pub extraction_time: i32,
    pub acidity: i32,
    pub sweetness: i32,
    pub body: i32,
    pub rating: f64,
    pub brew_date: NaiveDate,
    pub brew_time: NaiveTime,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// treat_none_as_null so clearing the notes actually clears the column
#[derive(AsChangeset, Debug)]
#[diesel(table_name = brews)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateBrew {
    pub coffee_id: i32,
    pub brewing_method: String,
    pub dose: f64,
    pub water_amount: i32,
    pub ratio: String,
    pub water_temperature: i32,
    pub grinder_setting: i32,
    pub extraction_time: i32,
    pub acidity: i32,
    pub sweetness: i32,
    pub body: i32,
    pub rating: f64,
    pub brew_date: NaiveDate,
    pub brew_time: NaiveTime,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

// Request model for create and update. Everything is optional here so that
// a missing field becomes a validation message instead of a parse failure.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BrewInput {
    pub coffee_id: Option<i32>,
    pub brewing_method: Option<String>,
    pub dose: Option<f64>,
    pub water_amount: Option<i32>,
    pub water_temperature: Option<i32>,
    pub grinder_setting: Option<i32>,
    pub extraction_time: Option<i32>,
    pub acidity: Option<i32>,
    pub sweetness: Option<i32>,
    pub body: Option<i32>,
    pub rating: Option<f64>,
    pub brew_date: Option<String>,
    pub brew_time: Option<String>,
    pub notes: Option<String>,
}

/// Brew fields after validation, with the ratio already derived.
#[derive(Debug, Clone, PartialEq)]
pub struct BrewFields {
    pub coffee_id: i32,
    pub brewing_method: BrewingMethod,
    pub dose: f64,
    pub water_amount: i32,
    pub ratio: String,
    pub water_temperature: i32,
    pub grinder_setting: i32,
    pub extraction_time: i32,
    pub acidity: i32,
    pub sweetness: i32,
    pub body: i32,
    pub rating: f64,
    pub brew_date: NaiveDate,
    pub brew_time: NaiveTime,
    pub notes: Option<String>,
}

impl BrewInput {
    /// Checks required fields first, then ranges, and derives the ratio.
    pub fn validate(&self) -> Result<BrewFields, String> {
        let required = [
            ("coffeeId", self.coffee_id.is_none()),
            (
                "brewingMethod",
                self.brewing_method
                    .as_deref()
                    .is_none_or(|m| m.trim().is_empty()),
            ),
            ("dose", self.dose.is_none()),
            ("waterAmount", self.water_amount.is_none()),
            ("waterTemperature", self.water_temperature.is_none()),
            ("grinderSetting", self.grinder_setting.is_none()),
            ("extractionTime", self.extraction_time.is_none()),
            ("acidity", self.acidity.is_none()),
            ("sweetness", self.sweetness.is_none()),
            ("body", self.body.is_none()),
            (
                "brewDate",
                self.brew_date.as_deref().is_none_or(|d| d.trim().is_empty()),
            ),
            (
                "brewTime",
                self.brew_time.as_deref().is_none_or(|t| t.trim().is_empty()),
            ),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, absent)| *absent)
            .map(|(field, _)| *field)
            .collect();

        if !missing.is_empty() {
            return Err(format!("Missing required fields: {}", missing.join(", ")));
        }

        // All required fields are present past this point
        let (
            Some(coffee_id),
            Some(method),
            Some(dose),
            Some(water_amount),
            Some(water_temperature),
            Some(grinder_setting),
            Some(extraction_time),
            Some(acidity),
            Some(sweetness),
            Some(body),
            Some(brew_date),
            Some(brew_time),
        ) = (
            self.coffee_id,
            self.brewing_method.as_deref(),
            self.dose,
            self.water_amount,
            self.water_temperature,
            self.grinder_setting,
            self.extraction_time,
            self.acidity,
            self.sweetness,
            self.body,
            self.brew_date.as_deref(),
            self.brew_time.as_deref(),
        )
        else {
            return Err("Missing required fields".to_string());
        };

        let brewing_method = validate_brewing_method(method)?;

        validate_dose(dose)?;
        if water_amount < 0 {
            return Err("Water amount must be a non-negative number of millilitres".to_string());
        }
        check_range("Water temperature", water_temperature, &WATER_TEMPERATURE_RANGE)?;
        check_range("Grinder setting", grinder_setting, &GRINDER_SETTING_RANGE)?;
        check_range("Extraction time", extraction_time, &EXTRACTION_TIME_RANGE)?;
        check_range("Acidity", acidity, &TASTE_SCALE)?;
        check_range("Sweetness", sweetness, &TASTE_SCALE)?;
        check_range("Body", body, &TASTE_SCALE)?;

        let rating = self.rating.unwrap_or(0.0);
        if !RATING_RANGE.contains(&rating) {
            return Err(format!(
                "Rating must be between {} and {}",
                RATING_RANGE.start(),
                RATING_RANGE.end()
            ));
        }

        let brew_date = parse_brew_date(brew_date)?;
        let brew_time = parse_brew_time(brew_time)?;

        let notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(BrewFields {
            coffee_id,
            brewing_method,
            dose,
            water_amount,
            ratio: brew_ratio(dose, water_amount),
            water_temperature,
            grinder_setting,
            extraction_time,
            acidity,
            sweetness,
            body,
            rating,
            brew_date,
            brew_time,
            notes,
        })
    }
}

impl NewBrew {
    pub fn new(fields: BrewFields) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            coffee_id: fields.coffee_id,
            brewing_method: fields.brewing_method.to_string(),
            dose: fields.dose,
            water_amount: fields.water_amount,
            ratio: fields.ratio,
            water_temperature: fields.water_temperature,
            grinder_setting: fields.grinder_setting,
            extraction_time: fields.extraction_time,
            acidity: fields.acidity,
            sweetness: fields.sweetness,
            body: fields.body,
            rating: fields.rating,
            brew_date: fields.brew_date,
            brew_time: fields.brew_time,
            notes: fields.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

impl UpdateBrew {
    pub fn new(fields: BrewFields) -> Self {
        Self {
            coffee_id: fields.coffee_id,
            brewing_method: fields.brewing_method.to_string(),
            dose: fields.dose,
            water_amount: fields.water_amount,
            ratio: fields.ratio,
            water_temperature: fields.water_temperature,
            grinder_setting: fields.grinder_setting,
            extraction_time: fields.extraction_time,
            acidity: fields.acidity,
            sweetness: fields.sweetness,
            body: fields.body,
            rating: fields.rating,
            brew_date: fields.brew_date,
            brew_time: fields.brew_time,
            notes: fields.notes,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrewingMethod {
    V60,
    Aeropress,
    Chemex,
    Kalita,
    FrenchPress,
    Clever,
    Espresso,
    Other,
}

impl BrewingMethod {
    pub const ALL: [BrewingMethod; 8] = [
        Self::V60,
        Self::Aeropress,
        Self::Chemex,
        Self::Kalita,
        Self::FrenchPress,
        Self::Clever,
        Self::Espresso,
        Self::Other,
    ];

    pub fn from_method_str(method: &str) -> Option<Self> {
        let normalized: String = method
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "v60" => Some(Self::V60),
            "aeropress" => Some(Self::Aeropress),
            "chemex" => Some(Self::Chemex),
            "kalita" => Some(Self::Kalita),
            "frenchpress" => Some(Self::FrenchPress),
            "clever" => Some(Self::Clever),
            "espresso" => Some(Self::Espresso),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V60 => "V60",
            Self::Aeropress => "Aeropress",
            Self::Chemex => "Chemex",
            Self::Kalita => "Kalita",
            Self::FrenchPress => "French Press",
            Self::Clever => "Clever",
            Self::Espresso => "Espresso",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for BrewingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Water-to-coffee ratio as `1:N`, N rounded to one decimal.
///
/// This is the single place the ratio is computed; the preview endpoint
/// and every brew write go through it.
pub fn brew_ratio(dose: f64, water_amount: i32) -> String {
    if dose > 0.0 && dose.is_finite() {
        let ratio = (f64::from(water_amount) / dose * 10.0).round() / 10.0;
        format!("1:{ratio:.1}")
    } else {
        "1:0".to_string()
    }
}

/// Doses too small to divide by are rejected, so `brew_ratio` stays finite.
pub fn validate_dose(dose: f64) -> Result<(), String> {
    if !DOSE_RANGE.contains(&dose) {
        return Err(format!(
            "Dose must be between {} and {} grams",
            DOSE_RANGE.start(),
            DOSE_RANGE.end()
        ));
    }
    if dose > 0.0 && dose < MIN_POSITIVE_DOSE {
        return Err(format!("Dose must be 0 or at least {MIN_POSITIVE_DOSE} grams"));
    }
    Ok(())
}

pub fn validate_brewing_method(method: &str) -> Result<BrewingMethod, String> {
    BrewingMethod::from_method_str(method).ok_or_else(|| {
        let known: Vec<&str> = BrewingMethod::ALL.iter().map(|m| m.as_str()).collect();
        format!(
            "Unknown brewing method '{}'. Must be one of: {}",
            method.trim(),
            known.join(", ")
        )
    })
}

fn check_range(
    label: &str,
    value: i32,
    range: &std::ops::RangeInclusive<i32>,
) -> Result<(), String> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{label} must be between {} and {}",
            range.start(),
            range.end()
        ))
    }
}

fn parse_brew_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid brew date '{raw}', expected YYYY-MM-DD"))
}

fn parse_brew_time(raw: &str) -> Result<NaiveTime, String> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| format!("Invalid brew time '{raw}', expected HH:MM"))
}
