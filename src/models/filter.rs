use crate::models::brew::RATING_RANGE;

/// Narrows the coffee list: free-text search plus a rating floor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoffeeFilter {
    pub search: Option<String>,
    pub min_rating: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrewFilter {
    pub min_rating: Option<f64>,
}

/// Escape character used in the `LIKE` patterns built here
pub const LIKE_ESCAPE: char = '\\';

impl CoffeeFilter {
    pub fn new(search: Option<String>, min_rating: Option<f64>) -> Self {
        Self { search, min_rating }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_min_rating(self.min_rating)
    }

    /// `%term%` with `LIKE` wildcards escaped; `None` when the search is blank.
    pub fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty())?;

        let mut pattern = String::with_capacity(term.len() + 2);
        pattern.push('%');
        for c in term.chars() {
            if c == '%' || c == '_' || c == LIKE_ESCAPE {
                pattern.push(LIKE_ESCAPE);
            }
            pattern.push(c);
        }
        pattern.push('%');
        Some(pattern)
    }
}

impl BrewFilter {
    pub fn new(min_rating: Option<f64>) -> Self {
        Self { min_rating }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_min_rating(self.min_rating)
    }
}

fn validate_min_rating(min_rating: Option<f64>) -> Result<(), String> {
    match min_rating {
        Some(rating) if !RATING_RANGE.contains(&rating) => Err(format!(
            "Minimum rating must be between {} and {}",
            RATING_RANGE.start(),
            RATING_RANGE.end()
        )),
        _ => Ok(()),
    }
}
