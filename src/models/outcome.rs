use rocket::serde::Serialize;

// Result of a create or update, with the views it made stale
#[derive(Serialize, Debug)]
pub struct Mutation<T> {
    pub data: T,
    pub revalidated: Vec<String>,
}

// Result of a delete: where the caller should go next
#[derive(Serialize, Debug)]
pub struct Removal {
    pub success: bool,
    pub redirect: String,
    pub revalidated: Vec<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RatioPreview {
    pub dose: f64,
    pub water_amount: i32,
    pub ratio: String,
}
