use crate::models::brew::BrewRecord;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Integer, Nullable, Text};
use rocket::serde::Serialize;

// One row of `pragma_table_info`
#[derive(QueryableByName, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    #[diesel(sql_type = Integer)]
    pub position: i32,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub data_type: String,
    #[diesel(sql_type = Bool)]
    pub not_null: bool,
    #[diesel(sql_type = Nullable<Text>)]
    pub default_value: Option<String>,
    #[diesel(sql_type = Bool)]
    pub primary_key: bool,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TableStructure {
    pub table: String,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DebugSnapshot {
    pub success: bool,
    pub table_structure: Vec<TableStructure>,
    pub recent_brews: Vec<BrewRecord>,
}

#[derive(Serialize, Debug)]
pub struct SetupReport {
    pub success: bool,
    pub message: String,
    pub applied: Vec<String>,
}
