use brewlog::{AppConfig, AppState, DatabaseService, JournalService, RecordingRefresh};
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use serde_json::{Value, json};
use serial_test::serial;
use std::sync::Arc;
use tempfile::TempDir;

struct TestRocket {
    rocket: rocket::Rocket<rocket::Build>,
    _temp_dir: TempDir, // Keep alive for cleanup
}

fn create_test_rocket(debug_endpoints: bool) -> TestRocket {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let database_url = temp_dir.path().join("brewlog.db").to_string_lossy().to_string();

    let config = AppConfig {
        database_url: Some(database_url.clone()),
        debug_endpoints,
        ..AppConfig::default()
    };

    let database =
        Arc::new(DatabaseService::new(&database_url).expect("Failed to initialize database"));
    let journal = Arc::new(JournalService::new(
        Some(database),
        Arc::new(RecordingRefresh::new()),
    ));

    TestRocket {
        rocket: brewlog::build_rocket(AppState { config, journal }),
        _temp_dir: temp_dir,
    }
}

fn create_unconfigured_rocket() -> rocket::Rocket<rocket::Build> {
    let journal = Arc::new(JournalService::new(None, Arc::new(RecordingRefresh::new())));
    brewlog::build_rocket(AppState {
        config: AppConfig::default(),
        journal,
    })
}

fn client() -> (Client, TempDir) {
    let test_rocket = create_test_rocket(false);
    let client = Client::tracked(test_rocket.rocket).expect("valid rocket instance");
    (client, test_rocket._temp_dir)
}

fn json_body(response: rocket::local::blocking::LocalResponse<'_>) -> Value {
    let body = response.into_string().expect("Response body");
    serde_json::from_str(&body).expect("Valid JSON")
}

fn boa_vista() -> Value {
    json!({
        "name": "Sítio Boa Vista",
        "region": "Mantiqueira",
        "producer": "X",
        "variety": "Catuaí",
        "process": "Natural",
        "altitude": "1200m",
        "sensoryProfile": "chocolate, caramelo"
    })
}

fn v60(coffee_id: i64) -> Value {
    json!({
        "coffeeId": coffee_id,
        "dose": 20,
        "waterAmount": 300,
        "brewingMethod": "V60",
        "waterTemperature": 92,
        "grinderSetting": 20,
        "extractionTime": 180,
        "acidity": 7,
        "sweetness": 6,
        "body": 5,
        "brewDate": "2024-01-01",
        "brewTime": "08:00"
    })
}

fn create_coffee(client: &Client) -> i64 {
    let response = client
        .post("/api/v1/coffees")
        .header(ContentType::JSON)
        .body(boa_vista().to_string())
        .dispatch();
    assert_eq!(response.status(), Status::Created);
    json_body(response)["data"]["id"].as_i64().expect("coffee id")
}

fn create_brew(client: &Client, body: Value) -> Value {
    let response = client
        .post("/api/v1/brews")
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch();
    assert_eq!(response.status(), Status::Created);
    json_body(response)["data"].clone()
}

#[test]
#[serial]
fn test_health_check() {
    let (client, _dir) = client();
    let response = client.get("/api/v1/health").dispatch();

    assert_eq!(response.status(), Status::Ok);
    let json = json_body(response);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "configured");
}

#[test]
#[serial]
fn test_coffee_round_trip() {
    let (client, _dir) = client();
    let id = create_coffee(&client);

    let response = client.get(format!("/api/v1/coffees/{id}")).dispatch();
    assert_eq!(response.status(), Status::Ok);

    let coffee = json_body(response);
    for (field, value) in boa_vista().as_object().unwrap() {
        assert_eq!(&coffee[field], value, "field {field}");
    }
    assert_eq!(coffee["rating"], 0.0);

    let list = json_body(client.get("/api/v1/coffees").dispatch());
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[test]
#[serial]
fn test_create_coffee_with_empty_field_is_rejected() {
    let (client, _dir) = client();
    let mut body = boa_vista();
    body["variety"] = json!("");

    let response = client
        .post("/api/v1/coffees")
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch();

    assert_eq!(response.status(), Status::BadRequest);
    assert!(json_body(response)["error"].as_str().unwrap().contains("variety"));

    let list = json_body(client.get("/api/v1/coffees").dispatch());
    assert!(list.as_array().unwrap().is_empty());
}

#[test]
#[serial]
fn test_update_coffee() {
    let (client, _dir) = client();
    let id = create_coffee(&client);

    let mut body = boa_vista();
    body["process"] = json!("Honey");

    let response = client
        .put(format!("/api/v1/coffees/{id}"))
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let json = json_body(response);
    assert_eq!(json["data"]["process"], "Honey");
    assert_eq!(json["revalidated"], json!(["/coffees", format!("/coffees/{id}")]));

    let response = client
        .put("/api/v1/coffees/9999")
        .header(ContentType::JSON)
        .body(boa_vista().to_string())
        .dispatch();
    assert_eq!(response.status(), Status::NotFound);
}

#[test]
#[serial]
fn test_create_brew_computes_ratio() {
    let (client, _dir) = client();
    let coffee_id = create_coffee(&client);

    let brew = create_brew(&client, v60(coffee_id));
    assert_eq!(brew["ratio"], "1:15.0");
    assert_eq!(brew["coffee"]["id"], coffee_id);
    assert_eq!(brew["coffee"]["name"], "Sítio Boa Vista");
    assert_eq!(brew["brewDate"], "2024-01-01");

    let id = brew["id"].as_i64().unwrap();
    let fetched = json_body(client.get(format!("/api/v1/brews/{id}")).dispatch());
    assert_eq!(fetched, brew);
}

#[test]
#[serial]
fn test_create_brew_missing_field_is_rejected() {
    let (client, _dir) = client();
    let coffee_id = create_coffee(&client);

    let mut body = v60(coffee_id);
    body.as_object_mut().unwrap().remove("extractionTime");

    let response = client
        .post("/api/v1/brews")
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch();

    assert_eq!(response.status(), Status::BadRequest);
    assert!(
        json_body(response)["error"]
            .as_str()
            .unwrap()
            .contains("extractionTime")
    );

    let list = json_body(client.get("/api/v1/brews").dispatch());
    assert!(list.as_array().unwrap().is_empty());
}

#[test]
#[serial]
fn test_update_brew_leaves_siblings_alone() {
    let (client, _dir) = client();
    let coffee_id = create_coffee(&client);
    let first = create_brew(&client, v60(coffee_id));
    let second = create_brew(&client, v60(coffee_id));

    let mut changes = v60(coffee_id);
    changes["dose"] = json!(18);
    changes["notes"] = json!("too bright");

    let response = client
        .put(format!("/api/v1/brews/{}", first["id"]))
        .header(ContentType::JSON)
        .body(changes.to_string())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);

    let updated = json_body(response)["data"].clone();
    assert_eq!(updated["ratio"], "1:16.7");
    assert_eq!(updated["notes"], "too bright");

    let sibling = json_body(client.get(format!("/api/v1/brews/{}", second["id"])).dispatch());
    assert_eq!(sibling, second);
}

#[test]
#[serial]
fn test_delete_coffee_cascades() {
    let (client, _dir) = client();
    let coffee_id = create_coffee(&client);
    for _ in 0..3 {
        create_brew(&client, v60(coffee_id));
    }

    let response = client.delete(format!("/api/v1/coffees/{coffee_id}")).dispatch();
    assert_eq!(response.status(), Status::Ok);

    let json = json_body(response);
    assert_eq!(json["success"], true);
    assert_eq!(json["redirect"], "/coffees");

    let brews = json_body(client.get("/api/v1/brews").dispatch());
    assert!(brews.as_array().unwrap().is_empty());

    let response = client.get(format!("/api/v1/coffees/{coffee_id}")).dispatch();
    assert_eq!(response.status(), Status::NotFound);
}

#[test]
#[serial]
fn test_delete_coffee_with_invalid_id() {
    let (client, _dir) = client();
    let response = client.delete("/api/v1/coffees/abc").dispatch();

    assert_eq!(response.status(), Status::BadRequest);
    assert!(json_body(response)["error"].as_str().is_some());
}

#[test]
#[serial]
fn test_delete_brew_redirects_and_rerates() {
    let (client, _dir) = client();
    let coffee_id = create_coffee(&client);

    let mut rated = v60(coffee_id);
    rated["rating"] = json!(4.5);
    let kept = create_brew(&client, rated);
    assert_eq!(kept["coffee"]["rating"], 4.5);

    let mut low = v60(coffee_id);
    low["rating"] = json!(2.5);
    let dropped = create_brew(&client, low);
    assert_eq!(dropped["coffee"]["rating"], 3.5);

    let response = client
        .delete(format!("/api/v1/brews/{}", dropped["id"]))
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(json_body(response)["redirect"], "/brews");

    let coffee = json_body(client.get(format!("/api/v1/coffees/{coffee_id}")).dispatch());
    assert_eq!(coffee["rating"], 4.5);
}

#[test]
#[serial]
fn test_coffee_brew_history() {
    let (client, _dir) = client();
    let coffee_id = create_coffee(&client);
    for _ in 0..6 {
        create_brew(&client, v60(coffee_id));
    }

    let history = json_body(
        client
            .get(format!("/api/v1/coffees/{coffee_id}/brews"))
            .dispatch(),
    );
    assert_eq!(history.as_array().unwrap().len(), 5);

    let history = json_body(
        client
            .get(format!("/api/v1/coffees/{coffee_id}/brews?limit=2"))
            .dispatch(),
    );
    assert_eq!(history.as_array().unwrap().len(), 2);
}

#[test]
#[serial]
fn test_ratio_preview() {
    let (client, _dir) = client();

    let json = json_body(
        client
            .get("/api/v1/brews/ratio?dose=20&water_amount=300")
            .dispatch(),
    );
    assert_eq!(json["ratio"], "1:15.0");

    let json = json_body(
        client
            .get("/api/v1/brews/ratio?dose=0&water_amount=300")
            .dispatch(),
    );
    assert_eq!(json["ratio"], "1:0");

    let response = client.get("/api/v1/brews/ratio?dose=20").dispatch();
    assert_eq!(response.status(), Status::BadRequest);
}

#[test]
#[serial]
fn test_setup_is_idempotent() {
    let (client, _dir) = client();
    let coffee_id = create_coffee(&client);

    for _ in 0..2 {
        let response = client.post("/api/v1/setup").dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(json_body(response)["success"], true);
    }

    let response = client.get(format!("/api/v1/coffees/{coffee_id}")).dispatch();
    assert_eq!(response.status(), Status::Ok);
}

#[test]
#[serial]
fn test_debug_endpoint_is_opt_in() {
    let (client, _dir) = client();
    let response = client.get("/api/v1/debug").dispatch();
    assert_eq!(response.status(), Status::NotFound);

    let test_rocket = create_test_rocket(true);
    let client = Client::tracked(test_rocket.rocket).expect("valid rocket instance");
    let response = client.get("/api/v1/debug").dispatch();
    assert_eq!(response.status(), Status::Ok);

    let json = json_body(response);
    assert_eq!(json["success"], true);
    assert_eq!(json["tableStructure"].as_array().unwrap().len(), 2);
    assert!(json["recentBrews"].as_array().unwrap().is_empty());
}

#[test]
#[serial]
fn test_without_database() {
    let client = Client::tracked(create_unconfigured_rocket()).expect("valid rocket instance");

    let json = json_body(client.get("/api/v1/health").dispatch());
    assert_eq!(json["database"], "unconfigured");

    let response = client.get("/api/v1/coffees").dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert!(json_body(response).as_array().unwrap().is_empty());

    let response = client.get("/api/v1/coffees/1").dispatch();
    assert_eq!(response.status(), Status::NotFound);

    let response = client
        .post("/api/v1/coffees")
        .header(ContentType::JSON)
        .body(boa_vista().to_string())
        .dispatch();
    assert_eq!(response.status(), Status::ServiceUnavailable);
}

#[test]
#[serial]
fn test_coffee_list_search_and_min_rating() {
    let (client, _dir) = client();
    let boa_vista_id = create_coffee(&client);

    let mut washed = boa_vista();
    washed["name"] = json!("Finca La Esperanza");
    washed["region"] = json!("Huila");
    washed["process"] = json!("Washed");
    let response = client
        .post("/api/v1/coffees")
        .header(ContentType::JSON)
        .body(washed.to_string())
        .dispatch();
    assert_eq!(response.status(), Status::Created);

    let mut rated = v60(boa_vista_id);
    rated["rating"] = json!(4.0);
    create_brew(&client, rated);

    let found = json_body(client.get("/api/v1/coffees?q=huila").dispatch());
    let names: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Finca La Esperanza"]);

    let found = json_body(client.get("/api/v1/coffees?q=NATURAL").dispatch());
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["id"], boa_vista_id);

    let found = json_body(client.get("/api/v1/coffees?min_rating=3.5").dispatch());
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["id"], boa_vista_id);

    let found = json_body(client.get("/api/v1/coffees?q=huila&min_rating=3.5").dispatch());
    assert!(found.as_array().unwrap().is_empty());

    let found = json_body(client.get("/api/v1/coffees?q=%20").dispatch());
    assert_eq!(found.as_array().unwrap().len(), 2);

    let response = client.get("/api/v1/coffees?min_rating=9").dispatch();
    assert_eq!(response.status(), Status::BadRequest);
}

#[test]
#[serial]
fn test_brew_list_min_rating() {
    let (client, _dir) = client();
    let coffee_id = create_coffee(&client);

    for rating in [1.0, 3.0, 4.5] {
        let mut body = v60(coffee_id);
        body["rating"] = json!(rating);
        create_brew(&client, body);
    }

    let brews = json_body(client.get("/api/v1/brews?min_rating=3").dispatch());
    let ratings: Vec<f64> = brews
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["rating"].as_f64().unwrap())
        .collect();
    assert_eq!(ratings, vec![4.5, 3.0]);

    let brews = json_body(client.get("/api/v1/brews").dispatch());
    assert_eq!(brews.as_array().unwrap().len(), 3);
}

#[test]
#[serial]
fn test_malformed_json_gets_json_error() {
    let (client, _dir) = client();
    let response = client
        .post("/api/v1/coffees")
        .header(ContentType::JSON)
        .body("{\"name\": ")
        .dispatch();

    assert_eq!(response.status(), Status::BadRequest);
    assert!(json_body(response)["error"].is_string());
}

#[test]
#[serial]
fn test_tiny_dose_is_rejected() {
    let (client, _dir) = client();
    let coffee_id = create_coffee(&client);

    let mut body = v60(coffee_id);
    body["dose"] = json!(1e-320);
    let response = client
        .post("/api/v1/brews")
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
    assert!(json_body(response)["error"].as_str().unwrap().contains("Dose"));

    let response = client
        .get("/api/v1/brews/ratio?dose=0.000001&water_amount=300")
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);

    let brews = json_body(client.get("/api/v1/brews").dispatch());
    assert!(brews.as_array().unwrap().is_empty());
}
