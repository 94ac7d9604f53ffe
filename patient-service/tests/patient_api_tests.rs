mod common;

use common::external;
use common::StubPatientSource;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

async fn create(app: &TestApp, token: &str, name: &str, email: &str) -> Value {
    let response = app
        .post_authenticated("/patients", token)
        .json(&json!({ "name": name, "email": email, "phone": "+55 11 99999-9999" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
async fn test_patients_require_authentication() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/patients")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .post("/patients/import-data?count=5")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_and_get_patient() {
    let app = TestApp::spawn().await;
    let token = app.token().await;

    let created = create(&app, &token, "  Ana Souza ", "ana@x.com").await;
    assert_eq!(created["data"]["name"], "Ana Souza");
    assert_eq!(created["data"]["email"], "ana@x.com");
    assert!(created["data"]["updated_at"].is_null());

    let id = created["data"]["id"].as_str().unwrap();
    let response = app
        .get_authenticated(&format!("/patients/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Value = response.json().await.unwrap();
    assert_eq!(fetched["data"], created["data"]);
}

#[tokio::test]
async fn test_create_patient_duplicate_email() {
    let app = TestApp::spawn().await;
    let token = app.token().await;
    create(&app, &token, "Ana Souza", "ana@x.com").await;

    let response = app
        .post_authenticated("/patients", &token)
        .json(&json!({ "name": "Ana Lima", "email": "ana@x.com", "phone": "0123456789" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Email already exists");
}

#[tokio::test]
async fn test_create_patient_validation() {
    let app = TestApp::spawn().await;
    let token = app.token().await;

    let response = app
        .post_authenticated("/patients", &token)
        .json(&json!({ "name": "R2-D2", "email": "r2@x.com", "phone": "beep" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    let fields: Vec<&str> = body["data"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["name", "phone"]);
}

#[tokio::test]
async fn test_create_patient_phone_longer_than_column() {
    let app = TestApp::spawn().await;
    let token = app.token().await;

    let response = app
        .post_authenticated("/patients", &token)
        .json(&json!({ "name": "Ana Souza", "email": "ana@x.com", "phone": "+12345678901234567890" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["details"][0]["field"], "phone");
}

#[tokio::test]
async fn test_create_patient_missing_field() {
    let app = TestApp::spawn().await;
    let token = app.token().await;

    let response = app
        .post_authenticated("/patients", &token)
        .json(&json!({ "name": "Ana Souza", "email": "ana@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("missing field `phone`"));
    assert!(app.patients.is_empty().await);
}

#[tokio::test]
async fn test_get_unknown_patient() {
    let app = TestApp::spawn().await;
    let token = app.token().await;

    for id in ["00000000-0000-0000-0000-000000000000", "not-a-uuid"] {
        let response = app
            .get_authenticated(&format!("/patients/{}", id), &token)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["data"]["message"], "Patient not found");
    }
}

#[tokio::test]
async fn test_list_patients_search_and_pagination() {
    let app = TestApp::spawn().await;
    let token = app.token().await;
    create(&app, &token, "Ana Souza", "ana@x.com").await;
    create(&app, &token, "Bruno Lima", "bruno@x.com").await;
    create(&app, &token, "Mariana Alves", "mariana@x.com").await;

    let names = |body: &Value| -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect()
    };

    let all: Value = app
        .get_authenticated("/patients", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(names(&all), ["Mariana Alves", "Bruno Lima", "Ana Souza"]);

    let searched: Value = app
        .get_authenticated("/patients?search=AN", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(names(&searched), ["Mariana Alves", "Ana Souza"]);

    let paged: Value = app
        .get_authenticated("/patients?skip=1&limit=1", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(names(&paged), ["Bruno Lima"]);
}

#[tokio::test]
async fn test_list_patients_rejects_bad_parameters() {
    let app = TestApp::spawn().await;
    let token = app.token().await;

    for query in ["limit=0", "limit=1001", "search=a", "skip=-1", "limit=ten"] {
        let response = app
            .get_authenticated(&format!("/patients?{}", query), &token)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{query}");
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["status_code"], 400, "{query}");
    }
}

#[tokio::test]
async fn test_update_patient_partially() {
    let app = TestApp::spawn().await;
    let token = app.token().await;
    let created = create(&app, &token, "Ana Souza", "ana@x.com").await;
    create(&app, &token, "Bruno Lima", "bruno@x.com").await;
    let path = format!("/patients/{}", created["data"]["id"].as_str().unwrap());

    let response = app
        .put_authenticated(&path, &token)
        .json(&json!({ "phone": "(11) 4002-8922" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["data"]["name"], "Ana Souza");
    assert_eq!(updated["data"]["phone"], "(11) 4002-8922");
    assert!(updated["data"]["updated_at"].is_string());

    let response = app
        .put_authenticated(&path, &token)
        .json(&json!({ "email": "bruno@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .put_authenticated("/patients/00000000-0000-0000-0000-000000000000", &token)
        .json(&json!({ "name": "Nobody Here" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_patient() {
    let app = TestApp::spawn().await;
    let token = app.token().await;
    let created = create(&app, &token, "Ana Souza", "ana@x.com").await;
    let path = format!("/patients/{}", created["data"]["id"].as_str().unwrap());

    let response = app
        .delete_authenticated(&path, &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Patient deleted successfully");

    let response = app
        .delete_authenticated(&path, &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_import_is_best_effort_and_idempotent() {
    let app = TestApp::spawn_with_source(StubPatientSource::with_records(vec![
        external("Leanne Graham", "Sincere@april.biz", "1-770-736-8031"),
        external("Ervin Howell", "Shanna@melissa.tv", "010-692-6593"),
        external("Chelsey Dietrich", "Lucio_Hettinger@annie.ca", "(254)954-1289"),
        external("Clementine Bauch", "Nathan@yesenia.net", "210.067.6132"),
    ]))
    .await;
    let token = app.token().await;

    let response = app
        .post_authenticated("/patients/import-data?count=4", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let first: Value = response.json().await.unwrap();
    assert_eq!(first["data"]["imported"], 3);
    assert_eq!(first["data"]["skipped"], 0);
    assert_eq!(first["data"]["failed"], 1);
    assert_eq!(
        first["data"]["message"],
        "Successfully imported 3 patients from external API"
    );

    let second: Value = app
        .post_authenticated("/patients/import-data?count=4", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["data"]["imported"], 0);
    assert_eq!(second["data"]["skipped"], 3);
    assert_eq!(second["data"]["failed"], 1);

    assert_eq!(app.patients.len().await, 3);
}

#[tokio::test]
async fn test_import_count_bounds() {
    let app = TestApp::spawn().await;
    let token = app.token().await;

    for count in ["0", "101", "many"] {
        let response = app
            .post_authenticated(&format!("/patients/import-data?count={}", count), &token)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["status_code"], 400);
    }
}

#[tokio::test]
async fn test_import_source_unavailable() {
    let app = TestApp::spawn_with_source(StubPatientSource::unavailable()).await;
    let token = app.token().await;

    let response = app
        .post_authenticated("/patients/import-data", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Error importing data");
    assert!(app.patients.is_empty().await);
}
