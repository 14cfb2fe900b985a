//! HTTP API tests
//!
//! The router runs against the in-memory store and a stub postal lookup, so
//! these tests need neither a database nor network access.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use domain_address::NewAddress;
use interface_api::{create_router, AppState};
use test_utils::{
    assert_field_error, assert_has_field_error, assert_message, AddressFixtures, InMemoryStore,
    StubPostalLookup,
};

const ADDRESS_NOT_FOUND: &str = "O endereço procurado não existe na base atual.";
const PERSON_NOT_FOUND: &str = "A pessoa procurada não existe na base atual.";

fn se_address() -> NewAddress {
    NewAddress {
        cep: "01001000".to_string(),
        uf: "SP".to_string(),
        bairro: "Sé".to_string(),
        cidade: "São Paulo".to_string(),
        logradouro: "Praça da Sé".to_string(),
        complemento: "lado ímpar".to_string(),
    }
}

struct TestApp {
    server: TestServer,
    store: Arc<InMemoryStore>,
    lookup: StubPostalLookup,
}

fn app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let lookup = StubPostalLookup::new()
        .with_address(se_address())
        .with_status("12345678", 400)
        .with_malformed("11111111")
        .with_address(NewAddress {
            cep: "22222222".to_string(),
            logradouro: "R".repeat(120),
            ..se_address()
        });

    let state = AppState::new(store.clone(), store.clone(), Arc::new(lookup.clone()));
    let server = TestServer::new(create_router(state)).unwrap();
    TestApp { server, store, lookup }
}

fn teresina_json() -> Value {
    json!({
        "cep": "64082-550",
        "uf": "PI",
        "bairro": "Morada do Sol",
        "cidade": "Teresina",
        "logradouro": "Rua Alfa",
        "complemento": "Casa 2"
    })
}

async fn create_address(app: &TestApp) -> Value {
    let response = app.server.post("/api/enderecos/").json(&teresina_json()).await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn create_person(app: &TestApp, body: Value) -> Value {
    let response = app.server.post("/api/pessoas/").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

mod address_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_normalizes_postal_code() {
        let app = app();
        let created = create_address(&app).await;

        assert_eq!(created["cep"], "64082550");
        assert_eq!(created["cidade"], "Teresina");
        assert!(created["id"].is_string());

        let list: Value = app.server.get("/api/enderecos/").await.json();
        assert_eq!(list, json!([created]));
    }

    #[tokio::test]
    async fn test_create_reports_every_missing_field() {
        let app = app();
        let response = app.server.post("/api/enderecos/").json(&json!({"cep": "64082550"})).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        for field in ["uf", "bairro", "cidade", "logradouro", "complemento"] {
            assert_field_error(&body, field, "This field is required.");
        }
        assert!(body.get("cep").is_none());
        assert_eq!(app.store.address_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_non_digit_postal_code() {
        let app = app();
        let mut payload = teresina_json();
        payload["cep"] = json!("6408A-550");

        let response = app.server.post("/api/enderecos/").json(&payload).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_field_error(&response.json(), "cep", "Ensure this field contains only digits.");
    }

    #[tokio::test]
    async fn test_retrieve_unknown_is_not_found() {
        let app = app();

        let response = app
            .server
            .get("/api/enderecos/0190c2f0-7d2a-7c3e-8a1b-0123456789ab")
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_message(&response.json(), ADDRESS_NOT_FOUND);

        let response = app.server.get("/api/enderecos/not-an-id").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let app = app();
        let created = create_address(&app).await;
        let id = created["id"].as_str().unwrap();

        let response = app
            .server
            .put(&format!("/api/enderecos/{}", id))
            .json(&json!({"bairro": "Centro"}))
            .await;
        response.assert_status_ok();

        let updated: Value = response.json();
        assert_eq!(updated["bairro"], "Centro");
        assert_eq!(updated["cidade"], created["cidade"]);
        assert_eq!(updated["cep"], created["cep"]);
    }

    #[tokio::test]
    async fn test_update_validates_supplied_fields_only() {
        let app = app();
        let created = create_address(&app).await;
        let id = created["id"].as_str().unwrap();

        let response = app
            .server
            .put(&format!("/api/enderecos/{}", id))
            .json(&json!({"uf": "x".repeat(31)}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_has_field_error(&response.json(), "uf");
    }

    #[tokio::test]
    async fn test_delete_then_not_found() {
        let app = app();
        let created = create_address(&app).await;
        let path = format!("/api/enderecos/{}", created["id"].as_str().unwrap());

        app.server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        app.server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
        app.server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_all_cascades_to_persons() {
        let app = app();
        create_address(&app).await;
        create_person(
            &app,
            json!({"nome": "Ana", "idade": 30, "email": "ana@example.com", "endereco": teresina_json()}),
        )
        .await;
        create_person(&app, json!({"nome": "Bia", "idade": 25, "email": "bia@example.com"})).await;

        app.server.delete("/api/enderecos/").await.assert_status(StatusCode::NO_CONTENT);

        assert_eq!(app.store.address_count().await, 0);
        assert_eq!(app.store.person_count().await, 1);
        let persons: Value = app.server.get("/api/pessoas/").await.json();
        assert_eq!(persons[0]["email"], "bia@example.com");
    }

    #[tokio::test]
    async fn test_list_filters_by_field() {
        let app = app();
        create_address(&app).await;

        let list: Value = app
            .server
            .get("/api/enderecos/")
            .add_query_param("cep", "64082-550")
            .await
            .json();
        assert_eq!(list.as_array().unwrap().len(), 1);

        let list: Value = app
            .server
            .get("/api/enderecos/")
            .add_query_param("uf", "SP")
            .await
            .json();
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_filter() {
        let app = app();
        let response = app
            .server
            .get("/api/enderecos/")
            .add_query_param("rua", "x")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_has_field_error(&response.json(), "non_field_errors");
    }

    #[tokio::test]
    async fn test_numeric_postal_code_is_accepted() {
        let app = app();
        let mut payload = teresina_json();
        payload["cep"] = json!(64082550);
        let response = app.server.post("/api/enderecos/").json(&payload).await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Value>()["cep"], "64082550");
    }

    #[tokio::test]
    async fn test_mistyped_field_is_reported_on_that_field() {
        let app = app();
        let mut payload = teresina_json();
        payload["cidade"] = json!(["Teresina"]);
        let response = app.server.post("/api/enderecos/").json(&payload).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>(), json!({"cidade": ["Not a valid string."]}));
        assert_eq!(app.store.address_count().await, 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_non_field_error() {
        let app = app();
        let response = app
            .server
            .post("/api/enderecos/")
            .content_type("application/json")
            .bytes("{not json".into())
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_has_field_error(&response.json(), "non_field_errors");
    }
}

mod lookup_tests {
    use super::*;

    #[tokio::test]
    async fn test_stored_code_needs_no_lookup() {
        let app = app();
        let created = create_address(&app).await;

        let response = app.server.get("/api/enderecos/busca_cep/64.082-550").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({"sucesso": true, "endereco": created}));

        assert_eq!(app.lookup.calls(), 0);
        assert_eq!(app.store.address_count().await, 1);
    }

    #[tokio::test]
    async fn test_missing_code_is_fetched_and_stored_once() {
        let app = app();

        let response = app.server.get("/api/enderecos/busca_cep/01001-000").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["sucesso"], true);
        assert_eq!(body["endereco"]["cep"], "01001000");
        assert_eq!(body["endereco"]["cidade"], "São Paulo");
        assert_eq!(app.store.address_count().await, 1);

        let again: Value = app.server.get("/api/enderecos/busca_cep/01001000").await.json();
        assert_eq!(again, body);
        assert_eq!(app.lookup.calls(), 1);
        assert_eq!(app.store.address_count().await, 1);
    }

    #[tokio::test]
    async fn test_upstream_status_is_passed_through() {
        let app = app();
        let response = app.server.get("/api/enderecos/busca_cep/12345-678").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_message(&response.json(), "Falha na busca pelo cep 12345678!");
        assert_eq!(app.store.address_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let app = app();
        let response = app.server.get("/api/enderecos/busca_cep/99999999").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_message(&response.json(), "Falha na busca pelo cep 99999999!");
    }

    #[tokio::test]
    async fn test_malformed_upstream_data_is_bad_gateway() {
        let app = app();
        let response = app.server.get("/api/enderecos/busca_cep/11111111").await;
        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_eq!(app.store.address_count().await, 0);
    }

    #[tokio::test]
    async fn test_oversized_upstream_data_is_bad_gateway() {
        let app = app();
        let response = app.server.get("/api/enderecos/busca_cep/22222-222").await;
        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_eq!(app.store.address_count().await, 0);
    }
}

mod person_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_with_nested_address() {
        let app = app();
        let created = create_person(
            &app,
            json!({"nome": "Ana", "idade": 30, "email": "ana@example.com", "endereco": teresina_json()}),
        )
        .await;

        assert_eq!(created["nome"], "Ana");
        assert_eq!(created["endereco"]["cep"], "64082550");
        assert_eq!(app.store.address_count().await, 1);

        let address_id = created["endereco"]["id"].as_str().unwrap();
        let address: Value = app.server.get(&format!("/api/enderecos/{}", address_id)).await.json();
        assert_eq!(address, created["endereco"]);
    }

    #[tokio::test]
    async fn test_create_without_address_embeds_null() {
        let app = app();
        let created = create_person(&app, json!({"nome": "Bia", "idade": 25, "email": "bia@example.com"})).await;
        assert!(created["endereco"].is_null());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let app = app();
        create_person(&app, json!({"nome": "Ana", "idade": 30, "email": "ana@example.com"})).await;

        let response = app
            .server
            .post("/api/pessoas/")
            .json(&json!({"nome": "Outra", "idade": 40, "email": "ana@example.com", "endereco": teresina_json()}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>(), json!({"email": ["pessoa with this email already exists."]}));

        assert_eq!(app.store.person_count().await, 1);
        assert_eq!(app.store.address_count().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_nested_address_creates_nothing() {
        let app = app();
        let response = app
            .server
            .post("/api/pessoas/")
            .json(&json!({"nome": "Ana", "idade": 30, "email": "ana@example.com", "endereco": {"cep": "64082550"}}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_field_error(&body["endereco"], "cidade", "This field is required.");
        assert!(body["endereco"].get("cep").is_none());
        assert_eq!(app.store.person_count().await, 0);
        assert_eq!(app.store.address_count().await, 0);
    }

    #[tokio::test]
    async fn test_age_as_numeric_string_is_accepted() {
        let app = app();
        let created = create_person(&app, json!({"nome": "Ana", "idade": "30", "email": "ana@example.com"})).await;
        assert_eq!(created["idade"], 30);
    }

    #[tokio::test]
    async fn test_non_numeric_age_is_reported_on_its_field() {
        let app = app();
        let response = app
            .server
            .post("/api/pessoas/")
            .json(&json!({"nome": "Ana", "idade": "abc", "email": "ana@example.com"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>(), json!({"idade": ["A valid integer is required."]}));
        assert_eq!(app.store.person_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_rejects_null_fields() {
        let app = app();
        let created = create_person(&app, json!({"nome": "Ana", "idade": 30, "email": "ana@example.com"})).await;
        let path = format!("/api/pessoas/{}", created["id"].as_str().unwrap());

        let response = app
            .server
            .put(&path)
            .json(&json!({"nome": null, "idade": null, "email": null, "endereco": null}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        for field in ["nome", "idade", "email", "endereco"] {
            assert_field_error(&body, field, "This field may not be null.");
        }

        let unchanged: Value = app.server.get(&path).await.json();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn test_missing_age_is_required() {
        let app = app();
        let response = app
            .server
            .post("/api/pessoas/")
            .json(&json!({"nome": "Ana", "email": "ana@example.com"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_field_error(&response.json(), "idade", "This field is required.");
    }

    #[tokio::test]
    async fn test_partial_update_name_only() {
        let app = app();
        let created = create_person(&app, json!({"nome": "Ana", "idade": 30, "email": "ana@example.com"})).await;
        let path = format!("/api/pessoas/{}", created["id"].as_str().unwrap());

        let response = app.server.put(&path).json(&json!({"nome": "X"})).await;
        response.assert_status_ok();

        let updated: Value = response.json();
        assert_eq!(updated["nome"], "X");
        assert_eq!(updated["idade"], 30);
        assert_eq!(updated["email"], "ana@example.com");
    }

    #[tokio::test]
    async fn test_update_with_unknown_address_persists_nothing() {
        let app = app();
        let created = create_person(&app, json!({"nome": "Ana", "idade": 30, "email": "ana@example.com"})).await;
        let path = format!("/api/pessoas/{}", created["id"].as_str().unwrap());
        let missing = "0190c2f0-7d2a-7c3e-8a1b-0123456789ab";

        let response = app
            .server
            .put(&path)
            .json(&json!({"nome": "X", "endereco": missing}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_field_error(
            &response.json(),
            "endereco",
            &format!("Endereco com id {} nao encontrado.", missing),
        );

        let unchanged: Value = app.server.get(&path).await.json();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn test_update_links_existing_address() {
        let app = app();
        let address = create_address(&app).await;
        let created = create_person(&app, json!({"nome": "Ana", "idade": 30, "email": "ana@example.com"})).await;
        let path = format!("/api/pessoas/{}", created["id"].as_str().unwrap());

        let response = app.server.put(&path).json(&json!({"endereco": address["id"]})).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["endereco"], address);

        let by_address: Value = app
            .server
            .get("/api/pessoas/")
            .add_query_param("endereco", address["id"].as_str().unwrap())
            .await
            .json();
        assert_eq!(by_address.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_to_taken_email() {
        let app = app();
        create_person(&app, json!({"nome": "Ana", "idade": 30, "email": "ana@example.com"})).await;
        let bia = create_person(&app, json!({"nome": "Bia", "idade": 25, "email": "bia@example.com"})).await;
        let path = format!("/api/pessoas/{}", bia["id"].as_str().unwrap());

        let response = app.server.put(&path).json(&json!({"email": "ana@example.com"})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_field_error(&response.json(), "email", "pessoa with this email already exists.");

        let response = app.server.put(&path).json(&json!({"email": "bia@example.com"})).await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_retrieve_unknown_is_not_found() {
        let app = app();
        let response = app
            .server
            .get("/api/pessoas/0190c2f0-7d2a-7c3e-8a1b-0123456789ab")
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_message(&response.json(), PERSON_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_one_and_all() {
        let app = app();
        let ana = create_person(&app, json!({"nome": "Ana", "idade": 30, "email": "ana@example.com"})).await;
        create_person(&app, json!({"nome": "Bia", "idade": 25, "email": "bia@example.com"})).await;
        create_person(&app, json!({"nome": "Caio", "idade": 20, "email": "caio@example.com"})).await;

        app.server
            .delete(&format!("/api/pessoas/{}", ana["id"].as_str().unwrap()))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        assert_eq!(app.store.person_count().await, 2);

        app.server.delete("/api/pessoas/").await.assert_status(StatusCode::NO_CONTENT);
        assert_eq!(app.store.person_count().await, 0);
    }

    #[tokio::test]
    async fn test_filter_by_age() {
        let app = app();
        create_person(&app, json!({"nome": "Ana", "idade": 30, "email": "ana@example.com"})).await;
        create_person(&app, json!({"nome": "Bia", "idade": 25, "email": "bia@example.com"})).await;

        let list: Value = app
            .server
            .get("/api/pessoas/")
            .add_query_param("idade", "25")
            .await
            .json();
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["nome"], "Bia");

        let response = app
            .server
            .get("/api/pessoas/")
            .add_query_param("idade", "old")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_has_field_error(&response.json(), "idade");
    }
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let app = app();
        let response = app.server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_follows_store_health() {
        let app = app();
        let response = app.server.get("/health/ready").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "ready");

        app.store.set_healthy(false);
        let response = app.server.get("/health/ready").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.json::<Value>()["status"], "unavailable");
    }
}

#[tokio::test]
async fn test_fixture_address_round_trips_through_lookup() {
    let store = Arc::new(InMemoryStore::new());
    let lookup = StubPostalLookup::new().with_address(AddressFixtures::teresina());
    let state = AppState::new(store.clone(), store.clone(), Arc::new(lookup));
    let server = TestServer::new(create_router(state)).unwrap();

    let body: Value = server
        .get(&format!("/api/enderecos/busca_cep/{}", AddressFixtures::TERESINA_CEP))
        .await
        .json();
    assert_eq!(body["endereco"]["bairro"], "Morada do Sol");
}
