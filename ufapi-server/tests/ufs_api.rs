//! End-to-end tests of the UF endpoints against the in-memory store

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use ufapi_server::{
    build_router, AppState, DbError, FederativeUnit, MemoryUfStore, NewUf, ServerConfig,
    UfChanges, UfStore,
};

struct TestApp {
    router: Router,
    store: Arc<MemoryUfStore>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(MemoryUfStore::new());
        let router = build_router(AppState::new(store.clone()), &ServerConfig::default());
        Self { router, store }
    }

    /// The two records every scenario starts from.
    async fn seeded() -> (Self, FederativeUnit, FederativeUnit) {
        let app = Self::new();
        let pr = app.seed("Paraná", "PR", 41).await;
        let sc = app.seed("Santa Catarina", "SC", 42).await;
        (app, pr, sc)
    }

    async fn seed(&self, name: &str, abbreviation: &str, ibge_code: i32) -> FederativeUnit {
        self.store
            .create(NewUf {
                name: name.into(),
                abbreviation: abbreviation.into(),
                ibge_code,
            })
            .await
            .expect("seed failed")
    }

    async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send(self.router.clone(), method, uri, body).await
    }
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn detail(id: i64) -> String {
    format!("/api/ufs/{id}/")
}

// === Create ===

#[tokio::test]
async fn create_uf_success() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            "POST",
            "/api/ufs/",
            Some(json!({"nome": "Paraná", "sigla": "PR", "codigo_ibge": 41})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["nome"], "Paraná");
    assert_eq!(body["sigla"], "PR");
    assert_eq!(body["codigo_ibge"], 41);
    let id = body["id"].as_i64().expect("id assigned");

    // round trip through the store
    let stored = app.store.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(serde_json::to_value(&stored).unwrap(), body);
}

#[tokio::test]
async fn create_assigns_fresh_ids() {
    let (app, pr, sc) = TestApp::seeded().await;

    let (_, body) = app
        .request(
            "POST",
            "/api/ufs/",
            Some(json!({"nome": "Sao Paulo", "sigla": "SP", "codigo_ibge": 35})),
        )
        .await;
    let id = body["id"].as_i64().unwrap();
    assert_ne!(id, pr.id);
    assert_ne!(id, sc.id);
}

#[tokio::test]
async fn create_uf_invalid_sigla_length() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            "POST",
            "/api/ufs/",
            Some(json!({"nome": "Rio de Janeiro", "sigla": "RJJ", "codigo_ibge": 33})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("sigla").is_some());
    assert!(app.store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_uf_invalid_sigla_format() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            "POST",
            "/api/ufs/",
            Some(json!({"nome": "Rio de Janeiro", "sigla": "R1", "codigo_ibge": 33})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["sigla"][0], "Sigla deve conter apenas 2 letras maiúsculas.");
}

#[tokio::test]
async fn create_uf_missing_field() {
    let app = TestApp::new();

    let (status, body) = app
        .request("POST", "/api/ufs/", Some(json!({"nome": "Acre", "sigla": "AC"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"codigo_ibge": ["Este campo é obrigatório."]}));
}

#[tokio::test]
async fn null_characters_are_rejected_before_the_store() {
    let (app, pr, _) = TestApp::seeded().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/ufs/",
            Some(json!({"nome": "Rio\u{0}", "sigla": "R\u{0}", "codigo_ibge": 33})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "nome": ["Caracteres nulos não são permitidos."],
            "sigla": ["Caracteres nulos não são permitidos."],
        })
    );
    assert_eq!(app.store.list_all().await.unwrap().len(), 2);

    let (status, body) = app
        .request("PATCH", &detail(pr.id), Some(json!({"nome": "Para\u{0}ná"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"nome": ["Caracteres nulos não são permitidos."]}));
    assert_eq!(app.store.get_by_id(pr.id).await.unwrap(), Some(pr));
}

#[tokio::test]
async fn create_rejects_non_object_body() {
    let app = TestApp::new();

    let (status, body) = app.request("POST", "/api/ufs/", Some(json!(["PR"]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["non_field_errors"][0],
        "Dados inválidos. Esperado um dicionário, mas recebido list."
    );
}

#[tokio::test]
async fn create_rejects_unparseable_json() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/api/ufs/")
        .header("content-type", "application/json")
        .body(Body::from("{\"nome\": "))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn create_duplicate_is_internal_error() {
    let (app, _, _) = TestApp::seeded().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/ufs/",
            Some(json!({"nome": "Outro", "sigla": "PR", "codigo_ibge": 99})),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Erro interno ao criar UF."}));
}

// === List / retrieve ===

#[tokio::test]
async fn list_ufs_ordered_by_name() {
    let app = TestApp::new();
    app.seed("Santa Catarina", "SC", 42).await;
    app.seed("Bahia", "BA", 29).await;
    app.seed("Paraná", "PR", 41).await;

    let (status, body) = app.request("GET", "/api/ufs/", None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|uf| uf["nome"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bahia", "Paraná", "Santa Catarina"]);
}

#[tokio::test]
async fn list_empty_is_empty_array() {
    let app = TestApp::new();
    let (status, body) = app.request("GET", "/api/ufs/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn retrieve_uf() {
    let (app, pr, _) = TestApp::seeded().await;

    let (status, body) = app.request("GET", &detail(pr.id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": pr.id, "nome": "Paraná", "sigla": "PR", "codigo_ibge": 41})
    );
}

#[tokio::test]
async fn retrieve_uf_not_found() {
    let (app, _, _) = TestApp::seeded().await;

    let (status, body) = app.request("GET", &detail(999), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "UF não encontrada."}));
}

// === Update ===

#[tokio::test]
async fn update_uf() {
    let (app, pr, _) = TestApp::seeded().await;

    let (status, body) = app
        .request(
            "PUT",
            &detail(pr.id),
            Some(json!({"nome": "Parana Alterado", "sigla": "PR", "codigo_ibge": 410})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nome"], "Parana Alterado");
    assert_eq!(body["codigo_ibge"], 410);

    let stored = app.store.get_by_id(pr.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Parana Alterado");
}

#[tokio::test]
async fn update_requires_every_field() {
    let (app, pr, _) = TestApp::seeded().await;

    let (status, body) = app
        .request("PUT", &detail(pr.id), Some(json!({"nome": "Só o nome"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("sigla").is_some());
    assert!(body.get("codigo_ibge").is_some());
    assert_eq!(app.store.get_by_id(pr.id).await.unwrap(), Some(pr));
}

#[tokio::test]
async fn update_missing_id_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            "PUT",
            &detail(999),
            Some(json!({"nome": "X", "sigla": "XX", "codigo_ibge": 1})),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "UF não encontrada ou nenhum dado alterado.");
}

#[tokio::test]
async fn partial_update_uf() {
    let (app, _, sc) = TestApp::seeded().await;

    let (status, body) = app
        .request(
            "PATCH",
            &detail(sc.id),
            Some(json!({"nome": "Santa Catarina Alterado"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nome"], "Santa Catarina Alterado");
    assert_eq!(body["sigla"], "SC");
    assert_eq!(body["codigo_ibge"], 42);

    let stored = app.store.get_by_id(sc.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Santa Catarina Alterado");
    assert_eq!(stored.abbreviation, sc.abbreviation);
    assert_eq!(stored.ibge_code, sc.ibge_code);
}

#[tokio::test]
async fn partial_update_validates_supplied_fields() {
    let (app, pr, _) = TestApp::seeded().await;

    let (status, body) = app
        .request("PATCH", &detail(pr.id), Some(json!({"sigla": "pr"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"sigla": ["Sigla deve conter apenas 2 letras maiúsculas."]}));
}

#[tokio::test]
async fn partial_update_conflict_is_internal_error() {
    let (app, _, sc) = TestApp::seeded().await;

    let (status, body) = app
        .request("PATCH", &detail(sc.id), Some(json!({"codigo_ibge": 41})))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Erro interno ao atualizar UF parcialmente.");
}

// === Delete ===

#[tokio::test]
async fn delete_uf() {
    let app = TestApp::new();
    let pd = app.seed("Para Deletar", "PD", 99).await;

    let (status, body) = app.request("DELETE", &detail(pd.id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    assert_eq!(app.store.get_by_id(pd.id).await.unwrap(), None);
    let (status, _) = app.request("GET", &detail(pd.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_uf_not_found() {
    let app = TestApp::new();
    let (status, body) = app.request("DELETE", &detail(999), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "UF não encontrada.");
}

#[tokio::test]
async fn delete_twice_is_not_found_the_second_time() {
    let (app, pr, _) = TestApp::seeded().await;

    let (first, _) = app.request("DELETE", &detail(pr.id), None).await;
    let (second, _) = app.request("DELETE", &detail(pr.id), None).await;

    assert_eq!(first, StatusCode::NO_CONTENT);
    assert_eq!(second, StatusCode::NOT_FOUND);
}

// === Store failures ===

/// Every call fails as if the database were down.
struct DownStore;

fn down() -> DbError {
    DbError::Unavailable(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl UfStore for DownStore {
    async fn create(&self, _: NewUf) -> Result<FederativeUnit, DbError> {
        Err(down())
    }
    async fn list_all(&self) -> Result<Vec<FederativeUnit>, DbError> {
        Err(down())
    }
    async fn get_by_id(&self, _: i64) -> Result<Option<FederativeUnit>, DbError> {
        Err(down())
    }
    async fn update(&self, _: i64, _: UfChanges) -> Result<u64, DbError> {
        Err(down())
    }
    async fn delete(&self, _: i64) -> Result<u64, DbError> {
        Err(down())
    }
    async fn ping(&self) -> Result<(), DbError> {
        Err(down())
    }
}

#[tokio::test]
async fn store_failures_are_generic_500s() {
    let router = build_router(AppState::new(Arc::new(DownStore)), &ServerConfig::default());
    let full = json!({"nome": "Paraná", "sigla": "PR", "codigo_ibge": 41});

    let cases = [
        ("GET", "/api/ufs/".to_string(), None, "Erro ao listar UFs."),
        ("POST", "/api/ufs/".to_string(), Some(full.clone()), "Erro interno ao criar UF."),
        ("GET", detail(1), None, "Erro ao buscar UF."),
        ("PUT", detail(1), Some(full), "Erro interno ao atualizar UF."),
        (
            "PATCH",
            detail(1),
            Some(json!({"nome": "X"})),
            "Erro interno ao atualizar UF parcialmente.",
        ),
        ("DELETE", detail(1), None, "Erro ao deletar UF."),
    ];

    for (method, uri, body, message) in cases {
        let (status, json) = send(router.clone(), method, &uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert_eq!(json, json!({ "error": message }), "{method} {uri}");
    }
}

#[tokio::test]
async fn validation_runs_before_the_store() {
    // A broken store is never reached by an invalid body
    let router = build_router(AppState::new(Arc::new(DownStore)), &ServerConfig::default());

    let (status, body) = send(
        router,
        "POST",
        "/api/ufs/",
        Some(json!({"nome": "Rio", "sigla": "R1", "codigo_ibge": 33})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("sigla").is_some());
}

#[tokio::test]
async fn health_reports_store_state() {
    let app = TestApp::new();
    let (status, body) = app.request("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "ok");

    let router = build_router(AppState::new(Arc::new(DownStore)), &ServerConfig::default());
    let (status, body) = send(router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["store"], "unavailable");
}
