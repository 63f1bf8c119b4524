//! Shared test harness for E2E integration tests.
//!
//! Seeds a real SQLite catalog and intents file in a temp directory and
//! builds the assistant through the same bootstrap path as the binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::str::FromStr;

use serde_json::json;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sq_assistant::bootstrap::build_resolver;
use sq_assistant::config::{AssistantConfig, ClassifierBackend};
use sq_assistant::Resolver;

/// Intent tags in file order. Ollama embeddings are returned in this order.
pub const TAGS: [&str; 3] = ["aspirin", "bandage", "dipirona"];

pub const INTENTS_JSON: &str = r#"{
  "intents": [
    {"tag": "aspirin", "patterns": ["do we have aspirin", "aspirin tablets in stock"], "responses": []},
    {"tag": "bandage", "patterns": ["any bandages left", "bandage rolls"], "responses": []},
    {"tag": "dipirona", "patterns": ["tem dipirona", "quantas dipironas temos"], "responses": []}
  ]
}"#;

/// Temp directory holding `estoque.db` and `intents.json`.
pub struct TestHarness {
    pub dir: TempDir,
    pub database_url: String,
    pub intents_path: PathBuf,
}

impl TestHarness {
    /// Catalog table `remedios(nome, quantidade)` seeded with `rows`.
    pub async fn with_catalog(rows: &[(&str, i64)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("estoque.db");
        let database_url = format!("sqlite://{}", db_path.display());

        let intents_path = dir.path().join("intents.json");
        std::fs::write(&intents_path, INTENTS_JSON).unwrap();

        let harness = Self {
            dir,
            database_url,
            intents_path,
        };
        harness
            .execute("CREATE TABLE remedios (nome TEXT NOT NULL, quantidade INTEGER NOT NULL)")
            .await;
        for (name, qty) in rows {
            harness.insert(name, *qty).await;
        }
        harness
    }

    /// Sample pharmacy stock.
    pub async fn with_sample_data() -> Self {
        Self::with_catalog(&[
            ("Aspirin 500mg", 120),
            ("Dipirona Sódica", 80),
            ("Paracetamol 750mg", 45),
            ("Gauze Pads", 200),
        ])
        .await
    }

    async fn connect(&self) -> sqlx::SqliteConnection {
        SqliteConnectOptions::from_str(&self.database_url)
            .unwrap()
            .create_if_missing(true)
            .connect()
            .await
            .unwrap()
    }

    pub async fn execute(&self, sql: &str) {
        let mut conn = self.connect().await;
        sqlx::query(sql).execute(&mut conn).await.unwrap();
        conn.close().await.unwrap();
    }

    pub async fn insert(&self, name: &str, quantity: i64) {
        let mut conn = self.connect().await;
        sqlx::query("INSERT INTO remedios (nome, quantidade) VALUES (?, ?)")
            .bind(name)
            .bind(quantity)
            .execute(&mut conn)
            .await
            .unwrap();
        conn.close().await.unwrap();
    }

    /// Config pointing at this harness, with the given classifier backend.
    pub fn config(&self, backend: ClassifierBackend) -> AssistantConfig {
        let mut config = AssistantConfig {
            intents_path: self.intents_path.clone(),
            ..AssistantConfig::default()
        };
        config.classifier.backend = backend;
        config.store.database_url = self.database_url.clone();
        config
    }

    /// Lexical-backend resolver over this harness.
    pub fn lexical_resolver(&self) -> Resolver {
        build_resolver(&self.config(ClassifierBackend::Lexical)).unwrap()
    }

    /// Ollama-backend resolver pointed at `server`.
    pub fn ollama_resolver(&self, server: &MockServer, fallback_to_lexical: bool) -> Resolver {
        let mut config = self.config(ClassifierBackend::Ollama);
        config.classifier.ollama.host = server.uri();
        config.classifier.fallback_to_lexical = fallback_to_lexical;
        build_resolver(&config).unwrap()
    }
}

/// Embeddings for `[query, aspirin, bandage, dipirona]` where the query sits
/// closest to `favored`.
pub fn embeddings_favoring(favored: &str) -> serde_json::Value {
    let axis = |tag: &str| match tag {
        "aspirin" => [1.0, 0.0, 0.0],
        "bandage" => [0.0, 1.0, 0.0],
        _ => [0.0, 0.0, 1.0],
    };
    let query = axis(favored).map(|x| x * 0.9 + 0.05);
    let mut embeddings = vec![query.to_vec()];
    embeddings.extend(TAGS.iter().map(|t| axis(t).to_vec()));
    json!({ "model": "nomic-embed-text", "embeddings": embeddings })
}

/// Start a mock Ollama whose `/api/embed` always favors `favored`.
pub async fn mock_ollama(favored: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(embeddings_favoring(favored)))
        .mount(&server)
        .await;
    server
}

/// Start a mock Ollama that fails every request with `status`.
pub async fn failing_ollama(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}
