//! Response store backends selected at startup.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prakriti::{MemoryStore, ResponseRecord, ResponseStore, StoreError};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

/// Table holding one row per completed submission.
pub const TABLE: &str = "survey_responses";

/// Response store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StorageConfig {
    /// Keep responses in process memory only.
    #[default]
    Memory,
    /// Persist responses in PostgreSQL.
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    /// Persist responses through the Supabase REST interface.
    Supabase { url: String, key: String },
}

impl StorageConfig {
    pub fn postgres(database_url: impl Into<String>, max_connections: u32) -> Self {
        Self::Postgres {
            database_url: database_url.into(),
            max_connections,
        }
    }

    pub fn supabase(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Supabase {
            url: url.into(),
            key: key.into(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres { .. } => "postgres",
            Self::Supabase { .. } => "supabase",
        }
    }

    /// Connect the configured backend.
    pub async fn open(&self) -> Result<Arc<dyn ResponseStore>, StoreError> {
        match self {
            Self::Memory => Ok(Arc::new(MemoryStore::new())),
            Self::Postgres {
                database_url,
                max_connections,
            } => {
                let store = PostgresStore::connect(database_url, *max_connections).await?;
                store.ensure_schema().await?;
                Ok(Arc::new(store))
            }
            Self::Supabase { url, key } => Ok(Arc::new(SupabaseStore::new(url, key)?)),
        }
    }
}

/// PostgreSQL-backed response store.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await
            .map_err(|e| StoreError::backend(anyhow::anyhow!("postgres connect failed: {e}")))?;

        Ok(Self { pool })
    }

    /// Create the responses table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS survey_responses (
                id BIGSERIAL PRIMARY KEY,
                "timestamp" TIMESTAMPTZ NOT NULL,
                name TEXT NOT NULL,
                gender TEXT NOT NULL,
                phone TEXT NOT NULL,
                email TEXT NOT NULL,
                city TEXT NOT NULL,
                scores TEXT NOT NULL,
                result TEXT NOT NULL,
                description TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::backend(anyhow::anyhow!("postgres schema create failed: {e}")))?;

        sqlx::query(
            r#"CREATE INDEX IF NOT EXISTS idx_survey_responses_timestamp ON survey_responses ("timestamp" DESC)"#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::backend(anyhow::anyhow!("postgres index create failed: {e}")))?;

        Ok(())
    }
}

fn decode_row(row: &sqlx::postgres::PgRow) -> Result<ResponseRecord, sqlx::Error> {
    Ok(ResponseRecord {
        timestamp: row.try_get::<DateTime<Utc>, _>("timestamp")?,
        name: row.try_get("name")?,
        gender: row.try_get("gender")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        city: row.try_get("city")?,
        scores: row.try_get("scores")?,
        result: row.try_get("result")?,
        description: row.try_get("description")?,
    })
}

#[async_trait]
impl ResponseStore for PostgresStore {
    fn label(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, record: &ResponseRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO survey_responses (
                "timestamp", name, gender, phone, email, city, scores, result, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.timestamp)
        .bind(&record.name)
        .bind(&record.gender)
        .bind(&record.phone)
        .bind(&record.email)
        .bind(&record.city)
        .bind(&record.scores)
        .bind(&record.result)
        .bind(&record.description)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::backend(anyhow::anyhow!("postgres insert failed: {e}")))?;

        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<ResponseRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT "timestamp", name, gender, phone, email, city, scores, result, description
            FROM survey_responses
            ORDER BY "timestamp" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::backend(anyhow::anyhow!("postgres load failed: {e}")))?;

        rows.iter()
            .map(decode_row)
            .collect::<Result<_, _>>()
            .map_err(|e| StoreError::backend(anyhow::anyhow!("postgres decode failed: {e}")))
    }
}

/// Response store talking to a Supabase project's REST interface.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: reqwest::Client,
    endpoint: String,
    key: String,
}

impl SupabaseStore {
    pub fn new(url: &str, key: &str) -> Result<Self, StoreError> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(StoreError::Misconfigured("Supabase URL is empty".into()));
        }
        if key.trim().is_empty() {
            return Err(StoreError::Misconfigured("Supabase key is empty".into()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: format!("{url}/rest/v1/{TABLE}"),
            key: key.trim().to_string(),
        })
    }

    /// The table endpoint requests go to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.client
            .request(method, &self.endpoint)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }
}

#[async_trait]
impl ResponseStore for SupabaseStore {
    fn label(&self) -> &'static str {
        "supabase"
    }

    async fn insert(&self, record: &ResponseRecord) -> Result<(), StoreError> {
        self.request(reqwest::Method::POST)
            .header("Prefer", "return=minimal")
            .json(&[record])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| StoreError::backend(anyhow::anyhow!("supabase insert failed: {e}")))?;

        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<ResponseRecord>, StoreError> {
        let response = self
            .request(reqwest::Method::GET)
            .query(&[("select", "*"), ("order", "timestamp.desc")])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| StoreError::backend(anyhow::anyhow!("supabase fetch failed: {e}")))?;

        response
            .json()
            .await
            .map_err(|e| StoreError::backend(anyhow::anyhow!("supabase decode failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::TimeZone;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    fn record(name: &str, hour: u32) -> ResponseRecord {
        ResponseRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 2, 10, hour, 15, 0).unwrap(),
            name: name.into(),
            gender: "Male".into(),
            phone: "8123456789".into(),
            email: "ravi@example.in".into(),
            city: "Bhuj".into(),
            scores: "Vata: 4, Pitta: 3, Kapha: 3".into(),
            result: "Vata-Pitta".into(),
            description: "blend".into(),
        }
    }

    #[derive(Clone, Default)]
    struct FakeRest {
        rows: Arc<Mutex<Vec<ResponseRecord>>>,
        queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers.get("apikey").is_some_and(|v| v == "anon-key")
            && headers
                .get("authorization")
                .is_some_and(|v| v == "Bearer anon-key")
    }

    async fn fake_insert(
        State(fake): State<FakeRest>,
        headers: HeaderMap,
        Json(rows): Json<Vec<ResponseRecord>>,
    ) -> StatusCode {
        if !authorized(&headers) {
            return StatusCode::UNAUTHORIZED;
        }
        fake.rows.lock().await.extend(rows);
        StatusCode::CREATED
    }

    async fn fake_select(
        State(fake): State<FakeRest>,
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
    ) -> Result<Json<Vec<ResponseRecord>>, StatusCode> {
        if !authorized(&headers) {
            return Err(StatusCode::UNAUTHORIZED);
        }
        fake.queries.lock().await.push(query);
        let mut rows = fake.rows.lock().await.clone();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(Json(rows))
    }

    async fn serve_fake() -> (String, FakeRest) {
        let fake = FakeRest::default();
        let app = Router::new()
            .route(
                "/rest/v1/survey_responses",
                get(fake_select).post(fake_insert),
            )
            .with_state(fake.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        (format!("http://{addr}/"), fake)
    }

    #[test]
    fn labels() {
        assert_eq!(StorageConfig::default().label(), "memory");
        assert_eq!(StorageConfig::postgres("postgres://x", 5).label(), "postgres");
        assert_eq!(StorageConfig::supabase("https://x", "k").label(), "supabase");
    }

    #[test]
    fn supabase_endpoint_and_settings() {
        let store = SupabaseStore::new("https://abc.supabase.co/", "key").unwrap();
        assert_eq!(
            store.endpoint(),
            "https://abc.supabase.co/rest/v1/survey_responses"
        );
        assert!(SupabaseStore::new("", "key").unwrap_err().is_misconfigured());
        assert!(SupabaseStore::new("https://x", " ").unwrap_err().is_misconfigured());
    }

    #[tokio::test]
    async fn memory_config_opens_empty_store() {
        let store = StorageConfig::Memory.open().await.unwrap();
        assert_eq!(store.label(), "memory");
        assert!(store.list_newest_first().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn supabase_round_trip_against_rest_interface() {
        let (url, fake) = serve_fake().await;
        let store = StorageConfig::supabase(url, "anon-key").open().await.unwrap();

        store.insert(&record("early", 7)).await.unwrap();
        store.insert(&record("late", 21)).await.unwrap();

        let names: Vec<_> = store
            .list_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["late", "early"]);

        let queries = fake.queries.lock().await;
        assert_eq!(queries[0].get("select").map(String::as_str), Some("*"));
        assert_eq!(
            queries[0].get("order").map(String::as_str),
            Some("timestamp.desc")
        );
    }

    #[tokio::test]
    async fn supabase_rejection_is_a_backend_error() {
        let (url, _fake) = serve_fake().await;
        let store = SupabaseStore::new(&url, "wrong-key").unwrap();
        let err = store.insert(&record("x", 1)).await.unwrap_err();
        assert!(!err.is_misconfigured());
    }
}
