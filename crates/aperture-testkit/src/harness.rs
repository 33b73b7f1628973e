use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use aperture_api::{AppState, AppStateInner, router};
use aperture_auth::AuthService;
use aperture_db::Database;

/// Signing secret baked into every test application.
pub const TEST_JWT_SECRET: &str = "testing-secret";

/// A file-backed SQLite database living in its own temporary directory.
///
/// Dropping the fixture removes the directory and the database file
/// with it, on every exit path including panics. Setup failures
/// propagate and abort the test.
pub struct TestDb {
    pub db: Database,
    _dir: TempDir,
}

impl TestDb {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("create tempdir for test database")?;
        let db = Database::open(&dir.path().join("test.db"))?;
        // Opening ran the migrations once already; tear down and
        // recreate so the fixture always starts from a blank schema.
        db.reset_schema()?;
        Ok(Self { db, _dir: dir })
    }
}

/// An in-process application wired to its own [`TestDb`]-style storage.
///
/// Requests are driven straight through the router with
/// `tower::ServiceExt::oneshot`; no socket is bound.
pub struct TestApp {
    state: AppState,
    router: Router,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("create tempdir for test database")?;
        let db = Database::open(&dir.path().join("test.db"))?;
        db.reset_schema()?;

        let state: AppState = Arc::new(AppStateInner {
            db,
            auth: AuthService::new(TEST_JWT_SECRET),
        });
        let router = router(state.clone());

        Ok(Self {
            state,
            router,
            _dir: dir,
        })
    }

    /// The storage handle the application is running against. Seed
    /// helpers take this to set up state behind the client's back.
    pub fn db(&self) -> &Database {
        &self.state.db
    }

    pub fn auth(&self) -> &AuthService {
        &self.state.auth
    }

    /// Drive one request through the router and collect the response.
    pub async fn request(&self, req: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(req).await?;
        TestResponse::read(response).await
    }

    pub async fn get(&self, uri: &str, bearer: Option<&str>) -> Result<TestResponse> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.request(builder.body(Body::empty())?).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.request(builder.body(Body::from(serde_json::to_vec(body)?))?)
            .await
    }
}

/// Status plus collected body of a completed test request.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    async fn read(response: axum::response::Response) -> Result<Self> {
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .context("collect response body")?
            .to_bytes()
            .to_vec();
        Ok(Self { status, body })
    }

    pub fn json(&self) -> Result<serde_json::Value> {
        serde_json::from_slice(&self.body).context("response body is not JSON")
    }
}

/// Templating engine over the crate's fixed `templates/` directory, kept
/// for parity with the application's email templates. Tests construct it
/// but render nothing through it.
pub fn templates() -> Result<tera::Tera> {
    let glob = format!("{}/templates/**/*.html", env!("CARGO_MANIFEST_DIR"));
    tera::Tera::new(&glob).context("load test templates")
}
