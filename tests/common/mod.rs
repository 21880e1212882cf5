//! Common test utilities for the smoke-check integration tests
//!
//! Provides an in-process mock of the OCR platform API so the checks can run
//! end to end without a live deployment. The mock keeps users, tokens and
//! documents in memory and can be told to misbehave in specific ways.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use ocr_smoke::config::config::HarnessConfig;

/// Ways the mock can deviate from a correct service.
#[derive(Debug, Clone, Copy, Default)]
pub struct Faults {
    /// PATCH echoes the new text but does not store it.
    pub forget_ocr_updates: bool,
    /// The document list ignores `status` and `language` filters.
    pub ignore_filters: bool,
    /// DELETE reports success but keeps the document.
    pub keep_deleted: bool,
    /// `/api/stats` omits `totalDocuments`.
    pub omit_stats_totals: bool,
    /// `/api/auth/me` answers unauthenticated requests with 200.
    pub open_me: bool,
    /// Uploads of any content type are accepted as documents.
    pub accept_any_file: bool,
    /// `/api/auth/me` reports a different email than the signed-in user's.
    pub me_wrong_email: bool,
}

#[derive(Debug, Clone)]
pub struct MockUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct MockDocument {
    pub id: u64,
    pub owner: String,
    pub status: String,
    pub ocr_text: String,
    pub language: String,
    pub file_name: String,
}

impl MockDocument {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id.to_string(),
            "status": self.status,
            "ocrText": self.ocr_text,
            "language": self.language,
            "fileName": self.file_name,
        })
    }
}

#[derive(Debug, Default)]
pub struct MockState {
    faults: Faults,
    users: HashMap<String, MockUser>,
    tokens: HashMap<String, String>,
    documents: BTreeMap<u64, MockDocument>,
    next_id: u64,
    requests: Vec<String>,
}

impl MockState {
    fn new(faults: Faults) -> Self {
        Self {
            faults,
            next_id: 1,
            ..Self::default()
        }
    }

    fn issue_token(&mut self, email: &str) -> String {
        let token = format!("token-{}", self.next_id);
        self.next_id += 1;
        self.tokens.insert(token.clone(), email.to_string());
        token
    }

    fn user_from(&self, headers: &HeaderMap) -> Option<MockUser> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?;
        let email = self.tokens.get(token)?;
        self.users.get(email).cloned()
    }

    fn add_document(&mut self, owner: &str, status: &str, language: &str, file_name: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.documents.insert(
            id,
            MockDocument {
                id,
                owner: owner.to_string(),
                status: status.to_string(),
                ocr_text: String::new(),
                language: language.to_string(),
                file_name: file_name.to_string(),
            },
        );
        id
    }
}

type Shared = Arc<Mutex<MockState>>;
type Reply = (StatusCode, Json<Value>);

fn ok(data: Value) -> Reply {
    (StatusCode::OK, Json(json!({ "success": true, "data": data })))
}

fn err(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "success": false, "error": message })))
}

fn unauthorized() -> Reply {
    err(StatusCode::UNAUTHORIZED, "Unauthorized")
}

fn user_json(user: &MockUser) -> Value {
    json!({ "id": user.id, "name": user.name, "email": user.email })
}

fn record(state: &Shared, line: String) -> std::sync::MutexGuard<'_, MockState> {
    let mut guard = state.lock().unwrap();
    guard.requests.push(line);
    guard
}

async fn signup(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut s = record(&state, "POST /api/auth/signup".to_string());
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    if email.is_empty() || password.is_empty() {
        return err(StatusCode::BAD_REQUEST, "Email and password are required");
    }
    if body["confirmPassword"].as_str() != Some(password.as_str()) {
        return err(StatusCode::BAD_REQUEST, "Passwords do not match");
    }
    if s.users.contains_key(&email) {
        return err(StatusCode::BAD_REQUEST, "User already exists");
    }

    let user = MockUser {
        id: format!("user-{}", s.users.len() + 1),
        name: body["name"].as_str().unwrap_or_default().to_string(),
        email: email.clone(),
        password,
    };
    s.users.insert(email.clone(), user.clone());
    let token = s.issue_token(&email);
    ok(json!({ "token": token, "user": user_json(&user) }))
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut s = record(&state, "POST /api/auth/login".to_string());
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let user = match s.users.get(email) {
        Some(user) if user.password == password => user.clone(),
        _ => return err(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    };
    let token = s.issue_token(&user.email);
    ok(json!({ "token": token, "user": user_json(&user) }))
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let s = record(&state, "GET /api/auth/me".to_string());
    match s.user_from(&headers) {
        Some(mut user) => {
            if s.faults.me_wrong_email {
                user.email = format!("someone-else+{}", user.email);
            }
            ok(json!({ "user": user_json(&user) }))
        }
        None if s.faults.open_me => ok(json!({ "user": null })),
        None => unauthorized(),
    }
}

async fn upload(State(state): State<Shared>, headers: HeaderMap, mut multipart: Multipart) -> Reply {
    let (owner, accept_any_file) = {
        let s = record(&state, "POST /api/ocr/upload".to_string());
        (s.user_from(&headers).map(|user| user.email), s.faults.accept_any_file)
    };
    let owner = match owner {
        Some(owner) => owner,
        None => return unauthorized(),
    };

    let mut file: Option<(String, String, usize)> = None;
    let mut language = "eng".to_string();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
                file = Some((content_type, file_name, len));
            }
            "language" => language = field.text().await.unwrap_or_default(),
            _ => {}
        }
    }

    let (content_type, file_name, len) = match file {
        Some(file) => file,
        None => return err(StatusCode::BAD_REQUEST, "No file uploaded"),
    };
    if !accept_any_file && (!content_type.starts_with("image/") || len == 0) {
        return err(
            StatusCode::BAD_REQUEST,
            "Invalid file type. Only JPEG, PNG and WebP images are allowed.",
        );
    }

    // Processing finishes instantly in the mock.
    let id = state
        .lock()
        .unwrap()
        .add_document(&owner, "COMPLETED", &language, &file_name);
    ok(json!({ "documentId": id.to_string(), "status": "PENDING" }))
}

async fn list_documents(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let s = record(&state, "GET /api/ocr/documents".to_string());
    let user = match s.user_from(&headers) {
        Some(user) => user,
        None => return unauthorized(),
    };

    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1).max(1);
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10).max(1);
    let matches = |doc: &&MockDocument| {
        if doc.owner != user.email {
            return false;
        }
        if s.faults.ignore_filters {
            return true;
        }
        params.get("status").is_none_or(|st| &doc.status == st)
            && params.get("language").is_none_or(|l| &doc.language == l)
    };

    let filtered: Vec<&MockDocument> = s.documents.values().filter(matches).collect();
    let total = filtered.len();
    let documents: Vec<Value> = filtered
        .iter()
        .skip((page - 1) * limit)
        .take(limit)
        .map(|d| d.to_json())
        .collect();

    ok(json!({
        "documents": documents,
        "pagination": {
            "total": total,
            "page": page,
            "limit": limit,
            "totalPages": total.div_ceil(limit),
        }
    }))
}

fn owned_document<'a>(s: &'a MockState, user: &MockUser, id: &str) -> Option<&'a MockDocument> {
    let id: u64 = id.parse().ok()?;
    s.documents.get(&id).filter(|d| d.owner == user.email)
}

async fn get_document(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    let s = record(&state, format!("GET /api/ocr/document/{}", id));
    let user = match s.user_from(&headers) {
        Some(user) => user,
        None => return unauthorized(),
    };
    match owned_document(&s, &user, &id) {
        Some(doc) => ok(json!({ "document": doc.to_json() })),
        None => err(StatusCode::NOT_FOUND, "Document not found"),
    }
}

async fn update_document(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let mut s = record(&state, format!("PATCH /api/ocr/document/{}", id));
    let user = match s.user_from(&headers) {
        Some(user) => user,
        None => return unauthorized(),
    };
    let text = match body["ocrText"].as_str() {
        Some(text) => text.to_string(),
        None => return err(StatusCode::BAD_REQUEST, "ocrText is required"),
    };
    let mut doc = match owned_document(&s, &user, &id) {
        Some(doc) => doc.clone(),
        None => return err(StatusCode::NOT_FOUND, "Document not found"),
    };
    doc.ocr_text = text;
    if !s.faults.forget_ocr_updates {
        s.documents.insert(doc.id, doc.clone());
    }
    ok(json!({ "document": doc.to_json() }))
}

async fn delete_document(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    let mut s = record(&state, format!("DELETE /api/ocr/document/{}", id));
    let user = match s.user_from(&headers) {
        Some(user) => user,
        None => return unauthorized(),
    };
    let doc_id = match owned_document(&s, &user, &id) {
        Some(doc) => doc.id,
        None => return err(StatusCode::NOT_FOUND, "Document not found"),
    };
    if !s.faults.keep_deleted {
        s.documents.remove(&doc_id);
    }
    ok(json!({ "message": "Document deleted" }))
}

async fn update_profile(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let mut s = record(&state, "PATCH /api/profile".to_string());
    let mut user = match s.user_from(&headers) {
        Some(user) => user,
        None => return unauthorized(),
    };

    if let Some(name) = body["name"].as_str() {
        user.name = name.to_string();
    }
    if let Some(new_password) = body["newPassword"].as_str() {
        if body["oldPassword"].as_str() != Some(user.password.as_str()) {
            return err(StatusCode::BAD_REQUEST, "Current password is incorrect");
        }
        user.password = new_password.to_string();
    }
    s.users.insert(user.email.clone(), user.clone());
    ok(json!({ "user": user_json(&user) }))
}

async fn stats(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let s = record(&state, "GET /api/stats".to_string());
    let user = match s.user_from(&headers) {
        Some(user) => user,
        None => return unauthorized(),
    };
    let docs: Vec<&MockDocument> = s.documents.values().filter(|d| d.owner == user.email).collect();
    let count = |status: &str| docs.iter().filter(|d| d.status == status).count();

    let mut data = json!({
        "totalDocuments": docs.len(),
        "completedDocuments": count("COMPLETED"),
        "processingDocuments": count("PROCESSING"),
        "failedDocuments": count("FAILED"),
    });
    if s.faults.omit_stats_totals {
        if let Some(map) = data.as_object_mut() {
            map.remove("totalDocuments");
        }
    }
    ok(data)
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/ocr/upload", post(upload))
        .route("/api/ocr/documents", get(list_documents))
        .route(
            "/api/ocr/document/:id",
            get(get_document).patch(update_document).delete(delete_document),
        )
        .route("/api/profile", patch(update_profile))
        .route("/api/stats", get(stats))
        .with_state(state)
}

/// A mock OCR service listening on an ephemeral localhost port.
///
/// The server runs on its own thread with a private Tokio runtime so the
/// blocking client under test never runs inside an async context.
pub struct MockOcrServer {
    pub base_url: String,
    state: Shared,
}

impl MockOcrServer {
    pub fn start() -> Self {
        Self::start_with(Faults::default())
    }

    pub fn start_with(faults: Faults) -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        listener.set_nonblocking(true).expect("non-blocking listener");
        let addr = listener.local_addr().expect("local addr");

        let state: Shared = Arc::new(Mutex::new(MockState::new(faults)));
        let app = router(state.clone());

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("mock server runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app).await.expect("mock server");
            });
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Harness configuration pointing at this server with no processing wait.
    pub fn config(&self) -> HarnessConfig {
        HarnessConfig::new(self.base_url.clone(), Duration::ZERO)
            .with_request_timeout(Some(Duration::from_secs(10)))
    }

    /// Registers a user directly, as if it had signed up in an earlier run.
    pub fn seed_user(&self, name: &str, email: &str, password: &str) {
        let mut s = self.state.lock().unwrap();
        let id = format!("user-{}", s.users.len() + 1);
        s.users.insert(
            email.to_string(),
            MockUser {
                id,
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            },
        );
    }

    /// Adds a document owned by `owner`.
    pub fn seed_document(&self, owner: &str, status: &str, language: &str) -> u64 {
        self.state
            .lock()
            .unwrap()
            .add_document(owner, status, language, "seeded.png")
    }

    pub fn user(&self, email: &str) -> Option<MockUser> {
        self.state.lock().unwrap().users.get(email).cloned()
    }

    pub fn document_count(&self) -> usize {
        self.state.lock().unwrap().documents.len()
    }

    /// `METHOD path` of every request received so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }
}
