//! In-process stand-in for the Shaya backend.
//!
//! Serves the auth and CRUD endpoints on a random local port with cookie
//! sessions, FastAPI-style `detail` errors and a request log.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use serde_json::{Value, json};

use shaya::auth::SessionUser;
use shaya::http_utils::ShayaClient;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const USER_TOKEN: &str = "user-token";

/// One request as the backend saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug)]
pub struct BackendState {
    pub resources: HashMap<&'static str, Vec<Value>>,
    pub next_id: i64,
    pub sessions: HashSet<String>,
    pub requests: Vec<RecordedRequest>,
    pub fail_lists: bool,
}

impl BackendState {
    fn seeded() -> Self {
        let mut resources = HashMap::new();
        resources.insert(
            "users",
            vec![
                json!({
                    "id": 1,
                    "username": "admin",
                    "role": "admin",
                    "person": {
                        "id": 1,
                        "full_name": "Juan Pablo Diaz",
                        "document": "12345678",
                        "email": "diazperillaj@gmail.com",
                        "phone": "555-1234",
                        "observation": "Usuario administrador por defecto"
                    }
                }),
                json!({
                    "id": 2,
                    "username": "maria",
                    "role": "user",
                    "person": {
                        "id": 2,
                        "full_name": "Maria Ruiz",
                        "document": "87654321",
                        "email": "maria@example.com",
                        "phone": "555-0101",
                        "observation": null
                    }
                }),
            ],
        );
        resources.insert("customers", Vec::new());
        resources.insert("farmers", Vec::new());
        Self {
            resources,
            next_id: 100,
            sessions: HashSet::new(),
            requests: Vec::new(),
            fail_lists: false,
        }
    }

    fn record(&mut self, method: &'static str, uri: &OriginalUri, body: Option<&Value>) {
        self.requests.push(RecordedRequest {
            method,
            path: uri.0.path().to_string(),
            query: uri.0.query().map(str::to_string),
            body: body.cloned(),
        });
    }
}

type Shared = Arc<Mutex<BackendState>>;

/// A running mock backend.
pub struct MockBackend {
    pub base_url: String,
    pub state: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState::seeded()));
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self) -> ShayaClient {
        ShayaClient::new(&self.base_url).unwrap()
    }

    async fn logged_in(&self, username: &str, password: &str) -> ShayaClient {
        let client = self.client();
        let credentials = shaya::auth::Credentials::new(username, password).unwrap();
        shaya::auth::AuthClient::new(client.clone())
            .login(&credentials)
            .await
            .unwrap();
        client
    }

    /// A client already logged in as `admin`.
    pub async fn admin_client(&self) -> ShayaClient {
        self.logged_in("admin", "admin1").await
    }

    /// A client already logged in as the regular user `maria`.
    pub async fn user_client(&self) -> ShayaClient {
        self.logged_in("maria", "maria123").await
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    pub fn set_fail_lists(&self, fail: bool) {
        self.state.lock().unwrap().fail_lists = fail;
    }

    pub fn stored(&self, resource: &str) -> Vec<Value> {
        self.state.lock().unwrap().resources[resource].clone()
    }

    pub fn remove(&self, resource: &str, id: i64) {
        let mut state = self.state.lock().unwrap();
        if let Some(items) = state.resources.get_mut(resource) {
            items.retain(|item| item["id"] != json!(id));
        }
    }
}

pub fn admin_user() -> SessionUser {
    SessionUser {
        id: 1,
        username: "admin".to_string(),
        role: "admin".to_string(),
    }
}

/// The seeded account with the `user` role.
pub fn regular_user() -> SessionUser {
    SessionUser {
        id: 2,
        username: "maria".to_string(),
        role: "user".to_string(),
    }
}

fn detail(status: StatusCode, detail: Value) -> Response {
    (status, axum::Json(json!({ "detail": detail }))).into_response()
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|c| c.strip_prefix("access_token="))
        .map(str::to_string)
}

fn current_user(state: &BackendState, headers: &HeaderMap) -> Result<SessionUser, Response> {
    let token = session_token(headers)
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, json!("No autenticado")))?;
    if !state.sessions.contains(&token) {
        return Err(detail(StatusCode::UNAUTHORIZED, json!("Token inválido")));
    }
    Ok(match token.as_str() {
        ADMIN_TOKEN => admin_user(),
        _ => regular_user(),
    })
}

fn require_admin(state: &BackendState, headers: &HeaderMap) -> Result<(), Response> {
    let user = current_user(state, headers)?;
    if user.role != "admin" {
        return Err(detail(StatusCode::FORBIDDEN, json!("No tienes permisos")));
    }
    Ok(())
}

async fn login(
    State(state): State<Shared>,
    uri: OriginalUri,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.record("POST", &uri, Some(&body));
    let token = match (body["username"].as_str(), body["password"].as_str()) {
        (Some("admin"), Some("admin1")) => ADMIN_TOKEN,
        (Some("maria"), Some("maria123")) => USER_TOKEN,
        _ => return detail(StatusCode::UNAUTHORIZED, json!("Credenciales inválidas")),
    };
    state.sessions.insert(token.to_string());
    let mut response = axum::Json(json!({ "message": "Login exitoso" })).into_response();
    let cookie = format!("access_token={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=28800", token);
    response
        .headers_mut()
        .insert(header::SET_COOKIE, HeaderValue::from_str(&cookie).unwrap());
    response
}

async fn me(State(state): State<Shared>, uri: OriginalUri, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    state.record("GET", &uri, None);
    match current_user(&state, &headers) {
        Ok(user) => axum::Json(user).into_response(),
        Err(response) => response,
    }
}

async fn logout(State(state): State<Shared>, uri: OriginalUri, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    state.record("POST", &uri, None);
    if let Some(token) = session_token(&headers) {
        state.sessions.remove(&token);
    }
    let mut response = axum::Json(json!({ "message": "Logout exitoso" })).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_static("access_token=; Path=/; Max-Age=0"),
    );
    response
}

fn matches_search(item: &Value, search: &str) -> bool {
    let search = search.to_lowercase();
    [
        &item["person"]["full_name"],
        &item["person"]["document"],
        &item["username"],
    ]
    .iter()
    .filter_map(|v| v.as_str())
    .any(|v| v.to_lowercase().contains(&search))
}

fn list(
    resource: &'static str,
    state: &mut BackendState,
    uri: &OriginalUri,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
) -> Response {
    state.record("GET", uri, None);
    if let Err(response) = current_user(state, headers) {
        return response;
    }
    if state.fail_lists {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let items: Vec<Value> = state.resources[resource]
        .iter()
        .filter(|item| params.get("search").is_none_or(|s| matches_search(item, s)))
        .filter(|item| params.get("role").is_none_or(|r| item["role"] == json!(r)))
        .cloned()
        .collect();
    axum::Json(items).into_response()
}

fn fetch(
    resource: &'static str,
    state: &mut BackendState,
    uri: &OriginalUri,
    headers: &HeaderMap,
    id: i64,
) -> Response {
    state.record("GET", uri, None);
    if let Err(response) = current_user(state, headers) {
        return response;
    }
    match state.resources[resource].iter().find(|item| item["id"] == json!(id)) {
        Some(item) => axum::Json(item.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, json!(format!("{} no encontrado", resource))),
    }
}

fn validate(resource: &str, state: &BackendState, body: &Value, id: Option<i64>) -> Result<(), Response> {
    let mut errors = Vec::new();
    if body["person"]["full_name"].as_str().is_none_or(str::is_empty) {
        errors.push(json!({"loc": ["body", "person", "full_name"], "msg": "full_name is required"}));
    }
    if resource == "users" && body["username"].as_str().is_none_or(str::is_empty) {
        errors.push(json!({"loc": ["body", "username"], "msg": "username is required"}));
    }
    if !errors.is_empty() {
        return Err(detail(StatusCode::UNPROCESSABLE_ENTITY, Value::Array(errors)));
    }
    if resource == "users" {
        let taken = state.resources["users"]
            .iter()
            .any(|u| u["username"] == body["username"] && u["id"] != json!(id));
        if taken {
            return Err(detail(StatusCode::BAD_REQUEST, json!("El usuario ya existe")));
        }
    }
    Ok(())
}

fn store(resource: &'static str, state: &mut BackendState, body: Value) -> Result<Value, Response> {
    validate(resource, state, &body, None)?;
    let id = state.next_id;
    state.next_id += 1;
    let mut stored = body;
    if let Some(object) = stored.as_object_mut() {
        object.remove("password");
        object.insert("id".to_string(), json!(id));
    }
    stored["person"]["id"] = json!(id);
    if let Some(items) = state.resources.get_mut(resource) {
        items.push(stored.clone());
    }
    Ok(stored)
}

fn create(
    resource: &'static str,
    state: &mut BackendState,
    uri: &OriginalUri,
    headers: &HeaderMap,
    body: Value,
) -> Response {
    state.record("POST", uri, Some(&body));
    if let Err(response) = require_admin(state, headers) {
        return response;
    }
    match store(resource, state, body) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(response) => response,
    }
}

/// Stores every valid entry and skips the rest.
fn create_bulk(
    resource: &'static str,
    state: &mut BackendState,
    uri: &OriginalUri,
    body: Value,
) -> Response {
    state.record("POST", uri, Some(&body));
    let Value::Array(entries) = body else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, json!("expected a list"));
    };
    let created: Vec<Value> = entries
        .into_iter()
        .filter_map(|entry| store(resource, state, entry).ok())
        .collect();
    axum::Json(created).into_response()
}

fn update(
    resource: &'static str,
    state: &mut BackendState,
    uri: &OriginalUri,
    headers: &HeaderMap,
    id: i64,
    body: Value,
) -> Response {
    state.record("PUT", uri, Some(&body));
    if let Err(response) = require_admin(state, headers) {
        return response;
    }
    if let Err(response) = validate(resource, state, &body, Some(id)) {
        return response;
    }
    let Some(items) = state.resources.get_mut(resource) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Some(item) = items.iter_mut().find(|item| item["id"] == json!(id)) else {
        return detail(StatusCode::NOT_FOUND, json!(format!("{} no encontrado", resource)));
    };
    if let (Some(target), Some(source)) = (item.as_object_mut(), body.as_object()) {
        for (key, value) in source {
            if key != "password" {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    item["person"]["id"] = json!(id);
    axum::Json(item.clone()).into_response()
}

fn remove(
    resource: &'static str,
    state: &mut BackendState,
    uri: &OriginalUri,
    headers: &HeaderMap,
    id: i64,
) -> Response {
    state.record("DELETE", uri, None);
    if let Err(response) = require_admin(state, headers) {
        return response;
    }
    let Some(items) = state.resources.get_mut(resource) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let before = items.len();
    items.retain(|item| item["id"] != json!(id));
    if items.len() == before {
        return detail(StatusCode::NOT_FOUND, json!(format!("{} no encontrado", resource)));
    }
    axum::Json(json!({ "message": "Eliminado" })).into_response()
}

fn resource_routes(resource: &'static str, singular: &'static str) -> Router<Shared> {
    let routes = Router::new()
        .route(
            "/get",
            get(
                move |State(state): State<Shared>,
                      uri: OriginalUri,
                      headers: HeaderMap,
                      Query(params): Query<HashMap<String, String>>| async move {
                    let mut state = state.lock().unwrap();
                    list(resource, &mut state, &uri, &headers, &params)
                },
            ),
        )
        .route(
            &format!("/get/{}/:id", singular),
            get(
                move |State(state): State<Shared>,
                      uri: OriginalUri,
                      headers: HeaderMap,
                      Path(id): Path<i64>| async move {
                    let mut state = state.lock().unwrap();
                    fetch(resource, &mut state, &uri, &headers, id)
                },
            ),
        )
        .route(
            "/create",
            post(
                move |State(state): State<Shared>,
                      uri: OriginalUri,
                      headers: HeaderMap,
                      axum::Json(body): axum::Json<Value>| async move {
                    let mut state = state.lock().unwrap();
                    create(resource, &mut state, &uri, &headers, body)
                },
            ),
        )
        .route(
            "/update/:id",
            put(
                move |State(state): State<Shared>,
                      uri: OriginalUri,
                      headers: HeaderMap,
                      Path(id): Path<i64>,
                      axum::Json(body): axum::Json<Value>| async move {
                    let mut state = state.lock().unwrap();
                    update(resource, &mut state, &uri, &headers, id, body)
                },
            ),
        )
        .route(
            "/delete/:id",
            delete(
                move |State(state): State<Shared>,
                      uri: OriginalUri,
                      headers: HeaderMap,
                      Path(id): Path<i64>| async move {
                    let mut state = state.lock().unwrap();
                    remove(resource, &mut state, &uri, &headers, id)
                },
            ),
        );
    if resource != "customers" {
        return routes;
    }
    routes.route(
        "/create-bulk",
        post(
            move |State(state): State<Shared>,
                  uri: OriginalUri,
                  axum::Json(body): axum::Json<Value>| async move {
                let mut state = state.lock().unwrap();
                create_bulk(resource, &mut state, &uri, body)
            },
        ),
    )
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/auth/logout", post(logout))
        .nest("/api/v1/users", resource_routes("users", "user"))
        .nest("/api/v1/customers", resource_routes("customers", "customer"))
        .nest("/api/v1/farmers", resource_routes("farmers", "farmer"))
        .with_state(state)
}
