//! In-process stand-in for the equations API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use mathhelper_common::{Equation, EquationId};

#[derive(Default)]
pub struct ApiState {
    pub equations: Vec<Equation>,
    /// Values the server will accept as solutions, per equation.
    pub roots: HashMap<EquationId, Vec<f64>>,
    pub next_id: EquationId,
    pub last_list_query: Option<HashMap<String, String>>,
    pub content_types: Vec<String>,
}

pub type SharedApi = Arc<Mutex<ApiState>>;

pub struct FakeApi {
    pub addr: SocketAddr,
    pub state: SharedApi,
}

impl FakeApi {
    pub async fn start(seed: Vec<(Equation, Vec<f64>)>) -> Self {
        let mut state = ApiState { next_id: 100, ..Default::default() };
        for (eq, roots) in seed {
            state.roots.insert(eq.id, roots);
            state.equations.push(eq);
        }
        let state: SharedApi = Arc::new(Mutex::new(state));

        let app = Router::new()
            .route("/api/equations", get(list).post(create))
            .route("/api/equations/{id}", get(fetch).delete(remove))
            .route("/api/equations/{id}/solutions", post(add_solution))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/", self.addr)
    }
}

fn note_content_type(state: &SharedApi, headers: &HeaderMap) {
    let value = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    state.lock().unwrap().content_types.push(value);
}

async fn list(
    State(state): State<SharedApi>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Equation>> {
    note_content_type(&state, &headers);
    let mut s = state.lock().unwrap();
    s.last_list_query = Some(params);
    Json(s.equations.clone())
}

async fn fetch(
    State(state): State<SharedApi>,
    headers: HeaderMap,
    Path(id): Path<EquationId>,
) -> Response {
    note_content_type(&state, &headers);
    let s = state.lock().unwrap();
    match s.equations.iter().find(|e| e.id == id) {
        Some(eq) => Json(eq.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "Equation not found").into_response(),
    }
}

async fn create(
    State(state): State<SharedApi>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    note_content_type(&state, &headers);
    let text = body["equation"].as_str().unwrap_or("").to_string();
    if !text.contains('=') {
        return (StatusCode::BAD_REQUEST, r#"["equation must contain '='"]"#).into_response();
    }
    let mut s = state.lock().unwrap();
    let id = s.next_id;
    s.next_id += 1;
    s.equations.push(Equation::new(id, text));
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("equations/{id}"))],
    )
        .into_response()
}

async fn remove(State(state): State<SharedApi>, Path(id): Path<EquationId>) -> Response {
    let mut s = state.lock().unwrap();
    let before = s.equations.len();
    s.equations.retain(|e| e.id != id);
    if s.equations.len() == before {
        (StatusCode::NOT_FOUND, "Equation not found").into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

async fn add_solution(
    State(state): State<SharedApi>,
    Path(id): Path<EquationId>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(x) = params.get("x").and_then(|x| x.parse::<f64>().ok()) else {
        return (StatusCode::BAD_REQUEST, "missing x").into_response();
    };
    let mut s = state.lock().unwrap();
    let valid = s
        .roots
        .get(&id)
        .map(|roots| roots.iter().any(|r| (r - x).abs() < 1e-9))
        .unwrap_or(false);
    if !valid {
        return (StatusCode::BAD_REQUEST, "Invalid root").into_response();
    }
    if let Some(eq) = s.equations.iter_mut().find(|e| e.id == id) {
        eq.solutions.push(x);
    }
    Json(true).into_response()
}
