//! In-process stand-in for the MeasureSoftGram service (and SonarQube) that
//! records every request it receives.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const CHARACTERISTIC_VALUE: f64 = 0.9254618113429579;
pub const TSQMI_VALUE: f64 = 0.8359399436161667;

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone, Debug)]
pub struct StubOptions {
    pub created_config: bool,
    pub advertise_config_link: bool,
    /// Path answered with a 500.
    pub failing_path: Option<String>,
    /// Path answered with a 200 and no body.
    pub empty_path: Option<String>,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            created_config: true,
            advertise_config_link: true,
            failing_path: None,
            empty_path: None,
        }
    }
}

#[derive(Clone)]
struct StubState {
    host: String,
    options: StubOptions,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct StubService {
    pub host: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubService {
    pub async fn spawn() -> Self {
        Self::spawn_with(StubOptions::default()).await
    }

    pub async fn spawn_with(options: StubOptions) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("stub bind failed");
        let addr = listener.local_addr().expect("stub local addr failed");
        let host = format!("http://{addr}");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            host: host.clone(),
            options,
            requests: Arc::clone(&requests),
        };
        let app = Router::new().fallback(handle).with_state(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server failed");
        });

        Self { host, requests }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `METHOD path` of every request, in arrival order.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| format!("{} {}", request.method, request.path))
            .collect()
    }
}

async fn handle(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    if state.options.failing_path.as_deref() == Some(path.as_str()) {
        return json_response(StatusCode::INTERNAL_SERVER_ERROR, json!({ "detail": "boom" }));
    }
    if state.options.empty_path.as_deref() == Some(path.as_str()) {
        return StatusCode::OK.into_response();
    }

    let host = &state.host;
    let body = match (method.as_str(), path.as_str()) {
        ("GET", "/api/measures/component_tree") => sonar_measures(),
        ("GET", "/api/v1/organizations/") => json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": [
                { "id": 2, "url": format!("{host}/api/v1/organizations/2/"), "name": "other-org", "key": "other-org", "description": null, "products": [], "actions": {} },
                { "id": 1, "url": format!("{host}/api/v1/organizations/1/"), "name": "fga-eps-mds", "key": "fga-eps-mds", "description": "FGA", "products": [], "actions": {} }
            ]
        }),
        ("GET", "/api/v1/organizations/1/products/") => json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [product(host, state.options.advertise_config_link)]
        }),
        ("GET", "/api/v1/organizations/1/products/3/") => {
            product(host, state.options.advertise_config_link)
        }
        ("GET", "/api/v1/organizations/1/products/3/current/pre-config/") => {
            current_config(state.options.created_config)
        }
        ("GET", "/api/v1/organizations/1/products/3/repositories/") => json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{
                "id": 5,
                "url": format!("{host}/api/v1/organizations/1/products/3/repositories/5/"),
                "name": "2023-1-MeasureSoftGram-Action",
                "key": "2023-1-measuresoftgram-action",
                "description": null,
                "product": format!("{host}/api/v1/organizations/1/products/3/"),
                "latest_values": {},
                "historical_values": {},
                "actions": {}
            }]
        }),
        ("GET", "/api/v1/organizations/1/products/3/release/") => json!([
            { "id": 1, "release_name": "Sprint 9", "start_at": "2023-05-01", "end_at": "2023-05-31", "created_by": 1 },
            { "id": 2, "release_name": "Sprint 10", "start_at": "2023-06-01", "end_at": "2023-06-30", "created_by": 1 }
        ]),
        ("POST", "/api/v1/organizations/1/products/3/repositories/5/collectors/sonarqube/") => {
            json!({ "detail": "metrics inserted" })
        }
        ("POST", "/api/v1/organizations/1/products/3/repositories/5/calculate/measures/") => json!([
            indicator(1, "passed_tests", 1.0, "measure_id"),
            indicator(2, "test_coverage", 0.4, "measure_id")
        ]),
        ("POST", "/api/v1/organizations/1/products/3/repositories/5/calculate/characteristics/") => {
            json!([indicator(1, "reliability", CHARACTERISTIC_VALUE, "characteristic_id")])
        }
        ("POST", "/api/v1/organizations/1/products/3/repositories/5/calculate/subcharacteristics/") => {
            json!([indicator(1, "testing_status", 0.7, "subcharacteristic_id")])
        }
        ("POST", "/api/v1/organizations/1/products/3/repositories/5/calculate/tsqmi/") => json!({
            "id": 1,
            "value": TSQMI_VALUE,
            "created_at": "2023-06-19T10:00:00-03:00"
        }),
        _ => return json_response(StatusCode::NOT_FOUND, json!({ "detail": "Not found." })),
    };

    json_response(StatusCode::OK, body)
}

fn json_response(status: StatusCode, body: Value) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

fn product(host: &str, advertise_config_link: bool) -> Value {
    let mut actions = json!({
        "create a new pre-config": format!("{host}/api/v1/organizations/1/products/3/create/pre-config/")
    });
    if advertise_config_link {
        actions["get current pre-config"] =
            json!(format!("{host}/api/v1/organizations/1/products/3/current/pre-config/"));
    }
    json!({
        "id": 3,
        "url": format!("{host}/api/v1/organizations/1/products/3/"),
        "name": "MeasureSoftGram",
        "key": "measuresoftgram",
        "organization": format!("{host}/api/v1/organizations/1/"),
        "description": "Quality model",
        "repositories": [],
        "actions": actions
    })
}

pub fn current_config(created_config: bool) -> Value {
    json!({
        "id": 7,
        "name": "MSGRAM-7",
        "data": {
            "characteristics": [{
                "key": "reliability",
                "weight": 100.0,
                "subcharacteristics": [{
                    "key": "testing_status",
                    "weight": 100.0,
                    "measures": [
                        { "key": "passed_tests", "weight": 50.0 },
                        { "key": "test_coverage", "weight": 50.0 }
                    ]
                }]
            }]
        },
        "created_at": "2023-06-01T12:00:00-03:00",
        "created_config": created_config
    })
}

fn indicator(id: u64, key: &str, value: f64, parent_field: &str) -> Value {
    let mut latest = json!({ "id": id + 100, "value": value, "created_at": "2023-06-19T10:00:00-03:00" });
    latest[parent_field] = json!(id);
    json!({ "id": id, "key": key, "name": key, "description": "", "latest": latest })
}

pub fn sonar_measures() -> Value {
    json!({
        "paging": { "pageIndex": 1, "pageSize": 500, "total": 1 },
        "baseComponent": {
            "key": "fga-eps-mds_2023-1-MeasureSoftGram-Action",
            "qualifier": "TRK",
            "measures": [{ "metric": "coverage", "value": "81.5" }]
        },
        "components": []
    })
}
