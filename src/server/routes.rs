//! Request routing for the recipe HTTP surface.

use bytes::Bytes;
use http::header::{self, HeaderValue};
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Body;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{ApiError, RecipeService};
use crate::models::{ShooterInput, ShooterPatch};

const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;
const CORS_MAX_AGE_SECS: &str = "3600";

#[derive(Debug, Error)]
enum HttpError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Cannot {0} {1}")]
    NoRoute(Method, String),
    #[error("Method {0} not allowed")]
    MethodNotAllowed(Method),
    #[error("Invalid request body: {0}")]
    BadBody(String),
    #[error("Encoding response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl HttpError {
    fn status(&self) -> StatusCode {
        match self {
            HttpError::Api(e) => e.status(),
            HttpError::NoRoute(..) => StatusCode::NOT_FOUND,
            HttpError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            HttpError::BadBody(_) => StatusCode::BAD_REQUEST,
            HttpError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Route {
    Shooters,
    Shooter(String),
    Ingredients,
    Ingredient(String),
}

impl Route {
    fn parse(path: &str) -> Option<Self> {
        let mut segments = path.trim_start_matches('/').split('/');
        let collection = segments.next()?;
        let item = segments.next().filter(|s| !s.is_empty());
        if segments.next().is_some_and(|s| !s.is_empty()) {
            return None;
        }
        let item = item.map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned());
        match (collection, item) {
            ("shooters", None) => Some(Route::Shooters),
            ("shooters", Some(id)) => Some(Route::Shooter(id)),
            ("ingredients", None) => Some(Route::Ingredients),
            ("ingredients", Some(name)) => Some(Route::Ingredient(name)),
            _ => None,
        }
    }
}

/// Body of `POST /ingredients`
#[derive(Debug, Deserialize)]
struct NewIngredient {
    #[serde(default)]
    nom: String,
}

type HttpResponse = Response<Full<Bytes>>;

/// Serve one request. Never fails: errors become plain-text responses.
pub async fn handle<B>(api: RecipeService, req: Request<B>) -> HttpResponse
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match dispatch(&api, req).await {
        Ok(response) => response,
        Err(err) => {
            let status = err.status();
            if status.is_server_error() {
                tracing::error!("{} {} failed: {}", method, path, err);
            }
            text(status, err.to_string())
        }
    };
    tracing::info!("{} {} -> {}", method, path, response.status().as_u16());
    with_cors(response)
}

async fn dispatch<B>(api: &RecipeService, req: Request<B>) -> Result<HttpResponse, HttpError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if req.method() == Method::OPTIONS {
        return Ok(preflight());
    }
    let route = Route::parse(req.uri().path())
        .ok_or_else(|| HttpError::NoRoute(req.method().clone(), req.uri().path().to_string()))?;
    let method = req.method().clone();

    match (route, method) {
        (Route::Shooters, Method::GET) => json(StatusCode::OK, &api.list_shooters().await?),
        (Route::Shooters, Method::POST) => {
            let input: ShooterInput = read_json(req).await?;
            json(StatusCode::OK, &api.create_shooter(input).await?)
        }
        (Route::Shooter(id), Method::GET) => json(StatusCode::OK, &api.get_shooter(&id).await?),
        (Route::Shooter(id), Method::PUT) => {
            let patch: ShooterPatch = read_json(req).await?;
            json(StatusCode::OK, &api.update_shooter(&id, patch).await?)
        }
        (Route::Shooter(id), Method::DELETE) => {
            api.delete_shooter(&id).await?;
            Ok(empty(StatusCode::NO_CONTENT))
        }
        (Route::Ingredients, Method::GET) => {
            json(StatusCode::OK, &api.list_ingredients().await?)
        }
        (Route::Ingredients, Method::POST) => {
            let body: NewIngredient = read_json(req).await?;
            json(StatusCode::OK, &api.add_ingredient(body.nom).await?)
        }
        (Route::Ingredient(name), Method::DELETE) => {
            api.delete_ingredient(&name).await?;
            Ok(empty(StatusCode::NO_CONTENT))
        }
        (_, method) => Err(HttpError::MethodNotAllowed(method)),
    }
}

async fn read_json<T, B>(req: Request<B>) -> Result<T, HttpError>
where
    T: DeserializeOwned,
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let bytes = Limited::new(req.into_body(), MAX_REQUEST_BODY_BYTES)
        .collect()
        .await
        .map_err(|e| HttpError::BadBody(e.to_string()))?
        .to_bytes();
    serde_json::from_slice(&bytes).map_err(|e| HttpError::BadBody(e.to_string()))
}

fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<HttpResponse, HttpError> {
    let body = serde_json::to_vec(value)?;
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    Ok(response)
}

fn text(status: StatusCode, message: String) -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::from(message)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

fn empty(status: StatusCode) -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

fn preflight() -> HttpResponse {
    let mut response = empty(StatusCode::NO_CONTENT);
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(CORS_MAX_AGE_SECS),
    );
    response
}

fn with_cors(mut response: HttpResponse) -> HttpResponse {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}
