#![allow(clippy::new_without_default)]

use app::{App, AppError, ErrorKind};
use chrono::Utc;
use hyper::{Body, Method, Request, Response};
use model::{ApiError, FormParams};
use serde::Serialize;
use std::sync::Arc;

pub mod app;
pub mod controller;

#[macro_use]
extern crate log;

#[derive(Clone, Debug)]
pub struct Opts {
    pub port: u16,
    pub database_addr: String,
}

pub async fn entry_point(
    webserver: Arc<Webserver>,
    request: Request<Body>,
) -> Result<Response<Body>, hyper::Error> {
    Ok(webserver.handle_request(request).await)
}

pub struct Webserver {
    app: Arc<App>,
}

impl Webserver {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    pub async fn handle_request(&self, request: Request<Body>) -> Response<Body> {
        let method = request.method().clone();
        let path = request.uri().path().to_owned();
        // empty segments collapse, so trailing slashes match too
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        trace!("matching route '{} {}'", method, path);
        match (&method, segments.as_slice()) {
            (&Method::GET, ["api", "ping"]) => ping_pong_response(),
            (&Method::POST, ["api", "users"]) => {
                let result = match Self::get_body_as_form(request).await {
                    Ok(form) => self.app.create_user(form).await,
                    Err(error) => Err(error),
                };
                into_response(result)
            }
            (&Method::GET, ["api", "users"]) => into_response(self.app.list_users().await),
            (&Method::POST, ["api", "users", user_id, "exercises"]) => {
                let user_id = (*user_id).to_owned();
                let result = match Self::get_body_as_form(request).await {
                    Ok(form) => self.app.add_exercise(&user_id, form).await,
                    Err(error) => Err(error),
                };
                into_response(result)
            }
            (&Method::GET, ["api", "users", user_id, "logs"]) => {
                let query = Self::get_query_params(&request);
                into_response(self.app.get_logs(user_id, query).await)
            }
            _invalid => {
                error!("invalid http method or route: '{} {}'", method, path);
                generic_json_response(ApiError::invalid_route(), 200)
            }
        }
    }

    /// Attempts to parse the body of a request as an urlencoded form
    async fn get_body_as_form(request: Request<Body>) -> Result<FormParams, AppError> {
        let bytes = hyper::body::to_bytes(request.into_body())
            .await
            .map_err(|hyper_error| AppError::internal_error().with_context(&hyper_error))?;
        let raw = String::from_utf8(bytes.to_vec())
            .map_err(|utf8_error| AppError::internal_error().with_context(&utf8_error))?;

        Ok(FormParams::parse(&raw))
    }

    fn get_query_params(request: &Request<Body>) -> FormParams {
        request
            .uri()
            .query()
            .map(FormParams::parse)
            .unwrap_or_default()
    }
}

fn into_response<T>(result: Result<T, AppError>) -> Response<Body>
where
    T: Serialize,
{
    match result {
        Ok(body) => generic_json_response(body, 200),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AppError) -> Response<Body> {
    if let Some(context) = &error.context {
        error!("error with context: '{}'", context);
    }

    match error.kind {
        ErrorKind::Domain(api_error) => generic_json_response(api_error, 200),
        ErrorKind::Internal(message) => {
            error!("internal error: '{}'", message);
            raw_message_response(message)
        }
    }
}

fn generic_json_response<T>(body: T, status: u16) -> Response<Body>
where
    T: Serialize,
{
    let b = serde_json::to_vec(&body).unwrap();

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(b))
        .unwrap()
}

fn raw_message_response(message: String) -> Response<Body> {
    Response::builder()
        .status(200)
        .body(Body::from(message))
        .unwrap()
}

fn ping_pong_response() -> Response<Body> {
    Response::builder()
        .status(200)
        .body(Body::from("pong"))
        .unwrap()
}

pub fn get_required_env_var(var_name: &str) -> String {
    std::env::var(var_name)
        .unwrap_or_else(|_| panic!("missing environment variable: '{}'", var_name))
}

pub fn current_timestamp_s() -> i64 {
    Utc::now().timestamp()
}
