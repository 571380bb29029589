use crate::dispatch::{DispatchError, DispatchPipeline, ExecuteOutcome};
use crate::models::{ApiSummary, InvocationRequest};
use crate::provider::ProviderError;
use anyhow::Result;
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

const MAX_BODY_BYTES: u64 = 64 * 1024;

fn with_pipeline(
    pipeline: Arc<DispatchPipeline>,
) -> impl Filter<Extract = (Arc<DispatchPipeline>,), Error = Infallible> + Clone {
    warp::any().map(move || pipeline.clone())
}

fn error_reply(message: &str, status: StatusCode) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(&json!({ "error": message })), status)
}

fn status_for(err: &DispatchError) -> StatusCode {
    match err {
        DispatchError::NotFound { .. } => StatusCode::NOT_FOUND,
        DispatchError::Configuration => StatusCode::BAD_REQUEST,
        DispatchError::Provider(ProviderError::MissingPathParam(_)) => StatusCode::BAD_REQUEST,
        DispatchError::Provider(_) | DispatchError::Mapping(_) => StatusCode::BAD_GATEWAY,
    }
}

pub fn routes(pipeline: Arc<DispatchPipeline>) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health_route = warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::json(&json!({ "status": "healthy" })));

    let list_route = warp::path!("apis")
        .and(warp::get())
        .and(with_pipeline(pipeline.clone()))
        .map(|pipeline: Arc<DispatchPipeline>| {
            let summaries: Vec<ApiSummary> = pipeline
                .catalog()
                .iter()
                .map(|api| ApiSummary {
                    id: api.id.clone(),
                    name: api.name.clone(),
                    description: api.description.clone(),
                    live: pipeline.routes().has_live_route(&api.id),
                })
                .collect();
            warp::reply::json(&summaries)
        });

    let describe_route = warp::path!("apis" / String)
        .and(warp::get())
        .and(with_pipeline(pipeline.clone()))
        .map(|api_id: String, pipeline: Arc<DispatchPipeline>| match pipeline.catalog().lookup(&api_id) {
            Some(api) => warp::reply::with_status(warp::reply::json(api), StatusCode::OK),
            None => error_reply("API not found", StatusCode::NOT_FOUND),
        });

    let execute_route = warp::path!("execute")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_pipeline(pipeline))
        .and_then(execute);

    health_route
        .or(list_route)
        .or(describe_route)
        .or(execute_route)
        .recover(handle_rejection)
        .with(warp::cors().allow_any_origin().allow_methods(vec!["GET", "POST"]).allow_header("content-type"))
}

async fn execute(
    mut request: InvocationRequest,
    pipeline: Arc<DispatchPipeline>,
) -> Result<WithStatus<Json>, Infallible> {
    if let Some(api) = pipeline.catalog().lookup(&request.api_id) {
        let today = chrono::Local::now().date_naive();
        request.params = api.with_defaults(&request.params, today);
        if let Err(err) = api.validate(&request.params) {
            debug!(api_id = %request.api_id, %err, "rejected parameters");
            return Ok(error_reply(&err.to_string(), StatusCode::BAD_REQUEST));
        }
    }

    let reply = match pipeline.dispatch(&request).await {
        Ok(result) => warp::reply::with_status(warp::reply::json(&ExecuteOutcome::Success(result)), StatusCode::OK),
        Err(err) => error_reply(&err.user_message(), status_for(&err)),
    };
    Ok(reply)
}

/// Keeps every failure in the `{ "error": ... }` shape, including requests
/// that never reach a handler.
async fn handle_rejection(err: Rejection) -> Result<WithStatus<Json>, Infallible> {
    let (message, status) = if err.is_not_found() {
        ("Not found".to_string(), StatusCode::NOT_FOUND)
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (format!("Invalid request body: {}", e), StatusCode::BAD_REQUEST)
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        ("Request body is too large".to_string(), StatusCode::PAYLOAD_TOO_LARGE)
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        ("Content-Length header is required".to_string(), StatusCode::LENGTH_REQUIRED)
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        ("Request body must be JSON".to_string(), StatusCode::UNSUPPORTED_MEDIA_TYPE)
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        ("Method not allowed".to_string(), StatusCode::METHOD_NOT_ALLOWED)
    } else {
        warn!("unhandled rejection: {:?}", err);
        (crate::dispatch::UNKNOWN_ERROR.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
    };

    Ok(error_reply(&message, status))
}

pub async fn run_server(pipeline: Arc<DispatchPipeline>, port: u16) -> Result<()> {
    let addr: SocketAddr = ([127, 0, 0, 1], port).into();
    let (bound, server) = warp::serve(routes(pipeline)).try_bind_with_graceful_shutdown(addr, async {
        tokio::signal::ctrl_c().await.ok();
    })?;

    info!("server running on http://{}", bound);
    server.await;
    info!("server stopped");

    Ok(())
}
