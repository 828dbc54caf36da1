use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::{get, post}, Json, Router};
use std::net::SocketAddr;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::api::{ApiAnalyzeRequest, ApiAnalyzeResponse, ApiPipelineRequest, ApiPipelineResponse};
use feed_sim::{FeedPipeline, ImageAnalysis, PostAnalyzer, SimError};

#[derive(Clone)]
struct AppState {
    pipeline: FeedPipeline,
    analyzer: PostAnalyzer,
}

pub async fn serve(
    args: crate::ServeArgs,
    pipeline: FeedPipeline,
    analyzer: PostAnalyzer,
) -> Result<(), SimError> {
    let state = AppState { pipeline, analyzer };

    let mut app = Router::new()
        .route("/api/health", get(health))
        .route("/api/pipeline", post(pipeline_handler))
        .route("/api/analyze", post(analyze_handler));

    if let Some(web_root) = args.web_root {
        let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
        let static_service = ServeDir::new(web_root).not_found_service(ServeFile::new(index_path));
        app = app.nest_service("/", static_service);
    }

    let app = app.with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| SimError::Server(format!("invalid bind address: {}", err)))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| SimError::Server(format!("failed to bind server: {}", err)))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .await
        .map_err(|err| SimError::Server(err.to_string()))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn pipeline_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiPipelineRequest>,
) -> Result<Json<ApiPipelineResponse>, (StatusCode, String)> {
    let (post, engagement) = request.into_input().map_err(bad_request)?;
    let report = state.pipeline.run(&post, &engagement).map_err(bad_request)?;
    Ok(Json(ApiPipelineResponse::from_report(report)))
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiAnalyzeRequest>,
) -> Result<Json<ApiAnalyzeResponse>, (StatusCode, String)> {
    let request = request.into_request().map_err(bad_request)?;
    let report = state.analyzer.analyze(&request).await.map_err(bad_request)?;

    let mut warnings = Vec::new();
    if let ImageAnalysis::Skipped { reason } = &report.image {
        warnings.push(format!("Image analysis skipped: {}", reason));
    }

    Ok(Json(ApiAnalyzeResponse::from_report(report, warnings)))
}

fn bad_request(err: SimError) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}
