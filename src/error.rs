use axum::{
    http::StatusCode,
    response::{
        IntoResponse,
        Response,
    },
};
use cloudflare_exporter_collector::CollectError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("The collection cycle did not complete: {0}")]
    Cycle(#[from] tokio::task::JoinError),
    #[error("Rendering the collected metrics failed: {0}")]
    Render(#[from] CollectError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(err = %self, "Scrape failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
