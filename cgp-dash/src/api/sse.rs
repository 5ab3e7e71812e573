//! Server-Sent Events stream of dashboard changes

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

use crate::AppState;

/// GET /events
///
/// Every [`cgp_common::events::DashboardEvent`] as an SSE event named after
/// its variant, with the JSON-encoded event as data.
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected");
    let rx = state.data.events().subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => {
                let event_type = event.event_type().to_string();
                match serde_json::to_string(&event) {
                    Ok(json) => {
                        debug!("SSE: Broadcasting event: {}", event_type);
                        Some(Ok(Event::default().event(event_type).data(json)))
                    }
                    Err(e) => {
                        warn!("SSE: Failed to serialize event {}: {}", event_type, e);
                        None
                    }
                }
            }
            Err(e) => {
                warn!("SSE client lagged: {:?}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

pub fn sse_routes() -> Router<AppState> {
    Router::new().route("/events", get(event_stream))
}
