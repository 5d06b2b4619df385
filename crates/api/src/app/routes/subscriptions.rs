//! Live notifications over Server-Sent Events.
//!
//! One stream per topic. Each frame carries the topic as the SSE event name,
//! the notification id as the SSE id and the JSON envelope as data. The
//! subscription is released when the client disconnects.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Extension,
    extract::Path,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
};
use tokio_stream::{Stream, StreamExt};

use unshift_core::DomainError;
use unshift_events::Topic;
use unshift_infra::Services;

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

const KEEP_ALIVE: Duration = Duration::from_secs(15);

pub async fn subscribe(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(topic): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, axum::Error>>>, ApiError> {
    let topic: Topic = topic
        .parse()
        .map_err(|e: unshift_events::UnknownTopic| DomainError::not_found(format!("subscription '{}'", e.0)))?;

    let principal = ctx.principal();
    tracing::info!(topic = %topic, user_id = %principal.id, "subscription opened");

    let stream = services.subscribe(principal, topic).map(move |envelope| {
        SseEvent::default()
            .event(topic.as_str())
            .id(envelope.notification_id().to_string())
            .json_data(&envelope)
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE)))
}
