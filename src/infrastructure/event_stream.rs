// Chunked NDJSON streaming of refresh progress events
use crate::application::orchestrator::ProgressEvent;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Create a chunked NDJSON response, one event per line
pub fn chunked_ndjson_stream<S>(stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = ProgressEvent> + Send + 'static,
{
    let byte_stream = stream.map(|event| encode_line(&event));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(byte_stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

fn encode_line(event: &ProgressEvent) -> Result<Bytes, serde_json::Error> {
    let json = serde_json::to_vec(event)?;
    let mut chunk = BytesMut::with_capacity(json.len() + 1);
    chunk.put_slice(&json);
    chunk.put_u8(b'\n');
    Ok(chunk.freeze())
}

/// Events from a broadcast subscription. A lagging subscriber skips what it
/// missed; the stream ends when the driver goes away.
pub fn subscription_stream(
    mut rx: broadcast::Receiver<ProgressEvent>,
) -> impl Stream<Item = ProgressEvent> + Send + 'static {
    async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => yield event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Progress subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

/// Helper to create a streaming response from a subscription
pub fn stream_from_subscription(rx: broadcast::Receiver<ProgressEvent>) -> impl IntoResponse {
    match chunked_ndjson_stream(subscription_stream(rx)) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query_mode::QueryMode;

    #[test]
    fn test_event_is_one_json_line() {
        let line = encode_line(&ProgressEvent::Ok { cycle: 3, name: "kp".to_string() }).unwrap();
        assert_eq!(&line[..], b"{\"event\":\"ok\",\"cycle\":3,\"name\":\"kp\"}\n");
    }

    #[tokio::test]
    async fn test_subscription_ends_when_sender_dropped() {
        let (tx, rx) = broadcast::channel(8);
        tx.send(ProgressEvent::CycleStart { cycle: 1, mode: QueryMode::Live }).unwrap();
        tx.send(ProgressEvent::CycleEnd { cycle: 1, failed: 0 }).unwrap();
        drop(tx);

        let events: Vec<_> = subscription_stream(rx).collect().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], ProgressEvent::CycleEnd { cycle: 1, failed: 0 });
    }

    #[tokio::test]
    async fn test_lagged_subscriber_keeps_newest() {
        let (tx, rx) = broadcast::channel(2);
        for cycle in 1..=5 {
            tx.send(ProgressEvent::CycleEnd { cycle, failed: 0 }).unwrap();
        }
        drop(tx);

        let events: Vec<_> = subscription_stream(rx).collect().await;
        assert_eq!(
            events,
            vec![
                ProgressEvent::CycleEnd { cycle: 4, failed: 0 },
                ProgressEvent::CycleEnd { cycle: 5, failed: 0 },
            ]
        );
    }

    #[test]
    fn test_response_headers() {
        let (_tx, rx) = broadcast::channel::<ProgressEvent>(1);
        let response = chunked_ndjson_stream(subscription_stream(rx)).unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/x-ndjson");
    }
}
