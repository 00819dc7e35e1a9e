// Server-sent events carrying console status
use crate::domain::console::ConsoleView;
use crate::presentation::view::StatusView;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::time::Duration;
use tokio::sync::watch;

/// Stream the current status, then one event per published change.
/// Ends after the console reports itself closed.
pub fn status_events(
    mut rx: watch::Receiver<ConsoleView>,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    async_stream::stream! {
        loop {
            let view = StatusView::from(&*rx.borrow_and_update());
            let closed = view.closed;
            yield Event::default().event("status").json_data(view);

            if closed || rx.changed().await.is_err() {
                break;
            }
        }
    }
}

pub fn status_sse(
    rx: watch::Receiver<ConsoleView>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    Sse::new(status_events(rx)).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
