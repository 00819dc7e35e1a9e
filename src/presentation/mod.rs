// Presentation layer - JSON and SSE surface for console renderers
pub mod app_state;
pub mod handlers;
pub mod router;
pub mod stream;
pub mod view;
