// Infrastructure layer - External dependencies and adapters
pub mod board_widgets;
pub mod config;
pub mod event_stream;
pub mod http_feed_source;
pub mod tolerant_json;
