// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod feed_parser;
pub mod http_feed_repository;
