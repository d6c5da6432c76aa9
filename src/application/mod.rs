// Application layer - services and the feed access seam
pub mod feed_repository;
pub mod snapshot_service;
