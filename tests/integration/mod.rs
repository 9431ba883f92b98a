//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the news site and drive the
//! full pipeline (HTTP session, discovery, dedup, extraction, SQLite
//! persistence) end-to-end.

mod harvest_tests;
