//! Youth Policy Aggregation API Library
//!
//! This library queries the youth policy API and the Juso address lookup API,
//! merges and filters paginated results, and exposes two read endpoints:
//! address-scoped policy search and an enriched top-10 ranking.
//!
//! # Modules
//!
//! - `api`: Route table, middleware and OpenAPI document.
//! - `integrations`: External service integrations.
//! - `config`: Configuration management.
//! - `enrichment`: Concurrent detail enrichment of ranked policies.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Upstream schemas and response models.
//! - `search`: Address-scoped policy search.
//! - `services`: Address lookup, policy API and rank clients.

pub mod api;
pub mod integrations;

pub mod config;
pub mod enrichment;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod search;
pub mod services;
