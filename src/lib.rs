//! # notepulse
//!
//! Core library for notepulse - per-file edit activity statistics.
//!
//! Given a log of edit events (create/update/delete/rename, each carrying
//! the file's character and word counts at that moment), this library
//! partitions a time range into segments under one of three bucketing
//! strategies and aggregates the events into them, producing the ordered
//! segment list a chart layer consumes.
//!
//! This library provides:
//! - Domain types for events and time segments
//! - The [`EventStore`] seam (with an in-memory implementation) feeding
//!   the engine
//! - Segment builders (variable/telescoping, constant, natural-calendar)
//!   and the stateful event aggregator behind the [`StatsEngine`] facade
//! - Text analysis for mixed CJK/Latin character and word counts
//! - Configuration management and logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use notepulse::{Config, MemoryEventStore, StatsEngine, StatsRequest};
//!
//! let config = Config::load().expect("failed to load config");
//! let store = MemoryEventStore::new();
//!
//! let engine = StatsEngine::new(&store);
//! let request: StatsRequest = config
//!     .chart
//!     .to_request(chrono::Utc::now().timestamp_millis())
//!     .expect("invalid chart config");
//! let segments = engine
//!     .calculate_period_stats(&request)
//!     .expect("failed to compute stats");
//! for segment in &segments {
//!     println!("{} .. {}: {} words", segment.start_time, segment.end_time, segment.total_words);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use stats::{StatsEngine, StatsRequest, Strategy};
pub use store::{ActivitySnapshot, EventStore, MemoryEventStore};
pub use types::*;

// Public modules
pub mod analyzer;
pub mod config;
pub mod error;
pub mod logging;
pub mod stats;
pub mod store;
pub mod types;
