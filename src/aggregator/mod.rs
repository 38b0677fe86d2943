//! Aggregation of parsed records into statistics and metrics.
//!
//! This module transforms parsed trace records into:
//! - Query statistics (totals, statement types, per-process / per-address buckets)
//! - Derived metrics (durations, slow query ranking, table access, plan types)
//! - A per-minute timeline
//! - Filtered record selections

pub mod buckets;
pub mod filter;
pub mod metrics;
pub mod stats;
pub mod timeline;

// Re-export main types and functions
pub use buckets::{add_to_bucket, merge_buckets, AggregateBucket};
pub use filter::RecordFilter;
pub use metrics::{
    calculate_query_summary, event_counts, plan_types, table_access_counts, top_slow_queries,
    QuerySummary, SlowQuery,
};
pub use stats::{compute_stats, is_slow, QueryStats};
pub use timeline::{group_by_minute, parse_timestamp};
