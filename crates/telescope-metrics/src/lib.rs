//! telescope-metrics — dashboard-side Prometheus exposition.
//!
//! The upstream operator exports its own controller metrics; this
//! crate only renders gauges over lists the dashboard has already
//! fetched, for scraping via the dashboard's `/metrics` endpoint.

pub mod prometheus;

pub use prometheus::render_prometheus;
