//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_failures_total` (counter): failures seen by the responder, by
//!   classification and identifier (unchecked errors share one label value)
//! - `things_created_total` (counter): successful `POST /things`

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

use crate::exceptions::Classification;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_failure(classification: Classification, identifier: &str) {
    // Unchecked messages are unbounded; keep them out of label values.
    let identifier = match classification {
        Classification::Exception => identifier.to_string(),
        Classification::Error => "unchecked".to_string(),
    };
    counter!(
        "http_failures_total",
        "classification" => classification.tag(),
        "identifier" => identifier
    )
    .increment(1);
}

pub fn record_thing_created() {
    counter!("things_created_total").increment(1);
}
