//! In-process request and inventory counters rendered in the Prometheus text
//! exposition format.

use std::{
    collections::BTreeMap,
    fmt::Write,
    sync::{
        Mutex,
        atomic::{AtomicI64, AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Default)]
struct RouteStats {
    by_status: BTreeMap<u16, u64>,
    duration_sum: f64,
    count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductEvent {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug)]
pub struct Metrics {
    started: Instant,
    in_flight: AtomicI64,
    routes: Mutex<BTreeMap<(String, String), RouteStats>>,
    created: AtomicU64,
    updated: AtomicU64,
    deleted: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            in_flight: AtomicI64::new(0),
            routes: Mutex::new(BTreeMap::new()),
            created: AtomicU64::new(0),
            updated: AtomicU64::new(0),
            deleted: AtomicU64::new(0),
        }
    }

    pub fn record_request(&self, method: &str, path: &str, status: u16, elapsed: Duration) {
        let mut routes = self
            .routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let stats = routes
            .entry((method.to_string(), path.to_string()))
            .or_default();
        *stats.by_status.entry(status).or_insert(0) += 1;
        stats.duration_sum += elapsed.as_secs_f64();
        stats.count += 1;
    }

    pub fn record_product(&self, event: ProductEvent) {
        let counter = match event {
            ProductEvent::Created => &self.created,
            ProductEvent::Updated => &self.updated,
            ProductEvent::Deleted => &self.deleted,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("# HELP http_requests_total Total HTTP requests handled.\n");
        out.push_str("# TYPE http_requests_total counter\n");
        let routes = self
            .routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for ((method, path), stats) in routes.iter() {
            for (status, count) in &stats.by_status {
                let _ = writeln!(
                    out,
                    "http_requests_total{{method=\"{}\",path=\"{}\",status=\"{}\"}} {}",
                    escape_label(method),
                    escape_label(path),
                    status,
                    count
                );
            }
        }

        out.push_str("# HELP http_request_duration_seconds Time spent handling HTTP requests.\n");
        out.push_str("# TYPE http_request_duration_seconds summary\n");
        for ((method, path), stats) in routes.iter() {
            let labels = format!(
                "method=\"{}\",path=\"{}\"",
                escape_label(method),
                escape_label(path)
            );
            let _ = writeln!(
                out,
                "http_request_duration_seconds_sum{{{labels}}} {}",
                stats.duration_sum
            );
            let _ = writeln!(
                out,
                "http_request_duration_seconds_count{{{labels}}} {}",
                stats.count
            );
        }
        drop(routes);

        gauge(
            &mut out,
            "http_requests_in_flight",
            "HTTP requests currently being handled.",
            self.in_flight.load(Ordering::Relaxed) as f64,
        );
        counter(
            &mut out,
            "inventory_products_created_total",
            "Products created.",
            self.created.load(Ordering::Relaxed),
        );
        counter(
            &mut out,
            "inventory_products_updated_total",
            "Products updated.",
            self.updated.load(Ordering::Relaxed),
        );
        counter(
            &mut out,
            "inventory_products_deleted_total",
            "Products deleted.",
            self.deleted.load(Ordering::Relaxed),
        );
        gauge(
            &mut out,
            "process_uptime_seconds",
            "Seconds since the process started.",
            self.started.elapsed().as_secs_f64(),
        );

        out
    }
}

fn counter(out: &mut String, name: &str, help: &str, value: u64) {
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} counter");
    let _ = writeln!(out, "{name} {value}");
}

fn gauge(out: &mut String, name: &str, help: &str, value: f64) {
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} gauge");
    let _ = writeln!(out, "{name} {value}");
}

fn escape_label(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

struct InFlight<'a>(&'a AtomicI64);

impl<'a> InFlight<'a> {
    fn enter(metrics: &'a Metrics) -> Self {
        metrics.in_flight.fetch_add(1, Ordering::Relaxed);
        Self(&metrics.in_flight)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Records method, matched route template, status and latency of each request.
pub async fn track(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let start = Instant::now();
    let response = {
        let _guard = InFlight::enter(&state.metrics);
        next.run(request).await
    };

    state
        .metrics
        .record_request(&method, &path, response.status().as_u16(), start.elapsed());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_request_counters() {
        let metrics = Metrics::new();
        metrics.record_request("GET", "/products/{id}", 200, Duration::from_millis(5));
        metrics.record_request("GET", "/products/{id}", 404, Duration::from_millis(1));
        metrics.record_request("GET", "/products/{id}", 200, Duration::from_millis(2));

        let text = metrics.render();
        assert!(text.contains(
            "http_requests_total{method=\"GET\",path=\"/products/{id}\",status=\"200\"} 2"
        ));
        assert!(text.contains(
            "http_requests_total{method=\"GET\",path=\"/products/{id}\",status=\"404\"} 1"
        ));
        assert!(text.contains(
            "http_request_duration_seconds_count{method=\"GET\",path=\"/products/{id}\"} 3"
        ));
    }

    #[test]
    fn renders_product_counters() {
        let metrics = Metrics::new();
        metrics.record_product(ProductEvent::Created);
        metrics.record_product(ProductEvent::Created);
        metrics.record_product(ProductEvent::Deleted);

        let text = metrics.render();
        assert!(text.contains("inventory_products_created_total 2\n"));
        assert!(text.contains("inventory_products_updated_total 0\n"));
        assert!(text.contains("inventory_products_deleted_total 1\n"));
        assert!(text.contains("# TYPE process_uptime_seconds gauge"));
    }

    #[test]
    fn escapes_label_values() {
        assert_eq!(escape_label("a\"b\\c"), "a\\\"b\\\\c");
    }
}
