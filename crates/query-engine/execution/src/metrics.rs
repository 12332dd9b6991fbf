//! Metrics setup and update for query execution.

use prometheus::{Histogram, HistogramTimer, IntCounter, IntGauge};

/// The collection of all query metrics, registered in a caller-owned registry.
#[derive(Debug, Clone)]
pub struct Metrics {
    query_total: IntCounter,
    error_total: IntCounter,
    query_execution_time: Histogram,
    pool_size: IntGauge,
    pool_idle_count: IntGauge,
    pool_active_count: IntGauge,
    pool_max_connections: IntGauge,
    pool_min_connections: IntGauge,
}

impl Metrics {
    /// Set up counters and gauges used to produce Prometheus metrics.
    pub fn initialize(metrics_registry: &mut prometheus::Registry) -> Result<Self, prometheus::Error> {
        let query_total = add_int_counter_metric(
            metrics_registry,
            "simple_rest_query_total",
            "Total successful queries.",
        )?;

        let error_total = add_int_counter_metric(
            metrics_registry,
            "simple_rest_error_total",
            "Total queries that failed against the database.",
        )?;

        let query_execution_time = add_histogram_metric(
            metrics_registry,
            "simple_rest_query_execution_time",
            "Time taken to execute a single query against the database, in seconds.",
        )?;

        let pool_size = add_int_gauge_metric(
            metrics_registry,
            "simple_rest_pool_size",
            "The number of connections currently active. This includes idle connections.",
        )?;

        let pool_idle_count = add_int_gauge_metric(
            metrics_registry,
            "simple_rest_pool_idle",
            "The number of connections active and idle (not in use).",
        )?;

        let pool_active_count = add_int_gauge_metric(
            metrics_registry,
            "simple_rest_pool_active",
            "The number of connections current active. This does not include idle connections.",
        )?;

        let pool_max_connections = add_int_gauge_metric(
            metrics_registry,
            "simple_rest_pool_max_connections",
            "The maximum number of connections that this pool should maintain.",
        )?;

        let pool_min_connections = add_int_gauge_metric(
            metrics_registry,
            "simple_rest_pool_min_connections",
            "The minimum number of connections that this pool should maintain.",
        )?;

        Ok(Self {
            query_total,
            error_total,
            query_execution_time,
            pool_size,
            pool_idle_count,
            pool_active_count,
            pool_max_connections,
            pool_min_connections,
        })
    }

    pub fn record_successful_query(&self) {
        self.query_total.inc();
    }

    pub fn record_failed_query(&self) {
        self.error_total.inc();
    }

    /// Starts a timer which is observed when dropped.
    pub fn time_query_execution(&self) -> HistogramTimer {
        self.query_execution_time.start_timer()
    }

    /// Poll the pool for the values that cannot be updated directly.
    pub fn update_pool_metrics(&self, pool: &sqlx::PgPool) {
        let pool_size: i64 = pool.size().into();
        self.pool_size.set(pool_size);

        let pool_idle = i64::try_from(pool.num_idle()).unwrap_or(i64::MAX);
        self.pool_idle_count.set(pool_idle);

        self.pool_active_count.set(pool_size.saturating_sub(pool_idle));

        let pool_options = pool.options();
        self.pool_max_connections
            .set(pool_options.get_max_connections().into());
        self.pool_min_connections
            .set(pool_options.get_min_connections().into());
    }
}

/// Create a new int counter metric and register it with the provided Prometheus Registry
fn add_int_counter_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<IntCounter, prometheus::Error> {
    let int_counter =
        IntCounter::with_opts(prometheus::Opts::new(metric_name, metric_description))?;
    register_collector(metrics_registry, int_counter)
}

/// Create a new int gauge metric and register it with the provided Prometheus Registry
fn add_int_gauge_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<IntGauge, prometheus::Error> {
    let int_gauge = IntGauge::with_opts(prometheus::Opts::new(metric_name, metric_description))?;
    register_collector(metrics_registry, int_gauge)
}

/// Create a new histogram metric and register it with the provided Prometheus Registry
fn add_histogram_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<Histogram, prometheus::Error> {
    let histogram = Histogram::with_opts(prometheus::HistogramOpts::new(
        metric_name,
        metric_description,
    ))?;
    register_collector(metrics_registry, histogram)
}

/// Register a new collector with the registry, and return it for later use.
fn register_collector<Collector: prometheus::core::Collector + Clone + 'static>(
    metrics_registry: &mut prometheus::Registry,
    collector: Collector,
) -> Result<Collector, prometheus::Error> {
    metrics_registry.register(Box::new(collector.clone()))?;
    Ok(collector)
}
