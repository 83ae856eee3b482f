use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter, register_int_counter_vec,
    register_int_gauge, Encoder, Histogram, HistogramVec, IntCounter, IntCounterVec, IntGauge,
    TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Assessment Metrics
    pub static ref ASSESSMENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "assessments_total",
        "Total number of competency assessments",
        &["status"]
    )
    .unwrap();

    pub static ref ASSESSMENTS_ACTIVE: IntGauge = register_int_gauge!(
        "assessments_active",
        "Number of open assessment sessions"
    )
    .unwrap();

    pub static ref ANSWERS_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "answers_submitted_total",
        "Total number of answers submitted",
        &["correct"]
    )
    .unwrap();

    pub static ref ASSESSMENT_SCORE: Histogram = register_histogram!(
        "assessment_score_percent",
        "Final assessment scores",
        vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]
    )
    .unwrap();

    // Chat Metrics
    pub static ref CHAT_SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        "chat_sessions_active",
        "Number of open chat sessions"
    )
    .unwrap();

    pub static ref CHAT_MESSAGES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "chat_messages_total",
        "Total number of chat messages appended",
        &["sender"]
    )
    .unwrap();

    pub static ref CHAT_REPLIES_CANCELLED_TOTAL: IntCounter = register_int_counter!(
        "chat_replies_cancelled_total",
        "Scheduled assistant replies cancelled before delivery"
    )
    .unwrap();

    pub static ref SSE_CONNECTIONS_ACTIVE: IntGauge = register_int_gauge!(
        "sse_connections_active",
        "Number of active SSE connections"
    )
    .unwrap();

    // Auth Metrics
    pub static ref AUTH_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "auth_events_total",
        "Identity provider operations",
        &["operation", "status"]
    )
    .unwrap();

    // Catalog Metrics
    pub static ref RESOURCE_SEARCHES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "resource_searches_total",
        "Resource catalog queries",
        &["filtered"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Record the outcome of an identity provider call
pub fn record_auth_event<T, E>(operation: &str, result: &Result<T, E>) {
    let status = if result.is_ok() { "success" } else { "error" };
    AUTH_EVENTS_TOTAL
        .with_label_values(&[operation, status])
        .inc();
}
