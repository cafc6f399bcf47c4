use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};
use tracing_subscriber::{fmt, EnvFilter};

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);
static API_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    let cv = IntCounterVec::new(Opts::new("kblog_api_requests_total", "API requests total"), &["path"])
        .expect("valid api request counter");
    REGISTRY.register(Box::new(cv.clone())).ok();
    cv
});
static GENERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    let cv = IntCounterVec::new(Opts::new("kblog_generations_total", "Generation requests by outcome"), &["outcome"])
        .expect("valid generation counter");
    REGISTRY.register(Box::new(cv.clone())).ok();
    cv
});
static BUILD_INFO: Lazy<IntGaugeVec> = Lazy::new(|| {
    let g = IntGaugeVec::new(Opts::new("kblog_build_info", "Build information"), &["version"])
        .expect("valid build info gauge");
    REGISTRY.register(Box::new(g.clone())).ok();
    g
});

/// Installs the global tracing subscriber. Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt = fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr);
    // JSON logs if KBLOG_LOG_JSON=1
    if std::env::var("KBLOG_LOG_JSON").ok().as_deref() == Some("1") {
        let _ = fmt.json().try_init();
    } else {
        let _ = fmt.try_init();
    }
}

pub fn inc_api_request(path: &str) { API_REQUESTS.with_label_values(&[path]).inc(); }
pub fn inc_generation(outcome: &str) { GENERATIONS.with_label_values(&[outcome]).inc(); }

pub fn gather_prometheus(build_version: &str) -> String {
    BUILD_INFO.with_label_values(&[build_version]).set(1);
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    encoder.encode(&metric_families, &mut buffer).ok();
    String::from_utf8(buffer).unwrap_or_default()
}
