//! Observability setup for chatd: tracing subscriber and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
