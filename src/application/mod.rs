// Application layer - Use cases and the seams they depend on
pub mod pipeline;
pub mod record_normalizer;
pub mod render_sink;
pub mod telemetry_source;
pub mod time_series;
pub mod yield_reducer;
