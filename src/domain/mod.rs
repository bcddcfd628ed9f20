// Domain layer - Pure value types and calculations
pub mod dashboard;
pub mod gauge;
pub mod telemetry;
