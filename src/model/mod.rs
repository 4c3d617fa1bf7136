//! Wire types shared by the form, the analysis client, and the endpoint.
//!
//! Everything here is pure data: serde camelCase on the wire, `ts-rs`
//! exports for the TypeScript frontend.

pub mod diagnostic;
pub mod input;

pub use diagnostic::{
    BrandLiftEstimation, BrandLiftLevel, DiagnosticResult, MetricScore, PerformanceType,
    Recommendations,
};
pub use input::{AdInput, Platform, VideoData};
