use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One scored diagnostic dimension. Scores are integers in [1,10]; the
/// analysis client rejects anything outside that range before a
/// `DiagnosticResult` is ever constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetricScore {
    pub score: u8,
    pub explanation: String,
}

/// Qualitative level used across the brand-lift estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum BrandLiftLevel {
    Low,
    Moderate,
    High,
}

/// Whether the creative skews toward immediate response or brand building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PerformanceType {
    #[serde(rename = "Short-term performance")]
    ShortTermPerformance,
    Balanced,
    #[serde(rename = "Brand-building")]
    BrandBuilding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BrandLiftEstimation {
    pub recall_strength: BrandLiftLevel,
    pub message_association: BrandLiftLevel,
    pub generic_risk: BrandLiftLevel,
    pub performance_type: PerformanceType,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub structural: String,
    pub emotional: String,
    pub branding: String,
    pub platform_specific: String,
    pub revised_hook: String,
}

/// The complete diagnostic returned by the model. Every field is required —
/// a response missing any of them is a contract violation, never a partial
/// result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResult {
    pub focus: MetricScore,
    pub memorability: MetricScore,
    pub branding: MetricScore,
    pub emotion: MetricScore,
    pub pacing: MetricScore,
    pub overlays: MetricScore,
    pub brand_lift: BrandLiftEstimation,
    pub recommendations: Recommendations,
}

impl DiagnosticResult {
    /// The six metrics paired with their wire names, in display order.
    pub fn metrics(&self) -> [(&'static str, &MetricScore); 6] {
        [
            ("focus", &self.focus),
            ("memorability", &self.memorability),
            ("branding", &self.branding),
            ("emotion", &self.emotion),
            ("pacing", &self.pacing),
            ("overlays", &self.overlays),
        ]
    }
}
