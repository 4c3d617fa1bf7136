use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Advertising platform the creative will run on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, TS)]
#[ts(export)]
pub enum Platform {
    Meta,
    TikTok,
    YouTube,
    Display,
    Search,
    #[default]
    Other,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Meta => "Meta",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
            Platform::Display => "Display",
            Platform::Search => "Search",
            Platform::Other => "Other",
        }
    }
}

impl FromStr for Platform {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Meta" => Ok(Platform::Meta),
            "TikTok" => Ok(Platform::TikTok),
            "YouTube" => Ok(Platform::YouTube),
            "Display" => Ok(Platform::Display),
            "Search" => Ok(Platform::Search),
            "Other" => Ok(Platform::Other),
            _ => Err(()),
        }
    }
}

impl Serialize for Platform {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Unknown platform strings fall back to `Other` so the form never breaks
/// on values added by newer frontends.
impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(Platform::Other))
    }
}

/// Inline video payload: base64-encoded bytes plus the declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VideoData {
    pub data: String,
    pub mime_type: String,
}

/// A validated submission: campaign metadata, copy, and optional video.
///
/// Immutable once submitted — the flow retains the exact instance behind an
/// in-flight or completed analysis so the original copy/video can be shown
/// alongside the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdInput {
    pub platform: Platform,
    pub target_audience: String,
    pub objective: String,
    pub ad_copy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_data: Option<VideoData>,
}
