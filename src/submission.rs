//! Submission builder: turns raw form edits plus an optional video file into
//! a validated `AdInput`, or blocks submission with a user-facing message.
//! No request is ever issued for input that fails validation here.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::AppError;
use crate::model::{AdInput, Platform, VideoData};
use crate::validation::{is_blank, require_non_empty};

/// Ceiling on the raw (pre-encoding) video file size.
pub const MAX_VIDEO_BYTES: usize = 20 * 1024 * 1024;

/// Minimum ad copy length when no video is attached.
pub const MIN_COPY_CHARS: usize = 5;

/// Lightweight handle for a local preview, independent of the encoded
/// payload used for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPreview {
    pub byte_len: usize,
    pub mime_type: String,
}

/// Collects form field edits and produces a validated `AdInput`.
#[derive(Debug, Default, Clone)]
pub struct SubmissionBuilder {
    platform: Platform,
    target_audience: String,
    objective: String,
    ad_copy: String,
    performance_data: Option<String>,
    video: Option<VideoData>,
    preview: Option<VideoPreview>,
}

impl SubmissionBuilder {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    pub fn platform(&mut self, platform: Platform) -> &mut Self {
        self.platform = platform;
        self
    }

    pub fn target_audience(&mut self, value: impl Into<String>) -> &mut Self {
        self.target_audience = value.into();
        self
    }

    pub fn objective(&mut self, value: impl Into<String>) -> &mut Self {
        self.objective = value.into();
        self
    }

    pub fn ad_copy(&mut self, value: impl Into<String>) -> &mut Self {
        self.ad_copy = value.into();
        self
    }

    pub fn performance_data(&mut self, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        self.performance_data = if is_blank(&value) { None } else { Some(value) };
        self
    }

    /// Attach a video file. Files over `MAX_VIDEO_BYTES` are rejected
    /// immediately and the builder keeps whatever was attached before.
    ///
    /// Accepted files are base64-encoded for transmission; the returned
    /// preview handle is for local display only.
    pub fn attach_video(
        &mut self,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<&VideoPreview, AppError> {
        if bytes.len() > MAX_VIDEO_BYTES {
            return Err(AppError::Validation(
                "Video exceeds the 20 MiB limit".into(),
            ));
        }
        require_non_empty("mimeType", mime_type)?;

        self.video = Some(VideoData {
            data: BASE64.encode(bytes),
            mime_type: mime_type.to_string(),
        });
        Ok(self.preview.insert(VideoPreview {
            byte_len: bytes.len(),
            mime_type: mime_type.to_string(),
        }))
    }

    /// Detach the current video and its preview.
    pub fn clear_video(&mut self) {
        self.video = None;
        self.preview = None;
    }

    pub fn video_preview(&self) -> Option<&VideoPreview> {
        self.preview.as_ref()
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    /// Validate and produce the immutable `AdInput`.
    ///
    /// Blocks submission when audience or objective are blank, or when the
    /// copy is under `MIN_COPY_CHARS` characters with no video attached.
    pub fn build(&self) -> Result<AdInput, AppError> {
        require_non_empty("targetAudience", &self.target_audience)?;
        require_non_empty("objective", &self.objective)?;

        let copy_chars = self.ad_copy.trim().chars().count();
        if copy_chars < MIN_COPY_CHARS && self.video.is_none() {
            return Err(AppError::Validation(format!(
                "Ad copy must be at least {MIN_COPY_CHARS} characters unless a video is attached"
            )));
        }

        Ok(AdInput {
            platform: self.platform,
            target_audience: self.target_audience.trim().to_string(),
            objective: self.objective.trim().to_string(),
            ad_copy: self.ad_copy.trim().to_string(),
            performance_data: self.performance_data.clone(),
            video_data: self.video.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_builder() -> SubmissionBuilder {
        let mut builder = SubmissionBuilder::new(Platform::TikTok);
        builder
            .target_audience("Gen Z")
            .objective("Awareness")
            .ad_copy("Buy now!!! Limited time!!!");
        builder
    }

    #[test]
    fn test_valid_copy_only_submission() {
        let input = filled_builder().build().unwrap();
        assert_eq!(input.platform, Platform::TikTok);
        assert_eq!(input.ad_copy, "Buy now!!! Limited time!!!");
        assert!(input.video_data.is_none());
    }

    #[test]
    fn test_empty_copy_without_video_blocks() {
        let mut builder = filled_builder();
        builder.ad_copy("");
        let err = builder.build().unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_short_copy_without_video_blocks() {
        let mut builder = filled_builder();
        builder.ad_copy("Hey!");
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_short_copy_with_video_allowed() {
        let mut builder = filled_builder();
        builder.ad_copy("");
        builder.attach_video(b"fake video bytes", "video/mp4").unwrap();
        let input = builder.build().unwrap();
        let video = input.video_data.unwrap();
        assert_eq!(video.mime_type, "video/mp4");
        assert_eq!(video.data, BASE64.encode(b"fake video bytes"));
    }

    #[test]
    fn test_oversized_video_rejected_and_not_attached() {
        let mut builder = filled_builder();
        let oversized = vec![0u8; MAX_VIDEO_BYTES + 1];
        let err = builder.attach_video(&oversized, "video/mp4").unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(err.to_string().contains("20 MiB"));
        assert!(!builder.has_video());
        assert!(builder.video_preview().is_none());
    }

    #[test]
    fn test_video_at_limit_accepted() {
        let mut builder = filled_builder();
        let at_limit = vec![0u8; MAX_VIDEO_BYTES];
        let preview = builder.attach_video(&at_limit, "video/webm").unwrap();
        assert_eq!(preview.byte_len, MAX_VIDEO_BYTES);
        assert!(builder.has_video());
    }

    #[test]
    fn test_missing_audience_blocks() {
        let mut builder = SubmissionBuilder::new(Platform::Meta);
        builder.objective("Awareness").ad_copy("A perfectly fine ad copy");
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_blank_performance_data_normalized_to_none() {
        let mut builder = filled_builder();
        builder.performance_data("   ");
        assert_eq!(builder.build().unwrap().performance_data, None);

        builder.performance_data("CTR 0.8%");
        assert_eq!(
            builder.build().unwrap().performance_data,
            Some("CTR 0.8%".to_string())
        );
    }

    #[test]
    fn test_clear_video_detaches_preview() {
        let mut builder = filled_builder();
        builder.attach_video(b"bytes", "video/mp4").unwrap();
        builder.clear_video();
        assert!(!builder.has_video());
        assert!(builder.video_preview().is_none());
    }
}
