//! Requests passed from the selection side to the processing side, and their replies.

use serde::{Deserialize, Serialize};

use crate::capture::CaptureRect;
use crate::clipboard::ClipboardArtifact;

/// Work handed off once an element is confirmed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PipelineRequest {
    /// Normalize and convert a snapshot of the element's markup
    #[serde(rename_all = "camelCase")]
    ConvertMarkdown { html: String, base_url: String },

    /// Crop the viewport capture to `rect`
    CaptureScreenshot { rect: CaptureRect },
}

/// Reply to a [`PipelineRequest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PipelineResponse {
    Artifact { artifact: ClipboardArtifact },
    Failed { message: String },
}

impl PipelineRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineRequest::ConvertMarkdown { .. } => "convertMarkdown",
            PipelineRequest::CaptureScreenshot { .. } => "captureScreenshot",
        }
    }
}
