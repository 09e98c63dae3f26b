pub mod config;
pub mod output;
pub mod server;
pub mod store;
pub mod subtitles;
pub mod translate;
pub mod youtube;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A single timed subtitle segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// An ordered run of segments with its language tag and provenance flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleSet {
    pub language: String,
    pub is_example: bool,
    pub segments: Vec<Segment>,
}

/// Display metadata for a video; never persisted
#[derive(Debug, Clone, Serialize)]
pub struct VideoInfo {
    pub title: String,
    pub thumbnail: String,
    pub channel_title: String,
}

/// Build the shared HTTP client with a bounded request timeout
pub fn build_client(timeout_secs: u64) -> eyre::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Extract the video ID from the known YouTube URL shapes.
///
/// Returns the captured token only when it is exactly 11 characters long.
pub fn extract_video_id(url: &str) -> Option<String> {
    let re = regex::Regex::new(r"(?:youtu\.be/|/v/|/u/\w/|/embed/|\?v=|&v=)([^#&?]*)").unwrap();
    let caps = re.captures(url)?;
    let id = &caps[1];
    (id.len() == 11).then(|| id.to_string())
}
