use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::{Segment, SubtitleSet};

/// Language tag carried by the placeholder transcript
const PLACEHOLDER_LANG: &str = "en";

/// Segment length assumed when the provider omits an end time
const DEFAULT_SEGMENT_SECS: f64 = 5.0;

#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("no subtitles available for video {video_id}")]
    NoTranscript { video_id: String },

    #[error("subtitle provider request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("subtitle provider returned an unusable body: {0}")]
    Malformed(String),
}

/// Result of a subtitle fetch. The caller always gets a renderable set;
/// a fallback additionally carries the reason it happened so callers can
/// reject placeholder data if they want to.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(SubtitleSet),
    Fallback {
        subtitles: SubtitleSet,
        reason: FetchFailure,
    },
}

impl FetchOutcome {
    pub fn into_set(self) -> SubtitleSet {
        match self {
            FetchOutcome::Fetched(set) => set,
            FetchOutcome::Fallback { subtitles, .. } => subtitles,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    subtitles: Option<Vec<ProviderItem>>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderItem {
    start: Option<f64>,
    end: Option<f64>,
    text: Option<String>,
}

/// Fetch subtitles for a video from the configured provider.
///
/// Never fails: any provider problem (transport error, non-2xx, malformed
/// body, zero usable items) resolves to the fixed example transcript.
pub async fn fetch_subtitles(client: &reqwest::Client, base_url: &str, video_id: &str) -> FetchOutcome {
    match fetch_from_provider(client, base_url, video_id).await {
        Ok(set) => FetchOutcome::Fetched(set),
        Err(reason) => {
            warn!("Subtitle fetch failed for {video_id}: {reason}");
            FetchOutcome::Fallback {
                subtitles: example_subtitles(video_id),
                reason,
            }
        }
    }
}

async fn fetch_from_provider(
    client: &reqwest::Client,
    base_url: &str,
    video_id: &str,
) -> Result<SubtitleSet, FetchFailure> {
    let url = format!("{}/{video_id}", base_url.trim_end_matches('/'));
    debug!("Fetching subtitles: {url}");

    let body = client.get(&url).send().await?.error_for_status()?.text().await?;

    let parsed: ProviderResponse =
        serde_json::from_str(&body).map_err(|e| FetchFailure::Malformed(e.to_string()))?;

    let segments: Vec<Segment> = parsed
        .subtitles
        .unwrap_or_default()
        .into_iter()
        .filter_map(normalize_item)
        .collect();

    if segments.is_empty() {
        return Err(FetchFailure::NoTranscript {
            video_id: video_id.to_string(),
        });
    }

    Ok(SubtitleSet {
        language: parsed.language.unwrap_or_else(|| "auto".to_string()),
        is_example: false,
        segments,
    })
}

// end >= start >= 0 must hold even on sloppy provider data
fn normalize_item(item: ProviderItem) -> Option<Segment> {
    let start = item.start.filter(|s| s.is_finite() && *s >= 0.0)?;
    let text = item.text.filter(|t| !t.trim().is_empty())?;
    let end = item
        .end
        .filter(|e| e.is_finite())
        .map(|e| e.max(start))
        .unwrap_or(start + DEFAULT_SEGMENT_SECS);
    Some(Segment { start, end, text })
}

/// The fixed placeholder transcript substituted on any fetch failure
pub fn example_subtitles(video_id: &str) -> SubtitleSet {
    SubtitleSet {
        language: PLACEHOLDER_LANG.to_string(),
        is_example: true,
        segments: vec![
            Segment {
                start: 0.0,
                end: 5.0,
                text: "These are example subtitles.".to_string(),
            },
            Segment {
                start: 6.0,
                end: 10.0,
                text: "The real subtitles could not be fetched.".to_string(),
            },
            Segment {
                start: 11.0,
                end: 15.0,
                text: format!("Video ID: {video_id}"),
            },
            Segment {
                start: 16.0,
                end: 20.0,
                text: "Try again later or with another video.".to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subs/dQw4w9WgXcQ"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "subtitles": [
                    { "start": 0.0, "end": 2.5, "text": "hello" },
                    { "start": 2.5, "text": "world" }
                ],
                "language": "en"
            })))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let base = format!("{}/subs", server.uri());
        let outcome = fetch_subtitles(&client, &base, "dQw4w9WgXcQ").await;

        let FetchOutcome::Fetched(set) = outcome else {
            panic!("expected fetched subtitles");
        };
        assert_eq!(set.language, "en");
        assert!(!set.is_example);
        assert_eq!(set.segments.len(), 2);
        assert_eq!(set.segments[0].text, "hello");
        // missing end defaults to start + 5
        assert!((set.segments[1].end - 7.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_fetch_server_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let base = format!("{}/subs", server.uri());
        let outcome = fetch_subtitles(&client, &base, "dQw4w9WgXcQ").await;

        let FetchOutcome::Fallback { subtitles, reason } = outcome else {
            panic!("expected fallback");
        };
        assert!(matches!(reason, FetchFailure::Upstream(_)));
        assert!(subtitles.is_example);
        assert_eq!(subtitles.segments.len(), 4);
        assert!(subtitles.segments.iter().any(|s| s.text.contains("dQw4w9WgXcQ")));
    }

    #[tokio::test]
    async fn test_fetch_zero_items_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "subtitles": []
            })))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let base = format!("{}/subs", server.uri());
        let outcome = fetch_subtitles(&client, &base, "dQw4w9WgXcQ").await;

        let FetchOutcome::Fallback { reason, .. } = outcome else {
            panic!("expected fallback");
        };
        assert!(matches!(reason, FetchFailure::NoTranscript { .. }));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let base = format!("{}/subs", server.uri());
        let outcome = fetch_subtitles(&client, &base, "dQw4w9WgXcQ").await;

        let FetchOutcome::Fallback { reason, .. } = outcome else {
            panic!("expected fallback");
        };
        assert!(matches!(reason, FetchFailure::Malformed(_)));
    }

    #[test]
    fn test_normalize_skips_unusable_items() {
        assert!(normalize_item(ProviderItem { start: None, end: None, text: Some("x".into()) }).is_none());
        assert!(normalize_item(ProviderItem { start: Some(1.0), end: None, text: None }).is_none());
        assert!(normalize_item(ProviderItem { start: Some(-1.0), end: None, text: Some("x".into()) }).is_none());
        assert!(normalize_item(ProviderItem { start: Some(1.0), end: None, text: Some("  ".into()) }).is_none());
    }

    #[test]
    fn test_normalize_clamps_end_to_start() {
        let seg = normalize_item(ProviderItem {
            start: Some(4.0),
            end: Some(2.0),
            text: Some("x".into()),
        })
        .unwrap();
        assert!((seg.end - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_example_subtitles_shape() {
        let set = example_subtitles("abc123def45");
        assert!(set.is_example);
        assert_eq!(set.language, "en");
        assert_eq!(set.segments.len(), 4);
        assert!(set.segments[2].text.contains("abc123def45"));
        for seg in &set.segments {
            assert!(seg.end >= seg.start && seg.start >= 0.0);
        }
    }
}
