use std::time::Duration;

use eyre::Result;
use log::{debug, warn};

use crate::{Segment, SubtitleSet};

/// Number of segments translated between pacing pauses
const PACING_BATCH: usize = 5;

/// Pause inserted after each pacing batch
const PACING_DELAY: Duration = Duration::from_millis(500);

/// Translate a single piece of text.
///
/// Returns the input unchanged when target equals source or the text is
/// blank (no network call), and on any provider failure. Translation
/// problems are absorbed here, never surfaced to the caller.
pub async fn translate_text(
    client: &reqwest::Client,
    endpoint: &str,
    text: &str,
    target_lang: &str,
    source_lang: &str,
) -> String {
    if target_lang == source_lang || text.trim().is_empty() {
        return text.to_string();
    }

    match request_translation(client, endpoint, text, target_lang, source_lang).await {
        Ok(translated) => translated,
        Err(e) => {
            warn!("Translation failed, keeping original text: {e}");
            text.to_string()
        }
    }
}

async fn request_translation(
    client: &reqwest::Client,
    endpoint: &str,
    text: &str,
    target_lang: &str,
    source_lang: &str,
) -> Result<String> {
    let body = serde_json::json!({
        "q": text,
        "source": source_lang,
        "target": target_lang,
        "format": "text"
    });

    let resp: serde_json::Value = client
        .post(endpoint)
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    resp.get("translatedText")
        .and_then(|t| t.as_str())
        .map(|t| t.to_string())
        .ok_or_else(|| eyre::eyre!("no translatedText in response"))
}

/// Translate every segment of a subtitle set, one at a time, pausing
/// briefly after each batch to go easy on the public endpoint.
///
/// The returned set is tagged with the target language; the input's
/// example flag is preserved.
pub async fn translate_subtitles(
    client: &reqwest::Client,
    endpoint: &str,
    set: &SubtitleSet,
    target_lang: &str,
    source_lang: &str,
) -> SubtitleSet {
    if set.segments.is_empty() {
        return SubtitleSet {
            language: target_lang.to_string(),
            is_example: set.is_example,
            segments: Vec::new(),
        };
    }

    debug!("Translating {} segments to {target_lang}", set.segments.len());

    let mut segments = Vec::with_capacity(set.segments.len());
    for (i, segment) in set.segments.iter().enumerate() {
        let text = translate_text(client, endpoint, &segment.text, target_lang, source_lang).await;
        segments.push(Segment { text, ..segment.clone() });

        if i % PACING_BATCH == PACING_BATCH - 1 {
            tokio::time::sleep(PACING_DELAY).await;
        }
    }

    SubtitleSet {
        language: target_lang.to_string(),
        is_example: set.is_example,
        segments,
    }
}
