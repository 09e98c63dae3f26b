use eyre::Result;
use log::debug;
use serde::Deserialize;

use crate::VideoInfo;
use crate::config::Config;

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    items: Option<Vec<VideoItem>>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
    #[serde(rename = "channelTitle")]
    channel_title: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// Look up display metadata for a video.
///
/// Without a configured API key this returns a fixed placeholder record
/// and performs no network call. With a key, the provider's first result
/// item is mapped; zero items yield None, and transport/parse failures
/// propagate to the caller. Unlike the subtitle and translation paths,
/// metadata does not self-heal with placeholder data.
pub async fn get_video_info(
    client: &reqwest::Client,
    config: &Config,
    video_id: &str,
) -> Result<Option<VideoInfo>> {
    let Some(api_key) = config.youtube_api_key.as_deref() else {
        debug!("No YouTube API key configured, using placeholder metadata for {video_id}");
        return Ok(Some(placeholder_info(video_id)));
    };

    debug!("Fetching video metadata for {video_id}");
    let url = format!("{}?part=snippet&id={video_id}&key={api_key}", config.youtube_api_url);

    let resp: VideoListResponse = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let Some(item) = resp.items.unwrap_or_default().into_iter().next() else {
        return Ok(None);
    };

    let snippet = item.snippet;
    let thumbnail = snippet
        .thumbnails
        .and_then(|t| t.medium.or(t.default))
        .map(|t| t.url)
        .unwrap_or_else(|| default_thumbnail(video_id));

    Ok(Some(VideoInfo {
        title: snippet.title.unwrap_or_else(|| format!("Video {video_id}")),
        thumbnail,
        channel_title: snippet.channel_title.unwrap_or_default(),
    }))
}

fn placeholder_info(video_id: &str) -> VideoInfo {
    VideoInfo {
        title: format!("Video {video_id}"),
        thumbnail: default_thumbnail(video_id),
        channel_title: "YouTube channel".to_string(),
    }
}

fn default_thumbnail(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/mqdefault.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer, key: Option<&str>) -> Config {
        Config {
            youtube_api_url: format!("{}/videos", server.uri()),
            youtube_api_key: key.map(|k| k.to_string()),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_placeholder_without_api_key() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let config = test_config(&server, None);
        let info = get_video_info(&client, &config, "dQw4w9WgXcQ").await.unwrap().unwrap();

        assert_eq!(info.title, "Video dQw4w9WgXcQ");
        assert!(info.thumbnail.contains("dQw4w9WgXcQ"));
    }

    #[tokio::test]
    async fn test_maps_first_item() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("id", "dQw4w9WgXcQ"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{
                    "snippet": {
                        "title": "Never Gonna Give You Up",
                        "channelTitle": "Rick Astley",
                        "thumbnails": {
                            "medium": { "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/mqdefault.jpg" }
                        }
                    }
                }]
            })))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let config = test_config(&server, Some("test-key"));
        let info = get_video_info(&client, &config, "dQw4w9WgXcQ").await.unwrap().unwrap();

        assert_eq!(info.title, "Never Gonna Give You Up");
        assert_eq!(info.channel_title, "Rick Astley");
        assert_eq!(info.thumbnail, "https://i.ytimg.com/vi/dQw4w9WgXcQ/mqdefault.jpg");
    }

    #[tokio::test]
    async fn test_zero_items_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let config = test_config(&server, Some("test-key"));
        let info = get_video_info(&client, &config, "dQw4w9WgXcQ").await.unwrap();
        assert!(info.is_none());
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let config = test_config(&server, Some("test-key"));
        assert!(get_video_info(&client, &config, "dQw4w9WgXcQ").await.is_err());
    }
}
