//! YouTube transcript loading.
//!
//! Transcripts come from `yt-transcript-rs`; the title and channel name come
//! from YouTube's oEmbed endpoint and are optional.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;
use yt_transcript_rs::api::YouTubeTranscriptApi;

use crate::content::Document;

const OEMBED_URL: &str = "https://www.youtube.com/oembed";
const TRANSCRIPT_LANGUAGES: &[&str] = &["en"];

#[derive(Debug, thiserror::Error)]
pub enum YoutubeError {
    #[error("not a recognised YouTube video URL")]
    InvalidVideoUrl,
    #[error("could not retrieve transcript: {0}")]
    Transcript(String),
    #[error("No content could be extracted from the YouTube video")]
    EmptyTranscript,
    #[error("failed to set up the YouTube client: {0}")]
    Setup(String),
}

/// Source of video transcripts.
#[async_trait]
pub trait VideoLoader: Send + Sync {
    async fn load_video(&self, url: &Url) -> Result<Document, YoutubeError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub author_name: Option<String>,
}

pub fn is_youtube_url(url: &Url) -> bool {
    match url.host_str() {
        Some(host) => {
            let host = host.to_ascii_lowercase();
            host == "youtu.be" || host == "youtube.com" || host.ends_with(".youtube.com")
        }
        None => false,
    }
}

/// Extracts the 11 character video id from the common YouTube URL shapes.
pub fn video_id(url: &Url) -> Result<String, YoutubeError> {
    if !is_youtube_url(url) {
        return Err(YoutubeError::InvalidVideoUrl);
    }

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let mut segments = url.path_segments().into_iter().flatten().filter(|s| !s.is_empty());

    let candidate = if host == "youtu.be" {
        segments.next().map(str::to_string)
    } else {
        match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some("shorts" | "embed" | "live" | "v") => segments.next().map(str::to_string),
            _ => None,
        }
    };

    candidate
        .filter(|id| is_valid_video_id(id))
        .ok_or(YoutubeError::InvalidVideoUrl)
}

fn is_valid_video_id(id: &str) -> bool {
    id.len() == 11
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub struct YoutubeLoader {
    api: YouTubeTranscriptApi,
    client: Client,
}

impl YoutubeLoader {
    pub fn new(timeout: Duration) -> Result<Self, YoutubeError> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| YoutubeError::Setup(e.to_string()))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| YoutubeError::Setup(e.to_string()))?;

        Ok(Self { api, client })
    }

    async fn video_info(&self, video_id: &str) -> Result<VideoInfo, reqwest::Error> {
        let watch_url = format!("https://www.youtube.com/watch?v={}", video_id);

        self.client
            .get(OEMBED_URL)
            .query(&[("url", watch_url.as_str()), ("format", "json")])
            .send()
            .await?
            .error_for_status()?
            .json::<VideoInfo>()
            .await
    }
}

#[async_trait]
impl VideoLoader for YoutubeLoader {
    /// Loads the English transcript, with video info attached when available.
    async fn load_video(&self, url: &Url) -> Result<Document, YoutubeError> {
        let video_id = video_id(url)?;

        let transcript = self
            .api
            .fetch_transcript(&video_id, TRANSCRIPT_LANGUAGES, false)
            .await
            .map_err(|e| YoutubeError::Transcript(e.to_string()))?;

        let content = transcript.text();
        if content.trim().is_empty() {
            return Err(YoutubeError::EmptyTranscript);
        }

        let info = match self.video_info(&video_id).await {
            Ok(info) => {
                tracing::info!(%video_id, "Loaded YouTube transcript with video info");
                Some(info)
            }
            Err(e) => {
                tracing::warn!(%video_id, error = %e, "Failed to load video info, continuing without it");
                None
            }
        };

        Ok(Document {
            content,
            source: url.to_string(),
            title: info.as_ref().map(|info| info.title.clone()),
            author: info.and_then(|info| info.author_name),
        })
    }
}
