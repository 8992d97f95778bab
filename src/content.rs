use async_trait::async_trait;
use url::Url;

use crate::error::{AppError, Result};
use crate::scraper::PageLoader;
use crate::youtube::{self, VideoLoader, YoutubeError};

pub const YOUTUBE_LOAD_FAILED: &str = "Failed to load YouTube content. Please ensure:\n\
    1. The video exists and is publicly available\n\
    2. The video has English subtitles/captions available\n\
    3. The URL is correct and accessible";

pub const YOUTUBE_TRANSCRIPT_UNAVAILABLE: &str =
    "Could not extract YouTube transcript. Please ensure the video has English subtitles available.";

pub const YOUTUBE_NO_CONTENT: &str = "No content could be extracted from the YouTube video";

pub const NO_CONTENT: &str = "No content could be extracted from the URL";

/// A unit of loaded source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub content: String,
    pub source: String,
    pub title: Option<String>,
    pub author: Option<String>,
}

#[async_trait]
pub trait ContentLoader: Send + Sync {
    async fn load(&self, url: &Url) -> Result<Vec<Document>>;
}

/// Routes YouTube URLs to the transcript loader and everything else to the
/// page loader.
pub struct UrlLoader<V, P> {
    video: V,
    page: P,
}

impl<V: VideoLoader, P: PageLoader> UrlLoader<V, P> {
    pub fn new(video: V, page: P) -> Self {
        Self { video, page }
    }
}

fn youtube_error_detail(err: &YoutubeError) -> &'static str {
    match err {
        YoutubeError::Transcript(_) => YOUTUBE_TRANSCRIPT_UNAVAILABLE,
        YoutubeError::EmptyTranscript => YOUTUBE_NO_CONTENT,
        YoutubeError::InvalidVideoUrl | YoutubeError::Setup(_) => YOUTUBE_LOAD_FAILED,
    }
}

#[async_trait]
impl<V: VideoLoader, P: PageLoader> ContentLoader for UrlLoader<V, P> {
    async fn load(&self, url: &Url) -> Result<Vec<Document>> {
        if youtube::is_youtube_url(url) {
            return match self.video.load_video(url).await {
                Ok(doc) => Ok(vec![doc]),
                Err(e) => {
                    tracing::error!(%url, error = %e, "Failed to load YouTube content");
                    Err(AppError::FetchError(youtube_error_detail(&e).to_string()))
                }
            };
        }

        match self.page.fetch_document(url).await {
            Ok(Some(doc)) => Ok(vec![doc]),
            Ok(None) => Err(AppError::FetchError(NO_CONTENT.to_string())),
            Err(e) => {
                tracing::error!(%url, error = %e, "Error loading content from URL");
                Err(AppError::FetchError(format!("Failed to load content: {}", e)))
            }
        }
    }
}
