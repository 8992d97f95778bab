use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use groq_summarizer::content::{ContentLoader, Document};
use groq_summarizer::error::{AppError, Result};
use url::Url;

#[derive(Clone)]
pub struct MockLoader {
    pub docs: Vec<Document>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockLoader {
    pub fn new(content: &str) -> Self {
        Self {
            docs: vec![Document {
                content: content.to_string(),
                source: "mock".to_string(),
                title: Some("Mock Page".to_string()),
                author: None,
            }],
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            docs: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

#[async_trait]
impl ContentLoader for MockLoader {
    async fn load(&self, url: &Url) -> Result<Vec<Document>> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(AppError::FetchError(msg.clone()));
        }
        Ok(self.docs.clone())
    }
}
