use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use groq_summarizer::llm::{LlmError, Summarizer};

#[derive(Clone, Debug)]
pub struct SummarizeCall {
    pub api_key: String,
    pub prompt: String,
}

#[derive(Clone)]
pub struct MockSummarizer {
    pub summary: String,
    pub calls: Arc<Mutex<Vec<SummarizeCall>>>,
    pub fail_with_status: Option<u16>,
    pub delay: Option<Duration>,
}

impl MockSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with_status: None,
            delay: None,
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Self::new("")
        }
    }

    pub fn slow(summary: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(summary)
        }
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, api_key: &str, prompt: &str) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(SummarizeCall {
            api_key: api_key.to_string(),
            prompt: prompt.to_string(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(status) = self.fail_with_status {
            return Err(LlmError::Api {
                status,
                message: "mock failure".to_string(),
            });
        }
        Ok(self.summary.clone())
    }
}
