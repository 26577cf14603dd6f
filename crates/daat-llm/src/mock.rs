//! Test-only mock provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::provider::{LlmProvider, Message};

/// How the mock turns text into a vector.
#[derive(Debug, Clone)]
pub enum MockEmbedding {
    /// Every text maps to the same vector.
    Fixed(Vec<f32>),
    /// Bag-of-words over `dim` buckets, so texts sharing words score higher.
    BagOfWords(usize),
}

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    received: Arc<Mutex<Vec<Vec<Message>>>>,
    embed_calls: Arc<AtomicUsize>,
    embeds_in_flight: Arc<AtomicUsize>,
    peak_embeds_in_flight: Arc<AtomicUsize>,
    pub default_response: String,
    pub embedding: MockEmbedding,
    pub supports_embeddings: bool,
    pub fail_chat: bool,
    pub fail_embed: bool,
    /// Milliseconds to sleep before returning a response.
    pub delay_ms: u64,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            received: Arc::new(Mutex::new(Vec::new())),
            embed_calls: Arc::new(AtomicUsize::new(0)),
            embeds_in_flight: Arc::new(AtomicUsize::new(0)),
            peak_embeds_in_flight: Arc::new(AtomicUsize::new(0)),
            default_response: "mock response".into(),
            embedding: MockEmbedding::Fixed(vec![0.0; 1536]),
            supports_embeddings: true,
            fail_chat: false,
            fail_embed: false,
            delay_ms: 0,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_embedding(embedding: Vec<f32>) -> Self {
        Self {
            embedding: MockEmbedding::Fixed(embedding),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bag_of_words(dim: usize) -> Self {
        Self {
            embedding: MockEmbedding::BagOfWords(dim),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_chat: true,
            fail_embed: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// Number of `embed` calls made so far, across clones.
    #[must_use]
    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    /// Most `embed` calls that were pending at the same time.
    #[must_use]
    pub fn peak_embeds_in_flight(&self) -> usize {
        self.peak_embeds_in_flight.load(Ordering::SeqCst)
    }

    /// Message lists passed to `chat`, oldest first.
    #[must_use]
    pub fn received(&self) -> Vec<Vec<Message>> {
        self.received.lock().unwrap().clone()
    }
}

fn bag_of_words(text: &str, dim: usize) -> Vec<f32> {
    let dim = dim.max(1);
    let mut vector = vec![0.0; dim];
    for word in text.split_whitespace() {
        let bucket = word
            .to_lowercase()
            .bytes()
            .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(usize::from(b)));
        vector[bucket % dim] += 1.0;
    }
    vector
}

impl LlmProvider for MockProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, crate::LlmError> {
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        self.received.lock().unwrap().push(messages.to_vec());
        if self.fail_chat {
            return Err(crate::LlmError::Other("mock LLM error".into()));
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, crate::LlmError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        let pending = self.embeds_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_embeds_in_flight.fetch_max(pending, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        self.embeds_in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.fail_embed {
            return Err(crate::LlmError::Other("mock embed error".into()));
        }
        if !self.supports_embeddings {
            return Err(crate::LlmError::EmbedUnsupported { provider: "mock" });
        }
        Ok(match &self.embedding {
            MockEmbedding::Fixed(v) => v.clone(),
            MockEmbedding::BagOfWords(dim) => bag_of_words(text, *dim),
        })
    }

    fn supports_embeddings(&self) -> bool {
        self.supports_embeddings
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn responses_consumed_in_order() {
        let p = MockProvider::with_responses(vec!["one".into(), "two".into()]);
        let msgs = [Message::user("hi")];
        assert_eq!(p.chat(&msgs).await.unwrap(), "one");
        assert_eq!(p.chat(&msgs).await.unwrap(), "two");
        assert_eq!(p.chat(&msgs).await.unwrap(), "mock response");
        assert_eq!(p.received().len(), 3);
    }

    #[tokio::test]
    async fn bag_of_words_shares_buckets_for_shared_words() {
        let p = MockProvider::bag_of_words(16);
        let a = p.embed("alpha beta").await.unwrap();
        let b = p.embed("Alpha").await.unwrap();
        assert_eq!(a.len(), 16);
        let shared = a.iter().zip(&b).any(|(x, y)| *x > 0.0 && *y > 0.0);
        assert!(shared);
        assert_eq!(p.embed_calls(), 2);
    }

    #[tokio::test]
    async fn tracks_concurrent_embeds() {
        let p = MockProvider::with_embedding(vec![1.0]).with_delay(20);
        let (a, b) = tokio::join!(p.embed("a"), p.embed("b"));
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(p.peak_embeds_in_flight(), 2);
    }

    #[tokio::test]
    async fn failing_provider_errors() {
        let p = MockProvider::failing();
        assert!(p.embed("x").await.is_err());
        assert!(p.chat(&[Message::user("x")]).await.is_err());
    }
}
