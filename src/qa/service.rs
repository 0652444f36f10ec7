//! The question-answering orchestrator.

use super::{DeleteOutcome, StoreRequest, NO_MATCH_FALLBACK};
use crate::chunking::chunk_text;
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, SporreError};
use crate::llm::{LanguageModel, OpenAIChatModel};
use crate::session::{Session, SessionStore};
use crate::vector_index::{
    ChunkMetadata, IndexEntry, MemoryVectorIndex, SqliteVectorIndex, VectorIndex,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Service for webpage content Q&A over a vector index.
///
/// The embedding provider, vector index, and language model are injected at
/// construction so tests can substitute fakes.
pub struct QaService {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    llm: Arc<dyn LanguageModel>,
    sessions: SessionStore,
    prompts: Prompts,
    default_chunk_size: usize,
    default_chunk_overlap: usize,
}

impl QaService {
    /// Create a service from explicit components.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        llm: Arc<dyn LanguageModel>,
        prompts: Prompts,
        default_chunk_size: usize,
        default_chunk_overlap: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            llm,
            sessions: SessionStore::new(),
            prompts,
            default_chunk_size,
            default_chunk_overlap,
        }
    }

    /// Create a service wired from settings: OpenAI embedder and chat model,
    /// and the configured vector index backend.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let index: Arc<dyn VectorIndex> = match settings.vector_index.provider.as_str() {
            "memory" => Arc::new(MemoryVectorIndex::new()),
            _ => Arc::new(SqliteVectorIndex::new(&settings.sqlite_path())?),
        };

        let llm = Arc::new(OpenAIChatModel::with_config(
            &settings.llm.model,
            settings.llm.temperature,
            settings.llm.max_tokens,
        ));

        Ok(Self::new(
            embedder,
            index,
            llm,
            prompts,
            settings.chunking.chunk_size,
            settings.chunking.chunk_overlap,
        ))
    }

    /// Get a reference to the vector index (as trait object).
    pub fn index(&self) -> Arc<dyn VectorIndex> {
        self.index.clone()
    }

    /// Store document content in the vector index and record a session.
    ///
    /// Chunks the content, embeds every chunk in order, writes all index
    /// entries in one batch, then records the session. Returns the new
    /// session id. Embedding or index failures propagate as `StorageFailed`
    /// with the cause chained; nothing is retried.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn store(&self, request: StoreRequest) -> Result<String> {
        let combined = request.content.trim();
        if combined.is_empty() {
            return Err(SporreError::EmptyContent);
        }

        let chunk_size = request.chunk_size.unwrap_or(self.default_chunk_size);
        let chunk_overlap = request.chunk_overlap.unwrap_or(self.default_chunk_overlap);

        let chunks = chunk_text(combined, chunk_size, chunk_overlap)?;
        if chunks.is_empty() {
            // The chunker never returns an empty set for non-empty input,
            // but storing a session with no chunks would be unanswerable.
            return Err(SporreError::NoChunksProduced);
        }

        let session_id = Uuid::new_v4().to_string();
        info!(
            "Storing '{}': {} chars in {} chunks (size={}, overlap={})",
            request.title,
            combined.chars().count(),
            chunks.len(),
            chunk_size,
            chunk_overlap
        );

        let embeddings = self
            .embedder
            .embed_documents(&chunks)
            .await
            .map_err(|e| {
                error!("Embedding failed while storing '{}': {}", request.title, e);
                SporreError::storage(e)
            })?;

        let stored_at = Utc::now();
        let total_chunks = chunks.len();
        let entries: Vec<IndexEntry> = chunks
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (chunk, embedding))| IndexEntry {
                id: IndexEntry::entry_id(&session_id, i),
                embedding,
                document: chunk.clone(),
                metadata: ChunkMetadata {
                    session_id: session_id.clone(),
                    title: request.title.clone(),
                    url: request.url.clone(),
                    chunk_index: i,
                    total_chunks,
                    stored_at,
                    extra: request.metadata.clone(),
                },
            })
            .collect();

        self.index.upsert(&entries).await.map_err(|e| {
            error!("Index upsert failed while storing '{}': {}", request.title, e);
            SporreError::storage(e)
        })?;

        self.sessions.insert(Session {
            id: session_id.clone(),
            title: request.title,
            url: request.url,
            chunk_count: total_chunks,
            content_length: combined.chars().count(),
            chunk_size,
            chunk_overlap,
            created_at: stored_at,
            metadata: request.metadata,
        });

        info!("Stored session {}", session_id);
        Ok(session_id)
    }

    /// Answer a question about a stored session.
    ///
    /// Embeds the question, retrieves the `top_k` nearest chunks for the
    /// session, and prompts the language model with them. If retrieval finds
    /// nothing, returns the fixed fallback answer without calling the model.
    #[instrument(skip(self, question), fields(session_id = %session_id))]
    pub async fn ask(&self, session_id: &str, question: &str, top_k: usize) -> Result<String> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| SporreError::SessionNotFound(session_id.to_string()))?;

        let question_embedding = self.embedder.embed_query(question).await.map_err(|e| {
            error!("Question embedding failed for session {}: {}", session_id, e);
            SporreError::query(e)
        })?;

        let matches = self
            .index
            .query(&question_embedding, top_k, session_id)
            .await
            .map_err(|e| {
                error!("Index query failed for session {}: {}", session_id, e);
                SporreError::query(e)
            })?;

        if matches.is_empty() {
            info!("No relevant chunks for session {}", session_id);
            return Ok(NO_MATCH_FALLBACK.to_string());
        }

        let context = matches
            .iter()
            .map(|m| m.document.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut vars = HashMap::new();
        vars.insert("title".to_string(), session.title);
        vars.insert("url".to_string(), session.url);
        vars.insert("context".to_string(), context);
        vars.insert("question".to_string(), question.to_string());

        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.qa.template, &vars);

        let answer = self.llm.generate(&prompt).await.map_err(|e| {
            error!("Generation failed for session {}: {}", session_id, e);
            SporreError::query(e)
        })?;

        info!("Answered from {} chunks", matches.len());
        Ok(answer)
    }

    /// Get information about a stored session.
    pub fn session_info(&self, session_id: &str) -> Option<Session> {
        self.sessions.get(session_id)
    }

    /// List all active sessions.
    pub fn list_sessions(&self) -> Vec<Session> {
        self.sessions.list()
    }

    /// Delete a session and its indexed content.
    ///
    /// Index deletion is attempted first; if it fails, the session record is
    /// retained and `IndexDeleteFailed` is returned so a later delete can
    /// retry.
    #[instrument(skip(self))]
    pub async fn delete_session(&self, session_id: &str) -> DeleteOutcome {
        if !self.sessions.contains(session_id) {
            return DeleteOutcome::NotFound;
        }

        match self.index.delete_session(session_id).await {
            Ok(removed) => {
                self.sessions.remove(session_id);
                info!("Deleted session {} ({} index entries)", session_id, removed);
                DeleteOutcome::Deleted
            }
            Err(e) => {
                error!(
                    "Index deletion failed for session {}, keeping session record: {}",
                    session_id, e
                );
                DeleteOutcome::IndexDeleteFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_index::ScoredEntry;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Deterministic embedder: maps text to a small vector derived from its
    /// bytes, so equal texts embed equally.
    struct FakeEmbedder {
        fail: bool,
    }

    impl FakeEmbedder {
        fn new() -> Self {
            Self { fail: false }
        }

        fn failing() -> Self {
            Self { fail: true }
        }

        fn vector_for(text: &str) -> Vec<f32> {
            let bytes = text.as_bytes();
            let sum: u32 = bytes.iter().map(|b| *b as u32).sum();
            vec![
                bytes.len() as f32,
                (sum % 97) as f32,
                bytes.first().copied().unwrap_or(0) as f32,
            ]
        }
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if self.fail {
                return Err(SporreError::ProviderUnavailable(
                    "embedding service down".to_string(),
                ));
            }
            Ok(texts.iter().map(|t| Self::vector_for(t)).collect())
        }

        async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
            if self.fail {
                return Err(SporreError::ProviderUnavailable(
                    "embedding service down".to_string(),
                ));
            }
            Ok(Self::vector_for(text))
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    /// Language model fake that records prompts and returns a canned answer.
    struct FakeLanguageModel {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeLanguageModel {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl LanguageModel for FakeLanguageModel {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("a grounded answer".to_string())
        }

        async fn generate_with_image(
            &self,
            prompt: &str,
            _image: &crate::llm::EncodedImage,
        ) -> Result<String> {
            self.generate(prompt).await
        }
    }

    /// Index whose deletes always fail, for partial-failure tests.
    struct DeleteFailingIndex {
        inner: MemoryVectorIndex,
    }

    #[async_trait]
    impl VectorIndex for DeleteFailingIndex {
        async fn upsert(&self, entries: &[IndexEntry]) -> Result<usize> {
            self.inner.upsert(entries).await
        }

        async fn query(
            &self,
            embedding: &[f32],
            top_k: usize,
            session_id: &str,
        ) -> Result<Vec<ScoredEntry>> {
            self.inner.query(embedding, top_k, session_id).await
        }

        async fn delete_session(&self, _session_id: &str) -> Result<usize> {
            Err(SporreError::VectorIndex("index offline".to_string()))
        }

        async fn entry_count(&self) -> Result<usize> {
            self.inner.entry_count().await
        }
    }

    struct Harness {
        service: QaService,
        index: Arc<MemoryVectorIndex>,
        llm: Arc<FakeLanguageModel>,
    }

    fn harness() -> Harness {
        let index = Arc::new(MemoryVectorIndex::new());
        let llm = Arc::new(FakeLanguageModel::new());
        let service = QaService::new(
            Arc::new(FakeEmbedder::new()),
            index.clone(),
            llm.clone(),
            Prompts::default(),
            1000,
            200,
        );
        Harness { service, index, llm }
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let h = harness();

        let content = format!("  {}  ", "Rust is a systems language. ".repeat(80));
        let trimmed_len = content.trim().chars().count();

        let session_id = h
            .service
            .store(StoreRequest::new("Rust Guide", "https://example.com/rust", content))
            .await
            .unwrap();

        let session = h.service.session_info(&session_id).unwrap();
        assert_eq!(session.content_length, trimmed_len);
        assert_eq!(session.chunk_size, 1000);
        assert_eq!(session.chunk_overlap, 200);
        assert_eq!(
            session.chunk_count,
            h.index.entry_count().await.unwrap()
        );
        assert!(session.chunk_count >= 1);
    }

    #[tokio::test]
    async fn test_store_rejects_empty_content() {
        let h = harness();

        let err = h
            .service
            .store(StoreRequest::new("Blank", "https://example.com", "  \n  "))
            .await
            .unwrap_err();
        assert!(matches!(err, SporreError::EmptyContent));
        assert!(h.service.list_sessions().is_empty());
    }

    #[tokio::test]
    async fn test_store_wraps_embedding_failure() {
        let index = Arc::new(MemoryVectorIndex::new());
        let service = QaService::new(
            Arc::new(FakeEmbedder::failing()),
            index.clone(),
            Arc::new(FakeLanguageModel::new()),
            Prompts::default(),
            1000,
            200,
        );

        let err = service
            .store(StoreRequest::new("Doc", "https://example.com", "some content"))
            .await
            .unwrap_err();
        assert!(matches!(err, SporreError::StorageFailed { .. }));
        assert!(service.list_sessions().is_empty());
        assert_eq!(index.entry_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_example_scenario() {
        let h = harness();

        // 2000 chars, size 500, overlap 100 -> 5 chunks.
        let mut request = StoreRequest::new("Doc", "http://x", "A".repeat(2000));
        request.chunk_size = Some(500);
        request.chunk_overlap = Some(100);

        let session_id = h.service.store(request).await.unwrap();

        let sessions = h.service.list_sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].chunk_count, 5);

        let answer = h
            .service
            .ask(&session_id, "what is this about?", 3)
            .await
            .unwrap();
        assert!(!answer.is_empty());
    }

    #[tokio::test]
    async fn test_ask_unknown_session() {
        let h = harness();

        let err = h.service.ask("no-such-id", "hello?", 3).await.unwrap_err();
        assert!(matches!(err, SporreError::SessionNotFound(_)));
        assert_eq!(h.llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ask_prompt_contains_session_and_question() {
        let h = harness();

        let session_id = h
            .service
            .store(StoreRequest::new(
                "Lovebird Facts",
                "https://example.com/birds",
                "Lovebirds are small parrots native to Africa.",
            ))
            .await
            .unwrap();

        let answer = h
            .service
            .ask(&session_id, "Where are lovebirds from?", 3)
            .await
            .unwrap();
        assert_eq!(answer, "a grounded answer");

        let prompt = h.llm.last_prompt().unwrap();
        assert!(prompt.contains("Lovebird Facts"));
        assert!(prompt.contains("https://example.com/birds"));
        assert!(prompt.contains("native to Africa"));
        assert!(prompt.contains("Where are lovebirds from?"));
    }

    #[tokio::test]
    async fn test_no_match_fallback_skips_model() {
        let h = harness();

        let session_id = h
            .service
            .store(StoreRequest::new("Doc", "https://example.com", "short content"))
            .await
            .unwrap();

        // Drain the index behind the service's back so retrieval comes up
        // empty while the session record survives.
        h.index.delete_session(&session_id).await.unwrap();

        let answer = h.service.ask(&session_id, "anything?", 3).await.unwrap();
        assert_eq!(answer, NO_MATCH_FALLBACK);
        assert_eq!(h.llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let h = harness();

        let a = h
            .service
            .store(StoreRequest::new("A", "https://a.example", "alpha content about birds"))
            .await
            .unwrap();
        let b = h
            .service
            .store(StoreRequest::new("B", "https://b.example", "beta content about fish"))
            .await
            .unwrap();

        // Query session A's index partition directly with an embedding that
        // matches B's content exactly: B must still never appear.
        let b_embedding = FakeEmbedder::vector_for("beta content about fish");
        let matches = h.index.query(&b_embedding, 10, &a).await.unwrap();
        assert!(!matches.is_empty());
        assert!(matches.iter().all(|m| m.metadata.session_id == a));
        assert!(matches.iter().all(|m| m.metadata.session_id != b));
    }

    #[tokio::test]
    async fn test_delete_unknown_session() {
        let h = harness();

        let session_id = h
            .service
            .store(StoreRequest::new("Doc", "https://example.com", "some content"))
            .await
            .unwrap();

        let outcome = h.service.delete_session("no-such-id").await;
        assert_eq!(outcome, DeleteOutcome::NotFound);
        // Nothing was mutated.
        assert!(h.service.session_info(&session_id).is_some());
        assert!(h.index.entry_count().await.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_delete_known_session() {
        let h = harness();

        let session_id = h
            .service
            .store(StoreRequest::new("Doc", "https://example.com", "some content"))
            .await
            .unwrap();

        let outcome = h.service.delete_session(&session_id).await;
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(h.service.session_info(&session_id).is_none());
        assert_eq!(h.index.entry_count().await.unwrap(), 0);

        let err = h.service.ask(&session_id, "still there?", 3).await.unwrap_err();
        assert!(matches!(err, SporreError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_keeps_session_when_index_fails() {
        let service = QaService::new(
            Arc::new(FakeEmbedder::new()),
            Arc::new(DeleteFailingIndex {
                inner: MemoryVectorIndex::new(),
            }),
            Arc::new(FakeLanguageModel::new()),
            Prompts::default(),
            1000,
            200,
        );

        let session_id = service
            .store(StoreRequest::new("Doc", "https://example.com", "some content"))
            .await
            .unwrap();

        let outcome = service.delete_session(&session_id).await;
        assert_eq!(outcome, DeleteOutcome::IndexDeleteFailed);
        assert!(service.session_info(&session_id).is_some());
    }

    #[tokio::test]
    async fn test_custom_metadata_round_trip() {
        let h = harness();

        let mut request = StoreRequest::new("Doc", "https://example.com", "tagged content");
        request
            .metadata
            .insert("word_count".to_string(), serde_json::json!(2));

        let session_id = h.service.store(request).await.unwrap();
        let session = h.service.session_info(&session_id).unwrap();
        assert_eq!(session.metadata["word_count"], serde_json::json!(2));

        let embedding = FakeEmbedder::vector_for("tagged content");
        let matches = h.index.query(&embedding, 1, &session_id).await.unwrap();
        assert_eq!(matches[0].metadata.extra["word_count"], serde_json::json!(2));
    }
}
