//! Legal Engine - 패시지 저장소 + TF-IDF 인덱스 + 답변 합성 통합
//!
//! 시작 시 한 번 코퍼스를 로드하고 인덱스를 학습한 뒤,
//! 이후에는 읽기 전용 상태로 질의만 처리합니다.
//! 잠금 없이 `Arc`로 여러 스레드에서 공유할 수 있습니다.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::collector::CollectorConfig;
use crate::error::Result;

use super::chunker::{ChunkConfig, ParagraphChunker};
use super::index::VectorSpace;
use super::ranker::{rank, RankedResult, DEFAULT_TOP_K};
use super::store::{LoadReport, PassageStore};
use super::synthesizer::{synthesize, Answer};
use super::vector::SparseVector;

/// 코퍼스 디렉토리 환경변수
pub const DOCS_PATH_ENV: &str = "LEGAL_DOCS_PATH";
/// 기본 반환 개수 환경변수
pub const TOP_K_ENV: &str = "LEGAL_TOP_K";
/// 기본 코퍼스 디렉토리
pub const DEFAULT_DOCS_PATH: &str = "legal_docs";

/// 요약 요청 시 사용하는 질문
pub const SUMMARY_QUESTION: &str = "Provide a short, clear summary.";
/// analyze 시 검색 질의에 포함할 문맥 길이 (문자 수)
const CONTEXT_PREFIX_CHARS: usize = 500;

// ============================================================================
// Configuration
// ============================================================================

/// 엔진 설정
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// 법률 원문 디렉토리
    pub docs_dir: PathBuf,
    /// 기본 반환 개수
    pub top_k: usize,
    /// 청킹 설정
    pub chunk: ChunkConfig,
    /// 파일 수집 설정
    pub collector: CollectorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from(DEFAULT_DOCS_PATH),
            top_k: DEFAULT_TOP_K,
            chunk: ChunkConfig::default(),
            collector: CollectorConfig::default(),
        }
    }
}

impl EngineConfig {
    /// 지정된 디렉토리로 기본 설정 생성
    pub fn with_docs_dir(docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            ..Self::default()
        }
    }

    /// 환경변수에서 설정 로드
    ///
    /// - `LEGAL_DOCS_PATH`: 코퍼스 디렉토리 (기본값 `legal_docs`)
    /// - `LEGAL_TOP_K`: 기본 반환 개수 (기본값 3)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var(DOCS_PATH_ENV) {
            if !dir.trim().is_empty() {
                config.docs_dir = PathBuf::from(dir);
            }
        }

        if let Ok(raw) = std::env::var(TOP_K_ENV) {
            match parse_top_k(&raw) {
                Some(k) => config.top_k = k,
                None => tracing::warn!(
                    "Ignoring invalid {}={:?}, using {}",
                    TOP_K_ENV,
                    raw,
                    DEFAULT_TOP_K
                ),
            }
        }

        config
    }
}

/// 1 이상의 정수만 허용
fn parse_top_k(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|&k| k > 0)
}

// ============================================================================
// LegalEngine
// ============================================================================

/// 엔진 통계
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub docs_dir: PathBuf,
    pub documents: usize,
    pub passages: usize,
    pub vocabulary_size: usize,
    pub files_skipped: usize,
    pub top_k: usize,
}

/// 오프라인 법률 검색 엔진
#[derive(Debug)]
pub struct LegalEngine {
    config: EngineConfig,
    store: PassageStore,
    /// 빈 코퍼스면 None (모든 질의에 "자료 없음")
    space: Option<VectorSpace>,
    passage_vectors: Vec<SparseVector>,
}

impl LegalEngine {
    /// 설정대로 코퍼스를 로드하고 인덱스를 학습
    ///
    /// 디렉토리 로드 실패는 에러로 반환합니다.
    /// 빈 코퍼스는 경고만 남기고 "자료 없음" 상태의 엔진을 만듭니다.
    pub fn build(config: EngineConfig) -> Result<Self> {
        let chunker = ParagraphChunker::new(config.chunk.clone());
        let store = PassageStore::load(&config.docs_dir, &config.collector, &chunker)?;
        Ok(Self::from_store(config, store))
    }

    /// 환경변수 설정으로 생성
    pub fn from_env() -> Result<Self> {
        Self::build(EngineConfig::from_env())
    }

    /// 디렉토리 지정 생성
    pub fn open(docs_dir: &Path) -> Result<Self> {
        Self::build(EngineConfig::with_docs_dir(docs_dir))
    }

    /// 로드된 저장소로 인덱스 학습
    pub fn from_store(config: EngineConfig, store: PassageStore) -> Self {
        let (space, passage_vectors) = match VectorSpace::fit(store.corpus()) {
            Ok(space) => {
                let vectors = space.encode_corpus(store.corpus());
                (Some(space), vectors)
            }
            // fit은 빈 코퍼스에서만 실패
            Err(_) => {
                tracing::warn!(
                    "No usable passages in {:?}; every query will return no material",
                    config.docs_dir
                );
                (None, Vec::new())
            }
        };

        Self {
            config,
            store,
            space,
            passage_vectors,
        }
    }

    /// 기본 개수로 검색
    pub fn search(&self, query: &str) -> Vec<RankedResult<'_>> {
        self.search_with_limit(query, self.config.top_k)
    }

    /// 개수 지정 검색
    pub fn search_with_limit(&self, query: &str, k: usize) -> Vec<RankedResult<'_>> {
        match &self.space {
            Some(space) => rank(query, space, self.store.corpus(), &self.passage_vectors, k),
            None => vec![],
        }
    }

    /// 질의에 대한 답변 합성
    pub fn answer(&self, query: &str) -> Answer {
        let results = self.search(query);
        synthesize(&results, query)
    }

    /// 문맥과 질문으로 답변 합성
    ///
    /// 검색 질의 = 질문 + 문맥 앞 500자
    pub fn analyze(&self, context: &str, question: &str) -> Answer {
        let query = analysis_query(context, question);
        let results = self.search(&query);
        synthesize(&results, question)
    }

    /// 문서 요약 (관련 조문 기반)
    pub fn summarize(&self, text: &str) -> Answer {
        self.analyze(text, SUMMARY_QUESTION)
    }

    /// 인덱스가 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.space.is_none()
    }

    /// 엔진 통계
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            docs_dir: self.config.docs_dir.clone(),
            documents: self.store.document_count(),
            passages: self.store.corpus().len(),
            vocabulary_size: self
                .space
                .as_ref()
                .map(VectorSpace::vocabulary_size)
                .unwrap_or(0),
            files_skipped: self.store.report().files_skipped,
            top_k: self.config.top_k,
        }
    }

    /// 로드 통계
    pub fn load_report(&self) -> &LoadReport {
        self.store.report()
    }

    /// 설정 조회
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// analyze용 검색 질의 구성
fn analysis_query(context: &str, question: &str) -> String {
    let prefix: String = context.chars().take(CONTEXT_PREFIX_CHARS).collect();
    format!("{} {}", question, prefix)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;

    const LAND: &str = "Tenants have the right to notice before eviction. Notice must be 30 days. \
                        A landlord who wishes to recover possession shall serve the notice in writing.";
    const MARRIAGE: &str = "Marriage requires consent of both parties. No person shall be compelled \
                            to marry and a marriage entered into without free consent is voidable.";

    fn legal_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LandAct.txt"), LAND).unwrap();
        fs::write(dir.path().join("MarriageAct.txt"), MARRIAGE).unwrap();
        dir
    }

    #[test]
    fn test_answer_eviction_notice() {
        let dir = legal_dir();
        let engine = LegalEngine::open(dir.path()).unwrap();

        let results = engine.search("eviction notice");
        assert_eq!(results[0].source_label(), "LandAct.txt");
        assert!(results[0].score > 0.0);

        let answer = engine.answer("eviction notice");
        assert_eq!(answer.citations.len(), 1);
        assert!(answer.citations.contains("LandAct.txt"));
        assert!(answer
            .text
            .contains("- Tenants have the right to notice before eviction."));
    }

    #[test]
    fn test_empty_directory_returns_no_material() {
        let dir = tempfile::tempdir().unwrap();
        let engine = LegalEngine::open(dir.path()).unwrap();

        assert!(engine.is_empty());
        assert!(engine.search("eviction").is_empty());
        assert_eq!(engine.answer("eviction"), Answer::no_material());
        assert_eq!(engine.stats().passages, 0);
    }

    #[test]
    fn test_oversized_files_degrade_and_are_counted() {
        let dir = legal_dir();
        let mut config = EngineConfig::with_docs_dir(dir.path());
        config.collector.max_file_size = 8;

        let engine = LegalEngine::build(config).unwrap();
        assert!(engine.is_empty());
        assert_eq!(engine.load_report().files_seen, 2);
        assert_eq!(engine.load_report().files_skipped, 2);
        assert_eq!(engine.stats().files_skipped, 2);
        assert_eq!(engine.answer("eviction notice"), Answer::no_material());
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = LegalEngine::open(&dir.path().join("missing")).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_stop_word_query() {
        let dir = legal_dir();
        let engine = LegalEngine::open(dir.path()).unwrap();
        assert!(engine.search("the a of").is_empty());
        assert!(engine.answer("the a of").is_no_material());
    }

    #[test]
    fn test_search_idempotent() {
        let dir = legal_dir();
        let engine = LegalEngine::open(dir.path()).unwrap();

        let first: Vec<_> = engine
            .search("consent notice")
            .iter()
            .map(|r| (r.passage.id, r.score))
            .collect();
        let second: Vec<_> = engine
            .search("consent notice")
            .iter()
            .map(|r| (r.passage.id, r.score))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_with_limit() {
        let dir = legal_dir();
        let engine = LegalEngine::open(dir.path()).unwrap();
        assert_eq!(engine.search_with_limit("consent notice", 1).len(), 1);
        assert_eq!(engine.search_with_limit("consent notice", 10).len(), 2);
    }

    #[test]
    fn test_analyze_uses_question_and_context_prefix() {
        let dir = legal_dir();
        let engine = LegalEngine::open(dir.path()).unwrap();

        // 문맥 500자 이후의 단어는 검색에 쓰이지 않음
        let context = format!("{} marriage", "x ".repeat(300));
        assert!(engine.analyze(&context, "what applies?").is_no_material());

        let answer = engine.analyze("The landlord served an eviction notice.", "Is this valid?");
        assert!(answer.citations.contains("LandAct.txt"));
    }

    #[test]
    fn test_summarize() {
        let dir = legal_dir();
        let engine = LegalEngine::open(dir.path()).unwrap();
        let answer = engine.summarize("Parties to a marriage must give free consent.");
        assert!(answer.citations.contains("MarriageAct.txt"));
    }

    #[test]
    fn test_analysis_query() {
        let long = "a".repeat(600);
        let query = analysis_query(&long, "Q?");
        assert_eq!(query.chars().count(), "Q? ".len() + 500);
    }

    #[test]
    fn test_concurrent_queries() {
        let dir = legal_dir();
        let engine = Arc::new(LegalEngine::open(dir.path()).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || engine.answer("eviction notice"))
            })
            .collect();

        for handle in handles {
            let answer = handle.join().unwrap();
            assert!(answer.citations.contains("LandAct.txt"));
        }
    }

    #[test]
    fn test_bundled_corpus() {
        let docs = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_DOCS_PATH);
        let engine = LegalEngine::open(&docs).unwrap();

        assert_eq!(engine.stats().documents, 3);
        assert!(engine.load_report().files_skipped == 0);

        let results = engine.search("eviction notice");
        assert!(results[0].text().starts_with("Section 152E"));
        assert!(engine.answer("eviction notice").citations.contains("LandAct.txt"));
    }

    #[test]
    fn test_parse_top_k() {
        assert_eq!(parse_top_k("5"), Some(5));
        assert_eq!(parse_top_k(" 2 "), Some(2));
        assert_eq!(parse_top_k("0"), None);
        assert_eq!(parse_top_k("abc"), None);
    }

    #[test]
    fn test_stats() {
        let dir = legal_dir();
        let engine = LegalEngine::open(dir.path()).unwrap();
        let stats = engine.stats();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.passages, 2);
        assert_eq!(stats.top_k, DEFAULT_TOP_K);
        assert!(stats.vocabulary_size > 0);
    }
}
