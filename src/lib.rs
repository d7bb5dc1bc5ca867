//! wakili-rag - 오프라인 법률 조문 검색 및 답변 합성 엔진
//!
//! 법률 원문 디렉토리를 문단 단위로 나누어 TF-IDF 인덱스를 만들고,
//! 코사인 유사도로 관련 조문을 찾아 인용 포함 설명문을 생성합니다.
//! 외부 AI 서비스 없이 동작합니다.

pub mod cli;
pub mod collector;
pub mod error;
pub mod knowledge;

// Re-exports
pub use collector::{CollectedFile, Collection, CollectorConfig, FileCollector};
pub use error::EngineError;
pub use knowledge::{
    rank, synthesize, Answer, ChunkConfig, Chunker, Corpus, EngineConfig, EngineStats,
    LegalEngine, LoadReport, Passage, PassageStore, RankedResult, SparseVector, VectorSpace,
};
