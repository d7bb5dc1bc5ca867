//! Knowledge 모듈 - 오프라인 법률 패시지 검색 엔진
//!
//! - Chunker: 빈 줄 경계 문단 분할
//! - Store: 패시지 코퍼스 (출처 라벨 포함)
//! - Tokenizer / Index: TF-IDF 벡터 공간
//! - Ranker: 코사인 유사도 상위 K개
//! - Synthesizer: 인용 포함 설명문 생성
//! - Engine: 위 구성요소를 묶은 소유 인스턴스

mod chunker;
mod engine;
mod index;
mod ranker;
mod store;
mod synthesizer;
mod tokenizer;
mod vector;

// Re-exports
pub use chunker::{default_chunker, ChunkConfig, Chunker, ParagraphChunker};
pub use engine::{
    EngineConfig, EngineStats, LegalEngine, DEFAULT_DOCS_PATH, DOCS_PATH_ENV, SUMMARY_QUESTION,
    TOP_K_ENV,
};
pub use index::VectorSpace;
pub use ranker::{rank, RankedResult, DEFAULT_TOP_K};
pub use store::{Corpus, LoadReport, Passage, PassageId, PassageStore};
pub use synthesizer::{first_sentence, synthesize, Answer, NO_MATERIAL_TEXT};
pub use tokenizer::{is_stop_word, tokenize, ENGLISH_STOP_WORDS};
pub use vector::{cosine_similarity, SparseVector, TermId};
