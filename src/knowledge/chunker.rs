//! Text Chunking Module
//!
//! 법률 원문을 문단(빈 줄 경계) 단위 패시지로 분할합니다.
//! 너무 짧은 문단(제목, 조항 번호 등)은 검색 단위로 쓰지 않습니다.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// 하나 이상의 빈 줄 (공백만 있는 줄 포함)
    static ref BLANK_LINE_RE: Regex = Regex::new(r"\n\s*\n").unwrap();
}

// ============================================================================
// Chunk Configuration
// ============================================================================

/// 청킹 설정
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// 최소 길이 (문자 수). trim 후 이 길이 이하인 문단은 버립니다.
    pub min_characters: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            min_characters: 120,
        }
    }
}

impl ChunkConfig {
    /// 길이 제한 없이 모든 문단 유지 (테스트/디버깅용)
    pub fn keep_all() -> Self {
        Self { min_characters: 0 }
    }
}

// ============================================================================
// Chunker Trait
// ============================================================================

/// 텍스트 청킹 전략 트레이트
pub trait Chunker: Send + Sync {
    /// 텍스트를 청크로 분할
    fn chunk(&self, text: &str) -> Vec<String>;

    /// 청커 이름
    fn name(&self) -> &'static str;
}

// ============================================================================
// ParagraphChunker
// ============================================================================

/// 문단 청커
///
/// 빈 줄 경계로 나누고, 앞뒤 공백을 제거한 뒤
/// `min_characters`보다 긴 문단만 남깁니다.
/// 청크는 항상 단일 입력 텍스트 안에서만 만들어집니다.
pub struct ParagraphChunker {
    config: ChunkConfig,
}

impl ParagraphChunker {
    /// 설정으로 생성
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// 기본 설정으로 생성
    pub fn with_defaults() -> Self {
        Self::new(ChunkConfig::default())
    }

    /// 설정 조회
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    fn is_long_enough(&self, paragraph: &str) -> bool {
        paragraph.chars().count() > self.config.min_characters
    }
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return vec![];
        }

        // CRLF, 단독 CR 정규화
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

        BLANK_LINE_RE
            .split(&normalized)
            .map(str::trim)
            .filter(|p| !p.is_empty() && self.is_long_enough(p))
            .map(String::from)
            .collect()
    }

    fn name(&self) -> &'static str {
        "ParagraphChunker"
    }
}

// ============================================================================
// Factory Functions
// ============================================================================

/// 기본 청커 생성
pub fn default_chunker() -> Box<dyn Chunker> {
    Box::new(ParagraphChunker::with_defaults())
}

// ============================================================================
// Tests
// ============================================================================
