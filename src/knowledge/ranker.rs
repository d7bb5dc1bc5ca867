//! Ranker - 코사인 유사도 기반 상위 K개 패시지 선택
//!
//! 정렬 기준: 점수 내림차순, 동점이면 패시지 ID 오름차순.
//! 같은 입력에 대해 항상 같은 순서를 반환합니다.

use std::cmp::Ordering;

use serde::Serialize;

use super::index::VectorSpace;
use super::store::{Corpus, Passage};
use super::vector::{cosine_similarity, SparseVector};

/// 기본 반환 개수
pub const DEFAULT_TOP_K: usize = 3;

// ============================================================================
// Types
// ============================================================================

/// 순위가 매겨진 검색 결과
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult<'a> {
    /// 대상 패시지
    pub passage: &'a Passage,
    /// 코사인 유사도 (0.0 ~ 1.0)
    pub score: f32,
}

impl<'a> RankedResult<'a> {
    /// 패시지 텍스트
    pub fn text(&self) -> &'a str {
        &self.passage.text
    }

    /// 출처 라벨
    pub fn source_label(&self) -> &'a str {
        &self.passage.source_label
    }
}

// ============================================================================
// Ranking
// ============================================================================

/// 질의와 패시지 벡터를 비교해 상위 `k`개를 반환
///
/// - `k`는 `[1, 패시지 수]` 범위로 조정됩니다.
/// - 유사도가 0인 패시지(공유 용어 없음)는 결과에서 제외됩니다.
/// - 빈 코퍼스는 빈 결과를 반환합니다.
pub fn rank<'a>(
    query: &str,
    space: &VectorSpace,
    corpus: &'a Corpus,
    passage_vectors: &[SparseVector],
    k: usize,
) -> Vec<RankedResult<'a>> {
    if corpus.is_empty() {
        return vec![];
    }

    let k = k.clamp(1, corpus.len());
    let query_vector = space.encode(query);

    if query_vector.is_empty() {
        tracing::debug!("Query has no in-vocabulary terms: {:?}", query);
        return vec![];
    }

    let mut scored: Vec<RankedResult<'a>> = corpus
        .iter()
        .zip(passage_vectors.iter())
        .map(|(passage, vector)| RankedResult {
            passage,
            score: cosine_similarity(&query_vector, vector),
        })
        .filter(|r| r.score > 0.0)
        .collect();

    scored.sort_by(compare_ranked);
    scored.truncate(k);

    tracing::debug!(
        "Ranked {} passages for query {:?} (k={})",
        scored.len(),
        query,
        k
    );

    scored
}

/// 점수 내림차순, 동점 시 ID 오름차순
fn compare_ranked(a: &RankedResult<'_>, b: &RankedResult<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.passage.id.cmp(&b.passage.id))
}

// ============================================================================
// Tests
// ============================================================================
