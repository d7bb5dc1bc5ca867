//! Term-Weight Index - TF-IDF 벡터 공간
//!
//! 전체 코퍼스에서 한 번 학습(fit)한 뒤 어휘와 가중치를 고정합니다.
//! 질의는 같은 공간으로 투영되며, 학습 때 없던 용어는 조용히 버립니다.
//!
//! IDF (smoothed):
//!   idf(t) = ln((1 + N) / (1 + df(t))) + 1
//!
//! 분모가 항상 1 이상이라 0 나눗셈이나 NaN이 없고,
//! 모든 패시지에 등장하는 용어도 최소 가중치 1을 유지합니다.

use std::collections::{HashMap, HashSet};

use crate::error::{EngineError, Result};

use super::store::Corpus;
use super::tokenizer::tokenize;
use super::vector::{SparseVector, TermId};

// ============================================================================
// VectorSpace
// ============================================================================

/// 고정된 TF-IDF 벡터 공간
#[derive(Debug, Clone)]
pub struct VectorSpace {
    /// 용어 -> 용어 ID
    vocabulary: HashMap<String, TermId>,
    /// 용어 ID별 IDF 가중치
    idf: Vec<f32>,
    /// 학습에 사용된 패시지 수
    passage_count: usize,
}

impl VectorSpace {
    /// 코퍼스로 벡터 공간 학습
    ///
    /// 패시지가 하나도 없으면 `EmptyCorpus` 에러를 반환합니다.
    pub fn fit(corpus: &Corpus) -> Result<Self> {
        if corpus.is_empty() {
            return Err(EngineError::EmptyCorpus);
        }

        let mut vocabulary: HashMap<String, TermId> = HashMap::new();
        let mut df: Vec<usize> = Vec::new();

        for passage in corpus {
            let unique: HashSet<String> = tokenize(&passage.text).into_iter().collect();

            // 용어 ID는 정렬 순서로 부여해 실행마다 같게 유지
            let mut terms: Vec<String> = unique.into_iter().collect();
            terms.sort_unstable();

            for term in terms {
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(term).or_insert(next_id);
                if id == df.len() {
                    df.push(0);
                }
                df[id] += 1;
            }
        }

        let n = corpus.len();
        let idf = df.iter().map(|&d| smoothed_idf(n, d)).collect();

        tracing::info!(
            "Fitted vector space: {} terms over {} passages",
            vocabulary.len(),
            n
        );

        Ok(Self {
            vocabulary,
            idf,
            passage_count: n,
        })
    }

    /// 텍스트를 벡터 공간으로 인코딩 (L2 정규화)
    ///
    /// 어휘에 없는 용어는 무시합니다. 결과가 비어 있을 수 있습니다.
    pub fn encode(&self, text: &str) -> SparseVector {
        let mut tf: HashMap<TermId, f32> = HashMap::new();

        for term in tokenize(text) {
            if let Some(&id) = self.vocabulary.get(&term) {
                *tf.entry(id).or_insert(0.0) += 1.0;
            }
        }

        let entries = tf
            .into_iter()
            .map(|(id, count)| (id, count * self.idf[id]))
            .collect();

        SparseVector::from_entries(entries).normalized()
    }

    /// 코퍼스 전체를 인코딩 (패시지 순서 유지)
    pub fn encode_corpus(&self, corpus: &Corpus) -> Vec<SparseVector> {
        corpus.iter().map(|p| self.encode(&p.text)).collect()
    }

    /// 용어 가중치 (어휘에 없으면 0)
    pub fn weight(&self, term: &str) -> f32 {
        self.vocabulary
            .get(term)
            .map(|&id| self.idf[id])
            .unwrap_or(0.0)
    }

    /// 어휘 크기
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// 학습에 사용된 패시지 수
    pub fn passage_count(&self) -> usize {
        self.passage_count
    }
}

/// 평활화된 IDF
fn smoothed_idf(passage_count: usize, document_frequency: usize) -> f32 {
    let n = passage_count as f32;
    let df = document_frequency as f32;
    ((1.0 + n) / (1.0 + df)).ln() + 1.0
}

// ============================================================================
// Tests
// ============================================================================
