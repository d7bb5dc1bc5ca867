//! Sparse Vector - 희소 가중치 벡터 및 유사도 유틸리티
//!
//! 용어 ID 오름차순으로 정렬된 (term_id, weight) 쌍으로 표현합니다.

use std::cmp::Ordering;

/// 어휘 내 용어 ID
pub type TermId = usize;

// ============================================================================
// Types
// ============================================================================

/// 희소 벡터
///
/// 엔트리는 항상 term_id 오름차순이며 중복 ID가 없습니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(TermId, f32)>,
}

impl SparseVector {
    /// 빈 벡터 (크기 0)
    pub fn new() -> Self {
        Self::default()
    }

    /// (term_id, weight) 목록에서 생성
    ///
    /// 순서는 정렬되고, 같은 ID는 합산되며, 0 가중치는 제거됩니다.
    pub fn from_entries(mut entries: Vec<(TermId, f32)>) -> Self {
        entries.sort_by_key(|(id, _)| *id);

        let mut merged: Vec<(TermId, f32)> = Vec::with_capacity(entries.len());
        for (id, weight) in entries {
            match merged.last_mut() {
                Some(last) if last.0 == id => last.1 += weight,
                _ => merged.push((id, weight)),
            }
        }
        merged.retain(|(_, w)| *w != 0.0);

        Self { entries: merged }
    }

    pub fn entries(&self) -> &[(TermId, f32)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 특정 용어의 가중치 (없으면 0)
    pub fn weight(&self, term: TermId) -> f32 {
        self.entries
            .binary_search_by_key(&term, |(id, _)| *id)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    /// L2 노름
    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    /// L2 정규화 (크기 0 벡터는 그대로)
    pub fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
        self
    }

    /// 내적 (정렬된 엔트리 병합)
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < self.entries.len() && j < other.entries.len() {
            let (a_id, a_w) = self.entries[i];
            let (b_id, b_w) = other.entries[j];
            match a_id.cmp(&b_id) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }
}

// ============================================================================
// Utility Functions
// ============================================================================

/// 코사인 유사도 계산
///
/// 음수가 아닌 가중치 벡터에서는 0.0 ~ 1.0 범위입니다.
/// 어느 한쪽의 크기가 0이면 NaN 대신 0.0을 반환합니다.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    // 부동소수 오차로 1.0을 약간 넘는 경우 보정
    (a.dot(b) / (norm_a * norm_b)).clamp(0.0, 1.0)
}

// ============================================================================
// Tests
// ============================================================================
