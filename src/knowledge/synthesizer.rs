//! Answer Synthesizer - 검색 결과로 인용 포함 설명문 생성
//!
//! 외부 AI 없이 상위 패시지의 첫 문장을 나열하고
//! 고정된 해석 문단을 덧붙입니다. 순수 함수입니다.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::ranker::RankedResult;

/// 결과가 없을 때의 응답
pub const NO_MATERIAL_TEXT: &str = "No relevant legal material found.";

const LEAD_IN: &str = "Based on the provided legal materials:";
const INTERPRETATION_HEADING: &str = "\nInterpretation:";
const INTERPRETATION: &str = "This means the law applies as described above. \
     The outcome depends on the specific facts, but the cited provisions guide the decision.";

lazy_static! {
    /// 문장 끝 구두점 뒤 공백
    static ref SENTENCE_END_RE: Regex = Regex::new(r"[.!?]\s+").unwrap();
}

// ============================================================================
// Types
// ============================================================================

/// 합성된 답변
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    /// 설명문
    pub text: String,
    /// 인용된 출처 라벨 (중복 없음)
    pub citations: BTreeSet<String>,
}

impl Answer {
    /// "자료 없음" 응답
    pub fn no_material() -> Self {
        Self {
            text: NO_MATERIAL_TEXT.to_string(),
            citations: BTreeSet::new(),
        }
    }

    /// 검색 결과가 없어 생성된 응답인지 여부
    pub fn is_no_material(&self) -> bool {
        self.citations.is_empty() && self.text == NO_MATERIAL_TEXT
    }
}

// ============================================================================
// Synthesis
// ============================================================================

/// 순위 결과로 답변 합성
///
/// 질문은 문장 구성에 쓰이지 않으며 로그에만 남깁니다.
pub fn synthesize(results: &[RankedResult<'_>], question: &str) -> Answer {
    if results.is_empty() {
        tracing::debug!("No passages to synthesize for {:?}", question);
        return Answer::no_material();
    }

    let mut lines = Vec::with_capacity(results.len() + 3);
    let mut citations = BTreeSet::new();

    lines.push(LEAD_IN.to_string());

    for result in results {
        lines.push(format!("- {}", first_sentence(result.text())));
        citations.insert(result.source_label().to_string());
    }

    lines.push(INTERPRETATION_HEADING.to_string());
    lines.push(INTERPRETATION.to_string());

    Answer {
        text: lines.join("\n"),
        citations,
    }
}

/// 첫 문장 추출
///
/// `.`, `!`, `?` 뒤에 공백이 오는 첫 위치에서 자릅니다 (구두점 포함).
/// 경계가 없으면 전체 텍스트를 반환합니다.
/// "Art. 26" 같은 약어에서도 그대로 잘립니다.
pub fn first_sentence(text: &str) -> &str {
    match SENTENCE_END_RE.find(text) {
        // 구두점은 ASCII 1바이트
        Some(m) => &text[..m.start() + 1],
        None => text,
    }
}

// ============================================================================
// Tests
// ============================================================================
