//! Passage Store - 법률 원문 패시지 저장소
//!
//! 디렉토리의 원문 파일을 읽어 패시지로 분할하고,
//! 각 패시지에 출처 파일 라벨을 붙여 보관합니다.
//! 프로세스 수명 동안 불변이며, 재시작 시 원문에서 다시 만듭니다.

use std::path::Path;

use serde::Serialize;

use crate::collector::{Collection, CollectorConfig, FileCollector};
use crate::error::Result;

use super::chunker::Chunker;

// ============================================================================
// Types
// ============================================================================

/// 패시지 ID (코퍼스 내 삽입 순서)
pub type PassageId = usize;

/// 검색 단위가 되는 법률 원문 조각
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passage {
    /// 코퍼스 내 위치 (0-based)
    pub id: PassageId,
    /// 패시지 텍스트 (trim 완료)
    pub text: String,
    /// 출처 파일 라벨
    pub source_label: String,
}

/// 순서가 있는 패시지 모음
///
/// 순서 = 파일 발견 순서, 파일 내에서는 문단 순서
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    passages: Vec<Passage>,
}

impl Corpus {
    /// 빈 코퍼스
    pub fn new() -> Self {
        Self::default()
    }

    /// 패시지 추가 (ID는 삽입 순서로 부여)
    pub fn push(&mut self, text: String, source_label: &str) -> PassageId {
        let id = self.passages.len();
        self.passages.push(Passage {
            id,
            text,
            source_label: source_label.to_string(),
        });
        id
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Passage> {
        self.passages.iter()
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Passage;
    type IntoIter = std::slice::Iter<'a, Passage>;

    fn into_iter(self) -> Self::IntoIter {
        self.passages.iter()
    }
}

/// 코퍼스 로드 통계
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// 수집된 파일 수
    pub files_seen: usize,
    /// 패시지를 읽어들인 파일 수
    pub files_loaded: usize,
    /// 수집 또는 읽기 단계에서 건너뛴 파일 수
    pub files_skipped: usize,
    /// 유지된 패시지 수
    pub passages: usize,
}

// ============================================================================
// PassageStore
// ============================================================================

/// 패시지 저장소
///
/// 코퍼스를 단독 소유합니다. 로드 이후 변경 API는 없습니다.
#[derive(Debug)]
pub struct PassageStore {
    corpus: Corpus,
    report: LoadReport,
}

impl PassageStore {
    /// 디렉토리에서 코퍼스 로드
    ///
    /// 디렉토리가 없거나 읽을 수 없으면 실패합니다.
    /// 개별 파일 읽기 실패(I/O, 잘못된 UTF-8)는 경고 후 건너뜁니다.
    pub fn load(dir: &Path, collector: &CollectorConfig, chunker: &dyn Chunker) -> Result<Self> {
        let collection = FileCollector::new(collector.clone()).collect_directory(dir)?;
        Ok(Self::from_collection(&collection, chunker))
    }

    /// 수집 결과에서 코퍼스 생성
    ///
    /// 수집 단계에서 건너뛴 파일도 `files_skipped`에 포함합니다.
    pub fn from_collection(collection: &Collection, chunker: &dyn Chunker) -> Self {
        let mut corpus = Corpus::new();
        let mut report = LoadReport {
            files_seen: collection.files.len() + collection.skipped,
            files_skipped: collection.skipped,
            ..Default::default()
        };

        for file in &collection.files {
            let text = match std::fs::read_to_string(&file.path) {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!("Skipping unreadable file {:?}: {}", file.path, e);
                    report.files_skipped += 1;
                    continue;
                }
            };

            let chunks = chunker.chunk(&text);
            tracing::debug!("{}: {} passages", file.label, chunks.len());

            for chunk in chunks {
                corpus.push(chunk, &file.label);
            }
            report.files_loaded += 1;
        }

        report.passages = corpus.len();

        tracing::info!(
            "Loaded corpus: {} passages from {} files ({} skipped, chunker={})",
            report.passages,
            report.files_loaded,
            report.files_skipped,
            chunker.name()
        );

        Self { corpus, report }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// 서로 다른 출처 라벨 수
    pub fn document_count(&self) -> usize {
        let mut labels: Vec<&str> = self
            .corpus
            .iter()
            .map(|p| p.source_label.as_str())
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
