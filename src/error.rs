//! 엔진 에러 타입
//!
//! 코퍼스 로드 실패는 치명적(엔진 초기화 중단),
//! 빈 코퍼스는 비치명적(모든 질의에 "자료 없음" 응답)입니다.

use std::path::PathBuf;

/// 법률 검색 엔진 에러
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// 코퍼스 디렉토리를 읽을 수 없음
    #[error("failed to load corpus from {path:?}: {source}")]
    CorpusLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 경로가 디렉토리가 아님
    #[error("corpus path is not a directory: {path:?}")]
    NotADirectory { path: PathBuf },

    /// 사용 가능한 패시지가 하나도 없음
    #[error("corpus contains no usable passages")]
    EmptyCorpus,
}

impl EngineError {
    /// 엔진 초기화를 중단해야 하는 에러인지 여부
    pub fn is_fatal(&self) -> bool {
        !matches!(self, EngineError::EmptyCorpus)
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
