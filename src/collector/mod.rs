//! 파일 수집 모듈
//!
//! 법률 문서 디렉토리에서 원문 텍스트 파일을 수집합니다.
//! 파일 이름 순으로 정렬하여 실행마다 같은 순서를 보장하고,
//! 지정된 확장자만 수집합니다.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{EngineError, Result};

// ============================================================================
// Collected File
// ============================================================================

/// 수집된 파일 정보
#[derive(Debug, Clone)]
pub struct CollectedFile {
    /// 파일 경로
    pub path: PathBuf,
    /// 출처 라벨 (루트 기준 상대 경로, 비재귀 모드에서는 파일 이름)
    pub label: String,
    /// 파일 크기 (바이트)
    pub size: u64,
}

/// 수집 결과
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// 수집된 파일 (파일 이름 순)
    pub files: Vec<CollectedFile>,
    /// 경고 후 건너뛴 파일/엔트리 수
    pub skipped: usize,
}

// ============================================================================
// File Collector
// ============================================================================

/// 파일 수집기 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 하위 디렉토리까지 탐색할지 여부
    pub recursive: bool,
    /// 숨김 파일 포함 여부
    pub include_hidden: bool,
    /// 최대 파일 크기 (바이트, 0이면 제한 없음)
    pub max_file_size: u64,
    /// 수집할 확장자 (비어있으면 모든 파일)
    pub extensions: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            include_hidden: true,
            max_file_size: 10 * 1024 * 1024, // 10MB
            extensions: vec!["txt".to_string()],
        }
    }
}

impl CollectorConfig {
    /// 하위 디렉토리까지 수집하는 설정
    pub fn recursive() -> Self {
        Self {
            recursive: true,
            ..Self::default()
        }
    }
}

/// 파일 수집기
pub struct FileCollector {
    config: CollectorConfig,
}

impl FileCollector {
    /// 새 수집기 생성
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    /// 기본 설정으로 수집기 생성
    pub fn with_defaults() -> Self {
        Self::new(CollectorConfig::default())
    }

    /// 디렉토리 수집
    ///
    /// 디렉토리가 없거나 읽을 수 없으면 `CorpusLoad` 에러를 반환합니다.
    /// 심볼릭 링크는 따라갑니다. 읽을 수 없는 엔트리, 메타데이터 오류,
    /// 크기 초과 파일은 경고 로그를 남기고 `skipped`에 집계합니다.
    pub fn collect_directory(&self, path: &Path) -> Result<Collection> {
        let metadata = std::fs::metadata(path).map_err(|source| EngineError::CorpusLoad {
            path: path.to_path_buf(),
            source,
        })?;

        if !metadata.is_dir() {
            return Err(EngineError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        // 읽기 권한 확인
        std::fs::read_dir(path).map_err(|source| EngineError::CorpusLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let max_depth = if self.config.recursive { usize::MAX } else { 1 };
        let include_hidden = self.config.include_hidden;

        // 숨김 디렉토리만 가지치기, 숨김 파일은 아래에서 집계
        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| {
                e.depth() == 0 || include_hidden || !e.file_type().is_dir() || !is_hidden(e)
            });

        let mut collection = Collection::default();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read entry: {}", e);
                    collection.skipped += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if !self.matches_extension(entry.path()) {
                continue;
            }

            if !include_hidden && is_hidden(&entry) {
                tracing::warn!("Skipping hidden file: {:?}", entry.path());
                collection.skipped += 1;
                continue;
            }

            let size = match entry.metadata() {
                Ok(m) => m.len(),
                Err(e) => {
                    tracing::warn!("Failed to read metadata: {}", e);
                    collection.skipped += 1;
                    continue;
                }
            };

            if self.config.max_file_size > 0 && size > self.config.max_file_size {
                tracing::warn!("Skipping large file: {:?} ({} bytes)", entry.path(), size);
                collection.skipped += 1;
                continue;
            }

            collection.files.push(CollectedFile {
                label: source_label(path, entry.path()),
                path: entry.into_path(),
                size,
            });
        }

        tracing::debug!(
            "Collected {} files from {:?} ({} skipped)",
            collection.files.len(),
            path,
            collection.skipped
        );
        Ok(collection)
    }

    /// 확장자 필터
    fn matches_extension(&self, path: &Path) -> bool {
        if self.config.extensions.is_empty() {
            return true;
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self
                .config
                .extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// 루트 기준 상대 경로를 '/' 구분자로 연결
fn source_label(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn labels(collection: &Collection) -> Vec<&str> {
        collection.files.iter().map(|f| f.label.as_str()).collect()
    }

    #[test]
    fn test_collector_config_default() {
        let config = CollectorConfig::default();
        assert!(!config.recursive);
        assert!(config.include_hidden);
        assert_eq!(config.extensions, vec!["txt".to_string()]);
    }

    #[test]
    fn test_collect_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("C.TXT"), "c").unwrap();

        let collection = FileCollector::with_defaults()
            .collect_directory(dir.path())
            .unwrap();
        assert_eq!(labels(&collection), vec!["C.TXT", "a.txt", "b.txt"]);
        assert_eq!(collection.skipped, 0);
    }

    #[test]
    fn test_collect_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("act.txt"), "x").unwrap();
        fs::write(dir.path().join("notes.md"), "x").unwrap();

        let collection = FileCollector::with_defaults()
            .collect_directory(dir.path())
            .unwrap();
        assert_eq!(labels(&collection), vec!["act.txt"]);
        assert_eq!(collection.skipped, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_hidden_and_symlinked_files() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("real.txt");
        fs::write(&target, "linked").unwrap();

        fs::write(dir.path().join(".Amendments.txt"), "x").unwrap();
        fs::write(dir.path().join("Plain.txt"), "x").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("Linked.txt")).unwrap();

        let collection = FileCollector::with_defaults()
            .collect_directory(dir.path())
            .unwrap();
        assert_eq!(
            labels(&collection),
            vec![".Amendments.txt", "Linked.txt", "Plain.txt"]
        );
        assert_eq!(fs::read_to_string(&collection.files[1].path).unwrap(), "linked");
    }

    #[test]
    fn test_collect_counts_excluded_hidden_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".draft.txt"), "x").unwrap();
        fs::write(dir.path().join("act.txt"), "x").unwrap();

        let config = CollectorConfig {
            include_hidden: false,
            ..CollectorConfig::default()
        };
        let collection = FileCollector::new(config)
            .collect_directory(dir.path())
            .unwrap();
        assert_eq!(labels(&collection), vec!["act.txt"]);
        assert_eq!(collection.skipped, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_counts_broken_symlink() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("act.txt"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("dangling.txt"))
            .unwrap();

        let collection = FileCollector::with_defaults()
            .collect_directory(dir.path())
            .unwrap();
        assert_eq!(labels(&collection), vec!["act.txt"]);
        assert_eq!(collection.skipped, 1);
    }

    #[test]
    fn test_collect_counts_oversized_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("big.txt"), "0123456789").unwrap();
        fs::write(dir.path().join("small.txt"), "ok").unwrap();

        let config = CollectorConfig {
            max_file_size: 4,
            ..CollectorConfig::default()
        };
        let collection = FileCollector::new(config)
            .collect_directory(dir.path())
            .unwrap();
        assert_eq!(labels(&collection), vec!["small.txt"]);
        assert_eq!(collection.skipped, 1);
    }

    #[test]
    fn test_collect_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("land")).unwrap();
        fs::write(dir.path().join("land").join("act.txt"), "x").unwrap();
        fs::write(dir.path().join("top.txt"), "x").unwrap();

        let flat = FileCollector::with_defaults()
            .collect_directory(dir.path())
            .unwrap();
        assert_eq!(flat.files.len(), 1);

        let deep = FileCollector::new(CollectorConfig::recursive())
            .collect_directory(dir.path())
            .unwrap();
        assert_eq!(labels(&deep), vec!["land/act.txt", "top.txt"]);
    }

    #[test]
    fn test_collect_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = FileCollector::with_defaults()
            .collect_directory(&missing)
            .unwrap_err();
        assert!(matches!(err, EngineError::CorpusLoad { .. }));
    }

    #[test]
    fn test_collect_file_is_not_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();
        let err = FileCollector::with_defaults()
            .collect_directory(&file)
            .unwrap_err();
        assert!(matches!(err, EngineError::NotADirectory { .. }));
    }
}
