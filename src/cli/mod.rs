//! CLI 모듈
//!
//! wakili-rag CLI 명령어 정의 및 구현.
//! 엔진은 명령 실행 전에 한 번만 만들어집니다.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::knowledge::{Answer, EngineConfig, LegalEngine, RankedResult};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "wakili-rag")]
#[command(version, about = "오프라인 법률 조문 검색 및 답변 합성", long_about = None)]
pub struct Cli {
    /// 법률 원문 디렉토리 (기본값: $LEGAL_DOCS_PATH 또는 legal_docs)
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// 결과 개수 (기본값: $LEGAL_TOP_K 또는 3)
    #[arg(short = 'k', long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub top_k: Option<u32>,

    /// 하위 디렉토리까지 수집
    #[arg(short, long, global = true)]
    pub recursive: bool,

    /// JSON 출력
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 관련 조문 검색
    Search {
        /// 검색 쿼리
        query: String,
    },

    /// 질의에 대한 인용 포함 답변
    Answer {
        /// 질문
        query: String,
    },

    /// 문맥(사건 설명 등)과 질문으로 답변
    Analyze {
        /// 질문
        question: String,

        /// 직접 입력할 문맥 텍스트
        #[arg(short, long)]
        context: Option<String>,

        /// 문맥 파일 경로
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// 문서를 관련 조문 기준으로 요약
    Summarize {
        /// 직접 입력할 텍스트
        #[arg(short, long)]
        text: Option<String>,

        /// 요약할 파일 경로
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// 코퍼스 상태 확인
    Status,
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli);
    let engine = LegalEngine::build(config).context("법률 엔진 초기화 실패")?;
    let json = cli.json;

    match cli.command {
        Commands::Search { query } => cmd_search(&engine, &query, json),
        Commands::Answer { query } => cmd_answer(&engine, &query, json),
        Commands::Analyze {
            question,
            context,
            file,
        } => {
            let context = read_input(context, file)?;
            print_answer(&engine.analyze(&context, &question), json)
        }
        Commands::Summarize { text, file } => {
            let text = read_input(text, file)?;
            print_answer(&engine.summarize(&text), json)
        }
        Commands::Status => cmd_status(&engine, json),
    }
}

/// 환경변수 설정 위에 CLI 옵션 적용
fn build_config(cli: &Cli) -> EngineConfig {
    let mut config = EngineConfig::from_env();

    if let Some(ref dir) = cli.dir {
        config.docs_dir = dir.clone();
    }
    if let Some(k) = cli.top_k {
        config.top_k = k as usize;
    }
    if cli.recursive {
        config.collector.recursive = true;
    }

    config
}

/// 텍스트 또는 파일 입력 중 하나를 읽음
fn read_input(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (text, file) {
        (Some(text), None) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("파일 읽기 실패: {:?}", path)),
        (Some(_), Some(_)) => bail!("텍스트와 파일 중 하나만 지정해야 합니다"),
        (None, None) => bail!("--text/--context 또는 --file 중 하나를 지정해야 합니다"),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 검색 명령어 (search)
fn cmd_search(engine: &LegalEngine, query: &str, json: bool) -> Result<()> {
    let results = engine.search(query);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("[!] 검색 결과가 없습니다: \"{}\"", query);
        return Ok(());
    }

    println!("[OK] 검색 결과 ({} 건):\n", results.len());
    for (i, result) in results.iter().enumerate() {
        print_result(i + 1, result);
    }

    Ok(())
}

/// 답변 명령어 (answer)
fn cmd_answer(engine: &LegalEngine, query: &str, json: bool) -> Result<()> {
    print_answer(&engine.answer(query), json)
}

/// 상태 명령어 (status)
fn cmd_status(engine: &LegalEngine, json: bool) -> Result<()> {
    let stats = engine.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("wakili-rag v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("[*] 코퍼스 디렉토리: {}", stats.docs_dir.display());
    println!("[OK] 문서: {} 건", stats.documents);
    println!("[OK] 패시지: {} 건", stats.passages);
    println!("[OK] 어휘: {} 용어", stats.vocabulary_size);
    println!("[*] 기본 결과 개수: {}", stats.top_k);

    if stats.files_skipped > 0 {
        println!("[!] 읽기 실패로 건너뛴 파일: {} 개", stats.files_skipped);
    }
    if engine.is_empty() {
        println!("[!] 사용 가능한 패시지가 없습니다. 모든 질의에 자료 없음으로 응답합니다.");
    }

    Ok(())
}

// ============================================================================
// Output Helpers
// ============================================================================

fn print_result(rank: usize, result: &RankedResult<'_>) {
    println!(
        "{}. [점수: {:.4}] {} (#{})",
        rank,
        result.score,
        result.source_label(),
        result.passage.id
    );
    println!("   {}", truncate_text(result.text(), 200));
    println!();
}

fn print_answer(answer: &Answer, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(answer)?);
        return Ok(());
    }

    println!("{}", answer.text);
    if !answer.citations.is_empty() {
        println!();
        println!("Citations:");
        for cite in &answer.citations {
            println!("  - {}", cite);
        }
    }

    Ok(())
}

/// 텍스트 자르기 (UTF-8 안전)
fn truncate_text(text: &str, max_chars: usize) -> String {
    let cleaned = text.replace('\n', " ").replace('\r', "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() <= max_chars {
        cleaned.to_string()
    } else {
        let truncated: String = cleaned.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

// ============================================================================
// Tests
// ============================================================================
