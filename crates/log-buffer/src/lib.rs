#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`parser`]: `<timestamp> <severity> [<service>] <body>` 형식의 라인 파서
//! - [`buffer`]: 버퍼 매니저 — 인메모리 상태, 크기 기반 플러시 정책, 배타 잠금
//! - [`query`]: 조회 파라미터, 시간 범위/텍스트 필터링
//! - [`estimate`]: 레코드당 고정 비용 크기 추정기
//! - [`sink`]: 인메모리 싱크 구현 (테스트/개발용)
//! - [`config`]: 버퍼 설정 (임계값, 레코드당 비용)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! raw lines -> LineParser -> BufferManager (Mutex<Vec<LogRecord>>) -> LogSink
//!                                  |                 (threshold flush)
//!                                query
//!                            (buffered only)
//! ```
//!
//! `ingest`와 `query`는 하나의 배타 잠금으로 직렬화됩니다. 플러시로
//! 인한 싱크 쓰기도 잠금을 쥔 채 수행되므로, 플러시 중에는 조회와
//! 다른 수집 호출이 모두 대기합니다. 플러시된 레코드는 이 컴포넌트의
//! 조회 대상에서 제외됩니다.

pub mod buffer;
pub mod config;
pub mod error;
pub mod estimate;
pub mod parser;
pub mod query;
pub mod sink;

// --- 주요 타입 re-export ---

// 버퍼 매니저
pub use buffer::{BufferManager, BufferStats};

// 설정
pub use config::{BufferConfig, BufferConfigBuilder};

// 에러
pub use error::LogBufferError;

// 파서
pub use parser::StandardLineParser;

// 조회
pub use query::QueryParams;

// 크기 추정
pub use estimate::FlatRateEstimator;

// 싱크
pub use sink::MemorySink;
