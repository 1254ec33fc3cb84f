//! 라인 파서 — 고정 4-그룹 형식의 로그 라인 파싱
//!
//! 기대 형식:
//! ```text
//! <timestamp> <severity> [<service>] <body>
//! ```
//! - `timestamp`: ISO-8601 (RFC 3339) 시각
//! - `severity`: 단일 영숫자 토큰 (INFO, WARN 등)
//! - `service`: 대괄호 한 쌍으로 감싼 단일 영숫자 토큰 (apache, nginx 등)
//! - `body`: 라인의 나머지 전체 (공백 포함 가능)
//!
//! # 사용 예시
//! ```
//! use logbay_core::pipeline::LineParser;
//! use logbay_log_buffer::parser::StandardLineParser;
//!
//! let parser = StandardLineParser::new();
//! let record = parser
//!     .parse("2024-01-15T12:00:00Z INFO [nginx] GET /index.html 200")
//!     .unwrap();
//! assert_eq!(record.service, "nginx");
//! ```

use chrono::{DateTime, Utc};
use logbay_core::error::LogbayError;
use logbay_core::pipeline::LineParser;
use logbay_core::types::LogRecord;
use regex::Regex;

use crate::error::LogBufferError;

/// 라인 전체를 매칭하는 4-그룹 패턴
///
/// - 그룹 1: 타임스탬프 후보 (숫자, `-`, `T`, `:`, `.`, `Z`)
/// - 그룹 2: 심각도 토큰
/// - 그룹 3: 서비스 토큰 (대괄호 제외)
/// - 그룹 4: 본문
const LINE_PATTERN: &str = r"^([0-9TZ:.\-]+) (\w+) \[(\w+)\] (.+)$";

/// 표준 라인 파서
///
/// core의 [`LineParser`] trait을 구현하여 원시 라인을 [`LogRecord`]로
/// 변환합니다. 파싱은 순수하고 동기적이며, 형식이 맞지 않거나
/// 타임스탬프가 RFC 3339로 파싱되지 않으면 에러를 반환합니다.
/// 거부된 라인을 어떻게 처리할지는 호출자(버퍼 매니저)의 몫입니다.
pub struct StandardLineParser {
    /// 컴파일된 라인 패턴
    pattern: Regex,
}

impl StandardLineParser {
    /// 새 파서를 생성합니다.
    pub fn new() -> Self {
        // 고정 리터럴 패턴이므로 컴파일은 실패하지 않음
        let pattern = Regex::new(LINE_PATTERN).expect("hardcoded line pattern is valid");
        Self { pattern }
    }

    /// 원시 라인 한 줄을 파싱합니다.
    fn parse_line(&self, line: &str) -> Result<LogRecord, LogBufferError> {
        let captures = self
            .pattern
            .captures(line)
            .ok_or_else(|| LogBufferError::Parse {
                reason: "line does not match '<timestamp> <severity> [<service>] <body>'"
                    .to_owned(),
            })?;

        // 그룹 4개는 패턴상 항상 존재
        let timestamp_str = &captures[1];
        let severity = &captures[2];
        let service = &captures[3];
        let body = &captures[4];

        let timestamp = Self::parse_timestamp(timestamp_str)?;

        Ok(LogRecord::new(timestamp, severity, service, body))
    }

    /// RFC 3339 타임스탬프를 파싱하여 UTC로 정규화합니다.
    fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, LogBufferError> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| LogBufferError::Timestamp {
                value: value.to_owned(),
                reason: e.to_string(),
            })
    }
}

impl Default for StandardLineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser for StandardLineParser {
    fn format_name(&self) -> &str {
        "standard"
    }

    fn parse(&self, line: &str) -> Result<LogRecord, LogbayError> {
        self.parse_line(line).map_err(Into::into)
    }
}
