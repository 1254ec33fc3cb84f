//! 조회 파라미터 및 필터링
//!
//! HTTP 레이어는 `start`/`end`/`text` 세 파라미터를 모두 선택적으로,
//! 빈 문자열일 수 있는 상태로 전달합니다. [`QueryParams`]는 그 경계를
//! 흡수합니다:
//!
//! - `start`/`end`가 없거나 RFC 3339로 파싱되지 않으면 버퍼의 첫/마지막
//!   레코드 타임스탬프가 기본값이 됩니다 (에러로 표면화되지 않음).
//! - `text`는 부분 일치가 아니라 body/service/severity 필드와의
//!   **정확한 문자열 일치**로 비교합니다.

use chrono::{DateTime, Utc};
use logbay_core::types::LogRecord;

/// 조회 파라미터
///
/// 모든 필드는 선택적입니다. 빈 문자열은 생성 시점에 `None`으로
/// 정규화됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// 범위 시작 (RFC 3339 문자열)
    pub start: Option<String>,
    /// 범위 끝 (RFC 3339 문자열)
    pub end: Option<String>,
    /// 정확 일치 검색 텍스트
    pub text: Option<String>,
}

impl QueryParams {
    /// 필터 없는 조회 파라미터를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 빈 문자열을 `None`으로 정규화하며 파라미터를 생성합니다.
    ///
    /// HTTP 쿼리 스트링에서 받은 값을 그대로 넘기는 용도입니다.
    pub fn from_raw(start: &str, end: &str, text: &str) -> Self {
        Self {
            start: none_if_empty(start),
            end: none_if_empty(end),
            text: none_if_empty(text),
        }
    }

    /// 범위 시작을 설정합니다.
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// 범위 끝을 설정합니다.
    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// 검색 텍스트를 설정합니다.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// 시작 경계를 파싱합니다. 없거나 파싱 불가면 `None`.
    pub(crate) fn start_bound(&self) -> Option<DateTime<Utc>> {
        parse_bound(self.start.as_deref())
    }

    /// 끝 경계를 파싱합니다. 없거나 파싱 불가면 `None`.
    pub(crate) fn end_bound(&self) -> Option<DateTime<Utc>> {
        parse_bound(self.end.as_deref())
    }
}

fn none_if_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// 경계값 문자열을 RFC 3339로 파싱하여 UTC로 정규화합니다.
///
/// 파싱 실패는 에러가 아니라 `None`입니다. 호출자가 버퍼의 첫/마지막
/// 타임스탬프로 대체합니다.
fn parse_bound(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?;
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(value, error = %e, "malformed query bound, falling back to buffer bounds");
            None
        }
    }
}

/// 레코드가 검색 텍스트와 일치하는지 확인합니다.
///
/// body, service, severity 중 하나가 텍스트와 **정확히** 같아야 합니다.
/// 부분 문자열 포함은 일치로 치지 않습니다.
pub(crate) fn matches_text(record: &LogRecord, text: &str) -> bool {
    record.body == text || record.service == text || record.severity == text
}
