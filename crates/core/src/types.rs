//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 버퍼, 파서, 싱크가 공유하는 데이터 구조를 정의합니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 로그 레코드
///
/// 원시 로그 한 줄을 파싱한 구조화된 결과를 나타냅니다.
/// 필드 외의 식별자는 없으며, 생성 이후 변경되지 않습니다.
///
/// `Default` 구현은 영값(zero-value) 레코드를 만듭니다. 파싱에 실패한
/// 라인은 드롭되지 않고 이 영값 레코드로 대체되어 버퍼에 들어갑니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// 로그 발생 시각 (UTC 정규화)
    pub timestamp: DateTime<Utc>,
    /// 심각도 토큰 (예: "INFO", "WARN")
    pub severity: String,
    /// 로그를 생성한 서비스 토큰 (예: "nginx")
    pub service: String,
    /// 나머지 본문 (공백 포함 자유 텍스트)
    pub body: String,
}

impl LogRecord {
    /// 새 로그 레코드를 생성합니다.
    pub fn new(
        timestamp: DateTime<Utc>,
        severity: impl Into<String>,
        service: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            severity: severity.into(),
            service: service.into(),
            body: body.into(),
        }
    }

    /// 파싱 실패로 대체된 영값 레코드인지 확인합니다.
    ///
    /// 타임스탬프가 Unix epoch이고 모든 문자열 필드가 비어 있으면
    /// 영값으로 간주합니다.
    pub fn is_zero(&self) -> bool {
        self.timestamp == DateTime::<Utc>::default()
            && self.severity.is_empty()
            && self.service.is_empty()
            && self.body.is_empty()
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {}",
            self.timestamp.to_rfc3339(),
            self.severity,
            self.service,
            self.body,
        )
    }
}
