//! 로그 버퍼 에러 타입
//!
//! [`LogBufferError`]는 버퍼 크레이트 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<LogBufferError> for LogbayError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use logbay_core::error::{LogbayError, ParseError, StorageError};

/// 로그 버퍼 도메인 에러
///
/// 수집 호출자에게는 싱크 쓰기 실패만 전파됩니다. 파싱 거부와
/// 조회 경계값 오류는 크레이트 내부에서 흡수됩니다.
#[derive(Debug, thiserror::Error)]
pub enum LogBufferError {
    /// 라인 파싱 실패
    #[error("parse error: {reason}")]
    Parse {
        /// 실패 사유
        reason: String,
    },

    /// 타임스탬프 파싱 실패
    #[error("invalid timestamp '{value}': {reason}")]
    Timestamp {
        /// 원본 입력값
        value: String,
        /// 실패 사유
        reason: String,
    },

    /// 플러시 중 싱크 쓰기 실패
    #[error("sink write failed: {sink}: {reason}")]
    SinkWrite {
        /// 싱크 이름
        sink: String,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl From<LogBufferError> for LogbayError {
    fn from(err: LogBufferError) -> Self {
        match err {
            LogBufferError::Parse { reason } => {
                LogbayError::Parse(ParseError::Malformed { reason })
            }
            LogBufferError::Timestamp { value, reason } => {
                LogbayError::Parse(ParseError::Timestamp { value, reason })
            }
            LogBufferError::SinkWrite { sink, reason } => {
                LogbayError::Storage(StorageError::Write(format!("{sink}: {reason}")))
            }
            LogBufferError::Config { field, reason } => {
                LogbayError::Config(logbay_core::error::ConfigError::InvalidValue {
                    field,
                    reason,
                })
            }
        }
    }
}
