//! 에러 타입 — 도메인별 에러 정의

/// Logbay 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogbayError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 스토리지(싱크) 에러
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파싱 에러
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 라인이 기대 형식과 일치하지 않음
    #[error("malformed line: {reason}")]
    Malformed { reason: String },

    /// 타임스탬프 파싱 실패
    #[error("invalid timestamp '{value}': {reason}")]
    Timestamp { value: String, reason: String },
}

/// 스토리지 에러
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 싱크 쓰기 실패
    #[error("write failed: {0}")]
    Write(String),

    /// 연결 실패
    #[error("connection failed: {0}")]
    Connection(String),
}
