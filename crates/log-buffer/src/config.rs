//! 버퍼 설정
//!
//! [`BufferConfig`]는 플러시 정책을 결정하는 두 값 — 플러시 임계값과
//! 레코드당 추정 비용 — 을 담습니다. 설정 파일/환경변수 로딩은 이
//! 컴포넌트의 범위 밖이며, 임베딩하는 프로세스가 채워서 전달합니다.

use serde::{Deserialize, Serialize};

use crate::error::LogBufferError;

/// 기본 플러시 임계값 (10 MiB)
pub const DEFAULT_FLUSH_THRESHOLD_BYTES: usize = 10 * 1024 * 1024;

/// 기본 레코드당 추정 비용 (바이트)
///
/// 실제 직렬화 크기와 무관한 고정 근사치입니다.
pub const DEFAULT_RECORD_COST_BYTES: usize = 256;

/// 버퍼 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferConfig {
    /// 플러시 임계값 (바이트) — 추정 버퍼 크기가 이 값을 초과하면 플러시
    pub flush_threshold_bytes: usize,
    /// 레코드당 추정 비용 (바이트)
    pub record_cost_bytes: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            flush_threshold_bytes: DEFAULT_FLUSH_THRESHOLD_BYTES,
            record_cost_bytes: DEFAULT_RECORD_COST_BYTES,
        }
    }
}

impl BufferConfig {
    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogBufferError> {
        // 1 GiB를 넘는 임계값은 단위 착오일 가능성이 높음
        const MAX_FLUSH_THRESHOLD_BYTES: usize = 1024 * 1024 * 1024;

        if self.flush_threshold_bytes == 0
            || self.flush_threshold_bytes > MAX_FLUSH_THRESHOLD_BYTES
        {
            return Err(LogBufferError::Config {
                field: "flush_threshold_bytes".to_owned(),
                reason: format!("must be 1-{MAX_FLUSH_THRESHOLD_BYTES}"),
            });
        }

        if self.record_cost_bytes == 0 {
            return Err(LogBufferError::Config {
                field: "record_cost_bytes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        Ok(())
    }
}

/// 버퍼 설정 빌더
#[derive(Default)]
pub struct BufferConfigBuilder {
    config: BufferConfig,
}

impl BufferConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 플러시 임계값(바이트)을 설정합니다.
    pub fn flush_threshold_bytes(mut self, bytes: usize) -> Self {
        self.config.flush_threshold_bytes = bytes;
        self
    }

    /// 레코드당 추정 비용(바이트)을 설정합니다.
    pub fn record_cost_bytes(mut self, bytes: usize) -> Self {
        self.config.record_cost_bytes = bytes;
        self
    }

    /// 설정을 검증하고 `BufferConfig`를 생성합니다.
    pub fn build(self) -> Result<BufferConfig, LogBufferError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
