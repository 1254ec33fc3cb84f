//! 버퍼 크기 추정 — 플러시 임계값 판정용 비용 계산
//!
//! 기본 추정은 레코드의 실제 직렬화 크기와 무관하게 레코드당 고정
//! 비용(256바이트)을 부과합니다. 알려진 부정확성이지만 플러시 계약의
//! 일부이며, core의 [`SizeEstimator`](logbay_core::pipeline::SizeEstimator)
//! trait을 통해 다른 추정기로 교체할 수 있습니다.

use logbay_core::pipeline::SizeEstimator;
use logbay_core::types::LogRecord;

use crate::config::DEFAULT_RECORD_COST_BYTES;

/// 고정 비용 추정기
///
/// 모든 레코드에 동일한 바이트 비용을 부과합니다.
#[derive(Debug, Clone, Copy)]
pub struct FlatRateEstimator {
    /// 레코드당 비용 (바이트)
    cost_per_record: usize,
}

impl FlatRateEstimator {
    /// 지정한 레코드당 비용으로 추정기를 생성합니다.
    pub fn new(cost_per_record: usize) -> Self {
        Self { cost_per_record }
    }

    /// 레코드당 비용을 반환합니다.
    pub fn cost_per_record(&self) -> usize {
        self.cost_per_record
    }
}

impl Default for FlatRateEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_RECORD_COST_BYTES)
    }
}

impl SizeEstimator for FlatRateEstimator {
    fn estimate(&self, _record: &LogRecord) -> usize {
        self.cost_per_record
    }
}
