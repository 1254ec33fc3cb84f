//! 파이프라인 trait — 모듈 확장 포인트 정의
//!
//! 버퍼 매니저는 이 trait들을 통해 협력자와 연결됩니다.
//! HTTP 레이어, 데이터베이스 리포지토리 등 외부 협력자는 여기에 정의된
//! 계약만 구현하면 됩니다.

use std::future::Future;

use crate::error::LogbayError;
use crate::types::LogRecord;

/// 로그 라인 파서 trait
///
/// 새로운 라인 형식을 지원하려면 이 trait을 구현합니다.
/// 파싱은 순수하고 동기적이며, 재시도하지 않습니다.
pub trait LineParser: Send + Sync {
    /// 지원하는 라인 형식 이름
    fn format_name(&self) -> &str;

    /// 원시 라인 한 줄을 로그 레코드로 파싱
    fn parse(&self, line: &str) -> Result<LogRecord, LogbayError>;
}

/// 내구성 싱크 trait
///
/// 플러시 시점에 버퍼의 각 레코드가 삽입 순서대로, 레코드당 한 번씩
/// 이 trait을 통해 기록됩니다. 영속 표현은 구현체의 책임입니다.
pub trait LogSink: Send + Sync {
    /// 싱크 이름 (로깅/진단용)
    fn name(&self) -> &str;

    /// 레코드 하나를 내구 저장소에 기록
    fn write(&self, record: &LogRecord) -> impl Future<Output = Result<(), LogbayError>> + Send;
}

/// 버퍼 크기 추정 trait
///
/// 플러시 임계값 판정에 쓰이는 레코드당 비용을 계산합니다.
/// 기본 구현은 실제 직렬화 크기와 무관한 고정 근사치를 사용하며,
/// 테스트에서는 결정적 추정기로 교체할 수 있습니다.
pub trait SizeEstimator: Send + Sync {
    /// 레코드 하나의 추정 바이트 비용
    fn estimate(&self, record: &LogRecord) -> usize;
}
