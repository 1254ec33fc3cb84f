//! 인메모리 싱크 — 테스트/개발용 [`LogSink`] 구현
//!
//! 실제 배치에서는 데이터베이스 리포지토리 등 외부 협력자가
//! [`LogSink`]를 구현합니다. [`MemorySink`]는 그 자리에 끼우는
//! 인프로세스 구현으로, 기록된 레코드를 그대로 들고 있어 테스트에서
//! 플러시 결과를 검증할 수 있습니다.

use tokio::sync::Mutex;

use logbay_core::error::LogbayError;
use logbay_core::pipeline::LogSink;
use logbay_core::types::LogRecord;

/// 인메모리 싱크
///
/// 기록 순서를 보존하며, 쓰기는 항상 성공합니다.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// 기록된 레코드 (기록 순서대로)
    written: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    /// 새 인메모리 싱크를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 기록된 레코드의 사본을 반환합니다.
    pub async fn records(&self) -> Vec<LogRecord> {
        self.written.lock().await.clone()
    }

    /// 기록된 레코드 수를 반환합니다.
    pub async fn len(&self) -> usize {
        self.written.lock().await.len()
    }

    /// 아무것도 기록되지 않았는지 확인합니다.
    pub async fn is_empty(&self) -> bool {
        self.written.lock().await.is_empty()
    }
}

impl LogSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn write(&self, record: &LogRecord) -> Result<(), LogbayError> {
        self.written.lock().await.push(record.clone());
        Ok(())
    }
}
