//! 버퍼 매니저 — 인메모리 상태, 크기 기반 플러시 정책, 배타 잠금
//!
//! [`BufferManager`]는 프로세스 수명 동안 살아 있는 단일 버퍼를
//! 소유합니다. 수집(`ingest`)과 조회(`query`)는 하나의 뮤텍스로
//! 직렬화되며, 플러시로 인한 싱크 쓰기도 잠금을 쥔 채 수행됩니다.
//! 느린 싱크는 그 시간 동안 모든 수집/조회를 막습니다.
//!
//! # 버퍼 불변식
//! - 수집 중에는 꼬리에만 추가된다.
//! - 버퍼는 플러시가 전부 성공했을 때만 원자적으로 비워진다.
//! - 개별 레코드를 제거하는 경로는 없다.
//!
//! # 레코드 가시성
//! ```text
//! Ingested (버퍼에 있음, 조회 가능) -> Flushed (내구 저장, 이 컴포넌트에서 조회 불가)
//! ```
//! 플러시된 레코드는 싱크의 소관이며, `query`는 현재 버퍼만 봅니다.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use logbay_core::metrics as m;
use logbay_core::pipeline::{LineParser, LogSink, SizeEstimator};
use logbay_core::types::LogRecord;

use crate::config::BufferConfig;
use crate::error::LogBufferError;
use crate::estimate::FlatRateEstimator;
use crate::parser::StandardLineParser;
use crate::query::{self, QueryParams};

/// 버퍼 통계 스냅샷
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferStats {
    /// 수신한 전체 라인 수
    pub lines_ingested: u64,
    /// 파싱 거부 수 (영값 레코드로 대체된 라인)
    pub parse_rejections: u64,
    /// 성공한 플러시 횟수
    pub flushes: u64,
    /// 실패한 플러시 횟수
    pub flush_failures: u64,
}

/// 버퍼 매니저
///
/// 원시 라인 배치를 파싱해 인메모리 버퍼에 쌓고, 추정 크기가 임계값을
/// 초과하면 버퍼 전체를 삽입 순서대로 싱크에 플러시합니다. 버퍼링
/// 중인 레코드에 대한 시간 범위/텍스트 조회를 함께 제공합니다.
///
/// 전역 싱글톤이 아니라 명시적으로 생성해 핸들(`Arc`)로 공유하는
/// 객체입니다. 테스트 격리와 다중 인스턴스가 가능합니다.
///
/// # 사용 예시
/// ```ignore
/// use logbay_log_buffer::{BufferConfig, BufferManager, MemorySink, QueryParams};
///
/// let manager = BufferManager::new(MemorySink::new(), BufferConfig::default())?;
/// manager
///     .ingest(&["2024-01-15T12:00:00Z INFO [nginx] GET / 200"])
///     .await?;
/// let records = manager.query(&QueryParams::new()).await;
/// assert_eq!(records.len(), 1);
/// ```
pub struct BufferManager<S: LogSink> {
    /// 버퍼 본체 — 삽입 순서가 보존되는 레코드 시퀀스
    records: Mutex<Vec<LogRecord>>,
    /// 라인 파서
    parser: Box<dyn LineParser>,
    /// 크기 추정기
    estimator: Box<dyn SizeEstimator>,
    /// 내구성 싱크
    sink: S,
    /// 버퍼 설정
    config: BufferConfig,
    /// 수신한 전체 라인 카운터
    lines_ingested: AtomicU64,
    /// 파싱 거부 카운터
    parse_rejections: AtomicU64,
    /// 성공한 플러시 카운터
    flushes: AtomicU64,
    /// 실패한 플러시 카운터
    flush_failures: AtomicU64,
}

impl<S: LogSink> BufferManager<S> {
    /// 기본 파서/추정기로 새 버퍼 매니저를 생성합니다.
    ///
    /// 추정기는 `config.record_cost_bytes`의 고정 비용을 사용합니다.
    pub fn new(sink: S, config: BufferConfig) -> Result<Self, LogBufferError> {
        let estimator = FlatRateEstimator::new(config.record_cost_bytes);
        Self::with_parts(
            Box::new(StandardLineParser::new()),
            Box::new(estimator),
            sink,
            config,
        )
    }

    /// 파서와 추정기를 직접 지정하여 버퍼 매니저를 생성합니다.
    pub fn with_parts(
        parser: Box<dyn LineParser>,
        estimator: Box<dyn SizeEstimator>,
        sink: S,
        config: BufferConfig,
    ) -> Result<Self, LogBufferError> {
        config.validate()?;
        Ok(Self {
            records: Mutex::new(Vec::new()),
            parser,
            estimator,
            sink,
            config,
            lines_ingested: AtomicU64::new(0),
            parse_rejections: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            flush_failures: AtomicU64::new(0),
        })
    }

    /// 원시 라인 배치를 수집합니다.
    ///
    /// 각 라인을 순서대로 파싱해 버퍼 꼬리에 추가합니다. 파싱이 거부된
    /// 라인은 배치를 중단시키지 않고 영값 레코드로 대체되어 들어갑니다
    /// (진단 레벨로 로깅만 남김). 전체 추가 후 추정 버퍼 크기가
    /// 임계값을 초과하면 잠금을 쥔 채 플러시합니다.
    ///
    /// # Errors
    ///
    /// 플러시 중 싱크 쓰기가 실패하면 [`LogBufferError::SinkWrite`]를
    /// 반환합니다. 이때 버퍼는 비워지지 않고 그대로 남습니다.
    pub async fn ingest<L: AsRef<str>>(&self, lines: &[L]) -> Result<(), LogBufferError> {
        let mut records = self.records.lock().await;

        for line in lines {
            match self.parser.parse(line.as_ref()) {
                Ok(record) => records.push(record),
                Err(e) => {
                    // 거부된 라인도 드롭하지 않고 영값 레코드로 삽입
                    self.parse_rejections.fetch_add(1, Ordering::Relaxed);
                    metrics::counter!(m::BUFFER_PARSE_REJECTIONS_TOTAL).increment(1);
                    tracing::debug!(
                        format = self.parser.format_name(),
                        error = %e,
                        "failed to parse log line, inserting zero-value record"
                    );
                    records.push(LogRecord::default());
                }
            }
        }

        self.lines_ingested
            .fetch_add(lines.len() as u64, Ordering::Relaxed);
        metrics::counter!(m::BUFFER_LINES_INGESTED_TOTAL).increment(lines.len() as u64);

        let estimated = self.estimate(&records);
        metrics::gauge!(m::BUFFER_RECORDS).set(records.len() as f64);
        metrics::gauge!(m::BUFFER_ESTIMATED_BYTES).set(estimated as f64);

        if estimated > self.config.flush_threshold_bytes {
            tracing::info!(
                estimated_bytes = estimated,
                threshold_bytes = self.config.flush_threshold_bytes,
                records = records.len(),
                "buffer size threshold exceeded, flushing"
            );
            self.flush_locked(&mut records).await?;
        }

        Ok(())
    }

    /// 버퍼링 중인 레코드를 조회합니다.
    ///
    /// 버퍼가 비어 있으면 빈 시퀀스를 반환합니다. `start`/`end`가 없거나
    /// 파싱되지 않으면 버퍼의 첫/마지막 레코드 타임스탬프가 기본값이
    /// 됩니다. 결과는 `start <= t <= end` (양끝 포함)이고, 텍스트가
    /// 주어지면 body/service/severity 중 하나와 정확히 일치하는
    /// 레코드를 삽입 순서대로 담습니다. 결과 크기 상한은 없습니다.
    ///
    /// 이미 플러시된 레코드는 조회 대상이 아닙니다. 레코드의 조회 가능
    /// 기간은 플러시 정책에 의해 결정됩니다.
    pub async fn query(&self, params: &QueryParams) -> Vec<LogRecord> {
        let records = self.records.lock().await;
        metrics::counter!(m::BUFFER_QUERIES_TOTAL).increment(1);

        if records.is_empty() {
            return Vec::new();
        }

        let start = params
            .start_bound()
            .unwrap_or_else(|| records[0].timestamp);
        let end = params
            .end_bound()
            .unwrap_or_else(|| records[records.len() - 1].timestamp);

        records
            .iter()
            .filter(|record| {
                let t = record.timestamp;
                if t < start || t > end {
                    return false;
                }
                match params.text.as_deref() {
                    None | Some("") => true,
                    Some(text) => query::matches_text(record, text),
                }
            })
            .cloned()
            .collect()
    }

    /// 버퍼의 모든 레코드를 무조건 플러시합니다.
    ///
    /// 임계값과 무관하게 현재 버퍼 전체를 싱크에 기록합니다. graceful
    /// shutdown 시 남은 레코드를 비우는 용도입니다. 플러시는 타이머로
    /// 실행되지 않으며, 이 메서드 외에는 `ingest` 내부에서만 일어납니다.
    ///
    /// 기록된 레코드 수를 반환합니다.
    pub async fn flush(&self) -> Result<usize, LogBufferError> {
        let mut records = self.records.lock().await;
        if records.is_empty() {
            return Ok(0);
        }
        self.flush_locked(&mut records).await
    }

    /// 잠금을 쥔 상태에서 버퍼 전체를 싱크에 기록합니다.
    ///
    /// 쓰기는 삽입 순서대로 레코드당 한 번씩 수행됩니다. 하나라도
    /// 실패하면 즉시 중단하고 에러를 반환하며, 버퍼는 비우지 않습니다.
    /// 이미 기록된 레코드는 롤백하지 않으므로 다음 플러시에서 중복
    /// 기록될 수 있습니다. 재시도는 하지 않습니다.
    async fn flush_locked(
        &self,
        records: &mut Vec<LogRecord>,
    ) -> Result<usize, LogBufferError> {
        for record in records.iter() {
            if let Err(e) = self.sink.write(record).await {
                self.flush_failures.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(m::BUFFER_FLUSHES_TOTAL, m::LABEL_RESULT => "failure")
                    .increment(1);
                tracing::error!(
                    sink = self.sink.name(),
                    error = %e,
                    buffered = records.len(),
                    "sink write failed, aborting flush"
                );
                return Err(LogBufferError::SinkWrite {
                    sink: self.sink.name().to_owned(),
                    reason: e.to_string(),
                });
            }
        }

        let flushed = records.len();
        records.clear();

        self.flushes.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(m::BUFFER_FLUSHES_TOTAL, m::LABEL_RESULT => "success").increment(1);
        metrics::counter!(m::BUFFER_RECORDS_FLUSHED_TOTAL).increment(flushed as u64);
        metrics::gauge!(m::BUFFER_RECORDS).set(0.0);
        metrics::gauge!(m::BUFFER_ESTIMATED_BYTES).set(0.0);

        tracing::info!(
            sink = self.sink.name(),
            records = flushed,
            "flushed buffer to sink"
        );
        Ok(flushed)
    }

    fn estimate(&self, records: &[LogRecord]) -> usize {
        records
            .iter()
            .map(|record| self.estimator.estimate(record))
            .sum()
    }

    /// 현재 버퍼링된 레코드 수를 반환합니다.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// 버퍼가 비어 있는지 확인합니다.
    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// 현재 추정 버퍼 크기(바이트)를 반환합니다.
    pub async fn estimated_bytes(&self) -> usize {
        let records = self.records.lock().await;
        self.estimate(&records)
    }

    /// 버퍼 통계 스냅샷을 반환합니다.
    pub fn stats(&self) -> BufferStats {
        BufferStats {
            lines_ingested: self.lines_ingested.load(Ordering::Relaxed),
            parse_rejections: self.parse_rejections.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            flush_failures: self.flush_failures.load(Ordering::Relaxed),
        }
    }

    /// 버퍼 설정에 대한 참조를 반환합니다.
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// 싱크에 대한 참조를 반환합니다.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
