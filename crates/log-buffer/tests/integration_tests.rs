//! 통합 테스트 -- 수집/플러시/조회 전체 흐름 검증
//!
//! 이 파일은 라인 수집부터 임계값 플러시, 버퍼 조회까지의 전체 흐름을
//! 검증합니다.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{TimeZone, Utc};

use logbay_core::error::{LogbayError, StorageError};
use logbay_core::pipeline::{LineParser, LogSink};
use logbay_core::types::LogRecord;
use logbay_log_buffer::{
    BufferConfig, BufferConfigBuilder, BufferManager, LogBufferError, MemorySink, QueryParams,
    StandardLineParser,
};

/// 지정한 횟수만큼 성공한 뒤 실패하는 싱크
struct FailingSink {
    succeed_before_failing: usize,
    writes: AtomicUsize,
    written: tokio::sync::Mutex<Vec<LogRecord>>,
}

impl FailingSink {
    fn new(succeed_before_failing: usize) -> Self {
        Self {
            succeed_before_failing,
            writes: AtomicUsize::new(0),
            written: tokio::sync::Mutex::new(Vec::new()),
        }
    }

    async fn written_count(&self) -> usize {
        self.written.lock().await.len()
    }
}

impl LogSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    async fn write(&self, record: &LogRecord) -> Result<(), LogbayError> {
        let n = self.writes.fetch_add(1, Ordering::SeqCst);
        if n >= self.succeed_before_failing {
            return Err(LogbayError::Storage(StorageError::Write(
                "injected failure".to_owned(),
            )));
        }
        self.written.lock().await.push(record.clone());
        Ok(())
    }
}

fn line(ts: &str, severity: &str, service: &str, body: &str) -> String {
    format!("{ts} {severity} [{service}] {body}")
}

/// 유효한 라인은 4개 캡처 그룹이 필드에 그대로 들어간다
#[tokio::test]
async fn test_parser_field_fidelity() {
    let parser = StandardLineParser::new();
    let record = parser
        .parse("2024-01-15T12:00:00Z WARN [apache] client disconnected mid-request")
        .expect("failed to parse valid line");

    assert_eq!(
        record.timestamp,
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    );
    assert_eq!(record.severity, "WARN");
    assert_eq!(record.service, "apache");
    assert_eq!(record.body, "client disconnected mid-request");
}

/// 수집 직후 필터 없는 조회는 배치 전체를 같은 순서로 반환한다
#[tokio::test]
async fn test_ingest_then_query_roundtrip() {
    let manager = BufferManager::new(MemorySink::new(), BufferConfig::default())
        .expect("failed to build manager");

    let lines: Vec<String> = (0..50)
        .map(|i| {
            line(
                &format!("2024-01-15T12:00:{:02}Z", i % 60),
                "INFO",
                "nginx",
                &format!("request {i}"),
            )
        })
        .collect();
    manager.ingest(&lines).await.expect("ingest failed");

    let records = manager.query(&QueryParams::new()).await;
    assert_eq!(records.len(), 50);

    // 파서가 각 라인에 대해 생성했을 레코드와 필드 단위로 동일
    let parser = StandardLineParser::new();
    for (input, record) in lines.iter().zip(&records) {
        let expected = parser.parse(input).expect("failed to parse line");
        assert_eq!(&expected, record);
    }
}

/// 형식이 깨진 라인은 배치를 중단시키지 않고 영값 레코드로 들어간다
#[tokio::test]
async fn test_malformed_lines_become_zero_value_records() {
    let manager = BufferManager::new(MemorySink::new(), BufferConfig::default())
        .expect("failed to build manager");

    manager
        .ingest(&[
            line("2024-01-15T12:00:00Z", "INFO", "nginx", "good"),
            "completely malformed".to_owned(),
            // 형식은 맞지만 타임스탬프가 RFC 3339가 아님
            line("2024-99-99T00:00:00Z", "INFO", "nginx", "bad timestamp"),
            line("2024-01-15T12:00:01Z", "INFO", "nginx", "also good"),
        ])
        .await
        .expect("ingest failed");

    assert_eq!(manager.len().await, 4);
    assert_eq!(manager.stats().parse_rejections, 2);

    let records = manager
        .query(&QueryParams::new().with_start("1970-01-01T00:00:00Z"))
        .await;
    assert_eq!(records.iter().filter(|r| r.is_zero()).count(), 2);
}

/// 기본 임계값(10 MiB, 레코드당 256바이트)을 넘는 배치는 전체 플러시된다
#[tokio::test]
async fn test_default_threshold_flush() {
    let manager = BufferManager::new(MemorySink::new(), BufferConfig::default())
        .expect("failed to build manager");

    // 41,000 * 256 = 10,496,000 > 10 MiB
    let lines: Vec<String> = (0..41_000)
        .map(|i| line("2024-01-15T12:00:00Z", "INFO", "nginx", &format!("r{i}")))
        .collect();
    manager.ingest(&lines).await.expect("ingest failed");

    // 레코드당 정확히 한 번씩 싱크에 기록되고 버퍼는 비워진다
    assert_eq!(manager.sink().len().await, 41_000);
    assert!(manager.is_empty().await);
    assert_eq!(manager.stats().flushes, 1);

    // 플러시 이후 조회는 빈 시퀀스
    let records = manager.query(&QueryParams::new()).await;
    assert!(records.is_empty());
}

/// 시간 범위 필터는 양끝 포함이며 삽입 순서를 보존한다
#[tokio::test]
async fn test_range_filter_is_inclusive() {
    let manager = BufferManager::new(MemorySink::new(), BufferConfig::default())
        .expect("failed to build manager");

    manager
        .ingest(&[
            line("2023-12-31T23:59:59Z", "INFO", "nginx", "before range"),
            line("2024-01-01T00:00:00Z", "INFO", "nginx", "at start"),
            line("2024-01-01T12:00:00Z", "INFO", "nginx", "inside"),
            line("2024-01-02T00:00:00Z", "INFO", "nginx", "at end"),
            line("2024-01-02T00:00:01Z", "INFO", "nginx", "after range"),
        ])
        .await
        .expect("ingest failed");

    let params = QueryParams::new()
        .with_start("2024-01-01T00:00:00Z")
        .with_end("2024-01-02T00:00:00Z");
    let records = manager.query(&params).await;

    let bodies: Vec<&str> = records.iter().map(|r| r.body.as_str()).collect();
    assert_eq!(bodies, vec!["at start", "inside", "at end"]);
}

/// 텍스트 검색은 부분 일치가 아니라 필드 단위 정확 일치다
#[tokio::test]
async fn test_text_filter_is_exact_match() {
    let manager = BufferManager::new(MemorySink::new(), BufferConfig::default())
        .expect("failed to build manager");

    manager
        .ingest(&[
            line("2024-01-15T12:00:00Z", "INFO", "nginx", "served request"),
            line("2024-01-15T12:00:01Z", "INFO", "apache", "request from nginx"),
            line("2024-01-15T12:00:02Z", "INFO", "apache", "nginx"),
            line("2024-01-15T12:00:03Z", "WARN", "postgres", "slow query"),
        ])
        .await
        .expect("ingest failed");

    let records = manager
        .query(&QueryParams::new().with_text("nginx"))
        .await;

    // service == "nginx"와 body == "nginx"만 일치.
    // body가 "request from nginx"인 레코드는 부분 일치라 제외된다.
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].body, "served request");
    assert_eq!(records[1].body, "nginx");

    // severity 필드도 정확 일치 대상
    let warns = manager.query(&QueryParams::new().with_text("WARN")).await;
    assert_eq!(warns.len(), 1);
    assert_eq!(warns[0].service, "postgres");
}

/// 빈 문자열 파라미터는 필터 없음과 동일하다
#[tokio::test]
async fn test_empty_string_params_mean_no_filter() {
    let manager = BufferManager::new(MemorySink::new(), BufferConfig::default())
        .expect("failed to build manager");

    manager
        .ingest(&[
            line("2024-01-15T12:00:00Z", "INFO", "nginx", "a"),
            line("2024-01-15T12:00:01Z", "INFO", "nginx", "b"),
        ])
        .await
        .expect("ingest failed");

    let records = manager.query(&QueryParams::from_raw("", "", "")).await;
    assert_eq!(records.len(), 2);
}

/// 경계값이 파싱되지 않으면 버퍼의 첫/마지막 타임스탬프로 대체된다
#[tokio::test]
async fn test_malformed_bounds_fall_back_to_buffer_bounds() {
    let manager = BufferManager::new(MemorySink::new(), BufferConfig::default())
        .expect("failed to build manager");

    manager
        .ingest(&[
            line("2024-01-15T12:00:00Z", "INFO", "nginx", "a"),
            line("2024-01-15T12:00:01Z", "INFO", "nginx", "b"),
            line("2024-01-15T12:00:02Z", "INFO", "nginx", "c"),
        ])
        .await
        .expect("ingest failed");

    let records = manager
        .query(&QueryParams::from_raw("not-a-time", "also-not-a-time", ""))
        .await;
    assert_eq!(records.len(), 3);
}

/// 싱크 쓰기 실패 시 플러시는 즉시 중단되고 버퍼는 그대로 남는다
#[tokio::test]
async fn test_sink_failure_aborts_flush_and_keeps_buffer() {
    let config = BufferConfigBuilder::new()
        .flush_threshold_bytes(256 * 3)
        .record_cost_bytes(256)
        .build()
        .expect("failed to build config");
    // 두 번 성공한 뒤 세 번째 쓰기에서 실패
    let manager =
        BufferManager::new(FailingSink::new(2), config).expect("failed to build manager");

    let lines: Vec<String> = (0..4)
        .map(|i| line(&format!("2024-01-15T12:00:0{i}Z"), "INFO", "nginx", "x"))
        .collect();
    let result = manager.ingest(&lines).await;

    assert!(matches!(result, Err(LogBufferError::SinkWrite { .. })));

    // 버퍼는 비워지지 않고 전체가 남아 있으며 여전히 조회 가능
    assert_eq!(manager.len().await, 4);
    let records = manager.query(&QueryParams::new()).await;
    assert_eq!(records.len(), 4);

    // 실패 전에 기록된 레코드는 롤백되지 않는다
    assert_eq!(manager.sink().written_count().await, 2);
    assert_eq!(manager.stats().flush_failures, 1);
    assert_eq!(manager.stats().flushes, 0);
}

/// 동시 수집/조회 호출자는 절반만 플러시된 버퍼를 관측하지 않는다
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ingest_and_query() {
    let config = BufferConfigBuilder::new()
        .flush_threshold_bytes(256 * 100)
        .record_cost_bytes(256)
        .build()
        .expect("failed to build config");
    let manager =
        Arc::new(BufferManager::new(MemorySink::new(), config).expect("failed to build manager"));

    let mut tasks = Vec::new();
    for t in 0..8 {
        let manager = Arc::clone(&manager);
        tasks.push(tokio::spawn(async move {
            for i in 0..100 {
                let lines = vec![line(
                    "2024-01-15T12:00:00Z",
                    "INFO",
                    "nginx",
                    &format!("task {t} line {i}"),
                )];
                manager.ingest(&lines).await.expect("ingest failed");
            }
        }));
    }
    for _ in 0..4 {
        let manager = Arc::clone(&manager);
        tasks.push(tokio::spawn(async move {
            for _ in 0..50 {
                let records = manager.query(&QueryParams::new()).await;
                // 잠금 하에서만 관측되므로 임계값(100레코드)을 넘은 스냅샷은 없어야 함
                assert!(records.len() <= 100, "query observed oversized buffer");
            }
        }));
    }
    for task in tasks {
        task.await.expect("task panicked");
    }

    // 라인 800개 전부가 버퍼 또는 싱크 중 한 곳에 정확히 한 번 존재
    let buffered = manager.len().await;
    let flushed = manager.sink().len().await;
    assert_eq!(buffered + flushed, 800);
    assert_eq!(manager.stats().lines_ingested, 800);
}
