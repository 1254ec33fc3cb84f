//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logbay_`
//! - 모듈명: `buffer_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logbay_core::metrics::BUFFER_LINES_INGESTED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 싱크 이름 레이블 키
pub const LABEL_SINK: &str = "sink";

/// 파서 형식 레이블 키
pub const LABEL_PARSER_FORMAT: &str = "format";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Buffer 메트릭 ────────────────────────────────────────────────

/// Buffer: 수신한 전체 라인 수 (counter)
pub const BUFFER_LINES_INGESTED_TOTAL: &str = "logbay_buffer_lines_ingested_total";

/// Buffer: 파싱 거부 수 (counter)
pub const BUFFER_PARSE_REJECTIONS_TOTAL: &str = "logbay_buffer_parse_rejections_total";

/// Buffer: 플러시 횟수 (counter, label: result)
pub const BUFFER_FLUSHES_TOTAL: &str = "logbay_buffer_flushes_total";

/// Buffer: 플러시로 기록된 레코드 수 (counter)
pub const BUFFER_RECORDS_FLUSHED_TOTAL: &str = "logbay_buffer_records_flushed_total";

/// Buffer: 처리된 조회 수 (counter)
pub const BUFFER_QUERIES_TOTAL: &str = "logbay_buffer_queries_total";

/// Buffer: 현재 버퍼링된 레코드 수 (gauge)
pub const BUFFER_RECORDS: &str = "logbay_buffer_records";

/// Buffer: 현재 추정 버퍼 크기 (gauge, 바이트)
pub const BUFFER_ESTIMATED_BYTES: &str = "logbay_buffer_estimated_bytes";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// `metrics::describe_counter!()`, `describe_gauge!()`를 호출하여
/// Prometheus HELP 텍스트를 설정합니다.
///
/// 이 함수는 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 임베딩하는 프로세스의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge};

    describe_counter!(
        BUFFER_LINES_INGESTED_TOTAL,
        "Total number of raw log lines received for ingestion"
    );
    describe_counter!(
        BUFFER_PARSE_REJECTIONS_TOTAL,
        "Total number of lines that failed parsing and were stored as zero-value records"
    );
    describe_counter!(
        BUFFER_FLUSHES_TOTAL,
        "Total number of buffer flush attempts by result"
    );
    describe_counter!(
        BUFFER_RECORDS_FLUSHED_TOTAL,
        "Total number of records written to the durable sink"
    );
    describe_counter!(
        BUFFER_QUERIES_TOTAL,
        "Total number of queries served from the in-memory buffer"
    );
    describe_gauge!(BUFFER_RECORDS, "Current number of buffered records");
    describe_gauge!(
        BUFFER_ESTIMATED_BYTES,
        "Current estimated buffer size in bytes"
    );
}
