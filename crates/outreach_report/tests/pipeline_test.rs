//! End-to-end report pipeline tests with mock collaborators.

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use outreach_core::{CellValue, GenerateRequest, LeadTable};
use outreach_error::{
    BackendError, ConfigError, DataError, DataErrorKind, OutreachErrorKind, OutreachResult,
    ReportErrorKind, StorageError, StorageErrorKind,
};
use outreach_interface::{
    ExcerptFetcher, ExcerptOutcome, LeadTableLoader, ReportStore, TextGenerator, TextStream,
};
use outreach_report::{
    DirectoryReportStore, NO_LEADS_MESSAGE, ReportGenerator, ReportSettings,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

struct MemoryLoader(Option<LeadTable>);

#[async_trait]
impl LeadTableLoader for MemoryLoader {
    async fn load(&self, report_id: &str) -> OutreachResult<LeadTable> {
        self.0.clone().ok_or_else(|| {
            DataError::new(DataErrorKind::DatasetNotFound(report_id.to_string())).into()
        })
    }
}

/// Streams a fixed summary in two fragments and records every request.
///
/// With `cut_stream_at` set, the stream for that request (0-based) breaks
/// after its first fragment.
#[derive(Default)]
struct MockGenerator {
    requests: Mutex<Vec<GenerateRequest>>,
    unavailable: bool,
    delay_ms: u64,
    cut_stream_at: Option<usize>,
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn stream(&self, req: &GenerateRequest) -> OutreachResult<TextStream> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(req.clone());
            requests.len() - 1
        };
        let fragments: Vec<OutreachResult<String>> = if self.cut_stream_at == Some(index) {
            vec![
                Ok("The recipient mailbox ".to_string()),
                Err(BackendError::new("connection reset mid-stream").into()),
            ]
        } else {
            vec![
                Ok("The recipient mailbox is full and ".to_string()),
                Ok("rejected delivery.".to_string()),
            ]
        };
        Ok(Box::pin(futures_util::stream::iter(fragments)))
    }

    async fn validate(&self) -> OutreachResult<()> {
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        if self.unavailable {
            return Err(ConfigError::new("Model not found: missing.gguf").into());
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// A store whose writes always fail.
struct ReadOnlyStore;

#[async_trait]
impl ReportStore for ReadOnlyStore {
    async fn store(&self, _report_id: &str, _contents: &str) -> OutreachResult<PathBuf> {
        Err(StorageError::new(StorageErrorKind::Io("read-only file system".to_string())).into())
    }

    async fn load(&self, report_id: &str) -> OutreachResult<String> {
        Err(StorageError::new(StorageErrorKind::NotFound(report_id.to_string())).into())
    }
}

struct FailingFetcher;

#[async_trait]
impl ExcerptFetcher for FailingFetcher {
    async fn fetch_excerpt(&self, _message_ref: &str) -> ExcerptOutcome {
        ExcerptOutcome::Failed("HTTP 401: Invalid Credentials".to_string())
    }
}

fn now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(330 * 60)
        .unwrap()
        .with_ymd_and_hms(2026, 10, 16, 12, 0, 0)
        .unwrap()
}

fn stamp(at: DateTime<FixedOffset>, hours_ago: i64) -> CellValue {
    (at - Duration::hours(hours_ago))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
        .into()
}

fn leads(reasons: Vec<(&str, i64, CellValue)>) -> LeadTable {
    LeadTable::new(
        vec![
            "lead_id".into(),
            "first_name".into(),
            "email".into(),
            "sent_at".into(),
            "verified_at".into(),
            "bounce_reason".into(),
            "gmail_msg_id".into(),
        ],
        reasons
            .into_iter()
            .map(|(id, sent_hours_ago, reason)| {
                vec![
                    id.into(),
                    "Ada".into(),
                    format!("{}@example.com", id.to_lowercase()).into(),
                    stamp(now(), sent_hours_ago),
                    stamp(now(), 1),
                    reason,
                    "18c2f0a".into(),
                ]
            })
            .collect(),
    )
}

struct Harness {
    generator: Arc<MockGenerator>,
    reports: ReportGenerator,
    store: Arc<DirectoryReportStore>,
    _dir: tempfile::TempDir,
}

fn harness(table: Option<LeadTable>, generator: MockGenerator, settings: ReportSettings) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirectoryReportStore::new(dir.path()));
    let generator = Arc::new(generator);
    let reports = ReportGenerator::new(
        Arc::new(MemoryLoader(table)),
        generator.clone(),
        store.clone(),
        settings,
    );
    Harness {
        generator,
        reports,
        store,
        _dir: dir,
    }
}

#[tokio::test]
async fn test_recent_bounce_included_old_excluded() {
    let table = leads(vec![
        ("A", 2, "Mailbox full".into()),
        ("B", 30, "Mailbox full".into()),
    ]);
    let h = harness(Some(table), MockGenerator::default(), ReportSettings::default());

    let report = h.reports.generate_at("16102026", now()).await.unwrap();
    assert_eq!(*report.lead_count(), 1);

    let text = h.store.load("16102026").await.unwrap();
    assert_eq!(text.matches("LEAD ID:").count(), 1);
    assert!(text.contains("LEAD ID: A\n"));
    assert!(text.contains("BOUNCE_REASON_SUMMARY:\nThe recipient mailbox is full and rejected delivery.\n"));
    assert!(!text.contains(NO_LEADS_MESSAGE));

    let requests = h.generator.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages().len(), 2);
}

#[tokio::test]
async fn test_no_bounce_reasons_gives_no_leads_report() {
    let table = leads(vec![
        ("A", 2, CellValue::Null),
        ("B", 3, "none".into()),
        ("C", 4, CellValue::Number(f64::NAN)),
    ]);
    let h = harness(Some(table), MockGenerator::default(), ReportSettings::default());

    let report = h.reports.generate_at("16102026", now()).await.unwrap();
    assert_eq!(*report.lead_count(), 0);
    let text = std::fs::read_to_string(report.path()).unwrap();
    assert!(text.contains(NO_LEADS_MESSAGE));
    assert!(!text.contains("LEAD ID:"));
    assert!(h.generator.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_each_lead_gets_an_isolated_conversation() {
    let table = leads(vec![
        ("A", 2, "Mailbox full".into()),
        ("B", 5, "550 User unknown".into()),
        ("C", 6, "Blocked by policy".into()),
    ]);
    let h = harness(Some(table), MockGenerator::default(), ReportSettings::default());
    h.reports.generate_at("16102026", now()).await.unwrap();

    let requests = h.generator.requests.lock().unwrap();
    assert_eq!(requests.len(), 3);
    for (request, id) in requests.iter().zip(["A", "B", "C"]) {
        assert_eq!(request.messages().len(), 2);
        let prompt = request.last_user_prompt().unwrap();
        assert!(prompt.contains(&format!("Lead ID: {}\n", id)));
    }
}

#[tokio::test]
async fn test_reruns_differ_only_in_timestamp_lines() {
    let table = leads(vec![("A", 2, "Mailbox full".into())]);
    let h = harness(Some(table), MockGenerator::default(), ReportSettings::default());

    let first = h.reports.generate_at("16102026", now()).await.unwrap();
    let first_text = std::fs::read_to_string(first.path()).unwrap();
    let second = h
        .reports
        .generate_at("16102026", now() + Duration::minutes(5))
        .await
        .unwrap();
    let second_text = std::fs::read_to_string(second.path()).unwrap();

    assert_eq!(first.path(), second.path());
    let stable = |text: &str| -> Vec<String> {
        text.lines()
            .filter(|line| !line.starts_with("GENERATED ON:") && !line.starts_with("PERIOD:"))
            .map(str::to_string)
            .collect()
    };
    assert_ne!(first_text, second_text);
    assert_eq!(stable(&first_text), stable(&second_text));
}

#[tokio::test]
async fn test_unavailable_backend_writes_nothing() {
    let table = leads(vec![("A", 2, "Mailbox full".into())]);
    let generator = MockGenerator {
        unavailable: true,
        ..Default::default()
    };
    let h = harness(Some(table), generator, ReportSettings::default());

    let err = h.reports.generate_at("16102026", now()).await.unwrap_err();
    assert!(err.kind().is_configuration());
    assert_eq!(std::fs::read_dir(h.store.dir()).map(|d| d.count()).unwrap_or(0), 0);
}

#[tokio::test]
async fn test_missing_dataset_is_data_error() {
    let h = harness(None, MockGenerator::default(), ReportSettings::default());
    let err = h.reports.generate_at("01012020", now()).await.unwrap_err();
    assert!(matches!(err.kind(), OutreachErrorKind::Data(_)));
}

#[tokio::test]
async fn test_failed_excerpt_becomes_inline_note() {
    let table = leads(vec![("A", 2, "Mailbox full".into())]);
    let settings = ReportSettings::builder().enable_excerpts(true).build().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(MockGenerator::default());
    let reports = ReportGenerator::new(
        Arc::new(MemoryLoader(Some(table))),
        generator.clone(),
        Arc::new(DirectoryReportStore::new(dir.path())),
        settings,
    )
    .with_excerpt_fetcher(Arc::new(FailingFetcher));

    let report = reports.generate_at("16102026", now()).await.unwrap();
    assert_eq!(*report.lead_count(), 1);
    let requests = generator.requests.lock().unwrap();
    let prompt = requests[0].last_user_prompt().unwrap();
    assert!(prompt.contains("(Gmail fetch failed: HTTP 401: Invalid Credentials)"));
}

#[tokio::test]
async fn test_concurrent_run_for_same_id_fails_fast() {
    let table = leads(vec![("A", 2, "Mailbox full".into())]);
    let generator = MockGenerator {
        delay_ms: 200,
        ..Default::default()
    };
    let h = harness(Some(table), generator, ReportSettings::default());

    let (first, second) = tokio::join!(h.reports.generate_at("16102026", now()), async {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        h.reports.generate_at("16102026", now()).await
    });

    assert!(first.is_ok());
    let err = second.unwrap_err();
    assert!(matches!(
        err.kind(),
        OutreachErrorKind::Report(e) if matches!(e.kind, ReportErrorKind::AlreadyRunning(_))
    ));

    // The guard is released once the first run finishes.
    assert!(h.reports.generate_at("16102026", now()).await.is_ok());
}

#[tokio::test]
async fn test_backend_failure_mid_report_writes_nothing() {
    let table = leads(vec![
        ("A", 2, "Mailbox full".into()),
        ("B", 3, "550 User unknown".into()),
    ]);
    let generator = MockGenerator {
        cut_stream_at: Some(1),
        ..Default::default()
    };
    let h = harness(Some(table), generator, ReportSettings::default());

    let err = h.reports.generate_at("16102026", now()).await.unwrap_err();
    assert!(matches!(err.kind(), OutreachErrorKind::Backend(_)));
    assert!(err.message().contains("connection reset mid-stream"));
    assert_eq!(h.generator.requests.lock().unwrap().len(), 2);
    assert!(h.store.load("16102026").await.is_err());
    assert_eq!(std::fs::read_dir(h.store.dir()).map(|d| d.count()).unwrap_or(0), 0);
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let table = leads(vec![("A", 2, "Mailbox full".into())]);
    let reports = ReportGenerator::new(
        Arc::new(MemoryLoader(Some(table))),
        Arc::new(MockGenerator::default()),
        Arc::new(ReadOnlyStore),
        ReportSettings::default(),
    );

    let err = reports.generate_at("16102026", now()).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        OutreachErrorKind::Storage(e) if matches!(e.kind, StorageErrorKind::Io(_))
    ));

    // The failed run still releases its guard.
    let err = reports.generate_at("16102026", now()).await.unwrap_err();
    assert!(matches!(err.kind(), OutreachErrorKind::Storage(_)));
}

#[tokio::test]
async fn test_duplicate_lead_ids_are_all_summarized() {
    let table = leads(vec![
        ("A", 2, "Mailbox full".into()),
        ("A", 3, "550 User unknown".into()),
    ]);
    let h = harness(Some(table), MockGenerator::default(), ReportSettings::default());

    let report = h.reports.generate_at("16102026", now()).await.unwrap();
    assert_eq!(*report.lead_count(), 2);
    assert_eq!(h.generator.requests.lock().unwrap().len(), 2);
    let text = h.store.load("16102026").await.unwrap();
    assert_eq!(text.matches("LEAD ID: A\n").count(), 2);
}
