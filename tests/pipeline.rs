use libsql::Builder;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use recall::config::Config;
use recall::db::HighlightStore;
use recall::kobo;
use recall::pipeline::{self, StepStatus};
use recall::report::{DailyReport, FileSink, ReportSink};
use std::path::Path;
use tempfile::tempdir;

const VOLUME: &str = "file:///mnt/onboard/Marcus_Aurelius/Meditations.kepub.epub";

async fn write_bookmarks(path: &Path, rows: &[(Option<&str>, Option<&str>, Option<&str>)]) {
    let db = Builder::new_local(path).build().await.expect("kobo db");
    let conn = db.connect().expect("kobo conn");
    conn.execute_batch(
        "CREATE TABLE Bookmark (BookmarkID TEXT PRIMARY KEY, Text TEXT, VolumeID TEXT, Annotation TEXT, ChapterProgress REAL);",
    )
    .await
    .expect("schema");

    for (index, (text, annotation, volume)) in rows.iter().enumerate() {
        conn.execute(
            "INSERT INTO Bookmark (BookmarkID, Text, VolumeID, Annotation, ChapterProgress) VALUES (?, ?, ?, ?, ?)",
            libsql::params![format!("b{index}"), *text, *volume, *annotation, 0.5],
        )
        .await
        .expect("insert");
    }
}

#[tokio::test]
async fn test_blank_duplicate_and_valid_rows_yield_one_record() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("KoboReader.sqlite");
    write_bookmarks(
        &source,
        &[
            (Some("   "), Some("note on nothing"), Some(VOLUME)),
            (Some("You have power over your mind."), None, Some(VOLUME)),
            (Some("You have power over your mind. dogear"), Some(""), Some(VOLUME)),
        ],
    )
    .await;
    let dest = dir.path().join("extracted.db");
    let text = dir.path().join("extracted.txt");

    let stats = kobo::extract(&source, &dest, &text).await.expect("extract");
    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.rejected, 1);

    let store = HighlightStore::open_existing(&dest).await.expect("open");
    let all = store.select_all().await.expect("select");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].text, "You have power over your mind.");
    assert_eq!(all[0].annotation, None);
    assert_eq!(all[0].source.as_deref(), Some("Meditations"));

    let written = std::fs::read_to_string(&text).expect("text output");
    assert_eq!(written.matches("Text: ").count(), 1);
    assert_eq!(
        written,
        "Text: You have power over your mind.\nSource: Meditations\n\n"
    );
}

#[tokio::test]
async fn test_configured_run_renders_report() {
    let dir = tempdir().expect("tempdir");
    let config_path = dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        "sources:\n  use_kobo: true\n  use_manual: true\nreport:\n  sample_count: 2\n  output: out/daily.html\n",
    )
    .expect("write config");
    let cfg = Config::new(&config_path).expect("config");

    write_bookmarks(
        &cfg.paths.kobo_db,
        &[
            (Some("1. Waste no more time arguing."), Some("daily"), Some(VOLUME)),
            (Some("The impediment to action advances action."), None, Some(VOLUME)),
        ],
    )
    .await;
    std::fs::write(
        &cfg.paths.manual_quotes,
        "Text,Annotation,Source\n\"We suffer more in imagination than in reality.\",,Letters from a Stoic\n",
    )
    .expect("write csv");

    let summary = pipeline::run(&cfg, &mut ChaCha8Rng::seed_from_u64(11))
        .await
        .expect("run");
    assert!(matches!(summary.kobo, StepStatus::Ran(stats) if stats.inserted == 2));
    assert!(matches!(summary.manual, StepStatus::Ran(stats) if stats.inserted == 1));
    assert_eq!(summary.quotes.len(), 2);
    assert!(cfg.paths.merged_db.exists());

    let report = DailyReport::new(
        chrono::NaiveDate::from_ymd_opt(2024, 1, 2).expect("date"),
        &summary.quotes,
    );
    let sink = FileSink::new(&cfg.report.output);
    sink.deliver(&report.subject(), &report.render_document().expect("render"))
        .await
        .expect("deliver");

    let html = std::fs::read_to_string(dir.path().join("out/daily.html")).expect("report");
    assert_eq!(html.matches("<blockquote").count(), 2);
    assert!(html.contains("02.01.2024"));
}
