//! End-to-end scan-and-persist tests

mod helpers;

use helpers::{absolute, create_test_db, create_test_tree, media_row_count, path_string, remove_category};
use mediascan_ingest::db::MediaRepository;
use mediascan_ingest::services::{DirectoryScanner, IngestPipeline, IngestSummary, ScanError};
use mediascan_ingest::IngestError;
use sqlx::SqlitePool;
use std::path::Path;
use tokio_util::sync::CancellationToken;

fn pipeline(pool: &SqlitePool) -> IngestPipeline {
    IngestPipeline::new(DirectoryScanner::default(), MediaRepository::new(pool.clone()))
}

#[tokio::test]
async fn test_end_to_end_scan() {
    let dir = create_test_tree(&["a.mp4", "nested/b.mkv", "c.mp3", "d.xyz"]);
    let pool = create_test_db().await;

    let summary = pipeline(&pool).run(dir.path()).await.unwrap();

    assert_eq!(
        summary,
        IngestSummary {
            processed: 3,
            skipped_duplicate: 0,
            skipped_unclassified: 1,
            ..Default::default()
        }
    );
    assert_eq!(media_row_count(&pool).await, 3);

    let repo = MediaRepository::new(pool.clone());
    let video_id = repo.category_id("video").await.unwrap();
    let audio_id = repo.category_id("audio").await.unwrap();

    for (name, expected_category) in [("a.mp4", video_id), ("nested/b.mkv", video_id), ("c.mp3", audio_id)] {
        let path = path_string(&absolute(&dir, name));
        let record = repo
            .get_by_path(&path)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("{} not stored", path));
        assert_eq!(record.category_id, expected_category);
        assert_eq!(record.file_size, "dummy content".len() as i64);
        assert_eq!(record.duration, 0.0);
        assert_eq!(record.resolution, "Unknown");
        assert_eq!(record.codec, "Unknown");
        assert_eq!(record.bit_rate, 0);
        assert!(record.date_created.is_none());
    }
}

#[tokio::test]
async fn test_rescan_skips_duplicates() {
    let dir = create_test_tree(&["a.mp4", "b.mp3", "c.jpg"]);
    let pool = create_test_db().await;
    let pipeline = pipeline(&pool);

    let first = pipeline.run(dir.path()).await.unwrap();
    assert_eq!(first.processed, 3);

    std::fs::write(dir.path().join("d.png"), b"new").unwrap();
    let second = pipeline.run(dir.path()).await.unwrap();

    assert_eq!(second.processed, 1);
    assert_eq!(second.skipped_duplicate, 3);
    assert_eq!(media_row_count(&pool).await, 4);
}

#[tokio::test]
async fn test_invalid_root_fails_before_storage() {
    let pool = create_test_db().await;

    let result = pipeline(&pool).run(Path::new("/does/not/exist")).await;

    match result {
        Err(IngestError::InvalidRoot(ScanError::PathNotFound(_))) => {}
        other => panic!("Expected InvalidRoot, got {:?}", other),
    }
    assert_eq!(media_row_count(&pool).await, 0);
}

#[tokio::test]
async fn test_empty_directory_is_success() {
    let dir = create_test_tree(&[]);
    let pool = create_test_db().await;

    let summary = pipeline(&pool).run(dir.path()).await.unwrap();
    assert_eq!(summary, IngestSummary::default());
}

#[tokio::test]
async fn test_missing_category_aborts_without_partial_row() {
    let dir = create_test_tree(&["a.mp4"]);
    let pool = create_test_db().await;
    remove_category(&pool, "video").await;

    let result = pipeline(&pool).run(dir.path()).await;

    match result {
        Err(IngestError::CategoryNotFound(name)) => assert_eq!(name, "video"),
        other => panic!("Expected CategoryNotFound, got {:?}", other),
    }
    assert_eq!(media_row_count(&pool).await, 0);
}

#[tokio::test]
async fn test_cancelled_run_stops_before_next_file() {
    let dir = create_test_tree(&["a.mp4", "b.mp4"]);
    let pool = create_test_db().await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let summary = pipeline(&pool)
        .with_cancellation(cancel)
        .run(dir.path())
        .await
        .unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.processed, 0);
    assert_eq!(media_row_count(&pool).await, 0);
}

#[tokio::test]
async fn test_storage_failure_aborts_run() {
    let dir = create_test_tree(&["a.mp4"]);
    let pool = create_test_db().await;
    let pipeline = pipeline(&pool);
    pool.close().await;

    let result = pipeline.run(dir.path()).await;
    assert!(matches!(result, Err(IngestError::StorageUnavailable(_))));
}

#[tokio::test]
async fn test_ingest_file_that_vanished_is_counted_as_failed() {
    let dir = create_test_tree(&["a.mp4"]);
    let pool = create_test_db().await;
    let pipeline = pipeline(&pool);

    let file = mediascan_ingest::services::ScannedFile {
        path: dir.path().join("gone.mp4"),
        kind: mediascan_ingest::MediaKind::Video,
    };
    let mut cache = std::collections::HashMap::new();
    let outcome = pipeline.ingest_file(&file, &mut cache).await.unwrap();

    assert!(matches!(outcome, mediascan_ingest::services::FileOutcome::Failed(_)));
    assert_eq!(media_row_count(&pool).await, 0);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_non_utf8_names_are_not_merged() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = create_test_tree(&["ok.mp4"]);
    for name in [&b"a\xff.mp4"[..], &b"a\xfe.mp4"[..]] {
        std::fs::write(dir.path().join(OsStr::from_bytes(name)), b"dummy content").unwrap();
    }
    let pool = create_test_db().await;

    let summary = pipeline(&pool).run(dir.path()).await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.skipped_duplicate, 0);
    assert_eq!(media_row_count(&pool).await, 1);
}
