/*!
 * Tests for transcription helpers and the cancellation token
 */

use std::time::Duration;

use chapterize::cancellation::CancellationToken;
use chapterize::errors::TranscriptionError;
use chapterize::transcriber::{ProgressUpdate, strip_code_fences};

#[test]
fn test_stripCodeFences_withSrtFence_shouldRemoveIt() {
    let raw = "```srt\n1\n00:00:00,000 --> 00:00:03,500\nこんにちは\n```";
    assert_eq!(
        strip_code_fences(raw),
        "1\n00:00:00,000 --> 00:00:03,500\nこんにちは"
    );
}

#[test]
fn test_stripCodeFences_withBareFence_shouldRemoveIt() {
    let raw = "```\ncontent line\n```";
    assert_eq!(strip_code_fences(raw), "content line");
}

#[test]
fn test_stripCodeFences_withoutFences_shouldReturnTrimmedInput() {
    let raw = "\n1\n00:00:00,000 --> 00:00:01,000\ntext\n\n";
    assert_eq!(strip_code_fences(raw), "1\n00:00:00,000 --> 00:00:01,000\ntext");
}

#[test]
fn test_progressUpdate_shouldCarryStatusAndPercentage() {
    let update = ProgressUpdate::new("アップロード中...", 10);
    assert_eq!(update.status, "アップロード中...");
    assert_eq!(update.percentage, 10);
}

#[test]
fn test_cancellationToken_freshToken_shouldNotBeCancelled() {
    let token = CancellationToken::new();
    assert!(!token.is_cancelled());
    assert!(token.check().is_ok());
}

#[test]
fn test_cancellationToken_afterCancel_shouldFailCheckWithCancelled() {
    let token = CancellationToken::new();
    token.cancel();

    assert!(token.is_cancelled());
    let err = token.check().unwrap_err();
    assert!(matches!(err, TranscriptionError::Cancelled));
    assert!(err.is_cancellation());
}

#[test]
fn test_cancellationToken_clones_shouldShareState() {
    let token = CancellationToken::new();
    let clone = token.clone();

    clone.cancel();
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn test_cancellationToken_cancelled_shouldResolveAfterCancel() {
    let token = CancellationToken::new();
    let waiter = token.clone();

    let handle = tokio::spawn(async move {
        waiter.cancelled().await;
        true
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    let resolved = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("cancelled() should resolve promptly")
        .unwrap();
    assert!(resolved);
}

#[tokio::test]
async fn test_cancellationToken_cancelledBeforeAwait_shouldResolveImmediately() {
    let token = CancellationToken::new();
    token.cancel();

    tokio::time::timeout(Duration::from_millis(100), token.cancelled())
        .await
        .expect("already-cancelled token should resolve immediately");
}

/// Cancellation is distinguishable from genuine failures
#[test]
fn test_transcriptionErrors_shouldBeDistinct() {
    let timeout = TranscriptionError::PollTimeout { attempts: 60 };
    let failed = TranscriptionError::ProcessingFailed;
    let cancelled = TranscriptionError::Cancelled;

    assert!(!timeout.is_cancellation());
    assert!(!failed.is_cancellation());
    assert!(cancelled.is_cancellation());

    assert!(timeout.to_string().contains("60"));
    assert_ne!(timeout.to_string(), failed.to_string());
}
