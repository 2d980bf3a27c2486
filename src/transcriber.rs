use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use log::debug;
use tokio::process::Command;

use crate::app_config::TranscriptionConfig;
use crate::cancellation::CancellationToken;
use crate::errors::TranscriptionError;
use crate::file_utils;
use crate::providers::gemini::{FileState, GeminiClient};
use crate::providers::{GenerationRequest, Provider};

// @module: Audio-to-SRT transcription workflow

/// One progress notification from an in-flight transcription
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Human-readable phase description
    pub status: String,

    /// Completion percentage, 0-100
    pub percentage: u8,
}

impl ProgressUpdate {
    /// Create a progress update
    pub fn new(status: impl Into<String>, percentage: u8) -> Self {
        Self {
            status: status.into(),
            percentage,
        }
    }
}

/// Callback receiving progress updates
pub type ProgressSink<'a> = &'a (dyn Fn(ProgressUpdate) + Send + Sync);

// @const: Transcription prompt sent along with the uploaded audio
const TRANSCRIPTION_PROMPT: &str = r#"あなたはプロの日本語音声文字起こしスペシャリストです。
この音声ファイルを聞いて、正確にSRT字幕形式で文字起こししてください。

【絶対ルール】
1. 出力はSRT形式のテキストのみ。前後に説明文やマークダウンは一切付けない
2. 音声に含まれるすべての発話を漏れなく書き起こす（省略・要約は厳禁）
3. タイムスタンプは音声の実際の発話タイミングに正確に合わせる
4. 1エントリは1〜2文程度、長くても3秒〜8秒の区間にする
5. 句読点（、。！？）を適切に入れる
6. 聞き取れない部分は（聞き取り不明）と表記する（推測で埋めない）
7. 話者が複数いる場合は、できれば発話者を区別する
8. 「えっと」「あの」「まあ」など口語表現はそのまま残す
9. 固有名詞・人名・地名は文脈から正しく判別する
10. SRTの番号は1から連番

【SRTフォーマット】
1
00:00:00,000 --> 00:00:03,500
こんにちは、今日も
ラジオを始めていきます

2
00:00:03,800 --> 00:00:07,200
今回のテーマはこちらです"#;

/// Transcription workflow over the provider File API, with a local
/// subprocess backend as an alternative.
#[derive(Debug)]
pub struct Transcriber {
    /// Gemini client used for upload, polling and generation
    client: GeminiClient,
    /// Transcription settings
    config: TranscriptionConfig,
}

impl Transcriber {
    /// Create a new transcriber
    pub fn new(client: GeminiClient, config: TranscriptionConfig) -> Self {
        Self { client, config }
    }

    /// Remote transcription: upload the audio, wait for provider-side
    /// processing, then ask the model for SRT output.
    ///
    /// The cancellation token is checked between phases; a cancel surfaces as
    /// [`TranscriptionError::Cancelled`], never as a generic failure.
    pub async fn transcribe_remote(
        &self,
        audio_path: &Path,
        progress: ProgressSink<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, TranscriptionError> {
        if !audio_path.exists() {
            return Err(TranscriptionError::File(format!(
                "Audio file not found: {}",
                audio_path.display()
            )));
        }

        progress(ProgressUpdate::new("音声ファイルをアップロード中...", 10));
        let mime_type = file_utils::audio_mime_type(audio_path);
        let uploaded = self.client.upload_file(audio_path, mime_type).await?;

        cancel.check()?;
        progress(ProgressUpdate::new("AIが音声を解析中...", 30));
        self.wait_for_processing(&uploaded.uri, cancel).await?;

        cancel.check()?;
        progress(ProgressUpdate::new("文字起こしを実行中...", 50));
        let request = GenerationRequest::new(TRANSCRIPTION_PROMPT, 0.0)
            .with_file(GeminiClient::file_reference(&uploaded))
            .max_output_tokens(self.config.max_output_tokens);
        let raw = self.client.generate(request).await?;

        progress(ProgressUpdate::new("SRTを生成中...", 90));
        Ok(strip_code_fences(&raw))
    }

    /// Poll the uploaded file until it becomes ACTIVE.
    ///
    /// Bounded retry with fixed backoff; exceeding the bound and an explicit
    /// FAILED state are distinct errors.
    async fn wait_for_processing(
        &self,
        file_uri: &str,
        cancel: &CancellationToken,
    ) -> Result<(), TranscriptionError> {
        for attempt in 1..=self.config.poll_max_attempts {
            cancel.check()?;

            match self.client.file_state(file_uri).await? {
                FileState::Active => return Ok(()),
                FileState::Failed => return Err(TranscriptionError::ProcessingFailed),
                FileState::Processing => {
                    debug!(
                        "File still processing (check {}/{})",
                        attempt, self.config.poll_max_attempts
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(Duration::from_secs(self.config.poll_interval_secs)) => {}
                        _ = cancel.cancelled() => return Err(TranscriptionError::Cancelled),
                    }
                }
            }
        }

        Err(TranscriptionError::PollTimeout {
            attempts: self.config.poll_max_attempts,
        })
    }

    /// Local transcription: convert the audio to 16 kHz mono WAV with ffmpeg,
    /// then run the whisper CLI to produce SRT.
    ///
    /// Both subprocesses are forcibly terminated when the token is cancelled.
    pub async fn transcribe_local(
        &self,
        audio_path: &Path,
        progress: ProgressSink<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, TranscriptionError> {
        if !audio_path.exists() {
            return Err(TranscriptionError::File(format!(
                "Audio file not found: {}",
                audio_path.display()
            )));
        }

        let temp_dir = tempfile::tempdir()?;
        let wav_path = temp_dir.path().join("audio.wav");

        let audio_arg = audio_path.to_string_lossy();
        let wav_arg = wav_path.to_string_lossy();
        let out_dir_arg = temp_dir.path().to_string_lossy();

        progress(ProgressUpdate::new("音声フォーマットを変換しています...", 10));
        run_cancellable(
            "ffmpeg",
            &[
                "-y", "-i", &audio_arg, "-vn", "-acodec", "pcm_s16le", "-ar", "16000", "-ac",
                "1", &wav_arg,
            ],
            cancel,
        )
        .await?;
        progress(ProgressUpdate::new("音声変換完了", 20));

        cancel.check()?;
        progress(ProgressUpdate::new("文字起こしを実行中...", 40));
        run_cancellable(
            "whisper",
            &[
                &wav_arg,
                "--model",
                &self.config.local_model,
                "--language",
                &self.config.local_language,
                "--output_format",
                "srt",
                "--output_dir",
                &out_dir_arg,
            ],
            cancel,
        )
        .await?;

        progress(ProgressUpdate::new("SRTファイルを生成中...", 95));
        let srt_path = temp_dir.path().join("audio.srt");
        let content = std::fs::read_to_string(&srt_path).map_err(|e| {
            TranscriptionError::File(format!("Whisper produced no SRT output: {}", e))
        })?;

        Ok(content)
    }
}

/// Run a subprocess to completion, killing it if cancellation is requested.
///
/// `kill_on_drop` makes abandoning the in-flight output future terminate the
/// child when the cancel branch wins the select.
async fn run_cancellable(
    program: &str,
    args: &[&str],
    cancel: &CancellationToken,
) -> Result<(), TranscriptionError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let output_future = command.output();
    let output = tokio::select! {
        result = output_future => result.map_err(|e| {
            TranscriptionError::File(format!("Failed to run {}: {}", program, e))
        })?,
        _ = cancel.cancelled() => return Err(TranscriptionError::Cancelled),
    };

    if !output.status.success() {
        return Err(TranscriptionError::SubprocessFailed {
            program: program.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(())
}

/// Strip a leading/trailing Markdown code fence from model output
pub fn strip_code_fences(text: &str) -> String {
    let mut lines: Vec<&str> = text.trim().lines().collect();

    if lines
        .first()
        .is_some_and(|line| line.trim_start().starts_with("```"))
    {
        lines.remove(0);
    }
    if lines.last().is_some_and(|line| line.trim() == "```") {
        lines.pop();
    }

    lines.join("\n").trim().to_string()
}
