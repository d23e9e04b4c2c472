//! Driver Stress Monitor
//!
//! Reads landmark frames as JSON lines, runs the eye tracker and the
//! expression scorer on each, and writes one JSON record per frame followed
//! by a session summary.

pub mod config;
pub mod input;
pub mod pipeline;
pub mod report;

use std::net::SocketAddr;

use expression::ExpressionError;
use eye_tracker::EyeTrackerError;
use metrics_exporter_prometheus::PrometheusBuilder;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub use crate::config::MonitorConfig;
pub use input::FrameInput;
pub use pipeline::StressMonitor;
pub use report::{FrameRecord, OutputRecord, SessionSummary};

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error(transparent)]
    EyeTracker(#[from] EyeTrackerError),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error("Line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to set tracing subscriber: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("Metrics exporter error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Initialize logging to stderr; stdout carries the records
pub fn init_logging(level: &str) -> Result<(), MonitorError> {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Install the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), MonitorError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    info!("Prometheus metrics exporter listening on {}/metrics", addr);
    Ok(())
}

/// Process every line of `reader`, writing records to `writer`.
///
/// Malformed lines are logged and skipped. The summary is written last and
/// also returned.
pub async fn run_stream<R, W>(
    monitor: &mut StressMonitor,
    reader: R,
    writer: &mut W,
) -> Result<SessionSummary, MonitorError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let input = match input::parse_line(&line, line_no) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping input: {}", e);
                metrics::counter!("stress_monitor_parse_errors_total").increment(1);
                continue;
            }
        };

        let record = monitor.process(input);
        write_record(writer, &OutputRecord::Frame(&record)).await?;
    }

    let summary = monitor.summary();
    write_record(writer, &OutputRecord::Summary(&summary)).await?;
    writer.flush().await?;

    info!(
        frames = summary.frames,
        faces = summary.faces_detected,
        blinks = summary.blink_statistics.blink_count,
        "Stream finished"
    );
    Ok(summary)
}

async fn write_record<W>(writer: &mut W, record: &OutputRecord<'_>) -> Result<(), MonitorError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    Ok(())
}

/// Run the monitor over the configured input, writing to stdout
pub async fn run(config: MonitorConfig) -> Result<SessionSummary, MonitorError> {
    if let Some(addr) = config.metrics_addr {
        init_metrics(addr)?;
    }

    let reads_stdin = config.reads_stdin();
    let path = config.input.clone();
    let mut monitor = StressMonitor::new(config)?;
    let mut stdout = tokio::io::stdout();

    if reads_stdin {
        info!("Reading landmark frames from stdin");
        run_stream(&mut monitor, BufReader::new(tokio::io::stdin()), &mut stdout).await
    } else {
        info!("Reading landmark frames from {}", path);
        let file = tokio::fs::File::open(&path).await?;
        run_stream(&mut monitor, BufReader::new(file), &mut stdout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::face;

    fn frame_line(timestamp: f64, ear: Option<f64>) -> String {
        let input = FrameInput {
            timestamp: Some(timestamp),
            landmarks: ear.map(face),
        };
        serde_json::to_string(&input).unwrap()
    }

    fn monitor() -> StressMonitor {
        StressMonitor::new(MonitorConfig {
            calibration_frames: 0,
            ..Default::default()
        })
        .unwrap()
    }

    async fn run_lines(lines: &[String]) -> (SessionSummary, Vec<serde_json::Value>) {
        let input = lines.join("\n");
        let mut output = Vec::new();
        let summary = run_stream(&mut monitor(), BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();
        let records = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (summary, records)
    }

    #[tokio::test]
    async fn test_one_record_per_frame_then_summary() {
        let lines: Vec<String> = (0..4).map(|i| frame_line(i as f64 * 0.1, Some(0.3))).collect();
        let (summary, records) = run_lines(&lines).await;

        assert_eq!(records.len(), 5);
        assert!(records[..4].iter().all(|r| r["type"] == "frame"));
        assert_eq!(records[0]["frame"], 1);
        assert_eq!(records[3]["face_detected"], true);
        assert_eq!(records[4]["type"], "summary");
        assert_eq!(records[4]["frames"], 4);
        assert_eq!(summary.faces_detected, 4);
    }

    #[tokio::test]
    async fn test_malformed_and_blank_lines_skipped() {
        let lines = vec![
            frame_line(0.0, Some(0.3)),
            String::new(),
            "not json".to_string(),
            frame_line(0.1, None),
        ];
        let (summary, records) = run_lines(&lines).await;
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.faces_detected, 1);
        assert_eq!(records.len(), 3);
        assert_eq!(records[1]["face_detected"], false);
        assert_eq!(records[1]["expression"]["primary_expression"], "neutral");
    }

    #[tokio::test]
    async fn test_blink_reported_in_stream() {
        let ears = [0.3, 0.3, 0.3, 0.1, 0.1, 0.1, 0.1, 0.3, 0.3];
        let lines: Vec<String> = ears
            .iter()
            .enumerate()
            .map(|(i, &ear)| frame_line(i as f64 * 0.1, Some(ear)))
            .collect();
        let (summary, records) = run_lines(&lines).await;

        let blink_frames: Vec<u64> = records
            .iter()
            .filter(|r| r["type"] == "frame" && r["eyes"]["blink_detected"] == true)
            .filter_map(|r| r["frame"].as_u64())
            .collect();
        assert_eq!(blink_frames, vec![8]);
        assert_eq!(summary.blink_statistics.blink_count, 1);
    }

    #[tokio::test]
    async fn test_empty_stream_writes_summary() {
        let (summary, records) = run_lines(&[]).await;
        assert_eq!(summary.frames, 0);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["type"], "summary");
        assert_eq!(records[0]["trend"]["stress_trend"], "stable");
    }
}
