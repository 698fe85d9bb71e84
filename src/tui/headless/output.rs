//! Output formatting for headless mode.
//!
//! Renders the result of a scripted run as text, JSON, or a frame log.

use super::{HeadlessResult, HeadlessState};
use crate::cli::OutputFormat;
use ratatui::buffer::Buffer;
use serde::Serialize;

/// Renders a ratatui buffer to a string.
pub struct ScreenRenderer;

impl ScreenRenderer {
    /// Renders a buffer to plain text, trimming trailing blanks and empty
    /// trailing lines.
    pub fn render(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut lines: Vec<String> = (0..area.height)
            .map(|y| {
                let line: String = (0..area.width)
                    .filter_map(|x| buffer.cell((x, y)))
                    .map(|cell| cell.symbol())
                    .collect();
                line.trim_end_matches(' ').to_string()
            })
            .collect();

        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        format!("{}\n", lines.join("\n"))
    }
}

/// JSON output structure.
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    screen: &'a str,
    screen_lines: &'a [String],
    events_executed: usize,
    duration_ms: u64,
    assertions: AssertionSummary<'a>,
    state: &'a HeadlessState,
}

#[derive(Debug, Serialize)]
struct AssertionSummary<'a> {
    passed: usize,
    failed: usize,
    failures: &'a [String],
}

/// Formats headless execution results.
pub struct HeadlessOutput {
    format: OutputFormat,
}

impl HeadlessOutput {
    /// Creates a new output formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result according to the configured format.
    pub fn format(&self, result: &HeadlessResult) -> String {
        match self.format {
            OutputFormat::Text => Self::format_text(result),
            OutputFormat::Json => Self::format_json(result),
            OutputFormat::Frames => Self::format_frames(result),
        }
    }

    fn assertion_summary(result: &HeadlessResult) -> Option<String> {
        if result.assertions_passed == 0 && result.assertions_failed == 0 {
            return None;
        }
        Some(format!(
            "Assertions: {} passed, {} failed",
            result.assertions_passed, result.assertions_failed
        ))
    }

    fn failure_lines(result: &HeadlessResult) -> String {
        result
            .failures
            .iter()
            .map(|failure| format!("FAILED {failure}\n"))
            .collect()
    }

    fn format_text(result: &HeadlessResult) -> String {
        let assertions = Self::assertion_summary(result)
            .map(|summary| format!(" | {summary}"))
            .unwrap_or_default();

        format!(
            "{}\nEvents: {} executed in {}ms{}\n{}",
            result.screen,
            result.events_executed,
            result.duration.as_millis(),
            assertions,
            Self::failure_lines(result)
        )
    }

    fn format_json(result: &HeadlessResult) -> String {
        let json_output = JsonOutput {
            screen: &result.screen,
            screen_lines: &result.screen_lines,
            events_executed: result.events_executed,
            duration_ms: result.duration.as_millis() as u64,
            assertions: AssertionSummary {
                passed: result.assertions_passed,
                failed: result.assertions_failed,
                failures: &result.failures,
            },
            state: &result.state,
        };

        serde_json::to_string_pretty(&json_output)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {}\"}}", e))
    }

    fn format_frames(result: &HeadlessResult) -> String {
        let frames_text: String = result
            .frames
            .iter()
            .map(|frame| {
                format!(
                    "=== FRAME {} ({}) ===\n{}\n",
                    frame.number,
                    frame.event.as_deref().unwrap_or("initial"),
                    frame.screen
                )
            })
            .collect();

        let assertions = Self::assertion_summary(result)
            .map(|summary| format!("{summary}\n"))
            .unwrap_or_default();

        format!(
            "{}Total: {} frames, {} events executed in {}ms\n{}{}",
            frames_text,
            result.frames.len(),
            result.events_executed,
            result.duration.as_millis(),
            assertions,
            Self::failure_lines(result)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::headless::Frame;
    use ratatui::layout::Rect;
    use std::time::Duration;

    fn make_test_result(failed: usize) -> HeadlessResult {
        HeadlessResult {
            screen: "> Paris\nParis, France".to_string(),
            screen_lines: vec!["> Paris".to_string(), "Paris, France".to_string()],
            events_executed: 3,
            duration: Duration::from_millis(150),
            assertions_passed: 2,
            assertions_failed: failed,
            failures: (0..failed)
                .map(|_| "assert:state:selected=2 (actual: 1)".to_string())
                .collect(),
            state: HeadlessState {
                query: "Paris".to_string(),
                focus: "search".to_string(),
                selected: Some(1),
                suggestion_count: 3,
                list_visible: true,
                fetch_count: 1,
                last_fetch: Some("Paris".to_string()),
                chosen: None,
                running: true,
            },
            frames: vec![
                Frame {
                    number: 0,
                    event: None,
                    screen: "Initial".to_string(),
                },
                Frame {
                    number: 1,
                    event: Some("type:Paris".to_string()),
                    screen: "After typing".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_screen_renderer_trims() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 10, 4));
        buffer.set_string(0, 0, "Paris", ratatui::style::Style::default());
        buffer.set_string(2, 1, "Lyon", ratatui::style::Style::default());

        assert_eq!(ScreenRenderer::render(&buffer), "Paris\n  Lyon\n");
    }

    #[test]
    fn test_text_output() {
        let text = HeadlessOutput::new(OutputFormat::Text).format(&make_test_result(0));

        assert!(text.contains("> Paris"));
        assert!(text.contains("Events: 3 executed"));
        assert!(text.contains("Assertions: 2 passed, 0 failed"));
        assert!(!text.contains("FAILED"));
    }

    #[test]
    fn test_text_output_lists_failures() {
        let text = HeadlessOutput::new(OutputFormat::Text).format(&make_test_result(1));
        assert!(text.contains("FAILED assert:state:selected=2 (actual: 1)"));
    }

    #[test]
    fn test_json_output() {
        let json = HeadlessOutput::new(OutputFormat::Json).format(&make_test_result(0));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["events_executed"], 3);
        assert_eq!(parsed["state"]["query"], "Paris");
        assert_eq!(parsed["state"]["selected"], 1);
        assert_eq!(parsed["state"]["chosen"], serde_json::Value::Null);
        assert_eq!(parsed["assertions"]["passed"], 2);
    }

    #[test]
    fn test_frames_output() {
        let frames = HeadlessOutput::new(OutputFormat::Frames).format(&make_test_result(0));

        assert!(frames.contains("=== FRAME 0 (initial) ==="));
        assert!(frames.contains("=== FRAME 1 (type:Paris) ==="));
        assert!(frames.contains("Total: 2 frames"));
    }
}
