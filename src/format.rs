use chrono::{DateTime, Local};

use crate::round::{EndKind, EndLabel, NextUp};
use crate::tracker::FinishEstimate;

const UNAVAILABLE: &str = "--:--";

/// `1h2m3s`, `4m5s`, or `6s`. Sub-second remainders are dropped.
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;

    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{s}s")
    }
}

pub fn format_optional_duration(ms: Option<u64>) -> String {
    ms.map(format_duration)
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

pub fn format_time_of_day(at: DateTime<Local>) -> String {
    at.format("%-I:%M %p").to_string()
}

pub fn format_finish(estimate: FinishEstimate) -> String {
    match estimate {
        FinishEstimate::Unavailable => UNAVAILABLE.to_string(),
        FinishEstimate::At(at) => format_time_of_day(at),
        FinishEstimate::Done => "Done".to_string(),
    }
}

/// `Practice 1 / 2` or `End 3 / 10`
pub fn end_label_text(label: &EndLabel) -> String {
    format!("{} {} / {}", label.kind, label.number, label.total)
}

/// `Last: 2/10`, shown between ends for the end that just finished
pub fn last_end_text(label: &EndLabel) -> String {
    format!("Last: {}/{}", label.number, label.total)
}

/// `Next: Practice 2/2`, `Next: 1/10` or `Next: Finish`
pub fn next_up_text(next: &NextUp) -> String {
    match next {
        NextUp::End(label) => {
            let prefix = match label.kind {
                EndKind::Practice => "Practice ",
                EndKind::Scoring => "",
            };
            format!("Next: {prefix}{}/{}", label.number, label.total)
        }
        NextUp::Finish => "Next: Finish".to_string(),
    }
}

pub fn line_name(line: u8) -> &'static str {
    if line == 1 {
        "AB"
    } else {
        "CD"
    }
}

pub fn line_label(line_count: u8, current_line: u8) -> String {
    if line_count == 2 {
        format!("Line {}", line_name(current_line))
    } else {
        "Single Line".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59_999), "59s");
        assert_eq!(format_duration(65_000), "1m5s");
        assert_eq!(format_duration(3_600_000), "1h0m0s");
        assert_eq!(format_duration(3_725_000), "1h2m5s");
    }

    #[test]
    fn test_optional_duration_distinguishes_missing_from_zero() {
        assert_eq!(format_optional_duration(None), "--:--");
        assert_eq!(format_optional_duration(Some(0)), "0s");
    }

    #[test]
    fn test_time_of_day() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 15, 7, 0).unwrap();
        assert_eq!(format_time_of_day(at), "3:07 PM");
        let at = Local.with_ymd_and_hms(2024, 3, 9, 9, 30, 0).unwrap();
        assert_eq!(format_time_of_day(at), "9:30 AM");
    }

    #[test]
    fn test_format_finish() {
        assert_eq!(format_finish(FinishEstimate::Unavailable), "--:--");
        assert_eq!(format_finish(FinishEstimate::Done), "Done");
    }

    #[test]
    fn test_end_labels() {
        let practice = EndLabel {
            kind: EndKind::Practice,
            number: 1,
            total: 2,
        };
        let scoring = EndLabel {
            kind: EndKind::Scoring,
            number: 3,
            total: 10,
        };
        assert_eq!(end_label_text(&practice), "Practice 1 / 2");
        assert_eq!(end_label_text(&scoring), "End 3 / 10");
        assert_eq!(last_end_text(&scoring), "Last: 3/10");
        assert_eq!(next_up_text(&NextUp::End(practice)), "Next: Practice 1/2");
        assert_eq!(next_up_text(&NextUp::End(scoring)), "Next: 3/10");
        assert_eq!(next_up_text(&NextUp::Finish), "Next: Finish");
    }

    #[test]
    fn test_line_labels() {
        assert_eq!(line_label(1, 1), "Single Line");
        assert_eq!(line_label(2, 1), "Line AB");
        assert_eq!(line_label(2, 2), "Line CD");
    }
}
