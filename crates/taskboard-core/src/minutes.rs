//! Meeting-minutes rules: duration text, form validation, and the
//! late-recording (show cause) check.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::model::{Meeting, MeetingMode};

/// Minutes may be recorded up to this long after the meeting ends before a
/// show cause is required.
pub const DEFAULT_SHOW_CAUSE_THRESHOLD_MINUTES: i64 = 60;

/// Parse `"1h 30m"`, `"2h"`, `"45m"`, `"1h30m"` or a bare minute count.
/// `None` on anything else, including totals that overflow.
pub fn parse_duration(text: &str) -> Option<i64> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }
    if let Ok(minutes) = text.parse::<i64>() {
        return (minutes >= 0).then_some(minutes);
    }

    let mut total = 0i64;
    let mut digits = String::new();
    let mut saw_unit = false;
    for c in text.chars() {
        match c {
            '0'..='9' => digits.push(c),
            'h' | 'm' => {
                let n: i64 = digits.parse().ok()?;
                digits.clear();
                let minutes = if c == 'h' { n.checked_mul(60)? } else { n };
                total = total.checked_add(minutes)?;
                saw_unit = true;
            }
            ' ' => {}
            _ => return None,
        }
    }
    (saw_unit && digits.is_empty()).then_some(total)
}

/// `"1h 5m"` when there is at least an hour, otherwise `"5m"`.
pub fn format_duration(minutes: i64) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, rest)
    } else {
        format!("{}m", rest)
    }
}

/// Minutes from `start` to `end` on the same day, if positive.
pub fn duration_between(start: NaiveTime, end: NaiveTime) -> Option<i64> {
    let minutes = (end - start).num_minutes();
    (minutes > 0).then_some(minutes)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DelayCheck {
    pub meeting_end: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
    /// Negative when the minutes were recorded before the meeting ended.
    pub delay_minutes: i64,
    pub show_cause_required: bool,
}

/// How late the minutes were recorded, measured from the meeting end
/// (`meetingDate + duration`) to `updatedAt`, or `createdAt` if never
/// updated. `None` when the duration text does not parse or the end falls
/// outside the representable range.
pub fn delay_check(meeting: &Meeting, threshold_minutes: i64) -> Option<DelayCheck> {
    let duration = parse_duration(&meeting.duration)?;
    let meeting_end = meeting
        .meeting_date
        .checked_add_signed(Duration::try_minutes(duration)?)?;
    let recorded_at = meeting.updated_at.unwrap_or(meeting.created_at);
    // Round half up to whole minutes.
    let delay_minutes = ((recorded_at - meeting_end).num_milliseconds() + 30_000).div_euclid(60_000);
    Some(DelayCheck {
        meeting_end,
        recorded_at,
        delay_minutes,
        show_cause_required: delay_minutes > threshold_minutes,
    })
}

/// Field name → message.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Input of the minutes form before it becomes a [`Meeting`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingDraft {
    pub title: String,
    pub agenda: String,
    pub summary: String,
    pub notes: String,
    pub meeting_mode: MeetingMode,
    pub meeting_link: Option<String>,
    pub meeting_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Left empty to derive it from the start and end times.
    pub duration: String,
}

impl MeetingDraft {
    /// The typed duration, or the span between start and end rendered with
    /// [`format_duration`].
    pub fn resolved_duration(&self) -> Option<String> {
        if !self.duration.trim().is_empty() {
            return Some(self.duration.trim().to_string());
        }
        let minutes = duration_between(self.start_time?, self.end_time?)?;
        Some(format_duration(minutes))
    }

    /// Meeting start as a UTC timestamp (midnight when no start time).
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        let date = self.meeting_date?;
        let time = self.start_time.or_else(|| NaiveTime::from_hms_opt(0, 0, 0))?;
        Some(date.and_time(time).and_utc())
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        let required = [
            ("title", &self.title, "Title is required"),
            ("agenda", &self.agenda, "Agenda is required"),
            ("summary", &self.summary, "Summary is required"),
            ("notes", &self.notes, "Notes are required"),
        ];
        for (field, value, message) in required {
            if value.trim().is_empty() {
                errors.insert(field, message.to_string());
            }
        }
        if self.meeting_date.is_none() {
            errors.insert("meetingDate", "Meeting date is required".into());
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if duration_between(start, end).is_none() {
                errors.insert("endTime", "End time must be after start time".into());
            }
        }
        match self.resolved_duration() {
            None => {
                errors.insert("duration", "Duration is required".into());
            }
            Some(text) if parse_duration(&text).is_none() => {
                errors.insert("duration", format!("Unrecognised duration '{}'", text));
            }
            Some(_) => {}
        }
        let link_missing = self
            .meeting_link
            .as_deref()
            .map_or(true, |l| l.trim().is_empty());
        if self.meeting_mode == MeetingMode::Online && link_missing {
            errors.insert("meetingLink", "Meeting ID/Link is required for online meetings".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Render field errors as one line, e.g. for a CLI error message.
pub fn describe_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A show cause needs a reason.
pub fn check_show_cause_reason(reason: &str) -> Result<String, CoreError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(CoreError::Validation("a reason for the delay is required".into()));
    }
    Ok(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MomStatus;
    use chrono::TimeZone;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn meeting_at(duration: &str, created_minutes_after_start: i64) -> Meeting {
        let start = Utc.with_ymd_and_hms(2025, 5, 2, 10, 0, 0).unwrap();
        Meeting {
            meeting_id: "m1".into(),
            project_id: "p".into(),
            project_name: "P".into(),
            title: "Sync".into(),
            agenda: "a".into(),
            summary: "s".into(),
            notes: "n".into(),
            meeting_mode: MeetingMode::Offline,
            meeting_link: None,
            status: MomStatus::Draft,
            meeting_date: start,
            duration: duration.into(),
            created_at: start + Duration::minutes(created_minutes_after_start),
            updated_at: None,
            show_cause: None,
        }
    }

    fn draft() -> MeetingDraft {
        MeetingDraft {
            title: "Weekly".into(),
            agenda: "Status".into(),
            summary: "All green".into(),
            notes: "None".into(),
            meeting_mode: MeetingMode::Offline,
            meeting_link: None,
            meeting_date: NaiveDate::from_ymd_opt(2025, 5, 2),
            start_time: Some(t(10, 0)),
            end_time: Some(t(11, 15)),
            duration: String::new(),
        }
    }

    #[test]
    fn parses_duration_forms() {
        assert_eq!(parse_duration("1h 30m"), Some(90));
        assert_eq!(parse_duration("1h30m"), Some(90));
        assert_eq!(parse_duration("2h"), Some(120));
        assert_eq!(parse_duration("45m"), Some(45));
        assert_eq!(parse_duration("45"), Some(45));
        assert_eq!(parse_duration("soon"), None);
        assert_eq!(parse_duration("1h 30"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn formats_duration() {
        assert_eq!(format_duration(75), "1h 15m");
        assert_eq!(format_duration(120), "2h 0m");
        assert_eq!(format_duration(40), "40m");
    }

    #[test]
    fn duration_between_requires_positive_span() {
        assert_eq!(duration_between(t(9, 0), t(9, 45)), Some(45));
        assert_eq!(duration_between(t(9, 0), t(9, 0)), None);
        assert_eq!(duration_between(t(10, 0), t(9, 0)), None);
    }

    #[test]
    fn late_minutes_need_a_show_cause() {
        // 1h meeting, recorded 2h31m after the start: 91 minutes late.
        let check = delay_check(&meeting_at("1h", 151), DEFAULT_SHOW_CAUSE_THRESHOLD_MINUTES).unwrap();
        assert_eq!(check.delay_minutes, 91);
        assert!(check.show_cause_required);
    }

    #[test]
    fn exactly_at_threshold_is_fine() {
        let check = delay_check(&meeting_at("30m", 90), DEFAULT_SHOW_CAUSE_THRESHOLD_MINUTES).unwrap();
        assert_eq!(check.delay_minutes, 60);
        assert!(!check.show_cause_required);
    }

    #[test]
    fn updated_at_takes_precedence() {
        let mut meeting = meeting_at("1h", 30);
        meeting.updated_at = Some(meeting.meeting_date + Duration::minutes(200));
        let check = delay_check(&meeting, 60).unwrap();
        assert_eq!(check.delay_minutes, 140);
        assert!(check.show_cause_required);
    }

    #[test]
    fn early_recording_is_negative_delay() {
        let check = delay_check(&meeting_at("1h", 30), 60).unwrap();
        assert_eq!(check.delay_minutes, -30);
        assert!(!check.show_cause_required);
    }

    #[test]
    fn unparseable_duration_skips_check() {
        assert!(delay_check(&meeting_at("a while", 500), 60).is_none());
    }

    #[test]
    fn oversized_durations_do_not_parse() {
        assert_eq!(parse_duration("200000000000000000h"), None);
        assert_eq!(parse_duration("9223372036854775807m 1m"), None);
        assert_eq!(parse_duration("99999999999999999999"), None);
    }

    #[test]
    fn end_past_calendar_range_skips_check() {
        let meeting = meeting_at("100000000000000m", 0);
        assert!(delay_check(&meeting, 60).is_none());

        let mut d = draft();
        d.duration = "100000000000000m".into();
        assert!(d.validate().is_ok());
    }

    #[test]
    fn delay_rounds_half_up() {
        let mut meeting = meeting_at("0m", 0);
        meeting.created_at = meeting.meeting_date + Duration::seconds(90);
        assert_eq!(delay_check(&meeting, 60).unwrap().delay_minutes, 2);
        meeting.created_at = meeting.meeting_date + Duration::seconds(89);
        assert_eq!(delay_check(&meeting, 60).unwrap().delay_minutes, 1);
    }

    #[test]
    fn valid_draft_derives_duration() {
        let d = draft();
        assert!(d.validate().is_ok());
        assert_eq!(d.resolved_duration().as_deref(), Some("1h 15m"));
        assert_eq!(
            d.starts_at().unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 2, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn draft_errors_are_per_field() {
        let mut d = draft();
        d.title = "  ".into();
        d.end_time = Some(t(9, 0));
        d.meeting_mode = MeetingMode::Online;
        let errors = d.validate().unwrap_err();
        assert!(errors.contains_key("title"));
        assert!(errors.contains_key("endTime"));
        assert!(errors.contains_key("duration"));
        assert!(errors.contains_key("meetingLink"));
        assert!(!errors.contains_key("agenda"));
        assert!(describe_errors(&errors).contains("title: Title is required"));
    }

    #[test]
    fn show_cause_reason_is_required() {
        assert!(check_show_cause_reason("   ").is_err());
        assert_eq!(check_show_cause_reason(" traffic ").unwrap(), "traffic");
    }
}
