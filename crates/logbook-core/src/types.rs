use chrono::{NaiveDate, Offset as _, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::error::{Error, Result};

/// Cutoff hour used when the stored value is missing or unusable.
pub const DEFAULT_CUTOFF_HOUR: u8 = 18;

/// How hard the nag pushes once the cutoff hour has passed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NagIntensity {
    /// One notification, shortly after the check.
    #[default]
    Gentle,
    /// Five notifications an hour apart.
    Persistent,
    /// Five notifications half an hour apart.
    BeastMode,
}

impl fmt::Display for NagIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gentle => write!(f, "gentle"),
            Self::Persistent => write!(f, "persistent"),
            Self::BeastMode => write!(f, "beast_mode"),
        }
    }
}

impl std::str::FromStr for NagIntensity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gentle" => Ok(Self::Gentle),
            "persistent" => Ok(Self::Persistent),
            "beast_mode" | "beast" => Ok(Self::BeastMode),
            other => Err(Error::UnknownIntensity(other.to_string())),
        }
    }
}

/// Voice of the reminder messages.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NagTone {
    Encouraging,
    Bossy,
    #[default]
    Friendly,
    Sarcastic,
    /// Fallback pool for tones the app does not recognize.
    Neutral,
}

impl fmt::Display for NagTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encouraging => write!(f, "encouraging"),
            Self::Bossy => write!(f, "bossy"),
            Self::Friendly => write!(f, "friendly"),
            Self::Sarcastic => write!(f, "sarcastic"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

impl std::str::FromStr for NagTone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "encouraging" => Ok(Self::Encouraging),
            "bossy" => Ok(Self::Bossy),
            "friendly" => Ok(Self::Friendly),
            "sarcastic" => Ok(Self::Sarcastic),
            "neutral" => Ok(Self::Neutral),
            other => Err(Error::UnknownTone(other.to_string())),
        }
    }
}

/// User-owned reminder settings, read fresh on every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderConfiguration {
    pub enabled: bool,
    /// Local hour (0-23) from which nagging starts.
    pub cutoff_hour: u8,
    pub intensity: NagIntensity,
    pub tone: NagTone,
    pub in_app_enabled: bool,
    pub buddy_name: Option<String>,
}

impl Default for ReminderConfiguration {
    fn default() -> Self {
        Self {
            enabled: false,
            cutoff_hour: DEFAULT_CUTOFF_HOUR,
            intensity: NagIntensity::default(),
            tone: NagTone::default(),
            in_app_enabled: true,
            buddy_name: None,
        }
    }
}

/// Validate a raw cutoff hour.
pub fn cutoff_hour(raw: i64) -> Result<u8> {
    match u8::try_from(raw) {
        Ok(h) if h < 24 => Ok(h),
        _ => Err(Error::CutoffHourOutOfRange(raw)),
    }
}

/// What happened to a reminder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NagEventType {
    Shown,
    Snoozed,
    Dismissed,
    Responded,
}

/// How the user reacted, if at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NagResponse {
    None,
    Snoozed,
    Dismissed,
    LoggedEntry,
}

impl fmt::Display for NagEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shown => write!(f, "shown"),
            Self::Snoozed => write!(f, "snoozed"),
            Self::Dismissed => write!(f, "dismissed"),
            Self::Responded => write!(f, "responded"),
        }
    }
}

impl fmt::Display for NagResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Snoozed => write!(f, "snoozed"),
            Self::Dismissed => write!(f, "dismissed"),
            Self::LoggedEntry => write!(f, "logged_entry"),
        }
    }
}

/// A single reminder history record.
///
/// Serialized as `{id, date, eventType, responseType}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReminderEvent {
    pub id: String,
    #[serde(rename = "date")]
    pub timestamp: String,
    #[serde(rename = "eventType")]
    pub event_type: NagEventType,
    #[serde(rename = "responseType")]
    pub response: NagResponse,
}

impl ReminderEvent {
    pub fn new(event_type: NagEventType, response: NagResponse, at: OffsetDateTime) -> Self {
        Self {
            id: format!("rem_{}", ulid::Ulid::new().to_string().to_lowercase()),
            timestamp: format_rfc3339(at),
            event_type,
            response,
        }
    }

    pub fn shown(at: OffsetDateTime) -> Self {
        Self::new(NagEventType::Shown, NagResponse::None, at)
    }

    pub fn snoozed(at: OffsetDateTime) -> Self {
        Self::new(NagEventType::Snoozed, NagResponse::Snoozed, at)
    }

    pub fn dismissed(at: OffsetDateTime) -> Self {
        Self::new(NagEventType::Dismissed, NagResponse::Dismissed, at)
    }

    pub fn logged_entry(at: OffsetDateTime) -> Self {
        Self::new(NagEventType::Responded, NagResponse::LoggedEntry, at)
    }
}

// ── Time helpers ──

pub fn format_rfc3339(at: OffsetDateTime) -> String {
    // Offsets with a seconds component are not representable in RFC 3339.
    at.format(&Rfc3339)
        .or_else(|_| at.to_offset(UtcOffset::UTC).format(&Rfc3339))
        .expect("RFC3339 formatting should not fail")
}

pub fn parse_rfc3339(value: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| Error::InvalidTimestamp {
        value: value.to_string(),
        message: e.to_string(),
    })
}

/// `[startOfToday, startOfTomorrow)` for the calendar day containing `now`
/// in the machine's local time zone.
pub fn today_range(now: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
    today_range_in(now, &chrono::Local)
}

/// Day boundaries in `tz`. Each midnight carries its own UTC offset, so a
/// day that crosses a daylight-saving change is 23 or 25 hours long.
///
/// Falls back to the fixed offset of `now` if the zone cannot resolve
/// either boundary.
pub fn today_range_in<Tz: TimeZone>(
    now: OffsetDateTime,
    tz: &Tz,
) -> (OffsetDateTime, OffsetDateTime) {
    let zoned = chrono::DateTime::from_timestamp(now.unix_timestamp(), 0)
        .map(|utc| utc.with_timezone(tz).date_naive());
    let bounds = zoned.and_then(|today| {
        let tomorrow = today.succ_opt()?;
        Some((start_of_day(tz, today)?, start_of_day(tz, tomorrow)?))
    });
    bounds.unwrap_or_else(|| {
        let start = now.date().midnight().assume_offset(now.offset());
        (start, start + Duration::days(1))
    })
}

/// First instant of `day` in `tz`. Where a DST jump skips midnight the day
/// starts at the first hour that exists.
fn start_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Option<OffsetDateTime> {
    let local = (0..=2).find_map(|hour| {
        let naive = day.and_hms_opt(hour, 0, 0)?;
        tz.from_local_datetime(&naive).earliest()
    })?;
    let offset = UtcOffset::from_whole_seconds(local.offset().fix().local_minus_utc()).ok()?;
    let at = OffsetDateTime::from_unix_timestamp(local.timestamp()).ok()?;
    Some(at.to_offset(offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn intensity_parse_and_display() {
        for intensity in [
            NagIntensity::Gentle,
            NagIntensity::Persistent,
            NagIntensity::BeastMode,
        ] {
            let parsed: NagIntensity = intensity.to_string().parse().unwrap();
            assert_eq!(parsed, intensity);
        }
        assert_eq!("beast".parse::<NagIntensity>().unwrap(), NagIntensity::BeastMode);
        assert_eq!(
            "loud".parse::<NagIntensity>(),
            Err(Error::UnknownIntensity("loud".into()))
        );
    }

    #[test]
    fn tone_rejects_unknown() {
        assert_eq!("bossy".parse::<NagTone>().unwrap(), NagTone::Bossy);
        assert!("grumpy".parse::<NagTone>().is_err());
    }

    #[test]
    fn configuration_defaults() {
        let config = ReminderConfiguration::default();
        assert!(!config.enabled);
        assert_eq!(config.cutoff_hour, DEFAULT_CUTOFF_HOUR);
        assert_eq!(config.intensity, NagIntensity::Gentle);
        assert_eq!(config.tone, NagTone::Friendly);
        assert!(config.in_app_enabled);
        assert!(config.buddy_name.is_none());
    }

    #[test]
    fn cutoff_hour_bounds() {
        assert_eq!(cutoff_hour(0).unwrap(), 0);
        assert_eq!(cutoff_hour(23).unwrap(), 23);
        assert_eq!(cutoff_hour(24), Err(Error::CutoffHourOutOfRange(24)));
        assert_eq!(cutoff_hour(-1), Err(Error::CutoffHourOutOfRange(-1)));
    }

    #[test]
    fn reminder_event_wire_format() {
        let event = ReminderEvent::logged_entry(datetime!(2026-03-02 21:15 UTC));
        let json = serde_json::to_value(&event).unwrap();
        assert!(json["id"].as_str().unwrap().starts_with("rem_"));
        assert_eq!(json["date"], "2026-03-02T21:15:00Z");
        assert_eq!(json["eventType"], "responded");
        assert_eq!(json["responseType"], "loggedEntry");
    }

    #[test]
    fn reminder_event_constructors() {
        let at = datetime!(2026-03-02 21:15 UTC);
        let shown = ReminderEvent::shown(at);
        assert_eq!(shown.event_type, NagEventType::Shown);
        assert_eq!(shown.response, NagResponse::None);
        let snoozed = ReminderEvent::snoozed(at);
        assert_eq!(snoozed.event_type, NagEventType::Snoozed);
        assert_eq!(snoozed.response, NagResponse::Snoozed);
        let dismissed = ReminderEvent::dismissed(at);
        assert_eq!(dismissed.event_type, NagEventType::Dismissed);
        assert_eq!(dismissed.response, NagResponse::Dismissed);
        assert_ne!(shown.id, snoozed.id);
    }

    #[test]
    fn today_range_spans_one_local_day() {
        let now = datetime!(2026-03-02 14:30:12 +02:00);
        let tz = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        let (start, end) = today_range_in(now, &tz);
        assert_eq!(start, datetime!(2026-03-02 00:00 +02:00));
        assert_eq!(end, datetime!(2026-03-03 00:00 +02:00));
        assert!(start <= now && now < end);
    }

    #[test]
    fn today_range_uses_zone_date_not_offset_date() {
        // 01:00 UTC is still the previous evening in New York.
        let now = datetime!(2026-01-15 01:00 UTC);
        let (start, end) = today_range_in(now, &chrono_tz::America::New_York);
        assert_eq!(start, datetime!(2026-01-14 00:00 -05:00));
        assert_eq!(end, datetime!(2026-01-15 00:00 -05:00));
    }

    #[test]
    fn today_range_on_spring_forward_day() {
        let tz = chrono_tz::America::New_York;
        let now = datetime!(2026-03-08 19:00 -04:00);
        let (start, end) = today_range_in(now, &tz);
        assert_eq!(start, datetime!(2026-03-08 00:00 -05:00));
        assert_eq!(end, datetime!(2026-03-09 00:00 -04:00));
        assert_eq!(end - start, Duration::hours(23));

        let late_yesterday = datetime!(2026-03-07 23:30 -05:00);
        assert!(late_yesterday < start);
    }

    #[test]
    fn today_range_on_fall_back_day() {
        let tz = chrono_tz::America::New_York;
        let now = datetime!(2026-11-01 20:00 -05:00);
        let (start, end) = today_range_in(now, &tz);
        assert_eq!(start, datetime!(2026-11-01 00:00 -04:00));
        assert_eq!(end, datetime!(2026-11-02 00:00 -05:00));
        assert_eq!(end - start, Duration::hours(25));
    }

    #[test]
    fn today_range_when_midnight_is_skipped() {
        // Santiago springs forward at 24:00, so 2026-09-06 starts at 01:00.
        let tz = chrono_tz::America::Santiago;
        let now = datetime!(2026-09-06 12:00 -03:00);
        let (start, _) = today_range_in(now, &tz);
        assert_eq!(start, datetime!(2026-09-06 01:00 -03:00));
        assert!(start <= now);
    }

    #[test]
    fn rfc3339_round_trip_keeps_instant() {
        let at = datetime!(2026-03-02 14:30 -05:00);
        let parsed = parse_rfc3339(&format_rfc3339(at)).unwrap();
        assert_eq!(parsed, at);
        assert!(parse_rfc3339("yesterday").is_err());
    }
}
