use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use std::sync::LazyLock;

use crate::core::allowance::AllowanceTracker;
use crate::core::classifier::{classify, PhoneNumber};
use crate::core::tariff::{Tariff, TariffTable};
use crate::domain::model::{Direction, NumberCategory, Pence, RawCallRecord};
use crate::utils::error::ParseError;

static DURATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+):([0-9]+)$").expect("duration pattern is valid"));

// 離峰：早於 08:00:00 或晚於 20:00:00（兩端都是嚴格比較，20:00:00 整點仍算尖峰）
const OFF_PEAK_BEFORE_SECS: u32 = 8 * 3600;
const OFF_PEAK_AFTER_SECS: u32 = 20 * 3600;

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"];
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// 單通電話。免費分鐘數在建構時從 tracker 扣除並固定下來，之後不會重新計算。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    number: PhoneNumber,
    start_time: DateTime<FixedOffset>,
    duration_minutes: u64,
    direction: Direction,
    free_minutes: u64,
}

impl CallRecord {
    /// 解析四個欄位並建立紀錄；撥出電話會以整通通話的分鐘數向 `allowance` 扣除一次。
    pub fn parse(
        number: &str,
        start_time: &str,
        duration: &str,
        direction: &str,
        allowance: &mut AllowanceTracker,
    ) -> Result<Self, ParseError> {
        let number = classify(number);
        let start_time = parse_start_time(start_time)?;
        let duration_minutes = parse_duration(duration)?;
        let direction: Direction = direction.parse()?;

        let free_minutes = match direction {
            Direction::Outgoing => allowance.consume(number.category(), duration_minutes),
            Direction::Incoming => 0,
        };

        Ok(Self {
            number,
            start_time,
            duration_minutes,
            direction,
            free_minutes,
        })
    }

    /// 解析一行 `<number>,<start>,<MM:SS>,<direction>`
    pub fn from_line(line: &str, allowance: &mut AllowanceTracker) -> Result<Self, ParseError> {
        let line = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(line);

        let fields: Vec<&str> = line.split(',').collect();
        match fields.as_slice() {
            [number, start_time, duration, direction] => {
                Self::parse(number, start_time, duration, direction, allowance)
            }
            _ => Err(ParseError::FieldCount {
                line: line.to_string(),
                found: fields.len(),
            }),
        }
    }

    /// 欄位數不對時回傳 `FieldCount`，與其他欄位錯誤一起依檔案順序回報
    pub fn from_raw(raw: &RawCallRecord, allowance: &mut AllowanceTracker) -> Result<Self, ParseError> {
        match raw.fields.as_slice() {
            [number, start_time, duration, direction] => {
                Self::parse(number, start_time, duration, direction, allowance)
            }
            fields => Err(ParseError::FieldCount {
                line: raw.line(),
                found: fields.len(),
            }),
        }
    }

    pub fn number(&self) -> &PhoneNumber {
        &self.number
    }

    pub fn category(&self) -> NumberCategory {
        self.number.category()
    }

    pub fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }

    /// 計費分鐘數（未滿一分鐘以一分鐘計）
    pub fn duration_minutes(&self) -> u64 {
        self.duration_minutes
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn free_minutes(&self) -> u64 {
        self.free_minutes
    }

    pub fn tariff(&self) -> Tariff {
        TariffTable::lookup(self.category())
    }

    pub fn is_off_peak(&self) -> bool {
        is_off_peak(self.start_time.time())
    }

    pub fn cost(&self) -> Pence {
        self.cost_with(true)
    }

    /// `apply_allowance = false` 時忽略已扣除的免費分鐘，只用於核對，不會動到 tracker
    pub fn cost_with(&self, apply_allowance: bool) -> Pence {
        if self.direction == Direction::Incoming {
            return Pence(0);
        }

        let tariff = self.tariff();
        let chargeable_minutes = if apply_allowance {
            self.duration_minutes - self.free_minutes
        } else {
            self.duration_minutes
        };
        let base = tariff
            .connection_charge
            .saturating_add(chargeable_minutes.saturating_mul(tariff.cost_per_minute));

        match tariff.off_peak_divisor {
            Some(divisor) if self.is_off_peak() => Pence(base / divisor),
            _ => Pence(base),
        }
    }
}

fn is_off_peak(time: NaiveTime) -> bool {
    let secs = time.num_seconds_from_midnight();
    secs < OFF_PEAK_BEFORE_SECS
        || secs > OFF_PEAK_AFTER_SECS
        || (secs == OFF_PEAK_AFTER_SECS && time.nanosecond() > 0)
}

/// ISO-8601 時間；結尾的 `Z` 視同 `+00:00`，沒有時區的時間視為 UTC
fn parse_start_time(raw: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let candidate = match raw.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => raw.to_string(),
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(&candidate) {
        return Ok(ts);
    }

    for format in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(&candidate, format) {
            return Ok(ts);
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&candidate, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(&candidate, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| ParseError::StartTime(raw.to_string()))
}

/// `MM:SS` 轉成計費分鐘數，秒數大於零就進位
fn parse_duration(raw: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::Duration(raw.to_string());

    let captures = DURATION_PATTERN.captures(raw).ok_or_else(invalid)?;
    let minutes: u64 = captures[1].parse().map_err(|_| invalid())?;
    let seconds: u64 = captures[2].parse().map_err(|_| invalid())?;

    if seconds > 0 {
        minutes.checked_add(1).ok_or_else(invalid)
    } else {
        Ok(minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::AllowanceClass;

    fn outgoing(line: &str) -> CallRecord {
        CallRecord::from_line(line, &mut AllowanceTracker::new()).unwrap()
    }

    #[test]
    fn test_duration_rounds_up_started_minutes() {
        assert_eq!(parse_duration("12:36"), Ok(13));
        assert_eq!(parse_duration("12:01"), Ok(13));
        assert_eq!(parse_duration("12:00"), Ok(12));
        assert_eq!(parse_duration("1:00"), Ok(1));
        assert_eq!(parse_duration("1:0"), Ok(1));
        assert_eq!(parse_duration("0:00"), Ok(0));
    }

    #[test]
    fn test_duration_accepts_minutes_beyond_u32() {
        assert_eq!(parse_duration("5000000000:00"), Ok(5_000_000_000));
        assert_eq!(parse_duration("5000000000:01"), Ok(5_000_000_001));

        let max = format!("{}:00", u64::MAX);
        assert_eq!(parse_duration(&max), Ok(u64::MAX));

        let overflow = format!("{}:01", u64::MAX);
        assert_eq!(
            parse_duration(&overflow),
            Err(ParseError::Duration(overflow.clone()))
        );
    }

    #[test]
    fn test_duration_rejects_malformed_input() {
        for raw in ["12", "12:", ":36", "-1:00", "12:-5", "12:36:00", "ab:cd", " 12:36", ""] {
            assert_eq!(
                parse_duration(raw),
                Err(ParseError::Duration(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_start_time_accepts_trailing_z() {
        let with_z = parse_start_time("2019-08-29T11:28:05.666Z").unwrap();
        let with_offset = parse_start_time("2019-08-29T11:28:05.666+00:00").unwrap();
        assert_eq!(with_z, with_offset);
        assert_eq!(with_z.time().hour(), 11);
    }

    #[test]
    fn test_start_time_accepts_naive_and_date_only() {
        assert!(parse_start_time("2019-08-29T11:28:05").is_ok());
        assert!(parse_start_time("2019-08-29 11:28").is_ok());
        assert_eq!(
            parse_start_time("2019-08-29").unwrap().time(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_start_time_rejects_garbage() {
        assert_eq!(
            parse_start_time("yesterday"),
            Err(ParseError::StartTime("yesterday".to_string()))
        );
        assert!(parse_start_time("2019-13-29T11:28:05Z").is_err());
    }

    #[test]
    fn test_peak_mobile_call_without_allowance() {
        let call = outgoing("07882456789,2019-08-29T11:28:05.666Z,12:36,OUTGOING");
        assert_eq!(call.duration_minutes(), 13);
        assert!(!call.is_off_peak());
        assert_eq!(call.cost_with(false), Pence(390));
    }

    #[test]
    fn test_off_peak_mobile_call_is_divided() {
        let call = outgoing("07882456789,2019-08-29T20:28:05.666Z,12:36,OUTGOING");
        assert!(call.is_off_peak());
        assert_eq!(call.cost_with(false), Pence(130));
    }

    #[test]
    fn test_off_peak_boundaries() {
        let at = |time: &str| {
            outgoing(&format!("07882456789,2019-08-29T{time}Z,1:00,OUTGOING")).is_off_peak()
        };
        assert!(!at("20:00:00"));
        assert!(at("20:00:01"));
        assert!(at("20:00:00.001"));
        assert!(at("07:59:59"));
        assert!(!at("08:00:00"));
        assert!(at("00:00:00"));
    }

    #[test]
    fn test_incoming_calls_are_free_and_do_not_consume() {
        let mut allowance = AllowanceTracker::new();
        let call = CallRecord::from_line(
            "07882456789,2019-08-29T11:28:05.666Z,12:36,INCOMING",
            &mut allowance,
        )
        .unwrap();
        assert_eq!(call.free_minutes(), 0);
        assert_eq!(call.cost(), Pence(0));
        assert_eq!(call.cost_with(false), Pence(0));
        assert_eq!(allowance.remaining(AllowanceClass::LandlineMobile), 100);
    }

    #[test]
    fn test_freephone_costs_nothing() {
        let call = outgoing("08082456789,2019-08-29T11:28:05.666Z,12:36,OUTGOING");
        assert_eq!(call.category(), NumberCategory::FreePhone);
        assert_eq!(call.cost_with(false), Pence(0));
    }

    #[test]
    fn test_international_has_connection_charge_and_no_off_peak() {
        let call = outgoing("+017654765234,2019-08-29T20:28:05.666Z,1:0,OUTGOING");
        assert_eq!(call.category(), NumberCategory::International);
        assert_eq!(call.cost_with(false), Pence(130));
    }

    #[test]
    fn test_off_peak_landline() {
        let call = outgoing("01632960000,2019-08-29T06:00:00Z,1:00,OUTGOING");
        assert_eq!(call.cost_with(false), Pence(5));
    }

    #[test]
    fn test_allowance_snapshot_is_fixed_at_construction() {
        let mut allowance = AllowanceTracker::new();
        let first = CallRecord::from_line(
            "0033123456789,2019-08-29T11:00:00Z,6:00,OUTGOING",
            &mut allowance,
        )
        .unwrap();
        let second = CallRecord::from_line(
            "0033123456789,2019-08-29T12:00:00Z,6:00,OUTGOING",
            &mut allowance,
        )
        .unwrap();

        assert_eq!(first.free_minutes(), 6);
        assert_eq!(second.free_minutes(), 4);
        // 只有連線費
        assert_eq!(first.cost(), Pence(50));
        assert_eq!(second.cost(), Pence(50 + 2 * 80));
        assert_eq!(second.cost_with(false), Pence(50 + 6 * 80));

        // 計算費用不會再扣除
        let _ = second.cost();
        assert_eq!(second.free_minutes(), 4);
        assert_eq!(allowance.remaining(AllowanceClass::International), 0);
    }

    #[test]
    fn test_invalid_direction() {
        let err = CallRecord::from_line(
            "07882456789,2019-08-29T11:28:05.666Z,12:36,SIDEWAYS",
            &mut AllowanceTracker::new(),
        )
        .unwrap_err();
        assert_eq!(err, ParseError::Direction("SIDEWAYS".to_string()));
    }

    #[test]
    fn test_failed_parse_does_not_consume_allowance() {
        let mut allowance = AllowanceTracker::new();
        let result = CallRecord::from_line(
            "07882456789,not-a-time,12:36,OUTGOING",
            &mut allowance,
        );
        assert_eq!(result, Err(ParseError::StartTime("not-a-time".to_string())));
        assert_eq!(allowance.remaining(AllowanceClass::LandlineMobile), 100);
    }

    #[test]
    fn test_field_count_must_be_four() {
        let err = CallRecord::from_line("07882456789,2019-08-29T11:28:05Z,12:36\n", &mut AllowanceTracker::new())
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::FieldCount {
                line: "07882456789,2019-08-29T11:28:05Z,12:36".to_string(),
                found: 3,
            }
        );

        assert!(CallRecord::from_line(
            "07882456789,2019-08-29T11:28:05Z,12:36,OUTGOING,extra",
            &mut AllowanceTracker::new()
        )
        .is_err());
    }

    #[test]
    fn test_from_raw_checks_field_count() {
        let raw = RawCallRecord {
            line_number: 7,
            fields: vec!["07882456789".to_string(), "12:36".to_string()],
        };
        assert_eq!(
            CallRecord::from_raw(&raw, &mut AllowanceTracker::new()),
            Err(ParseError::FieldCount {
                line: "07882456789,12:36".to_string(),
                found: 2,
            })
        );

        let raw = RawCallRecord {
            line_number: 1,
            fields: ["07882456789", "2019-08-29T11:28:05.666Z", "12:36", "INCOMING"]
                .map(String::from)
                .to_vec(),
        };
        let call = CallRecord::from_raw(&raw, &mut AllowanceTracker::new()).unwrap();
        assert_eq!(call.direction(), Direction::Incoming);
    }

    #[test]
    fn test_trailing_newline_is_stripped() {
        let call = outgoing("07882456789,2019-08-29T11:28:05.666Z,12:36,OUTGOING\r\n");
        assert_eq!(call.direction(), Direction::Outgoing);
    }
}
