//! Available-slot generation
//!
//! Candidate slots for one attendee's view of a meeting window: each day of
//! the window is cut into `slot_duration`-minute segments inside the host's
//! working hours, then segments colliding with anyone's existing bookings
//! are dropped. All math happens on instants; the viewer timezone only
//! decides which calendar date a slot is grouped under.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use concord_domain::constants::BUSY_EDGE_TOLERANCE_MINUTES;
use concord_domain::{AvailableSlot, AvailableSlotsByDate, BusyInterval, UserPreferences};
use uuid::Uuid;

/// The inputs shared by every day of a generation run.
#[derive(Debug, Clone)]
pub struct SlotWindow<'a> {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub slot_duration_minutes: u32,
    pub host_preferences: &'a UserPreferences,
    pub host_tz: Tz,
    pub viewer_tz: Tz,
    /// Busy intervals of every attendee, as instants.
    pub busy: &'a [BusyInterval],
}

/// Generate candidate slots for every day of the window, grouped by the
/// viewer-local calendar date.
///
/// Days are anchored at `window_start + i days`: the first day starts no
/// earlier than the window start, the last ends no later than the window
/// end, and every day is clamped to the host's working hours.
pub fn generate_available_slots_for_window(window: &SlotWindow<'_>) -> AvailableSlotsByDate {
    let mut by_date = AvailableSlotsByDate::new();

    if window.slot_duration_minutes == 0 || window.window_start >= window.window_end {
        return by_date;
    }

    let diff_days = (window.window_end - window.window_start).num_days();

    for i in 0..=diff_days {
        let anchor = window.window_start + Duration::days(i);
        let slots =
            generate_available_slots_for_date(window, anchor, i == 0, i == diff_days);
        let date = anchor.with_timezone(&window.viewer_tz).date_naive();
        by_date.insert(date, slots);
    }

    by_date
}

/// Generate candidate slots for the day `anchor` falls on.
pub fn generate_available_slots_for_date(
    window: &SlotWindow<'_>,
    anchor: DateTime<Utc>,
    is_first_day: bool,
    is_last_day: bool,
) -> Vec<AvailableSlot> {
    let Some((work_start, work_end)) = host_work_bounds(window, anchor) else {
        return Vec::new();
    };

    let mut effective_start = work_start;
    if is_first_day {
        let aligned = round_up_to_slot(window.window_start, window.slot_duration_minutes);
        if aligned > work_end {
            // The window opens after the host's day already ended.
            return Vec::new();
        }
        effective_start = effective_start.max(aligned);
    }

    let mut effective_end = work_end;
    if is_last_day {
        effective_end = effective_end.min(window.window_end);
    }

    let slot = Duration::minutes(i64::from(window.slot_duration_minutes));
    let mut slots = Vec::new();
    let mut cursor = effective_start;
    while cursor + slot <= effective_end {
        let candidate = AvailableSlot {
            id: Uuid::new_v4().to_string(),
            start_date: cursor,
            end_date: cursor + slot,
        };
        if !collides_with_busy(&candidate, window.busy) {
            slots.push(candidate);
        }
        cursor += slot;
    }

    slots
}

/// A slot is unusable when it overlaps a busy interval beyond the 1-minute
/// edge tolerance, or coincides with one exactly.
fn collides_with_busy(slot: &AvailableSlot, busy: &[BusyInterval]) -> bool {
    let tolerance = Duration::minutes(BUSY_EDGE_TOLERANCE_MINUTES);
    busy.iter().any(|b| {
        let inner_start = b.start_date + tolerance;
        let inner_end = b.end_date - tolerance;
        let end_inside = slot.end_date >= inner_start && slot.end_date <= inner_end;
        let start_inside = slot.start_date >= inner_start && slot.start_date <= inner_end;
        let exact = slot.start_date == b.start_date && slot.end_date == b.end_date;
        end_inside || start_inside || exact
    })
}

/// Host working hours for the weekday `anchor` falls on in the host zone,
/// as instants.
fn host_work_bounds(
    window: &SlotWindow<'_>,
    anchor: DateTime<Utc>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let host_local = anchor.with_timezone(&window.host_tz);
    let iso_day = host_local.weekday().number_from_monday() as u8;

    let start_clock = window.host_preferences.work_start(iso_day);
    let end_clock = window.host_preferences.work_end(iso_day);

    let date = host_local.date_naive();
    let start = window
        .host_tz
        .from_local_datetime(&date.and_time(start_clock.to_naive()))
        .earliest()?
        .with_timezone(&Utc);
    let end = window
        .host_tz
        .from_local_datetime(&date.and_time(end_clock.to_naive()))
        .earliest()?
        .with_timezone(&Utc);

    (start < end).then_some((start, end))
}

/// Round an instant up to the next slot boundary inside its hour; a
/// boundary past the hour rolls to the top of the next one.
fn round_up_to_slot(instant: DateTime<Utc>, slot_minutes: u32) -> DateTime<Utc> {
    let truncated = instant
        .with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(instant);
    let bumped = if truncated < instant { truncated + Duration::minutes(1) } else { truncated };

    let minute = bumped.minute();
    if slot_minutes == 0 || minute % slot_minutes == 0 {
        return bumped;
    }

    let next = minute.div_ceil(slot_minutes) * slot_minutes;
    if next >= 60 {
        let top = bumped.with_minute(0).unwrap_or(bumped);
        top + Duration::hours(1)
    } else {
        bumped.with_minute(next).unwrap_or(bumped)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use concord_domain::DayTime;

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn nine_to_five() -> UserPreferences {
        UserPreferences {
            user_id: "host".into(),
            start_times: (1..=7).map(|day| DayTime { day, hour: 9, minutes: 0 }).collect(),
            end_times: (1..=7).map(|day| DayTime { day, hour: 17, minutes: 0 }).collect(),
        }
    }

    #[test]
    fn single_day_window_is_segmented_at_slot_duration() {
        let prefs = nine_to_five();
        let window = SlotWindow {
            window_start: utc(2024, 4, 8, 9, 0),
            window_end: utc(2024, 4, 8, 12, 0),
            slot_duration_minutes: 30,
            host_preferences: &prefs,
            host_tz: chrono_tz::UTC,
            viewer_tz: chrono_tz::UTC,
            busy: &[],
        };

        let by_date = generate_available_slots_for_window(&window);
        assert_eq!(by_date.len(), 1);
        let slots = &by_date[&NaiveDate::from_ymd_opt(2024, 4, 8).unwrap()];
        // 09:00..12:00 in 30-minute segments.
        assert_eq!(slots.len(), 6);
        assert_eq!(slots[0].start_date, utc(2024, 4, 8, 9, 0));
        assert_eq!(slots[5].end_date, utc(2024, 4, 8, 12, 0));
    }

    #[test]
    fn busy_intervals_knock_out_their_slots() {
        let prefs = nine_to_five();
        let busy = [BusyInterval {
            start_date: utc(2024, 4, 8, 10, 0),
            end_date: utc(2024, 4, 8, 11, 0),
        }];
        let window = SlotWindow {
            window_start: utc(2024, 4, 8, 9, 0),
            window_end: utc(2024, 4, 8, 12, 0),
            slot_duration_minutes: 30,
            host_preferences: &prefs,
            host_tz: chrono_tz::UTC,
            viewer_tz: chrono_tz::UTC,
            busy: &busy,
        };

        let by_date = generate_available_slots_for_window(&window);
        let slots = &by_date[&NaiveDate::from_ymd_opt(2024, 4, 8).unwrap()];
        let starts: Vec<_> = slots.iter().map(|s| s.start_date).collect();
        assert!(!starts.contains(&utc(2024, 4, 8, 10, 0)));
        assert!(!starts.contains(&utc(2024, 4, 8, 10, 30)));
        assert!(starts.contains(&utc(2024, 4, 8, 9, 0)));
        assert!(starts.contains(&utc(2024, 4, 8, 11, 0)));
    }

    #[test]
    fn first_day_start_is_rounded_up_to_the_slot_grid() {
        let prefs = nine_to_five();
        let window = SlotWindow {
            window_start: utc(2024, 4, 8, 9, 10),
            window_end: utc(2024, 4, 8, 11, 0),
            slot_duration_minutes: 30,
            host_preferences: &prefs,
            host_tz: chrono_tz::UTC,
            viewer_tz: chrono_tz::UTC,
            busy: &[],
        };

        let by_date = generate_available_slots_for_window(&window);
        let slots = &by_date[&NaiveDate::from_ymd_opt(2024, 4, 8).unwrap()];
        assert_eq!(slots[0].start_date, utc(2024, 4, 8, 9, 30));
    }

    #[test]
    fn window_opening_after_work_hours_yields_nothing() {
        let prefs = nine_to_five();
        let window = SlotWindow {
            window_start: utc(2024, 4, 8, 18, 0),
            window_end: utc(2024, 4, 8, 20, 0),
            slot_duration_minutes: 30,
            host_preferences: &prefs,
            host_tz: chrono_tz::UTC,
            viewer_tz: chrono_tz::UTC,
            busy: &[],
        };

        let by_date = generate_available_slots_for_window(&window);
        assert!(by_date[&NaiveDate::from_ymd_opt(2024, 4, 8).unwrap()].is_empty());
    }

    #[test]
    fn multi_day_window_groups_slots_per_viewer_date() {
        let prefs = nine_to_five();
        let window = SlotWindow {
            window_start: utc(2024, 4, 8, 9, 0),
            window_end: utc(2024, 4, 10, 10, 0),
            slot_duration_minutes: 60,
            host_preferences: &prefs,
            host_tz: chrono_tz::UTC,
            viewer_tz: chrono_tz::UTC,
            busy: &[],
        };

        let by_date = generate_available_slots_for_window(&window);
        assert_eq!(by_date.len(), 3);
        // Middle day runs the full host work day.
        assert_eq!(by_date[&NaiveDate::from_ymd_opt(2024, 4, 9).unwrap()].len(), 8);
        // Last day is truncated at the window end.
        assert_eq!(by_date[&NaiveDate::from_ymd_opt(2024, 4, 10).unwrap()].len(), 1);
    }

    #[test]
    fn host_work_hours_are_mapped_into_the_viewer_zone() {
        let prefs = nine_to_five();
        let host: Tz = "America/New_York".parse().unwrap();
        let viewer: Tz = "Europe/Berlin".parse().unwrap();
        // January: EST (UTC-5) vs CET (UTC+1).
        let window = SlotWindow {
            window_start: utc(2024, 1, 15, 12, 0),
            window_end: utc(2024, 1, 15, 18, 0),
            slot_duration_minutes: 60,
            host_preferences: &prefs,
            host_tz: host,
            viewer_tz: viewer,
            busy: &[],
        };

        let by_date = generate_available_slots_for_window(&window);
        let slots = &by_date[&NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()];
        // Host work starts 09:00 EST = 14:00 UTC; the window closes 18:00 UTC.
        assert_eq!(slots.first().unwrap().start_date, utc(2024, 1, 15, 14, 0));
        assert_eq!(slots.last().unwrap().end_date, utc(2024, 1, 15, 18, 0));
    }

    #[test]
    fn exactly_coinciding_busy_interval_is_excluded() {
        let prefs = nine_to_five();
        let busy = [BusyInterval {
            start_date: utc(2024, 4, 8, 9, 0),
            end_date: utc(2024, 4, 8, 9, 30),
        }];
        let window = SlotWindow {
            window_start: utc(2024, 4, 8, 9, 0),
            window_end: utc(2024, 4, 8, 10, 0),
            slot_duration_minutes: 30,
            host_preferences: &prefs,
            host_tz: chrono_tz::UTC,
            viewer_tz: chrono_tz::UTC,
            busy: &busy,
        };

        let by_date = generate_available_slots_for_window(&window);
        let slots = &by_date[&NaiveDate::from_ymd_opt(2024, 4, 8).unwrap()];
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start_date, utc(2024, 4, 8, 9, 30));
    }
}
