//! Wall-clock timezone normalization
//!
//! Preferred time ranges travel as bare `HH:MM` values in the attendee's
//! zone and are persisted in the host's zone. Conversion pins the wall-clock
//! time to a reference date, converts the resulting instant, and reads the
//! wall clock back off. The offset used is the one in force on the reference
//! date: a range that ends up scheduled on the other side of a DST
//! transition shifts by the offset difference.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use concord_domain::{ClockTime, ConcordError, Result};

/// Parse an IANA timezone name.
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| ConcordError::InvalidInput(format!("unknown timezone: {name:?}")))
}

/// Convert a wall-clock time from one zone to another, projected onto
/// `reference_date` in the source zone.
pub fn convert_clock_time(
    time: ClockTime,
    from_tz: &Tz,
    to_tz: &Tz,
    reference_date: NaiveDate,
) -> Result<ClockTime> {
    let naive = reference_date.and_time(time.to_naive());
    let source = from_tz
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| {
            ConcordError::InvalidInput(format!(
                "wall-clock time {time} does not exist in {from_tz} on {reference_date}"
            ))
        })?;
    Ok(ClockTime::from_naive(source.with_timezone(to_tz).time()))
}

/// Shift an instant into a viewer's zone and return its local wall-clock
/// time plus calendar date there.
pub fn local_date_and_time(instant: DateTime<Utc>, tz: &Tz) -> (NaiveDate, ClockTime) {
    let local = instant.with_timezone(tz);
    (local.date_naive(), ClockTime::from_naive(local.time()))
}

/// The ISO weekday (1 = Monday .. 7 = Sunday) of an instant in a zone.
pub fn iso_weekday(instant: DateTime<Utc>, tz: &Tz) -> u8 {
    use chrono::Datelike;
    instant.with_timezone(tz).weekday().number_from_monday() as u8
}
