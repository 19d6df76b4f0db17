//! Recurrence-rule construction
//!
//! Turns the recurrence descriptor carried on an event into the RRULE line
//! for the provider write. Rules are plain text at every boundary that
//! consumes them; iteration semantics stay with the `rrule` crate, which
//! the tests use to check that generated rules expand to the intended
//! occurrences.

use concord_domain::{Recurrence, RecurrenceDay};

/// Build the RRULE line for a recurrence descriptor.
///
/// `UNTIL` is the descriptor's end date in UTC; `BYDAY` appears only when
/// weekdays are constrained. The interval is forwarded as given.
pub fn build_rrule(recurrence: &Recurrence) -> String {
    let mut rule = format!(
        "RRULE:FREQ={};INTERVAL={};UNTIL={}",
        frequency_name(recurrence),
        recurrence.interval,
        recurrence.end_date.format("%Y%m%dT%H%M%SZ"),
    );

    if !recurrence.by_day.is_empty() {
        rule.push_str(";BYDAY=");
        let days: Vec<&str> = recurrence.by_day.iter().map(|d| day_abbrev(*d)).collect();
        rule.push_str(&days.join(","));
    }

    rule
}

/// The recurrence lines for a provider event payload, or `None` when the
/// event does not recur.
pub fn recurrence_lines(recurrence: Option<&Recurrence>) -> Option<Vec<String>> {
    recurrence.map(|r| vec![build_rrule(r)])
}

fn frequency_name(recurrence: &Recurrence) -> &'static str {
    use concord_domain::RecurrenceFrequency::*;
    match recurrence.frequency {
        Daily => "DAILY",
        Weekly => "WEEKLY",
        Monthly => "MONTHLY",
        Yearly => "YEARLY",
    }
}

fn day_abbrev(day: RecurrenceDay) -> &'static str {
    match day {
        RecurrenceDay::Mo => "MO",
        RecurrenceDay::Tu => "TU",
        RecurrenceDay::We => "WE",
        RecurrenceDay::Th => "TH",
        RecurrenceDay::Fr => "FR",
        RecurrenceDay::Sa => "SA",
        RecurrenceDay::Su => "SU",
    }
}
