//! Integration tests for calendar resolution priority
//!
//! Explicit id beats global-primary, global-primary beats the resource
//! filter, and the resource filter beats "any calendar".

mod support;

use std::sync::Arc;

use concord_core::CalendarResolver;
use concord_domain::constants::{GOOGLE_CALENDAR_RESOURCE, LOCAL_CALENDAR_RESOURCE};
use support::stores::{calendar, MockCalendarStore};

fn store_with_three_calendars() -> Arc<MockCalendarStore> {
    let mut explicit = calendar("cal-explicit", "u1");
    explicit.resource = Some(LOCAL_CALENDAR_RESOURCE.to_string());

    let mut primary = calendar("cal-primary", "u1");
    primary.global_primary = true;
    primary.resource = Some(LOCAL_CALENDAR_RESOURCE.to_string());

    let google = calendar("cal-google", "u1");

    Arc::new(MockCalendarStore::new(vec![explicit, primary, google]))
}

#[tokio::test]
async fn explicit_id_wins_over_global_primary() {
    let resolver = CalendarResolver::new(store_with_three_calendars());

    let resolved = resolver
        .resolve("u1", Some("cal-explicit"), true, Some(GOOGLE_CALENDAR_RESOURCE))
        .await
        .unwrap()
        .expect("resolves");

    assert_eq!(resolved.id, "cal-explicit");
}

#[tokio::test]
async fn omitting_explicit_id_falls_through_to_global_primary() {
    let resolver = CalendarResolver::new(store_with_three_calendars());

    let resolved = resolver
        .resolve("u1", None, true, Some(GOOGLE_CALENDAR_RESOURCE))
        .await
        .unwrap()
        .expect("resolves");

    assert_eq!(resolved.id, "cal-primary");
}

#[tokio::test]
async fn resource_filter_applies_when_global_primary_not_wanted() {
    let resolver = CalendarResolver::new(store_with_three_calendars());

    let resolved = resolver
        .resolve("u1", None, false, Some(GOOGLE_CALENDAR_RESOURCE))
        .await
        .unwrap()
        .expect("resolves");

    assert_eq!(resolved.id, "cal-google");
}

#[tokio::test]
async fn falls_back_to_any_calendar() {
    let store = Arc::new(MockCalendarStore::new(vec![calendar("cal-only", "u1")]));
    let resolver = CalendarResolver::new(store);

    let resolved = resolver.resolve("u1", None, false, None).await.unwrap().expect("resolves");

    assert_eq!(resolved.id, "cal-only");
}

#[tokio::test]
async fn no_calendars_resolves_to_none() {
    let resolver = CalendarResolver::new(Arc::new(MockCalendarStore::default()));

    let resolved = resolver
        .resolve("u1", Some("missing"), true, Some(GOOGLE_CALENDAR_RESOURCE))
        .await
        .unwrap();

    assert!(resolved.is_none());
}

#[tokio::test]
async fn unresolvable_explicit_id_still_falls_through() {
    let resolver = CalendarResolver::new(store_with_three_calendars());

    let resolved = resolver
        .resolve("u1", Some("missing"), true, None)
        .await
        .unwrap()
        .expect("resolves");

    assert_eq!(resolved.id, "cal-primary");
}
