use chrono::{DateTime, Duration, Utc};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::utils::analytics::{generate_id, SESSION_KEY};
use crate::utils::storage::{self, BrowserStorage, KeyValueStore};

pub const EVENTS_STORAGE_KEY: &str = "webinar_events";
pub const MAX_EVENTS: usize = 1000;
pub const SCROLL_MILESTONES: [u32; 4] = [25, 50, 75, 100];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    CtaClick,
    ScrollMilestone,
    FormFieldFocus,
    ButtonClick,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    pub id: String,
    pub session_id: String,
    pub timestamp: i64,
    pub event_type: EventType,
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_details: Option<Value>,
}

pub struct EventLog<'a> {
    local: &'a dyn KeyValueStore,
    session: &'a dyn KeyValueStore,
}

impl EventLog<'static> {
    pub fn browser() -> Self {
        EventLog {
            local: &BrowserStorage::Local,
            session: &BrowserStorage::Session,
        }
    }
}

impl<'a> EventLog<'a> {
    pub fn new(local: &'a dyn KeyValueStore, session: &'a dyn KeyValueStore) -> Self {
        EventLog { local, session }
    }

    pub fn all(&self) -> Vec<InteractionEvent> {
        match storage::load_json(self.local, EVENTS_STORAGE_KEY) {
            Ok(events) => events.unwrap_or_default(),
            Err(e) => {
                error!("Failed to read events: {}", e);
                Vec::new()
            }
        }
    }

    /// Persists only the newest [`MAX_EVENTS`].
    fn save(&self, mut events: Vec<InteractionEvent>) {
        if events.len() > MAX_EVENTS {
            events.drain(..events.len() - MAX_EVENTS);
        }
        if let Err(e) = storage::save_json(self.local, EVENTS_STORAGE_KEY, &events) {
            error!("Failed to save events: {}", e);
        }
    }

    fn current_session(&self) -> String {
        self.session
            .get_item(SESSION_KEY)
            .ok()
            .flatten()
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn record(&self, now: DateTime<Utc>, event_type: EventType, event_name: String, details: Value) {
        let mut events = self.all();
        events.push(InteractionEvent {
            id: format!("evt_{}", generate_id(now).replace('-', "_")),
            session_id: self.current_session(),
            timestamp: now.timestamp_millis(),
            event_type,
            event_name,
            event_details: Some(details),
        });
        self.save(events);
    }

    pub fn track_cta_click(&self, cta_name: &str, cta_location: &str, now: DateTime<Utc>) {
        self.record(
            now,
            EventType::CtaClick,
            format!("CTA: {}", cta_name),
            json!({ "location": cta_location, "ctaName": cta_name }),
        );
        debug!("CTA click tracked: {} at {}", cta_name, cta_location);
    }

    /// Records a scroll milestone at most once per session.
    pub fn track_scroll_milestone(&self, percentage: u32, now: DateTime<Utc>) {
        let session_id = self.current_session();
        let already_tracked = self.events_by_session(&session_id).iter().any(|e| {
            e.event_type == EventType::ScrollMilestone
                && e.event_details
                    .as_ref()
                    .and_then(|d| d.get("percentage"))
                    .and_then(Value::as_u64)
                    == Some(percentage as u64)
        });
        if already_tracked {
            return;
        }
        self.record(
            now,
            EventType::ScrollMilestone,
            format!("Scroll {}%", percentage),
            json!({ "percentage": percentage }),
        );
        debug!("Scroll {}% tracked", percentage);
    }

    pub fn track_form_field_focus(&self, field_name: &str, now: DateTime<Utc>) {
        self.record(
            now,
            EventType::FormFieldFocus,
            format!("Focus: {}", field_name),
            json!({ "fieldName": field_name }),
        );
    }

    pub fn track_button_click(&self, button_name: &str, button_location: &str, now: DateTime<Utc>) {
        self.record(
            now,
            EventType::ButtonClick,
            format!("Button: {}", button_name),
            json!({ "location": button_location, "buttonName": button_name }),
        );
    }

    pub fn events_by_type(&self, event_type: EventType) -> Vec<InteractionEvent> {
        self.all().into_iter().filter(|e| e.event_type == event_type).collect()
    }

    pub fn events_by_session(&self, session_id: &str) -> Vec<InteractionEvent> {
        self.all().into_iter().filter(|e| e.session_id == session_id).collect()
    }

    pub fn clean_old_events(&self, now: DateTime<Utc>) {
        let cutoff = (now - Duration::days(90)).timestamp_millis();
        let events = self.all().into_iter().filter(|e| e.timestamp > cutoff).collect();
        self.save(events);
    }
}

/// Milestones newly reached when scrolling to `percent`, given the highest
/// one already fired on this page view.
pub fn milestones_crossed(last_tracked: u32, percent: u32) -> Vec<u32> {
    SCROLL_MILESTONES
        .iter()
        .copied()
        .filter(|m| percent >= *m && last_tracked < *m)
        .collect()
}

pub fn scroll_percent(scroll_top: f64, scroll_height: f64, viewport_height: f64) -> u32 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 {
        return 100;
    }
    ((scroll_top / scrollable) * 100.0).round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::memory::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_763_000_000, 0).unwrap()
    }

    #[test]
    fn events_are_tagged_with_the_session() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        session.set_item(SESSION_KEY, "abc").unwrap();
        let log = EventLog::new(&local, &session);

        log.track_cta_click("Hero", "topo", now());
        log.track_form_field_focus("email", now());
        log.track_button_click("Enviar", "form", now());

        let events = log.events_by_session("abc");
        assert_eq!(events.len(), 3);
        assert!(log.events_by_session("other").is_empty());
        assert_eq!(events[0].event_name, "CTA: Hero");
        assert!(events[0].id.starts_with("evt_"));
        assert_eq!(log.events_by_type(EventType::FormFieldFocus).len(), 1);
    }

    #[test]
    fn missing_session_is_unknown() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        let log = EventLog::new(&local, &session);
        log.track_cta_click("Final", "rodape", now());
        assert_eq!(log.all()[0].session_id, "unknown");
    }

    #[test]
    fn scroll_milestones_are_deduplicated_per_session() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        session.set_item(SESSION_KEY, "s1").unwrap();
        let log = EventLog::new(&local, &session);

        log.track_scroll_milestone(25, now());
        log.track_scroll_milestone(25, now());
        log.track_scroll_milestone(50, now());
        assert_eq!(log.events_by_type(EventType::ScrollMilestone).len(), 2);

        session.set_item(SESSION_KEY, "s2").unwrap();
        log.track_scroll_milestone(25, now());
        assert_eq!(log.events_by_type(EventType::ScrollMilestone).len(), 3);
    }

    #[test]
    fn log_keeps_only_the_newest_thousand() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        let log = EventLog::new(&local, &session);
        for i in 0..(MAX_EVENTS + 5) {
            log.track_button_click(&format!("b{}", i), "x", now());
        }
        let events = log.all();
        assert_eq!(events.len(), MAX_EVENTS);
        assert_eq!(events[0].event_name, "Button: b5");
    }

    #[test]
    fn old_events_are_cleaned() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        let log = EventLog::new(&local, &session);
        log.track_button_click("old", "x", now() - Duration::days(91));
        log.track_button_click("new", "x", now());
        log.clean_old_events(now());
        let events = log.all();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_name, "Button: new");
    }

    #[test]
    fn milestones_fire_in_order_and_once() {
        assert_eq!(milestones_crossed(0, 10), Vec::<u32>::new());
        assert_eq!(milestones_crossed(0, 60), vec![25, 50]);
        assert_eq!(milestones_crossed(50, 60), Vec::<u32>::new());
        assert_eq!(milestones_crossed(50, 100), vec![75, 100]);
    }

    #[test]
    fn scroll_percent_handles_short_pages() {
        assert_eq!(scroll_percent(0.0, 800.0, 800.0), 100);
        assert_eq!(scroll_percent(500.0, 2000.0, 1000.0), 50);
        assert_eq!(scroll_percent(5000.0, 2000.0, 1000.0), 100);
    }
}
