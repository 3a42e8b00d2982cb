//! Visit and form lifecycle log kept in the browser's local storage.
//!
//! Every operation reads the whole blob, filters out records older than
//! [`MAX_HISTORY_DAYS`], mutates it and writes it back. Concurrent tabs race
//! on that read-modify-write and the last writer wins.

use chrono::{DateTime, Duration, Utc};
use log::{error, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::utils::storage::{self, BrowserStorage, KeyValueStore, StorageError};
use crate::utils::webinar::WEBINAR_TZ;

pub const STORAGE_KEY: &str = "webinar_analytics";
pub const SESSION_KEY: &str = "webinar_session_id";
pub const SESSION_START_KEY: &str = "webinar_session_start";
pub const MAX_HISTORY_DAYS: i64 = 90;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Desktop,
    Tablet,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Desktop => "desktop",
            DeviceType::Tablet => "tablet",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "Mobile",
            DeviceType::Desktop => "Desktop",
            DeviceType::Tablet => "Tablet",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DeviceData {
    #[serde(rename = "type")]
    pub kind: DeviceType,
    pub info: String,
    pub browser: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LocationData {
    pub city: String,
    pub region: String,
    pub country: String,
}

impl LocationData {
    pub fn display(&self) -> String {
        format!("{}, {}", self.city, self.region)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::PreferNotSay,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::PreferNotSay => "prefer-not-say",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Masculino",
            Gender::Female => "Feminino",
            Gender::Other => "Outro",
            Gender::PreferNotSay => "Não informado",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.value() == value)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: String,
    pub timestamp: i64,
    pub session_id: String,
    pub page_load_time: i64,
    pub time_on_page: u64,
    pub form_started: bool,
    pub form_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_form_start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_form_complete: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_hour: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormStart {
    pub id: String,
    pub timestamp: i64,
    pub session_id: String,
    pub completed: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormCompletion {
    pub id: String,
    pub timestamp: i64,
    pub session_id: String,
    pub time_to_complete: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_hour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    #[serde(default)]
    pub visits: Vec<Visit>,
    #[serde(default)]
    pub form_starts: Vec<FormStart>,
    #[serde(default)]
    pub form_completions: Vec<FormCompletion>,
}

impl AnalyticsData {
    /// Drops every record at or before `cutoff` (milliseconds).
    pub fn retain_newer_than(&mut self, cutoff: i64) {
        self.visits.retain(|v| v.timestamp > cutoff);
        self.form_starts.retain(|f| f.timestamp > cutoff);
        self.form_completions.retain(|f| f.timestamp > cutoff);
    }
}

/// Demographic answers collected by the signup form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Demographics {
    pub gender: Option<Gender>,
    pub age: Option<u32>,
}

/// `<millis>-<9 base36 chars>`, unique enough for a single browser.
pub fn generate_id(now: DateTime<Utc>) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", now.timestamp_millis(), suffix)
}

pub fn format_access_hour(now: DateTime<Utc>) -> String {
    now.with_timezone(&WEBINAR_TZ)
        .format("%d/%m/%Y, %H:%M")
        .to_string()
}

pub fn history_cutoff(now: DateTime<Utc>) -> i64 {
    (now - Duration::days(MAX_HISTORY_DAYS)).timestamp_millis()
}

pub struct AnalyticsLog<'a> {
    local: &'a dyn KeyValueStore,
    session: &'a dyn KeyValueStore,
}

impl AnalyticsLog<'static> {
    pub fn browser() -> Self {
        AnalyticsLog {
            local: &BrowserStorage::Local,
            session: &BrowserStorage::Session,
        }
    }
}

impl<'a> AnalyticsLog<'a> {
    pub fn new(local: &'a dyn KeyValueStore, session: &'a dyn KeyValueStore) -> Self {
        AnalyticsLog { local, session }
    }

    /// Returns the tab's session id, creating it (and its start time) on first use.
    pub fn session_id(&self, now: DateTime<Utc>) -> String {
        if let Ok(Some(id)) = self.session.get_item(SESSION_KEY) {
            return id;
        }
        let id = generate_id(now);
        let stored = self
            .session
            .set_item(SESSION_KEY, &id)
            .and_then(|_| {
                self.session
                    .set_item(SESSION_START_KEY, &now.timestamp_millis().to_string())
            });
        if let Err(e) = stored {
            warn!("Could not persist session id: {}", e);
        }
        id
    }

    pub fn session_start(&self, now: DateTime<Utc>) -> i64 {
        self.session
            .get_item(SESSION_START_KEY)
            .ok()
            .flatten()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(|| now.timestamp_millis())
    }

    /// Everything recorded in the last 90 days. Storage or parse failures
    /// are logged and read as an empty log.
    pub fn read_all(&self, now: DateTime<Utc>) -> AnalyticsData {
        match storage::load_json::<AnalyticsData>(self.local, STORAGE_KEY) {
            Ok(Some(mut data)) => {
                data.retain_newer_than(history_cutoff(now));
                data
            }
            Ok(None) => AnalyticsData::default(),
            Err(e) => {
                error!("Failed to read analytics: {}", e);
                AnalyticsData::default()
            }
        }
    }

    fn save(&self, data: &AnalyticsData) {
        if let Err(e) = storage::save_json(self.local, STORAGE_KEY, data) {
            error!("Failed to save analytics: {}", e);
        }
    }

    pub fn track_page_visit(
        &self,
        now: DateTime<Utc>,
        device: Option<DeviceData>,
        location: Option<LocationData>,
    ) -> String {
        let mut data = self.read_all(now);
        let id = generate_id(now);
        let millis = now.timestamp_millis();

        data.visits.push(Visit {
            id: id.clone(),
            timestamp: millis,
            session_id: self.session_id(now),
            page_load_time: millis,
            time_on_page: 0,
            form_started: false,
            form_completed: false,
            time_to_form_start: None,
            time_to_form_complete: None,
            device,
            location,
            access_hour: Some(format_access_hour(now)),
        });
        self.save(&data);
        id
    }

    pub fn update_time_on_page(&self, visit_id: &str, seconds: u64, now: DateTime<Utc>) {
        let mut data = self.read_all(now);
        if let Some(visit) = data.visits.iter_mut().find(|v| v.id == visit_id) {
            visit.time_on_page = seconds;
            self.save(&data);
        }
    }

    pub fn track_form_start(&self, visit_id: &str, now: DateTime<Utc>) {
        let mut data = self.read_all(now);
        let session_id = self.session_id(now);
        let elapsed = now.timestamp_millis() - self.session_start(now);

        if let Some(visit) = data.visits.iter_mut().find(|v| v.id == visit_id) {
            visit.form_started = true;
            visit.time_to_form_start = Some(elapsed);
        }

        data.form_starts.push(FormStart {
            id: generate_id(now),
            timestamp: now.timestamp_millis(),
            session_id,
            completed: false,
        });
        self.save(&data);
    }

    pub fn track_form_completion(
        &self,
        visit_id: &str,
        now: DateTime<Utc>,
        device: Option<DeviceData>,
        location: Option<LocationData>,
        demographics: Demographics,
    ) {
        let mut data = self.read_all(now);
        let session_id = self.session_id(now);
        let elapsed = now.timestamp_millis() - self.session_start(now);

        if let Some(visit) = data.visits.iter_mut().find(|v| v.id == visit_id) {
            visit.form_completed = true;
            visit.time_to_form_complete = Some(elapsed);
        }

        if let Some(start) = data
            .form_starts
            .iter_mut()
            .find(|f| f.session_id == session_id && !f.completed)
        {
            start.completed = true;
        }

        data.form_completions.push(FormCompletion {
            id: generate_id(now),
            timestamp: now.timestamp_millis(),
            session_id,
            time_to_complete: elapsed,
            location,
            device,
            access_hour: Some(format_access_hour(now)),
            gender: demographics.gender,
            age: demographics.age,
        });
        self.save(&data);
    }

    pub fn clear_all(&self) -> Result<(), StorageError> {
        self.local.remove_item(STORAGE_KEY)
    }

    pub fn export_json(&self, now: DateTime<Utc>) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.read_all(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::memory::MemoryStore;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_763_000_000 + secs, 0).unwrap()
    }

    fn desktop() -> DeviceData {
        DeviceData {
            kind: DeviceType::Desktop,
            info: "Linux".into(),
            browser: "Firefox".into(),
        }
    }

    #[test]
    fn generated_ids_carry_the_timestamp_and_a_random_suffix() {
        let id = generate_id(at(0));
        let (millis, suffix) = id.split_once('-').unwrap();
        assert_eq!(millis, at(0).timestamp_millis().to_string());
        assert_eq!(suffix.len(), 9);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn session_id_is_stable_within_a_tab() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        let log = AnalyticsLog::new(&local, &session);
        let first = log.session_id(at(0));
        assert_eq!(log.session_id(at(30)), first);
        assert_eq!(log.session_start(at(30)), at(0).timestamp_millis());
    }

    #[test]
    fn visit_lifecycle_updates_flags_and_deltas() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        let log = AnalyticsLog::new(&local, &session);

        let visit_id = log.track_page_visit(at(0), Some(desktop()), None);
        log.update_time_on_page(&visit_id, 42, at(42));
        log.track_form_start(&visit_id, at(50));
        log.track_form_completion(
            &visit_id,
            at(80),
            Some(desktop()),
            None,
            Demographics {
                gender: Some(Gender::Female),
                age: Some(31),
            },
        );

        let data = log.read_all(at(90));
        let visit = &data.visits[0];
        assert_eq!(visit.time_on_page, 42);
        assert!(visit.form_started && visit.form_completed);
        assert_eq!(visit.time_to_form_start, Some(50_000));
        assert_eq!(visit.time_to_form_complete, Some(80_000));
        assert_eq!(data.form_starts.len(), 1);
        assert!(data.form_starts[0].completed);
        assert_eq!(data.form_completions[0].gender, Some(Gender::Female));
        assert_eq!(data.form_completions[0].session_id, visit.session_id);
    }

    #[test]
    fn updating_an_unknown_visit_changes_nothing() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        let log = AnalyticsLog::new(&local, &session);
        log.track_page_visit(at(0), None, None);
        log.update_time_on_page("missing", 99, at(5));
        assert_eq!(log.read_all(at(5)).visits[0].time_on_page, 0);
    }

    #[test]
    fn records_older_than_ninety_days_are_purged_on_read() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        let log = AnalyticsLog::new(&local, &session);
        log.track_page_visit(at(0), None, None);
        let later = at(0) + Duration::days(MAX_HISTORY_DAYS) + Duration::seconds(1);
        log.track_page_visit(later, None, None);

        let data = log.read_all(later);
        assert_eq!(data.visits.len(), 1);
        assert_eq!(data.visits[0].timestamp, later.timestamp_millis());
    }

    #[test]
    fn corrupt_storage_reads_as_empty() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        local.set_item(STORAGE_KEY, "[[[").unwrap();
        let log = AnalyticsLog::new(&local, &session);
        assert_eq!(log.read_all(at(0)), AnalyticsData::default());
    }

    #[test]
    fn partial_blobs_fill_missing_arrays() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        let stamp = at(0).timestamp_millis();
        local
            .set_item(
                STORAGE_KEY,
                &format!(
                    r#"{{"formStarts":[{{"id":"a","timestamp":{},"sessionId":"s","completed":false}}]}}"#,
                    stamp
                ),
            )
            .unwrap();
        let log = AnalyticsLog::new(&local, &session);
        let data = log.read_all(at(1));
        assert!(data.visits.is_empty());
        assert_eq!(data.form_starts.len(), 1);
    }

    #[test]
    fn clear_and_export() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        let log = AnalyticsLog::new(&local, &session);
        log.track_page_visit(at(0), None, None);

        let exported = log.export_json(at(1)).unwrap();
        assert!(exported.contains("\"sessionId\""));
        assert!(exported.contains("\"formCompletions\": []"));

        log.clear_all().unwrap();
        assert!(log.read_all(at(1)).visits.is_empty());
    }
}
