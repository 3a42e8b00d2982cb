use log::{error, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::storage::{self, BrowserStorage, KeyValueStore, StorageError};
use crate::utils::webinar::WebinarSchedule;

pub const CONFIG_KEY: &str = "admin_webinar_config";
pub const PASSWORD_HASH_KEY: &str = "admin_password_hash";
pub const AUTH_SESSION_KEY: &str = "admin_authenticated";
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackingIds {
    pub meta_ads_pixel_id: String,
    pub google_ads_conversion_id: String,
    pub google_analytics_id: String,
    pub google_tag_manager_id: String,
}

impl TrackingIds {
    pub fn is_empty(&self) -> bool {
        [
            &self.meta_ads_pixel_id,
            &self.google_ads_conversion_id,
            &self.google_analytics_id,
            &self.google_tag_manager_id,
        ]
        .iter()
        .all(|id| id.trim().is_empty())
    }
}

/// Everything the admin panel can edit. Missing fields in the stored JSON
/// keep their defaults.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct AdminConfig {
    pub webinar: WebinarSchedule,
    pub tracking: TrackingIds,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("As senhas não coincidem")]
    Mismatch,
    #[error("A nova senha deve ter pelo menos 6 caracteres")]
    TooShort,
    #[error("Senha atual incorreta")]
    WrongCurrent,
    #[error("Não foi possível salvar a nova senha")]
    Storage,
}

/// 32-bit rolling hash over UTF-16 code units (`h * 31 + c`), as a decimal string.
pub fn hash_password(password: &str) -> String {
    password
        .encode_utf16()
        .fold(0i32, |h, c| h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32))
        .to_string()
}

pub fn validate_new_password(new: &str, confirm: &str) -> Result<(), PasswordError> {
    if new != confirm {
        return Err(PasswordError::Mismatch);
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }
    Ok(())
}

pub struct AdminStore<'a> {
    local: &'a dyn KeyValueStore,
    session: &'a dyn KeyValueStore,
}

impl AdminStore<'static> {
    pub fn browser() -> Self {
        AdminStore {
            local: &BrowserStorage::Local,
            session: &BrowserStorage::Session,
        }
    }
}

impl<'a> AdminStore<'a> {
    pub fn new(local: &'a dyn KeyValueStore, session: &'a dyn KeyValueStore) -> Self {
        AdminStore { local, session }
    }

    pub fn load_config(&self) -> AdminConfig {
        match storage::load_json(self.local, CONFIG_KEY) {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                error!("Failed to load admin config: {}", e);
                AdminConfig::default()
            }
        }
    }

    pub fn save_config(&self, config: &AdminConfig) -> Result<(), StorageError> {
        storage::save_json(self.local, CONFIG_KEY, config)
    }

    /// With no stored hash yet, the first password tried becomes the password.
    pub fn verify_password(&self, password: &str) -> bool {
        let hash = hash_password(password);
        match self.local.get_item(PASSWORD_HASH_KEY) {
            Ok(Some(stored)) => stored == hash,
            Ok(None) => {
                if let Err(e) = self.local.set_item(PASSWORD_HASH_KEY, &hash) {
                    warn!("Could not store the initial admin password: {}", e);
                }
                true
            }
            Err(e) => {
                error!("Could not read the admin password: {}", e);
                false
            }
        }
    }

    pub fn change_password(&self, current: &str, new: &str) -> Result<(), PasswordError> {
        if !self.verify_password(current) {
            return Err(PasswordError::WrongCurrent);
        }
        self.local
            .set_item(PASSWORD_HASH_KEY, &hash_password(new))
            .map_err(|e| {
                error!("Failed to store the new admin password: {}", e);
                PasswordError::Storage
            })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.session.get_item(AUTH_SESSION_KEY), Ok(Some(flag)) if flag == "true")
    }

    pub fn login(&self, password: &str) -> bool {
        if !self.verify_password(password) {
            return false;
        }
        if let Err(e) = self.session.set_item(AUTH_SESSION_KEY, "true") {
            warn!("Could not persist admin session: {}", e);
        }
        true
    }

    pub fn logout(&self) {
        let _ = self.session.remove_item(AUTH_SESSION_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::memory::MemoryStore;

    #[test]
    fn hash_matches_the_stored_format() {
        assert_eq!(hash_password(""), "0");
        assert_eq!(hash_password("a"), "97");
        assert_eq!(hash_password("ab"), "3105");
        // wraps into negative values like a 32-bit integer
        assert_eq!(hash_password("admin123"), "-969161597");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        local
            .set_item(
                CONFIG_KEY,
                r#"{"webinar":{"dia":3,"mes":12},"tracking":{"metaAdsPixelId":"123"}}"#,
            )
            .unwrap();
        let config = AdminStore::new(&local, &session).load_config();
        assert_eq!(config.webinar.dia, 3);
        assert_eq!(config.webinar.mes, 12);
        assert_eq!(config.webinar.hora, 19);
        assert_eq!(config.webinar.ano, 2025);
        assert_eq!(config.tracking.meta_ads_pixel_id, "123");
        assert!(config.tracking.google_tag_manager_id.is_empty());
    }

    #[test]
    fn corrupt_config_reads_as_default() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        local.set_item(CONFIG_KEY, "nope").unwrap();
        assert_eq!(AdminStore::new(&local, &session).load_config(), AdminConfig::default());
    }

    #[test]
    fn saved_config_round_trips_in_camel_case() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        let store = AdminStore::new(&local, &session);
        let mut config = AdminConfig::default();
        config.tracking.google_tag_manager_id = "GTM-XYZ".into();
        store.save_config(&config).unwrap();

        let raw = local.get_item(CONFIG_KEY).unwrap().unwrap();
        assert!(raw.contains("googleTagManagerId"));
        assert_eq!(store.load_config(), config);
    }

    #[test]
    fn first_password_becomes_the_password() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        let store = AdminStore::new(&local, &session);
        assert!(store.verify_password("segredo1"));
        assert!(store.verify_password("segredo1"));
        assert!(!store.verify_password("outra"));
    }

    #[test]
    fn changing_the_password_requires_the_current_one() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        let store = AdminStore::new(&local, &session);
        store.verify_password("antiga1");

        assert_eq!(store.change_password("errada", "nova123"), Err(PasswordError::WrongCurrent));
        assert_eq!(store.change_password("antiga1", "nova123"), Ok(()));
        assert!(store.verify_password("nova123"));
        assert!(!store.verify_password("antiga1"));
    }

    #[test]
    fn new_password_rules() {
        assert_eq!(validate_new_password("abc123", "abc124"), Err(PasswordError::Mismatch));
        assert_eq!(validate_new_password("abc", "abc"), Err(PasswordError::TooShort));
        assert_eq!(validate_new_password("abc123", "abc123"), Ok(()));
    }

    #[test]
    fn login_sets_the_session_flag() {
        let (local, session) = (MemoryStore::default(), MemoryStore::default());
        let store = AdminStore::new(&local, &session);
        assert!(!store.is_authenticated());
        assert!(store.login("primeira"));
        assert!(store.is_authenticated());
        store.logout();
        assert!(!store.is_authenticated());
        assert!(!store.login("errada"));
    }
}
