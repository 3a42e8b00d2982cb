#[cfg(debug_assertions)]
pub fn get_webhook_url() -> &'static str {
    "http://localhost:3001/webhook/webinar-lead"  // Local request bin while developing
}

#[cfg(not(debug_assertions))]
pub fn get_webhook_url() -> &'static str {
    "https://hooks.example.com/webhook/webinar-lead"
}

pub fn get_geolocation_url() -> &'static str {
    "https://ipapi.co/json/"
}

#[cfg(debug_assertions)]
pub fn log_level() -> log::Level {
    log::Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> log::Level {
    log::Level::Info
}
