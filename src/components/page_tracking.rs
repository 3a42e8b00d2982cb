use std::cell::RefCell;

use chrono::{DateTime, Utc};
use log::debug;
use wasm_bindgen_futures::spawn_local;
use web_sys::window;
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::utils::analytics::AnalyticsLog;
use crate::utils::device::current_device;
use crate::utils::events::{milestones_crossed, scroll_percent, EventLog};
use crate::utils::geolocation::{fetch_visitor_location, LocationCache};

const FLUSH_INTERVAL_MS: u32 = 10_000;

fn flush_time_on_page(visit: &RefCell<Option<String>>, started: DateTime<Utc>) {
    if let Some(id) = visit.borrow().as_ref() {
        let now = Utc::now();
        let seconds = (now - started).num_seconds().max(0) as u64;
        AnalyticsLog::browser().update_time_on_page(id, seconds, now);
    }
}

/// Records the visit once the visitor's location is known and keeps its
/// time on page current. Returns the visit id once it exists.
#[hook]
pub fn use_page_tracking() -> UseStateHandle<Option<String>> {
    let visit_id = use_state(|| None::<String>);
    let shared = use_mut_ref(|| None::<String>);
    let started = use_mut_ref(Utc::now);

    {
        let visit_id = visit_id.clone();
        let shared = shared.clone();
        let started = started.clone();
        use_effect_with_deps(
            move |_| {
                EventLog::browser().clean_old_events(Utc::now());
                spawn_local({
                    let shared = shared.clone();
                    async move {
                        let location = fetch_visitor_location().await;
                        LocationCache::browser().add_to_pool(None, Utc::now());
                        let id = AnalyticsLog::browser().track_page_visit(
                            Utc::now(),
                            current_device(),
                            Some(location),
                        );
                        debug!("Visit {} recorded", id);
                        *shared.borrow_mut() = Some(id.clone());
                        visit_id.set(Some(id));
                    }
                });
                move || flush_time_on_page(&shared, *started.borrow())
            },
            (),
        );
    }

    {
        let shared = shared.clone();
        let started = started.clone();
        use_interval(
            move || flush_time_on_page(&shared, *started.borrow()),
            FLUSH_INTERVAL_MS,
        );
    }

    {
        let shared = shared.clone();
        let started = started.clone();
        use_event_with_window("visibilitychange", move |_: Event| {
            let hidden = window()
                .and_then(|w| w.document())
                .map_or(false, |d| d.hidden());
            if hidden {
                flush_time_on_page(&shared, *started.borrow());
            }
        });
    }

    use_event_with_window("beforeunload", move |_: Event| {
        flush_time_on_page(&shared, *started.borrow());
    });

    visit_id
}

/// Fires each scroll milestone once per page view.
#[hook]
pub fn use_scroll_milestones() {
    let (_, scroll_y) = use_window_scroll();
    let last_tracked = use_mut_ref(|| 0u32);

    use_effect_with_deps(
        move |scroll_y: &i64| {
            let percent = window().and_then(|w| {
                let viewport = w.inner_height().ok()?.as_f64()?;
                let height = w.document()?.document_element()?.scroll_height() as f64;
                Some(scroll_percent(*scroll_y as f64, height, viewport))
            });
            if let Some(percent) = percent {
                let crossed = milestones_crossed(*last_tracked.borrow(), percent);
                if let Some(highest) = crossed.last() {
                    let events = EventLog::browser();
                    for milestone in &crossed {
                        events.track_scroll_milestone(*milestone, Utc::now());
                    }
                    *last_tracked.borrow_mut() = *highest;
                }
            }
            || ()
        },
        scroll_y as i64,
    );
}
