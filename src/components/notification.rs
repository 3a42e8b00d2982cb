use chrono::Utc;
use gloo_timers::callback::Timeout;
use yew::prelude::*;

use crate::utils::geolocation::LocationCache;
use crate::utils::social_proof::{
    pick_notification, random_delay, SignupNotice, DISPLAY_MS, INITIAL_DELAY_MS, INTERVAL_MS,
};

/// A signup made on this page, numbered so repeated names still re-render.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveSignup {
    pub seq: u32,
    pub notice: SignupNotice,
}

#[derive(Properties, PartialEq)]
pub struct SignupNotificationsProps {
    #[prop_or_default]
    pub live: Option<LiveSignup>,
}

#[function_component(SignupNotifications)]
pub fn signup_notifications(props: &SignupNotificationsProps) -> Html {
    let current = use_state(|| None::<SignupNotice>);
    let cycle = use_state(|| 0u32);

    // Schedule the next fake signup
    {
        let current = current.clone();
        let cycle_handle = cycle.clone();
        use_effect_with_deps(
            move |cycle_no: &u32| {
                let mut rng = rand::thread_rng();
                let delay = if *cycle_no == 0 {
                    random_delay(INITIAL_DELAY_MS, &mut rng)
                } else {
                    random_delay(INTERVAL_MS, &mut rng)
                };
                let next = *cycle_no + 1;
                let timeout = Timeout::new(delay, move || {
                    let cache = LocationCache::browser();
                    let city = cache.cached(Utc::now()).map(|c| c.location().display());
                    let notice = pick_notification(
                        &cache.visitor_pool(),
                        city.as_deref(),
                        &mut rand::thread_rng(),
                    );
                    current.set(Some(notice));
                    cycle_handle.set(next);
                });
                move || drop(timeout)
            },
            *cycle,
        );
    }

    // Hide whatever is showing after a few seconds
    {
        let current_handle = current.clone();
        use_effect_with_deps(
            move |shown: &Option<SignupNotice>| {
                let timeout = shown.as_ref().map(|_| {
                    Timeout::new(DISPLAY_MS, move || current_handle.set(None))
                });
                move || drop(timeout)
            },
            (*current).clone(),
        );
    }

    // A real signup replaces the visible notice right away
    {
        let current = current.clone();
        use_effect_with_deps(
            move |live: &Option<LiveSignup>| {
                if let Some(live) = live {
                    current.set(Some(live.notice.clone()));
                }
                || ()
            },
            props.live.clone(),
        );
    }

    let dismiss = {
        let current = current.clone();
        Callback::from(move |_: MouseEvent| current.set(None))
    };

    html! {
        <>
            <style>
                {r#"
                    @keyframes notificationSlideIn {
                        from { transform: translateX(-120%); opacity: 0; }
                        to { transform: translateX(0); opacity: 1; }
                    }
                    .signup-notification {
                        position: fixed;
                        bottom: 24px;
                        left: 24px;
                        max-width: 340px;
                        display: flex;
                        align-items: center;
                        gap: 12px;
                        background: rgba(26, 26, 26, 0.95);
                        backdrop-filter: blur(10px);
                        border: 1px solid rgba(30, 144, 255, 0.2);
                        border-radius: 16px;
                        padding: 14px 16px;
                        box-shadow: 0 16px 32px rgba(0,0,0,0.3);
                        animation: notificationSlideIn 0.5s ease-out forwards;
                        z-index: 900;
                        color: #fff;
                    }
                    .signup-notification-icon {
                        width: 40px;
                        height: 40px;
                        border-radius: 50%;
                        background: linear-gradient(45deg, #1E90FF, #7EB2FF);
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        font-weight: bold;
                        flex-shrink: 0;
                    }
                    .signup-notification-text strong {
                        display: block;
                        font-size: 0.95rem;
                    }
                    .signup-notification-text span {
                        font-size: 0.85rem;
                        color: #999;
                    }
                    .signup-notification-close {
                        background: none;
                        border: none;
                        color: #666;
                        cursor: pointer;
                        font-size: 1.1rem;
                        margin-left: auto;
                    }
                    @media (max-width: 600px) {
                        .signup-notification {
                            left: 12px;
                            right: 12px;
                            bottom: 84px;
                            max-width: none;
                        }
                    }
                "#}
            </style>
            {
                if let Some(notice) = &*current {
                    let initial = notice.name.chars().next().unwrap_or('?').to_string();
                    html! {
                        <div class="signup-notification" role="status">
                            <div class="signup-notification-icon">{initial}</div>
                            <div class="signup-notification-text">
                                <strong>{format!("{} de {}", notice.name, notice.location)}</strong>
                                <span>{format!("se inscreveu no webinar {}", notice.time_label)}</span>
                            </div>
                            <button class="signup-notification-close" aria-label="Fechar" onclick={dismiss}>{"×"}</button>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </>
    }
}
