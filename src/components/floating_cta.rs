use chrono::Utc;
use web_sys::{window, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::utils::events::EventLog;

pub const FORM_ANCHOR: &str = "inscricao";
const SHOW_AFTER_PX: f64 = 300.0;

/// Smoothly scrolls the signup form into view.
pub fn scroll_to_form() {
    let Some(element) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(FORM_ANCHOR))
    else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Click handler for every "go to the form" button on the page.
pub fn cta_callback(name: &'static str, location: &'static str) -> Callback<MouseEvent> {
    Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        EventLog::browser().track_cta_click(name, location, Utc::now());
        scroll_to_form();
    })
}

#[function_component(FloatingCta)]
pub fn floating_cta() -> Html {
    let (_, scroll_y) = use_window_scroll();
    let dismissed = use_state(|| false);

    if *dismissed || scroll_y <= SHOW_AFTER_PX {
        return html! {};
    }

    let dismiss = {
        let dismissed = dismissed.clone();
        Callback::from(move |_: MouseEvent| dismissed.set(true))
    };

    html! {
        <div class="floating-cta">
            <style>
                {r#"
                    .floating-cta {
                        position: fixed;
                        right: 24px;
                        bottom: 24px;
                        z-index: 950;
                        display: flex;
                        align-items: center;
                        gap: 8px;
                    }
                    .floating-cta-button {
                        background: linear-gradient(45deg, #1E90FF, #4169E1);
                        color: #fff;
                        border: none;
                        border-radius: 999px;
                        padding: 14px 24px;
                        font-size: 1rem;
                        font-weight: bold;
                        cursor: pointer;
                        box-shadow: 0 8px 24px rgba(30, 144, 255, 0.4);
                    }
                    .floating-cta-close {
                        background: rgba(26, 26, 26, 0.9);
                        color: #999;
                        border: 1px solid rgba(255,255,255,0.1);
                        border-radius: 50%;
                        width: 32px;
                        height: 32px;
                        cursor: pointer;
                    }
                    @media (max-width: 600px) {
                        .floating-cta {
                            left: 12px;
                            right: 12px;
                            bottom: 12px;
                        }
                        .floating-cta-button { flex: 1; }
                    }
                "#}
            </style>
            <button class="floating-cta-button" onclick={cta_callback("Garantir minha vaga", "floating")}>
                {"Garantir minha vaga"}
            </button>
            <button class="floating-cta-close" aria-label="Fechar" onclick={dismiss}>{"×"}</button>
        </div>
    }
}
