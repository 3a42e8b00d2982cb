use chrono::Utc;
use yew::prelude::*;

use crate::components::thank_you_content::ThankYouContent;
use crate::utils::events::EventLog;
use crate::utils::webinar::WebinarSchedule;

#[derive(Properties, PartialEq)]
pub struct SuccessModalProps {
    pub schedule: WebinarSchedule,
    pub first_name: Option<String>,
    pub on_close: Callback<()>,
}

#[function_component(SuccessModal)]
pub fn success_modal(props: &SuccessModalProps) -> Html {
    let close = props.on_close.reform(|_: MouseEvent| {
        EventLog::browser().track_button_click("Fechar", "modal_sucesso", Utc::now());
    });
    let stop = Callback::from(|e: MouseEvent| e.stop_propagation());

    html! {
        <div class="modal-overlay" onclick={close.clone()}>
            <style>
                {r#"
                    .modal-overlay {
                        position: fixed;
                        inset: 0;
                        background: rgba(0, 0, 0, 0.75);
                        backdrop-filter: blur(4px);
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        z-index: 1000;
                        padding: 1rem;
                    }
                    .modal-content {
                        position: relative;
                        background: #1a1a1a;
                        border: 1px solid rgba(30, 144, 255, 0.2);
                        border-radius: 16px;
                        padding: 2.5rem 2rem;
                        max-width: 640px;
                        width: 100%;
                        max-height: 90vh;
                        overflow-y: auto;
                    }
                    .modal-close {
                        position: absolute;
                        top: 12px;
                        right: 16px;
                        background: none;
                        border: none;
                        color: #999;
                        font-size: 1.5rem;
                        cursor: pointer;
                    }
                "#}
            </style>
            <div class="modal-content" onclick={stop}>
                <button class="modal-close" aria-label="Fechar" onclick={close}>{"×"}</button>
                <ThankYouContent schedule={props.schedule.clone()} first_name={props.first_name.clone()} />
            </div>
        </div>
    }
}
