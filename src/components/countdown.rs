use chrono::Utc;
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::utils::webinar::{time_remaining, WebinarSchedule};

#[derive(Properties, PartialEq)]
pub struct CountdownProps {
    pub schedule: WebinarSchedule,
}

#[function_component(Countdown)]
pub fn countdown(props: &CountdownProps) -> Html {
    let now = use_state(Utc::now);
    {
        let now = now.clone();
        use_interval(move || now.set(Utc::now()), 1_000);
    }

    let left = time_remaining(props.schedule.datetime().with_timezone(&Utc), *now);
    if left.is_over() {
        return html! {
            <div class="countdown countdown-over">{"O webinar já começou!"}</div>
        };
    }

    let unit = |value: i64, label: &str| {
        html! {
            <div class="countdown-unit">
                <span class="countdown-value">{format!("{:02}", value)}</span>
                <span class="countdown-label">{label.to_string()}</span>
            </div>
        }
    };

    html! {
        <div class="countdown">
            <style>
                {r#"
                    .countdown {
                        display: flex;
                        gap: 12px;
                        justify-content: center;
                        margin: 1.5rem 0;
                    }
                    .countdown-unit {
                        background: rgba(30, 144, 255, 0.1);
                        border: 1px solid rgba(30, 144, 255, 0.3);
                        border-radius: 12px;
                        padding: 12px 16px;
                        min-width: 72px;
                        text-align: center;
                    }
                    .countdown-value {
                        display: block;
                        font-size: 2rem;
                        font-weight: bold;
                        color: #fff;
                        font-variant-numeric: tabular-nums;
                    }
                    .countdown-label {
                        font-size: 0.8rem;
                        color: #999;
                        text-transform: uppercase;
                    }
                    .countdown-over {
                        color: #7EB2FF;
                        font-weight: bold;
                    }
                "#}
            </style>
            { unit(left.days, "dias") }
            { unit(left.hours, "horas") }
            { unit(left.minutes, "min") }
            { unit(left.seconds, "seg") }
        </div>
    }
}
