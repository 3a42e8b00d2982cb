use chrono::Utc;
use web_sys::window;
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::utils::events::EventLog;
use crate::utils::webinar::{format_long_date, thank_you_countdown, WebinarSchedule, WEBINAR_TITLE};

const SHARE_TEXT: &str = "Acabei de garantir minha vaga no webinar \"Do Inbound Tumultuado ao Comercial Qualificado\". Vem também!";

#[derive(Clone, Debug, PartialEq)]
pub struct ShareLinks {
    pub x: String,
    pub linkedin: String,
}

pub fn share_links(page_url: &str) -> ShareLinks {
    let url = urlencoding::encode(page_url);
    ShareLinks {
        x: format!(
            "https://twitter.com/intent/tweet?text={}&url={}",
            urlencoding::encode(SHARE_TEXT),
            url
        ),
        linkedin: format!("https://www.linkedin.com/sharing/share-offsite/?url={}", url),
    }
}

#[derive(Properties, PartialEq)]
pub struct ThankYouContentProps {
    pub schedule: WebinarSchedule,
    #[prop_or_default]
    pub first_name: Option<String>,
}

#[function_component(ThankYouContent)]
pub fn thank_you_content(props: &ThankYouContentProps) -> Html {
    let now = use_state(Utc::now);
    {
        let now = now.clone();
        use_interval(move || now.set(Utc::now()), 60_000);
    }

    let target = props.schedule.datetime().with_timezone(&Utc);
    let countdown = thank_you_countdown(target, *now);
    let origin = window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    let links = share_links(&format!("{}/", origin));
    let share_click = |network: &'static str| {
        Callback::from(move |_: MouseEvent| {
            EventLog::browser().track_button_click(network, "compartilhar", Utc::now());
        })
    };
    let greeting = match &props.first_name {
        Some(name) => format!("Parabéns, {}! Sua vaga está garantida", name),
        None => "Parabéns! Sua vaga está garantida".to_string(),
    };

    html! {
        <div class="thank-you-content">
            <style>
                {r#"
                    .thank-you-content {
                        text-align: center;
                        color: #fff;
                    }
                    .thank-you-content h2 {
                        font-size: 2rem;
                        margin-bottom: 0.5rem;
                        background: linear-gradient(45deg, #fff, #7EB2FF);
                        -webkit-background-clip: text;
                        -webkit-text-fill-color: transparent;
                    }
                    .thank-you-date {
                        color: #7EB2FF;
                        font-size: 1.1rem;
                        margin-bottom: 1.5rem;
                    }
                    .thank-you-countdown {
                        display: inline-block;
                        background: rgba(30, 144, 255, 0.1);
                        border: 1px solid rgba(30, 144, 255, 0.3);
                        border-radius: 12px;
                        padding: 12px 24px;
                        font-size: 1.5rem;
                        font-weight: bold;
                        margin-bottom: 2rem;
                    }
                    .thank-you-steps {
                        text-align: left;
                        max-width: 480px;
                        margin: 0 auto 2rem;
                        padding: 0;
                        list-style: none;
                    }
                    .thank-you-steps li {
                        color: #bbb;
                        padding: 0.6rem 0 0.6rem 2rem;
                        position: relative;
                    }
                    .thank-you-steps li::before {
                        content: '✓';
                        position: absolute;
                        left: 0.5rem;
                        color: #1E90FF;
                    }
                    .whatsapp-card {
                        background: rgba(37, 211, 102, 0.1);
                        border: 1px solid rgba(37, 211, 102, 0.3);
                        border-radius: 12px;
                        padding: 1rem 1.5rem;
                        max-width: 480px;
                        margin: 0 auto 2rem;
                        color: #ddd;
                    }
                    .share-buttons {
                        display: flex;
                        gap: 12px;
                        justify-content: center;
                        flex-wrap: wrap;
                    }
                    .share-buttons a {
                        padding: 10px 20px;
                        border-radius: 8px;
                        color: #fff;
                        text-decoration: none;
                        font-weight: bold;
                    }
                    .share-x { background: #000; border: 1px solid #333; }
                    .share-linkedin { background: #0a66c2; }
                "#}
            </style>
            <h2>{greeting}</h2>
            <p>{WEBINAR_TITLE}</p>
            <p class="thank-you-date">{format_long_date(&props.schedule)}</p>
            <div class="thank-you-countdown">{countdown}</div>

            <h3>{"Próximos passos"}</h3>
            <ul class="thank-you-steps">
                <li>{"Confira seu email: o link de acesso chega por lá."}</li>
                <li>{"Adicione o evento à sua agenda para não esquecer."}</li>
                <li>{"Separe 45 minutos sem interrupções e leve suas dúvidas."}</li>
            </ul>

            <div class="whatsapp-card">
                <strong>{"Lembrete pelo WhatsApp"}</strong>
                <p>{"Vamos enviar um lembrete no número informado 1 hora antes do início."}</p>
            </div>

            <h3>{"Convide alguém do seu time"}</h3>
            <div class="share-buttons">
                <a class="share-x" href={links.x} target="_blank" rel="noopener noreferrer" onclick={share_click("X")}>{"Compartilhar no X"}</a>
                <a class="share-linkedin" href={links.linkedin} target="_blank" rel="noopener noreferrer" onclick={share_click("LinkedIn")}>{"Compartilhar no LinkedIn"}</a>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_links_are_url_encoded() {
        let links = share_links("https://webinar.exemplo.com/");
        assert!(links
            .linkedin
            .ends_with("?url=https%3A%2F%2Fwebinar.exemplo.com%2F"));
        assert!(links.x.starts_with("https://twitter.com/intent/tweet?text=Acabei%20de"));
        assert!(links.x.contains("&url=https%3A%2F%2Fwebinar.exemplo.com%2F"));
    }
}
