use chrono::Utc;
use yew::prelude::*;

use crate::components::countdown::Countdown;
use crate::components::floating_cta::{cta_callback, FloatingCta};
use crate::components::notification::{LiveSignup, SignupNotifications};
use crate::components::page_tracking::{use_page_tracking, use_scroll_milestones};
use crate::components::success_modal::SuccessModal;
use crate::components::toast::{Toast, ToastMessage};
use crate::components::webinar_form::WebinarForm;
use crate::pages::faq::Faq;
use crate::pages::sections::{Audience, Benefits, Instructor};
use crate::utils::admin_config::AdminStore;
use crate::utils::geolocation::LocationCache;
use crate::utils::lead::Lead;
use crate::utils::social_proof::live_notification;
use crate::utils::webinar::{
    filled_percentage, format_webinar_date, remaining_spots, DURATION_MINUTES, FILLED_SPOTS,
    TOTAL_SPOTS, WEBINAR_TITLE,
};

struct Testimonial {
    quote: &'static str,
    name: &'static str,
    role: &'static str,
}

const TESTIMONIALS: [Testimonial; 3] = [
    Testimonial {
        quote: "Reorganizamos a qualificação em duas semanas e o time comercial parou de correr atrás de lead frio.",
        name: "Juliana Martins",
        role: "Head de Vendas, SaaS B2B",
    },
    Testimonial {
        quote: "O funil ficou claro pela primeira vez. Hoje sabemos exatamente quando um lead vai para o SDR.",
        name: "Ricardo Alves",
        role: "Diretor Comercial, Indústria",
    },
    Testimonial {
        quote: "Dobramos a taxa de reuniões agendadas sem aumentar o investimento em mídia.",
        name: "Camila Rocha",
        role: "Gerente de Marketing, Serviços",
    },
];

const RESULTS: [(&str, &str); 3] = [
    ("+62%", "de reuniões qualificadas"),
    ("-40%", "de tempo gasto com leads frios"),
    ("2x", "mais conversão do MQL para venda"),
];

#[function_component]
pub fn Home() -> Html {
    let schedule = use_state(|| AdminStore::browser().load_config().webinar);
    let visit_id = use_page_tracking();
    use_scroll_milestones();

    let toast = use_state(|| None::<ToastMessage>);
    let signed_up = use_state(|| None::<Option<String>>);
    let live_signup = use_state(|| None::<LiveSignup>);

    let on_success = {
        let signed_up = signed_up.clone();
        let live_signup = live_signup.clone();
        Callback::from(move |lead: Lead| {
            let city = LocationCache::browser()
                .cached(Utc::now())
                .map(|c| c.location().display());
            let seq = (*live_signup).as_ref().map_or(0, |l| l.seq + 1);
            live_signup.set(Some(LiveSignup {
                seq,
                notice: live_notification(lead.first_name(), city.as_deref()),
            }));
            signed_up.set(Some(Some(lead.first_name().to_string())));
        })
    };

    let on_error = {
        let toast = toast.clone();
        Callback::from(move |message: String| toast.set(Some(ToastMessage::error(message))))
    };

    let close_toast = {
        let toast = toast.clone();
        Callback::from(move |_: ()| toast.set(None))
    };

    let close_modal = {
        let signed_up = signed_up.clone();
        Callback::from(move |_: ()| signed_up.set(None))
    };

    let when = format_webinar_date(&schedule, Utc::now());

    html! {
        <div class="home-page">
            <Toast message={(*toast).clone()} on_close={close_toast} />
            <SignupNotifications live={(*live_signup).clone()} />
            <FloatingCta />
            {
                if let Some(first_name) = &*signed_up {
                    html! {
                        <SuccessModal
                            schedule={(*schedule).clone()}
                            first_name={first_name.clone()}
                            on_close={close_modal}
                        />
                    }
                } else {
                    html! {}
                }
            }

            <section class="hero">
                <div class="hero-copy">
                    <span class="hero-tag">{format!("Webinar gratuito · {}", when)}</span>
                    <h1>{WEBINAR_TITLE}</h1>
                    <p class="hero-subtitle">
                        {format!(
                            "Em {} minutos, mostramos o processo que empresas B2B usam para separar curiosos de compradores e entregar ao comercial só os leads prontos para conversar.",
                            DURATION_MINUTES
                        )}
                    </p>
                    <ul class="trust-badges">
                        <li>{"100% gratuito"}</li>
                        <li>{"Ao vivo, com perguntas"}</li>
                        <li>{"Vagas limitadas"}</li>
                    </ul>
                    <Countdown schedule={(*schedule).clone()} />
                </div>
                <div class="hero-form">
                    <WebinarForm
                        visit_id={(*visit_id).clone()}
                        on_success={on_success}
                        on_error={on_error}
                    />
                </div>
            </section>

            <Benefits />

            <section class="urgency">
                <h2>{"As vagas estão acabando"}</h2>
                <p>{format!("Restam apenas {} de {} vagas para esta turma.", remaining_spots(), TOTAL_SPOTS)}</p>
                <div class="spots-bar" aria-label={format!("{} de {} vagas preenchidas", FILLED_SPOTS, TOTAL_SPOTS)}>
                    <div class="spots-fill" style={format!("width: {:.0}%;", filled_percentage())}></div>
                </div>
                <span class="spots-caption">{format!("{:.0}% das vagas preenchidas", filled_percentage())}</span>
                <div class="results">
                    { for RESULTS.iter().map(|(value, label)| html! {
                        <div class="result-card">
                            <strong>{*value}</strong>
                            <span>{*label}</span>
                        </div>
                    }) }
                </div>
            </section>

            <section class="testimonials">
                <h2>{"Quem aplicou, aprovou"}</h2>
                <div class="testimonial-grid">
                    { for TESTIMONIALS.iter().map(|t| html! {
                        <figure class="testimonial">
                            <blockquote>{format!("\u{201c}{}\u{201d}", t.quote)}</blockquote>
                            <figcaption>
                                <strong>{t.name}</strong>
                                <span>{t.role}</span>
                            </figcaption>
                        </figure>
                    }) }
                </div>
            </section>

            <Audience />

            <Instructor />

            <Faq />

            <section class="final-cta">
                <h2>{"Pronto para qualificar melhor seus leads?"}</h2>
                <p>{format!("Garanta sua vaga para {}.", when)}</p>
                <button class="final-cta-button" onclick={cta_callback("Quero minha vaga", "final")}>
                    {"Quero minha vaga"}
                </button>
            </section>

            <style>
                {r#"
                .home-page {
                    min-height: 100vh;
                    background: #1a1a1a;
                    color: #fff;
                    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
                }

                .hero {
                    display: grid;
                    grid-template-columns: 1.2fr 1fr;
                    gap: 3rem;
                    max-width: 1200px;
                    margin: 0 auto;
                    padding: 6rem 2rem 4rem;
                    align-items: start;
                }

                .hero-tag {
                    display: inline-block;
                    background: rgba(30, 144, 255, 0.15);
                    color: #7EB2FF;
                    padding: 6px 14px;
                    border-radius: 999px;
                    font-size: 0.9rem;
                    margin-bottom: 1.5rem;
                }

                .hero h1 {
                    font-size: 3.2rem;
                    line-height: 1.1;
                    margin: 0 0 1.5rem;
                    background: linear-gradient(45deg, #fff, #7EB2FF);
                    -webkit-background-clip: text;
                    -webkit-text-fill-color: transparent;
                }

                .hero-subtitle {
                    font-size: 1.2rem;
                    color: #999;
                    line-height: 1.6;
                }

                .trust-badges {
                    display: flex;
                    flex-wrap: wrap;
                    gap: 12px;
                    list-style: none;
                    padding: 0;
                    margin: 1.5rem 0;
                }

                .trust-badges li {
                    border: 1px solid rgba(30, 144, 255, 0.3);
                    border-radius: 8px;
                    padding: 6px 12px;
                    font-size: 0.9rem;
                    color: #ddd;
                }

                .urgency, .testimonials, .final-cta {
                    max-width: 1000px;
                    margin: 0 auto;
                    padding: 4rem 2rem;
                    text-align: center;
                }

                .urgency h2, .testimonials h2, .final-cta h2 {
                    font-size: 2.5rem;
                    margin-bottom: 1rem;
                }

                .urgency p, .final-cta p {
                    color: #999;
                    font-size: 1.1rem;
                }

                .spots-bar {
                    height: 14px;
                    background: rgba(255, 255, 255, 0.08);
                    border-radius: 999px;
                    overflow: hidden;
                    max-width: 600px;
                    margin: 1.5rem auto 0.5rem;
                }

                .spots-fill {
                    height: 100%;
                    background: linear-gradient(90deg, #ff9f43, #ff6b6b);
                }

                .spots-caption {
                    color: #ff9f43;
                    font-size: 0.9rem;
                }

                .results {
                    display: grid;
                    grid-template-columns: repeat(3, 1fr);
                    gap: 1.5rem;
                    margin-top: 3rem;
                }

                .result-card {
                    background: rgba(30, 30, 30, 0.7);
                    border: 1px solid rgba(30, 144, 255, 0.1);
                    border-radius: 12px;
                    padding: 1.5rem;
                }

                .result-card strong {
                    display: block;
                    font-size: 2.2rem;
                    color: #1E90FF;
                }

                .result-card span {
                    color: #999;
                }

                .testimonial-grid {
                    display: grid;
                    grid-template-columns: repeat(3, 1fr);
                    gap: 1.5rem;
                    margin-top: 2rem;
                    text-align: left;
                }

                .testimonial {
                    margin: 0;
                    background: rgba(26, 26, 26, 0.85);
                    border: 1px solid rgba(30, 144, 255, 0.1);
                    border-radius: 12px;
                    padding: 1.5rem;
                }

                .testimonial blockquote {
                    margin: 0 0 1rem;
                    color: #ddd;
                    line-height: 1.6;
                }

                .testimonial figcaption strong {
                    display: block;
                }

                .testimonial figcaption span {
                    color: #777;
                    font-size: 0.9rem;
                }

                .final-cta-button {
                    margin-top: 1.5rem;
                    background: linear-gradient(45deg, #1E90FF, #4169E1);
                    color: #fff;
                    border: none;
                    border-radius: 8px;
                    padding: 16px 36px;
                    font-size: 1.2rem;
                    font-weight: bold;
                    cursor: pointer;
                }

                @media (max-width: 900px) {
                    .hero {
                        grid-template-columns: 1fr;
                        padding: 3rem 1rem;
                    }

                    .hero h1 {
                        font-size: 2.3rem;
                    }

                    .results, .testimonial-grid {
                        grid-template-columns: 1fr;
                    }
                }
                "#}
            </style>
        </div>
    }
}
