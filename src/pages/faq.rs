use yew::prelude::*;

const FAQS: [(&str, &str); 5] = [
    (
        "O webinar é gratuito?",
        "Sim. A participação é 100% gratuita, basta fazer a inscrição no formulário e garantir uma das vagas.",
    ),
    (
        "Vai ter gravação?",
        "O conteúdo é pensado para ser acompanhado ao vivo, com espaço para perguntas. Por isso não garantimos o envio da gravação: reserve o horário na sua agenda.",
    ),
    (
        "Para quem é esse webinar?",
        "Para gestores comerciais, líderes de marketing e donos de empresa B2B que recebem leads pelo inbound e sentem que o time de vendas perde tempo com contatos que não estão prontos para comprar.",
    ),
    (
        "Preciso usar algum CRM específico?",
        "Não. Os processos apresentados funcionam com HubSpot, Pipedrive, RD Station, Salesforce ou qualquer outro CRM, e até mesmo com planilhas.",
    ),
    (
        "Quanto tempo dura?",
        "São 45 minutos de conteúdo prático, seguidos de uma rodada de perguntas e respostas.",
    ),
];

#[derive(Properties, PartialEq)]
struct FaqItemProps {
    question: &'static str,
    answer: &'static str,
}

#[function_component(FaqItem)]
fn faq_item(props: &FaqItemProps) -> Html {
    let open = use_state(|| false);

    let toggle = {
        let open = open.clone();
        Callback::from(move |_: MouseEvent| open.set(!*open))
    };

    html! {
        <div class={classes!("faq-item", open.then_some("open"))}>
            <button class="faq-question" onclick={toggle} aria-expanded={open.to_string()}>
                <span>{props.question}</span>
                <span class="faq-icon">{if *open { "−" } else { "+" }}</span>
            </button>
            <div class="faq-answer">
                <p>{props.answer}</p>
            </div>
        </div>
    }
}

#[function_component(Faq)]
pub fn faq() -> Html {
    html! {
        <section class="faq-section" id="faq">
            <h2>{"Perguntas frequentes"}</h2>
            { for FAQS.iter().map(|(question, answer)| html! {
                <FaqItem question={*question} answer={*answer} />
            }) }
            <style>
                {r#"
                .faq-section {
                    max-width: 820px;
                    margin: 0 auto;
                    padding: 4rem 2rem;
                }
                .faq-section h2 {
                    font-size: 2.5rem;
                    text-align: center;
                    margin: 0 0 2rem;
                }
                .faq-item {
                    border-bottom: 1px solid rgba(30, 144, 255, 0.15);
                }
                .faq-question {
                    width: 100%;
                    display: flex;
                    justify-content: space-between;
                    align-items: center;
                    gap: 1rem;
                    padding: 1.25rem 0.25rem;
                    background: none;
                    border: none;
                    color: #fff;
                    font-size: 1.15rem;
                    text-align: left;
                    cursor: pointer;
                }
                .faq-item.open .faq-question,
                .faq-question:hover {
                    color: #7EB2FF;
                }
                .faq-icon {
                    font-size: 1.4rem;
                    color: #1E90FF;
                }
                .faq-answer {
                    display: none;
                    padding: 0 0.25rem 1.25rem;
                }
                .faq-item.open .faq-answer {
                    display: block;
                }
                .faq-answer p {
                    margin: 0;
                    color: #aaa;
                    line-height: 1.6;
                }
                @media (max-width: 768px) {
                    .faq-section {
                        padding: 2rem 1rem;
                    }
                    .faq-section h2 {
                        font-size: 2rem;
                    }
                }
                "#}
            </style>
        </section>
    }
}
