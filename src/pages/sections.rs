use yew::prelude::*;

use crate::components::floating_cta::cta_callback;

const BENEFITS: [(&str, &str); 5] = [
    (
        "Como identificar exatamente quanto você está perdendo em leads",
        "Calculadora prática e diagnóstico ao vivo",
    ),
    (
        "O framework que usa IA para qualificar automaticamente",
        "Enquanto seu time atende quem já está pronto para comprar",
    ),
    (
        "Como triplicar leads qualificados sem contratar mais SDRs",
        "Case real: de 30 para 90 reuniões por semana em 60 dias",
    ),
    (
        "Integração com HubSpot, Pipedrive ou RD Station",
        "Conecta em 10 minutos e começa no mesmo dia",
    ),
    (
        "Plano de ação de 30 dias para implementar",
        "Saiba exatamente por onde começar",
    ),
];

const FOR_YOU: [&str; 6] = [
    "Investe em conteúdo, SEO e webinars (inbound marketing)",
    "Gera 50+ leads por mês, mas qualifica menos de 30%",
    "Tem CRM (HubSpot, Pipedrive, RD Station, Salesforce...)",
    "Está cansado de ver o SDR fazendo trabalho manual e repetitivo",
    "Tem faturamento entre R$2M e R$20M",
    "Quer escalar sem aumentar o custo na mesma proporção",
];

const NOT_FOR_YOU: [&str; 3] = [
    "Você vende 100% por outbound frio, sem inbound",
    "Gera menos de 30 leads por mês",
    "Está satisfeito com a estrutura comercial atual",
];

#[function_component(Benefits)]
pub fn benefits() -> Html {
    html! {
        <section class="benefits-section">
            <h2>{"O que você vai aprender"}</h2>
            <div class="benefit-grid">
                { for BENEFITS.iter().enumerate().map(|(i, (title, description))| html! {
                    <div class="benefit-card">
                        <span class="benefit-number">{format!("{:02}", i + 1)}</span>
                        <h3>{*title}</h3>
                        <p>{*description}</p>
                    </div>
                }) }
            </div>
            <style>
                {r#"
                .benefits-section {
                    max-width: 1100px;
                    margin: 0 auto;
                    padding: 4rem 2rem;
                }
                .benefits-section h2 {
                    font-size: 2.5rem;
                    text-align: center;
                    margin-bottom: 2rem;
                }
                .benefit-grid {
                    display: grid;
                    grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
                    gap: 1.5rem;
                }
                .benefit-card {
                    background: rgba(30, 30, 30, 0.7);
                    border: 1px solid rgba(30, 144, 255, 0.1);
                    border-radius: 12px;
                    padding: 1.5rem;
                    transition: border-color 0.3s ease;
                }
                .benefit-card:hover {
                    border-color: rgba(30, 144, 255, 0.4);
                }
                .benefit-number {
                    color: #1E90FF;
                    font-weight: bold;
                    font-size: 1.4rem;
                }
                .benefit-card h3 {
                    margin: 0.5rem 0;
                    font-size: 1.15rem;
                }
                .benefit-card p {
                    color: #999;
                    margin: 0;
                }
                "#}
            </style>
        </section>
    }
}

#[function_component(Audience)]
pub fn audience() -> Html {
    html! {
        <section class="audience-section">
            <h2>{"Esse webinar é para você?"}</h2>
            <div class="audience-grid">
                <div class="audience-card audience-yes">
                    <h3>{"É para você se:"}</h3>
                    <ul>
                        { for FOR_YOU.iter().map(|item| html! { <li>{*item}</li> }) }
                    </ul>
                </div>
                <div class="audience-card audience-no">
                    <h3>{"Não é para você se:"}</h3>
                    <ul>
                        { for NOT_FOR_YOU.iter().map(|item| html! { <li>{*item}</li> }) }
                    </ul>
                </div>
            </div>
            <p class="audience-closing">{"Se você se identificou com o perfil ideal, garanta sua vaga agora."}</p>
            <button class="audience-cta" onclick={cta_callback("Garantir minha vaga", "publico")}>
                {"Garantir minha vaga"}
            </button>
            <style>
                {r#"
                .audience-section {
                    max-width: 1000px;
                    margin: 0 auto;
                    padding: 4rem 2rem;
                    text-align: center;
                }
                .audience-section h2 {
                    font-size: 2.5rem;
                    margin-bottom: 2rem;
                }
                .audience-grid {
                    display: grid;
                    grid-template-columns: 1fr 1fr;
                    gap: 1.5rem;
                    text-align: left;
                }
                .audience-card {
                    border-radius: 12px;
                    padding: 1.5rem 2rem;
                }
                .audience-yes {
                    background: rgba(46, 204, 113, 0.08);
                    border: 1px solid rgba(46, 204, 113, 0.3);
                }
                .audience-no {
                    background: rgba(255, 107, 107, 0.08);
                    border: 1px solid rgba(255, 107, 107, 0.3);
                }
                .audience-card ul {
                    list-style: none;
                    padding: 0;
                    margin: 0;
                }
                .audience-card li {
                    color: #ccc;
                    padding: 0.5rem 0 0.5rem 1.8rem;
                    position: relative;
                }
                .audience-yes li::before {
                    content: '✓';
                    position: absolute;
                    left: 0;
                    color: #2ecc71;
                }
                .audience-no li::before {
                    content: '✕';
                    position: absolute;
                    left: 0;
                    color: #ff6b6b;
                }
                .audience-closing {
                    color: #999;
                    margin-top: 2rem;
                }
                .audience-cta {
                    background: linear-gradient(45deg, #1E90FF, #4169E1);
                    color: #fff;
                    border: none;
                    border-radius: 8px;
                    padding: 14px 32px;
                    font-size: 1.1rem;
                    font-weight: bold;
                    cursor: pointer;
                }
                @media (max-width: 768px) {
                    .audience-grid {
                        grid-template-columns: 1fr;
                    }
                }
                "#}
            </style>
        </section>
    }
}

#[function_component(Instructor)]
pub fn instructor() -> Html {
    html! {
        <section class="instructor-section">
            <h2>{"Quem vai apresentar"}</h2>
            <div class="instructor-card">
                <div class="instructor-avatar">{"IA"}</div>
                <div class="instructor-bio">
                    <h3>{"Especialista em IA aplicada a vendas B2B"}</h3>
                    <p>
                        {"Mais de 20 anos em projetos digitais para grandes empresas e mais de 10 anos ajudando times comerciais a adotar dados e automação."}
                    </p>
                    <ul>
                        <li>{"MBA em Ciência de Dados e Inteligência Artificial"}</li>
                        <li>{"Consultoria e mentoria AI-First para diretores e líderes comerciais"}</li>
                        <li>{"Aceleração de IA para médias e grandes empresas"}</li>
                    </ul>
                </div>
            </div>
            <style>
                {r#"
                .instructor-section {
                    max-width: 1000px;
                    margin: 0 auto;
                    padding: 4rem 2rem;
                }
                .instructor-section h2 {
                    font-size: 2.5rem;
                    text-align: center;
                    margin-bottom: 2rem;
                }
                .instructor-card {
                    display: flex;
                    gap: 2rem;
                    align-items: center;
                    background: rgba(26, 26, 26, 0.85);
                    border: 1px solid rgba(30, 144, 255, 0.15);
                    border-radius: 16px;
                    padding: 2rem;
                }
                .instructor-avatar {
                    flex-shrink: 0;
                    width: 140px;
                    height: 140px;
                    border-radius: 50%;
                    background: linear-gradient(45deg, #1E90FF, #4169E1);
                    display: flex;
                    align-items: center;
                    justify-content: center;
                    font-size: 2.5rem;
                    font-weight: bold;
                }
                .instructor-bio h3 {
                    margin-top: 0;
                    color: #7EB2FF;
                }
                .instructor-bio p, .instructor-bio li {
                    color: #bbb;
                    line-height: 1.6;
                }
                @media (max-width: 768px) {
                    .instructor-card {
                        flex-direction: column;
                        text-align: center;
                    }
                    .instructor-bio ul {
                        text-align: left;
                    }
                }
                "#}
            </style>
        </section>
    }
}
