use chrono::Utc;
use log::{error, info};
use serde_json::json;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::floating_cta::FORM_ANCHOR;
use crate::utils::analytics::{AnalyticsLog, Gender};
use crate::utils::device::current_device;
use crate::utils::events::EventLog;
use crate::utils::geolocation::LocationCache;
use crate::utils::lead::{self, submit_lead, Crm, FieldErrors, Lead, LeadField, LeadForm, LeadsPerMonth, WebhookPayload};
use crate::utils::tracking;

pub const SUBMIT_ERROR: &str = "Não foi possível concluir sua inscrição. Tente novamente em instantes.";

#[derive(Properties, PartialEq)]
pub struct WebinarFormProps {
    pub visit_id: Option<String>,
    pub on_success: Callback<Lead>,
    pub on_error: Callback<String>,
}

/// Everything that happens locally once the webhook accepted the lead.
fn record_signup(lead: &Lead, visit_id: &str) {
    let now = Utc::now();
    let cache = LocationCache::browser();
    let location = cache.cached(now).map(|c| c.location());
    AnalyticsLog::browser().track_form_completion(
        visit_id,
        now,
        current_device(),
        location,
        lead.demographics(),
    );
    cache.add_to_pool(Some(&lead.name), now);

    tracking::track_standard(
        "Lead",
        &json!({ "content_name": "Webinar Signup", "content_category": "webinar" }),
    );
    tracking::track_lead_confirmed();
}

#[function_component(WebinarForm)]
pub fn webinar_form(props: &WebinarFormProps) -> Html {
    let form = use_state(LeadForm::default);
    let errors = use_state(FieldErrors::new);
    let submitting = use_state(|| false);
    let started = use_mut_ref(|| false);

    let on_text = |field: LeadField| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.set(field, input.value());
            form.set(next);
        })
    };

    let on_select = |field: LeadField| {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.set(field, select.value());
            form.set(next);
        })
    };

    let on_focus = |field: LeadField| {
        let started = started.clone();
        let visit_id = props.visit_id.clone();
        Callback::from(move |_: FocusEvent| {
            let now = Utc::now();
            EventLog::browser().track_form_field_focus(field.key(), now);
            if !*started.borrow() {
                *started.borrow_mut() = true;
                AnalyticsLog::browser().track_form_start(visit_id.as_deref().unwrap_or_default(), now);
                info!("Form started");
            }
        })
    };

    let onsubmit = {
        let form = form.clone();
        let errors = errors.clone();
        let submitting = submitting.clone();
        let visit_id = props.visit_id.clone();
        let on_success = props.on_success.clone();
        let on_error = props.on_error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }
            let lead = match lead::validate(&form) {
                Ok(lead) => lead,
                Err(field_errors) => {
                    errors.set(field_errors);
                    return;
                }
            };
            errors.set(FieldErrors::new());
            submitting.set(true);

            let now = Utc::now();
            let page_url = window()
                .and_then(|w| w.location().href().ok())
                .unwrap_or_default();
            let payload = WebhookPayload::new(&lead, AnalyticsLog::browser().session_id(now), page_url, now);

            let form = form.clone();
            let submitting = submitting.clone();
            let visit_id = visit_id.clone();
            let on_success = on_success.clone();
            let on_error = on_error.clone();
            spawn_local(async move {
                match submit_lead(&payload).await {
                    Ok(()) => {
                        info!("Lead submitted");
                        record_signup(&lead, visit_id.as_deref().unwrap_or_default());
                        form.set(LeadForm::default());
                        on_success.emit(lead);
                    }
                    Err(e) => {
                        error!("Lead submission failed: {}", e);
                        on_error.emit(SUBMIT_ERROR.to_string());
                    }
                }
                submitting.set(false);
            });
        })
    };

    let error_for = |field: LeadField| -> Html {
        match errors.get(&field) {
            Some(message) => html! { <span class="field-error">{*message}</span> },
            None => html! {},
        }
    };
    let field_class = |field: LeadField| {
        classes!("form-field", errors.contains_key(&field).then_some("has-error"))
    };

    html! {
        <form id={FORM_ANCHOR} class="webinar-form" onsubmit={onsubmit} novalidate={true}>
            <style>
                {r#"
                    .webinar-form {
                        background: rgba(26, 26, 26, 0.9);
                        backdrop-filter: blur(10px);
                        border: 1px solid rgba(30, 144, 255, 0.2);
                        border-radius: 16px;
                        padding: 2rem;
                        display: flex;
                        flex-direction: column;
                        gap: 1rem;
                        scroll-margin-top: 24px;
                    }
                    .webinar-form h3 {
                        margin: 0;
                        color: #fff;
                        font-size: 1.4rem;
                    }
                    .form-field {
                        display: flex;
                        flex-direction: column;
                        gap: 6px;
                    }
                    .form-field label {
                        color: #bbb;
                        font-size: 0.9rem;
                    }
                    .form-field input, .form-field select {
                        padding: 12px 14px;
                        border-radius: 8px;
                        border: 1px solid rgba(255,255,255,0.15);
                        background: rgba(0,0,0,0.3);
                        color: #fff;
                        font-size: 1rem;
                    }
                    .form-field input:focus, .form-field select:focus {
                        outline: none;
                        border-color: #1E90FF;
                    }
                    .form-field.has-error input, .form-field.has-error select {
                        border-color: #ff6b6b;
                    }
                    .field-error {
                        color: #ff6b6b;
                        font-size: 0.8rem;
                    }
                    .form-row {
                        display: grid;
                        grid-template-columns: 1fr 1fr;
                        gap: 1rem;
                    }
                    .submit-button {
                        background: linear-gradient(45deg, #1E90FF, #4169E1);
                        color: #fff;
                        border: none;
                        border-radius: 8px;
                        padding: 16px;
                        font-size: 1.1rem;
                        font-weight: bold;
                        cursor: pointer;
                        transition: transform 0.2s ease;
                    }
                    .submit-button:hover { transform: translateY(-2px); }
                    .submit-button:disabled {
                        opacity: 0.6;
                        cursor: wait;
                        transform: none;
                    }
                    .form-privacy {
                        color: #777;
                        font-size: 0.8rem;
                        text-align: center;
                    }
                    @media (max-width: 600px) {
                        .form-row { grid-template-columns: 1fr; }
                    }
                "#}
            </style>
            <h3>{"Garanta sua vaga gratuita"}</h3>

            <div class={field_class(LeadField::Name)}>
                <label for="lead-name">{"Nome completo *"}</label>
                <input id="lead-name" type="text" autocomplete="name"
                    value={form.name.clone()}
                    oninput={on_text(LeadField::Name)}
                    onfocus={on_focus(LeadField::Name)} />
                { error_for(LeadField::Name) }
            </div>

            <div class={field_class(LeadField::Email)}>
                <label for="lead-email">{"Email corporativo *"}</label>
                <input id="lead-email" type="email" autocomplete="email"
                    value={form.email.clone()}
                    oninput={on_text(LeadField::Email)}
                    onfocus={on_focus(LeadField::Email)} />
                { error_for(LeadField::Email) }
            </div>

            <div class={field_class(LeadField::Whatsapp)}>
                <label for="lead-whatsapp">{"WhatsApp com DDD *"}</label>
                <input id="lead-whatsapp" type="tel" autocomplete="tel" placeholder="(11) 98765-4321"
                    value={form.whatsapp.clone()}
                    oninput={on_text(LeadField::Whatsapp)}
                    onfocus={on_focus(LeadField::Whatsapp)} />
                { error_for(LeadField::Whatsapp) }
            </div>

            <div class={field_class(LeadField::Company)}>
                <label for="lead-company">{"Empresa *"}</label>
                <input id="lead-company" type="text" autocomplete="organization"
                    value={form.company.clone()}
                    oninput={on_text(LeadField::Company)}
                    onfocus={on_focus(LeadField::Company)} />
                { error_for(LeadField::Company) }
            </div>

            <div class="form-row">
                <div class={field_class(LeadField::Crm)}>
                    <label for="lead-crm">{"CRM utilizado *"}</label>
                    <select id="lead-crm" onchange={on_select(LeadField::Crm)} onfocus={on_focus(LeadField::Crm)}>
                        <option value="" selected={form.crm.is_empty()}>{"Selecione"}</option>
                        { for Crm::ALL.iter().map(|crm| html! {
                            <option value={crm.value()} selected={form.crm == crm.value()}>{crm.label()}</option>
                        }) }
                    </select>
                    { error_for(LeadField::Crm) }
                </div>

                <div class={field_class(LeadField::LeadsPerMonth)}>
                    <label for="lead-volume">{"Leads por mês *"}</label>
                    <select id="lead-volume" onchange={on_select(LeadField::LeadsPerMonth)} onfocus={on_focus(LeadField::LeadsPerMonth)}>
                        <option value="" selected={form.leads_per_month.is_empty()}>{"Selecione"}</option>
                        { for LeadsPerMonth::ALL.iter().map(|volume| html! {
                            <option value={volume.value()} selected={form.leads_per_month == volume.value()}>{volume.label()}</option>
                        }) }
                    </select>
                    { error_for(LeadField::LeadsPerMonth) }
                </div>
            </div>

            <div class="form-row">
                <div class={field_class(LeadField::Gender)}>
                    <label for="lead-gender">{"Gênero (opcional)"}</label>
                    <select id="lead-gender" onchange={on_select(LeadField::Gender)} onfocus={on_focus(LeadField::Gender)}>
                        <option value="" selected={form.gender.is_empty()}>{"Prefiro não responder"}</option>
                        { for Gender::ALL.iter().map(|gender| html! {
                            <option value={gender.value()} selected={form.gender == gender.value()}>{gender.label()}</option>
                        }) }
                    </select>
                    { error_for(LeadField::Gender) }
                </div>

                <div class={field_class(LeadField::Age)}>
                    <label for="lead-age">{"Idade (opcional)"}</label>
                    <input id="lead-age" type="number" min="18" max="120"
                        value={form.age.clone()}
                        oninput={on_text(LeadField::Age)}
                        onfocus={on_focus(LeadField::Age)} />
                    { error_for(LeadField::Age) }
                </div>
            </div>

            <button type="submit" class="submit-button" disabled={*submitting}>
                { if *submitting { "Enviando..." } else { "Quero participar gratuitamente" } }
            </button>
            <p class="form-privacy">{"Seus dados estão seguros. Não enviamos spam."}</p>
        </form>
    }
}
