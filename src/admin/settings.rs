use log::{error, info};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::toast::ToastMessage;
use crate::utils::admin_config::{validate_new_password, AdminStore, TrackingIds};
use crate::utils::webinar::{format_long_date, WebinarSchedule};

#[derive(Properties, PartialEq)]
pub struct SettingsProps {
    pub on_notify: Callback<ToastMessage>,
}

fn input_value(e: &InputEvent) -> String {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value()
}

#[derive(Clone, Copy, PartialEq)]
enum DateField {
    Ano,
    Mes,
    Dia,
    Hora,
    Minuto,
}

impl DateField {
    const ALL: [DateField; 5] = [
        DateField::Dia,
        DateField::Mes,
        DateField::Ano,
        DateField::Hora,
        DateField::Minuto,
    ];

    fn label(&self) -> &'static str {
        match self {
            DateField::Ano => "Ano",
            DateField::Mes => "Mês",
            DateField::Dia => "Dia",
            DateField::Hora => "Hora",
            DateField::Minuto => "Minuto",
        }
    }

    fn bounds(&self) -> (i32, i32) {
        match self {
            DateField::Ano => (2024, 2100),
            DateField::Mes => (1, 12),
            DateField::Dia => (1, 31),
            DateField::Hora => (0, 23),
            DateField::Minuto => (0, 59),
        }
    }

    fn get(&self, s: &WebinarSchedule) -> i32 {
        match self {
            DateField::Ano => s.ano,
            DateField::Mes => s.mes as i32,
            DateField::Dia => s.dia as i32,
            DateField::Hora => s.hora as i32,
            DateField::Minuto => s.minuto as i32,
        }
    }

    fn set(&self, s: &mut WebinarSchedule, value: i32) {
        let unsigned = value.max(0) as u32;
        match self {
            DateField::Ano => s.ano = value,
            DateField::Mes => s.mes = unsigned,
            DateField::Dia => s.dia = unsigned,
            DateField::Hora => s.hora = unsigned,
            DateField::Minuto => s.minuto = unsigned,
        }
    }
}

#[function_component]
pub fn WebinarSettings(props: &SettingsProps) -> Html {
    let draft = use_state(|| AdminStore::browser().load_config().webinar);

    let on_save = {
        let draft = draft.clone();
        let on_notify = props.on_notify.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if !draft.is_valid() {
                on_notify.emit(ToastMessage::error("Data ou horário inválido".to_string()));
                return;
            }
            let store = AdminStore::browser();
            let mut config = store.load_config();
            config.webinar = (*draft).clone();
            match store.save_config(&config) {
                Ok(()) => {
                    info!("Webinar date updated to {}", format_long_date(&draft));
                    on_notify.emit(ToastMessage::success("Data do webinar salva".to_string()));
                }
                Err(e) => {
                    error!("Failed to save webinar date: {}", e);
                    on_notify.emit(ToastMessage::error("Não foi possível salvar a data".to_string()));
                }
            }
        })
    };

    let preview = if draft.is_valid() {
        format!("{} às {}", format_long_date(&draft), draft.time_label())
    } else {
        "Data inválida".to_string()
    };

    html! {
        <form class="settings-card" onsubmit={on_save}>
            <h3>{"Data do webinar"}</h3>
            <p class="settings-hint">{"Horário de Brasília. A contagem regressiva e as páginas usam esta data."}</p>
            <div class="date-grid">
                { for DateField::ALL.iter().map(|field| {
                    let field = *field;
                    let (min, max) = field.bounds();
                    let oninput = {
                        let draft = draft.clone();
                        Callback::from(move |e: InputEvent| {
                            if let Ok(value) = input_value(&e).trim().parse::<i32>() {
                                let mut next = (*draft).clone();
                                field.set(&mut next, value);
                                draft.set(next);
                            }
                        })
                    };
                    html! {
                        <label>
                            <span>{field.label()}</span>
                            <input
                                type="number"
                                min={min.to_string()}
                                max={max.to_string()}
                                value={field.get(&draft).to_string()}
                                {oninput}
                            />
                        </label>
                    }
                }) }
            </div>
            <p class={classes!("preview", (!draft.is_valid()).then_some("invalid"))}>{preview}</p>
            <button type="submit">{"Salvar data"}</button>
        </form>
    }
}

#[function_component]
pub fn TrackingSettings(props: &SettingsProps) -> Html {
    let draft = use_state(|| AdminStore::browser().load_config().tracking);

    let field = |label: &'static str, placeholder: &'static str, value: String, apply: fn(&mut TrackingIds, String)| {
        let draft = draft.clone();
        let oninput = Callback::from(move |e: InputEvent| {
            let mut next = (*draft).clone();
            apply(&mut next, input_value(&e).trim().to_string());
            draft.set(next);
        });
        html! {
            <label class="tracking-field">
                <span>{label}</span>
                <input type="text" {placeholder} {value} {oninput} />
            </label>
        }
    };

    let on_save = {
        let draft = draft.clone();
        let on_notify = props.on_notify.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let store = AdminStore::browser();
            let mut config = store.load_config();
            config.tracking = (*draft).clone();
            match store.save_config(&config) {
                Ok(()) => on_notify.emit(ToastMessage::success(
                    "IDs salvos. Recarregue a página inicial para aplicar.".to_string(),
                )),
                Err(e) => {
                    error!("Failed to save tracking ids: {}", e);
                    on_notify.emit(ToastMessage::error("Não foi possível salvar os IDs".to_string()));
                }
            }
        })
    };

    html! {
        <form class="settings-card" onsubmit={on_save}>
            <h3>{"Pixels e tags"}</h3>
            <p class="settings-hint">{"Quando o Google Tag Manager estiver configurado, o Google Analytics é carregado por ele."}</p>
            { field("Meta Ads Pixel ID", "123456789012345", draft.meta_ads_pixel_id.clone(), |t, v| t.meta_ads_pixel_id = v) }
            { field("Google Ads Conversion ID", "AW-123456789", draft.google_ads_conversion_id.clone(), |t, v| t.google_ads_conversion_id = v) }
            { field("Google Analytics ID", "G-XXXXXXXXXX", draft.google_analytics_id.clone(), |t, v| t.google_analytics_id = v) }
            { field("Google Tag Manager ID", "GTM-XXXXXXX", draft.google_tag_manager_id.clone(), |t, v| t.google_tag_manager_id = v) }
            <button type="submit">{"Salvar IDs"}</button>
        </form>
    }
}

#[function_component]
pub fn PasswordSettings(props: &SettingsProps) -> Html {
    let current = use_state(String::new);
    let new = use_state(String::new);
    let confirm = use_state(String::new);

    let bind = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |e: InputEvent| handle.set(input_value(&e)))
    };

    let on_save = {
        let current = current.clone();
        let new = new.clone();
        let confirm = confirm.clone();
        let on_notify = props.on_notify.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let result = validate_new_password(&new, &confirm)
                .and_then(|_| AdminStore::browser().change_password(&current, &new));
            match result {
                Ok(()) => {
                    info!("Admin password changed");
                    current.set(String::new());
                    new.set(String::new());
                    confirm.set(String::new());
                    on_notify.emit(ToastMessage::success("Senha alterada com sucesso".to_string()));
                }
                Err(e) => on_notify.emit(ToastMessage::error(e.to_string())),
            }
        })
    };

    html! {
        <form class="settings-card" onsubmit={on_save}>
            <h3>{"Alterar senha"}</h3>
            <label class="tracking-field">
                <span>{"Senha atual"}</span>
                <input type="password" value={(*current).clone()} oninput={bind(&current)} />
            </label>
            <label class="tracking-field">
                <span>{"Nova senha"}</span>
                <input type="password" value={(*new).clone()} oninput={bind(&new)} />
            </label>
            <label class="tracking-field">
                <span>{"Confirmar nova senha"}</span>
                <input type="password" value={(*confirm).clone()} oninput={bind(&confirm)} />
            </label>
            <button type="submit">{"Alterar senha"}</button>
        </form>
    }
}
