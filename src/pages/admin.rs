use log::{info, warn};
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::admin::dashboard::AnalyticsDashboard;
use crate::admin::settings::{PasswordSettings, TrackingSettings, WebinarSettings};
use crate::components::toast::{Toast, ToastMessage};
use crate::utils::admin_config::AdminStore;
use crate::Route;

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Analytics,
    Webinar,
    Tracking,
    Password,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Analytics, Tab::Webinar, Tab::Tracking, Tab::Password];

    fn label(&self) -> &'static str {
        match self {
            Tab::Analytics => "Analytics",
            Tab::Webinar => "Webinar",
            Tab::Tracking => "Rastreamento",
            Tab::Password => "Senha",
        }
    }
}

#[derive(Properties, PartialEq)]
struct LoginProps {
    on_login: Callback<()>,
}

#[function_component(LoginForm)]
fn login_form(props: &LoginProps) -> Html {
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);

    let oninput = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let onsubmit = {
        let password = password.clone();
        let error = error.clone();
        let on_login = props.on_login.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if AdminStore::browser().login(&password) {
                info!("Admin logged in");
                error.set(None);
                on_login.emit(());
            } else {
                warn!("Admin login rejected");
                error.set(Some("Senha incorreta".to_string()));
                password.set(String::new());
            }
        })
    };

    html! {
        <form class="admin-login" {onsubmit}>
            <h1>{"Painel administrativo"}</h1>
            <p>{"Digite a senha para acessar. No primeiro acesso, a senha digitada passa a ser a senha do painel."}</p>
            <input
                type="password"
                placeholder="Senha"
                value={(*password).clone()}
                {oninput}
            />
            {
                if let Some(message) = &*error {
                    html! { <div class="login-error">{message.clone()}</div> }
                } else {
                    html! {}
                }
            }
            <button type="submit">{"Entrar"}</button>
            <Link<Route> to={Route::Home} classes="back-link">{"Voltar para a página"}</Link<Route>>
        </form>
    }
}

#[function_component]
pub fn Admin() -> Html {
    let authenticated = use_state(|| AdminStore::browser().is_authenticated());
    let tab = use_state(|| Tab::Analytics);
    let toast = use_state(|| None::<ToastMessage>);

    let on_login = {
        let authenticated = authenticated.clone();
        Callback::from(move |_: ()| authenticated.set(true))
    };

    let on_logout = {
        let authenticated = authenticated.clone();
        Callback::from(move |_: MouseEvent| {
            AdminStore::browser().logout();
            info!("Admin logged out");
            authenticated.set(false);
        })
    };

    let on_notify = {
        let toast = toast.clone();
        Callback::from(move |message: ToastMessage| toast.set(Some(message)))
    };

    let close_toast = {
        let toast = toast.clone();
        Callback::from(move |_: ()| toast.set(None))
    };

    let content = if !*authenticated {
        html! { <LoginForm {on_login} /> }
    } else {
        let panel = match *tab {
            Tab::Analytics => html! { <AnalyticsDashboard /> },
            Tab::Webinar => html! { <WebinarSettings on_notify={on_notify.clone()} /> },
            Tab::Tracking => html! { <TrackingSettings on_notify={on_notify.clone()} /> },
            Tab::Password => html! { <PasswordSettings on_notify={on_notify.clone()} /> },
        };
        html! {
            <div class="admin-panel">
                <header class="admin-header">
                    <h1>{"Painel do webinar"}</h1>
                    <button class="logout-button" onclick={on_logout}>{"Sair"}</button>
                </header>
                <nav class="admin-tabs">
                    { for Tab::ALL.iter().map(|t| {
                        let t = *t;
                        let onclick = {
                            let tab = tab.clone();
                            Callback::from(move |_: MouseEvent| tab.set(t))
                        };
                        html! {
                            <button class={classes!("admin-tab", (t == *tab).then_some("active"))} {onclick}>
                                {t.label()}
                            </button>
                        }
                    }) }
                </nav>
                { panel }
            </div>
        }
    };

    html! {
        <div class="admin-page">
            <Toast message={(*toast).clone()} on_close={close_toast} />
            { content }
            <style>
                {r#"
                .admin-page {
                    min-height: 100vh;
                    background: #1a1a1a;
                    color: #fff;
                    padding: 2rem;
                    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
                }
                .admin-login {
                    max-width: 380px;
                    margin: 10vh auto 0;
                    display: flex;
                    flex-direction: column;
                    gap: 1rem;
                    background: rgba(30, 30, 30, 0.7);
                    border: 1px solid rgba(30, 144, 255, 0.1);
                    border-radius: 12px;
                    padding: 2rem;
                }
                .admin-login h1 {
                    margin: 0;
                    font-size: 1.6rem;
                }
                .admin-login p {
                    color: #999;
                    font-size: 0.9rem;
                    margin: 0;
                }
                .admin-page input {
                    padding: 10px 12px;
                    border-radius: 8px;
                    border: 1px solid rgba(255,255,255,0.15);
                    background: rgba(0,0,0,0.3);
                    color: #fff;
                    font-size: 1rem;
                }
                .admin-page form button, .logout-button {
                    background: linear-gradient(45deg, #1E90FF, #4169E1);
                    color: #fff;
                    border: none;
                    border-radius: 8px;
                    padding: 10px 20px;
                    font-weight: bold;
                    cursor: pointer;
                }
                .login-error {
                    color: #ff6b6b;
                    font-size: 0.9rem;
                }
                .back-link {
                    color: #7EB2FF;
                    text-align: center;
                    font-size: 0.9rem;
                }
                .admin-panel {
                    max-width: 1200px;
                    margin: 0 auto;
                }
                .admin-header {
                    display: flex;
                    justify-content: space-between;
                    align-items: center;
                }
                .admin-tabs {
                    display: flex;
                    gap: 8px;
                    margin: 1.5rem 0 2rem;
                    border-bottom: 1px solid rgba(255,255,255,0.1);
                }
                .admin-tab {
                    background: none;
                    border: none;
                    color: #999;
                    padding: 10px 16px;
                    cursor: pointer;
                    font-size: 1rem;
                    border-bottom: 2px solid transparent;
                }
                .admin-tab.active {
                    color: #fff;
                    border-bottom-color: #1E90FF;
                }
                .settings-card {
                    max-width: 640px;
                    display: flex;
                    flex-direction: column;
                    gap: 1rem;
                    background: rgba(30, 30, 30, 0.7);
                    border: 1px solid rgba(30, 144, 255, 0.1);
                    border-radius: 12px;
                    padding: 1.5rem;
                }
                .settings-card h3 {
                    margin: 0;
                    color: #7EB2FF;
                }
                .settings-hint {
                    color: #999;
                    font-size: 0.9rem;
                    margin: 0;
                }
                .date-grid {
                    display: grid;
                    grid-template-columns: repeat(5, 1fr);
                    gap: 0.75rem;
                }
                .date-grid label, .tracking-field {
                    display: flex;
                    flex-direction: column;
                    gap: 4px;
                    font-size: 0.85rem;
                    color: #bbb;
                }
                .date-grid input {
                    width: 100%;
                    box-sizing: border-box;
                }
                .preview {
                    color: #2ecc71;
                    margin: 0;
                }
                .preview.invalid {
                    color: #ff6b6b;
                }
                @media (max-width: 700px) {
                    .admin-page {
                        padding: 1rem;
                    }
                    .date-grid {
                        grid-template-columns: repeat(2, 1fr);
                    }
                }
                "#}
            </style>
        </div>
    }
}
