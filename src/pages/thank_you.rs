use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::thank_you_content::ThankYouContent;
use crate::utils::admin_config::AdminStore;
use crate::Route;

#[function_component]
pub fn ThankYou() -> Html {
    let schedule = use_state(|| AdminStore::browser().load_config().webinar);

    html! {
        <div class="thank-you-page">
            <style>
                {r#"
                    .thank-you-page {
                        min-height: 100vh;
                        background: #1a1a1a;
                        padding: 6rem 1.5rem 4rem;
                        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
                    }
                    .thank-you-card {
                        max-width: 720px;
                        margin: 0 auto;
                        background: rgba(26, 26, 26, 0.85);
                        border: 1px solid rgba(30, 144, 255, 0.15);
                        border-radius: 16px;
                        padding: 3rem 2rem;
                    }
                    .back-home {
                        display: block;
                        text-align: center;
                        margin-top: 2rem;
                        color: #7EB2FF;
                    }
                "#}
            </style>
            <div class="thank-you-card">
                <ThankYouContent schedule={(*schedule).clone()} />
                <Link<Route> to={Route::Home} classes="back-home">
                    {"Voltar para a página inicial"}
                </Link<Route>>
            </div>
        </div>
    }
}

#[function_component]
pub fn NotFound() -> Html {
    html! {
        <div class="not-found" style="min-height: 100vh; background: #1a1a1a; color: #fff; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 1rem;">
            <h1 style="font-size: 4rem; margin: 0;">{"404"}</h1>
            <p style="color: #999;">{"Página não encontrada."}</p>
            <Link<Route> to={Route::Home}>{"Ir para a inscrição do webinar"}</Link<Route>>
        </div>
    }
}
