use log::info;
use yew::prelude::*;
use yew_router::prelude::*;

mod config;
mod utils {
    pub mod storage;
    pub mod analytics;
    pub mod metrics;
    pub mod events;
    pub mod webinar;
    pub mod device;
    pub mod geolocation;
    pub mod admin_config;
    pub mod lead;
    pub mod tracking;
    pub mod social_proof;
}
mod components {
    pub mod notification;
    pub mod toast;
    pub mod countdown;
    pub mod floating_cta;
    pub mod page_tracking;
    pub mod tracking_scripts;
    pub mod thank_you_content;
    pub mod success_modal;
    pub mod webinar_form;
}
mod pages {
    pub mod home;
    pub mod faq;
    pub mod sections;
    pub mod thank_you;
    pub mod admin;
}
mod admin {
    pub mod dashboard;
    pub mod visits_graph;
    pub mod settings;
}

use components::tracking_scripts::TrackingScripts;
use pages::{
    admin::Admin,
    home::Home,
    thank_you::{NotFound, ThankYou},
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/obrigado")]
    ThankYou,
    #[at("/admin")]
    Admin,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        }
        Route::ThankYou => {
            info!("Rendering ThankYou page");
            html! { <ThankYou /> }
        }
        Route::Admin => {
            info!("Rendering Admin page");
            html! { <Admin /> }
        }
        Route::NotFound => {
            info!("Rendering NotFound page");
            html! { <NotFound /> }
        }
    }
}

#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <TrackingScripts />
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(config::log_level()) {
        gloo_console::error!("error initializing log:", e.to_string());
    }

    info!("Starting webinar funnel");
    yew::Renderer::<App>::new().render();
}
