use log::{error, info};
use yew::prelude::*;

use crate::utils::admin_config::AdminStore;
use crate::utils::tracking::inject_tracking_scripts;

/// Loads the third-party tags configured in the admin panel. Renders nothing.
#[function_component(TrackingScripts)]
pub fn tracking_scripts() -> Html {
    use_effect_with_deps(
        |_| {
            let ids = AdminStore::browser().load_config().tracking;
            if ids.is_empty() {
                info!("No tracking ids configured");
            } else if let Err(e) = inject_tracking_scripts(&ids) {
                error!("Failed to inject tracking scripts: {:?}", e);
            }
            || ()
        },
        (),
    );

    html! {}
}
