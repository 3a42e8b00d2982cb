use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{js_sys, window, HtmlScriptElement};

use crate::utils::admin_config::TrackingIds;
use crate::utils::storage::{BrowserStorage, KeyValueStore};

pub const LEAD_CONFIRMED_FLAG: &str = "meta_pixel_lead_confirmado_dispatched";
const TRACKING_ATTR: &str = "data-tracking";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = window, js_name = fbq, catch)]
    fn fbq(method: &str, event: &str, params: &JsValue) -> Result<(), JsValue>;
}

/// One element to add to the document for a tracking integration.
#[derive(Clone, Debug, PartialEq)]
pub enum Injection {
    Script {
        tag: &'static str,
        src: Option<String>,
        body: Option<String>,
    },
    NoScript {
        tag: &'static str,
        html: String,
    },
}

impl Injection {
    pub fn tag(&self) -> &'static str {
        match self {
            Injection::Script { tag, .. } | Injection::NoScript { tag, .. } => tag,
        }
    }
}

/// Keeps only characters that can appear in pixel, tag or measurement ids.
pub fn sanitize_id(id: &str) -> String {
    id.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

fn meta_pixel(id: &str) -> Vec<Injection> {
    let body = format!(
        "!function(f,b,e,v,n,t,s){{if(f.fbq)return;n=f.fbq=function(){{n.callMethod?\
n.callMethod.apply(n,arguments):n.queue.push(arguments)}};if(!f._fbq)f._fbq=n;\
n.push=n;n.loaded=!0;n.version='2.0';n.queue=[];t=b.createElement(e);t.async=!0;\
t.src=v;s=b.getElementsByTagName(e)[0];s.parentNode.insertBefore(t,s)}}(window,\
document,'script','https://connect.facebook.net/en_US/fbevents.js');\
fbq('init','{id}');fbq('track','PageView');",
        id = id
    );
    vec![
        Injection::Script {
            tag: "meta-pixel",
            src: None,
            body: Some(body),
        },
        Injection::NoScript {
            tag: "meta-pixel-noscript",
            html: format!(
                "<img height=\"1\" width=\"1\" style=\"display:none\" \
src=\"https://www.facebook.com/tr?id={}&ev=PageView&noscript=1\"/>",
                id
            ),
        },
    ]
}

fn tag_manager(id: &str) -> Vec<Injection> {
    let body = format!(
        "(function(w,d,s,l,i){{w[l]=w[l]||[];w[l].push({{'gtm.start':new Date().getTime(),\
event:'gtm.js'}});var f=d.getElementsByTagName(s)[0],j=d.createElement(s),\
dl=l!='dataLayer'?'&l='+l:'';j.async=true;j.src='https://www.googletagmanager.com/gtm.js?id='+i+dl;\
f.parentNode.insertBefore(j,f);}})(window,document,'script','dataLayer','{}');",
        id
    );
    vec![
        Injection::Script {
            tag: "gtm",
            src: None,
            body: Some(body),
        },
        Injection::NoScript {
            tag: "gtm-noscript",
            html: format!(
                "<iframe src=\"https://www.googletagmanager.com/ns.html?id={}\" height=\"0\" \
width=\"0\" style=\"display:none;visibility:hidden\"></iframe>",
                id
            ),
        },
    ]
}

fn gtag(tag: &'static str, id: &str) -> Vec<Injection> {
    vec![
        Injection::Script {
            tag,
            src: Some(format!("https://www.googletagmanager.com/gtag/js?id={}", id)),
            body: None,
        },
        Injection::Script {
            tag,
            src: None,
            body: Some(format!(
                "window.dataLayer=window.dataLayer||[];function gtag(){{dataLayer.push(arguments);}}\
gtag('js',new Date());gtag('config','{}');",
                id
            )),
        },
    ]
}

/// Every element needed for the configured ids. Analytics is loaded directly
/// only when no tag manager container is configured.
pub fn build_injections(ids: &TrackingIds) -> Vec<Injection> {
    let pixel = sanitize_id(&ids.meta_ads_pixel_id);
    let gtm = sanitize_id(&ids.google_tag_manager_id);
    let ga = sanitize_id(&ids.google_analytics_id);
    let ads = sanitize_id(&ids.google_ads_conversion_id);

    let mut out = Vec::new();
    if !pixel.is_empty() {
        out.extend(meta_pixel(&pixel));
    }
    if !gtm.is_empty() {
        out.extend(tag_manager(&gtm));
    }
    if !ga.is_empty() && gtm.is_empty() {
        out.extend(gtag("google-analytics", &ga));
    }
    if !ads.is_empty() {
        out.extend(gtag("google-ads", &ads));
    }
    out
}

/// Appends the tracking elements to the page unless they are already there.
pub fn inject_tracking_scripts(ids: &TrackingIds) -> Result<(), JsValue> {
    let document = window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let head = document.head().ok_or_else(|| JsValue::from_str("no head"))?;
    let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let injections = build_injections(ids);
    if let Some(first) = injections.first() {
        let selector = format!("[{}=\"{}\"]", TRACKING_ATTR, first.tag());
        if document.query_selector(&selector)?.is_some() {
            debug!("Tracking tags already present");
            return Ok(());
        }
    }

    let mut injected = 0;
    for injection in injections {
        match injection {
            Injection::Script { tag, src, body: inline } => {
                let script: HtmlScriptElement = document
                    .create_element("script")?
                    .dyn_into()
                    .map_err(JsValue::from)?;
                script.set_attribute(TRACKING_ATTR, tag)?;
                if let Some(src) = src {
                    script.set_async(true);
                    script.set_src(&src);
                }
                if let Some(inline) = inline {
                    script.set_text(&inline)?;
                }
                head.append_child(&script)?;
            }
            Injection::NoScript { tag, html } => {
                let noscript = document.create_element("noscript")?;
                noscript.set_attribute(TRACKING_ATTR, tag)?;
                noscript.set_inner_html(&html);
                body.append_child(&noscript)?;
            }
        }
        injected += 1;
    }
    if injected > 0 {
        info!("Injected {} tracking elements", injected);
    }
    Ok(())
}

fn pixel_loaded() -> bool {
    window()
        .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("fbq")).ok())
        .map_or(false, |f| f.is_function())
}

fn send<T: Serialize>(method: &str, event: &str, params: &T) -> bool {
    let params = match serde_wasm_bindgen::to_value(params) {
        Ok(params) => params,
        Err(e) => {
            warn!("Could not encode pixel params for {}: {}", event, e);
            return false;
        }
    };
    match fbq(method, event, &params) {
        Ok(()) => true,
        Err(e) => {
            debug!("Meta Pixel unavailable for {}: {:?}", event, e);
            false
        }
    }
}

pub fn track_standard<T: Serialize>(event: &str, params: &T) -> bool {
    send("track", event, params)
}

pub fn track_custom<T: Serialize>(event: &str, params: &T) -> bool {
    send("trackCustom", event, params)
}

#[derive(Serialize)]
struct LeadConfirmedParams {
    content_name: &'static str,
    status: &'static str,
}

const LEAD_CONFIRMED_PARAMS: LeadConfirmedParams = LeadConfirmedParams {
    content_name: "Webinar Signup",
    status: "confirmed",
};

/// Fires "Lead Confirmado" at most once per tab session. When the pixel
/// has not loaded yet it tries once more a second later.
pub fn track_lead_confirmed() {
    let session = BrowserStorage::Session;
    if matches!(session.get_item(LEAD_CONFIRMED_FLAG), Ok(Some(_))) {
        debug!("Lead Confirmado already sent this session");
        return;
    }

    let dispatch = move || {
        if pixel_loaded() && track_custom("Lead Confirmado", &LEAD_CONFIRMED_PARAMS) {
            if let Err(e) = BrowserStorage::Session.set_item(LEAD_CONFIRMED_FLAG, "true") {
                warn!("Could not mark Lead Confirmado as sent: {}", e);
            }
            info!("Lead Confirmado sent");
            true
        } else {
            false
        }
    };

    if !dispatch() {
        Timeout::new(1_000, move || {
            if !dispatch() {
                warn!("Meta Pixel not loaded, Lead Confirmado dropped");
            }
        })
        .forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(pixel: &str, ads: &str, ga: &str, gtm: &str) -> TrackingIds {
        TrackingIds {
            meta_ads_pixel_id: pixel.into(),
            google_ads_conversion_id: ads.into(),
            google_analytics_id: ga.into(),
            google_tag_manager_id: gtm.into(),
        }
    }

    fn tags(injections: &[Injection]) -> Vec<&'static str> {
        injections.iter().map(Injection::tag).collect()
    }

    #[test]
    fn nothing_configured_injects_nothing() {
        assert!(build_injections(&TrackingIds::default()).is_empty());
        assert!(build_injections(&ids(" ", "", "", "")).is_empty());
    }

    #[test]
    fn pixel_comes_with_a_noscript_image() {
        let injections = build_injections(&ids("1234567890", "", "", ""));
        assert_eq!(tags(&injections), vec!["meta-pixel", "meta-pixel-noscript"]);
        match &injections[0] {
            Injection::Script { body: Some(body), .. } => {
                assert!(body.contains("fbq('init','1234567890')"));
                assert!(body.contains("fbq('track','PageView')"));
            }
            other => panic!("unexpected {:?}", other),
        }
        match &injections[1] {
            Injection::NoScript { html, .. } => assert!(html.contains("tr?id=1234567890")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn analytics_is_skipped_when_tag_manager_is_set() {
        let with_gtm = build_injections(&ids("", "", "G-ABC", "GTM-XYZ"));
        assert_eq!(tags(&with_gtm), vec!["gtm", "gtm-noscript"]);

        let without_gtm = build_injections(&ids("", "", "G-ABC", ""));
        assert_eq!(tags(&without_gtm), vec!["google-analytics", "google-analytics"]);
    }

    #[test]
    fn ads_uses_gtag() {
        let injections = build_injections(&ids("", "AW-999", "", ""));
        match &injections[0] {
            Injection::Script { src: Some(src), .. } => assert!(src.ends_with("id=AW-999")),
            other => panic!("unexpected {:?}", other),
        }
        match &injections[1] {
            Injection::Script { body: Some(body), .. } => assert!(body.contains("gtag('config','AW-999')")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ids_cannot_break_out_of_the_snippet() {
        assert_eq!(sanitize_id(" GTM-AB12 "), "GTM-AB12");
        assert_eq!(sanitize_id("1');alert(1);//"), "1alert1");
    }
}
