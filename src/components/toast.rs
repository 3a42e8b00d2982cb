use gloo_timers::callback::Timeout;
use yew::prelude::*;

const TOAST_MS: u32 = 5_000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub kind: ToastKind,
    pub text: String,
}

impl ToastMessage {
    pub fn success(text: impl Into<String>) -> Self {
        ToastMessage {
            kind: ToastKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        ToastMessage {
            kind: ToastKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub message: Option<ToastMessage>,
    pub on_close: Callback<()>,
}

#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    {
        let on_close = props.on_close.clone();
        use_effect_with_deps(
            move |message: &Option<ToastMessage>| {
                let timeout = message
                    .as_ref()
                    .map(|_| Timeout::new(TOAST_MS, move || on_close.emit(())));
                move || drop(timeout)
            },
            props.message.clone(),
        );
    }

    let Some(message) = &props.message else {
        return html! {};
    };
    let class = match message.kind {
        ToastKind::Success => "toast toast-success",
        ToastKind::Error => "toast toast-error",
    };
    let close = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <div class={class} role="alert">
            <style>
                {r#"
                    .toast {
                        position: fixed;
                        top: 24px;
                        right: 24px;
                        z-index: 1100;
                        display: flex;
                        align-items: center;
                        gap: 12px;
                        padding: 14px 18px;
                        border-radius: 10px;
                        color: #fff;
                        box-shadow: 0 8px 24px rgba(0,0,0,0.3);
                        max-width: 380px;
                    }
                    .toast-success { background: #1f7a3f; }
                    .toast-error { background: #b3261e; }
                    .toast button {
                        background: none;
                        border: none;
                        color: inherit;
                        font-size: 1.1rem;
                        cursor: pointer;
                    }
                "#}
            </style>
            <span>{&message.text}</span>
            <button aria-label="Fechar" onclick={close}>{"×"}</button>
        </div>
    }
}
