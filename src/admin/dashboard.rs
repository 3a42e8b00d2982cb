use chrono::{DateTime, Utc};
use log::{error, info};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{js_sys, window, Blob, BlobPropertyBag, HtmlAnchorElement, HtmlInputElement, Url};
use yew::prelude::*;

use crate::admin::visits_graph::VisitsGraph;
use crate::utils::analytics::AnalyticsLog;
use crate::utils::events::{EventLog, EventType, SCROLL_MILESTONES};
use crate::utils::metrics::{
    self, calculate_metrics, filter_leads, format_percentage, format_time, lead_rows, time_series,
    period_range, total_pages, Bucket, Period, Share, LEADS_PER_PAGE,
};
use crate::utils::webinar::WEBINAR_TZ;

fn download_json(filename: &str, content: &str) -> Result<(), JsValue> {
    let document = window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(content));
    let options = BlobPropertyBag::new();
    options.set_type("application/json");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into().map_err(JsValue::from)?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();
    Url::revoke_object_url(&url)
}

fn share_list(title: &str, shares: &[Share]) -> Html {
    html! {
        <div class="distribution">
            <h3>{title.to_string()}</h3>
            {
                if shares.is_empty() {
                    html! { <p class="empty">{"Sem dados no período"}</p> }
                } else {
                    html! {
                        <ul>
                            { for shares.iter().map(|s| html! {
                                <li>
                                    <div class="bar-label">
                                        <span>{&s.label}</span>
                                        <span>{format!("{} ({})", s.count, format_percentage(s.percentage))}</span>
                                    </div>
                                    <div class="bar"><div class="bar-fill" style={format!("width: {:.1}%;", s.percentage)}></div></div>
                                </li>
                            }) }
                        </ul>
                    }
                }
            }
        </div>
    }
}

fn bucket_chart(title: &str, buckets: &[Bucket]) -> Html {
    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    html! {
        <div class="distribution">
            <h3>{title.to_string()}</h3>
            <div class="columns">
                { for buckets.iter().map(|b| html! {
                    <div class="column" title={format!("{}: {}", b.label, b.count)}>
                        <div class="column-fill" style={format!("height: {:.0}%;", b.count as f64 / max as f64 * 100.0)}></div>
                        <span>{&b.label}</span>
                    </div>
                }) }
            </div>
        </div>
    }
}

fn metric_card(label: &str, value: String) -> Html {
    html! {
        <div class="metric-card">
            <span class="metric-label">{label.to_string()}</span>
            <span class="metric-value">{value}</span>
        </div>
    }
}

fn engagement_panel(period: Period, now: DateTime<Utc>) -> Html {
    let range = period_range(period, now, WEBINAR_TZ);
    let events = EventLog::browser();
    let count = |event_type: EventType| {
        events
            .events_by_type(event_type)
            .into_iter()
            .filter(|e| range.contains(e.timestamp))
            .collect::<Vec<_>>()
    };

    let cta_clicks = count(EventType::CtaClick).len();
    let field_focus = count(EventType::FormFieldFocus).len();
    let button_clicks = count(EventType::ButtonClick).len();
    let scrolls = count(EventType::ScrollMilestone);
    let milestones: Vec<Bucket> = SCROLL_MILESTONES
        .iter()
        .map(|m| Bucket {
            label: format!("{}%", m),
            count: scrolls
                .iter()
                .filter(|e| {
                    e.event_details
                        .as_ref()
                        .and_then(|d| d.get("percentage"))
                        .and_then(|p| p.as_u64())
                        == Some(*m as u64)
                })
                .count(),
        })
        .collect();

    html! {
        <div class="distribution">
            <h3>{"Engajamento"}</h3>
            <ul>
                <li class="bar-label"><span>{"Cliques em CTAs"}</span><span>{cta_clicks.to_string()}</span></li>
                <li class="bar-label"><span>{"Foco em campos do formulário"}</span><span>{field_focus.to_string()}</span></li>
                <li class="bar-label"><span>{"Outros cliques"}</span><span>{button_clicks.to_string()}</span></li>
                { for milestones.iter().map(|b| html! {
                    <li class="bar-label"><span>{format!("Rolagem até {}", b.label)}</span><span>{b.count.to_string()}</span></li>
                }) }
            </ul>
        </div>
    }
}

#[function_component]
pub fn AnalyticsDashboard() -> Html {
    let data = use_state(|| AnalyticsLog::browser().read_all(Utc::now()));
    let period = use_state(|| Period::Week);
    let search = use_state(String::new);
    let current_page = use_state(|| 1usize);

    let now = Utc::now();
    let stats = calculate_metrics(&data, *period, now, WEBINAR_TZ);
    let series = time_series(&data, *period, now, WEBINAR_TZ);
    let rows = lead_rows(&data, WEBINAR_TZ);
    let filtered = filter_leads(&rows, &search);
    let pages = total_pages(filtered.len(), LEADS_PER_PAGE).max(1);
    let shown_page = (*current_page).min(pages);
    let visible = metrics::page(&filtered, shown_page, LEADS_PER_PAGE);

    let refresh = {
        let data = data.clone();
        Callback::from(move |_: MouseEvent| {
            data.set(AnalyticsLog::browser().read_all(Utc::now()));
        })
    };

    let export = Callback::from(|_: MouseEvent| {
        let now = Utc::now();
        match AnalyticsLog::browser().export_json(now) {
            Ok(json) => {
                let filename = format!("webinar-analytics-{}.json", now.format("%Y-%m-%d"));
                if let Err(e) = download_json(&filename, &json) {
                    error!("Export download failed: {:?}", e);
                }
            }
            Err(e) => error!("Failed to serialize analytics: {}", e),
        }
    });

    let clear = Callback::from(|_: MouseEvent| {
        let Some(window) = window() else {
            return;
        };
        let confirmed = window
            .confirm_with_message("Tem certeza que deseja apagar todos os dados de analytics? Essa ação não pode ser desfeita.")
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        match AnalyticsLog::browser().clear_all() {
            Ok(()) => {
                info!("Analytics cleared");
                let _ = window.location().reload();
            }
            Err(e) => error!("Failed to clear analytics: {}", e),
        }
    });

    let on_search = {
        let search = search.clone();
        let current_page = current_page.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search.set(input.value());
            current_page.set(1);
        })
    };

    let go_to = |target: usize| {
        let current_page = current_page.clone();
        Callback::from(move |_: MouseEvent| current_page.set(target))
    };

    html! {
        <div class="analytics-dashboard">
            <div class="dashboard-toolbar">
                <div class="period-selector">
                    { for Period::ALL.iter().map(|p| {
                        let selected = *p == *period;
                        let onclick = {
                            let period = period.clone();
                            let p = *p;
                            Callback::from(move |_: MouseEvent| period.set(p))
                        };
                        html! {
                            <button class={classes!("period-button", selected.then_some("active"))} {onclick}>
                                {p.label()}
                            </button>
                        }
                    }) }
                </div>
                <div class="toolbar-actions">
                    <button onclick={refresh}>{"Atualizar"}</button>
                    <button onclick={export}>{"Exportar JSON"}</button>
                    <button class="danger" onclick={clear}>{"Limpar dados"}</button>
                </div>
            </div>

            <div class="metric-grid">
                { metric_card("Visitas", stats.total_visits.to_string()) }
                { metric_card("Formulários iniciados", stats.total_form_starts.to_string()) }
                { metric_card("Inscrições", stats.total_form_completions.to_string()) }
                { metric_card("Abandonos", stats.abandoned_forms.to_string()) }
                { metric_card("Taxa de conversão", format_percentage(stats.conversion_rate)) }
                { metric_card("Taxa de abandono", format_percentage(stats.abandonment_rate)) }
                { metric_card("Tempo médio na página", format_time(stats.average_time_on_page)) }
                { metric_card("Tempo até iniciar", format_time(stats.average_time_to_form_start)) }
                { metric_card("Tempo até concluir", format_time(stats.average_time_to_complete)) }
            </div>

            <div class="chart-panel">
                <h3>{format!("Evolução · {}", period.short_label())}</h3>
                <VisitsGraph points={series} />
            </div>

            <div class="distribution-grid">
                { share_list("Dispositivos", &stats.device_distribution) }
                { share_list("Localizações", &stats.location_distribution) }
                { share_list("Gênero", &stats.gender_distribution) }
                { share_list("Faixa etária", &stats.age_distribution) }
                { bucket_chart("Horário de acesso", &stats.hour_distribution) }
                { bucket_chart("Dia da semana", &stats.day_of_week_distribution) }
                { engagement_panel(*period, now) }
            </div>

            <div class="leads-panel">
                <div class="leads-header">
                    <h3>{format!("Inscritos ({})", filtered.len())}</h3>
                    <input
                        type="search"
                        placeholder="Buscar por cidade, estado, dispositivo ou navegador"
                        value={(*search).clone()}
                        oninput={on_search}
                    />
                </div>
                <table class="leads-table">
                    <thead>
                        <tr>
                            <th>{"Data"}</th>
                            <th>{"Localização"}</th>
                            <th>{"Dispositivo"}</th>
                            <th>{"Navegador"}</th>
                            <th>{"Gênero"}</th>
                            <th>{"Idade"}</th>
                            <th>{"Tempo até concluir"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {
                            if visible.is_empty() {
                                html! { <tr><td colspan="7" class="empty">{"Nenhum inscrito encontrado"}</td></tr> }
                            } else {
                                html! {
                                    { for visible.iter().map(|row| html! {
                                        <tr key={row.id.clone()}>
                                            <td>{&row.access_hour}</td>
                                            <td>{row.location.as_ref().map(|l| l.display()).unwrap_or_else(|| "-".to_string())}</td>
                                            <td>{row.device.as_ref().map(|d| format!("{} · {}", d.kind.label(), d.info)).unwrap_or_else(|| "-".to_string())}</td>
                                            <td>{row.device.as_ref().map(|d| d.browser.clone()).unwrap_or_else(|| "-".to_string())}</td>
                                            <td>{row.gender.unwrap_or("-")}</td>
                                            <td>{row.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())}</td>
                                            <td>{format_time(row.time_to_complete as f64 / 1000.0)}</td>
                                        </tr>
                                    }) }
                                }
                            }
                        }
                    </tbody>
                </table>
                <div class="pagination">
                    <button disabled={shown_page <= 1} onclick={go_to(shown_page.saturating_sub(1).max(1))}>{"Anterior"}</button>
                    <span>{format!("Página {} de {}", shown_page, pages)}</span>
                    <button disabled={shown_page >= pages} onclick={go_to((shown_page + 1).min(pages))}>{"Próxima"}</button>
                </div>
            </div>

            <style>
                {r#"
                .analytics-dashboard {
                    display: flex;
                    flex-direction: column;
                    gap: 2rem;
                }
                .dashboard-toolbar {
                    display: flex;
                    justify-content: space-between;
                    flex-wrap: wrap;
                    gap: 1rem;
                }
                .period-selector, .toolbar-actions {
                    display: flex;
                    gap: 8px;
                    flex-wrap: wrap;
                }
                .analytics-dashboard button {
                    background: rgba(30, 144, 255, 0.1);
                    border: 1px solid rgba(30, 144, 255, 0.3);
                    color: #fff;
                    border-radius: 8px;
                    padding: 8px 14px;
                    cursor: pointer;
                }
                .analytics-dashboard button:disabled {
                    opacity: 0.4;
                    cursor: default;
                }
                .analytics-dashboard button.active {
                    background: #1E90FF;
                }
                .analytics-dashboard button.danger {
                    border-color: rgba(255, 107, 107, 0.5);
                    color: #ff6b6b;
                }
                .metric-grid {
                    display: grid;
                    grid-template-columns: repeat(auto-fill, minmax(180px, 1fr));
                    gap: 1rem;
                }
                .metric-card, .distribution, .chart-panel, .leads-panel {
                    background: rgba(30, 30, 30, 0.7);
                    border: 1px solid rgba(30, 144, 255, 0.1);
                    border-radius: 12px;
                    padding: 1.25rem;
                }
                .metric-label {
                    display: block;
                    color: #999;
                    font-size: 0.85rem;
                }
                .metric-value {
                    display: block;
                    font-size: 1.8rem;
                    font-weight: bold;
                    margin-top: 0.25rem;
                }
                .distribution-grid {
                    display: grid;
                    grid-template-columns: repeat(auto-fill, minmax(320px, 1fr));
                    gap: 1rem;
                }
                .distribution h3, .chart-panel h3, .leads-panel h3 {
                    margin-top: 0;
                    color: #7EB2FF;
                }
                .distribution ul {
                    list-style: none;
                    padding: 0;
                    margin: 0;
                }
                .distribution li {
                    margin-bottom: 0.6rem;
                }
                .bar-label {
                    display: flex;
                    justify-content: space-between;
                    font-size: 0.9rem;
                    color: #ddd;
                }
                .bar {
                    height: 6px;
                    background: rgba(255,255,255,0.08);
                    border-radius: 3px;
                    margin-top: 4px;
                }
                .bar-fill {
                    height: 100%;
                    background: #1E90FF;
                    border-radius: 3px;
                }
                .columns {
                    display: flex;
                    align-items: flex-end;
                    gap: 2px;
                    height: 140px;
                }
                .column {
                    flex: 1;
                    display: flex;
                    flex-direction: column;
                    justify-content: flex-end;
                    align-items: center;
                    height: 100%;
                }
                .column-fill {
                    width: 100%;
                    background: #1E90FF;
                    border-radius: 2px 2px 0 0;
                    min-height: 1px;
                }
                .column span {
                    font-size: 0.6rem;
                    color: #777;
                    writing-mode: vertical-rl;
                    margin-top: 4px;
                }
                .leads-header {
                    display: flex;
                    justify-content: space-between;
                    align-items: center;
                    gap: 1rem;
                    flex-wrap: wrap;
                }
                .leads-header input {
                    flex: 1;
                    max-width: 420px;
                    padding: 8px 12px;
                    border-radius: 8px;
                    border: 1px solid rgba(255,255,255,0.15);
                    background: rgba(0,0,0,0.3);
                    color: #fff;
                }
                .leads-table {
                    width: 100%;
                    border-collapse: collapse;
                    margin-top: 1rem;
                    font-size: 0.9rem;
                }
                .leads-table th, .leads-table td {
                    text-align: left;
                    padding: 8px;
                    border-bottom: 1px solid rgba(255,255,255,0.06);
                }
                .leads-table th {
                    color: #999;
                    font-weight: normal;
                }
                .empty {
                    color: #777;
                    text-align: center;
                }
                .pagination {
                    display: flex;
                    justify-content: center;
                    align-items: center;
                    gap: 1rem;
                    margin-top: 1rem;
                    color: #999;
                }
                "#}
            </style>
        </div>
    }
}
