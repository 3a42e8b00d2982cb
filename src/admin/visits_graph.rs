use log::error;
use plotters::prelude::*;
use plotters_canvas::CanvasBackend;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use crate::utils::metrics::TimeSeriesPoint;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 360;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub points: Vec<TimeSeriesPoint>,
}

fn draw(canvas: HtmlCanvasElement, points: &[TimeSeriesPoint]) -> Result<(), String> {
    canvas.set_width(WIDTH);
    canvas.set_height(HEIGHT);

    let backend = CanvasBackend::with_canvas_object(canvas).ok_or("canvas has no 2d context")?;
    let root = backend.into_drawing_area();
    root.fill(&RGBColor(26, 26, 26)).map_err(|e| format!("{:?}", e))?;

    let max = points
        .iter()
        .map(|p| p.visits.max(p.form_starts).max(p.form_completions))
        .max()
        .unwrap_or(0)
        .max(1);
    let light = RGBColor(200, 200, 200);

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0..points.len().saturating_sub(1).max(1), 0..max + (max / 10).max(1))
        .map_err(|e| format!("{:?}", e))?;

    let step = (points.len() / 12).max(1);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(RGBColor(50, 50, 50))
        .axis_style(light)
        .label_style(("sans-serif", 12).into_font().color(&light))
        .x_labels(points.len().min(12))
        .x_label_formatter(&|x| {
            if x % step == 0 {
                points.get(*x).map(|p| p.label.clone()).unwrap_or_default()
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(|e| format!("{:?}", e))?;

    let series: [(&str, RGBColor, fn(&TimeSeriesPoint) -> usize); 4] = [
        ("Visitas", RGBColor(30, 144, 255), |p| p.visits),
        ("Formulários iniciados", RGBColor(255, 159, 67), |p| p.form_starts),
        ("Inscrições", RGBColor(46, 204, 113), |p| p.form_completions),
        ("Abandonos", RGBColor(255, 107, 107), |p| p.abandoned_forms),
    ];

    for (label, color, value) in series {
        chart
            .draw_series(LineSeries::new(
                points.iter().enumerate().map(|(i, p)| (i, value(p))),
                color.stroke_width(2),
            ))
            .map_err(|e| format!("{:?}", e))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(RGBColor(40, 40, 40))
        .border_style(RGBColor(80, 80, 80))
        .label_font(("sans-serif", 12).into_font().color(&light))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(|e| format!("{:?}", e))?;

    root.present().map_err(|e| format!("{:?}", e))
}

#[function_component]
pub fn VisitsGraph(props: &Props) -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        use_effect_with_deps(
            move |points: &Vec<TimeSeriesPoint>| {
                if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                    if let Err(e) = draw(canvas, points) {
                        error!("Failed to draw visits chart: {}", e);
                    }
                }
                || ()
            },
            props.points.clone(),
        );
    }

    html! {
        <div class="visits-graph">
            <canvas
                ref={canvas_ref}
                width={WIDTH.to_string()}
                height={HEIGHT.to_string()}
                style="max-width: 100%;"
            />
        </div>
    }
}
