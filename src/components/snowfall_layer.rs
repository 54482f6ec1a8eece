use gloo::events::EventListener;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

use super::fireworks_canvas::{context_2d, fit_to_viewport};
use crate::error::SiteError;
use crate::model::snowfall::SnowfallSim;
use crate::state::{FrameLoop, SnowfallHandle};

const FLAKE_GLYPH: &str = "❄";

#[derive(Properties, PartialEq, Clone)]
pub struct SnowfallLayerProps {
    pub snowfall: SnowfallHandle,
}

fn draw(ctx: &CanvasRenderingContext2d, sim: &SnowfallSim, w: f64, h: f64) {
    ctx.clear_rect(0.0, 0.0, w, h);
    ctx.set_fill_style_str("#ffffff");
    for f in &sim.flakes {
        ctx.save();
        let _ = ctx.translate(f.x, f.y);
        let _ = ctx.rotate(f.rotation.to_radians());
        ctx.set_global_alpha(f.opacity);
        ctx.set_font(&format!("{:.1}px sans-serif", f.size));
        let _ = ctx.fill_text(FLAKE_GLYPH, 0.0, 0.0);
        ctx.restore();
    }
}

#[function_component]
pub fn SnowfallLayer(props: &SnowfallLayerProps) -> Html {
    let canvas_ref = use_node_ref();
    let running = use_state(|| true);

    {
        let canvas_ref = canvas_ref.clone();
        let snowfall = props.snowfall.clone();
        use_effect_with((), move |_| {
            let mut frame_loop = None;
            let mut resize = None;
            match canvas_ref.cast::<HtmlCanvasElement>() {
                None => log::error!("{}", SiteError::MissingElement("snowfall canvas")),
                Some(canvas) => match context_2d(&canvas) {
                    Err(e) => log::error!("snowfall disabled: {e}"),
                    Ok(ctx) => {
                        let (w, h) = fit_to_viewport(&canvas);
                        snowfall.with(|sim| sim.resize(w, h));
                        if let Some(window) = web_sys::window() {
                            let snowfall = snowfall.clone();
                            let canvas = canvas.clone();
                            resize = Some(EventListener::new(&window, "resize", move |_| {
                                let (w, h) = fit_to_viewport(&canvas);
                                snowfall.with(|sim| sim.resize(w, h));
                            }));
                        }
                        let snowfall = snowfall.clone();
                        frame_loop = Some(FrameLoop::start(move |dt| {
                            let (w, h) = (canvas.width() as f64, canvas.height() as f64);
                            snowfall.with(|sim| {
                                if sim.is_paused() {
                                    return;
                                }
                                sim.step(dt);
                                draw(&ctx, sim, w, h);
                            });
                        }));
                    }
                },
            }
            move || {
                drop(frame_loop);
                drop(resize);
            }
        });
    }

    let on_toggle = {
        let snowfall = props.snowfall.clone();
        let running = running.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(now_running) = snowfall.with(|sim| sim.toggle()) {
                running.set(now_running);
            }
        })
    };

    let canvas_style = if *running { "" } else { "display:none;" };
    html! {
        <>
            <canvas id="snowfall" ref={canvas_ref} style={canvas_style}></canvas>
            <button class="snow-toggle" onclick={on_toggle} title="Toggle snowfall">
                { if *running { "❄ 关闭雪花" } else { "❄ 开启雪花" } }
            </button>
        </>
    }
}
