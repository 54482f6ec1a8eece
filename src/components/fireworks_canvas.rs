use std::f64::consts::TAU;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};
use yew::prelude::*;

use crate::error::{SiteError, SiteResult};
use crate::model::fireworks::{FireworksSim, ParticleKind, TRAIL_MARKER_RADIUS};
use crate::state::{FireworksHandle, FrameLoop, SynthHandle};
use crate::util::{css_rgb, css_rgba, viewport_size};

const FADE_FILL: &str = "rgba(0, 0, 0, 0.2)";
/// A large salvo would otherwise stack dozens of tones in one frame.
const MAX_TONES_PER_FRAME: u32 = 3;

#[derive(Properties, PartialEq, Clone)]
pub struct FireworksCanvasProps {
    pub fireworks: FireworksHandle,
    pub synth: SynthHandle,
    /// A transparent, click-through layer above the page. It never
    /// auto-launches and is cleared rather than faded each frame.
    #[prop_or_default]
    pub overlay: bool,
}

pub(crate) fn context_2d(canvas: &HtmlCanvasElement) -> SiteResult<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or(SiteError::CanvasContext)
}

pub(crate) fn fit_to_viewport(canvas: &HtmlCanvasElement) -> (f64, f64) {
    let (w, h) = viewport_size();
    canvas.set_width(w.max(0.0) as u32);
    canvas.set_height(h.max(0.0) as u32);
    (w, h)
}

fn draw(ctx: &CanvasRenderingContext2d, sim: &FireworksSim, overlay: bool) {
    let (w, h) = sim.size();
    let _ = ctx.set_global_composite_operation("source-over");
    if overlay {
        ctx.clear_rect(0.0, 0.0, w, h);
    } else {
        ctx.set_fill_style_str(FADE_FILL);
        ctx.fill_rect(0.0, 0.0, w, h);
    }
    let _ = ctx.set_global_composite_operation("lighter");

    for p in &sim.projectiles {
        ctx.set_fill_style_str(&css_rgb(p.color));
        ctx.begin_path();
        let _ = ctx.arc(p.x, p.y, TRAIL_MARKER_RADIUS, 0.0, TAU);
        ctx.fill();
    }

    for p in &sim.particles {
        let alpha = p.alpha();
        let r = p.radius();
        if r <= 0.0 {
            continue;
        }
        match p.kind {
            ParticleKind::Sparkle => {
                ctx.set_fill_style_str(&css_rgba(p.color, alpha * 0.3));
                ctx.begin_path();
                let _ = ctx.arc(p.x, p.y, r * 2.0, 0.0, TAU);
                ctx.fill();
            }
            ParticleKind::Trail => {
                let (tx, ty) = p.trail_start();
                ctx.set_stroke_style_str(&css_rgba(p.color, alpha * 0.5));
                ctx.set_line_width(r);
                ctx.begin_path();
                ctx.move_to(tx, ty);
                ctx.line_to(p.x, p.y);
                ctx.stroke();
            }
            ParticleKind::Normal => {}
        }
        ctx.set_fill_style_str(&css_rgba(p.color, alpha));
        ctx.begin_path();
        let _ = ctx.arc(p.x, p.y, r, 0.0, TAU);
        ctx.fill();
    }
}

#[function_component]
pub fn FireworksCanvas(props: &FireworksCanvasProps) -> Html {
    let canvas_ref = use_node_ref();
    let overlay = props.overlay;

    {
        let canvas_ref = canvas_ref.clone();
        let fireworks = props.fireworks.clone();
        let synth = props.synth.clone();
        use_effect_with((), move |_| {
            let mut frame_loop = None;
            let mut resize = None;
            match canvas_ref.cast::<HtmlCanvasElement>() {
                None => log::error!("{}", SiteError::MissingElement("fireworks canvas")),
                Some(canvas) => match context_2d(&canvas) {
                    Err(e) => log::error!("fireworks disabled: {e}"),
                    Ok(ctx) => {
                        let (w, h) = fit_to_viewport(&canvas);
                        fireworks.with(|sim| {
                            sim.resize(w, h);
                            sim.set_auto_launch(!overlay);
                        });
                        log::debug!("fireworks running at {w}x{h}");
                        if let Some(window) = web_sys::window() {
                            let fireworks = fireworks.clone();
                            let canvas = canvas.clone();
                            resize = Some(EventListener::new(&window, "resize", move |_| {
                                let (w, h) = fit_to_viewport(&canvas);
                                fireworks.with(|sim| sim.resize(w, h));
                            }));
                        }
                        let fireworks = fireworks.clone();
                        frame_loop = Some(FrameLoop::start(move |dt| {
                            let cues = fireworks
                                .with(|sim| {
                                    let report = sim.step(dt);
                                    draw(&ctx, sim, overlay);
                                    report.sound_cues
                                })
                                .unwrap_or(0);
                            for _ in 0..cues.min(MAX_TONES_PER_FRAME) {
                                synth.with(|s| s.play());
                            }
                        }));
                    }
                },
            }
            move || {
                drop(frame_loop);
                drop(resize);
                fireworks.with(|sim| {
                    sim.set_auto_launch(false);
                    sim.clear();
                });
            }
        });
    }

    let onclick = {
        let fireworks = props.fireworks.clone();
        Callback::from(move |e: MouseEvent| {
            let to = (e.client_x() as f64, e.client_y() as f64);
            fireworks.with(|sim| {
                let (w, h) = sim.size();
                sim.launch((w / 2.0, h), to, true);
            });
        })
    };

    if overlay {
        return html! { <canvas id="embers" ref={canvas_ref}></canvas> };
    }
    html! {
        <canvas id="fireworks" ref={canvas_ref} {onclick}></canvas>
    }
}
