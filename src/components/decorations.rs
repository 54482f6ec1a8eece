use gloo::timers::callback::Interval;
use web_sys::HtmlElement;
use yew::prelude::*;

use super::app::{SiteContext, REVEAL_CLASS};
use super::wish_modal::random_wish;
use crate::model::decorations::{
    lantern_brightness, DragonPose, Swing, BUTTON_BURST_COLOR, BUTTON_BURST_COUNT,
    FLICKER_TICK_MS, SWAY_TICK_MS, SWING_TICK_MS,
};
use crate::util::parse_hex_color;

const KNOTS: usize = 2;
const LANTERNS: usize = 2;
const SALVO_SIZE: u32 = 8;
const SALVO_STAGGER_MS: f64 = 120.0;

fn set_style(node: &NodeRef, prop: &str, value: &str) {
    if let Some(el) = node.cast::<HtmlElement>() {
        let _ = el.style().set_property(prop, value);
    }
}

#[derive(Properties, PartialEq, Clone)]
struct ActionButtonProps {
    label: AttrValue,
    on_press: Callback<()>,
}

/// A `.btn` that throws a few golden sparks where it was pressed.
#[function_component]
fn ActionButton(props: &ActionButtonProps) -> Html {
    let site = use_context::<SiteContext>();
    let onclick = {
        let on_press = props.on_press.clone();
        Callback::from(move |e: MouseEvent| {
            if let Some(site) = &site {
                let (x, y) = (e.client_x() as f64, e.client_y() as f64);
                site.embers.with(|sim| {
                    sim.ember_burst(x, y, BUTTON_BURST_COUNT, parse_hex_color(BUTTON_BURST_COLOR))
                });
            }
            on_press.emit(());
        })
    };
    html! { <button class="btn" {onclick}>{ props.label.clone() }</button> }
}

#[function_component]
pub fn Decorations() -> Html {
    let site = use_context::<SiteContext>();
    let knots = use_memo((), |_| (0..KNOTS).map(|_| NodeRef::default()).collect::<Vec<_>>());
    let lanterns = use_memo((), |_| (0..LANTERNS).map(|_| NodeRef::default()).collect::<Vec<_>>());
    let dragon = use_node_ref();

    {
        let knots = knots.clone();
        let lanterns = lanterns.clone();
        let dragon = dragon.clone();
        use_effect_with((), move |_| {
            let mut rng = fastrand::Rng::new();
            let mut swings: Vec<Swing> = knots
                .iter()
                .map(|_| {
                    let mut s = Swing::default();
                    for _ in 0..rng.usize(..20) {
                        s.tick();
                    }
                    s
                })
                .collect();
            let swing = Interval::new(SWING_TICK_MS, move || {
                for (node, s) in knots.iter().zip(swings.iter_mut()) {
                    s.tick();
                    set_style(node, "transform", &s.transform());
                }
            });
            let mut flicker_rng = rng.fork();
            let flicker = Interval::new(FLICKER_TICK_MS, move || {
                for node in lanterns.iter() {
                    let b = lantern_brightness(&mut flicker_rng);
                    set_style(node, "filter", &format!("brightness({b:.2})"));
                }
            });
            let sway = Interval::new(SWAY_TICK_MS, move || {
                let pose = DragonPose::random(&mut rng);
                set_style(&dragon, "transform", &format!("translateX(-50%) {}", pose.transform()));
            });
            move || drop((swing, flicker, sway))
        });
    }

    let make_wish = {
        let site = site.clone();
        Callback::from(move |_: ()| {
            if let Some(site) = &site {
                random_wish(&site.wishes, site.config.wishes.wishes.len());
            }
        })
    };
    let launch = {
        let site = site.clone();
        Callback::from(move |_: ()| {
            if let Some(site) = &site {
                site.fireworks
                    .with(|sim| sim.queue_salvo(SALVO_SIZE, SALVO_STAGGER_MS, true));
            }
        })
    };

    html! {
        <div class="decorations">
            { for knots.iter().enumerate().map(|(i, node)| html! {
                <div ref={node.clone()} class={classes!("chinese-knot", format!("knot-{}", i + 1))}>{ "🪢" }</div>
            }) }
            { for lanterns.iter().enumerate().map(|(i, node)| html! {
                <div ref={node.clone()} class={classes!("lantern", format!("lantern-{}", i + 1))}>{ "🏮" }</div>
            }) }
            <div ref={dragon} class="chinese-dragon">{ "🐉" }</div>
            <h1 class={classes!("new-year-title", REVEAL_CLASS)}>{ "新年快乐" }</h1>
            <p class={classes!("new-year-subtitle", REVEAL_CLASS)}>{ "辞旧迎新 · 万事如意" }</p>
            <div class={classes!("action-buttons", REVEAL_CLASS)}>
                <ActionButton label="🎁 许个愿" on_press={make_wish} />
                <ActionButton label="🎆 放烟花" on_press={launch} />
            </div>
        </div>
    }
}
