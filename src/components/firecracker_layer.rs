use gloo::timers::callback::Interval;
use yew::prelude::*;

use crate::state::FirecrackerHandle;
use crate::util::now_ms;

const STEP_MS: u32 = 100;

#[derive(Properties, PartialEq, Clone)]
pub struct FirecrackerLayerProps {
    pub firecrackers: FirecrackerHandle,
}

/// Renders live firecrackers as animated glyphs. Spawning happens elsewhere;
/// this layer only steps the field and re-renders when it changes.
#[function_component]
pub fn FirecrackerLayer(props: &FirecrackerLayerProps) -> Html {
    let update = use_force_update();

    {
        let field = props.firecrackers.clone();
        let update = update.clone();
        use_effect_with((), move |_| {
            let mut last = None;
            let interval = Interval::new(STEP_MS, move || {
                let rev = field.with(|f| {
                    f.step(now_ms());
                    f.revision()
                });
                if rev.is_some() && rev != last {
                    last = rev;
                    update.force_update();
                }
            });
            move || drop(interval)
        });
    }

    let (crackers, bursts) = props
        .firecrackers
        .with(|f| {
            let crackers: Html = f
                .crackers
                .iter()
                .filter(|c| !c.exploded)
                .map(|c| {
                    html! {
                        <div key={c.id} class="firecracker" style={c.style()}>{ c.glyph }</div>
                    }
                })
                .collect();
            let bursts: Html = f
                .bursts
                .iter()
                .map(|b| {
                    html! {
                        <div key={b.id} class="firecracker-explosion" style={b.style()}>{ b.glyph }</div>
                    }
                })
                .collect();
            (crackers, bursts)
        })
        .unwrap_or_default();

    html! {
        <div class="firecracker-layer">
            { crackers }
            { bursts }
        </div>
    }
}
