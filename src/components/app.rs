use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;
use yew::prelude::*;

use super::countdown_panel::CountdownPanel;
use super::decorations::Decorations;
use super::firecracker_layer::FirecrackerLayer;
use super::fireworks_canvas::FireworksCanvas;
use super::gallery_view::GalleryView;
use super::snowfall_layer::SnowfallLayer;
use super::wish_modal::WishModal;
use crate::audio::ToneSynth;
use crate::config::SiteConfig;
use crate::model::celebration::{Cascade, CascadeEvent};
use crate::model::decorations::is_revealed;
use crate::model::firecrackers::FirecrackerField;
use crate::model::fireworks::FireworksSim;
use crate::model::snowfall::SnowfallSim;
use crate::model::wishes::WishesState;
use crate::state::{
    CompletionBus, FirecrackerHandle, FireworksHandle, SnowfallHandle, SynthHandle,
};
use crate::util::{now_ms, viewport_size};

/// Cascade driver resolution.
const CASCADE_TICK_MS: u32 = 50;
/// Elements faded in as they scroll into view.
pub const REVEAL_CLASS: &str = "reveal";

/// Collaborators shared with deeply nested components.
#[derive(Clone, PartialEq)]
pub struct SiteContext {
    pub config: Rc<SiteConfig>,
    pub fireworks: FireworksHandle,
    /// Click-through layer above the page for button sparks.
    pub embers: FireworksHandle,
    pub snowfall: SnowfallHandle,
    pub firecrackers: FirecrackerHandle,
    pub synth: SynthHandle,
    pub bus: CompletionBus,
    pub wishes: UseReducerDispatcher<WishesState>,
}

#[derive(Properties, PartialEq, Clone)]
pub struct AppProps {
    pub config: Rc<SiteConfig>,
}

struct Engines {
    fireworks: FireworksHandle,
    embers: FireworksHandle,
    snowfall: SnowfallHandle,
    firecrackers: FirecrackerHandle,
    synth: SynthHandle,
    bus: CompletionBus,
}

impl Engines {
    fn new(cfg: &SiteConfig) -> Self {
        let (w, h) = viewport_size();
        let mut rng = fastrand::Rng::new();
        let engines = Self {
            fireworks: FireworksHandle::new(FireworksSim::new(
                cfg.fireworks.clone(),
                w,
                h,
                rng.fork(),
            )),
            embers: FireworksHandle::new(FireworksSim::new(
                cfg.fireworks.clone(),
                w,
                h,
                rng.fork(),
            )),
            snowfall: SnowfallHandle::new(SnowfallSim::new(cfg.snowfall.clone(), w, h, rng.fork())),
            firecrackers: FirecrackerHandle::new(FirecrackerField::new(rng.fork())),
            synth: SynthHandle::new(ToneSynth::new(cfg.sound.clone(), rng.fork())),
            bus: CompletionBus::default(),
        };
        // Nothing steps a hidden snowfall, so boosts aimed at it are dropped.
        if !cfg.decorations.show_snowfall {
            engines.snowfall.dispose();
        }
        engines
    }

    fn dispose(&self) {
        self.fireworks.dispose();
        self.embers.dispose();
        self.snowfall.dispose();
        self.firecrackers.dispose();
        self.synth.dispose();
    }
}

fn reveal_visible() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(doc) = window.document() else {
        return;
    };
    let vh = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let Ok(nodes) = doc.query_selector_all(&format!(".{REVEAL_CLASS}")) else {
        return;
    };
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        if is_revealed(el.get_bounding_client_rect().top(), vh) {
            let style = el.style();
            let _ = style.set_property("opacity", "1");
            let _ = style.set_property("transform", "translateY(0)");
        }
    }
}

/// Applies one cascade step to the engines.
fn apply(event: CascadeEvent, engines: &Engines) {
    match event {
        CascadeEvent::IntensifyFireworks => {
            engines.fireworks.with(|sim| sim.intensify());
        }
        CascadeEvent::Launch(n) => {
            engines.fireworks.with(|sim| {
                for _ in 0..n {
                    sim.launch_random(true);
                }
            });
        }
        CascadeEvent::Firecracker => {
            let (w, h) = viewport_size();
            engines.firecrackers.with(|f| f.spawn(now_ms(), w, h));
        }
        CascadeEvent::IntensifySnow(factor) => {
            engines.snowfall.with(|sim| sim.intensify(factor));
        }
        CascadeEvent::RestoreFireworks => {
            log::info!("celebration over, fireworks back to steady");
            engines.fireworks.with(|sim| sim.reset_auto_launch());
        }
    }
}

#[function_component]
pub fn App(props: &AppProps) -> Html {
    let cfg = props.config.clone();
    let engines = use_memo((), {
        let cfg = cfg.clone();
        move |_| Engines::new(&cfg)
    });
    let wishes = use_reducer({
        let cfg = cfg.clone();
        move || WishesState::new(cfg.wishes.wishes.clone(), cfg.wishes.special.clone())
    });

    // Celebration cascade on completion, and teardown of every engine.
    {
        let engines = engines.clone();
        let celebrate = cfg.decorations.celebration_mode;
        use_effect_with((), move |_| {
            let driver: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
            let subscription = {
                let engines = engines.clone();
                let driver = driver.clone();
                engines.bus.clone().subscribe(move || {
                    if !celebrate {
                        return;
                    }
                    log::info!("celebration started");
                    let mut cascade = Cascade::new(&mut fastrand::Rng::new());
                    let mut last = now_ms();
                    let engines = engines.clone();
                    let slot = driver.clone();
                    let tick = move || {
                        let now = now_ms();
                        for event in cascade.advance(now - last) {
                            apply(event, &engines);
                        }
                        last = now;
                        if cascade.is_finished() {
                            slot.borrow_mut().take();
                        }
                    };
                    *driver.borrow_mut() = Some(Interval::new(CASCADE_TICK_MS, tick));
                })
            };
            move || {
                drop(subscription);
                driver.borrow_mut().take();
                engines.dispose();
            }
        });
    }

    {
        use_effect_with((), move |_| {
            reveal_visible();
            let scroll = web_sys::window()
                .map(|w| EventListener::new(&w, "scroll", |_| reveal_visible()));
            move || drop(scroll)
        });
    }

    // The first click anywhere unlocks audio.
    {
        let synth = engines.synth.clone();
        use_effect_with((), move |_| {
            let document = web_sys::window().and_then(|w| w.document());
            let listener = document.map(|doc| {
                EventListener::new(&doc, "click", move |_| {
                    synth.with(|s| s.unlock());
                })
            });
            move || drop(listener)
        });
    }

    let ctx = SiteContext {
        config: cfg.clone(),
        fireworks: engines.fireworks.clone(),
        embers: engines.embers.clone(),
        snowfall: engines.snowfall.clone(),
        firecrackers: engines.firecrackers.clone(),
        synth: engines.synth.clone(),
        bus: engines.bus.clone(),
        wishes: wishes.dispatcher(),
    };

    html! {
        <ContextProvider<SiteContext> context={ctx}>
            <FireworksCanvas fireworks={engines.fireworks.clone()} synth={engines.synth.clone()} />
            if cfg.decorations.show_snowfall {
                <SnowfallLayer snowfall={engines.snowfall.clone()} />
            }
            <FirecrackerLayer firecrackers={engines.firecrackers.clone()} />
            <main class="page">
                if cfg.decorations.show_decorations {
                    <Decorations />
                }
                <CountdownPanel config={cfg.countdown.clone()} bus={engines.bus.clone()} />
                <GalleryView config={cfg.gallery.clone()} />
            </main>
            <WishModal
                wishes={wishes.clone()}
                config={cfg.wishes.clone()}
                fireworks={engines.fireworks.clone()}
                snowfall={engines.snowfall.clone()}
                bus={engines.bus.clone()}
            />
            <FireworksCanvas fireworks={engines.embers.clone()} synth={engines.synth.clone()} overlay={true} />
        </ContextProvider<SiteContext>>
    }
}
