use std::cell::RefCell;
use std::rc::Rc;

use chrono::Local;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use crate::config::WishesConfig;
use crate::model::confetti::{self, ConfettiPiece, CONFETTI_COUNT};
use crate::model::decorations::{is_new_years_day, NEW_YEARS_DAY_WISH_DELAY_MS};
use crate::model::wishes::{
    ModalPhase, WishAction, WishesState, CLOSE_TRANSITION_MS, SPECIAL_DELAY_MS,
    SPECIAL_SNOW_FACTOR, WISH_FIREWORKS, WISH_FIREWORK_STAGGER_MS,
};
use crate::state::{CompletionBus, FireworksHandle, SnowfallHandle};

#[derive(Properties, PartialEq, Clone)]
pub struct WishModalProps {
    pub wishes: UseReducerHandle<WishesState>,
    pub config: WishesConfig,
    pub fireworks: FireworksHandle,
    pub snowfall: SnowfallHandle,
    pub bus: CompletionBus,
}

pub fn random_wish(wishes: &UseReducerDispatcher<WishesState>, count: usize) {
    if count > 0 {
        wishes.dispatch(WishAction::ShowAt(fastrand::usize(..count)));
    }
}

#[function_component]
pub fn WishModal(props: &WishModalProps) -> Html {
    let confetti = use_state(Vec::<ConfettiPiece>::new);
    let confetti_timer = use_mut_ref(|| None::<Timeout>);

    // Scheduled appearances: on load, on New Year's Day, and after completion.
    {
        let dispatcher = props.wishes.dispatcher();
        let cfg = props.config.clone();
        let bus = props.bus.clone();
        use_effect_with((), move |_| {
            let count = cfg.wishes.len();
            let mut timers: Vec<Timeout> = Vec::new();
            if cfg.show_on_load {
                let d = dispatcher.clone();
                timers.push(Timeout::new(cfg.delay_ms, move || random_wish(&d, count)));
            }
            if is_new_years_day(Local::now().date_naive()) {
                log::info!("it's New Year's Day");
                let d = dispatcher.clone();
                timers.push(Timeout::new(NEW_YEARS_DAY_WISH_DELAY_MS, move || {
                    random_wish(&d, count)
                }));
            }
            let special: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
            let subscription = {
                let special = special.clone();
                bus.subscribe(move || {
                    let d = dispatcher.clone();
                    *special.borrow_mut() = Some(Timeout::new(SPECIAL_DELAY_MS, move || {
                        d.dispatch(WishAction::ShowSpecial)
                    }));
                })
            };
            move || {
                drop(subscription);
                special.borrow_mut().take();
                drop(timers);
            }
        });
    }

    // Per-greeting effects, once per show.
    {
        let generation = props.wishes.generation;
        let special = props.wishes.is_special();
        let fireworks = props.fireworks.clone();
        let snowfall = props.snowfall.clone();
        let confetti = confetti.clone();
        let confetti_timer = confetti_timer.clone();
        use_effect_with(generation, move |generation| {
            if *generation > 0 {
                fireworks.with(|sim| {
                    sim.queue_salvo(WISH_FIREWORKS, WISH_FIREWORK_STAGGER_MS as f64, false)
                });
                if special {
                    snowfall.with(|sim| sim.intensify(SPECIAL_SNOW_FACTOR));
                    let pieces = confetti::burst(&mut fastrand::Rng::new(), CONFETTI_COUNT);
                    let lifetime = confetti::burst_lifetime_ms(&pieces);
                    confetti.set(pieces);
                    let confetti = confetti.clone();
                    *confetti_timer.borrow_mut() =
                        Some(Timeout::new(lifetime, move || confetti.set(Vec::new())));
                }
            }
            || ()
        });
    }

    // Exit transition, then removal.
    {
        let phase = props.wishes.phase;
        let dispatcher = props.wishes.dispatcher();
        use_effect_with(phase, move |phase| {
            let timer = (*phase == ModalPhase::Closing).then(|| {
                Timeout::new(CLOSE_TRANSITION_MS, move || {
                    dispatcher.dispatch(WishAction::Remove)
                })
            });
            move || drop(timer)
        });
    }

    // Escape closes while the modal is on screen.
    {
        let visible = props.wishes.phase == ModalPhase::Visible;
        let dispatcher = props.wishes.dispatcher();
        use_effect_with(visible, move |visible| {
            let document = web_sys::window().and_then(|w| w.document());
            let listener = match (*visible, document) {
                (true, Some(doc)) => Some(EventListener::new(&doc, "keydown", move |e| {
                    if let Some(e) = e.dyn_ref::<KeyboardEvent>() {
                        if e.key() == "Escape" {
                            dispatcher.dispatch(WishAction::Close);
                        }
                    }
                })),
                _ => None,
            };
            move || drop(listener)
        });
    }

    let state = &*props.wishes;
    let Some(wish) = state.current() else {
        return html! {};
    };

    let close = {
        let d = props.wishes.dispatcher();
        Callback::from(move |_: MouseEvent| d.dispatch(WishAction::Close))
    };
    let next = {
        let d = props.wishes.dispatcher();
        Callback::from(move |_: MouseEvent| d.dispatch(WishAction::Next))
    };
    let stop = Callback::from(|e: MouseEvent| e.stop_propagation());

    let overlay_class = classes!(
        "wish-overlay",
        match state.phase {
            ModalPhase::Visible => "wish-modal-visible",
            ModalPhase::Closing => "wish-modal-closing",
            ModalPhase::Hidden => "",
        }
    );
    let lines = wish.lines();
    let last = lines.len().saturating_sub(1);

    html! {
        <div class={overlay_class} onclick={close.clone()}>
            <div class="wish-modal" style={format!("--wish-color:{};", wish.color)} onclick={stop}>
                <div class="wish-emoji">{ wish.emoji.clone() }</div>
                <h2 class="wish-title">{ wish.title.clone() }</h2>
                <p class="wish-message">
                    { for lines.iter().enumerate().map(|(i, l)| html! {
                        <>{ l.to_string() }{ if i < last { html! { <br /> } } else { html! {} } }</>
                    }) }
                </p>
                <div class="wish-actions">
                    <button class="wish-button wish-primary" onclick={close}>{ "收下祝福" }</button>
                    if !state.is_special() {
                        <button class="wish-button wish-secondary" onclick={next}>{ "另一条祝福" }</button>
                    }
                </div>
            </div>
            { for confetti.iter().map(|p| html! { <div class="wish-confetti" style={p.style()}></div> }) }
        </div>
    }
}
