use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Local, TimeZone};
use gloo::timers::callback::{Interval, Timeout};
use yew::prelude::*;

use crate::config::CountdownConfig;
use crate::error::{ConfigError, SiteResult};
use crate::model::countdown::{
    ChangedUnits, Countdown, CountdownPhase, Remaining, Tick, Urgency, PULSE_MS,
};
use crate::state::CompletionBus;
use crate::util::now_ms;

const LABELS: [&str; 4] = ["天", "时", "分", "秒"];
const UNIT_IDS: [&str; 4] = ["days", "hours", "minutes", "seconds"];

/// What the panel currently shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CountdownView {
    pub remaining: Remaining,
    pub urgency: Urgency,
    pub pulsing: ChangedUnits,
    pub completed: bool,
}

pub enum CountdownViewAction {
    Show {
        remaining: Remaining,
        changed: ChangedUnits,
        urgency: Urgency,
    },
    ClearPulse,
    Complete,
}

impl Reducible for CountdownView {
    type Action = CountdownViewAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use CountdownViewAction::*;
        let mut new = (*self).clone();
        match action {
            Show {
                remaining,
                mut changed,
                urgency,
            } => {
                // Seconds always pulse, even when the value repeats.
                changed.seconds = true;
                new.remaining = remaining;
                new.pulsing = changed;
                new.urgency = urgency;
            }
            ClearPulse => new.pulsing = ChangedUnits::default(),
            Complete => {
                new.remaining = Remaining::ZERO;
                new.pulsing = ChangedUnits::default();
                new.urgency = Urgency::Calm;
                new.completed = true;
            }
        }
        Rc::new(new)
    }
}

fn pulse_class(unit: usize) -> &'static str {
    // The seconds digit pulses; the larger units bounce.
    if unit == 3 {
        "countdown-pulse"
    } else {
        "countdown-bounce"
    }
}

/// Target instant in epoch milliseconds, interpreting the configured date as
/// local time.
fn target_millis(cfg: &CountdownConfig) -> SiteResult<f64> {
    let naive = cfg.target()?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| ConfigError::TargetDate {
            value: cfg.target_date.clone(),
            reason: "does not exist in the local time zone".to_string(),
        })?;
    Ok(local.timestamp_millis() as f64)
}

#[derive(Properties, PartialEq, Clone)]
pub struct CountdownPanelProps {
    pub config: CountdownConfig,
    pub bus: CompletionBus,
}

#[function_component]
pub fn CountdownPanel(props: &CountdownPanelProps) -> Html {
    let view = use_reducer(CountdownView::default);

    {
        let view = view.clone();
        let cfg = props.config.clone();
        let bus = props.bus.clone();
        use_effect_with((), move |_| {
            let target = target_millis(&cfg).unwrap_or_else(|e| {
                log::error!("{e}; counting down to now");
                now_ms()
            });
            let countdown = Rc::new(RefCell::new(Countdown::new(target)));
            let interval = Rc::new(RefCell::new(None::<Interval>));
            let pulse = Rc::new(RefCell::new(None::<Timeout>));
            countdown.borrow_mut().start();
            log::debug!("countdown started, target {}", cfg.target_date);

            let tick = {
                let countdown = countdown.clone();
                let interval = interval.clone();
                let pulse = pulse.clone();
                move || {
                    let t = countdown.borrow_mut().tick(now_ms());
                    match t {
                        Tick::Suppressed => {}
                        Tick::Updated {
                            remaining,
                            changed,
                            urgency,
                        } => {
                            view.dispatch(CountdownViewAction::Show {
                                remaining,
                                changed,
                                urgency,
                            });
                            let view = view.clone();
                            *pulse.borrow_mut() = Some(Timeout::new(PULSE_MS, move || {
                                view.dispatch(CountdownViewAction::ClearPulse)
                            }));
                        }
                        Tick::Completed { .. } => {
                            interval.borrow_mut().take();
                            pulse.borrow_mut().take();
                            view.dispatch(CountdownViewAction::Complete);
                            bus.publish();
                        }
                    }
                }
            };
            tick();
            if countdown.borrow().phase() == CountdownPhase::Running {
                *interval.borrow_mut() = Some(Interval::new(cfg.update_interval_ms, tick));
            }
            move || {
                countdown.borrow_mut().dispose();
                interval.borrow_mut().take();
                pulse.borrow_mut().take();
            }
        });
    }

    if view.completed {
        return html! {
            <div id="countdown-container" class="countdown-container reveal">
                <div class="celebration-message celebration-pulse">
                    <h2>{ props.config.completed_title.clone() }</h2>
                    { for props.config.completed_lines.iter().map(|l| html! { <p>{ l.clone() }</p> }) }
                </div>
            </div>
        };
    }

    let fields = view.remaining.fields();
    let pulsing = view.pulsing.as_array();
    let container_class = classes!("countdown-container", "reveal", view.urgency.css_class());
    html! {
        <div id="countdown-container" class={container_class}>
            <h1 class="countdown-title">{ props.config.title.clone() }</h1>
            <div class="countdown-numbers">
                { for (0..4).map(|i| {
                    let number_class = classes!(
                        "countdown-number",
                        pulsing[i].then(|| pulse_class(i)),
                    );
                    html! {
                        <div class="countdown-item">
                            <div class="countdown-number-container">
                                <span id={format!("countdown-{}", UNIT_IDS[i])} class={number_class}>
                                    { fields[i].clone() }
                                </span>
                                <div class="countdown-decoration"></div>
                            </div>
                            <span class="countdown-label">{ LABELS[i] }</span>
                        </div>
                    }
                }) }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_always_pulse_and_clear() {
        let v = Rc::new(CountdownView::default()).reduce(CountdownViewAction::Show {
            remaining: Remaining::from_millis(90_000.0),
            changed: ChangedUnits::default(),
            urgency: Urgency::Calm,
        });
        assert_eq!(v.pulsing.as_array(), [false, false, false, true]);
        let v = v.reduce(CountdownViewAction::ClearPulse);
        assert_eq!(v.pulsing, ChangedUnits::default());
        let v = v.reduce(CountdownViewAction::Complete);
        assert!(v.completed);
        assert!(v.remaining.is_zero());
    }
}
