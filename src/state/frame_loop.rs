use std::cell::RefCell;
use std::rc::Rc;

use gloo::render::{request_animation_frame, AnimationFrame};

/// Delta reported for the first frame.
const FIRST_FRAME_MS: f64 = 1000.0 / 60.0;
/// Gaps longer than this (hidden tab, debugger) are clamped.
const MAX_FRAME_MS: f64 = 100.0;

type Slot = Rc<RefCell<Option<AnimationFrame>>>;

/// A requestAnimationFrame loop passing the elapsed milliseconds to its
/// callback. The pending frame is cancelled when the loop is dropped.
pub struct FrameLoop {
    frame: Slot,
}

impl FrameLoop {
    pub fn start<F>(on_frame: F) -> Self
    where
        F: FnMut(f64) + 'static,
    {
        let frame: Slot = Rc::new(RefCell::new(None));
        schedule(frame.clone(), Rc::new(RefCell::new(on_frame)), None);
        log::debug!("frame loop started");
        Self { frame }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.frame.borrow_mut().take();
        log::debug!("frame loop stopped");
    }
}

fn schedule<F>(slot: Slot, on_frame: Rc<RefCell<F>>, last: Option<f64>)
where
    F: FnMut(f64) + 'static,
{
    let next = slot.clone();
    let handle = request_animation_frame(move |ts| {
        let dt = last.map_or(FIRST_FRAME_MS, |l| frame_delta(l, ts));
        (on_frame.borrow_mut())(dt);
        // Dropped loops leave the slot empty; don't resurrect them.
        if next.borrow().is_some() {
            schedule(next, on_frame, Some(ts));
        }
    });
    *slot.borrow_mut() = Some(handle);
}

fn frame_delta(last: f64, now: f64) -> f64 {
    (now - last).clamp(0.0, MAX_FRAME_MS)
}
