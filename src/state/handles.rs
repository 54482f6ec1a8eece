use std::cell::RefCell;
use std::rc::Rc;

use crate::audio::ToneSynth;
use crate::model::firecrackers::FirecrackerField;
use crate::model::fireworks::FireworksSim;
use crate::model::snowfall::SnowfallSim;

/// Shared, disposable handle to one effect engine. Equality is identity so
/// handles can sit in props and context without forcing re-renders.
pub struct EngineHandle<T> {
    inner: Rc<RefCell<Option<T>>>,
}

pub type FireworksHandle = EngineHandle<FireworksSim>;
pub type SnowfallHandle = EngineHandle<SnowfallSim>;
pub type FirecrackerHandle = EngineHandle<FirecrackerField>;
pub type SynthHandle = EngineHandle<ToneSynth>;

impl<T> EngineHandle<T> {
    pub fn new(engine: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Some(engine))),
        }
    }

    /// Runs `f` against the engine. Disposed engines and re-entrant calls
    /// are skipped and yield `None`.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let Ok(mut slot) = self.inner.try_borrow_mut() else {
            log::warn!("engine busy, dropping re-entrant call");
            return None;
        };
        slot.as_mut().map(f)
    }

    pub fn dispose(&self) {
        if let Ok(mut slot) = self.inner.try_borrow_mut() {
            slot.take();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().is_none()
    }
}

impl<T> Clone for EngineHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> PartialEq for EngineHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposed_handle_is_a_no_op() {
        let h = EngineHandle::new(5_u32);
        let other = h.clone();
        assert!(h == other);
        assert_eq!(h.with(|v| *v + 1), Some(6));
        other.dispose();
        assert!(h.is_disposed());
        assert_eq!(h.with(|v| *v), None);
    }

    #[test]
    fn reentrant_call_is_skipped() {
        let h = EngineHandle::new(Vec::<u8>::new());
        let inner = h.clone();
        let nested = h.with(|_| inner.with(|v| v.push(1)));
        assert_eq!(nested, Some(None));
        assert_eq!(h.with(|v| v.len()), Some(0));
    }

    #[test]
    fn identity_not_value_equality() {
        assert!(EngineHandle::new(1) != EngineHandle::new(1));
    }
}
