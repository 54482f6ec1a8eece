use std::rc::Rc;

use serde::{Deserialize, Serialize};
use yew::Reducible;

/// Extra fireworks launched whenever a greeting is shown.
pub const WISH_FIREWORKS: u32 = 5;
pub const WISH_FIREWORK_STAGGER_MS: u32 = 200;
/// Exit transition before the modal is removed.
pub const CLOSE_TRANSITION_MS: u32 = 300;
/// Delay between the completion notification and the special greeting.
pub const SPECIAL_DELAY_MS: u32 = 2000;
pub const SPECIAL_SNOW_FACTOR: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wish {
    pub title: String,
    pub message: String,
    pub emoji: String,
    /// CSS color for the title.
    pub color: String,
}

impl Wish {
    pub fn new(title: &str, message: &str, emoji: &str, color: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            emoji: emoji.to_string(),
            color: color.to_string(),
        }
    }

    /// Message split into display lines. Both real newlines and a literal
    /// backslash-n (as typed into JSON config by hand) break the line.
    pub fn lines(&self) -> Vec<&str> {
        self.message
            .split('\n')
            .flat_map(|l| l.split("\\n"))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModalPhase {
    #[default]
    Hidden,
    Visible,
    Closing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shown {
    Regular(usize),
    Special,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WishesState {
    pub wishes: Vec<Wish>,
    pub special: Wish,
    pub index: usize,
    pub shown: Option<Shown>,
    pub phase: ModalPhase,
    /// Bumped on every show so the view can fire per-greeting effects once.
    pub generation: u64,
}

#[derive(Clone, Debug)]
pub enum WishAction {
    ShowAt(usize),
    Next,
    ShowSpecial,
    Close,
    Remove,
    Add(Wish),
}

impl WishesState {
    pub fn new(wishes: Vec<Wish>, special: Wish) -> Self {
        Self {
            wishes,
            special,
            index: 0,
            shown: None,
            phase: ModalPhase::Hidden,
            generation: 0,
        }
    }

    pub fn current(&self) -> Option<&Wish> {
        match self.shown.as_ref()? {
            Shown::Regular(i) => self.wishes.get(*i),
            Shown::Special => Some(&self.special),
        }
    }

    pub fn is_special(&self) -> bool {
        self.shown == Some(Shown::Special)
    }

    fn show(&mut self, shown: Shown) {
        if let Shown::Regular(i) = shown {
            self.index = i;
        }
        self.shown = Some(shown);
        self.phase = ModalPhase::Visible;
        self.generation += 1;
    }
}

impl Reducible for WishesState {
    type Action = WishAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use WishAction::*;
        let mut new = (*self).clone();
        match action {
            ShowAt(i) => {
                if new.wishes.is_empty() {
                    return self;
                }
                let i = i % new.wishes.len();
                new.show(Shown::Regular(i));
            }
            Next => {
                if new.wishes.is_empty() {
                    return self;
                }
                let i = (new.index + 1) % new.wishes.len();
                new.show(Shown::Regular(i));
            }
            ShowSpecial => new.show(Shown::Special),
            Close => {
                if new.phase != ModalPhase::Visible {
                    return self;
                }
                new.phase = ModalPhase::Closing;
            }
            Remove => {
                // A show that raced the exit transition wins.
                if new.phase != ModalPhase::Closing {
                    return self;
                }
                new.phase = ModalPhase::Hidden;
                new.shown = None;
            }
            Add(w) => new.wishes.push(w),
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WishesConfig;

    fn state() -> Rc<WishesState> {
        let cfg = WishesConfig::default();
        Rc::new(WishesState::new(cfg.wishes, cfg.special))
    }

    #[test]
    fn next_wraps_around() {
        let s = state().reduce(WishAction::ShowAt(3));
        assert_eq!(s.index, 3);
        let s = s.reduce(WishAction::Next);
        assert_eq!(s.index, 0);
        assert_eq!(s.current().map(|w| w.emoji.as_str()), Some("🎉"));
        assert_eq!(s.generation, 2);
    }

    #[test]
    fn close_then_remove_hides() {
        let s = state().reduce(WishAction::ShowAt(1));
        assert_eq!(s.phase, ModalPhase::Visible);
        let s = s.reduce(WishAction::Close);
        assert_eq!(s.phase, ModalPhase::Closing);
        assert!(s.current().is_some());
        let s = s.reduce(WishAction::Remove);
        assert_eq!(s.phase, ModalPhase::Hidden);
        assert!(s.current().is_none());
    }

    #[test]
    fn show_during_close_survives_remove() {
        let s = state()
            .reduce(WishAction::ShowAt(0))
            .reduce(WishAction::Close)
            .reduce(WishAction::ShowSpecial)
            .reduce(WishAction::Remove);
        assert_eq!(s.phase, ModalPhase::Visible);
        assert!(s.is_special());
    }

    #[test]
    fn empty_list_ignores_show_and_next() {
        let s = Rc::new(WishesState::new(Vec::new(), Wish::new("t", "m", "e", "#fff")));
        let s = s.reduce(WishAction::ShowAt(2)).reduce(WishAction::Next);
        assert_eq!(s.phase, ModalPhase::Hidden);
        let s = s.reduce(WishAction::Add(Wish::new("a", "b", "c", "#000")));
        let s = s.reduce(WishAction::Next);
        assert_eq!(s.current().map(|w| w.title.as_str()), Some("a"));
    }

    #[test]
    fn message_lines_split_on_both_newline_forms() {
        let w = Wish::new("t", "one\\ntwo\nthree", "e", "#fff");
        assert_eq!(w.lines(), vec!["one", "two", "three"]);
        assert_eq!(WishesConfig::default().special.lines().len(), 2);
    }
}
