use std::collections::HashSet;
use std::rc::Rc;

use yew::Reducible;

use crate::config::SortOrder;
use crate::error::{SiteError, SiteResult};

#[derive(Clone, Debug, PartialEq)]
pub struct Gallery {
    images: Vec<String>,
    allowed: Vec<String>,
    /// Index of the image in the lightbox, if open.
    open: Option<usize>,
}

fn extension_allowed(path: &str, allowed: &[String]) -> bool {
    let lower = path.to_lowercase();
    allowed.iter().any(|ext| lower.ends_with(&ext.to_lowercase()))
}

impl Gallery {
    pub fn new(
        images: Vec<String>,
        order: SortOrder,
        allowed: Vec<String>,
        rng: &mut fastrand::Rng,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut images: Vec<String> = images
            .into_iter()
            .filter(|p| {
                if !extension_allowed(p, &allowed) {
                    log::warn!("gallery: skipping {p}, extension not allowed");
                    return false;
                }
                if !seen.insert(p.clone()) {
                    log::warn!("gallery: skipping duplicate {p}");
                    return false;
                }
                true
            })
            .collect();
        match order {
            SortOrder::Name => images.sort(),
            SortOrder::Random => rng.shuffle(&mut images),
        }
        Self {
            images,
            allowed,
            open: None,
        }
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn current(&self) -> Option<usize> {
        self.open
    }

    pub fn current_path(&self) -> Option<&str> {
        self.open.and_then(|i| self.images.get(i)).map(String::as_str)
    }

    pub fn add_image(&mut self, path: &str) -> SiteResult<()> {
        if !extension_allowed(path, &self.allowed) {
            return Err(SiteError::UnsupportedImage(path.to_string()));
        }
        if self.images.iter().any(|p| p == path) {
            log::warn!("gallery: {path} is already listed");
            return Ok(());
        }
        self.images.push(path.to_string());
        Ok(())
    }

    pub fn open(&mut self, i: usize) {
        if i < self.images.len() {
            self.open = Some(i);
        }
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn next(&mut self) {
        if let Some(i) = self.open {
            self.open = Some((i + 1) % self.images.len());
        }
    }

    pub fn previous(&mut self) {
        if let Some(i) = self.open {
            let n = self.images.len();
            self.open = Some((i + n - 1) % n);
        }
    }

    /// `"图片 n/m"` for the open image, one-based.
    pub fn caption(&self) -> Option<String> {
        self.open
            .map(|i| format!("图片 {}/{}", i + 1, self.images.len()))
    }

    /// Lightbox keys; returns whether the key was consumed.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if self.open.is_none() {
            return false;
        }
        match key {
            "Escape" => self.close(),
            "ArrowRight" => self.next(),
            "ArrowLeft" => self.previous(),
            _ => return false,
        }
        true
    }
}

#[derive(Clone, Debug)]
pub enum GalleryAction {
    Open(usize),
    Close,
    Next,
    Previous,
    Key(String),
}

impl Reducible for Gallery {
    type Action = GalleryAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut new = (*self).clone();
        match action {
            GalleryAction::Open(i) => new.open(i),
            GalleryAction::Close => new.close(),
            GalleryAction::Next => new.next(),
            GalleryAction::Previous => new.previous(),
            GalleryAction::Key(k) => {
                if !new.handle_key(&k) {
                    return self;
                }
            }
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GalleryConfig;

    fn gallery(order: SortOrder, images: &[&str]) -> Gallery {
        Gallery::new(
            images.iter().map(|s| s.to_string()).collect(),
            order,
            GalleryConfig::default().allowed_extensions,
            &mut fastrand::Rng::with_seed(9),
        )
    }

    #[test]
    fn filters_and_sorts_by_name() {
        let g = gallery(SortOrder::Name, &["b.PNG", "a.jpg", "notes.txt", "c.jpeg"]);
        assert_eq!(g.images(), &["a.jpg", "b.PNG", "c.jpeg"]);
    }

    #[test]
    fn duplicate_paths_are_listed_once() {
        let mut g = gallery(SortOrder::Name, &["a.jpg", "b.jpg", "a.jpg"]);
        assert_eq!(g.images(), &["a.jpg", "b.jpg"]);
        g.add_image("b.jpg").unwrap();
        assert_eq!(g.images().len(), 2);
    }

    #[test]
    fn random_order_keeps_every_image() {
        let g = gallery(SortOrder::Random, &["1.jpg", "2.jpg", "3.jpg", "4.jpg"]);
        let mut sorted = g.images().to_vec();
        sorted.sort();
        assert_eq!(sorted, vec!["1.jpg", "2.jpg", "3.jpg", "4.jpg"]);
    }

    #[test]
    fn add_image_rejects_unsupported() {
        let mut g = gallery(SortOrder::Name, &[]);
        assert!(g.is_empty());
        assert!(matches!(
            g.add_image("clip.gif"),
            Err(SiteError::UnsupportedImage(p)) if p == "clip.gif"
        ));
        g.add_image("x.png").unwrap();
        assert_eq!(g.images().len(), 1);
    }

    #[test]
    fn navigation_wraps_and_captions() {
        let mut g = gallery(SortOrder::Name, &["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(g.caption(), None);
        g.open(0);
        g.previous();
        assert_eq!(g.caption().as_deref(), Some("图片 3/3"));
        g.next();
        assert_eq!(g.current_path(), Some("a.jpg"));
        g.open(7);
        assert_eq!(g.current(), Some(0));
    }

    #[test]
    fn keys_only_act_while_open() {
        let mut g = gallery(SortOrder::Name, &["a.jpg", "b.jpg"]);
        assert!(!g.handle_key("ArrowRight"));
        g.open(0);
        assert!(g.handle_key("ArrowRight"));
        assert_eq!(g.current(), Some(1));
        assert!(!g.handle_key("Enter"));
        assert!(g.handle_key("Escape"));
        assert_eq!(g.current(), None);
    }
}
