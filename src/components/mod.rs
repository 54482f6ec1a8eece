pub mod app;
pub mod countdown_panel;
pub mod decorations;
pub mod firecracker_layer;
pub mod fireworks_canvas;
pub mod gallery_view;
pub mod snowfall_layer;
pub mod wish_modal;
