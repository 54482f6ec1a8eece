pub mod celebration;
pub mod confetti;
pub mod countdown;
pub mod decorations;
pub mod firecrackers;
pub mod fireworks;
pub mod gallery;
pub mod snowfall;
pub mod wishes;
