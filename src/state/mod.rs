pub mod events;
pub mod frame_loop;
pub mod handles;
pub mod lifecycle;

pub use events::{CompletionBus, Subscription};
pub use frame_loop::FrameLoop;
pub use handles::{EngineHandle, FirecrackerHandle, FireworksHandle, SnowfallHandle, SynthHandle};
pub use lifecycle::Lifecycle;
