pub mod axis;
pub mod live_pitch;
pub mod pitch;
pub mod renderer;
pub mod simulator;
pub mod song;
pub mod store;
pub mod surface;
pub mod term_display;
pub mod transport;
pub mod wav_feed;
