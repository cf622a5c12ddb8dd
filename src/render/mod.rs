pub mod renderer;

pub use renderer::{FrameInfo, Renderer};
