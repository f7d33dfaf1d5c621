mod outputs;
mod plan;
mod render;

pub use outputs::run_outputs;
pub use plan::run_plan;
pub use render::{RenderArgs, run_render};
