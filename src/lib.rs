pub mod config;
pub mod context;
pub mod driver;
pub mod geometry;
pub mod mesh;
pub mod renderer;
pub mod shader;

// Re-export commonly used types
pub use config::AppConfig;
pub use context::GlContext;
pub use driver::{Driver, NativeGl};
pub use geometry::{Vertex, TRIANGLE};
pub use mesh::Mesh;
pub use renderer::{Renderer, Scene};
pub use shader::{build_program, compile_stage, Program, ShaderError, ShaderSource, StageKind};
