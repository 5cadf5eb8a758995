use crate::driver::Driver;
use gl::types::*;
use log::{debug, error, info, warn};
use std::ffi::{CString, NulError};
use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

const EMPTY_LOG: &str = "driver reported failure without a diagnostic log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub fn gl_enum(self) -> GLenum {
        match self {
            StageKind::Vertex => gl::VERTEX_SHADER,
            StageKind::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader compilation failed: {log}")]
    StageCompile { stage: StageKind, log: String },
    #[error("Program linking failed: {log}")]
    ProgramLink { log: String },
    #[error("Program validation failed: {log}")]
    ProgramValidate { log: String },
    #[error("Null byte in shader source: {0}")]
    Nul(#[from] NulError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Vertex and fragment source text for one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    pub fn from_files(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        Ok(Self {
            vertex: fs::read_to_string(vertex_path)?,
            fragment: fs::read_to_string(fragment_path)?,
        })
    }

    /// Pass-through positions, every fragment filled with `color`.
    pub fn solid_fill(color: [f32; 4]) -> Self {
        Self::new(sources::POSITION_VERTEX, sources::solid_fragment(color))
    }
}

pub mod sources {
    /// Forwards attribute 0 to clip space untouched.
    pub const POSITION_VERTEX: &str = r#"#version 330 core
layout (location = 0) in vec3 position;

void main() {
    gl_Position = vec4(position, 1.0);
}
"#;

    pub fn solid_fragment([r, g, b, a]: [f32; 4]) -> String {
        format!(
            r#"#version 330 core
out vec4 FragColor;

void main() {{
    FragColor = vec4({r:.6}, {g:.6}, {b:.6}, {a:.6});
}}
"#
        )
    }
}

/// One compiled stage. Deleted when dropped, which after linking only
/// releases the name since the program keeps the compiled code.
pub struct CompiledShader<D: Driver> {
    driver: Rc<D>,
    id: GLuint,
    stage: StageKind,
}

impl<D: Driver> fmt::Debug for CompiledShader<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledShader")
            .field("id", &self.id)
            .field("stage", &self.stage)
            .finish()
    }
}

impl<D: Driver> Drop for CompiledShader<D> {
    fn drop(&mut self) {
        self.driver.delete_shader(self.id);
    }
}

/// A linked program that also passed validation. Only values of this type
/// can be bound for drawing.
pub struct Program<D: Driver> {
    driver: Rc<D>,
    id: GLuint,
}

impl<D: Driver> Program<D> {
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn bind(&self) {
        self.driver.use_program(self.id);
    }
}

impl<D: Driver> fmt::Debug for Program<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program").field("id", &self.id).finish()
    }
}

impl<D: Driver> Drop for Program<D> {
    fn drop(&mut self) {
        self.driver.delete_program(self.id);
    }
}

fn diagnostic(log: String) -> String {
    let trimmed = log.trim_end_matches(['\0', '\n', ' ']);
    if trimmed.trim().is_empty() {
        EMPTY_LOG.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn compile_stage<D: Driver>(
    driver: &Rc<D>,
    stage: StageKind,
    source: &str,
) -> Result<CompiledShader<D>, ShaderError> {
    let source = CString::new(source).map_err(|e| {
        error!("{stage} shader source contains a null byte at {}", e.nul_position());
        e
    })?;

    let shader = CompiledShader {
        driver: Rc::clone(driver),
        id: driver.create_shader(stage),
        stage,
    };
    driver.shader_source(shader.id, &source);
    driver.compile_shader(shader.id);

    let log = driver.shader_info_log(shader.id);
    if !driver.shader_compile_status(shader.id) {
        let log = diagnostic(log);
        error!("{stage} shader failed to compile:\n{log}");
        return Err(ShaderError::StageCompile { stage, log });
    }

    if !log.trim().is_empty() {
        warn!("{stage} shader compiled with warnings:\n{}", log.trim_end());
    }
    debug!("Compiled {stage} shader {}", shader.id);
    Ok(shader)
}

/// Compiles both stages, links and validates them.
///
/// Both stages are always compiled so every diagnostic reaches the log; the
/// first failure in pipeline order is the one returned.
///
/// Validation runs against whatever GL state is current. Strict core profile
/// drivers fail it unless a vertex array is bound, so bind the one the
/// program will draw with before calling this.
pub fn build_program<D: Driver>(
    driver: &Rc<D>,
    source: &ShaderSource,
) -> Result<Program<D>, ShaderError> {
    let vertex = compile_stage(driver, StageKind::Vertex, &source.vertex);
    let fragment = compile_stage(driver, StageKind::Fragment, &source.fragment);
    let (vertex, fragment) = (vertex?, fragment?);

    let program = Program {
        driver: Rc::clone(driver),
        id: driver.create_program(),
    };
    driver.attach_shader(program.id, vertex.id);
    driver.attach_shader(program.id, fragment.id);
    driver.link_program(program.id);
    driver.detach_shader(program.id, vertex.id);
    driver.detach_shader(program.id, fragment.id);
    drop(vertex);
    drop(fragment);

    if !driver.program_link_status(program.id) {
        let log = diagnostic(driver.program_info_log(program.id));
        error!("Shader program failed to link:\n{log}");
        return Err(ShaderError::ProgramLink { log });
    }

    driver.validate_program(program.id);
    if !driver.program_validate_status(program.id) {
        let log = diagnostic(driver.program_info_log(program.id));
        error!("Shader program failed validation:\n{log}");
        return Err(ShaderError::ProgramValidate { log });
    }

    info!("Linked shader program {}", program.id);
    Ok(program)
}
