use crate::config::{SceneConfig, SceneKind};
use crate::driver::Driver;
use crate::geometry::equilateral_triangle;
use crate::mesh::{Mesh, MeshError};
use crate::shader::{build_program, Program, ShaderError, ShaderSource};
use log::info;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// What gets drawn after the clear.
pub enum Scene<D: Driver> {
    Clear,
    Triangle { program: Program<D>, mesh: Mesh<D> },
}

pub struct Renderer<D: Driver> {
    driver: Rc<D>,
    clear_color: [f32; 4],
    scene: Scene<D>,
}

impl<D: Driver> Renderer<D> {
    pub fn new(driver: &Rc<D>, config: &SceneConfig) -> Result<Self, RenderError> {
        let scene = match config.kind {
            SceneKind::Clear => Scene::Clear,
            SceneKind::Triangle => {
                let mesh = Mesh::upload(driver, &equilateral_triangle(config.side_length))?;
                // Validate against the vertex array the program will draw with
                mesh.bind();
                let program = build_program(driver, &ShaderSource::solid_fill(config.fill_color));
                driver.bind_vertex_array(0);
                Scene::Triangle {
                    program: program?,
                    mesh,
                }
            }
        };
        info!("Scene ready: {:?}", config.kind);
        Ok(Self::with_scene(driver, config.clear_color, scene))
    }

    pub fn with_scene(driver: &Rc<D>, clear_color: [f32; 4], scene: Scene<D>) -> Self {
        Self {
            driver: Rc::clone(driver),
            clear_color,
            scene,
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        self.driver.viewport(0, 0, width, height);
    }

    pub fn render_frame(&self) {
        self.driver.clear_color(self.clear_color);
        self.driver.clear();
        if let Scene::Triangle { program, mesh } = &self.scene {
            program.bind();
            mesh.draw();
        }
    }
}
