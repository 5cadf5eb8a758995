use crate::driver::Driver;
use crate::geometry::Vertex;
use gl::types::*;
use log::debug;
use std::fmt;
use std::mem;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("Mesh has no vertices")]
    Empty,
    #[error("Vertex count {0} does not form whole triangles")]
    PartialTriangle(usize),
}

/// Static triangle list in a VAO with one VBO; attribute 0 is the position.
pub struct Mesh<D: Driver> {
    driver: Rc<D>,
    vao: GLuint,
    vbo: GLuint,
    vertex_count: GLsizei,
}

impl<D: Driver> Mesh<D> {
    pub fn upload(driver: &Rc<D>, vertices: &[Vertex]) -> Result<Self, MeshError> {
        if vertices.is_empty() {
            return Err(MeshError::Empty);
        }
        if vertices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(vertices.len()));
        }

        let mesh = Mesh {
            driver: Rc::clone(driver),
            vao: driver.create_vertex_array(),
            vbo: driver.create_buffer(),
            vertex_count: vertices.len() as GLsizei,
        };

        driver.bind_vertex_array(mesh.vao);
        driver.bind_array_buffer(mesh.vbo);
        driver.array_buffer_data(bytemuck::cast_slice(vertices));
        driver.vertex_attrib_f32(0, Vertex::COMPONENTS, mem::size_of::<Vertex>() as GLsizei, 0);
        driver.enable_vertex_attrib(0);
        driver.bind_array_buffer(0);
        driver.bind_vertex_array(0);

        debug!("Uploaded {} vertices to buffer {}", vertices.len(), mesh.vbo);
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count as usize
    }

    pub fn bind(&self) {
        self.driver.bind_vertex_array(self.vao);
    }

    pub fn draw(&self) {
        self.bind();
        self.driver.draw_triangles(0, self.vertex_count);
    }
}

impl<D: Driver> fmt::Debug for Mesh<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("vao", &self.vao)
            .field("vbo", &self.vbo)
            .field("vertex_count", &self.vertex_count)
            .finish()
    }
}

impl<D: Driver> Drop for Mesh<D> {
    fn drop(&mut self) {
        self.driver.delete_vertex_array(self.vao);
        self.driver.delete_buffer(self.vbo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{Call, RecordingDriver};
    use crate::geometry::TRIANGLE;

    #[test]
    fn test_upload_copies_vertex_bytes() {
        let driver = Rc::new(RecordingDriver::default());
        let mesh = Mesh::upload(&driver, &TRIANGLE[..]).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        let stored = driver.buffer_contents(mesh.vbo).unwrap();
        assert_eq!(stored, bytemuck::cast_slice::<Vertex, u8>(&TRIANGLE[..]));
        // Upload leaves no vertex array bound
        assert_eq!(driver.take_calls().last(), Some(&Call::BindVertexArray(0)));
    }

    #[test]
    fn test_draw_binds_and_draws_all_vertices() {
        let driver = Rc::new(RecordingDriver::default());
        let mesh = Mesh::upload(&driver, &TRIANGLE[..]).unwrap();
        driver.take_calls();

        mesh.draw();
        assert_eq!(
            driver.take_calls(),
            vec![Call::BindVertexArray(mesh.vao), Call::DrawTriangles(0, 3)]
        );
    }

    #[test]
    fn test_drop_releases_gpu_objects() {
        let driver = Rc::new(RecordingDriver::default());
        let mesh = Mesh::upload(&driver, &TRIANGLE[..]).unwrap();
        assert_eq!(driver.live_vertex_arrays(), 1);
        assert_eq!(driver.live_buffers(), 1);

        drop(mesh);
        assert_eq!(driver.live_vertex_arrays(), 0);
        assert_eq!(driver.live_buffers(), 0);
    }

    #[test]
    fn test_rejects_bad_vertex_counts() {
        let driver = Rc::new(RecordingDriver::default());
        assert_eq!(Mesh::upload(&driver, &[]).unwrap_err(), MeshError::Empty);
        assert_eq!(
            Mesh::upload(&driver, &TRIANGLE[..2]).unwrap_err(),
            MeshError::PartialTriangle(2)
        );
        assert_eq!(driver.live_buffers(), 0);
    }
}
