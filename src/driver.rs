//! The slice of the OpenGL API this crate talks to.
//!
//! Everything that owns a GPU object goes through [`Driver`] so the object
//! lifetimes can be checked without a live context.

use crate::shader::StageKind;
use gl::types::*;
use std::ffi::{c_void, CStr, CString};
use std::marker::PhantomData;
use std::ptr;

pub trait Driver {
    fn create_shader(&self, stage: StageKind) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &CStr);
    fn compile_shader(&self, shader: GLuint);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn program_link_status(&self, program: GLuint) -> bool;
    fn validate_program(&self, program: GLuint);
    fn program_validate_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn use_program(&self, program: GLuint);
    fn delete_program(&self, program: GLuint);

    fn create_vertex_array(&self) -> GLuint;
    fn bind_vertex_array(&self, vao: GLuint);
    fn delete_vertex_array(&self, vao: GLuint);
    fn create_buffer(&self) -> GLuint;
    fn bind_array_buffer(&self, buffer: GLuint);
    fn array_buffer_data(&self, data: &[u8]);
    /// Points attribute `index` at `f32` components of the bound array buffer.
    fn vertex_attrib_f32(&self, index: GLuint, components: GLint, stride: GLsizei, offset: usize);
    fn enable_vertex_attrib(&self, index: GLuint);
    fn delete_buffer(&self, buffer: GLuint);

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn clear_color(&self, rgba: [f32; 4]);
    fn clear(&self);
    fn draw_triangles(&self, first: GLint, count: GLsizei);
    fn read_pixel(&self, x: GLint, y: GLint) -> [u8; 4];
}

/// Calls straight into the function pointers loaded by the `gl` crate.
///
/// Not `Send`: GL calls are only valid on the thread owning the current context.
pub struct NativeGl {
    _not_send: PhantomData<*const ()>,
}

impl NativeGl {
    /// Resolves every GL entry point through `loader`.
    ///
    /// # Safety
    /// A GL context must be current on this thread, and must stay current for
    /// as long as the returned value (or anything built from it) is used.
    pub unsafe fn load<F>(mut loader: F) -> Self
    where
        F: FnMut(&CStr) -> *const c_void,
    {
        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => loader(&symbol),
            Err(_) => ptr::null(),
        });
        Self {
            _not_send: PhantomData,
        }
    }

    pub fn version_string(&self) -> String {
        let version = unsafe { gl::GetString(gl::VERSION) };
        if version.is_null() {
            return String::from("unknown");
        }
        unsafe { CStr::from_ptr(version as *const _) }
            .to_string_lossy()
            .into_owned()
    }

    fn read_info_log(len: GLint, fill: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar)) -> String {
        if len <= 0 {
            return String::new();
        }
        let mut buffer: Vec<u8> = vec![0; len as usize];
        let mut written: GLsizei = 0;
        fill(len, &mut written as *mut GLsizei, buffer.as_mut_ptr() as *mut GLchar);
        buffer.truncate(written.clamp(0, len) as usize);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Driver for NativeGl {
    fn create_shader(&self, stage: StageKind) -> GLuint {
        unsafe { gl::CreateShader(stage.gl_enum()) }
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        unsafe { gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null()) }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success) };
        success != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len = 0;
        unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len) };
        Self::read_info_log(len, |size, written, buf| unsafe {
            gl::GetShaderInfoLog(shader, size, written, buf)
        })
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut success) };
        success != 0
    }

    fn validate_program(&self, program: GLuint) {
        unsafe { gl::ValidateProgram(program) }
    }

    fn program_validate_status(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(program, gl::VALIDATE_STATUS, &mut success) };
        success != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len) };
        Self::read_info_log(len, |size, written, buf| unsafe {
            gl::GetProgramInfoLog(program, size, written, buf)
        })
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn create_vertex_array(&self) -> GLuint {
        let mut vao = 0;
        unsafe { gl::GenVertexArrays(1, &mut vao) };
        vao
    }

    fn bind_vertex_array(&self, vao: GLuint) {
        unsafe { gl::BindVertexArray(vao) }
    }

    fn delete_vertex_array(&self, vao: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &vao) }
    }

    fn create_buffer(&self) -> GLuint {
        let mut buffer = 0;
        unsafe { gl::GenBuffers(1, &mut buffer) };
        buffer
    }

    fn bind_array_buffer(&self, buffer: GLuint) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, buffer) }
    }

    fn array_buffer_data(&self, data: &[u8]) {
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                data.len() as GLsizeiptr,
                data.as_ptr() as *const _,
                gl::STATIC_DRAW,
            )
        }
    }

    fn vertex_attrib_f32(&self, index: GLuint, components: GLint, stride: GLsizei, offset: usize) {
        unsafe {
            gl::VertexAttribPointer(
                index,
                components,
                gl::FLOAT,
                gl::FALSE,
                stride,
                offset as *const _,
            )
        }
    }

    fn enable_vertex_attrib(&self, index: GLuint) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn delete_buffer(&self, buffer: GLuint) {
        unsafe { gl::DeleteBuffers(1, &buffer) }
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { gl::Viewport(x, y, width, height) }
    }

    fn clear_color(&self, [r, g, b, a]: [f32; 4]) {
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear(&self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) }
    }

    fn draw_triangles(&self, first: GLint, count: GLsizei) {
        unsafe { gl::DrawArrays(gl::TRIANGLES, first, count) }
    }

    fn read_pixel(&self, x: GLint, y: GLint) -> [u8; 4] {
        let mut pixel = [0u8; 4];
        unsafe {
            gl::PixelStorei(gl::PACK_ALIGNMENT, 1);
            gl::ReadPixels(
                x,
                y,
                1,
                1,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                pixel.as_mut_ptr() as *mut _,
            );
        }
        pixel
    }
}
