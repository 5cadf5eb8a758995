//! Draws the unit triangle into an offscreen framebuffer and reads it back.
//!
//! Runs without the libtest harness because winit wants the main thread.
//! Skips (successfully) when no display or no GL 3.3 context is available.

use std::rc::Rc;
use trigl::config::{AppConfig, WindowConfig};
use trigl::{build_program, context, Driver, Mesh, NativeGl, Renderer, Scene, ShaderSource, TRIANGLE};

const SIZE: i32 = 64;
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

fn display_available() -> bool {
    if cfg!(all(unix, not(target_os = "macos"))) {
        std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
    } else {
        true
    }
}

struct Offscreen {
    fbo: u32,
    rbo: u32,
}

impl Offscreen {
    fn new() -> Self {
        let (mut fbo, mut rbo) = (0, 0);
        unsafe {
            gl::GenFramebuffers(1, &mut fbo);
            gl::BindFramebuffer(gl::FRAMEBUFFER, fbo);
            gl::GenRenderbuffers(1, &mut rbo);
            gl::BindRenderbuffer(gl::RENDERBUFFER, rbo);
            gl::RenderbufferStorage(gl::RENDERBUFFER, gl::RGBA8, SIZE, SIZE);
            gl::FramebufferRenderbuffer(
                gl::FRAMEBUFFER,
                gl::COLOR_ATTACHMENT0,
                gl::RENDERBUFFER,
                rbo,
            );
            assert_eq!(
                gl::CheckFramebufferStatus(gl::FRAMEBUFFER),
                gl::FRAMEBUFFER_COMPLETE
            );
        }
        Self { fbo, rbo }
    }
}

impl Drop for Offscreen {
    fn drop(&mut self) {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
            gl::DeleteFramebuffers(1, &self.fbo);
            gl::DeleteRenderbuffers(1, &self.rbo);
        }
    }
}

fn green_triangle(driver: &Rc<NativeGl>) -> Renderer<NativeGl> {
    let source = ShaderSource::solid_fill([0.0, 1.0, 0.0, 1.0]);
    let mesh = Mesh::upload(driver, &TRIANGLE[..]).expect("upload");
    mesh.bind();

    // A second build of the same source must survive the first being dropped
    let first = build_program(driver, &source).expect("first build");
    let program = build_program(driver, &source).expect("second build");
    assert_ne!(first.id(), program.id());
    drop(first);
    driver.bind_vertex_array(0);

    let renderer = Renderer::with_scene(driver, [0.0, 0.0, 0.0, 1.0], Scene::Triangle { program, mesh });
    renderer.resize(SIZE as u32, SIZE as u32);
    renderer
}

fn broken_fragment_is_rejected(driver: &Rc<NativeGl>) {
    let source = ShaderSource::new(
        trigl::shader::sources::POSITION_VERTEX,
        "#version 330 core\nout vec4 FragColor;\nvoid main() { FragColor = vec4(1.0) +; }\n",
    );
    match build_program(driver, &source) {
        Err(trigl::ShaderError::StageCompile { stage, log }) => {
            assert_eq!(stage, trigl::StageKind::Fragment);
            assert!(!log.is_empty());
        }
        Err(other) => panic!("expected a fragment compile error, got {other}"),
        Ok(program) => panic!("broken fragment produced program {}", program.id()),
    }
}

fn main() {
    if !display_available() {
        println!("render_triangle: skipped, no display");
        return;
    }

    let config = AppConfig {
        window: WindowConfig {
            width: SIZE as u32,
            height: SIZE as u32,
            title: "trigl render test".into(),
            visible: false,
            vsync: false,
        },
        ..AppConfig::default()
    };
    let (gl_context, _event_loop) = match context::init(&config) {
        Ok(pair) => pair,
        Err(e) => {
            println!("render_triangle: skipped, {e:#}");
            return;
        }
    };
    let driver = gl_context.driver();

    broken_fragment_is_rejected(driver);

    let offscreen = Offscreen::new();
    let renderer = green_triangle(driver);
    renderer.render_frame();

    let center = driver.read_pixel(SIZE / 2, SIZE / 2);
    assert_eq!(center, GREEN, "centroid pixel");
    for (x, y) in [(1, 1), (SIZE - 2, SIZE - 2), (1, SIZE - 2)] {
        assert_eq!(driver.read_pixel(x, y), BLACK, "corner pixel ({x}, {y})");
    }

    drop(renderer);
    drop(offscreen);
    println!("render_triangle: ok");
}
