//
// Copyright 2025 Jeff Bush
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use anyhow::{anyhow, bail, Context as _};
use engine::gfx::{AssetLoader, Color, Image, RenderTarget, SurfaceId};
use engine::mask::BitmapMask;
use engine::util::Rect;
use gl::types::{GLint, GLsizeiptr, GLuint};
use image::imageops::{self, FilterType};
use image::{ImageReader, RgbaImage};
use std::collections::HashMap;
use std::path::PathBuf;

const VERTEX_SHADER: &str = r#"
attribute vec2 aPosition;
attribute vec2 aTexcoord;
attribute vec4 aColor;
varying vec2 vTexcoord;
varying vec4 vColor;

void main() {
    gl_Position = vec4(aPosition, 0.0, 1.0);
    vTexcoord = aTexcoord;
    vColor = aColor;
}
"#;

const FRAGMENT_SHADER: &str = r#"
varying vec2 vTexcoord;
varying vec4 vColor;
uniform sampler2D texture0;

void main() {
    gl_FragColor = texture2D(texture0, vTexcoord) * vColor;
}
"#;

// Position, texture coordinate, color
const ATTR_ELEMS_PER_VERTEX: usize = 8;

fn check_gl_error() -> anyhow::Result<()> {
    let err = unsafe { gl::GetError() };
    if err != 0 {
        bail!("OpenGL error {}", err);
    }

    Ok(())
}

fn upload_texture(image: &RgbaImage) -> GLuint {
    unsafe {
        let mut texture_id: GLuint = 0;
        gl::GenTextures(1, &mut texture_id);
        gl::ActiveTexture(gl::TEXTURE0);
        gl::BindTexture(gl::TEXTURE_2D, texture_id);
        gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            gl::RGBA as GLint,
            image.width() as GLint,
            image.height() as GLint,
            0,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            image.as_raw().as_ptr() as *const _,
        );

        // Nearest keeps the pixel art (and the masks derived from it) crisp.
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::NEAREST as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::NEAREST as GLint);
        gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_WRAP_S,
            gl::CLAMP_TO_EDGE as GLint,
        );
        gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_WRAP_T,
            gl::CLAMP_TO_EDGE as GLint,
        );
        texture_id
    }
}

// Draws into the window with one texture per loaded image. Draw calls are
// batched until the texture changes or the frame is presented.
pub struct RenderContext {
    window: sdl2::video::Window,
    _gl_context: sdl2::video::GLContext, // Hold this so it doesn't get dropped
    size: (i32, i32),
    asset_dir: PathBuf,
    vbo: GLuint,
    position_attrib: GLuint,
    texcoord_attrib: GLuint,
    color_attrib: GLuint,
    textures: Vec<GLuint>,
    cache: HashMap<(String, Option<(u32, u32)>), Image>,
    white_texture: GLuint,
    bound_texture: GLuint,
    vertices: Vec<f32>,
}

impl RenderContext {
    pub fn new(
        video: &sdl2::VideoSubsystem,
        title: &str,
        size: (u32, u32),
        asset_dir: PathBuf,
    ) -> anyhow::Result<Self> {
        let window = video
            .window(title, size.0, size.1)
            .opengl()
            .position_centered()
            .build()
            .context("creating window")?;

        let gl_context = window.gl_create_context().map_err(|msg| anyhow!(msg))?;
        gl::load_with(|s| video.gl_get_proc_address(s) as *const std::os::raw::c_void);
        if let Err(msg) = video.gl_set_swap_interval(sdl2::video::SwapInterval::VSync) {
            log::warn!("No vsync: {}", msg);
        }

        let program = compile_program(VERTEX_SHADER, FRAGMENT_SHADER)?;
        let (position_attrib, texcoord_attrib, color_attrib) = unsafe {
            gl::UseProgram(program);
            (
                gl::GetAttribLocation(program, c"aPosition".as_ptr().cast()) as GLuint,
                gl::GetAttribLocation(program, c"aTexcoord".as_ptr().cast()) as GLuint,
                gl::GetAttribLocation(program, c"aColor".as_ptr().cast()) as GLuint,
            )
        };

        let vbo = unsafe {
            let mut vbo = 0;
            gl::GenBuffers(1, &mut vbo);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            vbo
        };

        // Rectangles sample this so they share the textured shader.
        let white_texture = upload_texture(&RgbaImage::from_pixel(1, 1, image::Rgba([255; 4])));

        unsafe {
            gl::Enable(gl::TEXTURE_2D);

            // Assign texture unit
            let image_attr = gl::GetUniformLocation(program, c"texture0".as_ptr().cast());
            if image_attr == -1 {
                bail!("shader has no texture0 uniform");
            }
            gl::Uniform1i(image_attr, 0);

            // Enable source alpha blending
            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
        }

        check_gl_error()?;

        Ok(RenderContext {
            window,
            _gl_context: gl_context,
            size: (size.0 as i32, size.1 as i32),
            asset_dir,
            vbo,
            position_attrib,
            texcoord_attrib,
            color_attrib,
            textures: Vec::new(),
            cache: HashMap::new(),
            white_texture,
            bound_texture: white_texture,
            vertices: Vec::new(),
        })
    }

    fn read_image(&self, name: &str) -> anyhow::Result<RgbaImage> {
        let path = self.asset_dir.join(format!("{}.png", name));
        let decoded = ImageReader::open(&path)
            .with_context(|| format!("opening {}", path.display()))?
            .decode()
            .with_context(|| format!("decoding {}", path.display()))?;
        Ok(decoded.into_rgba8())
    }

    // Convert from pixel coordinates to OpenGL coordinate space.
    fn to_ogl_coord(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x / self.size.0 as f32) * 2.0 - 1.0,
            1.0 - (y / self.size.1 as f32) * 2.0,
        )
    }

    fn use_texture(&mut self, texture_id: GLuint) {
        if texture_id != self.bound_texture {
            self.flush();
            self.bound_texture = texture_id;
        }
    }

    // Add a quad to the current batch, composed of two abutting triangles:
    // 0      1
    // +------+
    // |    / |
    // |  /   |
    // +------+
    // 2      3
    fn push_quad(&mut self, rect: Rect<f32>, uv: (f32, f32, f32, f32), color: Color) {
        let (left, top) = self.to_ogl_coord(rect.left, rect.top);
        let (right, bottom) = self.to_ogl_coord(rect.right(), rect.bottom());
        let (u0, v0, u1, v1) = uv;
        let [r, g, b, a] = color.to_f32();

        #[cfg_attr(any(), rustfmt::skip)]
        self.vertices.extend_from_slice(&[
            left, top, u0, v0, r, g, b, a, // 0
            right, top, u1, v0, r, g, b, a, // 1
            left, bottom, u0, v1, r, g, b, a, // 2
            right, top, u1, v0, r, g, b, a, // 1
            right, bottom, u1, v1, r, g, b, a, // 3
            left, bottom, u0, v1, r, g, b, a, // 2
        ]);
    }

    fn flush(&mut self) {
        if self.vertices.is_empty() {
            return;
        }

        let stride = (ATTR_ELEMS_PER_VERTEX * std::mem::size_of::<f32>()) as GLint;
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, self.bound_texture);
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (self.vertices.len() * std::mem::size_of::<f32>()) as GLsizeiptr,
                self.vertices.as_ptr().cast(),
                gl::STREAM_DRAW,
            );

            gl::VertexAttribPointer(
                self.position_attrib,
                2,
                gl::FLOAT,
                gl::FALSE,
                stride,
                std::ptr::null(),
            );
            gl::VertexAttribPointer(
                self.texcoord_attrib,
                2,
                gl::FLOAT,
                gl::FALSE,
                stride,
                std::ptr::null::<f32>().add(2).cast(),
            );
            gl::VertexAttribPointer(
                self.color_attrib,
                4,
                gl::FLOAT,
                gl::FALSE,
                stride,
                std::ptr::null::<f32>().add(4).cast(),
            );

            gl::EnableVertexAttribArray(self.position_attrib);
            gl::EnableVertexAttribArray(self.texcoord_attrib);
            gl::EnableVertexAttribArray(self.color_attrib);
            gl::DrawArrays(
                gl::TRIANGLES,
                0,
                (self.vertices.len() / ATTR_ELEMS_PER_VERTEX) as GLint,
            );
        }

        if let Err(err) = check_gl_error() {
            log::error!("{:#}", err);
        }

        self.vertices.clear();
    }
}

impl AssetLoader for RenderContext {
    fn load_image(&mut self, name: &str, size: Option<(u32, u32)>) -> anyhow::Result<Image> {
        // Scenes reload their sprites on every entry; keep one texture each.
        let key = (name.to_string(), size);
        if let Some(image) = self.cache.get(&key) {
            return Ok(image.clone());
        }

        let mut image = self.read_image(name)?;
        if let Some((w, h)) = size {
            image = imageops::resize(&image, w, h, FilterType::Nearest);
        }

        // Uploading rebinds the texture unit, so draw what is queued first.
        self.flush();
        let texture_id = upload_texture(&image);
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, self.bound_texture);
        }

        let surface = SurfaceId(self.textures.len());
        self.textures.push(texture_id);
        log::debug!("Loaded {} ({}x{})", name, image.width(), image.height());
        let image = Image {
            surface,
            mask: BitmapMask::from_alpha(&image),
        };
        self.cache.insert(key, image.clone());
        Ok(image)
    }

    fn load_mask(&mut self, name: &str, color_key: [u8; 3]) -> anyhow::Result<BitmapMask> {
        let image = self.read_image(name)?;
        Ok(BitmapMask::from_color_key(&image, color_key))
    }
}

impl RenderTarget for RenderContext {
    fn fill(&mut self, color: Color) {
        // A fill covers everything queued before it.
        self.vertices.clear();
        let [r, g, b, a] = color.to_f32();
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    fn blit(&mut self, image: &Image, position: (i32, i32), flip_h: bool) {
        let Some(&texture_id) = self.textures.get(image.surface.0) else {
            log::warn!("Blit of unknown surface {:?}", image.surface);
            return;
        };

        self.use_texture(texture_id);
        let (mut u0, mut u1) = (0.0, 1.0);
        if flip_h {
            std::mem::swap(&mut u0, &mut u1);
        }

        let rect = Rect::new(
            position.0 as f32,
            position.1 as f32,
            image.width() as f32,
            image.height() as f32,
        );
        self.push_quad(rect, (u0, 0.0, u1, 1.0), Color::WHITE);
    }

    fn draw_rect(&mut self, color: Color, rect: Rect<i32>) {
        self.use_texture(self.white_texture);
        let rect = Rect::new(
            rect.left as f32,
            rect.top as f32,
            rect.width as f32,
            rect.height as f32,
        );
        self.push_quad(rect, (0.0, 0.0, 1.0, 1.0), color);
    }

    fn size(&self) -> (i32, i32) {
        self.size
    }

    fn present(&mut self) {
        self.flush();
        self.window.gl_swap_window();
    }
}

fn compile_shader(shader_type: GLuint, source: &str) -> anyhow::Result<GLuint> {
    unsafe {
        let shader = gl::CreateShader(shader_type);
        let length = GLint::try_from(source.len())?;
        gl::ShaderSource(shader, 1, &(source.as_bytes().as_ptr().cast()), &length);

        gl::CompileShader(shader);
        let mut status: GLint = 1;
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
        if status == 0 {
            let mut v: [u8; 1024] = [0; 1024];
            let mut log_length = 0i32;
            gl::GetShaderInfoLog(shader, 1024, &mut log_length, v.as_mut_ptr().cast());
            bail!(
                "Shader compile error {}",
                String::from_utf8_lossy(&v[..log_length as usize])
            );
        }

        Ok(shader)
    }
}

fn compile_program(vertex_source: &str, fragment_source: &str) -> anyhow::Result<GLuint> {
    let vertex_shader = compile_shader(gl::VERTEX_SHADER, vertex_source)?;
    let fragment_shader = compile_shader(gl::FRAGMENT_SHADER, fragment_source)?;

    unsafe {
        let program = gl::CreateProgram();
        gl::AttachShader(program, vertex_shader);
        gl::AttachShader(program, fragment_shader);
        gl::LinkProgram(program);

        let mut status: GLint = 1;
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);
        if status == 0 {
            let mut v: [u8; 1024] = [0; 1024];
            let mut log_length = 0i32;
            gl::GetProgramInfoLog(program, 1024, &mut log_length, v.as_mut_ptr().cast());
            bail!(
                "Error linking shaders {}",
                String::from_utf8_lossy(&v[..log_length as usize])
            );
        }

        check_gl_error()?;
        Ok(program)
    }
}
