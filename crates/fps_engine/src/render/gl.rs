//! Fixed-function OpenGL device
//!
//! [`LegacyGl`] resolves the handful of OpenGL 1.x entry points the engine
//! draws with through a proc-address loader (GLFW's, in practice) and
//! implements [`GraphicsDevice`] on top of them. Every entry point is
//! resolved up front; a missing one fails [`LegacyGl::load`] instead of
//! crashing at draw time.

use std::ffi::c_void;

use super::backend::{GraphicsDevice, PolygonMode, Topology};
use crate::foundation::math::{Mat4, Vec3};
use crate::platform::{PlatformError, PlatformResult};

type GLenum = u32;
type GLbitfield = u32;
type GLint = i32;
type GLsizei = i32;
type GLfloat = f32;
type GLclampf = f32;

const MODELVIEW: GLenum = 0x1700;
const PROJECTION: GLenum = 0x1701;
const FRONT_AND_BACK: GLenum = 0x0408;
const POINT: GLenum = 0x1B00;
const LINE: GLenum = 0x1B01;
const FILL: GLenum = 0x1B02;
const VERTEX_ARRAY: GLenum = 0x8074;
const NORMAL_ARRAY: GLenum = 0x8075;
const FLOAT: GLenum = 0x1406;
const LINES: GLenum = 0x0001;
const TRIANGLES: GLenum = 0x0004;
const QUADS: GLenum = 0x0007;
const ALL_ATTRIB_BITS: GLbitfield = 0x000F_FFFF;
const COLOR_BUFFER_BIT: GLbitfield = 0x0000_4000;
const DEPTH_BUFFER_BIT: GLbitfield = 0x0000_0100;
const DEPTH_TEST: GLenum = 0x0B71;

macro_rules! gl_entry_points {
    ($($field:ident = $name:literal : fn($($arg:ty),*);)*) => {
        struct EntryPoints {
            $($field: unsafe extern "system" fn($($arg),*),)*
        }

        impl EntryPoints {
            fn load(mut loader: impl FnMut(&str) -> *const c_void) -> PlatformResult<Self> {
                Ok(Self {
                    $($field: {
                        let ptr = loader($name);
                        if ptr.is_null() {
                            log::error!("failed to load {}", $name);
                            return Err(PlatformError::MissingEntryPoint($name));
                        }
                        // SAFETY: the loader returned a non-null address for
                        // this GL 1.x symbol, whose C signature matches the
                        // function pointer type declared alongside its name.
                        unsafe {
                            std::mem::transmute::<*const c_void, unsafe extern "system" fn($($arg),*)>(ptr)
                        }
                    },)*
                })
            }
        }
    };
}

gl_entry_points! {
    matrix_mode = "glMatrixMode": fn(GLenum);
    load_identity = "glLoadIdentity": fn();
    load_matrix = "glLoadMatrixf": fn(*const GLfloat);
    mult_matrix = "glMultMatrixf": fn(*const GLfloat);
    push_matrix = "glPushMatrix": fn();
    pop_matrix = "glPopMatrix": fn();
    translate = "glTranslatef": fn(GLfloat, GLfloat, GLfloat);
    rotate = "glRotatef": fn(GLfloat, GLfloat, GLfloat, GLfloat);
    scale = "glScalef": fn(GLfloat, GLfloat, GLfloat);
    push_attrib = "glPushAttrib": fn(GLbitfield);
    pop_attrib = "glPopAttrib": fn();
    color = "glColor4f": fn(GLfloat, GLfloat, GLfloat, GLfloat);
    polygon_mode = "glPolygonMode": fn(GLenum, GLenum);
    enable_client_state = "glEnableClientState": fn(GLenum);
    disable_client_state = "glDisableClientState": fn(GLenum);
    vertex_pointer = "glVertexPointer": fn(GLint, GLenum, GLsizei, *const c_void);
    normal_pointer = "glNormalPointer": fn(GLenum, GLsizei, *const c_void);
    draw_arrays = "glDrawArrays": fn(GLenum, GLint, GLsizei);
    clear_color = "glClearColor": fn(GLclampf, GLclampf, GLclampf, GLclampf);
    clear = "glClear": fn(GLbitfield);
    viewport = "glViewport": fn(GLint, GLint, GLsizei, GLsizei);
    enable = "glEnable": fn(GLenum);
    disable = "glDisable": fn(GLenum);
}

/// Graphics device backed by the current OpenGL compatibility context
///
/// Only valid on the thread whose context was current when it was loaded.
pub struct LegacyGl {
    gl: EntryPoints,
}

impl std::fmt::Debug for LegacyGl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyGl").finish_non_exhaustive()
    }
}

impl LegacyGl {
    /// Resolve every entry point through `loader`
    ///
    /// A context must be current on the calling thread.
    pub fn load(loader: impl FnMut(&str) -> *const c_void) -> PlatformResult<Self> {
        let gl = EntryPoints::load(loader)?;
        log::debug!("legacy GL entry points loaded");
        Ok(Self { gl })
    }
}

const fn polygon_mode(mode: PolygonMode) -> GLenum {
    match mode {
        PolygonMode::Point => POINT,
        PolygonMode::Line => LINE,
        PolygonMode::Fill => FILL,
    }
}

const fn primitive(topology: Topology) -> GLenum {
    match topology {
        Topology::Triangles => TRIANGLES,
        Topology::Quads => QUADS,
        Topology::Lines => LINES,
    }
}

// SAFETY (every block below): the entry points were resolved from the
// context that is current on this thread, and all pointer arguments borrow
// slices or matrices that outlive the call.
#[allow(unsafe_code)]
impl GraphicsDevice for LegacyGl {
    fn set_clear_color(&mut self, rgba: [f32; 4]) {
        unsafe { (self.gl.clear_color)(rgba[0], rgba[1], rgba[2], rgba[3]) }
    }

    fn clear(&mut self) {
        unsafe { (self.gl.clear)(COLOR_BUFFER_BIT | DEPTH_BUFFER_BIT) }
    }

    fn set_viewport(&mut self, width: i32, height: i32) {
        unsafe { (self.gl.viewport)(0, 0, width, height) }
    }

    fn set_depth_test(&mut self, enabled: bool) {
        unsafe {
            if enabled {
                (self.gl.enable)(DEPTH_TEST);
            } else {
                (self.gl.disable)(DEPTH_TEST);
            }
        }
    }

    fn load_projection(&mut self, projection: &Mat4) {
        unsafe {
            (self.gl.matrix_mode)(PROJECTION);
            (self.gl.load_matrix)(projection.as_ptr());
            (self.gl.matrix_mode)(MODELVIEW);
        }
    }

    fn push_transform(&mut self) {
        unsafe { (self.gl.push_matrix)() }
    }

    fn pop_transform(&mut self) {
        unsafe { (self.gl.pop_matrix)() }
    }

    fn load_identity(&mut self) {
        unsafe { (self.gl.load_identity)() }
    }

    fn multiply_transform(&mut self, matrix: &Mat4) {
        unsafe { (self.gl.mult_matrix)(matrix.as_ptr()) }
    }

    fn translate(&mut self, offset: Vec3) {
        unsafe { (self.gl.translate)(offset.x, offset.y, offset.z) }
    }

    fn rotate(&mut self, angle_degrees: f32, axis: Vec3) {
        if approx::abs_diff_eq!(axis.norm_squared(), 0.0) {
            return;
        }
        unsafe { (self.gl.rotate)(angle_degrees, axis.x, axis.y, axis.z) }
    }

    fn scale(&mut self, factors: Vec3) {
        unsafe { (self.gl.scale)(factors.x, factors.y, factors.z) }
    }

    fn push_attributes(&mut self) {
        unsafe { (self.gl.push_attrib)(ALL_ATTRIB_BITS) }
    }

    fn pop_attributes(&mut self) {
        unsafe { (self.gl.pop_attrib)() }
    }

    fn set_color(&mut self, rgba: [f32; 4]) {
        unsafe { (self.gl.color)(rgba[0], rgba[1], rgba[2], rgba[3]) }
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        unsafe { (self.gl.polygon_mode)(FRONT_AND_BACK, polygon_mode(mode)) }
    }

    fn draw_arrays(&mut self, vertices: &[[f32; 3]], normals: &[[f32; 3]], topology: Topology) {
        let Ok(count) = GLsizei::try_from(vertices.len()) else {
            log::error!("vertex array too large to draw ({} vertices)", vertices.len());
            return;
        };
        let with_normals = normals.len() == vertices.len();
        let positions: &[f32] = bytemuck::cast_slice(vertices);

        unsafe {
            (self.gl.enable_client_state)(VERTEX_ARRAY);
            (self.gl.vertex_pointer)(3, FLOAT, 0, positions.as_ptr().cast());
            if with_normals {
                let normals: &[f32] = bytemuck::cast_slice(normals);
                (self.gl.enable_client_state)(NORMAL_ARRAY);
                (self.gl.normal_pointer)(FLOAT, 0, normals.as_ptr().cast());
            }

            (self.gl.draw_arrays)(primitive(topology), 0, count);

            if with_normals {
                (self.gl.disable_client_state)(NORMAL_ARRAY);
            }
            (self.gl.disable_client_state)(VERTEX_ARRAY);
        }
    }
}
