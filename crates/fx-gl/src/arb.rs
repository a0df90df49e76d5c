//! `GL_ARB_vertex_program` / `GL_ARB_fragment_program` entry points.
//!
//! The `gl` crate only generates core-profile bindings, so the ARB program
//! functions and enums are resolved here through `gl_loader`.

use std::ffi::{c_void, CStr};
use std::sync::Once;

use anyhow::{anyhow, Result};
use gl::types::{GLenum, GLfloat, GLint, GLsizei, GLuint};
use once_cell::sync::OnceCell;

use fx_core::Stage;

pub const VERTEX_PROGRAM_ARB: GLenum = 0x8620;
pub const FRAGMENT_PROGRAM_ARB: GLenum = 0x8804;
pub const PROGRAM_FORMAT_ASCII_ARB: GLenum = 0x8875;
pub const PROGRAM_ERROR_POSITION_ARB: GLenum = 0x864B;
pub const PROGRAM_ERROR_STRING_ARB: GLenum = 0x8874;
pub const PROGRAM_UNDER_NATIVE_LIMITS_ARB: GLenum = 0x88B6;

pub const MAX_PROGRAM_NATIVE_INSTRUCTIONS_ARB: GLenum = 0x88A3;
pub const MAX_PROGRAM_NATIVE_TEMPORARIES_ARB: GLenum = 0x88A7;
pub const MAX_PROGRAM_NATIVE_PARAMETERS_ARB: GLenum = 0x88AB;
pub const MAX_PROGRAM_NATIVE_ALU_INSTRUCTIONS_ARB: GLenum = 0x880E;
pub const MAX_PROGRAM_NATIVE_TEX_INSTRUCTIONS_ARB: GLenum = 0x880F;
pub const MAX_PROGRAM_NATIVE_TEX_INDIRECTIONS_ARB: GLenum = 0x8810;

type GenProgramsFn = unsafe extern "system" fn(GLsizei, *mut GLuint);
type DeleteProgramsFn = unsafe extern "system" fn(GLsizei, *const GLuint);
type BindProgramFn = unsafe extern "system" fn(GLenum, GLuint);
type ProgramStringFn = unsafe extern "system" fn(GLenum, GLenum, GLsizei, *const c_void);
type ProgramLocalParameter4fvFn = unsafe extern "system" fn(GLenum, GLuint, *const GLfloat);
type GetProgramivFn = unsafe extern "system" fn(GLenum, GLenum, *mut GLint);

static GL_INIT_ONCE: Once = Once::new();
static ARB: OnceCell<ArbPrograms> = OnceCell::new();

pub fn target(stage: Stage) -> GLenum {
    match stage {
        Stage::Vertex => VERTEX_PROGRAM_ARB,
        Stage::Fragment => FRAGMENT_PROGRAM_ARB,
    }
}

/// Resolved ARB program entry points.
#[derive(Debug, Clone, Copy)]
pub struct ArbPrograms {
    gen_programs: GenProgramsFn,
    delete_programs: DeleteProgramsFn,
    bind_program: BindProgramFn,
    program_string: ProgramStringFn,
    program_local_parameter_4fv: ProgramLocalParameter4fvFn,
    get_programiv: GetProgramivFn,
}

impl ArbPrograms {
    /// Load the core bindings and resolve the ARB entry points, once per
    /// process. Fails when the driver does not expose the extensions.
    pub fn get() -> Result<&'static ArbPrograms> {
        GL_INIT_ONCE.call_once(|| {
            gl_loader::init_gl();
            gl::load_with(|s| gl_loader::get_proc_address(s).cast());
        });
        ARB.get_or_try_init(|| {
            // SAFETY: each symbol is transmuted to the signature defined by
            // the GL_ARB_vertex_program extension.
            unsafe {
                Ok(ArbPrograms {
                    gen_programs: std::mem::transmute::<*const c_void, GenProgramsFn>(
                        proc_address("glGenProgramsARB")?,
                    ),
                    delete_programs: std::mem::transmute::<*const c_void, DeleteProgramsFn>(
                        proc_address("glDeleteProgramsARB")?,
                    ),
                    bind_program: std::mem::transmute::<*const c_void, BindProgramFn>(
                        proc_address("glBindProgramARB")?,
                    ),
                    program_string: std::mem::transmute::<*const c_void, ProgramStringFn>(
                        proc_address("glProgramStringARB")?,
                    ),
                    program_local_parameter_4fv: std::mem::transmute::<
                        *const c_void,
                        ProgramLocalParameter4fvFn,
                    >(
                        proc_address("glProgramLocalParameter4fvARB")?
                    ),
                    get_programiv: std::mem::transmute::<*const c_void, GetProgramivFn>(
                        proc_address("glGetProgramivARB")?,
                    ),
                })
            }
        })
    }

    pub unsafe fn gen_program(&self) -> GLuint {
        let mut name = 0;
        (self.gen_programs)(1, &mut name);
        name
    }

    pub unsafe fn delete_program(&self, name: GLuint) {
        (self.delete_programs)(1, &name);
    }

    pub unsafe fn bind_program(&self, target: GLenum, name: GLuint) {
        (self.bind_program)(target, name);
    }

    /// Upload `assembly`; on failure returns the driver's error string and
    /// the byte offset it reported.
    pub unsafe fn program_string(&self, target: GLenum, assembly: &str) -> Result<(), String> {
        (self.program_string)(
            target,
            PROGRAM_FORMAT_ASCII_ARB,
            assembly.len() as GLsizei,
            assembly.as_ptr().cast(),
        );
        let mut position: GLint = -1;
        gl::GetIntegerv(PROGRAM_ERROR_POSITION_ARB, &mut position);
        if position == -1 {
            return Ok(());
        }
        let message = gl::GetString(PROGRAM_ERROR_STRING_ARB);
        let message = if message.is_null() {
            String::from("unknown error")
        } else {
            CStr::from_ptr(message.cast()).to_string_lossy().into_owned()
        };
        Err(format!("at offset {position}: {message}"))
    }

    pub unsafe fn local_parameter(&self, target: GLenum, index: GLuint, value: &[f32; 4]) {
        (self.program_local_parameter_4fv)(target, index, value.as_ptr());
    }

    pub unsafe fn get_program(&self, target: GLenum, pname: GLenum) -> GLint {
        let mut value = 0;
        (self.get_programiv)(target, pname, &mut value);
        value
    }
}

fn proc_address(name: &str) -> Result<*const c_void> {
    let ptr: *const c_void = gl_loader::get_proc_address(name).cast();
    if ptr.is_null() {
        Err(anyhow!("{name} is not exposed by the current GL driver"))
    } else {
        Ok(ptr)
    }
}
