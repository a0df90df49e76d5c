use fx_core::{FxError, PassDesc, PassEvent, Stage};

use crate::{
    BindingKind, CompileFlags, CompileOutput, CompileRequest, ResourceLimits, ShaderCompiler,
    StageSource,
};

/// Result of compiling one pass.
#[derive(Debug, Clone, Default)]
pub struct PassCompilation {
    pub vertex_assembly: String,
    pub pixel_assembly: String,
    /// Register bindings followed by the pass's fixed render states, in the
    /// order they should be observed.
    pub events: Vec<PassEvent>,
}

/// Compile one pass.
///
/// Fails with [`FxError::Compile`] when the pass has no stages or the
/// compiler rejects it, and with [`FxError::ResourceLimit`] when limits were
/// supplied and a stage did not fit in a single program.
pub fn compile_pass<C>(
    compiler: &C,
    pass: &PassDesc,
    flags: CompileFlags,
    limits: Option<&ResourceLimits>,
) -> Result<PassCompilation, FxError>
where
    C: ShaderCompiler + ?Sized,
{
    if pass.vertex.is_none() && pass.pixel.is_none() {
        return Err(FxError::Compile {
            pass: pass.name.clone(),
            detail: "pass has no shader stages".into(),
        });
    }

    let request = CompileRequest {
        vertex: pass.vertex.as_ref().map(StageSource::from),
        pixel: pass.pixel.as_ref().map(StageSource::from),
        flags,
        limits: limits.copied(),
    };

    tracing::trace!(pass = %pass.name, ?flags, limited = limits.is_some(), "compiling pass");
    let output = compiler
        .compile(&request)
        .map_err(|detail| FxError::Compile {
            pass: pass.name.clone(),
            detail,
        })?;

    if limits.is_some() {
        for stage in Stage::ALL {
            if output.stage(stage).segments > 1 {
                return Err(FxError::ResourceLimit {
                    pass: pass.name.clone(),
                    stage,
                });
            }
        }
    }

    let events = collect_events(&output, pass);
    let CompileOutput { vertex, fragment } = output;
    Ok(PassCompilation {
        vertex_assembly: vertex.assembly,
        pixel_assembly: fragment.assembly,
        events,
    })
}

fn collect_events(output: &CompileOutput, pass: &PassDesc) -> Vec<PassEvent> {
    let mut events = Vec::new();
    for stage in Stage::ALL {
        events.extend(
            output
                .stage(stage)
                .bindings
                .iter()
                .map(|binding| match binding.kind {
                    BindingKind::Constant => PassEvent::Register {
                        stage,
                        name: binding.name.clone(),
                        index: binding.index,
                    },
                    BindingKind::TextureUnit => PassEvent::TextureUnit {
                        name: binding.name.clone(),
                        unit: binding.index,
                    },
                }),
        );
    }
    events.extend(pass.states.iter().cloned().map(PassEvent::RenderState));
    events
}
