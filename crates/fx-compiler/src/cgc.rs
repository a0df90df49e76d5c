//! [`CgcCompiler`]: runs the external `cgc` cross-compiler once per stage.
//!
//! The ARB profiles always emit unpacked scalars in contiguous constant
//! registers, so [`CompileFlags::UNPACKED_SCALARS`] and
//! [`CompileFlags::CONTIGUOUS_LAYOUT`] need no switch. Requests without
//! [`CompileFlags::SINGLE_PASS`] are rejected because the ARB profiles have
//! no multipass mode.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use fx_core::Stage;

use crate::metadata::{count_segments, parse_var_metadata};
use crate::{
    CompileFlags, CompileOutput, CompileRequest, ShaderCompiler, StageLimits, StageOutput,
    StageSource,
};

/// Environment variable overriding the compiler executable.
pub const CGC_ENV: &str = "HLSLFX_CGC";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgcConfig {
    pub program: PathBuf,
    pub vertex_profile: String,
    pub fragment_profile: String,
    /// Appended to every invocation before the source file.
    pub extra_args: Vec<String>,
}

impl Default for CgcConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("cgc"),
            vertex_profile: "arbvp1".into(),
            fragment_profile: "arbfp1".into(),
            extra_args: Vec::new(),
        }
    }
}

impl CgcConfig {
    /// Defaults, with the executable taken from `HLSLFX_CGC` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(program) = std::env::var_os(CGC_ENV).filter(|p| !p.is_empty()) {
            config.program = PathBuf::from(program);
        }
        config
    }

    fn profile(&self, stage: Stage) -> &str {
        match stage {
            Stage::Vertex => &self.vertex_profile,
            Stage::Fragment => &self.fragment_profile,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CgcCompiler {
    config: CgcConfig,
}

impl CgcCompiler {
    pub fn new(config: CgcConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CgcConfig {
        &self.config
    }

    /// Command line for one stage, minus the trailing source path.
    fn command(&self, stage: Stage, input: &StageSource<'_>, limits: Option<&StageLimits>) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(["-profile", self.config.profile(stage), "-entry", input.entry]);
        if let Some(limits) = limits {
            let options = profile_options(stage, limits);
            if !options.is_empty() {
                cmd.arg("-po").arg(options.join(","));
            }
        }
        cmd.args(&self.config.extra_args);
        cmd
    }

    fn compile_stage(
        &self,
        stage: Stage,
        input: &StageSource<'_>,
        limits: Option<&StageLimits>,
    ) -> Result<StageOutput> {
        let mut file = tempfile::Builder::new()
            .prefix("hlslfx-")
            .suffix(".cg")
            .tempfile()
            .context("failed to create temporary shader source")?;
        file.write_all(input.source.as_bytes())
            .context("failed to write temporary shader source")?;

        let mut cmd = self.command(stage, input, limits);
        cmd.arg(file.path());
        tracing::debug!(?stage, entry = input.entry, "running {:?}", cmd);

        let output = cmd.output().with_context(|| {
            format!(
                "failed to run {}. Is the Cg toolkit installed? Set {CGC_ENV} to override.",
                self.config.program.display()
            )
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = [stderr.trim(), stdout.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            bail!("{} ({}): {detail}", input.entry, output.status);
        }

        Ok(StageOutput {
            segments: count_segments(&stdout),
            bindings: parse_var_metadata(&stdout),
            assembly: stdout,
        })
    }
}

impl ShaderCompiler for CgcCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput, String> {
        if !request.flags.contains(CompileFlags::SINGLE_PASS) {
            return Err("ARB profiles cannot produce multipass output".into());
        }
        let mut output = CompileOutput::default();
        for stage in Stage::ALL {
            let Some(input) = request.stage(stage) else {
                continue;
            };
            let limits = request.limits.as_ref().map(|l| l.stage(stage));
            let compiled = self
                .compile_stage(stage, input, limits)
                .map_err(|e| format!("{e:#}"))?;
            match stage {
                Stage::Vertex => output.vertex = compiled,
                Stage::Fragment => output.fragment = compiled,
            }
        }
        Ok(output)
    }
}

/// `-po` options for the ARB profiles. Zero limits are omitted.
fn profile_options(stage: Stage, limits: &StageLimits) -> Vec<String> {
    let options = match stage {
        Stage::Vertex => vec![
            ("MaxInstructions", limits.instructions),
            ("MaxLocalParams", limits.parameters),
            ("NumTemps", limits.temporaries),
        ],
        Stage::Fragment => vec![
            ("NumInstructionSlots", limits.instructions),
            ("NumMathInstructionSlots", limits.alu_instructions),
            ("NumTexInstructionSlots", limits.tex_instructions),
            ("NumTemps", limits.temporaries),
            ("MaxLocalParams", limits.parameters),
            ("MaxTexIndirections", limits.tex_indirections),
        ],
    };
    options
        .into_iter()
        .filter(|(_, value)| *value > 0)
        .map(|(name, value)| format!("{name}={value}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn vertex_command_line() {
        let compiler = CgcCompiler::default();
        let input = StageSource {
            source: "",
            entry: "mainVS",
            profile: "vs_2_0",
        };
        let limits = StageLimits {
            instructions: 128,
            parameters: 96,
            ..StageLimits::default()
        };
        let cmd = compiler.command(Stage::Vertex, &input, Some(&limits));
        assert_eq!(cmd.get_program(), "cgc");
        assert_eq!(
            args(&cmd),
            vec![
                "-profile",
                "arbvp1",
                "-entry",
                "mainVS",
                "-po",
                "MaxInstructions=128,MaxLocalParams=96"
            ]
        );
    }

    #[test]
    fn fragment_command_without_limits() {
        let compiler = CgcCompiler::new(CgcConfig {
            extra_args: vec!["-quiet".into()],
            ..CgcConfig::default()
        });
        let input = StageSource {
            source: "",
            entry: "mainPS",
            profile: "ps_2_0",
        };
        let cmd = compiler.command(Stage::Fragment, &input, None);
        assert_eq!(
            args(&cmd),
            vec!["-profile", "arbfp1", "-entry", "mainPS", "-quiet"]
        );
    }

    #[test]
    fn multipass_requests_are_rejected() {
        let request = CompileRequest {
            vertex: None,
            pixel: None,
            flags: CompileFlags::UNPACKED_SCALARS,
            limits: None,
        };
        assert!(CgcCompiler::default().compile(&request).is_err());
    }

    #[test]
    fn missing_executable_reports_error_text() {
        let compiler = CgcCompiler::new(CgcConfig {
            program: PathBuf::from("/nonexistent/hlslfx-cgc"),
            ..CgcConfig::default()
        });
        let request = CompileRequest {
            vertex: Some(StageSource {
                source: "float4 main() : POSITION { return 0; }",
                entry: "main",
                profile: "vs_2_0",
            }),
            pixel: None,
            flags: CompileFlags::default(),
            limits: None,
        };
        let err = compiler.compile(&request).unwrap_err();
        assert!(err.contains("hlslfx-cgc"), "{err}");
    }
}
