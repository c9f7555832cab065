//! Texture compiler.
//!
//! Reads a texture source description (see
//! [`lgn_graphics_data::TextureSource`]), encodes the referenced image with
//! the external `texturec` encoder and wraps the result in a
//! [`TextureResource`] container.

// crate-specific lint exceptions:
//#![allow()]

use std::{ffi::OsString, path::Path};

use lgn_data_compiler::{
    compiler_api::{CompilerContext, CompilerDescriptor, CompilerError, DATA_BUILD_VERSION},
    BuildVariant,
};
use lgn_data_runtime::{write_resource, Resource};
use lgn_graphics_data::{OutputSettings, TextureResource, TextureSource};
use log::debug;

/// Base name of the texture encoder executable.
pub const TEXTUREC: &str = "texturec";

/// Descriptor of the texture compiler.
pub static COMPILER_INFO: CompilerDescriptor = CompilerDescriptor {
    name: env!("CARGO_CRATE_NAME"),
    build_version: DATA_BUILD_VERSION,
    code_version: "1",
    data_version: "1",
    resource_type: TextureResource::TYPE,
    compile_func: compile,
};

/// Command line of the encoder turning `source` into `output`.
pub fn encoder_args(settings: &OutputSettings, source: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-f".into(),
        source.into(),
        "-o".into(),
        output.into(),
        "-t".into(),
        settings.format.name().into(),
    ];
    if settings.normal_map {
        args.push("-n".into());
    }
    if settings.generate_mips {
        args.push("-m".into());
    }
    if settings.mip_skip_smallest > 0 {
        args.push("--mipskip".into());
        args.push(settings.mip_skip_smallest.to_string().into());
    }
    args
}

fn compile(context: &mut CompilerContext<'_>) -> Result<(), CompilerError> {
    let document = context.read_source()?;
    let description = TextureSource::from_json(&document)
        .map_err(|err| CompilerError::InvalidSource(err.to_string()))?;

    context.ensure_file_exists(&description.source)?;
    context.add_source_dependency(&description.source);

    let settings = description
        .output_settings(context.platform().name())
        .map_err(|err| CompilerError::InvalidSource(err.to_string()))?;
    debug!("{} settings: {:?}", context.platform(), settings);

    let source = context.absolute_path(&description.source);
    let encoded = context.temporary_path("ktx")?;

    let texturec = context
        .exe_path(&BuildVariant::current().exe_candidates(TEXTUREC))
        .ok_or_else(|| CompilerError::ExecutableNotFound(TEXTUREC.to_owned()))?;

    let output = context.run_process(&texturec, &encoder_args(&settings, &source, &encoded))?;
    if !output.success() {
        return Err(CompilerError::ProcessFailed {
            program: texturec,
            exit_code: output.exit_code,
            output: output.output,
        });
    }

    let payload = context.read_temporary(&encoded)?;
    context.delete_file(encoded)?;

    write_resource(context.output(), TextureResource::tag(), &payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use lgn_graphics_data::TextureFormat;

    use super::*;

    fn args(settings: &OutputSettings) -> Vec<String> {
        encoder_args(settings, Path::new("in.png"), Path::new("out.ktx"))
            .into_iter()
            .map(|arg| arg.into_string().unwrap())
            .collect()
    }

    #[test]
    fn default_args() {
        assert_eq!(
            args(&OutputSettings::default()),
            ["-f", "in.png", "-o", "out.ktx", "-t", "RGBA8", "-m"]
        );
    }

    #[test]
    fn optional_flags() {
        let settings = OutputSettings {
            format: TextureFormat::BC5,
            generate_mips: false,
            mip_skip_smallest: 0,
            normal_map: true,
        };
        assert_eq!(
            args(&settings),
            ["-f", "in.png", "-o", "out.ktx", "-t", "BC5", "-n"]
        );
    }

    #[test]
    fn mip_skip() {
        let settings = OutputSettings {
            mip_skip_smallest: 3,
            ..OutputSettings::default()
        };
        assert_eq!(
            args(&settings),
            ["-f", "in.png", "-o", "out.ktx", "-t", "RGBA8", "-m", "--mipskip", "3"]
        );

        let no_skip = args(&OutputSettings::default());
        assert!(!no_skip.iter().any(|arg| arg == "--mipskip"));
        assert!(!no_skip.iter().any(|arg| arg == "0"));
    }

    #[test]
    fn format_names_reach_the_encoder() {
        for format in TextureFormat::ALL {
            let settings = OutputSettings {
                format,
                ..OutputSettings::default()
            };
            assert_eq!(args(&settings)[5], format.name());
        }
    }
}
