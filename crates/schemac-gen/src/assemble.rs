//! Module assembly: banner, include guard and includes around the emitted text.

use crate::config::OutputConfig;
use crate::context::BuildContext;
use crate::emitter::Emitter;
use crate::error::GenerateResult;
use crate::writer::CodeWriter;
use schemac_core::Registry;

/// The two generated files of one module plus its build context.
#[derive(Debug, Clone)]
pub struct GeneratedModule {
    pub module: String,
    pub header: String,
    pub source: String,
    pub context: BuildContext,
}

impl GeneratedModule {
    pub fn header_file_name(&self) -> String {
        format!("{}.h", self.module)
    }

    pub fn source_file_name(&self) -> String {
        format!("{}.c", self.module)
    }
}

/// Generate the header and source of the registry's module.
///
/// Nothing is returned unless every definition emitted successfully.
pub fn generate(registry: &Registry, output: &OutputConfig) -> GenerateResult<GeneratedModule> {
    let module = registry.module_name().to_string();

    let mut emitter = Emitter::new(registry);
    emitter.emit_all()?;
    let context = BuildContext::new(registry, emitter.emitted());
    let (declarations, bodies) = emitter.finish();

    tracing::debug!(
        module = %module,
        types = context.types.len(),
        "module generated"
    );

    let guard = include_guard(&output.guard_prefix, &module);

    let mut header = CodeWriter::new();
    write_banner(&output.banner, &mut header);
    header.line(format!("#ifndef {guard}"));
    header.line(format!("#define {guard}"));
    header.blank_line();
    header.line(format!("#include <{}>", output.base_header));
    for dep in registry.depends() {
        header.line(format!("#include <{}/{dep}.h>", output.include_prefix));
    }
    header.blank_line();
    let mut header = header.into_string();
    header.push_str(&declarations);
    header.push_str(&format!("#endif /* {guard} */\n"));

    let mut source = CodeWriter::new();
    write_banner(&output.banner, &mut source);
    source.line(format!("#include <{}/{module}.h>", output.include_prefix));
    source.blank_line();
    let mut source = source.into_string();
    source.push_str(&bodies);

    Ok(GeneratedModule {
        module,
        header,
        source,
        context,
    })
}

/// `__<PREFIX>_<MODULE>_H__`, with anything outside `[A-Za-z0-9]` mapped to `_`.
pub fn include_guard(prefix: &str, module: &str) -> String {
    let sanitize = |s: &str| -> String {
        s.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    };
    if prefix.is_empty() {
        format!("__{}_H__", sanitize(module))
    } else {
        format!("__{}_{}_H__", sanitize(prefix), sanitize(module))
    }
}

fn write_banner(banner: &[String], w: &mut CodeWriter) {
    if banner.is_empty() {
        return;
    }
    w.line("/**");
    for line in banner {
        if line.is_empty() {
            w.line(" *");
        } else {
            w.line(format!(" * {line}"));
        }
    }
    w.line(" */");
    w.blank_line();
}
