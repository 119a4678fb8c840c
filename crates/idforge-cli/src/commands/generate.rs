// Generate entity ID members from C# sources

use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use idforge_codegen::syntax::MemberDecl;
use idforge_codegen::parse_compilation_unit;
use idforge_entity_id::EntityIdGenerator;
use tracing::{debug, info};

use super::{Command, SettingsSource};
use crate::error::{CliError, CliResult};

/// First line of every generated fragment
pub const BANNER: &str = "// <auto-generated>";

/// Generates code for each input file
pub struct GenerateCommand {
    pub inputs: Vec<PathBuf>,
    pub settings: SettingsSource,
    pub out: Option<PathBuf>,
}

impl GenerateCommand {
    pub fn new(inputs: Vec<PathBuf>, settings: SettingsSource, out: Option<PathBuf>) -> Self {
        Self {
            inputs,
            settings,
            out,
        }
    }

    /// Run synthesis over every input and return the combined output text
    pub fn render(&self) -> CliResult<String> {
        if self.inputs.is_empty() {
            return Err(CliError::InvalidArgument {
                message: "at least one input file is required".to_string(),
            });
        }

        let generator = EntityIdGenerator::new(self.settings.load()?);
        let mut fragments = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let members = generate_file(&generator, input)?;
            info!(
                "Generated {} declaration(s) from {}",
                members.len(),
                input.display()
            );
            fragments.push(render_fragment(input, &members));
        }
        Ok(fragments.join("\n"))
    }
}

fn generate_file(generator: &EntityIdGenerator, input: &Path) -> CliResult<Vec<MemberDecl>> {
    debug!("Reading {}", input.display());
    let source = fs::read_to_string(input).map_err(|e| CliError::io(input, e))?;
    let unit = parse_compilation_unit(&source).map_err(|e| CliError::Parse {
        path: input.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(generator.generate_unit(&unit)?)
}

/// Banner, source note, then each declaration separated by a blank line
pub fn render_fragment(source: &Path, members: &[MemberDecl]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", BANNER);
    let _ = writeln!(out, "// Source: {}", source.display());
    for member in members {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", member);
    }
    out
}

impl Command for GenerateCommand {
    fn execute(&self) -> CliResult<()> {
        let text = self.render()?;
        match &self.out {
            Some(path) => {
                fs::write(path, text).map_err(|e| CliError::io(path, e))?;
                crate::output::print_success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(text.as_bytes())
                    .map_err(|e| CliError::io("<stdout>", e))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
namespace Billing
{
    [EntityId]
    public readonly partial struct InvoiceId { }
}
"#;

    fn command(dir: &Path, inputs: Vec<PathBuf>) -> GenerateCommand {
        let config = dir.join("idforge.toml");
        fs::write(&config, "").unwrap();
        GenerateCommand::new(
            inputs,
            SettingsSource {
                config: Some(config),
                template_dir: None,
            },
            None,
        )
    }

    #[test]
    fn test_render_fragment_banner() {
        let text = render_fragment(Path::new("Empty.cs"), &[]);
        assert_eq!(text, "// <auto-generated>\n// Source: Empty.cs\n");
    }

    #[test]
    fn test_generate_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("InvoiceId.cs");
        fs::write(&input, SOURCE).unwrap();

        let text = command(dir.path(), vec![input]).render().unwrap();
        assert!(text.starts_with(BANNER));
        assert!(text.contains("namespace Billing\n{"));
        assert!(text.contains("partial struct InvoiceId"));
        assert!(text.contains("InvoiceIdTypeConverter"));
        assert!(text.contains("InvoiceIdJsonConverter"));
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = command(dir.path(), vec![dir.path().join("nope.cs")])
            .render()
            .unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn test_unparsable_input_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Broken.cs");
        fs::write(&input, "namespace Broken { struct X {").unwrap();

        let err = command(dir.path(), vec![input]).render().unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
    }

    #[test]
    fn test_execute_writes_out_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("InvoiceId.cs");
        fs::write(&input, SOURCE).unwrap();
        let out = dir.path().join("ids.g.cs");

        let mut cmd = command(dir.path(), vec![input]);
        cmd.out = Some(out.clone());
        cmd.execute().unwrap();

        let written = fs::read_to_string(out).unwrap();
        assert!(written.contains("struct InvoiceId"));
    }
}
