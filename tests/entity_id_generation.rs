//! End-to-end entity ID synthesis
//!
//! Parses C# source, runs the generator over every marked struct, renders the
//! result and parses it back.

use std::fs;
use std::path::PathBuf;

use idforge_cli::commands::{generate::BANNER, GenerateCommand, SettingsSource};
use idforge_codegen::syntax::{MemberDecl, Modifier, TypeKind};
use idforge_codegen::parse_compilation_unit;
use idforge_entity_id::{BackingKind, EntityIdError, EntityIdGenerator, GeneratorSettings};

fn generate(source: &str) -> Result<Vec<MemberDecl>, EntityIdError> {
    let unit = parse_compilation_unit(source).unwrap();
    EntityIdGenerator::new(GeneratorSettings::default()).generate_unit(&unit)
}

fn render(members: &[MemberDecl]) -> String {
    members
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[test]
fn test_nested_subject_keeps_its_scopes() {
    let source = r#"
using System;

namespace N
{
    public partial struct Outer<T> : IDisposable where T : class
    {
        [EntityId]
        public partial struct Id { }
    }
}
"#;
    let members = generate(source).unwrap();
    assert_eq!(members.len(), 1);

    let ns = members[0].as_namespace().unwrap();
    assert_eq!(ns.name.to_string(), "N");
    assert!(ns.usings.is_empty());
    assert_eq!(ns.members.len(), 1);

    let outer = ns.members[0].as_type().unwrap();
    assert_eq!(outer.identifier, "Outer");
    assert_eq!(outer.kind, TypeKind::Struct);
    assert!(outer.has_modifier(Modifier::Partial));
    assert_eq!(outer.type_parameters, vec!["T".to_string()]);
    assert!(outer.base_list.is_empty());
    assert!(outer.constraints.is_empty());

    let id = outer.nested_type("Id").unwrap();
    assert!(id.find_attribute("System.ComponentModel.TypeConverter").is_some());
    assert!(id.find_attribute("Newtonsoft.Json.JsonConverter").is_some());
    assert!(id.nested_type("IdTypeConverter").is_some());
    assert!(id.nested_type("IdJsonConverter").is_some());
}

#[test]
fn test_rendered_output_parses_back() {
    let source = r#"
namespace Shop
{
    [EntityId(GenerateJsonNetConverter = false)]
    public readonly partial struct CustomerId { }

    [EntityId]
    public readonly partial struct OrderId { }
}
"#;
    let text = render(&generate(source).unwrap());
    let reparsed = parse_compilation_unit(&text).unwrap();
    assert_eq!(reparsed.to_string(), text);

    let ns = reparsed.members[0].as_namespace().unwrap();
    let names: Vec<&str> = ns.members.iter().filter_map(|m| m.identifier()).collect();
    assert_eq!(names, vec!["CustomerId"]);

    assert!(text.contains("[System.ComponentModel.TypeConverter(typeof(CustomerIdTypeConverter))]"));
    assert!(!text.contains("CustomerIdJsonConverter"));
    assert!(text.contains("OrderIdJsonConverter"));
}

#[test]
fn test_unsupported_backing_kind_names_the_subject() {
    let source = r#"
[EntityId(BackingType = typeof(decimal))]
public partial struct Price { }
"#;
    let err = generate(source).unwrap_err();
    match &err {
        EntityIdError::Subject { subject, .. } => assert_eq!(subject, "Price"),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(matches!(
        err.root(),
        EntityIdError::UnsupportedBackingKind {
            kind: BackingKind::Decimal
        }
    ));
}

#[test]
fn test_first_failure_in_source_order_is_reported() {
    let source = r#"
[EntityId]
public partial struct Fine { }

[EntityId(BackingType = typeof(Guid))]
public partial struct First { }

[EntityId(BackingType = typeof(string))]
public partial struct Second { }
"#;
    match generate(source).unwrap_err() {
        EntityIdError::Subject { subject, .. } => assert_eq!(subject, "First"),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_template_directory_overrides_bundled_template() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Int32EntityIdStruct.cstemplate"),
        r#"
public readonly partial struct TEMPLATE_DATA_NAME__
{
    public int Raw { get; }
}
"#,
    )
    .unwrap();

    let settings = GeneratorSettings {
        template_dir: Some(dir.path().to_path_buf()),
        ..GeneratorSettings::default()
    };
    let unit = parse_compilation_unit("[EntityId] partial struct Tag { }").unwrap();
    let members = EntityIdGenerator::new(settings).generate_unit(&unit).unwrap();

    let tag = members[0].as_type().unwrap();
    assert!(tag.property("Raw").is_some());
    assert!(tag.property("Value").is_none());
    // converters still come from the bundled set
    assert!(tag.nested_type("TagTypeConverter").is_some());
}

#[test]
fn test_cli_generates_one_block_per_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("idforge.toml");
    fs::write(&config, "").unwrap();

    let mut inputs: Vec<PathBuf> = Vec::new();
    for (file, source) in [
        (
            "A.cs",
            "[assembly: InternalsVisibleTo(\"A.Tests\")]\nnamespace A { [EntityId] partial struct AId { } }",
        ),
        ("B.cs", "namespace B { partial struct Unmarked { } }"),
    ] {
        let path = dir.path().join(file);
        fs::write(&path, source).unwrap();
        inputs.push(path);
    }

    let text = GenerateCommand::new(
        inputs,
        SettingsSource {
            config: Some(config),
            template_dir: None,
        },
        None,
    )
    .render()
    .unwrap();

    assert_eq!(text.matches(BANNER).count(), 2);
    assert!(text.contains("partial struct AId"));
    assert!(!text.contains("Unmarked"));
    assert!(!text.contains("InternalsVisibleTo"));
}
