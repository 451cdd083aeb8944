use std::path::Path;

use enumgen_core::{
    LiteralValue,
    config::{FromConfigDir, GenerationConfig},
    diagnostics::{DiagnosticKind, Diagnostics},
    generate::{Generation, files::MemCollector, pass::ResourceOutcome},
    ir::OutputRef,
    runtime::{Resolution, RuntimeEnv},
    select::ResolutionStrategy,
};
use enumgen_testing::insta::assert_snapshot;

fn fixtures() -> GenerationConfig {
    enumgen_testing::logging();
    GenerationConfig::from_config_dir(Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")))
        .unwrap()
}

fn resolve() -> (Generation, Vec<ResourceOutcome>, Diagnostics) {
    let generation = Generation::new(fixtures()).unwrap();
    let mut diagnostics = Diagnostics::new();
    let outcomes = generation.resolve(&mut diagnostics);
    (generation, outcomes, diagnostics)
}

fn strategy<'a>(
    outcomes: &'a [ResourceOutcome],
    resource: &str,
    property: &str,
) -> Option<&'a ResolutionStrategy> {
    outcomes
        .iter()
        .find(|r| r.name.as_str() == resource)?
        .property(property)?
        .state
        .strategy()
}

#[test]
fn draft_schemas_are_excluded() {
    let (generation, _, _) = resolve();
    assert_eq!(generation.registry.len(), 3);

    let blob_type = generation
        .registry
        .lookup(&"azure-native:storage:BlobType".into())
        .unwrap();
    assert_eq!(blob_type.members().len(), 3);
}

#[test]
fn literal_member_is_direct() {
    let (generation, outcomes, _) = resolve();

    let strategy = strategy(&outcomes, "faviconpng", "type").unwrap();
    assert_eq!(
        strategy,
        &ResolutionStrategy::Direct {
            member: "Block".into()
        }
    );

    let ty = generation
        .registry
        .lookup(&"azure-native:storage:BlobType".into())
        .unwrap();
    let Resolution::Ready(member) = RuntimeEnv::new()
        .evaluate(strategy, &ty)
        .unwrap()
    else {
        panic!("direct members never wait");
    };
    assert_eq!(member.value, LiteralValue::from("Block"));
}

#[test]
fn identifier_parses_eagerly_at_runtime() {
    let (generation, outcomes, _) = resolve();

    let strategy = strategy(&outcomes, "another", "type").unwrap();
    assert_eq!(
        strategy,
        &ResolutionStrategy::EagerParse {
            raw: "typeVar".into()
        }
    );

    let ty = generation
        .registry
        .lookup(&"azure-native:storage:BlobType".into())
        .unwrap();
    let env = RuntimeEnv::new().with_variable("typeVar", "Block");
    assert_eq!(
        env.evaluate(strategy, &ty).unwrap(),
        Resolution::Ready(&ty.members()[0])
    );

    let env = RuntimeEnv::new().with_variable("typeVar", "Blob");
    let err = env.evaluate(strategy, &ty).unwrap_err();
    assert_eq!(err.error_code().to_string(), "KEN2003");
}

#[test]
fn output_parse_is_deferred_until_resolved() {
    let (generation, outcomes, _) = resolve();
    let index_document = OutputRef::new("staticwebsite", "indexDocument");

    let strategy = strategy(&outcomes, "indexhtml", "type").unwrap();
    assert_eq!(strategy.dependency(), Some(&index_document));

    let ty = generation
        .registry
        .lookup(&"azure-native:storage:BlobType".into())
        .unwrap();
    let mut env = RuntimeEnv::new();
    assert_eq!(
        env.evaluate(strategy, &ty).unwrap(),
        Resolution::Pending {
            waiting_on: index_document.clone()
        }
    );

    env.resolve(index_document, "Page");
    assert_eq!(
        env.evaluate(strategy, &ty).unwrap(),
        Resolution::Ready(&ty.members()[1])
    );

    let indexhtml = outcomes
        .iter()
        .find(|r| r.name.as_str() == "indexhtml")
        .unwrap();
    assert_eq!(
        indexhtml
            .dependencies
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>(),
        ["staticwebsite"]
    );
}

#[test]
fn invalid_literal_is_reported_and_skipped() {
    let (_, outcomes, diagnostics) = resolve();

    let errors: Vec<_> = diagnostics.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, DiagnosticKind::InvalidEnumLiteral);
    assert_snapshot!(errors[0].to_string(), @"[KEN2001] broken.type @ 520..534: 'NotARealType' is not a valid value for enum azure-native:storage:BlobType");

    // the rest of the resource and program still resolve
    assert_eq!(
        strategy(&outcomes, "broken", "accessTier"),
        Some(&ResolutionStrategy::Direct {
            member: "Cool".into()
        })
    );
    assert_eq!(
        strategy(&outcomes, "vm", "priority"),
        Some(&ResolutionStrategy::Direct {
            member: "Spot".into()
        })
    );
}

#[test]
fn generated_document() {
    let mut config = fixtures();
    config.set_mem(true);
    let output = config.output_path().join("EnumProperties.cs");

    let collector = MemCollector::new();
    let generation = Generation::new(config).unwrap();
    generation
        .generate(&mut Diagnostics::new(), Some(collector.mem_flush()))
        .unwrap();

    let text = collector.read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    for expected in [
        "Type = AzureNative.Storage.BlobType.Block,",
        "Type = System.Enum.Parse<AzureNative.Storage.BlobType>(typeVar),",
        "Type = staticwebsite.IndexDocument.Apply(System.Enum.Parse<AzureNative.Storage.BlobType>),",
        "AccessTier = staticwebsite.Tier.Apply(v => v.Trim()).Apply(System.Enum.Parse<AzureNative.Storage.AccessTier>),",
        "// indexhtml waits on: staticwebsite",
        "Priority = AzureNative.Compute.Priority.Spot,",
    ] {
        assert!(lines.contains(&expected), "missing `{expected}` in:\n{text}");
    }

    assert_snapshot!(
        lines.iter().find(|l| l.starts_with("// Type skipped")).unwrap(),
        @"// Type skipped: [KEN2001] 'NotARealType' is not a valid value for enum azure-native:storage:BlobType"
    );
}

#[test]
fn missing_program_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("enumgen.toml"),
        "program = \"missing.yaml\"\n\n[schemas]\ninclude = [\"*.json\"]\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("empty.json"), r#"{"enums": []}"#).unwrap();

    let config = GenerationConfig::from_config_dir(Some(dir.path())).unwrap();
    let err: enumgen_errors::CompilerError = Generation::new(config).err().unwrap().into();

    enumgen_testing::insta_test!(|| {
        assert_snapshot!(err.message(), @"file not found: [TEMP]/missing.yaml");
    });
}
