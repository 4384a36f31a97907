use classify_core::classifiers::PathCaptures;
use classify_core::{Classifier, ClassifierDefinition, ClassifierError, ClassifierSet, Location};

fn definition(class: &str) -> ClassifierDefinition {
    ClassifierDefinition::new(class)
        .file_pattern(r"(?:^|/)tool$")
        .evidence_pattern(r"tool (?P<version>[0-9.]+)")
}

#[test]
fn invalid_file_pattern_is_rejected() {
    let def = ClassifierDefinition::new("broken").file_pattern("(unclosed").evidence_pattern("x");
    let err = Classifier::from_definition(def).expect_err("must fail");
    match err {
        ClassifierError::InvalidFilePattern { class, pattern, .. } => {
            assert_eq!(class, "broken");
            assert_eq!(pattern, "(unclosed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn duplicate_group_name_in_evidence_is_rejected() {
    let def = ClassifierDefinition::new("dup-group")
        .file_pattern("tool$")
        .evidence_pattern(r"(?P<version>[0-9]+) (?P<version>[0-9]+)");
    let err = Classifier::from_definition(def).expect_err("must fail");
    assert!(matches!(err, ClassifierError::InvalidEvidencePattern { .. }), "got {err:?}");
}

#[test]
fn missing_patterns_and_empty_class_are_rejected() {
    let err = Classifier::from_definition(ClassifierDefinition::new("  ")).expect_err("must fail");
    assert!(matches!(err, ClassifierError::EmptyClass));

    let err = Classifier::from_definition(ClassifierDefinition::new("a").evidence_pattern("x"))
        .expect_err("must fail");
    assert!(matches!(err, ClassifierError::MissingFilePattern { .. }));

    let err = Classifier::from_definition(ClassifierDefinition::new("a").file_pattern("x"))
        .expect_err("must fail");
    assert!(matches!(err, ClassifierError::MissingEvidencePattern { .. }));
}

#[test]
fn zero_read_limit_is_rejected() {
    let err = Classifier::from_definition(definition("tool").read_limit(0)).expect_err("must fail");
    assert!(matches!(err, ClassifierError::ZeroReadLimit { ref class } if class == "tool"));
}

#[test]
fn empty_and_duplicate_sets_are_rejected() {
    let err = ClassifierSet::new(Vec::new()).expect_err("empty set must fail");
    assert!(matches!(err, ClassifierError::EmptySet));

    let err = ClassifierSet::new(vec![definition("tool"), definition(" tool ")])
        .expect_err("duplicate class must fail");
    assert!(matches!(err, ClassifierError::DuplicateClass(ref class) if class == "tool"));
}

#[test]
fn template_variable_must_be_captured_by_every_file_pattern() {
    let def = ClassifierDefinition::new("templated")
        .file_pattern(r"tool(?P<major>[0-9]+)$")
        .file_pattern(r"tool$")
        .evidence_pattern(r"v{{major}}\.[0-9]+");
    let err = Classifier::from_definition(def).expect_err("must fail");
    assert!(
        matches!(err, ClassifierError::UnknownTemplateVariable { ref variable, .. } if variable == "major"),
        "got {err:?}"
    );
}

#[test]
fn select_returns_path_captures_without_reading() {
    let classifier = Classifier::from_definition(
        ClassifierDefinition::new("python-like")
            .file_pattern(r"(?:^|/)python(?P<version>[0-9]+\.[0-9]+)$")
            .evidence_pattern(r"(?P<version>{{version}}\.[0-9]+)"),
    )
    .expect("classifier");

    let captures = classifier.select(&Location::new("/usr/bin/python3.12")).expect("selected");
    assert_eq!(captures.get("version").map(String::as_str), Some("3.12"));
    assert!(classifier.select(&Location::new("/usr/bin/python")).is_none());
    // The selector looks at the real path, not how the file was reached.
    let linked = Location::with_access_path("/usr/bin/python3.12", "/usr/bin/python3");
    assert!(classifier.select(&linked).is_some());
}

#[test]
fn templated_probe_escapes_captured_values() {
    let classifier = Classifier::from_definition(
        ClassifierDefinition::new("python-like")
            .file_pattern(r"(?:^|/)python(?P<version>[0-9]+\.[0-9]+)$")
            .evidence_pattern(r"(?P<version>{{version}}\.[0-9]+)"),
    )
    .expect("classifier");
    let captures = classifier.select(&Location::new("/python3.12")).expect("selected");

    // An unescaped '.' would let "3x12" satisfy the template.
    assert!(classifier.probe(b"3x12.1", &captures).is_none());
    let found = classifier.probe(b"\x00\x003.12.1\x00", &captures).expect("match");
    assert_eq!(found.version(), Some("3.12.1"));
}

#[test]
fn later_evidence_patterns_merge_into_the_first_match() {
    let classifier = Classifier::from_definition(
        definition("tool").evidence_pattern(r"built (?P<date>[0-9-]+)").evidence_pattern("absent"),
    )
    .expect("classifier");
    let found = classifier
        .probe(b"tool 1.4 built 2024-02-01", &PathCaptures::new())
        .expect("match");
    assert_eq!(found.version(), Some("1.4"));
    assert_eq!(found.metadata.get("date").map(String::as_str), Some("2024-02-01"));
}

#[test]
fn probe_handles_non_utf8_content_and_captures() {
    let classifier = Classifier::from_definition(
        ClassifierDefinition::new("raw")
            .file_pattern("raw$")
            .evidence_pattern(r"(?-u)tag:(?P<value>[\x80-\xff]+)"),
    )
    .expect("classifier");
    let found = classifier.probe(b"\xff\xfetag:\xc3\xa9\xff;", &PathCaptures::new()).expect("match");
    assert_eq!(found.metadata.get("value").map(String::as_str), Some("\u{e9}\u{fffd}"));
}

#[test]
fn definitions_round_trip_through_yaml() {
    let yaml = r#"
class: my-tool
file-patterns: ['(?:^|/)my-tool$']
evidence-patterns: ['my-tool (?P<version>[0-9.]+)']
read-limit: 4096
"#;
    let def: ClassifierDefinition = serde_yaml::from_str(yaml).expect("parse");
    assert_eq!(
        def,
        ClassifierDefinition::new("my-tool")
            .file_pattern("(?:^|/)my-tool$")
            .evidence_pattern("my-tool (?P<version>[0-9.]+)")
            .read_limit(4096)
    );
    let classifier = Classifier::from_definition(def).expect("classifier");
    assert_eq!(classifier.read_limit(), Some(4096));
}
