mod common;

use configurator::{Attribute, ConfiguratorError};

use common::{document_path, open};


#[test]
fn added_options_can_be_read_back() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    let cases = [
        ("General.enabled", "true"),
        ("General.Colors.background", "#000000"),
        (r#"Hosts.Host[address="10.0.0.1",label="main host"].port"#, "22"),
        ("Hosts.Host[address=10.0.0.2].port", "2222"),
        ("Empty.value", ""),
        ("Text.multiline", "first line\nsecond line"),
        ("Text.markup", r#"<a href="x">&amp;</a>"#),
    ];

    for (path, value) in cases {
        configurator.add_option_by_path(path, value).unwrap();
    }

    for (path, value) in cases {
        assert_eq!(configurator.get_option_by_path(path).unwrap().value(), value, "{path}");
    }
}

#[test]
fn setting_an_option_twice_overwrites_it() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    configurator.add_option_by_path("General.level", "1").unwrap();
    let option = configurator.add_option_by_path("General.level", "2").unwrap().clone();

    let section = configurator.section(option.section()).unwrap();
    assert_eq!(section.options().len(), 1);
    assert_eq!(section.option("level").unwrap().value(), "2");
}

#[test]
fn ensuring_a_path_twice_yields_the_same_section() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    let first = configurator
        .ensure_section_path("Binaries.Binary[name=tool].Flags")
        .unwrap();
    let second = configurator
        .ensure_section_path("Binaries.Binary[name=tool].Flags")
        .unwrap();

    assert_eq!(first, second);

    let binaries = configurator.resolve_section_path("Binaries").unwrap();
    assert_eq!(configurator.section(binaries).unwrap().sub_sections().count(), 1);
    assert_eq!(configurator.get_top_level_sections().unwrap().len(), 1);
}

#[test]
fn ensure_resumes_below_the_longest_existing_prefix() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    let outer = configurator.ensure_section_path("Outer").unwrap();
    let deep = configurator.ensure_section_path("Outer.Middle.Inner").unwrap();

    let deep = configurator.section(deep).unwrap();
    assert_eq!(deep.path(), "Outer.Middle.Inner");
    assert_eq!(deep.parent().unwrap().parent().unwrap().id(), outer);
    assert_eq!(configurator.get_top_level_sections().unwrap().len(), 1);
}

#[test]
fn nested_section_scenario() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    configurator
        .ensure_section_path("Something.SomethingElse")
        .unwrap();
    let section = configurator
        .resolve_section_path("Something.SomethingElse")
        .unwrap();

    let section = configurator.section(section).unwrap();
    assert_eq!(section.name(), "SomethingElse");
    assert!(section.options().is_empty());
    assert!(!section.has_sub_sections());
    assert!(section.is_empty());
}

#[test]
fn attribute_predicates_tell_siblings_apart() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    let binaries = configurator.ensure_section_path("Binaries").unwrap();
    let some = configurator
        .add_sub_section(binaries, "Binary[name=someBinary]")
        .unwrap();
    let another = configurator
        .add_sub_section(binaries, "Binary[name=anotherBinary]")
        .unwrap();

    assert_eq!(
        configurator
            .resolve_section_path(r#"Binaries.Binary[name="someBinary"]"#)
            .unwrap(),
        some
    );
    assert_eq!(
        configurator
            .resolve_section_path("Binaries.Binary[name=anotherBinary]")
            .unwrap(),
        another
    );

    let predicate = [Attribute::new("name", "someBinary")];
    assert!(configurator.section(some).unwrap().contains_attributes(&predicate));
    assert!(!configurator.section(another).unwrap().contains_attributes(&predicate));

    // Without a predicate the first sibling wins.
    assert_eq!(configurator.get_sub_section(binaries, "Binary").unwrap(), Some(some));
    assert_eq!(
        configurator.find_sub_sections(binaries, "Binary").unwrap(),
        vec![some, another]
    );
}

#[test]
fn attribute_predicates_use_contains_matching() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    let binaries = configurator.ensure_section_path("Binaries").unwrap();
    let binary = configurator
        .add_sub_section(binaries, "Binary[name=tool,arch=arm64]")
        .unwrap();

    assert_eq!(
        configurator.get_sub_section(binaries, "Binary[name=tool]").unwrap(),
        Some(binary)
    );
    assert_eq!(
        configurator
            .get_sub_section(binaries, "Binary[arch=arm64,name=tool]")
            .unwrap(),
        Some(binary)
    );
    assert_eq!(
        configurator
            .get_sub_section(binaries, "Binary[name=tool,os=linux]")
            .unwrap(),
        None
    );
    assert_eq!(
        configurator.get_sub_section(binaries, "Binary[name=other]").unwrap(),
        None
    );
}

#[test]
fn top_level_lookup_honours_attributes() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    let first = configurator.add_section("Profile[kind=work]", None).unwrap();
    let second = configurator.add_section("Profile[kind=home]", None).unwrap();

    assert_eq!(configurator.get_top_level_section("Profile", None).unwrap(), Some(first));
    assert_eq!(
        configurator
            .get_top_level_section("Profile", Some(&[Attribute::new("kind", "home")]))
            .unwrap(),
        Some(second)
    );
    assert_eq!(configurator.get_top_level_section("Missing", None).unwrap(), None);
}

#[test]
fn add_sub_section_always_creates() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    let parent = configurator.ensure_section_path("Parent").unwrap();
    let first = configurator.add_sub_section(parent, "Child").unwrap();
    let second = configurator.add_sub_section(parent, "Child").unwrap();

    assert_ne!(first, second);
    assert_eq!(configurator.find_sub_sections(parent, "Child").unwrap().len(), 2);
}

#[test]
fn create_sub_section_by_path_builds_a_chain() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    let root = configurator.ensure_section_path("Root").unwrap();
    let leaf = configurator
        .create_sub_section_by_path(root, "A.B[x=1].C")
        .unwrap();

    let leaf = configurator.section(leaf).unwrap();
    assert_eq!(leaf.path(), "Root.A.B.C");
    assert_eq!(
        leaf.parent().unwrap().attribute("x").map(Attribute::value),
        Some("1")
    );
}

#[test]
fn two_options_scenario() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    configurator
        .add_option_by_path("MyOptionSection.SubSection.anOption", "true")
        .unwrap();
    configurator
        .add_option_by_path("MyOptionSection.SubSection.anotherOption", "false")
        .unwrap();

    let section = configurator
        .resolve_section_path("MyOptionSection.SubSection")
        .unwrap();
    let options = configurator
        .section(section)
        .unwrap()
        .options()
        .iter()
        .map(|option| (option.name(), option.value()))
        .collect::<Vec<_>>();

    assert_eq!(options, vec![("anOption", "true"), ("anotherOption", "false")]);
}

#[test]
fn missing_paths_report_the_longest_valid_prefix() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    configurator.ensure_section_path("A.B[x=1]").unwrap();

    match configurator.resolve_section_path("A.B[x=1].C.D") {
        Err(ConfiguratorError::PathNotFound {
            valid_prefix,
            remainder,
        }) => {
            assert_eq!(valid_prefix, "A.B[x=1]");
            assert_eq!(remainder, "C.D");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    match configurator.resolve_section_path("Z.Y") {
        Err(ConfiguratorError::PathNotFound {
            valid_prefix,
            remainder,
        }) => {
            assert_eq!(valid_prefix, "");
            assert_eq!(remainder, "Z.Y");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    // Lookups never create anything.
    assert!(configurator.get_top_level_section("Z", None).unwrap().is_none());
}

#[test]
fn missing_options_are_reported() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    configurator.ensure_section_path("General").unwrap();

    assert!(matches!(
        configurator.get_option_by_path("General.missing"),
        Err(ConfiguratorError::OptionNotFound { ref section, ref option })
            if section == "General" && option == "missing"
    ));
    assert!(matches!(
        configurator.get_option_by_path("Nowhere.missing"),
        Err(ConfiguratorError::PathNotFound { .. })
    ));
}

#[test]
fn options_are_not_sections() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    configurator.add_option_by_path("General.level", "3").unwrap();

    assert!(matches!(
        configurator.resolve_section_path("General.level"),
        Err(ConfiguratorError::NotASection { ref option, .. }) if option == "level"
    ));
    assert!(matches!(
        configurator.add_option_by_path("General.level.inner", "x"),
        Err(ConfiguratorError::NotASection { .. })
    ));
}

#[test]
fn malformed_paths_are_rejected() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    for path in ["", "A..B", "A[x=1", "A[x]", "A]", "9A", "onlyOption"] {
        let result = if path == "onlyOption" {
            configurator.add_option_by_path(path, "x").map(|_| ())
        } else {
            configurator.ensure_section_path(path).map(|_| ())
        };

        assert!(
            matches!(result, Err(ConfiguratorError::MalformedPath { .. })),
            "{path:?} was accepted"
        );
    }

    assert!(configurator.get_top_level_sections().unwrap().is_empty());
}

#[test]
fn attributes_can_be_added_later() {
    let directory = tempfile::tempdir().unwrap();
    let mut configurator = open(&document_path(&directory));

    let binary = configurator.ensure_section_path("Binaries.Binary").unwrap();
    configurator.add_attribute(binary, "name", "tool").unwrap();
    configurator.add_attribute(binary, "name", "renamed").unwrap();

    assert_eq!(
        configurator
            .resolve_section_path("Binaries.Binary[name=renamed]")
            .unwrap(),
        binary
    );
    assert_eq!(configurator.section(binary).unwrap().attributes().len(), 1);
}
