//! End-to-end assembly of config documents

use nuke_shield_common::{
    AssemblyRequest, DeclineAll, DocumentAssembler, LineDocument, ManualFilters,
    MissingSectionPolicy, PropertyOverrides, ResourceGroup, ScriptedPrompt, TagFilter,
    TargetTypeCatalog,
};
use nuke_shield_test_utils::{BASE_CONFIG, MINIMAL_CONFIG, ROLE_CONFIG, SAMPLE_CATALOG};

fn header_count(doc: &LineDocument, key: &str) -> usize {
    let header = format!("{key}:");
    doc.lines().iter().filter(|l| l.trim() == header).count()
}

fn section_lines<'a>(doc: &'a LineDocument, key: &str) -> Vec<&'a str> {
    let start = doc.locate(key).unwrap();
    let end = doc.section_end(start);
    doc.lines()[start + 1..end].iter().map(|l| l.trim()).collect()
}

fn sample_resources() -> ResourceGroup {
    let mut resources = ResourceGroup::new();
    resources.extend("AWS::IAM::Role", ["MyRole", "OtherRole"]);
    resources.insert("AWS::S3::Bucket", "data");
    resources.insert("AWS::Lambda::Function", "handler");
    resources.insert("AWS::Custom::Thing", "thing-1");
    resources.insert("CloudFormationStack", "core-stack");
    resources
}

#[test]
fn exact_mappings_never_prompt() {
    let catalog = TargetTypeCatalog::parse(SAMPLE_CATALOG);
    let overrides = PropertyOverrides::builtin();
    let manual = ManualFilters::empty();
    let assembler = DocumentAssembler::new(&catalog, &overrides, &manual);

    let mut resources = ResourceGroup::new();
    resources.insert("AWS::S3::Bucket", "data");
    resources.insert("AWS::SQS::Queue", "jobs");

    let mut doc = LineDocument::parse(BASE_CONFIG);
    let mut prompt = ScriptedPrompt::new(Vec::<String>::new());
    let request = AssemblyRequest {
        tags: &[],
        excluded_types: &[],
        resources: &resources,
        manual_filters: false,
    };
    let report = assembler.assemble(&mut doc, &request, &mut prompt);

    assert!(prompt.asked().is_empty());
    assert_eq!(report.mapped.len(), 2);
    assert!(report.is_complete());
    assert_eq!(
        section_lines(&doc, "S3Bucket"),
        vec!["- \"data\"", "- \"audit-logs\""]
    );
    assert_eq!(section_lines(&doc, "SQSQueue"), vec!["- \"jobs\""]);
}

#[test]
fn unmatched_types_are_reported_not_written() {
    let catalog = TargetTypeCatalog::parse(SAMPLE_CATALOG);
    let overrides = PropertyOverrides::builtin();
    let manual = ManualFilters::empty();
    let assembler = DocumentAssembler::new(&catalog, &overrides, &manual);

    let mut resources = ResourceGroup::new();
    resources.extend("AWS::Custom::Thing", ["thing-1", "thing-2"]);

    let original = LineDocument::parse(BASE_CONFIG);
    let mut doc = original.clone();
    let mut prompt = ScriptedPrompt::new(Vec::<String>::new());
    let request = AssemblyRequest {
        tags: &[],
        excluded_types: &[],
        resources: &resources,
        manual_filters: false,
    };
    let report = assembler.assemble(&mut doc, &request, &mut prompt);

    assert!(prompt.asked().is_empty());
    assert_eq!(doc, original);
    assert_eq!(report.unmatched.resource_count(), 2);
    assert_eq!(
        report.unmatched.get("AWS::Custom::Thing").unwrap(),
        &["thing-1".to_string(), "thing-2".to_string()]
    );
}

#[test]
fn rerunning_reuses_section_headers() {
    let catalog = TargetTypeCatalog::parse(SAMPLE_CATALOG);
    let overrides = PropertyOverrides::builtin();
    let manual = ManualFilters::builtin();
    let assembler = DocumentAssembler::new(&catalog, &overrides, &manual);

    let tags = vec![TagFilter {
        key: "Owner".to_string(),
        value: "platform-team".to_string(),
    }];
    let excluded = vec!["EC2VPC".to_string()];
    let resources = sample_resources();
    let request = AssemblyRequest {
        tags: &tags,
        excluded_types: &excluded,
        resources: &resources,
        manual_filters: true,
    };

    let mut doc = LineDocument::parse(BASE_CONFIG);
    assembler.assemble(&mut doc, &request, &mut DeclineAll);
    assembler.assemble(&mut doc, &request, &mut DeclineAll);

    for type_name in catalog.iter() {
        assert_eq!(header_count(&doc, type_name), 1, "{type_name}");
    }
    assert_eq!(header_count(&doc, "filters"), 1);
    assert_eq!(header_count(&doc, "resource-types"), 1);
    assert_eq!(header_count(&doc, "excludes"), 1);
}

#[test]
fn role_dependents_get_one_pair_per_role() {
    let catalog = TargetTypeCatalog::parse(SAMPLE_CATALOG);
    let overrides = PropertyOverrides::builtin();
    let manual = ManualFilters::empty();
    let assembler = DocumentAssembler::new(&catalog, &overrides, &manual);

    let resources = sample_resources();
    let request = AssemblyRequest {
        tags: &[],
        excluded_types: &[],
        resources: &resources,
        manual_filters: false,
    };
    let mut doc = LineDocument::parse(BASE_CONFIG);
    assembler.assemble(&mut doc, &request, &mut DeclineAll);

    assert_eq!(
        section_lines(&doc, "IAMRolePolicy"),
        vec![
            "- property: role:RoleName",
            "value: MyRole",
            "- property: role:RoleName",
            "value: OtherRole",
        ]
    );
    assert_eq!(
        section_lines(&doc, "IAMRolePolicyAttachment"),
        vec![
            "- property: RoleName",
            "value: MyRole",
            "- property: RoleName",
            "value: OtherRole",
        ]
    );
}

#[test]
fn original_lines_keep_their_order() {
    let catalog = TargetTypeCatalog::parse(SAMPLE_CATALOG);
    let overrides = PropertyOverrides::builtin();
    let manual = ManualFilters::builtin();
    let assembler = DocumentAssembler::new(&catalog, &overrides, &manual);

    let tags = vec![TagFilter {
        key: "Owner".to_string(),
        value: "platform-team".to_string(),
    }];
    let excluded = vec!["EC2VPC".to_string(), "SQSQueue".to_string()];
    let resources = sample_resources();
    let request = AssemblyRequest {
        tags: &tags,
        excluded_types: &excluded,
        resources: &resources,
        manual_filters: true,
    };

    let original = LineDocument::parse(BASE_CONFIG);
    let mut doc = original.clone();
    let report = assembler.assemble(&mut doc, &request, &mut DeclineAll);

    assert_eq!(doc.len(), original.len() + report.inserted_lines);

    let mut remaining = doc.lines().iter();
    for line in original.lines() {
        assert!(
            remaining.any(|l| l == line),
            "original line {line:?} missing or out of order"
        );
    }
}

#[test]
fn role_scenario_places_identifier_after_header() {
    let catalog = TargetTypeCatalog::parse(SAMPLE_CATALOG);
    let overrides = PropertyOverrides::builtin();
    let manual = ManualFilters::empty();
    let assembler = DocumentAssembler::new(&catalog, &overrides, &manual);

    let mut resources = ResourceGroup::new();
    resources.insert("AWS::IAM::Role", "MyRole");
    let request = AssemblyRequest {
        tags: &[],
        excluded_types: &[],
        resources: &resources,
        manual_filters: false,
    };

    let mut doc = LineDocument::parse(ROLE_CONFIG);
    assembler.assemble(&mut doc, &request, &mut DeclineAll);

    let role = doc.locate("IAMRole").unwrap();
    assert_eq!(doc.line(role + 1).map(str::trim), Some("- \"MyRole\""));
    assert_eq!(
        section_lines(&doc, "IAMRolePolicy"),
        vec!["- property: role:RoleName", "value: MyRole"]
    );
    assert_eq!(
        section_lines(&doc, "IAMRolePolicyAttachment"),
        vec!["- property: RoleName", "value: MyRole"]
    );
}

#[test]
fn tag_filters_create_missing_filters_section() {
    let catalog = TargetTypeCatalog::parse(SAMPLE_CATALOG);
    let overrides = PropertyOverrides::builtin();
    let manual = ManualFilters::empty();
    let assembler = DocumentAssembler::new(&catalog, &overrides, &manual);

    let tags = vec!["Owner:platform-team".parse::<TagFilter>().unwrap()];
    let resources = ResourceGroup::new();
    let request = AssemblyRequest {
        tags: &tags,
        excluded_types: &[],
        resources: &resources,
        manual_filters: false,
    };

    let mut doc = LineDocument::parse(MINIMAL_CONFIG);
    let report = assembler.assemble(&mut doc, &request, &mut DeclineAll);

    let filters = doc.locate_path(&["accounts", "\"123456789012\"", "filters"]);
    assert!(filters.is_some());
    for type_name in catalog.iter() {
        assert_eq!(
            section_lines(&doc, type_name),
            vec!["- property: tag:Owner", "value: platform-team"],
            "{type_name}"
        );
    }
    assert_eq!(report.created_sections.len(), catalog.len() + 1);
}

#[test]
fn declined_choice_leaves_document_untouched() {
    let catalog = TargetTypeCatalog::from_types(["XThing", "YThing", "ZThing"]);
    let overrides = PropertyOverrides::builtin();
    let manual = ManualFilters::empty();
    let assembler = DocumentAssembler::new(&catalog, &overrides, &manual);

    let mut resources = ResourceGroup::new();
    resources.insert("AWS::Widget::Thing", "w-1");
    let request = AssemblyRequest {
        tags: &[],
        excluded_types: &[],
        resources: &resources,
        manual_filters: false,
    };

    let original = LineDocument::parse(BASE_CONFIG);
    let mut doc = original.clone();
    let mut prompt = ScriptedPrompt::new(["-1"]);
    let report = assembler.assemble(&mut doc, &request, &mut prompt);

    assert_eq!(doc, original);
    assert_eq!(prompt.asked().len(), 1);
    assert_eq!(
        prompt.asked()[0].1,
        vec!["XThing".to_string(), "YThing".to_string(), "ZThing".to_string()]
    );
    assert_eq!(
        report.unmatched.get("AWS::Widget::Thing").unwrap(),
        &["w-1".to_string()]
    );
}

#[test]
fn skip_policy_only_touches_existing_sections() {
    let catalog = TargetTypeCatalog::parse(SAMPLE_CATALOG);
    let overrides = PropertyOverrides::builtin();
    let manual = ManualFilters::empty();
    let assembler = DocumentAssembler::new(&catalog, &overrides, &manual)
        .with_policy(MissingSectionPolicy::Skip);

    let resources = sample_resources();
    let request = AssemblyRequest {
        tags: &[],
        excluded_types: &[],
        resources: &resources,
        manual_filters: false,
    };
    let mut doc = LineDocument::parse(BASE_CONFIG);
    let report = assembler.assemble(&mut doc, &request, &mut DeclineAll);

    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.section.as_str()).collect();
    assert_eq!(
        skipped,
        vec![
            "IAMRolePolicy",
            "IAMRolePolicyAttachment",
            "LambdaFunction",
            "CloudFormationStack",
        ]
    );
    assert_eq!(
        section_lines(&doc, "IAMRole"),
        vec!["- \"MyRole\"", "- \"OtherRole\"", "- \"OrganizationAccountAccessRole\""]
    );
    assert!(report.created_sections.is_empty());
}

const COMPACT_CONFIG: &str = r#"presets:
  common:
    filters:
      S3Bucket:
      - "shared"
resource-types:
  excludes:
  - IAMUser
accounts:
  "123456789012":
    presets:
    - common
    filters:
      IAMRole:
      - "admin"
      SNSTopic: []
"#;

#[test]
fn compact_documents_stay_loadable() {
    let catalog = TargetTypeCatalog::parse(SAMPLE_CATALOG);
    let overrides = PropertyOverrides::builtin();
    let manual = ManualFilters::builtin();
    let assembler = DocumentAssembler::new(&catalog, &overrides, &manual);

    let tags = vec!["Owner:platform-team".parse::<TagFilter>().unwrap()];
    let excluded = vec!["EC2VPC".to_string()];
    let mut resources = ResourceGroup::new();
    resources.insert("AWS::IAM::Role", "MyRole");
    resources.insert("AWS::S3::Bucket", "data");
    resources.insert("AWS::SNS::Topic", "arn:aws:sns:eu-west-1:1:alerts");
    let request = AssemblyRequest {
        tags: &tags,
        excluded_types: &excluded,
        resources: &resources,
        manual_filters: true,
    };

    let mut doc = LineDocument::parse(COMPACT_CONFIG);
    let report = assembler.assemble(&mut doc, &request, &mut DeclineAll);
    assert!(report.is_complete());

    let parsed: serde_yaml::Value = serde_yaml::from_str(&doc.render()).unwrap();

    assert_eq!(
        parsed["presets"]["common"]["filters"]["S3Bucket"],
        serde_yaml::Value::Sequence(vec!["shared".into()])
    );
    assert_eq!(
        parsed["resource-types"]["excludes"],
        serde_yaml::Value::Sequence(vec!["EC2VPC".into(), "IAMUser".into()])
    );

    let filters = &parsed["accounts"]["123456789012"]["filters"];
    let buckets = filters["S3Bucket"].as_sequence().unwrap();
    assert!(buckets.contains(&"data".into()));
    let roles = filters["IAMRole"].as_sequence().unwrap();
    assert!(roles.contains(&"MyRole".into()));
    assert!(roles.contains(&"admin".into()));
    assert!(filters["SNSTopic"].as_sequence().is_some());
    assert_eq!(header_count(&doc, "SNSTopic"), 1);
}
