//! Full wizard flow over a realistic master document

use mb_schema::MasterSummary;
use mb_test_utils::wizard_master_json;
use mb_wizard::{Confidence, IndexType, Priority, WizardError, WizardPlan};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn summary(id: u64, name: &str) -> MasterSummary {
    serde_json::from_value(serde_json::json!({"id": id, "name": name})).unwrap()
}

#[test]
fn employees_document_suggestions() {
    let plan = WizardPlan::from_document(wizard_master_json()).unwrap();

    let rels: Vec<(&str, &str, Confidence)> = plan
        .relationships()
        .iter()
        .map(|r| (r.field_name.as_str(), r.suggested_master.as_str(), r.confidence))
        .collect();
    assert_eq!(
        rels,
        vec![
            ("department_id", "departments", Confidence::High),
            ("Manager", "members", Confidence::Medium),
            ("leave_type", "leaves", Confidence::Medium),
        ]
    );
    assert_eq!(plan.relationships()[1].field_index, 4);

    let idx: Vec<(&str, IndexType, Priority, bool)> = plan
        .indexes()
        .iter()
        .map(|i| (i.field_name.as_str(), i.index_type, i.priority, i.accepted))
        .collect();
    assert_eq!(
        idx,
        vec![
            ("id", IndexType::Unique, Priority::High, true),
            ("employee_code", IndexType::Btree, Priority::High, true),
            ("email", IndexType::Btree, Priority::High, true),
            ("department_id", IndexType::Btree, Priority::High, true),
            ("leave_type", IndexType::Btree, Priority::Medium, true),
            ("joined_on", IndexType::Btree, Priority::Medium, false),
        ]
    );
}

#[test]
fn review_then_finalize() {
    let mut plan = WizardPlan::from_document(wizard_master_json()).unwrap();
    plan.toggle_index(5).unwrap();
    plan.set_index_accepted(1, false).unwrap();
    plan.remove_relationship(2).unwrap();
    plan.retarget_relationship(1, "employees", "id").unwrap();

    let available = [summary(1, "departments"), summary(2, "employees")];
    plan.check_targets(&available).unwrap();

    let payload = plan.finalize().unwrap();
    assert_eq!(payload["name"], "employees");
    assert_eq!(payload["icon"], "👥");
    assert_eq!(payload["fields"].as_array().unwrap().len(), 8);
    assert_eq!(payload["relationships"].as_array().unwrap().len(), 2);
    assert_eq!(payload["relationships"][1]["suggestedMaster"], "employees");
    let indexes: Vec<&str> = payload["indexes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["fieldName"].as_str().unwrap())
        .collect();
    assert_eq!(indexes, ["id", "email", "department_id", "leave_type", "joined_on"]);
}

#[test]
fn unknown_targets_are_reported_once() {
    let mut plan = WizardPlan::from_json(
        r#"{"name": "tasks", "fields": [
            {"name": "manager"}, {"name": "supervisor"}, {"name": "project_id"}
        ]}"#,
    )
    .unwrap();
    let available = [summary(9, "projects")];
    assert_eq!(plan.unknown_targets(&available), ["members"]);
    match plan.check_targets(&available) {
        Err(WizardError::UnknownTargets(names)) => assert_eq!(names, ["members"]),
        other => panic!("expected unknown targets, got {other:?}"),
    }
    plan.remove_relationship(0).unwrap();
    plan.remove_relationship(0).unwrap();
    assert!(plan.check_targets(&available).is_ok());
}

proptest! {
    #[test]
    fn prop_at_most_one_suggestion_per_field(names in prop::collection::vec("[a-z_]{1,16}", 0..12)) {
        let fields: Vec<_> = names.iter().map(|n| serde_json::json!({"name": n})).collect();
        let plan = WizardPlan::from_document(serde_json::json!({"fields": fields})).unwrap();
        prop_assert!(plan.relationships().len() <= names.len());
        prop_assert!(plan.indexes().len() <= names.len());
        prop_assert!(plan.relationships().windows(2).all(|w| w[0].field_index < w[1].field_index));
        let finalized = plan.finalize().unwrap();
        prop_assert_eq!(
            finalized["indexes"].as_array().map(Vec::len),
            Some(plan.accepted_indexes().count())
        );
    }
}
