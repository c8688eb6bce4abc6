//! Integration tests for tree building, persistence and routing
//!
//! These tests drive the public API end to end: trees are built, saved,
//! reloaded and routed the way a caller would.

use serde_json::{json, Value};
use supernodes::tree::NODE_FIELDS;
use supernodes::{
    Bindings, Condition, ExpressionError, Node, NodeFunction, NodeQuery, Split, Table, TreeError,
    TreeLoader,
};

// ============================================================================
// Fixtures
// ============================================================================

/// Two-level decision tree: `x[0] > 1` then `x[1] == 0`
fn decision_tree() -> Node {
    let mut root = Node::named("root")
        .with_expression("x[0] > 1")
        .unwrap()
        .with_branches("child-1", "child-2");

    let child = root.set_child(
        "child-1",
        Node::from_value(1)
            .with_expression("x[1] == 0")
            .unwrap()
            .with_branches("grandchild-1", "grandchild-2"),
    );
    child.set_child("grandchild-1", 3);
    child.set_child("grandchild-2", 4);
    root.set_child("child-2", 2);
    root
}

/// root
/// |__ a (id=n1)
/// |    |__ a1 (kind=leaf)
/// |    |__ a2
/// |__ b (kind=leaf)
/// |__ c
fn branching_tree() -> Node {
    let mut root = Node::named("root").with_id("n0");
    let a = root
        .append(Node::named("a").with_id("n1").with_value(1))
        .unwrap();
    a.append(Node::named("a1").with_attribute("kind", "leaf"))
        .unwrap();
    a.append(Node::named("a2").with_value(1)).unwrap();
    root.append(Node::named("b").with_attribute("kind", "leaf"))
        .unwrap();
    root.append(Node::named("c").with_id("n5")).unwrap();
    root
}

fn names(nodes: &[&Node]) -> Vec<Value> {
    nodes
        .iter()
        .map(|n| n.name.clone().unwrap_or(Value::Null))
        .collect()
}

fn temp_path(label: &str, ext: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "supernodes-it-{}-{}.{}",
        label,
        std::process::id(),
        ext
    ))
}

// ============================================================================
// Child Management Tests
// ============================================================================

#[test]
fn test_duplicate_names_leave_children_unchanged() {
    let mut root = Node::named("root");
    root.append(Node::named("c1")).unwrap();
    root.append(Node::named("dup").with_value(1)).unwrap();
    root.append(Node::from_value("unnamed")).unwrap();

    let before: Vec<Node> = root.children().to_vec();

    let err = root.append(Node::named("dup").with_value(2)).unwrap_err();
    assert!(matches!(err, TreeError::DuplicateName(ref n) if n == "dup"));
    assert_eq!(root.children(), before.as_slice());

    let err = root.insert(0, Node::named("dup")).unwrap_err();
    assert!(matches!(err, TreeError::DuplicateName(_)));
    assert_eq!(root.children(), before.as_slice());

    // Unnamed children never collide
    root.append(Node::from_value("another unnamed")).unwrap();
    assert_eq!(root.child_count(), 4);
}

#[test]
fn test_numeric_names_compare_by_value() {
    let mut root = Node::new();
    root.append(Node::named(1)).unwrap();
    assert!(root.append(Node::named(1.0)).is_err());
    assert!(root.get_child(1.0).is_some());
}

#[test]
fn test_insert_positions() {
    let mut root = Node::new();
    root.append(Node::named("b")).unwrap();
    root.insert(0, Node::named("a")).unwrap();
    root.insert(-1, Node::named("ab")).unwrap();
    root.insert(99, Node::named("z")).unwrap();

    let order: Vec<&Value> = root.child_names();
    assert_eq!(order, vec![&json!("a"), &json!("ab"), &json!("b"), &json!("z")]);
}

#[test]
fn test_upsert_and_remove() {
    let mut root = Node::named("root");
    root.set_child("slot", 1);
    root.set_child("other", 2);
    root.set_child("slot", Node::from_value(10).with_id("new"));

    assert_eq!(root.child_count(), 2);
    let slot = root.get_child("slot").unwrap();
    assert_eq!(slot.value, json!(10));
    assert_eq!(slot.id, Some(json!("new")));
    // Replaced child moves to the end
    assert_eq!(root.child_names(), vec![&json!("other"), &json!("slot")]);

    let removed = root.remove_child("other").unwrap();
    assert_eq!(removed.value, json!(2));
    assert!(root.remove_child("other").is_none());
}

#[test]
fn test_chained_building_reports_duplicates() {
    let mut root = Node::named("root");
    root.append(Node::named("x").with_value(1))
        .unwrap()
        .append(Node::named("inner"))
        .unwrap();

    let err = root
        .append(Node::named("x").with_value(5))
        .unwrap_err();
    assert!(matches!(err, TreeError::DuplicateName(ref n) if n == "x"));
    assert_eq!(root.child_count(), 1);
    assert_eq!(root.get_child("x").unwrap().value, json!(1));
}

#[test]
fn test_null_name_and_id_read_as_unset() {
    let mut child = Node::from_value("payload");
    child.name = Some(Value::Null);
    child.id = Some(Value::Null);

    let mut root = Node::named("root");
    root.append(child).unwrap();
    assert!(root.child_names().is_empty());
    assert!(root.find_by_id(Value::Null).is_none());

    let back = Node::from_plain_tree(&root.to_plain_tree()).unwrap();
    let reloaded = &back.children()[0];
    assert_eq!(reloaded.name_key(), root.children()[0].name_key());
    assert_eq!(reloaded.id_key(), None);
    assert!(reloaded.name.is_none());
}

// ============================================================================
// Split Tests
// ============================================================================

#[test]
fn test_split_appends_in_order() {
    let mut root = Node::named("root");
    root.append(Node::named("existing")).unwrap();

    let created = root
        .split(
            Split::new(3)
                .names(["n1", "n2", "n3"])
                .values([10, 20, 30])
                .ids(["i1", "i2", "i3"]),
        )
        .unwrap();
    assert_eq!(created.len(), 3);
    assert_eq!(created[2].value, json!(30));

    assert_eq!(
        root.child_names(),
        vec![&json!("existing"), &json!("n1"), &json!("n2"), &json!("n3")]
    );
    assert_eq!(root.get_child("n2").unwrap().id, Some(json!("i2")));
}

#[test]
fn test_split_length_mismatch_leaves_children() {
    let mut root = Node::named("root");
    root.append(Node::named("existing")).unwrap();

    let err = root
        .split(Split::new(3).names(["only", "two"]))
        .unwrap_err();
    assert!(matches!(
        err,
        TreeError::LengthMismatch {
            field: "names",
            expected: 3,
            actual: 2
        }
    ));
    assert_eq!(root.child_count(), 1);
}

#[test]
fn test_split_with_functions_routes() {
    let mut root = Node::named("root")
        .with_expression("x > 0")
        .unwrap()
        .with_branches("pos", "neg");
    root.split(
        Split::new(2)
            .names(["pos", "neg"])
            .values(["positive", "non-positive"])
            .functions(vec![None, None]),
    )
    .unwrap();

    let leaf = root.route(&Bindings::new().with("x", 5)).unwrap();
    assert_eq!(leaf.value, json!("positive"));
    let leaf = root.route(&Bindings::new().with("x", -5)).unwrap();
    assert_eq!(leaf.value, json!("non-positive"));
}

// ============================================================================
// Expression Evaluator Tests
// ============================================================================

fn eval(expression: &str, bindings: Bindings) -> bool {
    Condition::new(expression)
        .unwrap()
        .evaluate(&bindings)
        .unwrap()
}

#[test]
fn test_evaluator_reference_cases() {
    assert!(!eval("x == 10", Bindings::new().with("x", 7)));
    assert!(eval("x == -10", Bindings::new().with("x", -10)));
    assert!(!eval("y != 9.01", Bindings::new().with("y", 9.01)));
    assert!(!eval("x[0] > x[1]", Bindings::new().with("x", json!([10, 20]))));
    assert!(eval(
        "x == y",
        Bindings::new().with("x", 10).with("y", 10)
    ));
}

#[test]
fn test_negative_literal_takes_float_path() {
    assert_eq!(supernodes::condition::coerce_literal("10"), json!(10));
    assert_eq!(supernodes::condition::coerce_literal("-10"), json!(-10.0));
    assert!(eval("x == -10", Bindings::new().with("x", -10.0)));
}

#[test]
fn test_nested_indexing_and_maps() {
    let bindings = Bindings::new()
        .with("grid", json!([[1, 2], [3, 4]]))
        .with("cfg", json!({"limit": 3}));
    assert!(eval("grid[1][0] == cfg[limit]", bindings.clone()));
    assert!(eval("grid[-1][-1] > 3", bindings));
}

#[test]
fn test_coercion_disabled_compares_text() {
    let condition = Condition::with_coercion("x == 10", false).unwrap();
    assert!(!condition.evaluate(&Bindings::new().with("x", 10)).unwrap());
    assert!(condition.evaluate(&Bindings::new().with("x", "10")).unwrap());
}

#[test]
fn test_coercion_disabled_still_indexes() {
    let bindings = Bindings::new().with("x", json!([2, 0]));
    let condition = Condition::with_coercion("x[0] > x[1]", false).unwrap();
    assert!(condition.evaluate(&bindings).unwrap());

    let mut root = Node::named("root")
        .with_function(Condition::with_coercion("x[1] == y", false).unwrap().into())
        .with_branches("zero", "other");
    root.set_child("zero", "matched");
    root.set_child("other", "missed");
    let leaf = root
        .route(&bindings.clone().with("y", 0))
        .unwrap();
    assert_eq!(leaf.value, json!("matched"));
}

#[test]
fn test_malformed_expressions() {
    assert!(matches!(
        Condition::new("x ==10"),
        Err(ExpressionError::Malformed { parts: 2, .. })
    ));
    assert!(matches!(
        Condition::new("x =~ 10"),
        Err(ExpressionError::UnknownOperator(ref op)) if op == "=~"
    ));
    assert!(matches!(
        Node::new().with_expression("a b c d"),
        Err(TreeError::Expression(ExpressionError::Malformed { parts: 4, .. }))
    ));
}

#[test]
fn test_index_out_of_range() {
    let err = Condition::new("x[5] > 1")
        .unwrap()
        .evaluate(&Bindings::new().with("x", json!([1, 2])))
        .unwrap_err();
    assert!(matches!(
        err,
        ExpressionError::IndexOutOfRange { index: 5, len: 2 }
    ));
}

// ============================================================================
// Decision Router Tests
// ============================================================================

#[test]
fn test_route_two_level_tree() {
    let tree = decision_tree();
    let at = |x: Value| tree.route(&Bindings::new().with("x", x)).unwrap().value.clone();

    assert_eq!(at(json!([2, 0])), json!(3));
    assert_eq!(at(json!([0, 2])), json!(2));
    assert_eq!(at(json!([2, 7])), json!(4));
}

#[test]
fn test_route_stops_on_missing_child() {
    let mut tree = decision_tree();
    tree.remove_child("child-2");
    let stop = tree.route(&Bindings::new().with("x", json!([0, 0]))).unwrap();
    assert_eq!(stop.name, Some(json!("root")));
}

#[test]
fn test_route_native_function() {
    let mut root = Node::named("gate")
        .with_function(NodeFunction::native(|b| {
            json!(b.get("level").and_then(Value::as_i64).unwrap_or(0) >= 3)
        }))
        .with_branches("open", "closed");
    root.set_child("open", "welcome");
    root.set_child("closed", "denied");

    let leaf = root.route(&Bindings::new().with("level", 4)).unwrap();
    assert_eq!(leaf.value, json!("welcome"));
    let leaf = root.route(&Bindings::new()).unwrap();
    assert_eq!(leaf.value, json!("denied"));
}

#[test]
fn test_route_propagates_evaluation_errors() {
    let tree = decision_tree();
    let err = tree
        .route(&Bindings::new().with("x", json!([])))
        .unwrap_err();
    assert!(matches!(
        err,
        TreeError::Expression(ExpressionError::IndexOutOfRange { .. })
    ));
}

// ============================================================================
// Search Tests
// ============================================================================

#[test]
fn test_find_all_pre_order() {
    let tree = branching_tree();

    let leaves = tree.find_all(&NodeQuery::new().attribute("kind", "leaf"));
    assert_eq!(names(&leaves), vec![json!("a1"), json!("b")]);

    let ones = tree.find_all(&NodeQuery::new().value(1));
    assert_eq!(names(&ones), vec![json!("a"), json!("a2")]);

    let both = tree.find_all(&NodeQuery::new().value(1).name("a2"));
    assert_eq!(names(&both), vec![json!("a2")]);

    // The starting node is never part of the result
    assert!(tree.find_all(&NodeQuery::new().name("root")).is_empty());
    assert_eq!(tree.find_all(&NodeQuery::new()).len(), 5);
}

#[test]
fn test_find_by_id() {
    let tree = branching_tree();
    assert_eq!(tree.find_by_id("n5").unwrap().name, Some(json!("c")));
    assert_eq!(tree.find_by_id("n1").unwrap().name, Some(json!("a")));
    assert!(tree.find_by_id("n0").is_none());
    assert!(tree.find_by_id("missing").is_none());
}

// ============================================================================
// Path List Tests
// ============================================================================

#[test]
fn test_path_list_one_row_per_leaf() {
    let tree = branching_tree();
    let rows = tree.to_path_list();
    assert_eq!(rows.len(), 4);

    let depths: Vec<usize> = rows.iter().map(Vec::len).collect();
    assert_eq!(depths, vec![3, 3, 2, 2]);

    for row in &rows {
        assert!(std::ptr::eq(row[0], &tree));
        assert!(!row.last().unwrap().has_children());
    }

    let named = tree.to_attribute_path_list("name");
    assert_eq!(
        named,
        vec![
            vec![json!("root"), json!("a"), json!("a1")],
            vec![json!("root"), json!("a"), json!("a2")],
            vec![json!("root"), json!("b")],
            vec![json!("root"), json!("c")],
        ]
    );

    let kinds = tree.to_attribute_path_list("kind");
    assert_eq!(kinds[2], vec![Value::Null, json!("leaf")]);
}

#[test]
fn test_rows_below_start_node() {
    // Path rows start at the node itself; dropping that first column gives
    // one row per leaf whose length is the leaf's depth
    let mut root = Node::named("r");
    root.append(Node::named("a")).unwrap();
    root.append(Node::named("b")).unwrap();
    assert_eq!(
        root.to_attribute_path_list("name"),
        vec![vec![json!("r"), json!("a")], vec![json!("r"), json!("b")]]
    );

    let below = root.to_table(None, true, "name").unwrap();
    assert_eq!(below.columns(), &["0"]);
    assert_eq!(below.rows(), &[vec![json!("a")], vec![json!("b")]]);

    let tree = branching_tree();
    let below = tree.to_table(None, true, "name").unwrap();
    let firsts: Vec<&Value> = below.rows().iter().map(|row| &row[0]).collect();
    assert_eq!(firsts, vec![&json!("a"), &json!("a"), &json!("b"), &json!("c")]);
    assert_eq!(below.rows()[2], vec![json!("b"), Value::Null]);
}

#[test]
fn test_path_list_of_leaf() {
    let leaf = Node::named("alone");
    assert_eq!(leaf.to_attribute_path_list("name"), vec![vec![json!("alone")]]);
}

// ============================================================================
// Serialization Tests
// ============================================================================

#[test]
fn test_plain_tree_round_trip() {
    let mut tree = decision_tree();
    tree.attributes.insert("owner".to_string(), json!("ops"));
    tree.append(Node::named(7).with_value(json!({"nested": [1, 2.5, null]})))
        .unwrap();

    let plain = tree.to_plain_tree();
    let keys: Vec<&str> = plain.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, NODE_FIELDS.to_vec());

    let back = Node::from_plain_tree(&plain).unwrap();
    assert_eq!(back, tree);
    assert_eq!(back.to_plain_tree(), plain);
}

#[test]
fn test_plain_tree_unknown_field() {
    let record = json!({"name": "root", "children": [{"name": "c", "colour": "red"}]});
    assert!(matches!(
        Node::from_plain_tree(&record),
        Err(TreeError::UnknownField(ref k)) if k == "colour"
    ));
}

#[test]
fn test_plain_tree_duplicate_children() {
    let record = json!({"children": [{"name": "c"}, {"name": "c"}]});
    assert!(matches!(
        Node::from_plain_tree(&record),
        Err(TreeError::DuplicateName(_))
    ));
}

#[test]
fn test_serde_uses_plain_form() {
    let tree = decision_tree();
    let text = serde_json::to_string(&tree).unwrap();
    let back: Node = serde_json::from_str(&text).unwrap();
    assert_eq!(back, tree);
}

// ============================================================================
// Loader Tests
// ============================================================================

#[test]
fn test_yaml_file_round_trip_then_route() {
    let path = temp_path("route", "yaml");
    let loader = TreeLoader::new();
    loader.save_yaml(&decision_tree(), &path).unwrap();

    let loaded = loader.load(&path).unwrap();
    assert_eq!(loaded, decision_tree());
    let leaf = loaded.route(&Bindings::new().with("x", json!([2, 0]))).unwrap();
    assert_eq!(leaf.value, json!(3));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_hand_written_yaml() {
    let yaml = r#"
name: triage
function: "severity >= 3"
true_branch_name: page
false_branch_name: ticket
attributes:
  team: platform
children:
  - name: page
    value: {channel: oncall}
  - name: ticket
    value: {queue: backlog}
"#;
    let tree = TreeLoader::parse_yaml(yaml).unwrap();
    assert_eq!(tree.field("team"), Some(json!("platform")));

    let leaf = tree.route(&Bindings::new().with("severity", 4)).unwrap();
    assert_eq!(leaf.value, json!({"channel": "oncall"}));
    let leaf = tree.route(&Bindings::new().with("severity", 1)).unwrap();
    assert_eq!(leaf.value, json!({"queue": "backlog"}));
}

#[test]
fn test_native_function_saved_as_null() {
    let tree = Node::named("root").with_function(NodeFunction::native(|_| json!(true)));
    let yaml = TreeLoader::to_yaml(&tree).unwrap();
    let back = TreeLoader::parse_yaml(&yaml).unwrap();
    assert!(back.function.is_none());
    assert_eq!(back.name, Some(json!("root")));
}

// ============================================================================
// Table Tests
// ============================================================================

#[test]
fn test_table_to_tree_and_back() {
    let table = Table::new(["region", "site"])
        .with_row(["eu", "dub"])
        .unwrap()
        .with_row(["eu", "fra"])
        .unwrap()
        .with_row(["us", "iad"])
        .unwrap();

    let mut root = Node::named("regions");
    root.extend_from_table(&table).unwrap();
    assert_eq!(root.child_names(), vec![&json!("eu"), &json!("us")]);
    assert_eq!(root.get_child("eu").unwrap().child_count(), 2);

    let back = root
        .to_table(
            Some(vec!["region".to_string(), "site".to_string()]),
            true,
            "name",
        )
        .unwrap();
    assert_eq!(back, table);
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_render_branching_tree() {
    let tree = branching_tree();
    assert_eq!(
        tree.to_string(),
        "(name=root, id=n0)\n\
         |__ (name=a, value: int, id=n1)\n\
         |    |__ (name=a1, kind=leaf)\n\
         |    |__ (name=a2, value: int)\n\
         |__ (name=b, kind=leaf)\n\
         |__ (name=c, id=n5)"
    );
}
