use super::*;
use serde_json::json;

fn root() -> ValuePath {
    ValuePath::root()
}

#[test]
fn test_delete_property_round_trip() {
    let mut doc = json!({"a": 1, "b": 2});
    let mut edit = UndoableEdit::delete_property(root(), "a");

    edit.redo(&mut doc).unwrap();
    assert_eq!(doc, json!({"b": 2}));

    edit.undo(&mut doc).unwrap();
    assert_eq!(doc, json!({"a": 1, "b": 2}));
}

fn keys(value: &Value) -> Vec<&str> {
    value.as_object().unwrap().keys().map(String::as_str).collect()
}

#[test]
fn test_delete_property_undo_keeps_key_order() {
    let mut doc = json!({"zeta": 1, "mid": 2, "alpha": 3});
    let mut edit = UndoableEdit::delete_property(root(), "mid");

    edit.redo(&mut doc).unwrap();
    assert_eq!(keys(&doc), vec!["zeta", "alpha"]);

    edit.undo(&mut doc).unwrap();
    assert_eq!(keys(&doc), vec!["zeta", "mid", "alpha"]);

    // 撤销再重做后位置仍然正确
    edit.redo(&mut doc).unwrap();
    edit.undo(&mut doc).unwrap();
    assert_eq!(keys(&doc), vec!["zeta", "mid", "alpha"]);
}

#[test]
fn test_set_property_undo_keeps_key_order() {
    let mut doc = json!({"zeta": 1, "mid": 2, "alpha": 3});

    let mut overwrite = UndoableEdit::set_property(root(), "zeta", json!(9));
    overwrite.redo(&mut doc).unwrap();
    overwrite.undo(&mut doc).unwrap();
    assert_eq!(keys(&doc), vec!["zeta", "mid", "alpha"]);

    let mut sequence = UndoableEdit::sequence(vec![
        UndoableEdit::set_property(root(), "beta", json!(0)),
        UndoableEdit::delete_property(root(), "zeta"),
    ]);
    sequence.redo(&mut doc).unwrap();
    assert_eq!(keys(&doc), vec!["mid", "alpha", "beta"]);
    sequence.undo(&mut doc).unwrap();
    assert_eq!(keys(&doc), vec!["zeta", "mid", "alpha"]);
}

#[test]
fn test_set_property_restores_previous_or_removes() {
    let mut doc = json!({"a": 1});

    let mut overwrite = UndoableEdit::set_property(root(), "a", json!(5));
    overwrite.redo(&mut doc).unwrap();
    assert_eq!(doc, json!({"a": 5}));
    overwrite.undo(&mut doc).unwrap();
    assert_eq!(doc, json!({"a": 1}));

    let mut add = UndoableEdit::set_property(root(), "b", json!(true));
    add.redo(&mut doc).unwrap();
    assert_eq!(doc, json!({"a": 1, "b": true}));
    add.undo(&mut doc).unwrap();
    assert_eq!(doc, json!({"a": 1}));
}

#[test]
fn test_splice_round_trip() {
    let mut doc = json!({"list": [1, 2, 3, 4]});
    let list = root().child("list");

    let mut edit = UndoableEdit::splice(list.clone(), 1, 2, vec![json!("x")]);
    edit.redo(&mut doc).unwrap();
    assert_eq!(doc["list"], json!([1, "x", 4]));
    edit.undo(&mut doc).unwrap();
    assert_eq!(doc["list"], json!([1, 2, 3, 4]));

    // 删除数量超出时截断
    let mut tail = UndoableEdit::splice(list.clone(), 3, 10, Vec::new());
    tail.redo(&mut doc).unwrap();
    assert_eq!(doc["list"], json!([1, 2, 3]));
    tail.undo(&mut doc).unwrap();
    assert_eq!(doc["list"], json!([1, 2, 3, 4]));
}

#[test]
fn test_splice_rejects_index_past_end() {
    let mut doc = json!({"list": [1]});
    let mut edit = UndoableEdit::splice(root().child("list"), 2, 0, vec![json!(0)]);
    let err = edit.redo(&mut doc).unwrap_err();
    assert!(matches!(err, EditError::IndexOutOfBounds { index: 2, len: 1, .. }));
    assert_eq!(doc, json!({"list": [1]}));
}

#[test]
fn test_transfer_item_within_and_between_arrays() {
    let mut doc = json!({"a": [1, 2, 3], "b": []});
    let a = root().child("a");
    let b = root().child("b");

    let mut within = UndoableEdit::transfer_item(
        ArrayElementRef { container: a.clone(), index: 0 },
        ArrayElementRef { container: a.clone(), index: 2 },
    );
    within.redo(&mut doc).unwrap();
    assert_eq!(doc["a"], json!([2, 3, 1]));
    within.undo(&mut doc).unwrap();
    assert_eq!(doc["a"], json!([1, 2, 3]));

    let mut between = UndoableEdit::transfer_item(
        ArrayElementRef { container: a.clone(), index: 1 },
        ArrayElementRef { container: b.clone(), index: 0 },
    );
    between.redo(&mut doc).unwrap();
    assert_eq!(doc, json!({"a": [1, 3], "b": [2]}));
    between.undo(&mut doc).unwrap();
    assert_eq!(doc, json!({"a": [1, 2, 3], "b": []}));
}

#[test]
fn test_transfer_item_bad_target_leaves_source_intact() {
    let mut doc = json!({"a": [1, 2], "b": {}});
    let mut edit = UndoableEdit::transfer_item(
        ArrayElementRef { container: root().child("a"), index: 0 },
        ArrayElementRef { container: root().child("b"), index: 0 },
    );
    let err = edit.redo(&mut doc).unwrap_err();
    assert!(matches!(err, EditError::NotAnArray(_)));
    assert_eq!(doc, json!({"a": [1, 2], "b": {}}));
}

#[test]
fn test_sequence_is_atomic() {
    let mut doc = json!({"a": 1});
    let mut edit = UndoableEdit::sequence(vec![
        UndoableEdit::delete_property(root(), "a"),
        UndoableEdit::set_property(root().child("missing"), "a", json!(1)),
    ]);

    let err = edit.redo(&mut doc).unwrap_err();
    assert!(matches!(err, EditError::ContainerNotFound(_)));
    assert_eq!(doc, json!({"a": 1}));
}

#[test]
fn test_sequence_reports_first_failure_when_rollback_fails() {
    let mut doc = json!({"obj": {"k": 1}});
    // 未 redo 过的序列直接 undo：回滚时把 obj 设回数字，之后的步骤找不到对象
    let mut edit = UndoableEdit::sequence(vec![
        UndoableEdit::delete_property(root().child("missing"), "x"),
        UndoableEdit::set_property(root(), "obj", json!(0)),
        UndoableEdit::set_property(root().child("obj"), "k", json!(2)),
    ]);

    let err = edit.undo(&mut doc).unwrap_err();
    assert_eq!(err, EditError::ContainerNotFound(root().child("missing")));
    assert_eq!(doc, json!({"obj": 0}));
}

#[test]
fn test_addressing_errors() {
    let mut doc = json!({"list": [], "obj": {}});
    let err = UndoableEdit::delete_property(root().child("list"), "x")
        .redo(&mut doc)
        .unwrap_err();
    assert!(matches!(err, EditError::NotAnObject(_)));

    let err = UndoableEdit::splice(root().child("obj"), 0, 0, Vec::new())
        .redo(&mut doc)
        .unwrap_err();
    assert!(matches!(err, EditError::NotAnArray(_)));
    assert_eq!(err.to_string(), "value at \"/obj\" is not an array");
}

#[test]
fn test_serialization() {
    let edit = UndoableEdit::sequence(vec![
        UndoableEdit::delete_property(root(), "a"),
        UndoableEdit::splice(root().child("list"), 0, 0, vec![json!(1)]),
    ]);
    let line = edit.to_json_line();
    assert!(line.contains("\"op\":\"sequence\""));
    assert!(line.contains("\"deleteCount\":0"));

    let restored = UndoableEdit::from_json_line(&line).unwrap();
    assert_eq!(restored, edit);
    assert_eq!(restored.name(), "sequence");
}
