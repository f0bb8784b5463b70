use crate::frontmatter::extract;
use serde_json::json;

#[test]
fn extracts_yaml_block_and_line_offset() {
    let input = "---\ntitle: demo\nmarkmap:\n  color: red\n---\n# heading\n";
    let fm = extract(input).unwrap();
    assert_eq!(fm.rest, "# heading\n");
    assert_eq!(fm.line_offset, 5);
    assert_eq!(
        fm.data,
        Some(json!({ "title": "demo", "markmap": { "color": "red" } }))
    );
}

#[test]
fn unterminated_fence_is_not_front_matter() {
    assert_eq!(extract("---\ntitle: demo\n# heading"), None);
    assert_eq!(extract("# heading\n---\n"), None);
}

#[test]
fn malformed_yaml_is_consumed_but_yields_no_data() {
    let fm = extract("---\nfoo: [1, 2\n---\nbody").unwrap();
    assert_eq!(fm.rest, "body");
    assert_eq!(fm.line_offset, 3);
    assert_eq!(fm.data, None);
}

#[test]
fn non_mapping_yaml_yields_no_data() {
    let fm = extract("---\n- a\n- b\n---\nbody").unwrap();
    assert_eq!(fm.rest, "body");
    assert_eq!(fm.data, None);
}

#[test]
fn closing_fence_at_end_of_input_leaves_empty_rest() {
    let fm = extract("---\na: 1\n---").unwrap();
    assert_eq!(fm.rest, "");
    assert_eq!(fm.data, Some(json!({ "a": 1 })));
}

#[test]
fn crlf_input_is_handled() {
    let fm = extract("---\r\na: 1\r\n---\r\nrest").unwrap();
    assert_eq!(fm.rest, "rest");
    assert_eq!(fm.line_offset, 3);
    assert_eq!(fm.data, Some(json!({ "a": 1 })));
}
