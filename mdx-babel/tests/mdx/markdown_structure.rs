//! The Markdown half of the emitted MDX must parse into the intended structure. These
//! tests feed the output to comrak and inspect the resulting AST.

use crate::common::{para, text, to_mdx};
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, Options};
use serde_json::{json, Value};

fn parse<'a>(arena: &'a Arena<AstNode<'a>>, mdx: &str) -> &'a AstNode<'a> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    parse_document(arena, mdx, &options)
}

fn document(children: Vec<Value>) -> Value {
    json!({"kind": "document", "children": children})
}

fn collect_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    if let NodeValue::Text(value) = &node.data.borrow().value {
        out.push_str(value);
    }
    for child in node.children() {
        collect_text(child, out);
    }
}

#[test]
fn ordered_lists_keep_their_start() {
    let mdx = to_mdx(
        "page",
        document(vec![json!({
            "kind": "enumerated_list",
            "attributes": {"start": 3},
            "children": [
                {"kind": "list_item", "children": [para("x")]},
                {"kind": "list_item", "children": [para("y")]}
            ]
        })]),
    );
    let arena = Arena::new();
    let root = parse(&arena, &mdx);
    let list = root.first_child().expect("a list");
    match &list.data.borrow().value {
        NodeValue::List(list) => {
            assert_eq!(list.list_type, ListType::Ordered);
            assert_eq!(list.start, 3);
        }
        other => panic!("expected a list, got {other:?}"),
    }
    assert_eq!(list.children().count(), 2);
}

#[test]
fn nested_lists_stay_nested() {
    let mdx = to_mdx(
        "page",
        document(vec![json!({
            "kind": "bullet_list",
            "children": [{"kind": "list_item", "children": [
                para("outer"),
                {"kind": "bullet_list", "children": [
                    {"kind": "list_item", "children": [
                        para("inner"),
                        {"kind": "bullet_list", "children": [
                            {"kind": "list_item", "children": [para("deepest")]}
                        ]}
                    ]}
                ]}
            ]}]
        })]),
    );
    let arena = Arena::new();
    let root = parse(&arena, &mdx);

    let mut depth = 0;
    let mut node = root.first_child();
    while let Some(list) = node {
        assert!(matches!(list.data.borrow().value, NodeValue::List(_)));
        depth += 1;
        let item = list.first_child().expect("an item");
        node = item.children().find(|child| matches!(child.data.borrow().value, NodeValue::List(_)));
    }
    assert_eq!(depth, 3, "{mdx}");
}

#[test]
fn code_blocks_carry_their_language() {
    let mdx = to_mdx(
        "page",
        document(vec![json!({
            "kind": "literal_block",
            "attributes": {"language": "python"},
            "children": [text("print(\"```\")")]
        })]),
    );
    let arena = Arena::new();
    let root = parse(&arena, &mdx);
    let block = root.first_child().expect("a code block");
    let data = block.data.borrow();
    match &data.value {
        NodeValue::CodeBlock(code) => {
            assert_eq!(code.info, "python");
            assert_eq!(code.literal, "print(\"```\")\n");
        }
        other => panic!("expected a code block, got {other:?}"),
    };
}

#[test]
fn markdown_punctuation_is_escaped() {
    let mdx = to_mdx("page", document(vec![para("2*3 = [a_b] `x` ~y~")]));
    let arena = Arena::new();
    let root = parse(&arena, &mdx);
    let paragraph = root.first_child().expect("a paragraph");
    assert!(matches!(paragraph.data.borrow().value, NodeValue::Paragraph));
    assert!(paragraph.children().all(|child| matches!(child.data.borrow().value, NodeValue::Text(_))));
    let mut content = String::new();
    collect_text(paragraph, &mut content);
    assert_eq!(content, "2*3 = [a_b] `x` ~y~");
}

#[test]
fn nested_emphasis_alternates_markers() {
    let mdx = to_mdx(
        "page",
        document(vec![json!({"kind": "paragraph", "children": [
            {"kind": "strong", "children": [
                text("a "),
                {"kind": "emphasis", "children": [
                    text("b "),
                    {"kind": "emphasis", "children": [text("c")]}
                ]}
            ]}
        ]})]),
    );
    assert_eq!(mdx, "**a _b *c*_**\n");

    let arena = Arena::new();
    let root = parse(&arena, &mdx);
    let strong = root
        .first_child()
        .and_then(|paragraph| paragraph.first_child())
        .expect("strong");
    assert!(matches!(strong.data.borrow().value, NodeValue::Strong));
}

#[test]
fn simple_tables_parse_as_tables() {
    let row = |cells: &[&str]| {
        json!({"kind": "row", "children": cells
            .iter()
            .map(|cell| json!({"kind": "entry", "children": [para(cell)]}))
            .collect::<Vec<_>>()})
    };
    let mdx = to_mdx(
        "page",
        document(vec![json!({"kind": "table", "children": [{"kind": "tgroup", "children": [
            {"kind": "thead", "children": [row(&["Key", "Value"])]},
            {"kind": "tbody", "children": [row(&["a|b", "1"]), row(&["c", "2"])]}
        ]}]})]),
    );
    let arena = Arena::new();
    let root = parse(&arena, &mdx);
    let table = root.first_child().expect("a table");
    assert!(matches!(table.data.borrow().value, NodeValue::Table(..)), "{mdx}");
    assert_eq!(table.children().count(), 3);

    let mut content = String::new();
    collect_text(table, &mut content);
    assert_eq!(content, "KeyValuea|b1c2");
}
