use crate::common::{para, text, to_mdx};
use insta::assert_snapshot;
use serde_json::json;

#[test]
fn kitchensink() {
    let mdx = to_mdx(
        "guide",
        json!({
            "kind": "document",
            "attributes": {"title": "Guide"},
            "children": [{
                "kind": "section",
                "attributes": {"ids": ["guide"]},
                "children": [
                    {"kind": "title", "children": [text("Guide")]},
                    {"kind": "paragraph", "children": [
                        text("See "),
                        {"kind": "reference", "attributes": {"refuri": "setup"}, "children": [text("setup")]},
                        text(" and "),
                        {"kind": "emphasis", "children": [text("notes")]},
                        text(".")
                    ]},
                    {"kind": "bullet_list", "children": [
                        {"kind": "list_item", "children": [para("one")]},
                        {"kind": "list_item", "children": [
                            para("two"),
                            {"kind": "enumerated_list", "children": [
                                {"kind": "list_item", "children": [para("a")]}
                            ]}
                        ]}
                    ]},
                    {"kind": "note", "children": [para("Careful.")]},
                    {"kind": "literal_block", "attributes": {"language": "rust"}, "children": [text("fn main() {}")]},
                    {
                        "kind": "section",
                        "attributes": {"ids": ["details"]},
                        "children": [
                            {"kind": "title", "children": [text("Details")]},
                            para("Done.")
                        ]
                    }
                ]
            }]
        }),
    );

    assert_snapshot!(mdx, @r###"
    ---
    title: Guide
    ---

    # <Target id="guide"></Target>Guide

    See [setup](setup.mdx) and _notes_.

    - one

    - two

      1. a

    <Container type="note">
      Careful.
    </Container>

    ```rust
    fn main() {}
    ```

    ## <Target id="details"></Target>Details

    Done.
    "###);
}

#[test]
fn identifiers_are_anchored_once() {
    let mdx = to_mdx(
        "page",
        json!({
            "kind": "document",
            "children": [
                {"kind": "paragraph", "attributes": {"ids": ["p1"]}, "children": [text("First")]},
                {"kind": "target", "attributes": {"ids": ["p1"]}},
                {"kind": "target", "attributes": {"ids": ["p2"]}},
                para("Second")
            ]
        }),
    );
    assert_eq!(
        mdx,
        "<Target id=\"p1\"></Target>First\n\n<Target id=\"p2\"></Target>\n\nSecond\n"
    );
}

#[test]
fn unknown_kinds_fall_back_to_their_children() {
    let mdx = to_mdx(
        "page",
        json!({
            "kind": "document",
            "children": [
                {"kind": "custom_widget", "children": [para("Inside")]},
                {"kind": "comment", "children": [text("hidden")]}
            ]
        }),
    );
    assert_eq!(mdx, "Inside\n");
}

#[test]
fn multi_line_text_becomes_an_expression() {
    let mdx = to_mdx(
        "page",
        json!({"kind": "document", "children": [
            {"kind": "paragraph", "children": [text("line one\nline two")]}
        ]}),
    );
    assert_eq!(mdx, "{\"line one\\nline two\"}\n");
}
