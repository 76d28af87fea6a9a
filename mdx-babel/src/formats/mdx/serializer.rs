//! MDX serialization (target tree → text)
//!
//! A structural fold over [`Document`]. The only state threaded through the fold is
//! [`RenderState`], which tracks which emphasis, strong and list markers are currently
//! open so nested constructs alternate between the available markers.

use crate::error::FormatError;
use crate::ir::nodes::{
    Attributes, Cell, CodeBlock, Document, Element, ElementKind, FrontMatter, Image, Link, List,
    Node, Table,
};
use serde_json::Value;

/// Serialize a target document to MDX text.
pub fn serialize_to_mdx(doc: &Document) -> Result<String, FormatError> {
    let mut parts = Vec::new();
    if let Some(front_matter) = doc.front_matter.as_ref().filter(|fm| !fm.data.is_empty()) {
        parts.push(render_front_matter(front_matter)?);
    }

    let mut state = RenderState::default();
    let body = render_blocks(&doc.children, &mut state);
    if !body.is_empty() {
        parts.push(body);
    }

    let mut output = parts.join("\n\n");
    output.push('\n');
    Ok(output)
}

/// Renders a node sequence the way it would appear at block level.
pub fn render_nodes(nodes: &[Node]) -> String {
    render_blocks(nodes, &mut RenderState::default())
}

fn render_front_matter(front_matter: &FrontMatter) -> Result<String, FormatError> {
    let yaml = serde_yaml_ng::to_string(&front_matter.data)
        .map_err(|e| FormatError::SerializationError(format!("front matter: {e}")))?;
    Ok(format!("---\n{yaml}---"))
}

/// Markers of one kind, picked by how many of that kind are open.
struct Cycle {
    choices: &'static [&'static str],
    open: Vec<&'static str>,
}

impl Cycle {
    const fn new(choices: &'static [&'static str]) -> Self {
        Self {
            choices,
            open: Vec::new(),
        }
    }

    fn enter(&mut self) -> &'static str {
        let marker = self.choices[self.open.len() % self.choices.len()];
        self.open.push(marker);
        marker
    }

    fn leave(&mut self) {
        self.open.pop();
    }
}

struct RenderState {
    emphasis: Cycle,
    strong: Cycle,
    bullets: Cycle,
    ordered: Cycle,
    in_cell: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            emphasis: Cycle::new(&["_", "*"]),
            strong: Cycle::new(&["**", "__"]),
            bullets: Cycle::new(&["-", "+", "*"]),
            ordered: Cycle::new(&[".", ")"]),
            in_cell: false,
        }
    }
}

/// Consecutive inline nodes form one paragraph-like chunk; chunks are separated by a
/// blank line.
fn render_blocks(nodes: &[Node], state: &mut RenderState) -> String {
    let mut chunks = Vec::new();
    let mut run: Vec<&Node> = Vec::new();

    for node in nodes {
        if node.is_inline() {
            run.push(node);
            continue;
        }
        if !run.is_empty() {
            chunks.push(render_inline_run(&run, state));
            run.clear();
        }
        chunks.push(render_block(node, state));
    }
    if !run.is_empty() {
        chunks.push(render_inline_run(&run, state));
    }

    chunks.retain(|chunk| !chunk.is_empty());
    chunks.join("\n\n")
}

fn render_inline_run(nodes: &[&Node], state: &mut RenderState) -> String {
    nodes.iter().map(|node| render_inline(node, state)).collect()
}

fn render_inlines(nodes: &[Node], state: &mut RenderState) -> String {
    nodes.iter().map(|node| render_inline(node, state)).collect()
}

fn render_block(node: &Node, state: &mut RenderState) -> String {
    match node {
        Node::Heading(heading) => {
            let text = render_inlines(&heading.children, state);
            let hashes = "#".repeat(usize::from(heading.depth.clamp(1, 6)));
            if text.is_empty() {
                hashes
            } else {
                format!("{hashes} {text}")
            }
        }
        Node::Paragraph { children } => render_inlines(children, state),
        Node::CodeBlock(code) => render_code_block(code),
        Node::List(list) => render_list(list, state),
        Node::Table(table) => render_table(table, state),
        Node::Blockquote { children } => {
            let inner = render_blocks(children, state);
            if inner.is_empty() {
                return ">".to_string();
            }
            inner
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {line}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        Node::ThematicBreak => "---".to_string(),
        Node::Element(element) => render_element(element, state),
        inline => render_inline(inline, state),
    }
}

fn render_inline(node: &Node, state: &mut RenderState) -> String {
    match node {
        Node::Text { value } => render_text(value, state.in_cell),
        Node::Emphasis { children } => {
            let marker = state.emphasis.enter();
            let inner = render_inlines(children, state);
            state.emphasis.leave();
            format!("{marker}{inner}{marker}")
        }
        Node::Strong { children } => {
            let marker = state.strong.enter();
            let inner = render_inlines(children, state);
            state.strong.leave();
            format!("{marker}{inner}{marker}")
        }
        Node::Strikethrough { children } => {
            format!("~~{}~~", render_inlines(children, state))
        }
        Node::InlineCode { value } => render_inline_code(value),
        Node::Link(link) => render_link(link, state),
        Node::Image(image) => render_image(image),
        Node::Expression { value } => format!("{{{value}}}"),
        Node::Element(element) => render_element(element, state),
        block => render_block(block, state),
    }
}

const ESCAPED: &[char] = &[
    '*', '_', '`', '~', '[', ']', '(', ')', '{', '}', '<', '>', '\\',
];

fn render_text(value: &str, in_cell: bool) -> String {
    if value.contains('\n') {
        return format!("{{{}}}", Value::from(value));
    }
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if ESCAPED.contains(&ch) || (in_cell && ch == '|') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn fence_for(content: &str, initial: &str) -> String {
    let mut fence = initial.to_string();
    while content.contains(&fence) {
        fence.push('`');
    }
    fence
}

fn render_inline_code(value: &str) -> String {
    let fence = fence_for(value, "`");
    let pad = if value.starts_with('`') || value.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{fence}{pad}{value}{pad}{fence}")
}

fn render_code_block(code: &CodeBlock) -> String {
    let fence = fence_for(&code.content, "```");
    let lang = code.lang.as_deref().unwrap_or("");
    format!("{fence}{lang}\n{}\n{fence}", code.content)
}

fn render_destination(url: &str, title: Option<&str>) -> String {
    let url = if url.contains([' ', '(', ')']) {
        format!("<{url}>")
    } else {
        url.to_string()
    };
    match title {
        Some(title) => format!("{url} {}", Value::from(title)),
        None => url,
    }
}

fn render_link(link: &Link, state: &mut RenderState) -> String {
    let text = render_inlines(&link.children, state);
    let destination = render_destination(&link.url, link.title.as_deref());
    format!("[{text}]({destination})")
}

fn render_image(image: &Image) -> String {
    let alt = render_text(image.alt.as_deref().unwrap_or(""), false);
    let destination = render_destination(&image.url, image.title.as_deref());
    format!("![{alt}]({destination})")
}

fn render_list(list: &List, state: &mut RenderState) -> String {
    let marker = if list.ordered {
        state.ordered.enter()
    } else {
        state.bullets.enter()
    };
    let start = list.start.unwrap_or(1);

    let items: Vec<String> = list
        .items
        .iter()
        .zip(start..)
        .map(|(item, number)| {
            let prefix = if list.ordered {
                format!("{number}{marker} ")
            } else {
                format!("{marker} ")
            };
            let body = render_blocks(&item.children, state);
            hang(&prefix, &body)
        })
        .collect();

    if list.ordered {
        state.ordered.leave();
    } else {
        state.bullets.leave();
    }

    let separator = if list.is_spread() { "\n\n" } else { "\n" };
    items.join(separator)
}

/// Puts `prefix` before the first line and indents the rest by its width.
fn hang(prefix: &str, body: &str) -> String {
    if body.is_empty() {
        return prefix.trim_end().to_string();
    }
    let indent = " ".repeat(prefix.chars().count());
    let mut lines = body.lines();
    let mut output = format!("{prefix}{}", lines.next().unwrap_or(""));
    for line in lines {
        output.push('\n');
        if !line.is_empty() {
            output.push_str(&indent);
            output.push_str(line);
        }
    }
    output
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_attributes(attributes: &Attributes) -> String {
    let mut output = String::new();
    for (key, value) in attributes.iter() {
        output.push(' ');
        match value {
            Value::Bool(true) => output.push_str(key),
            Value::String(text) if is_plain_attribute(text) => {
                output.push_str(&format!("{key}=\"{text}\""));
            }
            other => output.push_str(&format!("{key}={{{other}}}")),
        }
    }
    output
}

fn is_plain_attribute(text: &str) -> bool {
    !text.contains(['"', '\\', '{', '}', '<', '>', '&', '\n'])
}

fn render_element(element: &Element, state: &mut RenderState) -> String {
    let name = &element.name;
    let attributes = render_attributes(&element.attributes);
    let inner = match element.kind {
        ElementKind::Text => render_inlines(&element.children, state),
        ElementKind::Flow => render_blocks(&element.children, state),
    };

    if inner.is_empty() {
        return format!("<{name}{attributes}></{name}>");
    }
    match element.kind {
        ElementKind::Text => format!("<{name}{attributes}>{inner}</{name}>"),
        ElementKind::Flow => format!("<{name}{attributes}>\n{}\n</{name}>", indent(&inner, 2)),
    }
}

fn render_table(table: &Table, state: &mut RenderState) -> String {
    if is_pipe_table(table) {
        render_pipe_table(table, state)
    } else {
        render_component_table(table, state)
    }
}

fn is_pipe_table(table: &Table) -> bool {
    let Some((head, body)) = table.rows.split_first() else {
        return false;
    };
    table.caption.is_none()
        && table.columns.iter().all(|column| column.width.is_none())
        && head.header
        && !head.cells.is_empty()
        && body.iter().all(|row| !row.header)
        && table
            .rows
            .iter()
            .flat_map(|row| &row.cells)
            .all(|cell| cell.col_span == 1 && cell.row_span == 1 && inline_cell(cell).is_some())
}

/// The phrasing content of a cell that holds nothing but inline nodes or one paragraph.
fn inline_cell(cell: &Cell) -> Option<&[Node]> {
    match cell.children.as_slice() {
        [Node::Paragraph { children }] => Some(children),
        children if children.iter().all(Node::is_inline) => Some(children),
        _ => None,
    }
}

fn render_pipe_table(table: &Table, state: &mut RenderState) -> String {
    let was_in_cell = std::mem::replace(&mut state.in_cell, true);
    let mut lines = Vec::new();

    for (index, row) in table.rows.iter().enumerate() {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| render_inlines(inline_cell(cell).unwrap_or_default(), state))
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));
        if index == 0 {
            let rule = vec!["---"; row.cells.len()].join(" | ");
            lines.push(format!("| {rule} |"));
        }
    }

    state.in_cell = was_in_cell;
    lines.join("\n")
}

/// Component markup for tables a pipe table cannot express.
fn render_component_table(table: &Table, state: &mut RenderState) -> String {
    let mut parts = Vec::new();

    if let Some(caption) = &table.caption {
        parts.push(format!("<caption>{}</caption>", render_inlines(caption, state)));
    }

    if table.columns.iter().any(|column| column.width.is_some()) {
        let total: f64 = table
            .columns
            .iter()
            .map(|column| column.width.unwrap_or(1.0))
            .sum();
        let cols: Vec<String> = table
            .columns
            .iter()
            .map(|column| {
                let share = column.width.unwrap_or(1.0) / total * 100.0;
                let style = serde_json::json!({ "width": format!("{}%", format_percent(share)) });
                format!("<col style={{{style}}}></col>")
            })
            .collect();
        parts.push(wrap_lines("colgroup", &cols));
    }

    let (head, body): (Vec<_>, Vec<_>) = table.rows.iter().partition(|row| row.header);
    for (section, rows, cell_name) in [("thead", head, "th"), ("tbody", body, "td")] {
        if rows.is_empty() {
            continue;
        }
        let rendered: Vec<String> = rows
            .iter()
            .map(|row| {
                let cells: Vec<String> = row
                    .cells
                    .iter()
                    .map(|cell| render_element(&cell_element(cell, cell_name), state))
                    .collect();
                wrap_lines("tr", &cells)
            })
            .collect();
        parts.push(wrap_lines(section, &rendered));
    }

    wrap_lines("table", &parts)
}

/// `<name>` and `</name>` around `lines`, one per line, indented.
fn wrap_lines(name: &str, lines: &[String]) -> String {
    if lines.is_empty() {
        return format!("<{name}></{name}>");
    }
    format!("<{name}>\n{}\n</{name}>", indent(&lines.join("\n"), 2))
}

fn cell_element(cell: &Cell, name: &str) -> Element {
    let mut element = if cell.children.iter().all(Node::is_inline) {
        Element::text(name)
    } else {
        Element::flow(name)
    };
    if cell.col_span > 1 {
        element = element.with_attr("colSpan", cell.col_span);
    }
    if cell.row_span > 1 {
        element = element.with_attr("rowSpan", cell.row_span);
    }
    element.children = cell.children.clone();
    element
}

/// Two decimals, trailing zeros trimmed.
fn format_percent(value: f64) -> String {
    let formatted = format!("{value:.2}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
