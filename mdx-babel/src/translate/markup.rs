//! Targets under construction on the nesting stack.

use crate::ir::nodes::{Cell, Element, ListItem, Node, Row, Table};

/// A target node being built by an open frame.
///
/// Besides whole nodes, a frame may build the parts that only exist inside a parent
/// (list items, table rows and cells, table captions) or the document root.
#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Document(Vec<Node>),
    Node(Node),
    Item(ListItem),
    Row(Row),
    Cell(Cell),
    Caption(Vec<Node>),
}

impl From<Node> for Markup {
    fn from(node: Node) -> Self {
        Markup::Node(node)
    }
}

impl From<Element> for Markup {
    fn from(element: Element) -> Self {
        Markup::Node(element.into())
    }
}

impl From<ListItem> for Markup {
    fn from(item: ListItem) -> Self {
        Markup::Item(item)
    }
}

impl From<Row> for Markup {
    fn from(row: Row) -> Self {
        Markup::Row(row)
    }
}

impl From<Cell> for Markup {
    fn from(cell: Cell) -> Self {
        Markup::Cell(cell)
    }
}

/// Zero-width anchor target.
pub(crate) fn target_marker(id: &str) -> Node {
    Element::text("Target").with_attr("id", id).into()
}

impl Markup {
    /// Flattens this markup into nodes that can live in any container.
    pub fn into_nodes(self) -> Vec<Node> {
        match self {
            Markup::Document(children) => children,
            Markup::Node(node) => vec![node],
            Markup::Item(item) => item.children,
            Markup::Row(row) => row
                .cells
                .into_iter()
                .flat_map(|cell| cell.children)
                .collect(),
            Markup::Cell(cell) => cell.children,
            Markup::Caption(children) => vec![Node::paragraph(children)],
        }
    }

    pub fn element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Markup::Node(Node::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Markup::Node(Node::Table(table)) => Some(table),
            _ => None,
        }
    }

    /// Whether this markup is a component element called `name`.
    pub fn is_element(&self, name: &str) -> bool {
        matches!(self, Markup::Node(Node::Element(element)) if element.name == name)
    }

    /// Attaches `child` as the last child; hands it back when this markup cannot hold
    /// children.
    pub fn adopt(&mut self, child: Markup) -> Result<(), Markup> {
        match self {
            Markup::Document(children) | Markup::Caption(children) => {
                children.extend(child.into_nodes());
            }
            Markup::Item(item) => item.children.extend(child.into_nodes()),
            Markup::Cell(cell) => cell.children.extend(child.into_nodes()),
            Markup::Row(row) => match child {
                Markup::Cell(cell) => row.cells.push(cell),
                other => row.cells.push(Cell::new(other.into_nodes())),
            },
            Markup::Node(Node::List(list)) => match child {
                Markup::Item(item) => list.items.push(item),
                other => list.items.push(ListItem::new(other.into_nodes())),
            },
            Markup::Node(Node::Table(table)) => match child {
                Markup::Row(row) => table.rows.push(row),
                Markup::Caption(caption) => table.caption = Some(caption),
                Markup::Cell(cell) => match table.rows.last_mut() {
                    Some(row) => row.cells.push(cell),
                    None => table.rows.push(Row {
                        header: false,
                        cells: vec![cell],
                    }),
                },
                other => table.rows.push(Row {
                    header: false,
                    cells: vec![Cell::new(other.into_nodes())],
                }),
            },
            Markup::Node(node) => match node.children_mut() {
                Some(children) => children.extend(child.into_nodes()),
                None => return Err(child),
            },
        }
        Ok(())
    }

    /// Places an anchor for `id` inside this markup. Returns `false` when the anchor has
    /// to go in front of it instead.
    pub fn anchor(&mut self, id: &str) -> bool {
        match self {
            Markup::Node(Node::Element(element)) => {
                element.attributes.set_default("id", id);
                true
            }
            Markup::Node(node) if node.has_inline_children() => match node.children_mut() {
                Some(children) => {
                    children.insert(0, target_marker(id));
                    true
                }
                None => false,
            },
            Markup::Item(ListItem { children, .. }) | Markup::Caption(children) => {
                children.insert(0, target_marker(id));
                true
            }
            Markup::Cell(cell) => {
                anchor_phrasing(&mut cell.children, id);
                true
            }
            Markup::Row(row) => match row.cells.first_mut() {
                Some(cell) => {
                    anchor_phrasing(&mut cell.children, id);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Whether a bare anchor marker can be adopted as a child without changing the
    /// structure of this markup.
    pub fn takes_markers(&self) -> bool {
        !matches!(
            self,
            Markup::Row(_) | Markup::Node(Node::List(_)) | Markup::Node(Node::Table(_))
        )
    }
}

/// Puts the marker inside a leading paragraph so cells stay single-paragraph.
fn anchor_phrasing(children: &mut Vec<Node>, id: &str) {
    let leading = children
        .first_mut()
        .filter(|first| first.has_inline_children())
        .and_then(Node::children_mut);
    match leading {
        Some(inline) => inline.insert(0, target_marker(id)),
        None => children.insert(0, target_marker(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::nodes::List;

    #[test]
    fn lists_wrap_stray_children_in_items() {
        let mut list = Markup::Node(Node::List(List::unordered()));
        list.adopt(Markup::Node(Node::text("loose"))).unwrap();
        list.adopt(ListItem::new(vec![Node::text("item")]).into())
            .unwrap();
        let Markup::Node(Node::List(list)) = list else {
            unreachable!()
        };
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].children, vec![Node::text("loose")]);
    }

    #[test]
    fn tables_take_captions_and_rows() {
        let mut table = Markup::Node(Node::Table(Table::default()));
        table
            .adopt(Markup::Caption(vec![Node::text("Totals")]))
            .unwrap();
        table.adopt(Row::default().into()).unwrap();
        let table = table.table_mut().unwrap();
        assert_eq!(table.caption, Some(vec![Node::text("Totals")]));
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn leaves_reject_children() {
        let mut code = Markup::Node(Node::inline_code("x"));
        let rejected = code.adopt(Markup::Node(Node::text("y")));
        assert_eq!(rejected, Err(Markup::Node(Node::text("y"))));
    }

    #[test]
    fn anchors_go_inside_phrasing_containers() {
        let mut paragraph = Markup::Node(Node::paragraph(vec![Node::text("Hi")]));
        assert!(paragraph.anchor("intro"));
        assert_eq!(
            paragraph,
            Markup::Node(Node::paragraph(vec![
                target_marker("intro"),
                Node::text("Hi")
            ]))
        );

        let mut element = Markup::from(Element::flow("Container"));
        assert!(element.anchor("box"));
        assert!(element.element_mut().unwrap().attributes.contains("id"));

        let mut list = Markup::Node(Node::List(List::unordered()));
        assert!(!list.anchor("items"));
        assert!(!list.takes_markers());
    }

    #[test]
    fn rows_anchor_inside_their_first_cell() {
        let mut row = Markup::Row(Row {
            header: false,
            cells: vec![
                Cell::new(vec![Node::paragraph(vec![Node::text("1")])]),
                Cell::new(vec![Node::text("2")]),
            ],
        });
        assert!(row.anchor("r1"));
        let Markup::Row(row) = row else {
            unreachable!()
        };
        assert_eq!(
            row.cells[0].children,
            vec![Node::paragraph(vec![target_marker("r1"), Node::text("1")])]
        );
        assert_eq!(row.cells[1].children, vec![Node::text("2")]);

        let mut empty = Markup::Row(Row::default());
        assert!(!empty.anchor("r2"));
    }
}
