//! The closed set of source node kinds and their fallback lineage.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! node_kinds {
    ($($variant:ident => $tag:literal),* $(,)?) => {
        /// Tag of a [`SourceNode`](super::SourceNode).
        ///
        /// Tags the translator has handlers for are enumerated; anything else is
        /// preserved verbatim in [`NodeKind::Other`] and handled by the generic
        /// fallback.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum NodeKind {
            $($variant,)*
            Other(String),
        }

        impl NodeKind {
            /// Every enumerated kind, in declaration order.
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$variant,)*];

            pub fn from_tag(tag: &str) -> Self {
                match tag {
                    $($tag => NodeKind::$variant,)*
                    other => NodeKind::Other(other.to_string()),
                }
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $(NodeKind::$variant => $tag,)*
                    NodeKind::Other(tag) => tag,
                }
            }
        }
    };
}

node_kinds! {
    Element => "element",
    Document => "document",
    Section => "section",
    Title => "title",
    Subtitle => "subtitle",
    Rubric => "rubric",
    Paragraph => "paragraph",
    Text => "text",
    LiteralBlock => "literal_block",
    DoctestBlock => "doctest_block",
    Transition => "transition",
    BulletList => "bullet_list",
    EnumeratedList => "enumerated_list",
    ListItem => "list_item",
    DefinitionList => "definition_list",
    DefinitionListItem => "definition_list_item",
    Term => "term",
    Classifier => "classifier",
    Definition => "definition",
    FieldList => "field_list",
    Field => "field",
    FieldName => "field_name",
    FieldBody => "field_body",
    OptionList => "option_list",
    OptionListItem => "option_list_item",
    OptionGroup => "option_group",
    Description => "description",
    BlockQuote => "block_quote",
    Attribution => "attribution",
    LineBlock => "line_block",
    Line => "line",
    Figure => "figure",
    Caption => "caption",
    Legend => "legend",
    Inline => "inline",
    Strong => "strong",
    Emphasis => "emphasis",
    LiteralStrong => "literal_strong",
    LiteralEmphasis => "literal_emphasis",
    Literal => "literal",
    Subscript => "subscript",
    Superscript => "superscript",
    Reference => "reference",
    FootnoteReference => "footnote_reference",
    Footnote => "footnote",
    Citation => "citation",
    Label => "label",
    Target => "target",
    Image => "image",
    DownloadReference => "download_reference",
    Admonition => "admonition",
    Note => "note",
    Warning => "warning",
    Tip => "tip",
    Important => "important",
    Hint => "hint",
    Caution => "caution",
    Danger => "danger",
    Error => "error",
    Attention => "attention",
    Seealso => "seealso",
    Versionmodified => "versionmodified",
    Topic => "topic",
    Sidebar => "sidebar",
    Table => "table",
    Tgroup => "tgroup",
    Colspec => "colspec",
    Thead => "thead",
    Tbody => "tbody",
    Row => "row",
    Entry => "entry",
    TitleReference => "title_reference",
    Abbreviation => "abbreviation",
    Acronym => "acronym",
    Compound => "compound",
    Container => "container",
    Math => "math",
    MathBlock => "math_block",
    Raw => "raw",
    Meta => "meta",
    Desc => "desc",
    DescSignature => "desc_signature",
    DescSignatureLine => "desc_signature_line",
    DescName => "desc_name",
    DescAddname => "desc_addname",
    DescAnnotation => "desc_annotation",
    DescParameterlist => "desc_parameterlist",
    DescParameter => "desc_parameter",
    DescOptional => "desc_optional",
    DescType => "desc_type",
    DescReturns => "desc_returns",
    DescContent => "desc_content",
    DescInline => "desc_inline",
    DescSigElement => "desc_sig_element",
    DescSigName => "desc_sig_name",
    DescSigSpace => "desc_sig_space",
    DescSigPunctuation => "desc_sig_punctuation",
    DescSigOperator => "desc_sig_operator",
    DescSigKeyword => "desc_sig_keyword",
    DescSigKeywordType => "desc_sig_keyword_type",
    DescSigLiteralNumber => "desc_sig_literal_number",
    DescSigLiteralString => "desc_sig_literal_string",
    DescSigLiteralChar => "desc_sig_literal_char",
    Hlist => "hlist",
    Hlistcol => "hlistcol",
    Comment => "comment",
    SubstitutionDefinition => "substitution_definition",
    Toctree => "toctree",
    Index => "index",
    SystemMessage => "system_message",
    Problematic => "problematic",
}

impl NodeKind {
    /// The next more generic kind whose handlers apply when this kind's own
    /// handlers pass.
    ///
    /// Every kind except [`NodeKind::Text`] eventually reaches
    /// [`NodeKind::Element`], the generic fallback.
    pub fn generalization(&self) -> Option<NodeKind> {
        use NodeKind::*;
        match self {
            Element | Text => None,
            Note | Warning | Tip | Important | Hint | Caution | Danger | Error | Attention
            | Seealso => Some(Admonition),
            DoctestBlock => Some(LiteralBlock),
            LiteralStrong => Some(Strong),
            LiteralEmphasis => Some(Emphasis),
            Citation => Some(Footnote),
            Acronym => Some(Abbreviation),
            DescSigName | DescSigPunctuation | DescSigOperator | DescSigKeyword
            | DescSigKeywordType | DescSigLiteralNumber | DescSigLiteralString
            | DescSigLiteralChar => Some(DescSigElement),
            _ => Some(Element),
        }
    }

    /// This kind followed by all of its generalizations, most specific first.
    pub fn lineage(&self) -> Vec<NodeKind> {
        let mut chain = vec![self.clone()];
        while let Some(next) = chain.last().and_then(NodeKind::generalization) {
            chain.push(next);
        }
        chain
    }

    pub fn is_admonition(&self) -> bool {
        self.lineage().contains(&NodeKind::Admonition)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        NodeKind::from_tag(tag)
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        NodeKind::from_tag(&tag)
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_str().to_string()
    }
}
