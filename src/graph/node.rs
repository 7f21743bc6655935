use bitflags::bitflags;

/// Arena index of a node inside [`super::SymbolGraph`].
///
/// All edges in the graph (`type`, `parent`, `children`, ...) are arena
/// indices rather than owned values, so semantic cycles through `type` edges
/// (self-referential constraints, mutually recursive interfaces) are
/// representable without ownership cycles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct NodeRef(pub u32);

impl NodeRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The kind of entity a node represents: a declaration, a type expression,
/// or a structural sub-term.
///
/// Unrecognized kind tags deserialize to `Unknown`; an unknown kind is a
/// recoverable condition, never a load failure.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Kind {
    Module,
    Namespace,
    Class,
    Interface,
    Component,
    Enum,
    Function,
    Method,
    Property,
    Getter,
    Setter,
    Constructor,
    TypeAlias,
    Constant,
    Variable,
    Reference,
    Array,
    Tuple,
    TypeUnion,
    TypeIntersection,
    ConditionalType,
    MappedType,
    ObjectType,
    IndexedType,
    Keyof,
    Typeof,
    Infer,
    Parenthesized,
    ThisType,
    Literal,
    BaseType,
    TypeParameter,
    FunctionType,
    ConstructorType,
    IndexSignature,
    CallSignature,
    ConstructSignature,
    Export,
    ImportType,
    Spread,
    /// The synthetic heritage node listing a class/interface/component's
    /// extends/implements relations.
    ClassType,
    ReadonlyKeyword,
    Symbol,
    UnknownType,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Kind {
    /// Display label used for member-group titles and group ordering.
    pub fn label(self) -> &'static str {
        match self {
            Kind::Module => "Modules",
            Kind::Namespace => "Namespaces",
            Kind::Class => "Classes",
            Kind::Interface => "Interfaces",
            Kind::Component => "Components",
            Kind::Enum => "Enums",
            Kind::Function => "Functions",
            Kind::Method => "Methods",
            Kind::Property => "Properties",
            Kind::Getter => "Getters",
            Kind::Setter => "Setters",
            Kind::Constructor => "Constructors",
            Kind::TypeAlias => "Type Aliases",
            Kind::Constant => "Constants",
            Kind::Variable => "Variables",
            Kind::Export => "Exports",
            Kind::IndexSignature => "Index Signatures",
            Kind::CallSignature => "Call Signatures",
            Kind::ConstructSignature => "Construct Signatures",
            _ => "Other",
        }
    }
}

/// Bit-flags attached to a node: visibility, mutability, and emphasis
/// markers. Serialized as a plain integer on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Flags(pub u32);

bitflags! {
    impl Flags: u32 {
        const EXPORT = 1 << 0;
        const AMBIENT = 1 << 1;
        const STATIC = 1 << 2;
        const ABSTRACT = 1 << 3;
        const READONLY = 1 << 4;
        const OPTIONAL = 1 << 5;
        const REST = 1 << 6;
        const PUBLIC = 1 << 7;
        const PRIVATE = 1 << 8;
        const PROTECTED = 1 << 9;
        const OVERLOAD = 1 << 10;
        const DEPRECATED = 1 << 11;
        const INTERNAL = 1 << 12;
        const DEFAULT = 1 << 13;
        const DECLARATION_MERGE = 1 << 14;
        const EXTERNAL = 1 << 15;
        const DEFAULT_LIBRARY = 1 << 16;
    }
}

impl Flags {
    pub fn has(self, other: Flags) -> bool {
        self.contains(other)
    }
}

/// A source location record: file identity plus character offset, with an
/// optional pre-computed line number for "view source" links.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Source {
    /// Path of the declaring file, relative to the package root.
    pub file: String,
    /// Character offset of the declaration within the file.
    #[serde(default)]
    pub offset: u64,
    /// 1-based line number, when the extractor provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// A node's `source` field accepts either a single location record or a
/// list of them (declaration merges span several files).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SourceList {
    One(Source),
    Many(Vec<Source>),
}

impl SourceList {
    /// The primary (first) location record.
    pub fn first(&self) -> Option<&Source> {
        match self {
            SourceList::One(s) => Some(s),
            SourceList::Many(v) => v.first(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        match self {
            SourceList::One(s) => std::slice::from_ref(s).iter(),
            SourceList::Many(v) => v.iter(),
        }
    }
}

/// An inline span inside a documentation value: plain text, or a `link`
/// span referencing another symbol by name.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocSpan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub value: String,
}

/// The value of a documentation item: free text or a sequence of inline
/// spans.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum DocValue {
    Text(String),
    Spans(Vec<DocSpan>),
}

/// One tagged content item of a documentation block (`@example`, `@see`,
/// `@param`, ... or untagged descriptive prose).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub value: DocValue,
}

/// A node's documentation block.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocBlock {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<DocItem>,
    /// Marks the symbol as unstable ("beta" chip).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub beta: bool,
    /// Custom-element tag name, for component nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    /// ARIA role, for component nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// One entity of the symbol graph.
///
/// The whole graph is constructed upstream and treated as immutable input;
/// the renderer never writes to a node (memoization lives outside the graph,
/// keyed by [`NodeRef`]).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Stable public identity. Nodes without an id are never link targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub kind: Kind,
    #[serde(default)]
    pub flags: Flags,
    /// Display identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Literal / default-value text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// The node's "type of" relation: return type, alias target, property
    /// type, constraint. May participate in cycles.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<NodeRef>,
    /// Generic parameters, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_parameters: Option<Vec<NodeRef>>,
    /// Function / method / index-signature parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<NodeRef>>,
    /// Members, union branches or tuple elements, depending on `kind`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeRef>>,
    /// Pre-computed resolution of `type`, used only for display when the raw
    /// alias form would be uninformative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_type: Option<NodeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<DocBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceList>,
    /// Non-owning back-reference to the enclosing node. Used for href
    /// composition only, never traversed for content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeRef>,
    /// Known subtypes, populated by the upstream graph builder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_by: Option<Vec<NodeRef>>,
}

impl Node {
    /// The node's display name, or an empty string.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// The primary source location, when any is recorded.
    pub fn primary_source(&self) -> Option<&Source> {
        self.source.as_ref().and_then(|s| s.first())
    }

    pub fn children(&self) -> &[NodeRef] {
        self.children.as_deref().unwrap_or(&[])
    }
}
