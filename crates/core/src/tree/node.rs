use super::{ElementRules, GrammarTree, NodeData, NodeId, Rules};
use crate::error::GrammarError;
use crate::path::{Path, PathSegment};
use std::collections::BTreeMap;
use x12_grammar_tables::{DataType, QualifierDef, Repeat, Usage};

/// Structural role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Repeatable group of segments and loops.
    Loop,
    /// One input record.
    Segment,
    /// Compound field within a segment.
    Composite,
    /// Atomic field.
    Element,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Loop => write!(f, "loop"),
            NodeKind::Segment => write!(f, "segment"),
            NodeKind::Composite => write!(f, "composite"),
            NodeKind::Element => write!(f, "element"),
        }
    }
}

/// A borrowed handle to one node of a [`GrammarTree`].
///
/// Handles are cheap to copy. Two handles are equal when they belong to the
/// same tree and resolve to the same canonical path.
#[derive(Clone, Copy)]
pub struct Node<'g> {
    tree: &'g GrammarTree,
    id: NodeId,
}

impl<'g> Node<'g> {
    pub(crate) fn new(tree: &'g GrammarTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn data(&self) -> &'g NodeData {
        self.tree.data(self.id)
    }

    pub(crate) fn rules(&self) -> &'g Rules {
        &self.data().rules
    }

    pub(crate) fn element_rules(&self) -> Option<&'g ElementRules> {
        match self.rules() {
            Rules::Element(rules) => Some(rules),
            _ => None,
        }
    }

    /// The tree this node belongs to.
    pub fn tree(&self) -> &'g GrammarTree {
        self.tree
    }

    /// Identifier: loop id, segment id, or reference designator.
    pub fn id(&self) -> &'g str {
        &self.data().id
    }

    /// Human-readable name.
    pub fn name(&self) -> &'g str {
        &self.data().name
    }

    /// Requirement level.
    pub fn usage(&self) -> Usage {
        self.data().usage
    }

    /// Structural role.
    pub fn kind(&self) -> NodeKind {
        match self.rules() {
            Rules::Loop { .. } => NodeKind::Loop,
            Rules::Segment { .. } => NodeKind::Segment,
            Rules::Composite => NodeKind::Composite,
            Rules::Element(_) => NodeKind::Element,
        }
    }

    /// 0-based ordinal among siblings.
    pub fn position(&self) -> usize {
        self.data().position
    }

    /// Canonical path of this node.
    pub fn path(&self) -> &'g Path {
        &self.data().path
    }

    /// Canonical path of this node (owned).
    pub fn get_path(&self) -> Path {
        self.path().clone()
    }

    /// Whether this is the tree root.
    pub fn is_root(&self) -> bool {
        self.data().parent.is_none()
    }

    /// The owning node; `None` for the root.
    pub fn parent(&self) -> Option<Node<'g>> {
        self.data().parent.map(|id| Node::new(self.tree, id))
    }

    /// Owned children in declaration order.
    pub fn children(&self) -> impl Iterator<Item = Node<'g>> + 'g {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| Node::new(tree, id))
    }

    /// Number of owned children.
    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// The `index`-th child (0-based) in declaration order.
    pub fn get_child_node_by_index(&self, index: usize) -> Result<Node<'g>, GrammarError> {
        let children = &self.data().children;
        children
            .get(index)
            .map(|&id| Node::new(self.tree, id))
            .ok_or(GrammarError::IndexOutOfRange {
                index,
                len: children.len(),
            })
    }

    /// Repeat bounds of a loop or segment.
    pub fn repeat(&self) -> Option<Repeat> {
        match self.rules() {
            Rules::Loop { repeat, .. } | Rules::Segment { repeat, .. } => Some(*repeat),
            Rules::Composite | Rules::Element(_) => None,
        }
    }

    /// Qualifier declared by a segment.
    pub fn qualifier(&self) -> Option<&'g QualifierDef> {
        match self.rules() {
            Rules::Segment { qualifier, .. } => qualifier.as_ref(),
            _ => None,
        }
    }

    /// The segment node that opens a loop.
    pub fn entry_segment(&self) -> Option<Node<'g>> {
        match self.rules() {
            Rules::Loop { entry, .. } => entry.map(|id| Node::new(self.tree, id)),
            _ => None,
        }
    }

    /// Identifier of the segment that opens a loop.
    pub fn first_segment_id(&self) -> Option<&'g str> {
        self.entry_segment().map(|seg| seg.id())
    }

    /// Data type of an element.
    pub fn data_type(&self) -> Option<DataType> {
        self.element_rules().and_then(|r| r.data_type)
    }

    /// Minimum length of an element.
    pub fn min_len(&self) -> Option<usize> {
        self.element_rules().map(|r| r.min_len)
    }

    /// Maximum length of an element.
    pub fn max_len(&self) -> Option<usize> {
        self.element_rules().map(|r| r.max_len)
    }

    /// Enumerated codes of an element (empty when none are declared).
    pub fn valid_codes(&self) -> Option<&'g BTreeMap<String, String>> {
        self.element_rules().map(|r| &r.valid_codes)
    }

    /// Name of the external code set of an element.
    pub fn external_codes(&self) -> Option<&'g str> {
        self.element_rules().and_then(|r| r.external_codes.as_deref())
    }

    /// Data element dictionary number of an element.
    pub fn data_ele(&self) -> Option<&'g str> {
        self.element_rules().and_then(|r| r.data_ele.as_deref())
    }

    /// Resolve `path` from this node.
    ///
    /// Absolute paths resolve from the root, relative ones from `self`.
    /// Returns `Ok(None)` when any step is absent.
    pub fn get_node_by_path(&self, path: &str) -> Result<Option<Node<'g>>, GrammarError> {
        let path = Path::parse(path)?;
        Ok(self.resolve(&path))
    }

    /// Resolve an already-parsed path from this node.
    pub fn resolve(&self, path: &Path) -> Option<Node<'g>> {
        let mut current = if path.is_absolute() {
            self.tree.root()
        } else {
            *self
        };
        for step in path.segments() {
            let Some(next) = current.step(step) else {
                tracing::trace!(from = %current.path(), %step, "path step not found");
                return None;
            };
            current = next;
        }
        Some(current)
    }

    fn step(&self, step: &PathSegment) -> Option<Node<'g>> {
        match self.kind() {
            NodeKind::Loop => {
                if step.sub_index().is_some() {
                    return None;
                }
                self.children().find(|child| {
                    child.id() == step.id()
                        && step
                            .qualifier()
                            .is_none_or(|q| child.qualifier_value() == Some(q))
                })
            }
            NodeKind::Segment => {
                if step.qualifier().is_some() {
                    return None;
                }
                let field = self.field_child(step.id())?;
                match step.sub_index() {
                    None => Some(field),
                    Some(sub) if field.kind() == NodeKind::Composite => {
                        let index = sub.checked_sub(1)?;
                        field.get_child_node_by_index(index).ok()
                    }
                    Some(_) => None,
                }
            }
            NodeKind::Composite => {
                if step.qualifier().is_some() || step.sub_index().is_some() {
                    return None;
                }
                self.field_child(step.id())
            }
            NodeKind::Element => None,
        }
    }

    /// A field child by 1-based position or by its own identifier.
    fn field_child(&self, key: &str) -> Option<Node<'g>> {
        match PathSegment::new(key).as_position() {
            Some(pos) => pos
                .checked_sub(1)
                .and_then(|i| self.get_child_node_by_index(i).ok()),
            None => self.children().find(|child| child.id() == key),
        }
    }

    /// The qualifying value of a segment, or of the segment opening a loop.
    pub(crate) fn qualifier_value(&self) -> Option<&'g str> {
        match self.kind() {
            NodeKind::Segment => self.qualifier().map(|q| q.value.as_str()),
            NodeKind::Loop => self.entry_segment().and_then(|seg| seg.qualifier_value()),
            NodeKind::Composite | NodeKind::Element => None,
        }
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.path() == other.path()
    }
}

impl Eq for Node<'_> {}

impl std::hash::Hash for Node<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.path().hash(state);
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind())
            .field("id", &self.id())
            .field("path", &self.path().to_string())
            .finish()
    }
}

impl std::fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}
