//! Mapping incoming segments onto grammar nodes.
//!
//! Declaration order is authoritative throughout: the first structurally
//! matching child wins.

use super::{Node, NodeKind};
use crate::records::Segment;

impl<'g> Node<'g> {
    /// The child segment node that `segment` corresponds to.
    ///
    /// A child matches when its identifier equals the segment's and, if the
    /// child declares a qualifier, the segment's value at the qualifier
    /// position equals the declared value.
    pub fn get_child_segment_node(&self, segment: &Segment) -> Option<Node<'g>> {
        let found = self
            .children()
            .filter(|child| child.kind() == NodeKind::Segment)
            .find(|child| child.matches_segment(segment));
        tracing::trace!(
            parent = %self.path(),
            segment = segment.id(),
            matched = ?found.map(|n| n.path().to_string()),
            "child segment lookup"
        );
        found
    }

    /// The child loop that `segment` opens.
    ///
    /// A loop matches when its entry segment matches `segment`, qualifier
    /// included.
    pub fn get_child_loop_node(&self, segment: &Segment) -> Option<Node<'g>> {
        let found = self
            .children()
            .filter(|child| child.kind() == NodeKind::Loop)
            .find(|child| {
                child
                    .entry_segment()
                    .is_some_and(|entry| entry.matches_segment(segment))
            });
        tracing::trace!(
            parent = %self.path(),
            segment = segment.id(),
            matched = ?found.map(|n| n.path().to_string()),
            "child loop lookup"
        );
        found
    }

    /// Whether `segment` carries this node's identifier, ignoring qualifiers.
    ///
    /// For a loop the identifier of its entry segment is used, so a loop
    /// matches the segment that opens it.
    pub fn is_match(&self, segment: &Segment) -> bool {
        match self.kind() {
            NodeKind::Segment => self.id() == segment.id(),
            NodeKind::Loop => self.first_segment_id() == Some(segment.id()),
            NodeKind::Composite | NodeKind::Element => false,
        }
    }

    /// Whether this node is `identifier` and `segment` matches it under
    /// `qualifier`.
    ///
    /// With no qualifier only identifiers are compared. Otherwise the
    /// segment's value at this node's qualifier position (first element when
    /// none is declared) must equal `qualifier`.
    pub fn is_match_qual(
        &self,
        segment: &Segment,
        identifier: &str,
        qualifier: Option<&str>,
    ) -> bool {
        if self.id() != identifier || segment.id() != identifier {
            return false;
        }
        let Some(qualifier) = qualifier else {
            return true;
        };
        let position = self.qualifier().map_or(1, |q| q.position);
        segment.value(position) == Some(qualifier)
    }

    fn matches_segment(&self, segment: &Segment) -> bool {
        self.id() == segment.id()
            && self
                .qualifier()
                .is_none_or(|q| segment.value(q.position) == Some(q.value.as_str()))
    }
}
