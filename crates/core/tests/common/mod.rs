//! Shared test helpers for `x12_grammar_core` integration tests.

#![allow(unreachable_pub)]

use std::sync::LazyLock;
use x12_grammar_core::records::{Delimiters, Element, Segment};
use x12_grammar_core::{GrammarTree, Node};
use x12_grammar_diagnostics::Diagnostic;

/// The claim grammar, built once per test binary.
pub static GRAMMAR: LazyLock<GrammarTree> = LazyLock::new(|| {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/claim_837.json");
    let json = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    GrammarTree::from_json_str(&json)
        .unwrap_or_else(|e| panic!("failed to build {}: {}", path.display(), e))
});

/// Path prefix of the claim loop.
#[allow(dead_code)]
pub const CLAIM: &str = "/ISA_LOOP/GS_LOOP/ST_LOOP/DETAIL/2000A/2000B/2300";

/// Resolve a path that must exist in the claim grammar.
#[allow(dead_code)]
pub fn node(path: &str) -> Node<'static> {
    GRAMMAR
        .get_node_by_path(path)
        .unwrap_or_else(|e| panic!("bad path {path}: {e}"))
        .unwrap_or_else(|| panic!("no node at {path}"))
}

/// Parse a segment written with the default delimiters.
#[allow(dead_code)]
pub fn seg(raw: &str) -> Segment {
    Segment::parse(raw, &Delimiters::default())
}

/// Validate `value` against the element at `path` and collect diagnostics.
#[allow(dead_code)]
pub fn check_element(path: &str, value: &str) -> (bool, Vec<Diagnostic>) {
    let mut issues: Vec<Diagnostic> = Vec::new();
    let ok = node(path).is_valid(&Element::new(value), &mut issues);
    (ok, issues)
}

/// Codes of the collected diagnostics, in order.
#[allow(dead_code)]
pub fn ids(issues: &[Diagnostic]) -> Vec<&str> {
    issues.iter().map(|d| d.id.as_ref()).collect()
}
