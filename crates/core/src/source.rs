//! Where grammar trees come from.

use crate::error::GrammarError;
use crate::tree::GrammarTree;
use std::collections::BTreeMap;
use x12_grammar_tables::GrammarDef;

/// Supplies a built grammar for a transaction set identifier.
///
/// Implementations own whatever storage and parsing they need; the core only
/// sees finished trees. The tree carries its interchange control version
/// number ([`GrammarTree::icvn`]).
pub trait GrammarSource {
    /// Build the grammar for `transaction_set` (e.g., `"837"`).
    fn load(&self, transaction_set: &str) -> Result<GrammarTree, GrammarError>;
}

/// Definitions held in memory, keyed by transaction set identifier.
impl GrammarSource for BTreeMap<String, GrammarDef> {
    fn load(&self, transaction_set: &str) -> Result<GrammarTree, GrammarError> {
        let def = self
            .get(transaction_set)
            .ok_or_else(|| GrammarError::UnknownTransactionSet(transaction_set.to_string()))?;
        GrammarTree::from_def(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: &str) -> GrammarDef {
        GrammarDef::from_json_str(&format!(
            r#"{{"transactionSet":"{id}","icvn":"00401","children":[
                {{"kind":"segment","id":"ST","usage":"R","fields":[
                    {{"kind":"element","id":"ST01","usage":"R","dataType":"ID","minLen":3,"maxLen":3}}
                ]}}
            ]}}"#
        ))
        .unwrap()
    }

    #[test]
    fn loads_known_transaction_set() {
        let mut defs = BTreeMap::new();
        defs.insert("837".to_string(), def("837"));
        defs.insert("834".to_string(), def("834"));

        let tree = defs.load("834").unwrap();
        assert_eq!(tree.transaction_set(), "834");
        assert_eq!(tree.icvn(), "00401");
        assert!(tree.get_node_by_path("/ST/01").unwrap().is_some());
    }

    #[test]
    fn unknown_transaction_set_is_an_error() {
        let defs: BTreeMap<String, GrammarDef> = BTreeMap::new();
        let err = defs.load("270").unwrap_err();
        assert!(matches!(err, GrammarError::UnknownTransactionSet(ref id) if id == "270"));
    }
}
