//! Segment-to-node matching tests.

mod common;

use common::{CLAIM, node, seg};
use x12_grammar_core::GrammarTree;

const SUBSCRIBER: &str = "/ISA_LOOP/GS_LOOP/ST_LOOP/DETAIL/2000A/2000B";
const DETAIL: &str = "/ISA_LOOP/GS_LOOP/ST_LOOP/DETAIL";

#[test]
fn child_segment_selected_by_qualifier() {
    let claim = node(CLAIM);

    let found = claim.get_child_segment_node(&seg("DTP*096*TM*1230~")).unwrap();
    assert_eq!(found, node(&format!("{CLAIM}/DTP[096]")));

    let found = claim.get_child_segment_node(&seg("DTP*435*D8*20040101")).unwrap();
    assert_eq!(found.path(), format!("{CLAIM}/DTP[435]").as_str());

    let found = claim.get_child_segment_node(&seg("CLM*A37YH556*500")).unwrap();
    assert_eq!(found.id(), "CLM");
}

#[test]
fn child_segment_not_found() {
    let claim = node(CLAIM);
    assert!(claim.get_child_segment_node(&seg("DTP*999*D8*20040101")).is_none());
    assert!(claim.get_child_segment_node(&seg("NM1*IL*1*DOE")).is_none());
    assert!(claim.get_child_segment_node(&seg("DTP")).is_none());
    // loops are not segment children
    assert!(node(DETAIL).get_child_segment_node(&seg("HL*1**20*1")).is_none());
}

#[test]
fn child_loop_by_entry_segment() {
    let subscriber = node(SUBSCRIBER);
    assert_eq!(
        subscriber.get_child_loop_node(&seg("CLM*A37YH556*500")),
        Some(node(CLAIM))
    );
    assert_eq!(
        subscriber
            .get_child_loop_node(&seg("NM1*IL*1*DOE"))
            .map(|n| n.id()),
        Some("2010BA")
    );
    assert!(subscriber.get_child_loop_node(&seg("NM1*QC*1*DOE")).is_none());
    assert!(subscriber.get_child_loop_node(&seg("HL*3*2*22*0")).is_none());
    assert!(subscriber.get_child_loop_node(&seg("LX*1")).is_none());

    let detail = node(DETAIL);
    assert_eq!(
        detail.get_child_loop_node(&seg("HL*1**20*1")).map(|n| n.id()),
        Some("2000A")
    );
    assert_eq!(
        detail.get_child_loop_node(&seg("INS*Y*18")).map(|n| n.id()),
        Some("2000")
    );
}

#[test]
fn child_loops_told_apart_by_entry_qualifier() {
    let member = node(&format!("{DETAIL}/2000"));
    assert_eq!(
        member.get_child_loop_node(&seg("NM1*IL*1*SMITH")).map(|n| n.id()),
        Some("2100A")
    );
    assert_eq!(
        member.get_child_loop_node(&seg("NM1*70*1*SMYTH")).map(|n| n.id()),
        Some("2100B")
    );
    assert!(member.get_child_loop_node(&seg("NM1*74*1*SMITH")).is_none());
}

#[test]
fn is_match_ignores_qualifiers() {
    let dtp = node(&format!("{CLAIM}/DTP[434]"));
    assert!(dtp.is_match(&seg("DTP*434*RD8*20040101-20040131")));
    assert!(dtp.is_match(&seg("DTP*096*TM*1230")));
    assert!(!dtp.is_match(&seg("CLM*A37YH556*500")));

    assert!(node(CLAIM).is_match(&seg("CLM*A37YH556*500")));
    assert!(!node(CLAIM).is_match(&seg("LX*1")));
    assert!(!node(&format!("{CLAIM}/CLM/01")).is_match(&seg("CLM01")));
}

#[test]
fn is_match_qual() {
    let dtp = node(&format!("{CLAIM}/DTP[096]"));
    let segment = seg("DTP*096*TM*1230");
    assert!(dtp.is_match_qual(&segment, "DTP", Some("096")));
    assert!(dtp.is_match_qual(&segment, "DTP", None));
    assert!(!dtp.is_match_qual(&segment, "DTP", Some("434")));
    assert!(!dtp.is_match_qual(&segment, "CLM", None));

    // without a declared qualifier the first element is compared
    let clm = node(&format!("{CLAIM}/CLM"));
    let claim = seg("CLM*A37YH556*500");
    assert!(clm.is_match_qual(&claim, "CLM", Some("A37YH556")));
    assert!(!clm.is_match_qual(&claim, "CLM", Some("500")));
}

fn order_grammar(first: &str, second: &str) -> GrammarTree {
    let dtp = |qualifier: &str| {
        let (position, value) = qualifier.split_once('=').unwrap();
        format!(
            r#"{{"kind":"segment","id":"DTP","usage":"S","qualifier":{{"position":{position},"value":"{value}"}},"fields":[
                {{"kind":"element","id":"DTP01","usage":"R","dataType":"ID","minLen":3,"maxLen":3}},
                {{"kind":"element","id":"DTP02","usage":"R","dataType":"ID","minLen":2,"maxLen":3}},
                {{"kind":"element","id":"DTP03","usage":"R","dataType":"AN","minLen":1,"maxLen":35}}
            ]}}"#
        )
    };
    GrammarTree::from_json_str(&format!(
        r#"{{"transactionSet":"837","icvn":"00401","children":[
            {{"kind":"loop","id":"2300","usage":"R","children":[{},{}]}}
        ]}}"#,
        dtp(first),
        dtp(second)
    ))
    .unwrap()
}

#[test]
fn declaration_order_breaks_ties() {
    let segment = seg("DTP*434*RD8*20040101-20040131");

    let tree = order_grammar("1=434", "2=RD8");
    let found = tree
        .get_node_by_path("/2300")
        .unwrap()
        .unwrap()
        .get_child_segment_node(&segment)
        .unwrap();
    assert_eq!(found.path(), "/2300/DTP[434]");

    let tree = order_grammar("2=RD8", "1=434");
    let found = tree
        .get_node_by_path("/2300")
        .unwrap()
        .unwrap()
        .get_child_segment_node(&segment)
        .unwrap();
    assert_eq!(found.path(), "/2300/DTP[RD8]");
}
