//! Integration tests for node queries, filters and attempt chains.

use yaxi::query::{parse_query, Filter, Matched, Query};
use yaxi::XmlNode;

const ITEMS: &str = r#"<Root><Item id="a" val="1"/><Item id="b" val="2"/></Root>"#;

const EVENT: &str = r#"<VOEvent ivorn="ivo://test#1" role="test">
  <Who>
    <AuthorIVORN>ivo://author</AuthorIVORN>
  </Who>
  <What>
    <Param name="FAR" value="0.001"/>
    <Param name="SNR" ucd="stat.snr" value="12"/>
    <Param name="FAR" value="0.002"/>
    <Group type="Classification">
      <Param name="BNS" value="0.9"/>
    </Group>
  </What>
</VOEvent>"#;

fn ids(matched: &Matched<'_>) -> Vec<String> {
    matched
        .as_nodes()
        .expect("expected a sequence")
        .iter()
        .map(|n| n.get("id").unwrap_or("-").to_string())
        .collect()
}

fn values(matched: &Matched<'_>) -> Vec<String> {
    matched
        .as_nodes()
        .expect("expected a sequence")
        .iter()
        .map(|n| n.get("value").unwrap_or("-").to_string())
        .collect()
}

/// Filter `Item` on `id = b` yields exactly the second item.
#[test]
fn test_items_filter_by_id() {
    let root: XmlNode = ITEMS.parse().unwrap();
    let result = root
        .query(&Filter::new("Item").attrs(["id"]).value("b").into())
        .unwrap();
    assert_eq!(ids(&result), vec!["b"]);
}

/// First `Item`, then its `val` attribute.
#[test]
fn test_items_first_then_attribute() {
    let root: XmlNode = ITEMS.parse().unwrap();
    let result = root
        .query(&Query::path(vec![Query::all("Item"), Query::at(0)]))
        .unwrap();
    assert_eq!(result.as_node().unwrap().attr("val").unwrap(), "1");
    assert_eq!(root.find("Item").unwrap().attr("val").unwrap(), "1");
}

/// Filtering equals find_all followed by "some named attribute has an accepted value".
#[test]
fn test_filter_equals_manual_filtering() {
    let root: XmlNode = EVENT.parse().unwrap();
    let what = root.find("What").unwrap();

    let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
        (vec!["name"], vec!["FAR"]),
        (vec!["name", "ucd"], vec!["stat.snr"]),
        (vec!["name"], vec!["FAR", "SNR"]),
        (vec!["missing"], vec!["FAR"]),
        (vec!["name"], vec![]),
        (vec![], vec!["FAR"]),
    ];

    for (attrs, accepted) in cases {
        let filter = Filter::new("Param").attrs(attrs.clone()).values(accepted.clone());
        let result = what.query(&filter.into()).unwrap();

        let expected: Vec<&XmlNode> = if attrs.is_empty() {
            what.find_all("Param")
        } else {
            what.find_all("Param")
                .into_iter()
                .filter(|p| {
                    attrs
                        .iter()
                        .any(|a| p.get(a).is_some_and(|v| accepted.contains(&v)))
                })
                .collect()
        };
        assert_eq!(result, Matched::Nodes(expected), "attrs={:?} values={:?}", attrs, accepted);
    }
}

/// Slicing a filter result equals slicing the unsliced result.
#[test]
fn test_filter_slice_matches_sequence_slice() {
    let root: XmlNode = EVENT.parse().unwrap();
    let what = root.find("What").unwrap();
    let all = what.query(&Query::all("Param")).unwrap();
    let all = all.as_nodes().unwrap().to_vec();
    assert_eq!(all.len(), 3);

    let sliced = what.query(&Filter::new("Param").stop(2).into()).unwrap();
    assert_eq!(sliced, Matched::Nodes(all[..2].to_vec()));

    let stepped = what.query(&Filter::new("Param").step(2).into()).unwrap();
    assert_eq!(stepped, Matched::Nodes(vec![all[0], all[2]]));

    let reversed = what.query(&Filter::new("Param").step(-1).into()).unwrap();
    assert_eq!(reversed, Matched::Nodes(all.iter().rev().copied().collect()));

    let filtered = what
        .query(&Filter::new("Param").attrs(["name"]).value("FAR").stop(1).into())
        .unwrap();
    assert_eq!(values(&filtered), vec!["0.001"]);
}

/// Tag and positional lookups fail with NotFound; filters return empty sequences.
#[test]
fn test_not_found_versus_empty() {
    let root: XmlNode = EVENT.parse().unwrap();
    assert!(root.query(&Query::tag("How")).unwrap_err().is_not_found());
    assert!(root.query(&Query::at(5)).unwrap_err().is_not_found());
    assert_eq!(root.query(&Query::all("How")).unwrap(), Matched::Nodes(vec![]));
    assert!(root.attr("missing").unwrap_err().is_not_found());
}

/// Paths step through nodes and sequences.
#[test]
fn test_textual_path_queries() {
    let root: XmlNode = EVENT.parse().unwrap();

    let bns = root
        .query(&parse_query("What/Group[type=Classification]/0/Param[name=BNS]/0").unwrap())
        .unwrap();
    assert_eq!(bns.as_node().unwrap().attr("value").unwrap(), "0.9");

    let last_far = root
        .query(&parse_query("What/Param[name=FAR][::-1]/0").unwrap())
        .unwrap();
    assert_eq!(last_far.as_node().unwrap().attr("value").unwrap(), "0.002");

    let author = root.query(&parse_query("Who/AuthorIVORN").unwrap()).unwrap();
    assert_eq!(author.as_node().and_then(XmlNode::text), Some("ivo://author"));
}

/// `attempt().query(q1).query(q2).value()` is q1's match, else q2's, else the root.
#[test]
fn test_attempt_first_success_law() {
    let root: XmlNode = EVENT.parse().unwrap();
    let queries = vec![
        Query::tag("What"),
        Query::tag("Missing"),
        Query::at(0),
        Query::at(42),
        Query::all("Nothing"),
        Query::path(vec![Query::tag("What"), Query::tag("Group")]),
        Query::path(vec![Query::tag("What"), Query::tag("Nope")]),
    ];

    for q1 in &queries {
        for q2 in &queries {
            let expected = root
                .query(q1)
                .or_else(|_| root.query(q2))
                .unwrap_or(Matched::Node(&root));
            let actual = root.attempt().query(q1.clone()).query(q2.clone()).value();
            assert_eq!(actual, expected, "q1={} q2={}", q1, q2);
        }
    }
}

/// A fully failed chain falls back to the root and keeps the last failure.
#[test]
fn test_attempt_falls_back_to_root() {
    let root: XmlNode = EVENT.parse().unwrap();
    let attempt = root.attempt().query("How").query(Query::path(["Who", "Missing"]));
    assert!(!attempt.is_resolved());
    assert!(attempt.last_error().unwrap().to_string().contains("Missing"));
    assert_eq!(attempt.value(), Matched::Node(&root));
}

/// Text of the first matching candidate.
#[test]
fn test_attempt_text() {
    let root: XmlNode = EVENT.parse().unwrap();
    let text = root
        .attempt()
        .query(Query::path(["Who", "Author"]))
        .query(Query::path(["Who", "AuthorIVORN"]))
        .text()
        .value();
    assert_eq!(text, Matched::Text(Some("ivo://author")));
}
