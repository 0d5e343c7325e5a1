//! Stored-form contract through the public facade: decode is lenient about
//! absence, strict about shape, and encode round-trips every decodable
//! history.

use proptest::prelude::*;
use tether::codec::{decode, encode};
use tether::{Error, History, Reference, Snapshot, TargetId, TypeTag};

fn r(tag: u32, id: u64) -> Reference {
    Reference::new(TypeTag::new(tag), TargetId::new(id))
}

#[test]
fn absence_decodes_to_empty_history() {
    assert_eq!(decode("").unwrap(), History::new());
    assert_eq!(decode("null").unwrap(), History::new());
    assert_eq!(decode("[]").unwrap(), History::new());
}

#[test]
fn malformed_input_is_an_error_not_empty() {
    for raw in ["{", "[[1]]", "[[[1,2],3]]", "\"history\"", "[[[1,2.5]]]"] {
        let result = decode(raw);
        assert!(
            matches!(result, Err(Error::Decode { .. })),
            "expected decode error for {raw:?}"
        );
    }
}

#[test]
fn decode_reads_wire_pairs() {
    let history = decode("[[[2,10],[3,5]],[[2,11]]]").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.current(), &[r(2, 11)]);
    assert_eq!(history.snapshots()[0].refs(), &[r(2, 10), r(3, 5)]);
}

#[test]
fn encoded_form_is_nested_json_arrays_of_pairs() {
    let history: History = vec![Snapshot::from(vec![r(2, 10), r(3, 5)])]
        .into_iter()
        .collect();

    let value: serde_json::Value = serde_json::from_str(&encode(&history)).unwrap();
    assert_eq!(value, serde_json::json!([[[2, 10], [3, 5]]]));
}

#[test]
fn encode_then_decode_is_identity() {
    let history: History = vec![
        Snapshot::from(vec![r(1, 1), r(2, 5), r(1, 1)]),
        Snapshot::new(),
        Snapshot::from(vec![r(3, u64::MAX)]),
    ]
    .into_iter()
    .collect();

    assert_eq!(decode(&encode(&history)).unwrap(), history);
}

proptest! {
    #[test]
    fn any_decodable_history_roundtrips(
        raw_snapshots in proptest::collection::vec(
            proptest::collection::vec((any::<u32>(), any::<u64>()), 0..6),
            0..6,
        )
    ) {
        let history: History = raw_snapshots
            .into_iter()
            .map(|pairs| {
                pairs
                    .into_iter()
                    .map(|(tag, id)| r(tag, id))
                    .collect::<Snapshot>()
            })
            .collect();

        prop_assert_eq!(decode(&encode(&history)).unwrap(), history);
    }
}
