//! Writer/reader symmetry and schema enforcement.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::BTreeMap;

use bytes::Bytes;
use proptest::prelude::*;
use serde_json::json;
use uuid::Uuid;

use relaywire_core::cache::SymbolCache;
use relaywire_core::protocol::cursor::ByteWriter;
use relaywire_core::protocol::{FieldKind, MessageReader, MessageWriter};
use relaywire_core::RelayError;


use fixtures::{Demo, Mode};

const SENDER: &str = "11111111-1111-1111-1111-111111111111";

fn sender() -> Uuid {
    Uuid::parse_str(SENDER).unwrap()
}

#[test]
fn broadcast_end_to_end() {
    let mut w = MessageWriter::begin(sender(), "lobby-1", Demo::Broadcast).unwrap();
    w.put_string("hello").unwrap();
    let bytes = w.finish().unwrap();

    let mut r = MessageReader::<Demo>::parse(bytes.clone()).unwrap();
    assert_eq!(r.sender_id().to_string(), SENDER);
    assert_eq!(r.origin_server(), "lobby-1");
    assert_eq!(r.action(), Demo::Broadcast);
    assert_eq!(r.read_string().unwrap(), "hello");
    assert_eq!(r.remaining(), 0);
    assert_eq!(r.raw(), &bytes);
}

#[test]
fn every_kind_round_trips_at_the_edges() {
    let player = Uuid::new_v4();
    let data = json!({ "coins": 12, "tags": ["a", "b"] });

    let mut w = MessageWriter::begin(sender(), "", Demo::Everything).unwrap();
    w.put_string("")
        .unwrap()
        .put_uuid(player)
        .unwrap()
        .put_bool(true)
        .unwrap()
        .put_i8(i8::MIN)
        .unwrap()
        .put_i16(i16::MAX)
        .unwrap()
        .put_i32(-1)
        .unwrap()
        .put_i64(i64::MIN)
        .unwrap()
        .put_f32(f32::INFINITY)
        .unwrap()
        .put_f64(-0.5)
        .unwrap()
        .put_map(&data)
        .unwrap()
        .put_symbol(Mode::Creative)
        .unwrap()
        .put_tail(&[])
        .unwrap();
    let bytes = w.finish().unwrap();

    let mut r = MessageReader::<Demo>::parse(bytes).unwrap();
    assert_eq!(r.origin_server(), "");
    assert_eq!(r.read_string().unwrap(), "");
    assert_eq!(r.read_uuid().unwrap(), player);
    assert!(r.read_bool().unwrap());
    assert_eq!(r.read_i8().unwrap(), i8::MIN);
    assert_eq!(r.read_i16().unwrap(), i16::MAX);
    assert_eq!(r.read_i32().unwrap(), -1);
    assert_eq!(r.read_i64().unwrap(), i64::MIN);
    assert_eq!(r.read_f32().unwrap(), f32::INFINITY);
    assert_eq!(r.read_f64().unwrap(), -0.5);
    assert_eq!(r.read_map::<serde_json::Value>().unwrap(), data);
    assert_eq!(r.read_symbol::<Mode>().unwrap(), Mode::Creative);
    assert!(r.read_tail().unwrap().is_empty());
    assert_eq!(r.last_read(), Some(FieldKind::Tail));
}

#[test]
fn envelope_comes_first_for_every_action() {
    for action in [Demo::Broadcast, Demo::CountThenName] {
        let mut w = MessageWriter::begin(sender(), "hub", action).unwrap();
        match action {
            Demo::Broadcast => {
                w.put_string("x").unwrap();
            }
            _ => {
                w.put_i32(7).unwrap().put_string("x").unwrap();
            }
        }
        let r = MessageReader::<Demo>::parse(w.finish().unwrap()).unwrap();
        assert_eq!(r.sender_id(), sender());
        assert_eq!(r.origin_server(), "hub");
        assert_eq!(r.action(), action);
        assert_eq!(r.last_read(), None);
    }
}

#[test]
fn reading_out_of_order_fails_loudly() {
    let mut w = MessageWriter::begin(sender(), "lobby-1", Demo::CountThenName).unwrap();
    w.put_i32(7).unwrap().put_string("steve").unwrap();
    let mut r = MessageReader::<Demo>::parse(w.finish().unwrap()).unwrap();

    let err = r.read_string().unwrap_err();
    assert!(matches!(
        err,
        RelayError::SchemaMismatch {
            action: "COUNT_THEN_NAME",
            position: 0,
            expected: Some(FieldKind::I32),
            found: Some(FieldKind::String),
        }
    ));
    // the failed read consumed nothing
    assert_eq!(r.read_i32().unwrap(), 7);
    assert_eq!(r.read_string().unwrap(), "steve");
    assert!(matches!(
        r.read_bool(),
        Err(RelayError::SchemaMismatch { expected: None, .. })
    ));
}

#[test]
fn writer_rejects_out_of_order_and_incomplete_messages() {
    let mut w = MessageWriter::begin(sender(), "lobby-1", Demo::CountThenName).unwrap();
    assert!(matches!(
        w.put_string("steve"),
        Err(RelayError::SchemaMismatch { position: 0, .. })
    ));
    w.put_i32(1).unwrap();
    assert!(matches!(
        w.finish(),
        Err(RelayError::SchemaMismatch {
            position: 1,
            expected: Some(FieldKind::String),
            found: None,
            ..
        })
    ));
}

#[test]
fn writer_rejects_non_object_maps() {
    let mut w = MessageWriter::begin(sender(), "lobby-1", Demo::Everything).unwrap();
    w.put_string("").unwrap().put_uuid(sender()).unwrap();
    w.put_bool(false).unwrap().put_i8(0).unwrap().put_i16(0).unwrap();
    w.put_i32(0).unwrap().put_i64(0).unwrap();
    w.put_f32(0.0).unwrap().put_f64(0.0).unwrap();
    assert!(matches!(w.put_map(&[1, 2, 3]), Err(RelayError::Encoding(_))));
}

#[test]
fn tail_before_other_fields_is_refused_on_both_sides() {
    assert!(matches!(
        MessageWriter::begin(sender(), "lobby-1", Demo::Misplaced),
        Err(RelayError::SchemaMismatch { action: "MISPLACED", .. })
    ));

    let mut w = ByteWriter::new();
    for s in [SENDER, "lobby-1", "MISPLACED"] {
        w.write_string(s).unwrap();
    }
    w.write_bytes(b"xyz");
    w.write_string("hi").unwrap();
    let err = MessageReader::<Demo>::parse(w.finish()).unwrap_err();
    assert_eq!(err.code().as_str(), "SCHEMA_MISMATCH");
}

#[test]
fn reader_rejects_non_object_maps() {
    let mut w = ByteWriter::new();
    for s in [SENDER, "lobby-1", "EVERYTHING", "", SENDER] {
        w.write_string(s).unwrap();
    }
    w.write_bool(false);
    w.write_i8(0);
    w.write_i16(0);
    w.write_i32(0);
    w.write_i64(0);
    w.write_f32(0.0);
    w.write_f64(0.0);
    w.write_string("[1,2]").unwrap();

    let mut r = MessageReader::<Demo>::parse(w.finish()).unwrap();
    r.read_string().unwrap();
    r.read_uuid().unwrap();
    r.read_bool().unwrap();
    r.read_i8().unwrap();
    r.read_i16().unwrap();
    r.read_i32().unwrap();
    r.read_i64().unwrap();
    r.read_f32().unwrap();
    r.read_f64().unwrap();
    assert!(matches!(
        r.read_map::<serde_json::Value>(),
        Err(RelayError::Encoding(_))
    ));
}

#[test]
fn truncated_field_is_reported() {
    let mut w = MessageWriter::begin(sender(), "lobby-1", Demo::CountThenName).unwrap();
    w.put_i32(7).unwrap().put_string("steve").unwrap();
    let full = w.finish().unwrap();
    let cut = full.slice(..full.len() - 2);

    let mut r = MessageReader::<Demo>::parse(cut).unwrap();
    r.read_i32().unwrap();
    assert!(matches!(r.read_string(), Err(RelayError::Truncated { .. })));
}

#[test]
fn reader_needs_the_whole_envelope() {
    let mut w = ByteWriter::new();
    w.write_string(SENDER).unwrap();
    let res = MessageReader::<Demo>::parse(w.finish());
    assert!(matches!(res, Err(RelayError::Truncated { .. })));

    assert!(MessageReader::<Demo>::parse(Bytes::new()).is_err());
}

#[test]
fn symbol_fields_resolve_leniently() {
    let mut w = ByteWriter::new();
    for s in [SENDER, "lobby-1", "Everything", "", SENDER] {
        w.write_string(s).unwrap();
    }
    w.write_bool(false);
    w.write_i8(0);
    w.write_i16(0);
    w.write_i32(0);
    w.write_i64(0);
    w.write_f32(0.0);
    w.write_f64(0.0);
    w.write_string("{}").unwrap();
    w.write_string("creative").unwrap();
    w.write_bytes(b"tail");

    let mut r = MessageReader::<Demo>::parse(w.finish()).unwrap();
    assert_eq!(r.action(), Demo::Everything);
    r.read_string().unwrap();
    r.read_uuid().unwrap();
    r.read_bool().unwrap();
    r.read_i8().unwrap();
    r.read_i16().unwrap();
    r.read_i32().unwrap();
    r.read_i64().unwrap();
    r.read_f32().unwrap();
    r.read_f64().unwrap();
    let map: BTreeMap<String, String> = r.read_map().unwrap();
    assert!(map.is_empty());
    assert_eq!(r.read_symbol::<Mode>().unwrap(), Mode::Creative);
    assert_eq!(r.read_tail().unwrap().as_ref(), b"tail");
}

#[test]
fn cached_parse_resolves_drifted_tags() {
    let cache = SymbolCache::<Demo>::new(16);
    let mut w = ByteWriter::new();
    for s in [SENDER, "lobby-1", "join server", "22222222-2222-2222-2222-222222222222", "survival"] {
        w.write_string(s).unwrap();
    }
    let bytes = w.finish();

    for _ in 0..2 {
        let mut r = MessageReader::parse_cached(bytes.clone(), &cache).unwrap();
        assert_eq!(r.action(), Demo::JoinServer);
        r.read_uuid().unwrap();
        assert_eq!(r.read_string().unwrap(), "survival");
    }
    assert_eq!(cache.len(), 1);
}

proptest! {
    #[test]
    fn primitives_round_trip(
        origin in "\\PC{0,32}",
        text in "\\PC*",
        flag in any::<bool>(),
        a in any::<i8>(),
        b in any::<i16>(),
        c in any::<i32>(),
        d in any::<i64>(),
        e in any::<f32>(),
        f in any::<f64>(),
        tail in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let player = Uuid::from_u128(d as u128);
        let mut w = MessageWriter::begin(sender(), origin.as_str(), Demo::Everything).unwrap();
        w.put_string(&text).unwrap()
            .put_uuid(player).unwrap()
            .put_bool(flag).unwrap()
            .put_i8(a).unwrap()
            .put_i16(b).unwrap()
            .put_i32(c).unwrap()
            .put_i64(d).unwrap()
            .put_f32(e).unwrap()
            .put_f64(f).unwrap()
            .put_map(&json!({ "text": text })).unwrap()
            .put_symbol(Mode::Survival).unwrap()
            .put_tail(&tail).unwrap();

        let mut r = MessageReader::<Demo>::parse(w.finish().unwrap()).unwrap();
        prop_assert_eq!(r.origin_server(), origin.as_str());
        prop_assert_eq!(r.read_string().unwrap(), text.clone());
        prop_assert_eq!(r.read_uuid().unwrap(), player);
        prop_assert_eq!(r.read_bool().unwrap(), flag);
        prop_assert_eq!(r.read_i8().unwrap(), a);
        prop_assert_eq!(r.read_i16().unwrap(), b);
        prop_assert_eq!(r.read_i32().unwrap(), c);
        prop_assert_eq!(r.read_i64().unwrap(), d);
        prop_assert_eq!(r.read_f32().unwrap().to_bits(), e.to_bits());
        prop_assert_eq!(r.read_f64().unwrap().to_bits(), f.to_bits());
        prop_assert_eq!(r.read_map::<serde_json::Value>().unwrap(), json!({ "text": text }));
        prop_assert_eq!(r.read_symbol::<Mode>().unwrap(), Mode::Survival);
        let read_tail = r.read_tail().unwrap();
        prop_assert_eq!(read_tail.as_ref(), tail.as_slice());
    }
}
