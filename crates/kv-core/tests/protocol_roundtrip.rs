//! Integration tests for the kv-core message codec.
//!
//! These tests drive the encoder and the parser through the public API only,
//! checking the exact wire text for each payload arity and that whatever the
//! writer produces is read back unchanged by the parser.

use kv_core::{
    decode_message, encode_message, CharSink, FieldBuffer, KvMessage, KvPair, KvParser, KvWriter,
    Payload, ReservedKey,
};

/// Writes `msg` through a [`KvWriter`] and parses it back.
fn roundtrip(msg: KvMessage<'_>) -> KvPair {
    let mut writer = KvWriter::new(Vec::new());
    writer.send(&msg);
    let bytes = writer.into_inner();
    KvParser::new(bytes.as_slice())
        .next_message()
        .expect("parser must recover the message")
}

#[test]
fn test_encode_each_payload_arity() {
    let cases: &[(KvMessage<'_>, &str)] = &[
        (KvMessage::new("hello", "99"), "{{hello;99}}\r\n"),
        (KvMessage::new("hello", 99_i64), "{{hello;99}}\r\n"),
        (KvMessage::new("hello", (99_i64, 19_i64)), "{{hello;99;19}}\r\n"),
        (KvMessage::new("hello", ("hey", 99_i64)), "{{hello;hey;99}}\r\n"),
        (
            KvMessage::new("hello", ("hey", 1_i64, 99_i64)),
            "{{hello;hey;1;99}}\r\n",
        ),
    ];

    for (msg, expected) in cases {
        assert_eq!(encode_message(msg), *expected, "encoding {msg:?}");
    }
}

#[test]
fn test_roundtrip_text_payload() {
    let decoded = roundtrip(KvMessage::new("device_greetings", "Hello from the device!"));

    assert_eq!(decoded, KvPair::new("device_greetings", "Hello from the device!"));
}

#[test]
fn test_roundtrip_reserved_keys() {
    for key in ReservedKey::ALL {
        let decoded = roundtrip(KvMessage::new(key.as_str(), "1"));
        assert_eq!(decoded.key, key.as_str());
        assert_eq!(ReservedKey::try_from(decoded.key.as_str()), Ok(key));
    }
}

#[test]
fn test_multi_field_payload_is_not_a_key_value_message() {
    // The parser only recognizes `{{key;value}}`; a third field breaks the
    // match and the rest of the line is skipped as noise.
    let text = encode_message(&KvMessage::new("__testcase_finish", ("case 1", 3_i64, 0_i64)));

    assert_eq!(decode_message(&text), None);
    assert_eq!(
        decode_message(&format!("{text}{{{{next;ok}}}}\r\n")),
        Some(KvPair::new("next", "ok"))
    );
}

#[test]
fn test_roundtrip_negative_integer() {
    let decoded = roundtrip(KvMessage::new("delta", Payload::Int(-1234)));
    assert_eq!(decoded.value, "-1234");
}

#[test]
fn test_messages_interleaved_with_log_output() {
    // Arrange – log lines written straight to the same sink as the messages
    let mut writer = KvWriter::new(Vec::new());
    writer.sink_mut().write_str("[boot] starting (rev 42)\r\n");
    writer.send_str("first", "a");
    writer.sink_mut().write_str("heap: 1024 bytes free\r\n");
    writer.send_int("second", 2);
    let stream = writer.into_inner();

    // Act
    let mut parser = KvParser::new(stream.as_slice());

    // Assert
    assert_eq!(parser.next_message(), Some(KvPair::new("first", "a")));
    assert_eq!(parser.next_message(), Some(KvPair::new("second", "2")));
    assert_eq!(parser.next_message(), None);
}

#[test]
fn test_caller_sized_buffers_receive_truncated_fields() {
    let mut parser = KvParser::new(&b"{{__sync;0dad4a9d-59a3-4aec-810d-d5fb09d852c1}}\n"[..]);
    let mut key = FieldBuffer::new(8);
    let mut value = FieldBuffer::new(9);

    assert!(parser.parse_kv(&mut key, &mut value));
    assert_eq!(key, "__sync");
    assert_eq!(value, "0dad4a9d");
    assert!(value.is_truncated());
}

#[test]
fn test_decode_returns_none_without_a_message() {
    assert_eq!(decode_message(""), None);
    assert_eq!(decode_message("plain log line\r\n"), None);
    assert_eq!(decode_message("{{unterminated;value"), None);
}
