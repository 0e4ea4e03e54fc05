use bytes::Bytes;

use super::*;

fn bytes(s: &'static [u8]) -> Value {
    Value::Bytes(Bytes::from_static(s))
}

#[test]
fn test_decode_integer() {
    assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
    assert_eq!(decode(b"i3e").unwrap(), Value::Integer(3));
    assert_eq!(decode(b"i-3e").unwrap(), Value::Integer(-3));
    assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
}

#[test]
fn test_decode_integer_limits() {
    assert_eq!(
        decode(b"i9223372036854775807e").unwrap(),
        Value::Integer(i64::MAX)
    );
    assert_eq!(
        decode(b"i-9223372036854775808e").unwrap(),
        Value::Integer(i64::MIN)
    );
    assert!(matches!(
        decode(b"i9223372036854775808e"),
        Err(BencodeError::IntegerTooLarge(_))
    ));
    assert!(matches!(
        decode(b"i12345678901234567890e"),
        Err(BencodeError::IntegerTooLarge(_))
    ));
}

#[test]
fn test_decode_integer_invalid() {
    let inputs: [&[u8]; 9] = [
        b"i-0e",
        b"i03e",
        b"ie",
        b"i-e",
        b"i-03e",
        b"i1-2e",
        b"i12ae",
        b"i00000000000000000000001e",
        b"i-00000000000000000000001e",
    ];
    for input in inputs {
        assert!(
            matches!(decode(input), Err(BencodeError::Conversion(_))),
            "{:?} should be a conversion error",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_decode_integer_conversion_keeps_raw_token() {
    match decode(b"i12ae") {
        Err(BencodeError::Conversion(raw)) => assert_eq!(raw, "12a"),
        other => panic!("expected conversion error, got {:?}", other),
    }
}

#[test]
fn test_decode_integer_leading_zero_fails_before_digit_limit() {
    let mut decoder = Decoder::new(&b"i00000000000000000000001e"[..]);
    match decoder.decode_value() {
        Err(BencodeError::Conversion(raw)) => assert_eq!(raw, "00"),
        other => panic!("expected conversion error, got {:?}", other),
    }
    assert_eq!(decoder.position(), 3);

    match decode(b"i-00000000000000000000001e") {
        Err(BencodeError::Conversion(raw)) => assert_eq!(raw, "-0"),
        other => panic!("expected conversion error, got {:?}", other),
    }
}

#[test]
fn test_integer_digit_limit_is_configurable() {
    let config = DecoderConfig::default().with_max_integer_digits(3);
    let mut decoder = Decoder::with_config(&b"i1234e"[..], config);
    assert!(matches!(
        decoder.decode_value(),
        Err(BencodeError::IntegerTooLarge(_))
    ));

    let mut decoder = Decoder::with_config(&b"i-999e"[..], config);
    assert_eq!(decoder.decode_value().unwrap(), Value::Integer(-999));
}

#[test]
fn test_decode_bytes() {
    assert_eq!(decode(b"4:spam").unwrap(), bytes(b"spam"));
    assert_eq!(decode(b"0:").unwrap(), bytes(b""));
}

#[test]
fn test_decode_binary_bytes() {
    let data = b"4:\x00\xff\xfe\x01";
    let value = decode(data).unwrap();
    assert_eq!(value.as_bytes().map(|b| b.as_ref()), Some(&data[2..]));
    assert_eq!(value.as_str(), None);
}

#[test]
fn test_decode_bytes_leading_zero_length() {
    assert!(matches!(
        decode(b"04:spam"),
        Err(BencodeError::SyntaxError {
            position: 1,
            byte: b'4'
        })
    ));
}

#[test]
fn test_decode_bytes_bad_length_header() {
    assert!(matches!(
        decode(b"4x:spam"),
        Err(BencodeError::SyntaxError {
            position: 1,
            byte: b'x'
        })
    ));
}

#[test]
fn test_length_too_large() {
    let config = DecoderConfig::default().with_max_string_length(16);
    let input = b"5000:abc";
    let mut decoder = Decoder::with_config(&input[..], config);

    match decoder.decode_value() {
        Err(BencodeError::LengthTooLarge(len)) => assert_eq!(len, 5000),
        other => panic!("expected length error, got {:?}", other),
    }
    // Only the header and its colon were consumed.
    assert_eq!(decoder.position(), 5);
    assert_eq!(decoder.into_inner(), b"abc");
}

#[test]
fn test_length_overflowing_u64() {
    assert!(matches!(
        decode(b"99999999999999999999999:x"),
        Err(BencodeError::LengthTooLarge(u64::MAX))
    ));

    // Reading stops at the digit that overflows.
    let mut decoder = Decoder::new(&b"1000000000000000000000000:x"[..]);
    assert!(matches!(
        decoder.decode_value(),
        Err(BencodeError::LengthTooLarge(u64::MAX))
    ));
    assert_eq!(decoder.position(), 21);
}

#[test]
fn test_truncated_bytes_consume_only_available_input() {
    let config = DecoderConfig::default();
    let mut decoder = Decoder::with_config(&b"60000000:abc"[..], config);

    assert!(matches!(
        decoder.decode_value(),
        Err(BencodeError::UnexpectedEof)
    ));
    assert_eq!(decoder.position(), 12);
}

#[test]
fn test_decode_list() {
    let result = decode(b"l4:spam4:eggse").unwrap();
    assert_eq!(result, Value::List(vec![bytes(b"spam"), bytes(b"eggs")]));

    let result = decode(b"l4:spami42ee").unwrap();
    match result {
        Value::List(l) => {
            assert_eq!(l.len(), 2);
            assert_eq!(l[0], bytes(b"spam"));
            assert_eq!(l[1], Value::Integer(42));
        }
        _ => panic!("expected list"),
    }

    assert_eq!(decode(b"le").unwrap(), Value::List(vec![]));
}

#[test]
fn test_decode_dict() {
    let result = decode(b"d3:cow3:moo4:spam4:eggse").unwrap();
    match result {
        Value::Dict(d) => {
            assert_eq!(d.len(), 2);
            assert_eq!(d.get(b"cow"), Some(&bytes(b"moo")));
            assert_eq!(d.get(b"spam"), Some(&bytes(b"eggs")));
            assert!(d.is_sorted());
        }
        _ => panic!("expected dict"),
    }

    assert_eq!(decode(b"de").unwrap(), Value::Dict(Dict::new()));
}

#[test]
fn test_dict_preserves_source_order() {
    let value = decode(b"d4:spam4:eggs3:cow3:mooe").unwrap();
    let dict = value.as_dict().unwrap();
    let keys: Vec<&[u8]> = dict.keys().map(|k| k.as_ref()).collect();

    assert_eq!(keys, vec![&b"spam"[..], &b"cow"[..]]);
    assert!(!dict.is_sorted());
    assert_eq!(dict.first_unsorted_key().map(|k| k.as_ref()), Some(&b"cow"[..]));
    assert!(!value.is_canonical());
}

#[test]
fn test_dict_duplicate_keys_kept() {
    let value = decode(b"d1:ai1e1:ai2ee").unwrap();
    let dict = value.as_dict().unwrap();

    assert_eq!(dict.len(), 2);
    assert_eq!(dict.get(b"a"), Some(&Value::Integer(1)));
    assert!(!dict.is_sorted());
}

#[test]
fn test_dict_non_string_key() {
    assert!(matches!(
        decode(b"di1ei2ee"),
        Err(BencodeError::SyntaxError {
            position: 1,
            byte: b'i'
        })
    ));
}

#[test]
fn test_unknown_leading_byte() {
    assert!(matches!(
        decode(b"x"),
        Err(BencodeError::SyntaxError {
            position: 0,
            byte: b'x'
        })
    ));
    assert!(matches!(
        decode(b"l4:spamxe"),
        Err(BencodeError::SyntaxError {
            position: 7,
            byte: b'x'
        })
    ));
}

#[test]
fn test_truncated_input() {
    let valid: &[u8] = b"d3:cow3:moo4:listl4:spami42eee";
    assert!(decode(valid).is_ok());

    for end in 0..valid.len() {
        assert!(
            matches!(decode(&valid[..end]), Err(BencodeError::UnexpectedEof)),
            "prefix of length {} should hit end of input",
            end
        );
    }
}

#[test]
fn test_truncated_byte_string_body() {
    assert!(matches!(decode(b"10:short"), Err(BencodeError::UnexpectedEof)));
}

#[test]
fn test_nesting_too_deep() {
    let mut data = vec![b'l'; 100];
    data.extend(std::iter::repeat(b'e').take(100));
    assert!(matches!(decode(&data), Err(BencodeError::NestingTooDeep)));

    let config = DecoderConfig::default().with_max_depth(2);
    let mut decoder = Decoder::with_config(&b"lllleeee"[..], config);
    assert!(matches!(
        decoder.decode_value(),
        Err(BencodeError::NestingTooDeep)
    ));

    let mut decoder = Decoder::with_config(&b"llleee"[..], config);
    assert!(decoder.decode_value().is_ok());
}

#[test]
fn test_nested_structures() {
    let value = decode(b"d4:listl4:spami42ee4:nestd1:xli1eeee").unwrap();

    let list = value.get(b"list").and_then(|v| v.as_list()).unwrap();
    assert_eq!(list, &vec![bytes(b"spam"), Value::Integer(42)]);

    let nested = value.get(b"nest").and_then(|v| v.get(b"x")).unwrap();
    assert_eq!(nested, &Value::List(vec![Value::Integer(1)]));
    assert!(value.is_canonical());
}

#[test]
fn test_trailing_data_error() {
    assert!(matches!(decode(b"i42eextra"), Err(BencodeError::TrailingData)));
}

#[test]
fn test_decode_prefix_ignores_trailing_data() {
    let (value, consumed) = decode_prefix(b"i42eextra").unwrap();
    assert_eq!(value, Value::Integer(42));
    assert_eq!(consumed, 4);
}

#[test]
fn test_decode_is_deterministic() {
    let data = b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee";
    assert_eq!(decode(data).unwrap(), decode(data).unwrap());
}

#[test]
fn test_section_spans() {
    let data = b"d8:announce3:url4:infod6:lengthi100eee";
    let mut decoder = Decoder::new(&data[..]);
    decoder.decode_value().unwrap();

    let span = decoder.section_span(b"info").unwrap();
    assert_eq!(&data[span.start as usize..span.end as usize], b"d6:lengthi100ee");

    let span = decoder.section_span(b"announce").unwrap();
    assert_eq!(&data[span.start as usize..span.end as usize], b"3:url");

    assert_eq!(decoder.section_span(b"missing"), None);
}

#[test]
fn test_section_spans_only_for_root_dict() {
    let mut decoder = Decoder::new(&b"ld4:infod1:ai1eeee"[..]);
    decoder.decode_value().unwrap();
    assert_eq!(decoder.section_span(b"info"), None);
}

#[test]
fn test_decoder_reads_from_buffered_reader() {
    let data = b"d4:infod4:name4:testee".to_vec();
    let reader = std::io::BufReader::with_capacity(3, std::io::Cursor::new(data));
    let mut decoder = Decoder::new(reader);

    let value = decoder.decode_value().unwrap();
    assert_eq!(
        value.get(b"info").and_then(|v| v.get(b"name")),
        Some(&bytes(b"test"))
    );
    assert_eq!(decoder.position(), 22);
}

#[test]
fn test_value_accessors() {
    let value = Value::Integer(42);
    assert_eq!(value.as_integer(), Some(42));
    assert_eq!(value.kind(), ValueKind::Integer);
    assert!(value.as_bytes().is_none());

    let value = bytes(b"test");
    assert_eq!(value.as_str(), Some("test"));
    assert_eq!(value.kind(), ValueKind::Bytes);
    assert!(value.as_integer().is_none());

    let value = Value::List(vec![]);
    assert!(value.as_list().is_some());
    assert!(value.as_dict().is_none());

    let dict: Dict = vec![(Bytes::from_static(b"k"), Value::Integer(1))]
        .into_iter()
        .collect();
    let value = Value::from(dict);
    assert_eq!(value.kind(), ValueKind::Dict);
    assert_eq!(value.into_dict().map(|d| d.len()), Some(1));
}
