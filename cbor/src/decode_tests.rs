use super::client::*;
use super::decode::*;
use super::error::*;
use super::header::MajorType;
use super::item::*;
use super::validate::*;
use alloc::{string::String, vec, vec::Vec};
use hex_literal::hex;

#[derive(Debug, PartialEq)]
enum Event {
    Item(Item, usize, usize, usize),
    End(Compound, usize, usize, usize),
    Error(usize, Error),
}

/// Records every callback, optionally stopping at the nth `item()` call.
#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
    stop_at: Option<usize>,
    items: usize,
}

impl ParseClient for Recorder {
    fn item(&mut self, item: Item, span: Span) -> Flow<'_> {
        self.events
            .push(Event::Item(item, span.header, span.value, span.end));
        self.items += 1;
        if self.stop_at == Some(self.items) {
            Flow::Stop
        } else {
            Flow::Continue(self)
        }
    }

    fn item_end(&mut self, compound: Compound, span: Span) -> Flow<'_> {
        self.events
            .push(Event::End(compound, span.header, span.value, span.end));
        Flow::Continue(self)
    }

    fn error(&mut self, position: usize, error: Error) {
        self.events.push(Event::Error(position, error));
    }
}

fn full(data: &[u8]) -> (Option<Item>, usize, String) {
    let mut client = FullParseClient::new();
    parse(data, &mut client);
    client.into_result()
}

#[test]
fn scalars() {
    assert_eq!((Some(Item::Uint(0)), 1, String::new()), full(&hex!("00")));
    assert_eq!(Some(Item::Uint(23)), full(&hex!("17")).0);
    assert_eq!(Some(Item::Uint(24)), full(&hex!("1818")).0);
    assert_eq!(Some(Item::Uint(1000)), full(&hex!("1903e8")).0);
    assert_eq!(Some(Item::Uint(1000000)), full(&hex!("1a000f4240")).0);
    assert_eq!(
        Some(Item::Uint(18446744073709551615)),
        full(&hex!("1bffffffffffffffff")).0
    );
    assert_eq!(Some(Item::Nint(-1)), full(&hex!("20")).0);
    assert_eq!(Some(Item::Nint(-10)), full(&hex!("29")).0);
    assert_eq!(Some(Item::Nint(-100)), full(&hex!("3863")).0);
    assert_eq!(Some(Item::Nint(-1000)), full(&hex!("3903e7")).0);
    assert_eq!(Some(Item::Bool(false)), full(&hex!("f4")).0);
    assert_eq!(Some(Item::Bool(true)), full(&hex!("f5")).0);
    assert_eq!(Some(Item::Null), full(&hex!("f6")).0);
    assert_eq!(Some(Item::Tstr("A".into())), full(&hex!("6141")).0);
    assert_eq!(Some(Item::Tstr("IETF".into())), full(&hex!("6449455446")).0);
    assert_eq!(Some(Item::Tstr("\u{6c34}".into())), full(&hex!("63e6b0b4")).0);
    assert_eq!(Some(Item::Tstr(String::new())), full(&hex!("60")).0);
    assert_eq!(Some(Item::Bstr(vec![])), full(&hex!("40")).0);
    assert_eq!(
        Some(Item::Bstr(hex!("01020304").to_vec())),
        full(&hex!("4401020304")).0
    );
}

#[test]
fn nint_range() {
    let (item, pos, message) = full(&hex!("3b7fffffffffffffff"));
    assert_eq!(Some(Item::Nint(i64::MIN)), item);
    assert_eq!(9, pos);
    assert!(message.is_empty());

    let (item, pos, message) = full(&hex!("3b8000000000000000"));
    assert_eq!(None, item);
    assert_eq!(0, pos);
    assert_eq!("NINT values that don't fit in int64_t are not supported.", message);

    let err = parse_item(&hex!("3bffffffffffffffff")).unwrap_err();
    assert_eq!(ErrorKind::UnsupportedEncoding, err.kind());
    assert_eq!(Error::NintOutOfRange(u64::MAX), err.error);
}

#[test]
fn compounds() {
    let (item, pos, message) = full(&hex!("820102"));
    let item = item.unwrap();
    assert_eq!(3, pos);
    assert!(message.is_empty());
    let array = item.as_array().unwrap();
    assert_eq!(2, array.len());
    assert!(array.is_complete());
    assert_eq!(Item::Uint(1), array[0]);
    assert_eq!(Item::Uint(2), array[1]);

    assert_eq!(
        Some(Item::Array(Array::default())),
        full(&hex!("80")).0
    );
    assert_eq!(Some(Item::Map(Map::new())), full(&hex!("a0")).0);

    // [1, [2, 3], [4, 5]]
    let expected: Array = [
        Item::Uint(1),
        [2, 3].into_iter().collect::<Array>().into(),
        [4, 5].into_iter().collect::<Array>().into(),
    ]
    .into_iter()
    .collect();
    assert_eq!(Some(Item::Array(expected)), full(&hex!("8301820203820405")).0);

    // {"a": 1, "b": [2, 3]}
    let (item, pos, _) = full(&hex!("a26161016162820203"));
    let item = item.unwrap();
    assert_eq!(9, pos);
    let map = item.as_map().unwrap();
    assert_eq!(2, map.len());
    assert_eq!(Some(&Item::Uint(1)), map.get_str("a"));
    assert_eq!(
        Some(&Item::Array([2, 3].into_iter().collect())),
        map.get_str("b")
    );
    assert_eq!(4, map.entries().len());

    // 1(1363896240)
    let (item, pos, _) = full(&hex!("c11a514b67b0"));
    assert_eq!(6, pos);
    assert_eq!(
        Some(Item::Semantic(Semantic::new(1, Item::Uint(1363896240)))),
        item
    );

    // 24(h'6449455446')
    let (item, _, _) = full(&hex!("d818456449455446"));
    let s = item.unwrap();
    let s = s.as_semantic().unwrap();
    assert_eq!(24, s.tag());
    assert_eq!(Some(&hex!("6449455446")[..]), s.child().unwrap().as_bstr());
}

#[test]
fn complex_nesting() {
    // {"Outer1": [{"Inner1": 99, "Inner2": h'01020803'}, "foo"], "Outer2": 10}
    let data = hex!(
        "a2664f7574657231 82a266496e6e6572 31186366496e6e65"
        "7232440102080363 666f6f664f757465 72320a"
    );
    let mut inner = Map::new();
    inner.insert("Inner1", 99);
    inner.insert("Inner2", vec![1u8, 2, 8, 3]);
    let mut outer = Map::new();
    outer.insert(
        "Outer1",
        [Item::Map(inner), "foo".into()]
            .into_iter()
            .collect::<Array>(),
    );
    outer.insert("Outer2", 10);

    let (item, pos, message) = full(&data);
    assert!(message.is_empty());
    assert_eq!(data.len(), pos);
    assert_eq!(Some(Item::Map(outer)), item);
}

#[test]
fn full_client_reuse() {
    let mut client = FullParseClient::new();

    parse(&hex!("8201"), &mut client);
    parse(&hex!("01"), &mut client);
    assert_eq!((Some(Item::Uint(1)), 1, None), client.into_parts());

    let mut client = FullParseClient::new();
    parse(&hex!("820102"), &mut client);
    assert_eq!(Outcome::Failed(0), parse(&hex!("f7"), &mut client));
    assert_eq!(
        (None, 0, Some(Error::UnsupportedSimple(23))),
        client.into_parts()
    );

    // A failure inside a compound discards the earlier result too
    let mut client = FullParseClient::new();
    parse(&hex!("01"), &mut client);
    parse(&hex!("8101f7"), &mut client);
    let (item, pos, message) = client.into_result();
    assert_eq!(None, item);
    assert_eq!(2, pos);
    assert_eq!("Unsupported simple value 23.", message);
}

#[test]
fn stream_callbacks() {
    // ["Hello", 4, [-9, "Goodbye"], 18446744073709551615]
    let data = hex!("846548656c6c6f0482286747" "6f6f64627965" "1bffffffffffffffff");
    let mut r = Recorder::default();
    assert_eq!(Outcome::Complete(data.len()), parse(&data, &mut r));

    assert_eq!(
        vec![
            Event::Item(Item::Array(Array::with_size(4)), 0, 1, 1),
            Event::Item(Item::Tstr("Hello".into()), 1, 2, 7),
            Event::Item(Item::Uint(4), 7, 8, 8),
            Event::Item(Item::Array(Array::with_size(2)), 8, 9, 9),
            Event::Item(Item::Nint(-9), 9, 10, 10),
            Event::Item(Item::Tstr("Goodbye".into()), 10, 11, 18),
            Event::End(Compound::Array(2), 8, 9, 18),
            Event::Item(Item::Uint(u64::MAX), 18, 27, 27),
            Event::End(Compound::Array(4), 0, 1, 27),
        ],
        r.events
    );
}

#[test]
fn stream_map_and_semantic() {
    // {1: 24(2)}
    let data = hex!("a101d81802");
    let mut r = Recorder::default();
    assert_eq!(Outcome::Complete(5), parse(&data, &mut r));
    assert_eq!(
        vec![
            Event::Item(Item::Map(Map::with_size(1)), 0, 1, 1),
            Event::Item(Item::Uint(1), 1, 2, 2),
            Event::Item(Item::Semantic(Semantic::with_tag(24)), 2, 4, 4),
            Event::Item(Item::Uint(2), 4, 5, 5),
            Event::End(Compound::Semantic(24), 2, 4, 5),
            Event::End(Compound::Map(1), 0, 1, 5),
        ],
        r.events
    );
}

#[test]
fn stop_halts_traversal() {
    // [1, 2, 3]: stop on the first child
    let mut r = Recorder {
        stop_at: Some(2),
        ..Default::default()
    };
    assert_eq!(Outcome::Stopped(2), parse(&hex!("83010203"), &mut r));
    assert_eq!(2, r.events.len());
    assert!(
        !r.events
            .iter()
            .any(|e| matches!(e, Event::Error(..) | Event::End(..)))
    );
}

/// Hands off to a second client after the first callback.
struct Handoff<'a> {
    next: &'a mut Recorder,
    seen: usize,
}

impl ParseClient for Handoff<'_> {
    fn item(&mut self, _item: Item, _span: Span) -> Flow<'_> {
        self.seen += 1;
        Flow::Continue(&mut *self.next)
    }

    fn item_end(&mut self, _compound: Compound, _span: Span) -> Flow<'_> {
        Flow::Continue(self)
    }

    fn error(&mut self, _position: usize, _error: Error) {}
}

#[test]
fn continue_with_another_client() {
    let mut r = Recorder::default();
    let mut h = Handoff {
        next: &mut r,
        seen: 0,
    };
    assert_eq!(Outcome::Complete(3), parse(&hex!("820102"), &mut h));
    assert_eq!(1, h.seen);
    assert_eq!(
        vec![
            Event::Item(Item::Uint(1), 1, 2, 2),
            Event::Item(Item::Uint(2), 2, 3, 3),
            Event::End(Compound::Array(2), 0, 1, 3),
        ],
        r.events
    );
}

#[test]
fn insufficient_length() {
    // 1000 with its last byte missing
    let (item, pos, message) = full(&hex!("1903"));
    assert_eq!(None, item);
    assert_eq!(0, pos);
    assert_eq!("Need 2 byte(s) for length field, have 1.", message);

    // "hello" with two bytes missing
    let (item, pos, message) = full(&hex!("6568656c"));
    assert_eq!(None, item);
    assert_eq!(0, pos);
    assert_eq!("Need 5 byte(s) for text string, have 3.", message);

    let err = parse_item(&hex!("440102")).unwrap_err();
    assert_eq!(
        Error::InsufficientLength {
            needed: 4,
            available: 2,
            context: Context::ByteString
        },
        err.error
    );
    assert_eq!(ErrorKind::InsufficientLength, err.kind());

    // A length far larger than the input must not allocate or overflow
    let err = parse_item(&hex!("5bffffffffffffffff00")).unwrap_err();
    assert_eq!(
        Error::InsufficientLength {
            needed: u64::MAX,
            available: 1,
            context: Context::ByteString
        },
        err.error
    );
}

#[test]
fn structural_mismatch() {
    let (item, pos, message) = full(&hex!("8201"));
    assert_eq!(None, item);
    assert_eq!(0, pos);
    assert_eq!("Not enough entries for array.", message);

    // [1, 2, 3, 4] truncated
    let err = parse_item(&hex!("8401020304")[..4]).unwrap_err();
    assert_eq!(Error::NotEnoughEntries(MajorType::Array), err.error);
    assert_eq!(ErrorKind::StructuralMismatch, err.kind());

    // {1: 2, 3: <missing>}
    let err = parse_item(&hex!("a2010203")).unwrap_err();
    assert_eq!(Error::NotEnoughEntries(MajorType::Map), err.error);

    let err = parse_item(&hex!("c1")).unwrap_err();
    assert_eq!(Error::NotEnoughEntries(MajorType::Semantic), err.error);

    // Huge declared sizes fail the same way once the input runs out
    let err = parse_item(&hex!("bbffffffffffffffff0102")).unwrap_err();
    assert_eq!(Error::NotEnoughEntries(MajorType::Map), err.error);
    assert_eq!(0, err.position);
}

#[test]
fn truncated_entries() {
    // [1, 2, 3, 400000] with the last byte missing
    let data = hex!("840102031a00061a80");
    let (item, pos, message) = full(&data[..data.len() - 1]);
    assert_eq!(None, item);
    assert_eq!(4, pos);
    assert_eq!("Need 4 byte(s) for length field, have 3.", message);

    // {1: 2, 300000: 4} with the last two bytes missing
    let data = hex!("a201021a000493e004");
    let (item, pos, message) = full(&data[..data.len() - 2]);
    assert_eq!(None, item);
    assert_eq!(3, pos);
    assert_eq!("Need 4 byte(s) for length field, have 3.", message);
}

#[test]
fn error_reported_once() {
    let mut r = Recorder::default();
    assert_eq!(Outcome::Failed(2), parse(&hex!("8301f7"), &mut r));
    assert_eq!(
        vec![
            Event::Item(Item::Array(Array::with_size(3)), 0, 1, 1),
            Event::Item(Item::Uint(1), 1, 2, 2),
            Event::Error(2, Error::UnsupportedSimple(23)),
        ],
        r.events
    );
}

#[test]
fn unsupported_encodings() {
    let kind = |data: &[u8]| parse_item(data).unwrap_err().error;

    assert_eq!(Error::UnsupportedSimple(23), kind(&hex!("f7")));
    assert_eq!(Error::UnsupportedSimple(16), kind(&hex!("f0")));
    assert_eq!(Error::UnsupportedSimple(255), kind(&hex!("f8ff")));
    assert_eq!(Error::UnsupportedFloat, kind(&hex!("f93c00")));
    assert_eq!(Error::UnsupportedFloat, kind(&hex!("fa47c35000")));
    assert_eq!(Error::UnsupportedFloat, kind(&hex!("fb3ff199999999999a")));
    assert_eq!(Error::IndefiniteLength, kind(&hex!("9f01ff")));
    assert_eq!(Error::IndefiniteLength, kind(&hex!("7f6161ff")));
    assert_eq!(Error::IndefiniteLength, kind(&hex!("ff")));
    assert_eq!(Error::ReservedAdditionalInfo(29), kind(&hex!("1d")));
    assert_eq!(Error::InvalidUtf8, kind(&hex!("62c328")));

    assert!(
        [
            Error::UnsupportedSimple(0),
            Error::UnsupportedFloat,
            Error::IndefiniteLength,
            Error::ReservedAdditionalInfo(28),
            Error::InvalidUtf8,
        ]
        .iter()
        .all(|e| e.kind() == ErrorKind::UnsupportedEncoding)
    );
}

#[test]
fn empty_input() {
    let (item, pos, message) = full(&[]);
    assert_eq!(None, item);
    assert_eq!(0, pos);
    assert_eq!("Need 1 byte(s) for initial byte, have 0.", message);
}

#[test]
fn max_depth() {
    let options = Options { max_depth: 2 };

    // [[1]] fits
    assert!(parse_item_with(&hex!("818101"), &options).is_ok());

    // [[[1]]] does not
    let err = parse_item_with(&hex!("81818101"), &options).unwrap_err();
    assert_eq!(Error::MaxDepth(2), err.error);
    assert_eq!(2, err.position);
    assert_eq!(ErrorKind::LimitExceeded, err.kind());

    // Tags count towards the depth too
    let err = parse_item_with(&hex!("c1c1c101"), &options).unwrap_err();
    assert_eq!(Error::MaxDepth(2), err.error);

    // Deep input is bounded by the limit, not the call stack
    let mut deep = vec![0x81u8; 100_000];
    deep.push(0x01);
    let err = parse_item(&deep).unwrap_err();
    assert_eq!(Error::MaxDepth(DEFAULT_MAX_DEPTH), err.error);
    assert_eq!(DEFAULT_MAX_DEPTH, err.position);

    // A raised limit admits deeper trees, which still drop and compare fine
    let mut deep = vec![0x81u8; 1_000];
    deep.push(0x01);
    let raised = Options { max_depth: 1_000 };
    let (item, end) = parse_item_with(&deep, &raised).unwrap();
    assert_eq!(deep.len(), end);
    assert!(item.is_complete());
    assert_eq!(item.clone(), item);

    deep.insert(0, 0x81);
    let err = parse_item_with(&deep, &raised).unwrap_err();
    assert_eq!(ParseError::new(1_000, Error::MaxDepth(1_000)), err);
}

#[test]
fn sequences() {
    // 1, "a", [2], {3: 4}
    let data = hex!("01616181 02a10304");
    let mut offset = 0;
    let mut lens = Vec::new();
    while offset < data.len() {
        let (_, len) = parse_item(&data[offset..]).unwrap();
        lens.push(len);
        offset += len;
    }
    assert_eq!(vec![1, 2, 2, 3], lens);
    assert_eq!(data.len(), offset);

    let all: Vec<Item> = items(&data).collect::<Result<_, _>>().unwrap();
    assert_eq!(
        vec![
            Item::Uint(1),
            Item::Tstr("a".into()),
            [2].into_iter().collect::<Array>().into(),
            [(3, 4)].into_iter().collect::<Map>().into(),
        ],
        all
    );

    // The error offset is relative to the whole sequence
    let mut it = items(&hex!("0102 8201"));
    assert_eq!(Some(Ok(Item::Uint(1))), it.next());
    assert_eq!(Some(Ok(Item::Uint(2))), it.next());
    assert_eq!(
        Some(Err(ParseError::new(
            2,
            Error::NotEnoughEntries(MajorType::Array)
        ))),
        it.next()
    );
    assert_eq!(None, it.next());
    assert_eq!(2, it.offset());
}

#[test]
fn validator() {
    let data = hex!("a26161016162820203");
    let summary = validate(&data, &Options::default()).unwrap();
    assert_eq!(
        Summary {
            top_level: 1,
            items: 7,
            max_depth: 2,
            end: 9,
        },
        summary
    );

    let bad = hex!("83 01 62c328 03");
    let first = validate(&bad, &Options::default());
    let second = validate(&bad, &Options::default());
    assert_eq!(first, second);
    assert_eq!(Err(ParseError::new(2, Error::InvalidUtf8)), first);

    let seq = hex!("01 8102 c060");
    let summary = validate_sequence(&seq, &Options::default()).unwrap();
    assert_eq!(3, summary.top_level);
    assert_eq!(5, summary.end);

    let err = validate_sequence(&hex!("01 8201"), &Options::default()).unwrap_err();
    assert_eq!(ParseError::new(1, Error::NotEnoughEntries(MajorType::Array)), err);
}
