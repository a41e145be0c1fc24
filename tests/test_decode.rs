use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use struct_qs::{Config, Error, Record, Values};

fn values(pairs: &[(&str, &str)]) -> Values {
    pairs.iter().copied().collect()
}

#[test]
fn primitives() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Primitives {
        a: String,
        b: i32,
        c: u64,
        d: f64,
        e: bool,
        f: char,
        #[qs("renamed")]
        g: u8,
    }

    let decoded: Primitives = struct_qs::from_values(&values(&[
        ("a", "hello"),
        ("b", "-7"),
        ("c", "18446744073709551615"),
        ("d", "0.25"),
        ("e", "true"),
        ("f", "x"),
        ("renamed", "3"),
        ("g", "9"),
    ]))
    .unwrap();
    assert_eq!(
        decoded,
        Primitives {
            a: "hello".into(),
            b: -7,
            c: u64::MAX,
            d: 0.25,
            e: true,
            f: 'x',
            g: 3,
        }
    );
}

#[test]
fn missing_keys_keep_defaults() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Sparse {
        a: String,
        b: u32,
        c: Vec<u32>,
    }

    let decoded: Sparse = struct_qs::from_values(&Values::new()).unwrap();
    assert_eq!(decoded, Sparse::default());
}

#[test]
fn optional_fields() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Optional {
        a: Option<String>,
        b: Option<i32>,
        c: Option<Option<String>>,
        d: Option<Vec<String>>,
        e: Option<u8>,
    }

    let decoded: Optional = struct_qs::from_values(&values(&[
        ("a", "s"),
        ("b", "0"),
        ("c", "s"),
        ("d", "x"),
        ("d", "y"),
    ]))
    .unwrap();
    assert_eq!(
        decoded,
        Optional {
            a: Some("s".into()),
            b: Some(0),
            c: Some(Some("s".into())),
            d: Some(vec!["x".into(), "y".into()]),
            e: None,
        }
    );
}

#[test]
fn sequence_styles() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Styles {
        plain: Vec<String>,
        #[qs(",comma")]
        comma: Vec<u8>,
        #[qs(",space")]
        space: Vec<String>,
        #[qs(",semicolon")]
        semicolon: Vec<String>,
        #[qs(",brackets")]
        brackets: Vec<String>,
        #[qs(",numbered")]
        numbered: Vec<String>,
        #[qs(",indexed")]
        indexed: Vec<String>,
        #[qs(del = "|")]
        pipe: Vec<String>,
        #[qs(",space")]
        gaps: Vec<Option<String>>,
        #[qs(",int,comma")]
        flags: Vec<bool>,
    }

    let decoded: Styles = struct_qs::from_str(
        "plain=a&plain=b&comma=1,2&space=a+b&semicolon=a;b&brackets[]=a&brackets[]=b\
         &numbered1=b&numbered0=a&indexed[1]=b&indexed[0]=a&pipe=a|b&gaps=a++b&flags=1,0",
    )
    .unwrap();
    let ab = || vec!["a".to_string(), "b".to_string()];
    assert_eq!(
        decoded,
        Styles {
            plain: ab(),
            comma: vec![1, 2],
            space: ab(),
            semicolon: ab(),
            brackets: ab(),
            numbered: ab(),
            indexed: ab(),
            pipe: ab(),
            gaps: vec![Some("a".into()), None, Some("b".into())],
            flags: vec![true, false],
        }
    );
}

#[test]
fn empty_joined_value_is_an_empty_sequence() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Joined {
        #[qs(",comma")]
        items: Vec<String>,
    }

    let mut joined = Joined {
        items: vec!["stale".into()],
    };
    struct_qs::decode_into(&values(&[("items", "")]), &mut joined).unwrap();
    assert_eq!(joined.items, Vec::<String>::new());
}

#[test]
fn indexed_gaps_keep_defaults() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Sparse {
        #[qs(",indexed")]
        ids: Vec<u32>,
    }

    let decoded: Sparse = struct_qs::from_str("ids[2]=7&ids[0]=1").unwrap();
    assert_eq!(decoded.ids, vec![1, 0, 7]);
}

#[test]
fn indexed_reads_elements_at_the_key_found() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Padded {
        #[qs(",indexed")]
        ids: Vec<u32>,
    }

    let decoded: Padded = struct_qs::from_str("ids[01]=5&ids[0]=4&ids[002]=6").unwrap();
    assert_eq!(decoded.ids, vec![4, 5, 6]);
}

#[test]
fn numbered_skips_unrelated_keys() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Numbered {
        #[qs(",numbered")]
        ids: Vec<u32>,
    }

    let decoded: Numbered = struct_qs::from_str("ids0=1&ids=9&idsx=3&ids1=2&other0=5").unwrap();
    assert_eq!(decoded.ids, vec![1, 2]);
}

#[test]
fn arrays() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Arrays {
        plain: [String; 2],
        #[qs(",comma")]
        comma: [u8; 3],
        #[qs(",brackets")]
        brackets: [u8; 1],
    }

    let decoded: Arrays = struct_qs::from_str("plain=a&comma=1,2&brackets[]=4&brackets[]=5").unwrap();
    assert_eq!(
        decoded,
        Arrays {
            plain: ["a".into(), String::new()],
            comma: [1, 2, 0],
            brackets: [4],
        }
    );
}

#[test]
fn times() {
    #[derive(Debug, PartialEq, Record)]
    struct Times {
        rfc: DateTime<Utc>,
        #[qs(",unix")]
        unix: DateTime<Utc>,
        #[qs(",unixmilli")]
        milli: DateTime<Utc>,
        #[qs(",unixnano")]
        nano: DateTime<Utc>,
        #[qs(layout = "%Y-%m-%d")]
        day: DateTime<Utc>,
    }

    impl Default for Times {
        fn default() -> Self {
            let epoch = DateTime::<Utc>::default();
            Times {
                rfc: epoch,
                unix: epoch,
                milli: epoch,
                nano: epoch,
                day: epoch,
            }
        }
    }

    let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 34, 56).unwrap();
    let decoded: Times = struct_qs::from_values(&values(&[
        ("rfc", "2000-01-01T13:34:56+01:00"),
        ("unix", "946730096"),
        ("milli", "946730096000"),
        ("nano", "946730096000000000"),
        ("day", "2000-01-01"),
    ]))
    .unwrap();
    assert_eq!(
        decoded,
        Times {
            rfc: t,
            unix: t,
            milli: t,
            nano: t,
            day: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
        }
    );
}

#[derive(Debug, Default, PartialEq, Record)]
struct SubNested {
    value: String,
}

#[derive(Debug, Default, PartialEq, Record)]
struct Nested {
    a: SubNested,
    b: Option<SubNested>,
}

#[derive(Debug, Default, PartialEq, Record)]
struct Nest {
    nest: Nested,
}

#[test]
fn nested_records() {
    let decoded: Nest = struct_qs::from_str("nest[a][value]=v&nest[b]=stray").unwrap();
    assert_eq!(
        decoded,
        Nest {
            nest: Nested {
                a: SubNested { value: "v".into() },
                b: None,
            }
        }
    );

    let decoded: Nest = struct_qs::from_str("nest[b][value]=w").unwrap();
    assert_eq!(
        decoded.nest.b,
        Some(SubNested { value: "w".into() })
    );
}

#[derive(Debug, Default, PartialEq, Record)]
struct Inner {
    c: String,
}

#[test]
fn embedded_values_are_dealt_in_plan_order() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Outer {
        #[qs(embed)]
        inner: Inner,
        c: String,
    }

    let decoded: Outer = struct_qs::from_values(&values(&[("c", "foo")])).unwrap();
    assert_eq!(
        decoded,
        Outer {
            inner: Inner::default(),
            c: "foo".into(),
        }
    );

    let decoded: Outer = struct_qs::from_values(&values(&[("c", "foo"), ("c", "bar")])).unwrap();
    assert_eq!(
        decoded,
        Outer {
            inner: Inner { c: "bar".into() },
            c: "foo".into(),
        }
    );
}

#[test]
fn embedded_box_and_named_embed() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Outer {
        #[qs(embed)]
        boxed: Box<Inner>,
        #[qs("named", embed)]
        named: Inner,
    }

    let decoded: Outer = struct_qs::from_str("c=a&named[c]=b").unwrap();
    assert_eq!(
        decoded,
        Outer {
            boxed: Box::new(Inner { c: "a".into() }),
            named: Inner { c: "b".into() },
        }
    );
}

#[test]
fn maps() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Maps {
        strings: HashMap<String, u32>,
        ordered: IndexMap<String, String>,
        records: BTreeMap<u8, SubNested>,
    }

    let decoded: Maps = struct_qs::from_str(
        "strings[a]=1&strings[b]=2&ordered[z]=last&ordered[y]=first&records[7][value]=x",
    )
    .unwrap();
    assert_eq!(decoded.strings, HashMap::from([("a".into(), 1), ("b".into(), 2)]));
    assert_eq!(
        decoded.ordered.keys().map(String::as_str).collect::<Vec<_>>(),
        ["z", "y"]
    );
    assert_eq!(
        decoded.records,
        BTreeMap::from([(7, SubNested { value: "x".into() })])
    );
}

#[test]
fn map_key_must_parse() {
    #[derive(Debug, Default, Record)]
    struct Ids {
        ids: BTreeMap<u8, String>,
    }

    let err = struct_qs::from_str::<Ids>("ids[x]=1").unwrap_err();
    match err {
        Error::InvalidValue { key, value, .. } => {
            assert_eq!(key, "ids[x]");
            assert_eq!(value, "x");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn indexed_records() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Item {
        name: String,
        qty: u8,
    }

    #[derive(Debug, Default, PartialEq, Record)]
    struct Order {
        #[qs(",indexed")]
        items: Vec<Item>,
    }

    let decoded: Order = struct_qs::from_str("items[1][qty]=2&items[0][name]=a&items[0][qty]=1").unwrap();
    assert_eq!(
        decoded.items,
        vec![
            Item {
                name: "a".into(),
                qty: 1
            },
            Item {
                name: String::new(),
                qty: 2
            },
        ]
    );
}

#[test]
fn invalid_values() {
    #[derive(Debug, Default, Record)]
    struct Typed {
        n: i32,
        #[qs(",int")]
        b: bool,
    }

    let err = struct_qs::from_str::<Typed>("n=abc").unwrap_err();
    assert!(
        matches!(err, Error::InvalidValue { ref key, ref value, .. } if key == "n" && value == "abc"),
        "{err}"
    );

    let err = struct_qs::from_str::<Typed>("b=true").unwrap_err();
    match err {
        Error::InvalidBool {
            key,
            value,
            true_token,
            false_token,
        } => {
            assert_eq!(key, "b");
            assert_eq!(value, "true");
            assert_eq!((true_token, false_token), ("1", "0"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unset_option_target() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Target {
        a: String,
    }

    let input = values(&[("a", "x")]);
    let err = struct_qs::from_values::<Option<Target>>(&input).unwrap_err();
    assert!(matches!(err, Error::InvalidTarget { .. }), "{err}");

    let mut unset: Option<Target> = None;
    let err = struct_qs::decode_into(&input, &mut unset).unwrap_err();
    assert!(matches!(err, Error::InvalidTarget { .. }), "{err}");

    let mut set = Some(Target::default());
    struct_qs::decode_into(&input, &mut set).unwrap();
    assert_eq!(set, Some(Target { a: "x".into() }));

    let mut boxed = Box::new(Target::default());
    struct_qs::decode_into(&input, &mut boxed).unwrap();
    assert_eq!(boxed.a, "x");
}

#[test]
fn index_limit() {
    #[derive(Debug, Default, Record)]
    struct Ids {
        #[qs(",indexed")]
        ids: Vec<u32>,
        #[qs(",numbered")]
        nums: Vec<u32>,
    }

    let config = Config::new().max_index(2);
    assert!(config.decode_str::<Ids>("ids[2]=1&nums2=1").is_ok());

    for input in ["ids[3]=1", "nums3=1"] {
        let err = config.decode_str::<Ids>(input).unwrap_err();
        assert!(
            matches!(err, Error::IndexOutOfRange { index: 3, max: 2, .. }),
            "{input}: {err}"
        );
    }

    // the default limit
    assert!(struct_qs::from_str::<Ids>("ids[1000]=1").is_ok());
    assert!(struct_qs::from_str::<Ids>("ids[1001]=1").is_err());
}

#[test]
fn decode_into_is_additive() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Settings {
        name: String,
        level: u8,
        tags: Vec<String>,
    }

    let mut settings = Settings {
        name: "kept".into(),
        level: 1,
        tags: vec!["old".into()],
    };
    struct_qs::decode_into(&values(&[("level", "5")]), &mut settings).unwrap();
    assert_eq!(
        settings,
        Settings {
            name: "kept".into(),
            level: 5,
            tags: vec!["old".into()],
        }
    );
}

#[test]
fn custom_fields_are_not_decoded() {
    struct Opaque;

    impl struct_qs::EncodeValues for Opaque {
        fn encode_values(&self, key: &str, values: &mut Values) -> Result<(), struct_qs::CodecError> {
            values.set(key, "opaque");
            Ok(())
        }
    }

    #[derive(Record)]
    struct WithCustom {
        plain: String,
        #[qs(custom)]
        opaque: Opaque,
    }

    let mut target = WithCustom {
        plain: String::new(),
        opaque: Opaque,
    };
    struct_qs::decode_into(&values(&[("plain", "p"), ("opaque", "x")]), &mut target).unwrap();
    assert_eq!(target.plain, "p");
}
