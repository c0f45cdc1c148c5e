use std::sync::Arc;

use mssql_adapter::prelude::*;
use serde_json::{Value as JsonValue, json};

const DOCUMENTS: &[&str] = &[
    "{}",
    r#"{"a":1}"#,
    r#"{"name":"alice","tags":["x","y"],"nested":{"deep":{"n":null}}}"#,
    r#"{"unicode":"café","float":1.5,"neg":-3}"#,
    "  {\"padded\": true}  ",
];

#[test]
fn bits_load_as_booleans() -> Result<(), LoadError> {
    let loader = TypeLoader::new();
    assert_eq!(
        loader.load(LogicalType::Boolean, &RowValues::Int(0))?,
        CanonicalValue::Bool(false)
    );
    assert_eq!(
        loader.load(LogicalType::Boolean, &RowValues::Int(1))?,
        CanonicalValue::Bool(true)
    );
    // native bits pass through the default loader
    assert_eq!(
        loader.load(LogicalType::Boolean, &RowValues::Bool(true))?,
        CanonicalValue::Bool(true)
    );
    Ok(())
}

#[test]
fn other_integers_are_not_coerced_to_booleans() -> Result<(), LoadError> {
    let loader = TypeLoader::new();
    for v in [-1, 2, 255] {
        assert_eq!(
            loader.try_load(LogicalType::Boolean, &RowValues::Int(v))?,
            LoadedValue::Passthrough
        );
        assert!(loader.load(LogicalType::Boolean, &RowValues::Int(v)).is_err());
    }
    Ok(())
}

#[test]
fn json_text_matches_independent_decode() -> Result<(), LoadError> {
    let loader = TypeLoader::new();
    for text in DOCUMENTS {
        let expected = StandardLoader.load(
            LogicalType::Map,
            &RowValues::JSON(serde_json::from_str::<JsonValue>(text)?),
        )?;
        for ty in [LogicalType::Map, LogicalType::Embedded] {
            let loaded = loader.load(ty, &RowValues::Text((*text).to_string()))?;
            assert_eq!(loaded, expected, "{ty} {text}");
        }
    }
    Ok(())
}

#[test]
fn json_text_that_is_not_an_object_is_rejected() {
    let loader = TypeLoader::new();
    for text in ["[1,2]", "42", "\"s\"", "null"] {
        assert!(
            matches!(
                loader.load(LogicalType::Map, &RowValues::Text(text.into())),
                Err(LoadError::NotAMap(_))
            ),
            "{text}"
        );
    }
}

#[test]
fn already_decoded_json_goes_through_default_loader() -> Result<(), LoadError> {
    let loader = TypeLoader::new();
    let value = RowValues::JSON(json!({"k": "v"}));
    assert_eq!(
        loader.try_load(LogicalType::Map, &value)?,
        LoadedValue::Passthrough
    );
    let loaded = loader.load(LogicalType::Map, &value)?;
    assert_eq!(loaded.as_map().and_then(|m| m.get("k")), Some(&json!("v")));
    Ok(())
}

/// Codec that refuses everything, to prove the decoder is the injected one.
struct RejectingCodec;

impl JsonCodec for RejectingCodec {
    fn decode(&self, text: &str) -> Result<JsonValue, LoadError> {
        Err(LoadError::NotAMap(format!("rejected {text}")))
    }
}

#[test]
fn codec_is_injectable() {
    let loader = TypeLoader::with_codec(RejectingCodec);
    assert!(matches!(
        loader.load(LogicalType::Map, &RowValues::Text("{}".into())),
        Err(LoadError::NotAMap(msg)) if msg == "rejected {}"
    ));
    // booleans never touch the codec
    assert!(loader.load(LogicalType::Boolean, &RowValues::Int(1)).is_ok());
}

#[test]
fn rows_load_column_by_column() -> Result<(), LoadError> {
    let mut rs = ResultSet::with_capacity(1);
    rs.set_column_names(Arc::new(vec![
        "id".into(),
        "active".into(),
        "settings".into(),
        "score".into(),
        "note".into(),
    ]));
    rs.add_row_values(vec![
        RowValues::Int(7),
        RowValues::Int(1),
        RowValues::Text(r#"{"theme":"dark"}"#.into()),
        RowValues::Int(3),
        RowValues::Null,
    ]);

    let loader = TypeLoader::new();
    let loaded = loader.load_row(
        &[
            LogicalType::Integer,
            LogicalType::Boolean,
            LogicalType::Map,
            LogicalType::Float,
        ],
        &rs.results[0],
    )?;

    assert_eq!(loaded[0], CanonicalValue::Int(7));
    assert_eq!(loaded[1], CanonicalValue::Bool(true));
    assert_eq!(
        loaded[2].as_map().and_then(|m| m.get("theme")),
        Some(&json!("dark"))
    );
    assert_eq!(loaded[3], CanonicalValue::Float(3.0));
    // untyped trailing column loads as-is
    assert_eq!(loaded[4], CanonicalValue::Null);
    Ok(())
}

#[test]
fn bad_json_aborts_the_row() {
    let row = CustomDbRow::new(
        Arc::new(vec!["active".into(), "settings".into()]),
        vec![RowValues::Int(0), RowValues::Text("{oops".into())],
    );
    let loader = TypeLoader::new();
    assert!(matches!(
        loader.load_row(&[LogicalType::Boolean, LogicalType::Embedded], &row),
        Err(LoadError::Json(_))
    ));
}
