//! Closed-world document parsing.
//!
//! Documents are parsed into a generic YAML mapping first, every key is
//! checked against the record's allow-list, and only then is the mapping
//! converted into its typed record. Null-valued fields are dropped before
//! conversion so they read as absent.

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use crate::validate::{ErrorKind, RecordError};

/// Parses `bytes` as a single YAML document whose root is a mapping.
///
/// An empty document (or an explicit `null`) is an empty mapping.
pub(crate) fn load_mapping(bytes: &[u8]) -> Result<Mapping, RecordError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_slice(bytes)
        .map_err(|err| RecordError::new(None, ErrorKind::Schema(err.to_string())))?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(RecordError::new(
            None,
            ErrorKind::Schema(format!(
                "document root must be a mapping, found {}",
                value_kind(&other)
            )),
        )),
    }
}

/// Rejects the first key of `mapping` that is not in `allowed`.
///
/// `prefix` is prepended to the reported field path (`files.a.ans.` for a
/// nested file entry, empty at the top level).
pub(crate) fn check_fields(
    mapping: &Mapping,
    allowed: &[&str],
    prefix: &str,
) -> Result<(), RecordError> {
    for key in mapping.keys() {
        let name = key_name(key);
        let known = key.as_str().is_some_and(|k| allowed.contains(&k));
        if !known {
            return Err(RecordError::new(
                Some(format!("{prefix}{name}")),
                ErrorKind::Schema(format!("field {name} not found in schema")),
            ));
        }
    }
    Ok(())
}

/// Checks each entry of the `files` mapping against the file allow-list.
///
/// A null entry becomes an empty file. Entries that are not mappings are
/// left for typed conversion to reject.
pub(crate) fn check_file_entries(root: &mut Mapping, allowed: &[&str]) -> Result<(), RecordError> {
    let Some(Value::Mapping(files)) = root.get_mut("files") else {
        return Ok(());
    };

    for (key, entry) in files.iter_mut() {
        if entry.is_null() {
            *entry = Value::Mapping(Mapping::new());
        }
        if let Value::Mapping(fields) = entry {
            check_fields(fields, allowed, &format!("files.{}.", key_name(key)))?;
            strip_nulls(fields);
        }
    }
    Ok(())
}

/// Removes every null-valued entry from `mapping`.
pub(crate) fn strip_nulls(mapping: &mut Mapping) {
    mapping.retain(|_, value| !value.is_null());
}

/// Converts a checked mapping into its typed record.
///
/// On a type mismatch the error names the offending field, e.g. `aliases`
/// or `social.twitter`.
pub(crate) fn into_record<T: DeserializeOwned>(mapping: Mapping) -> Result<T, RecordError> {
    match serde_yaml::from_value(Value::Mapping(mapping.clone())) {
        Ok(record) => Ok(record),
        Err(err) => {
            let field = locate_mismatch::<T>(&mapping, &[]).map(|path| path.join("."));
            Err(RecordError::new(field, ErrorKind::Schema(err.to_string())))
        }
    }
}

/// Finds the deepest key path whose value alone fails to convert into `T`.
///
/// Every record field is optional, so a document holding a single entry is
/// a valid trial: `parents` are the enclosing keys, and each entry of
/// `mapping` is tried on its own, wrapped back into those parents.
fn locate_mismatch<T: DeserializeOwned>(
    mapping: &Mapping,
    parents: &[&Value],
) -> Option<Vec<String>> {
    for (key, value) in mapping {
        let mut document = Value::Mapping(Mapping::from_iter([(key.clone(), value.clone())]));
        for parent in parents.iter().rev() {
            document = Value::Mapping(Mapping::from_iter([((*parent).clone(), document)]));
        }
        if serde_yaml::from_value::<T>(document).is_ok() {
            continue;
        }

        let mut path = parents.to_vec();
        path.push(key);
        if let Value::Mapping(nested) = value {
            if let Some(deeper) = locate_mismatch::<T>(nested, &path) {
                return Some(deeper);
            }
        }
        return Some(path.into_iter().map(key_name).collect());
    }
    None
}

fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "~".to_string(),
        other => format!("<{} key>", value_kind(other)),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_field(result: Result<(), RecordError>) -> Option<String> {
        let err = result.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Schema(_)));
        err.field
    }

    #[test]
    fn test_empty_document_is_empty_mapping() {
        assert!(load_mapping(b"").unwrap().is_empty());
        assert!(load_mapping(b"  \n").unwrap().is_empty());
        assert!(load_mapping(b"~\n").unwrap().is_empty());
    }

    #[test]
    fn test_non_mapping_root_is_rejected() {
        let err = load_mapping(b"- a\n- b\n").unwrap_err();
        assert_eq!(err.field, None);
        assert!(err.to_string().contains("sequence"));
    }

    #[test]
    fn test_malformed_yaml_is_rejected() {
        let err = load_mapping(b"name: [unclosed\n").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Schema(_)));
    }

    #[test]
    fn test_unknown_field_is_named() {
        let mapping = load_mapping(b"name: x\nnickname: y\n").unwrap();
        let field = schema_field(check_fields(&mapping, &["name"], ""));
        assert_eq!(field.as_deref(), Some("nickname"));
    }

    #[test]
    fn test_non_string_key_is_unknown() {
        let mapping = load_mapping(b"1999: x\n").unwrap();
        let field = schema_field(check_fields(&mapping, &["1999"], ""));
        assert_eq!(field.as_deref(), Some("1999"));
    }

    #[test]
    fn test_nested_file_fields() {
        let mut mapping = load_mapping(b"files:\n  a.ans:\n    font: topaz\n    size: 3\n").unwrap();
        let field = schema_field(check_file_entries(&mut mapping, &["font"]));
        assert_eq!(field.as_deref(), Some("files.a.ans.size"));
    }

    #[test]
    fn test_null_file_entry_becomes_empty() {
        let mut mapping = load_mapping(b"files:\n  a.ans:\n").unwrap();
        check_file_entries(&mut mapping, &["font"]).unwrap();
        let files = mapping.get("files").unwrap().as_mapping().unwrap();
        assert_eq!(files.get("a.ans"), Some(&Value::Mapping(Mapping::new())));
    }

    #[test]
    fn test_strip_nulls() {
        let mut mapping = load_mapping(b"name:\naliases: [a]\n").unwrap();
        strip_nulls(&mut mapping);
        assert!(!mapping.contains_key("name"));
        assert!(mapping.contains_key("aliases"));
    }

    #[derive(Debug, Default, serde::Deserialize)]
    #[serde(default)]
    #[allow(dead_code)]
    struct Sample {
        aliases: Option<Vec<String>>,
        social: Option<std::collections::BTreeMap<String, String>>,
        files: Option<std::collections::BTreeMap<String, Sample>>,
        year: i64,
    }

    fn mismatch_field(doc: &[u8]) -> Option<String> {
        let mapping = load_mapping(doc).unwrap();
        let err = into_record::<Sample>(mapping).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Schema(_)));
        err.field
    }

    #[test]
    fn test_type_mismatch_names_top_level_field() {
        assert_eq!(mismatch_field(b"year: 1996\naliases: foo\n").as_deref(), Some("aliases"));
        assert_eq!(mismatch_field(b"year: soon\n").as_deref(), Some("year"));
    }

    #[test]
    fn test_type_mismatch_names_nested_field() {
        assert_eq!(
            mismatch_field(b"social:\n  github: ok\n  twitter: [a]\n").as_deref(),
            Some("social.twitter")
        );
        assert_eq!(
            mismatch_field(b"files:\n  a.ans:\n    year: soon\n").as_deref(),
            Some("files.a.ans.year")
        );
    }
}
