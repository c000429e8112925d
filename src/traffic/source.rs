use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

pub const STDIN_PATH: &str = "-";

pub fn read_document(path: &Path) -> Result<Value> {
    let raw = if path.as_os_str() == STDIN_PATH {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read JSON from stdin")?;
        raw
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Reads every input in order and joins them into one snapshot sequence.
///
/// A single input is returned untouched; with several, arrays are spliced and
/// anything else is appended as one element. No inputs means stdin.
pub fn read_snapshot_sequence(paths: &[PathBuf]) -> Result<Value> {
    match paths {
        [] => read_document(Path::new(STDIN_PATH)),
        [path] => read_document(path),
        paths => {
            let mut sequence = Vec::new();
            for path in paths {
                append_document(&mut sequence, read_document(path)?);
            }
            Ok(Value::Array(sequence))
        }
    }
}

fn append_document(sequence: &mut Vec<Value>, document: Value) {
    match document {
        Value::Array(items) => sequence.extend(items),
        other => sequence.push(other),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("flowgraph-source-test");
        std::fs::create_dir_all(&dir).expect("create test dir");
        let path = dir.join(name);
        std::fs::write(&path, content).expect("write test file");
        path
    }

    #[test]
    fn joins_objects_and_arrays_in_order() {
        let first = temp_file("first.json", r#"{"nodes": [], "edges": [], "tag": 1}"#);
        let second = temp_file("second.json", r#"[{"tag": 2}, {"tag": 3}]"#);

        let sequence = read_snapshot_sequence(&[first, second]).unwrap();
        let tags = sequence
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["tag"].clone())
            .collect::<Vec<_>>();
        assert_eq!(tags, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn single_input_is_returned_as_is() {
        let path = temp_file("single.json", r#"{"nodes": "not a list"}"#);
        assert_eq!(
            read_snapshot_sequence(&[path]).unwrap(),
            json!({"nodes": "not a list"})
        );
    }

    #[test]
    fn invalid_json_names_the_file() {
        let path = temp_file("broken.json", "{nodes");
        let error = read_document(&path).unwrap_err();
        assert!(format!("{error:#}").contains("broken.json"));
    }
}
