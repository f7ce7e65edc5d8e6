use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::Value;

/// Output selector sourced from the global `-o/--output` flag. `table` renders
/// through the same path as `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Gron,
    Text,
    Table,
    Raw,
}

impl OutputFormat {
    pub fn canonical(self) -> OutputFormat {
        match self {
            OutputFormat::Table => OutputFormat::Text,
            other => other,
        }
    }
}

/// What a structured response renders from: the verbatim body, its canonical
/// JSON tree, and a column view when the endpoint's shape is statically known.
/// Free-form trees carry no column view and fall back to YAML for `text`.
#[derive(Debug)]
pub struct Payload {
    pub raw: String,
    pub tree: Value,
    pub table: Option<TableView>,
}

#[derive(Debug)]
pub struct TableView {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOpts {
    pub no_headers: bool,
}

pub fn render(format: OutputFormat, payload: &Payload, opts: RenderOpts) -> Result<String> {
    match format.canonical() {
        OutputFormat::Raw => Ok(payload.raw.clone()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&payload.tree).context("failed to serialize JSON output")
        }
        OutputFormat::Yaml => to_yaml(&payload.tree),
        OutputFormat::Gron => Ok(to_gron(&payload.tree)),
        OutputFormat::Text => match &payload.table {
            Some(view) => Ok(align_table(view, opts.no_headers)),
            None => to_yaml(&payload.tree),
        },
        OutputFormat::Table => unreachable!("canonicalized above"),
    }
}

fn to_yaml(tree: &Value) -> Result<String> {
    let text = serde_yaml::to_string(tree).context("failed to serialize YAML output")?;
    Ok(text.trim_end().to_string())
}

/// Flatten a JSON document into one `path=value` assignment per leaf, in
/// depth-first key order. Keys are sorted by the underlying map, so output is
/// deterministic regardless of wire order.
pub fn to_gron(tree: &Value) -> String {
    let mut lines = Vec::new();
    flatten(String::new(), tree, &mut lines);
    lines.join("\n")
}

fn flatten(path: String, value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten(join_key(&path, key), child, out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten(format!("{path}[{index}]"), child, out);
            }
        }
        Value::Object(_) if path.is_empty() => out.push("{}".to_string()),
        Value::Array(_) if path.is_empty() => out.push("[]".to_string()),
        Value::Object(_) => out.push(format!("{path}={{}}")),
        Value::Array(_) => out.push(format!("{path}=[]")),
        leaf => {
            if path.is_empty() {
                out.push(leaf.to_string());
            } else {
                out.push(format!("{path}={leaf}"));
            }
        }
    }
}

fn join_key(path: &str, key: &str) -> String {
    if is_bare_key(key) {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        }
    } else {
        // Keys that would not survive `.`-joining get bracket-quoted.
        format!("{path}[{}]", Value::String(key.to_string()))
    }
}

fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn align_table(view: &TableView, no_headers: bool) -> String {
    let columns = view.headers.len();
    let mut widths = vec![0usize; columns];
    if !no_headers {
        for (i, header) in view.headers.iter().enumerate() {
            widths[i] = header.len();
        }
    }
    for row in &view.rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut lines = Vec::new();
    if !no_headers {
        lines.push(format_row(
            &view.headers.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
            &widths,
        ));
    }
    for row in &view.rows {
        lines.push(format_row(row, &widths));
    }
    lines.join("\n")
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        if i + 1 == cells.len() {
            line.push_str(cell);
        } else {
            line.push_str(&format!("{:<width$}", cell, width = widths[i]));
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree_payload(tree: Value) -> Payload {
        Payload {
            raw: tree.to_string(),
            tree,
            table: None,
        }
    }

    fn table_payload() -> Payload {
        Payload {
            raw: String::new(),
            tree: json!([{"name": "splicedb", "status": "Running"}]),
            table: Some(TableView {
                headers: vec!["NAME", "STATUS"],
                rows: vec![
                    vec!["splicedb".to_string(), "Running".to_string()],
                    vec!["dev".to_string(), "Paused".to_string()],
                ],
            }),
        }
    }

    // --- gron ---

    #[test]
    fn gron_nested_object_single_line() {
        assert_eq!(to_gron(&json!({"a": {"b": 1}})), "a.b=1");
    }

    #[test]
    fn gron_arrays_and_strings() {
        let out = to_gron(&json!({"a": [1, {"b": "x"}]}));
        assert_eq!(out, "a[0]=1\na[1].b=\"x\"");
    }

    #[test]
    fn gron_sorts_keys() {
        let tree: Value = serde_json::from_str(r#"{"b":1,"a":2}"#).unwrap();
        assert_eq!(to_gron(&tree), "a=2\nb=1");
    }

    #[test]
    fn gron_empty_containers() {
        assert_eq!(to_gron(&json!({"a": {}, "b": []})), "a={}\nb=[]");
    }

    #[test]
    fn gron_quotes_non_identifier_keys() {
        assert_eq!(to_gron(&json!({"weird key": 1})), "[\"weird key\"]=1");
    }

    #[test]
    fn gron_null_and_bool() {
        assert_eq!(to_gron(&json!({"a": null, "b": true})), "a=null\nb=true");
    }

    #[test]
    fn gron_root_scalar() {
        assert_eq!(to_gron(&json!(42)), "42");
    }

    // --- json / yaml ---

    #[test]
    fn json_round_trips() {
        let tree = json!({"id": 1, "name": "acct", "nested": {"list": [1, 2, 3]}});
        let payload = tree_payload(tree.clone());
        let out = render(OutputFormat::Json, &payload, RenderOpts::default()).unwrap();
        let reparsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(reparsed, tree);
    }

    #[test]
    fn yaml_contains_fields() {
        let payload = tree_payload(json!({"id": 1, "name": "acct"}));
        let out = render(OutputFormat::Yaml, &payload, RenderOpts::default()).unwrap();
        assert!(out.contains("id: 1"));
        assert!(out.contains("name: acct"));
    }

    // --- raw ---

    #[test]
    fn raw_is_byte_identical() {
        let body = "{\"x\":  1,\n \"y\": \"z\"}";
        let payload = Payload {
            raw: body.to_string(),
            tree: serde_json::from_str(body).unwrap(),
            table: None,
        };
        let out = render(OutputFormat::Raw, &payload, RenderOpts::default()).unwrap();
        assert_eq!(out, body);
    }

    // --- text / table ---

    #[test]
    fn text_aligns_columns() {
        let out = render(OutputFormat::Text, &table_payload(), RenderOpts::default()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "NAME      STATUS");
        assert_eq!(lines[1], "splicedb  Running");
        assert_eq!(lines[2], "dev       Paused");
    }

    #[test]
    fn no_headers_drops_exactly_the_header_row() {
        let with = render(OutputFormat::Text, &table_payload(), RenderOpts::default()).unwrap();
        let without = render(
            OutputFormat::Text,
            &table_payload(),
            RenderOpts { no_headers: true },
        )
        .unwrap();
        let with_lines: Vec<&str> = with.lines().collect();
        let without_lines: Vec<&str> = without.lines().collect();
        assert_eq!(without_lines.len(), with_lines.len() - 1);
        // data rows keep their order
        assert!(without_lines[0].starts_with("splicedb"));
        assert!(without_lines[1].starts_with("dev"));
    }

    #[test]
    fn table_is_synonym_of_text() {
        let text = render(OutputFormat::Text, &table_payload(), RenderOpts::default()).unwrap();
        let table = render(OutputFormat::Table, &table_payload(), RenderOpts::default()).unwrap();
        assert_eq!(text, table);
    }

    #[test]
    fn text_falls_back_to_yaml_for_trees() {
        let payload = tree_payload(json!({"spec": {"replicas": 3}}));
        let out = render(OutputFormat::Text, &payload, RenderOpts::default()).unwrap();
        assert!(out.contains("replicas: 3"));
    }
}
