//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Tables come from
//! the caller, structured formats use serde, plain emits one key value
//! per line.

use std::io::{self, IsTerminal, Write};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable items in the chosen format.
///
/// - `table`: calls `table_fn` with the whole list
/// - `json` / `json-compact` / `yaml`: serializes the data via serde
/// - `plain`: calls `id_fn` on each item to emit one key per line
pub fn render_list<T>(
    format: OutputFormat,
    data: &[T],
    table_fn: impl FnOnce(&[T]) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(table_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl FnOnce(&T) -> String,
    id_fn: impl FnOnce(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render {
        message: e.to_string(),
    })
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render {
        message: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        name: &'static str,
        port: u16,
    }

    const ITEMS: [Item; 2] = [
        Item {
            name: "ssh",
            port: 22,
        },
        Item {
            name: "web",
            port: 443,
        },
    ];

    #[test]
    fn plain_emits_one_key_per_line() {
        let out = render_list(OutputFormat::Plain, &ITEMS, |_| unreachable!(), |i| {
            i.name.to_owned()
        })
        .unwrap();
        assert_eq!(out, "ssh\nweb");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_list(OutputFormat::JsonCompact, &ITEMS, |_| String::new(), |_| {
            String::new()
        })
        .unwrap();
        assert_eq!(out, r#"[{"name":"ssh","port":22},{"name":"web","port":443}]"#);
    }

    #[test]
    fn table_defers_to_caller() {
        let out = render_list(OutputFormat::Table, &ITEMS, |items| format!("{} rows", items.len()), |_| {
            String::new()
        })
        .unwrap();
        assert_eq!(out, "2 rows");
    }

    #[test]
    fn yaml_single() {
        let out = render_single(OutputFormat::Yaml, &ITEMS[0], |_| String::new(), |_| String::new())
            .unwrap();
        assert_eq!(out, "name: ssh\nport: 22\n");
    }

    #[test]
    fn explicit_color_modes() {
        assert!(should_color(ColorMode::Always));
        assert!(!should_color(ColorMode::Never));
    }
}
