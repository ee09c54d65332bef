//! Stdout rendering for `--show-sources` and `--print-config`

use anyhow::{Context, Result};

use crate::config::Setting;
use crate::domain::Config;

/// One line per setting: `path = value (source)`, with the default noted when
/// it was overridden.
pub fn format_sources(settings: &[Setting]) -> String {
    let width = settings.iter().map(|s| s.path.len()).max().unwrap_or(0);

    let mut out = String::new();
    for setting in settings {
        out.push_str(&format!("{:width$} = {} ({})", setting.path, setting.value, setting.source));
        if setting.value != setting.default {
            out.push_str(&format!(" [default: {}]", setting.default));
        }
        out.push('\n');
    }
    out
}

pub fn print_sources(settings: &[Setting]) {
    print!("{}", format_sources(settings));
}

pub fn print_config(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed serializing resolved configuration")?;
    print!("{}", yaml);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{normalize_key, Source, Value};

    fn setting(path: &'static str, value: Value, source: Source, default: Value) -> Setting {
        Setting { key: normalize_key(path), path, value, source, default }
    }

    #[test]
    fn test_sources_are_aligned_and_note_overrides() {
        let text = format_sources(&[
            setting("port", Value::Integer(1), Source::Flag, Value::Integer(9000)),
            setting("child.enabled", Value::Boolean(false), Source::Default, Value::Boolean(false)),
        ]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "port          = 1 (command-line flag) [default: 9000]");
        assert_eq!(lines[1], "child.enabled = false (default)");
    }
}
