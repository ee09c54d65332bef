//! Command-line flags derived from the schema

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches};

use super::coerce::{RawValue, ValueKind};
use super::env::env_var_name;
use super::schema::{ConfigSchema, FieldSpec};

/// One clap argument per schema field, identified by the field's path.
///
/// Values stay as text here; coercion happens during resolution so a bad
/// `--port` is a decode error rather than a flag parse error.
pub fn schema_args(schema: &ConfigSchema, env_prefix: &str) -> Vec<Arg> {
    schema.fields().iter().map(|field| field_arg(field, env_prefix)).collect()
}

fn field_arg(field: &FieldSpec, env_prefix: &str) -> Arg {
    let help = format!("{} [env: {}]", field.description, env_var_name(env_prefix, field));
    let mut arg = Arg::new(field.path).long(field.flag_name()).help(help);

    if let Some(short) = field.short {
        arg = arg.short(short);
    }

    arg = match field.kind {
        ValueKind::String => arg.value_name("STRING").action(ArgAction::Set),
        ValueKind::Integer => arg.value_name("INT").allow_negative_numbers(true).action(ArgAction::Set),
        ValueKind::Boolean => arg
            .value_name("BOOL")
            .num_args(0..=1)
            .default_missing_value("true")
            .action(ArgAction::Set),
        ValueKind::StringList => arg.value_name("LIST").value_delimiter(',').action(ArgAction::Append),
    };

    let default = field.default.to_flag_text();
    if !default.is_empty() {
        arg = arg.default_value(default);
    }
    arg
}

/// The flags the user actually typed, as `(flag name, raw value)`.
///
/// Values clap filled in from defaults are left out; defaults belong to the
/// lowest layer.
pub fn explicit_flags(schema: &ConfigSchema, matches: &ArgMatches) -> Vec<(String, RawValue)> {
    let mut flags = Vec::new();

    for field in schema.fields() {
        if matches.value_source(field.path) != Some(ValueSource::CommandLine) {
            continue;
        }

        let raw = match field.kind {
            ValueKind::StringList => RawValue::List(
                matches.get_many::<String>(field.path).map(|v| v.cloned().collect()).unwrap_or_default(),
            ),
            _ => match matches.get_one::<String>(field.path) {
                Some(value) => RawValue::Text(value.clone()),
                None => continue,
            },
        };
        flags.push((field.flag_name(), raw));
    }

    flags
}
