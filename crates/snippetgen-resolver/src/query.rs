//! Query string parsing into system options and named parameters.

use snippetgen_model::{OperationDescriptor, QueryOptions, QueryParameter, ScalarValue};
use tracing::warn;

use crate::walk::{coerce, infer_scalar, split_top_level};

/// Parse a raw query string.
///
/// `$`-prefixed keys map case-insensitively to system options; everything
/// else becomes a named parameter, typed by the operation when it declares
/// the parameter.
pub(crate) fn parse_query(query: &str, operation: Option<&OperationDescriptor>) -> QueryOptions {
    let mut options = QueryOptions::default();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.into_owned();
        let handled = match key.strip_prefix('$').map(str::to_ascii_lowercase).as_deref() {
            Some("select") => {
                options.select = split_list(&value);
                true
            }
            Some("expand") => {
                options.expand = split_list(&value);
                true
            }
            Some("orderby") => {
                options.orderby = split_list(&value);
                true
            }
            Some("filter") => {
                options.filter = Some(value.clone());
                true
            }
            Some("search") => {
                options.search = Some(value.clone());
                true
            }
            Some("top") => set_integer(&mut options.top, key, &value),
            Some("skip") => set_integer(&mut options.skip, key, &value),
            Some("count") => match value.to_ascii_lowercase().as_str() {
                "true" => {
                    options.count = Some(true);
                    true
                }
                "false" => {
                    options.count = Some(false);
                    true
                }
                _ => {
                    warn!(key, value = %value, "ignoring non-boolean $count");
                    false
                }
            },
            _ => false,
        };
        if handled {
            continue;
        }

        let typed = match operation.and_then(|op| op.query_parameter(key.trim_start_matches('$'))) {
            Some(declared) => coerce(ScalarValue::String(value), &declared.schema_type),
            None => infer_scalar(&value),
        };
        options.parameters.push(QueryParameter {
            name: key.to_owned(),
            value: typed,
        });
    }
    options
}

fn set_integer(slot: &mut Option<i64>, key: &str, value: &str) -> bool {
    if let Ok(n) = value.trim().parse::<i64>() {
        *slot = Some(n);
        true
    } else {
        warn!(key, value, "ignoring non-integer system option");
        false
    }
}

/// Split a comma list at parenthesis depth 0, keeping nested options verbatim.
fn split_list(value: &str) -> Vec<String> {
    split_top_level(value, ',')
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
