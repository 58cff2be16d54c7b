//! Depth-limited rendering of structured values

use serde::Serialize;
use serde_json::Value;

use crate::options::InspectOptions;

/// Placeholder rendered when a value cannot be serialized.
pub const UNFORMATTABLE: &str = "<unformattable>";

/// Render a serializable value according to the inspect options.
///
/// Containers nested deeper than `options.depth` levels are elided as
/// `".."`; a `None` depth renders the whole value. A value whose
/// serialization fails renders as [`UNFORMATTABLE`] — inspection never
/// aborts a log call.
pub fn render<T>(value: &T, options: &InspectOptions) -> String
where
    T: Serialize + ?Sized,
{
    let Ok(mut json) = serde_json::to_value(value) else {
        return UNFORMATTABLE.to_string();
    };

    if let Some(depth) = options.depth {
        truncate(&mut json, depth);
    }

    let rendered = if options.pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };
    rendered.unwrap_or_else(|_| UNFORMATTABLE.to_string())
}

fn truncate(value: &mut Value, depth: usize) {
    match value {
        Value::Object(map) => {
            for child in map.values_mut() {
                truncate_child(child, depth);
            }
        }
        Value::Array(items) => {
            for child in items.iter_mut() {
                truncate_child(child, depth);
            }
        }
        _ => {}
    }
}

fn truncate_child(child: &mut Value, depth: usize) {
    if child.is_object() || child.is_array() {
        if depth <= 1 {
            *child = Value::String("..".to_string());
        } else {
            truncate(child, depth - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serializer;
    use serde_json::json;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refuses to serialize"))
        }
    }

    #[test]
    fn renders_compact_by_default() {
        let rendered = render(&json!({"code": 500, "ok": false}), &InspectOptions::default());
        assert!(!rendered.contains('\n'));
        assert!(rendered.contains("\"code\":500"));
    }

    #[test]
    fn pretty_spans_multiple_lines() {
        let options = InspectOptions {
            pretty: true,
            ..InspectOptions::default()
        };
        let rendered = render(&json!({"code": 500}), &options);
        assert!(rendered.contains('\n'));
    }

    #[test]
    fn elides_beyond_the_configured_depth() {
        let value = json!({"ticket": {"region": {"witel": "JAKSEL"}}});

        let shallow = render(&value, &InspectOptions { depth: Some(1), pretty: false });
        assert_eq!(shallow, r#"{"ticket":".."}"#);

        let deeper = render(&value, &InspectOptions { depth: Some(2), pretty: false });
        assert_eq!(deeper, r#"{"ticket":{"region":".."}}"#);
    }

    #[test]
    fn unbounded_keeps_everything() {
        let value = json!({"a": {"b": {"c": {"d": 1}}}});
        let rendered = render(&value, &InspectOptions::unbounded());
        assert!(rendered.contains("\"d\":1"));
    }

    #[test]
    fn truncates_inside_arrays() {
        let value = json!([{"deep": {"x": 1}}, 2]);
        let rendered = render(&value, &InspectOptions { depth: Some(1), pretty: false });
        assert_eq!(rendered, r#"["..",2]"#);
    }

    #[test]
    fn serialization_failure_is_unformattable() {
        assert_eq!(render(&Unserializable, &InspectOptions::default()), UNFORMATTABLE);
    }
}
