//! OData annotation pre-pass.
//!
//! Runs over one JSON object before the schema walk sees it, so the walker
//! never compares member names against annotation spellings:
//!
//! - `@odata.type` is lifted out as the derived-type override
//! - `@odata.id` becomes an odata-id member
//! - `name@odata.bind` members are routed to additional data
//! - every other annotation is dropped

use serde_json::{Map, Value};
use tracing::debug;

const ODATA_TYPE: &str = "@odata.type";
const ODATA_ID: &str = "@odata.id";
const BIND_SUFFIX: &str = "@odata.bind";

/// A member surviving the pre-pass.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Member {
    /// A plain property, looked up in the schema.
    Property(String, Value),
    /// The `@odata.id` reference.
    ODataId(String),
    /// A `name@odata.bind` member, kept under its original name.
    Bind(String, Value),
}

/// An object with its annotations separated out.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Annotated {
    /// Derived type named by `@odata.type`, leading `#` stripped.
    pub odata_type: Option<String>,
    /// Remaining members in source order.
    pub members: Vec<Member>,
}

/// Separate annotations from plain members.
pub(crate) fn separate(object: Map<String, Value>) -> Annotated {
    let mut annotated = Annotated::default();
    for (name, value) in object {
        if name == ODATA_TYPE {
            if let Value::String(ty) = value {
                annotated.odata_type = Some(ty.trim_start_matches('#').to_owned());
            }
        } else if name == ODATA_ID {
            let id = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            annotated.members.push(Member::ODataId(id));
        } else if name.ends_with(BIND_SUFFIX) {
            annotated.members.push(Member::Bind(name, value));
        } else if name.contains('@') {
            debug!(member = %name, "dropping annotation");
        } else {
            annotated.members.push(Member::Property(name, value));
        }
    }
    annotated
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_should_lift_odata_type() {
        let annotated = separate(object(json!({
            "@odata.type": "#microsoft.graph.fileAttachment",
            "name": "a.txt"
        })));
        assert_eq!(annotated.odata_type.as_deref(), Some("microsoft.graph.fileAttachment"));
        assert_eq!(
            annotated.members,
            vec![Member::Property("name".to_owned(), json!("a.txt"))]
        );
    }

    #[test]
    fn test_should_route_ids_and_binds() {
        let annotated = separate(object(json!({
            "@odata.id": "https://graph.microsoft.com/v1.0/users/1",
            "members@odata.bind": ["https://graph.microsoft.com/v1.0/users/2"],
            "displayName": "Group"
        })));
        assert_eq!(annotated.members.len(), 3);
        assert!(matches!(&annotated.members[0], Member::ODataId(id) if id.ends_with("/users/1")));
        assert!(matches!(&annotated.members[1], Member::Bind(name, _) if name == "members@odata.bind"));
        assert!(matches!(&annotated.members[2], Member::Property(name, _) if name == "displayName"));
    }

    #[test]
    fn test_should_drop_other_annotations() {
        let annotated = separate(object(json!({
            "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users/$entity",
            "@odata.etag": "W/\"1\"",
            "photo@odata.mediaContentType": "image/png",
            "contentBytes@odata.type": "#Binary",
            "id": "1"
        })));
        assert!(annotated.odata_type.is_none());
        assert_eq!(
            annotated.members,
            vec![Member::Property("id".to_owned(), json!("1"))]
        );
    }
}
