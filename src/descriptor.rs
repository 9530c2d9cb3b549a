//! Descriptor classification and field-presence probes.
//!
//! Source descriptors carry no explicit discriminant: the node kind is
//! inferred from which fields are present. The inference happens once, up
//! front, and everything downstream dispatches on the resulting
//! [`DescriptorKind`]. Input that fits no kind falls back to `Primitive`.

use serde_json::Value as JsonValue;

/// Combinator keywords, in emission order.
pub(crate) const CHOICE_KEYS: &[&str] = &["allOf", "anyOf", "oneOf", "not"];

/// Node kind of a source type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    /// Carries a truthy `$ref`; every other field on the node is ignored.
    Ref,
    Array,
    Object,
    /// Wrapper around a single-entry `properties` mapping; the wrapper itself
    /// never appears in the output.
    Parameter,
    /// Everything else, including nodes with no `type` at all.
    Primitive,
}

/// Classifies a descriptor by field presence.
///
/// A `type` given as a sequence collapses to its first element for
/// classification purposes, mirroring the mapper's first-element rule.
pub fn classify(descriptor: &JsonValue) -> DescriptorKind {
    if has_ref(descriptor) {
        return DescriptorKind::Ref;
    }

    let mut type_value = descriptor.get("type");
    while let Some(JsonValue::Array(kinds)) = type_value {
        type_value = kinds.first();
    }

    match type_value.and_then(JsonValue::as_str) {
        Some("array") => DescriptorKind::Array,
        Some("object") => DescriptorKind::Object,
        Some("parameter") => DescriptorKind::Parameter,
        _ => DescriptorKind::Primitive,
    }
}

/// True iff the descriptor carries a truthy `$ref`.
pub fn has_ref(descriptor: &JsonValue) -> bool {
    descriptor.get("$ref").map(is_truthy).unwrap_or(false)
}

/// True iff any combinator keyword (`allOf`, `anyOf`, `oneOf`, `not`) is
/// present with a truthy value. Callers use this to decide whether a node
/// needs combinator-aware handling before mapping it.
pub fn has_choice(descriptor: &JsonValue) -> bool {
    CHOICE_KEYS
        .iter()
        .any(|key| descriptor.get(*key).map(is_truthy).unwrap_or(false))
}

/// Truthiness as the source dialect defines it: `null`, `false`, zero, and
/// the empty string are falsy; arrays and objects are always truthy, even
/// when empty.
pub(crate) fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ref_wins_over_type() {
        let descriptor = json!({ "$ref": "#model/definitions/Foo", "type": "object" });
        assert_eq!(classify(&descriptor), DescriptorKind::Ref);
    }

    #[test]
    fn empty_ref_is_ignored() {
        let descriptor = json!({ "$ref": "", "type": "array" });
        assert_eq!(classify(&descriptor), DescriptorKind::Array);
        assert!(!has_ref(&descriptor));
    }

    #[test]
    fn known_types_classify() {
        assert_eq!(classify(&json!({ "type": "array" })), DescriptorKind::Array);
        assert_eq!(classify(&json!({ "type": "object" })), DescriptorKind::Object);
        assert_eq!(
            classify(&json!({ "type": "parameter" })),
            DescriptorKind::Parameter
        );
        assert_eq!(
            classify(&json!({ "type": "string" })),
            DescriptorKind::Primitive
        );
    }

    #[test]
    fn missing_or_odd_type_defaults_to_primitive() {
        assert_eq!(classify(&json!({})), DescriptorKind::Primitive);
        assert_eq!(classify(&json!({ "type": 7 })), DescriptorKind::Primitive);
        assert_eq!(classify(&json!("loose string")), DescriptorKind::Primitive);
    }

    #[test]
    fn type_sequence_classifies_by_first_entry() {
        assert_eq!(
            classify(&json!({ "type": ["object", "string"] })),
            DescriptorKind::Object
        );
        assert_eq!(
            classify(&json!({ "type": [["array"], "string"] })),
            DescriptorKind::Array
        );
        assert_eq!(classify(&json!({ "type": [] })), DescriptorKind::Primitive);
    }

    #[test]
    fn has_choice_requires_a_truthy_combinator() {
        assert!(has_choice(&json!({ "allOf": [] })));
        assert!(has_choice(&json!({ "not": { "type": "string" } })));
        assert!(!has_choice(&json!({ "oneOf": null })));
        assert!(!has_choice(&json!({ "type": "object" })));
    }

    #[test]
    fn truthiness_follows_the_source_dialect() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(0.5)));
    }
}
