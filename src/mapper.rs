//! Type-descriptor mapping into OpenAPI Components-style schema objects.
//!
//! The mapper is a pure recursive rewrite: it walks a source descriptor tree
//! and emits a freshly built target tree, renaming and reshaping a fixed set
//! of fields along the way. References are rewritten but never dereferenced.
//! Malformed input degrades to partial or empty output; nothing in this
//! module returns an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::descriptor::{classify, is_truthy, DescriptorKind, CHOICE_KEYS};
use crate::reference::{rewrite_ref, ReferenceDialect};
use crate::resolve::{ExtensionResolver, ReferenceNameNormalizer};

/// Behavior switches covering the differences between the two source
/// grammar generations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MapperOptions {
    /// Reference grammar used when rewriting `$ref` strings.
    pub reference_dialect: ReferenceDialect,
    /// When enabled, a combinator branch carrying `properties[<key>]` for
    /// the property currently being mapped contributes that nested
    /// descriptor instead of the branch itself.
    pub property_aware_combinators: bool,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            reference_dialect: ReferenceDialect::Extended,
            property_aware_combinators: true,
        }
    }
}

/// Immutable state threaded through one mapping traversal.
pub(crate) struct MapperContext<'a> {
    pub options: &'a MapperOptions,
    pub extensions: &'a dyn ExtensionResolver,
    pub normalizer: &'a dyn ReferenceNameNormalizer,
}

// ── Dispatch ────────────────────────────────────────────────────────────────

/// Maps one descriptor node. `property_key` is the name of the property the
/// node sits under, when it sits under one; combinator branches use it for
/// the property-aware lookup.
pub(crate) fn map_node(
    descriptor: &JsonValue,
    property_key: Option<&str>,
    ctx: &MapperContext<'_>,
) -> Option<JsonValue> {
    if !is_truthy(descriptor) {
        return None;
    }

    // A type sequence collapses to its first entry; later entries are
    // silently dropped and the property key does not survive the collapse.
    if let Some(JsonValue::Array(kinds)) = descriptor.get("type") {
        let mut collapsed = descriptor.as_object().cloned().unwrap_or_default();
        match kinds.first() {
            Some(first) => collapsed.insert("type".to_string(), first.clone()),
            None => collapsed.remove("type"),
        };
        return map_node(&JsonValue::Object(collapsed), None, ctx);
    }

    match classify(descriptor) {
        DescriptorKind::Ref => Some(map_ref(descriptor, ctx)),
        DescriptorKind::Array => Some(map_array(descriptor, property_key, ctx)),
        DescriptorKind::Object => Some(map_object(descriptor, property_key, ctx)),
        DescriptorKind::Parameter => map_parameter(descriptor, ctx),
        DescriptorKind::Primitive => Some(map_primitive(descriptor, ctx)),
    }
}

fn map_ref(descriptor: &JsonValue, ctx: &MapperContext<'_>) -> JsonValue {
    match descriptor.get("$ref") {
        Some(JsonValue::String(reference)) => {
            rewrite_ref(reference, ctx.options.reference_dialect, ctx.normalizer)
        }
        // A truthy non-string reference cannot be rewritten; pass it through.
        other => {
            let mut out = JsonMap::new();
            out.insert(
                "$ref".to_string(),
                other.cloned().unwrap_or(JsonValue::Null),
            );
            JsonValue::Object(out)
        }
    }
}

// ── Array nodes ─────────────────────────────────────────────────────────────

fn map_array(
    descriptor: &JsonValue,
    property_key: Option<&str>,
    ctx: &MapperContext<'_>,
) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("type".to_string(), JsonValue::String("array".to_string()));
    out.insert(
        "items".to_string(),
        map_array_items(descriptor.get("items"), ctx),
    );
    copy_fields(descriptor, &mut out, &["collectionFormat", "minItems", "maxItems"]);
    copy_if_truthy(descriptor, &mut out, "uniqueItems");
    copy_fields(descriptor, &mut out, &["nullable", "discriminator", "readOnly"]);
    insert_xml(descriptor, &mut out, ctx);
    merge_choices(descriptor, property_key, &mut out, ctx);
    JsonValue::Object(out)
}

/// The `items` key is always present on an array node; a missing or
/// unmappable item yields an empty schema. A sequence of items collapses to
/// its first entry.
fn map_array_items(items: Option<&JsonValue>, ctx: &MapperContext<'_>) -> JsonValue {
    let mapped = match items {
        Some(JsonValue::Array(entries)) => {
            entries.first().and_then(|entry| map_node(entry, None, ctx))
        }
        Some(single) => map_node(single, None, ctx),
        None => None,
    };
    mapped.unwrap_or_else(|| JsonValue::Object(JsonMap::new()))
}

// ── Object nodes ────────────────────────────────────────────────────────────

fn map_object(
    descriptor: &JsonValue,
    property_key: Option<&str>,
    ctx: &MapperContext<'_>,
) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("type".to_string(), JsonValue::String("object".to_string()));
    copy_if_truthy(descriptor, &mut out, "description");
    insert_required(descriptor, &mut out);
    insert_object_properties(descriptor.get("properties"), &mut out, ctx);
    copy_fields(descriptor, &mut out, &["minProperties", "maxProperties"]);
    insert_additional_properties(descriptor, &mut out);
    copy_fields(descriptor, &mut out, &["nullable", "discriminator", "readOnly"]);
    insert_example(descriptor, &mut out);
    insert_xml(descriptor, &mut out, ctx);
    merge_choices(descriptor, property_key, &mut out, ctx);
    JsonValue::Object(out)
}

/// `required` is omitted when absent, falsy, or an empty sequence.
fn insert_required(descriptor: &JsonValue, out: &mut JsonMap<String, JsonValue>) {
    match descriptor.get("required") {
        Some(JsonValue::Array(names)) if names.is_empty() => {}
        Some(value) if is_truthy(value) => {
            out.insert("required".to_string(), value.clone());
        }
        _ => {}
    }
}

/// `properties` is omitted when the source field is absent or falsy; an
/// empty source mapping emits an empty mapping. Each property value is
/// mapped with its own name as the property key.
fn insert_object_properties(
    properties: Option<&JsonValue>,
    out: &mut JsonMap<String, JsonValue>,
    ctx: &MapperContext<'_>,
) {
    let Some(properties) = properties else { return };
    if !is_truthy(properties) {
        return;
    }

    let mut mapped = JsonMap::new();
    if let Some(entries) = properties.as_object() {
        for (name, child) in entries {
            if let Some(value) = map_node(child, Some(name), ctx) {
                mapped.insert(name.clone(), value);
            }
        }
    }
    out.insert("properties".to_string(), JsonValue::Object(mapped));
}

/// `additionalProperties` is governed by the companion
/// `additionalPropControl` field. Absent control omits the output field;
/// `"Boolean"` control passes the literal value through, dropping falsy
/// values (an explicit `false` included); any other control emits an object
/// of `additionalPropertiesObjectType`, with
/// `additionalPropertiesIntegerFormat` attached for integers.
fn insert_additional_properties(descriptor: &JsonValue, out: &mut JsonMap<String, JsonValue>) {
    let control = match descriptor.get("additionalPropControl") {
        Some(value) if is_truthy(value) => value,
        _ => return,
    };

    if control.as_str() == Some("Boolean") {
        if let Some(value) = descriptor.get("additionalProperties") {
            if is_truthy(value) {
                out.insert("additionalProperties".to_string(), value.clone());
            }
        }
        return;
    }

    let mut object = JsonMap::new();
    if let Some(object_type) = descriptor.get("additionalPropertiesObjectType") {
        object.insert("type".to_string(), object_type.clone());
        if object_type.as_str() == Some("integer") {
            if let Some(format) = descriptor.get("additionalPropertiesIntegerFormat") {
                object.insert("format".to_string(), format.clone());
            }
        }
    }
    out.insert("additionalProperties".to_string(), JsonValue::Object(object));
}

// ── Parameter nodes ─────────────────────────────────────────────────────────

/// A parameter wraps a single-entry `properties` mapping; the wrapper is
/// discarded and the first entry (in insertion order) is mapped in its
/// place. No entry means no output.
fn map_parameter(descriptor: &JsonValue, ctx: &MapperContext<'_>) -> Option<JsonValue> {
    let properties = descriptor.get("properties")?.as_object()?;
    let (_, first) = properties.iter().next()?;
    map_node(first, None, ctx)
}

// ── Primitive nodes ─────────────────────────────────────────────────────────

fn map_primitive(descriptor: &JsonValue, ctx: &MapperContext<'_>) -> JsonValue {
    let mut out = JsonMap::new();
    copy_fields(descriptor, &mut out, &["type"]);
    insert_format(descriptor, &mut out);
    copy_fields(
        descriptor,
        &mut out,
        &[
            "description",
            "exclusiveMinimum",
            "exclusiveMaximum",
            "minimum",
            "maximum",
            "enum",
            "pattern",
            "default",
            "minLength",
            "maxLength",
            "multipleOf",
        ],
    );
    insert_xml(descriptor, &mut out, ctx);
    insert_example(descriptor, &mut out);
    copy_if_truthy(descriptor, &mut out, "nullable");
    JsonValue::Object(out)
}

/// `format` falls back to the legacy `mode` field when absent or falsy.
fn insert_format(descriptor: &JsonValue, out: &mut JsonMap<String, JsonValue>) {
    let format = descriptor.get("format").filter(|value| is_truthy(value));
    let value = match format {
        Some(format) => Some(format),
        None => descriptor.get("mode"),
    };
    if let Some(value) = value {
        out.insert("format".to_string(), value.clone());
    }
}

// ── Combinators ─────────────────────────────────────────────────────────────

/// Maps each combinator keyword present on the node and merges the results
/// into the output. Truthy sequences are mapped element-wise (an element
/// that maps to nothing becomes `null`); `not` is mapped as a single branch
/// and omitted when it maps to nothing; anything else present passes
/// through untouched.
fn merge_choices(
    descriptor: &JsonValue,
    property_key: Option<&str>,
    out: &mut JsonMap<String, JsonValue>,
    ctx: &MapperContext<'_>,
) {
    for key in CHOICE_KEYS {
        let Some(choice) = descriptor.get(*key) else {
            continue;
        };
        if !is_truthy(choice) {
            out.insert((*key).to_string(), choice.clone());
            continue;
        }
        if *key == "not" {
            if let Some(mapped) = map_choice(choice, property_key, ctx) {
                out.insert((*key).to_string(), mapped);
            }
            continue;
        }
        match choice {
            JsonValue::Array(branches) => {
                let mapped: Vec<JsonValue> = branches
                    .iter()
                    .map(|branch| {
                        map_choice(branch, property_key, ctx).unwrap_or(JsonValue::Null)
                    })
                    .collect();
                out.insert((*key).to_string(), JsonValue::Array(mapped));
            }
            other => {
                out.insert((*key).to_string(), other.clone());
            }
        }
    }
}

/// Maps one combinator branch. With property-aware combinators enabled and a
/// property key at hand, a branch carrying `properties[<key>]` contributes
/// that nested descriptor instead of itself. The key never propagates into
/// the recursive call.
fn map_choice(
    branch: &JsonValue,
    property_key: Option<&str>,
    ctx: &MapperContext<'_>,
) -> Option<JsonValue> {
    if ctx.options.property_aware_combinators {
        if let Some(key) = property_key {
            if let Some(nested) = branch.get("properties").and_then(|p| p.get(key)) {
                if is_truthy(nested) {
                    return map_node(nested, None, ctx);
                }
            }
        }
    }
    map_node(branch, None, ctx)
}

// ── xml and shared helpers ──────────────────────────────────────────────────

fn insert_xml(descriptor: &JsonValue, out: &mut JsonMap<String, JsonValue>, ctx: &MapperContext<'_>) {
    if let Some(xml) = map_xml(descriptor.get("xml"), ctx) {
        out.insert("xml".to_string(), xml);
    }
}

/// Renames the vendor xml fields to their target names and merges whatever
/// the extension resolver produces for `scopesExtensions`.
fn map_xml(xml: Option<&JsonValue>, ctx: &MapperContext<'_>) -> Option<JsonValue> {
    let xml = xml?;
    if !is_truthy(xml) {
        return None;
    }

    let mut out = JsonMap::new();
    for (source_key, target_key) in [
        ("xmlName", "name"),
        ("xmlNamespace", "namespace"),
        ("xmlPrefix", "prefix"),
        ("xmlAttribute", "attribute"),
        ("xmlWrapped", "wrapped"),
    ] {
        if let Some(value) = xml.get(source_key) {
            out.insert(target_key.to_string(), value.clone());
        }
    }
    for (key, value) in ctx.extensions.resolve(xml.get("scopesExtensions")) {
        out.insert(key, value);
    }
    Some(JsonValue::Object(out))
}

fn insert_example(descriptor: &JsonValue, out: &mut JsonMap<String, JsonValue>) {
    if let Some(example) = parse_example(descriptor.get("sample")) {
        out.insert("example".to_string(), example);
    }
}

/// `sample` carries an example as JSON text; text that fails to parse is
/// passed through verbatim, as are non-string samples.
fn parse_example(sample: Option<&JsonValue>) -> Option<JsonValue> {
    let sample = sample?;
    match sample {
        JsonValue::String(text) => {
            Some(serde_json::from_str(text).unwrap_or_else(|_| sample.clone()))
        }
        other => Some(other.clone()),
    }
}

/// Copies each listed field through when present, `null` and `false`
/// included.
fn copy_fields(source: &JsonValue, out: &mut JsonMap<String, JsonValue>, keys: &[&str]) {
    for key in keys {
        if let Some(value) = source.get(*key) {
            out.insert((*key).to_string(), value.clone());
        }
    }
}

/// Copies a field through only when its value is truthy.
fn copy_if_truthy(source: &JsonValue, out: &mut JsonMap<String, JsonValue>, key: &str) {
    if let Some(value) = source.get(key) {
        if is_truthy(value) {
            out.insert(key.to_string(), value.clone());
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
