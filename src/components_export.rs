//! Definitions-document export into an OpenAPI components document.
//!
//! Maps every named descriptor of a definitions mapping and wraps the result
//! under `components.schemas`. Entries that map to nothing (for example a
//! bare `parameter` wrapper) are skipped rather than emitted as `null`.

use std::fs;
use std::path::Path;

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::MapperError;
use crate::mapper::MapperOptions;
use crate::resolve::{ExtensionResolver, ReferenceNameNormalizer};

// ── Public API ─────────────────────────────────────────────────────────────

/// Maps each named descriptor in a definitions mapping.
pub fn map_definitions(
    definitions: &JsonMap<String, JsonValue>,
    options: &MapperOptions,
    extensions: &dyn ExtensionResolver,
    normalizer: &dyn ReferenceNameNormalizer,
) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    for (name, descriptor) in definitions {
        if let Some(mapped) = crate::map_type_with(descriptor, options, extensions, normalizer) {
            out.insert(name.clone(), mapped);
        }
    }
    out
}

/// Wraps mapped schemas as `{"components": {"schemas": ...}}`.
pub fn wrap_components(schemas: JsonMap<String, JsonValue>) -> JsonValue {
    let mut components = JsonMap::new();
    components.insert("schemas".to_string(), JsonValue::Object(schemas));

    let mut root = JsonMap::new();
    root.insert("components".to_string(), JsonValue::Object(components));
    JsonValue::Object(root)
}

/// Converts a definitions mapping into a components document string.
///
/// Set `pretty` to `true` for indented output.
pub fn to_components_document(
    definitions: &JsonMap<String, JsonValue>,
    options: &MapperOptions,
    extensions: &dyn ExtensionResolver,
    normalizer: &dyn ReferenceNameNormalizer,
    pretty: bool,
) -> Result<String, MapperError> {
    let document = wrap_components(map_definitions(definitions, options, extensions, normalizer));
    if pretty {
        serde_json::to_string_pretty(&document)
            .map_err(|e| MapperError::SerializationError(e.to_string()))
    } else {
        serde_json::to_string(&document).map_err(|e| MapperError::SerializationError(e.to_string()))
    }
}

/// Converts a JSON text holding a definitions mapping into a components
/// document string.
pub fn from_definitions_str(
    input: &str,
    options: &MapperOptions,
    extensions: &dyn ExtensionResolver,
    normalizer: &dyn ReferenceNameNormalizer,
    pretty: bool,
) -> Result<String, MapperError> {
    let root: JsonValue = serde_json::from_str(input)
        .map_err(|e| MapperError::InputError(format!("invalid JSON: {e}")))?;
    let definitions = root.as_object().ok_or_else(|| {
        MapperError::InputError("definitions document must be an object".to_string())
    })?;
    to_components_document(definitions, options, extensions, normalizer, pretty)
}

/// Converts a definitions file into a components document string.
pub fn from_definitions_path(
    path: impl AsRef<Path>,
    options: &MapperOptions,
    extensions: &dyn ExtensionResolver,
    normalizer: &dyn ReferenceNameNormalizer,
    pretty: bool,
) -> Result<String, MapperError> {
    let input = fs::read_to_string(path.as_ref()).map_err(|e| {
        MapperError::InputError(format!("failed to read '{}': {e}", path.as_ref().display()))
    })?;
    from_definitions_str(&input, options, extensions, normalizer, pretty)
}

// ── Tests ───────────────────────────────────────────────────────────────────
