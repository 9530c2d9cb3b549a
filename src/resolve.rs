//! Collaborator seams supplied by the host application.
//!
//! The mapper consumes two host services: expansion of vendor scope
//! extensions attached to xml metadata, and normalization of reference names
//! before they are emitted as `$ref` strings. Both are abstracted behind
//! traits so the host can plug in its own behavior; the bundled
//! implementations are the defaults used when it supplies none.

use serde_json::{Map as JsonMap, Value as JsonValue};

/// Expands vendor scope-extension data attached to xml metadata.
///
/// Called once per `xml` node; the returned entries are merged into the
/// emitted `xml` object and override the renamed standard fields on key
/// collision.
pub trait ExtensionResolver {
    /// Returns output key/value pairs for the given extension data, if any.
    fn resolve(&self, extensions: Option<&JsonValue>) -> JsonMap<String, JsonValue>;
}

/// [`ExtensionResolver`] that contributes nothing.
pub struct NullExtensionResolver;

impl ExtensionResolver for NullExtensionResolver {
    fn resolve(&self, _extensions: Option<&JsonValue>) -> JsonMap<String, JsonValue> {
        JsonMap::new()
    }
}

/// [`ExtensionResolver`] emitting OpenAPI specification-extension keys.
///
/// Every entry of the extension object is passed through under an `x-`
/// prefix; keys already carrying the prefix are kept as is. Non-object
/// extension data contributes nothing.
pub struct VendorExtensionResolver;

impl ExtensionResolver for VendorExtensionResolver {
    fn resolve(&self, extensions: Option<&JsonValue>) -> JsonMap<String, JsonValue> {
        let mut out = JsonMap::new();
        let Some(JsonValue::Object(entries)) = extensions else {
            return out;
        };
        for (key, value) in entries {
            let key = if key.starts_with("x-") {
                key.clone()
            } else {
                format!("x-{key}")
            };
            out.insert(key, value.clone());
        }
        out
    }
}

/// Normalizes reference names before they become `$ref` strings.
///
/// Applied in the extended reference dialect only: to in-document references
/// and to file references that carry no fragment.
pub trait ReferenceNameNormalizer {
    /// Returns the normalized form of `reference`.
    fn normalize(&self, reference: &str) -> String;
}

/// [`ReferenceNameNormalizer`] that leaves references untouched.
pub struct IdentityNormalizer;

impl ReferenceNameNormalizer for IdentityNormalizer {
    fn normalize(&self, reference: &str) -> String {
        reference.to_string()
    }
}

/// [`ReferenceNameNormalizer`] that percent-encodes spaces, which JSON
/// pointer fragments cannot carry verbatim.
pub struct EncodingNormalizer;

impl ReferenceNameNormalizer for EncodingNormalizer {
    fn normalize(&self, reference: &str) -> String {
        reference.replace(' ', "%20")
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn null_resolver_is_empty() {
        let resolved = NullExtensionResolver.resolve(Some(&json!({ "a": 1 })));
        assert!(resolved.is_empty());
    }

    #[test]
    fn vendor_resolver_prefixes_keys() {
        let extensions = json!({ "internalId": 7, "x-owner": "core" });
        let resolved = VendorExtensionResolver.resolve(Some(&extensions));
        assert_eq!(resolved.get("x-internalId"), Some(&json!(7)));
        assert_eq!(resolved.get("x-owner"), Some(&json!("core")));
    }

    #[test]
    fn vendor_resolver_ignores_non_objects() {
        assert!(VendorExtensionResolver.resolve(Some(&json!("oops"))).is_empty());
        assert!(VendorExtensionResolver.resolve(None).is_empty());
    }

    #[test]
    fn encoding_normalizer_encodes_spaces() {
        assert_eq!(
            EncodingNormalizer.normalize("pets.json#/components/My Pet"),
            "pets.json#/components/My%20Pet"
        );
        assert_eq!(IdentityNormalizer.normalize("as is"), "as is");
    }
}
