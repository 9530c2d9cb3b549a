pub mod components_export;
pub mod descriptor;
pub mod error;
pub mod mapper;
pub mod reference;
pub mod resolve;

use serde_json::Value as JsonValue;

pub use components_export::{
    from_definitions_path, from_definitions_str, map_definitions, to_components_document,
    wrap_components,
};
pub use descriptor::{classify, has_choice, has_ref, DescriptorKind};
pub use error::MapperError;
pub use mapper::MapperOptions;
pub use reference::ReferenceDialect;
pub use resolve::{
    EncodingNormalizer, ExtensionResolver, IdentityNormalizer, NullExtensionResolver,
    ReferenceNameNormalizer, VendorExtensionResolver,
};

use mapper::MapperContext;

/// Maps a source type descriptor into its target-dialect form using default
/// options (extended reference dialect, property-aware combinators) and the
/// bundled no-op collaborators.
///
/// Returns `None` for input the mapper has nothing to say about; it never
/// fails.
pub fn map_type(descriptor: &JsonValue) -> Option<JsonValue> {
    map_type_with_options(descriptor, &MapperOptions::default())
}

/// Maps a descriptor with explicit options and the bundled no-op
/// collaborators.
pub fn map_type_with_options(
    descriptor: &JsonValue,
    options: &MapperOptions,
) -> Option<JsonValue> {
    map_type_with(descriptor, options, &NullExtensionResolver, &IdentityNormalizer)
}

/// Maps a descriptor with explicit options and host-supplied collaborators.
pub fn map_type_with(
    descriptor: &JsonValue,
    options: &MapperOptions,
    extensions: &dyn ExtensionResolver,
    normalizer: &dyn ReferenceNameNormalizer,
) -> Option<JsonValue> {
    let ctx = MapperContext {
        options,
        extensions,
        normalizer,
    };
    mapper::map_node(descriptor, None, &ctx)
}

/// Rewrites one reference string and wraps it as `{"$ref": ...}`.
pub fn rewrite_reference(
    reference: &str,
    dialect: ReferenceDialect,
    normalizer: &dyn ReferenceNameNormalizer,
) -> JsonValue {
    reference::rewrite_ref(reference, dialect, normalizer)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{map_type, map_type_with_options, rewrite_reference, IdentityNormalizer,
        MapperOptions, ReferenceDialect};

    #[test]
    fn maps_a_nested_descriptor_end_to_end() {
        let descriptor = json!({
            "type": "object",
            "required": ["tags"],
            "properties": {
                "tags": {
                    "type": "array",
                    "items": { "type": "string", "maxLength": 64 },
                    "uniqueItems": true
                },
                "owner": { "$ref": "#model/definitions/Owner" }
            }
        });

        let mapped = map_type(&descriptor).unwrap();
        assert_eq!(mapped["properties"]["tags"]["items"]["maxLength"], json!(64));
        assert_eq!(mapped["properties"]["tags"]["uniqueItems"], json!(true));
        assert_eq!(mapped["properties"]["owner"]["$ref"], json!("#/components/Owner"));
    }

    #[test]
    fn missing_input_maps_to_nothing() {
        assert_eq!(map_type(&json!(null)), None);
    }

    #[test]
    fn dialect_selection_changes_reference_handling() {
        let descriptor = json!({ "$ref": "pets.json#/definitions/Pet" });

        let extended = map_type(&descriptor).unwrap();
        assert_eq!(extended["$ref"], json!("pets.json#/components/Pet"));

        let simple = map_type_with_options(
            &descriptor,
            &MapperOptions {
                reference_dialect: ReferenceDialect::Simple,
                ..MapperOptions::default()
            },
        )
        .unwrap();
        assert_eq!(simple["$ref"], json!("pets.json#/definitions/Pet"));
    }

    #[test]
    fn rewrite_reference_is_exposed_directly() {
        let wrapped = rewrite_reference(
            "#model/definitions/Foo",
            ReferenceDialect::Simple,
            &IdentityNormalizer,
        );
        assert_eq!(wrapped, json!({ "$ref": "#/components/Foo" }));
    }
}
