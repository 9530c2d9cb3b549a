//! `$ref` rewriting from the source pointer grammar into the OpenAPI
//! components grammar.
//!
//! Two grammar generations exist side by side. The simple dialect knows only
//! flat single-file documents: in-document references move from
//! `#model/definitions` to `#/components` and everything else passes through
//! untouched. The extended dialect adds cross-file references with a richer
//! path/response addressing scheme and routes in-document and fragment-less
//! references through the host's name normalizer. References are rewritten,
//! never dereferenced, so cyclic targets are harmless.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::resolve::ReferenceNameNormalizer;

/// Reference grammar generation understood by the rewriter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceDialect {
    /// Flat single-file grammar: only in-document references are rewritten.
    Simple,
    /// Multi-file grammar with path/response addressing.
    Extended,
}

/// Rewrites a source reference and wraps the result as `{"$ref": ...}`.
pub fn rewrite_ref(
    reference: &str,
    dialect: ReferenceDialect,
    normalizer: &dyn ReferenceNameNormalizer,
) -> JsonValue {
    let target = match dialect {
        ReferenceDialect::Simple => rewrite_simple(reference),
        ReferenceDialect::Extended => rewrite_extended(reference, normalizer),
    };
    ref_object(target)
}

fn ref_object(target: String) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("$ref".to_string(), JsonValue::String(target));
    JsonValue::Object(out)
}

fn rewrite_simple(reference: &str) -> String {
    if reference.starts_with('#') {
        reference.replacen("#model/definitions", "#/components", 1)
    } else {
        reference.to_string()
    }
}

fn rewrite_extended(reference: &str, normalizer: &dyn ReferenceNameNormalizer) -> String {
    if reference.starts_with('#') {
        let rewritten = reference.replacen("#model/definitions", "#/components", 1);
        return normalizer.normalize(&rewritten);
    }

    let Some((file, fragment)) = reference.split_once("#/") else {
        return normalizer.normalize(reference);
    };
    if fragment.is_empty() {
        return normalizer.normalize(reference);
    }

    // References may walk through nested property names; those segments do
    // not exist in the target grammar.
    let stripped = fragment.replace("/properties", "");
    let segments: Vec<&str> = stripped.split('/').collect();

    if segments[0] == "definitions" {
        return format!("{file}#/components/{}", segments[1..].join("/"));
    }

    if segments.get(3).copied() != Some("response") {
        return format!("{file}#/paths/{}", segments.join("/"));
    }

    // <bucket>/<request>/<name>/response/<item...> becomes
    // <bucket>/<request>/responses/<name>/<item...>.
    let mut path: Vec<&str> = segments[..2].to_vec();
    path.push("responses");
    path.push(segments[2]);
    path.extend(&segments[4..]);
    format!("{file}#/paths/{}", path.join("/"))
}

// ── Tests ───────────────────────────────────────────────────────────────────
