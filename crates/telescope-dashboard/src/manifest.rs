//! Cleaned YAML rendering of resource manifests.

use serde::Serialize;
use serde_json::Value;

const DROPPED_METADATA_KEYS: &[&str] = &[
    "uid",
    "resourceVersion",
    "generation",
    "creationTimestamp",
    "managedFields",
    "selfLink",
];

const DROPPED_ANNOTATIONS: &[&str] = &[
    "kubectl.kubernetes.io/last-applied-configuration",
    "argocd.argoproj.io/tracking-id",
];

/// Strip server-managed metadata noise before display.
pub fn clean_manifest(mut value: Value) -> Value {
    if let Some(metadata) = value.get_mut("metadata").and_then(Value::as_object_mut) {
        for key in DROPPED_METADATA_KEYS {
            metadata.remove(*key);
        }

        let drop_annotations = match metadata.get_mut("annotations").and_then(Value::as_object_mut)
        {
            Some(annotations) => {
                for key in DROPPED_ANNOTATIONS {
                    annotations.remove(*key);
                }
                annotations.is_empty()
            }
            None => false,
        };
        if drop_annotations {
            metadata.remove("annotations");
        }
    }
    value
}

/// Cleaned YAML for a resource; errors come back as a YAML comment so
/// the viewer always has something to show.
pub fn manifest_yaml<T: Serialize>(resource: &T) -> String {
    let value = match serde_json::to_value(resource) {
        Ok(value) => clean_manifest(value),
        Err(e) => return format!("# failed to render manifest: {e}\n"),
    };
    serde_yaml::to_string(&value).unwrap_or_else(|e| format!("# failed to render manifest: {e}\n"))
}
