//! Pod mutation engine
//!
//! Scans every init container and regular container of a pod for berglas
//! references, rewrites the ones that carry them, and - if anything was
//! rewritten - injects the shared binary volume plus an init container that
//! populates it before anything else runs.
//!
//! The engine never denies admission. Every precondition failure degrades to
//! leaving the affected container (or the whole pod) unmodified.

pub mod container;
pub mod reference;

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{
    Container, EmptyDirVolumeSource, Pod, Volume, VolumeMount,
};
use tracing::debug;

use crate::{
    BIN_INIT_CONTAINER_NAME, BIN_VOLUME_MOUNT_PATH, BIN_VOLUME_NAME, INJECTED_ANNOTATION,
    INJECT_ANNOTATION,
};

pub use container::rewrite_container;
pub use reference::{has_berglas_references, is_reference};

/// Mutate a pod in place, injecting berglas into reference-bearing containers
///
/// Returns whether the pod was mutated. Admission is never denied; a pod
/// without references, an opted-out pod, and an already-injected pod all come
/// back untouched with `false`.
///
/// When at least one container is rewritten:
/// - a provisioning init container is prepended, so the berglas binary exists
///   in the shared volume before any other init container or regular
///   container execs it (init containers run sequentially in declared order)
/// - the shared in-memory volume is appended to the pod's volumes
/// - the [`INJECTED_ANNOTATION`] marker is set to `"true"`
pub fn mutate_pod(pod: &mut Pod, berglas_image: &str) -> bool {
    if injection_disabled(pod) {
        debug!(pod = ?pod.metadata.name, "injection disabled by annotation, leaving pod unchanged");
        return false;
    }

    // Admission retries re-deliver pods this webhook already rewrote;
    // re-processing one would stack a second init container and volume.
    if already_injected(pod) {
        debug!(pod = ?pod.metadata.name, "pod already injected, leaving unchanged");
        return false;
    }

    let Some(spec) = pod.spec.as_mut() else {
        return false;
    };

    let mut mutated = false;

    if let Some(init_containers) = spec.init_containers.as_ref() {
        let (rewritten, changed) = rewrite_sequence(init_containers);
        if changed {
            spec.init_containers = Some(rewritten);
            mutated = true;
        }
    }

    let (rewritten, changed) = rewrite_sequence(&spec.containers);
    if changed {
        spec.containers = rewritten;
        mutated = true;
    }

    if mutated {
        spec.init_containers
            .get_or_insert_with(Vec::new)
            .insert(0, bin_init_container(berglas_image));
        spec.volumes.get_or_insert_with(Vec::new).push(bin_volume());
        pod.metadata
            .annotations
            .get_or_insert_with(BTreeMap::new)
            .insert(INJECTED_ANNOTATION.to_string(), "true".to_string());
    }

    mutated
}

/// Rewrite an ordered container sequence, preserving declared order
///
/// Builds a new sequence rather than mutating in place while iterating, so
/// untouched containers are carried over verbatim.
fn rewrite_sequence(containers: &[Container]) -> (Vec<Container>, bool) {
    let mut mutated = false;
    let rewritten = containers
        .iter()
        .map(|c| match rewrite_container(c) {
            Some(rewritten) => {
                mutated = true;
                rewritten
            }
            None => c.clone(),
        })
        .collect();
    (rewritten, mutated)
}

fn injection_disabled(pod: &Pod) -> bool {
    pod.metadata
        .annotations
        .as_ref()
        .and_then(|a| a.get(INJECT_ANNOTATION))
        .is_some_and(|v| v == "false")
}

fn already_injected(pod: &Pod) -> bool {
    pod.metadata
        .annotations
        .as_ref()
        .and_then(|a| a.get(INJECTED_ANNOTATION))
        .is_some_and(|v| v == "true")
}

/// The shared in-memory volume where the berglas binary lives
///
/// Memory-backed so the binary never touches node disk and vanishes with the
/// pod.
pub fn bin_volume() -> Volume {
    Volume {
        name: BIN_VOLUME_NAME.to_string(),
        empty_dir: Some(EmptyDirVolumeSource {
            medium: Some("Memory".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// The shared read-only volume mount where rewritten containers find berglas
pub fn bin_volume_mount() -> VolumeMount {
    VolumeMount {
        name: BIN_VOLUME_NAME.to_string(),
        mount_path: BIN_VOLUME_MOUNT_PATH.to_string(),
        read_only: Some(true),
        ..Default::default()
    }
}

/// The init container that copies the berglas binary into the shared volume
///
/// Prepended to the init-container sequence so it runs strictly before every
/// other container that may exec the binary. Its mount is writable, unlike
/// the one given to rewritten containers.
pub fn bin_init_container(berglas_image: &str) -> Container {
    Container {
        name: BIN_INIT_CONTAINER_NAME.to_string(),
        image: Some(berglas_image.to_string()),
        image_pull_policy: Some("IfNotPresent".to_string()),
        command: Some(vec![
            "sh".to_string(),
            "-c".to_string(),
            format!("cp /bin/berglas {}", BIN_VOLUME_MOUNT_PATH),
        ]),
        volume_mounts: Some(vec![VolumeMount {
            name: BIN_VOLUME_NAME.to_string(),
            mount_path: BIN_VOLUME_MOUNT_PATH.to_string(),
            ..Default::default()
        }]),
        ..Default::default()
    }
}
