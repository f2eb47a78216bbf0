//! Container rewriting
//!
//! Routes a reference-bearing container's invocation through the berglas
//! binary: the declared command and args become `berglas exec --local --`
//! arguments, and the shared binary volume is mounted read-only. Berglas
//! resolves the references at startup and execs the original invocation with
//! the resolved environment merged in.

use k8s_openapi::api::core::v1::Container;
use tracing::warn;

use super::{bin_volume_mount, reference::has_berglas_references};
use crate::{BERGLAS_EXEC_ARGS, BIN_VOLUME_MOUNT_PATH, BIN_VOLUME_NAME};

/// Rewrite a container to exec through the berglas binary
///
/// Returns the rewritten copy, or `None` when the container is left
/// untouched: either it carries no berglas references, or it declares no
/// command to wrap. The latter is recoverable - berglas prepends the command
/// from the pod spec, and a container relying on its image ENTRYPOINT has
/// nothing to prepend - so it is reported as a warning, never an error.
pub fn rewrite_container(container: &Container) -> Option<Container> {
    if !has_berglas_references(container.env.as_deref().unwrap_or_default()) {
        return None;
    }

    // This is the command in the pod spec, not a CMD or ENTRYPOINT in a
    // Dockerfile.
    let command = match container.command.as_ref().filter(|c| !c.is_empty()) {
        Some(command) => command,
        None => {
            warn!(
                container = %container.name,
                "cannot apply berglas: container spec does not define a command"
            );
            return None;
        }
    };

    let mut original = command.clone();
    original.extend(container.args.clone().unwrap_or_default());

    let mut rewritten = container.clone();
    rewritten.command = Some(vec![format!("{}berglas", BIN_VOLUME_MOUNT_PATH)]);

    let mut args: Vec<String> = BERGLAS_EXEC_ARGS.iter().map(|s| s.to_string()).collect();
    args.extend(original);
    rewritten.args = Some(args);

    // Mount the shared binary volume, at most once
    let mounts = rewritten.volume_mounts.get_or_insert_with(Vec::new);
    if !mounts.iter().any(|m| m.name == BIN_VOLUME_NAME) {
        mounts.push(bin_volume_mount());
    }

    Some(rewritten)
}
