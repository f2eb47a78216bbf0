//! Pod mutation webhook handler
//!
//! Handles AdmissionReview requests for pods, routing them through the
//! mutation engine and answering with a JSON patch. The handler never
//! denies: malformed objects, non-pod objects, and pods the engine declines
//! to touch are all allowed through unchanged.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview};
use kube::core::DynamicObject;
use tracing::{debug, error, info, warn};

use k8s_openapi::api::core::v1::Pod;

use crate::mutate::mutate_pod;

use super::AppState;

/// Handle mutating admission review for pods
pub async fn mutate_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AdmissionReview<DynamicObject>>,
) -> Json<AdmissionReview<DynamicObject>> {
    // Convert review to request
    let req: AdmissionRequest<DynamicObject> = match body.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to parse admission request");
            return Json(AdmissionResponse::invalid(e.to_string()).into_review());
        }
    };

    let response = mutate_pod_request(&state, &req);
    Json(response.into_review())
}

/// Process a single pod mutation request
///
/// The admission object is narrowed to a pod here, at the boundary; the
/// mutation engine only ever sees pod-shaped values.
fn mutate_pod_request(
    state: &AppState,
    request: &AdmissionRequest<DynamicObject>,
) -> AdmissionResponse {
    let uid = &request.uid;

    if request.kind.kind != "Pod" {
        debug!(uid = %uid, kind = %request.kind.kind, "Not a pod, allowing unchanged");
        return AdmissionResponse::from(request);
    }

    let obj = match &request.object {
        Some(obj) => obj,
        None => {
            debug!(uid = %uid, "No object in request, allowing unchanged");
            return AdmissionResponse::from(request);
        }
    };

    let mut pod: Pod = match serde_json::to_value(obj).and_then(serde_json::from_value) {
        Ok(pod) => pod,
        Err(e) => {
            warn!(uid = %uid, error = %e, "Object does not decode as a pod, allowing unchanged");
            return AdmissionResponse::from(request);
        }
    };

    let before = match serde_json::to_value(&pod) {
        Ok(value) => value,
        Err(e) => {
            error!(uid = %uid, error = %e, "Failed to serialize pod, allowing unchanged");
            return AdmissionResponse::from(request);
        }
    };

    if !mutate_pod(&mut pod, &state.berglas_image) {
        debug!(uid = %uid, pod = ?pod.metadata.name, "No injection performed, allowing unchanged");
        return AdmissionResponse::from(request);
    }

    let after = match serde_json::to_value(&pod) {
        Ok(value) => value,
        Err(e) => {
            error!(uid = %uid, error = %e, "Failed to serialize mutated pod, allowing unchanged");
            return AdmissionResponse::from(request);
        }
    };

    let patch = json_patch::diff(&before, &after);

    info!(
        uid = %uid,
        pod = ?pod.metadata.name,
        patch_ops = patch.0.len(),
        "Applying berglas injection patch"
    );

    match AdmissionResponse::from(request).with_patch(patch) {
        Ok(response) => response,
        Err(e) => {
            // Never deny: a patch we cannot serialize means the pod ships
            // without injection, not that it fails admission
            error!(uid = %uid, error = %e, "Failed to serialize patch, allowing unchanged");
            AdmissionResponse::from(request)
        }
    }
}
