//! Access gate: the inbound-request authorization interceptor.
//!
//! Sits in front of every call into a protected service. Performs one
//! gateway call to the identity-validation route (except where the policy
//! exempts the call), attaches the resolved [`Identity`] to the call's
//! scope, and short-circuits the pipeline on failure. The gate never lets
//! a failure escape as anything but an [`Envelope`].

use crate::coerce::decode_item;
use crate::gateway::RequestGateway;
use serde_json::Value;
use shared_types::{Envelope, Identity, Role, Route};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Whether an inbound call only reads state or mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Read,
    Mutation,
}

/// One inbound call as seen by the gate.
#[derive(Debug, Clone)]
pub struct InboundCall {
    /// Read or mutation, for exemption policy.
    pub kind: CallKind,
    /// Operation name, for tracing.
    pub operation: &'static str,
    /// The raw credential presented by the caller, if any.
    pub credential: Option<String>,
}

impl InboundCall {
    pub fn read(operation: &'static str) -> Self {
        Self {
            kind: CallKind::Read,
            operation,
            credential: None,
        }
    }

    pub fn mutation(operation: &'static str, credential: impl Into<String>) -> Self {
        Self {
            kind: CallKind::Mutation,
            operation,
            credential: Some(credential.into()),
        }
    }

    /// Attach a credential (reads passing one through exempt services).
    #[must_use]
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }
}

/// The scope of one authorized call: explicit context threaded through the
/// pipeline instead of ambient per-call state. Dropped when the call
/// completes.
#[derive(Debug)]
pub struct CallScope {
    pub call: InboundCall,
    /// Resolved principal; `None` when the call was exempted.
    pub identity: Option<Identity>,
}

impl CallScope {
    /// The principal, when the gate resolved one.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

/// Per-service gate policy.
#[derive(Debug, Clone, Default)]
pub struct GatePolicy {
    /// Pass read-only calls through untouched, no validation call issued.
    pub exempt_reads: bool,
    /// Role required of validated callers, if any.
    pub required_role: Option<Role>,
}

impl GatePolicy {
    /// Catalog/media policy: reads pass, mutations need a seller.
    #[must_use]
    pub fn reads_exempt_seller_mutations() -> Self {
        Self {
            exempt_reads: true,
            required_role: Some(Role::Seller),
        }
    }

    /// Order policy: every call is validated, any role.
    #[must_use]
    pub fn validate_everything() -> Self {
        Self {
            exempt_reads: false,
            required_role: None,
        }
    }
}

/// Inbound-request interceptor backed by one gateway call per request.
pub struct AccessGate {
    gateway: Arc<RequestGateway>,
    /// The identity-validation route for this service.
    route: Route,
    policy: GatePolicy,
}

impl AccessGate {
    pub fn new(gateway: Arc<RequestGateway>, route: Route, policy: GatePolicy) -> Self {
        Self {
            gateway,
            route,
            policy,
        }
    }

    /// Validate one inbound call.
    ///
    /// Returns the resolved identity (`None` for exempted calls), or the
    /// short-circuit envelope to write back to the original caller. The
    /// protected handler must not run on `Err`.
    pub async fn authorize(&self, call: &InboundCall) -> Result<Option<Identity>, Envelope> {
        if self.policy.exempt_reads && call.kind == CallKind::Read {
            debug!(operation = call.operation, "Read call exempt from validation");
            return Ok(None);
        }

        let Some(credential) = call.credential.as_deref() else {
            return Err(Envelope::unauthorized("Missing credential"));
        };

        let response = self
            .gateway
            .call(&self.route, Value::String(credential.to_string()), None)
            .await;

        if response.is_error() {
            warn!(
                operation = call.operation,
                status = response.status,
                "Credential validation failed"
            );
            return Err(response.propagate());
        }

        let identity = match decode_item::<Identity>(response.data.as_ref()) {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                return Err(Envelope::bad_request(
                    "credential validation returned no identity",
                ))
            }
            Err(e) => return Err(Envelope::bad_request(e.to_string())),
        };

        if let Some(required) = self.policy.required_role {
            if identity.role != required {
                return Err(Envelope::forbidden(format!(
                    "Only users with role {required} can perform this operation."
                )));
            }
        }

        debug!(
            operation = call.operation,
            user = %identity.id,
            role = %identity.role,
            "Caller authorized"
        );
        Ok(Some(identity))
    }
}

/// Run `handler` behind the gate.
///
/// On denial the short-circuit envelope is returned and the handler is
/// never invoked; on success the handler receives the call's scope with
/// the identity attached.
pub async fn guarded<F, Fut>(gate: &AccessGate, call: InboundCall, handler: F) -> Envelope
where
    F: FnOnce(CallScope) -> Fut,
    Fut: Future<Output = Envelope>,
{
    match gate.authorize(&call).await {
        Ok(identity) => handler(CallScope { call, identity }).await,
        Err(short_circuit) => short_circuit,
    }
}
