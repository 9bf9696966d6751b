//! Sandbox domain state and verifier integration

use axum::extract::FromRef;
use sandgate_auth::TokenVerifier;

use crate::gateway::RequestGateway;

/// Application state for the Sandbox domain
#[derive(Clone)]
pub struct SandboxState {
    pub verifier: TokenVerifier,
    pub gateway: RequestGateway,
}

impl FromRef<SandboxState> for TokenVerifier {
    fn from_ref(state: &SandboxState) -> Self {
        state.verifier.clone()
    }
}
