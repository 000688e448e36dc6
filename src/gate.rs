use crate::config::AuthConfig;
use crate::context::{Operation, Origin};

/// Decides whether the linkage hook runs at all for a request.
///
/// The gate is pure configuration lookup: no side effects, no I/O. It is
/// consulted first so that a gated-off invocation performs zero directory
/// and store calls.
///
/// # Examples
///
/// ```
/// use policy_linkage::{AuthConfig, Operation, OperationGate, Origin};
///
/// let gate = OperationGate::new(AuthConfig::default());
///
/// // Console auth is on by default; client auth is not.
/// assert!(gate.should_run(Operation::Create, Origin::Console));
/// assert!(!gate.should_run(Operation::Create, Origin::Client));
///
/// // Reads never trigger linkage.
/// assert!(!gate.should_run(Operation::Read, Origin::Console));
/// ```
#[derive(Debug, Clone)]
pub struct OperationGate {
    config: AuthConfig,
}

impl OperationGate {
    /// Creates a gate over the given configuration.
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration the gate consults.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Returns `true` if the hook should run for this operation and origin.
    ///
    /// Rules, in order: authorization globally disabled → no. Read
    /// operation → no. Origin's plane has authorization disabled → no.
    /// Otherwise yes.
    pub fn should_run(&self, operation: Operation, origin: Origin) -> bool {
        if !self.config.auth_enabled() {
            return false;
        }
        if operation == Operation::Read {
            return false;
        }
        match origin {
            Origin::Client => self.config.client_auth_enabled,
            Origin::Console => self.config.console_auth_enabled,
        }
    }
}
