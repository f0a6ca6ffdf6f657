use std::collections::HashMap;
use std::time::Duration;

/// One inbound call on the realtime channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcInvocation {
    pub request_id: String,
    pub caller_identity: String,
    /// Base64 envelope
    pub payload: String,
    pub response_timeout: Duration,
}

impl RpcInvocation {
    pub fn new(request_id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            caller_identity: String::new(),
            payload: payload.into(),
            response_timeout: Duration::from_secs(10),
        }
    }
}

/// Handles one invocation and returns the encoded response
pub type RpcHandler = Box<dyn FnMut(&RpcInvocation) -> String>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("Method '{0}' is already registered")]
    AlreadyRegistered(String),
    #[error("No handler registered for method '{0}'")]
    UnknownMethod(String),
}

/// The host's request/response primitive
pub trait RpcChannel {
    fn register_method(&mut self, method: &str, handler: RpcHandler) -> Result<(), ChannelError>;
}

/// In-process channel: invocations are delivered straight to the handler
#[derive(Default)]
pub struct LoopbackChannel {
    handlers: HashMap<String, RpcHandler>,
}

impl LoopbackChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Deliver `invocation` to the handler for `method`, as the remote peer would
    pub fn perform(
        &mut self,
        method: &str,
        invocation: &RpcInvocation,
    ) -> Result<String, ChannelError> {
        let handler = self
            .handlers
            .get_mut(method)
            .ok_or_else(|| ChannelError::UnknownMethod(method.to_string()))?;
        Ok(handler(invocation))
    }
}

impl RpcChannel for LoopbackChannel {
    fn register_method(&mut self, method: &str, handler: RpcHandler) -> Result<(), ChannelError> {
        if self.handlers.contains_key(method) {
            return Err(ChannelError::AlreadyRegistered(method.to_string()));
        }
        self.handlers.insert(method.to_string(), handler);
        Ok(())
    }
}
