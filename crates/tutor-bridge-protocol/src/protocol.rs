use std::cell::RefCell;
use std::rc::Rc;

use crate::channel::{ChannelError, RpcChannel, RpcInvocation};
use crate::codec::{DecodeError, EnvelopeCodec};
use crate::dispatch::{DispatchOutcome, Resolution, dispatch};
use crate::registry::CapabilityRegistry;
use crate::schema::ActionResponse;
use crate::surface::ElementSurface;

pub const DEFAULT_METHOD_NAME: &str = "tutor/PerformUIAction";

/// Codec and dispatcher behind one channel method.
///
/// Requests are handled one at a time, in arrival order, to completion.
pub struct RemoteActionProtocol {
    codec: EnvelopeCodec,
    registry: CapabilityRegistry,
    surface: Box<dyn ElementSurface>,
    method_name: String,
}

impl RemoteActionProtocol {
    pub fn new(registry: CapabilityRegistry, surface: impl ElementSurface + 'static) -> Self {
        Self {
            codec: EnvelopeCodec::default(),
            registry,
            surface: Box::new(surface),
            method_name: DEFAULT_METHOD_NAME.to_string(),
        }
    }

    pub fn with_method_name(mut self, method_name: impl Into<String>) -> Self {
        self.method_name = method_name.into();
        self
    }

    pub fn with_codec(mut self, codec: EnvelopeCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn codec(&self) -> &EnvelopeCodec {
        &self.codec
    }

    /// Decode and dispatch one envelope
    pub fn handle_payload(&mut self, raw: &str) -> DispatchOutcome {
        match self.codec.decode(raw) {
            Ok(request) => dispatch(&request, &self.registry, self.surface.as_mut()),
            Err(error) => {
                match &error {
                    DecodeError::EmptyPayload => log::warn!("Received empty request payload"),
                    DecodeError::Undecodable { .. } => log::warn!("{error}"),
                }
                DispatchOutcome {
                    response: ActionResponse::failure(error.request_id(), &error),
                    resolution: Resolution::Unsupported,
                }
            }
        }
    }

    /// Channel entry point: the base64-encoded response for an invocation
    pub fn handle_invocation(&mut self, invocation: &RpcInvocation) -> String {
        log::debug!(
            "Invocation '{}' from '{}'",
            invocation.request_id,
            invocation.caller_identity
        );
        let outcome = self.handle_payload(&invocation.payload);
        self.codec.encode(&outcome.response)
    }

    /// Register the protocol's method on `channel`. A method that is already
    /// registered (reconnect) is tolerated.
    pub fn register(
        protocol: Rc<RefCell<Self>>,
        channel: &mut dyn RpcChannel,
    ) -> Result<(), ChannelError> {
        let method = protocol.borrow().method_name.clone();
        let handler = Box::new(move |invocation: &RpcInvocation| {
            protocol.borrow_mut().handle_invocation(invocation)
        });

        match channel.register_method(&method, handler) {
            Ok(()) => {
                log::info!("Registered remote action handler '{method}'");
                Ok(())
            }
            Err(ChannelError::AlreadyRegistered(method)) => {
                log::warn!("Remote action handler '{method}' already registered; keeping it");
                Ok(())
            }
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::LoopbackChannel;
    use crate::surface::NoSurface;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_payload_gets_failure_response() {
        let mut protocol = RemoteActionProtocol::new(CapabilityRegistry::new(), NoSurface);

        let outcome = protocol.handle_payload("");

        assert_eq!(
            outcome.response,
            ActionResponse {
                request_id: String::new(),
                success: false,
                message: "Error: Empty request payload.".to_string(),
            }
        );
    }

    #[test]
    fn test_reregistration_is_tolerated() {
        let protocol = Rc::new(RefCell::new(RemoteActionProtocol::new(
            CapabilityRegistry::new(),
            NoSurface,
        )));
        let mut channel = LoopbackChannel::new();

        RemoteActionProtocol::register(protocol.clone(), &mut channel).unwrap();
        let again = RemoteActionProtocol::register(protocol, &mut channel);

        assert_eq!(again, Ok(()));
        assert!(channel.is_registered(DEFAULT_METHOD_NAME));
    }
}
