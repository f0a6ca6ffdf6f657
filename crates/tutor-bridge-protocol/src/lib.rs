/*!
 * # Remote Action Protocol
 *
 * Lets a remote agent drive the UI over a request/response channel.
 *
 * - **`schema`**: `ActionRequest`, `ActionResponse` and the closed `ActionType` taxonomy
 * - **`codec`**: the base64 envelope and the ordered decoder strategies
 * - **`params`**: typed access to the string parameter map
 * - **`registry`**: element id → capability updaters supplied by the host
 * - **`surface`**: live elements used when no capability is registered
 * - **`dispatch`**: one handler per action kind
 * - **`channel`**: the host channel boundary and an in-process loopback
 * - **`protocol`**: `RemoteActionProtocol`, codec + dispatcher behind one method
 */

pub mod channel;
pub mod codec;
pub mod dispatch;
pub mod error;
pub mod params;
pub mod protocol;
pub mod registry;
pub mod schema;
pub mod surface;

pub use channel::{ChannelError, LoopbackChannel, RpcChannel, RpcHandler, RpcInvocation};
pub use codec::{DecodeError, DecodeStrategy, EnvelopeCodec, LooseTextDecoder, SchemaDecoder};
pub use dispatch::{DispatchOutcome, Resolution, dispatch};
pub use error::ActionError;
pub use params::{Parameters, parse_bool};
pub use protocol::{DEFAULT_METHOD_NAME, RemoteActionProtocol};
pub use registry::*;
pub use schema::{ActionRequest, ActionResponse, ActionType};
pub use surface::{Element, ElementSurface, ElementTree, LiveElement, NoSurface};
