pub mod adapter;
pub mod bridge;

pub use adapter::VkAdapter;
pub use bridge::{BridgeRequest, BridgeTransport, CallbackBridge, JsonpTransport};
