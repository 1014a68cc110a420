//! Network protocol: messages, per-recipient views and framing.

pub mod codec;
pub mod messages;
pub mod views;

pub use codec::{FrameCodec, LENGTH_PREFIX_BYTES};
pub use messages::{ClientMessage, MessageKind, ServerMessage};
pub use views::{CardView, PlayerView, StatView, ZoneView};
