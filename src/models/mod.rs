pub mod participant;
pub mod room;
pub mod user;

pub use participant::{dedup_by_user, Participant};
pub use room::{generate_room_id, Room};
pub use user::{Identity, StreamClaims, TokenRequest, TokenResponse};
