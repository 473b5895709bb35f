// Spot draw engine: participant input, fixed-spot claims, the random fill,
// and the session state machine tying them together.

pub mod assign;
pub mod claims;
pub mod participant;
pub mod session;
