//! Cross-cutting request middleware.

pub mod client_ip;
pub mod panic_recovery;
pub mod request_id;

pub use client_ip::ClientIp;
pub use request_id::{MakeRequestUuid, X_REQUEST_ID};
