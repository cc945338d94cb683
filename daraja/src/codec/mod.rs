//! Encoding and validation helpers shared by every operation.
//!
//! - [`clock`]: injectable wall clock and the 14-digit provider timestamp
//! - [`password`]: STK password derivation (`base64(shortcode + passkey + timestamp)`)
//! - [`validate`]: required-field checks for typed records and untyped maps

pub mod clock;
pub mod password;
pub mod validate;


pub use clock::{Clock, FixedClock, SystemClock, Timestamp, TimestampZone};
pub use password::{StkPassword, encode_password};
pub use validate::{check_keys, require_non_empty, require_positive};
