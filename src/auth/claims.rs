use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload: the user id and the display name as it was at issue time,
/// bound together by the signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,    // user ID
    pub name: String, // display name snapshot
    pub iat: usize,   // issued at (unix timestamp)
    pub exp: usize,   // expires at (unix timestamp)
    pub iss: String,  // issuer
    pub aud: String,  // audience
}
