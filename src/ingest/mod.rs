//! Webhook ingestion: binary instruction decoding and request authorization.

pub mod decoder;

pub use decoder::{
    decode_create, extract_creation, CreationPayload, DecodeError, WebhookInstruction,
    WebhookTransaction, CREATE_DISCRIMINATOR, PUMP_PROGRAM_ID,
};

/// Shared-secret check for incoming webhook requests.
///
/// Constant-time comparison so response timing leaks nothing about how much
/// of the secret matched.
pub fn authorized(provided: Option<&str>, expected: &str) -> bool {
    let Some(provided) = provided else {
        return false;
    };
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
