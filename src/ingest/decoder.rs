//! Fixed-layout decoder for pump.fun create instructions.
//!
//! Layout after the 8-byte discriminator: three u32-length-prefixed UTF-8
//! strings (name, symbol, uri), a 32-byte creator identity, and a trailing
//! relaxed-validation flag byte. Pure parse: bytes in, typed record or typed
//! failure out, so tests can feed hand-built fixtures straight through to
//! the scorer.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;
use tracing::trace;

use crate::types::LaunchEvent;

/// Anchor discriminator of the pump.fun `create` instruction.
pub const CREATE_DISCRIMINATOR: [u8; 8] = [24, 30, 200, 40, 5, 28, 7, 119];

/// The pump.fun bonding-curve program.
pub const PUMP_PROGRAM_ID: &str = "6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P";

const CREATOR_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload too short: {0} bytes")]
    TooShort(usize),
    #[error("not a create instruction")]
    WrongDiscriminator,
    #[error("string length {0} exceeds remaining payload")]
    LengthOutOfBounds(u32),
    #[error("{0} field is not valid UTF-8")]
    InvalidUtf8(&'static str),
    #[error("instruction data is not valid base64")]
    InvalidBase64,
    #[error("instruction has no accounts")]
    MissingMintAccount,
}

/// Decoded body of one create instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationPayload {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    /// 32-byte creator identity, hex-encoded
    pub creator_hex: String,
    pub is_mayhem: bool,
}

/// Decode the instruction body (discriminator included).
pub fn decode_create(data: &[u8]) -> Result<CreationPayload, DecodeError> {
    if data.len() < 8 {
        return Err(DecodeError::TooShort(data.len()));
    }
    if data[0..8] != CREATE_DISCRIMINATOR {
        return Err(DecodeError::WrongDiscriminator);
    }

    let mut cursor = Cursor {
        data,
        position: 8,
    };
    let name = cursor.read_string("name")?;
    let symbol = cursor.read_string("symbol")?;
    let uri = cursor.read_string("uri")?;
    let creator = cursor.read_bytes(CREATOR_LEN)?;
    // The flag byte is absent on pre-mayhem payloads.
    let is_mayhem = cursor.read_optional_byte().is_some_and(|b| b != 0);

    trace!(%name, %symbol, "decoded create instruction");
    Ok(CreationPayload {
        name,
        symbol,
        uri,
        creator_hex: hex_encode(creator),
        is_mayhem,
    })
}

struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .position
            .checked_add(len)
            .ok_or(DecodeError::TooShort(self.data.len()))?;
        if end > self.data.len() {
            return Err(DecodeError::TooShort(self.data.len()));
        }
        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    fn read_string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len_bytes = self.read_bytes(4)?;
        let len = u32::from_le_bytes(len_bytes.try_into().expect("4-byte slice"));
        if len as usize > self.data.len() - self.position {
            return Err(DecodeError::LengthOutOfBounds(len));
        }
        let raw = self.read_bytes(len as usize)?;
        String::from_utf8(raw.to_vec()).map_err(|_| DecodeError::InvalidUtf8(field))
    }

    fn read_optional_byte(&mut self) -> Option<u8> {
        let byte = self.data.get(self.position).copied();
        if byte.is_some() {
            self.position += 1;
        }
        byte
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// ---------------------------------------------------------------------------
// Webhook transaction extraction
// ---------------------------------------------------------------------------

/// One instruction as delivered by the webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookInstruction {
    #[serde(rename = "programId")]
    pub program_id: String,
    /// Base64-encoded instruction body
    pub data: String,
    /// Account addresses; the new mint is first
    pub accounts: Vec<String>,
}

/// Transaction-shaped webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookTransaction {
    pub signature: Option<String>,
    #[serde(default)]
    pub slot: u64,
    #[serde(rename = "blockTime")]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub instructions: Vec<WebhookInstruction>,
}

/// Extract at most one creation event from a webhook transaction.
///
/// Only instructions addressed to the pump.fun program are considered; the
/// first one carrying the create discriminator wins.
pub fn extract_creation(tx: &WebhookTransaction) -> Result<Option<LaunchEvent>, DecodeError> {
    for instruction in &tx.instructions {
        if instruction.program_id != PUMP_PROGRAM_ID {
            continue;
        }
        let data = BASE64
            .decode(&instruction.data)
            .map_err(|_| DecodeError::InvalidBase64)?;
        let payload = match decode_create(&data) {
            Ok(payload) => payload,
            Err(DecodeError::WrongDiscriminator) => continue,
            Err(other) => return Err(other),
        };
        let mint = instruction
            .accounts
            .first()
            .cloned()
            .ok_or(DecodeError::MissingMintAccount)?;

        return Ok(Some(LaunchEvent {
            mint: Some(mint),
            name: Some(payload.name),
            symbol: Some(payload.symbol),
            uri: Some(payload.uri),
            creator_hex: Some(payload.creator_hex),
            signature: tx.signature.clone(),
            slot: tx.slot,
            timestamp: tx.block_time,
            is_mayhem: payload.is_mayhem,
        }));
    }
    Ok(None)
}
