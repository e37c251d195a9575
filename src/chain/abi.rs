use crate::utils::error::{PublisherError, Result};

/// ERC-721 `tokenURI(uint256)` 的函式選擇子
pub const TOKEN_URI_SELECTOR: [u8; 4] = [0xc8, 0x7b, 0x56, 0xdd];

pub const WORD_BYTES: usize = 32;

fn abi_error(context: &str, details: impl Into<String>) -> PublisherError {
    PublisherError::AbiError {
        context: context.to_string(),
        details: details.into(),
    }
}

/// 編碼為帶 0x 前綴的十六進位字串
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for byte in bytes {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// 解碼十六進位字串，接受可選的 0x 前綴
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let digits = strip_hex_prefix(s.trim());
    if digits.len() % 2 != 0 {
        return Err(abi_error(
            "decoding hex",
            format!("odd number of hex digits ({})", digits.len()),
        ));
    }
    let mut out = Vec::with_capacity(digits.len() / 2);
    let bytes = digits.as_bytes();
    for pair in bytes.chunks(2) {
        let hi = hex_nibble(pair[0]).ok_or_else(|| {
            abi_error("decoding hex", format!("invalid hex digit '{}'", pair[0] as char))
        })?;
        let lo = hex_nibble(pair[1]).ok_or_else(|| {
            abi_error("decoding hex", format!("invalid hex digit '{}'", pair[1] as char))
        })?;
        out.push(hi << 4 | lo);
    }
    Ok(out)
}

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// 解析 0x 開頭、40 位十六進位的以太坊地址
pub fn parse_address(s: &str) -> Result<[u8; 20]> {
    let trimmed = s.trim();
    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return Err(abi_error("parsing address", "address must start with 0x"));
    }
    let bytes = decode_hex(trimmed)?;
    if bytes.len() != 20 {
        return Err(abi_error(
            "parsing address",
            format!("expected 20 bytes, got {}", bytes.len()),
        ));
    }
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&bytes);
    Ok(addr)
}

/// 解析 token id（十進位或 0x 十六進位）為 256 位的 big-endian 字組
pub fn parse_token_id(s: &str) -> Result<[u8; 32]> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(abi_error("parsing token id", "token id is empty"));
    }
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        parse_hex_u256(trimmed)
    } else {
        parse_decimal_u256(trimmed)
    }
}

fn parse_decimal_u256(s: &str) -> Result<[u8; 32]> {
    // 以 4 個 u64 limb 累積 limbs * 10 + digit
    let mut limbs = [0u64; 4];
    for ch in s.bytes() {
        let digit = match ch {
            b'0'..=b'9' => u64::from(ch - b'0'),
            _ => {
                return Err(abi_error(
                    "parsing token id",
                    format!("invalid decimal digit '{}'", ch as char),
                ))
            }
        };
        let mut carry = u128::from(digit);
        for limb in limbs.iter_mut() {
            let value = u128::from(*limb) * 10 + carry;
            *limb = value as u64;
            carry = value >> 64;
        }
        if carry != 0 {
            return Err(abi_error("parsing token id", "token id exceeds 256 bits"));
        }
    }
    let mut word = [0u8; 32];
    for (i, limb) in limbs.iter().enumerate() {
        let end = WORD_BYTES - 8 * i;
        word[end - 8..end].copy_from_slice(&limb.to_be_bytes());
    }
    Ok(word)
}

fn parse_hex_u256(s: &str) -> Result<[u8; 32]> {
    let digits = strip_hex_prefix(s);
    if digits.is_empty() {
        return Err(abi_error("parsing token id", "empty hex token id"));
    }
    if digits.len() > 64 {
        return Err(abi_error("parsing token id", "token id exceeds 256 bits"));
    }
    // 左側補零成偶數位再解碼
    let padded = if digits.len() % 2 == 0 {
        digits.to_string()
    } else {
        format!("0{}", digits)
    };
    let bytes = decode_hex(&padded)?;
    let mut word = [0u8; 32];
    word[WORD_BYTES - bytes.len()..].copy_from_slice(&bytes);
    Ok(word)
}

/// 組出 tokenURI(uint256) 的 calldata
pub fn token_uri_calldata(token_id: &[u8; 32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + WORD_BYTES);
    data.extend_from_slice(&TOKEN_URI_SELECTOR);
    data.extend_from_slice(token_id);
    data
}

fn word_to_usize(word: &[u8]) -> Option<usize> {
    // 高位 24 bytes 必須為零，否則視為超出範圍
    if word[..WORD_BYTES - 8].iter().any(|b| *b != 0) {
        return None;
    }
    let mut value: u64 = 0;
    for byte in &word[WORD_BYTES - 8..] {
        value = value << 8 | u64::from(*byte);
    }
    usize::try_from(value).ok()
}

/// u64 值的 256 位 big-endian 字組
pub fn uint_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[WORD_BYTES - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// 解碼 eth_call 回傳的單一 ABI string
pub fn decode_string_return(data: &[u8]) -> Result<String> {
    if data.len() < 2 * WORD_BYTES {
        return Err(abi_error(
            "decoding string return",
            format!("return data too short ({} bytes)", data.len()),
        ));
    }
    let offset = word_to_usize(&data[..WORD_BYTES])
        .ok_or_else(|| abi_error("decoding string return", "offset word out of range"))?;
    let start = offset
        .checked_add(WORD_BYTES)
        .filter(|start| *start <= data.len())
        .ok_or_else(|| abi_error("decoding string return", "offset points past return data"))?;
    let length = word_to_usize(&data[offset..start])
        .ok_or_else(|| abi_error("decoding string return", "length word out of range"))?;
    let end = start
        .checked_add(length)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| {
            abi_error("decoding string return", "string length points past return data")
        })?;
    String::from_utf8(data[start..end].to_vec())
        .map_err(|e| abi_error("decoding string return", format!("invalid utf-8: {}", e)))
}

/// 建構子參數值；string 為動態型別，其餘為靜態字組
#[derive(Debug, Clone)]
pub enum AbiValue {
    Address([u8; 20]),
    Uint256([u8; 32]),
    Uint8(u8),
    Str(String),
}

/// 依 head/tail 佈局編碼建構子參數
pub fn encode_constructor_args(values: &[AbiValue]) -> Vec<u8> {
    let head_size = values.len() * WORD_BYTES;
    let mut head: Vec<u8> = Vec::with_capacity(head_size);
    let mut tail: Vec<u8> = Vec::new();

    for value in values {
        match value {
            AbiValue::Address(addr) => {
                let mut word = [0u8; 32];
                word[12..].copy_from_slice(addr);
                head.extend_from_slice(&word);
            }
            AbiValue::Uint256(word) => head.extend_from_slice(word),
            AbiValue::Uint8(v) => head.extend_from_slice(&uint_word(u64::from(*v))),
            AbiValue::Str(s) => {
                // 動態值：head 放 offset，內容接在 tail
                let offset = head_size + tail.len();
                head.extend_from_slice(&uint_word(offset as u64));
                tail.extend_from_slice(&encode_string_tail(s));
            }
        }
    }

    head.extend(tail);
    head
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD_BYTES) * WORD_BYTES
}

fn encode_string_tail(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(WORD_BYTES + padded_len(bytes.len()));
    out.extend_from_slice(&uint_word(bytes.len() as u64));
    out.extend_from_slice(bytes);
    out.resize(WORD_BYTES + padded_len(bytes.len()), 0);
    out
}
