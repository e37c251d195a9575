use crate::chain::abi;
use crate::utils::error::{PublisherError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid_value(field: &str, value: &str, reason: impl Into<String>) -> PublisherError {
    PublisherError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid_value(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid_value(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid_value(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

/// 驗證 0x 開頭的 20-byte 以太坊地址
pub fn validate_address(field_name: &str, address: &str) -> Result<()> {
    abi::parse_address(address)
        .map(|_| ())
        .map_err(|e| invalid_value(field_name, address, e.to_string()))
}

/// 驗證 token id 可解析為 256 位無號整數
pub fn validate_token_id(field_name: &str, token_id: &str) -> Result<()> {
    abi::parse_token_id(token_id)
        .map(|_| ())
        .map_err(|e| invalid_value(field_name, token_id, e.to_string()))
}

/// 解析 AR 顯示高度（公尺，最多兩位小數）為公分
pub fn parse_display_height(field_name: &str, height: &str) -> Result<u64> {
    let trimmed = height.trim();
    if trimmed.is_empty() {
        return Err(invalid_value(field_name, height, "Height cannot be empty"));
    }

    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid_value(field_name, height, "Height must be a decimal number"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_value(
            field_name,
            height,
            "Height must be a positive decimal number of meters",
        ));
    }
    if frac.len() > 2 {
        return Err(invalid_value(
            field_name,
            height,
            "Height supports at most centimeter precision (two decimal places)",
        ));
    }

    let meters: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| {
            invalid_value(field_name, height, "Height is too large")
        })?
    };
    let centimeters = meters
        .checked_mul(100)
        .ok_or_else(|| invalid_value(field_name, height, "Height is too large"))?;

    let frac_cm: u64 = if frac.is_empty() {
        0
    } else {
        // "5" 代表 0.5 公尺，即 50 公分
        let mut padded = frac.to_string();
        while padded.len() < 2 {
            padded.push('0');
        }
        padded.parse().unwrap_or(0)
    };

    let total = centimeters
        .checked_add(frac_cm)
        .ok_or_else(|| invalid_value(field_name, height, "Height is too large"))?;
    if total == 0 {
        return Err(invalid_value(field_name, height, "Height must be greater than zero"));
    }
    Ok(total)
}

/// 驗證輸出路徑非空且不含 NUL 字元
pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid_value(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid_value(
            field_name,
            path,
            "Path contains invalid characters",
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid_value(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid_value(
            field_name,
            &value.to_string(),
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}
