use anyhow::{anyhow, Result};

//oracle hosts hand results back as raw bytes, strings go over as UTF-8
pub fn encode_string(value: &str) -> Vec<u8> {
    value.as_bytes().to_vec()
}

/// `0x`-prefixed lower case hex, the form the consumer contract receives.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Inverse of `to_hex(encode_string(..))`. The `0x` prefix is optional.
#[cfg_attr(not(test), allow(dead_code))]
pub fn decode_string(encoded: &str) -> Result<String> {
    let digits = encoded
        .strip_prefix("0x")
        .or_else(|| encoded.strip_prefix("0X"))
        .unwrap_or(encoded);
    let bytes = hex::decode(digits).map_err(|e| anyhow!("Invalid hex '{}': {}", encoded, e))?;
    let value = String::from_utf8(bytes)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_label() {
        assert_eq!(encode_string("POS"), vec![0x50, 0x4f, 0x53]);
        assert_eq!(to_hex(&encode_string("NEG")), "0x4e4547");
    }

    #[test]
    fn test_decode_accepts_missing_prefix() {
        assert_eq!(decode_string("0x4e4555").unwrap(), "NEU");
        assert_eq!(decode_string("454d505459").unwrap(), "EMPTY");
        assert_eq!(decode_string("0x").unwrap(), "");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_string("0xzz").is_err());
        assert!(decode_string("0xff").is_err());
    }
}
