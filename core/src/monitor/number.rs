use super::CommandError;

/// Parses `1234h`, `0x1234` (hex) or `1234` (decimal).
pub fn parse_number(text: &str) -> Result<u32, CommandError> {
    let invalid = || CommandError::InvalidNumber(text.to_string());

    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(hex) = text.strip_suffix('h').or_else(|| text.strip_suffix('H')) {
        (hex, 16)
    } else {
        (text, 10)
    };

    // from_str_radix would accept a leading '+'
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }

    u32::from_str_radix(digits, radix).map_err(|_| invalid())
}

pub fn parse_bounded(text: &str, max: u32) -> Result<u32, CommandError> {
    let value = parse_number(text)?;
    if value > max {
        return Err(CommandError::ValueTooLarge {
            text: text.to_string(),
            max,
        });
    }

    Ok(value)
}

pub fn parse_word(text: &str) -> Result<u16, CommandError> {
    parse_bounded(text, u16::MAX as u32).map(|v| v as u16)
}

pub fn parse_byte(text: &str) -> Result<u8, CommandError> {
    parse_bounded(text, u8::MAX as u32).map(|v| v as u8)
}
