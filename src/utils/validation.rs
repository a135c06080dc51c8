use anyhow::{anyhow, Result};

const MAX_NAME_LEN: usize = 64;
const MAX_DESCRIPTION_LEN: usize = 500;
const MAX_AMOUNT: i64 = 100_000_000;

/// Normalizes a Russian phone number to `7XXXXXXXXXX`.
///
/// Accepts `+7`, `8` and bare 10-digit forms with any spaces, dashes or
/// parentheses in between.
pub fn normalize_phone(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Phone number cannot be empty"));
    }

    if input
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')')))
    {
        return Err(anyhow!("Phone number may only contain digits, spaces, '+', '-' and parentheses"));
    }
    if input.chars().skip(1).any(|c| c == '+') {
        return Err(anyhow!("'+' is only allowed at the start of the phone number"));
    }

    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        11 if digits.starts_with('7') || digits.starts_with('8') => {
            if input.starts_with('+') && !digits.starts_with('7') {
                return Err(anyhow!("International numbers must start with +7"));
            }
            Ok(format!("7{}", &digits[1..]))
        }
        10 if digits.starts_with('9') && !input.starts_with('+') => Ok(format!("7{digits}")),
        _ => Err(anyhow!(
            "Phone number must have 11 digits, e.g. +7 912 345-67-89 or 89123456789"
        )),
    }
}

pub fn validate_guest_name(name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Guest name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(anyhow!("Guest name cannot be longer than {} characters", MAX_NAME_LEN));
    }
    if name.contains('\n') || name.contains('\r') {
        return Err(anyhow!("Guest name cannot contain line breaks"));
    }

    Ok(name.to_string())
}

pub fn validate_description(description: &str) -> Result<String> {
    let description = description.trim();

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(anyhow!(
            "Description cannot be longer than {} characters",
            MAX_DESCRIPTION_LEN
        ));
    }

    Ok(description.to_string())
}

/// Parses a cost or payment amount in whole rubles. Spaces are allowed as
/// thousands separators.
pub fn parse_amount(input: &str) -> Result<i64> {
    let cleaned: String = input.trim().chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() {
        return Err(anyhow!("Amount cannot be empty"));
    }
    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("Amount must be a whole number of rubles, digits only"));
    }

    let amount: i64 = cleaned
        .parse()
        .map_err(|_| anyhow!("Amount is too large"))?;

    if amount <= 0 {
        return Err(anyhow!("Amount must be greater than zero"));
    }
    if amount > MAX_AMOUNT {
        return Err(anyhow!("Amount is too large"));
    }

    Ok(amount)
}

pub fn parse_year(input: &str) -> Result<i32> {
    let input = input.trim();

    if input.len() != 4 || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("Enter the year as four digits, e.g. 2025"));
    }

    let year: i32 = input.parse().map_err(|_| anyhow!("Invalid year"))?;
    if !(2000..=2100).contains(&year) {
        return Err(anyhow!("Year must be between 2000 and 2100"));
    }

    Ok(year)
}
