// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Month;

use crate::ValidationError;

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

pub fn required_text(field: &str, input: &str) -> ValidationResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(trimmed.to_owned())
}

pub fn parse_price(field: &str, input: &str) -> ValidationResult<i64> {
    parse_cents(input.trim())
        .map_err(|reason| ValidationError::new(field, reason))
}

pub fn parse_quantity(field: &str, input: &str) -> ValidationResult<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    if trimmed.starts_with('-') {
        return Err(ValidationError::new(field, "cannot be negative"));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| ValidationError::new(field, format!("{trimmed:?} is not a whole number")))
}

pub fn check_contact_no(field: &str, value: &str) -> ValidationResult<()> {
    if value.len() != 10 || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ValidationError::new(field, "must be exactly 10 digits"));
    }
    Ok(())
}

pub fn check_email(field: &str, value: &str) -> ValidationResult<()> {
    let Some((local, domain)) = value.split_once('@') else {
        return Err(ValidationError::new(field, "must be an email address"));
    };
    let domain_ok = domain
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty());
    if local.is_empty() || !domain_ok || value.contains(char::is_whitespace) {
        return Err(ValidationError::new(field, "must be an email address"));
    }
    Ok(())
}

pub fn parse_month(input: &str) -> ValidationResult<Option<Month>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let number = trimmed
        .parse::<u8>()
        .map_err(|_| ValidationError::new("month", "must be a number from 1 to 12"))?;
    Month::try_from(number)
        .map(Some)
        .map_err(|_| ValidationError::new("month", "must be a number from 1 to 12"))
}

pub fn format_cents(cents: i64) -> String {
    let (sign, cents) = normalize_sign(cents);
    let dollars = cents / 100;
    let remainder = cents % 100;
    format!("{sign}${}.{:02}", comma_format(dollars), remainder)
}

/// Serde adapter for prices the server sends as decimal numbers.
pub mod decimal_cents {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*cents as f64 / 100.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok((value * 100.0).round() as i64)
    }
}

fn parse_cents(input: &str) -> Result<i64, &'static str> {
    let clean = input.replace(',', "");
    if clean.starts_with('-') {
        return Err("cannot be negative");
    }

    let clean = clean.strip_prefix('$').unwrap_or(&clean);
    if clean.is_empty() {
        return Err("is required");
    }

    let parts = clean.split('.').collect::<Vec<_>>();
    if parts.len() > 2 {
        return Err("is not a valid amount");
    }

    let whole = parse_digits(parts[0], true)?;
    if whole > i64::MAX / 100 {
        return Err("is too large");
    }

    let mut frac = 0i64;
    if parts.len() == 2 {
        if parts[1].len() > 2 {
            return Err("allows at most two decimals");
        }
        frac = parse_digits(parts[1], false)?;
        if parts[1].len() == 1 {
            frac *= 10;
        }
    }

    whole
        .checked_mul(100)
        .and_then(|value| value.checked_add(frac))
        .ok_or("is too large")
}

fn parse_digits(input: &str, allow_empty: bool) -> Result<i64, &'static str> {
    if input.is_empty() {
        if allow_empty {
            return Ok(0);
        }
        return Err("is not a valid amount");
    }
    if !input.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err("is not a valid amount");
    }
    input.parse::<i64>().map_err(|_| "is not a valid amount")
}

fn comma_format(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let mut chars = digits.chars().collect::<Vec<_>>();
    let mut count = 0usize;
    while let Some(ch) = chars.pop() {
        if count == 3 {
            out.push(',');
            count = 0;
        }
        out.push(ch);
        count += 1;
    }
    out.chars().rev().collect()
}

fn normalize_sign(cents: i64) -> (&'static str, i64) {
    if cents >= 0 {
        return ("", cents);
    }
    if cents == i64::MIN {
        ("-", i64::MAX)
    } else {
        ("-", -cents)
    }
}
