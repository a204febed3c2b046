//! Display rendering of raw token amounts. Pure and deterministic in
//! `(raw, decimals)` so resolver payloads are byte-stable across reads.

use cosmwasm_std::Uint128;

/// Zero renders as `"0"`; magnitudes below 0.0001 use scientific notation
/// with four fractional digits; below 1, six fixed decimals; below 1000,
/// four fixed decimals; anything larger is thousands-grouped with at most
/// two decimals.
pub fn format_token_amount(raw: Uint128, decimals: u8) -> String {
    let raw = raw.u128();
    if raw == 0 {
        return "0".to_string();
    }

    let digits = raw.to_string();
    let decimals = decimals as usize;
    let (int_part, frac_part) = if digits.len() > decimals {
        let split = digits.len() - decimals;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        ("0".to_string(), format!("{}{}", "0".repeat(decimals - digits.len()), digits))
    };

    if int_part == "0" {
        if frac_part.len() >= 4 && frac_part.starts_with("0000") {
            return format_scientific(&frac_part);
        }
        return format_fixed(&int_part, &frac_part, 6);
    }

    if int_part.len() <= 3 {
        return format_fixed(&int_part, &frac_part, 4);
    }

    format_grouped(&int_part, &frac_part)
}

/// `d.dddde-N` with the mantissa rounded half-up at the fifth significant
/// digit.
fn format_scientific(frac_part: &str) -> String {
    let Some(first) = frac_part.find(|c: char| c != '0') else {
        return "0".to_string();
    };
    let mut exponent = first as u32 + 1;

    let mut significant: String = frac_part[first..].chars().take(6).collect();
    while significant.len() < 6 {
        significant.push('0');
    }
    let leading: u64 = significant[..5].parse().unwrap_or(0);
    let next = significant.as_bytes()[5];
    let mut mantissa = leading + u64::from(next >= b'5');
    if mantissa == 100_000 {
        mantissa = 10_000;
        exponent -= 1;
    }

    let mantissa = mantissa.to_string();
    format!("{}.{}e-{}", &mantissa[..1], &mantissa[1..], exponent)
}

fn format_fixed(int_part: &str, frac_part: &str, places: usize) -> String {
    let (int_out, frac_out) = round_fraction(int_part, frac_part, places);
    format!("{int_out}.{frac_out}")
}

fn format_grouped(int_part: &str, frac_part: &str) -> String {
    let (int_out, frac_out) = round_fraction(int_part, frac_part, 2);
    let grouped = group_thousands(&int_out);
    let trimmed = frac_out.trim_end_matches('0');
    if trimmed.is_empty() {
        grouped
    } else {
        format!("{grouped}.{trimmed}")
    }
}

/// Truncates the fraction to `places` digits and rounds half-up, carrying
/// into the integer part when the fraction overflows.
fn round_fraction(int_part: &str, frac_part: &str, places: usize) -> (String, String) {
    let mut kept: String = frac_part.chars().take(places).collect();
    while kept.len() < places {
        kept.push('0');
    }

    let round_up = frac_part.chars().nth(places).map(|c| c >= '5').unwrap_or(false);
    if !round_up {
        return (int_part.to_string(), kept);
    }

    let incremented = kept.parse::<u128>().unwrap_or(0) + 1;
    if incremented == 10u128.pow(places as u32) {
        return (increment_integer(int_part), "0".repeat(places));
    }
    (int_part.to_string(), format!("{incremented:0places$}"))
}

fn increment_integer(int_part: &str) -> String {
    match int_part.parse::<u128>().map(|v| v.checked_add(1)) {
        Ok(Some(v)) => v.to_string(),
        _ => int_part.to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, b) in bytes.iter().enumerate() {
        if idx > 0 && (bytes.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}
