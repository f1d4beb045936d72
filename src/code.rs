use soroban_sdk::{Env, String};

use crate::Error;

/// Exclusive upper bound for the nonce field. Generated nonces land in
/// `[1, NONCE_BOUND)`; a submitted nonce at or above it is rejected.
pub const NONCE_BOUND: u64 = u32::MAX as u64;

const SEPARATOR: u8 = b'|';

// strkey address (56) + 3 separators + sequence (10) + timestamp (20) + nonce (10)
const MAX_CODE_LEN: usize = 128;
const MAX_IDENT_LEN: usize = 64;

/// Issue a fresh code: `<own-address>|<sequence>|<timestamp>|<nonce>`.
///
/// Height and timestamp come from the ledger and the nonce from the host
/// PRNG, so the same invocation context can never be replayed later: a
/// confirmation requires the issuance height to be strictly prior.
pub fn generate(env: &Env) -> String {
    let mut buf = [0u8; MAX_CODE_LEN];

    let ident = env.current_contract_address().to_string();
    let ident_len = ident.len() as usize;
    ident.copy_into_slice(&mut buf[..ident_len]);

    let mut pos = ident_len;
    buf[pos] = SEPARATOR;
    pos += 1;
    pos = write_decimal(&mut buf, pos, u64::from(env.ledger().sequence()));
    buf[pos] = SEPARATOR;
    pos += 1;
    pos = write_decimal(&mut buf, pos, env.ledger().timestamp());
    buf[pos] = SEPARATOR;
    pos += 1;
    let nonce: u64 = env.prng().gen_range(1..=NONCE_BOUND - 1);
    pos = write_decimal(&mut buf, pos, nonce);

    String::from_bytes(env, &buf[..pos])
}

/// Structural and freshness checks on a submitted code.
///
/// Field count, issuer identity, and the nonce bound are format concerns;
/// an issuance height that is not strictly prior to the current ledger is
/// a staleness concern. Equality with the stored valid code is checked by
/// the caller, not here.
pub fn check_format(env: &Env, code: &String) -> Result<(), Error> {
    let len = code.len() as usize;
    if len == 0 || len > MAX_CODE_LEN {
        return Err(Error::InvalidCodeFormat);
    }
    let mut buf = [0u8; MAX_CODE_LEN];
    code.copy_into_slice(&mut buf[..len]);

    let fields = split_fields(&buf[..len])?;

    let mut ident_buf = [0u8; MAX_IDENT_LEN];
    let ident = env.current_contract_address().to_string();
    let ident_len = ident.len() as usize;
    ident.copy_into_slice(&mut ident_buf[..ident_len]);
    if fields[0] != &ident_buf[..ident_len] {
        return Err(Error::InvalidCodeFormat);
    }

    let height = parse_decimal(fields[1]).ok_or(Error::InvalidCodeFormat)?;
    if height >= u64::from(env.ledger().sequence()) {
        return Err(Error::StaleCode);
    }

    let nonce = parse_decimal(fields[3]).ok_or(Error::InvalidCodeFormat)?;
    if nonce >= NONCE_BOUND {
        return Err(Error::InvalidCodeFormat);
    }

    Ok(())
}

fn split_fields(bytes: &[u8]) -> Result<[&[u8]; 4], Error> {
    let mut fields: [&[u8]; 4] = [&[]; 4];
    let mut count = 0;
    let mut start = 0;
    for (i, b) in bytes.iter().enumerate() {
        if *b == SEPARATOR {
            if count == 3 {
                return Err(Error::InvalidCodeFormat);
            }
            fields[count] = &bytes[start..i];
            count += 1;
            start = i + 1;
        }
    }
    if count != 3 {
        return Err(Error::InvalidCodeFormat);
    }
    fields[count] = &bytes[start..];
    Ok(fields)
}

fn write_decimal(buf: &mut [u8], start: usize, mut value: u64) -> usize {
    let mut digits = [0u8; 20];
    let mut n = 0;
    loop {
        digits[n] = b'0' + (value % 10) as u8;
        value /= 10;
        n += 1;
        if value == 0 {
            break;
        }
    }
    let mut pos = start;
    while n > 0 {
        n -= 1;
        buf[pos] = digits[n];
        pos += 1;
    }
    pos
}

fn parse_decimal(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() || bytes.len() > 20 {
        return None;
    }
    let mut value: u64 = 0;
    for b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value
            .checked_mul(10)?
            .checked_add(u64::from(b - b'0'))?;
    }
    Some(value)
}
