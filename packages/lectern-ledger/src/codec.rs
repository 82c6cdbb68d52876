//! Fixed-width identifiers the ledger stores per feedback entry.

use crate::{Error, Result};

pub const ORCID_CHARS: usize = 19;
pub const BIB_HASH_CHARS: usize = 32;

/// Encodes an ORCiD (`0000-0001-5000-000X`) as its sixteen identifier characters, dashes removed.
pub fn orcid_to_bytes(orcid: &str) -> Result<[u8; 16]> {
	if orcid.len() != ORCID_CHARS {
		return Err(Error::InvalidPayload {
			message: format!(
				"ORCiD has wrong length. Expected {ORCID_CHARS} characters but got {}.",
				orcid.len()
			),
		});
	}

	let mut out = [0_u8; 16];
	let mut filled = 0;

	for (index, byte) in orcid.bytes().enumerate() {
		if index % 5 == 4 {
			if byte != b'-' {
				return Err(Error::InvalidPayload {
					message: format!("ORCiD must group digits by dashes, found {:?}.", byte as char),
				});
			}

			continue;
		}

		let last = filled == out.len() - 1;

		if !(byte.is_ascii_digit() || (last && byte == b'X')) {
			return Err(Error::InvalidPayload {
				message: format!("ORCiD contains an invalid character {:?}.", byte as char),
			});
		}

		out[filled] = byte;
		filled += 1;
	}

	Ok(out)
}

/// Decodes a level 1 bibliographic hash: sixteen bytes written as 32 hex characters.
pub fn bib_hash_to_bytes(bib_hash: &str) -> Result<[u8; 16]> {
	if bib_hash.len() != BIB_HASH_CHARS {
		return Err(Error::InvalidPayload {
			message: format!(
				"Bibliographic hash has wrong length. Expected {BIB_HASH_CHARS} characters but got {}.",
				bib_hash.len()
			),
		});
	}

	let mut out = [0_u8; 16];

	hex::decode_to_slice(bib_hash, &mut out).map_err(|err| Error::InvalidPayload {
		message: format!("Bibliographic hash is not valid hex: {err}."),
	})?;

	Ok(out)
}

pub fn is_valid_orcid(orcid: &str) -> bool {
	orcid_to_bytes(orcid).is_ok()
}
