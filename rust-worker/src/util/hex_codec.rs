//! Fail-soft hex decoding for signature and key material.

/// Decode a string of hex digit pairs into bytes.
///
/// Decoding stops at the first pair that is not valid hex and returns the
/// bytes decoded up to that point. A trailing odd digit is dropped. The
/// result is therefore never longer than `input.len() / 2`, and callers must
/// check its length before treating it as a key or signature.
pub fn hex_to_bytes(input: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(input.len() / 2);

    for pair in input.as_bytes().chunks_exact(2) {
        let mut byte = [0u8; 1];
        if hex::decode_to_slice(pair, &mut byte).is_err() {
            break;
        }
        bytes.push(byte[0]);
    }

    bytes
}
