use crate::error::RlpError;

/// The largest length RLP will declare for a single element's payload.
///
/// Mirrors go-ethereum's `rlp` package limit: a declared length above this
/// is treated as corrupt input rather than an absurdly large allocation.
pub const MAX_RLP_LENGTH: u64 = (1u64 << 31) - 1;

/// An RLP element: either a byte string or an ordered list of elements.
///
/// `Null` is not itself RLP-encodable input; it is the sentinel `decode`
/// returns for a zero-length input (§4.1, "Empty input decodes to a null
/// element").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Null,
    Data(Vec<u8>),
    List(Vec<Element>),
}

impl Element {
    pub fn data(bytes: impl Into<Vec<u8>>) -> Self {
        Element::Data(bytes.into())
    }

    pub fn list(items: Vec<Element>) -> Self {
        Element::List(items)
    }

    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            Element::Data(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Element]> {
        match self {
            Element::List(l) => Some(l),
            _ => None,
        }
    }

    /// Interprets this element as a big-endian unsigned integer.
    ///
    /// An empty data element is zero, per the canonical RLP integer rule.
    pub fn to_u128(&self) -> Result<u128, RlpError> {
        let data = self.as_data().ok_or(RlpError::NotData)?;
        if data.len() > 16 {
            return Err(RlpError::IntegerTooWide);
        }
        let mut buf = [0u8; 16];
        buf[16 - data.len()..].copy_from_slice(data);
        Ok(u128::from_be_bytes(buf))
    }

    pub fn to_u64(&self) -> Result<u64, RlpError> {
        let data = self.as_data().ok_or(RlpError::NotData)?;
        if data.len() > 8 {
            return Err(RlpError::IntegerTooWide);
        }
        let mut buf = [0u8; 8];
        buf[8 - data.len()..].copy_from_slice(data);
        Ok(u64::from_be_bytes(buf))
    }
}

/// Wraps an unsigned integer as its canonical (shortest big-endian,
/// zero-as-empty) RLP data element.
pub fn encode_uint(n: u128) -> Element {
    if n == 0 {
        return Element::Data(Vec::new());
    }
    let full = n.to_be_bytes();
    let first_nonzero = full.iter().position(|&b| b != 0).unwrap();
    Element::Data(full[first_nonzero..].to_vec())
}

impl From<u8> for Element {
    fn from(n: u8) -> Self {
        encode_uint(n as u128)
    }
}
impl From<u16> for Element {
    fn from(n: u16) -> Self {
        encode_uint(n as u128)
    }
}
impl From<u32> for Element {
    fn from(n: u32) -> Self {
        encode_uint(n as u128)
    }
}
impl From<u64> for Element {
    fn from(n: u64) -> Self {
        encode_uint(n as u128)
    }
}
impl From<u128> for Element {
    fn from(n: u128) -> Self {
        encode_uint(n)
    }
}
impl From<&[u8]> for Element {
    fn from(bytes: &[u8]) -> Self {
        Element::Data(bytes.to_vec())
    }
}
impl From<Vec<u8>> for Element {
    fn from(bytes: Vec<u8>) -> Self {
        Element::Data(bytes)
    }
}

/// Encodes an [`Element`] to its canonical RLP byte string.
pub fn encode(element: &Element) -> Vec<u8> {
    match element {
        Element::Null => vec![0x80],
        Element::Data(data) => encode_data(data),
        Element::List(items) => {
            let mut payload = Vec::new();
            for item in items {
                payload.extend(encode(item));
            }
            wrap_with_offset(&payload, 0xc0)
        }
    }
}

fn encode_data(data: &[u8]) -> Vec<u8> {
    if data.len() == 1 && data[0] < 0x80 {
        return vec![data[0]];
    }
    wrap_with_offset(data, 0x80)
}

fn wrap_with_offset(payload: &[u8], offset: u8) -> Vec<u8> {
    let len = payload.len();
    let mut out = Vec::with_capacity(len + 9);
    if len <= 55 {
        out.push(offset + len as u8);
    } else {
        let len_bytes = minimal_be_bytes(len as u64);
        out.push(offset + 0x37 + len_bytes.len() as u8);
        out.extend_from_slice(&len_bytes);
    }
    out.extend_from_slice(payload);
    out
}

fn minimal_be_bytes(n: u64) -> Vec<u8> {
    let full = n.to_be_bytes();
    let first_nonzero = full.iter().position(|&b| b != 0).unwrap_or(7);
    full[first_nonzero..].to_vec()
}

/// Decodes one [`Element`] from the head of `input`, returning the element
/// and the number of bytes consumed.
///
/// An empty `input` decodes to `(Element::Null, 0)`.
pub fn decode(input: &[u8]) -> Result<(Element, usize), RlpError> {
    if input.is_empty() {
        return Ok((Element::Null, 0));
    }

    let prefix = input[0];
    if prefix < 0x80 {
        return Ok((Element::Data(vec![prefix]), 1));
    }
    if prefix <= 0xb7 {
        let len = (prefix - 0x80) as usize;
        let end = 1 + len;
        if end > input.len() {
            return Err(RlpError::LengthMismatch);
        }
        return Ok((Element::Data(input[1..end].to_vec()), end));
    }
    if prefix <= 0xbf {
        let len_of_len = (prefix - 0xb7) as usize;
        let (len, payload_start) = read_length(input, 1, len_of_len)?;
        let end = payload_start + len;
        if end > input.len() {
            return Err(RlpError::LengthMismatch);
        }
        return Ok((Element::Data(input[payload_start..end].to_vec()), end));
    }
    if prefix <= 0xf7 {
        let len = (prefix - 0xc0) as usize;
        let end = 1 + len;
        if end > input.len() {
            return Err(RlpError::LengthMismatch);
        }
        let items = decode_items(&input[1..end])?;
        return Ok((Element::List(items), end));
    }

    let len_of_len = (prefix - 0xf7) as usize;
    let (len, payload_start) = read_length(input, 1, len_of_len)?;
    let end = payload_start + len;
    if end > input.len() {
        return Err(RlpError::LengthMismatch);
    }
    let items = decode_items(&input[payload_start..end])?;
    Ok((Element::List(items), end))
}

/// Reads a `len_of_len`-byte big-endian length starting at `start`,
/// returning `(length, next_offset)`.
fn read_length(input: &[u8], start: usize, len_of_len: usize) -> Result<(usize, usize), RlpError> {
    let end = start + len_of_len;
    if end > input.len() {
        return Err(RlpError::LengthMismatch);
    }
    let len_bytes = &input[start..end];
    if len_bytes.first() == Some(&0) {
        // Non-canonical: a minimal-length encoding never has a leading zero.
        return Err(RlpError::LengthMismatch);
    }
    if len_of_len > 8 {
        return Err(RlpError::TooManyBytes);
    }
    let mut buf = [0u8; 8];
    buf[8 - len_of_len..].copy_from_slice(len_bytes);
    let len = u64::from_be_bytes(buf);
    if len > MAX_RLP_LENGTH {
        return Err(RlpError::TooManyBytes);
    }
    Ok((len as usize, end))
}

/// Decodes a flat payload (the body of a list) into its constituent elements.
fn decode_items(mut payload: &[u8]) -> Result<Vec<Element>, RlpError> {
    let mut items = Vec::new();
    while !payload.is_empty() {
        let (element, consumed) = decode(payload)?;
        items.push(element);
        payload = &payload[consumed..];
    }
    Ok(items)
}

/// Decodes `input` and requires the result to be a list, returning its items.
pub fn decode_list(input: &[u8]) -> Result<Vec<Element>, RlpError> {
    match decode(input)?.0 {
        Element::List(items) => Ok(items),
        Element::Null => Ok(Vec::new()),
        Element::Data(_) => Err(RlpError::NotAList),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_decodes_to_null_at_position_zero() {
        let (element, pos) = decode(&[]).unwrap();
        assert_eq!(element, Element::Null);
        assert_eq!(pos, 0);
    }

    #[test]
    fn empty_string_encodes_as_0x80() {
        assert_eq!(encode(&Element::Data(vec![])), vec![0x80]);
    }

    #[test]
    fn single_byte_below_0x80_self_encodes() {
        assert_eq!(encode(&Element::Data(vec![0x42])), vec![0x42]);
        assert_eq!(encode(&42u8.into()), vec![42]);
    }

    #[test]
    fn zero_integer_encodes_as_empty_string() {
        assert_eq!(encode(&encode_uint(0)), vec![0x80]);
    }

    #[test]
    fn short_string_prefix() {
        let data = vec![0u8; 10];
        let encoded = encode(&Element::Data(data));
        assert_eq!(encoded[0], 0x80 + 10);
    }

    #[test]
    fn long_string_prefix() {
        let data = vec![0xab; 60];
        let encoded = encode(&Element::Data(data.clone()));
        // 0xb7 + 1 (one length byte), then the length (60), then payload.
        assert_eq!(encoded[0], 0xb7 + 1);
        assert_eq!(encoded[1], 60);
        assert_eq!(&encoded[2..], &data[..]);
    }

    #[test]
    fn twenty_byte_address_prefix() {
        let addr = vec![0xdeu8; 20];
        let encoded = encode(&Element::Data(addr.clone()));
        assert_eq!(encoded.len(), 21);
        assert_eq!(encoded[0], 0x94);
        assert_eq!(&encoded[1..], &addr[..]);
    }

    #[test]
    fn short_list_prefix() {
        let list = Element::List(vec![Element::Data(vec![1]), Element::Data(vec![2])]);
        let encoded = encode(&list);
        assert_eq!(encoded[0], 0xc0 + 2);
    }

    #[test]
    fn decode_of_encode_is_identity_for_data() {
        for bytes in [vec![], vec![0x01], vec![0x7f], vec![0x80], vec![0xffu8; 100]] {
            let el = Element::Data(bytes);
            let encoded = encode(&el);
            let (decoded, pos) = decode(&encoded).unwrap();
            assert_eq!(decoded, el);
            assert_eq!(pos, encoded.len());
        }
    }

    #[test]
    fn decode_of_encode_is_identity_for_nested_lists() {
        let el = Element::List(vec![
            Element::Data(b"cat".to_vec()),
            Element::List(vec![Element::Data(b"dog".to_vec()), Element::Data(vec![])]),
            42u64.into(),
        ]);
        let encoded = encode(&el);
        let (decoded, pos) = decode(&encoded).unwrap();
        assert_eq!(decoded, el);
        assert_eq!(pos, encoded.len());
    }

    #[test]
    fn encode_of_decode_is_identity_for_canonical_bytes() {
        let canonical = encode(&Element::List(vec![
            Element::Data(vec![0u8; 60]),
            Element::Data(vec![7]),
        ]));
        let (decoded, _) = decode(&canonical).unwrap();
        assert_eq!(encode(&decoded), canonical);
    }

    #[test]
    fn declared_length_exceeding_remaining_input_is_length_mismatch() {
        // Prefix says 5 bytes of payload follow, but only 2 are present.
        let bytes = vec![0x80 + 5, 0x01, 0x02];
        assert_eq!(decode(&bytes).unwrap_err(), RlpError::LengthMismatch);
    }

    #[test]
    fn declared_length_over_2_31_minus_1_is_too_many_bytes() {
        // Long-string prefix (0xbf) with an 8-byte length field encoding
        // a value one past MAX_RLP_LENGTH.
        let mut bytes = vec![0xbf];
        bytes.extend_from_slice(&(MAX_RLP_LENGTH + 1).to_be_bytes());
        assert_eq!(decode(&bytes).unwrap_err(), RlpError::TooManyBytes);
    }

    #[test]
    fn decode_list_rejects_data_element() {
        let encoded = encode(&Element::Data(vec![1, 2, 3]));
        assert_eq!(decode_list(&encoded).unwrap_err(), RlpError::NotAList);
    }

    #[test]
    fn decode_list_unwraps_items_in_order() {
        let encoded = encode(&Element::List(vec![1u8.into(), 2u8.into(), 3u8.into()]));
        let items = decode_list(&encoded).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].to_u64().unwrap(), 1);
        assert_eq!(items[2].to_u64().unwrap(), 3);
    }

    #[test]
    fn to_u128_roundtrip() {
        for n in [0u128, 1, 255, 256, u64::MAX as u128, u128::MAX] {
            let el = encode_uint(n);
            assert_eq!(el.to_u128().unwrap(), n);
        }
    }

    #[test]
    fn to_u64_rejects_overlong_data() {
        let el = Element::Data(vec![1; 9]);
        assert_eq!(el.to_u64().unwrap_err(), RlpError::IntegerTooWide);
    }
}
