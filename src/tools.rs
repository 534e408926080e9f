//! 
//! Contains a number of tools that are useful when working with EBML encoded files.
//! 

use std::convert::TryInto;

use super::errors::tool::ToolError;

///
/// Size of an element body as declared in its header.
///
/// A size whose value bits are all ones is reserved by [RFC8794](https://www.rfc-editor.org/rfc/rfc8794.html#name-unknown-data-size) to mean "unknown".  Segment and Cluster elements written by live muxers commonly use it.
///
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EBMLSize {
    Known(usize),
    Unknown
}

impl EBMLSize {
    pub fn new(size: u64, vint_length: usize) -> Self {
        if vint_length > 0 && vint_length <= 8 && size == (1 << (7 * vint_length)) - 1 {
            return EBMLSize::Unknown;
        }

        match size.try_into() {
            Ok(value) => EBMLSize::Known(value),
            Err(_) => EBMLSize::Unknown
        }
    }
}

///
/// Trait to enable easy serialization to a vint.
/// 
/// This is only available for types that can be cast as `u64`.  Encoding is never needed to read a stream, but it is handy for building EBML fixtures by hand.
/// 
/// ```
/// use matroska_xml::tools::Vint;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// assert_eq!(vec![0x90], 16u64.as_vint()?);
/// assert_eq!(vec![0x40, 0x7F], 127u64.as_vint()?);
/// # Ok(())
/// # }
/// ```
pub trait Vint: Into<u64> + Copy {
    ///
    /// Returns a representation of the current value as a vint array.
    /// 
    /// The shortest length that does not collide with the reserved "unknown size" value is used.
    ///
    /// # Errors
    ///
    /// This can return an error if the value is too large to be representable as a vint.
    /// 
    fn as_vint(&self) -> Result<Vec<u8>, ToolError> {
        let val: u64 = (*self).into();
        check_size_u64(val, 8)?;
        let mut length = 1;
        while length < 8 {
            if val < (1 << (7 * length)) - 1 {
                break;
            }
            length += 1;
        }

        Ok(as_vint_no_check_u64(val, length))
    }

    ///
    /// Returns a representation of the current value as a vint array with a specified length.
    /// 
    /// # Errors
    ///
    /// This can return an error if the value is too large to be representable as a vint.
    /// 
    fn as_vint_with_length(&self, length: usize) -> Result<Vec<u8>, ToolError> {
        let val: u64 = (*self).into();
        check_size_u64(val, length)?;
        Ok(as_vint_no_check_u64(val, length))
    }
}

impl Vint for u64 { }
impl Vint for u32 { }
impl Vint for u16 { }
impl Vint for u8 { }

#[inline]
fn check_size_u64(val: u64, max_length: usize) -> Result<(), ToolError> {
    if max_length == 0 || max_length > 8 || val >= (1 << (max_length * 7)) - 1 {
        Err(ToolError::WriteVintOverflow(val))
    } else {
        Ok(())
    }
}

#[inline]
fn as_vint_no_check_u64(val: u64, length: usize) -> Vec<u8> {
    let bytes: [u8; 8] = val.to_be_bytes();
    let mut result: Vec<u8> = Vec::from(&bytes[(8-length)..]);
    result[0] |= 1 << (8 - length);
    result
}

/// 
/// Reads a vint from the beginning of the input array slice.
/// 
/// This method returns an option with the `None` variant used to indicate there was not enough data in the buffer to completely read a vint.
/// 
/// The returned tuple contains the value of the vint (`u64`) and the length of the vint (`usize`).  The length will be less than or equal to the length of the input slice.  The length marker is stripped from the value; use [`read_element_id`] when the marker is part of the value.
/// 
/// # Errors
///
/// This method can return a `ToolError` if the input array cannot be read as a vint.
/// 
pub fn read_vint(buffer: &[u8]) -> Result<Option<(u64, usize)>, ToolError> {
    if buffer.is_empty() {
        return Ok(None);
    }

    if buffer[0] == 0 {
        return Err(ToolError::ReadVintOverflow)
    }

    let length = 8 - buffer[0].ilog2() as usize;

    if length > buffer.len() {
        // Not enough data in the buffer to read out the vint value
        return Ok(None);
    }

    let mut value = buffer[0] as u64;
    value -= 1 << (8 - length);

    for item in buffer.iter().take(length).skip(1) {
        value <<= 8;
        value += *item as u64;
    }

    Ok(Some((value, length)))
}

///
/// Reads an element id from the beginning of the input array slice.
///
/// Element ids are vints whose length marker is kept as part of the value, so the id of an EBML header is `0x1A45DFA3` rather than `0x0A45DFA3`.
///
/// # Errors
///
/// Returns an error if the first byte is zero or if the id is longer than 4 bytes.
///
pub fn read_element_id(buffer: &[u8]) -> Result<Option<(u64, usize)>, ToolError> {
    match read_vint(buffer)? {
        Some((_, length)) if length > 4 => Err(ToolError::ReadIdOverflow(length)),
        Some((value, length)) => Ok(Some((value + (1 << (7 * length)), length))),
        None => Ok(None),
    }
}

///
/// Reads an element size from the beginning of the input array slice.
///
/// Behaves like [`read_vint`] but reports reserved values as [`EBMLSize::Unknown`].
///
pub fn read_element_size(buffer: &[u8]) -> Result<Option<(EBMLSize, usize)>, ToolError> {
    Ok(read_vint(buffer)?.map(|(value, length)| (EBMLSize::new(value, length), length)))
}

///
/// Reads a `u64` value from any length array slice.
/// 
/// Rather than forcing the input to be a `[u8; 8]` like standard library methods, this can interpret a `u64` from a slice of any length < 8.  Bytes are assumed to be least significant when reading the value - i.e. an array of `[4, 0]` would return a value of `1024`.  An empty slice is read as `0`.
///
/// # Errors
///
/// This method will return an error if the input slice has a length > 8.
/// 
/// ## Example
/// 
/// ```
/// # use matroska_xml::tools::arr_to_u64;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let result = arr_to_u64(&[16,0])?;
/// assert_eq!(result, 4096);
/// # Ok(())
/// # }
/// ```
/// 
pub fn arr_to_u64(arr: &[u8]) -> Result<u64, ToolError> {
    if arr.len() > 8 {
        return Err(ToolError::ReadU64Overflow(Vec::from(arr)));
    }

    let mut val = 0u64;
    for byte in arr {
        val <<= 8;
        val += *byte as u64;
    }
    Ok(val)
}

///
/// Reads an `i64` value from any length array slice.
/// 
/// Rather than forcing the input to be a `[u8; 8]` like standard library methods, this can interpret an `i64` from a slice of any length < 8.  Bytes are assumed to be least significant when reading the value - i.e. an array of `[4, 0]` would return a value of `1024`.  An empty slice is read as `0`.
///
/// # Errors
///
/// This method will return an error if the input slice has a length > 8.
/// 
/// ## Example
/// 
/// ```
/// # use matroska_xml::tools::arr_to_i64;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let result = arr_to_i64(&[4,0])?;
/// assert_eq!(result, 1024);
/// assert_eq!(arr_to_i64(&[0xFF, 0xFE])?, -2);
/// # Ok(())
/// # }
/// ```
///
pub fn arr_to_i64(arr: &[u8]) -> Result<i64, ToolError> {
    if arr.len() > 8 {
        return Err(ToolError::ReadI64Overflow(Vec::from(arr)));
    }

    if arr.is_empty() {
        return Ok(0);
    }

    let unsigned = arr_to_u64(arr)?;
    if arr.len() == 8 {
        return Ok(unsigned as i64);
    }

    let shift = 64 - 8 * arr.len() as u32;
    Ok(((unsigned << shift) as i64) >> shift)
}

///
/// Reads an `f64` value from an array slice of length 0, 4 or 8.
/// 
/// This method wraps `f32` and `f64` conversions from big endian byte arrays and casts the result as an `f64`.  An empty slice is read as `0.0`.
///
/// # Errors
///
/// This method will throw an error if the input slice length is not 0, 4 or 8.
/// 
pub fn arr_to_f64(arr: &[u8]) -> Result<f64, ToolError> {
    match arr.len() {
        0 => Ok(0.0),
        4 => Ok(f32::from_be_bytes(arr.try_into().map_err(|_| ToolError::ReadF64Mismatch(Vec::from(arr)))?) as f64),
        8 => Ok(f64::from_be_bytes(arr.try_into().map_err(|_| ToolError::ReadF64Mismatch(Vec::from(arr)))?)),
        _ => Err(ToolError::ReadF64Mismatch(Vec::from(arr))),
    }
}

///
/// Reads an EBML date from an array slice of length 0 or 8.
///
/// EBML dates are signed nanosecond offsets from 2001-01-01T00:00:00 UTC.
///
/// # Errors
///
/// This method will throw an error if the input slice length is not 0 or 8.
///
pub fn arr_to_date(arr: &[u8]) -> Result<i64, ToolError> {
    match arr.len() {
        0 | 8 => arr_to_i64(arr),
        _ => Err(ToolError::ReadDateMismatch(Vec::from(arr))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_vint_sixteen() {
        let buffer = [144];
        let result = read_vint(&buffer).unwrap().expect("Reading vint failed");

        assert_eq!(16, result.0);
        assert_eq!(1, result.1);
    }

    #[test]
    fn write_vint_sixteen() {
        let result = 16u64.as_vint().expect("Writing vint failed");
        assert_eq!(vec![144u8], result);
    }

    #[test]
    fn read_vint_one_twenty_seven() {
        let buffer = [255u8];
        let result = read_vint(&buffer).unwrap().expect("Reading vint failed");

        assert_eq!(127, result.0);
        assert_eq!(1, result.1);
    }

    #[test]
    fn write_vint_one_twenty_seven_avoids_unknown_size() {
        let result = 127u64.as_vint().expect("Writing vint failed");
        assert_eq!(vec![0x40, 0x7F], result);
    }

    #[test]
    fn read_vint_two_hundred() {
        let buffer = [64, 200];
        let result = read_vint(&buffer).unwrap().expect("Reading vint failed");

        assert_eq!(200, result.0);
        assert_eq!(2, result.1);
    }

    #[test]
    fn read_id_for_ebml_tag() {
        let buffer = [0x1a, 0x45, 0xdf, 0xa3];
        let result = read_element_id(&buffer).unwrap().expect("Reading id failed");

        assert_eq!(0x1a45dfa3, result.0);
        assert_eq!(4, result.1);
    }

    #[test]
    fn read_id_too_long() {
        let buffer = [0x08, 0x45, 0xdf, 0xa3, 0x00];
        assert!(matches!(read_element_id(&buffer), Err(ToolError::ReadIdOverflow(5))));
    }

    #[test]
    fn read_vint_very_long() {
        let buffer = [1, 0, 0, 0, 0, 0, 0, 1];
        let result = read_vint(&buffer).unwrap().expect("Reading vint failed");

        assert_eq!(1, result.0);
        assert_eq!(8, result.1);
    }

    #[test]
    fn write_vint_very_long() {
        let result = 1u64.as_vint_with_length(8).expect("Writing vint failed");
        assert_eq!(vec![1, 0, 0, 0, 0, 0, 0, 1], result);
    }

    #[test]
    fn read_vint_needs_more_data() {
        let buffer = [1, 0, 0, 0];
        let result = read_vint(&buffer).expect("Reading vint failed");

        assert_eq!(true, result.is_none());
    }

    #[test]
    fn read_vint_zero_byte() {
        assert!(read_vint(&[0, 1]).is_err());
    }

    #[test]
    fn unknown_sizes() {
        assert_eq!(Some((EBMLSize::Unknown, 1)), read_element_size(&[0xFF]).unwrap());
        assert_eq!(Some((EBMLSize::Unknown, 8)), read_element_size(&[0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap());
        assert_eq!(Some((EBMLSize::Known(0x7E), 1)), read_element_size(&[0xFE]).unwrap());
        assert_eq!(Some((EBMLSize::Known(0x7F), 2)), read_element_size(&[0x40, 0x7F]).unwrap());
    }

    #[test]
    #[should_panic]
    fn too_big_for_vint() {
        (1u64 << 56).as_vint().expect("Writing vint failed");
    }

    #[test]
    fn read_u64_values() {
        let mut buffer = vec![];
        let mut expected = 0;
        for _ in 0..8 {
            buffer.push(0x25);
            expected = (expected << 8) + 0x25;

            let result = arr_to_u64(&buffer).unwrap();
            assert_eq!(expected, result);
        }
    }

    #[test]
    fn read_i64_values() {
        let mut buffer = vec![];
        let mut expected = 0;
        for _ in 0..8 {
            buffer.push(0x0a);
            expected = (expected << 8) + 0x0a;

            let result = arr_to_i64(&buffer).unwrap();
            assert_eq!(expected, result);

            let neg_result = arr_to_i64(&(buffer.iter().map(|b| !b).collect::<Vec<u8>>())).unwrap() + 1;
            assert_eq!(-expected, neg_result);
        }
    }

    #[test]
    fn read_f64_values() {
        assert_eq!(0.0, arr_to_f64(&[]).unwrap());
        assert_eq!(1.5, arr_to_f64(&1.5f32.to_be_bytes()).unwrap());
        assert_eq!(48000.0, arr_to_f64(&48000f64.to_be_bytes()).unwrap());
        assert!(arr_to_f64(&[0, 0, 0]).is_err());
    }
}
