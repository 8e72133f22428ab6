/// EBCDIC (code page 037) to ASCII. Code points outside ASCII, such as `¢` at 0x4A
/// or `¬` at 0x5F, become a space.
#[rustfmt::skip]
const EBCDIC_TO_ASCII: [u8; 256] = [
    // 0x00
    b' ', b' ', b' ', b' ', b' ', b'\t', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b'\r', b' ', b' ',
    // 0x10
    b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ',
    // 0x20
    b' ', b' ', b' ', b' ', b' ', b'\n', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ',
    // 0x30
    b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ',
    // 0x40
    b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b'.', b'<', b'(', b'+', b'|',
    // 0x50
    b'&', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b'!', b'$', b'*', b')', b';', b' ',
    // 0x60
    b'-', b'/', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b',', b'%', b'_', b'>', b'?',
    // 0x70
    b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b'`', b':', b'#', b'@', b'\'', b'=', b'"',
    // 0x80
    b' ', b'a', b'b', b'c', b'd', b'e', b'f', b'g', b'h', b'i', b' ', b' ', b' ', b' ', b' ', b' ',
    // 0x90
    b' ', b'j', b'k', b'l', b'm', b'n', b'o', b'p', b'q', b'r', b' ', b' ', b' ', b' ', b' ', b' ',
    // 0xA0
    b' ', b'~', b's', b't', b'u', b'v', b'w', b'x', b'y', b'z', b' ', b' ', b' ', b' ', b' ', b' ',
    // 0xB0
    b'^', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b'[', b']', b' ', b' ', b' ', b' ',
    // 0xC0
    b'{', b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b' ', b' ', b' ', b' ', b' ', b' ',
    // 0xD0
    b'}', b'J', b'K', b'L', b'M', b'N', b'O', b'P', b'Q', b'R', b' ', b' ', b' ', b' ', b' ', b' ',
    // 0xE0
    b'\\', b' ', b'S', b'T', b'U', b'V', b'W', b'X', b'Y', b'Z', b' ', b' ', b' ', b' ', b' ', b' ',
    // 0xF0
    b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b' ', b' ', b' ', b' ', b' ', b' ',
];

pub fn to_ascii(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|&b| EBCDIC_TO_ASCII[b as usize]).collect()
}

/// Encode printable ASCII as EBCDIC. Characters without a mapping become a space.
pub fn from_ascii(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .map(|&b| {
            if b == b' ' {
                return 0x40;
            }
            EBCDIC_TO_ASCII
                .iter()
                .position(|&a| a == b)
                .map_or(0x40, |pos| pos as u8)
        })
        .collect()
}

/// Heuristic used by most SEG-Y readers: an EBCDIC header starts with `C` (0xC3),
/// and EBCDIC text is dominated by bytes above 0x7F, which ASCII text never is.
pub fn looks_like_ebcdic(bytes: &[u8]) -> bool {
    if bytes.first() == Some(&0xC3) {
        return true;
    }
    if bytes.first() == Some(&b'C') {
        return false;
    }
    let high = bytes.iter().filter(|&&b| b >= 0x80).count();
    high * 2 > bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_header_line() {
        let line = b"C 1 CLIENT: ACME SEISMIC   LINE 12-B   AREA: NORTH SEA (2024)";
        let encoded = from_ascii(line);
        assert_eq!(encoded[0], 0xC3);
        assert_eq!(to_ascii(&encoded), line.to_vec());
    }

    #[test]
    fn test_detects_encoding() {
        assert!(looks_like_ebcdic(&from_ascii(b"C 1 SURVEY")));
        assert!(!looks_like_ebcdic(b"C 1 SURVEY"));
        assert!(!looks_like_ebcdic(b"plain ascii text"));
    }

    #[test]
    fn test_printable_ascii_has_one_code_point_each() {
        let printable: Vec<u8> = (0x20..=0x7E).collect();
        let encoded = from_ascii(&printable);
        assert_eq!(to_ascii(&encoded), printable);

        let mut unique = encoded.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), printable.len());
    }

    #[test]
    fn test_cp037_positions() {
        assert_eq!(from_ascii(b"[]|^!"), vec![0xBA, 0xBB, 0x4F, 0xB0, 0x5A]);
        assert_eq!(to_ascii(&[0x4A, 0x5F, 0x6A, 0x25]), b"   \n".to_vec());
    }
}
