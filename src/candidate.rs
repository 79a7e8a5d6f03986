use std::net::Ipv4Addr;

/// Decimal text of every octet value, stored as up to three ASCII digits plus a length.
static OCTETS: [([u8; 3], u8); 256] = build_octet_table();

const fn build_octet_table() -> [([u8; 3], u8); 256] {
    let mut table = [([0u8; 3], 0u8); 256];
    let mut value = 0;
    while value < 256 {
        let v = value as u8;
        table[value] = if v >= 100 {
            ([b'0' + v / 100, b'0' + v / 10 % 10, b'0' + v % 10], 3)
        } else if v >= 10 {
            ([b'0' + v / 10, b'0' + v % 10, 0], 2)
        } else {
            ([b'0' + v, 0, 0], 1)
        };
        value += 1;
    }
    table
}

#[inline(always)]
fn push_octet(octet: u8, buf: &mut Vec<u8>) {
    let (digits, len) = &OCTETS[octet as usize];
    buf.extend_from_slice(&digits[..*len as usize]);
}

/// Appends the dotted-decimal form of `ip` ("a.b.c.d", most significant octet first) to `buf`.
#[inline(always)]
pub fn encode_candidate(ip: u32, buf: &mut Vec<u8>) {
    let [a, b, c, d] = ip.to_be_bytes();
    push_octet(a, buf);
    buf.push(b'.');
    push_octet(b, buf);
    buf.push(b'.');
    push_octet(c, buf);
    buf.push(b'.');
    push_octet(d, buf);
}

pub fn candidate_string(ip: u32) -> String {
    Ipv4Addr::from(ip).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(ip: u32) -> String {
        let mut buf = Vec::with_capacity(15);
        encode_candidate(ip, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    fn parse(candidate: &str) -> u32 {
        let octets: Vec<u32> = candidate.split('.').map(|o| o.parse().unwrap()).collect();
        assert_eq!(octets.len(), 4, "{candidate} is not four octets");
        octets.iter().fold(0, |acc, o| {
            assert!(*o <= 255);
            acc << 8 | o
        })
    }

    #[test]
    fn test_known_candidates() {
        assert_eq!(encoded(0), "0.0.0.0");
        assert_eq!(encoded(0x0A00_0001), "10.0.0.1");
        assert_eq!(encoded(0xC0A8_010A), "192.168.1.10");
        assert_eq!(encoded(0x7F00_0001), "127.0.0.1");
        assert_eq!(encoded(u32::MAX), "255.255.255.255");
    }

    #[test]
    fn test_every_octet_value() {
        for octet in 0..=255u32 {
            let ip = octet << 24 | octet << 16 | octet << 8 | octet;
            assert_eq!(encoded(ip), format!("{octet}.{octet}.{octet}.{octet}"));
        }
    }

    #[test]
    fn test_round_trip_across_keyspace() {
        // A prime stride visits every octet position with varied digit widths.
        let mut ip: u64 = 0;
        while ip <= u32::MAX as u64 {
            let ip32 = ip as u32;
            let text = encoded(ip32);
            assert_eq!(parse(&text), ip32);
            assert_eq!(text, candidate_string(ip32));
            ip += 9_973;
        }
        assert_eq!(parse(&encoded(u32::MAX)), u32::MAX);
    }

    #[test]
    fn test_encode_appends() {
        let mut buf = b"prefix:".to_vec();
        encode_candidate(0x0102_0304, &mut buf);
        assert_eq!(buf, b"prefix:1.2.3.4");
    }
}
