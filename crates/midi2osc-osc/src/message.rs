//! OSC 1.0 message encoding.
//!
//! Each configured action becomes a single-argument message: a
//! null-terminated, 4-byte-aligned address string, a `,<tag>` type-tag
//! string with the same padding, then the big-endian argument payload.
//! `T` and `F` arguments live entirely in the tag and carry no payload.

use midi2osc_core::OscValue;

/// Encode a single-argument OSC message into a fresh packet.
pub fn encode_message(path: &str, value: &OscValue) -> Vec<u8> {
    let mut packet = Vec::with_capacity(padded_len(path.len()) + 4 + 8);
    write_padded_str(&mut packet, path);

    let mut tags = [0u8; 2];
    tags[0] = b',';
    tags[1] = value.type_tag() as u8;
    write_padded_bytes(&mut packet, &tags);

    match value {
        OscValue::Int(n) => packet.extend_from_slice(&n.to_be_bytes()),
        OscValue::Float(n) => packet.extend_from_slice(&n.to_be_bytes()),
        OscValue::Str(s) => write_padded_str(&mut packet, s),
        OscValue::Bool(_) => {}
    }
    packet
}

/// Length of a string once null-terminated and padded to 4 bytes.
#[inline]
fn padded_len(len: usize) -> usize {
    (len + 4) & !3
}

fn write_padded_str(packet: &mut Vec<u8>, s: &str) {
    write_padded_bytes(packet, s.as_bytes());
}

fn write_padded_bytes(packet: &mut Vec<u8>, bytes: &[u8]) {
    packet.extend_from_slice(bytes);
    packet.push(0);
    while packet.len() % 4 != 0 {
        packet.push(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_message_layout() {
        let packet = encode_message("/ping", &OscValue::Int(1));
        assert_eq!(
            packet,
            [
                b'/', b'p', b'i', b'n', b'g', 0, 0, 0, // address, padded
                b',', b'i', 0, 0, // type tags, padded
                0, 0, 0, 1, // big-endian i32
            ]
        );
    }

    #[test]
    fn test_float_message_layout() {
        let packet = encode_message("/a", &OscValue::Float(1.5));
        assert_eq!(&packet[..4], [b'/', b'a', 0, 0]);
        assert_eq!(&packet[4..8], [b',', b'f', 0, 0]);
        assert_eq!(&packet[8..], 1.5f32.to_be_bytes());
    }

    #[test]
    fn test_string_argument_is_padded() {
        let packet = encode_message("/a", &OscValue::Str("hello".into()));
        assert_eq!(&packet[4..8], [b',', b's', 0, 0]);
        assert_eq!(&packet[8..], [b'h', b'e', b'l', b'l', b'o', 0, 0, 0]);
    }

    #[test]
    fn test_bools_carry_no_payload() {
        let packet = encode_message("/a", &OscValue::Bool(true));
        assert_eq!(&packet[4..], [b',', b'T', 0, 0]);

        let packet = encode_message("/a", &OscValue::Bool(false));
        assert_eq!(&packet[4..], [b',', b'F', 0, 0]);
    }

    #[test]
    fn test_alignment_for_every_path_length() {
        for len in 1..=8 {
            let path: String = std::iter::once('/')
                .chain(std::iter::repeat('x').take(len))
                .collect();
            let packet = encode_message(&path, &OscValue::Int(0));
            assert_eq!(packet.len() % 4, 0, "path {:?}", path);
            // Terminator sits between path bytes and the type tags
            assert_eq!(packet[path.len()], 0);
        }
    }

    #[test]
    fn test_carla_set_active_packet() {
        let packet = encode_message("/Carla_Patchbay_4/0/set_active", &OscValue::Int(1));
        // 30-byte address pads to 32, 4 bytes of tags, 4 of payload
        assert_eq!(packet.len(), 40);
        assert_eq!(&packet[32..36], [b',', b'i', 0, 0]);
        assert_eq!(&packet[36..], [0, 0, 0, 1]);
    }
}
