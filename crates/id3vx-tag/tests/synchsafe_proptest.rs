//! Property-based tests for synchsafe integers and unsynchronization.

use id3vx_tag::synchsafe::{
    apply_unsynchronization, decode, encode, remove_unsynchronization, MAX_SYNCHSAFE,
};
use id3vx_tag::{ErrorKind, TextEncoding};

proptest::proptest! {
    /// Every 28-bit value survives encode then decode.
    #[test]
    fn synchsafe_roundtrip(value in 0u32..=MAX_SYNCHSAFE) {
        let bytes = encode(value).unwrap();
        assert!(bytes.iter().all(|b| b & 0x80 == 0));
        assert_eq!(decode(bytes).unwrap(), value);
    }

    /// Values above 28 bits are a range error.
    #[test]
    fn synchsafe_encode_out_of_range(value in (MAX_SYNCHSAFE + 1)..=u32::MAX) {
        assert_eq!(encode(value).unwrap_err().kind(), ErrorKind::Range);
    }

    /// Any byte with its high bit set is a format error.
    #[test]
    fn synchsafe_decode_rejects_high_bit(
        low in proptest::array::uniform4(0u8..0x80),
        index in 0usize..4,
        high in 0x80u8..=0xFF,
    ) {
        let mut bytes = low;
        bytes[index] = high;
        assert_eq!(decode(bytes).unwrap_err().kind(), ErrorKind::Format);
    }

    /// Removing unsynchronization restores what applying it produced.
    #[test]
    fn unsynchronization_restores_original(data in proptest::collection::vec(proptest::num::u8::ANY, 0..256)) {
        let stuffed = apply_unsynchronization(&data);
        assert!(!stuffed.windows(2).any(|w| w[0] == 0xFF && w[1] >= 0xE0));
        assert_eq!(remove_unsynchronization(&stuffed).as_ref(), data.as_slice());
    }

    /// Once no `FF 00` pair is left, removal changes nothing.
    #[test]
    fn unsynchronization_removal_is_stable(data in proptest::collection::vec(proptest::num::u8::ANY, 0..256)) {
        let once = remove_unsynchronization(&data);
        if !once.windows(2).any(|w| w == [0xFF, 0x00]) {
            assert_eq!(remove_unsynchronization(&once), once);
        }
    }

    /// Latin-1 decoding never fails and stops at the first null.
    #[test]
    fn latin1_decode_total(data in proptest::collection::vec(proptest::num::u8::ANY, 0..64)) {
        let text = TextEncoding::Latin1.decode(&data).unwrap();
        let expected = data.iter().take_while(|&&b| b != 0).count();
        assert_eq!(text.chars().count(), expected);
    }
}
