use bitflags::bitflags;

bitflags! {
    /// Control bits carried in the header's flags field.
    ///
    /// Bit 0 and everything above bit 3 are reserved.
    pub struct Flags: u16 {
        const FIN = 0b0000_0010;
        const ACK = 0b0000_0100;
        const SYN = 0b0000_1000;
    }
}

impl Flags {
    pub fn syn(&self) -> bool {
        self.contains(Flags::SYN)
    }

    pub fn ack(&self) -> bool {
        self.contains(Flags::ACK)
    }

    pub fn fin(&self) -> bool {
        self.contains(Flags::FIN)
    }
}

/// Splits a raw flags field into `(syn, ack, fin)`.
///
/// Reserved bits never surface; several bits may be set at once.
pub fn decode_flags(flags: u16) -> (bool, bool, bool) {
    let f = Flags::from_bits_truncate(flags);
    (f.syn(), f.ack(), f.fin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_three_bits() {
        assert_eq!(decode_flags(0b1110), (true, true, true));
    }

    #[test]
    fn ack_only() {
        assert_eq!(decode_flags(0b0100), (false, true, false));
        assert_eq!(decode_flags(4), (false, true, false));
    }

    #[test]
    fn zero_is_all_false() {
        assert_eq!(decode_flags(0), (false, false, false));
    }

    #[test]
    fn reserved_bits_ignored() {
        assert_eq!(decode_flags(0b0001), (false, false, false));
        assert_eq!(decode_flags(0xfff1), (false, false, false));
        assert_eq!(decode_flags(0xffff), (true, true, true));
    }

    #[test]
    fn single_bits() {
        assert_eq!(decode_flags(Flags::SYN.bits()), (true, false, false));
        assert_eq!(decode_flags(Flags::FIN.bits()), (false, false, true));
        assert_eq!(decode_flags((Flags::SYN | Flags::ACK).bits()), (true, true, false));
    }
}
