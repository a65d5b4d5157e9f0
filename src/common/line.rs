// src/common/line.rs

/// Parity setting of the serial line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Character format and speed of the serial line.
///
/// Transmitters ship configured for 9600 baud, 8 data bits, no parity, 1 stop bit.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineSettings {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: u8,
}

impl LineSettings {
    pub const FACTORY: LineSettings = LineSettings {
        baud_rate: 9600,
        data_bits: 8,
        parity: Parity::None,
        stop_bits: 1,
    };

    pub const fn with_baud_rate(self, baud_rate: u32) -> Self {
        LineSettings { baud_rate, ..self }
    }
}

impl Default for LineSettings {
    fn default() -> Self {
        Self::FACTORY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_settings() {
        let line = LineSettings::default();
        assert_eq!(line.baud_rate, 9600);
        assert_eq!(line.parity, Parity::None);
        assert_eq!((line.data_bits, line.stop_bits), (8, 1));
    }

    #[test]
    fn test_with_baud_rate() {
        let line = LineSettings::FACTORY.with_baud_rate(19200);
        assert_eq!(line.baud_rate, 19200);
        assert_eq!(line.data_bits, 8);
        assert_ne!(line, LineSettings::FACTORY);
    }

    #[test]
    fn test_parity_distinguishes_settings() {
        let line = LineSettings { parity: Parity::Even, ..LineSettings::FACTORY };
        assert_ne!(line, LineSettings::FACTORY);
        assert_eq!(line.baud_rate, 9600);
    }
}
