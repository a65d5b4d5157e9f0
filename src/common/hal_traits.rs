// src/common/hal_traits.rs

use super::line::LineSettings;
use core::fmt::Debug;

/// Abstraction for the half-duplex serial link to a gauge.
///
/// Byte-level and non-blocking in the `nb` style. The protocol has no timeouts of its own:
/// an implementation should wait as long as it considers reasonable for the next byte and
/// only then report `WouldBlock` from [`read_byte`](Self::read_byte), which the frame
/// reader treats as "no more data for this exchange".
pub trait GaugeSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` when no data is available.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte. `WouldBlock` is retried by the caller.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;

    /// Applies the serial configuration before an exchange.
    ///
    /// Ports that are configured out of band can keep the default no-op.
    fn set_line(&mut self, _line: LineSettings) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<T: GaugeSerial + ?Sized> GaugeSerial for &mut T {
    type Error = T::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        (**self).read_byte()
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        (**self).write_byte(byte)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        (**self).flush()
    }

    fn set_line(&mut self, line: LineSettings) -> Result<(), Self::Error> {
        (**self).set_line(line)
    }
}

/// Adapter for any blocking `std::io` stream, e.g. a `serialport::SerialPort`.
///
/// A zero-byte read, or a read failing with `WouldBlock`/`TimedOut`, ends the exchange.
/// Baud rate and framing are left to whoever opened the port.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSerial<T> {
    inner: T,
}

#[cfg(feature = "std")]
impl<T> IoSerial<T> {
    pub fn new(inner: T) -> Self {
        IoSerial { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

#[cfg(feature = "std")]
fn io_to_nb(e: std::io::Error) -> nb::Error<std::io::Error> {
    use std::io::ErrorKind;
    match e.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => nb::Error::WouldBlock,
        _ => nb::Error::Other(e),
    }
}

#[cfg(feature = "std")]
impl<T: std::io::Read + std::io::Write> GaugeSerial for IoSerial<T> {
    type Error = std::io::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        let mut byte = [0u8; 1];
        loop {
            return match self.inner.read(&mut byte) {
                Ok(0) => Err(nb::Error::WouldBlock),
                Ok(_) => Ok(byte[0]),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => Err(io_to_nb(e)),
            };
        }
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        match self.inner.write(&[byte]) {
            Ok(0) => Err(nb::Error::Other(std::io::ErrorKind::WriteZero.into())),
            Ok(_) => Ok(()),
            Err(e) => Err(io_to_nb(e)),
        }
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.inner.flush().map_err(io_to_nb)
    }
}

/// Adapter for UART drivers implementing the `embedded-io` traits.
#[cfg(feature = "impl-native")]
#[derive(Debug)]
pub struct EioSerial<T> {
    inner: T,
}

#[cfg(feature = "impl-native")]
impl<T> EioSerial<T> {
    pub fn new(inner: T) -> Self {
        EioSerial { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(feature = "impl-native")]
impl<T: embedded_io::Read + embedded_io::Write> GaugeSerial for EioSerial<T> {
    type Error = T::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        let mut byte = [0u8; 1];
        match self.inner.read(&mut byte) {
            Ok(0) => Err(nb::Error::WouldBlock),
            Ok(_) => Ok(byte[0]),
            Err(e) => Err(nb::Error::Other(e)),
        }
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        match self.inner.write(&[byte]) {
            Ok(0) => Err(nb::Error::WouldBlock),
            Ok(_) => Ok(()),
            Err(e) => Err(nb::Error::Other(e)),
        }
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.inner.flush().map_err(nb::Error::Other)
    }
}

#[cfg(all(test, feature = "impl-native"))]
mod eio_tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_io::{ErrorType, Read, Write};
    use std::vec::Vec;

    /// In-memory UART: plays back `rx`, accepts up to `tx_capacity` written bytes.
    struct MemUart {
        rx: Vec<u8>,
        tx: Vec<u8>,
        tx_capacity: usize,
    }

    impl ErrorType for MemUart {
        type Error = Infallible;
    }

    impl Read for MemUart {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let n = buf.len().min(self.rx.len());
            buf[..n].copy_from_slice(&self.rx[..n]);
            self.rx.drain(..n);
            Ok(n)
        }
    }

    impl Write for MemUart {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            let n = buf.len().min(self.tx_capacity - self.tx.len());
            self.tx.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn uart(rx: &[u8], tx_capacity: usize) -> EioSerial<MemUart> {
        EioSerial::new(MemUart { rx: rx.to_vec(), tx: Vec::new(), tx_capacity })
    }

    #[test]
    fn test_eio_serial_reads_until_exhausted() {
        let mut port = uart(b"01", 8);
        assert_eq!(port.read_byte().unwrap(), b'0');
        assert_eq!(port.read_byte().unwrap(), b'1');
        assert!(matches!(port.read_byte(), Err(nb::Error::WouldBlock)));
    }

    #[test]
    fn test_eio_serial_writes() {
        let mut port = uart(b"", 8);
        port.write_byte(b'1').unwrap();
        port.write_byte(b'\r').unwrap();
        port.flush().unwrap();
        assert_eq!(port.into_inner().tx, b"1\r");
    }

    #[test]
    fn test_eio_serial_full_write_would_block() {
        let mut port = uart(b"", 1);
        port.write_byte(b'a').unwrap();
        assert!(matches!(port.write_byte(b'b'), Err(nb::Error::WouldBlock)));
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::io::{Cursor, Read, Write};
    use std::vec::Vec;

    /// Reads from a fixed script, records writes.
    struct Loopback {
        rx: Cursor<Vec<u8>>,
        tx: Vec<u8>,
    }

    impl Read for Loopback {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.rx.read(buf)
        }
    }

    impl Write for Loopback {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.tx.write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_io_serial_reads_until_exhausted() {
        let mut port = IoSerial::new(Loopback { rx: Cursor::new(b"ab".to_vec()), tx: Vec::new() });
        assert_eq!(port.read_byte().unwrap(), b'a');
        assert_eq!(port.read_byte().unwrap(), b'b');
        assert!(matches!(port.read_byte(), Err(nb::Error::WouldBlock)));
    }

    #[test]
    fn test_io_serial_writes() {
        let mut port = IoSerial::new(Loopback { rx: Cursor::new(Vec::new()), tx: Vec::new() });
        port.write_byte(b'0').unwrap();
        port.write_byte(b'\r').unwrap();
        port.flush().unwrap();
        assert_eq!(port.into_inner().tx, b"0\r");
    }

    #[test]
    fn test_timeouts_map_to_would_block() {
        let e = std::io::Error::from(std::io::ErrorKind::TimedOut);
        assert!(matches!(io_to_nb(e), nb::Error::WouldBlock));
        let e = std::io::Error::from(std::io::ErrorKind::BrokenPipe);
        assert!(matches!(io_to_nb(e), nb::Error::Other(_)));
    }
}
