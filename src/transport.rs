use i2c::{BulkTransfer, Message};

/// Trait used by the driver to talk to the I2C bus. Only plain reads and writes addressed to a
/// 7-bit peripheral are needed. Implemented for every [`i2c::BulkTransfer`] bus; tests replace it
/// with `MockBus`.
pub trait Transport {
    type Error;

    /// Writes `data` to the peripheral at `address` as a single transaction.
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Fills `buf` from the peripheral at `address` as a single transaction.
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: BulkTransfer> Transport for T {
    type Error = <T as i2c::Master>::Error;

    #[inline]
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), <T as i2c::Master>::Error> {
        self.i2c_transfer(&mut [Message::Write {
            address: address.into(),
            data,
            flags: Default::default(),
        }])
    }

    #[inline]
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), <T as i2c::Master>::Error> {
        self.i2c_transfer(&mut [Message::Read {
            address: address.into(),
            data: buf,
            flags: Default::default(),
        }])
    }
}

#[cfg(test)]
pub mod mock {
    use i2c::{ReadFlags, WriteFlags};
    use std::collections::VecDeque;

    use super::*;

    #[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MockError {
        #[error("no acknowledgement")]
        Nack,
        #[error("transfer does not match the scheduled response")]
        Io,
    }

    #[derive(Debug, Default, Clone)]
    pub struct Transaction {
        pub address: u16,
        pub data: Vec<u8>,
    }

    /// Records every write and answers reads from a queue of scheduled responses. A read with
    /// nothing scheduled is NACKed like a sensor that is still busy.
    #[derive(Default)]
    pub struct MockBus {
        pub writes: Vec<Transaction>,
        pub next_reads: VecDeque<Transaction>,
        pub reads: usize,
        pub nack_writes: bool,
    }

    impl i2c::Master for MockBus {
        type Error = MockError;
    }

    impl BulkTransfer for MockBus {
        fn i2c_transfer_support(&mut self) -> Result<(ReadFlags, WriteFlags), MockError> {
            Ok(Default::default())
        }

        fn i2c_transfer(&mut self, messages: &mut [Message]) -> Result<(), MockError> {
            for message in messages.iter_mut() {
                match message {
                    Message::Write { address, data, .. } => {
                        if self.nack_writes {
                            return Err(MockError::Nack);
                        }
                        self.writes.push(Transaction {
                            address: *address,
                            data: data.to_vec(),
                        });
                    }
                    Message::Read { address, data, .. } => {
                        self.reads += 1;
                        let t = self.next_reads.pop_front().ok_or(MockError::Nack)?;
                        if t.address != *address || t.data.len() != data.len() {
                            return Err(MockError::Io);
                        }
                        data.copy_from_slice(&t.data);
                    }
                }
            }
            Ok(())
        }
    }

    impl MockBus {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn schedule_read(&mut self, address: u8, data: &[u8]) {
            self.next_reads.push_back(Transaction {
                address: address.into(),
                data: data.into(),
            });
        }

        /// Pops the most recent write and checks it against `address` and `data`.
        pub fn pop_write(&mut self, address: u8, data: &[u8]) -> bool {
            match self.writes.pop() {
                None => false,
                Some(t) => t.address == u16::from(address) && t.data == data,
            }
        }

        pub fn has_writes(&self) -> bool {
            !self.writes.is_empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    #[test]
    fn test_write_single_message() {
        let mut bus = MockBus::new();
        bus.write(0x4a, &[0x24, 0x00]).unwrap();
        assert!(bus.pop_write(0x4a, &[0x24, 0x00]));
        assert!(!bus.has_writes(), "no more write transactions expected");
    }

    #[test]
    fn test_read_scheduled() {
        let mut bus = MockBus::new();
        bus.schedule_read(0x4a, &[0xAA, 0xBB, 0xCC]);
        let mut buf = [0u8; 3];
        bus.read(0x4a, &mut buf).unwrap();
        assert_eq!(buf, [0xAA, 0xBB, 0xCC]);
        assert_eq!(bus.reads, 1);
    }

    #[test]
    fn test_read_nothing_scheduled() {
        let mut bus = MockBus::new();
        let mut buf = [0u8; 3];
        assert_eq!(bus.read(0x4a, &mut buf), Err(MockError::Nack));
    }

    #[test]
    fn test_read_wrong_address() {
        let mut bus = MockBus::new();
        bus.schedule_read(0x4b, &[0x00, 0x00, 0x81]);
        let mut buf = [0u8; 3];
        assert_eq!(bus.read(0x4a, &mut buf), Err(MockError::Io));
    }

    #[test]
    fn test_write_nack() {
        let mut bus = MockBus::new();
        bus.nack_writes = true;
        assert_eq!(bus.write(0x4a, &[0x30, 0x6d]), Err(MockError::Nack));
        assert!(!bus.has_writes());
    }
}
