//! Word-oriented transactions. Commands are 16-bit words sent MSB first; every 16-bit word the
//! sensor returns is followed by a CRC-8 byte, which is checked before the word is handed out.

use log::{debug, warn};

use crate::{crc, Delay, Error, Result, Transport};

pub const WORD_SIZE: usize = 2;
const WORD_WITH_CRC_SIZE: usize = WORD_SIZE + 1;

/// Upper bound on the number of words fetched by a single read.
pub const MAX_WORDS: usize = 2;

pub fn write_command<T: Transport>(
    bus: &mut T,
    address: u8,
    command: u16,
) -> Result<(), T::Error> {
    debug!("command {command:#06x} -> {address:#04x}");
    bus.write(address, &command.to_be_bytes()).map_err(Error::Bus)
}

/// Reads `words.len()` words, each followed by its checksum.
pub fn read_words<T: Transport>(
    bus: &mut T,
    address: u8,
    words: &mut [u16],
) -> Result<(), T::Error> {
    if words.is_empty() || words.len() > MAX_WORDS {
        return Err(Error::BadData);
    }

    let mut buf = [0u8; MAX_WORDS * WORD_WITH_CRC_SIZE];
    let buf = &mut buf[..words.len() * WORD_WITH_CRC_SIZE];
    bus.read(address, buf).map_err(Error::Bus)?;

    for (word, chunk) in words.iter_mut().zip(buf.chunks_exact(WORD_WITH_CRC_SIZE)) {
        let data = [chunk[0], chunk[1]];
        if !crc::check(&data, chunk[2]) {
            warn!(
                "checksum mismatch from {address:#04x} (ours: {:#04x} != sensor's: {:#04x})",
                crc::compute(&data),
                chunk[2]
            );
            return Err(Error::Crc);
        }
        *word = u16::from_be_bytes(data);
    }

    debug!("read {words:04x?} <- {address:#04x}");
    Ok(())
}

/// Like [`read_words`] but hands out the payload as bytes in wire order. `out` must hold a whole
/// number of words.
pub fn read_bytes<T: Transport>(
    bus: &mut T,
    address: u8,
    out: &mut [u8],
) -> Result<(), T::Error> {
    if out.len() % WORD_SIZE != 0 {
        return Err(Error::BadData);
    }

    let mut words = [0u16; MAX_WORDS];
    let n_words = out.len() / WORD_SIZE;
    if n_words > MAX_WORDS {
        return Err(Error::BadData);
    }
    read_words(bus, address, &mut words[..n_words])?;

    for (chunk, word) in out.chunks_exact_mut(WORD_SIZE).zip(words.iter()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    Ok(())
}

/// Sends `command`, waits `delay_us` and reads back the response words.
pub fn delayed_read_command<T: Transport, D: Delay>(
    bus: &mut T,
    delay: &mut D,
    address: u8,
    command: u16,
    delay_us: u32,
    words: &mut [u16],
) -> Result<(), T::Error> {
    write_command(bus, address, command)?;
    if delay_us > 0 {
        delay.delay_us(delay_us);
    }
    read_words(bus, address, words)
}
