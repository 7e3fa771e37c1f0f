//! Blocking driver for Sensirion STS3x temperature sensors on any bus implementing the traits of
//! the [`i2c`] crate.
//!
//! ```ignore
//! let mut sensor = sts3x::Sts3x::new(bus, sts3x::StdDelay);
//! while sensor.probe().is_err() {
//!     std::thread::sleep(std::time::Duration::from_secs(1));
//! }
//! let t = sensor.measure_blocking_read()?;
//! println!("{:.2}°C", t.celsius());
//! ```

mod crc;
mod delay;
mod error;
mod sts3x;
mod transport;
pub mod words;

pub use delay::{Delay, StdDelay};
pub use error::*;
pub use i2c;
pub use sts3x::*;
pub use transport::Transport;
