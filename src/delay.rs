use embedded_hal::delay::DelayNs;
use std::time::Duration;

/// Blocking delay used to wait out sensor conversion times. Implemented for every
/// [`DelayNs`], so HAL delays and timers can be passed in directly.
pub trait Delay {
    fn delay_us(&mut self, us: u32);
}

impl<D: DelayNs + ?Sized> Delay for D {
    #[inline]
    fn delay_us(&mut self, us: u32) {
        DelayNs::delay_us(self, us)
    }
}

/// Sleeps the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns.into()));
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(us.into()));
    }
}

#[cfg(test)]
pub mod mock {
    use embedded_hal::delay::DelayNs;

    /// Returns immediately and remembers every requested delay in microseconds.
    #[derive(Debug, Default)]
    pub struct MockDelay {
        pub calls: Vec<u32>,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.calls.push(ns.div_ceil(1000));
        }

        fn delay_us(&mut self, us: u32) {
            self.calls.push(us);
        }
    }
}
