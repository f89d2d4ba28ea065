//! Byte transport and the response receiver

use crate::client::KmpRequest;
use crate::consts::{KMP_END, KMP_NOISE};
use crate::{ErrorKind, VectorTrait};

/// Byte-level serial link to the meter
///
/// The transport has no framing of its own. `read_byte` must never block: it returns `None`
/// if nothing has been received yet.
pub trait Transport {
    fn write(&mut self, data: &[u8]) -> Result<(), ErrorKind>;
    fn available(&mut self) -> bool;
    fn read_byte(&mut self) -> Option<u8>;
    /// Discard all pending input
    fn flush(&mut self);
    fn set_baud_rate(&mut self, _baud_rate: u32) -> Result<(), ErrorKind> {
        Ok(())
    }
}

/// Monotonic millisecond clock
pub trait Clock {
    fn millis(&mut self) -> u64;
}

/// Clock based on [`std::time::Instant`], counts from its creation
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    started: std::time::Instant,
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl StdClock {
    pub fn new() -> Self {
        Self {
            started: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn millis(&mut self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Receive raw KMP frame
///
/// Flushes the transport input, then polls it until the end byte arrives or `timeout_ms` is
/// exceeded. Noise bytes (0xFF and the response start byte 0x40) are dropped, everything else,
/// including the end byte, is appended to `raw`. Pass the result to [`crate::parse_frame`].
///
/// Errors:
///
/// * **Timeout** no end byte within the timeout
/// * **OOB** raw buffer is full
pub fn receive_frame<T, C, V>(
    transport: &mut T,
    clock: &mut C,
    timeout_ms: u64,
    raw: &mut V,
) -> Result<(), ErrorKind>
where
    T: Transport + ?Sized,
    C: Clock + ?Sized,
    V: VectorTrait<u8>,
{
    raw.clear();
    let started = clock.millis();
    transport.flush();
    loop {
        if clock.millis().saturating_sub(started) > timeout_ms {
            log::warn!("KMP timed out listening for data");
            return Err(ErrorKind::Timeout);
        }
        if !transport.available() {
            core::hint::spin_loop();
            continue;
        }
        let Some(b) = transport.read_byte() else {
            continue;
        };
        log::trace!("KMP received byte: 0x{:02X}", b);
        if KMP_NOISE.contains(&b) {
            continue;
        }
        raw.push(b)?;
        if b == KMP_END {
            log::debug!("KMP received {} raw bytes", raw.len());
            return Ok(());
        }
    }
}

/// Read a single register: request, receive, check and decode
///
/// `raw` and `payload` are scratch buffers. Only one exchange may be in flight on the
/// transport, so the call blocks until the value is decoded or the timeout is hit.
pub fn read_register<T, C, V>(
    transport: &mut T,
    clock: &mut C,
    timeout_ms: u64,
    mreq: &mut KmpRequest,
    reg: u16,
    raw: &mut V,
    payload: &mut V,
) -> Result<f32, ErrorKind>
where
    T: Transport + ?Sized,
    C: Clock + ?Sized,
    V: VectorTrait<u8>,
{
    log::debug!("KMP reading register {:04x}", reg);
    raw.clear();
    mreq.generate_get_register(reg, raw)?;
    transport.write(raw.as_slice())?;
    receive_frame(transport, clock, timeout_ms, raw)?;
    mreq.parse_response(raw.as_slice(), payload)
}
