//! Periodic register polling
//!
//! ```no_run
//! # #[cfg(feature = "std")]
//! # mod with_std {
//! use multical402::poller::{Poller, PollerConfig};
//! use multical402::transport::{StdClock, Transport};
//! use multical402::consts::{KMP_REG_ENERGY, KMP_REG_TEMP_FLOW};
//!
//! # fn code<T: Transport>(port: T) {
//! let mut poller: Poller<T, StdClock, Box<dyn FnMut(f32)>> =
//!     Poller::new(PollerConfig::default(), StdClock::new());
//! poller.set_transport(port);
//! poller.add_register(KMP_REG_ENERGY, Box::new(|v| println!("energy: {}", v)));
//! poller.add_register(KMP_REG_TEMP_FLOW, Box::new(|v| println!("flow temp: {}", v)));
//! poller.setup().unwrap();
//! loop {
//!     poller.tick();
//! }
//! # } }
//! ```

use alloc::vec::Vec;

#[cfg(feature = "with_bincode")]
use bincode::{Decode, Encode};
#[cfg(feature = "with_serde")]
use serde::{Deserialize, Serialize};

use crate::client::KmpRequest;
use crate::consts::{KMP_BAUD_RATE, KMP_DEFAULT_POLL_INTERVAL_MS, KMP_DEFAULT_TIMEOUT_MS};
use crate::transport::{read_register, Clock, Transport};
use crate::ErrorKind;

/// Receiver of decoded register values
pub trait ValueSink {
    fn publish_state(&mut self, value: f32);
}

impl<F: FnMut(f32)> ValueSink for F {
    #[inline]
    fn publish_state(&mut self, value: f32) {
        self(value);
    }
}

/// Polling settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "with_serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "with_serde", serde(default))]
#[cfg_attr(feature = "with_bincode", derive(Decode, Encode))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollerConfig {
    /// time between poll cycles
    pub interval_ms: u64,
    /// receive timeout, per register
    pub timeout_ms: u64,
    pub baud_rate: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: KMP_DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: KMP_DEFAULT_TIMEOUT_MS,
            baud_rate: KMP_BAUD_RATE,
        }
    }
}

pub struct Register<S: ValueSink> {
    pub address: u16,
    sink: S,
}

impl<S: ValueSink> Register<S> {
    pub fn new(address: u16, sink: S) -> Self {
        Self { address, sink }
    }
}

/// Polls the registered meter registers, one exchange at a time
pub struct Poller<T: Transport, C: Clock, S: ValueSink> {
    pub config: PollerConfig,
    transport: Option<T>,
    clock: C,
    registers: Vec<Register<S>>,
    last_poll: Option<u64>,
    mreq: KmpRequest,
    raw: Vec<u8>,
    payload: Vec<u8>,
}

impl<T: Transport, C: Clock, S: ValueSink> Poller<T, C, S> {
    pub fn new(config: PollerConfig, clock: C) -> Self {
        Self {
            config,
            transport: None,
            clock,
            registers: Vec::new(),
            last_poll: None,
            mreq: KmpRequest::new(),
            raw: Vec::new(),
            payload: Vec::new(),
        }
    }

    pub fn set_transport(&mut self, transport: T) {
        self.transport = Some(transport);
    }

    pub fn transport_mut(&mut self) -> Option<&mut T> {
        self.transport.as_mut()
    }

    /// Registers are polled in the order they were added
    pub fn add_register(&mut self, address: u16, sink: S) {
        self.registers.push(Register::new(address, sink));
    }

    pub fn registers(&self) -> impl Iterator<Item = u16> + '_ {
        self.registers.iter().map(|r| r.address)
    }

    /// Prepare the transport, must be called once before polling
    pub fn setup(&mut self) -> Result<(), ErrorKind> {
        log::info!("setting up Multical 402 poller");
        let Some(transport) = self.transport.as_mut() else {
            log::error!("KMP transport not set");
            return Err(ErrorKind::NoTransport);
        };
        transport.set_baud_rate(self.config.baud_rate)
    }

    /// Run a poll cycle if the interval has passed since the previous one
    ///
    /// Returns true if the registers have been polled. Without a transport nothing is polled,
    /// the missing transport is reported by [`Poller::setup`] only.
    pub fn tick(&mut self) -> bool {
        if self.transport.is_none() {
            return false;
        }
        let now = self.clock.millis();
        if let Some(last_poll) = self.last_poll {
            if now.saturating_sub(last_poll) < self.config.interval_ms {
                return false;
            }
        }
        log::debug!("updating Multical 402 registers");
        self.update_registers();
        self.last_poll = Some(now);
        true
    }

    /// Poll all registers, failed reads are skipped
    ///
    /// Returns the number of values published
    pub fn update_registers(&mut self) -> usize {
        if self.transport.is_none() {
            return 0;
        }
        let mut published = 0;
        for i in 0..self.registers.len() {
            let address = self.registers[i].address;
            match self.read_register(address) {
                Ok(value) => {
                    log::debug!("KMP register {:04x} = {}", address, value);
                    self.registers[i].sink.publish_state(value);
                    published += 1;
                }
                Err(e) if e.is_transient() => {
                    log::debug!("KMP register {:04x} skipped: {}", address, e);
                }
                Err(e) => {
                    log::warn!("KMP register {:04x} read failed: {}", address, e);
                }
            }
        }
        published
    }

    /// Read a single register value
    pub fn read_register(&mut self, address: u16) -> Result<f32, ErrorKind> {
        let transport = self.transport.as_mut().ok_or(ErrorKind::NoTransport)?;
        read_register(
            transport,
            &mut self.clock,
            self.config.timeout_ms,
            &mut self.mreq,
            address,
            &mut self.raw,
            &mut self.payload,
        )
    }
}
