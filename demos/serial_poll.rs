//! Polls a Multical 402 over a serial port (optical eye or wired KMP port)
//!
//! cargo run --example serial_poll -- /dev/ttyUSB0
use serial::prelude::*;
use std::io::{Read, Write};
use std::time::Duration;

use multical402::consts::{
    KMP_REG_ENERGY, KMP_REG_FLOW, KMP_REG_POWER, KMP_REG_TEMP_DIFF, KMP_REG_TEMP_FLOW,
    KMP_REG_TEMP_RETURN, KMP_REG_VOLUME,
};
use multical402::poller::{Poller, PollerConfig};
use multical402::transport::{StdClock, Transport};
use multical402::ErrorKind;

struct SerialTransport {
    port: serial::SystemPort,
    pending: Option<u8>,
}

impl SerialTransport {
    fn try_read(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            _ => None,
        }
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, data: &[u8]) -> Result<(), ErrorKind> {
        self.port
            .write_all(data)
            .map_err(|_| ErrorKind::TransportError)
    }
    fn available(&mut self) -> bool {
        if self.pending.is_none() {
            self.pending = self.try_read();
        }
        self.pending.is_some()
    }
    fn read_byte(&mut self) -> Option<u8> {
        self.pending.take().or_else(|| self.try_read())
    }
    fn flush(&mut self) {
        self.pending = None;
        while self.try_read().is_some() {}
    }
    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), ErrorKind> {
        self.port
            .reconfigure(&|settings| {
                settings.set_baud_rate(serial::BaudRate::from_speed(baud_rate as usize))?;
                settings.set_char_size(serial::Bits8);
                settings.set_parity(serial::ParityNone);
                settings.set_stop_bits(serial::Stop2);
                settings.set_flow_control(serial::FlowNone);
                Ok(())
            })
            .map_err(|_| ErrorKind::TransportError)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_owned());
    let mut port = serial::open(&path)?;
    port.set_timeout(Duration::from_millis(1))?;

    let mut poller: Poller<SerialTransport, StdClock, Box<dyn FnMut(f32)>> =
        Poller::new(PollerConfig::default(), StdClock::new());
    poller.set_transport(SerialTransport {
        port,
        pending: None,
    });
    for (reg, name) in [
        (KMP_REG_ENERGY, "energy"),
        (KMP_REG_POWER, "power"),
        (KMP_REG_FLOW, "flow"),
        (KMP_REG_VOLUME, "volume"),
        (KMP_REG_TEMP_FLOW, "flow temperature"),
        (KMP_REG_TEMP_RETURN, "return temperature"),
        (KMP_REG_TEMP_DIFF, "temperature difference"),
    ] {
        poller.add_register(reg, Box::new(move |value| println!("{}: {}", name, value)));
    }
    poller.setup()?;
    loop {
        if !poller.tick() {
            std::thread::sleep(Duration::from_millis(50));
        }
    }
}
