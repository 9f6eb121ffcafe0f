// src/native/serial.rs

use crate::common::frame::{Parity, SerialSettings};
use crate::common::hal_traits::{MeterSerial, MeterTimer};
use serialport::{ClearBuffer, DataBits, FlowControl, SerialPort, StopBits};
use std::io::{self, Read};
use std::time::{Duration, Instant};

/// Meter link over a host serial port, with DTR as the ready line.
pub struct SerialPortInterface {
    port: Box<dyn SerialPort>,
}

impl SerialPortInterface {
    /// Opens `path` at 4800 8N1 with DTR released.
    pub fn open(path: &str) -> Result<Self, serialport::Error> {
        let settings = SerialSettings::RS22812;
        let port = serialport::new(path, settings.baud_rate)
            .data_bits(data_bits(settings.data_bits))
            .parity(parity(settings.parity))
            .stop_bits(stop_bits(settings.stop_bits))
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(10))
            .open()?;
        log::info!("rs22812: opened {} at {} baud", path, settings.baud_rate);
        Self::from_port(port)
    }

    /// Wraps an already configured port.
    pub fn from_port(mut port: Box<dyn SerialPort>) -> Result<Self, serialport::Error> {
        port.write_data_terminal_ready(false)?;
        Ok(SerialPortInterface { port })
    }

    pub fn name(&self) -> Option<String> {
        self.port.name()
    }
}

impl std::fmt::Debug for SerialPortInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPortInterface")
            .field("port", &self.port.name())
            .finish()
    }
}

fn data_bits(bits: u8) -> DataBits {
    match bits {
        5 => DataBits::Five,
        6 => DataBits::Six,
        7 => DataBits::Seven,
        _ => DataBits::Eight,
    }
}

fn parity(parity: Parity) -> serialport::Parity {
    match parity {
        Parity::None => serialport::Parity::None,
        Parity::Even => serialport::Parity::Even,
        Parity::Odd => serialport::Parity::Odd,
    }
}

fn stop_bits(bits: u8) -> StopBits {
    if bits == 2 {
        StopBits::Two
    } else {
        StopBits::One
    }
}

impl MeterTimer for SerialPortInterface {
    type Instant = Instant;

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }

    fn now(&self) -> Self::Instant {
        Instant::now()
    }
}

impl MeterSerial for SerialPortInterface {
    type Error = serialport::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        if self.port.bytes_to_read().map_err(nb::Error::Other)? == 0 {
            return Err(nb::Error::WouldBlock);
        }
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Ok(byte[0]),
            Ok(_) => Err(nb::Error::WouldBlock),
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                Err(nb::Error::WouldBlock)
            }
            Err(e) => Err(nb::Error::Other(e.into())),
        }
    }

    fn discard_input(&mut self) -> Result<(), Self::Error> {
        self.port.clear(ClearBuffer::Input)
    }

    fn set_ready_to_receive(&mut self, ready: bool) -> Result<(), Self::Error> {
        self.port.write_data_terminal_ready(ready)
    }
}
