use std::cell::RefCell;
use std::rc::Rc;

use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use tracing::trace;

use crate::error::{HwError, Result};
use crate::util::{mcp3208_decode, mcp3208_request};

const SPI_CLOCK_HZ: u32 = 1_000_000;

/// 8-channel 12-bit SPI converter standing in for on-chip ADC pins.
pub struct Mcp3208 {
    spi: Spi,
}

impl Mcp3208 {
    pub fn new(chip_select: u8) -> Result<Self> {
        let ss = match chip_select {
            0 => SlaveSelect::Ss0,
            1 => SlaveSelect::Ss1,
            other => return Err(HwError::Spi(format!("unsupported chip select {other}"))),
        };
        let spi = Spi::new(Bus::Spi0, ss, SPI_CLOCK_HZ, Mode::Mode0)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        Ok(Self { spi })
    }

    pub fn read_channel(&mut self, channel: u8) -> Result<u16> {
        let request = mcp3208_request(channel)?;
        let mut reply = [0u8; 3];
        self.spi
            .transfer(&mut reply, &request)
            .map_err(|e| HwError::Spi(e.to_string()))?;
        let code = mcp3208_decode(reply);
        trace!(channel, code, "mcp3208 conversion");
        Ok(code)
    }

    /// Split the converter into per-channel handles sharing one bus.
    pub fn into_shared(self) -> Rc<RefCell<Mcp3208>> {
        Rc::new(RefCell::new(self))
    }
}

/// One input of a shared `Mcp3208`.
pub struct Mcp3208Channel {
    adc: Rc<RefCell<Mcp3208>>,
    channel: u8,
}

impl Mcp3208Channel {
    pub fn new(adc: Rc<RefCell<Mcp3208>>, channel: u8) -> Result<Self> {
        mcp3208_request(channel)?;
        Ok(Self { adc, channel })
    }

    pub fn read(&mut self) -> Result<u16> {
        self.adc.borrow_mut().read_channel(self.channel)
    }
}
