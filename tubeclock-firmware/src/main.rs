//! Tubeclock - GPS-Disciplined Tube Clock Firmware
//!
//! Main firmware binary for RP2040-based boards driving six tube drivers
//! on a shared SPI bus. The GPS receiver's 1PPS edge paces the clock and
//! its RMC sentences keep it aligned to UTC.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::Spi;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUartRx, Config as UartConfig};
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tubeclock_core::config::{parse_config, ClockConfig};
use tubeclock_core::render::DeviceTable;
use tubeclock_hal_rp2040::{spi_config, PushPull, TimedSpi};

mod channels;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit clock.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../clock.toml");

/// NMEA receivers default to 9600 baud
const GPS_BAUD: u32 = 9600;

/// Interval between fault summaries in the log
const FAULT_REPORT_SECS: u64 = 60;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cell for the UART receive buffer (must live forever)
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tubeclock firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    channels::set_brightness(config.display.brightness);

    // GPS receiver on UART0 (RX only, GPIO1)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = GPS_BAUD;
    let rx_buf = RX_BUF.init([0u8; 256]);
    let gps_rx = BufferedUartRx::new(p.UART0, Irqs, p.PIN_1, rx_buf, uart_config);
    info!("UART initialized for GPS at {} baud", GPS_BAUD);

    // Tube drivers: SPI0 (SCK=GPIO18, MOSI=GPIO19), selects on GPIO2-7
    let bus_config = config.spi.spi_config();
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, spi_config(&bus_config));
    let bus = TimedSpi::new(spi, bus_config.timeout_ms);
    let selects = [
        PushPull::new(Output::new(p.PIN_2, Level::High)),
        PushPull::new(Output::new(p.PIN_3, Level::High)),
        PushPull::new(Output::new(p.PIN_4, Level::High)),
        PushPull::new(Output::new(p.PIN_5, Level::High)),
        PushPull::new(Output::new(p.PIN_6, Level::High)),
        PushPull::new(Output::new(p.PIN_7, Level::High)),
    ];
    let tubes = DeviceTable::new(bus, selects);
    info!("SPI initialized at {} Hz", bus_config.frequency);

    // 1PPS input and fix indicator (high until the first valid fix)
    let pps = Input::new(p.PIN_8, Pull::Down);
    let indicator = PushPull::new(Output::new(p.PIN_9, Level::High));

    // Light sensor on ADC0 (GPIO26)
    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let light_sensor = Channel::new_pin(p.PIN_26, Pull::None);
    info!("ADC initialized for ambient light");

    // Spawn tasks
    spawner.spawn(tasks::gps_rx_task(gps_rx)).unwrap();
    spawner
        .spawn(tasks::dispatch_task(config.timing.dispatch_period_ms))
        .unwrap();
    spawner
        .spawn(tasks::pps_task(pps, indicator, config.time))
        .unwrap();
    spawner
        .spawn(tasks::ambient_task(adc, light_sensor, config.timing.ambient_period_ms))
        .unwrap();
    spawner
        .spawn(tasks::render_task(tubes, config.display, config.timing))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        Timer::after_secs(FAULT_REPORT_SECS).await;
        let faults = channels::faults();
        if faults.total() > 0 {
            info!("Faults since boot: {:?}", faults);
        } else {
            trace!("Main loop heartbeat");
        }
    }
}

/// Parse the embedded configuration
///
/// build.rs validates clock.toml, so failure here means the two parsers
/// disagree. The built-in defaults keep the clock running.
fn load_config() -> ClockConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            ClockConfig::default()
        }
    }
}
