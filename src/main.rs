mod command;
mod config;
mod console;
mod device;
mod gpio;
mod transport;

use anyhow::Result;
use command::{handlers, Dispatcher};
use config::{ConsoleConfig, TransportKind};
use console::{Console, ConsoleEvent};
use device::Device;
use gpio::SimulatedLed;
use led_console_shared::{LedPin, Uptime};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use transport::{SerialConnector, StdioConnector, TransportConnector};

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout may be the console itself
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = ConsoleConfig::from_env()?;

    info!("LED console starting");
    info!("  Transport: {}", config.transport);
    info!("  Tick interval: {:?}", config.tick_interval);

    let dispatcher = Dispatcher::new(handlers::COMMANDS)?;
    info!("  Commands: {}", dispatcher.names().collect::<Vec<_>>().join(", "));

    let led = SimulatedLed::new(config.led_pin);
    info!("  LED: GPIO{}", led.pin());

    let mut device = Device::new(dispatcher, led);
    let uptime = Uptime::start();

    let mut console = match &config.transport {
        TransportKind::Serial { port, baud } => {
            open_console(SerialConnector::new(port.clone(), *baud), config.max_line_len).await?
        }
        TransportKind::Stdio => open_console(StdioConnector, config.max_line_len).await?,
    };

    run(&mut device, &mut console, &uptime, config.tick_interval).await?;

    info!(
        "[LED] GPIO{}: {} writes, {} level changes",
        device.led().pin(),
        device.led().writes(),
        device.led().changes()
    );
    Ok(())
}

async fn open_console<C: TransportConnector>(connector: C, max_line_len: usize) -> Result<Console> {
    let stream = connector.connect().await?;
    info!(
        "[CONSOLE] Connected via {} ({})",
        connector.name(),
        connector.endpoint()
    );
    Ok(Console::start(stream, connector.name(), max_line_len))
}

/// Main loop: at most one line per iteration, then always one blink tick
async fn run<P: LedPin>(
    device: &mut Device<P>,
    console: &mut Console,
    uptime: &Uptime,
    tick_interval: Duration,
) -> Result<()> {
    let mut ticker = interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            event = console.recv() => {
                match event {
                    Some(ConsoleEvent::Line(line)) => {
                        let result = device.handle_line(&line, uptime.millis());
                        for reply in result.lines() {
                            console.send(reply).await?;
                        }
                    }
                    Some(ConsoleEvent::Closed { reason }) => {
                        warn!("[CONSOLE] {} transport closed: {}", console.transport(), reason);
                        break;
                    }
                    None => {
                        error!("[CONSOLE] Console task ended");
                        break;
                    }
                }
            }
            _ = ticker.tick() => {}
        }

        device.tick(uptime.millis());
    }

    info!("LED console stopped");
    Ok(())
}
