//! Console port bridge firmware.
//!
//! Core 0: UART input, poll loop, status LED
//! Core 1: edge handling only

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Executor;
use embassy_rp::bind_interrupts;
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::{PIO0, PIO1, UART1};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::uart::{Config as UartConfig, InterruptHandler as UartInterruptHandler, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::{Channel, Sender};
use embassy_sync::signal::Signal;
use embassy_time::Instant;
use port_bridge_rp2040::config::{bridge_config, CORE1_STACK_SIZE, EVENT_QUEUE_DEPTH, UART_BAUD};
use port_bridge_rp2040::{
    forward_reports, programs, ChannelEvents, ColorSignal, EventChannel, OutputMachine, PioEdges,
    PioWaveform, SignalIndicator, StatusLed, UartReports,
};
use port_core::{EdgeHandle, OutputTrigger, PollHandle, PollLoop, Protocol, SharedState};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

#[cfg(feature = "proto-mouse")]
type Bridge = port_core::PointerProtocol;
#[cfg(feature = "proto-mouse")]
type Mapper = report_proto::Sensitivity;

#[cfg(feature = "proto-xe1ap")]
type Bridge = port_core::JoystickProtocol;
#[cfg(feature = "proto-xe1ap")]
type Mapper = port_bridge_rp2040::JoystickMapper;

type Event = <Bridge as Protocol>::Event;
type Waveform = PioWaveform<'static, PIO0, 0>;
type Edges = PioEdges<'static, PIO0, 1>;

bind_interrupts!(struct Irqs {
    UART1_IRQ => UartInterruptHandler<UART1>;
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
    PIO1_IRQ_0 => PioInterruptHandler<PIO1>;
});

/// Snapshot and exclusion phase shared by both cores.
static SHARED: StaticCell<SharedState<Bridge>> = StaticCell::new();

/// Output state machine, pushed to from both cores.
static OUTPUT_SM: StaticCell<OutputMachine<'static, PIO0, 0>> = StaticCell::new();

/// Decoded events from the input task to the poll loop.
/// A Channel rather than a Signal: every pointer event carries motion.
static EVENTS: EventChannel<Event, EVENT_QUEUE_DEPTH> = Channel::new();

/// Latest indicator colour, latest value wins.
static COLOR: ColorSignal = Signal::new();

static mut CORE1_STACK: Stack<CORE1_STACK_SIZE> = Stack::new();
static EXECUTOR0: StaticCell<Executor> = StaticCell::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

#[cortex_m_rt::entry]
fn main() -> ! {
    info!("Port bridge starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Console port PIO: sm0 drives the port, sm1 reports edges ---
    let Pio {
        mut common,
        mut sm0,
        mut sm1,
        ..
    } = Pio::new(p.PIO0, Irqs);

    #[cfg(feature = "proto-mouse")]
    let direct = {
        let clk = common.make_pio_pin(p.PIN_16);
        let latch = common.make_pio_pin(p.PIN_17);
        let data = common.make_pio_pin(p.PIN_18);
        programs::plex(&mut common, &mut sm0, &clk, &latch, &data);
        programs::clock(&mut common, &mut sm1, &latch);
        None
    };

    #[cfg(feature = "proto-xe1ap")]
    let direct = {
        use embassy_rp::gpio::{Level, Output};

        let data = [
            common.make_pio_pin(p.PIN_2),
            common.make_pio_pin(p.PIN_3),
            common.make_pio_pin(p.PIN_4),
            common.make_pio_pin(p.PIN_5),
        ];
        let ack = common.make_pio_pin(p.PIN_6);
        let clr = common.make_pio_pin(p.PIN_19);
        programs::xe1ap_protocol(
            &mut common,
            &mut sm0,
            [&data[0], &data[1], &data[2], &data[3]],
            &ack,
            port_bridge_rp2040::config::XE1AP_CLOCK_DIVIDER,
        );
        programs::clock(&mut common, &mut sm1, &clr);
        Some(port_bridge_rp2040::DirectPins {
            select: Output::new(p.PIN_10, Level::High),
            run: Output::new(p.PIN_11, Level::High),
        })
    };

    let output_sm = OUTPUT_SM.init(Mutex::new(RefCell::new(sm0)));
    let mut poll_sink = PioWaveform::new(output_sm);
    if let Some(pins) = direct {
        poll_sink = poll_sink.with_direct_lines(pins);
    }
    let edge_sink = PioWaveform::new(output_sm);
    let edges = PioEdges::new(sm1);

    let shared = SHARED.init(SharedState::new(Instant::now()));
    let (poll_handle, edge_handle) = shared.split();

    // --- Status LED on its own PIO block ---
    let Pio {
        common: mut led_common,
        sm0: led_sm,
        ..
    } = Pio::new(p.PIO1, Irqs);
    let ws_program = PioWs2812Program::new(&mut led_common);
    let led = StatusLed::new(PioWs2812::new(
        &mut led_common,
        led_sm,
        p.DMA_CH2,
        p.PIN_12,
        &ws_program,
    ));

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = UART_BAUD;

    let uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (_tx, rx) = uart.split();
    let reports = UartReports::new(rx);

    spawn_core1(
        p.CORE1,
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) },
        move || {
            let executor1 = EXECUTOR1.init(Executor::new());
            executor1.run(|spawner| {
                spawner.spawn(edge_task(edge_handle, edges, edge_sink).unwrap());
            });
        },
    );

    info!("Console protocol: {}", Bridge::KIND);

    let executor0 = EXECUTOR0.init(Executor::new());
    executor0.run(|spawner| {
        spawner.spawn(led_task(led).unwrap());
        spawner.spawn(input_task(reports, EVENTS.sender()).unwrap());
        spawner.spawn(poll_task(poll_handle, poll_sink, ChannelEvents::new(EVENTS.receiver())).unwrap());
        info!("Port bridge initialized, waiting for the console...");
    });
}

/// Edge task (core 1) - one transaction per console read burst.
#[embassy_executor::task]
async fn edge_task(shared: EdgeHandle<'static, Bridge>, mut edges: Edges, mut sink: Waveform) {
    info!("Edge context running");
    OutputTrigger::new(shared).run(&mut edges, &mut sink).await
}

/// Poll task (core 0) - folds events, releases bursts, keeps the engine fed.
#[embassy_executor::task]
async fn poll_task(
    shared: PollHandle<'static, Bridge>,
    sink: Waveform,
    mut events: ChannelEvents<Event, EVENT_QUEUE_DEPTH>,
) {
    let indicator = SignalIndicator::new(&COLOR);
    let mut bridge = PollLoop::new(shared, sink, indicator, bridge_config(), Instant::now());
    bridge.run(&mut events).await
}

/// Input task - reads reports from UART and queues mapped events.
#[embassy_executor::task]
async fn input_task(
    mut input: UartReports<'static>,
    events: Sender<'static, CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>,
) {
    let mut mapper = Mapper::default();
    forward_reports(&mut input, &mut mapper, events).await
}

/// LED task - start-up flourish, then the sensitivity colour.
#[embassy_executor::task]
async fn led_task(mut led: StatusLed<'static, PIO1, 0>) {
    led.run(&COLOR, bridge_config().initial_level).await
}
