//! UART report input and the queue feeding the poll loop.
//!
//! Reports arrive byte by byte from the USB-host co-processor. The input
//! task decodes and maps them, then hands the events to the poll loop over
//! an embassy [`Channel`]; the poll loop drains it without ever waiting.

use defmt::warn;
use embassy_rp::uart::{Async, Error as UartError, UartRx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use port_core::{EventSource, InputError, JoystickState, PointerEvent};
use report_proto::{joystick_report_to_state, FrameParser, Report, Sensitivity};

/// Events between the input task and the poll loop.
pub type EventChannel<E, const N: usize> = Channel<CriticalSectionRawMutex, E, N>;

/// Convert UART errors to [`InputError`].
///
/// A helper instead of a `From` impl, both types being foreign here.
#[inline]
fn uart_error_to_input_error(e: UartError) -> InputError {
    match e {
        UartError::Overrun => InputError::Overflow,
        _ => InputError::Io,
    }
}

/// Framed reports read from the co-processor link.
pub struct UartReports<'d> {
    rx: UartRx<'d, Async>,
    parser: FrameParser,
}

impl<'d> UartReports<'d> {
    #[must_use]
    pub fn new(rx: UartRx<'d, Async>) -> Self {
        Self {
            rx,
            parser: FrameParser::new(),
        }
    }

    /// Wait for the next complete report.
    ///
    /// A broken frame is logged and reported as [`InputError::Frame`]; the
    /// parser has already resynchronised.
    pub async fn receive(&mut self) -> Result<Report, InputError> {
        let mut byte = [0u8; 1];
        loop {
            self.rx
                .read(&mut byte)
                .await
                .map_err(uart_error_to_input_error)?;

            match self.parser.push_byte(byte[0]) {
                Ok(Some(report)) => return Ok(report),
                Ok(None) => {}
                Err(e) => {
                    warn!("dropped report frame: {}", e);
                    return Err(InputError::Frame);
                }
            }
        }
    }
}

/// Turns reports into the events of the compiled protocol variant.
pub trait ReportMapper {
    type Event;

    /// `None` for reports the variant has no use for.
    fn map(&mut self, report: &Report) -> Option<Self::Event>;
}

impl ReportMapper for Sensitivity {
    type Event = PointerEvent;

    fn map(&mut self, report: &Report) -> Option<PointerEvent> {
        match report {
            Report::Mouse(m) => Some(self.mouse_to_event(m)),
            Report::Joystick(_) => None,
        }
    }
}

/// Joystick reports map one to one.
#[derive(Debug, Clone, Copy, Default)]
pub struct JoystickMapper;

impl ReportMapper for JoystickMapper {
    type Event = JoystickState;

    fn map(&mut self, report: &Report) -> Option<JoystickState> {
        match report {
            Report::Joystick(j) => Some(joystick_report_to_state(j)),
            Report::Mouse(_) => None,
        }
    }
}

/// Read, map and queue reports forever.
///
/// Waits when the queue is full rather than dropping: a lost pointer event
/// would be lost motion.
pub async fn forward_reports<M: ReportMapper, const N: usize>(
    input: &mut UartReports<'_>,
    mapper: &mut M,
    events: Sender<'_, CriticalSectionRawMutex, M::Event, N>,
) -> ! {
    loop {
        match input.receive().await {
            Ok(report) => match mapper.map(&report) {
                Some(event) => events.send(event).await,
                None => warn!("ignoring {} report", report.kind()),
            },
            Err(e) => warn!("input error: {}", e),
        }
    }
}

/// Poll-loop side of the event queue.
pub struct ChannelEvents<E: 'static, const N: usize> {
    rx: Receiver<'static, CriticalSectionRawMutex, E, N>,
}

impl<E, const N: usize> ChannelEvents<E, N> {
    #[must_use]
    pub fn new(rx: Receiver<'static, CriticalSectionRawMutex, E, N>) -> Self {
        Self { rx }
    }
}

impl<E, const N: usize> EventSource<E> for ChannelEvents<E, N> {
    fn poll_event(&mut self) -> Option<E> {
        self.rx.try_receive().ok()
    }
}
