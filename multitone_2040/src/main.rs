#![no_std]
#![no_main]

use panic_halt as _;
use rp_pico::entry;
use rp_pico::hal::{
    self,
    fugit::ExtU32,
    gpio,
    pac::{self, interrupt},
    timer::{Alarm, Alarm0},
};

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use critical_section::Mutex;
use multitone::{MasterClock, SharedMultiTone, TickTimer};

mod run;

type TonePin = gpio::Pin<gpio::DynPinId, gpio::FunctionSioOutput, gpio::PullDown>;

const NUM_TONES: usize = 4;

// global mutable state, shared with TIMER_IRQ_0
static TONES: SharedMultiTone<TonePin> = SharedMultiTone::new();
static ALARM: Mutex<RefCell<Option<Alarm0>>> = Mutex::new(RefCell::new(None));
static PERIOD_US: AtomicU32 = AtomicU32::new(0);

/// The master clock, on RP2040 timer alarm 0
struct AlarmTicker {
    alarm: Option<Alarm0>,
}

impl TickTimer for AlarmTicker {
    fn schedule(&mut self, period_us: u32) {
        PERIOD_US.store(period_us, Ordering::Relaxed);
    }
    fn start(&mut self) {
        let Some(mut alarm) = self.alarm.take() else {
            return;
        };
        let _ = alarm.schedule(PERIOD_US.load(Ordering::Relaxed).micros());
        alarm.enable_interrupt();
        critical_section::with(|cs| *ALARM.borrow_ref_mut(cs) = Some(alarm));
        unsafe {
            // SAFETY: the alarm is parked in ALARM and the tone bank is
            // stored before this runs, so the handler only sees initialized
            // state.
            pac::NVIC::unmask(pac::Interrupt::TIMER_IRQ_0);
        }
    }
}

#[entry]
fn start() -> ! {
    let mut pac = pac::Peripherals::take().unwrap();
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
    let clocks = hal::clocks::init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let sio = hal::Sio::new(pac.SIO);
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    // Pinout
    // Tone 0   GP2
    // Tone 1   GP3
    // Tone 2   GP4
    // Tone 3   GP5
    let tone_pins: [TonePin; NUM_TONES] = [
        pins.gpio2.into_push_pull_output().into_dyn_pin(),
        pins.gpio3.into_push_pull_output().into_dyn_pin(),
        pins.gpio4.into_push_pull_output().into_dyn_pin(),
        pins.gpio5.into_push_pull_output().into_dyn_pin(),
    ];

    let mut timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    let ticker = AlarmTicker {
        alarm: timer.alarm_0(),
    };

    // start silent, the pattern in run() turns channels on
    let _ = TONES.start(
        MasterClock::new_8000(),
        &[0; NUM_TONES],
        tone_pins,
        NUM_TONES,
        ticker,
    );

    run::run(&TONES, timer)
}

#[interrupt]
fn TIMER_IRQ_0() {
    critical_section::with(|cs| {
        if let Some(alarm) = ALARM.borrow_ref_mut(cs).as_mut() {
            alarm.clear_interrupt();
            let _ = alarm.schedule(PERIOD_US.load(Ordering::Relaxed).micros());
        }
    });
    TONES.on_tick();
}
