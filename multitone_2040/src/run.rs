use embedded_hal::blocking::delay::DelayMs;
use multitone::SharedMultiTone;
use rp_pico::hal::Timer;

use crate::{TonePin, NUM_TONES};

const STEP_MS: u32 = 250;

// One row per step, one column per channel.  0 holds the channel low.
const PATTERN: [[u32; NUM_TONES]; 8] = [
    [262, 0, 0, 131],
    [330, 0, 0, 131],
    [392, 523, 0, 131],
    [330, 523, 0, 0],
    [294, 0, 440, 147],
    [349, 0, 440, 147],
    [440, 587, 0, 147],
    [349, 587, 0, 0],
];

fn play_step(tones: &SharedMultiTone<TonePin>, step: &[u32; NUM_TONES]) {
    for (index, &hz) in step.iter().enumerate() {
        if hz == 0 {
            tones.disable(index);
        } else {
            tones.set_frequency(index, hz);
            tones.enable(index);
        }
    }
}

pub fn run(tones: &SharedMultiTone<TonePin>, mut timer: Timer) -> ! {
    loop {
        for step in PATTERN.iter() {
            play_step(tones, step);
            timer.delay_ms(STEP_MS);
        }
    }
}
