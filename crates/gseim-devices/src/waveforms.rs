//! Source waveforms.

use std::f64::consts::PI;

/// A time-varying source waveform.
#[derive(Debug, Clone)]
pub enum Waveform {
    /// Constant value.
    Dc(f64),

    /// Damped/offset sinusoid: `offset + a * sin(2πf(t - td) + phi)`.
    ///
    /// Zero before the delay `td`; `phi` is in radians.
    Sine {
        offset: f64,
        amplitude: f64,
        freq: f64,
        phase: f64,
        delay: f64,
    },

    /// Trapezoidal pulse train.
    ///
    /// Holds `v1`, after `td` ramps to `v2` over `tr`, holds for `pw`,
    /// falls back over `tf`. Repeats with period `per` when `per > 0`.
    Pulse {
        v1: f64,
        v2: f64,
        td: f64,
        tr: f64,
        tf: f64,
        pw: f64,
        per: f64,
    },
}

impl Waveform {
    /// Create a constant waveform.
    pub fn dc(value: f64) -> Self {
        Waveform::Dc(value)
    }

    /// Create an undelayed sine waveform.
    pub fn sine(offset: f64, amplitude: f64, freq: f64) -> Self {
        Waveform::Sine {
            offset,
            amplitude,
            freq,
            phase: 0.0,
            delay: 0.0,
        }
    }

    /// Evaluate the waveform at time `t`.
    pub fn value_at(&self, t: f64) -> f64 {
        match *self {
            Waveform::Dc(v) => v,
            Waveform::Sine {
                offset,
                amplitude,
                freq,
                phase,
                delay,
            } => {
                if t < delay {
                    offset
                } else {
                    offset + amplitude * (2.0 * PI * freq * (t - delay) + phase).sin()
                }
            }
            Waveform::Pulse {
                v1,
                v2,
                td,
                tr,
                tf,
                pw,
                per,
            } => eval_pulse(v1, v2, td, tr, tf, pw, per, t),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn eval_pulse(v1: f64, v2: f64, td: f64, tr: f64, tf: f64, pw: f64, per: f64, t: f64) -> f64 {
    if t < td {
        return v1;
    }

    // Position within the current cycle.
    let mut tau = t - td;
    if per > 0.0 {
        tau %= per;
    }

    if tau < tr {
        if tr == 0.0 {
            v2
        } else {
            v1 + (v2 - v1) * tau / tr
        }
    } else if tau < tr + pw {
        v2
    } else if tau < tr + pw + tf {
        if tf == 0.0 {
            v1
        } else {
            v2 + (v1 - v2) * (tau - tr - pw) / tf
        }
    } else {
        v1
    }
}
