//! Parser for GSEIM scenario (`.in`) files.
//!
//! A scenario file is a line-oriented text document with three blocks:
//!
//! ```text
//! * buck converter, open loop
//! title buck
//! begin_circuit
//! vsrc vin supply 0 dc=12
//! switch s1 supply sw f=20k d=0.4 ron=1m roff=1meg
//! diode d1 0 sw
//! ind l1 sw out l=100u
//! cap c1 out 0 c=47u
//! res rload out 0 r=5
//! end_circuit
//! begin_solve
//! method=trz
//! t_end=2m
//! t_step=0.5u
//! end_solve
//! begin_output
//! v(out)
//! i(vin)
//! end_output
//! ```
//!
//! Rules:
//!
//! - `*` or `#` begins a comment line; blank lines are ignored; a line
//!   starting with `+` continues the previous logical line.
//! - `title <text>` may appear before `begin_circuit`.
//! - Element lines read `<type> <name> <node+> <node-> [key=value ...]`.
//!   Node `0` is ground; other node names are interned in order of first
//!   appearance. Types: `res` (`r=`), `cap` (`c=`, `v0=`), `ind` (`l=`,
//!   `i0=`), `vsrc`/`isrc` (waveform keys), `diode` (`is=`, `n=`),
//!   `switch` (`f=`, `d=`, `td=`, `ron=`, `roff=`).
//! - Source waveform keys: `type=dc|sine|pulse` (default `dc`); `dc=`;
//!   sine `a= f= phi_deg= offset= td=`; pulse `v1= v2= td= tr= tf= pw=
//!   per=`.
//! - Numeric values accept SI suffixes (`10k`, `4.7u`, `1meg`).
//! - The solve block takes `method=be|trz`, `t_end=` and `t_step=`
//!   (required), `t_start=`, and Newton overrides `itmax=`, `vtol=`,
//!   `itol=`.
//! - The output block selects columns: `v(<node>)` or `i(<vsrc name>)`,
//!   one per line, emitted in declaration order. Without the block, every
//!   non-ground node voltage is emitted in interning order.
//!
//! All errors carry the 1-based source line of the offending construct.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod scenario;

pub use error::{Error, Result};
pub use parser::parse;
pub use scenario::{Method, OutputVar, Scenario, SolveParams};
