//! migScope: cycle-accurate model of an on-chip trace recorder.
//!
//! A [`Recorder`] watches a stream of samples, one per clock cycle. A [`Trigger`] reduces up to four
//! detector match bits through a programmable [`BooleanFunctionUnit`] into a `hit` pulse, the
//! [`Sequencer`] arms and disarms recording, and [`Storage`] keeps a circular buffer of samples with a
//! pre/post-trigger window that the host reads back through the register bank.
//!
//! Every component is a synchronous state machine: its outputs and next state are a pure function of
//! the current state and the inputs of the cycle (see [`Fsm`]).

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(deprecated_in_future)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
//
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![deny(rustdoc::invalid_html_tags)]
#![deny(rustdoc::invalid_rust_codeblocks)]
#![deny(rustdoc::bare_urls)]
#![deny(unreachable_pub)]
//
#![allow(clippy::needless_lifetimes)]
#![allow(elided_lifetimes_in_paths)]

pub mod bank;
pub mod error;
pub mod fsm;
pub mod lut;
pub mod recorder;
pub mod sequencer;
pub mod storage;
pub mod trigger;
pub mod utils;

pub use bank::{Access, AccessKind, Field, FieldInfo, ReadOnly, ReadWrite, RecorderBank, Strobe, Writable};
pub use error::ConfigurationError;
pub use fsm::{Clocked, Fsm};
pub use lut::{BfuInput, BfuOutput, BooleanFunctionUnit, Latency, ProgInput, ProgMode, TruthTable};
pub use recorder::{Probe, Recorder, RecorderConfig};
pub use sequencer::{Phase, Sequencer, SequencerInput, SequencerOutput, SequencerState};
pub use storage::{Memory, Storage, StorageInput, StorageOutput, StorageState};
pub use trigger::{Detector, Trigger, TriggerOutput, MAX_PORTS};
pub use utils::*;
