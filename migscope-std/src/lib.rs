//! Standard detectors for the migScope trigger.
//!
//! Each detector compares the shared trigger value against its own condition and produces one match
//! bit per cycle, either combinationally or registered one cycle later.

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
#![allow(elided_lifetimes_in_paths)]

use migscope::*;

mod edge;
mod range;
mod term;

pub use edge::{EdgeDetector, EdgeMode};
pub use range::RangeDetector;
pub use term::Term;

/// Returns the match visible this cycle, registering `m` when the detector is pipelined.
fn output(latency: Latency, reg: &mut bool, m: bool) -> bool {
    match latency {
        Latency::Comb => m,
        Latency::Registered => std::mem::replace(reg, m),
    }
}
