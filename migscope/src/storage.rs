//! Circular capture storage.
//!
//! The write path stores one sample per cycle while `put` is asserted. On `start` the read pointer is
//! placed `size - offset` samples behind the write pointer and the window opens; `done` latches once
//! `size - offset` further samples have been written (or read) and holds until the next `rst` or
//! `start`. Every `put` cycle writes one sample, whether or not the window is complete. The read path
//! advances on `get` and surfaces the addressed sample one cycle later.
//!
//! All pointer arithmetic wraps at the literal depth, which need not be a power of two.

use crate::*;

/// Dual-port memory of `depth` words. Reads see the contents before a same-cycle write.
#[derive(Debug, Clone)]
pub struct Memory {
    width: usize,
    words: Vec<u64>,
}

impl Memory {
    /// Creates a zero-filled memory.
    pub fn new(width: usize, depth: usize) -> Self { Self { width, words: vec![0; depth] } }

    /// Returns the word at `addr`.
    pub fn read(&self, addr: usize) -> u64 { self.words[addr] }

    /// Stores `dat`, truncated to the word width, at `addr`.
    pub fn write(&mut self, addr: usize, dat: u64) { self.words[addr] = dat & mask(self.width); }

    /// Returns the number of words.
    pub fn depth(&self) -> usize { self.words.len() }

    /// Returns the words.
    pub fn words(&self) -> &[u64] { &self.words }
}

/// Inputs of the storage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StorageInput {
    /// Synchronous reset.
    pub rst: bool,
    /// Opens the window at the current write pointer.
    pub start: bool,
    /// Pre-trigger depth.
    pub offset: usize,
    /// Window length.
    pub size: usize,
    /// Write strobe.
    pub put: bool,
    /// Sample to write.
    pub put_dat: u64,
    /// Read strobe.
    pub get: bool,
}

/// Outputs of the storage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StorageOutput {
    /// The window is complete.
    pub done: bool,
    /// Sample read by the last `get`.
    pub get_dat: u64,
}

/// Registers of the storage.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StorageState {
    put_ptr: usize,
    put_cnt: usize,
    get_ptr: usize,
    get_cnt: usize,
    get_dat: u64,
    done: bool,
    open: bool,
}

impl StorageState {
    /// Returns the write pointer.
    pub fn put_ptr(&self) -> usize { self.put_ptr }

    /// Returns the number of post-trigger writes.
    pub fn put_cnt(&self) -> usize { self.put_cnt }

    /// Returns the read pointer.
    pub fn get_ptr(&self) -> usize { self.get_ptr }

    /// Returns the number of reads since the window opened.
    pub fn get_cnt(&self) -> usize { self.get_cnt }

    /// Returns the sample read by the last `get`.
    pub fn get_dat(&self) -> u64 { self.get_dat }

    /// Returns whether the window is complete.
    pub fn done(&self) -> bool { self.done }

    /// Returns whether a window has been opened since the last reset.
    pub fn open(&self) -> bool { self.open }
}

/// Pointer and counter control of the storage. The memory itself is owned by [`Storage`].
#[derive(Debug, Clone)]
struct StorageCtl {
    depth: usize,
}

impl Fsm for StorageCtl {
    /// Storage inputs, and the memory word at the read pointer.
    type Input = (StorageInput, u64);
    /// Storage outputs, and the memory write of the cycle.
    type Output = (StorageOutput, Option<(usize, u64)>);
    type State = StorageState;

    fn init(&self) -> StorageState { StorageState::default() }

    fn step(&self, (input, rd_dat): &(StorageInput, u64), state: &StorageState) -> (Self::Output, StorageState) {
        let output = StorageOutput { done: state.done, get_dat: state.get_dat };
        if input.rst {
            return ((output, None), StorageState::default());
        }

        let depth = self.depth;
        let size_minus_offset = input.size.saturating_sub(input.offset);
        let mut next = state.clone();

        let write = input.put.then_some((state.put_ptr, input.put_dat));
        if write.is_some() {
            next.put_ptr = wrapping_inc(state.put_ptr, depth);
        }
        if input.get {
            next.get_dat = *rd_dat;
            next.get_ptr = wrapping_inc(state.get_ptr, depth);
        }

        if input.start {
            next.put_cnt = 0;
            next.get_cnt = 0;
            next.get_ptr = wrapping_sub(state.put_ptr, size_minus_offset % depth, depth);
            next.open = true;
            next.done = size_minus_offset == 0;
        } else if state.open && !state.done {
            if write.is_some() {
                next.put_cnt = state.put_cnt + 1;
                next.done |= state.put_cnt + 1 >= size_minus_offset;
            }
            if input.get {
                next.get_cnt = state.get_cnt + 1;
                next.done |= state.get_cnt + 1 >= size_minus_offset;
            }
        }

        ((output, write), next)
    }
}

/// Circular capture storage.
#[derive(Debug, Clone)]
pub struct Storage {
    width: usize,
    ctl: Clocked<StorageCtl>,
    mem: Memory,
}

impl Storage {
    /// Creates a storage of `depth` samples of `width` bits.
    pub fn new(width: usize, depth: usize) -> Result<Self, ConfigurationError> {
        ConfigurationError::check_width("sample", width)?;
        if depth == 0 {
            return Err(ConfigurationError::ZeroDepth);
        }
        Ok(Self { width, ctl: Clocked::new(StorageCtl { depth }), mem: Memory::new(width, depth) })
    }

    /// Evaluates one cycle and returns the outputs of the cycle.
    pub fn tick(&mut self, input: &StorageInput) -> StorageOutput {
        let rd_dat = self.mem.read(self.ctl.state().get_ptr);
        let (output, write) = self.ctl.tick(&(*input, rd_dat));
        if let Some((addr, dat)) = write {
            self.mem.write(addr, dat);
        }
        output
    }

    /// Returns the registers.
    pub fn state(&self) -> &StorageState { self.ctl.state() }

    /// Returns the memory.
    pub fn memory(&self) -> &Memory { &self.mem }

    /// Returns the sample width.
    pub fn width(&self) -> usize { self.width }

    /// Returns the number of samples.
    pub fn depth(&self) -> usize { self.ctl.fsm().depth }

    /// Returns the pointer width.
    pub fn addr_width(&self) -> usize { clog2(self.depth()) }
}
