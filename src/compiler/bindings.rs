//! # Stack-binding tracker
//!
//! A compile-time model of the VM's runtime data stack: a stack of block
//! frames, each recording how much the stack has grown since it was
//! entered plus the named bindings declared within it. The invariant
//! `depth == sum(block.size for each block)` is maintained by routing every
//! stack-affecting emission through [`BindingTable::apply_delta`].

#[derive(Debug, Clone)]
struct Binding {
    name: String,
    absolute_bottom_offset: i32,
}

#[derive(Debug, Clone)]
struct Block {
    size: i32,
    bindings: Vec<Binding>,
}

impl Block {
    fn new() -> Self {
        Self {
            size: 0,
            bindings: Vec::new(),
        }
    }
}

/// Tracks the compile-time predicted depth of the VM's data stack and the
/// bindings visible at each point in the program.
#[derive(Debug, Clone)]
pub struct BindingTable {
    blocks: Vec<Block>,
    depth: i32,
}

impl BindingTable {
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new()],
            depth: 0,
        }
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Applies an instruction's fixed stack-delta to both the running depth
    /// and the innermost block's growth counter.
    pub fn apply_delta(&mut self, delta: i32) {
        self.depth += delta;
        if let Some(block) = self.blocks.last_mut() {
            block.size += delta;
        }
    }

    /// Adjusts the running depth without attributing the change to any
    /// block. Used only to account for stack slots (like a pending return
    /// address) that a block's own exit sequence does not pop.
    pub fn bump_depth_untracked(&mut self, delta: i32) {
        self.depth += delta;
    }

    /// Forces the running depth to `new_depth`, attributing the difference
    /// to the innermost block. Used after a function call: the call
    /// sequence's own instructions are tracked with their ordinary deltas,
    /// but the callee's epilogue collapses its argument frame in a way this
    /// table cannot see instruction-by-instruction, so the caller corrects
    /// its model directly once the call is known to have returned.
    pub fn force_depth(&mut self, new_depth: i32) {
        let delta = new_depth - self.depth;
        self.apply_delta(delta);
    }

    pub fn push_block(&mut self) {
        self.blocks.push(Block::new());
    }

    /// Pops the innermost block and returns its recorded growth, the
    /// operand for the `POP` that should be emitted at the block's exit.
    pub fn pop_block(&mut self) -> i32 {
        self.blocks
            .pop()
            .expect("pop_block called with no open block")
            .size
    }

    /// The innermost block's growth so far, without popping it.
    pub fn current_block_size(&self) -> i32 {
        self.blocks.last().map_or(0, |b| b.size)
    }

    /// Binds `name` to the current top of the predicted stack.
    pub fn bind(&mut self, name: impl Into<String>) {
        let offset = self.depth - 1;
        self.blocks
            .last_mut()
            .expect("bind called with no open block")
            .bindings
            .push(Binding {
                name: name.into(),
                absolute_bottom_offset: offset,
            });
    }

    /// The top-relative offset of `name`'s binding, searching from the
    /// innermost block outward, or `None` if it is not bound.
    pub fn offset_of(&self, name: &str) -> Option<i32> {
        for block in self.blocks.iter().rev() {
            if let Some(binding) = block.bindings.iter().rev().find(|b| b.name == name) {
                return Some(self.depth - 1 - binding.absolute_bottom_offset);
            }
        }
        None
    }
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::new()
    }
}
