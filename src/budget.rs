//! Splitting instruction streams into processor-sized chunks.

use std::fmt;

use crate::compile::Instruction;
use crate::{MatrixError, Result};

/// Maximum payload per processor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstructionBudget {
    capacity: usize,
}

impl InstructionBudget {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(MatrixError::InvalidCapacity);
        }
        Ok(Self { capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of chunks `len` instructions need.
    pub fn chunks_needed(&self, len: usize) -> usize {
        len.div_ceil(self.capacity)
    }

    /// Cut `instructions` into consecutive runs of at most `capacity`.
    ///
    /// Boundaries are purely positional and may separate a color instruction
    /// from the rectangles that follow it. Every chunk gets a flush appended,
    /// which does not count toward the capacity.
    pub fn chunk(&self, instructions: &[Instruction]) -> Vec<InstructionChunk> {
        instructions
            .chunks(self.capacity)
            .map(|payload| InstructionChunk {
                payload: payload.to_vec(),
            })
            .collect()
    }
}

/// One processor's share of a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionChunk {
    payload: Vec<Instruction>,
}

impl InstructionChunk {
    /// Instructions without the trailing flush.
    pub fn payload(&self) -> &[Instruction] {
        &self.payload
    }

    /// Payload followed by the flush.
    pub fn instructions(&self) -> impl Iterator<Item = Instruction> + '_ {
        self.payload
            .iter()
            .copied()
            .chain(std::iter::once(Instruction::Flush))
    }

    /// Lines including the flush.
    pub fn line_count(&self) -> usize {
        self.payload.len() + 1
    }
}

/// Newline-joined instructions, flush on the last line, no trailing newline.
impl fmt::Display for InstructionChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.payload {
            writeln!(f, "{instruction}")?;
        }
        write!(f, "{}", Instruction::Flush)
    }
}
