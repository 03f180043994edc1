// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::collections::HashMap;
use std::fmt;

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use super::input::InputStream;
use crate::program::Instruction::*;
use crate::program::{Instruction, Label, Program};
use crate::Error;

// ===================================================================
// Runtime Error
// ===================================================================

/// Errors which can arise while executing a decoded program.
#[derive(Debug, PartialEq)]
pub enum RuntimeError {
    /// An instruction required more values than the stack held.
    StackUnderflow,
    /// A copy instruction was given a negative index.
    OutOfBoundsIndex,
    /// Division or modulo by zero.
    DivisionByZero,
    /// A load from a heap address that was never stored.
    UnsetAddress(BigInt),
    /// A jump or call targeted a label that was never declared.
    LabelNotFound(Label),
    /// The input stream ran out while a read was pending.
    InputExhausted,
    /// The pending input token did not parse as a number.
    InvalidInput,
    /// A character write was given a value outside the valid
    /// codepoint range.
    InvalidCodepoint(BigInt),
    /// A return was executed with no call in progress.
    ReturnWithoutCall,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuntimeError::StackUnderflow => write!(f, "not enough values on the stack"),
            RuntimeError::OutOfBoundsIndex => write!(f, "out of bounds index"),
            RuntimeError::DivisionByZero => write!(f, "division by zero"),
            RuntimeError::UnsetAddress(addr) => {
                write!(f, "address {addr} does not exist in the heap")
            }
            RuntimeError::LabelNotFound(label) => write!(f, "label {label} not found"),
            RuntimeError::InputExhausted => write!(f, "input stream exhausted"),
            RuntimeError::InvalidInput => write!(f, "invalid number on the input stream"),
            RuntimeError::InvalidCodepoint(n) => write!(f, "{n} is not a valid character code"),
            RuntimeError::ReturnWithoutCall => write!(f, "return without a pending call"),
        }
    }
}

impl std::error::Error for RuntimeError {}

// ===================================================================
// Machine
// ===================================================================

/// Represents the possible outcomes from executing a single
/// instruction.
enum Outcome {
    /// Fall through to the next instruction.
    Continue,
    /// Transfer control to the given instruction index.
    Jump(usize),
    /// Clean termination.
    Halt,
}

/// The virtual machine.  Executes a decoded program against a value
/// stack, a sparse heap, a stack of return sites and an input
/// stream, accumulating output as it goes.  All values are
/// arbitrary-precision signed integers.
pub struct Machine<'a> {
    program: &'a Program,
    stack: Vec<BigInt>,
    heap: HashMap<BigInt, BigInt>,
    /// Return sites pending a RET, innermost last.  Each entry is
    /// the index of its CALL instruction.
    frames: Vec<usize>,
    input: InputStream,
    output: String,
    pc: usize,
}

impl<'a> Machine<'a> {
    pub fn new(program: &'a Program, input: &str) -> Self {
        Self {
            program,
            stack: Vec::new(),
            heap: HashMap::new(),
            frames: Vec::new(),
            input: InputStream::new(input),
            output: String::new(),
            pc: 0,
        }
    }

    /// Run the program to completion, returning its output.
    /// Programs must terminate by executing END; running off the end
    /// of the instruction sequence is an error.
    pub fn run(mut self) -> Result<String, Error> {
        while let Some(insn) = self.program.instructions().get(self.pc) {
            match self.execute(insn)? {
                Outcome::Continue => self.pc += 1,
                Outcome::Jump(target) => self.pc = target,
                Outcome::Halt => return Ok(self.output),
            }
        }
        Err(Error::UncleanTermination)
    }

    /// Execute a single instruction against the current state.
    fn execute(&mut self, insn: &Instruction) -> Result<Outcome, RuntimeError> {
        match insn {
            // =======================================================
            // Stack Manipulation
            // =======================================================
            PUSH(n) => {
                self.stack.push(n.clone());
                Ok(Outcome::Continue)
            }
            COPY(n) => self.copy(n),
            SLIDE(n) => self.slide(n),
            DUP => {
                let top = self.peek()?.clone();
                self.stack.push(top);
                Ok(Outcome::Continue)
            }
            SWAP => {
                let depth = self.stack.len();
                if depth < 2 {
                    return Err(RuntimeError::StackUnderflow);
                }
                self.stack.swap(depth - 1, depth - 2);
                Ok(Outcome::Continue)
            }
            DROP => {
                self.pop()?;
                Ok(Outcome::Continue)
            }
            // =======================================================
            // Arithmetic
            // =======================================================
            ADD => self.arithmetic(|lhs, rhs| Ok(lhs + rhs)),
            SUB => self.arithmetic(|lhs, rhs| Ok(lhs - rhs)),
            MUL => self.arithmetic(|lhs, rhs| Ok(lhs * rhs)),
            DIV => self.arithmetic(|lhs, rhs| {
                if rhs.is_zero() {
                    Err(RuntimeError::DivisionByZero)
                } else {
                    Ok(lhs.div_floor(&rhs))
                }
            }),
            MOD => self.arithmetic(|lhs, rhs| {
                if rhs.is_zero() {
                    Err(RuntimeError::DivisionByZero)
                } else {
                    Ok(lhs.mod_floor(&rhs))
                }
            }),
            // =======================================================
            // Heap Access
            // =======================================================
            STORE => {
                if self.stack.len() < 2 {
                    return Err(RuntimeError::StackUnderflow);
                }
                let value = self.pop()?;
                let addr = self.pop()?;
                self.heap.insert(addr, value);
                Ok(Outcome::Continue)
            }
            LOAD => {
                let addr = self.pop()?;
                match self.heap.get(&addr) {
                    Some(value) => {
                        self.stack.push(value.clone());
                        Ok(Outcome::Continue)
                    }
                    None => Err(RuntimeError::UnsetAddress(addr)),
                }
            }
            // =======================================================
            // I/O
            // =======================================================
            OUTCHAR => {
                let n = self.pop()?;
                match n.to_u32().and_then(char::from_u32) {
                    Some(c) => {
                        self.output.push(c);
                        Ok(Outcome::Continue)
                    }
                    None => Err(RuntimeError::InvalidCodepoint(n)),
                }
            }
            OUTNUM => {
                let n = self.pop()?;
                self.output.push_str(&n.to_string());
                Ok(Outcome::Continue)
            }
            INCHAR => {
                let addr = self.pop()?;
                let c = self.input.read_char()?;
                self.heap.insert(addr, BigInt::from(c as u32));
                Ok(Outcome::Continue)
            }
            INNUM => {
                let addr = self.pop()?;
                let n = self.input.read_number()?;
                self.heap.insert(addr, n);
                Ok(Outcome::Continue)
            }
            // =======================================================
            // Flow Control
            // =======================================================
            MARK(_) => Ok(Outcome::Continue),
            CALL(label) => {
                let target = self.target(label)?;
                self.frames.push(self.pc);
                Ok(Outcome::Jump(target))
            }
            JMP(label) => Ok(Outcome::Jump(self.target(label)?)),
            JZ(label) => {
                let target = self.target(label)?;
                if self.pop()?.is_zero() {
                    Ok(Outcome::Jump(target))
                } else {
                    Ok(Outcome::Continue)
                }
            }
            JN(label) => {
                let target = self.target(label)?;
                if self.pop()?.sign() == Sign::Minus {
                    Ok(Outcome::Jump(target))
                } else {
                    Ok(Outcome::Continue)
                }
            }
            RET => match self.frames.pop() {
                // Resume at the instruction after the call site.
                Some(site) => Ok(Outcome::Jump(site + 1)),
                None => Err(RuntimeError::ReturnWithoutCall),
            },
            END => Ok(Outcome::Halt),
        }
    }

    fn pop(&mut self) -> Result<BigInt, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    fn peek(&self) -> Result<&BigInt, RuntimeError> {
        self.stack.last().ok_or(RuntimeError::StackUnderflow)
    }

    fn target(&self, label: &Label) -> Result<usize, RuntimeError> {
        self.program
            .target(label)
            .ok_or_else(|| RuntimeError::LabelNotFound(label.clone()))
    }

    /// Pop two operands and push the result of a binary operation,
    /// with the deeper operand on the left.
    fn arithmetic<F>(&mut self, op: F) -> Result<Outcome, RuntimeError>
    where
        F: Fn(BigInt, BigInt) -> Result<BigInt, RuntimeError>,
    {
        if self.stack.len() < 2 {
            return Err(RuntimeError::StackUnderflow);
        }
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        self.stack.push(op(lhs, rhs)?);
        Ok(Outcome::Continue)
    }

    /// Push a copy of the n-th stack item, counting from the top.
    fn copy(&mut self, n: &BigInt) -> Result<Outcome, RuntimeError> {
        if n.sign() == Sign::Minus {
            return Err(RuntimeError::OutOfBoundsIndex);
        }
        match n.to_usize() {
            Some(depth) if depth < self.stack.len() => {
                let item = self.stack[self.stack.len() - 1 - depth].clone();
                self.stack.push(item);
                Ok(Outcome::Continue)
            }
            // No stack can hold an index beyond usize, so a failed
            // conversion is an underflow as well.
            _ => Err(RuntimeError::StackUnderflow),
        }
    }

    /// Discard n items beneath the top of the stack, preserving the
    /// top itself.  A negative count discards everything beneath the
    /// top; zero values within the kept region are untouched.
    fn slide(&mut self, n: &BigInt) -> Result<Outcome, RuntimeError> {
        let depth = self.stack.len();
        if n.sign() == Sign::Minus {
            if depth > 1 {
                self.stack.drain(..depth - 1);
            }
            return Ok(Outcome::Continue);
        }
        match n.to_usize() {
            Some(count) if count < depth => {
                self.stack.drain(depth - 1 - count..depth - 1);
                Ok(Outcome::Continue)
            }
            _ => Err(RuntimeError::StackUnderflow),
        }
    }
}
