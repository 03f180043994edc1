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
use std::fmt;

use num_bigint::BigInt;

/// A label marking a position in the instruction sequence.  Labels
/// are opaque identifiers: the digit string preceding the terminator
/// (space = `0`, tab = `1`), and two labels are equal iff their digit
/// strings match exactly.  The empty digit string is a valid label.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Label(String);

impl Label {
    pub fn new(digits: String) -> Self {
        Label(digits)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

/// Instructions correspond one-to-one with the prefix-coded forms of
/// the Whitespace instruction set.  There are two points to make
/// about this:
///
/// 1. Immediates are decoded during parsing, rather than being
/// re-read from the source text on every execution.  Numbers have
/// arbitrary precision, hence the operands of `PUSH`, `COPY` and
/// `SLIDE` are bignums.
///
/// 2. `MARK` has no effect at runtime, since its label is bound to an
/// instruction index during parsing.  It is retained in the decoded
/// sequence so that instruction indices line up with the label table.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    // ===============================================================
    // Stack Manipulation
    // ===============================================================
    /// Push the operand onto the stack.
    PUSH(BigInt),
    /// Push a copy of the n-th stack item, where `0` denotes the top
    /// of the stack.
    COPY(BigInt),
    /// Discard n items beneath the top of the stack, preserving the
    /// top itself.  A negative operand discards everything beneath
    /// the top.
    SLIDE(BigInt),
    /// Duplicate the top of the stack.
    DUP,
    /// Swap the top two stack items.
    SWAP,
    /// Discard the top of the stack.
    DROP,
    // ===============================================================
    // Arithmetic
    // ===============================================================
    /// Pop two items and push their sum.
    ADD,
    /// Pop two items and push their difference, with the deeper item
    /// as the left operand.
    SUB,
    /// Pop two items and push their product.
    MUL,
    /// Floor division (the quotient rounds towards negative
    /// infinity), with the deeper item as the dividend.  Division by
    /// zero is a runtime error.
    DIV,
    /// Floor modulo (the remainder takes the sign of the divisor).
    /// Modulo by zero is a runtime error.
    MOD,
    // ===============================================================
    // Heap Access
    // ===============================================================
    /// Pop a value, pop an address, write the value at the address.
    STORE,
    /// Pop an address and push the value stored there.  Reading an
    /// address never written is a runtime error.
    LOAD,
    // ===============================================================
    // I/O
    // ===============================================================
    /// Pop a codepoint and append the corresponding character to the
    /// output.
    OUTCHAR,
    /// Pop a number and append its decimal representation to the
    /// output.
    OUTNUM,
    /// Pop an address, read one character from the input stream and
    /// store its codepoint at the address.
    INCHAR,
    /// Pop an address, read one number token from the input stream
    /// and store it at the address.
    INNUM,
    // ===============================================================
    // Flow Control
    // ===============================================================
    /// Declare a label at the following instruction.
    MARK(Label),
    /// Save the current position as a return site and jump to the
    /// label.
    CALL(Label),
    /// Jump to the label unconditionally.
    JMP(Label),
    /// Pop an item; jump to the label if it is zero.
    JZ(Label),
    /// Pop an item; jump to the label if it is negative.
    JN(Label),
    /// Return to the most recent unreturned call site.
    RET,
    /// Terminate the program cleanly.
    END,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Use the default (debug) formatter.  Its only for the
        // instructions carrying an immediate that we need to do
        // anything different.
        match self {
            Instruction::PUSH(n) => write!(f, "push {n}"),
            Instruction::COPY(n) => write!(f, "copy {n}"),
            Instruction::SLIDE(n) => write!(f, "slide {n}"),
            Instruction::MARK(l) => write!(f, "mark {l}"),
            Instruction::CALL(l) => write!(f, "call {l}"),
            Instruction::JMP(l) => write!(f, "jmp {l}"),
            Instruction::JZ(l) => write!(f, "jz {l}"),
            Instruction::JN(l) => write!(f, "jn {l}"),
            _ => {
                let s = format!("{self:?}").to_lowercase();
                write!(f, "{s}")
            }
        }
    }
}
