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

use super::scanner::Scanner;
use super::Instruction::*;
use super::{Instruction, Label};

// ===================================================================
// Parse Error
// ===================================================================

/// Errors which can arise when decoding Whitespace program text into
/// instructions.
#[derive(Debug, PartialEq)]
pub enum ParseError {
    /// A number literal began with its terminator, or the text ended
    /// before the terminator was found.
    InvalidNumber,
    /// The text ended inside a label, before its terminator.
    InvalidLabel,
    /// The text ended before an instruction class was decided.
    UnknownImp,
    /// An unrecognised operation under the stack-manipulation class.
    InvalidStackOp,
    /// An unrecognised operation under the arithmetic class.
    InvalidArithmeticOp,
    /// An unrecognised operation under the heap-access class.
    InvalidHeapOp,
    /// An unrecognised operation under the I/O class.
    InvalidIoOp,
    /// An unrecognised operation under the flow-control class.
    InvalidFlowOp,
    /// A label was declared more than once.
    RepeatedLabel(Label),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::InvalidNumber => write!(f, "invalid number"),
            ParseError::InvalidLabel => write!(f, "invalid label"),
            ParseError::UnknownImp => write!(f, "invalid operation: unknown IMP"),
            ParseError::InvalidStackOp => write!(f, "invalid operation: stack manipulation"),
            ParseError::InvalidArithmeticOp => write!(f, "invalid operation: arithmetic"),
            ParseError::InvalidHeapOp => write!(f, "invalid operation: heap access"),
            ParseError::InvalidIoOp => write!(f, "invalid operation: I/O"),
            ParseError::InvalidFlowOp => write!(f, "invalid operation: flow control"),
            ParseError::RepeatedLabel(l) => write!(f, "repeated label {l}"),
        }
    }
}

impl std::error::Error for ParseError {}

// ===================================================================
// Program
// ===================================================================

/// A fully decoded program: the linear instruction sequence together
/// with the label table built during the forward scan.  Each label
/// maps to the index of the instruction immediately following its
/// declaration, so that is where jumps land.
#[derive(Debug)]
pub struct Program {
    insns: Vec<Instruction>,
    labels: HashMap<Label, usize>,
}

impl Program {
    /// Determine the number of instructions in this program.
    pub fn len(&self) -> usize {
        self.insns.len()
    }

    /// The decoded instruction sequence.
    pub fn instructions(&self) -> &[Instruction] {
        &self.insns
    }

    /// Resolve a label to the instruction index it addresses, if it
    /// was declared anywhere in the program.
    pub fn target(&self, label: &Label) -> Option<usize> {
        self.labels.get(label).copied()
    }
}

// ===================================================================
// Parser
// ===================================================================

/// Decodes program text into a `Program` with a single linear scan.
/// At each position the instruction class prefix (the IMP) and the
/// operation prefix beneath it are recognised, then the immediate (if
/// any) is consumed.  Label declarations are bound to instruction
/// indices as they are encountered, so both forward and backward
/// references resolve; whether a referenced label exists at all is
/// left to jump time.
pub struct Parser {
    scanner: Scanner,
}

impl Parser {
    pub fn new(text: &str) -> Self {
        Self {
            scanner: Scanner::new(text),
        }
    }

    /// Parse the whole text into an instruction sequence and a label
    /// table.
    pub fn parse(mut self) -> Result<Program, ParseError> {
        let mut insns = Vec::new();
        let mut labels: HashMap<Label, usize> = HashMap::new();
        // Keep going until we reach the end.
        while !self.scanner.done() {
            let insn = self.parse_instruction()?;
            if let MARK(label) = &insn {
                // The label addresses the instruction after the mark.
                if labels.insert(label.clone(), insns.len() + 1).is_some() {
                    return Err(ParseError::RepeatedLabel(label.clone()));
                }
            }
            insns.push(insn);
        }
        Ok(Program { insns, labels })
    }

    /// Parse a single instruction, starting from its class prefix.
    fn parse_instruction(&mut self) -> Result<Instruction, ParseError> {
        match self.scanner.next() {
            Some(' ') => self.parse_stack_op(),
            Some('\t') => match self.scanner.next() {
                Some(' ') => self.parse_arithmetic_op(),
                Some('\t') => self.parse_heap_op(),
                Some('\n') => self.parse_io_op(),
                None => Err(ParseError::UnknownImp),
                _ => unreachable!(),
            },
            Some('\n') => self.parse_flow_op(),
            None => Err(ParseError::UnknownImp),
            _ => unreachable!(),
        }
    }

    fn parse_stack_op(&mut self) -> Result<Instruction, ParseError> {
        match self.scanner.next() {
            Some(' ') => Ok(PUSH(self.scanner.scan_number()?)),
            Some('\t') => match self.scanner.next() {
                Some(' ') => Ok(COPY(self.scanner.scan_number()?)),
                Some('\n') => Ok(SLIDE(self.scanner.scan_number()?)),
                _ => Err(ParseError::InvalidStackOp),
            },
            Some('\n') => match self.scanner.next() {
                Some(' ') => Ok(DUP),
                Some('\t') => Ok(SWAP),
                Some('\n') => Ok(DROP),
                None => Err(ParseError::InvalidStackOp),
                _ => unreachable!(),
            },
            None => Err(ParseError::InvalidStackOp),
            _ => unreachable!(),
        }
    }

    fn parse_arithmetic_op(&mut self) -> Result<Instruction, ParseError> {
        match self.scanner.next() {
            Some(' ') => match self.scanner.next() {
                Some(' ') => Ok(ADD),
                Some('\t') => Ok(SUB),
                Some('\n') => Ok(MUL),
                None => Err(ParseError::InvalidArithmeticOp),
                _ => unreachable!(),
            },
            Some('\t') => match self.scanner.next() {
                Some(' ') => Ok(DIV),
                Some('\t') => Ok(MOD),
                _ => Err(ParseError::InvalidArithmeticOp),
            },
            _ => Err(ParseError::InvalidArithmeticOp),
        }
    }

    fn parse_heap_op(&mut self) -> Result<Instruction, ParseError> {
        match self.scanner.next() {
            Some(' ') => Ok(STORE),
            Some('\t') => Ok(LOAD),
            _ => Err(ParseError::InvalidHeapOp),
        }
    }

    fn parse_io_op(&mut self) -> Result<Instruction, ParseError> {
        match self.scanner.next() {
            Some(' ') => match self.scanner.next() {
                Some(' ') => Ok(OUTCHAR),
                Some('\t') => Ok(OUTNUM),
                _ => Err(ParseError::InvalidIoOp),
            },
            Some('\t') => match self.scanner.next() {
                Some(' ') => Ok(INCHAR),
                Some('\t') => Ok(INNUM),
                _ => Err(ParseError::InvalidIoOp),
            },
            _ => Err(ParseError::InvalidIoOp),
        }
    }

    fn parse_flow_op(&mut self) -> Result<Instruction, ParseError> {
        match self.scanner.next() {
            Some(' ') => match self.scanner.next() {
                Some(' ') => Ok(MARK(self.scanner.scan_label()?)),
                Some('\t') => Ok(CALL(self.scanner.scan_label()?)),
                Some('\n') => Ok(JMP(self.scanner.scan_label()?)),
                None => Err(ParseError::InvalidFlowOp),
                _ => unreachable!(),
            },
            Some('\t') => match self.scanner.next() {
                Some(' ') => Ok(JZ(self.scanner.scan_label()?)),
                Some('\t') => Ok(JN(self.scanner.scan_label()?)),
                Some('\n') => Ok(RET),
                None => Err(ParseError::InvalidFlowOp),
                _ => unreachable!(),
            },
            Some('\n') => match self.scanner.next() {
                Some('\n') => Ok(END),
                _ => Err(ParseError::InvalidFlowOp),
            },
            None => Err(ParseError::InvalidFlowOp),
            _ => unreachable!(),
        }
    }
}
