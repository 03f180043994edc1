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
use num_bigint::BigInt;

use super::{Label, ParseError};

/// A cursor over the significant characters of a Whitespace program.
/// Construction strips every character outside the three-letter
/// alphabet {space, tab, line feed}, so all other text (including
/// other whitespace variants) is commentary.
pub struct Scanner {
    chars: Vec<char>,
    index: usize,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        let chars = text
            .chars()
            .filter(|c| matches!(c, ' ' | '\t' | '\n'))
            .collect();
        //
        Self { chars, index: 0 }
    }

    /// Check whether every significant character has been consumed.
    pub fn done(&self) -> bool {
        self.index >= self.chars.len()
    }

    /// Consume and return the next significant character.
    pub fn next(&mut self) -> Option<char> {
        let c = self.chars.get(self.index).copied();
        // Account for consumed character
        if c.is_some() {
            self.index += 1;
        }
        c
    }

    /// Decode a number literal: one sign character (space for
    /// non-negative, tab for negative), zero or more binary digits
    /// (space = 0, tab = 1, most significant first) and the line feed
    /// terminator.  A sign followed immediately by the terminator
    /// decodes to zero.
    pub fn scan_number(&mut self) -> Result<BigInt, ParseError> {
        let negative = match self.next() {
            Some('\t') => true,
            Some(' ') => false,
            // A leading terminator, or no sign at all.
            _ => return Err(ParseError::InvalidNumber),
        };
        let mut magnitude = BigInt::from(0);
        loop {
            match self.next() {
                Some('\n') => break,
                Some('\t') => magnitude = magnitude * 2 + 1,
                Some(' ') => magnitude = magnitude * 2,
                // Ran off the end without a terminator.
                None => return Err(ParseError::InvalidNumber),
                _ => unreachable!(),
            }
        }
        Ok(if negative { -magnitude } else { magnitude })
    }

    /// Decode a label: the raw digit string up to (but not including)
    /// the line feed terminator.  The terminator is consumed; an
    /// empty digit string is a valid label.
    pub fn scan_label(&mut self) -> Result<Label, ParseError> {
        let mut digits = String::new();
        loop {
            match self.next() {
                Some('\n') => return Ok(Label::new(digits)),
                Some('\t') => digits.push('1'),
                Some(' ') => digits.push('0'),
                // Ran off the end without a terminator.
                None => return Err(ParseError::InvalidLabel),
                _ => unreachable!(),
            }
        }
    }
}
