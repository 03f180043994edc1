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
/// Functionality related to Whitespace programs.  This includes the
/// significant-character scanner, the instruction set and the parser
/// which decodes program text into an instruction sequence and a
/// label table.
pub mod program;
/// Functionality related to executing decoded programs.  This
/// includes the virtual machine itself along with the input stream
/// it reads characters and numbers from.
pub mod vm;

mod error;

pub use error::Error;

use program::Parser;
use vm::Machine;

/// Interpret a Whitespace program against a given input stream,
/// returning everything the program wrote to its output.  Only
/// space, tab and line feed are significant in the program text;
/// every other character is commentary and is stripped before
/// parsing.  On failure, no partial output is returned.
pub fn interpret(text: &str, input: &str) -> Result<String, Error> {
    // First pass: decode the text into instructions and bind labels.
    let program = Parser::new(text).parse()?;
    // Second pass: execute the instructions.
    Machine::new(&program, input).run()
}
