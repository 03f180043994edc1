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

use crate::program::ParseError;
use crate::vm::RuntimeError;

/// Any failure which can abort an interpretation.  The first error
/// encountered aborts the whole invocation; nothing is caught or
/// recovered internally.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The program text could not be decoded into instructions.
    Parse(ParseError),
    /// The program failed while executing.
    Runtime(RuntimeError),
    /// The instruction pointer ran off the end of the program without
    /// an `END` being executed.
    UncleanTermination,
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Self {
        Error::Runtime(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "{err}"),
            Error::Runtime(err) => write!(f, "{err}"),
            Error::UncleanTermination => write!(f, "unclean termination"),
        }
    }
}

impl std::error::Error for Error {}
