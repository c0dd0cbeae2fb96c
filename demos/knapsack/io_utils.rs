// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module contains everything that is necessary to parse a knapsack
//! instance and turn it into an item catalogue and a capacity.
//!
//! An instance is a sequence of whitespace separated tokens: the number of
//! items `N`, then `N` triples `id value weight`, and finally the capacity.

use std::{fs::File, io::{BufReader, Read}, num::{ParseFloatError, ParseIntError}, path::Path};

use knapsack_bnb::Item;

/// This enumeration simply groups the kind of errors that might occur when parsing a
/// knapsack instance from file. There can be io errors (file unavailable ?), format error
/// (e.g. the file is not an instance but contains the text of your next paper),
/// or parse int/float errors (which are actually a variant of the format error since it tells
/// you that the parser expected an integer number but got ... something else).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// There was an io related error
    #[error("io error {0}")]
    Io(#[from] std::io::Error),
    /// The parser expected to read something that was an integer but got some garbage
    #[error("parse int {0}")]
    ParseInt(#[from] ParseIntError),
    /// The parser expected to read something that was a number but got some garbage
    #[error("parse float {0}")]
    ParseFloat(#[from] ParseFloatError),
    /// The file was not properly formatted.
    #[error("ill formed instance")]
    Format,
}

/// A knapsack instance
#[derive(Debug, Clone)]
pub struct Instance {
    pub items: Vec<Item>,
    pub capacity: f32,
}

/// This function is used to read a knapsack instance from file. It returns either a
/// knapsack instance if everything went on well or an error describing the problem.
pub fn read_instance<P: AsRef<Path>>(fname: P) -> Result<Instance, Error> {
    let f = File::open(fname)?;
    let mut f = BufReader::new(f);
    let mut text = String::new();
    f.read_to_string(&mut text)?;
    parse_instance(&text)
}

/// Parses the text of an instance
pub fn parse_instance(text: &str) -> Result<Instance, Error> {
    let mut tokens = text.split_whitespace();

    let nb_items = tokens.next().ok_or(Error::Format)?.parse::<usize>()?;
    let mut items = Vec::with_capacity(nb_items);
    for _ in 0..nb_items {
        let id     = tokens.next().ok_or(Error::Format)?.parse::<i32>()?;
        let value  = tokens.next().ok_or(Error::Format)?.parse::<f32>()?;
        let weight = tokens.next().ok_or(Error::Format)?.parse::<f32>()?;
        if value < 0.0 || weight < 0.0 {
            return Err(Error::Format);
        }
        items.push(Item::new(id, value, weight));
    }
    let capacity = tokens.next().ok_or(Error::Format)?.parse::<f32>()?;
    if capacity < 0.0 {
        return Err(Error::Format);
    }
    Ok(Instance { items, capacity })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_reads_a_well_formed_instance() {
        let inst = parse_instance("4\n1 10 5\n2 40 4\n3 30 6\n4 50 3\n10\n").unwrap();
        assert_eq!(4, inst.items.len());
        assert_eq!(Item::new(2, 40.0, 4.0), inst.items[1]);
        assert_eq!(10.0, inst.capacity);
    }
    #[test]
    fn an_empty_catalogue_is_fine() {
        let inst = parse_instance("0 100").unwrap();
        assert!(inst.items.is_empty());
        assert_eq!(100.0, inst.capacity);
    }
    #[test]
    fn a_missing_capacity_is_a_format_error() {
        assert!(matches!(parse_instance("1\n1 10 5\n"), Err(Error::Format)));
    }
    #[test]
    fn negative_weights_are_rejected() {
        assert!(matches!(parse_instance("1\n1 10 -5\n10"), Err(Error::Format)));
    }
    #[test]
    fn garbage_is_reported() {
        assert!(matches!(parse_instance("two"), Err(Error::ParseInt(_))));
        assert!(matches!(parse_instance("1 1 ten 5 10"), Err(Error::ParseFloat(_))));
    }
}
