//! Reading counts from the terminal and from flags.

use std::io::{self, BufRead, Write};
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Ask `question` until the answer parses as `T`.
///
/// A blank line or end of input gives `T::default()`. Negative or
/// out-of-range numbers are asked for again.
pub fn prompt_number<T, R, W>(input: &mut R, output: &mut W, question: &str) -> io::Result<T>
where
    T: FromStr + Default,
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{question}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(T::default());
        }
        let answer = line.trim();
        if answer.is_empty() {
            return Ok(T::default());
        }
        match answer.parse::<T>() {
            Ok(n) => return Ok(n),
            Err(_) => writeln!(output, "invalid input, enter a whole number")?,
        }
    }
}

/// Parse a model count flag: `N` means `1..=N`, `A-B` is inclusive.
pub fn parse_range(text: &str) -> Result<RangeInclusive<u32>, String> {
    let text = text.trim();
    let number = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|_| format!("{s:?} is not a whole number"))
    };
    match text.split_once('-') {
        None => Ok(1..=number(text)?),
        Some((start, end)) => {
            let (start, end) = (number(start)?, number(end)?);
            if start > end {
                return Err(format!("range {start}-{end} runs backwards"));
            }
            Ok(start..=end)
        }
    }
}
