pub use {clap::Parser, graph::*, grid::*};

use {
    memmap::Mmap,
    nom::{
        bytes::complete::tag,
        character::complete::digit1,
        combinator::{map, map_res, opt},
        sequence::{preceded, tuple},
        IResult,
    },
    num::Integer,
    std::{
        any::type_name,
        fmt::Debug,
        fs::File,
        io::{Error as IoError, ErrorKind, Result as IoResult},
        str::{from_utf8, FromStr, Utf8Error},
    },
};

mod graph;
mod grid;

#[derive(Debug, Parser)]
pub struct QuestionArgs {
    /// Print extra information, if there is any
    #[arg(short, long, default_value_t)]
    pub verbose: bool,
}

/// Arguments for program execution
#[derive(Debug, Parser)]
pub struct Args {
    /// Input file path
    #[arg(short, long, default_value_t)]
    input_file_path: String,

    /// The year to run
    #[arg(short, long)]
    pub year: u16,

    /// The day to run
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=25))]
    pub day: u8,

    /// The question to run, both if omitted
    #[arg(short, long, default_value_t, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub question: u8,

    #[command(flatten)]
    pub question_args: QuestionArgs,
}

impl Args {
    fn try_to_intermediate<I>(&self) -> Option<I>
    where
        I: for<'a> TryFrom<&'a str>,
        for<'a> <I as TryFrom<&'a str>>::Error: Debug,
    {
        let default_file_path: String;

        let file_path: &str = if self.input_file_path.is_empty() {
            default_file_path = format!("input/y{}/d{}.txt", self.year, self.day);

            &default_file_path
        } else {
            &self.input_file_path
        };

        // SAFETY: This isn't truly safe, we're just hoping nobody touches the input file while
        // we're parsing it
        unsafe {
            open_utf8_file(file_path, |input: &str| {
                input.try_into().map_or_else(
                    |error| {
                        eprintln!(
                            "Failed to convert the contents of \"{file_path}\" into type {}:\n\
                            {error:#?}",
                            type_name::<I>()
                        );

                        None
                    },
                    Some,
                )
            })
        }
        .unwrap_or_else(|error: IoError| {
            eprintln!("Failed to open UTF-8 file \"{file_path}\":\n{error}");

            None
        })
    }
}

pub trait RunQuestions
where
    Self: Sized + for<'a> TryFrom<&'a str>,
    for<'a> <Self as TryFrom<&'a str>>::Error: Debug,
{
    fn q1_internal(&mut self, args: &QuestionArgs);
    fn q2_internal(&mut self, args: &QuestionArgs);

    fn q1(args: &Args) {
        if let Some(mut intermediate) = args.try_to_intermediate::<Self>() {
            intermediate.q1_internal(&args.question_args);
        }
    }

    fn q2(args: &Args) {
        if let Some(mut intermediate) = args.try_to_intermediate::<Self>() {
            intermediate.q2_internal(&args.question_args);
        }
    }

    fn both(args: &Args) {
        if let Some(mut intermediate) = args.try_to_intermediate::<Self>() {
            intermediate.q1_internal(&args.question_args);
            intermediate.q2_internal(&args.question_args);
        }
    }
}

#[derive(Clone, Copy)]
pub struct Day {
    pub q1: fn(&Args),
    pub q2: fn(&Args),
    pub both: fn(&Args),
}

impl Day {
    fn run(&self, args: &Args) {
        match args.question {
            0_u8 => (self.both)(args),
            1_u8 => (self.q1)(args),
            2_u8 => (self.q2)(args),
            question => unreachable!(
                "A valid Args has a question in the range 0..=2, but {question} was encountered.\n\
                Args:\n\
                {args:#?}"
            ),
        }
    }
}

/// A registry entry as the `solutions!` macro emits it: the year and day are still the module
/// identifiers they were registered under.
pub struct SolutionEntry {
    pub year_str: &'static str,
    pub day_str: &'static str,
    pub day: Day,
}

pub struct Solutions(Vec<(u16, u8, Day)>);

impl Solutions {
    pub fn from_entries(entries: Vec<SolutionEntry>) -> Self {
        fn parse_tagged_int<I: FromStr>(prefix: &'static str, input: &str) -> Option<I> {
            preceded(
                tag::<_, _, nom::error::Error<&str>>(prefix),
                map_res(digit1, I::from_str),
            )(input)
                .ok()
                .and_then(|(remaining, value): (&str, I)| remaining.is_empty().then_some(value))
        }

        Self(
            entries
                .into_iter()
                .map(|entry: SolutionEntry| {
                    let year: u16 = parse_tagged_int("y", entry.year_str).unwrap_or_else(|| {
                        panic!("Invalid year module identifier \"{}\"", entry.year_str)
                    });
                    let day: u8 = parse_tagged_int("d", entry.day_str).unwrap_or_else(|| {
                        panic!("Invalid day module identifier \"{}\"", entry.day_str)
                    });

                    (year, day, entry.day)
                })
                .collect(),
        )
    }

    pub fn run(&self, args: &Args) {
        if let Some((_, _, day)) = self
            .0
            .iter()
            .find(|(year, day, _)| *year == args.year && *day == args.day)
        {
            day.run(args);
        } else {
            eprintln!(
                "No solution is registered for year {} day {}.\n\
                Args:\n\
                {args:#?}",
                args.year, args.day
            );
        }
    }
}

#[macro_export]
macro_rules! solutions {
    [ $( ( $year:ident, [ $( $day:ident ),* $(,)? ] ) ),* $(,)? ] => {
        $(
            pub mod $year {
                $(
                    pub mod $day;
                )*
            }
        )*

        pub fn solutions() -> &'static Solutions {
            static ONCE_LOCK: ::std::sync::OnceLock<Solutions> = ::std::sync::OnceLock::new();

            ONCE_LOCK.get_or_init(|| Solutions::from_entries(vec![ $( $(
                SolutionEntry {
                    year_str: stringify!($year),
                    day_str: stringify!($day),
                    day: Day {
                        q1: $year::$day::Solution::q1,
                        q2: $year::$day::Solution::q2,
                        both: $year::$day::Solution::both,
                    },
                },
            )* )* ]))
        }
    };
}

/// Opens a memory-mapped UTF-8 file at a specified path, and passes in a `&str` over the file to a
/// provided callback function
///
/// # Arguments
///
/// * `file_path` - A string slice file path to open as a read-only file
/// * `f` - A callback function to invoke on the contents of the file as a string slice
///
/// # Errors
///
/// This function returns a `Result::Err`-wrapped `std::io::Error` if an error has occurred.
/// Possible causes are:
///
/// * `std::fs::File::open` was unable to open a read-only file at `file_path`
/// * `memmap::Mmap::map` fails to create an `Mmap` instance for the opened file
/// * `std::str::from_utf8` determines the file is not in valid UTF-8 format
///
/// `f` is only executed *iff* an error is not encountered.
///
/// # Safety
///
/// This function uses `Mmap::map`, which is an unsafe function. There is no guarantee that an
/// external process won't modify the file after it is opened as read-only.
pub unsafe fn open_utf8_file<T, F: FnOnce(&str) -> T>(file_path: &str, f: F) -> IoResult<T> {
    let file: File = File::open(file_path)?;

    // SAFETY: This operation is unsafe
    let mmap: Mmap = Mmap::map(&file)?;
    let bytes: &[u8] = &mmap;
    let utf8_str: &str = from_utf8(bytes).map_err(|utf8_error: Utf8Error| -> IoError {
        IoError::new(ErrorKind::InvalidData, utf8_error)
    })?;

    Ok(f(utf8_str))
}

pub fn parse_integer<'i, I: FromStr + Integer>(input: &'i str) -> IResult<&'i str, I> {
    map(
        tuple((
            map(opt(tag("-")), |minus| {
                if minus.is_some() {
                    I::zero() - I::one()
                } else {
                    I::one()
                }
            }),
            map_res(digit1, I::from_str),
        )),
        |(sign, magnitude)| sign * magnitude,
    )(input)
}

pub trait Parse: Sized {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self>;
}

pub const fn triangle_number(n: usize) -> usize {
    n * (n + 1_usize) / 2_usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer::<i32>("14,"), Ok((",", 14_i32)));
        assert_eq!(parse_integer::<i32>("-7 "), Ok((" ", -7_i32)));
        assert!(parse_integer::<i32>("x").is_err());
    }

    #[test]
    fn test_triangle_number() {
        assert_eq!(triangle_number(0_usize), 0_usize);
        assert_eq!(triangle_number(4_usize), 10_usize);
    }
}
