// Copyright 2025 The Pigweed Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

//! Parser for `printf` format strings and their translation to
//! `core::fmt` format strings.

use std::collections::HashSet;
use std::fmt::Write;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_till1},
    character::complete::{anychar, digit1},
    combinator::{map, map_res, opt, value},
    multi::many0,
    sequence::preceded,
};

/// A printf specifier (the 'd' in %d).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Specifier {
    Decimal,
    Integer,
    Octal,
    Unsigned,
    Hex,
    UpperHex,
    Double,
    UpperDouble,
    Exponential,
    UpperExponential,
    SmallDouble,
    UpperSmallDouble,
    Char,
    String,
    Pointer,
    Untyped,
}

/// A printf flag (the '+' in %+d).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Flag {
    LeftJustify,
    ForceSign,
    SpaceSign,
    AlternateSyntax,
    LeadingZeros,
}

/// A printf minimum field width (the 5 in %5d).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(u32),
    Variable,
}

/// A printf precision (the .5 in %.5f).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(u32),
    Variable,
}

/// A printf length modifier (the l in %ld).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Length {
    Char,
    Short,
    Long,
    LongLong,
    LongDouble,
    IntMax,
    Size,
    PointerDiff,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionSpec {
    pub flags: HashSet<Flag>,
    pub width: Width,
    pub precision: Precision,
    pub length: Option<Length>,
    pub specifier: Specifier,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    Literal(String),
    Conversion(ConversionSpec),
}

fn map_specifier(value: char) -> Result<Specifier, String> {
    match value {
        'd' => Ok(Specifier::Decimal),
        'i' => Ok(Specifier::Integer),
        'o' => Ok(Specifier::Octal),
        'u' => Ok(Specifier::Unsigned),
        'x' => Ok(Specifier::Hex),
        'X' => Ok(Specifier::UpperHex),
        'f' => Ok(Specifier::Double),
        'F' => Ok(Specifier::UpperDouble),
        'e' => Ok(Specifier::Exponential),
        'E' => Ok(Specifier::UpperExponential),
        'g' => Ok(Specifier::SmallDouble),
        'G' => Ok(Specifier::UpperSmallDouble),
        'c' => Ok(Specifier::Char),
        's' => Ok(Specifier::String),
        'p' => Ok(Specifier::Pointer),
        'v' => Ok(Specifier::Untyped),
        _ => Err(format!("Unsupported format specifier '{value}'")),
    }
}

fn specifier(input: &str) -> IResult<&str, Specifier> {
    map_res(anychar, map_specifier)(input)
}

fn map_flag(value: char) -> Result<Flag, String> {
    match value {
        '-' => Ok(Flag::LeftJustify),
        '+' => Ok(Flag::ForceSign),
        ' ' => Ok(Flag::SpaceSign),
        '#' => Ok(Flag::AlternateSyntax),
        '0' => Ok(Flag::LeadingZeros),
        _ => Err(format!("Unsupported flag '{value}'")),
    }
}

fn flags(input: &str) -> IResult<&str, HashSet<Flag>> {
    let (input, flags) = many0(map_res(anychar, map_flag))(input)?;

    Ok((input, flags.into_iter().collect()))
}

fn width(input: &str) -> IResult<&str, Width> {
    map(
        opt(alt((
            value(Width::Variable, tag("*")),
            map_res(digit1, |digits: &str| digits.parse().map(Width::Fixed)),
        ))),
        |width| width.unwrap_or(Width::None),
    )(input)
}

fn precision(input: &str) -> IResult<&str, Precision> {
    map(
        opt(preceded(
            tag("."),
            alt((
                value(Precision::Variable, tag("*")),
                map_res(digit1, |digits: &str| digits.parse().map(Precision::Fixed)),
                // A lone '.' means a precision of zero.
                value(Precision::Fixed(0), tag("")),
            )),
        )),
        |precision| precision.unwrap_or(Precision::None),
    )(input)
}

fn length(input: &str) -> IResult<&str, Option<Length>> {
    alt((
        map(tag("hh"), |_| Some(Length::Char)),
        map(tag("h"), |_| Some(Length::Short)),
        map(tag("ll"), |_| Some(Length::LongLong)), // ll must precede l
        map(tag("l"), |_| Some(Length::Long)),
        map(tag("L"), |_| Some(Length::LongDouble)),
        map(tag("j"), |_| Some(Length::IntMax)),
        map(tag("z"), |_| Some(Length::Size)),
        map(tag("t"), |_| Some(Length::PointerDiff)),
        map(tag(""), |_| None),
    ))(input)
}

fn conversion_spec(input: &str) -> IResult<&str, ConversionSpec> {
    let (input, _) = tag("%")(input)?;
    let (input, flags) = flags(input)?;
    let (input, width) = width(input)?;
    let (input, precision) = precision(input)?;
    let (input, length) = length(input)?;
    let (input, specifier) = specifier(input)?;

    Ok((
        input,
        ConversionSpec {
            flags,
            width,
            precision,
            length,
            specifier,
        },
    ))
}

fn literal_fragment(input: &str) -> IResult<&str, Fragment> {
    map(take_till1(|c| c == '%'), |s: &str| {
        Fragment::Literal(s.to_string())
    })(input)
}

fn percent_fragment(input: &str) -> IResult<&str, Fragment> {
    map(tag("%%"), |_| Fragment::Literal("%".to_string()))(input)
}

fn conversion_fragment(input: &str) -> IResult<&str, Fragment> {
    map(conversion_spec, Fragment::Conversion)(input)
}

fn fragment(input: &str) -> IResult<&str, Fragment> {
    alt((percent_fragment, conversion_fragment, literal_fragment))(input)
}

/// Splits a printf format string into literals and conversions.
pub fn parse(format_string: &str) -> Result<Vec<Fragment>, String> {
    match many0(fragment)(format_string) {
        Ok(("", fragments)) => Ok(fragments),
        Ok((rest, _)) => Err(format!("Unsupported conversion at \"{rest}\"")),
        Err(e) => Err(format!("Failed to parse format string: {e}")),
    }
}

/// How an argument is converted before it reaches `core::fmt`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cast {
    Signed(&'static str),
    Unsigned(&'static str),
    Float,
    Char,
    Str,
    None,
}

/// A `core::fmt` format string and the cast applied to each argument.
#[derive(Debug, PartialEq, Eq)]
pub struct CoreFmt {
    pub format_string: String,
    pub casts: Vec<Cast>,
}

// Default precision of `%f` and `%e`.
const DEFAULT_FLOAT_PRECISION: u32 = 6;

fn signed_type(length: Option<Length>) -> Result<&'static str, String> {
    match length {
        None | Some(Length::Long) => Ok("i32"),
        Some(Length::Char) => Ok("i8"),
        Some(Length::Short) => Ok("i16"),
        Some(Length::LongLong | Length::IntMax) => Ok("i64"),
        Some(Length::Size | Length::PointerDiff) => Ok("isize"),
        Some(Length::LongDouble) => Err("'L' only applies to floating point conversions".into()),
    }
}

fn unsigned_type(length: Option<Length>) -> Result<&'static str, String> {
    match length {
        None | Some(Length::Long) => Ok("u32"),
        Some(Length::Char) => Ok("u8"),
        Some(Length::Short) => Ok("u16"),
        Some(Length::LongLong | Length::IntMax) => Ok("u64"),
        Some(Length::Size | Length::PointerDiff) => Ok("usize"),
        Some(Length::LongDouble) => Err("'L' only applies to floating point conversions".into()),
    }
}

fn check_no_length(spec: &ConversionSpec) -> Result<(), String> {
    match spec.length {
        None => Ok(()),
        Some(length) => Err(format!(
            "Length modifier {length:?} is not supported for {:?} conversions",
            spec.specifier
        )),
    }
}

fn conversion(spec: &ConversionSpec) -> Result<(String, Cast), String> {
    if spec.flags.contains(&Flag::SpaceSign) {
        return Err("The ' ' flag is not supported, use '+'".into());
    }
    let width = match spec.width {
        Width::None => None,
        Width::Fixed(width) => Some(width),
        Width::Variable => return Err("Variable field widths ('*') are not supported".into()),
    };
    let precision = match spec.precision {
        Precision::None => None,
        Precision::Fixed(precision) => Some(precision),
        Precision::Variable => return Err("Variable precision ('.*') is not supported".into()),
    };

    let (ty, cast) = match spec.specifier {
        Specifier::Decimal | Specifier::Integer => ("", Cast::Signed(signed_type(spec.length)?)),
        Specifier::Unsigned => ("", Cast::Unsigned(unsigned_type(spec.length)?)),
        Specifier::Octal => ("o", Cast::Unsigned(unsigned_type(spec.length)?)),
        Specifier::Hex => ("x", Cast::Unsigned(unsigned_type(spec.length)?)),
        Specifier::UpperHex => ("X", Cast::Unsigned(unsigned_type(spec.length)?)),
        Specifier::Double | Specifier::UpperDouble => ("", Cast::Float),
        Specifier::Exponential => ("e", Cast::Float),
        Specifier::UpperExponential => ("E", Cast::Float),
        Specifier::SmallDouble | Specifier::UpperSmallDouble => {
            return Err("'%g' is not supported, use '%f' or '%e'".into());
        }
        Specifier::Char => ("", Cast::Char),
        Specifier::String => ("", Cast::Str),
        Specifier::Pointer => ("p", Cast::None),
        Specifier::Untyped => ("", Cast::None),
    };

    let precision = match cast {
        Cast::Signed(_) | Cast::Unsigned(_) if precision.is_some() => {
            return Err("Precision is not supported for integer conversions".into());
        }
        Cast::Float => {
            if !matches!(spec.length, None | Some(Length::Long | Length::LongDouble)) {
                check_no_length(spec)?;
            }
            Some(precision.unwrap_or(DEFAULT_FLOAT_PRECISION))
        }
        Cast::Char | Cast::Str | Cast::None => {
            check_no_length(spec)?;
            if precision.is_some() && cast != Cast::Str {
                return Err(format!(
                    "Precision is not supported for {:?} conversions",
                    spec.specifier
                ));
            }
            precision
        }
        Cast::Signed(_) | Cast::Unsigned(_) => None,
    };

    let left = spec.flags.contains(&Flag::LeftJustify);
    let signed = matches!(cast, Cast::Signed(_) | Cast::Float);
    let mut format_spec = String::new();
    if left {
        format_spec.push('<');
    }
    if signed && spec.flags.contains(&Flag::ForceSign) {
        format_spec.push('+');
    }
    if spec.flags.contains(&Flag::AlternateSyntax) {
        format_spec.push('#');
    }
    // As in C, '-' wins over '0'.
    if !left && spec.flags.contains(&Flag::LeadingZeros) {
        format_spec.push('0');
    }
    if let Some(width) = width {
        let _ = write!(format_spec, "{width}");
    }
    if let Some(precision) = precision {
        let _ = write!(format_spec, ".{precision}");
    }
    format_spec.push_str(ty);

    let placeholder = if format_spec.is_empty() {
        "{}".to_string()
    } else {
        format!("{{:{format_spec}}}")
    };
    Ok((placeholder, cast))
}

/// Translates parsed printf fragments into a `core::fmt` format string.
pub fn to_core_fmt(fragments: &[Fragment]) -> Result<CoreFmt, String> {
    let mut format_string = String::new();
    let mut casts = Vec::new();
    for fragment in fragments {
        match fragment {
            Fragment::Literal(literal) => {
                format_string.push_str(&literal.replace('{', "{{").replace('}', "}}"));
            }
            Fragment::Conversion(spec) => {
                let (placeholder, cast) = conversion(spec)?;
                format_string.push_str(&placeholder);
                casts.push(cast);
            }
        }
    }
    Ok(CoreFmt {
        format_string,
        casts,
    })
}
