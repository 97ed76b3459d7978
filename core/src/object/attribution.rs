use std::fmt;
use std::str::{self, FromStr};

use super::parse_utils::split_once;

// Time zone offsets, in minutes, that git will write: -12:00 to +14:00.
const TZ_MIN: i16 = -720;
const TZ_MAX: i16 = 840;

/// An `Attribution` combines a person's identity (name and e-mail address)
/// with the timestamp for a particular action.
///
/// Attributions appear as the `author` and `committer` lines of a commit.
///
/// The `timestamp` value is in seconds relative to the Unix epoch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribution {
    name: String,
    email: String,
    timestamp: i64,
    tz_offset: i16,
}

impl Attribution {
    /// Creates a new attribution.
    ///
    /// Panics if `tz_offset` (minutes relative to GMT) is outside
    /// the range -12:00 to +14:00.
    pub fn new(name: &str, email: &str, timestamp: i64, tz_offset: i16) -> Attribution {
        if !(TZ_MIN..=TZ_MAX).contains(&tz_offset) {
            panic!("Illegal time zone offset: {}", tz_offset);
        }

        Attribution {
            name: name.to_string(),
            email: email.to_string(),
            timestamp,
            tz_offset,
        }
    }

    /// Parse an attribution line (without the `author ` or `committer ` prefix).
    ///
    /// Returns `None` if unable to parse the line properly, including when the
    /// timestamp or time zone would not be written back the same way: a
    /// missing field, a leading zero, minutes past 59, `-0000`, or an offset
    /// outside -12:00 to +14:00.
    pub fn parse(line: &[u8]) -> Option<Attribution> {
        let line = drop_last_newline(line);
        let (name, line) = split_once(line, &b'<');
        let name = str::from_utf8(drop_last_space(name)).ok()?.to_string();

        if !line.contains(&b'>') {
            return None;
        }

        let (email, line) = split_once(line, &b'>');
        let email = str::from_utf8(email).ok()?.to_string();

        let line = drop_last_space(line);
        let (tz_offset, line) = last_word(line);
        let tz_offset = tz_from_str(tz_offset.as_str())?;

        let (timestamp, line) = last_word(line);
        let timestamp = timestamp_from_str(timestamp.as_str())?;

        if !line.is_empty() {
            return None;
        }

        Some(Attribution {
            name,
            email,
            timestamp,
            tz_offset,
        })
    }

    /// Returns the person's human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the person's email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the timestamp.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the timezone offset (minutes relative to GMT).
    pub fn tz_offset(&self) -> i16 {
        self.tz_offset
    }

    /// Returns the timezone formatted in human readable offset from GMT.
    pub fn format_tz(&self) -> String {
        let sign = if self.tz_offset < 0 { "-" } else { "+" };

        let offset = self.tz_offset.abs();
        let hours = offset / 60;
        let min = offset % 60;

        format!("{}{:02}{:02}", sign, hours, min)
    }
}

fn drop_last_newline(s: &[u8]) -> &[u8] {
    if s.last() == Some(&b'\n') {
        &s[0..s.len() - 1]
    } else {
        s
    }
}

fn drop_last_space(s: &[u8]) -> &[u8] {
    if s.last() == Some(&b' ') {
        &s[0..s.len() - 1]
    } else {
        s
    }
}

fn last_word(s: &[u8]) -> (String, &[u8]) {
    let s = match s.iter().position(|b| b != &b' ') {
        Some(n) => &s[n..],
        None => s,
    };

    let (word, line) = match s.iter().rev().position(|b| b == &b' ') {
        Some(n) => (&s[s.len() - n..], &s[0..s.len() - n - 1]),
        None => (s, &[][..]),
    };

    let word = str::from_utf8(word).unwrap_or("").to_string();
    (word, line)
}

fn timestamp_from_str(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    // `i64` formatting never produces these.
    if (digits.len() > 1 && digits.starts_with('0')) || s == "-0" {
        return None;
    }

    i64::from_str(s).ok()
}

fn tz_from_str(s: &str) -> Option<i16> {
    let s = s.as_bytes();

    if s.len() != 5 {
        return None;
    }

    let sign: i16 = match s[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };

    let hh = from_digit(s[1])? * 10 + from_digit(s[2])?;
    let mm = from_digit(s[3])? * 10 + from_digit(s[4])?;
    if mm > 59 || (sign < 0 && hh == 0 && mm == 0) {
        return None;
    }

    let offset = sign * (hh * 60 + mm);
    if (TZ_MIN..=TZ_MAX).contains(&offset) {
        Some(offset)
    } else {
        None
    }
}

fn from_digit(digit: u8) -> Option<i16> {
    if digit.is_ascii_digit() {
        Some((digit - b'0') as i16)
    } else {
        None
    }
}

fn sanitize(s: &str) -> String {
    // Drop control characters (except CR) and angle brackets.
    s.trim()
        .chars()
        .filter(|c| !matches!(*c as u32, 0..=12 | 14..=31 | 60 | 62))
        .collect()
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> {} {}",
            sanitize(&self.name),
            sanitize(&self.email),
            self.timestamp,
            self.format_tz()
        )
    }
}
