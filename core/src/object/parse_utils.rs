use super::Id;

pub(crate) fn header<'a>(line: &'a [u8], name: &[u8]) -> Option<&'a [u8]> {
    if line.contains(&b' ') {
        let (maybe_name, value) = split_once(line, &b' ');
        if maybe_name == name {
            Some(value)
        } else {
            None
        }
    } else {
        None
    }
}

pub(crate) fn split_once<'a>(s: &'a [u8], c: &u8) -> (&'a [u8], &'a [u8]) {
    match s.iter().position(|b| b == c) {
        Some(n) => (&s[0..n], &s[n + 1..]),
        None => (s, &[]),
    }
}

// Splits off the next `\n`-terminated line. Returns `None` if there
// is no terminating newline.
pub(crate) fn next_line(s: &[u8]) -> Option<(&[u8], &[u8])> {
    s.iter()
        .position(|b| *b == b'\n')
        .map(|n| (&s[0..n], &s[n + 1..]))
}

pub(crate) fn header_id(line: &[u8], name: &[u8]) -> Option<Id> {
    header(line, name).and_then(|hex| Id::from_hex(hex).ok())
}
